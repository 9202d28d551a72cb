use crate::{entities::owners, error::ServiceError};
use chrono::Utc;
use models::visibility::Viewer;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect,
};
use uuid::Uuid;

pub struct IdentityService;

impl IdentityService {
    /// Usernames are stored and matched in lowercase
    fn normalize(username: &str) -> String {
        username.trim().to_lowercase()
    }

    /// Looks up the owner id registered for a username
    pub async fn resolve_owner_id<C: ConnectionTrait>(
        db: &C,
        username: &str,
    ) -> Result<Uuid, ServiceError> {
        let username = Self::normalize(username);

        owners::Entity::find()
            .select_only()
            .column(owners::Column::Id)
            .filter(owners::Column::Username.eq(username.as_str()))
            .into_tuple::<Uuid>()
            .one(db)
            .await?
            .ok_or(ServiceError::OwnerNotFound(username))
    }

    /// Looks up the system owner. Its absence is a deployment fault, so it is
    /// reported as fatal rather than as an unknown user.
    pub async fn resolve_system_owner<C: ConnectionTrait>(
        db: &C,
        system_username: &str,
    ) -> Result<Uuid, ServiceError> {
        match Self::resolve_owner_id(db, system_username).await {
            Err(ServiceError::OwnerNotFound(username)) => {
                log::error!("System owner '{username}' not found");
                Err(ServiceError::SystemOwnerMissing(username))
            }
            other => other,
        }
    }

    /// Builds the request context for an authenticated user
    pub async fn resolve_viewer<C: ConnectionTrait>(
        db: &C,
        username: &str,
        system_username: &str,
    ) -> Result<Viewer, ServiceError> {
        let system_owner = Self::resolve_system_owner(db, system_username).await?;
        let acting_owner = Self::resolve_owner_id(db, username).await?;

        Ok(Viewer::new(acting_owner, system_owner))
    }

    /// Registers a new owner
    pub async fn register_owner<C: ConnectionTrait>(
        db: &C,
        username: &str,
    ) -> Result<Uuid, ServiceError> {
        let username = Self::normalize(username);
        if username.is_empty() {
            return Err(models::error::ValidationError::MissingField("username").into());
        }

        let id = Uuid::new_v4();
        let owner = owners::ActiveModel {
            id: Set(id),
            username: Set(username.clone()),
            created_at: Set(Utc::now().naive_utc()),
        };

        owners::Entity::insert(owner)
            .exec_without_returning(db)
            .await
            .map_err(|e| {
                ServiceError::from_insert(e, || ServiceError::UsernameTaken(username.clone()))
            })?;

        log::info!("Registered owner '{username}'");
        Ok(id)
    }

    /// Makes sure the system owner exists, creating it on first start
    pub async fn provision_system_owner<C: ConnectionTrait>(
        db: &C,
        system_username: &str,
    ) -> Result<Uuid, ServiceError> {
        match Self::resolve_owner_id(db, system_username).await {
            Ok(id) => Ok(id),
            Err(ServiceError::OwnerNotFound(_)) => {
                log::info!("Provisioning system owner '{system_username}'");
                Self::register_owner(db, system_username).await
            }
            Err(e) => Err(e),
        }
    }
}
