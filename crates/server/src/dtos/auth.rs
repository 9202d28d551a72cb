use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub username: String,
    /// Present once the user has registered
    pub owner_id: Option<Uuid>,
    pub registered: bool,
    pub is_system: bool,
}
