use crate::{
    entities::courses,
    error::ServiceError,
    services::{dependency::DependencyService, query_course::QueryCourseService},
};
use chrono::Utc;
use models::{
    course::{Course, CourseDraft},
    error::ValidationError,
    source_type::SourceType,
    visibility::Viewer,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectionTrait, DatabaseConnection, EntityTrait,
    TransactionTrait,
};
use uuid::Uuid;

pub struct CourseService;

impl CourseService {
    /// Creates a course in the viewer's namespace and links its prerequisites
    ///
    /// Prerequisites may be the viewer's own courses or system courses. The
    /// course row and its edges are written in one transaction.
    pub async fn add_course(
        db: &DatabaseConnection,
        viewer: &Viewer,
        draft: &CourseDraft,
        source_type: SourceType,
    ) -> Result<Course, ServiceError> {
        let txn = db.begin().await?;

        let course = Self::insert_course(&txn, viewer.acting_owner, draft, source_type).await?;
        DependencyService::link_prerequisites(
            &txn,
            &course,
            draft.prerequisites(),
            viewer.acting_owner,
            viewer.system_owner,
        )
        .await?;
        let prerequisites = DependencyService::get_prerequisites(&txn, course.id).await?;

        txn.commit().await?;

        log::info!(
            "Added course {} ({} prerequisites) for owner {}",
            course.course_code,
            prerequisites.len(),
            course.owner_id
        );
        Ok(course.into_course(prerequisites)?)
    }

    async fn insert_course<C: ConnectionTrait>(
        db: &C,
        owner: Uuid,
        draft: &CourseDraft,
        source_type: SourceType,
    ) -> Result<courses::Model, ServiceError> {
        if QueryCourseService::find_by_code(db, owner, draft.code())
            .await?
            .is_some()
        {
            return Err(ServiceError::DuplicateCourseCode(draft.code().to_owned()));
        }

        let model = courses::Model {
            id: Uuid::new_v4(),
            owner_id: owner,
            course_code: draft.code().to_owned(),
            course_name: draft.name().to_owned(),
            credits: stored_credits(draft)?,
            department: draft.department(),
            source_type,
            created_at: Utc::now().naive_utc(),
        };

        let active = courses::ActiveModel {
            id: Set(model.id),
            owner_id: Set(model.owner_id),
            course_code: Set(model.course_code.clone()),
            course_name: Set(model.course_name.clone()),
            credits: Set(model.credits),
            department: Set(model.department),
            source_type: Set(model.source_type),
            created_at: Set(model.created_at),
        };

        // A concurrent insert of the same code can still slip past the check above
        courses::Entity::insert(active)
            .exec_without_returning(db)
            .await
            .map_err(|e| {
                ServiceError::from_insert(e, || {
                    ServiceError::DuplicateCourseCode(draft.code().to_owned())
                })
            })?;

        Ok(model)
    }

    /// Rewrites the course stored as (`owner`, `old_code`) and replaces its
    /// prerequisite set
    ///
    /// The caller is responsible for checking that the acting user may modify
    /// this owner's courses. Edges pointing at the course from its dependents
    /// stay attached when the code changes.
    pub async fn update_course(
        db: &DatabaseConnection,
        owner: Uuid,
        system_owner: Uuid,
        old_code: &str,
        draft: &CourseDraft,
    ) -> Result<Course, ServiceError> {
        let txn = db.begin().await?;

        let existing = QueryCourseService::find_by_code(&txn, owner, old_code)
            .await?
            .ok_or_else(|| ServiceError::NotFoundOrForbidden(old_code.to_owned()))?;

        if draft.code() != existing.course_code
            && QueryCourseService::find_by_code(&txn, owner, draft.code())
                .await?
                .is_some()
        {
            return Err(ServiceError::DuplicateCourseCode(draft.code().to_owned()));
        }

        let mut active: courses::ActiveModel = existing.into();
        active.course_code = Set(draft.code().to_owned());
        active.course_name = Set(draft.name().to_owned());
        active.credits = Set(stored_credits(draft)?);
        active.department = Set(draft.department());

        let updated = active.update(&txn).await.map_err(|e| {
            ServiceError::from_insert(e, || {
                ServiceError::DuplicateCourseCode(draft.code().to_owned())
            })
        })?;

        DependencyService::unlink_all_prerequisites(&txn, updated.id).await?;
        DependencyService::link_prerequisites(
            &txn,
            &updated,
            draft.prerequisites(),
            owner,
            system_owner,
        )
        .await?;
        let prerequisites = DependencyService::get_prerequisites(&txn, updated.id).await?;

        txn.commit().await?;

        log::info!(
            "Updated course {} -> {} for owner {}",
            old_code,
            updated.course_code,
            owner
        );
        Ok(updated.into_course(prerequisites)?)
    }

    /// Deletes a course and every edge it takes part in
    ///
    /// Returns the deleted course's name.
    pub async fn delete_course(
        db: &DatabaseConnection,
        owner: Uuid,
        code: &str,
    ) -> Result<String, ServiceError> {
        let txn = db.begin().await?;

        let existing = QueryCourseService::find_by_code(&txn, owner, code)
            .await?
            .ok_or_else(|| ServiceError::NotFoundOrForbidden(code.to_owned()))?;

        let removed_edges = DependencyService::unlink_all_edges(&txn, existing.id).await?;
        courses::Entity::delete_by_id(existing.id).exec(&txn).await?;

        txn.commit().await?;

        log::info!(
            "Deleted course {} for owner {} ({} edges removed)",
            existing.course_code,
            owner,
            removed_edges
        );
        Ok(existing.course_name)
    }

    /// Loads a course by id for modification by the viewer
    ///
    /// Courses the viewer cannot see are reported as missing. Visible courses
    /// the viewer may not modify are forbidden.
    pub async fn authorize_mutation<C: ConnectionTrait>(
        db: &C,
        viewer: &Viewer,
        course_id: Uuid,
    ) -> Result<courses::Model, ServiceError> {
        let course = courses::Entity::find_by_id(course_id)
            .one(db)
            .await?
            .filter(|c| viewer.can_view(c.owner_id))
            .ok_or_else(|| ServiceError::NotFoundOrForbidden(course_id.to_string()))?;

        if !viewer.can_mutate(course.owner_id) {
            log::warn!(
                "Owner {} attempted to modify course {} owned by {}",
                viewer.acting_owner,
                course.course_code,
                course.owner_id
            );
            return Err(ServiceError::Forbidden(course.course_code));
        }

        Ok(course)
    }
}

/// Credits in the column's integer type
fn stored_credits(draft: &CourseDraft) -> Result<i32, ServiceError> {
    i32::try_from(draft.credits())
        .map_err(|_| ValidationError::InvalidCredits(draft.credits().to_string()).into())
}
