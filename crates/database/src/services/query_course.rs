use crate::{entities::courses, error::ServiceError, services::dependency::DependencyService};
use models::{
    course::{Course, PrerequisiteRef},
    visibility::{CourseFilter, Viewer},
};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    sea_query::{Expr, Func, LikeExpr},
};
use uuid::Uuid;

pub struct QueryCourseService;

impl QueryCourseService {
    /// Courses owned by the viewer or the system owner, newest first
    pub async fn list_visible_courses<C: ConnectionTrait>(
        db: &C,
        viewer: &Viewer,
        filter: &CourseFilter,
    ) -> Result<Vec<Course>, ServiceError> {
        Self::list_courses(db, viewer.visible_owners(), filter).await
    }

    /// Only the courses in the owner's own namespace, newest first
    pub async fn list_owned_courses<C: ConnectionTrait>(
        db: &C,
        owner: Uuid,
        filter: &CourseFilter,
    ) -> Result<Vec<Course>, ServiceError> {
        Self::list_courses(db, vec![owner], filter).await
    }

    async fn list_courses<C: ConnectionTrait>(
        db: &C,
        owners: Vec<Uuid>,
        filter: &CourseFilter,
    ) -> Result<Vec<Course>, ServiceError> {
        let rows = courses::Entity::find()
            .filter(Self::scope_condition(owners, filter))
            .order_by_desc(courses::Column::CreatedAt)
            .all(db)
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|c| c.id).collect();
        let mut prerequisites = DependencyService::prerequisites_for(db, &ids).await?;

        let courses = rows
            .into_iter()
            .map(|row| {
                let prereqs = prerequisites.remove(&row.id).unwrap_or_default();
                row.into_course(prereqs)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(courses)
    }

    /// Courses the viewer can pick as prerequisites, ordered by code
    ///
    /// `exclude_code` leaves out the course currently being edited.
    pub async fn list_prerequisite_candidates<C: ConnectionTrait>(
        db: &C,
        viewer: &Viewer,
        exclude_code: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<PrerequisiteRef>, ServiceError> {
        let mut condition = Self::scope_condition(
            viewer.visible_owners(),
            &CourseFilter::new(search, None),
        );

        if let Some(code) = exclude_code.map(str::trim)
            && !code.is_empty()
        {
            condition = condition.add(courses::Column::CourseCode.ne(code));
        }

        let rows = courses::Entity::find()
            .filter(condition)
            .order_by_asc(courses::Column::CourseCode)
            .order_by_asc(courses::Column::OwnerId)
            .all(db)
            .await?;

        Ok(rows.iter().map(courses::Model::as_prerequisite).collect())
    }

    /// Single course in an owner's namespace, with its prerequisites
    pub async fn get_course<C: ConnectionTrait>(
        db: &C,
        owner: Uuid,
        code: &str,
    ) -> Result<Option<Course>, ServiceError> {
        match Self::find_by_code(db, owner, code).await? {
            Some(row) => {
                let prerequisites = DependencyService::get_prerequisites(db, row.id).await?;
                Ok(Some(row.into_course(prerequisites)?))
            }
            None => Ok(None),
        }
    }

    /// Course by id, only when the viewer is allowed to see it
    pub async fn find_visible_course<C: ConnectionTrait>(
        db: &C,
        viewer: &Viewer,
        id: Uuid,
    ) -> Result<Option<Course>, ServiceError> {
        match courses::Entity::find_by_id(id).one(db).await? {
            Some(row) if viewer.can_view(row.owner_id) => {
                let prerequisites = DependencyService::get_prerequisites(db, row.id).await?;
                Ok(Some(row.into_course(prerequisites)?))
            }
            _ => Ok(None),
        }
    }

    pub(crate) async fn find_by_code<C: ConnectionTrait>(
        db: &C,
        owner: Uuid,
        code: &str,
    ) -> Result<Option<courses::Model>, ServiceError> {
        Ok(courses::Entity::find()
            .filter(courses::Column::OwnerId.eq(owner))
            .filter(courses::Column::CourseCode.eq(code.trim()))
            .one(db)
            .await?)
    }

    /// Restricts rows to the given owners, then applies the optional filters
    fn scope_condition(owners: Vec<Uuid>, filter: &CourseFilter) -> Condition {
        let mut condition = Condition::all().add(courses::Column::OwnerId.is_in(owners));

        if let Some(search) = filter.search() {
            condition = condition.add(Self::build_search_condition(search));
        }

        if let Some(department) = filter.department() {
            condition = condition.add(courses::Column::Department.eq(department));
        }

        condition
    }

    /// Case-insensitive substring match on course code or name
    fn build_search_condition(search_term: &str) -> Condition {
        let pattern = format!("%{}%", escape_like(&search_term.to_lowercase()));

        Condition::any()
            .add(
                Expr::expr(Func::lower(Expr::col(courses::Column::CourseCode)))
                    .like(LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE)),
            )
            .add(
                Expr::expr(Func::lower(Expr::col(courses::Column::CourseName)))
                    .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)),
            )
    }
}

// Kept clear of backslash so no dialect needs to quote it
const LIKE_ESCAPE: char = '!';

/// Escapes LIKE wildcards so user input only ever matches literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, LIKE_ESCAPE | '%' | '_') {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}
