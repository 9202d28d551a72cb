use crate::{
    entities::{courses, dependencies},
    error::ServiceError,
};
use chrono::Utc;
use models::course::PrerequisiteRef;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
};
use std::collections::HashMap;
use uuid::Uuid;

/// Ids bound per `IN (...)` list, well under the Postgres bind parameter cap
const ID_CHUNK_SIZE: usize = 1000;

pub struct DependencyService;

impl DependencyService {
    /// Creates one edge per prerequisite code for `course`
    ///
    /// Codes equal to the course's own code are dropped silently. Every other
    /// code must name a course owned by `visibility_owner` or `system_owner`,
    /// otherwise nothing is linked and the caller's transaction is expected to
    /// roll back. When both owners have a course with the same code, the
    /// visibility owner's own course is the one linked.
    ///
    /// Returns the ids of the linked prerequisite courses.
    pub async fn link_prerequisites<C: ConnectionTrait>(
        db: &C,
        course: &courses::Model,
        prerequisite_codes: &[String],
        visibility_owner: Uuid,
        system_owner: Uuid,
    ) -> Result<Vec<Uuid>, ServiceError> {
        let mut linked = Vec::new();

        for code in prerequisite_codes {
            let code = code.trim();
            if code.is_empty() || code == course.course_code {
                continue;
            }

            let prerequisite =
                Self::resolve_prerequisite(db, code, visibility_owner, system_owner)
                    .await?
                    .ok_or_else(|| ServiceError::PrerequisiteNotFound(code.to_owned()))?;

            if !linked.contains(&prerequisite.id) {
                linked.push(prerequisite.id);
            }
        }

        if linked.is_empty() {
            return Ok(linked);
        }

        let now = Utc::now().naive_utc();
        let edges = linked.iter().map(|prerequisite_id| dependencies::ActiveModel {
            id: Set(Uuid::new_v4()),
            course_id: Set(course.id),
            prerequisite_id: Set(*prerequisite_id),
            created_at: Set(now),
        });

        dependencies::Entity::insert_many(edges)
            .exec_without_returning(db)
            .await?;

        log::debug!(
            "Linked {} prerequisites to course {}",
            linked.len(),
            course.course_code
        );
        Ok(linked)
    }

    /// Finds the course a prerequisite code refers to, preferring the
    /// visibility owner's course over the system owner's
    async fn resolve_prerequisite<C: ConnectionTrait>(
        db: &C,
        code: &str,
        visibility_owner: Uuid,
        system_owner: Uuid,
    ) -> Result<Option<courses::Model>, ServiceError> {
        let candidates = courses::Entity::find()
            .filter(courses::Column::CourseCode.eq(code))
            .filter(courses::Column::OwnerId.is_in([visibility_owner, system_owner]))
            .all(db)
            .await?;

        let own = candidates
            .iter()
            .position(|c| c.owner_id == visibility_owner)
            .unwrap_or(0);

        Ok(candidates.into_iter().nth(own))
    }

    /// Removes every outgoing edge of a course
    pub async fn unlink_all_prerequisites<C: ConnectionTrait>(
        db: &C,
        course_id: Uuid,
    ) -> Result<u64, ServiceError> {
        let result = dependencies::Entity::delete_many()
            .filter(dependencies::Column::CourseId.eq(course_id))
            .exec(db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Removes every edge the course takes part in, on either side
    pub async fn unlink_all_edges<C: ConnectionTrait>(
        db: &C,
        course_id: Uuid,
    ) -> Result<u64, ServiceError> {
        let result = dependencies::Entity::delete_many()
            .filter(
                Condition::any()
                    .add(dependencies::Column::CourseId.eq(course_id))
                    .add(dependencies::Column::PrerequisiteId.eq(course_id)),
            )
            .exec(db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Prerequisites of a single course, ordered by code
    pub async fn get_prerequisites<C: ConnectionTrait>(
        db: &C,
        course_id: Uuid,
    ) -> Result<Vec<PrerequisiteRef>, ServiceError> {
        let mut by_course = Self::prerequisites_for(db, &[course_id]).await?;
        Ok(by_course.remove(&course_id).unwrap_or_default())
    }

    /// Batch lookup of prerequisites for many courses, keyed by dependent id
    pub async fn prerequisites_for<C: ConnectionTrait>(
        db: &C,
        course_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<PrerequisiteRef>>, ServiceError> {
        if course_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut edges = Vec::new();
        for chunk in course_ids.chunks(ID_CHUNK_SIZE) {
            edges.extend(
                dependencies::Entity::find()
                    .filter(dependencies::Column::CourseId.is_in(chunk.iter().copied()))
                    .all(db)
                    .await?,
            );
        }

        if edges.is_empty() {
            return Ok(HashMap::new());
        }

        let mut prerequisite_ids: Vec<Uuid> = edges.iter().map(|e| e.prerequisite_id).collect();
        prerequisite_ids.sort();
        prerequisite_ids.dedup();

        // Build lookup map
        let mut prerequisites: HashMap<Uuid, courses::Model> = HashMap::new();
        for chunk in prerequisite_ids.chunks(ID_CHUNK_SIZE) {
            let rows = courses::Entity::find()
                .filter(courses::Column::Id.is_in(chunk.iter().copied()))
                .all(db)
                .await?;
            prerequisites.extend(rows.into_iter().map(|c| (c.id, c)));
        }

        let mut by_course: HashMap<Uuid, Vec<PrerequisiteRef>> = HashMap::new();
        for edge in edges {
            if let Some(prerequisite) = prerequisites.get(&edge.prerequisite_id) {
                by_course
                    .entry(edge.course_id)
                    .or_default()
                    .push(prerequisite.as_prerequisite());
            }
        }

        for list in by_course.values_mut() {
            list.sort_by(|a, b| a.code.cmp(&b.code).then(a.id.cmp(&b.id)));
            list.dedup_by_key(|p| p.id);
        }

        Ok(by_course)
    }
}
