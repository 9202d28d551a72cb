use chrono::NaiveDateTime;
use models::{
    course::{Course, CourseDraft, PrerequisiteRef},
    department::Department,
    error::ValidationError,
    visibility::{CourseFilter, Viewer},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Body of course create and update requests
#[derive(Debug, Deserialize, ToSchema)]
pub struct CourseRequest {
    #[schema(example = "CS201")]
    pub course_code: String,
    #[schema(example = "Data Structures")]
    pub course_name: String,
    #[schema(example = 4)]
    pub credits: i64,
    #[schema(example = "Software Technologies")]
    pub department: String,
    /// Codes of prerequisite courses, own or system
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

impl CourseRequest {
    pub fn into_draft(self) -> Result<CourseDraft, ValidationError> {
        let department = Department::parse(&self.department)?;
        CourseDraft::new(
            &self.course_code,
            &self.course_name,
            self.credits,
            department,
            self.prerequisites,
        )
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PrerequisiteResponse {
    pub id: Uuid,
    pub course_code: String,
    pub course_name: String,
    /// Whether this is a shared system course
    pub is_system: bool,
}

impl PrerequisiteResponse {
    pub fn new(prerequisite: PrerequisiteRef, viewer: &Viewer) -> Self {
        Self {
            id: prerequisite.id,
            course_code: prerequisite.code,
            course_name: prerequisite.name,
            is_system: prerequisite.owner_id == viewer.system_owner,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseResponse {
    pub id: Uuid,
    pub course_code: String,
    pub course_name: String,
    pub credits: u32,
    pub department: String,
    /// `added`, `imported` or `system`
    pub source_type: String,
    pub created_at: NaiveDateTime,
    pub is_system: bool,
    /// Whether the requesting user may update or delete this course
    pub editable: bool,
    pub prerequisites: Vec<PrerequisiteResponse>,
}

impl CourseResponse {
    pub fn new(course: Course, viewer: &Viewer) -> Self {
        Self {
            id: course.id,
            is_system: course.owner_id == viewer.system_owner,
            editable: viewer.can_mutate(course.owner_id),
            course_code: course.code,
            course_name: course.name,
            credits: course.credits,
            department: course.department.to_string(),
            source_type: course.source_type.as_str().to_owned(),
            created_at: course.created_at,
            prerequisites: course
                .prerequisites
                .into_iter()
                .map(|p| PrerequisiteResponse::new(p, viewer))
                .collect(),
        }
    }
}

/// Outcome of a create, update or delete
#[derive(Debug, Serialize, ToSchema)]
pub struct MutationResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<CourseResponse>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct CourseQueryParams {
    /// Case-insensitive match on course code or name
    pub search: Option<String>,
    /// Exact department name
    pub department: Option<String>,
}

impl CourseQueryParams {
    pub fn filter(&self) -> Result<CourseFilter, ValidationError> {
        let department = match self.department.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => Some(Department::parse(d)?),
            _ => None,
        };

        Ok(CourseFilter::new(self.search.as_deref(), department))
    }
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct CandidateQueryParams {
    /// Code of the course being edited, left out of the results
    pub exclude: Option<String>,
    pub search: Option<String>,
}
