use crate::{
    dtos::course::{
        CandidateQueryParams, CourseQueryParams, CourseRequest, CourseResponse, MutationResponse,
        PrerequisiteResponse,
    },
    error::{AppError, ErrorBody},
    routes::current_viewer,
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::services::{course::CourseService, query_course::QueryCourseService};
use models::{department::Department, source_type::SourceType};
use tower_oauth2_resource_server::claims::DefaultClaims;
use uuid::Uuid;

/// List own and system courses, newest first
#[utoipa::path(
    get,
    path = "/courses",
    params(CourseQueryParams),
    responses(
        (status = 200, description = "Visible courses retrieved successfully", body = Vec<CourseResponse>),
        (status = 400, description = "Invalid department filter", body = ErrorBody),
        (status = 403, description = "User is not registered", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    security(("jwt" = [])),
    tag = "Courses"
)]
pub async fn list_courses(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Query(params): Query<CourseQueryParams>,
) -> Result<Json<Vec<CourseResponse>>, AppError> {
    let viewer = current_viewer(&state, &claims).await?;
    let filter = params.filter()?;

    let courses = QueryCourseService::list_visible_courses(&state.db, &viewer, &filter).await?;

    Ok(Json(
        courses
            .into_iter()
            .map(|c| CourseResponse::new(c, &viewer))
            .collect(),
    ))
}

/// List only the caller's own courses, newest first
#[utoipa::path(
    get,
    path = "/courses/mine",
    params(CourseQueryParams),
    responses(
        (status = 200, description = "Own courses retrieved successfully", body = Vec<CourseResponse>),
        (status = 400, description = "Invalid department filter", body = ErrorBody),
        (status = 403, description = "User is not registered", body = ErrorBody)
    ),
    security(("jwt" = [])),
    tag = "Courses"
)]
pub async fn list_my_courses(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Query(params): Query<CourseQueryParams>,
) -> Result<Json<Vec<CourseResponse>>, AppError> {
    let viewer = current_viewer(&state, &claims).await?;
    let filter = params.filter()?;

    let courses =
        QueryCourseService::list_owned_courses(&state.db, viewer.acting_owner, &filter).await?;

    Ok(Json(
        courses
            .into_iter()
            .map(|c| CourseResponse::new(c, &viewer))
            .collect(),
    ))
}

/// Department names a course can be filed under
#[utoipa::path(
    get,
    path = "/departments",
    responses(
        (status = 200, description = "All departments", body = Vec<String>)
    ),
    security(("jwt" = [])),
    tag = "Courses"
)]
pub async fn list_departments() -> Json<Vec<String>> {
    Json(Department::all().iter().map(ToString::to_string).collect())
}

/// Courses that can be picked as prerequisites, ordered by code
#[utoipa::path(
    get,
    path = "/courses/candidates",
    params(CandidateQueryParams),
    responses(
        (status = 200, description = "Prerequisite candidates", body = Vec<PrerequisiteResponse>),
        (status = 403, description = "User is not registered", body = ErrorBody)
    ),
    security(("jwt" = [])),
    tag = "Courses"
)]
pub async fn list_candidates(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Query(params): Query<CandidateQueryParams>,
) -> Result<Json<Vec<PrerequisiteResponse>>, AppError> {
    let viewer = current_viewer(&state, &claims).await?;

    let candidates = QueryCourseService::list_prerequisite_candidates(
        &state.db,
        &viewer,
        params.exclude.as_deref(),
        params.search.as_deref(),
    )
    .await?;

    Ok(Json(
        candidates
            .into_iter()
            .map(|p| PrerequisiteResponse::new(p, &viewer))
            .collect(),
    ))
}

/// Create a course in the caller's account
#[utoipa::path(
    post,
    path = "/courses",
    request_body = CourseRequest,
    responses(
        (status = 201, description = "Course created", body = MutationResponse),
        (status = 400, description = "Invalid fields or unknown prerequisite", body = ErrorBody),
        (status = 409, description = "Course code already used in this account", body = ErrorBody)
    ),
    security(("jwt" = [])),
    tag = "Courses"
)]
pub async fn create_course(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Json(request): Json<CourseRequest>,
) -> Result<(StatusCode, Json<MutationResponse>), AppError> {
    let viewer = current_viewer(&state, &claims).await?;
    let draft = request.into_draft()?;

    // Courses created by the system owner are the shared catalog
    let source_type = if viewer.is_system() {
        SourceType::System
    } else {
        SourceType::Added
    };
    let course = CourseService::add_course(&state.db, &viewer, &draft, source_type).await?;

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse {
            success: true,
            message: format!("New course '{}' added successfully!", course.name),
            course: Some(CourseResponse::new(course, &viewer)),
        }),
    ))
}

/// Get a course visible to the caller
#[utoipa::path(
    get,
    path = "/courses/{id}",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course found", body = CourseResponse),
        (status = 404, description = "Course not found", body = ErrorBody)
    ),
    security(("jwt" = [])),
    tag = "Courses"
)]
pub async fn get_course(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<CourseResponse>, AppError> {
    let viewer = current_viewer(&state, &claims).await?;

    let course = QueryCourseService::find_visible_course(&state.db, &viewer, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Course '{id}' not found.")))?;

    Ok(Json(CourseResponse::new(course, &viewer)))
}

/// Replace a course's fields and prerequisites
#[utoipa::path(
    put,
    path = "/courses/{id}",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    request_body = CourseRequest,
    responses(
        (status = 200, description = "Course updated", body = MutationResponse),
        (status = 400, description = "Invalid fields or unknown prerequisite", body = ErrorBody),
        (status = 403, description = "System courses are read-only", body = ErrorBody),
        (status = 404, description = "Course not found", body = ErrorBody),
        (status = 409, description = "New code already used in this account", body = ErrorBody)
    ),
    security(("jwt" = [])),
    tag = "Courses"
)]
pub async fn update_course(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Path(id): Path<Uuid>,
    Json(request): Json<CourseRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let viewer = current_viewer(&state, &claims).await?;
    let existing = CourseService::authorize_mutation(&state.db, &viewer, id).await?;
    let draft = request.into_draft()?;

    let course = CourseService::update_course(
        &state.db,
        existing.owner_id,
        viewer.system_owner,
        &existing.course_code,
        &draft,
    )
    .await?;

    Ok(Json(MutationResponse {
        success: true,
        message: format!("Course '{}' updated successfully!", course.name),
        course: Some(CourseResponse::new(course, &viewer)),
    }))
}

/// Delete a course and every prerequisite link it takes part in
#[utoipa::path(
    delete,
    path = "/courses/{id}",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course deleted", body = MutationResponse),
        (status = 403, description = "System courses are read-only", body = ErrorBody),
        (status = 404, description = "Course not found", body = ErrorBody)
    ),
    security(("jwt" = [])),
    tag = "Courses"
)]
pub async fn delete_course(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<MutationResponse>, AppError> {
    let viewer = current_viewer(&state, &claims).await?;
    let existing = CourseService::authorize_mutation(&state.db, &viewer, id).await?;

    let name =
        CourseService::delete_course(&state.db, existing.owner_id, &existing.course_code).await?;

    Ok(Json(MutationResponse {
        success: true,
        message: format!("Course '{name}' deleted successfully!"),
        course: None,
    }))
}
