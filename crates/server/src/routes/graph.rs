use crate::{
    dtos::course::CourseQueryParams,
    error::{AppError, ErrorBody},
    routes::current_viewer,
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use database::services::query_course::QueryCourseService;
use models::graph::{CourseGraph, build_graph};
use tower_oauth2_resource_server::claims::DefaultClaims;

/// Prerequisite graph over own and system courses
#[utoipa::path(
    get,
    path = "/graph",
    params(CourseQueryParams),
    responses(
        (status = 200, description = "Nodes and prerequisite edges", content_type = "application/json"),
        (status = 400, description = "Invalid department filter", body = ErrorBody),
        (status = 403, description = "User is not registered", body = ErrorBody)
    ),
    security(("jwt" = [])),
    tag = "Graph"
)]
pub async fn get_graph(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Query(params): Query<CourseQueryParams>,
) -> Result<Json<CourseGraph>, AppError> {
    let viewer = current_viewer(&state, &claims).await?;
    let filter = params.filter()?;

    let courses = QueryCourseService::list_visible_courses(&state.db, &viewer, &filter).await?;

    Ok(Json(build_graph(&courses)))
}

/// Prerequisite graph over the caller's own courses only
#[utoipa::path(
    get,
    path = "/graph/mine",
    params(CourseQueryParams),
    responses(
        (status = 200, description = "Nodes and prerequisite edges", content_type = "application/json"),
        (status = 400, description = "Invalid department filter", body = ErrorBody),
        (status = 403, description = "User is not registered", body = ErrorBody)
    ),
    security(("jwt" = [])),
    tag = "Graph"
)]
pub async fn get_my_graph(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Query(params): Query<CourseQueryParams>,
) -> Result<Json<CourseGraph>, AppError> {
    let viewer = current_viewer(&state, &claims).await?;
    let filter = params.filter()?;

    let courses =
        QueryCourseService::list_owned_courses(&state.db, viewer.acting_owner, &filter).await?;

    Ok(Json(build_graph(&courses)))
}
