pub mod auth;
pub mod course;
pub mod graph;
pub mod health;
pub mod transfer;

use crate::{error::AppError, state::AppState};
use database::services::identity::IdentityService;
use models::visibility::Viewer;
use tower_oauth2_resource_server::claims::DefaultClaims;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Routes that require a bearer token
pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(auth::auth))
        .routes(routes!(auth::register))
        .routes(routes!(course::list_courses, course::create_course))
        .routes(routes!(course::list_my_courses))
        .routes(routes!(course::list_candidates))
        .routes(routes!(course::list_departments))
        .routes(routes!(
            course::get_course,
            course::update_course,
            course::delete_course
        ))
        .routes(routes!(graph::get_graph))
        .routes(routes!(graph::get_my_graph))
        .routes(routes!(transfer::export_courses))
        .routes(routes!(transfer::import_courses))
}

/// The token subject, which is the username
pub(crate) fn subject(claims: &DefaultClaims) -> Result<&str, AppError> {
    claims
        .sub
        .as_deref()
        .ok_or_else(|| AppError::Internal("missing subject in claims".to_owned()))
}

/// Resolves the registered owner behind a token, paired with the system owner
pub(crate) async fn current_viewer(
    state: &AppState,
    claims: &DefaultClaims,
) -> Result<Viewer, AppError> {
    let username = subject(claims)?;
    let viewer =
        IdentityService::resolve_viewer(&state.db, username, &state.config.system_username)
            .await?;
    Ok(viewer)
}
