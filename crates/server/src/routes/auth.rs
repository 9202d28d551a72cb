use crate::{
    dtos::auth::AuthResponse,
    error::{AppError, ErrorBody},
    routes::subject,
    state::AppState,
};
use axum::{Extension, Json, extract::State, http::StatusCode};
use database::{error::ServiceError, services::identity::IdentityService};
use tower_oauth2_resource_server::claims::DefaultClaims;

/// Reports who the token belongs to and whether they have registered
#[utoipa::path(
    get,
    path = "/auth",
    responses(
        (status = 200, description = "Successfully authenticated", body = AuthResponse),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 500, description = "Internal server error - missing subject in claims", body = ErrorBody)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Authentication"
)]
pub async fn auth(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
) -> Result<Json<AuthResponse>, AppError> {
    let username = subject(&claims)?.trim().to_lowercase();

    let owner_id = match IdentityService::resolve_owner_id(&state.db, &username).await {
        Ok(id) => Some(id),
        Err(ServiceError::OwnerNotFound(_)) => None,
        Err(e) => return Err(e.into()),
    };

    Ok(Json(AuthResponse {
        is_system: username == state.config.system_username,
        registered: owner_id.is_some(),
        owner_id,
        username,
    }))
}

/// Registers the token subject as a course owner
#[utoipa::path(
    post,
    path = "/auth/register",
    responses(
        (status = 201, description = "Owner registered", body = AuthResponse),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 409, description = "Username already registered", body = ErrorBody)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Authentication"
)]
pub async fn register(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let username = subject(&claims)?.trim().to_lowercase();
    let owner_id = IdentityService::register_owner(&state.db, &username).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            is_system: username == state.config.system_username,
            registered: true,
            owner_id: Some(owner_id),
            username,
        }),
    ))
}
