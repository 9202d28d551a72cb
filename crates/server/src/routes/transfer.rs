use crate::{
    dtos::transfer::{ExportParams, ImportResponse},
    error::{AppError, ErrorBody},
    routes::current_viewer,
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Multipart, Query, State, multipart::MultipartError},
    http::{StatusCode, header},
    response::IntoResponse,
};
use database::services::transfer::TransferService;
use models::transfer::EXPORT_FILE_NAME;
use tower_oauth2_resource_server::claims::DefaultClaims;

const UPLOAD_FIELD: &str = "file";
const ACCEPTED_CONTENT_TYPES: [&str; 2] = ["text/csv", "application/vnd.ms-excel"];

/// Download courses as CSV
#[utoipa::path(
    get,
    path = "/export",
    params(ExportParams),
    responses(
        (status = 200, description = "CSV file with a UTF-8 byte-order mark", content_type = "text/csv", body = String),
        (status = 403, description = "User is not registered", body = ErrorBody)
    ),
    security(("jwt" = [])),
    tag = "Import/Export"
)]
pub async fn export_courses(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = current_viewer(&state, &claims).await?;
    let scope = params.scope.unwrap_or_default();

    let bytes = TransferService::export_courses(&state.db, &viewer, scope).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        bytes,
    ))
}

/// Import courses from an uploaded CSV file
///
/// Rows that fail validation are reported and skipped; the rest are added.
#[utoipa::path(
    post,
    path = "/import",
    request_body(content_type = "multipart/form-data", description = "CSV file in the `file` field"),
    responses(
        (status = 200, description = "Import finished, possibly with row errors", body = ImportResponse),
        (status = 400, description = "Missing file, wrong file type or wrong header", body = ErrorBody),
        (status = 403, description = "User is not registered", body = ErrorBody),
        (status = 413, description = "File too large", body = ErrorBody)
    ),
    security(("jwt" = [])),
    tag = "Import/Export"
)]
pub async fn import_courses(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, AppError> {
    let viewer = current_viewer(&state, &claims).await?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(upload_error)?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        if let Some(content_type) = field.content_type()
            && !ACCEPTED_CONTENT_TYPES.contains(&content_type)
        {
            return Err(AppError::Validation(
                "Please upload a valid CSV file.".to_owned(),
            ));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(upload_error)?;
        upload = Some(bytes);
        break;
    }

    let bytes = upload.ok_or_else(|| AppError::Validation("No CSV file provided.".to_owned()))?;
    let report = TransferService::import_courses(&state.db, &viewer, &bytes).await?;

    Ok(Json(report.into()))
}

fn upload_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::TooLarge("The CSV file exceeds the upload size limit.".to_owned())
    } else {
        AppError::Validation(format!("Failed to read the CSV file: {}", err.body_text()))
    }
}
