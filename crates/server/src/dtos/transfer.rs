use models::transfer::{ExportScope, ImportReport};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ExportParams {
    /// `all` (own and system courses, default) or `mine`
    #[param(value_type = Option<String>, example = "mine")]
    pub scope: Option<ExportScope>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImportResponse {
    pub success: bool,
    #[schema(example = "Import completed. Successfully imported 5 courses. 2 errors.")]
    pub message: String,
    /// Codes of the created courses
    pub imported: Vec<String>,
    /// One message per skipped row
    pub errors: Vec<String>,
}

impl From<ImportReport> for ImportResponse {
    fn from(report: ImportReport) -> Self {
        Self {
            success: true,
            message: report.summary(),
            imported: report.imported,
            errors: report.errors,
        }
    }
}
