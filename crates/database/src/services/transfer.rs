use crate::{
    error::ServiceError,
    services::{course::CourseService, query_course::QueryCourseService},
};
use models::{
    course::CourseDraft,
    source_type::SourceType,
    transfer::{self, ExportScope, ImportReport},
    visibility::{CourseFilter, Viewer},
};
use sea_orm::DatabaseConnection;
use std::collections::HashSet;

pub struct TransferService;

impl TransferService {
    /// Writes the viewer's courses to CSV
    pub async fn export_courses(
        db: &DatabaseConnection,
        viewer: &Viewer,
        scope: ExportScope,
    ) -> Result<Vec<u8>, ServiceError> {
        let filter = CourseFilter::default();
        let courses = match scope {
            ExportScope::All => QueryCourseService::list_visible_courses(db, viewer, &filter).await?,
            ExportScope::Mine => {
                QueryCourseService::list_owned_courses(db, viewer.acting_owner, &filter).await?
            }
        };

        let bytes = transfer::export_courses(&courses).map_err(ServiceError::Export)?;
        log::info!(
            "Exported {} courses for owner {}",
            courses.len(),
            viewer.acting_owner
        );
        Ok(bytes)
    }

    /// Imports courses from an uploaded CSV file into the viewer's namespace
    ///
    /// Each row is added in its own transaction, so a bad row never undoes
    /// the rows before it. Rows naming a prerequisite that another row of the
    /// same file still has to create are retried once that row is in.
    pub async fn import_courses(
        db: &DatabaseConnection,
        viewer: &Viewer,
        bytes: &[u8],
    ) -> Result<ImportReport, ServiceError> {
        let parsed = transfer::parse_import(bytes)?;
        let mut report = ImportReport {
            imported: Vec::new(),
            errors: parsed.errors,
        };

        let mut pending = parsed.drafts;
        while !pending.is_empty() {
            let pending_codes: HashSet<String> =
                pending.iter().map(|d| d.code().to_owned()).collect();
            let mut deferred: Vec<(CourseDraft, ServiceError)> = Vec::new();
            let mut progressed = false;

            for draft in pending {
                match CourseService::add_course(db, viewer, &draft, SourceType::Imported).await {
                    Ok(course) => {
                        progressed = true;
                        report.imported.push(course.code);
                    }
                    Err(e) if e.is_fatal() => {
                        log::error!("Aborting import for owner {}: {e}", viewer.acting_owner);
                        return Err(e);
                    }
                    Err(ServiceError::PrerequisiteNotFound(code))
                        if pending_codes.contains(&code) =>
                    {
                        deferred.push((draft, ServiceError::PrerequisiteNotFound(code)));
                    }
                    Err(e) => report.errors.push(row_error(&draft, &e)),
                }
            }

            if !progressed {
                for (draft, e) in &deferred {
                    report.errors.push(row_error(draft, e));
                }
                break;
            }

            if !deferred.is_empty() {
                log::debug!("Retrying {} rows with forward references", deferred.len());
            }
            pending = deferred.into_iter().map(|(draft, _)| draft).collect();
        }

        log::info!(
            "Imported {} courses for owner {} ({} errors)",
            report.imported.len(),
            viewer.acting_owner,
            report.errors.len()
        );
        Ok(report)
    }
}

fn row_error(draft: &CourseDraft, err: &ServiceError) -> String {
    format!("Failed to add course {}: {err}", draft.code())
}
