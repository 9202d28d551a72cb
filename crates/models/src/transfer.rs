use crate::{
    course::{Course, CourseDraft, parse_credits, split_codes},
    department::Department,
    error::ValidationError,
};
use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column layout shared by export and import
pub const CSV_HEADER: [&str; 5] = [
    "course_code",
    "course_name",
    "credits",
    "department",
    "dependencies",
];

/// Download name sent with every export
pub const EXPORT_FILE_NAME: &str = "courses_export.csv";

/// UTF-8 byte-order mark written ahead of every export
const BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("CSV must have columns: course_code,course_name,credits,department,dependencies")]
    InvalidHeader,

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write CSV: {0}")]
    Io(#[from] std::io::Error),
}

/// Which courses an export covers
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportScope {
    /// Own courses plus system courses
    #[default]
    All,
    Mine,
}

/// Serializes courses to CSV, one row per course
pub fn export_courses(courses: &[Course]) -> Result<Vec<u8>, TransferError> {
    let mut buffer = BOM.to_vec();

    {
        let mut writer = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(&mut buffer);

        writer.write_record(CSV_HEADER)?;
        for course in courses {
            let credits = course.credits.to_string();
            let dependencies = course.prerequisite_codes().join(",");

            writer.write_record([
                course.code.as_str(),
                course.name.as_str(),
                credits.as_str(),
                course.department.as_str(),
                dependencies.as_str(),
            ])?;
        }
        writer.flush()?;
    }

    Ok(buffer)
}

/// Rows that passed validation, plus messages for the ones that did not
#[derive(Debug, Default)]
pub struct ParsedImport {
    pub drafts: Vec<CourseDraft>,
    pub errors: Vec<String>,
}

/// Parses an uploaded CSV file
///
/// A header that does not match [`CSV_HEADER`] rejects the whole file. Any
/// other problem only skips the offending row and is reported in
/// [`ParsedImport::errors`].
pub fn parse_import(bytes: &[u8]) -> Result<ParsedImport, TransferError> {
    let bytes = bytes.strip_prefix(BOM).unwrap_or(bytes);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut records = reader.records();

    let header = match records.next() {
        Some(Ok(header)) => header,
        _ => return Err(TransferError::InvalidHeader),
    };
    if !header.iter().eq(CSV_HEADER) {
        return Err(TransferError::InvalidHeader);
    }

    let mut parsed = ParsedImport::default();
    for record in records {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                parsed.errors.push(format!("Invalid row format: {e}"));
                continue;
            }
        };

        if record.len() != CSV_HEADER.len() {
            let row = record.iter().collect::<Vec<_>>().join(",");
            parsed.errors.push(format!("Invalid row format: {row}"));
            continue;
        }

        match parse_row(&record) {
            Ok(draft) => parsed.drafts.push(draft),
            Err(message) => {
                log::debug!("Skipping CSV row: {message}");
                parsed.errors.push(message);
            }
        }
    }

    Ok(parsed)
}

fn parse_row(record: &StringRecord) -> Result<CourseDraft, String> {
    let field = |i: usize| record.get(i).unwrap_or_default().trim();
    let (code, name, credits, department, dependencies) =
        (field(0), field(1), field(2), field(3), field(4));

    if code.is_empty() || name.is_empty() || credits.is_empty() || department.is_empty() {
        return Err(format!("Missing required fields for course: {code}"));
    }

    let credits =
        parse_credits(credits).map_err(|_| format!("Invalid credits value for course: {code}"))?;
    let department = Department::parse(department)
        .map_err(|_| format!("Invalid department '{department}' for course: {code}"))?;

    CourseDraft::new(code, name, credits, department, split_codes(dependencies)).map_err(
        |e| match e {
            ValidationError::MissingField(_) => {
                format!("Missing required fields for course: {code}")
            }
            other => format!("{other} for course: {code}"),
        },
    )
}

/// Outcome of an import run
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Codes of the courses that were created, in creation order
    pub imported: Vec<String>,
    pub errors: Vec<String>,
}

impl ImportReport {
    pub fn summary(&self) -> String {
        format!(
            "Import completed. Successfully imported {} courses. {} errors.",
            self.imported.len(),
            self.errors.len()
        )
    }
}
