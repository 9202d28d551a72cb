use crate::{department::Department, error::ValidationError, source_type::SourceType};
use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

/// Largest credits value a course can carry, bounded by the stored column
pub const MAX_CREDITS: u32 = i32::MAX as u32;

/// Validated input for creating or updating a course
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDraft {
    code: String,
    name: String,
    credits: u32,
    department: Department,
    prerequisites: Vec<String>,
}

impl CourseDraft {
    /// Builds a draft, trimming text fields and normalizing the prerequisite list
    ///
    /// Prerequisite codes are trimmed, blanks are dropped and repeated codes keep
    /// only their first occurrence.
    pub fn new(
        code: &str,
        name: &str,
        credits: i64,
        department: Department,
        prerequisites: impl IntoIterator<Item = String>,
    ) -> Result<Self, ValidationError> {
        let code = code.trim();
        let name = name.trim();

        if code.is_empty() {
            return Err(ValidationError::MissingField("course_code"));
        }
        if name.is_empty() {
            return Err(ValidationError::MissingField("course_name"));
        }

        let credits = u32::try_from(credits)
            .ok()
            .filter(|c| (1..=MAX_CREDITS).contains(c))
            .ok_or_else(|| ValidationError::InvalidCredits(credits.to_string()))?;

        Ok(Self {
            code: code.to_owned(),
            name: name.to_owned(),
            credits,
            department,
            prerequisites: normalize_codes(prerequisites),
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn credits(&self) -> u32 {
        self.credits
    }

    pub fn department(&self) -> Department {
        self.department
    }

    pub fn prerequisites(&self) -> &[String] {
        &self.prerequisites
    }
}

/// Parses a credits value given as text
pub fn parse_credits(raw: &str) -> Result<i64, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingField("credits"));
    }

    raw.parse::<i64>()
        .ok()
        .filter(|c| (1..=i64::from(MAX_CREDITS)).contains(c))
        .ok_or_else(|| ValidationError::InvalidCredits(raw.to_owned()))
}

/// Splits a comma-joined list of course codes
pub fn split_codes(raw: &str) -> Vec<String> {
    normalize_codes(raw.split(',').map(str::to_owned))
}

fn normalize_codes(codes: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = Vec::new();
    for code in codes {
        let code = code.trim();
        if !code.is_empty() && !seen.iter().any(|c: &String| c == code) {
            seen.push(code.to_owned());
        }
    }
    seen
}

/// The prerequisite side of a dependency edge, resolved for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrerequisiteRef {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub code: String,
    pub name: String,
}

/// A stored course together with its resolved prerequisites
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Course {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub code: String,
    pub name: String,
    pub credits: u32,
    pub department: Department,
    pub source_type: SourceType,
    pub created_at: NaiveDateTime,
    pub prerequisites: Vec<PrerequisiteRef>,
}

impl Course {
    pub fn prerequisite_codes(&self) -> Vec<&str> {
        self.prerequisites.iter().map(|p| p.code.as_str()).collect()
    }
}
