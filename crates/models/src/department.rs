use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

#[cfg(feature = "database")]
use sea_orm::Value;

/// The closed set of departments a course can belong to
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum Department {
    Mathematics,
    #[strum(serialize = "Software Technologies")]
    #[serde(rename = "Software Technologies")]
    SoftwareTechnologies,
    Informatics,
    Database,
    English,
    #[strum(serialize = "Soft Skills")]
    #[serde(rename = "Soft Skills")]
    SoftSkills,
    Other,
}

impl Department {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    pub fn all() -> Vec<Department> {
        Department::iter().collect()
    }

    /// Parses a user-supplied department name, reporting the offending value
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        Self::from_str(value.trim())
            .map_err(|_| ValidationError::InvalidDepartment(value.trim().to_owned()))
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::ValueType for Department {
    fn try_from(v: Value) -> Result<Self, sea_orm::sea_query::ValueTypeErr> {
        match v {
            Value::String(Some(s)) => {
                Department::from_str(&s).map_err(|_| sea_orm::sea_query::ValueTypeErr)
            }
            _ => Err(sea_orm::sea_query::ValueTypeErr),
        }
    }

    fn type_name() -> String {
        "Department".to_string()
    }

    fn array_type() -> sea_orm::sea_query::ArrayType {
        sea_orm::sea_query::ArrayType::String
    }

    fn column_type() -> sea_orm::sea_query::ColumnType {
        sea_orm::sea_query::ColumnType::String(sea_orm::sea_query::StringLen::None)
    }
}

#[cfg(feature = "database")]
impl From<Department> for Value {
    fn from(department: Department) -> Self {
        Value::String(Some(Box::new(department.to_string())))
    }
}

#[cfg(feature = "database")]
impl sea_orm::TryGetable for Department {
    fn try_get_by<I: sea_orm::ColIdx>(
        res: &sea_orm::QueryResult,
        index: I,
    ) -> Result<Self, sea_orm::TryGetError> {
        let val: String = res.try_get_by(index)?;

        Department::from_str(&val).map_err(|e| {
            sea_orm::TryGetError::DbErr(sea_orm::DbErr::Type(format!(
                "Failed to parse Department '{val}': {e}"
            )))
        })
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::Nullable for Department {
    fn null() -> Value {
        Value::String(None)
    }
}
