use serde::{Deserialize, Serialize};
#[cfg(any(feature = "database", test))]
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString};

#[cfg(feature = "database")]
use sea_orm::Value;

/// Provenance tag recorded when a course is created. Informational only.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Entered by hand
    #[default]
    Added,
    /// Created from a CSV import
    Imported,
    /// Global course maintained by the system owner
    System,
}

impl SourceType {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::ValueType for SourceType {
    fn try_from(v: Value) -> Result<Self, sea_orm::sea_query::ValueTypeErr> {
        match v {
            Value::String(Some(s)) => {
                SourceType::from_str(&s).map_err(|_| sea_orm::sea_query::ValueTypeErr)
            }
            _ => Err(sea_orm::sea_query::ValueTypeErr),
        }
    }

    fn type_name() -> String {
        "SourceType".to_string()
    }

    fn array_type() -> sea_orm::sea_query::ArrayType {
        sea_orm::sea_query::ArrayType::String
    }

    fn column_type() -> sea_orm::sea_query::ColumnType {
        sea_orm::sea_query::ColumnType::String(sea_orm::sea_query::StringLen::N(16))
    }
}

#[cfg(feature = "database")]
impl From<SourceType> for Value {
    fn from(source_type: SourceType) -> Self {
        Value::String(Some(Box::new(source_type.to_string())))
    }
}

#[cfg(feature = "database")]
impl sea_orm::TryGetable for SourceType {
    fn try_get_by<I: sea_orm::ColIdx>(
        res: &sea_orm::QueryResult,
        index: I,
    ) -> Result<Self, sea_orm::TryGetError> {
        let val: String = res.try_get_by(index)?;

        SourceType::from_str(&val).map_err(|e| {
            sea_orm::TryGetError::DbErr(sea_orm::DbErr::Type(format!(
                "Failed to parse SourceType '{val}': {e}"
            )))
        })
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::Nullable for SourceType {
    fn null() -> Value {
        Value::String(None)
    }
}
