//! Owned result rows
//!
//! The query executor detaches every row it reads into a [`Record`] before
//! handing it to callers, so nothing outside the data layer ever touches a
//! live connection. Records hold typed fields addressed by column name and
//! can be built directly in tests.

use thiserror::Error;
use uuid::Uuid;

/// A single typed column value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Uuid(Uuid),
    Text(String),
}

impl Field {
    /// Name of the field's type, used in mismatch errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Field::Uuid(_) => "uuid",
            Field::Text(_) => "text",
        }
    }
}

/// Errors raised when reading a record that does not have the expected shape
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("column '{name}' is missing from the result row")]
    MissingColumn { name: String },

    #[error("column '{name}' holds {actual}, expected {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// An owned result row, detached from the database connection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, Field)>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column value
    pub fn push(&mut self, name: impl Into<String>, value: Field) {
        self.fields.push((name.into(), value));
    }

    /// Builder-style append of a UUID column
    pub fn with_uuid(mut self, name: &str, value: Uuid) -> Self {
        self.push(name, Field::Uuid(value));
        self
    }

    /// Builder-style append of a text column
    pub fn with_text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.push(name, Field::Text(value.into()));
        self
    }

    /// Read a UUID column by name
    pub fn uuid(&self, name: &str) -> Result<Uuid, RecordError> {
        match self.field(name)? {
            Field::Uuid(value) => Ok(*value),
            other => Err(RecordError::TypeMismatch {
                name: name.to_string(),
                expected: "uuid",
                actual: other.type_name(),
            }),
        }
    }

    /// Read a text column by name
    pub fn text(&self, name: &str) -> Result<&str, RecordError> {
        match self.field(name)? {
            Field::Text(value) => Ok(value.as_str()),
            other => Err(RecordError::TypeMismatch {
                name: name.to_string(),
                expected: "text",
                actual: other.type_name(),
            }),
        }
    }

    /// Number of columns in the record
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no columns
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn field(&self, name: &str) -> Result<&Field, RecordError> {
        self.fields
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
            .ok_or_else(|| RecordError::MissingColumn {
                name: name.to_string(),
            })
    }
}
