//! DDL Statement Builder - Enum type statements
//!
//! Each constructor sanitizes its input and returns a statement that can only
//! hold validated names and values. `to_sql` renders the literal statement.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EnumError, EnumResult};
use crate::sanitize::{sanitize_name, sanitize_value, sanitize_values};

/// Where a new value is placed within an enum's ordered value list
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuePosition {
    /// Append after the last value
    #[default]
    End,
    /// Insert directly before an existing value
    Before(String),
    /// Insert directly after an existing value
    After(String),
}

impl ValuePosition {
    /// Build a position from the optional `before`/`after` anchors.
    ///
    /// At most one anchor may be given.
    pub fn from_options(before: Option<&str>, after: Option<&str>) -> EnumResult<Self> {
        match (before, after) {
            (Some(_), Some(_)) => Err(EnumError::Argument(
                "cannot add an enum value both before and after another value".to_string(),
            )),
            (Some(before), None) => Ok(ValuePosition::Before(before.to_string())),
            (None, Some(after)) => Ok(ValuePosition::After(after.to_string())),
            (None, None) => Ok(ValuePosition::End),
        }
    }

    fn sanitized(&self) -> EnumResult<Self> {
        Ok(match self {
            ValuePosition::End => ValuePosition::End,
            ValuePosition::Before(value) => ValuePosition::Before(sanitize_value(value)?),
            ValuePosition::After(value) => ValuePosition::After(sanitize_value(value)?),
        })
    }
}

/// A sanitized enum DDL statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumStatement {
    Create { name: String, values: Vec<String> },
    Rename { from: String, to: String },
    Drop { name: String },
    AddValue { name: String, value: String, position: ValuePosition },
    RenameValue { name: String, from: String, to: String },
}

impl EnumStatement {
    /// `CREATE TYPE <name> AS ENUM (...)`
    pub fn create<S: AsRef<str>>(name: &str, values: Option<&[S]>) -> EnumResult<Self> {
        Ok(EnumStatement::Create {
            name: sanitize_name(name)?,
            values: sanitize_values(values)?,
        })
    }

    /// `ALTER TYPE <from> RENAME TO <to>`
    pub fn rename(from: &str, to: &str) -> EnumResult<Self> {
        Ok(EnumStatement::Rename {
            from: sanitize_name(from)?,
            to: sanitize_name(to)?,
        })
    }

    /// `DROP TYPE <name>`
    pub fn drop(name: &str) -> EnumResult<Self> {
        Ok(EnumStatement::Drop {
            name: sanitize_name(name)?,
        })
    }

    /// `ALTER TYPE <name> ADD VALUE ...`
    pub fn add_value(name: &str, value: &str, position: &ValuePosition) -> EnumResult<Self> {
        Ok(EnumStatement::AddValue {
            name: sanitize_name(name)?,
            value: sanitize_value(value)?,
            position: position.sanitized()?,
        })
    }

    /// `ALTER TYPE <name> RENAME VALUE ... TO ...`
    pub fn rename_value(name: &str, from: &str, to: &str) -> EnumResult<Self> {
        Ok(EnumStatement::RenameValue {
            name: sanitize_name(name)?,
            from: sanitize_value(from)?,
            to: sanitize_value(to)?,
        })
    }

    /// Name of the enum type the statement acts on
    pub fn type_name(&self) -> &str {
        match self {
            EnumStatement::Create { name, .. }
            | EnumStatement::Drop { name }
            | EnumStatement::AddValue { name, .. }
            | EnumStatement::RenameValue { name, .. } => name,
            EnumStatement::Rename { from, .. } => from,
        }
    }

    /// Render the statement as SQL
    pub fn to_sql(&self) -> String {
        match self {
            EnumStatement::Create { name, values } => {
                let values: Vec<String> = values.iter().map(|v| quote_literal(v)).collect();
                format!("CREATE TYPE {} AS ENUM ({})", name, values.join(", "))
            }
            EnumStatement::Rename { from, to } => {
                format!("ALTER TYPE {} RENAME TO {}", from, to)
            }
            EnumStatement::Drop { name } => format!("DROP TYPE {}", name),
            EnumStatement::AddValue { name, value, position } => {
                let mut sql = format!("ALTER TYPE {} ADD VALUE {}", name, quote_literal(value));
                match position {
                    ValuePosition::End => {}
                    ValuePosition::Before(anchor) => {
                        sql.push_str(&format!(" BEFORE {}", quote_literal(anchor)))
                    }
                    ValuePosition::After(anchor) => {
                        sql.push_str(&format!(" AFTER {}", quote_literal(anchor)))
                    }
                }
                sql
            }
            EnumStatement::RenameValue { name, from, to } => format!(
                "ALTER TYPE {} RENAME VALUE {} TO {}",
                name,
                quote_literal(from),
                quote_literal(to)
            ),
        }
    }
}

impl fmt::Display for EnumStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

/// Quote a string as a SQL literal, doubling embedded single quotes
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
