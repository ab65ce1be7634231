//! Column bindings - Validating and casting values of enum-backed columns
//!
//! Which enum type backs a column is owned by the host schema, not by this
//! crate; it is consumed through `ColumnEnumLookup`. A resolved `EnumBinding`
//! snapshots the type's values and validates or casts attribute values
//! against them.

use std::collections::HashMap;

use crate::connection::EnumConnection;
use crate::error::{EnumError, EnumResult};
use crate::manager::EnumManager;
use crate::sanitize::sanitize_name;

/// Resolves the enum type bound to a table column
pub trait ColumnEnumLookup: Send + Sync {
    fn lookup_enum_type_for_column(&self, table: &str, column: &str) -> Option<String>;
}

/// In-memory column to enum type map
#[derive(Debug, Clone, Default)]
pub struct ColumnBindings {
    bindings: HashMap<(String, String), String>,
}

impl ColumnBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `table.column` to an enum type
    pub fn bind(&mut self, table: &str, column: &str, enum_type: &str) -> &mut Self {
        self.bindings
            .insert((table.to_string(), column.to_string()), enum_type.to_string());
        self
    }
}

impl ColumnEnumLookup for ColumnBindings {
    fn lookup_enum_type_for_column(&self, table: &str, column: &str) -> Option<String> {
        self.bindings
            .get(&(table.to_string(), column.to_string()))
            .cloned()
    }
}

/// Column definition for an enum-backed column.
///
/// The enum type defaults to the column name.
pub fn enum_column_definition(column: &str, enum_type: Option<&str>) -> EnumResult<String> {
    let column = sanitize_name(column)?;
    let enum_type = match enum_type {
        Some(enum_type) => sanitize_name(enum_type)?,
        None => column.clone(),
    };
    Ok(format!("{} {}", column, enum_type))
}

/// Values accepted by the enum type bound to `table.column`
pub async fn pg_enum_values<C: EnumConnection>(
    manager: &mut EnumManager<C>,
    lookup: &dyn ColumnEnumLookup,
    table: &str,
    column: &str,
) -> EnumResult<Vec<String>> {
    let enum_type = bound_enum_type(lookup, table, column)?;
    manager.enum_values(&enum_type).await
}

fn bound_enum_type(lookup: &dyn ColumnEnumLookup, table: &str, column: &str) -> EnumResult<String> {
    lookup.lookup_enum_type_for_column(table, column).ok_or_else(|| {
        EnumError::UnknownEnum(format!(
            "unable to determine the type of '{}.{}', has the migration been run?",
            table, column
        ))
    })
}

/// Options controlling how a binding casts values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastOptions {
    /// Reject values outside the enum; when false they pass through unchanged
    pub raise_on_invalid: bool,
}

impl Default for CastOptions {
    fn default() -> Self {
        Self {
            raise_on_invalid: true,
        }
    }
}

/// Validation failure for an enum attribute
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{attribute} is invalid, expected one of: {allowed}")]
pub struct EnumValidationError {
    pub attribute: String,
    pub value: Option<String>,
    /// Allowed values joined by ", "
    pub allowed: String,
}

/// The values of one enum type, bound to an attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumBinding {
    enum_type: String,
    values: Vec<String>,
    options: CastOptions,
}

impl EnumBinding {
    pub fn new(enum_type: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            enum_type: enum_type.into(),
            values,
            options: CastOptions::default(),
        }
    }

    /// Resolve the binding for `table.column` from the catalog
    pub async fn resolve<C: EnumConnection>(
        manager: &mut EnumManager<C>,
        lookup: &dyn ColumnEnumLookup,
        table: &str,
        column: &str,
    ) -> EnumResult<Self> {
        let enum_type = bound_enum_type(lookup, table, column)?;
        let values = manager.enum_values(&enum_type).await?;
        Ok(Self::new(enum_type, values))
    }

    pub fn with_options(mut self, options: CastOptions) -> Self {
        self.options = options;
        self
    }

    pub fn enum_type(&self) -> &str {
        &self.enum_type
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn options(&self) -> CastOptions {
        self.options
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// Validate an attribute value; a missing value is invalid
    pub fn validate(&self, attribute: &str, value: Option<&str>) -> Result<(), EnumValidationError> {
        match value {
            Some(value) if self.contains(value) => Ok(()),
            _ => Err(EnumValidationError {
                attribute: attribute.to_string(),
                value: value.map(str::to_string),
                allowed: self.values.join(", "),
            }),
        }
    }

    /// Cast an assigned value.
    ///
    /// Blank values cast to `None`. Members are returned as-is. Anything
    /// else is rejected unless `raise_on_invalid` is off.
    pub fn cast(&self, value: Option<&str>) -> EnumResult<Option<String>> {
        let value = match value {
            Some(value) if !value.trim().is_empty() => value,
            _ => return Ok(None),
        };

        if self.contains(value) || !self.options.raise_on_invalid {
            return Ok(Some(value.to_string()));
        }

        Err(EnumError::InvalidValue {
            value: value.to_string(),
            enum_type: self.enum_type.clone(),
        })
    }
}
