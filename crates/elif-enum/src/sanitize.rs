//! Identifier sanitization for enum DDL
//!
//! Enum type names and values are interpolated into generated statements, so
//! every mutating operation routes its input through these functions before a
//! statement is built. Names allow `[a-z0-9_]`, values additionally allow the
//! space character. Anything else is rejected rather than escaped.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{EnumError, EnumResult};

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_]+$").expect("enum name pattern is valid"));

static VALUE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_ ]+$").expect("enum value pattern is valid"));

/// Sanitize the name of an enum type.
///
/// Returns the name unchanged when it matches `^[a-z0-9_]+$`.
///
/// # Examples
/// ```
/// use elif_enum::sanitize::sanitize_name;
///
/// assert_eq!(sanitize_name("shirt_size").unwrap(), "shirt_size");
/// assert!(sanitize_name("Shirt-Size").is_err());
/// ```
pub fn sanitize_name(name: impl AsRef<str>) -> EnumResult<String> {
    let name = name.as_ref();

    if NAME_PATTERN.is_match(name) {
        return Ok(name.to_string());
    }

    Err(EnumError::InvalidIdentifier(format!(
        "enum name '{}' may contain only lowercase letters, numbers and underscores",
        name
    )))
}

/// Sanitize a single enum value.
pub fn sanitize_value(value: impl AsRef<str>) -> EnumResult<String> {
    let value = value.as_ref();

    if VALUE_PATTERN.is_match(value) {
        return Ok(value.to_string());
    }

    Err(EnumError::InvalidIdentifier(format!(
        "enum value '{}' may contain only lowercase letters, numbers, underscores and spaces",
        value
    )))
}

/// Sanitize an optional list of enum values.
///
/// An absent list yields an empty one; the first invalid value fails the
/// whole list.
pub fn sanitize_values<I, S>(values: Option<I>) -> EnumResult<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    match values {
        None => Ok(Vec::new()),
        Some(values) => values.into_iter().map(sanitize_value).collect(),
    }
}
