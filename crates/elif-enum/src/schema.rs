//! The enum operation vocabulary shared by migrations
//!
//! Migration code is written once against `EnumSchema`. Handing it an
//! `EnumManager` executes each operation; handing it a `CommandRecorder`
//! logs the operations so they can be replayed or inverted later.

use async_trait::async_trait;

use crate::error::EnumResult;

/// Mutating enum operations available to a migration
#[async_trait]
pub trait EnumSchema: Send {
    /// Create an enum type with the given values in order
    async fn create_enum(&mut self, name: &str, values: &[&str]) -> EnumResult<()>;

    /// Rename an enum type, keeping its values
    async fn rename_enum(&mut self, from: &str, to: &str) -> EnumResult<()>;

    /// Drop an enum type.
    ///
    /// `values` is only used for rollback: supplying the type's value list
    /// makes the drop reversible.
    async fn drop_enum(&mut self, name: &str, values: Option<&[&str]>) -> EnumResult<()>;

    /// Add a value, at the end or next to an existing value.
    ///
    /// At most one of `before` and `after` may be given.
    async fn add_enum_value(
        &mut self,
        name: &str,
        value: &str,
        before: Option<&str>,
        after: Option<&str>,
    ) -> EnumResult<()>;

    /// Rename a value in place
    async fn rename_enum_value(&mut self, name: &str, from: &str, to: &str) -> EnumResult<()>;
}
