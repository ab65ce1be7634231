//! # elif-enum: PostgreSQL enum types for elif migrations
//!
//! Manages database-native enum types (named, ordered sets of labels):
//!
//! - **Sanitization**: type names and values are checked against a strict
//!   grammar before any DDL is built
//! - **Execution**: `EnumManager` runs create/rename/drop/add-value/rename-value
//!   statements on one connection and keeps a connection-scoped catalog cache
//! - **Recording**: `CommandRecorder` logs the same operations and computes
//!   their inverse for rollbacks
//! - **Dumping**: the catalog renders to deterministic `create_enum` statements
//!
//! ```no_run
//! use elif_enum::{EnumManager, EnumSchema};
//! use sqlx::{Connection, PgConnection};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let conn = PgConnection::connect("postgres://localhost/app").await?;
//! let mut enums = EnumManager::new(conn);
//!
//! enums.create_enum("sizes", &["small", "medium", "large"]).await?;
//! enums.add_enum_value("sizes", "extra small", Some("small"), None).await?;
//!
//! assert_eq!(
//!     enums.enum_values("sizes").await?,
//!     vec!["extra small", "small", "medium", "large"]
//! );
//! # Ok(())
//! # }
//! ```

pub mod binding;
pub mod catalog;
pub mod config;
pub mod connection;
pub mod dumper;
pub mod error;
pub mod manager;
pub mod migration;
pub mod recorder;
pub mod sanitize;
pub mod schema;
pub mod statement;

pub use binding::{ColumnBindings, ColumnEnumLookup, CastOptions, EnumBinding, EnumValidationError};
pub use catalog::{CatalogCache, EnumCatalog, EnumRow};
pub use config::{CacheMode, EnumKitConfig};
pub use connection::EnumConnection;
pub use dumper::SchemaDumper;
pub use error::{EnumError, EnumResult};
pub use manager::EnumManager;
pub use migration::{run_migration, EnumMigration, MigrationDirection, MigrationRunResult};
pub use recorder::{CommandRecorder, MigrationCommand};
pub use schema::EnumSchema;
pub use statement::{EnumStatement, ValuePosition};
