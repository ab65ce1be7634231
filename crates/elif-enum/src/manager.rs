//! Enum Manager - Sanitizing DDL executor with a catalog cache
//!
//! Every mutating operation sanitizes its input, builds one statement,
//! executes it on the bound connection, and then updates or clears the
//! catalog cache according to `CacheMode`. Failures from the database are
//! returned unchanged and are never retried.
//!
//! The cache is owned by the manager and therefore scoped to its connection.
//! Changes made through another connection are not seen here until
//! `clear_cache` is called.

use async_trait::async_trait;
use tracing::{debug, error};

use crate::catalog::{CatalogCache, EnumCatalog, ENUM_CATALOG_QUERY};
use crate::config::{CacheMode, EnumKitConfig};
use crate::connection::EnumConnection;
use crate::error::{EnumError, EnumResult};
use crate::schema::EnumSchema;
use crate::statement::{EnumStatement, ValuePosition};

/// Executes enum DDL on one connection and caches the enum catalog
pub struct EnumManager<C> {
    connection: C,
    cache: CatalogCache,
    config: EnumKitConfig,
    server_version: Option<i64>,
}

impl<C: EnumConnection> EnumManager<C> {
    /// Create a manager with default configuration
    pub fn new(connection: C) -> Self {
        Self::with_config(connection, EnumKitConfig::default())
    }

    /// Create a manager with custom configuration
    pub fn with_config(connection: C, config: EnumKitConfig) -> Self {
        Self {
            connection,
            cache: CatalogCache::new(),
            config,
            server_version: None,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &EnumKitConfig {
        &self.config
    }

    /// Borrow the underlying connection.
    ///
    /// Enum DDL executed directly on it bypasses the cache; call
    /// `clear_cache` afterwards.
    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    /// Release the underlying connection
    pub fn into_inner(self) -> C {
        self.connection
    }

    /// All enum types and their ordered values.
    ///
    /// The first call queries the catalog; later calls are served from the
    /// cache until it is cleared.
    pub async fn list_enums(&mut self) -> EnumResult<&EnumCatalog> {
        let catalog = match self.cache.take() {
            Some(catalog) => catalog,
            None => {
                let rows = self.connection.fetch_enum_rows(ENUM_CATALOG_QUERY).await?;
                let catalog = EnumCatalog::from_rows(rows);
                debug!("Loaded enum catalog with {} types", catalog.len());
                catalog
            }
        };

        Ok(self.cache.populate(catalog))
    }

    /// Values of a single enum type, in sort order
    pub async fn enum_values(&mut self, name: &str) -> EnumResult<Vec<String>> {
        self.list_enums()
            .await?
            .get(name)
            .map(<[String]>::to_vec)
            .ok_or_else(|| EnumError::UnknownEnum(format!("enum type '{}' does not exist", name)))
    }

    /// Drop every cached catalog entry
    pub fn clear_cache(&mut self) {
        debug!("Clearing enum catalog cache");
        self.cache.clear();
    }

    /// Whether the next `list_enums` call is served from the cache
    pub fn is_cache_populated(&self) -> bool {
        self.cache.is_populated()
    }

    async fn server_version(&mut self) -> EnumResult<i64> {
        if let Some(version) = self.server_version {
            return Ok(version);
        }

        let version = self.connection.server_version_num().await?;
        debug!("Connected server reports server_version_num {}", version);
        self.server_version = Some(version);
        Ok(version)
    }

    async fn execute(&mut self, statement: EnumStatement) -> EnumResult<()> {
        let sql = statement.to_sql();
        debug!("Executing enum DDL: {}", sql);

        if let Err(e) = self.connection.execute_ddl(&sql).await {
            error!("Enum DDL failed: {}: {}", sql, e);
            return Err(e.into());
        }

        match self.config.cache_mode {
            CacheMode::Incremental => {
                self.cache.apply(&statement);
            }
            CacheMode::Invalidate => self.cache.clear(),
        }

        Ok(())
    }
}

#[async_trait]
impl<C: EnumConnection> EnumSchema for EnumManager<C> {
    async fn create_enum(&mut self, name: &str, values: &[&str]) -> EnumResult<()> {
        let statement = EnumStatement::create(name, Some(values))?;
        self.execute(statement).await
    }

    async fn rename_enum(&mut self, from: &str, to: &str) -> EnumResult<()> {
        let statement = EnumStatement::rename(from, to)?;
        self.execute(statement).await
    }

    async fn drop_enum(&mut self, name: &str, _values: Option<&[&str]>) -> EnumResult<()> {
        let statement = EnumStatement::drop(name)?;
        self.execute(statement).await
    }

    async fn add_enum_value(
        &mut self,
        name: &str,
        value: &str,
        before: Option<&str>,
        after: Option<&str>,
    ) -> EnumResult<()> {
        let position = ValuePosition::from_options(before, after)?;
        let statement = EnumStatement::add_value(name, value, &position)?;
        self.execute(statement).await
    }

    async fn rename_enum_value(&mut self, name: &str, from: &str, to: &str) -> EnumResult<()> {
        let statement = EnumStatement::rename_value(name, from, to)?;

        let version = self.server_version().await?;
        if version < self.config.rename_value_min_version {
            return Err(EnumError::NotSupported(format!(
                "renaming enum values requires server_version_num >= {}, connected server reports {}",
                self.config.rename_value_min_version, version
            )));
        }

        self.execute(statement).await
    }
}
