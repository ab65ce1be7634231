//! Database connection seam for enum management
//!
//! The manager needs three capabilities from a connection: run a literal DDL
//! statement, run the catalog introspection query, and report the server
//! version. `EnumConnection` abstracts them so the manager can run over a
//! plain `PgConnection`, a pooled connection, or a test double.

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, Postgres, Row};

use crate::catalog::EnumRow;

/// Abstract connection used by the enum manager
#[async_trait]
pub trait EnumConnection: Send {
    /// Execute a literal statement
    async fn execute_ddl(&mut self, sql: &str) -> Result<(), sqlx::Error>;

    /// Run the catalog query and return `(name, labels)` rows
    async fn fetch_enum_rows(&mut self, sql: &str) -> Result<Vec<EnumRow>, sqlx::Error>;

    /// Server version as reported by `server_version_num` (e.g. `150004`)
    async fn server_version_num(&mut self) -> Result<i64, sqlx::Error>;
}

#[async_trait]
impl EnumConnection for PgConnection {
    async fn execute_ddl(&mut self, sql: &str) -> Result<(), sqlx::Error> {
        sqlx::Executor::execute(&mut *self, sql).await?;
        Ok(())
    }

    async fn fetch_enum_rows(&mut self, sql: &str) -> Result<Vec<EnumRow>, sqlx::Error> {
        let rows = sqlx::query(sql).fetch_all(&mut *self).await?;

        let mut enum_rows = Vec::with_capacity(rows.len());
        for row in rows {
            enum_rows.push(EnumRow {
                name: row.try_get("name")?,
                labels: row.try_get("labels")?,
            });
        }

        Ok(enum_rows)
    }

    async fn server_version_num(&mut self) -> Result<i64, sqlx::Error> {
        let version: i32 =
            sqlx::query_scalar("SELECT current_setting('server_version_num')::int")
                .fetch_one(&mut *self)
                .await?;
        Ok(i64::from(version))
    }
}

#[async_trait]
impl EnumConnection for PoolConnection<Postgres> {
    async fn execute_ddl(&mut self, sql: &str) -> Result<(), sqlx::Error> {
        EnumConnection::execute_ddl(&mut **self, sql).await
    }

    async fn fetch_enum_rows(&mut self, sql: &str) -> Result<Vec<EnumRow>, sqlx::Error> {
        EnumConnection::fetch_enum_rows(&mut **self, sql).await
    }

    async fn server_version_num(&mut self) -> Result<i64, sqlx::Error> {
        EnumConnection::server_version_num(&mut **self).await
    }
}

#[async_trait]
impl<C: EnumConnection + ?Sized> EnumConnection for &mut C {
    async fn execute_ddl(&mut self, sql: &str) -> Result<(), sqlx::Error> {
        (**self).execute_ddl(sql).await
    }

    async fn fetch_enum_rows(&mut self, sql: &str) -> Result<Vec<EnumRow>, sqlx::Error> {
        (**self).fetch_enum_rows(sql).await
    }

    async fn server_version_num(&mut self) -> Result<i64, sqlx::Error> {
        (**self).server_version_num().await
    }
}
