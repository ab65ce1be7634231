//! Reversible enum migrations
//!
//! A migration describes its forward change once, against `EnumSchema`.
//! Running it up replays the recorded change. Running it down inverts the
//! full command log first and only then replays the inverse, so an
//! irreversible command aborts the rollback before any DDL is issued.

use std::time::Instant;

use async_trait::async_trait;
use tracing::info;

use crate::error::EnumResult;
use crate::recorder::{invert_all, CommandRecorder};
use crate::schema::EnumSchema;

/// Migration direction for execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationDirection {
    /// Apply the migration
    Up,
    /// Roll the migration back using the inverse of its recorded commands
    Down,
}

/// A reversible migration made of enum operations
#[async_trait]
pub trait EnumMigration: Send + Sync {
    /// Human-readable name for the migration
    fn name(&self) -> &str;

    /// Perform the forward change
    async fn change(&self, schema: &mut (dyn EnumSchema + '_)) -> EnumResult<()>;
}

/// Result of running a migration in either direction
#[derive(Debug)]
pub struct MigrationRunResult {
    /// Migration name
    pub name: String,
    pub direction: MigrationDirection,
    /// Number of enum operations executed
    pub executed_count: usize,
    /// Total execution time in milliseconds
    pub execution_time_ms: u128,
}

/// Record a migration's forward change without executing it
pub async fn record_migration(migration: &dyn EnumMigration) -> EnumResult<CommandRecorder> {
    let mut recorder = CommandRecorder::new();
    migration.change(&mut recorder).await?;
    Ok(recorder)
}

/// Run a migration against a schema in the given direction
pub async fn run_migration(
    schema: &mut (dyn EnumSchema + '_),
    migration: &dyn EnumMigration,
    direction: MigrationDirection,
) -> EnumResult<MigrationRunResult> {
    let start_time = Instant::now();

    // The body is always recorded first; DDL only runs on replay.
    let recorder = record_migration(migration).await?;

    let executed_count = match direction {
        MigrationDirection::Up => recorder.replay(schema).await?,
        MigrationDirection::Down => {
            let inverse = CommandRecorder::from(invert_all(recorder.commands())?);
            inverse.replay(schema).await?
        }
    };

    let result = MigrationRunResult {
        name: migration.name().to_string(),
        direction,
        executed_count,
        execution_time_ms: start_time.elapsed().as_millis(),
    };

    info!(
        "Ran enum migration {} ({:?}): {} operations in {}ms",
        result.name, result.direction, result.executed_count, result.execution_time_ms
    );

    Ok(result)
}
