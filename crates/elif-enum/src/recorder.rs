//! Migration Command Recorder - Logging and inverting enum operations
//!
//! A `CommandRecorder` stands in for the live schema while a migration runs
//! in recording mode. Each call appends one `MigrationCommand`. The log can
//! be replayed against a real schema, or inverted to produce the rollback
//! sequence.
//!
//! Inversion rules:
//! - `create(name, ..)` inverts to `drop(name)`
//! - `rename(old, new)` inverts to `rename(new, old)`
//! - `drop(name, values)` inverts to `create(name, values)` only when the
//!   values were recorded
//! - `add_value(..)` has no inverse
//! - `rename_value(name, old, new)` inverts to `rename_value(name, new, old)`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{EnumError, EnumResult};
use crate::schema::EnumSchema;

/// One recorded enum operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum MigrationCommand {
    Create {
        name: String,
        values: Vec<String>,
    },
    Rename {
        from: String,
        to: String,
    },
    Drop {
        name: String,
        /// `None` when the caller did not supply the type's values
        #[serde(default)]
        values: Option<Vec<String>>,
    },
    AddValue {
        name: String,
        value: String,
        #[serde(default)]
        before: Option<String>,
        #[serde(default)]
        after: Option<String>,
    },
    RenameValue {
        name: String,
        from: String,
        to: String,
    },
}

impl MigrationCommand {
    /// Name of the recorded operation
    pub fn operation(&self) -> &'static str {
        match self {
            MigrationCommand::Create { .. } => "create_enum",
            MigrationCommand::Rename { .. } => "rename_enum",
            MigrationCommand::Drop { .. } => "drop_enum",
            MigrationCommand::AddValue { .. } => "add_enum_value",
            MigrationCommand::RenameValue { .. } => "rename_enum_value",
        }
    }

    /// Compute the command that undoes this one.
    ///
    /// Never modifies `self`; fails with `Irreversible` when no safe inverse
    /// exists.
    pub fn invert(&self) -> EnumResult<MigrationCommand> {
        match self {
            MigrationCommand::Create { name, .. } => Ok(MigrationCommand::Drop {
                name: name.clone(),
                values: None,
            }),
            MigrationCommand::Rename { from, to } => Ok(MigrationCommand::Rename {
                from: to.clone(),
                to: from.clone(),
            }),
            MigrationCommand::Drop { name, values } => match values {
                Some(values) => Ok(MigrationCommand::Create {
                    name: name.clone(),
                    values: values.clone(),
                }),
                None => Err(EnumError::Irreversible(format!(
                    "drop_enum '{}' is only reversible if given the enum's values",
                    name
                ))),
            },
            MigrationCommand::AddValue { name, value, .. } => Err(EnumError::Irreversible(format!(
                "add_enum_value '{}' to '{}' cannot be reversed, enum values cannot be removed",
                value, name
            ))),
            MigrationCommand::RenameValue { name, from, to } => Ok(MigrationCommand::RenameValue {
                name: name.clone(),
                from: to.clone(),
                to: from.clone(),
            }),
        }
    }

    /// Perform this command against a schema
    pub async fn apply(&self, schema: &mut (dyn EnumSchema + '_)) -> EnumResult<()> {
        match self {
            MigrationCommand::Create { name, values } => {
                let values: Vec<&str> = values.iter().map(String::as_str).collect();
                schema.create_enum(name, &values).await
            }
            MigrationCommand::Rename { from, to } => schema.rename_enum(from, to).await,
            MigrationCommand::Drop { name, values } => {
                let values: Option<Vec<&str>> = values
                    .as_ref()
                    .map(|values| values.iter().map(String::as_str).collect());
                schema.drop_enum(name, values.as_deref()).await
            }
            MigrationCommand::AddValue { name, value, before, after } => {
                schema
                    .add_enum_value(name, value, before.as_deref(), after.as_deref())
                    .await
            }
            MigrationCommand::RenameValue { name, from, to } => {
                schema.rename_enum_value(name, from, to).await
            }
        }
    }
}

/// Invert a whole command sequence.
///
/// Each command is inverted and the order reversed. The result is
/// all-or-nothing: one irreversible command fails the whole sequence.
pub fn invert_all(commands: &[MigrationCommand]) -> EnumResult<Vec<MigrationCommand>> {
    commands.iter().rev().map(MigrationCommand::invert).collect()
}

/// Records enum operations instead of executing them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandRecorder {
    commands: Vec<MigrationCommand>,
}

impl CommandRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command to the log
    pub fn record(&mut self, command: MigrationCommand) {
        tracing::debug!("Recorded {} command", command.operation());
        self.commands.push(command);
    }

    /// Recorded commands in forward order
    pub fn commands(&self) -> &[MigrationCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The rollback sequence for everything recorded so far
    pub fn inverse(&self) -> EnumResult<Vec<MigrationCommand>> {
        invert_all(&self.commands)
    }

    /// Replay the recorded commands in order against a schema
    pub async fn replay(&self, schema: &mut (dyn EnumSchema + '_)) -> EnumResult<usize> {
        for command in &self.commands {
            command.apply(schema).await?;
        }
        Ok(self.commands.len())
    }

    /// Encode the command log as JSON
    pub fn to_json(&self) -> EnumResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode a command log from JSON
    pub fn from_json(json: &str) -> EnumResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Consume the recorder into its command log
    pub fn into_commands(self) -> Vec<MigrationCommand> {
        self.commands
    }
}

impl From<Vec<MigrationCommand>> for CommandRecorder {
    fn from(commands: Vec<MigrationCommand>) -> Self {
        Self { commands }
    }
}

#[async_trait]
impl EnumSchema for CommandRecorder {
    async fn create_enum(&mut self, name: &str, values: &[&str]) -> EnumResult<()> {
        self.record(MigrationCommand::Create {
            name: name.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        });
        Ok(())
    }

    async fn rename_enum(&mut self, from: &str, to: &str) -> EnumResult<()> {
        self.record(MigrationCommand::Rename {
            from: from.to_string(),
            to: to.to_string(),
        });
        Ok(())
    }

    async fn drop_enum(&mut self, name: &str, values: Option<&[&str]>) -> EnumResult<()> {
        self.record(MigrationCommand::Drop {
            name: name.to_string(),
            values: values.map(|values| values.iter().map(|v| v.to_string()).collect()),
        });
        Ok(())
    }

    async fn add_enum_value(
        &mut self,
        name: &str,
        value: &str,
        before: Option<&str>,
        after: Option<&str>,
    ) -> EnumResult<()> {
        self.record(MigrationCommand::AddValue {
            name: name.to_string(),
            value: value.to_string(),
            before: before.map(str::to_string),
            after: after.map(str::to_string),
        });
        Ok(())
    }

    async fn rename_enum_value(&mut self, name: &str, from: &str, to: &str) -> EnumResult<()> {
        self.record(MigrationCommand::RenameValue {
            name: name.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_create_inverts_to_drop() {
        let create = MigrationCommand::Create {
            name: "sizes".into(),
            values: strings(&["small", "large"]),
        };
        assert_eq!(
            create.invert().unwrap(),
            MigrationCommand::Drop { name: "sizes".into(), values: None }
        );
    }

    #[test]
    fn test_rename_inverts_to_reverse_rename() {
        let rename = MigrationCommand::Rename { from: "sizes".into(), to: "lengths".into() };
        assert_eq!(
            rename.invert().unwrap(),
            MigrationCommand::Rename { from: "lengths".into(), to: "sizes".into() }
        );
    }

    #[test]
    fn test_drop_without_values_is_irreversible() {
        let drop = MigrationCommand::Drop { name: "sizes".into(), values: None };
        assert!(matches!(drop.invert(), Err(EnumError::Irreversible(_))));
    }

    #[test]
    fn test_drop_with_values_inverts_to_create() {
        let drop = MigrationCommand::Drop {
            name: "sizes".into(),
            values: Some(strings(&["small", "medium", "large"])),
        };
        assert_eq!(
            drop.invert().unwrap(),
            MigrationCommand::Create {
                name: "sizes".into(),
                values: strings(&["small", "medium", "large"]),
            }
        );

        // an explicitly empty list was still supplied
        let drop = MigrationCommand::Drop { name: "flags".into(), values: Some(Vec::new()) };
        assert_eq!(
            drop.invert().unwrap(),
            MigrationCommand::Create { name: "flags".into(), values: Vec::new() }
        );
    }

    #[test]
    fn test_add_value_is_always_irreversible() {
        let add = MigrationCommand::AddValue {
            name: "sizes".into(),
            value: "x".into(),
            before: None,
            after: None,
        };
        assert!(matches!(add.invert(), Err(EnumError::Irreversible(_))));

        let anchored = MigrationCommand::AddValue {
            name: "sizes".into(),
            value: "x".into(),
            before: Some("small".into()),
            after: None,
        };
        assert!(matches!(anchored.invert(), Err(EnumError::Irreversible(_))));
    }

    #[test]
    fn test_rename_value_inverts_to_swapped_values() {
        let rename = MigrationCommand::RenameValue {
            name: "sizes".into(),
            from: "old".into(),
            to: "new".into(),
        };
        assert_eq!(
            rename.invert().unwrap(),
            MigrationCommand::RenameValue {
                name: "sizes".into(),
                from: "new".into(),
                to: "old".into(),
            }
        );
    }

    #[test]
    fn test_invert_all_reverses_order() {
        let commands = vec![
            MigrationCommand::Create { name: "sizes".into(), values: strings(&["small"]) },
            MigrationCommand::Rename { from: "sizes".into(), to: "lengths".into() },
        ];

        let inverse = invert_all(&commands).unwrap();
        assert_eq!(
            inverse,
            vec![
                MigrationCommand::Rename { from: "lengths".into(), to: "sizes".into() },
                MigrationCommand::Drop { name: "sizes".into(), values: None },
            ]
        );
    }

    #[test]
    fn test_invert_all_fails_on_any_irreversible_command() {
        let commands = vec![
            MigrationCommand::Create { name: "sizes".into(), values: strings(&["small"]) },
            MigrationCommand::AddValue {
                name: "sizes".into(),
                value: "large".into(),
                before: None,
                after: None,
            },
        ];

        assert!(matches!(invert_all(&commands), Err(EnumError::Irreversible(_))));
    }

    #[test]
    fn test_command_log_json_format() {
        let recorder = CommandRecorder::from(vec![
            MigrationCommand::Drop { name: "sizes".into(), values: None },
            MigrationCommand::RenameValue {
                name: "sizes".into(),
                from: "old".into(),
                to: "new".into(),
            },
        ]);

        let json = recorder.to_json().unwrap();
        assert!(json.contains(r#""operation": "drop""#));
        assert!(json.contains(r#""operation": "rename_value""#));

        let decoded = CommandRecorder::from_json(&json).unwrap();
        assert_eq!(decoded, recorder);
    }

    #[test]
    fn test_command_log_rejects_non_string_values() {
        let json = r#"[{"operation": "create", "name": "sizes", "values": ["small", 3]}]"#;
        assert!(matches!(
            CommandRecorder::from_json(json),
            Err(EnumError::Serialization(_))
        ));
    }
}
