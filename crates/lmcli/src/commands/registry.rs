use std::collections::HashMap;

use super::{
    AnalyzeCommand, AnyCommand, Command, CommandObject, CommandResult,
    ExplainCommand, GenerateCommand, ModifyCommand,
};
use crate::session::Session;

/// The commands known to the interactive loop, by name.
#[derive(Default)]
pub struct Registry {
    commands: HashMap<String, Box<dyn CommandObject>>,
}

impl Registry {
    /// Creates an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with `analyze`, `generate`, `modify` and
    /// `explain`.
    pub fn builtin() -> Self {
        Self::new()
            .with_command(AnalyzeCommand)
            .with_command(GenerateCommand)
            .with_command(ModifyCommand)
            .with_command(ExplainCommand)
    }

    /// Registers a command, replacing any command of the same name.
    pub fn with_command<T: Command>(mut self, command: T) -> Self {
        let command = AnyCommand(command);
        let name = command.name().to_owned();
        if self.commands.insert(name, Box::new(command)).is_some() {
            warn!("command registered twice, keeping the last one");
        }
        self
    }

    /// Checks whether a command is registered under `name`.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Returns the usage and description of every command, sorted by name.
    pub fn help_entries(&self) -> Vec<(&str, &str)> {
        let mut commands: Vec<_> = self.commands.values().collect();
        commands.sort_by(|a, b| a.name().cmp(b.name()));
        commands
            .into_iter()
            .map(|command| (command.usage(), command.description()))
            .collect()
    }

    /// Runs the command registered under `name` with the words that
    /// followed it. Returns `None` if there is no such command.
    pub async fn execute(
        &self,
        session: &mut Session,
        name: &str,
        argv: Vec<String>,
    ) -> Option<CommandResult> {
        let command = self.commands.get(name)?;
        debug!("running command {name} with args: {argv:?}");
        Some(command.execute(session, argv).await)
    }
}
