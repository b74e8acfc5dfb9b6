use std::path::PathBuf;

use clap::Parser;

use super::{Command, CommandResult};
use crate::session::Session;
use crate::{fs, ui};

const SYSTEM_PROMPT: &str = "You are a software architecture expert. \
Analyze the provided project structure and give valuable insights.";

/// Arguments of `explain`.
#[derive(Debug, Parser)]
#[command(
    name = "explain",
    about = "Analyzes a directory structure and explains its architecture"
)]
pub struct ExplainArgs {
    /// The directory to explain.
    #[arg(default_value = ".")]
    pub directory: PathBuf,
}

/// Asks the model to explain the layout of a project.
pub struct ExplainCommand;

impl Command for ExplainCommand {
    type Args = ExplainArgs;

    fn name(&self) -> &str {
        "explain"
    }

    fn usage(&self) -> &str {
        "explain [directory]"
    }

    fn description(&self) -> &str {
        "Analyzes a directory structure and explains its architecture"
    }

    #[allow(clippy::manual_async_fn)]
    fn execute<'a>(
        &'a self,
        session: &'a mut Session,
        args: ExplainArgs,
    ) -> impl Future<Output = CommandResult> + Send + 'a {
        async move {
            let path = session.resolve_path(&args.directory);
            ui::print_info(format!(
                "📁 Analyzing structure of: {}",
                path.display()
            ));

            let tree = fs::directory_tree(&path).await;
            if tree.is_empty() {
                ui::print_warning(
                    "Could not read directory structure or directory is empty.",
                );
                return Ok(());
            }

            let message = explanation_request(&tree);
            session
                .ask_and_print(
                    &message,
                    Some(SYSTEM_PROMPT),
                    "📊 Directory analysis",
                )
                .await?;
            Ok(())
        }
    }
}

fn explanation_request(tree: &str) -> String {
    [
        "Analyze this project structure:",
        "```",
        tree,
        "```",
        "",
        "Provide a concise analysis on:",
        "1. The probable purpose of the project and technologies used.",
        "2. The file organization and architecture (e.g., MVC, modular, etc.).",
        "3. Positive points and possible suggestions for improvement in the \
         structure.",
    ]
    .join("\n")
}
