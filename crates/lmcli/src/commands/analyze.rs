use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context as _, bail};
use clap::Parser;

use super::{Command, CommandResult};
use crate::fs;
use crate::session::Session;

const SYSTEM_PROMPT: &str = "You are a code analysis expert. Analyze the \
provided code and give detailed, constructive feedback.";

/// Arguments of `analyze`.
#[derive(Debug, Parser)]
#[command(name = "analyze", about = "Analyzes a code file and gives feedback")]
pub struct AnalyzeArgs {
    /// The file to analyze.
    pub file: PathBuf,
}

/// Asks the model to review a source file.
pub struct AnalyzeCommand;

impl Command for AnalyzeCommand {
    type Args = AnalyzeArgs;

    fn name(&self) -> &str {
        "analyze"
    }

    fn usage(&self) -> &str {
        "analyze <file>"
    }

    fn description(&self) -> &str {
        "Analyzes a code file and gives feedback"
    }

    #[allow(clippy::manual_async_fn)]
    fn execute<'a>(
        &'a self,
        session: &'a mut Session,
        args: AnalyzeArgs,
    ) -> impl Future<Output = CommandResult> + Send + 'a {
        async move {
            let path = session.resolve_path(&args.file);
            let code = match fs::read_to_string(&path).await {
                Ok(code) => code,
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    bail!("file not found: '{}'", args.file.display());
                }
                Err(err) => {
                    return Err(err).with_context(|| {
                        format!("failed to read '{}'", path.display())
                    });
                }
            };

            let file = args.file.display().to_string();
            let message = analysis_request(&file, &code);
            session
                .ask_and_print(&message, Some(SYSTEM_PROMPT), "🔍 Analysis")
                .await?;
            Ok(())
        }
    }
}

fn analysis_request(file: &str, code: &str) -> String {
    [
        "Analyze the following code:",
        "1. Summary of what it does",
        "2. Possible improvements",
        "3. Identified problems",
        "4. Optimization suggestions",
        "",
        format!("Code ({file}):").as_str(),
        "```",
        code,
        "```",
    ]
    .join("\n")
}
