use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

use super::{Command, CommandResult, strip_code_fence};
use crate::session::Session;
use crate::{fs, ui};

/// Arguments of `generate`.
#[derive(Debug, Parser)]
#[command(name = "generate", about = "Generates code from a description")]
pub struct GenerateArgs {
    /// What the code should do.
    #[arg(required = true, num_args = 1..)]
    pub description: Vec<String>,

    /// The programming language to use.
    #[arg(short, long, default_value = "typescript")]
    pub language: String,

    /// Saves the generated code to a file instead of printing it.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Asks the model to write code.
pub struct GenerateCommand;

impl Command for GenerateCommand {
    type Args = GenerateArgs;

    fn name(&self) -> &str {
        "generate"
    }

    fn usage(&self) -> &str {
        "generate <description...>"
    }

    fn description(&self) -> &str {
        "Generates code from a description (-l <language>, -o <file>)"
    }

    #[allow(clippy::manual_async_fn)]
    fn execute<'a>(
        &'a self,
        session: &'a mut Session,
        args: GenerateArgs,
    ) -> impl Future<Output = CommandResult> + Send + 'a {
        async move {
            let language = &args.language;
            let system_prompt = format!(
                "You are an expert {language} programmer. Generate clean, \
                 working and well-documented code."
            );
            let message =
                generation_request(language, &args.description.join(" "));

            ui::print_info("✨ Generating code...");
            let answer =
                session.ask(&message, Some(system_prompt.as_str())).await?;
            let code = strip_code_fence(&answer);

            let Some(output) = &args.output else {
                ui::print_heading("✨ Generated code");
                println!("{code}");
                return Ok(());
            };
            let path = session.resolve_path(output);
            fs::write(&path, &with_trailing_newline(code))
                .await
                .with_context(|| {
                    format!("failed to write '{}'", path.display())
                })?;
            ui::print_success(format!("Code saved to: {}", path.display()));
            Ok(())
        }
    }
}

fn generation_request(language: &str, description: &str) -> String {
    [
        format!("Write {language} code for: {description}").as_str(),
        "Requirements:",
        "1. Working, well-structured code",
        "2. Explanatory comments",
        "3. Error handling",
        "4. Programming best practices",
        "5. Necessary imports",
        "",
        "Provide ONLY the code, without explanations.",
    ]
    .join("\n")
}

pub(super) fn with_trailing_newline(mut code: String) -> String {
    if !code.ends_with('\n') {
        code.push('\n');
    }
    code
}
