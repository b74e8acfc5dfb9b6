use std::path::PathBuf;

use anyhow::{Context as _, bail};
use clap::Parser;

use super::generate::with_trailing_newline;
use super::{Command, CommandResult, strip_code_fence};
use crate::session::Session;
use crate::{fs, ui};

const SYSTEM_PROMPT: &str = "You are an expert programmer. Modify the \
provided code to follow the instruction, keeping its functionality and good \
practices.";

/// Arguments of `modify`.
#[derive(Debug, Parser)]
#[command(
    name = "modify",
    about = "Modifies an existing file following an instruction"
)]
pub struct ModifyArgs {
    /// The file to modify.
    pub file: PathBuf,

    /// What to change.
    #[arg(required = true, num_args = 1..)]
    pub instruction: Vec<String>,
}

/// Asks the model to rewrite a file, keeping a backup of the original.
pub struct ModifyCommand;

impl Command for ModifyCommand {
    type Args = ModifyArgs;

    fn name(&self) -> &str {
        "modify"
    }

    fn usage(&self) -> &str {
        "modify <file> <instruction...>"
    }

    fn description(&self) -> &str {
        "Modifies an existing file following an instruction"
    }

    #[allow(clippy::manual_async_fn)]
    fn execute<'a>(
        &'a self,
        session: &'a mut Session,
        args: ModifyArgs,
    ) -> impl Future<Output = CommandResult> + Send + 'a {
        async move {
            let path = session.resolve_path(&args.file);
            if !fs::exists(&path).await {
                bail!("file not found: '{}'", path.display());
            }
            let content =
                fs::read_to_string(&path).await.with_context(|| {
                    format!("failed to read '{}'", path.display())
                })?;

            let mut backup_path = path.clone().into_os_string();
            backup_path.push(".backup");
            let backup_path = PathBuf::from(backup_path);
            fs::write(&backup_path, &content).await.with_context(|| {
                format!("failed to write backup '{}'", backup_path.display())
            })?;
            ui::print_info(format!(
                "💾 Backup of the original file created at: {}",
                backup_path.display()
            ));

            let file = args.file.display().to_string();
            let message = modification_request(
                &file,
                &args.instruction.join(" "),
                &content,
            );
            ui::print_info(format!("✏️  Modifying {file}..."));
            let answer = session.ask(&message, Some(SYSTEM_PROMPT)).await?;
            let new_content = with_trailing_newline(strip_code_fence(&answer));

            fs::write(&path, &new_content).await.with_context(|| {
                format!("failed to write '{}'", path.display())
            })?;
            ui::print_success("File modified successfully!");
            Ok(())
        }
    }
}

fn modification_request(file: &str, instruction: &str, code: &str) -> String {
    [
        format!(
            "Modify the following code according to the instruction: \
             \"{instruction}\""
        )
        .as_str(),
        "",
        format!("Current code in file '{file}':").as_str(),
        "```",
        code,
        "```",
        "",
        "Provide ONLY the modified code, without explanations or additional \
         text.",
    ]
    .join("\n")
}
