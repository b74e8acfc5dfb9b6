//! Commands that can be run from the command line or the interactive loop.

mod analyze;
mod explain;
mod generate;
mod modify;
mod registry;

use std::iter;
use std::pin::Pin;

use clap::Parser;
use clap::error::ErrorKind;

pub use analyze::{AnalyzeArgs, AnalyzeCommand};
pub use explain::{ExplainArgs, ExplainCommand};
pub use generate::{GenerateArgs, GenerateCommand};
pub use modify::{ModifyArgs, ModifyCommand};
pub use registry::Registry;

use crate::session::Session;

/// The result of a command.
pub type CommandResult = anyhow::Result<()>;

/// A command that talks to the model on behalf of the user.
///
/// Commands report progress and results on the terminal themselves, a
/// failure is returned to the caller, which decides how to present it.
pub trait Command: Send + Sync + 'static {
    /// The arguments of the command, parsed from the words that follow the
    /// command name.
    type Args: Parser + Send + 'static;

    /// Returns the name the command is invoked by.
    fn name(&self) -> &str;

    /// Returns a one-line usage, e.g. `analyze <file>`.
    fn usage(&self) -> &str;

    /// Returns the description of the command.
    fn description(&self) -> &str;

    /// Executes the command.
    fn execute<'a>(
        &'a self,
        session: &'a mut Session,
        args: Self::Args,
    ) -> impl Future<Output = CommandResult> + Send + 'a;
}

pub(crate) trait CommandObject: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn usage(&self) -> &str;

    fn description(&self) -> &str;

    fn execute<'a>(
        &'a self,
        session: &'a mut Session,
        argv: Vec<String>,
    ) -> Pin<Box<dyn Future<Output = CommandResult> + Send + 'a>>;
}

pub(crate) struct AnyCommand<T: Command>(pub T);

impl<T: Command> CommandObject for AnyCommand<T> {
    #[inline]
    fn name(&self) -> &str {
        self.0.name()
    }

    #[inline]
    fn usage(&self) -> &str {
        self.0.usage()
    }

    #[inline]
    fn description(&self) -> &str {
        self.0.description()
    }

    fn execute<'a>(
        &'a self,
        session: &'a mut Session,
        argv: Vec<String>,
    ) -> Pin<Box<dyn Future<Output = CommandResult> + Send + 'a>> {
        let argv = iter::once(self.0.name().to_owned()).chain(argv);
        let args = match T::Args::try_parse_from(argv) {
            Ok(args) => args,
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
                ) =>
            {
                let _ = err.print();
                return Box::pin(std::future::ready(Ok(())));
            }
            Err(err) => {
                return Box::pin(std::future::ready(Err(err.into())));
            }
        };
        Box::pin(self.0.execute(session, args))
    }
}

/// Extracts the first fenced code block of a model answer.
///
/// Answers without a fence are returned trimmed. A block that is never
/// closed extends to the end of the answer.
pub fn strip_code_fence(text: &str) -> String {
    let mut lines = text.lines();
    if !lines.any(|line| line.trim_start().starts_with("```")) {
        return text.trim().to_owned();
    }

    lines
        .take_while(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(
            strip_code_fence("```rust\nfn main() {}\n```\n"),
            "fn main() {}"
        );
        assert_eq!(
            strip_code_fence("Here you go:\n\n```\na\n\nb\n```\nEnjoy!"),
            "a\n\nb"
        );
        assert_eq!(
            strip_code_fence("```ts\nfirst\n```\n```ts\nsecond\n```"),
            "first"
        );
        assert_eq!(strip_code_fence("```py\nprint(1)"), "print(1)");
        assert_eq!(strip_code_fence("  plain text\n"), "plain text");
    }
}
