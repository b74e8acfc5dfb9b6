//! The interactive loop.

use std::io::Write as _;

use anyhow::Context as _;
use console::Term;
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt, BufReader};

use crate::commands::Registry;
use crate::session::Session;
use crate::{fs, ui};

const PROMPT: &str = "lmcli> ";

const BANNER: &str = r"
    ╔══════════════════════════════════╗
    ║    LM Studio CLI - Interactive   ║
    ╚══════════════════════════════════╝";

const SETUP_HELP: &str = "To set it up:
    1. Open LM Studio
    2. Load a model
    3. Start the 'Local Server' (port 1234)";

/// What the loop does after a line was handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Flow {
    /// Wait for the next line.
    Continue,
    /// Leave the loop.
    Quit,
}

/// Runs the interactive loop until the user quits or stdin is closed.
///
/// Nothing is read if the model server can't be reached, the user is told
/// how to start it instead.
pub async fn run(
    session: &mut Session,
    registry: &Registry,
) -> anyhow::Result<()> {
    println!("{}", BANNER.bright_cyan());

    let status = session.client().check_connection().await;
    println!("\n🔌 {status}\n");
    if !status.connected {
        println!("{SETUP_HELP}");
        return Ok(());
    }

    print_help(registry);

    let mut lines = BufReader::new(io::stdin()).lines();
    loop {
        print!("\n{}", PROMPT.bold());
        std::io::stdout().flush().context("failed to write the prompt")?;

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                error!("failed to read from stdin: {err}");
                break;
            }
        };
        if handle_line(session, registry, &line).await == Flow::Quit {
            break;
        }
    }
    Ok(())
}

/// Handles one line of user input.
///
/// Meta-commands are handled in place, registered commands are run with the
/// words that follow their name, anything else is sent as a chat message.
/// Failures are printed and never end the loop.
pub async fn handle_line(
    session: &mut Session,
    registry: &Registry,
    line: &str,
) -> Flow {
    let input = line.trim();
    let mut words = input.split_whitespace();
    let Some(name) = words.next() else {
        return Flow::Continue;
    };
    let name = name.to_lowercase();

    let result = match name.as_str() {
        "quit" | "exit" | "q" => {
            println!("Bye! 👋");
            return Flow::Quit;
        }
        "help" | "h" => {
            print_help(registry);
            Ok(())
        }
        "clear" | "cls" => Term::stdout()
            .clear_screen()
            .context("failed to clear the screen"),
        "reset" | "new" => {
            session.client_mut().clear_history();
            ui::print_success("Started a new conversation.");
            Ok(())
        }
        "list" | "ls" | "dir" => list_files(session).await,
        _ => {
            let argv = words.map(str::to_owned).collect();
            match registry.execute(session, &name, argv).await {
                Some(result) => result,
                None => chat(session, input).await,
            }
        }
    };

    if let Err(err) = result {
        ui::print_error(format!("{err:#}"));
    }
    Flow::Continue
}

async fn chat(session: &mut Session, input: &str) -> anyhow::Result<()> {
    session.ask_and_print(input, None, "🤖 Answer").await?;
    Ok(())
}

async fn list_files(session: &Session) -> anyhow::Result<()> {
    let entries = fs::list_dir(session.working_dir())
        .await
        .context("failed to list files")?;
    ui::print_heading("📂 Available files");
    if entries.is_empty() {
        println!("No files found");
    }
    for entry in entries {
        println!("{}", entry.display_name());
    }
    Ok(())
}

fn print_help(registry: &Registry) {
    ui::print_heading("Available commands");

    println!("📁 Files:");
    for (usage, description) in registry.help_entries() {
        print_entry(usage, description);
    }
    print_entry("list/ls", "Lists the files of the working directory");

    println!("\n⚙️  Utilities:");
    print_entry("reset/new", "Starts a new conversation");
    print_entry("clear/cls", "Clears the screen");
    print_entry("help/h", "Shows this help");
    print_entry("quit/exit/q", "Exits the program");

    println!("\n💬 Chat:");
    print_entry("<any text>", "Sends a message to the model");
}

#[inline]
fn print_entry(usage: &str, description: &str) {
    println!("  {}{description}", format!("{usage:<34}").bright_cyan());
}
