//! `lmcli`, a command-line assistant for locally hosted models.

#[macro_use]
extern crate tracing;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use lmcli::commands::{
    AnalyzeArgs, AnalyzeCommand, Command as _, ExplainArgs, ExplainCommand,
    GenerateArgs, GenerateCommand, ModifyArgs, ModifyCommand, Registry,
};
use lmcli::{SessionBuilder, repl, ui};
use lmcli_client::{Client, ClientConfig, ClientConfigBuilder};
use tracing_subscriber::EnvFilter;

/// A command-line assistant for LM Studio and other OpenAI-compatible
/// servers. Starts an interactive session when no command is given.
#[derive(Parser)]
#[command(name = "lmcli", version)]
struct Cli {
    /// Base URL of the model server.
    #[arg(long, env = "LMCLI_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Model to use.
    #[arg(long, env = "LMCLI_MODEL", global = true)]
    model: Option<String>,

    /// Sampling temperature.
    #[arg(long, env = "LMCLI_TEMPERATURE", global = true)]
    temperature: Option<f64>,

    /// Maximum number of tokens in an answer.
    #[arg(long, env = "LMCLI_MAX_TOKENS", global = true)]
    max_tokens: Option<u32>,

    /// Prints answers as they are generated.
    #[arg(long, env = "LMCLI_STREAM", global = true)]
    stream: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyzes a code file and gives feedback.
    Analyze(AnalyzeArgs),
    /// Generates code from a description.
    Generate(GenerateArgs),
    /// Modifies an existing file following an instruction.
    Modify(ModifyArgs),
    /// Analyzes a directory structure and explains its architecture.
    Explain(ExplainArgs),
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        let mut builder = ClientConfigBuilder::new();
        if let Some(base_url) = &self.base_url {
            builder = builder.with_base_url(base_url);
        }
        if let Some(model) = &self.model {
            builder = builder.with_model(model);
        }
        if let Some(temperature) = self.temperature {
            builder = builder.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            builder = builder.with_max_tokens(max_tokens);
        }
        builder.build()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.client_config();
    debug!("using model {} at {}", config.model(), config.base_url());

    let mut session = SessionBuilder::with_client(Client::new(config))
        .with_streaming(cli.stream)
        .build();

    let result = match cli.command {
        None => repl::run(&mut session, &Registry::builtin()).await,
        Some(Commands::Analyze(args)) => {
            AnalyzeCommand.execute(&mut session, args).await
        }
        Some(Commands::Generate(args)) => {
            GenerateCommand.execute(&mut session, args).await
        }
        Some(Commands::Modify(args)) => {
            ModifyCommand.execute(&mut session, args).await
        }
        Some(Commands::Explain(args)) => {
            ExplainCommand.execute(&mut session, args).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            ui::print_error(format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}
