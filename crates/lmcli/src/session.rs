//! The interactive session shared by the loop and the commands.

use std::env;
use std::path::{Path, PathBuf};

use lmcli_client::{CallOptions, Client, Result};

use crate::fs;
use crate::ui::{self, Spinner};

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    client: Client,
    stream: bool,
    working_dir: Option<PathBuf>,
}

impl SessionBuilder {
    /// Creates a session builder around a client.
    #[inline]
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            stream: false,
            working_dir: None,
        }
    }

    /// Prints answers token by token as they arrive, instead of waiting for
    /// the complete answer.
    #[inline]
    pub fn with_streaming(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Sets the directory relative paths are resolved against. Defaults to
    /// the current directory of the process.
    #[inline]
    pub fn with_working_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Builds a new session.
    pub fn build(self) -> Session {
        let working_dir = self.working_dir.unwrap_or_else(|| {
            env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        });
        Session {
            client: self.client,
            stream: self.stream,
            working_dir,
        }
    }
}

/// The state shared by the interactive loop and the commands.
///
/// The session owns the only [`Client`], and thereby the conversation. It's
/// passed by `&mut` to whoever talks to the model, one call at a time.
pub struct Session {
    client: Client,
    stream: bool,
    working_dir: PathBuf,
}

impl Session {
    /// Returns the client.
    #[inline]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Returns the client mutably, e.g. to clear the conversation.
    #[inline]
    pub fn client_mut(&mut self) -> &mut Client {
        &mut self.client
    }

    /// Returns the directory relative paths are resolved against.
    #[inline]
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Resolves a path typed by the user.
    #[inline]
    pub fn resolve_path(&self, input: &Path) -> PathBuf {
        fs::resolve_path(&self.working_dir, input)
    }

    /// Sends a message and returns the answer, showing a spinner meanwhile.
    ///
    /// With a system prompt the message starts a new conversation, without
    /// one it continues the current conversation.
    pub async fn ask(
        &mut self,
        message: &str,
        system_prompt: Option<&str>,
    ) -> Result<String> {
        let _spinner = Spinner::start("🤔 Thinking...");
        self.client
            .send_message(message, call_options(system_prompt))
            .await
    }

    /// Like [`Session::ask`], but prints the answer below `heading`. When
    /// streaming is enabled, tokens are printed as they arrive.
    pub async fn ask_and_print(
        &mut self,
        message: &str,
        system_prompt: Option<&str>,
        heading: &str,
    ) -> Result<String> {
        if !self.stream {
            let answer = self.ask(message, system_prompt).await?;
            ui::print_heading(heading);
            println!("{answer}");
            return Ok(answer);
        }

        ui::print_heading(heading);
        let options = call_options(system_prompt)
            .streaming()
            .on_token(ui::print_token);
        let answer = self.client.send_message(message, options).await;
        println!();
        answer
    }
}

#[inline]
fn call_options(system_prompt: Option<&str>) -> CallOptions<'static> {
    match system_prompt {
        Some(prompt) => CallOptions::new()
            .with_system_prompt(prompt)
            .new_conversation(),
        None => CallOptions::new(),
    }
}
