//! A command-line assistant for models served locally by LM Studio or any
//! other OpenAI-compatible server.
//!
//! The binary runs one command and exits, or starts an interactive loop
//! where commands and free-form chat can be mixed. The pieces are exposed
//! as a library so that the loop can be driven without a terminal.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod commands;
pub mod fs;
pub mod repl;
pub mod session;
pub mod ui;

pub use session::{Session, SessionBuilder};
