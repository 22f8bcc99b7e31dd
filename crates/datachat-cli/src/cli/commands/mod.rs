//! CLI command handlers.

pub mod ask;
pub mod chat;
pub mod config;
pub mod upload;

use anyhow::Result;
use datachat_core::backend::HttpBackend;
use datachat_core::config::Config;
use datachat_core::controller::{Controller, Outcome};
use datachat_core::session::Sender;

pub(crate) fn backend(config: &Config) -> Result<HttpBackend> {
    HttpBackend::new(&config.base_url, config.request_timeout())
}

/// Prints every bot message in the transcript.
pub(crate) fn print_bot_messages(controller: &Controller) {
    let messages = controller.state().transcript().messages();
    for message in messages {
        if message.sender() == Sender::Bot {
            println!("{}", message.text());
        }
    }
}

/// Turns a non-successful outcome into an error so the process exits non-zero.
pub(crate) fn ensure_succeeded(outcome: Outcome, what: &str) -> Result<()> {
    match outcome {
        Outcome::Succeeded => Ok(()),
        Outcome::Rejected => anyhow::bail!("{what} was rejected"),
        Outcome::Failed | Outcome::Ignored => anyhow::bail!("{what} failed"),
    }
}
