//! Full-screen TUI for datachat.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, Write, stderr};
use std::sync::Arc;

use anyhow::Result;
use datachat_core::backend::HttpBackend;
use datachat_core::config::Config;
pub use features::{input, transcript};
pub use runtime::TuiRuntime;
use tracing::info;

/// Runs the interactive chat loop against the configured backend.
///
/// # Errors
/// Returns an error if stderr is not a terminal, the backend URL is invalid,
/// or terminal I/O fails.
pub async fn run_interactive_chat(config: &Config) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "Chat mode requires a terminal.\n\
             Use `datachat ask --query '...'` for non-interactive use."
        );
    }

    let backend = HttpBackend::new(&config.base_url, config.request_timeout())?;
    info!(base_url = backend.base_url(), "starting interactive chat");

    let mut err = stderr();
    writeln!(err, "datachat")?;
    writeln!(err, "Backend: {}", backend.base_url())?;
    err.flush()?;

    let label = backend.base_url().to_string();
    let mut runtime = TuiRuntime::new(Arc::new(backend), label)?;
    runtime.run()?;
    drop(runtime);

    writeln!(stderr(), "Goodbye!")?;
    Ok(())
}
