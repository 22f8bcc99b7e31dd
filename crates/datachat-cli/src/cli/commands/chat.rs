//! Chat command handler (interactive TUI).

use anyhow::Result;
use datachat_core::config::Config;

#[cfg(feature = "tui")]
pub async fn run(config: &Config) -> Result<()> {
    use anyhow::Context;

    datachat_tui::run_interactive_chat(config)
        .await
        .context("interactive chat failed")
}

#[cfg(not(feature = "tui"))]
pub async fn run(_config: &Config) -> Result<()> {
    anyhow::bail!("Interactive chat is not available in this build. Use `datachat ask`.")
}
