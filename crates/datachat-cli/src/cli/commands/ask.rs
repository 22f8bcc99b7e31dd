//! Ask command handler: one query, answer printed to stdout.

use std::path::Path;

use anyhow::Result;
use datachat_core::config::Config;
use datachat_core::controller::{Controller, Outcome};

use super::upload::upload_file;
use super::{backend, ensure_succeeded, print_bot_messages};

pub async fn run(config: &Config, query: &str, file: Option<&Path>) -> Result<()> {
    let backend = backend(config)?;
    let mut controller = Controller::new();

    if let Some(path) = file {
        let outcome = upload_file(&mut controller, &backend, path).await;
        if outcome != Outcome::Succeeded {
            print_bot_messages(&controller);
            return ensure_succeeded(outcome, "upload");
        }
    }

    let outcome = controller.send_query(&backend, query).await;
    print_bot_messages(&controller);
    ensure_succeeded(outcome, "query")
}
