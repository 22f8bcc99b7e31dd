//! Upload command handler.

use std::path::Path;

use anyhow::Result;
use datachat_core::attachment::FileCandidate;
use datachat_core::config::Config;
use datachat_core::controller::{Controller, Outcome};

use super::{backend, ensure_succeeded, print_bot_messages};

pub async fn run(config: &Config, path: &Path) -> Result<()> {
    let backend = backend(config)?;
    let mut controller = Controller::new();
    let outcome = upload_file(&mut controller, &backend, path).await;
    print_bot_messages(&controller);
    ensure_succeeded(outcome, "upload")
}

/// Selects `path` as the attachment and uploads it.
///
/// An unreadable path is reported in the transcript like any other rejection.
pub(crate) async fn upload_file(
    controller: &mut Controller,
    backend: &datachat_core::backend::HttpBackend,
    path: &Path,
) -> Outcome {
    let candidate = match FileCandidate::from_path(path) {
        Ok(candidate) => candidate,
        Err(err) => {
            controller.report_unreadable_file(&err);
            return Outcome::Rejected;
        }
    };
    if controller.select_file(candidate) == Outcome::Rejected {
        return Outcome::Rejected;
    }
    controller.upload(backend).await
}
