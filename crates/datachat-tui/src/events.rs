//! UI events consumed by the reducer.

use std::path::PathBuf;

use datachat_core::attachment::FileCandidate;
use datachat_core::backend::{BackendError, ChatReply};
use datachat_core::controller::{ChatTicket, UploadTicket};

/// Everything that can change `AppState`.
#[derive(Debug)]
pub enum UiEvent {
    /// Periodic tick (spinner animation, render cadence).
    Tick,
    /// Current terminal size, sent before other events each loop iteration.
    Frame { width: u16, height: u16 },
    /// Raw crossterm input.
    Terminal(crossterm::event::Event),
    /// A path from the attach prompt was inspected.
    FileInspected {
        path: PathBuf,
        result: anyhow::Result<FileCandidate>,
    },
    UploadFinished {
        ticket: UploadTicket,
        result: Result<(), BackendError>,
    },
    ChatFinished {
        ticket: ChatTicket,
        result: Result<ChatReply, BackendError>,
    },
}
