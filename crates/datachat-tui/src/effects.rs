//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only; the reducer never performs
//! I/O directly.

use std::path::PathBuf;

use datachat_core::controller::{ChatRequest, UploadRequest};

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Read file metadata for a path typed into the attach prompt.
    InspectFile { path: PathBuf },

    /// Send the attachment to the backend.
    StartUpload { request: UploadRequest },

    /// Send a query to the backend.
    StartChat { request: ChatRequest },
}
