//! Application state for the TUI.

use datachat_core::controller::Controller;

use crate::input::LineEditor;
use crate::overlays::Overlay;
use crate::transcript::TranscriptView;

/// Combined application state.
///
/// `session` owns everything the user can see as data (transcript,
/// attachment, pending query). The remaining fields are view-only.
#[derive(Debug)]
pub struct AppState {
    pub session: Controller,
    /// Query input. Its text mirrors the session's pending query.
    pub input: LineEditor,
    pub transcript: TranscriptView,
    pub overlay: Option<Overlay>,
    /// Backend address, shown in the status line.
    pub backend_label: String,
    pub should_quit: bool,
    pub spinner_frame: usize,
}

impl AppState {
    pub fn new(backend_label: impl Into<String>) -> Self {
        Self {
            session: Controller::new(),
            input: LineEditor::default(),
            transcript: TranscriptView::default(),
            overlay: None,
            backend_label: backend_label.into(),
            should_quit: false,
            spinner_frame: 0,
        }
    }

    /// Copies the input text into the session's pending query.
    pub fn sync_pending_query(&mut self) {
        self.session.set_pending_query(self.input.text());
    }

    /// Resets the input if the session cleared the pending query.
    pub fn sync_input_from_session(&mut self) {
        if self.session.state().pending_query().is_empty() && !self.input.text().is_empty() {
            self.input.clear();
        }
    }
}
