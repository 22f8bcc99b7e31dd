//! Decides when the event loop has to repaint.
//!
//! Session data changes are detected through the session revision. View-only
//! changes (typing, scrolling, overlays, spinner) come from the event itself.

use crate::events::UiEvent;
use crate::state::AppState;

#[derive(Debug, Default)]
pub struct RedrawTracker {
    seen_revision: Option<u64>,
    seen_size: Option<(u16, u16)>,
}

impl RedrawTracker {
    /// Returns true if `event` changes view state. Call before the reducer
    /// consumes it.
    pub fn event_changes_view(&mut self, event: &UiEvent, app: &AppState) -> bool {
        match event {
            UiEvent::Frame { width, height } => {
                let size = Some((*width, *height));
                let resized = self.seen_size != size;
                self.seen_size = size;
                resized
            }
            UiEvent::Terminal(_) => true,
            UiEvent::Tick => app.session.is_uploading() || app.session.is_querying(),
            UiEvent::FileInspected { .. }
            | UiEvent::UploadFinished { .. }
            | UiEvent::ChatFinished { .. } => false,
        }
    }

    /// Returns true if the session changed since the previous call.
    pub fn session_changed(&mut self, app: &AppState) -> bool {
        let revision = app.session.state().revision();
        let changed = self.seen_revision != Some(revision);
        self.seen_revision = Some(revision);
        changed
    }
}
