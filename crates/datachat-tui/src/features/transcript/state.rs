//! Transcript scroll state.

/// Scroll position and viewport size of the transcript pane.
///
/// The offset is measured in lines from the bottom; 0 follows the latest
/// message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptView {
    offset_from_bottom: usize,
    viewport_width: usize,
    viewport_height: usize,
}

impl TranscriptView {
    pub fn offset_from_bottom(&self) -> usize {
        self.offset_from_bottom
    }

    pub fn is_following(&self) -> bool {
        self.offset_from_bottom == 0
    }

    pub fn viewport_width(&self) -> usize {
        self.viewport_width
    }

    pub fn set_viewport(&mut self, width: usize, height: usize) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    pub fn page_size(&self) -> usize {
        self.viewport_height.saturating_sub(1).max(1)
    }

    /// Scrolls towards older messages, clamped to the top of `total_lines`.
    pub fn scroll_up(&mut self, lines: usize, total_lines: usize) {
        let max_offset = total_lines.saturating_sub(self.viewport_height);
        self.offset_from_bottom = (self.offset_from_bottom + lines).min(max_offset);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.offset_from_bottom = self.offset_from_bottom.saturating_sub(lines);
    }

    pub fn follow_latest(&mut self) {
        self.offset_from_bottom = 0;
    }
}
