//! Transcript feature slice.

mod render;
mod state;

pub use render::{line_count, render_transcript, transcript_lines};
pub use state::TranscriptView;
