//! Input feature slice: query editing, submission, attachment indicator.

mod editor;
mod render;
mod update;

pub use editor::LineEditor;
pub use render::{attachment_label, render_attachment_line, render_input};
pub use update::{handle_key, handle_paste, submit};
