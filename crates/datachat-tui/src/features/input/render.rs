//! Input and attachment indicator rendering.

use datachat_core::attachment::format_size;
use datachat_core::session::UploadPhase;
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::common::text::truncate_with_ellipsis;
use crate::state::AppState;

/// Text of the attachment indicator, or `None` when nothing is attached.
pub fn attachment_label(app: &AppState) -> Option<String> {
    let state = app.session.state();
    let attachment = state.attachment()?;
    let mut label = format!(
        "File selected: {} ({})",
        attachment.file_name,
        format_size(attachment.size_bytes)
    );
    match state.upload_phase() {
        UploadPhase::Idle => {}
        UploadPhase::InFlight => label.push_str(" · uploading"),
        UploadPhase::Failed { .. } => label.push_str(" · upload failed, Ctrl+U to retry"),
    }
    Some(label)
}

pub fn render_attachment_line(frame: &mut Frame, area: Rect, app: &AppState) {
    let width = usize::from(area.width);
    let line = match attachment_label(app) {
        Some(label) => {
            let color = if app.session.state().upload_phase().is_failed() {
                Color::Red
            } else {
                Color::Green
            };
            Line::from(Span::styled(
                truncate_with_ellipsis(&label, width),
                Style::default().fg(color),
            ))
        }
        None => Line::from(Span::styled(
            "No file attached",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Renders the bordered query input and places the cursor when no overlay
/// has focus.
pub fn render_input(frame: &mut Frame, area: Rect, app: &AppState) {
    let border_color = if app.session.is_querying() {
        Color::DarkGray
    } else {
        Color::Blue
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Query ");
    let inner = block.inner(area);

    let text = app.input.text();
    let inner_width = usize::from(inner.width);
    let cursor_col = app.input.cursor_column();
    // Horizontal scroll keeps the cursor visible on long input.
    let skip = cursor_col.saturating_sub(inner_width.saturating_sub(1));
    let visible: String = {
        let mut col = 0;
        text.chars()
            .filter(|c| {
                let w = c.width().unwrap_or(0);
                let keep = col >= skip;
                col += w;
                keep
            })
            .collect()
    };

    let paragraph = if text.is_empty() {
        Paragraph::new(Span::styled(
            "Ask about your data...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Paragraph::new(visible)
    };
    frame.render_widget(paragraph.block(block), area);

    if app.overlay.is_none() {
        let x = inner.x + u16::try_from(cursor_col - skip).unwrap_or(inner.width);
        frame.set_cursor_position(Position::new(x.min(inner.right().saturating_sub(1)), inner.y));
    }
}
