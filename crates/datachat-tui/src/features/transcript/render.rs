//! Transcript rendering.
//!
//! User messages are right-aligned, bot messages left-aligned, each under a
//! short sender label and separated by a blank line.

use datachat_core::session::{Message, Sender};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::common::text::{sanitize_for_display, wrap_text};
use crate::state::AppState;

/// Share of the pane width a message may use before wrapping.
const BUBBLE_WIDTH_PERCENT: usize = 80;

fn bubble_width(width: usize) -> usize {
    (width * BUBBLE_WIDTH_PERCENT / 100).max(1)
}

/// Builds the styled lines for the whole transcript at `width` columns.
pub fn transcript_lines(messages: &[Message], width: usize) -> Vec<Line<'static>> {
    let wrap_width = bubble_width(width);
    let mut lines = Vec::new();

    for (idx, message) in messages.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::default());
        }

        let (label, alignment, style) = match message.sender() {
            Sender::User => (
                "You",
                Alignment::Right,
                Style::default().fg(Color::Cyan),
            ),
            Sender::Bot => ("Bot", Alignment::Left, Style::default()),
        };

        lines.push(
            Line::from(Span::styled(
                label,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            ))
            .alignment(alignment),
        );

        let text = sanitize_for_display(message.text());
        for row in wrap_text(&text, wrap_width) {
            lines.push(Line::from(Span::styled(row, style)).alignment(alignment));
        }
    }

    lines
}

/// Number of rendered lines for `messages` at `width` columns.
pub fn line_count(messages: &[Message], width: usize) -> usize {
    let wrap_width = bubble_width(width);
    messages
        .iter()
        .enumerate()
        .map(|(idx, message)| {
            let separator = usize::from(idx > 0);
            let body = wrap_text(&sanitize_for_display(message.text()), wrap_width).len();
            separator + 1 + body
        })
        .sum()
}

pub fn render_transcript(frame: &mut Frame, area: Rect, app: &AppState) {
    let messages = app.session.state().transcript().messages();
    let height = usize::from(area.height);

    if messages.is_empty() {
        let hint = Paragraph::new(Line::from(Span::styled(
            "Attach a file with Ctrl+O, then ask a question.",
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(hint, area);
        return;
    }

    let lines = transcript_lines(messages, usize::from(area.width));
    let total = lines.len();
    let max_offset = total.saturating_sub(height);
    let offset = app.transcript.offset_from_bottom().min(max_offset);
    let start = total.saturating_sub(height + offset);

    let mut visible: Vec<Line<'static>> = lines.into_iter().skip(start).take(height).collect();
    // Bottom-align short transcripts.
    if visible.len() < height {
        let mut padded = vec![Line::default(); height - visible.len()];
        padded.append(&mut visible);
        visible = padded;
    }

    frame.render_widget(Paragraph::new(visible), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_count_matches_rendered_lines() {
        let messages = vec![
            Message::user("What is the average consumption per room?"),
            Message::bot("42"),
            Message::bot("line one\nline two"),
        ];
        for width in [10, 30, 80] {
            assert_eq!(
                line_count(&messages, width),
                transcript_lines(&messages, width).len()
            );
        }
    }

    #[test]
    fn test_user_lines_are_right_aligned() {
        let lines = transcript_lines(&[Message::user("hi"), Message::bot("hello")], 40);
        assert_eq!(lines[0].alignment, Some(Alignment::Right));
        assert_eq!(lines[1].alignment, Some(Alignment::Right));
        assert_eq!(lines[3].alignment, Some(Alignment::Left));
        assert_eq!(lines[4].to_string(), "hello");
    }
}
