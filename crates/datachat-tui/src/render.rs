//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui `Frame`, and never
//! mutate state or return effects.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::common::text::truncate_with_ellipsis;
use crate::state::AppState;
use crate::{input, transcript};

/// Height of the input box (one text row plus borders).
const INPUT_HEIGHT: u16 = 3;

/// Rows used by everything except the transcript: attachment line, input
/// box, status line.
pub const CHROME_HEIGHT: u16 = 1 + INPUT_HEIGHT + 1;

/// Transcript horizontal margin (padding on each side).
pub const TRANSCRIPT_MARGIN: u16 = 1;

/// Spinner frames for status line animation.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(1),
        ])
        .split(area);

    let transcript_area = Rect {
        x: chunks[0].x + TRANSCRIPT_MARGIN,
        width: chunks[0].width.saturating_sub(TRANSCRIPT_MARGIN * 2),
        ..chunks[0]
    };
    transcript::render_transcript(frame, transcript_area, app);
    input::render_attachment_line(frame, chunks[1], app);
    input::render_input(frame, chunks[2], app);
    render_status_line(frame, chunks[3], app);

    if let Some(overlay) = &app.overlay {
        overlay.render(frame, area);
    }
}

/// Activity text for the status line, if any operation is running.
pub fn activity_label(app: &AppState) -> Option<&'static str> {
    match (app.session.is_uploading(), app.session.is_querying()) {
        (true, true) => Some("Uploading file, waiting for answer"),
        (true, false) => Some("Uploading file"),
        (false, true) => Some("Waiting for answer"),
        (false, false) => None,
    }
}

fn render_status_line(frame: &mut Frame, area: Rect, app: &AppState) {
    let width = usize::from(area.width);
    let line = if let Some(activity) = activity_label(app) {
        let spinner = SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()];
        Line::from(vec![
            Span::styled(spinner, Style::default().fg(Color::Yellow)),
            Span::raw(" "),
            Span::styled(activity, Style::default().fg(Color::Yellow)),
        ])
    } else {
        let hints = format!(
            "Enter send · Ctrl+O attach · Ctrl+U upload · Ctrl+R remove · Esc quit · {}",
            app.backend_label
        );
        Line::from(Span::styled(
            truncate_with_ellipsis(&hints, width),
            Style::default().fg(Color::DarkGray),
        ))
    };
    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use datachat_core::attachment::FileCandidate;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::overlays::{AttachPromptState, Overlay};

    fn screen(app: &AppState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..height {
            for x in 0..width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_render_shows_transcript_and_attachment() {
        let mut app = AppState::new("http://localhost:8080");
        app.session
            .select_file(FileCandidate::in_memory("energy.csv", "room,kwh\n"));
        app.session.begin_query("What is the average?");

        let text = screen(&app, 80, 20);

        assert!(text.contains("What is the average?"));
        assert!(text.contains("File selected: energy.csv (9 B)"));
        assert!(text.contains("Waiting for answer"));
    }

    #[test]
    fn test_render_tiny_terminal_does_not_panic() {
        let mut app = AppState::new("http://localhost:8080");
        app.overlay = Some(Overlay::AttachPrompt(AttachPromptState::default()));
        app.session.begin_query("x");
        screen(&app, 8, 4);
        screen(&app, 1, 1);
    }

    #[test]
    fn test_activity_label() {
        let mut app = AppState::new("http://localhost:8080");
        assert_eq!(activity_label(&app), None);
        app.session.begin_query("q");
        assert_eq!(activity_label(&app), Some("Waiting for answer"));
    }
}
