//! Attach overlay: prompts for the path of the file to attach.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::{OverlayUpdate, centered, render_container, render_hints};
use crate::common::text::truncate_with_ellipsis;
use crate::effects::UiEffect;
use crate::input::LineEditor;

const OVERLAY_WIDTH: u16 = 60;
const OVERLAY_HEIGHT: u16 = 5;

/// State for the attach prompt.
#[derive(Debug, Clone, Default)]
pub struct AttachPromptState {
    pub path: LineEditor,
    /// Shown when Enter is pressed on an empty path.
    pub error: Option<String>,
}

impl AttachPromptState {
    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if !matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            self.error = None;
        }

        match key.code {
            KeyCode::Esc => OverlayUpdate::close(),
            KeyCode::Char('c') if ctrl => OverlayUpdate::close(),
            KeyCode::Enter => {
                let raw = self.path.text().trim();
                if raw.is_empty() {
                    self.error = Some("Enter a file path".to_string());
                    return OverlayUpdate::stay();
                }
                OverlayUpdate::close().with_ui_effects(vec![UiEffect::InspectFile {
                    path: expand_home(raw),
                }])
            }
            _ => {
                self.path.handle_key(key);
                OverlayUpdate::stay()
            }
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        self.error = None;
        self.path.insert_str(text.trim());
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = centered(area, OVERLAY_WIDTH, OVERLAY_HEIGHT);
        let inner = render_container(frame, popup, "Attach file", Color::Yellow);
        if inner.height < 2 {
            return;
        }

        let input_area = Rect::new(inner.x, inner.y, inner.width, 1);
        let max_width = usize::from(inner.width.saturating_sub(2));
        let line = if self.path.text().is_empty() {
            Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Yellow)),
                Span::styled("path/to/data.csv", Style::default().fg(Color::DarkGray)),
            ])
        } else {
            Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Yellow)),
                Span::raw(truncate_with_ellipsis(self.path.text(), max_width)),
            ])
        };
        frame.render_widget(Paragraph::new(line), input_area);

        let cursor = u16::try_from(self.path.cursor_column().min(max_width)).unwrap_or(0);
        frame.set_cursor_position(Position::new(input_area.x + 2 + cursor, input_area.y));

        if let Some(error) = &self.error {
            let error_area = Rect::new(inner.x, inner.y + 1, inner.width, 1);
            frame.render_widget(
                Paragraph::new(Span::styled(error.as_str(), Style::default().fg(Color::Red))),
                error_area,
            );
        }

        let hints_area = Rect::new(inner.x, inner.bottom().saturating_sub(1), inner.width, 1);
        render_hints(
            frame,
            hints_area,
            &[("Enter", "attach"), ("Esc", "cancel")],
            Color::Yellow,
        );
    }
}

/// Expands a leading `~/` to the home directory.
fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/")
        && let Ok(home) = std::env::var("HOME")
    {
        return PathBuf::from(home).join(rest);
    }
    PathBuf::from(raw)
}
