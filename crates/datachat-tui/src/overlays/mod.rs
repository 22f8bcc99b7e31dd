//! Modal overlays drawn above the chat view.

mod attach;

pub use attach::AttachPromptState;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::effects::UiEffect;

/// Transition returned by overlay key handlers.
#[derive(Debug, PartialEq, Eq)]
pub enum OverlayTransition {
    Stay,
    Close,
}

/// Update returned by overlay key handlers.
#[derive(Debug)]
pub struct OverlayUpdate {
    pub transition: OverlayTransition,
    pub effects: Vec<UiEffect>,
}

impl OverlayUpdate {
    pub fn stay() -> Self {
        Self {
            transition: OverlayTransition::Stay,
            effects: Vec::new(),
        }
    }

    pub fn close() -> Self {
        Self {
            transition: OverlayTransition::Close,
            effects: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_ui_effects(mut self, effects: Vec<UiEffect>) -> Self {
        self.effects = effects;
        self
    }
}

#[derive(Debug)]
pub enum Overlay {
    AttachPrompt(AttachPromptState),
}

impl Overlay {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        match self {
            Overlay::AttachPrompt(p) => p.render(frame, area),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        match self {
            Overlay::AttachPrompt(p) => p.handle_key(key),
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        match self {
            Overlay::AttachPrompt(p) => p.handle_paste(text),
        }
    }
}

/// Centers a `width` x `height` popup inside `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Clears the popup area and draws a titled border. Returns the inner area.
fn render_container(frame: &mut Frame, popup: Rect, title: &str, border_color: Color) -> Rect {
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {title} "))
        .title_style(
            Style::default()
                .fg(border_color)
                .add_modifier(Modifier::BOLD),
        );
    let inner = block.inner(popup);
    frame.render_widget(block, popup);
    inner
}

/// Renders `key action` pairs on one line.
fn render_hints(frame: &mut Frame, area: Rect, hints: &[(&str, &str)], color: Color) {
    let mut spans = Vec::new();
    for (idx, (key, action)) in hints.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(*key, Style::default().fg(color)));
        spans.push(Span::styled(
            format!(" {action}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
