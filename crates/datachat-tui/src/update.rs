//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use tracing::debug;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::overlays::{AttachPromptState, Overlay, OverlayTransition};
use crate::render::{CHROME_HEIGHT, TRANSCRIPT_MARGIN};
use crate::state::AppState;
use crate::{input, transcript};

/// Lines moved per mouse wheel notch.
const MOUSE_SCROLL_LINES: usize = 3;

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    let messages_before = app.session.state().transcript().len();
    let effects = dispatch(app, event);
    // New messages always bring the view back to the latest one.
    if app.session.state().transcript().len() > messages_before {
        app.transcript.follow_latest();
    }
    effects
}

fn dispatch(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.spinner_frame = app.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Frame { width, height } => {
            app.transcript.set_viewport(
                usize::from(width.saturating_sub(TRANSCRIPT_MARGIN * 2)),
                usize::from(height.saturating_sub(CHROME_HEIGHT)),
            );
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::FileInspected { path, result } => {
            match result {
                Ok(candidate) => {
                    debug!(path = %path.display(), "file inspected");
                    app.session.select_file(candidate);
                }
                Err(err) => app.session.report_unreadable_file(&err),
            }
            vec![]
        }
        UiEvent::UploadFinished { ticket, result } => {
            app.session.finish_upload(ticket, result);
            vec![]
        }
        UiEvent::ChatFinished { ticket, result } => {
            app.session.finish_query(ticket, result);
            app.sync_input_from_session();
            vec![]
        }
    }
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Paste(text) => {
            if let Some(overlay) = app.overlay.as_mut() {
                overlay.handle_paste(&text);
            } else {
                input::handle_paste(app, &text);
            }
            vec![]
        }
        Event::Mouse(mouse) => {
            match mouse.kind {
                MouseEventKind::ScrollUp => scroll_up(app, MOUSE_SCROLL_LINES),
                MouseEventKind::ScrollDown => app.transcript.scroll_down(MOUSE_SCROLL_LINES),
                _ => {}
            }
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if let Some(overlay) = app.overlay.as_mut() {
        let update = overlay.handle_key(key);
        if update.transition == OverlayTransition::Close {
            app.overlay = None;
        }
        return update.effects;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => vec![UiEffect::Quit],
        KeyCode::Esc => vec![UiEffect::Quit],
        KeyCode::Char('o') if ctrl => {
            app.overlay = Some(Overlay::AttachPrompt(AttachPromptState::default()));
            vec![]
        }
        KeyCode::Char('u') if ctrl => match app.session.begin_upload() {
            Some(request) => vec![UiEffect::StartUpload { request }],
            None => vec![],
        },
        KeyCode::Char('r') if ctrl => {
            app.session.remove_file();
            vec![]
        }
        KeyCode::PageUp => {
            scroll_up(app, app.transcript.page_size());
            vec![]
        }
        KeyCode::PageDown => {
            let page = app.transcript.page_size();
            app.transcript.scroll_down(page);
            vec![]
        }
        KeyCode::Up => {
            scroll_up(app, 1);
            vec![]
        }
        KeyCode::Down => {
            app.transcript.scroll_down(1);
            vec![]
        }
        _ => input::handle_key(app, key),
    }
}

fn scroll_up(app: &mut AppState, lines: usize) {
    let total = transcript::line_count(
        app.session.state().transcript().messages(),
        app.transcript.viewport_width(),
    );
    app.transcript.scroll_up(lines, total);
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use datachat_core::attachment::FileCandidate;
    use datachat_core::backend::{BackendError, ChatReply};
    use datachat_core::session::{Message, Sender, UploadPhase};

    use super::*;

    fn app() -> AppState {
        AppState::new("http://localhost:8080")
    }

    fn press(app: &mut AppState, code: KeyCode) -> Vec<UiEffect> {
        update(
            app,
            UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE))),
        )
    }

    fn ctrl(app: &mut AppState, c: char) -> Vec<UiEffect> {
        update(
            app,
            UiEvent::Terminal(Event::Key(KeyEvent::new(
                KeyCode::Char(c),
                KeyModifiers::CONTROL,
            ))),
        )
    }

    fn type_str(app: &mut AppState, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn last_text(app: &AppState) -> String {
        app.session
            .state()
            .transcript()
            .last()
            .map(|m| m.text().to_string())
            .unwrap_or_default()
    }

    #[test]
    fn test_typing_updates_pending_query() {
        let mut app = app();
        type_str(&mut app, "avg?");
        assert_eq!(app.session.state().pending_query(), "avg?");

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.session.state().pending_query(), "avg");
    }

    #[test]
    fn test_enter_starts_chat_and_echoes_query() {
        let mut app = app();
        type_str(&mut app, "What is the average?");

        let effects = press(&mut app, KeyCode::Enter);

        let [UiEffect::StartChat { request }] = effects.as_slice() else {
            panic!("expected StartChat, got {effects:?}");
        };
        assert_eq!(request.query, "What is the average?");
        assert_eq!(
            app.session.state().transcript().last(),
            Some(&Message::user("What is the average?"))
        );
        // Input stays until the answer arrives.
        assert_eq!(app.input.text(), "What is the average?");
    }

    #[test]
    fn test_chat_finished_appends_answer_and_clears_input() {
        let mut app = app();
        type_str(&mut app, "q");
        let effects = press(&mut app, KeyCode::Enter);
        let Some(UiEffect::StartChat { request }) = effects.into_iter().next() else {
            panic!("expected StartChat");
        };

        update(
            &mut app,
            UiEvent::ChatFinished {
                ticket: request.ticket,
                result: Ok(ChatReply::answer("42")),
            },
        );

        assert_eq!(last_text(&app), "42");
        assert_eq!(app.input.text(), "");
        assert_eq!(app.session.state().pending_query(), "");
    }

    #[test]
    fn test_enter_on_blank_input_reports_and_keeps_text() {
        let mut app = app();
        type_str(&mut app, "   ");

        let effects = press(&mut app, KeyCode::Enter);

        assert!(effects.is_empty());
        assert_eq!(last_text(&app), "Please enter a query.");
        assert_eq!(app.input.text(), "   ");
    }

    #[test]
    fn test_second_enter_while_waiting_is_rejected() {
        let mut app = app();
        type_str(&mut app, "first");
        assert_eq!(press(&mut app, KeyCode::Enter).len(), 1);

        let effects = press(&mut app, KeyCode::Enter);

        assert!(effects.is_empty());
        assert_eq!(last_text(&app), "Please wait for the previous answer.");
        assert_eq!(app.session.state().transcript().len(), 2);
    }

    #[test]
    fn test_ctrl_u_without_file_reports_missing_file() {
        let mut app = app();
        let effects = ctrl(&mut app, 'u');
        assert!(effects.is_empty());
        assert_eq!(last_text(&app), "Please select a file before uploading.");
    }

    #[test]
    fn test_attach_prompt_flow() {
        let mut app = app();
        ctrl(&mut app, 'o');
        assert!(app.overlay.is_some());

        update(
            &mut app,
            UiEvent::Terminal(Event::Paste("/data/energy.csv".to_string())),
        );
        let effects = press(&mut app, KeyCode::Enter);

        assert!(app.overlay.is_none());
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::InspectFile { path }] if path == &PathBuf::from("/data/energy.csv")
        ));
        // Overlay input never reaches the query.
        assert_eq!(app.session.state().pending_query(), "");
    }

    #[test]
    fn test_file_inspected_then_upload_roundtrip() {
        let mut app = app();
        update(
            &mut app,
            UiEvent::FileInspected {
                path: PathBuf::from("energy.csv"),
                result: Ok(FileCandidate::in_memory("energy.csv", "room,kwh\n")),
            },
        );
        assert!(app.session.state().attachment().is_some());

        let effects = ctrl(&mut app, 'u');
        let Some(UiEffect::StartUpload { request }) = effects.into_iter().next() else {
            panic!("expected StartUpload");
        };
        assert_eq!(app.session.state().upload_phase(), &UploadPhase::InFlight);

        update(
            &mut app,
            UiEvent::UploadFinished {
                ticket: request.ticket,
                result: Err(BackendError::Status {
                    status: 500,
                    body: Some("Failed to process file".to_string()),
                }),
            },
        );
        assert_eq!(last_text(&app), "Failed to process file");
        assert!(app.session.state().upload_phase().is_failed());

        // Retry with the same attachment.
        let effects = ctrl(&mut app, 'u');
        let Some(UiEffect::StartUpload { request }) = effects.into_iter().next() else {
            panic!("expected StartUpload on retry");
        };
        update(
            &mut app,
            UiEvent::UploadFinished {
                ticket: request.ticket,
                result: Ok(()),
            },
        );
        assert_eq!(last_text(&app), "File uploaded successfully!");
        assert!(app.session.state().attachment().is_none());
    }

    #[test]
    fn test_unreadable_file_is_reported() {
        let mut app = app();
        update(
            &mut app,
            UiEvent::FileInspected {
                path: PathBuf::from("/missing"),
                result: Err(anyhow::anyhow!("Failed to inspect /missing")),
            },
        );
        let last = app.session.state().transcript().last().unwrap();
        assert_eq!(last.sender(), Sender::Bot);
        assert_eq!(last.text(), "Could not read the selected file.");
    }

    #[test]
    fn test_ctrl_r_removes_attachment_silently() {
        let mut app = app();
        app.session
            .select_file(FileCandidate::in_memory("a.csv", "x"));
        ctrl(&mut app, 'r');
        assert!(app.session.state().attachment().is_none());
        assert!(app.session.state().transcript().is_empty());
    }

    #[test]
    fn test_new_message_resets_scroll() {
        let mut app = app();
        for i in 0..30 {
            app.session.set_pending_query(format!("q{i}"));
            app.session.begin_query(&format!("q{i}"));
        }
        update(&mut app, UiEvent::Frame { width: 40, height: 15 });
        press(&mut app, KeyCode::PageUp);
        assert!(!app.transcript.is_following());

        ctrl(&mut app, 'u');
        assert!(app.transcript.is_following());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert!(matches!(ctrl(&mut app, 'c').as_slice(), [UiEffect::Quit]));
        assert!(matches!(press(&mut app, KeyCode::Esc).as_slice(), [UiEffect::Quit]));
    }

    #[test]
    fn test_escape_closes_overlay_before_quitting() {
        let mut app = app();
        ctrl(&mut app, 'o');
        assert!(press(&mut app, KeyCode::Esc).is_empty());
        assert!(app.overlay.is_none());
    }
}
