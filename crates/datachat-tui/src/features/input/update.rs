//! Input key handling.

use crossterm::event::{KeyCode, KeyEvent};

use crate::effects::UiEffect;
use crate::state::AppState;

/// Handles a key aimed at the query input.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if key.code == KeyCode::Enter {
        return submit(app);
    }
    if app.input.handle_key(key) {
        app.sync_pending_query();
    }
    vec![]
}

pub fn handle_paste(app: &mut AppState, text: &str) {
    app.input.insert_str(text);
    app.sync_pending_query();
}

/// Sends the pending query. Rejections are reported by the session.
pub fn submit(app: &mut AppState) -> Vec<UiEffect> {
    let text = app.session.state().pending_query().to_string();
    match app.session.begin_query(&text) {
        Some(request) => vec![UiEffect::StartChat { request }],
        None => vec![],
    }
}
