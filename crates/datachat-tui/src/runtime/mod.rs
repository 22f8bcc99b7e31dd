//! TUI runtime: owns the terminal, runs the event loop, executes effects.
//!
//! This is the side-effect boundary. The reducer stays pure and returns
//! effects; this module runs them.
//!
//! ## Inbox Pattern
//!
//! Spawned tasks send their result as a `UiEvent` to `inbox_tx`. The loop
//! drains `inbox_rx` every iteration and feeds the events to the reducer, so
//! backend calls never block input or rendering.

mod inbox;
mod redraw;

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use datachat_core::attachment::FileCandidate;
use datachat_core::backend::Backend;
use inbox::{UiEventReceiver, UiEventSender};
use redraw::RedrawTracker;
use tokio::sync::mpsc;
use tracing::debug;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::terminal::TerminalGuard;
use crate::{render, update};

/// Tick interval while a request is running (spinner animation).
pub const FRAME_DURATION: Duration = Duration::from_millis(80);

/// Tick interval when nothing is happening.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(250);

/// Full-screen TUI runtime.
///
/// Owns the terminal and state. Terminal state is restored when the
/// runtime is dropped.
pub struct TuiRuntime<B> {
    terminal: TerminalGuard,
    pub state: AppState,
    backend: Arc<B>,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    last_tick: Instant,
    redraw: RedrawTracker,
}

impl<B: Backend + 'static> TuiRuntime<B> {
    /// Creates the runtime and takes over the terminal.
    ///
    /// # Errors
    /// Returns an error if the terminal can't be set up.
    pub fn new(backend: Arc<B>, backend_label: impl Into<String>) -> Result<Self> {
        let terminal = TerminalGuard::enter().context("Failed to setup terminal")?;
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            state: AppState::new(backend_label),
            backend,
            inbox_tx,
            inbox_rx,
            last_tick: Instant::now(),
            redraw: RedrawTracker::default(),
        })
    }

    /// Runs the main event loop until the user quits.
    ///
    /// Must be called from within a tokio runtime; effects are spawned onto it.
    ///
    /// # Errors
    /// Returns an error if terminal I/O fails.
    pub fn run(&mut self) -> Result<()> {
        let result = self.event_loop();
        let restored = self.terminal.restore();
        result?;
        restored
    }

    fn event_loop(&mut self) -> Result<()> {
        while !self.state.should_quit {
            let mut events = self.collect_events()?;

            let size = self.terminal.size()?;
            events.insert(
                0,
                UiEvent::Frame {
                    width: size.width,
                    height: size.height,
                },
            );

            let mut dirty = false;
            for event in events {
                dirty |= self.redraw.event_changes_view(&event, &self.state);
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            dirty |= self.redraw.session_changed(&self.state);

            if dirty {
                let state = &self.state;
                self.terminal.draw(|frame| render::render(state, frame))?;
            }
        }

        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let busy = self.state.session.is_uploading() || self.state.session.is_querying();
        let tick_interval = if busy {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns an async handler and sends its result event to the inbox.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(f().await);
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::InspectFile { path } => {
                self.spawn_effect(move || async move {
                    let result = tokio::task::spawn_blocking({
                        let path = path.clone();
                        move || FileCandidate::from_path(&path)
                    })
                    .await
                    .context("File inspection task failed")
                    .and_then(|inner| inner);
                    UiEvent::FileInspected { path, result }
                });
            }
            UiEffect::StartUpload { request } => {
                debug!(file = %request.attachment.file_name, "spawning upload");
                let backend = Arc::clone(&self.backend);
                self.spawn_effect(move || async move {
                    let result = backend.upload(&request.attachment).await;
                    UiEvent::UploadFinished {
                        ticket: request.ticket,
                        result,
                    }
                });
            }
            UiEffect::StartChat { request } => {
                let backend = Arc::clone(&self.backend);
                self.spawn_effect(move || async move {
                    let result = backend.chat(&request.query).await;
                    UiEvent::ChatFinished {
                        ticket: request.ticket,
                        result,
                    }
                });
            }
        }
    }
}
