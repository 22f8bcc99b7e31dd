//! Interaction controller.
//!
//! Owns the session state and is the only code that mutates it. Operations
//! that need the network are split into `begin_*` (validate + mutate, returns
//! a request when a call is needed) and `finish_*` (apply the backend result),
//! so an event loop can run the call on another task. `upload` and
//! `send_query` chain both halves for callers that can simply await.
//!
//! ## Operation lifecycle
//!
//! ```text
//! Idle -> Validating -> Idle                      (rejected locally)
//!                    -> Calling -> Succeeded -> Idle
//!                               -> Failed    -> Idle
//! ```
//!
//! Each network operation has its own in-flight guard: a second `begin_*`
//! while one is running is rejected with a notice instead of racing.

use tracing::{debug, info, warn};

use crate::attachment::{Attachment, AttachmentId, FileCandidate};
use crate::backend::{Backend, BackendError, ChatReply};
use crate::catalog::Notice;
use crate::inflight::{InFlight, RequestId};
use crate::session::{Message, SessionState, UploadPhase};

/// How an operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operation did what the user asked.
    Succeeded,
    /// A backend call was made and failed (or reported an error).
    Failed,
    /// Validation stopped the operation before any network call.
    Rejected,
    /// The result belonged to a request that is no longer active.
    Ignored,
}

/// Proof that an upload was started; hand it back to `finish_upload`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket {
    request: RequestId,
    attachment: AttachmentId,
}

/// An upload the caller should send to the backend.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub ticket: UploadTicket,
    pub attachment: Attachment,
}

/// Proof that a query was started; hand it back to `finish_query`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatTicket {
    request: RequestId,
}

/// A query the caller should send to the backend.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub ticket: ChatTicket,
    pub query: String,
}

/// Validates user actions, drives backend calls, and records the results.
#[derive(Debug, Default)]
pub struct Controller {
    state: SessionState,
    uploads: InFlight,
    queries: InFlight,
    next_attachment: u64,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_uploading(&self) -> bool {
        self.uploads.is_busy()
    }

    pub fn is_querying(&self) -> bool {
        self.queries.is_busy()
    }

    /// Replaces the pending query buffer (the text being typed).
    pub fn set_pending_query(&mut self, text: impl Into<String>) {
        self.state.set_pending_query(text);
    }

    // ========================================================================
    // Attachment operations
    // ========================================================================

    /// Accepts a file as the attachment, or rejects it if it is too large.
    pub fn select_file(&mut self, candidate: FileCandidate) -> Outcome {
        if !candidate.fits_upload_limit() {
            info!(
                file = %candidate.file_name,
                size = candidate.size_bytes,
                "rejected oversized file"
            );
            self.notice(Notice::FileTooLarge);
            self.state.clear_attachment();
            self.reset_failed_upload();
            return Outcome::Rejected;
        }

        let id = AttachmentId(self.next_attachment);
        self.next_attachment = self.next_attachment.wrapping_add(1);
        debug!(file = %candidate.file_name, size = candidate.size_bytes, "attachment selected");
        self.state
            .set_attachment(Some(Attachment::new(id, candidate)));
        self.reset_failed_upload();
        Outcome::Succeeded
    }

    /// Records that a picked path could not be turned into a candidate.
    pub fn report_unreadable_file(&mut self, error: &anyhow::Error) {
        warn!("file selection failed: {error:#}");
        self.notice(Notice::FileUnreadable);
    }

    /// Drops the attachment. No message, no network call.
    pub fn remove_file(&mut self) {
        self.state.clear_attachment();
        self.reset_failed_upload();
    }

    /// Validates an upload and marks it in flight.
    ///
    /// Returns `None` when the upload was rejected locally; the reason has
    /// already been appended to the transcript.
    pub fn begin_upload(&mut self) -> Option<UploadRequest> {
        let Some(attachment) = self.state.attachment().cloned() else {
            self.notice(Notice::NoFileSelected);
            return None;
        };
        let Some(request) = self.uploads.try_begin() else {
            self.notice(Notice::UploadInProgress);
            return None;
        };

        self.state.set_upload_phase(UploadPhase::InFlight);
        debug!(file = %attachment.file_name, "upload started");
        Some(UploadRequest {
            ticket: UploadTicket {
                request,
                attachment: attachment.id,
            },
            attachment,
        })
    }

    /// Applies the backend result of an upload.
    pub fn finish_upload(
        &mut self,
        ticket: UploadTicket,
        result: Result<(), BackendError>,
    ) -> Outcome {
        if !self.uploads.finish_if_active(ticket.request) {
            return Outcome::Ignored;
        }
        let still_attached = self.state.attachment().map(|a| a.id) == Some(ticket.attachment);

        match result {
            Ok(()) => {
                info!("upload succeeded");
                self.notice(Notice::UploadSucceeded);
                if still_attached {
                    self.state.clear_attachment();
                }
                self.state.set_upload_phase(UploadPhase::Idle);
                Outcome::Succeeded
            }
            Err(err) => {
                warn!("upload failed: {err}");
                let text = err
                    .body()
                    .map_or_else(|| Notice::UploadFailed.text().to_string(), |body| {
                        body.trim_end().to_string()
                    });
                self.state.append_message(Message::bot(text.clone()));
                let phase = if still_attached {
                    UploadPhase::Failed { reason: text }
                } else {
                    UploadPhase::Idle
                };
                self.state.set_upload_phase(phase);
                Outcome::Failed
            }
        }
    }

    /// Validates, sends, and records an upload in one call.
    pub async fn upload<B: Backend>(&mut self, backend: &B) -> Outcome {
        let Some(request) = self.begin_upload() else {
            return Outcome::Rejected;
        };
        let result = backend.upload(&request.attachment).await;
        self.finish_upload(request.ticket, result)
    }

    // ========================================================================
    // Query operations
    // ========================================================================

    /// Validates a query, echoes it to the transcript, and marks it in flight.
    ///
    /// Returns `None` when the query was rejected locally. The pending query
    /// is left untouched on that path.
    pub fn begin_query(&mut self, text: &str) -> Option<ChatRequest> {
        if text.trim().is_empty() {
            self.notice(Notice::EmptyQuery);
            return None;
        }
        let Some(request) = self.queries.try_begin() else {
            self.notice(Notice::QueryInProgress);
            return None;
        };

        self.state.append_message(Message::user(text));
        Some(ChatRequest {
            ticket: ChatTicket { request },
            query: text.to_string(),
        })
    }

    /// Applies the backend result of a query and clears the pending query.
    pub fn finish_query(
        &mut self,
        ticket: ChatTicket,
        result: Result<ChatReply, BackendError>,
    ) -> Outcome {
        if !self.queries.finish_if_active(ticket.request) {
            return Outcome::Ignored;
        }

        let outcome = match result {
            Ok(ChatReply {
                answer: Some(answer),
                ..
            }) => {
                self.state.append_message(Message::bot(answer));
                Outcome::Succeeded
            }
            Ok(ChatReply {
                error: Some(error), ..
            }) => {
                info!("backend reported an error: {error}");
                self.state.append_message(Message::bot(error));
                Outcome::Failed
            }
            Ok(ChatReply { .. }) => {
                self.notice(Notice::NoValidResponse);
                Outcome::Failed
            }
            Err(err) => {
                warn!("chat request failed: {err}");
                let text = err
                    .structured_message()
                    .or_else(|| err.generic_message())
                    .unwrap_or_else(|| Notice::SomethingWentWrong.text().to_string());
                self.state.append_message(Message::bot(text));
                Outcome::Failed
            }
        };

        self.state.set_pending_query(String::new());
        outcome
    }

    /// Validates, sends, and records a query in one call.
    pub async fn send_query<B: Backend>(&mut self, backend: &B, text: &str) -> Outcome {
        let Some(request) = self.begin_query(text) else {
            return Outcome::Rejected;
        };
        let result = backend.chat(&request.query).await;
        self.finish_query(request.ticket, result)
    }

    fn notice(&mut self, notice: Notice) {
        self.state.append_message(Message::bot(notice.text()));
    }

    fn reset_failed_upload(&mut self) {
        if self.state.upload_phase().is_failed() {
            self.state.set_upload_phase(UploadPhase::Idle);
        }
    }
}
