//! Session state.
//!
//! A plain record of what the user currently sees: the attachment, the
//! transcript, and the pending query. Mutators accept whatever they are given;
//! validation belongs to the controller. Every mutation bumps `revision` so a
//! view can tell that it needs to redraw.

use crate::attachment::Attachment;

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    User,
    Bot,
}

/// A single transcript entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    text: String,
    sender: Sender,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }
}

/// Append-only, ordered list of messages.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Upload lifecycle for the current attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadPhase {
    #[default]
    Idle,
    /// An upload request is running.
    InFlight,
    /// The last upload failed; the attachment is kept so it can be retried.
    Failed { reason: String },
}

impl UploadPhase {
    pub fn is_failed(&self) -> bool {
        matches!(self, UploadPhase::Failed { .. })
    }
}

/// Transient UI session state.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    attachment: Option<Attachment>,
    transcript: Transcript,
    pending_query: String,
    upload_phase: UploadPhase,
    revision: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn pending_query(&self) -> &str {
        &self.pending_query
    }

    pub fn upload_phase(&self) -> &UploadPhase {
        &self.upload_phase
    }

    /// Monotonic change counter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_attachment(&mut self, attachment: Option<Attachment>) {
        self.attachment = attachment;
        self.touch();
    }

    pub fn clear_attachment(&mut self) {
        self.set_attachment(None);
    }

    pub fn append_message(&mut self, message: Message) {
        self.transcript.push(message);
        self.touch();
    }

    pub fn set_pending_query(&mut self, text: impl Into<String>) {
        self.pending_query = text.into();
        self.touch();
    }

    pub fn set_upload_phase(&mut self, phase: UploadPhase) {
        self.upload_phase = phase;
        self.touch();
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::{AttachmentId, FileCandidate};

    #[test]
    fn test_append_preserves_order() {
        let mut state = SessionState::new();
        state.append_message(Message::user("one"));
        state.append_message(Message::bot("two"));

        let texts: Vec<&str> = state
            .transcript()
            .messages()
            .iter()
            .map(Message::text)
            .collect();
        assert_eq!(texts, ["one", "two"]);
        assert_eq!(state.transcript().last().unwrap().sender(), Sender::Bot);
    }

    #[test]
    fn test_every_mutator_bumps_revision() {
        let mut state = SessionState::new();
        let start = state.revision();

        state.set_pending_query("q");
        state.append_message(Message::bot("x"));
        state.set_attachment(Some(Attachment::new(
            AttachmentId(0),
            FileCandidate::in_memory("a.csv", "a"),
        )));
        state.clear_attachment();
        state.set_upload_phase(UploadPhase::InFlight);

        assert_eq!(state.revision(), start + 5);
        assert!(state.attachment().is_none());
    }
}
