//! In-flight guard for network-triggering operations.

/// Opaque id matching an async result to the request that started it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

/// Allows at most one active request and ignores stale results.
#[derive(Debug, Default)]
pub struct InFlight {
    next: u64,
    active: Option<RequestId>,
}

impl InFlight {
    /// Starts a request unless one is already active.
    pub fn try_begin(&mut self) -> Option<RequestId> {
        if self.active.is_some() {
            return None;
        }
        let id = RequestId(self.next);
        self.next = self.next.wrapping_add(1);
        self.active = Some(id);
        Some(id)
    }

    /// Returns true if the provided id is still the active request.
    pub fn is_active(&self, id: RequestId) -> bool {
        self.active == Some(id)
    }

    /// Returns true if any request is active.
    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    /// Finish the request if it's still active.
    pub fn finish_if_active(&mut self, id: RequestId) -> bool {
        if self.is_active(id) {
            self.active = None;
            true
        } else {
            false
        }
    }
}
