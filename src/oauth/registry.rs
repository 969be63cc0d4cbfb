//! Registry of pending login continuations
//!
//! Replaces serialized-callback state with an opaque token into process-wide
//! memory: the redirect URL carries the token, the registry keeps the action
//! and its captured state. Entries are consumed exactly once on resume and
//! discarded; abandoned entries can be swept with [`ContinuationRegistry::purge_older_than`].

use chrono::{DateTime, Duration, Utc};
use log::debug;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// A stored continuation together with the state captured before redirecting
pub struct PendingLogin {
    continuation: Box<dyn FnOnce(bool) + Send>,
    /// Page URL the provider will send the user back to
    pub return_url: String,
    pub created_at: DateTime<Utc>,
}

impl PendingLogin {
    /// Capture a continuation to resume once the user returns
    pub fn new(return_url: impl Into<String>, continuation: impl FnOnce(bool) + Send + 'static) -> Self {
        Self {
            continuation: Box::new(continuation),
            return_url: return_url.into(),
            created_at: Utc::now(),
        }
    }
}

impl std::fmt::Debug for PendingLogin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingLogin")
            .field("return_url", &self.return_url)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Process-wide mapping from opaque tokens to pending login continuations
#[derive(Default)]
pub struct ContinuationRegistry {
    pending: Mutex<HashMap<String, PendingLogin>>,
}

impl ContinuationRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a pending login and hand back the token identifying it
    ///
    /// The token is the only thing that may leave the process; it carries no
    /// information beyond identity.
    pub fn register(&self, pending: PendingLogin) -> String {
        let token = Uuid::new_v4().simple().to_string();
        debug!(
            "Registered pending login continuation for return to {}",
            pending.return_url
        );
        self.lock().insert(token.clone(), pending);
        token
    }

    /// Resume and discard the continuation stored under `token`
    ///
    /// At-most-once: the entry is removed before the continuation runs, so a
    /// second delivery of the same token finds nothing. Returns whether a
    /// continuation fired.
    pub fn resume(&self, token: &str, success: bool) -> bool {
        let entry = self.lock().remove(token);
        match entry {
            Some(pending) => {
                debug!(
                    "Resuming login continuation (success: {success}, registered at {})",
                    pending.created_at
                );
                (pending.continuation)(success);
                true
            }
            None => {
                debug!("No pending continuation for presented token; ignoring");
                false
            }
        }
    }

    /// Drop entries older than `max_age` without running them
    ///
    /// Returns the number of entries removed.
    pub fn purge_older_than(&self, max_age: Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        let mut pending = self.lock();
        let before = pending.len();
        pending.retain(|_, entry| entry.created_at > cutoff);
        before - pending.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, PendingLogin>> {
        // A continuation that panicked while running does not poison stored
        // state in any way we care to preserve
        self.pending
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
