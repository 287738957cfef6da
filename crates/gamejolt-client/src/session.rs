use std::sync::{Mutex, MutexGuard};

use gamejolt_core::{Error, Result, User};
use tracing::{debug, info, warn};

/// Result of the last verification, owned by one client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Unverified,
    Verified(User),
}

/// Memoizes the last successfully verified user.
///
/// The lock is held across the remote check, so concurrent callers verifying
/// the same pair issue one request between them.
#[derive(Debug, Default)]
pub struct SessionCache {
    state: Mutex<SessionState>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify `user`, calling `remote` only when that exact pair is not
    /// already cached. A negative or failed check clears any cached user.
    pub fn verify_with<F>(&self, user: &User, remote: F) -> Result<bool>
    where
        F: FnOnce(&User) -> Result<bool>,
    {
        let mut state = self.lock();
        if let SessionState::Verified(cached) = &*state {
            if cached == user {
                debug!(username = %user.username, "verification served from session cache");
                return Ok(true);
            }
        }

        let outcome = remote(user);
        match outcome {
            Ok(true) => {
                info!(username = %user.username, "user verified");
                *state = SessionState::Verified(user.clone());
            }
            Ok(false) | Err(_) => {
                if matches!(*state, SessionState::Verified(_)) {
                    warn!(username = %user.username, "verification failed; cached session discarded");
                }
                *state = SessionState::Unverified;
            }
        }
        outcome
    }

    /// The verified user, or [`Error::Unverified`].
    pub fn require(&self) -> Result<User> {
        match &*self.lock() {
            SessionState::Verified(user) => Ok(user.clone()),
            SessionState::Unverified => Err(Error::Unverified),
        }
    }

    pub fn state(&self) -> SessionState {
        self.lock().clone()
    }

    pub fn clear(&self) {
        *self.lock() = SessionState::Unverified;
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // a panic mid-verification leaves the previous state intact
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
