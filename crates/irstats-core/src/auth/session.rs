use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};

use crate::api::AuthFailure;

/// Cookie the membersite sets on a successful login
pub const SESSION_COOKIE: &str = "irsso_membersv2";

/// Point-in-time view of the session, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub authenticated: bool,
    pub authenticated_at: Option<DateTime<Utc>>,
    pub login_attempts: u64,
}

/// Login gate shared by every clone of a client.
///
/// Once authenticated the session is never re-checked. Login attempts are
/// serialized: a caller that queued behind an in-flight attempt takes that
/// attempt's outcome rather than sending its own login request.
///
/// Reading the session state never waits on an in-flight login.
#[derive(Debug, Default)]
pub struct Session {
    authenticated: AtomicBool,
    authenticated_at: Mutex<Option<DateTime<Utc>>>,
    // Completed attempts; only incremented while `gate` is held
    attempts: AtomicU64,
    // Held for the whole login round trip; stores the last failure
    gate: tokio::sync::Mutex<Option<AuthFailure>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::Acquire)
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            authenticated: self.is_authenticated(),
            authenticated_at: *self
                .authenticated_at
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
            login_attempts: self.attempts.load(Ordering::Acquire),
        }
    }

    /// Succeed immediately if authenticated, otherwise run `login` once.
    pub async fn ensure<F, Fut>(&self, login: F) -> Result<(), AuthFailure>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), AuthFailure>>,
    {
        if self.is_authenticated() {
            return Ok(());
        }

        let seen = self.attempts.load(Ordering::Acquire);
        let mut last_failure = self.gate.lock().await;

        if self.is_authenticated() {
            return Ok(());
        }
        if self.attempts.load(Ordering::Acquire) != seen {
            // An attempt finished while we waited and it did not authenticate
            return Err(last_failure
                .clone()
                .unwrap_or(AuthFailure::MissingSessionCookie));
        }

        let outcome = login().await;
        match outcome {
            Ok(()) => {
                *self
                    .authenticated_at
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner) = Some(Utc::now());
                self.authenticated.store(true, Ordering::Release);
                *last_failure = None;
            }
            Err(ref failure) => {
                *last_failure = Some(failure.clone());
            }
        }
        self.attempts.fetch_add(1, Ordering::AcqRel);
        outcome
    }
}
