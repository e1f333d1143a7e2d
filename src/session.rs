//! Login gate and dashboard state.
//!
//! A [`Session`] starts logged out and flips once the shared password is
//! entered. The [`Dashboard`] owns the data source and the current scored
//! snapshot; [`Dashboard::reload`] swaps the whole snapshot in one go.

use std::sync::Arc;
use tracing::{info, warn};

use crate::aggregate::ScoredTable;
use crate::error::AuthError;
use crate::loader::load_from;
use crate::source::SubmissionSource;

/// The single shared dashboard password.
pub struct PasswordGate {
    secret: String,
}

impl PasswordGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Verbatim comparison, no trimming.
    pub fn check(&self, input: &str) -> bool {
        input == self.secret
    }
}

#[derive(Debug, Default)]
pub struct Session {
    logged_in: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    /// Marks the session as logged in when `input` matches the gate. A wrong
    /// password leaves the session untouched and can simply be retried.
    pub fn login(&mut self, gate: &PasswordGate, input: &str) -> Result<(), AuthError> {
        if gate.check(input) {
            self.logged_in = true;
            info!("Dashboard login succeeded");
            Ok(())
        } else {
            warn!("Dashboard login rejected");
            Err(AuthError::WrongPassword)
        }
    }

    pub fn logout(&mut self) {
        self.logged_in = false;
    }
}

/// What happened on the last reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Loaded { rows: usize },
    /// The fetch failed; the snapshot is now empty.
    Failed { message: String },
}

pub struct Dashboard<S> {
    source: S,
    snapshot: Arc<ScoredTable>,
}

impl<S: SubmissionSource> Dashboard<S> {
    /// Creates a dashboard with an empty snapshot. Call [`Self::reload`] to
    /// fetch data.
    pub fn new(source: S) -> Self {
        Self {
            source,
            snapshot: Arc::new(ScoredTable::default()),
        }
    }

    /// Fetches every record again and replaces the snapshot.
    pub async fn reload(&mut self) -> RefreshOutcome {
        let outcome = load_from(&self.source).await;
        self.snapshot = Arc::new(ScoredTable::from_table(&outcome.table));

        match outcome.error {
            Some(message) => RefreshOutcome::Failed { message },
            None => RefreshOutcome::Loaded {
                rows: self.snapshot.len(),
            },
        }
    }

    /// The current snapshot, for logged-in sessions only.
    ///
    /// The returned handle stays valid after a later reload.
    pub fn snapshot(&self, session: &Session) -> Result<Arc<ScoredTable>, AuthError> {
        if !session.is_logged_in() {
            return Err(AuthError::NotLoggedIn);
        }
        Ok(Arc::clone(&self.snapshot))
    }
}
