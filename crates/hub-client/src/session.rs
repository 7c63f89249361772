//! The client session: one authentication record per running client.
//!
//! The session owns the in-memory token and mirrors it into a [`TokenStore`].
//! State lives in a `tokio::sync::watch` channel so observers (the navigation
//! controller, status lines) can read the current authentication state at any
//! time or await changes, without any lock held across an await point.
//!
//! # Lifecycle
//!
//! 1. [`Session::hydrate`] reads the persisted token once at startup
//! 2. [`Session::set_token`] is the only token mutator (login sets, logout clears)
//! 3. Dropping the session needs no cleanup; durable storage is the source of
//!    truth across restarts
//!
//! # Invariant
//!
//! A token held in memory is always present in durable storage. `set_token`
//! writes storage first and only then publishes the new state, so a failed
//! write leaves the session exactly as it was.

use crate::errors::StorageError;
use crate::models::UserProfile;
use crate::storage::{MemoryTokenStore, TokenStore};
use common::secret::{ExposeSecret, SecretString};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// Snapshot of everything the session holds.
#[derive(Clone, Default)]
struct SessionState {
    token: Option<SecretString>,
    user: Option<UserProfile>,
}

/// Authentication state derived from the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub user: Option<UserProfile>,
}

fn auth_state_of(state: &SessionState) -> AuthState {
    AuthState {
        is_authenticated: state.token.is_some(),
        user: state.user.clone(),
    }
}

/// The authentication record of a running client.
///
/// Share it as `Arc<Session>` between the API client and any observers.
pub struct Session {
    store: Arc<dyn TokenStore>,
    state: watch::Sender<SessionState>,
}

impl Session {
    /// Create a session hydrated from the persisted token, if any.
    ///
    /// No network call is made: a persisted token alone makes the session
    /// authenticated.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub fn hydrate(store: Arc<dyn TokenStore>) -> Result<Self, StorageError> {
        let token = store.load()?;

        if token.is_some() {
            info!("Restored persisted session");
        } else {
            debug!("No persisted session");
        }

        let (state, _) = watch::channel(SessionState { token, user: None });
        Ok(Self { store, state })
    }

    /// Create an unauthenticated session backed by a fresh in-memory store.
    #[must_use]
    pub fn ephemeral() -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            store: Arc::new(MemoryTokenStore::new()),
            state,
        }
    }

    /// Current token, if any.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.state.borrow().token.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().token.is_some()
    }

    #[must_use]
    pub fn auth_state(&self) -> AuthState {
        auth_state_of(&self.state.borrow())
    }

    /// Replace the token, or clear it with `None`. An empty token clears.
    ///
    /// Durable storage is updated synchronously before the in-memory value.
    /// Any user snapshot from the previous session is dropped.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if storage cannot be updated; the in-memory
    /// session is left unchanged in that case.
    pub fn set_token(&self, token: Option<SecretString>) -> Result<(), StorageError> {
        let token = token.filter(|token| !token.expose_secret().is_empty());
        match &token {
            Some(token) => self.store.save(token)?,
            None => self.store.clear()?,
        }

        let authenticated = token.is_some();
        self.state.send_replace(SessionState { token, user: None });

        if authenticated {
            info!("Session token set");
        } else {
            info!("Session token cleared");
        }
        Ok(())
    }

    /// Attach the backend's user snapshot to the current session.
    ///
    /// Ignored while unauthenticated, so a stale snapshot can never outlive
    /// its token.
    pub fn set_user(&self, user: Option<UserProfile>) {
        self.state.send_if_modified(|state| {
            if state.token.is_none() {
                return false;
            }
            state.user = user;
            true
        });
    }

    /// Subscribe to authentication state changes.
    #[must_use]
    pub fn subscribe(&self) -> AuthReceiver {
        AuthReceiver(self.state.subscribe())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("is_authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

/// Read-only view of the session for observers.
///
/// Borrows are kept short so the session can always publish new state.
#[derive(Clone)]
pub struct AuthReceiver(watch::Receiver<SessionState>);

impl AuthReceiver {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.0.borrow().token.is_some()
    }

    #[must_use]
    pub fn auth_state(&self) -> AuthState {
        auth_state_of(&self.0.borrow())
    }

    /// Read the current state and mark it as seen.
    pub fn observe(&mut self) -> AuthState {
        auth_state_of(&self.0.borrow_and_update())
    }

    /// Whether the state changed since it was last observed.
    ///
    /// A dropped session counts as no change.
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.0.has_changed().unwrap_or(false)
    }

    /// Wait until the session publishes a new state.
    ///
    /// Returns `false` once the session has been dropped.
    pub async fn changed(&mut self) -> bool {
        self.0.changed().await.is_ok()
    }
}

impl fmt::Debug for AuthReceiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthReceiver")
            .field("is_authenticated", &self.is_authenticated())
            .finish()
    }
}
