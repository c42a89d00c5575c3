//! Authentication-state observation.
//!
//! The gateway owns identity; the client only watches it. [`AuthSession`]
//! publishes `{ user, is_loading }` through a watch channel — subscribers see
//! the current value immediately and every change after it, which is exactly
//! the auth-state-changed contract the hosted service exposes.

use tokio::sync::watch;

use voxen_shared::constants::FALLBACK_DISPLAY_NAME;
use voxen_shared::types::UserId;

/// The signed-in user as the auth provider reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: UserId,
    pub email: Option<String>,
}

impl AuthUser {
    /// Default display handle: the local part of the email address.
    pub fn display_handle(&self) -> String {
        self.email
            .as_deref()
            .and_then(|e| e.split('@').next())
            .filter(|s| !s.is_empty())
            .unwrap_or(FALLBACK_DISPLAY_NAME)
            .to_string()
    }
}

/// Observable authentication state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<AuthUser>,
    pub is_loading: bool,
}

impl AuthState {
    fn loading() -> Self {
        Self {
            user: None,
            is_loading: true,
        }
    }
}

/// Shared handle to the auth state channel.
///
/// Gateway implementations publish into it; everything else subscribes.
pub struct AuthSession {
    tx: watch::Sender<AuthState>,
}

impl AuthSession {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(AuthState::loading());
        Self { tx }
    }

    /// Watch auth-state changes. Drop the receiver to unsubscribe.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<AuthUser> {
        self.tx.borrow().user.clone()
    }

    // send_replace rather than send: the state must advance even while
    // nobody is subscribed yet.
    pub(crate) fn publish_signed_in(&self, user: AuthUser) {
        self.tx.send_replace(AuthState {
            user: Some(user),
            is_loading: false,
        });
    }

    pub(crate) fn publish_signed_out(&self) {
        self.tx.send_replace(AuthState {
            user: None,
            is_loading: false,
        });
    }

    pub(crate) fn publish_loading(&self) {
        self.tx.send_replace(AuthState::loading());
    }
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::new()
    }
}
