//! Authentication service for JW Companion
//!
//! [`AuthService`] owns the process-wide session. It restores the session at
//! startup, forwards sign-in / sign-up / password-reset / sign-out to the
//! external [`AuthProvider`], and keeps the session in step with the
//! provider's auth-state notifications.

use app_state::session::{AuthUser, Session, SessionReader, SessionStore};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

/// Message shown when the provider gives no usable error text
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Authentication error types
///
/// Every variant carries the provider's message text; callers display it
/// through [`AuthError::user_message`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Wrong email or password
    #[error("{0}")]
    InvalidCredentials(String),

    /// Provider rejected the input (e.g. malformed email)
    #[error("{0}")]
    ValidationFailed(String),

    /// Provider could not be reached
    #[error("{0}")]
    Network(String),

    /// Anything else
    #[error("{0}")]
    Unknown(String),
}

impl AuthError {
    /// Raw provider message
    pub fn message(&self) -> &str {
        match self {
            AuthError::InvalidCredentials(msg)
            | AuthError::ValidationFailed(msg)
            | AuthError::Network(msg)
            | AuthError::Unknown(msg) => msg,
        }
    }

    /// Message suitable for an alert
    pub fn user_message(&self) -> String {
        let msg = self.message().trim();
        if msg.is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            msg.to_string()
        }
    }
}

/// Result type for authentication operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Provider answer to a sign-in or sign-up call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// User with an active session, when the provider issued one
    pub user: Option<AuthUser>,
}

impl AuthResponse {
    /// Response carrying an active session
    pub fn signed_in(user: AuthUser) -> Self {
        Self { user: Some(user) }
    }

    /// Response without a session (e.g. email confirmation pending)
    pub fn pending() -> Self {
        Self { user: None }
    }
}

/// Out-of-band session notification pushed by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStateChange {
    /// A session was established
    SignedIn(AuthUser),
    /// The session ended
    SignedOut,
    /// The signed-in user's details changed
    UserUpdated(AuthUser),
}

/// External authentication provider
///
/// Implementations perform the network calls, token handling, and session
/// persistence. None of these calls retry or time out on their own.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// User of the persisted session, if any
    async fn current_user(&self) -> Result<Option<AuthUser>>;

    /// Sign in with email and password
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse>;

    /// Register a new account
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthResponse>;

    /// Send a password reset email
    async fn reset_password(&self, email: &str) -> Result<()>;

    /// End the current session
    async fn sign_out(&self) -> Result<()>;

    /// Attach to auth-state notifications; dropping the receiver detaches
    fn subscribe(&self) -> broadcast::Receiver<AuthStateChange>;
}

/// Auth session provider
///
/// Holds the only writable handle to the session. Screens and the route
/// guard observe it through [`AuthService::session`].
///
/// # Example
///
/// ```rust,no_run
/// use app_core::auth::{AuthProvider, AuthService};
/// use std::sync::Arc;
///
/// async fn login(provider: Arc<dyn AuthProvider>) {
///     let auth = AuthService::new(provider);
///     auth.start().await;
///
///     if let Err(e) = auth.sign_in("alice@example.com", "secret123").await {
///         eprintln!("{}", e.user_message());
///     }
/// }
/// ```
pub struct AuthService {
    provider: Arc<dyn AuthProvider>,
    session: SessionStore,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl AuthService {
    /// Create a service in the loading state
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self {
            provider,
            session: SessionStore::new(),
            listener: Mutex::new(None),
        }
    }

    /// Read-only session handle
    pub fn session(&self) -> SessionReader {
        self.session.reader()
    }

    /// Snapshot of the current session
    pub fn current_session(&self) -> Session {
        self.session.current()
    }

    /// Attach to provider notifications and restore the persisted session
    ///
    /// The subscription is attached before the restore so no notification is
    /// missed. A notification that lands first wins over the restore result.
    /// Calling this again while attached only re-runs the restore.
    pub async fn start(&self) {
        self.attach_listener();

        let user = match self.provider.current_user().await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "session restore failed; continuing signed out");
                None
            }
        };

        if self.session.current().is_loading {
            self.session.resolve(user);
        }
    }

    fn attach_listener(&self) {
        let mut listener = self.listener.lock();
        if listener.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }

        let mut rx = self.provider.subscribe();
        let session = self.session.clone();
        let provider = Arc::clone(&self.provider);

        *listener = Some(tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(change) => apply_change(&session, change),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "auth notifications lagged; resyncing session");
                        match provider.current_user().await {
                            Ok(user) => session.resolve(user),
                            Err(e) => tracing::warn!(error = %e, "session resync failed"),
                        }
                    }
                    Err(RecvError::Closed) => {
                        tracing::debug!("auth notification channel closed");
                        break;
                    }
                }
            }
        }));
        tracing::debug!("attached auth state listener");
    }

    /// Detach from provider notifications
    pub fn shutdown(&self) {
        if let Some(handle) = self.listener.lock().take() {
            handle.abort();
            tracing::debug!("detached auth state listener");
        }
    }

    /// Whether the notification listener is attached
    pub fn is_listening(&self) -> bool {
        self.listener
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Sign in with email and password
    ///
    /// On success the session is updated directly when the provider returns a
    /// user, otherwise through its notification.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<()> {
        match self.provider.sign_in(email, password).await {
            Ok(response) => {
                if let Some(user) = response.user {
                    self.session.set_user(user);
                }
                tracing::info!("sign in succeeded");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "sign in failed");
                Err(e)
            }
        }
    }

    /// Register a new account
    ///
    /// Success does not imply a session: the provider may require email
    /// confirmation first.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<()> {
        match self.provider.sign_up(email, password).await {
            Ok(response) => {
                let confirmed = response.user.is_some();
                if let Some(user) = response.user {
                    self.session.set_user(user);
                }
                tracing::info!(session_issued = confirmed, "sign up succeeded");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "sign up failed");
                Err(e)
            }
        }
    }

    /// Request a password reset email
    pub async fn reset_password(&self, email: &str) -> Result<()> {
        match self.provider.reset_password(email).await {
            Ok(()) => {
                tracing::info!("password reset email requested");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "password reset failed");
                Err(e)
            }
        }
    }

    /// End the current session
    pub async fn sign_out(&self) -> Result<()> {
        match self.provider.sign_out().await {
            Ok(()) => {
                self.session.clear();
                tracing::info!("signed out");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "sign out failed");
                Err(e)
            }
        }
    }
}

impl Drop for AuthService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn apply_change(session: &SessionStore, change: AuthStateChange) {
    match change {
        AuthStateChange::SignedIn(user) | AuthStateChange::UserUpdated(user) => {
            session.set_user(user)
        }
        AuthStateChange::SignedOut => session.clear(),
    }
}
