//! Reactive session state
//!
//! The session is a single value (`user` + `is_loading`) owned by the
//! [`SessionStore`]. Only the holder of the store may change it; everything
//! else gets a [`SessionReader`] that can read the current value and
//! subscribe to changes.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

/// Identity of an authenticated user as reported by the auth provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthUser {
    /// Opaque provider-issued user id
    pub id: String,
    /// Email address, when the provider exposes one
    pub email: Option<String>,
}

impl AuthUser {
    /// Create a user with an id and email
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self { id: id.into(), email: Some(email.into()) }
    }
}

/// Current authentication state
///
/// `is_loading == true` means the provider has not answered yet; it is
/// distinct from a resolved session with no user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The signed-in user, if any
    pub user: Option<AuthUser>,
    /// Whether the session is still being determined
    pub is_loading: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::loading()
    }
}

impl Session {
    /// Session state at process start
    pub fn loading() -> Self {
        Self { user: None, is_loading: true }
    }

    /// A determined session, with or without a user
    pub fn resolved(user: Option<AuthUser>) -> Self {
        Self { user, is_loading: false }
    }

    /// Whether a user is signed in
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Id of the signed-in user
    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }
}

/// Owner of the session value
///
/// Every committed change is published to subscribers. Writes that would
/// not change the value are dropped without notifying anyone.
///
/// # Example
///
/// ```
/// use app_state::session::{AuthUser, SessionStore};
///
/// let store = SessionStore::new();
/// assert!(store.current().is_loading);
///
/// store.resolve(Some(AuthUser::new("u1", "a@example.com")));
/// assert!(store.current().is_authenticated());
/// ```
#[derive(Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<Session>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create a store in the loading state
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Session::loading());
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current session
    pub fn current(&self) -> Session {
        self.tx.borrow().clone()
    }

    /// Read-only handle for observers
    pub fn reader(&self) -> SessionReader {
        SessionReader { rx: self.tx.subscribe() }
    }

    /// Subscribe to session changes
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }

    /// Commit the provider's answer, ending the loading state
    pub fn resolve(&self, user: Option<AuthUser>) {
        self.commit(Session::resolved(user));
    }

    /// Replace the signed-in user, ending the loading state
    pub fn set_user(&self, user: AuthUser) {
        self.commit(Session::resolved(Some(user)));
    }

    /// Clear the signed-in user
    pub fn clear(&self) {
        self.commit(Session::resolved(None));
    }

    fn commit(&self, next: Session) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next.clone();
                true
            }
        });

        if changed {
            tracing::debug!(
                authenticated = next.is_authenticated(),
                loading = next.is_loading,
                "session changed"
            );
        }
    }
}

/// Read-only view of the session
#[derive(Clone)]
pub struct SessionReader {
    rx: watch::Receiver<Session>,
}

impl SessionReader {
    /// Snapshot of the current session
    pub fn current(&self) -> Session {
        self.rx.borrow().clone()
    }

    /// Subscribe to session changes
    ///
    /// The returned receiver treats the current value as already seen.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        let mut rx = self.rx.clone();
        rx.borrow_and_update();
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> AuthUser {
        AuthUser::new("user-1", "alice@example.com")
    }

    #[test]
    fn test_initial_state_is_loading() {
        let store = SessionStore::new();
        let session = store.current();
        assert!(session.is_loading);
        assert!(session.user.is_none());
        assert_eq!(session, Session::default());
    }

    #[test]
    fn test_resolve_without_user() {
        let store = SessionStore::new();
        store.resolve(None);

        let session = store.current();
        assert!(!session.is_loading);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_set_user_and_clear() {
        let store = SessionStore::new();
        store.set_user(alice());
        assert_eq!(store.current().user_id(), Some("user-1"));

        store.clear();
        assert_eq!(store.current(), Session::resolved(None));
    }

    #[test]
    fn test_reader_sees_writes() {
        let store = SessionStore::new();
        let reader = store.reader();

        store.set_user(alice());
        assert!(reader.current().is_authenticated());
    }

    #[tokio::test]
    async fn test_subscription_notified() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();

        store.resolve(Some(alice()));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().user_id(), Some("user-1"));
    }

    #[tokio::test]
    async fn test_no_notification_for_identical_value() {
        let store = SessionStore::new();
        store.resolve(None);

        let mut rx = store.reader().subscribe();
        store.resolve(None);
        assert!(!rx.has_changed().unwrap());

        store.set_user(alice());
        assert!(rx.has_changed().unwrap());
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_authenticated());
    }

    #[test]
    fn test_session_serialization() {
        let session = Session::resolved(Some(alice()));
        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}
