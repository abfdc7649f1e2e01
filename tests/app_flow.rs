//! App Flow Integration Tests
//!
//! End-to-end tests of the composed app: session restore, the route guard
//! reacting to sign-in / sign-out, the auth screens, and theme persistence.

use app_core::auth::{self, AuthError, AuthProvider, AuthResponse, AuthStateChange};
use app_state::session::AuthUser;
use app_ui::navigation::{Navigator, RoutePath};
use app_ui::screens::{LoginScreen, RegisterScreen, SubmitOutcome};
use app_ui::theme::{ColorScheme, ThemeMode};
use async_trait::async_trait;
use jw_companion::{App, AppConfig};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::broadcast;

/// In-process auth provider with a fixed account table
struct FakeProvider {
    accounts: Mutex<HashMap<String, String>>,
    current: Mutex<Option<AuthUser>>,
    require_confirmation: bool,
    tx: broadcast::Sender<AuthStateChange>,
}

impl FakeProvider {
    fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self {
            accounts: Mutex::new(HashMap::new()),
            current: Mutex::new(None),
            require_confirmation: true,
            tx,
        }
    }

    fn with_account(self, email: &str, password: &str) -> Self {
        self.accounts.lock().insert(email.to_string(), password.to_string());
        self
    }

    fn signed_in_as(self, email: &str) -> Self {
        *self.current.lock() = Some(user_for(email));
        self
    }

    fn notify(&self, change: AuthStateChange) {
        let _ = self.tx.send(change);
    }
}

fn user_for(email: &str) -> AuthUser {
    AuthUser::new(format!("id:{email}"), email)
}

#[async_trait]
impl AuthProvider for FakeProvider {
    async fn current_user(&self) -> auth::Result<Option<AuthUser>> {
        Ok(self.current.lock().clone())
    }

    async fn sign_in(&self, email: &str, password: &str) -> auth::Result<AuthResponse> {
        let valid = self.accounts.lock().get(email).is_some_and(|p| p == password);
        if !valid {
            return Err(AuthError::InvalidCredentials("Invalid login credentials".to_string()));
        }
        let user = user_for(email);
        *self.current.lock() = Some(user.clone());
        Ok(AuthResponse::signed_in(user))
    }

    async fn sign_up(&self, email: &str, password: &str) -> auth::Result<AuthResponse> {
        let mut accounts = self.accounts.lock();
        if accounts.contains_key(email) {
            return Err(AuthError::ValidationFailed("User already registered".to_string()));
        }
        accounts.insert(email.to_string(), password.to_string());
        if self.require_confirmation {
            Ok(AuthResponse::pending())
        } else {
            Ok(AuthResponse::signed_in(user_for(email)))
        }
    }

    async fn reset_password(&self, _email: &str) -> auth::Result<()> {
        Ok(())
    }

    async fn sign_out(&self) -> auth::Result<()> {
        *self.current.lock() = None;
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthStateChange> {
        self.tx.subscribe()
    }
}

async fn start(provider: Arc<FakeProvider>) -> App {
    let config = AppConfig::new().in_memory();
    App::start(config, provider as Arc<dyn AuthProvider>, ColorScheme::Light)
        .await
        .unwrap()
}

async fn wait_for_path(app: &App, expected: &str) {
    let expected = RoutePath::parse(expected);
    let mut rx = app.navigation().subscribe();
    let reached = tokio::time::timeout(Duration::from_secs(2), async {
        rx.wait_for(|path| *path == expected).await.is_ok()
    })
    .await;
    assert_eq!(reached, Ok(true), "never navigated to {expected}");
}

/// Test that a signed-out start lands on login
#[tokio::test]
async fn test_signed_out_start_redirects_to_login() {
    let app = start(Arc::new(FakeProvider::new())).await;

    assert!(!app.session().is_loading);
    assert!(!app.session().is_authenticated());
    wait_for_path(&app, "/login").await;
    assert_eq!(app.navigation().depth(), 1);

    app.shutdown().unwrap();
}

/// Test that a restored session stays on home
#[tokio::test]
async fn test_restored_session_stays_home() {
    let provider = FakeProvider::new().signed_in_as("alice@example.com");
    let app = start(Arc::new(provider)).await;

    assert_eq!(app.session().user_id(), Some("id:alice@example.com"));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(app.navigation().current_path(), RoutePath::root());

    app.shutdown().unwrap();
}

/// Test the full login flow, including a failed attempt
#[tokio::test]
async fn test_login_flow() {
    let provider = Arc::new(FakeProvider::new().with_account("alice@example.com", "secret123"));
    let app = start(Arc::clone(&provider)).await;
    wait_for_path(&app, "/login").await;

    let mut screen = LoginScreen::new();
    screen.set_email("alice@example.com");
    screen.set_password("wrong-password");

    let outcome = screen.submit(app.auth()).await;
    assert!(matches!(outcome, SubmitOutcome::Failed(AuthError::InvalidCredentials(_))));
    assert_eq!(screen.alert().unwrap().message, "Invalid login credentials");
    assert!(!screen.is_loading());
    assert!(!app.session().is_authenticated());

    screen.dismiss_alert();
    screen.set_password("secret123");
    assert!(screen.submit(app.auth()).await.is_success());
    assert!(app.session().is_authenticated());
    wait_for_path(&app, "/").await;

    app.shutdown().unwrap();
}

/// Test that a sign-out notification sends the user back to login
#[tokio::test]
async fn test_signed_out_notification_redirects() {
    let provider = Arc::new(FakeProvider::new().signed_in_as("alice@example.com"));
    let app = start(Arc::clone(&provider)).await;
    assert!(app.auth().is_listening());

    app.navigation().push("/habits");
    provider.notify(AuthStateChange::SignedOut);

    wait_for_path(&app, "/login").await;
    assert!(!app.session().is_authenticated());

    app.shutdown().unwrap();
    assert!(!app.auth().is_listening());
    assert!(!app.is_guard_running());
}

/// Test that explicit sign-out clears the session
#[tokio::test]
async fn test_sign_out() {
    let provider = Arc::new(FakeProvider::new().signed_in_as("alice@example.com"));
    let app = start(provider).await;

    app.auth().sign_out().await.unwrap();
    assert!(!app.session().is_authenticated());
    wait_for_path(&app, "/login").await;

    app.shutdown().unwrap();
}

/// Test that preview routes are never bounced
#[tokio::test]
async fn test_preview_route_not_redirected() {
    let provider = Arc::new(FakeProvider::new().signed_in_as("alice@example.com"));
    let app = start(provider).await;

    app.navigation().push("/preview/dashboard");
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(app.navigation().current_path(), RoutePath::parse("/preview/dashboard"));

    app.navigation().push("/register");
    wait_for_path(&app, "/").await;

    app.shutdown().unwrap();
}

/// Test registration that needs email confirmation
#[tokio::test]
async fn test_register_pending_confirmation() {
    let app = start(Arc::new(FakeProvider::new())).await;
    wait_for_path(&app, "/login").await;
    app.navigation().push("/register");

    let mut screen = RegisterScreen::new();
    screen.set_email("new@example.com");
    screen.set_password("abc");
    screen.set_confirm_password("abc");
    let navigator = app.navigator();

    let outcome = screen.submit(app.auth(), navigator.as_ref()).await;
    assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
    assert_eq!(screen.alert().unwrap().message, "Password must be at least 6 characters");

    screen.set_password("secret123");
    screen.set_confirm_password("secret123");
    assert!(screen.submit(app.auth(), navigator.as_ref()).await.is_success());
    assert_eq!(screen.alert().unwrap().title, "Success");
    assert!(!app.session().is_authenticated());
    assert_eq!(app.navigation().current_path(), RoutePath::parse("/login"));

    app.shutdown().unwrap();
}

/// Test that the theme preference survives a restart
#[tokio::test]
async fn test_theme_persists_across_restart() {
    let temp_dir = TempDir::new().unwrap();
    let config = AppConfig::new().with_storage_path(temp_dir.path().join("kv"));

    {
        let app = App::start(config.clone(), Arc::new(FakeProvider::new()), ColorScheme::Light)
            .await
            .unwrap();
        assert_eq!(app.theme().mode(), ThemeMode::System);
        assert!(!app.theme().is_dark_mode());

        app.theme().set_theme_mode(ThemeMode::Dark);
        assert!(app.theme().is_dark_mode());
        app.shutdown().unwrap();
    }

    let app = App::start(config, Arc::new(FakeProvider::new()), ColorScheme::Light)
        .await
        .unwrap();
    assert_eq!(app.theme().mode(), ThemeMode::Dark);
    assert!(app.theme().is_dark_mode());
    app.shutdown().unwrap();
}
