//! JW Companion application core
//!
//! [`App`] wires the workspace crates together: it opens storage, loads the
//! theme preference, restores the auth session, and keeps the route guard
//! running against the navigation stack.
//!
//! # Example
//!
//! ```rust,no_run
//! use jw_companion::{init_logging, App, AppConfig};
//! use app_ui::theme::ColorScheme;
//! # async fn run(provider: std::sync::Arc<dyn app_core::auth::AuthProvider>) -> Result<(), jw_companion::AppError> {
//! let config = AppConfig::from_env()?;
//! init_logging(&config.log_filter);
//!
//! let app = App::start(config, provider, ColorScheme::Light).await?;
//! // ... render ...
//! app.shutdown()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;

pub use config::{AppConfig, ConfigError};

use app_core::auth::{AuthProvider, AuthService};
use app_state::session::Session;
use app_ui::navigation::{NavigationStack, Navigator, RouteGuard, RoutePath};
use app_ui::theme::{ColorScheme, ThemeStore};
use parking_lot::Mutex;
use std::sync::Arc;
use storage::{KeyValueStore, KvConfig, KvError, KvStore};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

/// Application errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Storage could not be opened or flushed
    #[error("storage error: {0}")]
    Storage(#[from] KvError),
}

/// Result type for application operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Install the global `tracing` subscriber
///
/// `RUST_LOG` takes precedence over `default_filter`. Returns `false` if a
/// subscriber was already installed.
pub fn init_logging(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok()
}

/// Running application
pub struct App {
    config: AppConfig,
    kv: KvStore,
    theme: ThemeStore,
    auth: AuthService,
    navigation: Arc<NavigationStack>,
    guard: Mutex<Option<JoinHandle<()>>>,
}

impl App {
    /// Open storage, load the theme, start the route guard, and restore the session
    ///
    /// Must be called from within a tokio runtime. The guard starts before the
    /// session restore, so it suspends until the restore resolves.
    pub async fn start(
        config: AppConfig,
        provider: Arc<dyn AuthProvider>,
        system_scheme: ColorScheme,
    ) -> Result<Self> {
        let kv = if config.in_memory_storage {
            KvStore::in_memory()?
        } else {
            KvStore::new(KvConfig::new(config.storage_path.to_string_lossy()))?
        };

        let theme = ThemeStore::load_with_key(
            Arc::new(kv.clone()) as Arc<dyn KeyValueStore>,
            config.theme_key.clone(),
            system_scheme,
        );

        let auth = AuthService::new(provider);
        let navigation = Arc::new(NavigationStack::new(RoutePath::root()));

        let guard = RouteGuard::new(Arc::clone(&navigation) as Arc<dyn Navigator>)
            .spawn(auth.session().subscribe(), navigation.subscribe());

        auth.start().await;
        tracing::info!(
            authenticated = auth.current_session().is_authenticated(),
            theme = %theme.mode(),
            "app started"
        );

        Ok(Self { config, kv, theme, auth, navigation, guard: Mutex::new(Some(guard)) })
    }

    /// Configuration the app was started with
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Auth service
    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// Current session snapshot
    pub fn session(&self) -> Session {
        self.auth.current_session()
    }

    /// Theme store
    pub fn theme(&self) -> &ThemeStore {
        &self.theme
    }

    /// Navigation stack
    pub fn navigation(&self) -> &NavigationStack {
        &self.navigation
    }

    /// Navigation stack as a shareable navigator
    pub fn navigator(&self) -> Arc<dyn Navigator> {
        Arc::clone(&self.navigation) as Arc<dyn Navigator>
    }

    /// Whether the route guard task is still running
    pub fn is_guard_running(&self) -> bool {
        self.guard.lock().as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Detach from auth notifications, stop the guard, and flush storage
    pub fn shutdown(&self) -> Result<()> {
        self.auth.shutdown();
        if let Some(handle) = self.guard.lock().take() {
            handle.abort();
        }
        self.kv.flush()?;
        tracing::info!("app shut down");
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.guard.lock().take() {
            handle.abort();
        }
    }
}
