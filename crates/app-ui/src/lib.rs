//! User interface layer for JW Companion
//!
//! This crate holds everything between the core services and the native
//! views: routes and the route guard, the theme store, the auth screen form
//! models, and display-variant component models.
//!
//! # Modules
//!
//! - [`navigation`] - Routes, the navigation stack, and the route guard
//! - [`theme`] - Theme preference store and color palettes
//! - [`screens`] - Login, registration, and password reset forms
//! - [`components`] - Display variants derived from state
//! - [`wireframes`] - Static design previews
//!
//! # Example
//!
//! ```rust
//! use app_ui::navigation::{decide, GuardDecision, Route, RoutePath};
//! use app_state::session::Session;
//!
//! // Signed out on a protected screen: go to login
//! let decision = decide(&Session::resolved(None), &RoutePath::parse("/habits"));
//! assert_eq!(decision, GuardDecision::Redirect(Route::Login));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod components;
pub mod navigation;
pub mod screens;
pub mod theme;
pub mod wireframes;

// Re-export commonly used types
pub use navigation::{
    decide, GuardDecision, NavigationStack, Navigator, Route, RouteGuard, RoutePath, Router,
    StackEntry,
};

pub use theme::{
    dark_theme, get_theme, light_theme, ColorScheme, Theme, ThemeColors, ThemeMode,
    ThemeSnapshot, ThemeStore,
};

pub use screens::{
    Alert, AuthRequest, LoginScreen, RegisterScreen, ResetPasswordScreen, SubmitOutcome,
};

pub use components::{Button, ButtonVariant, Icon};
pub use wireframes::{preview_for, Wireframe};
