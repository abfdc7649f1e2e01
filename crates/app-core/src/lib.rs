//! Core application logic for JW Companion
//!
//! This crate contains the auth session provider, local form validation for
//! the auth screens, and the scripture tag selection state machine.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod tags;
pub mod validation;

pub use auth::{AuthError, AuthProvider, AuthResponse, AuthService, AuthStateChange};
pub use tags::{ScriptureTag, SuggestionRow, TagSelector};
pub use validation::{ValidationError, MIN_PASSWORD_LENGTH};
