//! Application state management for JW Companion
//!
//! This crate holds the process-wide session value and the subscription
//! plumbing that lets the route guard and screens observe it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod session;

pub use session::{AuthUser, Session, SessionReader, SessionStore};
