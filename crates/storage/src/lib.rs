//! Storage layer for JW Companion
//!
//! This crate provides the key-value boundary used for device preferences
//! and its sled-backed implementation.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod kv;

pub use kv::{scoped_key, KeyValueStore, KvConfig, KvError, KvStore};
