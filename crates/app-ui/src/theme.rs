//! Theme provider for JW Companion
//!
//! The user picks a [`ThemeMode`] (light, dark, or follow the system). The
//! effective dark flag combines that preference with the OS-reported
//! [`ColorScheme`]:
//!
//! `is_dark_mode = mode == Dark || (mode == System && system == Dark)`
//!
//! The preference is persisted as a plain string through a
//! [`KeyValueStore`]. Storage failures are logged and otherwise ignored.
//!
//! # Usage
//!
//! ```rust
//! use app_ui::theme::{ColorScheme, ThemeMode, ThemeStore};
//! use std::sync::Arc;
//! use storage::KvStore;
//!
//! let kv = Arc::new(KvStore::in_memory().unwrap());
//! let store = ThemeStore::load(kv, ColorScheme::Light);
//! assert_eq!(store.mode(), ThemeMode::System);
//!
//! store.set_theme_mode(ThemeMode::Dark);
//! assert!(store.is_dark_mode());
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storage::KeyValueStore;
use tokio::sync::watch;

/// Storage key of the theme preference
pub const THEME_MODE_KEY: &str = "device:theme_mode";

// =============================================================================
// Color Types
// =============================================================================

/// A color represented as a hex string (e.g., "#FFFFFF")
pub type Color = String;

/// Parse a hex color string to RGB components
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() < 6 {
        return None;
    }
    let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
    let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
    let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
    Some((r, g, b))
}

/// Brand colors
pub mod brand {
    /// Primary brand color (deep indigo)
    pub const PRIMARY: &str = "#4A3AFF";

    /// Accent for streaks and completed habits
    pub const ACCENT_GREEN: &str = "#22C55E";

    /// Accent for reading progress
    pub const ACCENT_AMBER: &str = "#F59E0B";

    /// Pure white
    pub const WHITE: &str = "#FFFFFF";

    /// Pure black
    pub const BLACK: &str = "#000000";
}

// =============================================================================
// Preference Types
// =============================================================================

/// User display preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Always light
    Light,
    /// Always dark
    Dark,
    /// Follow the OS setting
    #[default]
    System,
}

impl ThemeMode {
    /// Persisted string form
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::System => "system",
        }
    }

    /// All modes, in picker order
    pub fn all() -> [ThemeMode; 3] {
        [ThemeMode::Light, ThemeMode::Dark, ThemeMode::System]
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            "system" => Ok(ThemeMode::System),
            _ => Err(format!("Unknown theme mode: {}", s)),
        }
    }
}

/// Scheme reported by the operating system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// Light appearance
    #[default]
    Light,
    /// Dark appearance
    Dark,
}

/// Effective dark flag for a preference and OS scheme
pub fn resolve_dark_mode(mode: ThemeMode, system: ColorScheme) -> bool {
    match mode {
        ThemeMode::Dark => true,
        ThemeMode::Light => false,
        ThemeMode::System => system == ColorScheme::Dark,
    }
}

// =============================================================================
// Theme Definition
// =============================================================================

/// Semantic colors for one appearance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    /// Screen background
    pub background: Color,
    /// Cards and inputs
    pub surface: Color,
    /// Primary text
    pub text: Color,
    /// Secondary text and placeholders
    pub text_muted: Color,
    /// Buttons and links
    pub primary: Color,
    /// Input and divider borders
    pub border: Color,
    /// Error text and destructive actions
    pub error: Color,
    /// Completed states
    pub success: Color,
}

/// Resolved theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Whether this is the dark appearance
    pub dark: bool,
    /// Color set
    pub colors: ThemeColors,
}

impl Theme {
    /// Check if this is a dark theme
    pub fn is_dark(&self) -> bool {
        self.dark
    }
}

/// Create the light theme
pub fn light_theme() -> Theme {
    Theme {
        dark: false,
        colors: ThemeColors {
            background: "#F8FAFC".to_string(),
            surface: brand::WHITE.to_string(),
            text: "#0F172A".to_string(),
            text_muted: "#64748B".to_string(),
            primary: brand::PRIMARY.to_string(),
            border: "#E2E8F0".to_string(),
            error: "#DC2626".to_string(),
            success: brand::ACCENT_GREEN.to_string(),
        },
    }
}

/// Create the dark theme
pub fn dark_theme() -> Theme {
    Theme {
        dark: true,
        colors: ThemeColors {
            background: "#0B1120".to_string(),
            surface: "#1E293B".to_string(),
            text: "#F1F5F9".to_string(),
            text_muted: "#94A3B8".to_string(),
            primary: "#7C6FFF".to_string(),
            border: "#334155".to_string(),
            error: "#F87171".to_string(),
            success: brand::ACCENT_GREEN.to_string(),
        },
    }
}

/// Theme for the effective dark flag
pub fn get_theme(is_dark: bool) -> Theme {
    if is_dark {
        dark_theme()
    } else {
        light_theme()
    }
}

// =============================================================================
// Theme Store
// =============================================================================

/// Published theme state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSnapshot {
    /// User preference
    pub mode: ThemeMode,
    /// OS-reported scheme
    pub system_scheme: ColorScheme,
    /// Effective dark flag
    pub is_dark_mode: bool,
}

impl ThemeSnapshot {
    fn new(mode: ThemeMode, system_scheme: ColorScheme) -> Self {
        Self { mode, system_scheme, is_dark_mode: resolve_dark_mode(mode, system_scheme) }
    }
}

/// Theme provider state
///
/// In-memory state changes synchronously; persistence follows and its
/// failure never rolls the state back.
pub struct ThemeStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
    tx: watch::Sender<ThemeSnapshot>,
}

impl ThemeStore {
    /// Load the persisted preference under [`THEME_MODE_KEY`]
    pub fn load(kv: Arc<dyn KeyValueStore>, system_scheme: ColorScheme) -> Self {
        Self::load_with_key(kv, THEME_MODE_KEY, system_scheme)
    }

    /// Load the persisted preference under a custom key
    ///
    /// Missing, unreadable, or unknown values leave the mode at
    /// [`ThemeMode::System`].
    pub fn load_with_key(
        kv: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        system_scheme: ColorScheme,
    ) -> Self {
        let key = key.into();
        let mode = match kv.get(&key) {
            Ok(Some(stored)) => stored.parse::<ThemeMode>().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring persisted theme mode");
                ThemeMode::default()
            }),
            Ok(None) => ThemeMode::default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load theme mode");
                ThemeMode::default()
            }
        };
        tracing::debug!(%mode, "theme mode loaded");

        let (tx, _) = watch::channel(ThemeSnapshot::new(mode, system_scheme));
        Self { kv, key, tx }
    }

    /// Current state
    pub fn snapshot(&self) -> ThemeSnapshot {
        *self.tx.borrow()
    }

    /// User preference
    pub fn mode(&self) -> ThemeMode {
        self.snapshot().mode
    }

    /// OS-reported scheme
    pub fn system_scheme(&self) -> ColorScheme {
        self.snapshot().system_scheme
    }

    /// Effective dark flag
    pub fn is_dark_mode(&self) -> bool {
        self.snapshot().is_dark_mode
    }

    /// Resolved theme colors
    pub fn theme(&self) -> Theme {
        get_theme(self.is_dark_mode())
    }

    /// Subscribe to theme changes
    pub fn subscribe(&self) -> watch::Receiver<ThemeSnapshot> {
        self.tx.subscribe()
    }

    /// Change the preference, then persist it
    pub fn set_theme_mode(&self, mode: ThemeMode) {
        let system = self.system_scheme();
        self.publish(ThemeSnapshot::new(mode, system));

        if let Err(e) = self.kv.set(&self.key, mode.as_str()) {
            tracing::warn!(error = %e, %mode, "failed to persist theme mode");
        }
    }

    /// Record a new OS-reported scheme
    pub fn set_system_scheme(&self, scheme: ColorScheme) {
        let mode = self.mode();
        self.publish(ThemeSnapshot::new(mode, scheme));
    }

    fn publish(&self, next: ThemeSnapshot) {
        self.tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use storage::{KvError, KvStore};

    /// Store that can be told to fail reads or writes
    #[derive(Default)]
    struct FlakyStore {
        values: Mutex<HashMap<String, String>>,
        fail_get: bool,
        fail_set: bool,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> storage::kv::Result<Option<String>> {
            if self.fail_get {
                return Err(KvError::Unavailable("read failed".to_string()));
            }
            Ok(self.values.lock().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> storage::kv::Result<()> {
            if self.fail_set {
                return Err(KvError::Unavailable("write failed".to_string()));
            }
            self.values.lock().insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_resolve_dark_mode_table() {
        assert!(!resolve_dark_mode(ThemeMode::Light, ColorScheme::Dark));
        assert!(resolve_dark_mode(ThemeMode::Dark, ColorScheme::Light));
        assert!(resolve_dark_mode(ThemeMode::System, ColorScheme::Dark));
        assert!(!resolve_dark_mode(ThemeMode::System, ColorScheme::Light));
    }

    #[test]
    fn test_theme_mode_from_str() {
        assert_eq!("dark".parse::<ThemeMode>(), Ok(ThemeMode::Dark));
        assert_eq!("system".parse::<ThemeMode>(), Ok(ThemeMode::System));
        assert!("Dark".parse::<ThemeMode>().is_err());
        assert!("dim".parse::<ThemeMode>().is_err());
    }

    #[test]
    fn test_theme_mode_serialization() {
        let json = serde_json::to_string(&ThemeMode::Dark).unwrap();
        assert_eq!(json, "\"dark\"");
    }

    #[test]
    fn test_default_is_system() {
        let store = ThemeStore::load(Arc::new(FlakyStore::default()), ColorScheme::Dark);
        assert_eq!(store.mode(), ThemeMode::System);
        assert!(store.is_dark_mode());
    }

    #[test]
    fn test_load_adopts_persisted_mode() {
        let kv = Arc::new(FlakyStore::default());
        kv.set(THEME_MODE_KEY, "light").unwrap();

        let store = ThemeStore::load(kv, ColorScheme::Dark);
        assert_eq!(store.mode(), ThemeMode::Light);
        assert!(!store.is_dark_mode());
    }

    #[test]
    fn test_load_ignores_unknown_value() {
        let kv = Arc::new(FlakyStore::default());
        kv.set(THEME_MODE_KEY, "sepia").unwrap();

        let store = ThemeStore::load(kv, ColorScheme::Light);
        assert_eq!(store.mode(), ThemeMode::System);
    }

    #[test]
    fn test_load_failure_uses_default() {
        let kv = Arc::new(FlakyStore { fail_get: true, ..Default::default() });
        let store = ThemeStore::load(kv, ColorScheme::Light);
        assert_eq!(store.mode(), ThemeMode::System);
    }

    #[test]
    fn test_set_theme_mode_is_immediate_and_persisted() {
        let kv = Arc::new(FlakyStore::default());
        let store = ThemeStore::load(kv.clone(), ColorScheme::Light);

        store.set_theme_mode(ThemeMode::Dark);
        assert!(store.is_dark_mode());
        assert_eq!(kv.get(THEME_MODE_KEY).unwrap(), Some("dark".to_string()));
    }

    #[test]
    fn test_persist_failure_keeps_memory_state() {
        let kv = Arc::new(FlakyStore { fail_set: true, ..Default::default() });
        let store = ThemeStore::load(kv, ColorScheme::Light);

        store.set_theme_mode(ThemeMode::Dark);
        assert_eq!(store.mode(), ThemeMode::Dark);
        assert!(store.is_dark_mode());
    }

    #[test]
    fn test_system_scheme_change_recomputes() {
        let store = ThemeStore::load(Arc::new(FlakyStore::default()), ColorScheme::Light);
        assert!(!store.is_dark_mode());

        store.set_system_scheme(ColorScheme::Dark);
        assert!(store.is_dark_mode());

        store.set_theme_mode(ThemeMode::Light);
        store.set_system_scheme(ColorScheme::Dark);
        assert!(!store.is_dark_mode());
        assert!(!store.theme().is_dark());
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let store = ThemeStore::load(Arc::new(FlakyStore::default()), ColorScheme::Light);
        let mut rx = store.subscribe();

        store.set_theme_mode(ThemeMode::Dark);
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_dark_mode);

        // Same effective state, no notification
        store.set_theme_mode(ThemeMode::Dark);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_sled_store_round_trip() {
        let kv = Arc::new(KvStore::in_memory().unwrap());
        ThemeStore::load(kv.clone(), ColorScheme::Light).set_theme_mode(ThemeMode::Light);

        let reloaded = ThemeStore::load(kv, ColorScheme::Dark);
        assert_eq!(reloaded.mode(), ThemeMode::Light);
    }

    #[test]
    fn test_all_colors_are_valid_hex() {
        for theme in [light_theme(), dark_theme()] {
            let c = &theme.colors;
            for color in [
                &c.background,
                &c.surface,
                &c.text,
                &c.text_muted,
                &c.primary,
                &c.border,
                &c.error,
                &c.success,
            ] {
                assert!(parse_hex_color(color).is_some(), "invalid color {}", color);
            }
        }
    }
}
