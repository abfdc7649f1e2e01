//! UI component models
//!
//! Components here are plain data built from state by side-effect-free
//! functions. The rendering layer maps them to native views; nothing in
//! this module renders or mutates anything.

use crate::navigation::GuardDecision;
use crate::theme::{Theme, ThemeMode};
use app_core::tags::{ScriptureTag, SuggestionRow};
use serde::{Deserialize, Serialize};

// =============================================================================
// Icons
// =============================================================================

/// Icons used by the auth screens and the tag picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    /// Already-selected suggestion
    Checkmark,
    /// Selectable suggestion
    Add,
    /// Remove a selected tag
    Close,
    /// Password is hidden; tap to show
    Eye,
    /// Password is shown; tap to hide
    EyeOff,
    /// Light mode option
    Sun,
    /// Dark mode option
    Moon,
    /// System mode option
    Phone,
}

impl Icon {
    /// Icon set name
    pub fn name(&self) -> &'static str {
        match self {
            Icon::Checkmark => "checkmark-circle",
            Icon::Add => "add-circle-outline",
            Icon::Close => "close",
            Icon::Eye => "eye-outline",
            Icon::EyeOff => "eye-off-outline",
            Icon::Sun => "sunny-outline",
            Icon::Moon => "moon-outline",
            Icon::Phone => "phone-portrait-outline",
        }
    }
}

/// Trailing icon of a suggestion row
pub fn suggestion_row_icon(is_selected: bool) -> Icon {
    if is_selected {
        Icon::Checkmark
    } else {
        Icon::Add
    }
}

/// Icon of the password visibility toggle
pub fn password_toggle_icon(password_visible: bool) -> Icon {
    if password_visible {
        Icon::EyeOff
    } else {
        Icon::Eye
    }
}

// =============================================================================
// Button Component
// =============================================================================

/// Button style variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    /// Solid background button
    #[default]
    Solid,
    /// Text-only link button
    Link,
}

/// Button component properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    /// Label shown while idle
    pub label: String,
    /// Label shown while loading
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loading_label: Option<String>,
    /// Button style variant
    #[serde(default)]
    pub variant: ButtonVariant,
    /// Whether the button is disabled
    #[serde(default)]
    pub disabled: bool,
    /// Whether the button is loading
    #[serde(default)]
    pub loading: bool,
}

impl Button {
    /// Create a new button with the given label
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            loading_label: None,
            variant: ButtonVariant::default(),
            disabled: false,
            loading: false,
        }
    }

    /// Set the label shown while loading
    pub fn with_loading_label(mut self, label: impl Into<String>) -> Self {
        self.loading_label = Some(label.into());
        self
    }

    /// Set the button variant
    pub fn with_variant(mut self, variant: ButtonVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Set disabled state
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set loading state; a loading button is not pressable
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Text to display
    pub fn display_label(&self) -> &str {
        match (&self.loading_label, self.loading) {
            (Some(label), true) => label,
            _ => &self.label,
        }
    }

    /// Whether a press should be handled
    pub fn is_pressable(&self) -> bool {
        !self.disabled && !self.loading
    }
}

// =============================================================================
// Tag Picker
// =============================================================================

/// A selected tag rendered as a removable chip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagChip {
    /// Tag id, passed back on removal
    pub id: String,
    /// Chip text
    pub label: String,
    /// Trailing icon
    pub icon: Icon,
}

/// Chips for the selected set, in selection order
pub fn tag_chips(selected: &[ScriptureTag]) -> Vec<TagChip> {
    selected
        .iter()
        .map(|tag| TagChip { id: tag.id.clone(), label: tag.reference.clone(), icon: Icon::Close })
        .collect()
}

/// A suggestion list row ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionItem {
    /// Tag id
    pub id: String,
    /// Row text
    pub label: String,
    /// Checkmark or add icon
    pub icon: Icon,
}

/// Display rows for the picker's candidate list
pub fn suggestion_items(rows: &[SuggestionRow]) -> Vec<SuggestionItem> {
    rows.iter()
        .map(|row| SuggestionItem {
            id: row.tag.id.clone(),
            label: row.tag.reference.clone(),
            icon: suggestion_row_icon(row.is_selected),
        })
        .collect()
}

// =============================================================================
// Layout Variants
// =============================================================================

/// What the root layout shows for a guard decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootView {
    /// Full-screen loading indicator
    LoadingIndicator,
    /// The routed screen
    Content,
}

/// Root layout variant for a guard decision
pub fn root_view(decision: &GuardDecision) -> RootView {
    match decision {
        GuardDecision::Suspend => RootView::LoadingIndicator,
        GuardDecision::Stay | GuardDecision::Redirect(_) => RootView::Content,
    }
}

/// One option of the appearance picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeOption {
    /// Mode selected by this option
    pub mode: ThemeMode,
    /// Option text
    pub label: &'static str,
    /// Option icon
    pub icon: Icon,
    /// Whether this is the current preference
    pub selected: bool,
}

/// Options of the appearance picker, marking the current preference
pub fn theme_options(current: ThemeMode) -> Vec<ThemeOption> {
    ThemeMode::all()
        .into_iter()
        .map(|mode| {
            let (label, icon) = match mode {
                ThemeMode::Light => ("Light", Icon::Sun),
                ThemeMode::Dark => ("Dark", Icon::Moon),
                ThemeMode::System => ("System", Icon::Phone),
            };
            ThemeOption { mode, label, icon, selected: mode == current }
        })
        .collect()
}

/// Status bar content style for a theme
pub fn status_bar_style(theme: &Theme) -> &'static str {
    if theme.is_dark() {
        "light-content"
    } else {
        "dark-content"
    }
}
