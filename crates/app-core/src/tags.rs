//! Scripture tag selection
//!
//! The selected-tag set belongs to the caller. [`TagSelector`] never mutates
//! it in place: every change is returned as a whole replacement set, and a
//! `None` return means "nothing to do".
//!
//! Local state is the search query, the filtered candidate list, the modal
//! flag, and the draft text for free-text tags.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A scripture reference label with a stable id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptureTag {
    /// Unique within a selected set
    pub id: String,
    /// Free text, e.g. "John 3:16"
    pub reference: String,
}

impl ScriptureTag {
    /// Create a tag
    pub fn new(id: impl Into<String>, reference: impl Into<String>) -> Self {
        Self { id: id.into(), reference: reference.into() }
    }
}

/// Whether `selected` holds a tag with `id`
pub fn contains_tag(selected: &[ScriptureTag], id: &str) -> bool {
    selected.iter().any(|t| t.id == id)
}

/// Suggestions whose reference contains `query`, ignoring case
///
/// An empty query returns every suggestion. Order is preserved.
pub fn filter_suggestions(suggestions: &[ScriptureTag], query: &str) -> Vec<ScriptureTag> {
    if query.is_empty() {
        return suggestions.to_vec();
    }
    let needle = query.to_lowercase();
    suggestions
        .iter()
        .filter(|t| t.reference.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// `selected` with `tag` appended, or `None` if its id is already present
pub fn with_tag(selected: &[ScriptureTag], tag: &ScriptureTag) -> Option<Vec<ScriptureTag>> {
    if contains_tag(selected, &tag.id) {
        return None;
    }
    let mut next = selected.to_vec();
    next.push(tag.clone());
    Some(next)
}

/// `selected` without any tag whose id is `id`
pub fn without_tag(selected: &[ScriptureTag], id: &str) -> Vec<ScriptureTag> {
    selected.iter().filter(|t| t.id != id).cloned().collect()
}

/// Id for a free-text tag: milliseconds since the Unix epoch
///
/// Two tags created in the same millisecond get the same id.
pub fn timestamp_tag_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

/// One row of the suggestion list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRow {
    /// The suggested tag
    pub tag: ScriptureTag,
    /// Whether the tag is already selected (checkmark)
    pub is_selected: bool,
}

type IdSource = Box<dyn Fn() -> String + Send + Sync>;

/// Local state of the scripture tag picker
pub struct TagSelector {
    suggestions: Vec<ScriptureTag>,
    search_query: String,
    candidates: Vec<ScriptureTag>,
    modal_open: bool,
    draft_text: String,
    id_source: IdSource,
}

impl std::fmt::Debug for TagSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagSelector")
            .field("suggestions", &self.suggestions.len())
            .field("search_query", &self.search_query)
            .field("candidates", &self.candidates.len())
            .field("modal_open", &self.modal_open)
            .field("draft_text", &self.draft_text)
            .finish()
    }
}

impl TagSelector {
    /// Create a selector over a suggestion source
    pub fn new(suggestions: Vec<ScriptureTag>) -> Self {
        let candidates = suggestions.clone();
        Self {
            suggestions,
            search_query: String::new(),
            candidates,
            modal_open: false,
            draft_text: String::new(),
            id_source: Box::new(timestamp_tag_id),
        }
    }

    /// Use a custom id generator for free-text tags
    pub fn with_id_source(mut self, source: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.id_source = Box::new(source);
        self
    }

    /// Suggestion source
    pub fn suggestions(&self) -> &[ScriptureTag] {
        &self.suggestions
    }

    /// Replace the suggestion source and refilter
    pub fn set_suggestions(&mut self, suggestions: Vec<ScriptureTag>) {
        self.suggestions = suggestions;
        self.refilter();
    }

    /// Current search query
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Update the search query and refilter
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.refilter();
    }

    /// Suggestions matching the current query
    pub fn candidates(&self) -> &[ScriptureTag] {
        &self.candidates
    }

    fn refilter(&mut self) {
        self.candidates = filter_suggestions(&self.suggestions, &self.search_query);
    }

    /// Whether the picker modal is shown
    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    /// Show the picker modal
    pub fn open_modal(&mut self) {
        self.modal_open = true;
    }

    /// Hide the picker modal
    pub fn close_modal(&mut self) {
        self.modal_open = false;
    }

    /// Free-text draft
    pub fn draft_text(&self) -> &str {
        &self.draft_text
    }

    /// Update the free-text draft
    pub fn set_draft_text(&mut self, text: impl Into<String>) {
        self.draft_text = text.into();
    }

    /// Add a tag to the selection
    ///
    /// Returns `None` without touching local state when the id is already
    /// selected. Otherwise appends the tag and clears the search query. The
    /// modal stays as it is.
    pub fn add_tag(
        &mut self,
        selected: &[ScriptureTag],
        tag: &ScriptureTag,
    ) -> Option<Vec<ScriptureTag>> {
        let next = with_tag(selected, tag)?;
        self.set_search_query(String::new());
        Some(next)
    }

    /// Tap on a suggestion row: add it and close the modal
    pub fn tap_suggestion(
        &mut self,
        selected: &[ScriptureTag],
        tag: &ScriptureTag,
    ) -> Option<Vec<ScriptureTag>> {
        let next = self.add_tag(selected, tag);
        self.close_modal();
        next
    }

    /// Remove a tag by id; an unknown id leaves the set as it was
    pub fn remove_tag(&self, selected: &[ScriptureTag], id: &str) -> Vec<ScriptureTag> {
        without_tag(selected, id)
    }

    /// Create a free-text tag from `text`
    ///
    /// Blank text is ignored. Otherwise a tag with a fresh id and the trimmed
    /// text is appended, the draft is cleared, and the modal closes. If the
    /// fresh id collides with a selected tag the set is left unchanged.
    pub fn create_new_tag(
        &mut self,
        selected: &[ScriptureTag],
        text: &str,
    ) -> Option<Vec<ScriptureTag>> {
        let reference = text.trim();
        if reference.is_empty() {
            return None;
        }

        let tag = ScriptureTag::new((self.id_source)(), reference);
        let next = with_tag(selected, &tag);
        if next.is_none() {
            tracing::warn!(id = %tag.id, "generated tag id already selected; tag not added");
        }

        self.draft_text.clear();
        self.close_modal();
        next
    }

    /// Create a free-text tag from the current draft
    pub fn submit_draft(&mut self, selected: &[ScriptureTag]) -> Option<Vec<ScriptureTag>> {
        let text = self.draft_text.clone();
        self.create_new_tag(selected, &text)
    }

    /// Candidate rows with their checkmark state
    pub fn suggestion_rows(&self, selected: &[ScriptureTag]) -> Vec<SuggestionRow> {
        self.candidates
            .iter()
            .map(|tag| SuggestionRow {
                tag: tag.clone(),
                is_selected: contains_tag(selected, &tag.id),
            })
            .collect()
    }
}
