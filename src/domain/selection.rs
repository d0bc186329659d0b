use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::view_mode::ViewMode;

/// Lookup key for the focused entity. Always re-resolved against the active
/// collection; never holds the entity itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum FocusRef {
    Property(String),
    Complex(String),
}

impl FocusRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Property(id) | Self::Complex(id) => id,
        }
    }

    /// The view mode whose collection this reference points into.
    pub fn mode(&self) -> ViewMode {
        match self {
            Self::Property(_) => ViewMode::Properties,
            Self::Complex(_) => ViewMode::Complexes,
        }
    }
}

impl std::fmt::Display for FocusRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Property(id) => write!(f, "property {id}"),
            Self::Complex(id) => write!(f, "complex {id}"),
        }
    }
}

/// The agent's shortlist plus the single focused listing.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    shortlist: BTreeSet<String>,
    focus: Option<FocusRef>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the focused reference. The shortlist is untouched.
    pub fn focus(&mut self, target: FocusRef) {
        self.focus = Some(target);
    }

    pub fn clear_focus(&mut self) -> Option<FocusRef> {
        self.focus.take()
    }

    pub fn focused(&self) -> Option<&FocusRef> {
        self.focus.as_ref()
    }

    /// Adds the id if absent, removes it if present. Unknown ids are accepted.
    /// Returns whether the id is shortlisted afterwards.
    pub fn toggle_shortlist(&mut self, id: &str) -> bool {
        if self.shortlist.remove(id) {
            false
        } else {
            self.shortlist.insert(id.to_string());
            true
        }
    }

    pub fn is_shortlisted(&self, id: &str) -> bool {
        self.shortlist.contains(id)
    }

    pub fn shortlist(&self) -> &BTreeSet<String> {
        &self.shortlist
    }

    /// Clears shortlist and focus together.
    pub fn reset_all(&mut self) {
        self.shortlist.clear();
        self.focus = None;
    }
}
