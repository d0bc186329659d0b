use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PortalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Properties,
    Complexes,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Properties => "properties",
            Self::Complexes => "complexes",
        }
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "properties" | "property" => Ok(Self::Properties),
            "complexes" | "complex" => Ok(Self::Complexes),
            _ => Err(PortalError::UnknownViewMode(s.to_string())),
        }
    }
}

/// Two-state, cyclic switch between the property and complex views.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewModeState {
    mode: ViewMode,
}

impl ViewModeState {
    pub fn new(mode: ViewMode) -> Self {
        Self { mode }
    }

    pub fn current(self) -> ViewMode {
        self.mode
    }

    /// Unconditional switch. Returns true when the mode actually changed.
    pub fn switch_to(&mut self, mode: ViewMode) -> bool {
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }
}
