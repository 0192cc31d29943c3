use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Trailing-edge delay before a content edit triggers re-analysis
    pub debounce_ms: u64,
    /// Suffix appended to the name of a duplicated document
    pub copy_suffix: String,
    /// Name given to documents created from scratch
    pub new_document_name: String,
    /// Text of the comment macro placed in a freshly created document
    pub new_document_note: String,
    /// Exempt marker and system documents from bulk removal
    pub protect_structural: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            copy_suffix: "Copy".to_string(),
            new_document_name: "New Prompt".to_string(),
            new_document_note: "New prompt".to_string(),
            protect_structural: true,
        }
    }
}

impl Config {
    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub(crate) fn new_document_content(&self) -> String {
        format!("{{{{// {}}}}}", self.new_document_note)
    }

    pub(crate) fn copy_name(&self, name: &str) -> String {
        format!("{} ({})", name, self.copy_suffix)
    }
}
