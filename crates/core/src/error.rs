#[allow(clippy::single_component_path_imports)]
use serde_yaml;

#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    /// A variant tag outside the closed entry set reached a dispatch site.
    ///
    /// This is a caller bug, not a user-input problem. It is never coerced into a default
    /// variant.
    #[error("unhandled entry type: {0:?}")]
    UnknownEntryType(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to read reference data file: {0}")]
    FileRead(std::io::Error),
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
    #[error("translation error: {0}")]
    Translation(String),
}

impl EntryError {
    /// Returns `true` for errors that indicate a caller passed a value outside the closed
    /// variant set. Hosts should treat these as fatal.
    pub fn is_programming_error(&self) -> bool {
        matches!(self, EntryError::UnknownEntryType(_))
    }
}

pub type EntryResult<T> = std::result::Result<T, EntryError>;
