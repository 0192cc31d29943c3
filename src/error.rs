use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Rename target is empty after trimming
    #[error("Variable name must not be empty")]
    EmptyName,
    /// Rename target contains whitespace
    #[error("Variable name must not contain whitespace: {0:?}")]
    InvalidName(String),
    /// Rename target contains macro delimiter characters
    #[error("Variable name must not contain ':', '{{' or '}}': {0:?}")]
    ReservedCharacter(String),
    /// Rename target already names a different variable
    #[error("Variable name already in use: {0}")]
    NameTaken(String),
    /// Variable not found in the latest analysis
    #[error("Variable not found: {0}")]
    UnknownVariable(String),
    /// Document not found in the document set
    #[error("Document not found: {0}")]
    UnknownDocument(String),
    /// Preset JSON could not be read or written
    #[error("Invalid preset: {0}")]
    Preset(String),
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Preset(err.to_string())
    }
}
