use std::path::PathBuf;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal error types. Problems inside directives are warnings, not errors.
#[derive(Debug)]
pub enum Error {
    ParseError { file: PathBuf, message: String },
    InvalidArgument(String),
    SerializationError(String),
    /// `location -> $ref` pairs whose target is missing from `components`
    DanglingReferences(Vec<String>),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::ParseError { file, message } => {
                write!(f, "Parse error {}: {}", file.display(), message)
            }
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::DanglingReferences(refs) => {
                write!(f, "{} unresolved reference(s): {}", refs.len(), refs.join(", "))
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON serialization error: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::SerializationError(format!("YAML serialization error: {}", err))
    }
}
