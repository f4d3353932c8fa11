use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// A required text field of the post is empty after markup stripping.
    InvalidInput(String),
    InvalidConfig(String),
    /// The encoding engine could not be loaded (unreadable or broken font files).
    EngineUnavailable(String),
    InvalidCredentials,
    /// An exporter was asked to start while its previous export is running.
    ExportInProgress,
    Pdf(String),
    Json(serde_json::Error),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInput(reason) => write!(f, "invalid post: {reason}"),
            Error::InvalidConfig(reason) => write!(f, "invalid render config: {reason}"),
            Error::EngineUnavailable(reason) => {
                write!(f, "document engine unavailable: {reason}")
            }
            Error::InvalidCredentials => write!(f, "invalid credentials"),
            Error::ExportInProgress => write!(f, "an export is already running"),
            Error::Pdf(e) => write!(f, "PDF error: {e}"),
            Error::Json(e) => write!(f, "JSON error: {e}"),
            Error::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Json(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
