//! Error types for doccheck core.

use std::{error::Error, fmt, io};

/// Error type for doccheck core operations.
#[derive(Debug)]
pub enum DocCheckError {
    /// An underlying I/O error.
    Io(io::Error),
    /// A coverage artifact that could not be decoded.
    Json(serde_json::Error),
    /// A catch-all error with a message.
    Other(String),
}

impl fmt::Display for DocCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Json(err) => write!(f, "invalid coverage json: {err}"),
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

impl Error for DocCheckError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Other(_) => None,
        }
    }
}

impl From<io::Error> for DocCheckError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for DocCheckError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Convenience result type for doccheck core.
pub type Result<T> = std::result::Result<T, DocCheckError>;

#[cfg(test)]
mod tests {
    use super::DocCheckError;
    use std::error::Error;
    use std::io;

    #[test]
    fn io_error_formats_message() {
        let error = DocCheckError::Io(io::Error::new(io::ErrorKind::Other, "boom"));
        assert_eq!(format!("{error}"), "io error: boom");
    }

    #[test]
    fn json_error_formats_message_and_keeps_source() {
        let inner = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: DocCheckError = inner.into();
        assert!(format!("{error}").starts_with("invalid coverage json:"));
        assert!(error.source().is_some());
    }

    #[test]
    fn other_error_formats_message() {
        let error = DocCheckError::Other("coverage tool missing".to_string());
        assert_eq!(format!("{error}"), "coverage tool missing");
        assert!(error.source().is_none());
    }

    #[test]
    fn from_io_error_maps_variant() {
        let error: DocCheckError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        match error {
            DocCheckError::Io(inner) => {
                assert_eq!(inner.kind(), io::ErrorKind::NotFound);
            }
            _ => panic!("expected Io variant"),
        }
    }
}
