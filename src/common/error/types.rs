//! Error type definitions.
use thiserror::Error;

/// Main error type for docmeta operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No format descriptor is registered for the requested type, or the
    /// content could not be identified.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// A parser was handed a source it cannot read from at all.
    #[error("Incompatible file handle: {0}")]
    IncompatibleHandle(String),

    /// Malformed or inconsistent format configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// PDF object-stream error
    #[error("PDF error: {0}")]
    Pdf(String),
}

/// Result type for docmeta operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownFormat("mobi".to_string());
        assert_eq!(err.to_string(), "Unknown format: mobi");

        let err = Error::Config("field map key 'Foo' has no extraction rule".to_string());
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
