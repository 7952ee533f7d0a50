use std::io;

/// Fallible-collaborator errors at the crate boundary.
///
/// `clip`/`multiclip`/`process` themselves are infallible (see
/// [`crate::clip::ClipReport`] for how the four recoverable defect kinds are
/// surfaced instead); this type is for the collaborators that genuinely can
/// fail: mesh ingestion, stats-file I/O, constrained triangulation.
#[derive(thiserror::Error, Debug)]
pub enum ClipError {
    #[error("mesh ingestion error: {0}")]
    Ingestion(String),
    #[error("constrained triangulation failed: {0}")]
    Triangulation(String),
    #[error("stats sink error: {0}")]
    Stats(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClipError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_strings() {
        let e = ClipError::Ingestion("bad obj".into());
        assert_eq!(e.to_string(), "mesh ingestion error: bad obj");

        let e = ClipError::Triangulation("inconsistent constraints".into());
        assert_eq!(
            e.to_string(),
            "constrained triangulation failed: inconsistent constraints"
        );

        let e = ClipError::Stats("disk full".into());
        assert_eq!(e.to_string(), "stats sink error: disk full");
    }

    #[test]
    fn from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file missing");
        let e: ClipError = io_err.into();
        assert!(matches!(e, ClipError::Io(_)));
        assert!(e.to_string().contains("file missing"));
    }
}
