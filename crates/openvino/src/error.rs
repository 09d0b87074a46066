use crate::ffi::Status;
use std::fmt;

#[derive(Debug, Clone)]
pub enum OpenVinoError {
    /// `libopenvino_c` could not be opened or lacks a required symbol.
    Library(String),
    /// A C API call returned a non-OK status.
    Status {
        call: &'static str,
        status: Status,
        message: String,
    },
    /// An argument could not be passed across the boundary.
    Invalid(String),
}

impl OpenVinoError {
    pub fn status(&self) -> Option<Status> {
        match self {
            OpenVinoError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for OpenVinoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenVinoError::Library(msg) => write!(f, "OpenVINO library error: {msg}"),
            OpenVinoError::Status {
                call,
                status,
                message,
            } => write!(f, "{call} failed ({status:?}): {message}"),
            OpenVinoError::Invalid(msg) => write!(f, "invalid argument: {msg}"),
        }
    }
}

impl std::error::Error for OpenVinoError {}

pub type Result<T> = std::result::Result<T, OpenVinoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_implements_error_trait() {
        fn assert_error<T: std::error::Error>(_: &T) {}
        assert_error(&OpenVinoError::Library("missing".to_string()));
    }

    #[test]
    fn test_error_display() {
        let err = OpenVinoError::Status {
            call: "ov_core_read_model",
            status: Status::NetworkNotRead,
            message: "cannot parse model.xml".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("ov_core_read_model"));
        assert!(display.contains("NetworkNotRead"));
        assert!(display.contains("cannot parse model.xml"));
        assert_eq!(err.status(), Some(Status::NetworkNotRead));
        assert_eq!(OpenVinoError::Invalid("x".into()).status(), None);
    }
}
