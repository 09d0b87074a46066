use base::TensorError;
use openvino::OpenVinoError;
use std::fmt;

#[derive(Debug, Clone)]
pub enum InferError {
    /// The resolver could not produce a required model file.
    ModelFileUnavailable { file: String, reason: String },
    /// A two-file `.xml`/`.bin` set that is not one of each.
    InvalidFileSet(Vec<String>),
    /// The runtime failed to read or compile the model.
    ModelLoad {
        device: String,
        files: Vec<String>,
        reason: String,
    },
    /// An element type with no counterpart on the other side of the bridge.
    UnsupportedPrecision(String),
    /// The native inference call failed.
    Inference(String),
    Tensor(TensorError),
    Config(String),
    Io(String),
}

impl fmt::Display for InferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferError::ModelFileUnavailable { file, reason } => {
                write!(f, "model file {file:?} unavailable: {reason}")
            }
            InferError::InvalidFileSet(files) => {
                write!(f, "invalid model file set {files:?}: expected one .xml and one .bin")
            }
            InferError::ModelLoad {
                device,
                files,
                reason,
            } => write!(f, "failed to load model {files:?} on {device}: {reason}"),
            InferError::UnsupportedPrecision(ty) => write!(f, "unsupported precision: {ty}"),
            InferError::Inference(msg) => write!(f, "inference failed: {msg}"),
            InferError::Tensor(err) => write!(f, "tensor error: {err}"),
            InferError::Config(msg) => write!(f, "config error: {msg}"),
            InferError::Io(msg) => write!(f, "io error: {msg}"),
        }
    }
}

impl std::error::Error for InferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InferError::Tensor(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TensorError> for InferError {
    fn from(err: TensorError) -> Self {
        InferError::Tensor(err)
    }
}

impl From<std::io::Error> for InferError {
    fn from(err: std::io::Error) -> Self {
        InferError::Io(err.to_string())
    }
}

impl From<OpenVinoError> for InferError {
    fn from(err: OpenVinoError) -> Self {
        InferError::Inference(err.to_string())
    }
}

impl From<serde_json::Error> for InferError {
    fn from(err: serde_json::Error) -> Self {
        InferError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, InferError>;
