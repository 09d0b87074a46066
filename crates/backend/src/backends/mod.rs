pub mod openvino;
pub use openvino::{OpenVinoRuntime, OpenVinoSession};

#[cfg(feature = "onnx")]
pub mod onnx;
#[cfg(feature = "onnx")]
pub use onnx::{OnnxRuntime, OnnxSession};
