//! Inference backend: resolve model files, load and compile them on a
//! device, and run named tensors through the compiled model.

pub mod backends;
pub mod classify;
pub mod device;
pub mod error;
pub mod modelsource;
pub mod options;
pub mod precision;
pub mod resolver;
pub mod runtime;
pub mod session;

pub use base::{ElementType, TensorData, TensorValue};
pub use classify::{ModelLayout, classify, is_ir_file};
pub use device::Device;
pub use error::{InferError, Result};
pub use modelsource::{ModelFile, ModelFileNames, ModelSource};
pub use options::{BackendConfig, InferenceObserver, SessionOptions};
pub use precision::{
    NativeElementType, NativeTensor, from_native, from_native_type, to_native, to_native_type,
};
pub use resolver::{
    LocalResolver, ModelFileResolver, ProgressCallback, ProgressEvent, ResolveOptions,
};
pub use runtime::{ModelLoad, NativeRequest, Runtime, RuntimeContext};
pub use session::EngineSession;
