use {
    crate::{
        Device, EngineSession, InferError, LocalResolver, ModelFileNames, ModelLoad, ModelSource,
        NativeElementType, NativeRequest, NativeTensor, Result, Runtime, RuntimeContext,
        SessionOptions,
    },
    ndarray::{ArrayD, IxDyn},
    ort::{
        execution_providers::ExecutionProviderDispatch,
        session::Session,
        value::{DynValue, Tensor, TensorElementType, ValueType},
    },
    std::sync::LazyLock,
};

pub type OnnxSession = EngineSession<OnnxRuntime>;

static SHARED_CONTEXT: LazyLock<RuntimeContext<OnnxRuntime>> =
    LazyLock::new(|| RuntimeContext::new(OnnxRuntime::new));

pub fn shared_context() -> &'static RuntimeContext<OnnxRuntime> {
    &SHARED_CONTEXT
}

/// Load an ONNX model from the local filesystem.
pub async fn load(
    location: &str,
    files: impl Into<ModelFileNames>,
    options: SessionOptions,
) -> Result<OnnxSession> {
    EngineSession::create(shared_context(), &LocalResolver::new(), location, files, options).await
}

fn ort_error(context: &str) -> impl Fn(ort::Error) -> InferError + '_ {
    move |e| InferError::Inference(format!("{context}: {e}"))
}

/// ONNX Runtime behind the [`Runtime`] seam. Single-file models only.
pub struct OnnxRuntime;

impl OnnxRuntime {
    /// The ONNX Runtime environment itself is created by `ort` on the first
    /// session build.
    pub fn new() -> Result<Self> {
        Ok(Self)
    }
}

/// Execution providers for `device`; `None` when this build cannot serve it.
fn execution_providers(device: &Device) -> Option<Vec<ExecutionProviderDispatch>> {
    match device {
        Device::Auto | Device::Cpu => Some(Vec::new()),
        #[cfg(feature = "cuda")]
        Device::Gpu { index } => {
            use ort::execution_providers::{CUDAExecutionProvider, ExecutionProvider};
            let ep = CUDAExecutionProvider::default().with_device_id(index.unwrap_or(0) as i32);
            log::info!(
                "CUDA execution provider requested (device {}), available: {}",
                index.unwrap_or(0),
                ep.is_available().unwrap_or(false)
            );
            Some(vec![ep.build().error_on_failure()])
        }
        _ => None,
    }
}

fn commit(providers: Vec<ExecutionProviderDispatch>, source: &ModelSource) -> Result<Session> {
    let builder = Session::builder().map_err(ort_error("failed to create session builder"))?;
    let mut builder = if providers.is_empty() {
        builder
    } else {
        builder
            .with_execution_providers(providers)
            .map_err(ort_error("failed to register execution providers"))?
    };
    match source {
        ModelSource::File(path) => builder
            .commit_from_file(path)
            .map_err(ort_error("failed to load model from file")),
        ModelSource::Memory(bytes) => builder
            .commit_from_memory(bytes)
            .map_err(ort_error("failed to load model from memory")),
    }
}

/// Build a session on `device`, retrying on CPU when the requested provider fails.
fn build_session(device: &Device, source: &ModelSource) -> Result<Session> {
    let providers = match execution_providers(device) {
        Some(providers) => providers,
        None => {
            log::warn!("{} is not available to ONNX Runtime, using CPU", device);
            Vec::new()
        }
    };
    if providers.is_empty() {
        return commit(providers, source);
    }
    commit(providers, source).or_else(|err| {
        log::warn!("{} session failed ({}), falling back to CPU", device, err);
        commit(Vec::new(), source)
    })
}

impl Runtime for OnnxRuntime {
    type Model = ModelSource;
    type Request = OnnxRequest;

    fn name(&self) -> &str {
        "onnx"
    }

    fn read_model(&self, load: ModelLoad) -> Result<ModelSource> {
        match load {
            ModelLoad::Single { model, auxiliary } => {
                if !auxiliary.is_empty() {
                    log::debug!(
                        "{} auxiliary files left for ONNX Runtime to find",
                        auxiliary.len()
                    );
                }
                Ok(model.source)
            }
            ModelLoad::Pair { model, weights } => Err(InferError::Config(format!(
                "ONNX Runtime loads single-file models, got {} and {}",
                model.name, weights.name
            ))),
        }
    }

    fn compile_model(&self, model: &ModelSource, device: &Device) -> Result<OnnxRequest> {
        let session = build_session(device, model)?;
        let inputs = session.inputs();
        let input_names = inputs.iter().map(|input| input.name().to_string()).collect();
        let input_types = inputs.iter().map(|input| declared_type(input.dtype())).collect();
        let output_names = session
            .outputs()
            .iter()
            .map(|output| output.name().to_string())
            .collect();
        Ok(OnnxRequest {
            session,
            input_names,
            input_types,
            output_names,
        })
    }
}

pub struct OnnxRequest {
    session: Session,
    input_names: Vec<String>,
    // parallel to input_names
    input_types: Vec<Option<TensorElementType>>,
    output_names: Vec<String>,
}

fn declared_type(ty: &ValueType) -> Option<TensorElementType> {
    match ty {
        ValueType::Tensor { ty, .. } => Some(*ty),
        _ => None,
    }
}

impl NativeRequest for OnnxRequest {
    fn input_names(&self) -> &[String] {
        &self.input_names
    }

    fn output_names(&self) -> &[String] {
        &self.output_names
    }

    fn infer(
        &mut self,
        inputs: Vec<(String, NativeTensor)>,
    ) -> Result<Vec<(String, NativeTensor)>> {
        let mut values: Vec<(String, DynValue)> = Vec::with_capacity(inputs.len());
        for (name, tensor) in inputs {
            let declared = self
                .input_names
                .iter()
                .position(|input| *input == name)
                .and_then(|index| self.input_types[index]);
            values.push((name, native_to_value(tensor, declared)?));
        }

        let outputs = self.session.run(values).map_err(ort_error("inference failed"))?;

        let mut result = Vec::with_capacity(self.output_names.len());
        for name in &self.output_names {
            let value = outputs
                .get(name.as_str())
                .ok_or_else(|| InferError::Inference(format!("output {:?} missing", name)))?;
            result.push((name.clone(), value_to_native(value)?));
        }
        Ok(result)
    }
}

fn array<T>(shape: &[usize], data: Vec<T>) -> Result<ArrayD<T>> {
    ArrayD::from_shape_vec(IxDyn(shape), data)
        .map_err(|e| InferError::Inference(format!("failed to create ndarray from tensor: {e}")))
}

macro_rules! decode {
    ($bytes:expr, $ty:ty) => {
        $bytes
            .chunks_exact(std::mem::size_of::<$ty>())
            .map(|chunk| {
                let mut raw = [0u8; std::mem::size_of::<$ty>()];
                raw.copy_from_slice(chunk);
                <$ty>::from_ne_bytes(raw)
            })
            .collect::<Vec<$ty>>()
    };
}

/// Build an ONNX value from `tensor`. A `u8` tensor bound to an input the
/// model declares as `bool` is sent as `bool` (`b != 0`).
pub fn native_to_value(
    tensor: NativeTensor,
    declared: Option<TensorElementType>,
) -> Result<DynValue> {
    let value = match tensor.element_type {
        NativeElementType::U8 if declared == Some(TensorElementType::Bool) => {
            let flags = tensor.data.iter().map(|&b| b != 0).collect::<Vec<bool>>();
            Tensor::from_array(array(&tensor.shape, flags)?).map(|t| t.into_dyn())
        }
        NativeElementType::F32 => {
            let values = decode!(tensor.data, f32);
            Tensor::from_array(array(&tensor.shape, values)?).map(|t| t.into_dyn())
        }
        NativeElementType::I64 => {
            let values = decode!(tensor.data, i64);
            Tensor::from_array(array(&tensor.shape, values)?).map(|t| t.into_dyn())
        }
        NativeElementType::U8 => {
            Tensor::from_array(array(&tensor.shape, tensor.data)?).map(|t| t.into_dyn())
        }
        other => return Err(InferError::UnsupportedPrecision(format!("onnx input {}", other))),
    };
    value.map_err(ort_error("failed to create input tensor"))
}

pub fn value_to_native(value: &DynValue) -> Result<NativeTensor> {
    let ValueType::Tensor { ty, .. } = value.dtype() else {
        return Err(InferError::UnsupportedPrecision("non-tensor output".to_string()));
    };
    let (element_type, shape, data) = match ty {
        TensorElementType::Float32 => {
            let array = value
                .try_extract_array::<f32>()
                .map_err(ort_error("failed to read f32 output"))?;
            let data = array.iter().flat_map(|v| v.to_ne_bytes()).collect();
            (NativeElementType::F32, array.shape().to_vec(), data)
        }
        TensorElementType::Int64 => {
            let array = value
                .try_extract_array::<i64>()
                .map_err(ort_error("failed to read i64 output"))?;
            let data = array.iter().flat_map(|v| v.to_ne_bytes()).collect();
            (NativeElementType::I64, array.shape().to_vec(), data)
        }
        TensorElementType::Uint8 => {
            let array = value
                .try_extract_array::<u8>()
                .map_err(ort_error("failed to read u8 output"))?;
            (NativeElementType::U8, array.shape().to_vec(), array.iter().copied().collect())
        }
        TensorElementType::Bool => {
            let array = value
                .try_extract_array::<bool>()
                .map_err(ort_error("failed to read bool output"))?;
            let data = array.iter().map(|&b| b as u8).collect();
            (NativeElementType::Boolean, array.shape().to_vec(), data)
        }
        other => return Err(InferError::UnsupportedPrecision(format!("onnx {:?}", other))),
    };
    Ok(NativeTensor {
        element_type,
        shape,
        data,
    })
}
