use {
    crate::{
        Device, EngineSession, InferError, LocalResolver, ModelFileNames, ModelLoad, ModelSource,
        NativeElementType, NativeRequest, NativeTensor, Result, Runtime, RuntimeContext,
        SessionOptions,
    },
    openvino::{CompiledModel, Core, ElementType, InferRequest, Model, OpenVino, Tensor},
    std::sync::{Arc, LazyLock},
};

pub type OpenVinoSession = EngineSession<OpenVinoRuntime>;

static SHARED_CONTEXT: LazyLock<RuntimeContext<OpenVinoRuntime>> =
    LazyLock::new(|| RuntimeContext::new(OpenVinoRuntime::new));

/// The process-wide OpenVINO context. The `Core` is created on first use.
pub fn shared_context() -> &'static RuntimeContext<OpenVinoRuntime> {
    &SHARED_CONTEXT
}

/// Load a model from the local filesystem on the shared OpenVINO core.
pub async fn load(
    location: &str,
    files: impl Into<ModelFileNames>,
    options: SessionOptions,
) -> Result<OpenVinoSession> {
    EngineSession::create(shared_context(), &LocalResolver::new(), location, files, options).await
}

pub fn to_ov_type(ty: NativeElementType) -> ElementType {
    match ty {
        NativeElementType::Undefined => ElementType::Undefined,
        NativeElementType::Boolean => ElementType::Boolean,
        NativeElementType::Bf16 => ElementType::Bf16,
        NativeElementType::F16 => ElementType::F16,
        NativeElementType::F32 => ElementType::F32,
        NativeElementType::F64 => ElementType::F64,
        NativeElementType::I8 => ElementType::I8,
        NativeElementType::I16 => ElementType::I16,
        NativeElementType::I32 => ElementType::I32,
        NativeElementType::I64 => ElementType::I64,
        NativeElementType::U8 => ElementType::U8,
        NativeElementType::U16 => ElementType::U16,
        NativeElementType::U32 => ElementType::U32,
        NativeElementType::U64 => ElementType::U64,
        NativeElementType::String => ElementType::String,
    }
}

pub fn from_ov_type(ty: ElementType) -> Result<NativeElementType> {
    let native = match ty {
        ElementType::Undefined => NativeElementType::Undefined,
        ElementType::Boolean => NativeElementType::Boolean,
        ElementType::Bf16 => NativeElementType::Bf16,
        ElementType::F16 => NativeElementType::F16,
        ElementType::F32 => NativeElementType::F32,
        ElementType::F64 => NativeElementType::F64,
        ElementType::I8 => NativeElementType::I8,
        ElementType::I16 => NativeElementType::I16,
        ElementType::I32 => NativeElementType::I32,
        ElementType::I64 => NativeElementType::I64,
        ElementType::U8 => NativeElementType::U8,
        ElementType::U16 => NativeElementType::U16,
        ElementType::U32 => NativeElementType::U32,
        ElementType::U64 => NativeElementType::U64,
        ElementType::String => NativeElementType::String,
        ElementType::Dynamic
        | ElementType::I4
        | ElementType::U1
        | ElementType::U2
        | ElementType::U3
        | ElementType::U4
        | ElementType::U6
        | ElementType::Nf4
        | ElementType::F8E4M3
        | ElementType::F8E5M2 => {
            return Err(InferError::UnsupportedPrecision(format!("openvino {}", ty)));
        }
    };
    Ok(native)
}

fn source_bytes(source: ModelSource) -> Result<Vec<u8>> {
    match source {
        ModelSource::Memory(bytes) => Ok(bytes),
        ModelSource::File(path) => Ok(std::fs::read(path)?),
    }
}

/// OpenVINO `Core` behind the [`Runtime`] seam.
pub struct OpenVinoRuntime {
    core: Core,
}

impl OpenVinoRuntime {
    /// Load `libopenvino_c` (see [`openvino::OpenVino::load`]) and create a core.
    pub fn new() -> Result<Self> {
        let ov = OpenVino::load().map_err(|e| InferError::Config(e.to_string()))?;
        Self::with_library(ov)
    }

    pub fn with_library(ov: Arc<OpenVino>) -> Result<Self> {
        let core = Core::new(ov)?;
        Ok(Self { core })
    }
}

impl Runtime for OpenVinoRuntime {
    type Model = OpenVinoModel;
    type Request = OpenVinoRequest;

    fn name(&self) -> &str {
        "openvino"
    }

    fn read_model(&self, load: ModelLoad) -> Result<OpenVinoModel> {
        let model = match load {
            ModelLoad::Pair { model, weights } => match (model.source, weights.source) {
                (ModelSource::File(model), ModelSource::File(weights)) => {
                    self.core.read_model(&model, Some(&weights))?
                }
                (model, weights) => {
                    let model = source_bytes(model)?;
                    let weights = source_bytes(weights)?;
                    self.core.read_model_from_memory(&model, Some(&weights))?
                }
            },
            ModelLoad::Single { model, auxiliary } => {
                if !auxiliary.is_empty() {
                    // OpenVINO frontends find companion files next to the model themselves.
                    log::debug!("{} auxiliary files not passed to OpenVINO", auxiliary.len());
                }
                match model.source {
                    ModelSource::File(path) => self.core.read_model(&path, None)?,
                    ModelSource::Memory(bytes) => self.core.read_model_from_memory(&bytes, None)?,
                }
            }
        };
        Ok(OpenVinoModel { model })
    }

    fn compile_model(&self, model: &OpenVinoModel, device: &Device) -> Result<OpenVinoRequest> {
        let compiled = self.core.compile_model(&model.model, &device.to_string())?;
        let request = compiled.create_infer_request()?;
        Ok(OpenVinoRequest {
            ov: Arc::clone(self.core.openvino()),
            input_names: model.model.input_names()?,
            output_names: model.model.output_names()?,
            request,
            _compiled: compiled,
        })
    }
}

pub struct OpenVinoModel {
    model: Model,
}

pub struct OpenVinoRequest {
    ov: Arc<OpenVino>,
    input_names: Vec<String>,
    output_names: Vec<String>,
    // Declared before the compiled model so it is freed first.
    request: InferRequest,
    _compiled: CompiledModel,
}

impl NativeRequest for OpenVinoRequest {
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
        for (name, input) in inputs {
            let tensor = Tensor::new(
                &self.ov,
                to_ov_type(input.element_type),
                &input.shape,
                &input.data,
            )?;
            self.request.set_tensor(&name, &tensor)?;
        }

        self.request.start_async()?;
        self.request.wait()?;

        let mut outputs = Vec::with_capacity(self.output_names.len());
        for name in &self.output_names {
            let tensor = self.request.get_tensor(name)?;
            let element_type = from_ov_type(tensor.element_type()?)?;
            outputs.push((
                name.clone(),
                NativeTensor {
                    element_type,
                    shape: tensor.shape()?,
                    data: tensor.to_bytes()?,
                },
            ));
        }
        Ok(outputs)
    }
}
