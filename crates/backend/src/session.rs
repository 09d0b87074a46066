use {
    crate::{
        Device, InferError, InferenceObserver, ModelFile, ModelFileNames, ModelFileResolver,
        ModelLayout, ModelLoad, NativeRequest, Result, Runtime, RuntimeContext, SessionOptions,
        classify, from_native, to_native,
    },
    base::TensorValue,
    std::{
        collections::HashMap,
        fmt,
        panic::{AssertUnwindSafe, catch_unwind},
        sync::Arc,
        time::{Duration, Instant},
    },
};

/// One compiled model on one device, with its inference request.
///
/// `run` takes `&mut self`: a session runs one inference at a time. Build
/// more sessions (they share the runtime) for concurrent inference.
pub struct EngineSession<R: Runtime> {
    runtime: Arc<R>,
    request: Option<R::Request>,
    input_names: Vec<String>,
    output_names: Vec<String>,
    device: Device,
    files: Vec<String>,
    observer: Option<Arc<dyn InferenceObserver>>,
}

impl<R: Runtime> EngineSession<R> {
    /// Resolve, load and compile a model.
    ///
    /// `files` is one name or a list; an `.xml`/`.bin` pair is reordered
    /// topology first. Nothing is retried: a missing file fails with
    /// [`InferError::ModelFileUnavailable`], a read or compile failure with
    /// [`InferError::ModelLoad`].
    pub async fn create<F: ModelFileResolver>(
        context: &RuntimeContext<R>,
        resolver: &F,
        location: &str,
        files: impl Into<ModelFileNames>,
        options: SessionOptions,
    ) -> Result<Self> {
        let names = files.into().into_vec();
        if names.is_empty() {
            return Err(InferError::InvalidFileSet(names));
        }
        let ordered = classify(&names)?;

        let mut resolved = Vec::with_capacity(ordered.len());
        for name in &ordered {
            let source = resolver
                .resolve(location, name, true, &options.resolve)
                .await
                .map_err(|e| match e {
                    InferError::ModelFileUnavailable { .. } => e,
                    other => InferError::ModelFileUnavailable {
                        file: name.clone(),
                        reason: other.to_string(),
                    },
                })?
                .ok_or_else(|| InferError::ModelFileUnavailable {
                    file: name.clone(),
                    reason: "resolver returned no file".to_string(),
                })?;
            resolved.push(ModelFile::new(name.clone(), source));
        }

        let device = options.device.clone();
        let model_load_error = |reason: String| InferError::ModelLoad {
            device: device.to_string(),
            files: ordered.clone(),
            reason,
        };

        let runtime = context
            .get_or_create()
            .await
            .map_err(|e| model_load_error(e.to_string()))?;

        log::info!(
            "loading {:?} ({:?}) from {} on {} with {}",
            ordered,
            ModelLayout::of(&ordered),
            location,
            device,
            runtime.name()
        );

        let load = ModelLoad::from_files(resolved)?;
        let task_runtime = Arc::clone(&runtime);
        let task_device = device.clone();
        let loaded = tokio::task::spawn_blocking(move || -> Result<_> {
            let model = task_runtime.read_model(load)?;
            let request = task_runtime.compile_model(&model, &task_device)?;
            let input_names = request.input_names().to_vec();
            let output_names = request.output_names().to_vec();
            Ok((input_names, output_names, request))
        })
        .await
        .map_err(|e| model_load_error(format!("load task failed: {e}")))?;
        let (input_names, output_names, request) =
            loaded.map_err(|e| model_load_error(e.to_string()))?;

        log::debug!("model inputs {:?}, outputs {:?}", input_names, output_names);

        Ok(Self {
            runtime,
            request: Some(request),
            input_names,
            output_names,
            device,
            files: ordered,
            observer: options.observer,
        })
    }

    /// Run one inference.
    ///
    /// Every input is converted before the runtime is called, so an
    /// unsupported element type fails without running anything. Only the
    /// native call is timed and reported to the observer.
    pub async fn run(
        &mut self,
        inputs: HashMap<String, TensorValue>,
    ) -> Result<HashMap<String, TensorValue>> {
        // Conversion errors take precedence over unknown names, whatever the map order.
        let native_inputs = inputs
            .iter()
            .map(|(name, value)| Ok((name.clone(), to_native(value)?)))
            .collect::<Result<Vec<_>>>()?;
        if let Some((name, _)) = native_inputs
            .iter()
            .find(|(name, _)| !self.input_names.contains(name))
        {
            return Err(InferError::Inference(format!(
                "unknown input {:?}, model expects {:?}",
                name, self.input_names
            )));
        }

        let mut request = self.request.take().ok_or_else(|| {
            InferError::Inference("inference request lost by an earlier failed run".to_string())
        })?;

        let (request, result, elapsed) = tokio::task::spawn_blocking(move || {
            let start = Instant::now();
            let result = request.infer(native_inputs);
            let elapsed = start.elapsed();
            (request, result, elapsed)
        })
        .await
        .map_err(|e| InferError::Inference(format!("inference task failed: {e}")))?;
        self.request = Some(request);
        let native_outputs = result?;

        self.notify(elapsed);

        native_outputs
            .into_iter()
            .map(|(name, tensor)| Ok((name, from_native(tensor)?)))
            .collect()
    }

    fn notify(&self, elapsed: Duration) {
        let Some(observer) = &self.observer else {
            return;
        };
        if catch_unwind(AssertUnwindSafe(|| observer.on_inference(elapsed))).is_err() {
            log::warn!("inference observer panicked; result unaffected");
        }
    }

    /// Input names declared by the model, in model order.
    pub fn input_names(&self) -> &[String] {
        &self.input_names
    }

    pub fn output_names(&self) -> &[String] {
        &self.output_names
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// The model files in the order they were loaded.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn runtime_name(&self) -> &str {
        self.runtime.name()
    }
}

impl<R: Runtime> fmt::Debug for EngineSession<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineSession")
            .field("runtime", &self.runtime.name())
            .field("device", &self.device)
            .field("files", &self.files)
            .field("input_names", &self.input_names)
            .field("output_names", &self.output_names)
            .finish()
    }
}
