//! The seam between an [`EngineSession`](crate::EngineSession) and a native
//! inference runtime, plus the shared, lazily created runtime handle.

use {
    crate::{Device, InferError, ModelFile, NativeTensor, Result},
    std::{fmt, sync::Arc},
    tokio::sync::OnceCell,
};

/// The files of one model, shaped the way the runtime's reader takes them.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelLoad {
    /// Two files: model (topology) first, weights second.
    Pair { model: ModelFile, weights: ModelFile },
    /// One main file plus whatever else came with it.
    Single {
        model: ModelFile,
        auxiliary: Vec<ModelFile>,
    },
}

impl ModelLoad {
    /// Shape an ordered file list: two files become a pair, any other count a
    /// single load with the rest as auxiliary files.
    pub fn from_files(files: Vec<ModelFile>) -> Result<Self> {
        let mut files = files.into_iter();
        let (Some(model), second) = (files.next(), files.next()) else {
            return Err(InferError::InvalidFileSet(Vec::new()));
        };
        let rest: Vec<ModelFile> = files.collect();
        Ok(match (second, rest.is_empty()) {
            (None, _) => ModelLoad::Single {
                model,
                auxiliary: Vec::new(),
            },
            (Some(weights), true) => ModelLoad::Pair { model, weights },
            (Some(second), false) => {
                let mut auxiliary = Vec::with_capacity(rest.len() + 1);
                auxiliary.push(second);
                auxiliary.extend(rest);
                ModelLoad::Single { model, auxiliary }
            }
        })
    }

    pub fn file_names(&self) -> Vec<String> {
        match self {
            ModelLoad::Pair { model, weights } => vec![model.name.clone(), weights.name.clone()],
            ModelLoad::Single { model, auxiliary } => std::iter::once(model)
                .chain(auxiliary)
                .map(|f| f.name.clone())
                .collect(),
        }
    }
}

/// An inference request bound to a compiled model.
pub trait NativeRequest: Send + 'static {
    /// Input names declared by the model, in model order.
    fn input_names(&self) -> &[String];
    fn output_names(&self) -> &[String];

    /// Run one inference. Blocks until the runtime finishes.
    fn infer(&mut self, inputs: Vec<(String, NativeTensor)>) -> Result<Vec<(String, NativeTensor)>>;
}

/// A native inference runtime (OpenVINO, ONNX Runtime, a test double).
pub trait Runtime: Send + Sync + 'static {
    /// A model read but not yet compiled.
    type Model: Send + 'static;
    type Request: NativeRequest;

    fn name(&self) -> &str;
    fn read_model(&self, load: ModelLoad) -> Result<Self::Model>;
    fn compile_model(&self, model: &Self::Model, device: &Device) -> Result<Self::Request>;
}

type RuntimeInit<R> = Arc<dyn Fn() -> Result<R> + Send + Sync>;

/// Shared handle to a runtime that is created on first use.
///
/// Concurrent first calls to [`get_or_create`](Self::get_or_create) wait for
/// a single construction. A failed construction is not remembered, so the
/// next call tries again.
pub struct RuntimeContext<R: Runtime> {
    cell: OnceCell<Arc<R>>,
    init: RuntimeInit<R>,
}

impl<R: Runtime> RuntimeContext<R> {
    pub fn new(init: impl Fn() -> Result<R> + Send + Sync + 'static) -> Self {
        Self {
            cell: OnceCell::new(),
            init: Arc::new(init),
        }
    }

    /// A context around an already constructed runtime.
    pub fn with_runtime(runtime: R) -> Self {
        Self {
            cell: OnceCell::new_with(Some(Arc::new(runtime))),
            init: Arc::new(|| Err(InferError::Config("runtime already constructed".to_string()))),
        }
    }

    pub async fn get_or_create(&self) -> Result<Arc<R>> {
        let runtime = self
            .cell
            .get_or_try_init(|| async {
                let init = Arc::clone(&self.init);
                let runtime = tokio::task::spawn_blocking(move || init())
                    .await
                    .map_err(|e| {
                        InferError::Config(format!("runtime construction task failed: {e}"))
                    })??;
                log::info!("created {} runtime", runtime.name());
                Ok::<_, InferError>(Arc::new(runtime))
            })
            .await?;
        Ok(Arc::clone(runtime))
    }

    /// The runtime, if it has been created.
    pub fn get(&self) -> Option<Arc<R>> {
        self.cell.get().cloned()
    }
}

impl<R: Runtime> fmt::Debug for RuntimeContext<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeContext")
            .field("initialized", &self.cell.initialized())
            .finish()
    }
}
