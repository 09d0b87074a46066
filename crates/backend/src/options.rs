use {
    crate::{Device, InferError, ProgressEvent, ResolveOptions, Result},
    serde::{Deserialize, Serialize},
    std::{
        fmt,
        path::{Path, PathBuf},
        sync::Arc,
        time::Duration,
    },
};

/// Told how long each native inference call took.
///
/// Called synchronously after a successful call. A panic inside the observer
/// is caught and logged; it never changes what `run` returns.
pub trait InferenceObserver: Send + Sync {
    fn on_inference(&self, elapsed: Duration);
}

impl<F> InferenceObserver for F
where
    F: Fn(Duration) + Send + Sync,
{
    fn on_inference(&self, elapsed: Duration) {
        self(elapsed)
    }
}

/// Options for [`EngineSession::create`](crate::EngineSession::create).
#[derive(Clone, Default)]
pub struct SessionOptions {
    pub device: Device,
    pub observer: Option<Arc<dyn InferenceObserver>>,
    pub resolve: ResolveOptions,
}

impl SessionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(mut self, device: impl Into<Device>) -> Self {
        self.device = device.into();
        self
    }

    pub fn with_observer(mut self, observer: impl InferenceObserver + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resolve.cache_dir = Some(dir.into());
        self
    }

    pub fn with_progress(
        mut self,
        progress: impl Fn(&ProgressEvent) + Send + Sync + 'static,
    ) -> Self {
        self.resolve.progress = Some(Arc::new(progress));
        self
    }

    pub fn in_memory(mut self, in_memory: bool) -> Self {
        self.resolve.in_memory = in_memory;
        self
    }
}

impl fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionOptions")
            .field("device", &self.device)
            .field("observer", &self.observer.is_some())
            .field("resolve", &self.resolve)
            .finish()
    }
}

/// Session defaults read from a JSON file.
///
/// ```json
/// { "device": "GPU.1", "cache_dir": "/var/cache/models", "in_memory": false }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    pub device: Option<String>,
    pub cache_dir: Option<PathBuf>,
    pub in_memory: bool,
}

impl BackendConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| InferError::Config(format!("failed to parse backend config: {e}")))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| InferError::Io(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn to_options(&self) -> SessionOptions {
        let mut options = SessionOptions::new().in_memory(self.in_memory);
        if let Some(device) = &self.device {
            options = options.with_device(device.as_str());
        }
        if let Some(dir) = &self.cache_dir {
            options = options.with_cache_dir(dir.clone());
        }
        options
    }
}
