use {
    crate::{InferError, ModelSource, Result},
    std::{
        fmt,
        future::Future,
        path::{Path, PathBuf},
        sync::Arc,
    },
};

/// Progress of a single file resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Initiate { location: String, file: String },
    Done { location: String, file: String },
}

pub type ProgressCallback = Arc<dyn Fn(&ProgressEvent) + Send + Sync>;

/// Options passed through to the resolver untouched by the session.
#[derive(Clone, Default)]
pub struct ResolveOptions {
    /// Searched before the model location itself.
    pub cache_dir: Option<PathBuf>,
    /// Read files into memory instead of handing paths to the runtime.
    pub in_memory: bool,
    pub progress: Option<ProgressCallback>,
}

impl ResolveOptions {
    pub fn report(&self, event: ProgressEvent) {
        if let Some(progress) = &self.progress {
            progress(&event);
        }
    }
}

impl fmt::Debug for ResolveOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveOptions")
            .field("cache_dir", &self.cache_dir)
            .field("in_memory", &self.in_memory)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

/// Turns a (location, file name) pair into something the runtime can load.
pub trait ModelFileResolver: Send + Sync {
    /// `Ok(None)` is only allowed when `must_exist` is false and the file is absent.
    fn resolve(
        &self,
        location: &str,
        file_name: &str,
        must_exist: bool,
        options: &ResolveOptions,
    ) -> impl Future<Output = Result<Option<ModelSource>>> + Send;
}

/// Resolves model files on the local filesystem.
///
/// Looks in `<cache_dir>/<location>/<file>` first, then in
/// `<root>/<location>/<file>` (relative to the working directory when no
/// root is set).
#[derive(Debug, Clone, Default)]
pub struct LocalResolver {
    root: Option<PathBuf>,
}

impl LocalResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    pub fn candidates(
        &self,
        location: &str,
        file_name: &str,
        options: &ResolveOptions,
    ) -> Vec<PathBuf> {
        let mut candidates = Vec::with_capacity(2);
        if let Some(cache_dir) = &options.cache_dir {
            candidates.push(cache_dir.join(location).join(file_name));
        }
        let base = match &self.root {
            Some(root) => root.join(location),
            None => Path::new(location).to_path_buf(),
        };
        candidates.push(base.join(file_name));
        candidates
    }
}

impl ModelFileResolver for LocalResolver {
    async fn resolve(
        &self,
        location: &str,
        file_name: &str,
        must_exist: bool,
        options: &ResolveOptions,
    ) -> Result<Option<ModelSource>> {
        options.report(ProgressEvent::Initiate {
            location: location.to_string(),
            file: file_name.to_string(),
        });

        let candidates = self.candidates(location, file_name, options);
        for path in &candidates {
            match tokio::fs::metadata(path).await {
                Ok(meta) if meta.is_file() => {}
                _ => continue,
            }
            let source = if options.in_memory {
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|e| InferError::ModelFileUnavailable {
                        file: file_name.to_string(),
                        reason: format!("failed to read {}: {}", path.display(), e),
                    })?;
                log::debug!("read {} ({} bytes)", path.display(), bytes.len());
                ModelSource::Memory(bytes)
            } else {
                log::debug!("resolved {} to {}", file_name, path.display());
                ModelSource::File(path.clone())
            };
            options.report(ProgressEvent::Done {
                location: location.to_string(),
                file: file_name.to_string(),
            });
            return Ok(Some(source));
        }

        if must_exist {
            let searched: Vec<String> =
                candidates.iter().map(|p| p.display().to_string()).collect();
            Err(InferError::ModelFileUnavailable {
                file: file_name.to_string(),
                reason: format!("not found (searched {})", searched.join(", ")),
            })
        } else {
            Ok(None)
        }
    }
}
