use std::{fmt, path::PathBuf};

/// Where the bytes of one model file live.
#[derive(Clone, PartialEq)]
pub enum ModelSource {
    File(PathBuf),
    Memory(Vec<u8>),
}

impl fmt::Debug for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSource::File(path) => f.debug_tuple("File").field(path).finish(),
            ModelSource::Memory(bytes) => write!(f, "Memory({} bytes)", bytes.len()),
        }
    }
}

/// A resolved model file: the name it was requested by and its source.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelFile {
    pub name: String,
    pub source: ModelSource,
}

impl ModelFile {
    pub fn new(name: impl Into<String>, source: ModelSource) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }
}

/// One file name or an ordered list of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFileNames(Vec<String>);

impl ModelFileNames {
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for ModelFileNames {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for ModelFileNames {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl From<Vec<String>> for ModelFileNames {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl From<Vec<&str>> for ModelFileNames {
    fn from(names: Vec<&str>) -> Self {
        Self(names.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ModelFileNames {
    fn from(names: [&str; N]) -> Self {
        Self(names.iter().map(|s| s.to_string()).collect())
    }
}

impl From<&[String]> for ModelFileNames {
    fn from(names: &[String]) -> Self {
        Self(names.to_vec())
    }
}
