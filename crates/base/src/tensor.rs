use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TensorError {
    ShapeOverflow,
    ShapeMismatch { expected: usize, got: usize },
}

impl fmt::Display for TensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TensorError::ShapeOverflow => write!(f, "shape dimensions overflow when multiplied"),
            TensorError::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected {expected} elements, got {got}")
            }
        }
    }
}

impl std::error::Error for TensorError {}

/// Element type tag of a [`TensorValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Int64,
    Float32,
    Bool,
    Int32,
    Float64,
    Uint8,
    String,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Int64 => "int64",
            ElementType::Float32 => "float32",
            ElementType::Bool => "bool",
            ElementType::Int32 => "int32",
            ElementType::Float64 => "float64",
            ElementType::Uint8 => "uint8",
            ElementType::String => "string",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat element buffer. The variant is the element type, so the tag and the
/// interpretation of the buffer can never disagree.
#[derive(Clone, PartialEq)]
pub enum TensorData {
    Int64(Vec<i64>),
    Float32(Vec<f32>),
    Bool(Vec<bool>),
    Int32(Vec<i32>),
    Float64(Vec<f64>),
    Uint8(Vec<u8>),
    String(Vec<String>),
}

impl TensorData {
    pub fn element_type(&self) -> ElementType {
        match self {
            TensorData::Int64(_) => ElementType::Int64,
            TensorData::Float32(_) => ElementType::Float32,
            TensorData::Bool(_) => ElementType::Bool,
            TensorData::Int32(_) => ElementType::Int32,
            TensorData::Float64(_) => ElementType::Float64,
            TensorData::Uint8(_) => ElementType::Uint8,
            TensorData::String(_) => ElementType::String,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TensorData::Int64(v) => v.len(),
            TensorData::Float32(v) => v.len(),
            TensorData::Bool(v) => v.len(),
            TensorData::Int32(v) => v.len(),
            TensorData::Float64(v) => v.len(),
            TensorData::Uint8(v) => v.len(),
            TensorData::String(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for TensorData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TensorData::Int64(v) => f.debug_tuple("Int64").field(v).finish(),
            TensorData::Float32(v) => f.debug_tuple("Float32").field(v).finish(),
            TensorData::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            TensorData::Int32(v) => f.debug_tuple("Int32").field(v).finish(),
            TensorData::Float64(v) => f.debug_tuple("Float64").field(v).finish(),
            TensorData::Uint8(v) => f.debug_tuple("Uint8").field(v).finish(),
            TensorData::String(v) => f.debug_tuple("String").field(v).finish(),
        }
    }
}

/// Immutable tensor: element type, shape and a flat buffer whose length is
/// always the product of the shape.
#[derive(Clone, PartialEq)]
pub struct TensorValue {
    shape: Vec<usize>,
    data: TensorData,
}

impl fmt::Debug for TensorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TensorValue")
            .field("element_type", &self.element_type())
            .field("shape", &self.shape)
            .field("data", &self.data)
            .finish()
    }
}

/// Number of elements described by `shape`, or `ShapeOverflow`.
pub fn element_count(shape: &[usize]) -> Result<usize, TensorError> {
    let mut product: usize = 1;
    for &dim in shape {
        product = product
            .checked_mul(dim)
            .ok_or(TensorError::ShapeOverflow)?;
    }
    Ok(product)
}

impl TensorValue {
    pub fn new(shape: Vec<usize>, data: TensorData) -> Result<Self, TensorError> {
        let expected = element_count(&shape)?;
        if expected != data.len() {
            return Err(TensorError::ShapeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    pub fn from_f32(shape: Vec<usize>, data: Vec<f32>) -> Result<Self, TensorError> {
        Self::new(shape, TensorData::Float32(data))
    }

    pub fn from_i64(shape: Vec<usize>, data: Vec<i64>) -> Result<Self, TensorError> {
        Self::new(shape, TensorData::Int64(data))
    }

    pub fn from_bool(shape: Vec<usize>, data: Vec<bool>) -> Result<Self, TensorError> {
        Self::new(shape, TensorData::Bool(data))
    }

    /// Rank-0 tensor holding a single element.
    pub fn scalar(data: TensorData) -> Result<Self, TensorError> {
        Self::new(vec![], data)
    }

    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &TensorData {
        &self.data
    }

    pub fn into_parts(self) -> (Vec<usize>, TensorData) {
        (self.shape, self.data)
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_f32(&self) -> Option<&[f32]> {
        match &self.data {
            TensorData::Float32(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<&[i64]> {
        match &self.data {
            TensorData::Int64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<&[bool]> {
        match &self.data {
            TensorData::Bool(v) => Some(v),
            _ => None,
        }
    }
}
