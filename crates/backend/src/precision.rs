//! Conversion between [`TensorValue`]s and the runtime's native tensors.
//!
//! Only three lanes exist: `int64 <-> i64`, `float32 <-> f32` and the
//! one-way `bool -> u8`. A native `u8` result is not turned back into `bool`;
//! it fails like every other type outside the table.

use {
    crate::{InferError, Result},
    base::{ElementType, TensorData, TensorValue, element_count},
    std::fmt,
};

/// Element types as the native runtime names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeElementType {
    Undefined,
    Boolean,
    Bf16,
    F16,
    F32,
    F64,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    String,
}

impl NativeElementType {
    pub fn byte_width(self) -> Option<usize> {
        use NativeElementType::*;
        match self {
            Boolean | I8 | U8 => Some(1),
            Bf16 | F16 | I16 | U16 => Some(2),
            F32 | I32 | U32 => Some(4),
            F64 | I64 | U64 => Some(8),
            Undefined | String => None,
        }
    }
}

impl fmt::Display for NativeElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = format!("{:?}", self).to_lowercase();
        f.write_str(&name)
    }
}

pub fn to_native_type(ty: ElementType) -> Result<NativeElementType> {
    match ty {
        ElementType::Int64 => Ok(NativeElementType::I64),
        ElementType::Float32 => Ok(NativeElementType::F32),
        ElementType::Bool => Ok(NativeElementType::U8),
        ElementType::Int32 | ElementType::Float64 | ElementType::Uint8 | ElementType::String => {
            Err(InferError::UnsupportedPrecision(ty.to_string()))
        }
    }
}

pub fn from_native_type(ty: NativeElementType) -> Result<ElementType> {
    match ty {
        NativeElementType::I64 => Ok(ElementType::Int64),
        NativeElementType::F32 => Ok(ElementType::Float32),
        other => Err(InferError::UnsupportedPrecision(format!("native {}", other))),
    }
}

/// A tensor in the runtime's terms: element type, shape and packed
/// native-endian bytes.
#[derive(Clone, PartialEq)]
pub struct NativeTensor {
    pub element_type: NativeElementType,
    pub shape: Vec<usize>,
    pub data: Vec<u8>,
}

impl fmt::Debug for NativeTensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeTensor")
            .field("element_type", &self.element_type)
            .field("shape", &self.shape)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Encode `value` for the runtime. Fails before touching any data when the
/// element type has no native lane.
pub fn to_native(value: &TensorValue) -> Result<NativeTensor> {
    let element_type = to_native_type(value.element_type())?;
    let data = match value.data() {
        TensorData::Int64(v) => v.iter().flat_map(|x| x.to_ne_bytes()).collect(),
        TensorData::Float32(v) => v.iter().flat_map(|x| x.to_ne_bytes()).collect(),
        TensorData::Bool(v) => v.iter().map(|&b| b as u8).collect(),
        other => return Err(InferError::UnsupportedPrecision(other.element_type().to_string())),
    };
    Ok(NativeTensor {
        element_type,
        shape: value.shape().to_vec(),
        data,
    })
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

/// Decode a runtime output.
pub fn from_native(tensor: NativeTensor) -> Result<TensorValue> {
    let ty = from_native_type(tensor.element_type)?;
    let count = element_count(&tensor.shape)?;
    let width = tensor
        .element_type
        .byte_width()
        .ok_or_else(|| InferError::UnsupportedPrecision(tensor.element_type.to_string()))?;
    if count.checked_mul(width) != Some(tensor.data.len()) {
        return Err(InferError::Inference(format!(
            "native {} tensor of shape {:?} has {} bytes, expected {}",
            tensor.element_type,
            tensor.shape,
            tensor.data.len(),
            count.saturating_mul(width)
        )));
    }
    let data = match ty {
        ElementType::Int64 => TensorData::Int64(decode!(tensor.data, i64)),
        ElementType::Float32 => TensorData::Float32(decode!(tensor.data, f32)),
        other => return Err(InferError::UnsupportedPrecision(other.to_string())),
    };
    Ok(TensorValue::new(tensor.shape, data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_width() {
        assert_eq!(NativeElementType::I64.byte_width(), Some(8));
        assert_eq!(NativeElementType::U8.byte_width(), Some(1));
        assert_eq!(NativeElementType::String.byte_width(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(NativeElementType::F32.to_string(), "f32");
        assert_eq!(NativeElementType::Bf16.to_string(), "bf16");
    }

    #[test]
    fn test_from_native_rejects_short_buffer() {
        let tensor = NativeTensor {
            element_type: NativeElementType::F32,
            shape: vec![2],
            data: vec![0; 7],
        };
        assert!(matches!(from_native(tensor), Err(InferError::Inference(_))));
    }
}
