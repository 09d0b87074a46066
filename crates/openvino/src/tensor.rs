use {
    crate::{ElementType, OpenVino, OpenVinoError, Result, ffi::*},
    std::{ffi::c_void, sync::Arc},
};

/// A tensor owned by OpenVINO.
pub struct Tensor {
    ov: Arc<OpenVino>,
    pub(crate) ptr: *mut ov_tensor_t,
}

// SAFETY: ov::Tensor is reference counted internally and carries no thread affinity.
unsafe impl Send for Tensor {}

impl Tensor {
    /// Allocate a tensor and copy `bytes` (native endian, packed) into it.
    pub fn new(
        ov: &Arc<OpenVino>,
        element_type: ElementType,
        shape: &[usize],
        bytes: &[u8],
    ) -> Result<Self> {
        let width = element_type.byte_width().ok_or_else(|| {
            OpenVinoError::Invalid(format!("cannot create {} tensor from raw bytes", element_type))
        })?;
        let count = shape
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or_else(|| OpenVinoError::Invalid(format!("shape {:?} overflows", shape)))?;
        if count.checked_mul(width) != Some(bytes.len()) {
            return Err(OpenVinoError::Invalid(format!(
                "shape {:?} of {} needs {} bytes, got {}",
                shape,
                element_type,
                count.saturating_mul(width),
                bytes.len()
            )));
        }

        let mut dims = shape
            .iter()
            .map(|&d| {
                i64::try_from(d)
                    .map_err(|_| OpenVinoError::Invalid(format!("dimension {} too large", d)))
            })
            .collect::<Result<Vec<i64>>>()?;
        // ov_tensor_create copies the dimensions before returning.
        let ov_shape = ov_shape_t {
            rank: dims.len() as i64,
            dims: dims.as_mut_ptr(),
        };

        let mut ptr = std::ptr::null_mut();
        ov.check("ov_tensor_create", unsafe {
            (ov.tensor_create)(element_type.as_raw(), ov_shape, &mut ptr)
        })?;
        let tensor = Self { ov: ov.clone(), ptr };

        if !bytes.is_empty() {
            let data = tensor.data_ptr()?;
            unsafe { std::ptr::copy_nonoverlapping(bytes.as_ptr(), data as *mut u8, bytes.len()) };
        }
        Ok(tensor)
    }

    pub(crate) fn from_raw(ov: Arc<OpenVino>, ptr: *mut ov_tensor_t) -> Self {
        Self { ov, ptr }
    }

    pub fn element_type(&self) -> Result<ElementType> {
        let mut raw: ov_element_type_e = 0;
        self.ov.check("ov_tensor_get_element_type", unsafe {
            (self.ov.tensor_get_element_type)(self.ptr, &mut raw)
        })?;
        ElementType::from_raw(raw)
            .ok_or_else(|| OpenVinoError::Invalid(format!("unknown element type {}", raw)))
    }

    pub fn shape(&self) -> Result<Vec<usize>> {
        let mut shape = ov_shape_t::default();
        self.ov.check("ov_tensor_get_shape", unsafe {
            (self.ov.tensor_get_shape)(self.ptr, &mut shape)
        })?;
        let dims = if shape.rank > 0 && !shape.dims.is_null() {
            unsafe { std::slice::from_raw_parts(shape.dims, shape.rank as usize) }
                .iter()
                .map(|&d| d.max(0) as usize)
                .collect()
        } else {
            Vec::new()
        };
        unsafe { (self.ov.shape_free)(&mut shape) };
        Ok(dims)
    }

    pub fn byte_size(&self) -> Result<usize> {
        let mut size = 0usize;
        self.ov.check("ov_tensor_get_byte_size", unsafe {
            (self.ov.tensor_get_byte_size)(self.ptr, &mut size)
        })?;
        Ok(size)
    }

    /// Copy the tensor contents out.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let size = self.byte_size()?;
        if size == 0 {
            return Ok(Vec::new());
        }
        let data = self.data_ptr()?;
        Ok(unsafe { std::slice::from_raw_parts(data as *const u8, size) }.to_vec())
    }

    fn data_ptr(&self) -> Result<*mut c_void> {
        let mut data = std::ptr::null_mut();
        self.ov.check("ov_tensor_data", unsafe { (self.ov.tensor_data)(self.ptr, &mut data) })?;
        if data.is_null() {
            return Err(OpenVinoError::Invalid("tensor has no data".to_string()));
        }
        Ok(data)
    }
}

impl Drop for Tensor {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            unsafe { (self.ov.tensor_free)(self.ptr) };
        }
    }
}
