use {
    crate::{OpenVino, OpenVinoError, Result, Tensor, ffi::*},
    std::{ffi::CString, sync::Arc},
};

fn tensor_name(name: &str) -> Result<CString> {
    CString::new(name).map_err(|_| {
        OpenVinoError::Invalid(format!("tensor name {:?} contains a null byte", name))
    })
}

/// One inference request of a compiled model.
pub struct InferRequest {
    ov: Arc<OpenVino>,
    ptr: *mut ov_infer_request_t,
}

// SAFETY: a request may move between threads as long as it is used by one at a time.
unsafe impl Send for InferRequest {}

impl InferRequest {
    pub(crate) fn from_raw(ov: Arc<OpenVino>, ptr: *mut ov_infer_request_t) -> Self {
        Self { ov, ptr }
    }

    /// Bind `tensor` to the input called `name`. The request keeps its own
    /// reference, so `tensor` can be dropped afterwards.
    pub fn set_tensor(&mut self, name: &str, tensor: &Tensor) -> Result<()> {
        let name = tensor_name(name)?;
        self.ov.check("ov_infer_request_set_tensor", unsafe {
            (self.ov.infer_request_set_tensor)(self.ptr, name.as_ptr(), tensor.ptr)
        })
    }

    pub fn get_tensor(&self, name: &str) -> Result<Tensor> {
        let name = tensor_name(name)?;
        let mut ptr = std::ptr::null_mut();
        self.ov.check("ov_infer_request_get_tensor", unsafe {
            (self.ov.infer_request_get_tensor)(self.ptr, name.as_ptr(), &mut ptr)
        })?;
        Ok(Tensor::from_raw(self.ov.clone(), ptr))
    }

    pub fn start_async(&mut self) -> Result<()> {
        self.ov.check("ov_infer_request_start_async", unsafe {
            (self.ov.infer_request_start_async)(self.ptr)
        })
    }

    /// Block until the running inference finishes.
    pub fn wait(&mut self) -> Result<()> {
        self.ov
            .check("ov_infer_request_wait", unsafe { (self.ov.infer_request_wait)(self.ptr) })
    }

    /// `start_async` followed by `wait`.
    pub fn infer(&mut self) -> Result<()> {
        self.start_async()?;
        self.wait()
    }
}

impl Drop for InferRequest {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            unsafe { (self.ov.infer_request_free)(self.ptr) };
        }
    }
}
