use {
    crate::{ElementType, InferRequest, OpenVino, OpenVinoError, Result, Tensor, ffi::*},
    std::{
        ffi::{CStr, CString},
        path::Path,
        sync::Arc,
    },
};

fn path_to_cstring(path: &Path) -> Result<CString> {
    let s = path
        .to_str()
        .ok_or_else(|| OpenVinoError::Invalid(format!("path {:?} is not valid UTF-8", path)))?;
    CString::new(s)
        .map_err(|_| OpenVinoError::Invalid(format!("path {:?} contains a null byte", path)))
}

/// `ov_core_t`: reads and compiles models.
pub struct Core {
    ov: Arc<OpenVino>,
    ptr: *mut ov_core_t,
}

// SAFETY: ov::Core is documented as thread-safe.
unsafe impl Send for Core {}
unsafe impl Sync for Core {}

impl Core {
    pub fn new(ov: Arc<OpenVino>) -> Result<Self> {
        let mut ptr = std::ptr::null_mut();
        ov.check("ov_core_create", unsafe { (ov.core_create)(&mut ptr) })?;
        Ok(Self { ov, ptr })
    }

    pub fn openvino(&self) -> &Arc<OpenVino> {
        &self.ov
    }

    /// Read a model from disk. `weights` is the companion file for formats
    /// that keep them apart (`.xml` + `.bin`); pass `None` to let the
    /// frontend find them itself.
    pub fn read_model(&self, model: &Path, weights: Option<&Path>) -> Result<Model> {
        let model_path = path_to_cstring(model)?;
        let weights_path = weights.map(path_to_cstring).transpose()?;
        let weights_ptr = weights_path.as_ref().map_or(std::ptr::null(), |p| p.as_ptr());

        let mut ptr = std::ptr::null_mut();
        self.ov.check("ov_core_read_model", unsafe {
            (self.ov.core_read_model)(self.ptr, model_path.as_ptr(), weights_ptr, &mut ptr)
        })?;
        Ok(Model {
            ov: self.ov.clone(),
            ptr,
        })
    }

    /// Read a model held in memory. The weights are copied into an
    /// OpenVINO-owned tensor, so the slices need not outlive the model.
    pub fn read_model_from_memory(&self, model: &[u8], weights: Option<&[u8]>) -> Result<Model> {
        let weights = weights
            .map(|bytes| Tensor::new(&self.ov, ElementType::U8, &[bytes.len()], bytes))
            .transpose()?;
        let weights_ptr = weights
            .as_ref()
            .map_or(std::ptr::null(), |t| t.ptr as *const ov_tensor_t);

        let mut ptr = std::ptr::null_mut();
        self.ov.check("ov_core_read_model_from_memory_buffer", unsafe {
            (self.ov.core_read_model_from_memory_buffer)(
                self.ptr,
                model.as_ptr() as *const _,
                model.len(),
                weights_ptr,
                &mut ptr,
            )
        })?;
        Ok(Model {
            ov: self.ov.clone(),
            ptr,
        })
    }

    /// Compile `model` for `device` (`"AUTO"`, `"CPU"`, `"GPU.1"`, ...).
    pub fn compile_model(&self, model: &Model, device: &str) -> Result<CompiledModel> {
        let device = CString::new(device).map_err(|_| {
            OpenVinoError::Invalid(format!("device name {:?} contains a null byte", device))
        })?;
        let mut ptr = std::ptr::null_mut();
        self.ov.check("ov_core_compile_model", unsafe {
            (self.ov.core_compile_model)(self.ptr, model.ptr, device.as_ptr(), 0, &mut ptr)
        })?;
        Ok(CompiledModel {
            ov: self.ov.clone(),
            ptr,
        })
    }
}

impl Drop for Core {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            unsafe { (self.ov.core_free)(self.ptr) };
        }
    }
}

/// An uncompiled model.
pub struct Model {
    ov: Arc<OpenVino>,
    ptr: *mut ov_model_t,
}

unsafe impl Send for Model {}
unsafe impl Sync for Model {}

impl Model {
    /// Input tensor names, in model order.
    pub fn input_names(&self) -> Result<Vec<String>> {
        self.port_names(
            "ov_model_inputs_size",
            self.ov.model_inputs_size,
            "ov_model_const_input_by_index",
            self.ov.model_const_input_by_index,
        )
    }

    /// Output tensor names, in model order.
    pub fn output_names(&self) -> Result<Vec<String>> {
        self.port_names(
            "ov_model_outputs_size",
            self.ov.model_outputs_size,
            "ov_model_const_output_by_index",
            self.ov.model_const_output_by_index,
        )
    }

    fn port_names(
        &self,
        size_call: &'static str,
        size_fn: FnModelPortsSize,
        port_call: &'static str,
        port_fn: FnModelConstPortByIndex,
    ) -> Result<Vec<String>> {
        let mut count = 0usize;
        self.ov.check(size_call, unsafe { size_fn(self.ptr, &mut count) })?;

        let mut names = Vec::with_capacity(count);
        for index in 0..count {
            let mut port = std::ptr::null_mut();
            self.ov.check(port_call, unsafe { port_fn(self.ptr, index, &mut port) })?;

            let mut name = std::ptr::null_mut();
            let status = unsafe { (self.ov.port_get_any_name)(port, &mut name) };
            let result = self.ov.check("ov_port_get_any_name", status).map(|_| {
                let s = unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned();
                unsafe { (self.ov.free)(name) };
                s
            });
            unsafe { (self.ov.output_const_port_free)(port) };
            names.push(result?);
        }
        Ok(names)
    }
}

impl Drop for Model {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            unsafe { (self.ov.model_free)(self.ptr) };
        }
    }
}

/// A model compiled for one device.
pub struct CompiledModel {
    ov: Arc<OpenVino>,
    ptr: *mut ov_compiled_model_t,
}

unsafe impl Send for CompiledModel {}
unsafe impl Sync for CompiledModel {}

impl CompiledModel {
    pub fn create_infer_request(&self) -> Result<InferRequest> {
        let mut ptr = std::ptr::null_mut();
        self.ov.check("ov_compiled_model_create_infer_request", unsafe {
            (self.ov.compiled_model_create_infer_request)(self.ptr, &mut ptr)
        })?;
        Ok(InferRequest::from_raw(self.ov.clone(), ptr))
    }
}

impl Drop for CompiledModel {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            unsafe { (self.ov.compiled_model_free)(self.ptr) };
        }
    }
}
