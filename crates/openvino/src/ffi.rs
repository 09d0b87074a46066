//! Raw declarations for the OpenVINO C API (`openvino/c/openvino.h`), 2024.2
//! and later. See [`crate::MIN_VERSION`].
//!
//! Nothing here is linked. Every function is resolved at run time from
//! `libopenvino_c` by [`crate::OpenVino::load`].

#![allow(non_camel_case_types)]

use std::ffi::{c_char, c_void};

#[repr(C)]
pub struct ov_core_t {
    _private: [u8; 0],
}

#[repr(C)]
pub struct ov_model_t {
    _private: [u8; 0],
}

#[repr(C)]
pub struct ov_compiled_model_t {
    _private: [u8; 0],
}

#[repr(C)]
pub struct ov_infer_request_t {
    _private: [u8; 0],
}

#[repr(C)]
pub struct ov_tensor_t {
    _private: [u8; 0],
}

#[repr(C)]
pub struct ov_output_const_port_t {
    _private: [u8; 0],
}

/// `ov_shape_t`: rank plus a library-allocated dimension array.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ov_shape_t {
    pub rank: i64,
    pub dims: *mut i64,
}

impl Default for ov_shape_t {
    fn default() -> Self {
        Self {
            rank: 0,
            dims: std::ptr::null_mut(),
        }
    }
}

/// `ov_status_e` as returned across the boundary.
pub type ov_status_e = i32;

/// `ov_element_type_e` as passed across the boundary. Kept as a raw integer so
/// unknown values coming back from the library never become an invalid enum.
pub type ov_element_type_e = u32;

pub const OV_STATUS_OK: ov_status_e = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    GeneralError,
    NotImplemented,
    NetworkNotLoaded,
    ParameterMismatch,
    NotFound,
    OutOfBounds,
    Unexpected,
    RequestBusy,
    ResultNotReady,
    NotAllocated,
    InferNotStarted,
    NetworkNotRead,
    InferCancelled,
    InvalidCParam,
    UnknownCError,
    NotImplementCMethod,
    UnknownException,
    Other(i32),
}

impl Status {
    pub fn from_raw(code: ov_status_e) -> Self {
        match code {
            0 => Status::Ok,
            -1 => Status::GeneralError,
            -2 => Status::NotImplemented,
            -3 => Status::NetworkNotLoaded,
            -4 => Status::ParameterMismatch,
            -5 => Status::NotFound,
            -6 => Status::OutOfBounds,
            -7 => Status::Unexpected,
            -8 => Status::RequestBusy,
            -9 => Status::ResultNotReady,
            -10 => Status::NotAllocated,
            -11 => Status::InferNotStarted,
            -12 => Status::NetworkNotRead,
            -13 => Status::InferCancelled,
            -14 => Status::InvalidCParam,
            -15 => Status::UnknownCError,
            -16 => Status::NotImplementCMethod,
            -17 => Status::UnknownException,
            other => Status::Other(other),
        }
    }
}

pub type FnCoreCreate = unsafe extern "C" fn(core: *mut *mut ov_core_t) -> ov_status_e;
pub type FnCoreFree = unsafe extern "C" fn(core: *mut ov_core_t);
pub type FnCoreReadModel = unsafe extern "C" fn(
    core: *const ov_core_t,
    model_path: *const c_char,
    bin_path: *const c_char,
    model: *mut *mut ov_model_t,
) -> ov_status_e;
pub type FnCoreReadModelFromMemoryBuffer = unsafe extern "C" fn(
    core: *const ov_core_t,
    model_str: *const c_char,
    str_len: usize,
    weights: *const ov_tensor_t,
    model: *mut *mut ov_model_t,
) -> ov_status_e;
/// Variadic in C (`...` property key/value pairs); always called with zero properties.
pub type FnCoreCompileModel = unsafe extern "C" fn(
    core: *const ov_core_t,
    model: *const ov_model_t,
    device_name: *const c_char,
    property_args_size: usize,
    compiled_model: *mut *mut ov_compiled_model_t,
    ...
) -> ov_status_e;

pub type FnModelFree = unsafe extern "C" fn(model: *mut ov_model_t);
pub type FnModelPortsSize =
    unsafe extern "C" fn(model: *const ov_model_t, size: *mut usize) -> ov_status_e;
pub type FnModelConstPortByIndex = unsafe extern "C" fn(
    model: *const ov_model_t,
    index: usize,
    port: *mut *mut ov_output_const_port_t,
) -> ov_status_e;
pub type FnPortGetAnyName = unsafe extern "C" fn(
    port: *const ov_output_const_port_t,
    tensor_name: *mut *mut c_char,
) -> ov_status_e;
pub type FnOutputConstPortFree = unsafe extern "C" fn(port: *mut ov_output_const_port_t);
pub type FnFree = unsafe extern "C" fn(content: *const c_char);

pub type FnCompiledModelFree = unsafe extern "C" fn(compiled_model: *mut ov_compiled_model_t);
pub type FnCompiledModelCreateInferRequest = unsafe extern "C" fn(
    compiled_model: *const ov_compiled_model_t,
    infer_request: *mut *mut ov_infer_request_t,
) -> ov_status_e;

pub type FnInferRequestFree = unsafe extern "C" fn(infer_request: *mut ov_infer_request_t);
pub type FnInferRequestSetTensor = unsafe extern "C" fn(
    infer_request: *mut ov_infer_request_t,
    tensor_name: *const c_char,
    tensor: *const ov_tensor_t,
) -> ov_status_e;
pub type FnInferRequestGetTensor = unsafe extern "C" fn(
    infer_request: *const ov_infer_request_t,
    tensor_name: *const c_char,
    tensor: *mut *mut ov_tensor_t,
) -> ov_status_e;
pub type FnInferRequestStartAsync =
    unsafe extern "C" fn(infer_request: *mut ov_infer_request_t) -> ov_status_e;
pub type FnInferRequestWait =
    unsafe extern "C" fn(infer_request: *mut ov_infer_request_t) -> ov_status_e;

pub type FnTensorCreate = unsafe extern "C" fn(
    element_type: ov_element_type_e,
    shape: ov_shape_t,
    tensor: *mut *mut ov_tensor_t,
) -> ov_status_e;
pub type FnTensorGetShape =
    unsafe extern "C" fn(tensor: *const ov_tensor_t, shape: *mut ov_shape_t) -> ov_status_e;
pub type FnTensorGetElementType = unsafe extern "C" fn(
    tensor: *const ov_tensor_t,
    element_type: *mut ov_element_type_e,
) -> ov_status_e;
pub type FnTensorGetByteSize =
    unsafe extern "C" fn(tensor: *const ov_tensor_t, byte_size: *mut usize) -> ov_status_e;
pub type FnTensorData =
    unsafe extern "C" fn(tensor: *const ov_tensor_t, data: *mut *mut c_void) -> ov_status_e;
pub type FnTensorFree = unsafe extern "C" fn(tensor: *mut ov_tensor_t);

pub type FnShapeFree = unsafe extern "C" fn(shape: *mut ov_shape_t) -> ov_status_e;

/// `ov_version_t`: strings owned by the library until `ov_version_free`.
#[repr(C)]
#[derive(Debug)]
pub struct ov_version_t {
    pub build_number: *const c_char,
    pub description: *const c_char,
}

impl Default for ov_version_t {
    fn default() -> Self {
        Self {
            build_number: std::ptr::null(),
            description: std::ptr::null(),
        }
    }
}

pub type FnGetOpenvinoVersion = unsafe extern "C" fn(version: *mut ov_version_t) -> ov_status_e;
pub type FnVersionFree = unsafe extern "C" fn(version: *mut ov_version_t);

pub type FnGetErrorInfo = unsafe extern "C" fn(status: ov_status_e) -> *const c_char;
pub type FnGetLastErrMsg = unsafe extern "C" fn() -> *const c_char;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_types_are_zero_sized() {
        assert_eq!(std::mem::size_of::<ov_core_t>(), 0);
        assert_eq!(std::mem::size_of::<ov_model_t>(), 0);
        assert_eq!(std::mem::size_of::<ov_compiled_model_t>(), 0);
        assert_eq!(std::mem::size_of::<ov_infer_request_t>(), 0);
        assert_eq!(std::mem::size_of::<ov_tensor_t>(), 0);
    }

    #[test]
    fn test_shape_layout() {
        #[cfg(target_pointer_width = "64")]
        assert_eq!(std::mem::size_of::<ov_shape_t>(), 16);
        let shape = ov_shape_t::default();
        assert_eq!(shape.rank, 0);
        assert!(shape.dims.is_null());
    }

    #[test]
    fn test_status_from_raw() {
        assert_eq!(Status::from_raw(OV_STATUS_OK), Status::Ok);
        assert_eq!(Status::from_raw(-1), Status::GeneralError);
        assert_eq!(Status::from_raw(-5), Status::NotFound);
        assert_eq!(Status::from_raw(-17), Status::UnknownException);
        assert_eq!(Status::from_raw(-99), Status::Other(-99));
    }
}
