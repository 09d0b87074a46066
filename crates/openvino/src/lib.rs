//! Safe bindings to the OpenVINO C API.
//!
//! The library is opened at run time, so nothing here needs OpenVINO to build.
//! Call [`OpenVino::load`] once and share the returned `Arc` with every
//! [`Core`]; each wrapper keeps the function table alive for as long as it exists.

mod dl;
pub mod element;
pub mod error;
pub mod ffi;
mod model;
mod request;
mod tensor;

pub use element::ElementType;
pub use error::{OpenVinoError, Result};
pub use model::{CompiledModel, Core, Model};
pub use request::InferRequest;
pub use tensor::Tensor;

use {
    dl::Library,
    ffi::*,
    std::{
        ffi::{CStr, OsString, c_void},
        path::{Path, PathBuf},
        sync::Arc,
    },
};

/// Full path of `libopenvino_c`; takes precedence over everything else.
pub const LIB_PATH_ENV: &str = "OPENVINO_LIB_PATH";

/// OpenVINO install root as exported by `setupvars.sh`.
pub const INSTALL_DIR_ENV: &str = "INTEL_OPENVINO_DIR";

#[cfg(target_os = "windows")]
const LIBRARY_NAME: &str = "openvino_c.dll";
#[cfg(target_os = "macos")]
const LIBRARY_NAME: &str = "libopenvino_c.dylib";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const LIBRARY_NAME: &str = "libopenvino_c.so";

/// Oldest release whose `ov_element_type_e` numbering matches [`ElementType`].
pub const MIN_VERSION: (u32, u32) = (2024, 2);

/// Newest major release the element numbering has been checked against.
const CHECKED_MAJOR: u32 = 2024;

/// Resolved C API entry points.
pub struct OpenVino {
    _lib: Library,
    path: PathBuf,
    version: (u32, u32),
    pub(crate) core_create: FnCoreCreate,
    pub(crate) core_free: FnCoreFree,
    pub(crate) core_read_model: FnCoreReadModel,
    pub(crate) core_read_model_from_memory_buffer: FnCoreReadModelFromMemoryBuffer,
    pub(crate) core_compile_model: FnCoreCompileModel,
    pub(crate) model_free: FnModelFree,
    pub(crate) model_inputs_size: FnModelPortsSize,
    pub(crate) model_outputs_size: FnModelPortsSize,
    pub(crate) model_const_input_by_index: FnModelConstPortByIndex,
    pub(crate) model_const_output_by_index: FnModelConstPortByIndex,
    pub(crate) port_get_any_name: FnPortGetAnyName,
    pub(crate) output_const_port_free: FnOutputConstPortFree,
    pub(crate) free: FnFree,
    pub(crate) compiled_model_free: FnCompiledModelFree,
    pub(crate) compiled_model_create_infer_request: FnCompiledModelCreateInferRequest,
    pub(crate) infer_request_free: FnInferRequestFree,
    pub(crate) infer_request_set_tensor: FnInferRequestSetTensor,
    pub(crate) infer_request_get_tensor: FnInferRequestGetTensor,
    pub(crate) infer_request_start_async: FnInferRequestStartAsync,
    pub(crate) infer_request_wait: FnInferRequestWait,
    pub(crate) tensor_create: FnTensorCreate,
    pub(crate) tensor_get_shape: FnTensorGetShape,
    pub(crate) tensor_get_element_type: FnTensorGetElementType,
    pub(crate) tensor_get_byte_size: FnTensorGetByteSize,
    pub(crate) tensor_data: FnTensorData,
    pub(crate) tensor_free: FnTensorFree,
    pub(crate) shape_free: FnShapeFree,
    get_error_info: FnGetErrorInfo,
    get_last_err_msg: Option<FnGetLastErrMsg>,
}

// SAFETY: the table only holds function pointers into a library that stays
// loaded for the lifetime of the struct.
unsafe impl Send for OpenVino {}
unsafe impl Sync for OpenVino {}

macro_rules! load_sym {
    ($lib:expr, $name:literal) => {{
        let ptr = unsafe { $lib.symbol($name) }
            .map_err(|e| OpenVinoError::Library(format!("failed to resolve {:?}: {}", $name, e)))?;
        unsafe { std::mem::transmute::<*mut c_void, _>(ptr) }
    }};
}

impl OpenVino {
    /// Open the first loadable candidate from [`library_candidates`].
    pub fn load() -> Result<Arc<Self>> {
        let candidates = library_candidates(
            std::env::var_os(LIB_PATH_ENV),
            std::env::var_os(INSTALL_DIR_ENV),
        );
        let mut failures = Vec::new();
        for candidate in &candidates {
            match Self::load_from(candidate) {
                Ok(openvino) => return Ok(openvino),
                Err(err) => failures.push(format!("{}: {}", candidate.display(), err)),
            }
        }
        Err(OpenVinoError::Library(format!(
            "could not load OpenVINO (set {} or {}): {}",
            LIB_PATH_ENV,
            INSTALL_DIR_ENV,
            failures.join("; ")
        )))
    }

    pub fn load_from(path: &Path) -> Result<Arc<Self>> {
        let lib = Library::open(path).map_err(OpenVinoError::Library)?;

        let core_create: FnCoreCreate = load_sym!(lib, c"ov_core_create");
        let core_free: FnCoreFree = load_sym!(lib, c"ov_core_free");
        let core_read_model: FnCoreReadModel = load_sym!(lib, c"ov_core_read_model");
        let core_read_model_from_memory_buffer: FnCoreReadModelFromMemoryBuffer =
            load_sym!(lib, c"ov_core_read_model_from_memory_buffer");
        let core_compile_model: FnCoreCompileModel = load_sym!(lib, c"ov_core_compile_model");
        let model_free: FnModelFree = load_sym!(lib, c"ov_model_free");
        let model_inputs_size: FnModelPortsSize = load_sym!(lib, c"ov_model_inputs_size");
        let model_outputs_size: FnModelPortsSize = load_sym!(lib, c"ov_model_outputs_size");
        let model_const_input_by_index: FnModelConstPortByIndex =
            load_sym!(lib, c"ov_model_const_input_by_index");
        let model_const_output_by_index: FnModelConstPortByIndex =
            load_sym!(lib, c"ov_model_const_output_by_index");
        let port_get_any_name: FnPortGetAnyName = load_sym!(lib, c"ov_port_get_any_name");
        let output_const_port_free: FnOutputConstPortFree =
            load_sym!(lib, c"ov_output_const_port_free");
        let free: FnFree = load_sym!(lib, c"ov_free");
        let compiled_model_free: FnCompiledModelFree = load_sym!(lib, c"ov_compiled_model_free");
        let compiled_model_create_infer_request: FnCompiledModelCreateInferRequest =
            load_sym!(lib, c"ov_compiled_model_create_infer_request");
        let infer_request_free: FnInferRequestFree = load_sym!(lib, c"ov_infer_request_free");
        let infer_request_set_tensor: FnInferRequestSetTensor =
            load_sym!(lib, c"ov_infer_request_set_tensor");
        let infer_request_get_tensor: FnInferRequestGetTensor =
            load_sym!(lib, c"ov_infer_request_get_tensor");
        let infer_request_start_async: FnInferRequestStartAsync =
            load_sym!(lib, c"ov_infer_request_start_async");
        let infer_request_wait: FnInferRequestWait = load_sym!(lib, c"ov_infer_request_wait");
        let tensor_create: FnTensorCreate = load_sym!(lib, c"ov_tensor_create");
        let tensor_get_shape: FnTensorGetShape = load_sym!(lib, c"ov_tensor_get_shape");
        let tensor_get_element_type: FnTensorGetElementType =
            load_sym!(lib, c"ov_tensor_get_element_type");
        let tensor_get_byte_size: FnTensorGetByteSize = load_sym!(lib, c"ov_tensor_get_byte_size");
        let tensor_data: FnTensorData = load_sym!(lib, c"ov_tensor_data");
        let tensor_free: FnTensorFree = load_sym!(lib, c"ov_tensor_free");
        let shape_free: FnShapeFree = load_sym!(lib, c"ov_shape_free");
        let get_error_info: FnGetErrorInfo = load_sym!(lib, c"ov_get_error_info");
        let get_openvino_version: FnGetOpenvinoVersion = load_sym!(lib, c"ov_get_openvino_version");
        let version_free: FnVersionFree = load_sym!(lib, c"ov_version_free");

        let build = read_version(get_openvino_version, version_free)?;
        let version = check_version(&build)?;

        // Only present from 2024.0 on.
        let get_last_err_msg = unsafe { lib.symbol(c"ov_get_last_err_msg") }
            .ok()
            .map(|ptr| unsafe { std::mem::transmute::<*mut c_void, FnGetLastErrMsg>(ptr) });

        log::info!("loaded OpenVINO {} C API from {}", build, path.display());

        Ok(Arc::new(Self {
            _lib: lib,
            path: path.to_path_buf(),
            version,
            core_create,
            core_free,
            core_read_model,
            core_read_model_from_memory_buffer,
            core_compile_model,
            model_free,
            model_inputs_size,
            model_outputs_size,
            model_const_input_by_index,
            model_const_output_by_index,
            port_get_any_name,
            output_const_port_free,
            free,
            compiled_model_free,
            compiled_model_create_infer_request,
            infer_request_free,
            infer_request_set_tensor,
            infer_request_get_tensor,
            infer_request_start_async,
            infer_request_wait,
            tensor_create,
            tensor_get_shape,
            tensor_get_element_type,
            tensor_get_byte_size,
            tensor_data,
            tensor_free,
            shape_free,
            get_error_info,
            get_last_err_msg,
        }))
    }

    /// Path the library was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `(major, minor)` of the loaded release.
    pub fn version(&self) -> (u32, u32) {
        self.version
    }

    /// Turn a status code into `Ok(())` or a descriptive error.
    pub(crate) fn check(&self, call: &'static str, code: ov_status_e) -> Result<()> {
        if code == OV_STATUS_OK {
            return Ok(());
        }
        let message = self
            .get_last_err_msg
            .and_then(|last| read_c_str(unsafe { last() }))
            .filter(|msg| !msg.is_empty())
            .or_else(|| read_c_str(unsafe { (self.get_error_info)(code) }))
            .unwrap_or_else(|| "unknown error".to_string());
        Err(OpenVinoError::Status {
            call,
            status: Status::from_raw(code),
            message,
        })
    }
}

fn read_c_str(ptr: *const std::ffi::c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

fn read_version(get: FnGetOpenvinoVersion, free: FnVersionFree) -> Result<String> {
    let mut version = ov_version_t::default();
    let status = unsafe { get(&mut version) };
    if status != OV_STATUS_OK {
        return Err(OpenVinoError::Library(format!(
            "ov_get_openvino_version failed with {:?}",
            Status::from_raw(status)
        )));
    }
    let build = read_c_str(version.build_number);
    unsafe { free(&mut version) };
    build.ok_or_else(|| OpenVinoError::Library("OpenVINO reported no build number".to_string()))
}

/// `(major, minor)` from a build number such as `2024.4.0-16579-c3152d32c9c-releases/2024/4`.
pub fn parse_version(build: &str) -> Option<(u32, u32)> {
    let mut parts = build.split(['.', '-']);
    let major = parts.next()?.trim().parse().ok()?;
    let minor = parts.next()?.trim().parse().ok()?;
    Some((major, minor))
}

/// Refuse releases older than [`MIN_VERSION`]; newer majors load with a warning.
pub fn check_version(build: &str) -> Result<(u32, u32)> {
    let version = parse_version(build).ok_or_else(|| {
        OpenVinoError::Library(format!("unrecognised OpenVINO build number {:?}", build))
    })?;
    if version < MIN_VERSION {
        return Err(OpenVinoError::Library(format!(
            "OpenVINO {} is too old, need {}.{} or later",
            build, MIN_VERSION.0, MIN_VERSION.1
        )));
    }
    if version.0 > CHECKED_MAJOR {
        log::warn!("OpenVINO {} is newer than the element type table ({}.x)", build, CHECKED_MAJOR);
    }
    Ok(version)
}

/// Library locations tried by [`OpenVino::load`], most specific first.
pub fn library_candidates(
    lib_path: Option<OsString>,
    install_dir: Option<OsString>,
) -> Vec<PathBuf> {
    if let Some(path) = lib_path {
        return vec![PathBuf::from(path)];
    }
    let mut candidates = Vec::new();
    if let Some(dir) = install_dir {
        let runtime = PathBuf::from(dir).join("runtime");
        for arch in ["intel64", "aarch64", "arm64"] {
            candidates.push(runtime.join("lib").join(arch).join(LIBRARY_NAME));
            candidates.push(runtime.join("lib").join(arch).join("Release").join(LIBRARY_NAME));
        }
        candidates.push(runtime.join("bin").join("intel64").join("Release").join(LIBRARY_NAME));
    }
    // Bare name: let the platform loader search its default paths.
    candidates.push(PathBuf::from(LIBRARY_NAME));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_library_path_wins() {
        let candidates = library_candidates(
            Some("/opt/ov/libopenvino_c.so".into()),
            Some("/opt/intel/openvino".into()),
        );
        assert_eq!(candidates, vec![PathBuf::from("/opt/ov/libopenvino_c.so")]);
    }

    #[test]
    fn test_install_dir_candidates() {
        let candidates = library_candidates(None, Some("/opt/intel/openvino".into()));
        assert_eq!(
            candidates[0],
            PathBuf::from("/opt/intel/openvino/runtime/lib/intel64").join(LIBRARY_NAME)
        );
        assert_eq!(candidates.last(), Some(&PathBuf::from(LIBRARY_NAME)));
    }

    #[test]
    fn test_default_candidate_is_bare_name() {
        assert_eq!(library_candidates(None, None), vec![PathBuf::from(LIBRARY_NAME)]);
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("2024.4.0-16579-c3152d32c9c-releases/2024/4"), Some((2024, 4)));
        assert_eq!(parse_version("2025.0.0"), Some((2025, 0)));
        assert_eq!(parse_version("custom_build"), None);
    }

    #[test]
    fn test_old_release_refused() {
        assert!(matches!(
            check_version("2023.3.0-13775-ceeafaf64f3-releases/2023/3"),
            Err(OpenVinoError::Library(_))
        ));
        assert!(matches!(check_version("2024.1.0"), Err(OpenVinoError::Library(_))));
        assert!(matches!(check_version("garbage"), Err(OpenVinoError::Library(_))));
    }

    #[test]
    fn test_supported_release_accepted() {
        assert_eq!(check_version("2024.2.0-15519-5c0f38f83f6-releases/2024/2").unwrap(), (2024, 2));
        assert_eq!(check_version("2025.1.0").unwrap(), (2025, 1));
    }

    #[test]
    fn test_load_from_missing_path() {
        let result = OpenVino::load_from(Path::new("/nonexistent/libopenvino_c.so"));
        assert!(matches!(result, Err(OpenVinoError::Library(_))));
    }
}
