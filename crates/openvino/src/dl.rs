//! Run-time loading of `libopenvino_c` with `dlopen` / `LoadLibraryA`.

use std::ffi::{CStr, CString, c_char, c_void};
use std::path::Path;

/// An open shared library. Closed on drop.
pub(crate) struct Library {
    handle: *mut c_void,
}

// SAFETY: the handle is process-global; OpenVINO's C API is thread-safe for
// the calls made through the resolved symbols.
unsafe impl Send for Library {}
unsafe impl Sync for Library {}

impl Library {
    pub(crate) fn open(path: &Path) -> Result<Self, String> {
        let name = path
            .to_str()
            .ok_or_else(|| format!("library path {:?} is not valid UTF-8", path))?;
        let name = CString::new(name)
            .map_err(|_| format!("library path {:?} contains a null byte", path))?;

        #[cfg(unix)]
        {
            // SAFETY: name is a valid C string.
            let handle = unsafe { dlopen(name.as_ptr(), RTLD_NOW | RTLD_LOCAL) };
            if handle.is_null() {
                return Err(last_dl_error());
            }
            Ok(Self { handle })
        }

        #[cfg(windows)]
        {
            let handle = unsafe { LoadLibraryA(name.as_ptr()) };
            if handle.is_null() {
                return Err(format!("LoadLibraryA failed for {:?}", path));
            }
            Ok(Self { handle })
        }

        #[cfg(not(any(unix, windows)))]
        {
            let _ = name;
            Err("dynamic library loading not supported on this platform".to_string())
        }
    }

    /// Resolve `name` to a raw address.
    ///
    /// # Safety
    /// The caller must cast the result to the symbol's real signature.
    pub(crate) unsafe fn symbol(&self, name: &CStr) -> Result<*mut c_void, String> {
        #[cfg(unix)]
        {
            unsafe {
                dlerror();
                let ptr = dlsym(self.handle, name.as_ptr());
                if ptr.is_null() {
                    return Err(last_dl_error());
                }
                Ok(ptr)
            }
        }

        #[cfg(windows)]
        {
            let ptr = unsafe { GetProcAddress(self.handle, name.as_ptr()) };
            if ptr.is_null() {
                return Err(format!("GetProcAddress failed for {:?}", name));
            }
            Ok(ptr)
        }

        #[cfg(not(any(unix, windows)))]
        {
            let _ = name;
            Err("dynamic library loading not supported on this platform".to_string())
        }
    }
}

impl Drop for Library {
    fn drop(&mut self) {
        if self.handle.is_null() {
            return;
        }
        #[cfg(unix)]
        unsafe {
            dlclose(self.handle);
        }
        #[cfg(windows)]
        unsafe {
            FreeLibrary(self.handle);
        }
    }
}

#[cfg(unix)]
fn last_dl_error() -> String {
    let err = unsafe { dlerror() };
    if err.is_null() {
        "unknown dlopen error".to_string()
    } else {
        unsafe { CStr::from_ptr(err) }.to_string_lossy().into_owned()
    }
}

#[cfg(unix)]
const RTLD_NOW: i32 = 2;
#[cfg(unix)]
const RTLD_LOCAL: i32 = 0;

#[cfg(unix)]
unsafe extern "C" {
    fn dlopen(filename: *const c_char, flags: i32) -> *mut c_void;
    fn dlsym(handle: *mut c_void, symbol: *const c_char) -> *mut c_void;
    fn dlclose(handle: *mut c_void) -> i32;
    fn dlerror() -> *const c_char;
}

#[cfg(windows)]
unsafe extern "system" {
    fn LoadLibraryA(name: *const c_char) -> *mut c_void;
    fn GetProcAddress(module: *mut c_void, name: *const c_char) -> *mut c_void;
    fn FreeLibrary(module: *mut c_void) -> i32;
}
