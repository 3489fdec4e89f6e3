//! Engine-owned buffers.

use std::borrow::Cow;
use std::ffi::CStr;
use std::os::raw::c_char;
use std::ptr::NonNull;

use crate::symbols::ReleaseFn;

/// A NUL-terminated buffer returned by the engine.
///
/// The buffer is handed back to the engine's release function when the
/// guard drops, so it is released exactly once on every path. The guard is
/// neither `Clone` nor `Copy`, and the raw pointer never escapes.
pub struct OwnedBuffer {
    ptr: NonNull<c_char>,
    release: ReleaseFn,
}

impl OwnedBuffer {
    /// Take ownership of an engine buffer. Returns `None` for null.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or point to a NUL-terminated buffer allocated by
    /// the engine that `release` frees, and no one else may release it.
    pub unsafe fn from_raw(ptr: *const c_char, release: ReleaseFn) -> Option<Self> {
        NonNull::new(ptr as *mut c_char).map(|ptr| Self { ptr, release })
    }

    pub fn as_c_str(&self) -> &CStr {
        // Valid until drop per the `from_raw` contract
        unsafe { CStr::from_ptr(self.ptr.as_ptr()) }
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        self.as_c_str().to_string_lossy()
    }

    pub fn len(&self) -> usize {
        self.as_c_str().to_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy the contents out and release the buffer
    pub fn into_string(self) -> String {
        self.to_string_lossy().into_owned()
    }
}

impl Drop for OwnedBuffer {
    fn drop(&mut self) {
        unsafe { (self.release)(self.ptr.as_ptr()) }
    }
}

impl std::fmt::Debug for OwnedBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnedBuffer").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static RELEASED: AtomicUsize = AtomicUsize::new(0);

    unsafe extern "C" fn release_counting(buffer: *const c_char) {
        RELEASED.fetch_add(1, Ordering::SeqCst);
        drop(CString::from_raw(buffer as *mut c_char));
    }

    unsafe extern "C" fn release_never_called(_buffer: *const c_char) {
        panic!("null buffers are never released");
    }

    #[test]
    fn copies_then_releases_once() {
        let before = RELEASED.load(Ordering::SeqCst);
        let raw = CString::new("0a0b").unwrap().into_raw();
        let buffer = unsafe { OwnedBuffer::from_raw(raw, release_counting) }.unwrap();
        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.into_string(), "0a0b");
        assert_eq!(RELEASED.load(Ordering::SeqCst), before + 1);
    }

    #[test]
    fn null_is_none() {
        let buffer = unsafe { OwnedBuffer::from_raw(std::ptr::null(), release_never_called) };
        assert!(buffer.is_none());
    }
}
