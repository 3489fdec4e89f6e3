//! C entry points of the stand-in engine, mirroring the real engine's
//! exports: a global engine, a single last-error slot, and buffers that the
//! caller must hand back to `mock_engine_release`.

use std::collections::HashSet;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;
use prost::Message;
use walletlink_ffi::{EngineConfig, EngineSymbols, ScanConfig};
use walletlink_proto::messages::Response;

use crate::engine::MockEngine;

static ENGINE: Lazy<MockEngine> = Lazy::new(MockEngine::new);
static LAST_ERROR: Lazy<Mutex<String>> = Lazy::new(|| Mutex::new(String::new()));
static HEX_ERRORS: AtomicBool = AtomicBool::new(false);

/// Tracks buffers handed out across the boundary
struct BufferTracker {
    live: Mutex<HashSet<usize>>,
    double_releases: AtomicUsize,
}

static BUFFERS: Lazy<BufferTracker> = Lazy::new(|| BufferTracker {
    live: Mutex::new(HashSet::new()),
    double_releases: AtomicUsize::new(0),
});

impl BufferTracker {
    fn live(&self) -> MutexGuard<'_, HashSet<usize>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn allocate(&self, text: &str) -> *const c_char {
        let text = CString::new(text.replace('\0', ""))
            .unwrap_or_default()
            .into_raw();
        self.live().insert(text as usize);
        text
    }

    /// Free a tracked buffer; an unknown pointer is counted, never freed
    fn release(&self, ptr: *const c_char) -> bool {
        if ptr.is_null() {
            return false;
        }
        if self.live().remove(&(ptr as usize)) {
            unsafe { drop(CString::from_raw(ptr as *mut c_char)) };
            true
        } else {
            self.double_releases.fetch_add(1, Ordering::SeqCst);
            false
        }
    }
}

/// The engine behind the C entry points
pub fn global_engine() -> &'static MockEngine {
    &ENGINE
}

/// Buffers handed out and not yet released
pub fn live_buffers() -> usize {
    BUFFERS.live().len()
}

/// Releases of pointers that were not live
pub fn double_releases() -> usize {
    BUFFERS.double_releases.load(Ordering::SeqCst)
}

/// Report errors as hex-encoded failed `Response`s instead of plain text
pub fn set_hex_errors(enabled: bool) {
    HEX_ERRORS.store(enabled, Ordering::SeqCst);
}

fn last_error() -> MutexGuard<'static, String> {
    LAST_ERROR.lock().unwrap_or_else(PoisonError::into_inner)
}

fn set_last_error(message: String) {
    let message = if HEX_ERRORS.load(Ordering::SeqCst) {
        let response = Response {
            is_success: false,
            error: message,
        };
        hex::encode(response.encode_to_vec())
    } else {
        message
    };
    *last_error() = message;
}

unsafe fn read_str<'a>(ptr: *const c_char) -> Result<&'a str, String> {
    if ptr.is_null() {
        return Err("null argument".to_string());
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|err| format!("argument is not utf-8: {err}"))
}

/// # Safety
/// `config_json` must be null or a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn mock_engine_init(config_json: *const c_char) {
    let outcome = read_str(config_json).and_then(|json| {
        let config: EngineConfig = serde_json::from_str(json).map_err(|err| err.to_string())?;
        ENGINE.init(&config).map_err(|err| err.to_string())
    });
    if let Err(message) = outcome {
        set_last_error(message);
    }
}

/// # Safety
/// `config_json` must be null or a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn mock_engine_scan_wallets(config_json: *const c_char) {
    let outcome = read_str(config_json).and_then(|json| {
        let config: ScanConfig = serde_json::from_str(json).map_err(|err| err.to_string())?;
        ENGINE.scan(&config.directory).map_err(|err| err.to_string())
    });
    if let Err(message) = outcome {
        set_last_error(message);
    }
}

/// Returns an owned result buffer, or null with the error slot set.
///
/// # Safety
/// `request_hex` must be null or a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn mock_engine_dispatch(request_hex: *const c_char) -> *const c_char {
    let outcome = read_str(request_hex)
        .and_then(|hex| ENGINE.handle_hex(hex).map_err(|err| err.to_string()));
    match outcome {
        Ok(result) => BUFFERS.allocate(&result),
        Err(message) => {
            set_last_error(message);
            std::ptr::null()
        }
    }
}

/// Returns an owned copy of the error slot, empty when there is no error
#[no_mangle]
pub extern "C" fn mock_engine_last_error() -> *const c_char {
    let message = last_error().clone();
    BUFFERS.allocate(&message)
}

#[no_mangle]
pub extern "C" fn mock_engine_clear_error() {
    last_error().clear();
}

/// # Safety
/// `buffer` must be null or a pointer returned by this engine.
#[no_mangle]
pub unsafe extern "C" fn mock_engine_release(buffer: *const c_char) {
    BUFFERS.release(buffer);
}

/// Symbol table for the stand-in engine's C entry points
pub fn mock_symbols() -> EngineSymbols {
    EngineSymbols {
        init: mock_engine_init,
        scan_wallets: mock_engine_scan_wallets,
        dispatch: mock_engine_dispatch,
        last_error: mock_engine_last_error,
        clear_error: mock_engine_clear_error,
        release: mock_engine_release,
    }
}
