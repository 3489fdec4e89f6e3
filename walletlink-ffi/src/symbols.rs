//! Entry points exported by the wallet engine.

use std::fmt;
use std::os::raw::c_char;

pub type InitFn = unsafe extern "C" fn(config_json: *const c_char);
pub type ScanWalletsFn = unsafe extern "C" fn(config_json: *const c_char);
pub type DispatchFn = unsafe extern "C" fn(request_hex: *const c_char) -> *const c_char;
pub type LastErrorFn = unsafe extern "C" fn() -> *const c_char;
pub type ClearErrorFn = unsafe extern "C" fn();
pub type ReleaseFn = unsafe extern "C" fn(buffer: *const c_char);

/// Function table for one engine instance.
///
/// Every pointer returned by `dispatch` or `last_error` is owned by the
/// engine and must be handed back to `release` exactly once.
#[derive(Clone, Copy)]
pub struct EngineSymbols {
    pub init: InitFn,
    pub scan_wallets: ScanWalletsFn,
    pub dispatch: DispatchFn,
    pub last_error: LastErrorFn,
    pub clear_error: ClearErrorFn,
    pub release: ReleaseFn,
}

impl fmt::Debug for EngineSymbols {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineSymbols")
            .field("dispatch", &(self.dispatch as *const ()))
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "linked")]
mod linked {
    use std::os::raw::c_char;

    #[link(name = "tcx")]
    extern "C" {
        pub fn init_token_core_x(config_json: *const c_char);
        pub fn scan_wallets(config_json: *const c_char);
        pub fn call_tcx_api(request_hex: *const c_char) -> *const c_char;
        pub fn get_last_err_message() -> *const c_char;
        pub fn clear_err();
        pub fn free_const_string(buffer: *const c_char);
    }
}

#[cfg(feature = "linked")]
impl EngineSymbols {
    /// Symbols of the engine library linked into this binary
    pub fn linked() -> Self {
        Self {
            init: linked::init_token_core_x,
            scan_wallets: linked::scan_wallets,
            dispatch: linked::call_tcx_api,
            last_error: linked::get_last_err_message,
            clear_error: linked::clear_err,
            release: linked::free_const_string,
        }
    }
}
