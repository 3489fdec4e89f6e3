use walletlink_common::Logger;
use walletlink_ffi::{Engine, NativeEngine};
use walletlink_proto::messages::HdStoreImportParam;
use walletlink_test_utils::{mock_symbols, test_logger, TestWorkspace, TEST_MNEMONIC, TEST_PASSWORD};

pub struct Fixture {
    pub workspace: TestWorkspace,
    pub engine: NativeEngine,
    pub logger: Logger,
}

/// A native engine over the stand-in C entry points, initialised on a fresh
/// keystore directory
pub fn native_fixture(test_name: &str) -> Fixture {
    let logger = test_logger(test_name);
    let workspace = TestWorkspace::new().expect("temp dir");
    let engine = NativeEngine::new(mock_symbols(), &logger);
    engine.init(workspace.config()).expect("init");
    walletlink_test_utils::set_hex_errors(false);
    Fixture {
        workspace,
        engine,
        logger,
    }
}

pub fn tron_import(mnemonic: &str) -> HdStoreImportParam {
    HdStoreImportParam {
        chain_type: "TRON".into(),
        mnemonic: mnemonic.into(),
        password: TEST_PASSWORD.into(),
        path: "m/44'/195'/0'/0/0".into(),
        source: "MNEMONIC".into(),
        name: "tron".into(),
        network: String::new(),
        seg_wit: String::new(),
        password_hint: String::new(),
        overwrite: true,
    }
}

pub fn default_import() -> HdStoreImportParam {
    tron_import(TEST_MNEMONIC)
}
