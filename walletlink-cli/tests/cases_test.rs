//! Case runner tests against the in-process stand-in engine

use serde_json::json;
use tempfile::TempDir;
use walletlink_cli::{call_case, CaseRunner, InitCommand};
use walletlink_client::BridgeConfig;
use walletlink_ffi::Engine;
use walletlink_test_utils::{test_logger, InProcessEngine, TestWorkspace, TEST_MNEMONIC, TEST_PASSWORD};

fn bootstrapped(workspace: &TestWorkspace) -> InProcessEngine {
    let engine = InProcessEngine::new();
    engine.init(workspace.config()).unwrap();
    engine.scan_wallets(&workspace.config().scan_config()).unwrap();
    engine
}

fn import_case(mnemonic: &str) -> serde_json::Value {
    json!({
        "method": "hd_store_import",
        "param": {
            "type": "HdStoreImportParam",
            "chainType": "TRON",
            "mnemonic": mnemonic,
            "password": TEST_PASSWORD,
            "path": "m/44'/195'/0'/0/0",
            "source": "MNEMONIC",
            "name": "tron",
            "overwrite": true
        }
    })
}

#[test]
fn call_case_decodes_the_registered_result() {
    let workspace = TestWorkspace::new().unwrap();
    let engine = bootstrapped(&workspace);

    let wallet = call_case(&engine, &import_case(TEST_MNEMONIC)).unwrap();
    assert_eq!(wallet["source"], "MNEMONIC");
    assert_eq!(wallet["accounts"][0]["chainType"], "TRON");

    let id = wallet["id"].as_str().unwrap();
    let exported = call_case(
        &engine,
        &json!({
            "method": "hd_store_export",
            "param": { "type": "WalletKeyParam", "id": id, "password": TEST_PASSWORD }
        }),
    )
    .unwrap();
    assert_eq!(exported["value"], TEST_MNEMONIC);
}

#[test]
fn run_dir_writes_results_and_errors_by_case_name() {
    let workspace = TestWorkspace::new().unwrap();
    let engine = bootstrapped(&workspace);
    let cases = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    std::fs::write(
        cases.path().join("import.json"),
        import_case(TEST_MNEMONIC).to_string(),
    )
    .unwrap();
    let nested = cases.path().join("errors");
    std::fs::create_dir(&nested).unwrap();
    let eleven = TEST_MNEMONIC.rsplit_once(' ').unwrap().0;
    std::fs::write(nested.join("eleven_words.json"), import_case(eleven).to_string()).unwrap();
    std::fs::write(
        nested.join("unknown_method.json"),
        json!({ "method": "hd_store_frobnicate", "param": {} }).to_string(),
    )
    .unwrap();
    std::fs::write(out.path().join("stale.json"), "old").unwrap();

    let runner = CaseRunner::new(&engine, &test_logger("run_dir"));
    let summary = runner.run_dir(cases.path(), out.path()).unwrap();
    assert_eq!(summary.passed, 1);
    assert_eq!(summary.failed, 2);

    assert!(!out.path().join("stale.json").exists());
    let imported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.path().join("import.json")).unwrap())
            .unwrap();
    assert_eq!(imported["accounts"][0]["path"], "m/44'/195'/0'/0/0");
    assert_eq!(
        std::fs::read_to_string(out.path().join("eleven_words.json")).unwrap(),
        "invalid number of words in phrase: 11"
    );
    assert!(std::fs::read_to_string(out.path().join("unknown_method.json"))
        .unwrap()
        .starts_with("unsupported_method"));
}

#[test]
fn init_command_refuses_to_overwrite_without_force() {
    let temp = TempDir::new().unwrap();
    let config_dir = temp.path().join("config");
    let config = BridgeConfig::new(temp.path().join("keystores"), "key", "iv");
    let command = InitCommand::new(config_dir.clone(), &test_logger("init"));

    command.run(&config, false).unwrap();
    assert!(temp.path().join("keystores").is_dir());
    assert_eq!(BridgeConfig::load(&config_dir).unwrap(), config);

    assert!(command.run(&config, false).is_err());
    command.run(&config, true).unwrap();
}
