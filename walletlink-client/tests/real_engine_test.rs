//! End-to-end checks against a real engine binary.
//!
//! Ignored by default. Set `WALLETLINK_ENGINE_PROGRAM` to an engine
//! executable that takes the request hex as its only argument and run with
//! `cargo test -- --ignored`. The same assertions run against the stand-in
//! engine process in `walletlink-test-utils/tests/subprocess_client_test.rs`.

use walletlink_client::{ChainSelection, ChainType, ImportMnemonic, Network, SegWit, WalletApi};
use walletlink_ffi::SubprocessEngine;
use walletlink_test_utils::{test_logger, TestWorkspace, TEST_MNEMONIC, TEST_PASSWORD};

const ENGINE_PROGRAM_VAR: &str = "WALLETLINK_ENGINE_PROGRAM";

fn real_engine(test_name: &str) -> (TestWorkspace, WalletApi<SubprocessEngine>) {
    let logger = test_logger(test_name);
    let program = std::env::var(ENGINE_PROGRAM_VAR)
        .unwrap_or_else(|_| panic!("{ENGINE_PROGRAM_VAR} must name the engine binary"));
    let workspace = TestWorkspace::new().unwrap();
    let api = WalletApi::new(SubprocessEngine::new(program, &logger), &logger);
    api.bootstrap(workspace.config()).unwrap();
    (workspace, api)
}

fn import_address(api: &WalletApi<SubprocessEngine>, selection: ChainSelection) -> String {
    let request = ImportMnemonic::new(TEST_MNEMONIC, TEST_PASSWORD, selection)
        .name(selection.chain_type.as_str())
        .overwrite(true);
    let wallet = api.import_mnemonic(&request).unwrap();
    wallet.account_for(selection.chain_type).unwrap().address.clone()
}

#[test]
#[ignore = "needs a real engine binary in WALLETLINK_ENGINE_PROGRAM"]
fn known_mnemonic_imports_to_known_addresses() {
    let (_workspace, api) = real_engine("known_mnemonic_imports_to_known_addresses");

    let bch = ChainSelection::new(ChainType::BitcoinCash, Network::Testnet).with_seg_wit(SegWit::None);
    assert_eq!(
        import_address(&api, bch),
        "qqurlwqukz3lcujttcyvlzaagppnd4c37chrtrylmc"
    );

    let ltc = ChainSelection::new(ChainType::Litecoin, Network::Testnet).with_seg_wit(SegWit::None);
    assert_eq!(import_address(&api, ltc), "mkeNU5nVnozJiaACDELLCsVUc8Wxoh1rQN");

    let tron = ChainSelection::new(ChainType::Tron, Network::Mainnet);
    assert_eq!(import_address(&api, tron), "TY2uroBeZ5trA9QT96aEWj32XLkAAhQ9R2");
}

#[test]
#[ignore = "needs a real engine binary in WALLETLINK_ENGINE_PROGRAM"]
fn real_engine_reports_word_count() {
    let (_workspace, api) = real_engine("real_engine_reports_word_count");
    let eleven = TEST_MNEMONIC.rsplit_once(' ').map(|(head, _)| head).unwrap();
    let tron = ChainSelection::new(ChainType::Tron, Network::Mainnet);
    let err = api
        .import_mnemonic(&ImportMnemonic::new(eleven, TEST_PASSWORD, tron))
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid number of words in phrase: 11");
}
