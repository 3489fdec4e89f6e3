#![allow(dead_code)]

use walletlink_client::{ChainSelection, ChainType, ImportMnemonic, Network, SegWit, WalletApi};
use walletlink_test_utils::{test_logger, InProcessEngine, TestWorkspace, TEST_MNEMONIC, TEST_PASSWORD};

pub struct Fixture {
    pub workspace: TestWorkspace,
    pub api: WalletApi<InProcessEngine>,
}

/// A bootstrapped client over a private stand-in engine
pub fn fixture(test_name: &str) -> Fixture {
    let workspace = TestWorkspace::new().expect("temp dir");
    let api = WalletApi::new(InProcessEngine::new(), &test_logger(test_name));
    api.bootstrap(workspace.config()).expect("bootstrap");
    Fixture { workspace, api }
}

pub fn bch() -> ChainSelection {
    ChainSelection::new(ChainType::BitcoinCash, Network::Mainnet).with_seg_wit(SegWit::None)
}

pub fn ltc_testnet() -> ChainSelection {
    ChainSelection::new(ChainType::Litecoin, Network::Testnet).with_seg_wit(SegWit::None)
}

pub fn tron() -> ChainSelection {
    ChainSelection::new(ChainType::Tron, Network::Mainnet)
}

pub fn import(selection: ChainSelection) -> ImportMnemonic {
    ImportMnemonic::new(TEST_MNEMONIC, TEST_PASSWORD, selection)
        .name(selection.chain_type.as_str())
        .overwrite(true)
}
