mod common;

use walletlink_client::{
    ChainSelection, ChainType, ClientError, ImportMnemonic, ImportPrivateKey, Network, SegWit,
    WalletApi, WalletSource, WalletState,
};
use walletlink_ffi::{ErrorCategory, ErrorKind};
use walletlink_proto::messages::{BtcForkTxInput, KeyType, TronMessageInput, TronTxInput, Utxo};
use walletlink_test_utils::secrets::encode_wif;
use walletlink_test_utils::{test_logger, InProcessEngine, TEST_MNEMONIC, TEST_PASSWORD};

use common::{bch, fixture, import, ltc_testnet, tron};

fn utxo_input(address: &str) -> BtcForkTxInput {
    BtcForkTxInput {
        to: "qq40fskqshxem2gvz0xkf34ww3h6zwv4dcr7pm0z6s".into(),
        amount: 93454,
        unspents: vec![Utxo {
            tx_hash: "09c3a49c1d01f6341c43ea43dd0de571664a45b4e7d9211945cb3046006a98e2".into(),
            vout: 0,
            amount: 100000,
            address: address.into(),
            script_pub_key: "76a91488d9931ea73d60eaf7e5671efc0552b912911f2a88ac".into(),
            derived_path: "0/0".into(),
            sequence: 0,
        }],
        fee: 6000,
        change_address_index: 1,
        change_address: String::new(),
        network: "MAINNET".into(),
        seg_wit: "NONE".into(),
    }
}

#[test]
fn full_lifecycle_ends_in_terminal_delete() {
    let fx = fixture("full_lifecycle_ends_in_terminal_delete");
    let api = &fx.api;

    let mut wallet = api.import_mnemonic(&import(bch())).unwrap();
    assert_eq!(wallet.source(), WalletSource::Mnemonic);
    assert_eq!(wallet.state(), WalletState::Derived);
    let bch_address = wallet.account_for(ChainType::BitcoinCash).unwrap().address.clone();

    let derived = api
        .derive(&mut wallet, TEST_PASSWORD, &[ltc_testnet(), tron()])
        .unwrap();
    assert_eq!(derived.len(), 2);
    assert_eq!(wallet.accounts().len(), 3);
    assert_eq!(derived[1].path, "m/44'/195'/0'/0/0");
    let tron_address = wallet.account_for(ChainType::Tron).unwrap().address.clone();

    let signed = api
        .sign_tx(&mut wallet, TEST_PASSWORD, ChainType::BitcoinCash, &bch_address, &utxo_input(&bch_address))
        .unwrap();
    assert_eq!(signed.tx_hash.len(), 64);
    assert_eq!(wallet.state(), WalletState::Signed);

    let tron_tx = TronTxInput {
        raw_data: hex_bytes("0a0208312208b02efdc02638b61e40f083c3a7c92d5a65"),
    };
    let first = api
        .sign_tx(&mut wallet, TEST_PASSWORD, ChainType::Tron, &tron_address, &tron_tx)
        .unwrap();
    let second = api
        .sign_tx(&mut wallet, TEST_PASSWORD, ChainType::Tron, &tron_address, &tron_tx)
        .unwrap();
    assert_eq!(first.signature.len(), 65);
    assert_eq!(first, second);

    let message = api
        .sign_tron_message(
            &mut wallet,
            TEST_PASSWORD,
            &tron_address,
            &TronMessageInput {
                value: "645c0b7b58158babbfa6c6cd5a48aa7340a8749176b120e8516216787a13dc76".into(),
                is_hex: true,
                is_tron_header: true,
            },
        )
        .unwrap();
    assert!(message.signature.starts_with("0x"));

    assert_eq!(api.export(&mut wallet, TEST_PASSWORD).unwrap(), TEST_MNEMONIC);
    assert_eq!(wallet.state(), WalletState::Exported);
    api.verify_password(&wallet, TEST_PASSWORD).unwrap();

    let stale = wallet.clone();
    api.delete(&mut wallet, TEST_PASSWORD).unwrap();
    assert!(wallet.is_deleted());
    assert_eq!(fx.workspace.keystore_files(), 0);

    // the deleted handle is refused locally
    let mut deleted = wallet.clone();
    let errors = [
        api.export(&mut deleted, TEST_PASSWORD).unwrap_err(),
        api.verify_password(&deleted, TEST_PASSWORD).unwrap_err(),
        api.derive(&mut deleted, TEST_PASSWORD, &[tron()]).unwrap_err(),
        api.sign_tx(&mut deleted, TEST_PASSWORD, ChainType::Tron, &tron_address, &tron_tx)
            .unwrap_err(),
    ];
    for err in &errors {
        assert_eq!(err.kind(), ErrorKind::WalletNotFound, "{err}");
    }

    // a handle taken before the delete is refused by the engine
    let mut stale = stale;
    let errors = [
        api.export(&mut stale, TEST_PASSWORD).unwrap_err(),
        api.verify_password(&stale, TEST_PASSWORD).unwrap_err(),
        api.derive(&mut stale, TEST_PASSWORD, &[tron()]).unwrap_err(),
        api.sign_tx(&mut stale, TEST_PASSWORD, ChainType::Tron, &tron_address, &tron_tx)
            .unwrap_err(),
    ];
    for err in &errors {
        assert!(matches!(err, ClientError::Bridge(_)));
        assert_eq!(err.to_string(), "wallet_not_found");
    }
}

#[test]
fn overwrite_import_keeps_address_and_takes_new_password() {
    let fx = fixture("overwrite_import_keeps_address_and_takes_new_password");
    let api = &fx.api;

    let first = api
        .import_mnemonic(&ImportMnemonic::new(TEST_MNEMONIC, "first password", tron()).overwrite(true))
        .unwrap();
    let mut second = api
        .import_mnemonic(&ImportMnemonic::new(TEST_MNEMONIC, "second password", tron()).overwrite(true))
        .unwrap();

    assert_eq!(first.id(), second.id());
    assert_eq!(first.accounts()[0].address, second.accounts()[0].address);

    let err = api.verify_password(&first, "first password").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PasswordIncorrect);
    assert_eq!(err.kind().category(), ErrorCategory::Authorization);
    api.verify_password(&second, "second password").unwrap();
    assert_eq!(api.export(&mut second, "second password").unwrap(), TEST_MNEMONIC);
}

#[test]
fn import_without_overwrite_reports_existing_wallet() {
    let fx = fixture("import_without_overwrite_reports_existing_wallet");
    fx.api.import_mnemonic(&import(tron())).unwrap();
    let err = fx
        .api
        .import_mnemonic(&import(tron()).overwrite(false))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AddressAlreadyExists);

    let id = fx
        .api
        .find_existing(KeyType::Mnemonic, TEST_MNEMONIC)
        .unwrap();
    assert!(id.is_some());
}

#[test]
fn mnemonic_validation_boundaries() {
    let fx = fixture("mnemonic_validation_boundaries");
    let words: Vec<&str> = TEST_MNEMONIC.split(' ').collect();

    let eleven = words[..11].join(" ");
    let thirteen = format!("{TEST_MNEMONIC} {}", words[0]);
    let misspelled = TEST_MNEMONIC.replace("kidney", "kidnee");
    let bad_checksum = ["abandon"; 12].join(" ");

    let cases = [
        (eleven, "invalid number of words in phrase: 11", ErrorKind::InvalidWordCount(11)),
        (thirteen, "invalid number of words in phrase: 13", ErrorKind::InvalidWordCount(13)),
        (misspelled, "invalid word in phrase", ErrorKind::InvalidWord),
        (bad_checksum, "invalid checksum", ErrorKind::InvalidChecksum),
    ];
    for (phrase, message, kind) in cases {
        let err = fx
            .api
            .import_mnemonic(&ImportMnemonic::new(phrase, TEST_PASSWORD, tron()))
            .unwrap_err();
        assert_eq!(err.to_string(), message);
        assert_eq!(err.kind(), kind);
        assert_eq!(kind.category(), ErrorCategory::Validation);
    }
}

#[test]
fn malformed_private_keys_are_classified() {
    let fx = fixture("malformed_private_keys_are_classified");
    let tron_key = |key: String| ImportPrivateKey::new(key, TEST_PASSWORD, tron());

    let odd = fx.api.import_private_key(&tron_key("a".repeat(63))).unwrap_err();
    assert_eq!(odd.to_string(), "hex can't decode: OddLength");
    assert_eq!(odd.kind(), ErrorKind::OddLength);

    let key = "a".repeat(57) + "imToken";
    let bad_char = fx.api.import_private_key(&tron_key(key)).unwrap_err();
    assert_eq!(
        bad_char.to_string(),
        "hex can't decode: InvalidHexCharacter { c: 'i', index: 57 }"
    );
    assert_eq!(bad_char.kind().category(), ErrorCategory::Encoding);

    let mut wif = encode_wif("BITCOINCASH", "MAINNET", &[3u8; 32]);
    let last = if wif.ends_with('1') { '2' } else { '1' };
    wif.pop();
    wif.push(last);
    let checksum = fx
        .api
        .import_private_key(&ImportPrivateKey::new(wif, TEST_PASSWORD, common::bch()))
        .unwrap_err();
    assert_eq!(checksum.to_string(), "base58ck checksum");
    assert_eq!(checksum.kind().category(), ErrorCategory::DomainRule);
    assert_ne!(checksum.kind(), odd.kind());
}

#[test]
fn private_key_export_round_trip() {
    let fx = fixture("private_key_export_round_trip");
    let key = encode_wif("LITECOIN", "MAINNET", &[9u8; 32]);
    let selection = ChainSelection::new(ChainType::Litecoin, Network::Mainnet).with_seg_wit(SegWit::None);

    let mut wallet = fx
        .api
        .import_private_key(&ImportPrivateKey::new(key.clone(), TEST_PASSWORD, selection))
        .unwrap();
    assert_eq!(wallet.source(), WalletSource::PrivateKey);
    assert_eq!(fx.api.export(&mut wallet, TEST_PASSWORD).unwrap(), key);

    let err = fx.api.export(&mut wallet, "not the password").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PasswordIncorrect);
}

#[test]
fn unsupported_combinations_report_one_classification() {
    let fx = fixture("unsupported_combinations_report_one_classification");

    // rejected by the path table before any call
    let no_witness = ChainSelection::new(ChainType::Bitcoin, Network::Mainnet);
    let local = fx.api.import_mnemonic(&import(no_witness)).unwrap_err();
    assert!(matches!(local, ClientError::UnsupportedChain));

    // rejected by the engine
    let eth = ChainSelection::new(ChainType::Ethereum, Network::Mainnet);
    let remote = fx
        .api
        .import_private_key(&ImportPrivateKey::new("0".repeat(64), TEST_PASSWORD, eth))
        .unwrap_err();
    assert!(matches!(remote, ClientError::Bridge(_)));

    assert_eq!(local.to_string(), "unsupported_chain");
    assert_eq!(remote.to_string(), "unsupported_chain");
    assert_eq!(local.kind(), remote.kind());
}

#[test]
fn rescan_is_idempotent_and_reopens_wallets() {
    let fx = fixture("rescan_is_idempotent_and_reopens_wallets");
    let bch_wallet = fx.api.import_mnemonic(&import(bch())).unwrap();
    let created = fx.api.create(TEST_PASSWORD, "fresh", "").unwrap();
    assert_eq!(created.state(), WalletState::Created);

    let api = WalletApi::new(InProcessEngine::new(), &test_logger("rescan"));
    assert!(matches!(
        api.open_existing(bch_wallet.id()),
        Err(ClientError::NotBootstrapped)
    ));

    api.bootstrap(fx.workspace.config()).unwrap();
    let once = api.engine().inner().wallet_ids();
    api.bootstrap(fx.workspace.config()).unwrap();
    api.rescan().unwrap();
    let thrice = api.engine().inner().wallet_ids();
    assert_eq!(once, thrice);
    assert_eq!(once.len(), 2);

    let reopened = api.open_existing(bch_wallet.id()).unwrap();
    assert_eq!(reopened.source(), WalletSource::Keystore);
    assert_eq!(reopened.accounts(), bch_wallet.accounts());
    assert_eq!(reopened.state(), WalletState::Derived);

    let mut reopened = reopened;
    assert_eq!(api.export(&mut reopened, TEST_PASSWORD).unwrap(), TEST_MNEMONIC);
    assert_eq!(reopened.source(), WalletSource::Mnemonic);
}

#[test]
fn reopened_private_key_wallet_exports_its_key() {
    let fx = fixture("reopened_private_key_wallet_exports_its_key");
    let key = encode_wif("LITECOIN", "TESTNET", &[7u8; 32]);
    let imported = fx
        .api
        .import_private_key(&ImportPrivateKey::new(key.clone(), TEST_PASSWORD, ltc_testnet()))
        .unwrap();

    let api = WalletApi::new(
        InProcessEngine::new(),
        &test_logger("reopened_private_key_wallet_exports_its_key"),
    );
    api.bootstrap(fx.workspace.config()).unwrap();
    api.rescan().unwrap();
    let mut reopened = api.open_existing(imported.id()).unwrap();
    assert_eq!(reopened.source(), WalletSource::Keystore);
    assert_eq!(reopened.chain_type(), Some(ChainType::Litecoin));

    let err = api.export(&mut reopened, "not the password").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PasswordIncorrect);
    assert_eq!(reopened.source(), WalletSource::Keystore);

    assert_eq!(api.export(&mut reopened, TEST_PASSWORD).unwrap(), key);
    assert_eq!(reopened.source(), WalletSource::PrivateKey);
    // the recorded source goes straight to the private-key export
    assert_eq!(api.export(&mut reopened, TEST_PASSWORD).unwrap(), key);
}

#[test]
fn known_mnemonic_derives_chain_addresses() {
    let fx = fixture("known_mnemonic_derives_chain_addresses");
    // one mnemonic is one keystore, so each import adds to the same account list
    let address = |selection: ChainSelection| {
        let wallet = fx.api.import_mnemonic(&import(selection)).unwrap();
        wallet.account_for(selection.chain_type).unwrap().address.clone()
    };

    let bch_testnet =
        ChainSelection::new(ChainType::BitcoinCash, Network::Testnet).with_seg_wit(SegWit::None);
    assert_eq!(address(bch_testnet), "qqurlwqukz3lcujttcyvlzaagppnd4c37chrtrylmc");
    assert_eq!(address(ltc_testnet()), "mkeNU5nVnozJiaACDELLCsVUc8Wxoh1rQN");
    assert_eq!(address(tron()), "TY2uroBeZ5trA9QT96aEWj32XLkAAhQ9R2");
}

#[test]
fn sign_before_derive_is_refused() {
    let fx = fixture("sign_before_derive_is_refused");
    let mut wallet = fx.api.create(TEST_PASSWORD, "new", "").unwrap();
    let err = fx
        .api
        .sign_tx(
            &mut wallet,
            TEST_PASSWORD,
            ChainType::Tron,
            "T1",
            &TronTxInput { raw_data: vec![1] },
        )
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidState { operation: "sign", .. }));

    let accounts = fx.api.derive(&mut wallet, TEST_PASSWORD, &[tron()]).unwrap();
    let xpub = fx
        .api
        .extended_public_key(&wallet, TEST_PASSWORD, ChainType::Tron, &accounts[0].address)
        .unwrap();
    assert!(xpub.starts_with("xpub"));
}

fn hex_bytes(text: &str) -> Vec<u8> {
    walletlink_proto::from_text(text).unwrap()
}
