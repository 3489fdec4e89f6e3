//! The stand-in engine: decodes envelopes and answers them from an
//! in-memory registry backed by keystore files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use prost::Message;
use walletlink_ffi::EngineConfig;
use walletlink_proto::messages::*;
use walletlink_proto::{decode_action, Method, TypedAny, TypedMessage};

use crate::keystore::{self, StoredAccount, StoredKeystore, SOURCE_MNEMONIC, SOURCE_PRIVATE};
use crate::secrets;
use crate::MockError;

#[derive(Default)]
struct State {
    directory: Option<PathBuf>,
    wallets: BTreeMap<String, StoredKeystore>,
}

impl State {
    fn directory(&self) -> Result<&Path, MockError> {
        self.directory
            .as_deref()
            .ok_or_else(|| MockError::new("engine not initialized"))
    }

    fn persist(&self, keystore: &StoredKeystore) -> Result<(), MockError> {
        keystore::save(self.directory()?, keystore)
    }

    /// Look up a wallet and check its password
    fn unlock(&self, id: &str, password: &str) -> Result<&StoredKeystore, MockError> {
        let keystore = self
            .wallets
            .get(id)
            .ok_or_else(|| MockError::new("wallet_not_found"))?;
        if keystore.password_digest != secrets::password_digest(id, password) {
            return Err(MockError::new("password_incorrect"));
        }
        Ok(keystore)
    }

    fn find_by_fingerprint(&self, fingerprint: &str) -> Option<&StoredKeystore> {
        self.wallets
            .values()
            .find(|keystore| keystore.fingerprint == fingerprint)
    }
}

/// Everything an import needs once the secret is validated
struct ImportRequest {
    source: &'static str,
    secret: String,
    fingerprint: String,
    name: String,
    password: String,
    password_hint: String,
    overwrite: bool,
    account: StoredAccount,
}

/// In-memory wallet engine speaking the envelope protocol
#[derive(Default)]
pub struct MockEngine {
    state: Mutex<State>,
}

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or_default()
}

fn success() -> Response {
    Response {
        is_success: true,
        error: String::new(),
    }
}

fn xpub_for(keystore: &StoredKeystore) -> impl Fn(&StoredAccount) -> String + '_ {
    move |account: &StoredAccount| {
        if keystore.source == SOURCE_MNEMONIC {
            secrets::extended_public_key(&keystore.fingerprint, &account.chain_type, &account.address)
        } else {
            String::new()
        }
    }
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Point the engine at a keystore directory, forgetting loaded wallets
    pub fn init(&self, config: &EngineConfig) -> Result<(), MockError> {
        std::fs::create_dir_all(&config.directory).map_err(|err| {
            MockError::new(format!(
                "keystore directory {} unusable: {err}",
                config.directory.display()
            ))
        })?;
        let mut state = self.state();
        state.directory = Some(config.directory.clone());
        state.wallets.clear();
        Ok(())
    }

    /// Load keystores from `directory`; wallets already loaded are replaced
    /// by id, never duplicated
    pub fn scan(&self, directory: &Path) -> Result<(), MockError> {
        let keystores = keystore::load_all(directory)?;
        let mut state = self.state();
        for keystore in keystores {
            state.wallets.insert(keystore.id.clone(), keystore);
        }
        Ok(())
    }

    pub fn wallet_ids(&self) -> Vec<String> {
        self.state().wallets.keys().cloned().collect()
    }

    pub fn directory(&self) -> Option<PathBuf> {
        self.state().directory.clone()
    }

    /// Answer one hex request with hex result text
    pub fn handle_hex(&self, request_hex: &str) -> Result<String, MockError> {
        let bytes = walletlink_proto::from_text(request_hex)?;
        self.handle(&bytes).map(|result| walletlink_proto::to_text(&result))
    }

    /// Answer one encoded envelope
    pub fn handle(&self, request: &[u8]) -> Result<Vec<u8>, MockError> {
        let (method, param) = decode_action(request)?;
        log::debug!("stand-in engine handling {method}");
        match method {
            Method::InitTokenCoreX => self.init_from_param(param.unpack()?),
            Method::HdStoreCreate => encoded(self.hd_store_create(param.unpack()?)),
            Method::HdStoreImport => encoded(self.hd_store_import(param.unpack()?)),
            Method::HdStoreDerive => encoded(self.hd_store_derive(param.unpack()?)),
            Method::HdStoreExport => encoded(self.export(param.unpack()?, KeyType::Mnemonic)),
            Method::HdStoreExtendedPublicKey => {
                encoded(self.extended_public_key(param.unpack()?))
            }
            Method::PrivateKeyStoreImport => encoded(self.private_key_store_import(param.unpack()?)),
            Method::PrivateKeyStoreExport => {
                let param: PrivateKeyStoreExportParam = param.unpack()?;
                encoded(self.export(
                    WalletKeyParam {
                        id: param.id,
                        password: param.password,
                    },
                    KeyType::PrivateKey,
                ))
            }
            Method::KeystoreCommonVerify => encoded(self.verify(param.unpack()?)),
            Method::KeystoreCommonDelete => encoded(self.delete(param.unpack()?)),
            Method::KeystoreCommonExists => encoded(self.exists(param.unpack()?)),
            Method::KeystoreCommonAccounts => encoded(self.accounts(param.unpack()?)),
            Method::SignTx => self.sign_tx(param.unpack()?),
            Method::TronSignMsg => encoded(self.tron_sign_msg(param.unpack()?)),
        }
    }

    fn init_from_param(&self, param: InitParam) -> Result<Vec<u8>, MockError> {
        let config = EngineConfig::new(param.file_dir, param.xpub_common_key, param.xpub_common_iv);
        self.init(&config)?;
        self.scan(&config.directory)?;
        Ok(success().encode_to_vec())
    }

    fn hd_store_create(&self, param: HdStoreCreateParam) -> Result<WalletResult, MockError> {
        let mnemonic = secrets::generate_mnemonic()?.to_string();
        let fingerprint = secrets::fingerprint("mnemonic", &mnemonic);
        let id = uuid::Uuid::new_v4().to_string();
        let keystore = StoredKeystore {
            version: keystore::KEYSTORE_VERSION,
            password_digest: secrets::password_digest(&id, &param.password),
            id,
            name: param.name,
            password_hint: param.password_hint,
            source: SOURCE_MNEMONIC.to_string(),
            secret: mnemonic,
            fingerprint,
            accounts: Vec::new(),
            created_at: now(),
        };
        let mut state = self.state();
        state.persist(&keystore)?;
        let result = keystore.to_wallet_result(xpub_for(&keystore));
        state.wallets.insert(keystore.id.clone(), keystore);
        Ok(result)
    }

    fn hd_store_import(&self, param: HdStoreImportParam) -> Result<WalletResult, MockError> {
        let mnemonic = secrets::parse_mnemonic(&param.mnemonic)?.to_string();
        secrets::check_hd_chain(&param.chain_type, &param.network, &param.seg_wit)?;
        let fingerprint = secrets::fingerprint("mnemonic", &mnemonic);
        let address = secrets::mnemonic_address(
            &mnemonic,
            &fingerprint,
            &param.chain_type,
            &param.path,
            &param.network,
            &param.seg_wit,
        )?;
        self.import(ImportRequest {
            source: SOURCE_MNEMONIC,
            secret: mnemonic,
            fingerprint,
            name: param.name,
            password: param.password,
            password_hint: param.password_hint,
            overwrite: param.overwrite,
            account: StoredAccount {
                chain_type: param.chain_type,
                address,
                path: param.path,
                network: param.network,
                seg_wit: param.seg_wit,
            },
        })
    }

    fn private_key_store_import(
        &self,
        param: PrivateKeyStoreImportParam,
    ) -> Result<WalletResult, MockError> {
        secrets::check_private_key_chain(&param.chain_type, &param.network, &param.seg_wit)?;
        secrets::check_private_key(&param.chain_type, &param.network, &param.private_key)?;
        let fingerprint = secrets::fingerprint("private", &param.private_key);
        let address = secrets::address_for(
            &fingerprint,
            &param.chain_type,
            "",
            &param.network,
            &param.seg_wit,
        );
        self.import(ImportRequest {
            source: SOURCE_PRIVATE,
            secret: param.private_key,
            fingerprint,
            name: String::new(),
            password: param.password,
            password_hint: String::new(),
            overwrite: param.overwrite,
            account: StoredAccount {
                chain_type: param.chain_type,
                address,
                path: String::new(),
                network: param.network,
                seg_wit: param.seg_wit,
            },
        })
    }

    fn import(&self, request: ImportRequest) -> Result<WalletResult, MockError> {
        let mut state = self.state();
        let existing = state.find_by_fingerprint(&request.fingerprint).cloned();
        let keystore = match existing {
            Some(_) if !request.overwrite => return Err(MockError::new("address_already_exist")),
            Some(mut keystore) => {
                keystore.password_digest =
                    secrets::password_digest(&keystore.id, &request.password);
                keystore.password_hint = request.password_hint;
                if !request.name.is_empty() {
                    keystore.name = request.name;
                }
                keystore.add_account(request.account);
                keystore
            }
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                StoredKeystore {
                    version: keystore::KEYSTORE_VERSION,
                    password_digest: secrets::password_digest(&id, &request.password),
                    id,
                    name: request.name,
                    password_hint: request.password_hint,
                    source: request.source.to_string(),
                    secret: request.secret,
                    fingerprint: request.fingerprint,
                    accounts: vec![request.account],
                    created_at: now(),
                }
            }
        };
        state.persist(&keystore)?;
        let result = keystore.to_wallet_result(xpub_for(&keystore));
        state.wallets.insert(keystore.id.clone(), keystore);
        Ok(result)
    }

    fn hd_store_derive(&self, param: HdStoreDeriveParam) -> Result<AccountsResponse, MockError> {
        let mut state = self.state();
        let mut keystore = state.unlock(&param.id, &param.password)?.clone();
        if keystore.source != SOURCE_MNEMONIC {
            return Err(MockError::new("derive requires a mnemonic wallet"));
        }

        let mut derived = Vec::with_capacity(param.derivations.len());
        for derivation in &param.derivations {
            secrets::check_hd_chain(&derivation.chain_type, &derivation.network, &derivation.seg_wit)?;
            let account = StoredAccount {
                chain_type: derivation.chain_type.clone(),
                address: secrets::mnemonic_address(
                    &keystore.secret,
                    &keystore.fingerprint,
                    &derivation.chain_type,
                    &derivation.path,
                    &derivation.network,
                    &derivation.seg_wit,
                )?,
                path: derivation.path.clone(),
                network: derivation.network.clone(),
                seg_wit: derivation.seg_wit.clone(),
            };
            derived.push(account.to_response(xpub_for(&keystore)(&account)));
            keystore.add_account(account);
        }

        state.persist(&keystore)?;
        state.wallets.insert(keystore.id.clone(), keystore);
        Ok(AccountsResponse { accounts: derived })
    }

    fn export(
        &self,
        param: WalletKeyParam,
        expected: KeyType,
    ) -> Result<KeystoreCommonExportResult, MockError> {
        let state = self.state();
        let keystore = state.unlock(&param.id, &param.password)?;
        if keystore.key_type() != expected {
            return Err(MockError::new("export does not match the wallet source"));
        }
        Ok(KeystoreCommonExportResult {
            id: keystore.id.clone(),
            r#type: keystore.key_type() as i32,
            value: keystore.secret.clone(),
        })
    }

    fn extended_public_key(
        &self,
        param: HdStoreExtendedPublicKeyParam,
    ) -> Result<HdStoreExtendedPublicKeyResponse, MockError> {
        let state = self.state();
        let keystore = state.unlock(&param.id, &param.password)?;
        let account = keystore
            .find_account(&param.address)
            .filter(|account| account.chain_type == param.chain_type)
            .ok_or_else(|| MockError::new("account_not_found"))?;
        let extended_public_key = xpub_for(keystore)(account);
        Ok(HdStoreExtendedPublicKeyResponse { extended_public_key })
    }

    fn verify(&self, param: WalletKeyParam) -> Result<Response, MockError> {
        self.state().unlock(&param.id, &param.password)?;
        Ok(success())
    }

    fn delete(&self, param: WalletKeyParam) -> Result<Response, MockError> {
        let mut state = self.state();
        state.unlock(&param.id, &param.password)?;
        keystore::remove(state.directory()?, &param.id)?;
        state.wallets.remove(&param.id);
        Ok(success())
    }

    fn exists(&self, param: KeystoreCommonExistsParam) -> Result<KeystoreCommonExistsResult, MockError> {
        let fingerprint = match KeyType::try_from(param.r#type) {
            Ok(KeyType::Mnemonic) => {
                let mnemonic = secrets::parse_mnemonic(&param.value)?.to_string();
                secrets::fingerprint("mnemonic", &mnemonic)
            }
            Ok(KeyType::PrivateKey) => secrets::fingerprint("private", &param.value),
            Err(_) => return Err(MockError::new("unknown key type")),
        };
        let state = self.state();
        Ok(match state.find_by_fingerprint(&fingerprint) {
            Some(keystore) => KeystoreCommonExistsResult {
                is_exists: true,
                id: keystore.id.clone(),
            },
            None => KeystoreCommonExistsResult {
                is_exists: false,
                id: String::new(),
            },
        })
    }

    fn accounts(&self, param: KeystoreCommonAccountsParam) -> Result<AccountsResponse, MockError> {
        let state = self.state();
        let keystore = state
            .wallets
            .get(&param.id)
            .ok_or_else(|| MockError::new("wallet_not_found"))?;
        let xpub = xpub_for(keystore);
        Ok(AccountsResponse {
            accounts: keystore
                .accounts
                .iter()
                .map(|account| account.to_response(xpub(account)))
                .collect(),
        })
    }

    /// Unlock the wallet and find the signing account for a sign request
    fn signer(&self, param: &SignParam) -> Result<(String, TypedAny), MockError> {
        let state = self.state();
        let keystore = state.unlock(&param.id, &param.password)?;
        keystore
            .find_account(&param.address)
            .filter(|account| account.chain_type == param.chain_type)
            .ok_or_else(|| MockError::new("account_not_found"))?;
        let input = param
            .input
            .clone()
            .ok_or_else(|| MockError::new("sign input is missing"))?;
        Ok((keystore.fingerprint.clone(), input))
    }

    fn sign_tx(&self, param: SignParam) -> Result<Vec<u8>, MockError> {
        let (fingerprint, input) = self.signer(&param)?;
        if input.is::<BtcForkTxInput>() && secrets::is_utxo_chain(&param.chain_type) {
            let tx: BtcForkTxInput = input.unpack()?;
            let signed = secrets::signature(&fingerprint, &tx.encode_to_vec());
            return Ok(BtcForkSignedTxOutput {
                signature: hex::encode(signed),
                tx_hash: secrets::tx_hash(&signed),
            }
            .encode_to_vec());
        }
        if input.is::<TronTxInput>() && param.chain_type == "TRON" {
            let tx: TronTxInput = input.unpack()?;
            return Ok(TronTxOutput {
                signature: secrets::signature(&fingerprint, &tx.raw_data).to_vec(),
            }
            .encode_to_vec());
        }
        Err(MockError::new("unsupported_chain"))
    }

    fn tron_sign_msg(&self, param: SignParam) -> Result<TronMessageOutput, MockError> {
        if param.chain_type != "TRON" {
            return Err(MockError::new("unsupported_chain"));
        }
        let (fingerprint, input) = self.signer(&param)?;
        let message: TronMessageInput = input.unpack()?;
        let payload = if message.is_hex {
            walletlink_proto::from_text(message.value.trim_start_matches("0x"))?
        } else {
            message.value.into_bytes()
        };
        let mut prefixed = Vec::new();
        if message.is_tron_header {
            prefixed.extend_from_slice(format!("\x19TRON Signed Message:\n{}", payload.len()).as_bytes());
        }
        prefixed.extend_from_slice(&payload);
        Ok(TronMessageOutput {
            signature: format!("0x{}", hex::encode(secrets::signature(&fingerprint, &prefixed))),
        })
    }
}

fn encoded<T: TypedMessage>(result: Result<T, MockError>) -> Result<Vec<u8>, MockError> {
    result.map(|message| message.encode_to_vec())
}
