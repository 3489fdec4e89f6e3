//! On-disk keystore records of the stand-in engine.
//!
//! One `<id>.json` per wallet. Secrets are stored unencrypted; this format
//! only has to survive a scan, not protect anything.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walletlink_proto::messages::{AccountResponse, KeyType, WalletResult};

use crate::MockError;

pub const KEYSTORE_VERSION: u32 = 1;

pub const SOURCE_MNEMONIC: &str = "MNEMONIC";
pub const SOURCE_PRIVATE: &str = "PRIVATE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAccount {
    pub chain_type: String,
    pub address: String,
    pub path: String,
    pub network: String,
    pub seg_wit: String,
}

impl StoredAccount {
    pub fn to_response(&self, extended_xpub_key: String) -> AccountResponse {
        AccountResponse {
            chain_type: self.chain_type.clone(),
            address: self.address.clone(),
            path: self.path.clone(),
            extended_xpub_key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredKeystore {
    pub version: u32,
    pub id: String,
    pub name: String,
    pub password_hint: String,
    pub source: String,
    pub secret: String,
    pub fingerprint: String,
    pub password_digest: String,
    pub accounts: Vec<StoredAccount>,
    pub created_at: i64,
}

impl StoredKeystore {
    pub fn key_type(&self) -> KeyType {
        if self.source == SOURCE_PRIVATE {
            KeyType::PrivateKey
        } else {
            KeyType::Mnemonic
        }
    }

    pub fn find_account(&self, address: &str) -> Option<&StoredAccount> {
        self.accounts.iter().find(|account| account.address == address)
    }

    /// Add an account unless the same address is already derived
    pub fn add_account(&mut self, account: StoredAccount) {
        if self.find_account(&account.address).is_none() {
            self.accounts.push(account);
        }
    }

    pub fn to_wallet_result(&self, xpub: impl Fn(&StoredAccount) -> String) -> WalletResult {
        WalletResult {
            id: self.id.clone(),
            name: self.name.clone(),
            source: self.source.clone(),
            accounts: self
                .accounts
                .iter()
                .map(|account| account.to_response(xpub(account)))
                .collect(),
            created_at: self.created_at,
        }
    }
}

pub fn keystore_path(directory: &Path, id: &str) -> PathBuf {
    directory.join(format!("{id}.json"))
}

pub fn save(directory: &Path, keystore: &StoredKeystore) -> Result<(), MockError> {
    let json = serde_json::to_string_pretty(keystore)
        .map_err(|err| MockError::new(format!("keystore encode failed: {err}")))?;
    fs::write(keystore_path(directory, &keystore.id), json)
        .map_err(|err| MockError::new(format!("keystore write failed: {err}")))
}

pub fn remove(directory: &Path, id: &str) -> Result<(), MockError> {
    let path = keystore_path(directory, id);
    if path.exists() {
        fs::remove_file(&path)
            .map_err(|err| MockError::new(format!("keystore delete failed: {err}")))?;
    }
    Ok(())
}

/// Load every readable keystore in `directory`; foreign files are skipped
pub fn load_all(directory: &Path) -> Result<Vec<StoredKeystore>, MockError> {
    let entries = fs::read_dir(directory).map_err(|err| {
        MockError::new(format!(
            "keystore directory {} unreadable: {err}",
            directory.display()
        ))
    })?;

    let mut keystores = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let parsed = fs::read_to_string(&path)
            .ok()
            .and_then(|text| serde_json::from_str::<StoredKeystore>(&text).ok());
        match parsed {
            Some(keystore) if keystore.version == KEYSTORE_VERSION => keystores.push(keystore),
            _ => log::warn!("skipping unrecognised keystore file {}", path.display()),
        }
    }
    Ok(keystores)
}
