//! Parameter and result schemas carried in envelopes.
//!
//! Field tags follow declaration order. Every message also derives serde in
//! camelCase so the case harness can build requests from JSON.

use serde::{Deserialize, Serialize};

use crate::action::{TypedAny, TypedMessage};
use crate::error::{ProtoError, Result};

fn require(type_id: &'static str, field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ProtoError::invalid(type_id, format!("{field} is empty")));
    }
    Ok(())
}

/// Generic success/failure result; failures may also travel hex-encoded
/// through the error channel in this shape.
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Response {
    #[prost(bool, tag = "1")]
    pub is_success: bool,
    #[prost(string, tag = "2")]
    pub error: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InitParam {
    #[prost(string, tag = "1")]
    pub file_dir: String,
    #[prost(string, tag = "2")]
    pub xpub_common_key: String,
    #[prost(string, tag = "3")]
    pub xpub_common_iv: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HdStoreCreateParam {
    #[prost(string, tag = "1")]
    pub password: String,
    #[prost(string, tag = "2")]
    pub password_hint: String,
    #[prost(string, tag = "3")]
    pub name: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HdStoreImportParam {
    #[prost(string, tag = "1")]
    pub chain_type: String,
    #[prost(string, tag = "2")]
    pub mnemonic: String,
    #[prost(string, tag = "3")]
    pub password: String,
    #[prost(string, tag = "4")]
    pub path: String,
    #[prost(string, tag = "5")]
    pub source: String,
    #[prost(string, tag = "6")]
    pub name: String,
    #[prost(string, tag = "7")]
    pub network: String,
    #[prost(string, tag = "8")]
    pub seg_wit: String,
    #[prost(string, tag = "9")]
    pub password_hint: String,
    #[prost(bool, tag = "10")]
    pub overwrite: bool,
}

/// One account to derive from an HD wallet
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Derivation {
    #[prost(string, tag = "1")]
    pub chain_type: String,
    #[prost(string, tag = "2")]
    pub path: String,
    #[prost(string, tag = "3")]
    pub network: String,
    #[prost(string, tag = "4")]
    pub seg_wit: String,
    #[prost(string, tag = "5")]
    pub chain_id: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HdStoreDeriveParam {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub password: String,
    #[prost(message, repeated, tag = "3")]
    pub derivations: Vec<Derivation>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountResponse {
    #[prost(string, tag = "1")]
    pub chain_type: String,
    #[prost(string, tag = "2")]
    pub address: String,
    #[prost(string, tag = "3")]
    pub path: String,
    #[prost(string, tag = "4")]
    pub extended_xpub_key: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountsResponse {
    #[prost(message, repeated, tag = "1")]
    pub accounts: Vec<AccountResponse>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HdStoreExtendedPublicKeyParam {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub password: String,
    #[prost(string, tag = "3")]
    pub chain_type: String,
    #[prost(string, tag = "4")]
    pub address: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HdStoreExtendedPublicKeyResponse {
    #[prost(string, tag = "1")]
    pub extended_public_key: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeystoreCommonAccountsParam {
    #[prost(string, tag = "1")]
    pub id: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrivateKeyStoreImportParam {
    #[prost(string, tag = "1")]
    pub private_key: String,
    #[prost(string, tag = "2")]
    pub password: String,
    #[prost(string, tag = "3")]
    pub chain_type: String,
    #[prost(string, tag = "4")]
    pub network: String,
    #[prost(string, tag = "5")]
    pub seg_wit: String,
    #[prost(bool, tag = "6")]
    pub overwrite: bool,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrivateKeyStoreExportParam {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub password: String,
    #[prost(string, tag = "3")]
    pub chain_type: String,
    #[prost(string, tag = "4")]
    pub network: String,
}

/// Wallet id plus password, used by export, verify and delete
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WalletKeyParam {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub password: String,
}

/// Kind of secret a keystore was created from
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration, Serialize, Deserialize,
)]
#[repr(i32)]
pub enum KeyType {
    Mnemonic = 0,
    PrivateKey = 1,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeystoreCommonExistsParam {
    #[prost(enumeration = "KeyType", tag = "1")]
    pub r#type: i32,
    #[prost(string, tag = "2")]
    pub value: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeystoreCommonExportResult {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(enumeration = "KeyType", tag = "2")]
    pub r#type: i32,
    #[prost(string, tag = "3")]
    pub value: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeystoreCommonExistsResult {
    #[prost(bool, tag = "1")]
    pub is_exists: bool,
    #[prost(string, tag = "2")]
    pub id: String,
}

/// Sign request; `input` carries a chain-specific [`SignInput`]
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignParam {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub password: String,
    #[prost(string, tag = "3")]
    pub chain_type: String,
    #[prost(string, tag = "4")]
    pub address: String,
    #[prost(message, optional, tag = "5")]
    #[serde(skip)]
    pub input: Option<TypedAny>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WalletResult {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub source: String,
    #[prost(message, repeated, tag = "4")]
    pub accounts: Vec<AccountResponse>,
    #[prost(int64, tag = "5")]
    pub created_at: i64,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Utxo {
    #[prost(string, tag = "1")]
    pub tx_hash: String,
    #[prost(int32, tag = "2")]
    pub vout: i32,
    #[prost(int64, tag = "3")]
    pub amount: i64,
    #[prost(string, tag = "4")]
    pub address: String,
    #[prost(string, tag = "5")]
    pub script_pub_key: String,
    #[prost(string, tag = "6")]
    pub derived_path: String,
    #[prost(int64, tag = "7")]
    pub sequence: i64,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BtcForkTxInput {
    #[prost(string, tag = "1")]
    pub to: String,
    #[prost(int64, tag = "2")]
    pub amount: i64,
    #[prost(message, repeated, tag = "3")]
    pub unspents: Vec<Utxo>,
    #[prost(int64, tag = "4")]
    pub fee: i64,
    #[prost(uint32, tag = "5")]
    pub change_address_index: u32,
    #[prost(string, tag = "6")]
    pub change_address: String,
    #[prost(string, tag = "7")]
    pub network: String,
    #[prost(string, tag = "8")]
    pub seg_wit: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BtcForkSignedTxOutput {
    #[prost(string, tag = "1")]
    pub signature: String,
    #[prost(string, tag = "2")]
    pub tx_hash: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TronTxInput {
    #[prost(bytes = "vec", tag = "1")]
    #[serde(with = "hex::serde")]
    pub raw_data: Vec<u8>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TronTxOutput {
    #[prost(bytes = "vec", tag = "1")]
    #[serde(with = "hex::serde")]
    pub signature: Vec<u8>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TronMessageInput {
    #[prost(string, tag = "1")]
    pub value: String,
    #[prost(bool, tag = "2")]
    pub is_hex: bool,
    #[prost(bool, tag = "3")]
    pub is_tron_header: bool,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TronMessageOutput {
    #[prost(string, tag = "1")]
    pub signature: String,
}

/// Chain-specific signing payload; the signed result schema follows from it
pub trait SignInput: TypedMessage {
    type Output: TypedMessage;
}

impl SignInput for BtcForkTxInput {
    type Output = BtcForkSignedTxOutput;
}

impl SignInput for TronTxInput {
    type Output = TronTxOutput;
}

impl SignInput for TronMessageInput {
    type Output = TronMessageOutput;
}

macro_rules! typed_messages {
    ($($ty:ident),* $(,)?) => {
        $(
            impl TypedMessage for $ty {
                const TYPE_ID: &'static str = stringify!($ty);
            }
        )*
    };
}

// Messages without structural checks
typed_messages!(
    Response,
    HdStoreCreateParam,
    AccountResponse,
    AccountsResponse,
    HdStoreExtendedPublicKeyResponse,
    KeystoreCommonExportResult,
    KeystoreCommonExistsResult,
    WalletResult,
    Utxo,
    BtcForkSignedTxOutput,
    TronTxOutput,
    TronMessageInput,
    TronMessageOutput,
);

impl TypedMessage for InitParam {
    const TYPE_ID: &'static str = "InitParam";

    fn validate(&self) -> Result<()> {
        require(Self::TYPE_ID, "fileDir", &self.file_dir)
    }
}

impl TypedMessage for HdStoreImportParam {
    const TYPE_ID: &'static str = "HdStoreImportParam";

    fn validate(&self) -> Result<()> {
        require(Self::TYPE_ID, "chainType", &self.chain_type)?;
        require(Self::TYPE_ID, "mnemonic", &self.mnemonic)?;
        require(Self::TYPE_ID, "password", &self.password)?;
        require(Self::TYPE_ID, "path", &self.path)
    }
}

impl TypedMessage for PrivateKeyStoreImportParam {
    const TYPE_ID: &'static str = "PrivateKeyStoreImportParam";

    fn validate(&self) -> Result<()> {
        require(Self::TYPE_ID, "privateKey", &self.private_key)?;
        require(Self::TYPE_ID, "password", &self.password)?;
        require(Self::TYPE_ID, "chainType", &self.chain_type)
    }
}

impl TypedMessage for HdStoreDeriveParam {
    const TYPE_ID: &'static str = "HdStoreDeriveParam";

    fn validate(&self) -> Result<()> {
        require(Self::TYPE_ID, "id", &self.id)?;
        if self.derivations.is_empty() {
            return Err(ProtoError::invalid(Self::TYPE_ID, "derivations is empty"));
        }
        for derivation in &self.derivations {
            require(Self::TYPE_ID, "derivation chainType", &derivation.chain_type)?;
            require(Self::TYPE_ID, "derivation path", &derivation.path)?;
        }
        Ok(())
    }
}

impl TypedMessage for HdStoreExtendedPublicKeyParam {
    const TYPE_ID: &'static str = "HdStoreExtendedPublicKeyParam";

    fn validate(&self) -> Result<()> {
        require(Self::TYPE_ID, "id", &self.id)?;
        require(Self::TYPE_ID, "address", &self.address)
    }
}

impl TypedMessage for KeystoreCommonAccountsParam {
    const TYPE_ID: &'static str = "KeystoreCommonAccountsParam";

    fn validate(&self) -> Result<()> {
        require(Self::TYPE_ID, "id", &self.id)
    }
}

impl TypedMessage for PrivateKeyStoreExportParam {
    const TYPE_ID: &'static str = "PrivateKeyStoreExportParam";

    fn validate(&self) -> Result<()> {
        require(Self::TYPE_ID, "id", &self.id)
    }
}

impl TypedMessage for WalletKeyParam {
    const TYPE_ID: &'static str = "WalletKeyParam";

    fn validate(&self) -> Result<()> {
        require(Self::TYPE_ID, "id", &self.id)
    }
}

impl TypedMessage for KeystoreCommonExistsParam {
    const TYPE_ID: &'static str = "KeystoreCommonExistsParam";

    fn validate(&self) -> Result<()> {
        KeyType::try_from(self.r#type)
            .map(|_| ())
            .map_err(|_| ProtoError::invalid(Self::TYPE_ID, format!("unknown key type {}", self.r#type)))
    }
}

impl TypedMessage for SignParam {
    const TYPE_ID: &'static str = "SignParam";

    fn validate(&self) -> Result<()> {
        require(Self::TYPE_ID, "id", &self.id)?;
        require(Self::TYPE_ID, "address", &self.address)?;
        if self.input.is_none() {
            return Err(ProtoError::invalid(Self::TYPE_ID, "input is missing"));
        }
        Ok(())
    }
}

impl TypedMessage for BtcForkTxInput {
    const TYPE_ID: &'static str = "BtcForkTxInput";

    fn validate(&self) -> Result<()> {
        if self.unspents.is_empty() {
            return Err(ProtoError::invalid(Self::TYPE_ID, "unspents is empty"));
        }
        Ok(())
    }
}

impl TypedMessage for TronTxInput {
    const TYPE_ID: &'static str = "TronTxInput";
}

impl SignParam {
    /// Build a sign request carrying a packed chain input
    pub fn with_input<I: SignInput>(
        id: impl Into<String>,
        password: impl Into<String>,
        chain_type: impl Into<String>,
        address: impl Into<String>,
        input: &I,
    ) -> Result<Self> {
        input.validate()?;
        Ok(Self {
            id: id.into(),
            password: password.into(),
            chain_type: chain_type.into(),
            address: address.into(),
            input: Some(TypedAny::pack(input)),
        })
    }
}
