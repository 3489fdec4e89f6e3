//! Secret validation and deterministic stand-ins for addresses and
//! signatures.
//!
//! Validation reproduces the engine's error text exactly. Mnemonic accounts
//! on the secp256k1 chains (BITCOIN, LITECOIN, BITCOINCASH, TRON, ETHEREUM)
//! get the real BIP32 address. Every other address, and every signature, is
//! a sha256 digest shaped like the real thing: stable for a given secret and
//! derivation but not valid on any chain.

use std::str::FromStr;

use bip39::{Language, Mnemonic};
use bitcoin::bip32::{DerivationPath, Xpriv};
use bitcoin::hashes::{hash160, Hash};
use bitcoin::secp256k1::{PublicKey, Secp256k1};
use bitcoin::NetworkKind;
use sha2::{Digest, Sha256};

use crate::MockError;

/// Chains the stand-in engine can import a mnemonic for
const HD_CHAINS: &[&str] = &[
    "BITCOIN",
    "LITECOIN",
    "BITCOINCASH",
    "ETHEREUM",
    "EOS",
    "COSMOS",
    "TRON",
    "NERVOS",
    "KUSAMA",
    "POLKADOT",
];

/// Chains the stand-in engine can import a private key for
const PRIVATE_KEY_CHAINS: &[&str] = &["BITCOINCASH", "LITECOIN", "TRON"];

const UTXO_CHAINS: &[&str] = &["BITCOIN", "LITECOIN", "BITCOINCASH"];

pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Parse and normalize a phrase, reporting the engine's literal errors
pub fn parse_mnemonic(phrase: &str) -> Result<Mnemonic, MockError> {
    let normalized = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
    Mnemonic::parse_in_normalized(Language::English, &normalized).map_err(|err| match err {
        bip39::Error::BadWordCount(count) => {
            MockError::new(format!("invalid number of words in phrase: {count}"))
        }
        bip39::Error::UnknownWord(_) => MockError::new("invalid word in phrase"),
        bip39::Error::InvalidChecksum => MockError::new("invalid checksum"),
        other => MockError::new(format!("invalid mnemonic: {other}")),
    })
}

/// Fresh mnemonic from uuid-derived entropy
pub fn generate_mnemonic() -> Result<Mnemonic, MockError> {
    let seed = sha256(uuid::Uuid::new_v4().as_bytes());
    Mnemonic::from_entropy(&seed[..16]).map_err(|err| MockError::new(err.to_string()))
}

pub fn is_utxo_chain(chain_type: &str) -> bool {
    UTXO_CHAINS.contains(&chain_type)
}

/// Check a chain/network/witness combination.
///
/// Every failure reports the same `unsupported_chain` text whichever field
/// was at fault.
pub fn check_combination(
    chain_type: &str,
    network: &str,
    seg_wit: &str,
    allowed: &[&str],
) -> Result<(), MockError> {
    let network_ok = matches!(network, "" | "MAINNET" | "TESTNET");
    let seg_wit_ok = match seg_wit {
        "" | "NONE" => true,
        "P2WPKH" => matches!(chain_type, "BITCOIN" | "LITECOIN"),
        _ => false,
    };
    if allowed.contains(&chain_type) && network_ok && seg_wit_ok {
        Ok(())
    } else {
        Err(MockError::new("unsupported_chain"))
    }
}

pub fn check_hd_chain(chain_type: &str, network: &str, seg_wit: &str) -> Result<(), MockError> {
    check_combination(chain_type, network, seg_wit, HD_CHAINS)
}

pub fn check_private_key_chain(
    chain_type: &str,
    network: &str,
    seg_wit: &str,
) -> Result<(), MockError> {
    check_combination(chain_type, network, seg_wit, PRIVATE_KEY_CHAINS)
}

/// Validate a private key in the encoding the chain uses
pub fn check_private_key(chain_type: &str, network: &str, key: &str) -> Result<(), MockError> {
    match chain_type {
        "TRON" => {
            let bytes = walletlink_proto::from_text(key).map_err(|err| MockError::new(err.to_string()))?;
            if bytes.len() != 32 {
                return Err(MockError::new("invalid_private_key"));
            }
            Ok(())
        }
        _ => check_wif(chain_type, network, key),
    }
}

fn wif_version(chain_type: &str, network: &str) -> u8 {
    match (chain_type, network) {
        (_, "TESTNET") => 0xef,
        ("LITECOIN", _) => 0xb0,
        _ => 0x80,
    }
}

fn check_wif(chain_type: &str, network: &str, key: &str) -> Result<(), MockError> {
    let payload = bitcoin::base58::decode_check(key).map_err(|err| match err {
        bitcoin::base58::Error::IncorrectChecksum(_) => MockError::new("base58ck checksum"),
        bitcoin::base58::Error::TooShort(_) => {
            MockError::new("base58ck data not even long enough for a checksum")
        }
        _ => MockError::new("invalid_private_key"),
    })?;
    let compressed_ok = payload.len() == 34 && payload[33] == 0x01;
    if payload.len() != 33 && !compressed_ok {
        return Err(MockError::new("invalid_private_key"));
    }
    if payload[0] != wif_version(chain_type, network) {
        return Err(MockError::new("invalid_private_key"));
    }
    Ok(())
}

/// Encode a 32-byte secret as WIF for the chain and network
pub fn encode_wif(chain_type: &str, network: &str, secret: &[u8; 32]) -> String {
    let mut payload = Vec::with_capacity(34);
    payload.push(wif_version(chain_type, network));
    payload.extend_from_slice(secret);
    payload.push(0x01);
    bitcoin::base58::encode_check(&payload)
}

/// Identity of the secret material, independent of password
pub fn fingerprint(kind: &str, secret: &str) -> String {
    hex::encode(sha256(format!("{kind}:{secret}").as_bytes()))
}

pub fn password_digest(id: &str, password: &str) -> String {
    hex::encode(sha256(format!("{id}:{password}").as_bytes()))
}

/// Deterministic address shaped for the chain
pub fn address_for(
    fingerprint: &str,
    chain_type: &str,
    path: &str,
    network: &str,
    seg_wit: &str,
) -> String {
    let digest = hex::encode(sha256(
        format!("{fingerprint}|{chain_type}|{path}|{network}|{seg_wit}").as_bytes(),
    ));
    let testnet = network == "TESTNET";
    let prefix = match chain_type {
        "BITCOINCASH" => "qq",
        "TRON" => "T",
        "ETHEREUM" => "0x",
        "BITCOIN" | "LITECOIN" if seg_wit == "P2WPKH" => {
            if testnet {
                "2"
            } else {
                "3"
            }
        }
        "BITCOIN" | "LITECOIN" if testnet => "m",
        "BITCOIN" => "1",
        "LITECOIN" => "L",
        _ => "",
    };
    let body_len = if chain_type == "ETHEREUM" { 40 } else { 33 };
    format!("{prefix}{}", &digest[..body_len])
}

/// Address of a mnemonic account.
///
/// Chains keyed by BIP32 secp256k1 get their real address; the rest fall
/// back to [`address_for`].
pub fn mnemonic_address(
    phrase: &str,
    fingerprint: &str,
    chain_type: &str,
    path: &str,
    network: &str,
    seg_wit: &str,
) -> Result<String, MockError> {
    if !matches!(
        chain_type,
        "BITCOIN" | "LITECOIN" | "BITCOINCASH" | "TRON" | "ETHEREUM"
    ) {
        return Ok(address_for(fingerprint, chain_type, path, network, seg_wit));
    }
    let public_key = derive_public_key(phrase, path)?;
    let testnet = network == "TESTNET";
    let address = match chain_type {
        "TRON" => {
            let mut payload = vec![0x41];
            payload.extend_from_slice(&keccak_address(&public_key));
            bitcoin::base58::encode_check(&payload)
        }
        "ETHEREUM" => format!("0x{}", hex::encode(keccak_address(&public_key))),
        "BITCOINCASH" => {
            let prefix = if testnet { "bchtest" } else { "bitcoincash" };
            cashaddr(prefix, &hash160::Hash::hash(&public_key.serialize()).to_byte_array())
        }
        _ => {
            let key_hash = hash160::Hash::hash(&public_key.serialize()).to_byte_array();
            let (version, hash) = if seg_wit == "P2WPKH" {
                let mut script = vec![0x00, 0x14];
                script.extend_from_slice(&key_hash);
                let version = match (chain_type, testnet) {
                    ("LITECOIN", false) => 0x32,
                    ("LITECOIN", true) => 0x3a,
                    (_, false) => 0x05,
                    (_, true) => 0xc4,
                };
                (version, hash160::Hash::hash(&script).to_byte_array())
            } else {
                let version = match (chain_type, testnet) {
                    (_, true) => 0x6f,
                    ("LITECOIN", false) => 0x30,
                    _ => 0x00,
                };
                (version, key_hash)
            };
            let mut payload = vec![version];
            payload.extend_from_slice(&hash);
            bitcoin::base58::encode_check(&payload)
        }
    };
    Ok(address)
}

/// Public key at `path` below the phrase's seed; account-level paths get the
/// first receive address (`/0/0`) appended.
fn derive_public_key(phrase: &str, path: &str) -> Result<PublicKey, MockError> {
    let seed = parse_mnemonic(phrase)?.to_seed_normalized("");
    let mut path = DerivationPath::from_str(path)
        .map_err(|err| MockError::new(format!("invalid derivation path: {err}")))?;
    if path.len() == 3 {
        path = path.child(0.into()).child(0.into());
    }
    let secp = Secp256k1::new();
    let derived = Xpriv::new_master(NetworkKind::Main, &seed)
        .and_then(|master| master.derive_priv(&secp, &path))
        .map_err(|err| MockError::new(err.to_string()))?;
    Ok(PublicKey::from_secret_key(&secp, &derived.private_key))
}

/// Last 20 bytes of keccak256 over the uncompressed key, as TRON and
/// ETHEREUM use
fn keccak_address(public_key: &PublicKey) -> [u8; 20] {
    let digest: [u8; 32] =
        <sha3::Keccak256 as sha3::Digest>::digest(&public_key.serialize_uncompressed()[1..]).into();
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest[12..]);
    out
}

const CASHADDR_CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// P2PKH cashaddr without the prefix, the form the engine reports
fn cashaddr(prefix: &str, key_hash: &[u8; 20]) -> String {
    let mut payload = vec![0u8];
    payload.extend_from_slice(key_hash);
    let data = to_five_bits(&payload);

    let mut checked: Vec<u8> = prefix.bytes().map(|b| b & 0x1f).collect();
    checked.push(0);
    checked.extend_from_slice(&data);
    checked.extend_from_slice(&[0; 8]);
    let checksum = cashaddr_polymod(&checked);

    data.iter()
        .copied()
        .chain((0..8).map(|i| ((checksum >> (5 * (7 - i))) & 0x1f) as u8))
        .map(|v| CASHADDR_CHARSET[v as usize] as char)
        .collect()
}

fn to_five_bits(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() * 8 / 5 + 1);
    let mut acc: u32 = 0;
    let mut bits = 0;
    for byte in bytes {
        acc = (acc << 8) | u32::from(*byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(((acc >> bits) & 0x1f) as u8);
        }
    }
    if bits > 0 {
        out.push(((acc << (5 - bits)) & 0x1f) as u8);
    }
    out
}

fn cashaddr_polymod(values: &[u8]) -> u64 {
    const GENERATORS: [u64; 5] = [
        0x98f2bc8e61,
        0x79b76d99e2,
        0xf33e5fb3c4,
        0xae2eabe2a8,
        0x1e4f43e470,
    ];
    let mut c: u64 = 1;
    for value in values {
        let c0 = (c >> 35) as u8;
        c = ((c & 0x07ffffffff) << 5) ^ u64::from(*value);
        for (i, generator) in GENERATORS.iter().enumerate() {
            if c0 & (1 << i) != 0 {
                c ^= generator;
            }
        }
    }
    c ^ 1
}

pub fn extended_public_key(fingerprint: &str, chain_type: &str, address: &str) -> String {
    let digest = sha256(format!("xpub|{fingerprint}|{chain_type}|{address}").as_bytes());
    format!("xpub{}", bitcoin::base58::encode(&digest))
}

/// Stand-in signature over `payload` by the secret behind `fingerprint`
pub fn signature(fingerprint: &str, payload: &[u8]) -> [u8; 65] {
    let mut input = fingerprint.as_bytes().to_vec();
    input.extend_from_slice(payload);
    let r = sha256(&input);
    let s = sha256(&r);
    let mut out = [0u8; 65];
    out[..32].copy_from_slice(&r);
    out[32..64].copy_from_slice(&s);
    out[64] = 1;
    out
}

pub fn tx_hash(signed: &[u8]) -> String {
    let mut hash = sha256d(signed);
    hash.reverse();
    hex::encode(hash)
}
