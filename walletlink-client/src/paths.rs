//! Derivation path selection.
//!
//! A pure lookup over (chain, network, witness format). Chains with a single
//! path ignore network and witness; the UTXO chains that support segregated
//! witness require an explicit witness type.

use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            /// Engine spelling
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ClientError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)*
                    _ => Err(ClientError::UnsupportedChain),
                }
            }
        }
    };
}

wire_enum!(
    /// Chains the engine can hold accounts for
    ChainType {
        Bitcoin => "BITCOIN",
        Litecoin => "LITECOIN",
        BitcoinCash => "BITCOINCASH",
        Ethereum => "ETHEREUM",
        Eos => "EOS",
        Cosmos => "COSMOS",
        Tron => "TRON",
        Nervos => "NERVOS",
        Kusama => "KUSAMA",
        Polkadot => "POLKADOT",
    }
);

wire_enum!(
    Network {
        Mainnet => "MAINNET",
        Testnet => "TESTNET",
    }
);

wire_enum!(
    /// Address format for UTXO chains
    SegWit {
        None => "NONE",
        P2wpkh => "P2WPKH",
    }
);

/// Derivation path for a chain, network and witness format.
///
/// Every combination outside the table is `unsupported_chain`, whichever
/// field is at fault.
pub fn derivation_path(
    chain: ChainType,
    network: Network,
    seg_wit: Option<SegWit>,
) -> Result<&'static str, ClientError> {
    use ChainType::*;
    use Network::*;

    let path = match (chain, network, seg_wit) {
        (Bitcoin, Mainnet, Some(SegWit::None)) => "m/44'/0'/0'",
        (Bitcoin, Testnet, Some(SegWit::None)) => "m/44'/1'/0'",
        (Bitcoin, Mainnet, Some(SegWit::P2wpkh)) => "m/49'/0'/0'",
        (Bitcoin, Testnet, Some(SegWit::P2wpkh)) => "m/49'/1'/0'",
        (Litecoin, Mainnet, Some(SegWit::None)) => "m/44'/2'/0'/0/0",
        (Litecoin, Testnet, Some(SegWit::None)) => "m/44'/1'/0'/0/0",
        (Litecoin, Mainnet, Some(SegWit::P2wpkh)) => "m/49'/2'/0'/0/0",
        (Litecoin, Testnet, Some(SegWit::P2wpkh)) => "m/49'/1'/0'/0/0",
        (BitcoinCash, Mainnet, None | Some(SegWit::None)) => "m/44'/145'/0'/0/0",
        (BitcoinCash, Testnet, None | Some(SegWit::None)) => "m/44'/1'/0'/0/0",
        (Ethereum, _, None) => "m/44'/60'/0'/0/0",
        (Eos, _, None) => "m/44'/194'/0'/0/0",
        (Cosmos, _, None) => "m/44'/118'/0'/0/0",
        (Tron, _, None) => "m/44'/195'/0'/0/0",
        (Nervos, _, None) => "m/44'/309'/0'/0/0",
        (Kusama, _, None) => "//kusama//imToken/0",
        (Polkadot, _, None) => "//polkadot//imToken/0",
        _ => return Err(ClientError::UnsupportedChain),
    };
    Ok(path)
}

/// Network and witness fields as the engine expects them for a chain.
///
/// TRON takes neither; NERVOS takes only a network; the UTXO chains take
/// both.
pub fn wire_network_fields(
    chain: ChainType,
    network: Network,
    seg_wit: Option<SegWit>,
) -> (String, String) {
    let seg_wit = seg_wit.map(|s| s.as_str()).unwrap_or("NONE");
    match chain {
        ChainType::Tron => (String::new(), String::new()),
        ChainType::Nervos => (network.as_str().to_string(), String::new()),
        _ => (network.as_str().to_string(), seg_wit.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utxo_chains_follow_network_and_witness() {
        assert_eq!(
            derivation_path(ChainType::Bitcoin, Network::Testnet, Some(SegWit::P2wpkh)).unwrap(),
            "m/49'/1'/0'"
        );
        assert_eq!(
            derivation_path(ChainType::Litecoin, Network::Mainnet, Some(SegWit::None)).unwrap(),
            "m/44'/2'/0'/0/0"
        );
        assert_eq!(
            derivation_path(ChainType::Litecoin, Network::Mainnet, Some(SegWit::P2wpkh)).unwrap(),
            "m/49'/2'/0'/0/0"
        );
        assert_eq!(
            derivation_path(ChainType::BitcoinCash, Network::Testnet, None).unwrap(),
            "m/44'/1'/0'/0/0"
        );
    }

    #[test]
    fn single_path_chains_ignore_network() {
        for network in Network::ALL {
            assert_eq!(
                derivation_path(ChainType::Tron, *network, None).unwrap(),
                "m/44'/195'/0'/0/0"
            );
            assert_eq!(
                derivation_path(ChainType::Polkadot, *network, None).unwrap(),
                "//polkadot//imToken/0"
            );
        }
    }

    #[test]
    fn invalid_combinations_are_uniformly_unsupported() {
        let cases = [
            (ChainType::Bitcoin, Network::Mainnet, None),
            (ChainType::Litecoin, Network::Testnet, None),
            (ChainType::BitcoinCash, Network::Mainnet, Some(SegWit::P2wpkh)),
            (ChainType::Tron, Network::Mainnet, Some(SegWit::None)),
        ];
        for (chain, network, seg_wit) in cases {
            let err = derivation_path(chain, network, seg_wit).unwrap_err();
            assert_eq!(err.to_string(), "unsupported_chain");
        }
        assert_eq!("DOGECOIN".parse::<ChainType>().unwrap_err().to_string(), "unsupported_chain");
    }

    #[test]
    fn every_chain_has_a_path_somewhere() {
        for chain in ChainType::ALL {
            let found = Network::ALL.iter().any(|network| {
                [None, Some(SegWit::None), Some(SegWit::P2wpkh)]
                    .into_iter()
                    .any(|seg_wit| derivation_path(*chain, *network, seg_wit).is_ok())
            });
            assert!(found, "{chain}");
        }
    }

    #[test]
    fn wire_fields_per_chain() {
        assert_eq!(
            wire_network_fields(ChainType::Tron, Network::Mainnet, None),
            (String::new(), String::new())
        );
        assert_eq!(
            wire_network_fields(ChainType::Nervos, Network::Testnet, None),
            ("TESTNET".to_string(), String::new())
        );
        assert_eq!(
            wire_network_fields(ChainType::BitcoinCash, Network::Mainnet, None),
            ("MAINNET".to_string(), "NONE".to_string())
        );
    }
}
