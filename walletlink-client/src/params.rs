//! Request builders that turn chain selections into engine parameters.

use walletlink_proto::messages::{Derivation, HdStoreImportParam, PrivateKeyStoreImportParam};

use crate::error::Result;
use crate::paths::{derivation_path, wire_network_fields, ChainType, Network, SegWit};

/// Chain, network and witness format for one account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainSelection {
    pub chain_type: ChainType,
    pub network: Network,
    pub seg_wit: Option<SegWit>,
}

impl ChainSelection {
    pub fn new(chain_type: ChainType, network: Network) -> Self {
        Self {
            chain_type,
            network,
            seg_wit: None,
        }
    }

    pub fn with_seg_wit(mut self, seg_wit: SegWit) -> Self {
        self.seg_wit = Some(seg_wit);
        self
    }

    pub fn path(&self) -> Result<&'static str> {
        derivation_path(self.chain_type, self.network, self.seg_wit)
    }

    fn wire_fields(&self) -> (String, String) {
        wire_network_fields(self.chain_type, self.network, self.seg_wit)
    }

    pub fn to_derivation(&self) -> Result<Derivation> {
        let (network, seg_wit) = self.wire_fields();
        Ok(Derivation {
            chain_type: self.chain_type.as_str().to_string(),
            path: self.path()?.to_string(),
            network,
            seg_wit,
            chain_id: String::new(),
        })
    }
}

/// Import of a mnemonic phrase for one chain
#[derive(Debug, Clone)]
pub struct ImportMnemonic {
    pub mnemonic: String,
    pub password: String,
    pub selection: ChainSelection,
    pub name: String,
    pub password_hint: String,
    pub overwrite: bool,
}

impl ImportMnemonic {
    pub fn new(
        mnemonic: impl Into<String>,
        password: impl Into<String>,
        selection: ChainSelection,
    ) -> Self {
        Self {
            mnemonic: mnemonic.into(),
            password: password.into(),
            selection,
            name: String::new(),
            password_hint: String::new(),
            overwrite: false,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn password_hint(mut self, hint: impl Into<String>) -> Self {
        self.password_hint = hint.into();
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn to_param(&self) -> Result<HdStoreImportParam> {
        let path = self.selection.path()?;
        let (network, seg_wit) = self.selection.wire_fields();
        Ok(HdStoreImportParam {
            chain_type: self.selection.chain_type.as_str().to_string(),
            mnemonic: self.mnemonic.clone(),
            password: self.password.clone(),
            path: path.to_string(),
            source: "MNEMONIC".to_string(),
            name: self.name.clone(),
            network,
            seg_wit,
            password_hint: self.password_hint.clone(),
            overwrite: self.overwrite,
        })
    }
}

/// Import of a single private key
#[derive(Debug, Clone)]
pub struct ImportPrivateKey {
    pub private_key: String,
    pub password: String,
    pub selection: ChainSelection,
    pub overwrite: bool,
}

impl ImportPrivateKey {
    pub fn new(
        private_key: impl Into<String>,
        password: impl Into<String>,
        selection: ChainSelection,
    ) -> Self {
        Self {
            private_key: private_key.into(),
            password: password.into(),
            selection,
            overwrite: false,
        }
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn to_param(&self) -> PrivateKeyStoreImportParam {
        let (network, seg_wit) = self.selection.wire_fields();
        PrivateKeyStoreImportParam {
            private_key: self.private_key.clone(),
            password: self.password.clone(),
            chain_type: self.selection.chain_type.as_str().to_string(),
            network,
            seg_wit,
            overwrite: self.overwrite,
        }
    }
}
