//! Client-side view of one wallet handle.
//!
//! The engine owns all wallet data. A [`Wallet`] keeps only the id the
//! engine assigned, the accounts it reported, and where the handle is in its
//! lifecycle, so calls are only issued in an order the engine accepts.

use walletlink_proto::messages::{AccountResponse, WalletResult};

use crate::error::{ClientError, Result};
use crate::paths::{ChainType, Network};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletState {
    Created,
    Imported,
    /// At least one account derived
    Derived,
    Signed,
    Exported,
    /// Terminal
    Deleted,
}

/// Operations gated by the lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Derive,
    Sign,
    Export,
    Verify,
    Delete,
}

impl Operation {
    fn name(&self) -> &'static str {
        match self {
            Operation::Derive => "derive",
            Operation::Sign => "sign",
            Operation::Export => "export",
            Operation::Verify => "verify",
            Operation::Delete => "delete",
        }
    }
}

impl WalletState {
    /// Whether `operation` may be issued from this state
    pub fn allows(&self, operation: Operation) -> bool {
        use WalletState::*;
        match (self, operation) {
            (Deleted, _) => false,
            (Created | Imported, Operation::Sign) => false,
            _ => true,
        }
    }

    /// State after `operation` succeeds
    pub fn after(self, operation: Operation) -> WalletState {
        use WalletState::*;
        match operation {
            Operation::Derive => Derived,
            Operation::Sign => Signed,
            Operation::Export => match self {
                // Export does not hide that accounts exist
                Created | Imported => self,
                _ => Exported,
            },
            Operation::Verify => self,
            Operation::Delete => Deleted,
        }
    }
}

/// Where a wallet's secret came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletSource {
    Mnemonic,
    PrivateKey,
    /// Loaded from an existing keystore file
    Keystore,
}

impl WalletSource {
    pub fn from_engine(source: &str) -> Self {
        match source {
            "MNEMONIC" => WalletSource::Mnemonic,
            "PRIVATE" => WalletSource::PrivateKey,
            _ => WalletSource::Keystore,
        }
    }
}

/// A derived account: chain, path and address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub chain_type: String,
    pub path: String,
    pub address: String,
}

impl From<&AccountResponse> for Account {
    fn from(account: &AccountResponse) -> Self {
        Self {
            chain_type: account.chain_type.clone(),
            path: account.path.clone(),
            address: account.address.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Wallet {
    id: String,
    name: String,
    source: WalletSource,
    chain_type: Option<ChainType>,
    network: Option<Network>,
    accounts: Vec<Account>,
    state: WalletState,
}

impl Wallet {
    /// Handle for a wallet the engine just created or imported
    pub(crate) fn from_result(
        result: &WalletResult,
        state: WalletState,
        chain_type: Option<ChainType>,
        network: Option<Network>,
    ) -> Self {
        let mut wallet = Self {
            id: result.id.clone(),
            name: result.name.clone(),
            source: WalletSource::from_engine(&result.source),
            chain_type,
            network,
            accounts: Vec::new(),
            state,
        };
        wallet.append_accounts(&result.accounts);
        wallet
    }

    /// Handle for a wallet loaded by the scanner; the chain comes from its
    /// first account
    pub(crate) fn from_existing(id: &str, accounts: &[AccountResponse]) -> Self {
        let mut wallet = Self {
            id: id.to_string(),
            name: String::new(),
            source: WalletSource::Keystore,
            chain_type: accounts
                .first()
                .and_then(|account| account.chain_type.parse().ok()),
            network: None,
            accounts: Vec::new(),
            state: WalletState::Imported,
        };
        wallet.append_accounts(accounts);
        wallet
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> WalletSource {
        self.source
    }

    pub fn chain_type(&self) -> Option<ChainType> {
        self.chain_type
    }

    pub fn network(&self) -> Option<Network> {
        self.network
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn state(&self) -> WalletState {
        self.state
    }

    pub fn is_deleted(&self) -> bool {
        self.state == WalletState::Deleted
    }

    pub fn account_for(&self, chain_type: ChainType) -> Option<&Account> {
        self.accounts
            .iter()
            .find(|account| account.chain_type == chain_type.as_str())
    }

    /// Accounts are appended, never replaced; the same address is kept once.
    /// Any account moves a fresh handle to `Derived`.
    pub(crate) fn append_accounts(&mut self, accounts: &[AccountResponse]) {
        for account in accounts {
            if !self.accounts.iter().any(|known| known.address == account.address) {
                self.accounts.push(account.into());
            }
        }
        if !self.accounts.is_empty()
            && matches!(self.state, WalletState::Created | WalletState::Imported)
        {
            self.state = WalletState::Derived;
        }
    }

    /// Refuse operations the current state does not allow
    pub(crate) fn check(&self, operation: Operation) -> Result<()> {
        if self.state == WalletState::Deleted {
            return Err(ClientError::WalletDeleted);
        }
        if !self.state.allows(operation) {
            return Err(ClientError::InvalidState {
                operation: operation.name(),
                state: self.state,
            });
        }
        Ok(())
    }

    pub(crate) fn set_source(&mut self, source: WalletSource) {
        self.source = source;
    }

    pub(crate) fn advance(&mut self, operation: Operation) {
        self.state = self.state.after(operation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(address: &str) -> AccountResponse {
        AccountResponse {
            chain_type: "TRON".into(),
            address: address.into(),
            path: "m/44'/195'/0'/0/0".into(),
            extended_xpub_key: String::new(),
        }
    }

    fn created() -> Wallet {
        Wallet::from_result(
            &WalletResult {
                id: "id-1".into(),
                name: "w".into(),
                source: "MNEMONIC".into(),
                accounts: vec![],
                created_at: 0,
            },
            WalletState::Created,
            None,
            None,
        )
    }

    #[test]
    fn sign_requires_a_derived_account() {
        let mut wallet = created();
        assert!(matches!(
            wallet.check(Operation::Sign),
            Err(ClientError::InvalidState { operation: "sign", .. })
        ));
        wallet.append_accounts(&[account("T1")]);
        assert_eq!(wallet.state(), WalletState::Derived);
        assert!(wallet.check(Operation::Sign).is_ok());
    }

    #[test]
    fn signing_is_repeatable() {
        let mut wallet = created();
        wallet.append_accounts(&[account("T1")]);
        for _ in 0..3 {
            wallet.check(Operation::Sign).unwrap();
            wallet.advance(Operation::Sign);
        }
        assert_eq!(wallet.state(), WalletState::Signed);
        wallet.check(Operation::Export).unwrap();
        wallet.advance(Operation::Export);
        assert_eq!(wallet.state(), WalletState::Exported);
        assert!(wallet.check(Operation::Sign).is_ok());
    }

    #[test]
    fn delete_is_terminal() {
        let mut wallet = created();
        wallet.advance(Operation::Delete);
        for operation in [
            Operation::Derive,
            Operation::Sign,
            Operation::Export,
            Operation::Verify,
            Operation::Delete,
        ] {
            let err = wallet.check(operation).unwrap_err();
            assert_eq!(err.to_string(), "wallet_not_found");
        }
    }

    #[test]
    fn accounts_are_deduplicated_by_address() {
        let mut wallet = created();
        wallet.append_accounts(&[account("T1"), account("T1"), account("T2")]);
        assert_eq!(wallet.accounts().len(), 2);
    }
}
