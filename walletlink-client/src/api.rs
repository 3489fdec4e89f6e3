//! Wallet lifecycle orchestration over any [`Engine`].

use walletlink_common::{Component, Logger};
use walletlink_ffi::{Engine, EngineConfig, ErrorKind};
use walletlink_proto::codec::{decode_result_text, encode_request_text};
use walletlink_proto::messages::*;
use walletlink_proto::{spec, MethodSpec};

use crate::error::{ClientError, Result};
use crate::lifecycle::{Account, Operation, Wallet, WalletSource, WalletState};
use crate::params::{ChainSelection, ImportMnemonic, ImportPrivateKey};
use crate::paths::ChainType;
use crate::scanner::KeystoreScanner;

pub struct WalletApi<E> {
    engine: E,
    scanner: KeystoreScanner,
    logger: Logger,
}

impl<E: Engine> WalletApi<E> {
    pub fn new(engine: E, logger: &Logger) -> Self {
        let logger = logger.with_component(Component::Wallet);
        Self {
            engine,
            scanner: KeystoreScanner::new(&logger),
            logger,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Initialise the engine and load the keystores in its directory.
    /// Must run before any call that references an existing wallet id.
    pub fn bootstrap(&self, config: &EngineConfig) -> Result<()> {
        self.scanner.bootstrap(&self.engine, config)
    }

    pub fn rescan(&self) -> Result<()> {
        if self.scanner.rescan(&self.engine)? {
            Ok(())
        } else {
            Err(ClientError::NotBootstrapped)
        }
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.scanner.is_bootstrapped()
    }

    /// Encode, call and decode one method
    pub fn invoke<M: MethodSpec>(&self, param: &M::Param) -> Result<M::Output> {
        let logger = self.logger.with_method(M::METHOD.name());
        let request = encode_request_text::<M>(param)?;
        let result = self.engine.call(&request).map_err(|err| {
            logger.warn_args(format_args!("call failed: {err}"));
            err
        })?;
        logger.debug_args(format_args!("call returned {} hex chars", result.len()));
        Ok(decode_result_text::<M>(&result)?)
    }

    pub fn create(&self, password: &str, name: &str, password_hint: &str) -> Result<Wallet> {
        let result = self.invoke::<spec::HdStoreCreate>(&HdStoreCreateParam {
            password: password.to_string(),
            password_hint: password_hint.to_string(),
            name: name.to_string(),
        })?;
        Ok(Wallet::from_result(&result, WalletState::Created, None, None))
    }

    pub fn import_mnemonic(&self, request: &ImportMnemonic) -> Result<Wallet> {
        let result = self.invoke::<spec::HdStoreImport>(&request.to_param()?)?;
        Ok(Wallet::from_result(
            &result,
            WalletState::Imported,
            Some(request.selection.chain_type),
            Some(request.selection.network),
        ))
    }

    pub fn import_private_key(&self, request: &ImportPrivateKey) -> Result<Wallet> {
        let result = self.invoke::<spec::PrivateKeyStoreImport>(&request.to_param())?;
        Ok(Wallet::from_result(
            &result,
            WalletState::Imported,
            Some(request.selection.chain_type),
            Some(request.selection.network),
        ))
    }

    /// Handle for a wallet already known to the engine, found by a scan
    pub fn open_existing(&self, id: &str) -> Result<Wallet> {
        if !self.scanner.is_bootstrapped() {
            return Err(ClientError::NotBootstrapped);
        }
        let accounts = self.invoke::<spec::KeystoreCommonAccounts>(&KeystoreCommonAccountsParam {
            id: id.to_string(),
        })?;
        Ok(Wallet::from_existing(id, &accounts.accounts))
    }

    /// Derive accounts and append them to the wallet
    pub fn derive(
        &self,
        wallet: &mut Wallet,
        password: &str,
        selections: &[ChainSelection],
    ) -> Result<Vec<Account>> {
        wallet.check(Operation::Derive)?;
        let derivations = selections
            .iter()
            .map(ChainSelection::to_derivation)
            .collect::<Result<Vec<_>>>()?;
        let result = self.invoke::<spec::HdStoreDerive>(&HdStoreDeriveParam {
            id: wallet.id().to_string(),
            password: password.to_string(),
            derivations,
        })?;
        wallet.append_accounts(&result.accounts);
        wallet.advance(Operation::Derive);
        Ok(result.accounts.iter().map(Account::from).collect())
    }

    /// Sign a chain transaction with the account at `address`
    pub fn sign_tx<I: SignInput>(
        &self,
        wallet: &mut Wallet,
        password: &str,
        chain_type: ChainType,
        address: &str,
        input: &I,
    ) -> Result<I::Output> {
        wallet.check(Operation::Sign)?;
        let param = SignParam::with_input(wallet.id(), password, chain_type.as_str(), address, input)?;
        let output = self.invoke::<spec::SignTx<I>>(&param)?;
        wallet.advance(Operation::Sign);
        Ok(output)
    }

    pub fn sign_tron_message(
        &self,
        wallet: &mut Wallet,
        password: &str,
        address: &str,
        input: &TronMessageInput,
    ) -> Result<TronMessageOutput> {
        wallet.check(Operation::Sign)?;
        let param = SignParam::with_input(
            wallet.id(),
            password,
            ChainType::Tron.as_str(),
            address,
            input,
        )?;
        let output = self.invoke::<spec::TronSignMsg>(&param)?;
        wallet.advance(Operation::Sign);
        Ok(output)
    }

    /// Return the wallet's source material: the mnemonic, or the private
    /// key in the encoding it was imported with.
    ///
    /// A wallet reopened from its keystore file has no recorded source; the
    /// mnemonic export is tried first and a non-authorization refusal falls
    /// back to the private-key export. The source that answered is recorded
    /// on the handle.
    pub fn export(&self, wallet: &mut Wallet, password: &str) -> Result<String> {
        wallet.check(Operation::Export)?;
        let result = match wallet.source() {
            WalletSource::PrivateKey => self.export_private_key(wallet, password)?,
            WalletSource::Mnemonic => {
                self.invoke::<spec::HdStoreExport>(&self.key_param(wallet, password))?
            }
            WalletSource::Keystore => {
                match self.invoke::<spec::HdStoreExport>(&self.key_param(wallet, password)) {
                    Ok(result) => {
                        wallet.set_source(WalletSource::Mnemonic);
                        result
                    }
                    Err(err) if err.kind() == ErrorKind::Other => {
                        self.logger.debug_args(format_args!(
                            "wallet {} is not mnemonic-backed ({err}); exporting its private key",
                            wallet.id()
                        ));
                        let result = self.export_private_key(wallet, password)?;
                        wallet.set_source(WalletSource::PrivateKey);
                        result
                    }
                    Err(err) => return Err(err),
                }
            }
        };
        wallet.advance(Operation::Export);
        Ok(result.value)
    }

    fn export_private_key(
        &self,
        wallet: &Wallet,
        password: &str,
    ) -> Result<KeystoreCommonExportResult> {
        self.invoke::<spec::PrivateKeyStoreExport>(&PrivateKeyStoreExportParam {
            id: wallet.id().to_string(),
            password: password.to_string(),
            chain_type: wallet
                .chain_type()
                .map(|chain| chain.as_str().to_string())
                .unwrap_or_default(),
            network: wallet
                .network()
                .map(|network| network.as_str().to_string())
                .unwrap_or_default(),
        })
    }

    /// Check the password; a mismatch is `password_incorrect`
    pub fn verify_password(&self, wallet: &Wallet, password: &str) -> Result<()> {
        wallet.check(Operation::Verify)?;
        self.invoke::<spec::KeystoreCommonVerify>(&self.key_param(wallet, password))?;
        Ok(())
    }

    /// Delete the wallet; the handle is unusable afterwards
    pub fn delete(&self, wallet: &mut Wallet, password: &str) -> Result<()> {
        wallet.check(Operation::Delete)?;
        self.invoke::<spec::KeystoreCommonDelete>(&self.key_param(wallet, password))?;
        wallet.advance(Operation::Delete);
        self.logger
            .info_args(format_args!("wallet {} deleted", wallet.id()));
        Ok(())
    }

    pub fn extended_public_key(
        &self,
        wallet: &Wallet,
        password: &str,
        chain_type: ChainType,
        address: &str,
    ) -> Result<String> {
        wallet.check(Operation::Verify)?;
        let result = self.invoke::<spec::HdStoreExtendedPublicKey>(&HdStoreExtendedPublicKeyParam {
            id: wallet.id().to_string(),
            password: password.to_string(),
            chain_type: chain_type.as_str().to_string(),
            address: address.to_string(),
        })?;
        Ok(result.extended_public_key)
    }

    /// Id of the wallet holding this mnemonic or private key, if any
    pub fn find_existing(&self, key_type: KeyType, value: &str) -> Result<Option<String>> {
        let result = self.invoke::<spec::KeystoreCommonExists>(&KeystoreCommonExistsParam {
            r#type: key_type as i32,
            value: value.to_string(),
        })?;
        Ok(result.is_exists.then_some(result.id))
    }

    fn key_param(&self, wallet: &Wallet, password: &str) -> WalletKeyParam {
        WalletKeyParam {
            id: wallet.id().to_string(),
            password: password.to_string(),
        }
    }
}
