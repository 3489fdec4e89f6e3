//! Awaitable wrapper that keeps blocking engine calls off the async runtime.

use std::sync::Arc;

use walletlink_ffi::{Engine, EngineConfig};

use crate::api::WalletApi;
use crate::error::Result;
use crate::lifecycle::{Account, Wallet};
use crate::params::{ChainSelection, ImportMnemonic};

pub struct AsyncWalletApi<E> {
    inner: Arc<WalletApi<E>>,
}

impl<E> Clone for AsyncWalletApi<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: Engine + 'static> AsyncWalletApi<E> {
    pub fn new(api: WalletApi<E>) -> Self {
        Self {
            inner: Arc::new(api),
        }
    }

    pub fn blocking(&self) -> &WalletApi<E> {
        &self.inner
    }

    /// Run `f` against the blocking API on the blocking thread pool
    pub async fn run<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&WalletApi<E>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || f(&inner)).await?
    }

    pub async fn bootstrap(&self, config: EngineConfig) -> Result<()> {
        self.run(move |api| api.bootstrap(&config)).await
    }

    pub async fn import_mnemonic(&self, request: ImportMnemonic) -> Result<Wallet> {
        self.run(move |api| api.import_mnemonic(&request)).await
    }

    /// Derive on a background thread; the updated handle is handed back
    pub async fn derive(
        &self,
        mut wallet: Wallet,
        password: String,
        selections: Vec<ChainSelection>,
    ) -> Result<(Wallet, Vec<Account>)> {
        self.run(move |api| {
            let accounts = api.derive(&mut wallet, &password, &selections)?;
            Ok((wallet, accounts))
        })
        .await
    }

    pub async fn export(&self, mut wallet: Wallet, password: String) -> Result<(Wallet, String)> {
        self.run(move |api| {
            let value = api.export(&mut wallet, &password)?;
            Ok((wallet, value))
        })
        .await
    }

    pub async fn delete(&self, mut wallet: Wallet, password: String) -> Result<Wallet> {
        self.run(move |api| {
            api.delete(&mut wallet, &password)?;
            Ok(wallet)
        })
        .await
    }
}
