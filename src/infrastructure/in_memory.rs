use crate::domain::account::{UserAccount, UserId};
use crate::domain::ports::{AccountUpdate, ConfigStore, CreditLedger};
use crate::domain::rates::RateConfig;
use crate::error::Result;
use arc_swap::ArcSwap;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory rate configuration.
///
/// Readers get the current `Arc` without locking; a replacement swaps the
/// whole document, so a snapshot taken before an update keeps the old rates.
#[derive(Clone)]
pub struct InMemoryConfigStore {
    config: Arc<ArcSwap<RateConfig>>,
}

impl InMemoryConfigStore {
    pub fn new(config: RateConfig) -> Self {
        Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
        }
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn get_config(&self) -> Result<Arc<RateConfig>> {
        Ok(self.config.load_full())
    }

    async fn put_config(&self, config: RateConfig) -> Result<()> {
        self.config.store(Arc::new(config));
        Ok(())
    }
}

/// A thread-safe in-memory credit ledger.
///
/// Uses `Arc<RwLock<HashMap<UserId, UserAccount>>>`; deductions and updates
/// happen under the write lock so no read-modify-write can interleave.
#[derive(Default, Clone)]
pub struct InMemoryCreditLedger {
    accounts: Arc<RwLock<HashMap<UserId, UserAccount>>>,
}

impl InMemoryCreditLedger {
    /// Creates a new, empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CreditLedger for InMemoryCreditLedger {
    async fn account(&self, user: UserId) -> Result<Option<UserAccount>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&user).cloned())
    }

    async fn store(&self, account: UserAccount) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        accounts.insert(account.user, account);
        Ok(())
    }

    async fn try_deduct_credit(&self, user: UserId) -> Result<Option<u32>> {
        let mut accounts = self.accounts.write().await;
        Ok(accounts
            .get_mut(&user)
            .and_then(|account| account.deduct_credit().ok().map(|_| account.credits)))
    }

    async fn update(&self, user: UserId, apply: AccountUpdate) -> Result<UserAccount> {
        let mut accounts = self.accounts.write().await;
        let account = apply(accounts.get(&user).cloned())?;
        accounts.insert(user, account.clone());
        Ok(account)
    }
}
