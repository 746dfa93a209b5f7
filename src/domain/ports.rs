use super::account::{UserAccount, UserId};
use super::rates::RateConfig;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Source of the admin-owned rate configuration.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Returns an immutable snapshot; later updates never show through it.
    async fn get_config(&self) -> Result<Arc<RateConfig>>;
    /// Replaces the whole document.
    async fn put_config(&self, config: RateConfig) -> Result<()>;
}

/// Change applied to an account while the ledger holds it exclusively.
/// Receives the current account, if any, and returns the one to keep.
pub type AccountUpdate = Box<dyn FnOnce(Option<UserAccount>) -> Result<UserAccount> + Send>;

/// Per-user credit balances.
#[async_trait]
pub trait CreditLedger: Send + Sync {
    async fn account(&self, user: UserId) -> Result<Option<UserAccount>>;
    async fn store(&self, account: UserAccount) -> Result<()>;
    /// Atomically takes one credit and returns the balance left.
    /// `None` when the account is missing or empty.
    async fn try_deduct_credit(&self, user: UserId) -> Result<Option<u32>>;
    /// Atomically rewrites one account. An error from `apply` leaves the
    /// stored account untouched.
    async fn update(&self, user: UserId, apply: AccountUpdate) -> Result<UserAccount>;
}

pub type ConfigStoreBox = Box<dyn ConfigStore>;
pub type CreditLedgerBox = Box<dyn CreditLedger>;
