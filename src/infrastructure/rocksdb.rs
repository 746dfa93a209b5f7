use crate::domain::account::{UserAccount, UserId};
use crate::domain::ports::{AccountUpdate, ConfigStore, CreditLedger};
use crate::domain::rates::RateConfig;
use crate::error::{QuoteError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family holding the rate configuration document.
pub const CF_CONFIG: &str = "config";
/// Column Family holding user accounts.
pub const CF_ACCOUNTS: &str = "accounts";

const RATES_KEY: &[u8] = b"rates";

/// A persistent store implementation using RocksDB.
///
/// Serves as both `ConfigStore` and `CreditLedger`, each in its own Column
/// Family. Every account write goes through a mutex so the read-modify-write
/// of deductions and updates is atomic within the process.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    ledger_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("config" and "accounts") exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_config = ColumnFamilyDescriptor::new(CF_CONFIG, Options::default());
        let cf_accounts = ColumnFamilyDescriptor::new(CF_ACCOUNTS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_config, cf_accounts])?;

        Ok(Self {
            db: Arc::new(db),
            ledger_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            QuoteError::InternalError(Box::new(std::io::Error::other(format!(
                "{name} column family not found"
            ))))
        })
    }

    fn read<T: DeserializeOwned>(&self, cf: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf(cf)?;
        match self.db.get_cf(cf, key)? {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes).map_err(|e| {
                    QuoteError::InternalError(Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("Deserialization error: {}", e),
                    )))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn write<T: Serialize>(&self, cf: &str, key: &[u8], value: &T) -> Result<()> {
        let cf = self.cf(cf)?;
        let bytes = serde_json::to_vec(value)?;
        self.db.put_cf(cf, key, bytes)?;
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for RocksDBStore {
    async fn get_config(&self) -> Result<Arc<RateConfig>> {
        let config: RateConfig = self
            .read(CF_CONFIG, RATES_KEY)?
            .ok_or_else(|| QuoteError::missing_rate("rateConfig"))?;
        config.validate()?;
        Ok(Arc::new(config))
    }

    async fn put_config(&self, config: RateConfig) -> Result<()> {
        config.validate()?;
        self.write(CF_CONFIG, RATES_KEY, &config)
    }
}

#[async_trait]
impl CreditLedger for RocksDBStore {
    async fn account(&self, user: UserId) -> Result<Option<UserAccount>> {
        self.read(CF_ACCOUNTS, &user.0.to_be_bytes())
    }

    async fn store(&self, account: UserAccount) -> Result<()> {
        let _guard = self.ledger_lock.lock().await;
        self.write(CF_ACCOUNTS, &account.user.0.to_be_bytes(), &account)
    }

    async fn try_deduct_credit(&self, user: UserId) -> Result<Option<u32>> {
        let _guard = self.ledger_lock.lock().await;
        let key = user.0.to_be_bytes();

        let Some(mut account) = self.read::<UserAccount>(CF_ACCOUNTS, &key)? else {
            return Ok(None);
        };
        if account.deduct_credit().is_err() {
            return Ok(None);
        }
        self.write(CF_ACCOUNTS, &key, &account)?;
        Ok(Some(account.credits))
    }

    async fn update(&self, user: UserId, apply: AccountUpdate) -> Result<UserAccount> {
        let _guard = self.ledger_lock.lock().await;
        let key = user.0.to_be_bytes();

        let account = apply(self.read(CF_ACCOUNTS, &key)?)?;
        self.write(CF_ACCOUNTS, &key, &account)?;
        Ok(account)
    }
}
