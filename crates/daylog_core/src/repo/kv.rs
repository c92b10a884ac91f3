//! Durable key-value store contract.
//!
//! # Responsibility
//! - Describe the four operations core needs from persistence.
//! - Keep the storage medium behind a trait so tests can inject a fake.
//!
//! # Invariants
//! - `set` is atomic per key; readers never observe a half-written value.
//! - `list_keys` returns keys in ascending byte order.
//! - `delete_many` is one batched operation.

use crate::db::DbError;
use crate::model::daily::DailyStatsValidationError;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of the underlying durable store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("failed to encode record for `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("refusing to store `{key}`: {source}")]
    Invalid {
        key: String,
        #[source]
        source: DailyStatsValidationError,
    },
    #[error("store lock poisoned: {0}")]
    LockPoisoned(&'static str),
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Opaque durable key-value store.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;
    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()>;
    fn list_keys(&self, prefix: &str) -> StoreResult<Vec<String>>;
    /// Deletes every listed key, returning how many existed.
    fn delete_many(&self, keys: &[String]) -> StoreResult<usize>;
}

impl<S: KvStore + ?Sized> KvStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn list_keys(&self, prefix: &str) -> StoreResult<Vec<String>> {
        (**self).list_keys(prefix)
    }

    fn delete_many(&self, keys: &[String]) -> StoreResult<usize> {
        (**self).delete_many(keys)
    }
}
