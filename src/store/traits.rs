use async_trait::async_trait;

use crate::types::CacheError;

/// Pass-through contract to the external key-value store. Atomicity of
/// `incr` and `rpush` under concurrent callers is the store's guarantee,
/// not ours; unreachability surfaces as `CacheError::Connection` and is
/// never retried here.
#[async_trait]
pub trait Store: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError>;
    /// Increments the integer at `key`, initializing to 0 if absent.
    /// Returns the new value.
    async fn incr(&self, key: &str) -> Result<i64, CacheError>;
    /// Appends to the list at `key`. Returns the new length.
    async fn rpush(&self, key: &str, value: &[u8]) -> Result<usize, CacheError>;
    /// List slice with the store's index semantics: negative indexes count
    /// from the end, `-1` being the last element.
    async fn lrange(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<Vec<u8>>, CacheError>;
    /// Clears every key. Test isolation only.
    async fn flushall(&self) -> Result<(), CacheError>;
}
