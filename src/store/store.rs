use once_cell::sync::Lazy;
use std::sync::Arc;
use std::sync::RwLock;

use crate::store::inmem::InMemStore;
use crate::store::redis::RedisStore;
use crate::store::traits::Store;

// process-wide default, in-memory until a backend is configured
static STORE: Lazy<RwLock<Arc<dyn Store + Send + Sync>>> =
    Lazy::new(|| RwLock::new(Arc::new(InMemStore::new())));

/// A handle to the currently configured store.
pub fn store() -> Arc<dyn Store + Send + Sync> {
    STORE.read().unwrap().clone()
}

/// Swaps the process-wide store for the named backend.
pub async fn set_store(backend: &str, url: &str) -> anyhow::Result<()> {
    let new_store: Arc<dyn Store + Send + Sync> = match backend {
        "inmem" => Arc::new(InMemStore::new()),
        "redis" => Arc::new(RedisStore::new(url)?),
        _ => return Err(anyhow::anyhow!("Invalid store backend: {}", backend)),
    };
    *STORE.write().unwrap() = new_store;
    Ok(())
}
