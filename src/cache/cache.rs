use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::cache::instrument::InstrumentedMethod;
use crate::store::Store;
use crate::types::{CacheError, Value};

/// Cache over an external key-value store. `store`, `get_str` and `get_int`
/// are wrapped by a call counter and a history recorder; their telemetry
/// lives in the same store, under the method's qualified name.
pub struct Cache {
    store: Arc<dyn Store + Send + Sync>,
    store_method: InstrumentedMethod,
    get_str_method: InstrumentedMethod,
    get_int_method: InstrumentedMethod,
}

impl Cache {
    pub const STORE_METHOD: &'static str = "Cache::store";
    pub const GET_STR_METHOD: &'static str = "Cache::get_str";
    pub const GET_INT_METHOD: &'static str = "Cache::get_int";

    pub fn new(store: Arc<dyn Store + Send + Sync>) -> Self {
        Self {
            store_method: InstrumentedMethod::new(store.clone(), Self::STORE_METHOD),
            get_str_method: InstrumentedMethod::new(store.clone(), Self::GET_STR_METHOD),
            get_int_method: InstrumentedMethod::new(store.clone(), Self::GET_INT_METHOD),
            store,
        }
    }

    /// Stores the value under a fresh random key and returns the key.
    /// The value's byte encoding is written verbatim, no validation.
    pub async fn store(&self, value: Value) -> Result<String, CacheError> {
        self.store_method
            .enter(&format!("({},)", value.repr()))
            .await?;
        let key = Uuid::new_v4().to_string();
        let bytes = value.to_bytes();
        self.store.set(&key, &bytes).await?;
        debug!("Stored {} bytes at {}", bytes.len(), key);
        self.store_method.exit(&key).await?;
        Ok(key)
    }

    /// Raw bytes at `key`, `None` if absent. Not instrumented.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.store.get(key).await
    }

    /// Typed getter: applies `convert` to the raw bytes. An absent key
    /// returns `None` without invoking the conversion; a failing conversion
    /// propagates to the caller.
    pub async fn get_with<T, F>(&self, key: &str, convert: F) -> Result<Option<T>, CacheError>
    where
        F: FnOnce(Vec<u8>) -> Result<T, CacheError>,
    {
        match self.store.get(key).await? {
            Some(raw) => Ok(Some(convert(raw)?)),
            None => Ok(None),
        }
    }

    /// The stored bytes decoded as UTF-8.
    pub async fn get_str(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.get_str_method.enter(&format!("({:?},)", key)).await?;
        let result = self
            .get_with(key, |raw| {
                String::from_utf8(raw).map_err(|e| CacheError::Conversion {
                    message: e.to_string(),
                })
            })
            .await?;
        let output = match &result {
            Some(text) => Value::Str(text.clone()).to_string(),
            None => "nil".to_string(),
        };
        self.get_str_method.exit(&output).await?;
        Ok(result)
    }

    /// The stored bytes parsed as a decimal integer.
    pub async fn get_int(&self, key: &str) -> Result<Option<i64>, CacheError> {
        self.get_int_method.enter(&format!("({:?},)", key)).await?;
        let result = self
            .get_with(key, |raw| {
                let text = String::from_utf8(raw).map_err(|e| CacheError::Conversion {
                    message: e.to_string(),
                })?;
                text.trim()
                    .parse::<i64>()
                    .map_err(|_| CacheError::Conversion {
                        message: format!("not an integer: {:?}", text),
                    })
            })
            .await?;
        let output = match result {
            Some(value) => Value::Int(value).to_string(),
            None => "nil".to_string(),
        };
        self.get_int_method.exit(&output).await?;
        Ok(result)
    }

    /// Clears every key, telemetry included. Test isolation only.
    pub async fn flush(&self) -> Result<(), CacheError> {
        self.store.flushall().await
    }
}
