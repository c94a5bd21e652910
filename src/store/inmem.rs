// (C) Coralbits SL 2025
// This file is part of Cachetrace and is licensed under the
// GNU Affero General Public License v3.0.
// A commercial license on request is also available;
// contact info@coralbits.com for details.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::store::traits::Store;
use crate::types::CacheError;

/// In-process stand-in for the external store. The single write lock makes
/// `incr` and `rpush` atomic, so the whole `Store` contract holds without
/// a server running.
pub struct InMemStore {
    data: RwLock<InMemData>,
}

#[derive(Default)]
struct InMemData {
    values: HashMap<String, Vec<u8>>,
    lists: HashMap<String, Vec<Vec<u8>>>,
}

impl InMemStore {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(InMemData::default()),
        }
    }
}

impl Default for InMemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for InMemStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.data.read().await.values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        self.data
            .write()
            .await
            .values
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64, CacheError> {
        let mut data = self.data.write().await;
        let current = match data.values.get(key) {
            Some(raw) => std::str::from_utf8(raw)
                .ok()
                .and_then(|text| text.parse::<i64>().ok())
                .ok_or_else(|| CacheError::Conversion {
                    message: format!("value at {} is not an integer", key),
                })?,
            None => 0,
        };
        let next = current + 1;
        data.values
            .insert(key.to_string(), next.to_string().into_bytes());
        Ok(next)
    }

    async fn rpush(&self, key: &str, value: &[u8]) -> Result<usize, CacheError> {
        let mut data = self.data.write().await;
        let list = data.lists.entry(key.to_string()).or_default();
        list.push(value.to_vec());
        Ok(list.len())
    }

    async fn lrange(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<Vec<u8>>, CacheError> {
        let data = self.data.read().await;
        let list = match data.lists.get(key) {
            Some(list) => list,
            None => return Ok(Vec::new()),
        };
        let len = list.len() as isize;
        let mut start = if start < 0 { len + start } else { start };
        let mut stop = if stop < 0 { len + stop } else { stop };
        if start < 0 {
            start = 0;
        }
        if stop >= len {
            stop = len - 1;
        }
        if len == 0 || start > stop {
            return Ok(Vec::new());
        }
        Ok(list[start as usize..=stop as usize].to_vec())
    }

    async fn flushall(&self) -> Result<(), CacheError> {
        let mut data = self.data.write().await;
        data.values.clear();
        data.lists.clear();
        Ok(())
    }
}
