// (C) Coralbits SL 2025
// This file is part of Cachetrace and is licensed under the
// GNU Affero General Public License v3.0.
// A commercial license on request is also available;
// contact info@coralbits.com for details.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::{debug, error};

use crate::store::traits::Store;
use crate::types::CacheError;

pub struct RedisStore {
    client: redis::Client,
}

impl RedisStore {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        debug!("Creating redis store with url: {}", url);
        let client = redis::Client::open(url)?;
        Ok(Self { client })
    }

    async fn connection(&self) -> Result<MultiplexedConnection, CacheError> {
        match self.client.get_multiplexed_async_connection().await {
            Ok(connection) => Ok(connection),
            Err(e) => {
                error!("Failed to get redis connection: {}", e);
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut connection = self.connection().await?;
        let value: Option<Vec<u8>> = connection.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        let mut connection = self.connection().await?;
        connection.set::<&str, &[u8], ()>(key, value).await?;
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64, CacheError> {
        let mut connection = self.connection().await?;
        let value: i64 = connection.incr(key, 1).await?;
        Ok(value)
    }

    async fn rpush(&self, key: &str, value: &[u8]) -> Result<usize, CacheError> {
        let mut connection = self.connection().await?;
        let length: usize = connection.rpush(key, value).await?;
        Ok(length)
    }

    async fn lrange(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<Vec<u8>>, CacheError> {
        let mut connection = self.connection().await?;
        let items: Vec<Vec<u8>> = connection.lrange(key, start, stop).await?;
        Ok(items)
    }

    async fn flushall(&self) -> Result<(), CacheError> {
        let mut connection = self.connection().await?;
        redis::cmd("FLUSHDB")
            .query_async::<()>(&mut connection)
            .await?;
        Ok(())
    }
}
