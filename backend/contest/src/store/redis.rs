//! # Redis
//!
//! Production [`Store`]. Each primitive is a single Redis command, so atomicity
//! comes from Redis executing commands one at a time.
//!
//! | Primitive | Command |
//! |-----------|---------|
//! | `set_nx` | `SET key value NX [PX ms]` |
//! | `zadd_nx` | `ZADD key NX score member` |
//! | `zincr_by` | `ZINCRBY key delta member` |
//! | `hincr_by` | `HINCRBY key field delta` |
//!
//! ## Connection
//!
//! - One retry and a 100 ms connect timeout, so binaries fail fast when Redis is down
//! - [`ConnectionManager`] reconnects on its own after startup
use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use redis::{
    Client, RedisResult,
    aio::{ConnectionManager, ConnectionManagerConfig},
    cmd,
};

use super::Store;
use crate::error::Result;

/// Inclusive `ZREVRANGE` stop for the first `limit` members. Limits past
/// `i64::MAX` read the whole set instead of wrapping negative.
fn stop_index(limit: usize) -> i64 {
    i64::try_from(limit - 1).unwrap_or(-1)
}

#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }

    pub async fn connect(redis_url: &str) -> RedisResult<Self> {
        let config = ConnectionManagerConfig::new()
            .set_number_of_retries(1)
            .set_connection_timeout(Duration::from_millis(100));

        let client = Client::open(redis_url)?;
        let connection = client.get_connection_manager_with_config(config).await?;

        Ok(Self::new(connection))
    }

    fn connection(&self) -> ConnectionManager {
        self.connection.clone()
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(cmd("GET").arg(key).query_async(&mut self.connection()).await?)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        cmd("SET")
            .arg(key)
            .arg(value)
            .query_async::<()>(&mut self.connection())
            .await?;

        Ok(())
    }

    async fn set_nx(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<bool> {
        let mut command = cmd("SET");
        command.arg(key).arg(value).arg("NX");

        if let Some(ttl) = ttl {
            command.arg("PX").arg(ttl.as_millis().max(1) as u64);
        }

        let reply: Option<String> = command.query_async(&mut self.connection()).await?;

        Ok(reply.is_some())
    }

    async fn del(&self, key: &str) -> Result<()> {
        cmd("DEL")
            .arg(key)
            .query_async::<()>(&mut self.connection())
            .await?;

        Ok(())
    }

    async fn hset(&self, key: &str, fields: &[(&str, &str)]) -> Result<()> {
        if fields.is_empty() {
            return Ok(());
        }

        let mut command = cmd("HSET");
        command.arg(key);
        for (field, value) in fields {
            command.arg(*field).arg(*value);
        }

        command.query_async::<()>(&mut self.connection()).await?;

        Ok(())
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
        Ok(cmd("HGET")
            .arg(key)
            .arg(field)
            .query_async(&mut self.connection())
            .await?)
    }

    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>> {
        Ok(cmd("HGETALL")
            .arg(key)
            .query_async(&mut self.connection())
            .await?)
    }

    async fn hdel(&self, key: &str, field: &str) -> Result<()> {
        cmd("HDEL")
            .arg(key)
            .arg(field)
            .query_async::<()>(&mut self.connection())
            .await?;

        Ok(())
    }

    async fn hincr_by(&self, key: &str, field: &str, delta: i64) -> Result<i64> {
        Ok(cmd("HINCRBY")
            .arg(key)
            .arg(field)
            .arg(delta)
            .query_async(&mut self.connection())
            .await?)
    }

    async fn zadd(&self, key: &str, member: &str, score: f64) -> Result<()> {
        cmd("ZADD")
            .arg(key)
            .arg(score)
            .arg(member)
            .query_async::<()>(&mut self.connection())
            .await?;

        Ok(())
    }

    async fn zadd_nx(&self, key: &str, member: &str, score: f64) -> Result<bool> {
        let added: i64 = cmd("ZADD")
            .arg(key)
            .arg("NX")
            .arg(score)
            .arg(member)
            .query_async(&mut self.connection())
            .await?;

        Ok(added == 1)
    }

    async fn zincr_by(&self, key: &str, member: &str, delta: f64) -> Result<f64> {
        Ok(cmd("ZINCRBY")
            .arg(key)
            .arg(delta)
            .arg(member)
            .query_async(&mut self.connection())
            .await?)
    }

    async fn zscore(&self, key: &str, member: &str) -> Result<Option<f64>> {
        Ok(cmd("ZSCORE")
            .arg(key)
            .arg(member)
            .query_async(&mut self.connection())
            .await?)
    }

    async fn zcard(&self, key: &str) -> Result<u64> {
        Ok(cmd("ZCARD")
            .arg(key)
            .query_async(&mut self.connection())
            .await?)
    }

    async fn zrange_desc(&self, key: &str, limit: Option<usize>) -> Result<Vec<(String, f64)>> {
        let stop = match limit {
            Some(0) => return Ok(Vec::new()),
            Some(limit) => stop_index(limit),
            None => -1,
        };

        Ok(cmd("ZREVRANGE")
            .arg(key)
            .arg(0)
            .arg(stop)
            .arg("WITHSCORES")
            .query_async(&mut self.connection())
            .await?)
    }

    async fn zrem(&self, key: &str, member: &str) -> Result<()> {
        cmd("ZREM")
            .arg(key)
            .arg(member)
            .query_async::<()>(&mut self.connection())
            .await?;

        Ok(())
    }
}
