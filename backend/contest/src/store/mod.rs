//! # Store
//!
//! Narrow atomic-operation interface over the durable key-value and sorted-set
//! store. All cross-request coordination goes through these primitives; the
//! contest keeps no in-process shared state of its own.
//!
//! ## Atomic primitives
//!
//! - [`Store::set_nx`]: set-if-absent with optional expiry. Finalization gate and vote cooldown.
//! - [`Store::zadd_nx`]: add sorted-set member only if absent. Duplicate vote prevention.
//! - [`Store::zincr_by`] / [`Store::hincr_by`]: server-side increments. Tallies, lifetime score, wins.
//!
//! Callers never read-modify-write a counter.
use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;

use crate::error::Result;

pub mod memory;
pub mod redis;

pub use memory::MemoryStore;
pub use self::redis::RedisStore;

#[async_trait]
pub trait Store: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Returns `true` only for the caller that created the key.
    async fn set_nx(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<bool>;

    /// Removes a key of any type.
    async fn del(&self, key: &str) -> Result<()>;

    async fn hset(&self, key: &str, fields: &[(&str, &str)]) -> Result<()>;

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>>;

    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>>;

    async fn hdel(&self, key: &str, field: &str) -> Result<()>;

    async fn hincr_by(&self, key: &str, field: &str, delta: i64) -> Result<i64>;

    /// Upserts a member's score.
    async fn zadd(&self, key: &str, member: &str, score: f64) -> Result<()>;

    /// Returns `true` only when the member was newly added.
    async fn zadd_nx(&self, key: &str, member: &str, score: f64) -> Result<bool>;

    /// Returns the member's new score. Missing members start at zero.
    async fn zincr_by(&self, key: &str, member: &str, delta: f64) -> Result<f64>;

    async fn zscore(&self, key: &str, member: &str) -> Result<Option<f64>>;

    async fn zcard(&self, key: &str) -> Result<u64>;

    /// Members ordered by descending score, ties by descending member.
    /// `None` returns every member.
    async fn zrange_desc(&self, key: &str, limit: Option<usize>) -> Result<Vec<(String, f64)>>;

    async fn zrem(&self, key: &str, member: &str) -> Result<()>;
}
