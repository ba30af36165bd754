//! In-process [`Store`] for tests and local runs.
//!
//! A single mutex serializes every primitive, which gives the same
//! one-command-at-a-time atomicity Redis does. Expiry uses the tokio clock so
//! paused-time tests can step over cooldowns.
use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use tokio::time::Instant;

use super::Store;
use crate::error::{Error, Result};

#[derive(Default)]
struct Inner {
    strings: HashMap<String, (String, Option<Instant>)>,
    hashes: HashMap<String, HashMap<String, String>>,
    zsets: HashMap<String, HashMap<String, f64>>,
}

impl Inner {
    fn live_string(&mut self, key: &str) -> Option<&String> {
        let expired = matches!(
            self.strings.get(key),
            Some((_, Some(deadline))) if Instant::now() >= *deadline
        );

        if expired {
            self.strings.remove(key);
        }

        self.strings.get(key).map(|(value, _)| value)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().live_string(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()
            .strings
            .insert(key.to_string(), (value.to_string(), None));

        Ok(())
    }

    async fn set_nx(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<bool> {
        let mut inner = self.lock();

        if inner.live_string(key).is_some() {
            return Ok(false);
        }

        let deadline = ttl.map(|ttl| Instant::now() + ttl);
        inner
            .strings
            .insert(key.to_string(), (value.to_string(), deadline));

        Ok(true)
    }

    async fn del(&self, key: &str) -> Result<()> {
        let mut inner = self.lock();
        inner.strings.remove(key);
        inner.hashes.remove(key);
        inner.zsets.remove(key);

        Ok(())
    }

    async fn hset(&self, key: &str, fields: &[(&str, &str)]) -> Result<()> {
        let mut inner = self.lock();
        let hash = inner.hashes.entry(key.to_string()).or_default();

        for (field, value) in fields {
            hash.insert(field.to_string(), value.to_string());
        }

        Ok(())
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
        Ok(self
            .lock()
            .hashes
            .get(key)
            .and_then(|hash| hash.get(field))
            .cloned())
    }

    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>> {
        Ok(self.lock().hashes.get(key).cloned().unwrap_or_default())
    }

    async fn hdel(&self, key: &str, field: &str) -> Result<()> {
        let mut inner = self.lock();

        if let Some(hash) = inner.hashes.get_mut(key) {
            hash.remove(field);
            if hash.is_empty() {
                inner.hashes.remove(key);
            }
        }

        Ok(())
    }

    async fn hincr_by(&self, key: &str, field: &str, delta: i64) -> Result<i64> {
        let mut inner = self.lock();
        let value = inner
            .hashes
            .entry(key.to_string())
            .or_default()
            .entry(field.to_string())
            .or_insert_with(|| "0".to_string());

        let current = value.parse::<i64>().map_err(|_| Error::MalformedNumber {
            key: format!("{key}.{field}"),
            value: value.clone(),
        })?;
        let next = current + delta;
        *value = next.to_string();

        Ok(next)
    }

    async fn zadd(&self, key: &str, member: &str, score: f64) -> Result<()> {
        self.lock()
            .zsets
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string(), score);

        Ok(())
    }

    async fn zadd_nx(&self, key: &str, member: &str, score: f64) -> Result<bool> {
        let mut inner = self.lock();
        let zset = inner.zsets.entry(key.to_string()).or_default();

        if zset.contains_key(member) {
            return Ok(false);
        }

        zset.insert(member.to_string(), score);

        Ok(true)
    }

    async fn zincr_by(&self, key: &str, member: &str, delta: f64) -> Result<f64> {
        let mut inner = self.lock();
        let score = inner
            .zsets
            .entry(key.to_string())
            .or_default()
            .entry(member.to_string())
            .or_insert(0.0);

        *score += delta;

        Ok(*score)
    }

    async fn zscore(&self, key: &str, member: &str) -> Result<Option<f64>> {
        Ok(self
            .lock()
            .zsets
            .get(key)
            .and_then(|zset| zset.get(member))
            .copied())
    }

    async fn zcard(&self, key: &str) -> Result<u64> {
        Ok(self.lock().zsets.get(key).map_or(0, |zset| zset.len() as u64))
    }

    async fn zrange_desc(&self, key: &str, limit: Option<usize>) -> Result<Vec<(String, f64)>> {
        let inner = self.lock();
        let Some(zset) = inner.zsets.get(key) else {
            return Ok(Vec::new());
        };

        let mut entries: Vec<(String, f64)> = zset
            .iter()
            .map(|(member, score)| (member.clone(), *score))
            .collect();

        entries.sort_by(|(a_member, a_score), (b_member, b_score)| {
            b_score
                .partial_cmp(a_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b_member.cmp(a_member))
        });

        if let Some(limit) = limit {
            entries.truncate(limit);
        }

        Ok(entries)
    }

    async fn zrem(&self, key: &str, member: &str) -> Result<()> {
        let mut inner = self.lock();

        if let Some(zset) = inner.zsets.get_mut(key) {
            zset.remove(member);
            if zset.is_empty() {
                inner.zsets.remove(key);
            }
        }

        Ok(())
    }
}
