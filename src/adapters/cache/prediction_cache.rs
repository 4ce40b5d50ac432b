//! Prediction Cache - TTL Cache in Front of a Probability Oracle
//!
//! Model predictions are expensive and change rarely within a day, so a
//! caller can wrap any `ProbabilityOracle` in a `CachedOracle`. Entries
//! expire after the configured TTL (default one hour). Only successful,
//! non-empty predictions are cached; errors and misses always go to the
//! oracle.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::fixture::{Fixture, FixtureId};
use crate::ports::oracle::{Prediction, ProbabilityOracle};

/// Cached prediction with staleness tracking.
#[derive(Debug, Clone)]
struct CachedPrediction {
    prediction: Prediction,
    cached_at: DateTime<Utc>,
}

impl CachedPrediction {
    fn is_stale(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.cached_at >= ttl
    }
}

/// Concurrency-safe prediction store keyed by fixture ID.
#[derive(Debug)]
pub struct PredictionCache {
    entries: RwLock<HashMap<FixtureId, CachedPrediction>>,
    ttl: Duration,
}

impl PredictionCache {
    /// Create a cache whose entries live for `ttl_seconds`.
    pub fn new(ttl_seconds: u64) -> Self {
        let ttl = i64::try_from(ttl_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Fresh prediction for a fixture, if any.
    pub async fn get(&self, fixture_id: FixtureId) -> Option<Prediction> {
        let entries = self.entries.read().await;
        entries
            .get(&fixture_id)
            .filter(|cached| !cached.is_stale(self.ttl, Utc::now()))
            .map(|cached| cached.prediction.clone())
    }

    /// Store a prediction, replacing any previous entry.
    pub async fn set(&self, prediction: Prediction) {
        self.set_at(prediction, Utc::now()).await;
    }

    async fn set_at(&self, prediction: Prediction, cached_at: DateTime<Utc>) {
        let mut entries = self.entries.write().await;
        entries.insert(
            prediction.fixture_id,
            CachedPrediction {
                prediction,
                cached_at,
            },
        );
    }

    /// Drop one fixture's entry. Returns whether it existed.
    pub async fn expire(&self, fixture_id: FixtureId) -> bool {
        self.entries.write().await.remove(&fixture_id).is_some()
    }

    /// Drop every stale entry. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, cached| !cached.is_stale(self.ttl, now));
        before - entries.len()
    }

    /// Drop everything.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of stored entries, stale ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Oracle decorator that consults a `PredictionCache` first.
pub struct CachedOracle<O: ProbabilityOracle> {
    inner: O,
    cache: PredictionCache,
}

impl<O: ProbabilityOracle> CachedOracle<O> {
    pub fn new(inner: O, ttl_seconds: u64) -> Self {
        Self {
            inner,
            cache: PredictionCache::new(ttl_seconds),
        }
    }

    pub const fn cache(&self) -> &PredictionCache {
        &self.cache
    }
}

#[async_trait]
impl<O: ProbabilityOracle> ProbabilityOracle for CachedOracle<O> {
    async fn predict(&self, fixture: &Fixture) -> Result<Option<Prediction>> {
        if let Some(prediction) = self.cache.get(fixture.id).await {
            debug!(fixture_id = fixture.id, "Prediction cache hit");
            return Ok(Some(prediction));
        }

        let prediction = self.inner.predict(fixture).await?;
        if let Some(prediction) = prediction.as_ref().filter(|p| !p.is_empty()) {
            debug!(fixture_id = fixture.id, "Prediction cached");
            self.cache.set(prediction.clone()).await;
        }
        Ok(prediction)
    }
}
