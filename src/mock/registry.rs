//! In-memory mock store keyed by `endpoint-verb`.
//!
//! [`MockRegistry`] owns a `tokio` `RwLock` around the map so concurrent
//! lookups from request handlers and upserts from the loader never race.
//! Stored mocks are wrapped in `Arc`; a lookup clones the `Arc` and drops
//! the lock before any matching work happens.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::model::{match_key, Mock};
use super::Mocker;

#[derive(Debug, Default)]
pub struct MockRegistry {
    mocks: RwLock<HashMap<String, Arc<Mock>>>,
}

impl MockRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `mock` under its match key, replacing any previous entry.
    ///
    /// Returns the mock that was replaced. Field contents are not checked:
    /// an empty endpoint or verb is stored as-is.
    pub async fn upsert(&self, mock: Mock) -> Option<Arc<Mock>> {
        let key = mock.key();
        self.mocks.write().await.insert(key, Arc::new(mock))
    }

    /// Exact lookup by endpoint and verb. No path normalization.
    pub async fn lookup(&self, end_point: &str, verb: &str) -> Option<Arc<Mock>> {
        let key = match_key(end_point, verb);
        self.mocks.read().await.get(&key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.mocks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.mocks.read().await.is_empty()
    }

    /// Sorted match keys of every registered mock.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.mocks.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Upsert every mock supplied by each bundle, in order.
    ///
    /// Later bundles overwrite earlier ones on key collisions. Returns the
    /// number of mocks upserted.
    pub async fn seed(&self, bundles: &[Box<dyn Mocker>]) -> usize {
        let mut count = 0;
        for bundle in bundles {
            let mocks = bundle.mocks();
            tracing::info!(bundle = bundle.name(), mocks = mocks.len(), "loading mock bundle");
            for mock in mocks {
                if self.upsert(mock).await.is_some() {
                    tracing::debug!(bundle = bundle.name(), "bundle mock replaced an existing key");
                }
                count += 1;
            }
        }
        count
    }
}
