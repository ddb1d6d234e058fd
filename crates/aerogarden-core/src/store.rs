// ── Garden cache ──
//
// Single reactive snapshot of every garden. Readers clone an `Arc` and
// see either the old or the new map, never a mix.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::watch;

use crate::model::{Garden, GardenKey, GardenMap};
use crate::stream::GardenStream;

/// Central reactive store for the garden map.
///
/// Writes replace the whole map; there is no per-garden upsert.
pub struct GardenStore {
    snapshot: watch::Sender<Arc<GardenMap>>,
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl GardenStore {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(GardenMap::new()));
        let (last_refresh, _) = watch::channel(None);
        Self {
            snapshot,
            last_refresh,
        }
    }

    /// Swap in a freshly fetched map and stamp the refresh time.
    pub(crate) fn replace(&self, gardens: GardenMap) -> Arc<GardenMap> {
        let gardens = Arc::new(gardens);
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::clone(&gardens));
        self.last_refresh.send_modify(|t| *t = Some(Utc::now()));
        gardens
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    /// Current map (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<GardenMap> {
        self.snapshot.borrow().clone()
    }

    pub fn get(&self, key: &str) -> Option<Arc<Garden>> {
        self.snapshot.borrow().get(key).cloned()
    }

    /// Field lookup. `None` if the key or field is unknown.
    pub fn property(&self, key: &str, field: &str) -> Option<Value> {
        self.snapshot.borrow().get(key)?.field(field).cloned()
    }

    /// Cached keys in response order.
    pub fn keys(&self) -> Vec<GardenKey> {
        self.snapshot.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.borrow().is_empty()
    }

    /// When the cache was last replaced.
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe(&self) -> GardenStream {
        GardenStream::new(self.snapshot.subscribe())
    }

    pub fn subscribe_last_refresh(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.last_refresh.subscribe()
    }
}

impl Default for GardenStore {
    fn default() -> Self {
        Self::new()
    }
}
