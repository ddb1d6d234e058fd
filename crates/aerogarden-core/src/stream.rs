// ── Reactive garden stream ──
//
// Subscription handle for consuming cache replacements.

use std::sync::Arc;

use tokio::sync::watch;

use crate::model::GardenMap;

/// A subscription to the garden cache.
///
/// Holds the snapshot seen at creation (or at the last `changed()`), and
/// can wait for the next wholesale replacement.
pub struct GardenStream {
    current: Arc<GardenMap>,
    receiver: watch::Receiver<Arc<GardenMap>>,
}

impl GardenStream {
    pub(crate) fn new(mut receiver: watch::Receiver<Arc<GardenMap>>) -> Self {
        let current = receiver.borrow_and_update().clone();
        Self { current, receiver }
    }

    /// Snapshot captured at creation time or at the last `changed()`.
    pub fn current(&self) -> &Arc<GardenMap> {
        &self.current
    }

    /// Latest snapshot (may have changed since creation).
    pub fn latest(&self) -> Arc<GardenMap> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next replacement, returning the new snapshot.
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<GardenMap>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }
}
