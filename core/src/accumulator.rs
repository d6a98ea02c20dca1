//! Sharded accumulator used while scoring documents from several workers.
//!
//! Slots are keyed by document id and spread over a fixed number of shards,
//! each behind its own lock. A shard is picked by `id mod shard_count`, so
//! writers touching ids in different shards never contend.

use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::collections::BTreeMap;

use crate::DocId;

pub struct ConcurrentAccumulator<V> {
    shards: Vec<Mutex<BTreeMap<DocId, V>>>,
}

impl<V: Default> ConcurrentAccumulator<V> {
    /// Create an accumulator with `shard_count` shards (at least one).
    pub fn new(shard_count: usize) -> Self {
        let shards = (0..shard_count.max(1))
            .map(|_| Mutex::new(BTreeMap::new()))
            .collect();
        Self { shards }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard_index(&self, id: DocId) -> usize {
        i64::from(id).rem_euclid(self.shards.len() as i64) as usize
    }

    /// Lock the shard owning `id` and return its slot, creating it with
    /// `V::default()` on first touch.
    ///
    /// The shard stays locked until the returned guard is dropped; keep it
    /// for a single update.
    pub fn slot(&self, id: DocId) -> MappedMutexGuard<'_, V> {
        let shard = &self.shards[self.shard_index(id)];
        MutexGuard::map(shard.lock(), |map| map.entry(id).or_default())
    }

    /// Apply `f` to the slot of `id` under its shard lock.
    pub fn update<F>(&self, id: DocId, f: F)
    where
        F: FnOnce(&mut V),
    {
        let mut slot = self.slot(id);
        f(&mut slot);
    }

    /// Move every slot into one ordered map.
    ///
    /// Shards are locked one at a time. Only meaningful once all writers
    /// have finished.
    pub fn drain_ordered(&self) -> BTreeMap<DocId, V> {
        let mut result = BTreeMap::new();
        for shard in &self.shards {
            let mut taken = std::mem::take(&mut *shard.lock());
            result.append(&mut taken);
        }
        result
    }
}
