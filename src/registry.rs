// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Two-tier concurrent registry for read-heavy, write-rare maps.
//!
//! Reads of keys already promoted into the stable snapshot are lock-free:
//! one `ArcSwap` load for the snapshot, one for the entry slot. Keys that
//! only live in the pending tier are served under a mutex and every such
//! miss is counted; once the miss count reaches the size of the pending map,
//! pending replaces the stable snapshot with a single pointer swap.
//!
//! ```text
//! load(k) ──► stable: ArcSwap<Snapshot> ──► Entry ──► ArcSwap<Slot>
//!                │ miss + amended
//!                ▼
//!            Mutex<Pending> ──► Entry (shared with stable)
//! ```
//!
//! Updating a key that is already in the stable snapshot is a CAS on its
//! slot and never touches the mutex. Concurrent updates of the same key are
//! last-CAS-wins.

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;


/// Contents of a registry slot
enum Slot<V> {
    Value(V),
    /// Deleted, still reachable from the stable snapshot
    Empty,
    /// Tombstone: absent from pending, writers must take the lock
    Expunged,
}

struct Entry<V> {
    slot: ArcSwap<Slot<V>>,
}

impl<V: Clone> Entry<V> {
    fn with_slot(slot: Arc<Slot<V>>) -> Self {
        Self {
            slot: ArcSwap::new(slot),
        }
    }

    fn load(&self) -> Option<V> {
        match &**self.slot.load() {
            Slot::Value(value) => Some(value.clone()),
            Slot::Empty | Slot::Expunged => None,
        }
    }

    /// CAS the slot unless it is tombstoned. Hands the slot back on failure.
    fn try_store(&self, new: Arc<Slot<V>>) -> Result<(), Arc<Slot<V>>> {
        loop {
            let current = self.slot.load();
            if matches!(**current, Slot::Expunged) {
                return Err(new);
            }
            let previous = self.slot.compare_and_swap(&current, Arc::clone(&new));
            if Arc::ptr_eq(&previous, &current) {
                return Ok(());
            }
            std::hint::spin_loop();
        }
    }

    /// Caller holds the pending lock.
    fn store_locked(&self, new: Arc<Slot<V>>) {
        self.slot.store(new);
    }

    /// Turns a tombstone back into an empty slot. Caller holds the pending lock.
    fn unexpunge_locked(&self) -> bool {
        let current = self.slot.load();
        if !matches!(**current, Slot::Expunged) {
            return false;
        }
        let previous = self
            .slot
            .compare_and_swap(&current, Arc::new(Slot::Empty));
        Arc::ptr_eq(&previous, &current)
    }

    /// Tombstones an empty slot. Returns true if the slot ends up expunged.
    fn try_expunge_locked(&self) -> bool {
        loop {
            let current = self.slot.load();
            match **current {
                Slot::Expunged => return true,
                Slot::Value(_) => return false,
                Slot::Empty => {
                    let previous = self
                        .slot
                        .compare_and_swap(&current, Arc::new(Slot::Expunged));
                    if Arc::ptr_eq(&previous, &current) {
                        return true;
                    }
                }
            }
        }
    }

    fn delete(&self) -> Option<V> {
        loop {
            let current = self.slot.load();
            let value = match &**current {
                Slot::Value(value) => value.clone(),
                Slot::Empty | Slot::Expunged => return None,
            };
            let previous = self.slot.compare_and_swap(&current, Arc::new(Slot::Empty));
            if Arc::ptr_eq(&previous, &current) {
                return Some(value);
            }
        }
    }
}

type EntryMap<K, V> = FxHashMap<K, Arc<Entry<V>>>;

/// Immutable stable tier
struct Snapshot<K, V> {
    map: Arc<EntryMap<K, V>>,
    /// Set when pending holds keys the snapshot lacks
    amended: bool,
}

/// Mutex-guarded pending tier
struct Pending<K, V> {
    /// `None` until the first new key forces materialization
    map: Option<EntryMap<K, V>>,
    misses: usize,
}

/// Concurrent key/value registry with wait-free reads of resolved keys.
pub struct ConcurrentRegistry<K, V> {
    stable: ArcSwap<Snapshot<K, V>>,
    pending: Mutex<Pending<K, V>>,
}

impl<K, V> Default for ConcurrentRegistry<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> ConcurrentRegistry<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            stable: ArcSwap::from_pointee(Snapshot {
                map: Arc::new(FxHashMap::default()),
                amended: false,
            }),
            pending: Mutex::new(Pending {
                map: None,
                misses: 0,
            }),
        }
    }

    /// Look up `key`.
    ///
    /// Lock-free when the key is in the stable snapshot. Otherwise, if the
    /// snapshot is amended, the pending tier is consulted under the lock and
    /// a miss is recorded.
    pub fn load<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let stable = self.stable.load();
        if let Some(entry) = stable.map.get(key) {
            return entry.load();
        }
        if !stable.amended {
            return None;
        }
        drop(stable);

        let entry = {
            let mut pending = self.pending.lock();
            let stable = self.stable.load();
            match stable.map.get(key) {
                Some(entry) => Some(Arc::clone(entry)),
                None if stable.amended => {
                    let entry = pending.map.as_ref().and_then(|m| m.get(key)).cloned();
                    self.miss_locked(&mut pending);
                    entry
                }
                None => None,
            }
        };
        entry?.load()
    }

    /// Insert or replace the value for `key`.
    pub fn store(&self, key: K, value: V) {
        let new = Arc::new(Slot::Value(value));
        let new = {
            let stable = self.stable.load();
            match stable.map.get(&key) {
                Some(entry) => match entry.try_store(new) {
                    Ok(()) => return,
                    Err(new) => new,
                },
                None => new,
            }
        };

        let mut pending = self.pending.lock();
        let stable = self.stable.load_full();
        if let Some(entry) = stable.map.get(&key) {
            if entry.unexpunge_locked() {
                pending
                    .map
                    .get_or_insert_with(FxHashMap::default)
                    .insert(key, Arc::clone(entry));
            }
            entry.store_locked(new);
            return;
        }

        let in_pending = pending.map.as_ref().and_then(|m| m.get(&key)).cloned();
        match in_pending {
            Some(entry) => entry.store_locked(new),
            None => {
                if !stable.amended {
                    Self::materialize_locked(&mut pending, &stable.map);
                    self.stable.store(Arc::new(Snapshot {
                        map: Arc::clone(&stable.map),
                        amended: true,
                    }));
                }
                pending
                    .map
                    .get_or_insert_with(FxHashMap::default)
                    .insert(key, Arc::new(Entry::with_slot(new)));
            }
        }
    }

    /// Remove `key`, returning the value it held.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let stable = self.stable.load();
        let mut entry = stable.map.get(key).cloned();
        let amended = stable.amended;
        drop(stable);

        if entry.is_none() && amended {
            let mut pending = self.pending.lock();
            let stable = self.stable.load();
            entry = stable.map.get(key).cloned();
            if entry.is_none() && stable.amended {
                entry = pending.map.as_mut().and_then(|m| m.remove(key));
                self.miss_locked(&mut pending);
            }
        }
        entry?.delete()
    }

    /// Visit every live entry of one consistent snapshot.
    ///
    /// Pending keys are promoted first, then the snapshot is iterated
    /// without holding the lock, so `f` may call back into the registry.
    /// Iteration stops when `f` returns false.
    pub fn range<F>(&self, mut f: F)
    where
        F: FnMut(&K, V) -> bool,
    {
        let mut snapshot = self.stable.load_full();
        if snapshot.amended {
            let mut pending = self.pending.lock();
            snapshot = self.stable.load_full();
            if snapshot.amended {
                self.promote_locked(&mut pending);
                snapshot = self.stable.load_full();
            }
        }

        for (key, entry) in snapshot.map.iter() {
            let Some(value) = entry.load() else {
                continue;
            };
            if !f(key, value) {
                break;
            }
        }
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        let mut count = 0;
        self.range(|_, _| {
            count += 1;
            true
        });
        count
    }

    /// Check if the registry holds no live entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn miss_locked(&self, pending: &mut Pending<K, V>) {
        pending.misses += 1;
        let pending_len = pending.map.as_ref().map_or(0, FxHashMap::len);
        if pending.misses < pending_len {
            return;
        }
        self.promote_locked(pending);
    }

    fn promote_locked(&self, pending: &mut Pending<K, V>) {
        let map = pending.map.take().unwrap_or_default();
        tracing::trace!(
            entries = map.len(),
            misses = pending.misses,
            "promoting pending registry tier"
        );
        self.stable.store(Arc::new(Snapshot {
            map: Arc::new(map),
            amended: false,
        }));
        pending.misses = 0;
    }

    /// Copy every non-tombstoned stable entry into pending.
    fn materialize_locked(pending: &mut Pending<K, V>, stable: &EntryMap<K, V>) {
        if pending.map.is_some() {
            return;
        }
        let mut map = FxHashMap::with_capacity_and_hasher(stable.len(), Default::default());
        for (key, entry) in stable.iter() {
            if !entry.try_expunge_locked() {
                map.insert(key.clone(), Arc::clone(entry));
            }
        }
        pending.map = Some(map);
    }
}
