//! Sharded map for accumulating values from many threads at once.
//!
//! Each key lives in exactly one shard, `key mod shard_count`, and every
//! shard has its own lock. Threads touching keys in different shards never
//! contend, and no operation ever holds two shard locks at the same time.

use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

/// Integer keys that can pick their shard by modulus.
pub trait ShardKey: Copy + Ord {
    fn shard_index(self, shard_count: usize) -> usize;
}

macro_rules! impl_shard_key {
    ($($t:ty),*) => {
        $(impl ShardKey for $t {
            #[inline]
            fn shard_index(self, shard_count: usize) -> usize {
                (self as u64 % shard_count as u64) as usize
            }
        })*
    };
}

impl_shard_key!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

pub struct ConcurrentMap<K, V> {
    shards: Vec<Mutex<BTreeMap<K, V>>>,
}

/// Exclusive handle to one value. The owning shard stays locked until the
/// handle is dropped.
pub struct Access<'a, V> {
    guard: MappedMutexGuard<'a, V>,
}

impl<V> Deref for Access<'_, V> {
    type Target = V;
    fn deref(&self) -> &V { &self.guard }
}

impl<V> DerefMut for Access<'_, V> {
    fn deref_mut(&mut self) -> &mut V { &mut self.guard }
}

impl<K: ShardKey, V> ConcurrentMap<K, V> {
    /// A zero shard count is bumped to one.
    pub fn new(shard_count: usize) -> Self {
        let shards = (0..shard_count.max(1)).map(|_| Mutex::new(BTreeMap::new())).collect();
        Self { shards }
    }

    pub fn shard_count(&self) -> usize { self.shards.len() }

    fn shard(&self, key: K) -> &Mutex<BTreeMap<K, V>> {
        &self.shards[key.shard_index(self.shards.len())]
    }

    /// Lock the key's shard and hand out its value, inserting the default
    /// when the key is new.
    pub fn access(&self, key: K) -> Access<'_, V>
    where
        V: Default,
    {
        let guard = MutexGuard::map(self.shard(key).lock(), |map| map.entry(key).or_default());
        Access { guard }
    }

    pub fn erase(&self, key: K) -> Option<V> {
        self.shard(key).lock().remove(&key)
    }

    /// Merge every shard into one ordered map, locking them one at a time.
    pub fn snapshot(&self) -> BTreeMap<K, V>
    where
        V: Clone,
    {
        let mut merged = BTreeMap::new();
        for shard in &self.shards {
            let guard = shard.lock();
            merged.extend(guard.iter().map(|(k, v)| (*k, v.clone())));
        }
        merged
    }

    /// Like [`snapshot`](Self::snapshot) but moves values out instead of cloning.
    pub fn into_map(self) -> BTreeMap<K, V> {
        let mut merged = BTreeMap::new();
        for shard in self.shards {
            merged.append(&mut shard.into_inner());
        }
        merged
    }
}
