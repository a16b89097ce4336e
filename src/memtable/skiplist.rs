use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::memtable::entry::Entry;
use crate::util::{Result, Slice, Status};

/// Arena index of the head sentinel.
const HEAD: usize = 0;

#[derive(Debug, Clone)]
pub struct SkipListOptions {
    /// Hard ceiling on the number of levels. LevelDB uses 12.
    pub max_height: usize,
    /// Seed for the structure-owned RNG driving level sampling. Two lists
    /// built with the same seed and the same insert order assign identical
    /// levels.
    pub seed: u64,
}

impl Default for SkipListOptions {
    fn default() -> Self {
        SkipListOptions {
            max_height: 12,
            seed: 0,
        }
    }
}

/// One node of the list, stored in the arena.
///
/// `forward` holds one arena index per level the node participates in
/// (`0..=assigned_level`), so `forward.len() - 1` is the level sampled at
/// creation. A node linked at level L is linked at every level below it;
/// level 0 is the fully ordered chain of all keys.
#[derive(Debug)]
struct Node {
    key: String,
    payload: Option<Slice>,
    timestamp: u64,
    tombstone: bool,
    forward: Vec<Option<usize>>,
}

impl Node {
    fn to_entry(&self) -> Entry {
        Entry::new(
            self.key.clone(),
            self.payload.clone(),
            self.timestamp,
            self.tombstone,
        )
    }
}

#[derive(Debug)]
struct Inner {
    /// Node arena; `nodes[HEAD]` is the sentinel with `max_height` forward
    /// slots. Links are arena indices, never references, so unlinking and
    /// in-place rewrites cannot invalidate anything a reader could hold.
    nodes: Vec<Node>,
    /// Highest level currently in use. Only grows.
    height: usize,
    /// Live (non-tombstoned) entries.
    len: usize,
    /// Running sum of admitted key + payload bytes. Approximate: rewrites
    /// and tombstones do not subtract, matching its use as a flush trigger.
    mem_usage: usize,
    rng: StdRng,
    /// Last timestamp handed out; stamps are strictly monotonic per list.
    clock: u64,
}

impl Inner {
    fn next_timestamp(&mut self) -> u64 {
        let wall = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0);
        self.clock = wall.max(self.clock + 1);
        self.clock
    }

    /// Sample a level for a new node: fair coin flips from level 0, stopping
    /// at the first failed flip. The candidate may exceed the current height
    /// by at most one (raising it), and never reaches `max_height`.
    fn roll(&mut self, max_height: usize) -> usize {
        let mut level = 0;
        while level + 1 < max_height && self.rng.gen_bool(0.5) {
            level += 1;
            if level > self.height {
                self.height = level;
                break;
            }
        }
        level
    }

    /// Top-down search. Returns the arena index of the node holding `key`,
    /// tombstoned or not.
    fn search(&self, key: &str) -> Option<usize> {
        let mut curr = HEAD;
        for level in (0..=self.height).rev() {
            while let Some(next) = self.nodes[curr].forward[level] {
                match self.nodes[next].key.as_str().cmp(key) {
                    Ordering::Less => curr = next,
                    Ordering::Equal => return Some(next),
                    Ordering::Greater => break,
                }
            }
        }
        None
    }
}

/// Ordered, concurrently-accessible in-memory index: the mutable memtable
/// layer of a log-structured store.
///
/// ```text
/// Level 2:  HEAD ──────────────► "m" ─────────────────► NIL
/// Level 1:  HEAD ──► "c" ──────► "m" ────────► "t" ───► NIL
/// Level 0:  HEAD ──► "c" ─► "g" ─► "m" ─► "p" ─► "t" ─► NIL
/// ```
///
/// Deletion is logical: a deleted key stays linked as a tombstone so the
/// delete intent survives materialization and can win merges by timestamp.
/// One coarse reader/writer lock guards the structure; `insert`, `update`
/// and `delete` are exclusive, lookups and snapshots are shared.
#[derive(Debug)]
pub struct SkipList {
    inner: RwLock<Inner>,
    max_height: usize,
}

impl SkipList {
    pub fn new(options: SkipListOptions) -> Result<Self> {
        if options.max_height == 0 {
            return Err(Status::invalid_argument("max_height must be positive"));
        }
        let head = Node {
            key: String::new(),
            payload: None,
            timestamp: 0,
            tombstone: false,
            forward: vec![None; options.max_height],
        };
        Ok(SkipList {
            inner: RwLock::new(Inner {
                nodes: vec![head],
                height: 0,
                len: 0,
                mem_usage: 0,
                rng: StdRng::seed_from_u64(options.seed),
                clock: 0,
            }),
            max_height: options.max_height,
        })
    }

    /// Insert a key with a payload, returning the stored entry.
    ///
    /// Exactly one node ever exists per key: inserting over an existing key
    /// (live or tombstoned) rewrites it in place, last write wins. A
    /// tombstoned key is resurrected.
    pub fn insert(&self, key: impl Into<String>, payload: impl Into<Slice>) -> Entry {
        let key = key.into();
        let payload = payload.into();
        let mut inner = self.inner.write();

        // Descend from the top level, recording the predecessor at every
        // level; levels above the current height keep HEAD.
        let mut update = vec![HEAD; self.max_height];
        let mut curr = HEAD;
        for level in (0..=inner.height).rev() {
            while let Some(next) = inner.nodes[curr].forward[level] {
                if inner.nodes[next].key < key {
                    curr = next;
                } else {
                    break;
                }
            }
            update[level] = curr;
        }

        let timestamp = inner.next_timestamp();

        if let Some(next) = inner.nodes[update[0]].forward[0] {
            if inner.nodes[next].key == key {
                let was_tombstoned = inner.nodes[next].tombstone;
                inner.mem_usage += payload.size();
                {
                    let node = &mut inner.nodes[next];
                    node.payload = Some(payload);
                    node.timestamp = timestamp;
                    node.tombstone = false;
                }
                if was_tombstoned {
                    inner.len += 1;
                }
                return inner.nodes[next].to_entry();
            }
        }

        let level = inner.roll(self.max_height);
        let idx = inner.nodes.len();
        inner.mem_usage += key.len() + payload.size();
        inner.nodes.push(Node {
            key,
            payload: Some(payload),
            timestamp,
            tombstone: false,
            forward: vec![None; level + 1],
        });
        for l in 0..=level {
            let pred = update[l];
            inner.nodes[idx].forward[l] = inner.nodes[pred].forward[l];
            inner.nodes[pred].forward[l] = Some(idx);
        }
        inner.len += 1;

        inner.nodes[idx].to_entry()
    }

    /// Point lookup. Tombstoned keys report `None`.
    pub fn get(&self, key: &str) -> Option<Entry> {
        let inner = self.inner.read();
        inner.search(key).and_then(|idx| {
            let node = &inner.nodes[idx];
            if node.tombstone {
                None
            } else {
                Some(node.to_entry())
            }
        })
    }

    /// Existence check. Unlike `get`, this still sees tombstoned keys.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.read().search(key).is_some()
    }

    /// Replace the payload of an existing key in place, refreshing its
    /// timestamp. A tombstoned key is resurrected.
    pub fn update(&self, key: &str, payload: impl Into<Slice>) -> Result<Entry> {
        let payload = payload.into();
        let mut inner = self.inner.write();
        let Some(idx) = inner.search(key) else {
            return Err(Status::not_found(format!("no entry for key {key:?}")));
        };
        let timestamp = inner.next_timestamp();
        let was_tombstoned = inner.nodes[idx].tombstone;
        inner.mem_usage += payload.size();
        {
            let node = &mut inner.nodes[idx];
            node.payload = Some(payload);
            node.timestamp = timestamp;
            node.tombstone = false;
        }
        if was_tombstoned {
            inner.len += 1;
        }
        Ok(inner.nodes[idx].to_entry())
    }

    /// Logically delete a key: drop its payload, stamp a fresh timestamp and
    /// mark it as a tombstone. The node stays linked at every level it
    /// occupies. Deleting an absent or already-tombstoned key is `NotFound`.
    pub fn delete(&self, key: &str) -> Result<Entry> {
        let mut inner = self.inner.write();
        let idx = match inner.search(key) {
            Some(idx) if !inner.nodes[idx].tombstone => idx,
            _ => return Err(Status::not_found(format!("no live entry for key {key:?}"))),
        };
        let timestamp = inner.next_timestamp();
        {
            let node = &mut inner.nodes[idx];
            node.payload = None;
            node.timestamp = timestamp;
            node.tombstone = true;
        }
        inner.len -= 1;
        Ok(inner.nodes[idx].to_entry())
    }

    /// Snapshot every live entry, keyed and ascending. One linear pass over
    /// level 0, which reaches every node exactly once.
    pub fn materialize(&self) -> BTreeMap<String, Entry> {
        self.collect(false)
    }

    /// Snapshot including tombstones, for flush/merge collaborators that
    /// must propagate delete intent.
    pub fn materialize_all(&self) -> BTreeMap<String, Entry> {
        self.collect(true)
    }

    fn collect(&self, include_tombstones: bool) -> BTreeMap<String, Entry> {
        let inner = self.inner.read();
        let mut out = BTreeMap::new();
        let mut curr = inner.nodes[HEAD].forward[0];
        while let Some(idx) = curr {
            let node = &inner.nodes[idx];
            if include_tombstones || !node.tombstone {
                out.insert(node.key.clone(), node.to_entry());
            }
            curr = node.forward[0];
        }
        out
    }

    /// Number of live (non-tombstoned) entries.
    pub fn len(&self) -> usize {
        self.inner.read().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Highest level currently in use.
    pub fn height(&self) -> usize {
        self.inner.read().height
    }

    pub fn max_height(&self) -> usize {
        self.max_height
    }

    /// Approximate bytes admitted into the index, for flush triggering.
    pub fn approximate_memory_usage(&self) -> usize {
        self.inner.read().mem_usage
    }
}
