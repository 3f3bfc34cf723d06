//! C2: the recency cache. A bounded, insertion-ordered, per-kind cache used
//! to elide redundant graph mutations (spec.md §4.2). Pure optimization:
//! the graph's correctness must hold with this cache disabled (spec.md
//! §8 invariant 5), so it is modeled as a plain ring-buffer-like structure
//! with no weak references or GC ties (spec.md §9).

use std::collections::VecDeque;

/// The seven cache buckets named in spec.md §4.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    Ip,
    Mac,
    Assign,
    Ssid,
    Advertises,
    Probes,
    ProbeResponse,
}

impl CacheKind {
    const ALL: [CacheKind; 7] = [
        CacheKind::Ip,
        CacheKind::Mac,
        CacheKind::Assign,
        CacheKind::Ssid,
        CacheKind::Advertises,
        CacheKind::Probes,
        CacheKind::ProbeResponse,
    ];
}

/// A single bucket: insertion-ordered keys plus hit/miss counters.
#[derive(Debug, Default)]
struct Bucket {
    entries: VecDeque<String>,
    hits: u64,
    misses: u64,
}

/// Point-in-time stats for one bucket, surfaced for telemetry (spec.md
/// §4.2/§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
    pub capacity: usize,
}

/// Fixed-capacity, insertion-order, per-kind cache. Keys are pre-joined
/// into a single string by the caller (e.g. `"ip,mac"` for a 2-tuple key),
/// since spec.md §4.2 only requires whole-key value equality, not
/// structural decomposition.
pub struct RecencyCache {
    capacity: usize,
    buckets: std::collections::HashMap<CacheKind, Bucket>,
}

impl RecencyCache {
    /// `capacity` is the tunable per-kind bound; spec.md §4.2 default is 50.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let mut buckets = std::collections::HashMap::with_capacity(CacheKind::ALL.len());
        for kind in CacheKind::ALL {
            buckets.insert(kind, Bucket::default());
        }
        Self { capacity, buckets }
    }

    fn bucket_mut(&mut self, kind: CacheKind) -> &mut Bucket {
        self.buckets.entry(kind).or_default()
    }

    fn bucket(&self, kind: CacheKind) -> Option<&Bucket> {
        self.buckets.get(&kind)
    }

    /// If `key` is present in `kind`'s bucket, count a hit and return
    /// `true`. Otherwise count a miss, admit `key`, evict the oldest entry
    /// if now over capacity, and return `false`.
    pub fn check_and_admit(&mut self, kind: CacheKind, key: &str) -> bool {
        let capacity = self.capacity;
        let bucket = self.bucket_mut(kind);
        if bucket.entries.iter().any(|k| k == key) {
            bucket.hits += 1;
            true
        } else {
            bucket.misses += 1;
            bucket.entries.push_back(key.to_string());
            if bucket.entries.len() > capacity {
                bucket.entries.pop_front();
            }
            false
        }
    }

    /// Same counters as `check_and_admit`, but never admits `key` — used
    /// during extraction to gate the OUI lookup without polluting the
    /// bucket the projector later checks against (spec.md §4.2).
    pub fn check(&mut self, kind: CacheKind, key: &str) -> bool {
        let bucket = self.bucket_mut(kind);
        if bucket.entries.iter().any(|k| k == key) {
            bucket.hits += 1;
            true
        } else {
            bucket.misses += 1;
            false
        }
    }

    #[must_use]
    pub fn stats(&self, kind: CacheKind) -> CacheStats {
        let bucket = self.bucket(kind);
        CacheStats {
            hits: bucket.map_or(0, |b| b.hits),
            misses: bucket.map_or(0, |b| b.misses),
            size: bucket.map_or(0, |b| b.entries.len()),
            capacity: self.capacity,
        }
    }

    pub fn all_stats(&self) -> impl Iterator<Item = (CacheKind, CacheStats)> + '_ {
        CacheKind::ALL.into_iter().map(|kind| (kind, self.stats(kind)))
    }
}

/// Join a 2-tuple key (e.g. `(ip, mac)` for the `ASSIGN` bucket) the way the
/// projector needs it: structural equality via a delimiter unlikely to
/// appear in a MAC/IP/SSID string.
#[must_use]
pub fn pair_key(a: &str, b: &str) -> String {
    format!("{a}\u{0}{b}")
}
