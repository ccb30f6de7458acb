//! Identifier generation for new nodes and edges
//!
//! Node ids must stay unique across every editor session that writes to the
//! same flow, so the default generator is snowflake-style: a millisecond
//! timestamp, a worker id and a per-millisecond sequence packed into a u64.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

/// Source of fresh node and edge identifiers
pub trait IdGenerator: Send + Sync {
    /// Return an identifier never returned before by this generator
    fn next_id(&self) -> String;
}

/// 2024-01-01T00:00:00Z in Unix milliseconds
const EPOCH_MS: u64 = 1_704_067_200_000;
const WORKER_BITS: u32 = 10;
const SEQUENCE_BITS: u32 = 12;
const MAX_WORKER_ID: u64 = (1 << WORKER_BITS) - 1;
const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;

#[derive(Debug, Default)]
struct SnowflakeState {
    last_ms: u64,
    sequence: u64,
}

/// Snowflake id generator: 41-bit time, 10-bit worker, 12-bit sequence
///
/// Ids from one generator are strictly increasing. When the clock moves
/// backwards, or 4096 ids are drawn within one millisecond, the generator
/// keeps counting on its own logical clock instead of blocking.
#[derive(Debug)]
pub struct SnowflakeIdGenerator {
    worker_id: u64,
    state: Mutex<SnowflakeState>,
}

impl SnowflakeIdGenerator {
    /// Create a generator; the worker id is truncated to 10 bits
    pub fn new(worker_id: u16) -> Self {
        Self {
            worker_id: u64::from(worker_id) & MAX_WORKER_ID,
            state: Mutex::new(SnowflakeState::default()),
        }
    }

    pub fn worker_id(&self) -> u64 {
        self.worker_id
    }

    /// Next id as a raw integer
    pub fn next_raw(&self) -> u64 {
        let mut state = self.state.lock();
        let now = current_millis();

        if now > state.last_ms {
            state.last_ms = now;
            state.sequence = 0;
        } else {
            state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
            if state.sequence == 0 {
                state.last_ms += 1;
            }
        }

        (state.last_ms << (WORKER_BITS + SEQUENCE_BITS))
            | (self.worker_id << SEQUENCE_BITS)
            | state.sequence
    }

    /// Split a raw id into (milliseconds since epoch, worker id, sequence)
    pub fn decompose(id: u64) -> (u64, u64, u64) {
        (
            id >> (WORKER_BITS + SEQUENCE_BITS),
            (id >> SEQUENCE_BITS) & MAX_WORKER_ID,
            id & SEQUENCE_MASK,
        )
    }
}

impl Default for SnowflakeIdGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

impl IdGenerator for SnowflakeIdGenerator {
    fn next_id(&self) -> String {
        self.next_raw().to_string()
    }
}

fn current_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(EPOCH_MS)
        .saturating_sub(EPOCH_MS)
}

/// Random v4 UUIDs with an optional prefix (e.g. "edge-…")
#[derive(Debug, Clone, Default)]
pub struct UuidIdGenerator {
    prefix: Option<String>,
}

impl UuidIdGenerator {
    pub fn new() -> Self {
        Self { prefix: None }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> String {
        let id = uuid::Uuid::new_v4();
        match &self.prefix {
            Some(prefix) => format!("{}-{}", prefix, id),
            None => id.to_string(),
        }
    }
}

/// Deterministic ids `prefix-1`, `prefix-2`, ... for fixtures and replays
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_snowflake_ids_are_unique_and_increasing() {
        let generator = SnowflakeIdGenerator::new(7);
        let ids: Vec<u64> = (0..10_000).map(|_| generator.next_raw()).collect();

        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        let unique: HashSet<u64> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_snowflake_embeds_worker_id() {
        let generator = SnowflakeIdGenerator::new(1023);
        let (_, worker, _) = SnowflakeIdGenerator::decompose(generator.next_raw());
        assert_eq!(worker, 1023);

        let truncated = SnowflakeIdGenerator::new(1024 + 5);
        assert_eq!(truncated.worker_id(), 5);
    }

    #[test]
    fn test_snowflake_is_shareable_across_threads() {
        let generator = Arc::new(SnowflakeIdGenerator::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generator = Arc::clone(&generator);
                std::thread::spawn(move || {
                    (0..1_000).map(|_| generator.next_id()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(all.insert(id));
            }
        }
        assert_eq!(all.len(), 4_000);
    }

    #[test]
    fn test_uuid_prefix() {
        let generator = UuidIdGenerator::with_prefix("edge");
        let id = generator.next_id();
        assert!(id.starts_with("edge-"));
        assert_ne!(id, generator.next_id());
    }

    #[test]
    fn test_sequential_ids() {
        let generator = SequentialIdGenerator::new("n");
        assert_eq!(generator.next_id(), "n-1");
        assert_eq!(generator.next_id(), "n-2");
    }
}
