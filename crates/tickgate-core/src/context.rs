//! Per-symbol rolling context used by the contextual rules.

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::RwLock;

use crate::decimal::Decimal;
use crate::domain::{UtcDateTime, ValidatedTick};

/// Bound on the rolling price and volume windows. The oldest entry is
/// evicted once a window would exceed this.
pub const HISTORY_CAPACITY: usize = 100;

const SHARD_COUNT: usize = 16;

/// Rolling state for one symbol. Created on the first non-rejected tick,
/// mutated only after a non-rejected verdict, never deleted during normal
/// operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolContext {
    symbol: String,
    last_price: Decimal,
    last_volume: u64,
    last_timestamp: UtcDateTime,
    last_sequence_id: Option<u64>,
    price_history: VecDeque<Decimal>,
    volume_history: VecDeque<u64>,
    tick_count: u64,
}

impl SymbolContext {
    fn new(tick: &ValidatedTick) -> Self {
        let mut context = Self {
            symbol: tick.symbol.as_str().to_owned(),
            last_price: tick.price,
            last_volume: tick.volume,
            last_timestamp: tick.timestamp,
            last_sequence_id: tick.sequence_id,
            price_history: VecDeque::with_capacity(HISTORY_CAPACITY),
            volume_history: VecDeque::with_capacity(HISTORY_CAPACITY),
            tick_count: 0,
        };
        context.apply(tick);
        context
    }

    /// Fold an accepted tick into the rolling state.
    fn apply(&mut self, tick: &ValidatedTick) {
        if self.price_history.len() == HISTORY_CAPACITY {
            self.price_history.pop_front();
        }
        if self.volume_history.len() == HISTORY_CAPACITY {
            self.volume_history.pop_front();
        }
        self.price_history.push_back(tick.price);
        self.volume_history.push_back(tick.volume);

        self.last_price = tick.price;
        self.last_volume = tick.volume;
        self.last_timestamp = tick.timestamp;
        self.last_sequence_id = tick.sequence_id;
        self.tick_count += 1;
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn last_price(&self) -> Decimal {
        self.last_price
    }

    pub fn last_volume(&self) -> u64 {
        self.last_volume
    }

    pub fn last_timestamp(&self) -> UtcDateTime {
        self.last_timestamp
    }

    pub fn last_sequence_id(&self) -> Option<u64> {
        self.last_sequence_id
    }

    pub fn price_history(&self) -> impl Iterator<Item = &Decimal> {
        self.price_history.iter()
    }

    pub fn volume_history(&self) -> impl Iterator<Item = &u64> {
        self.volume_history.iter()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

/// Sharded store of per-symbol contexts.
///
/// Symbols hash to independent shards, so concurrent validation of
/// different symbols does not contend on one global lock. The engine holds
/// a shard's write lock across read-evaluate-fold, which serializes calls
/// for the same symbol in arrival order.
#[derive(Debug)]
pub struct ContextStore {
    shards: Vec<RwLock<HashMap<String, SymbolContext>>>,
}

impl Default for ContextStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextStore {
    pub fn new() -> Self {
        let shards = (0..SHARD_COUNT).map(|_| RwLock::new(HashMap::new())).collect();
        Self { shards }
    }

    /// Snapshot of a symbol's context. Read-only; no side effects.
    pub fn get(&self, symbol: &str) -> Option<SymbolContext> {
        let key = normalize_key(symbol);
        let shard = self
            .shard(&key)
            .read()
            .expect("context shard lock should not be poisoned");
        shard.get(&key).cloned()
    }

    /// Fold an accepted tick into its symbol's context, creating the
    /// context on first sighting. Called by the engine only after a
    /// non-rejected verdict.
    pub fn fold(&self, tick: &ValidatedTick) {
        let key = tick.symbol.as_str().to_owned();
        let mut shard = self
            .shard(&key)
            .write()
            .expect("context shard lock should not be poisoned");
        fold_locked(&mut shard, key, tick);
    }

    /// Symbols currently tracked, for diagnostics.
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self
            .shards
            .iter()
            .flat_map(|shard| {
                shard
                    .read()
                    .expect("context shard lock should not be poisoned")
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();
        symbols.sort_unstable();
        symbols
    }

    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| {
                shard
                    .read()
                    .expect("context shard lock should not be poisoned")
                    .len()
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn shard(&self, key: &str) -> &RwLock<HashMap<String, SymbolContext>> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        &self.shards[hasher.finish() as usize % SHARD_COUNT]
    }
}

pub(crate) fn fold_locked(
    shard: &mut HashMap<String, SymbolContext>,
    key: String,
    tick: &ValidatedTick,
) {
    match shard.get_mut(&key) {
        Some(context) => context.apply(tick),
        None => {
            shard.insert(key, SymbolContext::new(tick));
        }
    }
}

pub(crate) fn normalize_key(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase()
}
