// Copyright (c) 2025-present, rule-list
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::bitset::Bitset;
use crate::config::MapType;
use crate::rules::AntecedentId;
use rustc_hash::FxHashMap;

/// Index of a cache entry
pub(crate) type EntryId = usize;

/// Canonical key of a prefix equivalence class
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) enum CacheKey {
    /// The antecedent ids of the prefix, sorted ascending
    Prefix(Box<[AntecedentId]>),

    /// The uncaptured bitvector; orderings with equal capture collapse
    Captured(Box<[u64]>),
}

/// Summary of one visited prefix
///
/// Self-sufficient for expansion: the scheduler never needs to walk
/// parent links, so tombstoned parents are harmless.
pub(crate) struct Entry {
    /// Antecedent ids in evaluation order
    pub prefix: Box<[AntecedentId]>,

    /// Majority prediction within each incremental capture set
    pub predictions: Box<[bool]>,

    /// Majority prediction over the uncaptured samples
    pub default_prediction: bool,

    /// Hierarchical objective lower bound
    pub lower_bound: f64,

    /// Lower bound plus default rule error
    pub objective: f64,

    /// Uncaptured samples; handed back to the pool on tombstoning
    pub not_captured: Option<Bitset>,

    /// Cache entry of the parent prefix, if any
    pub parent: Option<EntryId>,

    /// Tombstone; set when a superior representative arrived
    pub deleted: bool,
}

impl Entry {
    /// Prefix length k
    pub(crate) fn len(&self) -> usize {
        self.prefix.len()
    }

    pub(crate) fn not_captured(&self) -> &Bitset {
        self.not_captured
            .as_ref()
            .expect("live entry should own its uncaptured bitset")
    }
}

/// Result of attempting to insert a candidate prefix
pub(crate) enum InsertOutcome {
    /// The candidate is the first of its equivalence class
    Inserted(EntryId),

    /// The candidate beat the stored representative, which is now
    /// tombstoned; its bitset is handed back for recycling
    Replaced(EntryId, Bitset),

    /// An equal-or-better representative exists; the candidate is
    /// handed back untouched
    Rejected(Entry),
}

/// Canonical storage of visited prefixes
///
/// One live entry per equivalence class (for the canonicalizing map
/// types). Entries are never physically removed, only tombstoned, so
/// entry ids stay stable for parent links and the queue.
pub(crate) struct PrefixCache {
    map_type: MapType,
    index: FxHashMap<CacheKey, EntryId>,
    entries: Vec<Entry>,
}

impl PrefixCache {
    pub(crate) fn new(map_type: MapType) -> Self {
        Self {
            map_type,
            index: FxHashMap::default(),
            entries: Vec::new(),
        }
    }

    /// Total number of entries, tombstoned included
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn entry(&self, id: EntryId) -> &Entry {
        self.entries.get(id).expect("entry id should exist")
    }

    pub(crate) fn entry_mut(&mut self, id: EntryId) -> &mut Entry {
        self.entries.get_mut(id).expect("entry id should exist")
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    fn key_of(&self, entry: &Entry) -> Option<CacheKey> {
        match self.map_type {
            MapType::None => None,
            MapType::Prefix => {
                let mut ids = entry.prefix.to_vec();
                ids.sort_unstable();
                Some(CacheKey::Prefix(ids.into_boxed_slice()))
            }
            MapType::Captured => Some(CacheKey::Captured(entry.not_captured().words().into())),
        }
    }

    /// Inserts a candidate following the canonicalization protocol:
    /// first of its class wins outright, a better objective displaces
    /// the stored representative, anything else is rejected.
    pub(crate) fn insert(&mut self, entry: Entry) -> crate::Result<InsertOutcome> {
        self.entries.try_reserve(1)?;

        let Some(key) = self.key_of(&entry) else {
            let id = self.entries.len();
            self.entries.push(entry);
            return Ok(InsertOutcome::Inserted(id));
        };

        if let Some(&stored_id) = self.index.get(&key) {
            let stored = self.entry(stored_id);

            if entry.objective < stored.objective {
                let recycled = self.tombstone(stored_id);

                let id = self.entries.len();
                self.entries.push(entry);
                self.index.insert(key, id);

                return Ok(InsertOutcome::Replaced(
                    id,
                    recycled.expect("displaced entry should have been live"),
                ));
            }

            return Ok(InsertOutcome::Rejected(entry));
        }

        self.index.try_reserve(1)?;

        let id = self.entries.len();
        self.entries.push(entry);
        self.index.insert(key, id);

        Ok(InsertOutcome::Inserted(id))
    }

    /// Marks an entry deleted and takes its bitset for recycling.
    pub(crate) fn tombstone(&mut self, id: EntryId) -> Option<Bitset> {
        let entry = self.entry_mut(id);
        entry.deleted = true;
        entry.not_captured.take()
    }
}
