// Copyright (c) 2025-present, rule-list
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use super::Bitset;

/// Free list of fixed-width bitsets
///
/// Every live cache entry owns one uncaptured-samples bitset; entries that
/// lose their canonical slot hand theirs back here instead of freeing it.
/// Buffers come back dirty, so takers must fully overwrite them.
pub(crate) struct BitsetPool {
    bit_count: usize,
    free: Vec<Bitset>,
}

impl BitsetPool {
    pub(crate) fn new(bit_count: usize) -> Self {
        Self {
            bit_count,
            free: Vec::new(),
        }
    }

    /// Takes a buffer from the pool, or allocates a fresh one.
    pub(crate) fn acquire(&mut self) -> Bitset {
        self.free
            .pop()
            .unwrap_or_else(|| Bitset::zeroes(self.bit_count))
    }

    /// Returns a buffer to the pool.
    pub(crate) fn release(&mut self, bitset: Bitset) {
        debug_assert_eq!(self.bit_count, bitset.len());
        self.free.push(bitset);
    }

    #[cfg(test)]
    pub(crate) fn free_count(&self) -> usize {
        self.free.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn pool_recycles_buffers() {
        let mut pool = BitsetPool::new(100);

        let a = pool.acquire();
        let b = pool.acquire();
        assert_eq!(0, pool.free_count());

        pool.release(a);
        pool.release(b);
        assert_eq!(2, pool.free_count());

        let _c = pool.acquire();
        assert_eq!(1, pool.free_count());
    }
}
