//! Syndrome-indexed count tables.
//!
//! Every table here is restricted to a single fault weight at a single
//! location. Count tables answer "how many fault sets of this weight produce
//! this syndrome"; logical outcome tables answer, for the trailing EC, "how
//! many fault sets of this weight, given this input syndrome, leave the
//! decoded logical value at 0 or at 1".

use crate::CountError;
use alloc::vec::Vec;
use exrec_common::layout::Location;
use exrec_common::syndrome::{SYNDROME_SPACE, Syndrome};
use num_bigint::BigUint;
use num_traits::Zero;

/// Dense table of fault counts indexed by syndrome.
///
/// The index space is contiguous from zero. Leading-EC tables cover the full
/// block syndrome space; CNOT tables are indexed by combined syndrome and
/// only need to reach the largest syndrome that actually occurs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountTable {
    counts: Vec<BigUint>,
}

impl CountTable {
    /// Wraps already dense counts; index `s` is the count for syndrome `s`.
    pub fn new(counts: Vec<BigUint>) -> Self {
        Self { counts }
    }

    /// A table of `len` zero counts.
    pub fn zeros(len: usize) -> Self {
        Self {
            counts: alloc::vec![BigUint::zero(); len],
        }
    }

    /// Builds a dense table of length `len` from `(syndrome, count)` pairs.
    ///
    /// Repeated syndromes are summed.
    ///
    /// # Errors
    ///
    /// Returns `SyndromeOutOfRange` if a syndrome does not fit in `len`.
    pub fn from_entries<I>(len: usize, entries: I) -> Result<Self, CountError>
    where
        I: IntoIterator<Item = (Syndrome, BigUint)>,
    {
        let mut table = Self::zeros(len);
        for (s, count) in entries {
            let slot = table
                .counts
                .get_mut(s as usize)
                .ok_or(CountError::SyndromeOutOfRange { syndrome: s, len })?;
            *slot += count;
        }
        Ok(table)
    }

    /// Count for `syndrome`.
    ///
    /// # Panics
    ///
    /// Panics if `syndrome` is outside the table.
    #[inline(always)]
    pub fn get(&self, syndrome: Syndrome) -> &BigUint {
        &self.counts[syndrome as usize]
    }

    /// Size of the syndrome index space this table covers.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Syndromes with a non-zero count, in increasing order.
    pub fn support(&self) -> Vec<Syndrome> {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_zero())
            .map(|(s, _)| s as Syndrome)
            .collect()
    }

    /// Sum of all counts.
    pub fn total(&self) -> BigUint {
        self.counts.iter().sum()
    }
}

/// Trailing-EC logical outcome counts indexed by `[syndrome][logical bit]`.
///
/// Entry `[s][b]` is the number of fault sets of this weight in the trailing
/// EC that, starting from input syndrome `s`, leave an ideal decoding of the
/// output equal to `b`. Against an expected value `e`, `[s][e]` is the benign
/// count and `[s][!e]` the malignant count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalOutcomeTable {
    outcomes: Vec<[BigUint; 2]>,
}

impl LogicalOutcomeTable {
    /// # Errors
    ///
    /// Returns `InvalidOutcomeTable` unless there is exactly one entry per
    /// block syndrome.
    pub fn new(outcomes: Vec<[BigUint; 2]>) -> Result<Self, CountError> {
        if outcomes.len() != SYNDROME_SPACE {
            return Err(CountError::InvalidOutcomeTable {
                expected: SYNDROME_SPACE,
                got: outcomes.len(),
            });
        }
        Ok(Self { outcomes })
    }

    /// A table with no fault sets at any syndrome.
    pub fn zeros() -> Self {
        Self {
            outcomes: alloc::vec![[BigUint::zero(), BigUint::zero()]; SYNDROME_SPACE],
        }
    }

    /// The weight-zero table of an ideal trailing EC: the single empty fault
    /// set always decodes to `decode(s)`.
    pub fn ideal(decoder: &crate::DecodingTable) -> Self {
        let outcomes = (0..SYNDROME_SPACE as Syndrome)
            .map(|s| {
                if decoder.decode(s) {
                    [BigUint::zero(), BigUint::from(1u32)]
                } else {
                    [BigUint::from(1u32), BigUint::zero()]
                }
            })
            .collect();
        Self { outcomes }
    }

    /// Builds a table from `(syndrome, [count for 0, count for 1])` entries.
    /// Missing syndromes have zero counts; repeats are summed.
    pub fn from_entries<I>(entries: I) -> Result<Self, CountError>
    where
        I: IntoIterator<Item = (Syndrome, [BigUint; 2])>,
    {
        let mut table = Self::zeros();
        for (s, [zero, one]) in entries {
            let slot = table
                .outcomes
                .get_mut(s as usize)
                .ok_or(CountError::SyndromeOutOfRange {
                    syndrome: s,
                    len: SYNDROME_SPACE,
                })?;
            slot[0] += zero;
            slot[1] += one;
        }
        Ok(table)
    }

    /// Number of fault sets that decode to `logical` from input `syndrome`.
    #[inline(always)]
    pub fn count(&self, syndrome: Syndrome, logical: bool) -> &BigUint {
        &self.outcomes[syndrome as usize][logical as usize]
    }

    pub fn entry(&self, syndrome: Syndrome) -> &[BigUint; 2] {
        &self.outcomes[syndrome as usize]
    }

    /// Syndromes with any non-zero count.
    pub fn support(&self) -> Vec<Syndrome> {
        self.outcomes
            .iter()
            .enumerate()
            .filter(|(_, [a, b])| !a.is_zero() || !b.is_zero())
            .map(|(s, _)| s as Syndrome)
            .collect()
    }
}

/// Count tables for one location, indexed by fault weight, with the
/// non-zero syndromes of each weight precomputed.
#[derive(Debug, Clone, Default)]
pub struct WeightedCounts {
    tables: Vec<CountTable>,
    supports: Vec<Vec<Syndrome>>,
}

impl WeightedCounts {
    /// Takes one table per weight, `tables[k]` holding the `k`-fault counts,
    /// and records each table's support.
    pub fn new(tables: Vec<CountTable>) -> Self {
        let supports = tables.iter().map(CountTable::support).collect();
        Self { tables, supports }
    }

    /// Number of weights with a table (weights `0..num_weights()`).
    pub fn num_weights(&self) -> usize {
        self.tables.len()
    }

    /// Table for weight `k`.
    ///
    /// # Panics
    ///
    /// Panics if no table exists for `k`.
    pub fn table(&self, k: usize) -> &CountTable {
        &self.tables[k]
    }

    /// Syndromes realisable with exactly `k` faults.
    pub fn support(&self, k: usize) -> &[Syndrome] {
        &self.supports[k]
    }

    /// Checks that a table exists for weight `k` at `location`.
    ///
    /// # Errors
    ///
    /// Returns `MissingWeight` naming the location and the weights on hand.
    pub fn check_weight(&self, location: Location, k: usize) -> Result<(), CountError> {
        if k < self.tables.len() {
            Ok(())
        } else {
            Err(CountError::MissingWeight {
                location,
                weight: k,
                available: self.tables.len(),
            })
        }
    }

    /// All tables, in weight order.
    pub fn tables(&self) -> &[CountTable] {
        &self.tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DecodingTable;
    use alloc::vec;

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    #[test]
    fn support_skips_zero_counts() {
        let table = CountTable::new(vec![big(0), big(3), big(0), big(1)]);
        assert_eq!(table.support(), vec![1, 3]);
        assert_eq!(table.total(), big(4));
    }

    #[test]
    fn from_entries_sums_repeats_and_checks_range() {
        let table = CountTable::from_entries(4, [(2, big(5)), (2, big(7))]).unwrap();
        assert_eq!(table.get(2), &big(12));
        assert_eq!(
            CountTable::from_entries(4, [(4, big(1))]),
            Err(CountError::SyndromeOutOfRange { syndrome: 4, len: 4 })
        );
    }

    #[test]
    fn outcome_table_must_be_dense() {
        assert_eq!(
            LogicalOutcomeTable::new(vec![[big(1), big(0)]; 10]),
            Err(CountError::InvalidOutcomeTable {
                expected: SYNDROME_SPACE,
                got: 10
            })
        );
        let table = LogicalOutcomeTable::from_entries([(9, [big(2), big(3)])]).unwrap();
        assert_eq!(table.count(9, false), &big(2));
        assert_eq!(table.count(9, true), &big(3));
        assert_eq!(table.support(), vec![9]);
    }

    #[test]
    fn ideal_outcomes_follow_decoder() {
        let decoder = DecodingTable::golay();
        let table = LogicalOutcomeTable::ideal(decoder);
        for s in [0u32, 1, 3, 0x800, 0xFFF] {
            let d = decoder.decode(s);
            assert_eq!(table.count(s, d), &big(1));
            assert!(table.count(s, !d).is_zero());
        }
    }

    #[test]
    fn weighted_counts_report_missing_weights() {
        let weighted = WeightedCounts::new(vec![CountTable::new(vec![big(1)])]);
        assert_eq!(weighted.support(0), &[0]);
        assert!(weighted.check_weight(Location::LecA, 0).is_ok());
        assert_eq!(
            weighted.check_weight(Location::Cnot, 2),
            Err(CountError::MissingWeight {
                location: Location::Cnot,
                weight: 2,
                available: 1
            })
        );
    }
}
