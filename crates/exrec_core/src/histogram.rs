//! Weight-indexed histograms of malignant counts.

use crate::CountError;
use crate::outcome::MaligTable;
use alloc::vec::Vec;
use exrec_common::layout::{EcConfig, LogicalError, NUM_EC, NUM_ERRORS};
use num_bigint::BigUint;
use num_traits::Zero;

/// Malignant counts indexed by `[ec][error][k]` for `k` in `0..=k_max`.
///
/// Created zeroed and only ever added to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaligHistogram {
    k_max: usize,
    cells: [[Vec<BigUint>; NUM_ERRORS]; NUM_EC],
}

impl MaligHistogram {
    pub fn zeros(k_max: usize) -> Self {
        let column = || alloc::vec![BigUint::zero(); k_max + 1];
        Self {
            k_max,
            cells: core::array::from_fn(|_| core::array::from_fn(|_| column())),
        }
    }

    pub fn k_max(&self) -> usize {
        self.k_max
    }

    pub fn get(&self, ec: EcConfig, error: LogicalError, k: usize) -> &BigUint {
        &self.cells[ec.index()][error.index()][k]
    }

    /// Counts for every weight `0..=k_max` of one `(ec, error)` cell.
    pub fn column(&self, ec: EcConfig, error: LogicalError) -> &[BigUint] {
        &self.cells[ec.index()][error.index()]
    }

    /// Adds `count` to the `(ec, error, k)` cell.
    ///
    /// # Panics
    ///
    /// Panics if `k > k_max`.
    pub fn add(&mut self, ec: EcConfig, error: LogicalError, k: usize, count: &BigUint) {
        assert!(k <= self.k_max, "weight {} exceeds k_max {}", k, self.k_max);
        self.cells[ec.index()][error.index()][k] += count;
    }

    /// Adds a configuration's table into weight bucket `k`.
    ///
    /// # Panics
    ///
    /// Panics if `k > k_max`.
    pub fn add_table(&mut self, k: usize, table: &MaligTable) {
        assert!(k <= self.k_max, "weight {} exceeds k_max {}", k, self.k_max);
        for (ec, error, count) in table.iter() {
            if !count.is_zero() {
                self.cells[ec.index()][error.index()][k] += count;
            }
        }
    }

    /// Adds another histogram element-wise.
    ///
    /// # Errors
    ///
    /// Returns `HistogramShapeMismatch` if the weight ranges differ.
    pub fn merge(&mut self, other: &MaligHistogram) -> Result<(), CountError> {
        if self.k_max != other.k_max {
            return Err(CountError::HistogramShapeMismatch {
                left: self.k_max,
                right: other.k_max,
            });
        }
        for (row, other_row) in self.cells.iter_mut().zip(other.cells.iter()) {
            for (column, other_column) in row.iter_mut().zip(other_row.iter()) {
                for (cell, other_cell) in column.iter_mut().zip(other_column.iter()) {
                    *cell += other_cell;
                }
            }
        }
        Ok(())
    }

    /// Exchanges the roles of blocks A and B.
    ///
    /// Counting with the blocks swapped (as done for Z errors, which the
    /// CNOT propagates from target to control) produces IX where XI is meant
    /// and swaps the trailing-EC bits; this undoes both.
    pub fn swap_blocks(&self) -> Self {
        let mut swapped = Self::zeros(self.k_max);
        for ec in EcConfig::ALL {
            for error in LogicalError::ALL {
                swapped.cells[ec.swapped().index()][error.swapped().index()] =
                    self.column(ec, error).to_vec();
            }
        }
        swapped
    }

    /// Iterates over `(ec, error, k, count)` in index order.
    pub fn iter(&self) -> impl Iterator<Item = (EcConfig, LogicalError, usize, &BigUint)> {
        EcConfig::ALL.into_iter().flat_map(move |ec| {
            LogicalError::ALL.into_iter().flat_map(move |error| {
                self.column(ec, error)
                    .iter()
                    .enumerate()
                    .map(move |(k, count)| (ec, error, k, count))
            })
        })
    }

    pub fn is_zero(&self) -> bool {
        self.iter().all(|(_, _, _, c)| c.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    #[test]
    fn add_table_lands_in_one_weight() {
        let mut table = MaligTable::new();
        *table.get_mut(EcConfig::from_index(1), LogicalError::XX) = big(9);
        let mut hist = MaligHistogram::zeros(4);
        hist.add_table(2, &table);
        hist.add_table(2, &table);
        assert_eq!(hist.get(EcConfig::from_index(1), LogicalError::XX, 2), &big(18));
        assert_eq!(hist.iter().filter(|(_, _, _, c)| !c.is_zero()).count(), 1);
    }

    #[test]
    #[should_panic]
    fn add_table_above_k_max_panics() {
        MaligHistogram::zeros(1).add_table(2, &MaligTable::new());
    }

    #[test]
    fn merge_requires_matching_shape() {
        let mut a = MaligHistogram::zeros(2);
        let mut b = MaligHistogram::zeros(2);
        b.add(EcConfig::BOTH_INTACT, LogicalError::IX, 1, &big(5));
        a.merge(&b).unwrap();
        a.merge(&b).unwrap();
        assert_eq!(a.get(EcConfig::BOTH_INTACT, LogicalError::IX, 1), &big(10));
        assert_eq!(
            a.merge(&MaligHistogram::zeros(3)),
            Err(CountError::HistogramShapeMismatch { left: 2, right: 3 })
        );
    }

    #[test]
    fn swap_blocks_permutes_errors_and_ec_bits() {
        let mut hist = MaligHistogram::zeros(1);
        hist.add(EcConfig::from_index(1), LogicalError::IX, 0, &big(3));
        hist.add(EcConfig::from_index(3), LogicalError::XX, 1, &big(4));
        let swapped = hist.swap_blocks();
        assert_eq!(swapped.get(EcConfig::from_index(2), LogicalError::XI, 0), &big(3));
        assert_eq!(swapped.get(EcConfig::from_index(3), LogicalError::XX, 1), &big(4));
        assert_eq!(swapped.swap_blocks(), hist);
    }
}
