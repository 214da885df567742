//! Fixed-size count tables addressed by the layout enumerations.

use exrec_common::layout::{EcConfig, LogicalError, NUM_EC, NUM_ERRORS, Outcome, TecPresence};
use num_bigint::BigUint;
use num_traits::Zero;

/// Counts for one block, indexed by `[trailing EC presence][outcome]`.
///
/// The `Removed` row records what the block's logical state would be with
/// its trailing EC taken out; the `Intact` row uses the trailing EC's actual
/// outcome counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockCounts {
    cells: [[BigUint; 2]; 2],
}

impl BlockCounts {
    /// All-zero counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count for one cell; see the type docs for the row meaning.
    #[inline(always)]
    pub fn get(&self, presence: TecPresence, outcome: Outcome) -> &BigUint {
        &self.cells[presence.index()][outcome.index()]
    }

    /// Overwrites one cell.
    #[inline(always)]
    pub fn set(&mut self, presence: TecPresence, outcome: Outcome, value: BigUint) {
        self.cells[presence.index()][outcome.index()] = value;
    }

    /// Adds `value` to one cell.
    #[inline(always)]
    pub fn add(&mut self, presence: TecPresence, outcome: Outcome, value: &BigUint) {
        self.cells[presence.index()][outcome.index()] += value;
    }

    /// Zeroes every cell, keeping the allocations.
    pub fn clear(&mut self) {
        for row in self.cells.iter_mut() {
            for cell in row.iter_mut() {
                cell.set_zero();
            }
        }
    }
}

/// Malignant counts for one configuration, indexed by `[ec][error]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaligTable {
    cells: [[BigUint; NUM_ERRORS]; NUM_EC],
}

impl MaligTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count for one `(ec, error)` cell.
    #[inline(always)]
    pub fn get(&self, ec: EcConfig, error: LogicalError) -> &BigUint {
        &self.cells[ec.index()][error.index()]
    }

    /// Mutable access to one cell.
    pub fn get_mut(&mut self, ec: EcConfig, error: LogicalError) -> &mut BigUint {
        &mut self.cells[ec.index()][error.index()]
    }

    /// Counts with both trailing ECs present, in `[IX, XI, XX]` order.
    pub fn intact(&self) -> &[BigUint; NUM_ERRORS] {
        &self.cells[EcConfig::BOTH_INTACT.index()]
    }

    /// Zeroes every cell.
    pub fn clear(&mut self) {
        for row in self.cells.iter_mut() {
            for cell in row.iter_mut() {
                cell.set_zero();
            }
        }
    }

    /// True when no cell holds a malignant count.
    pub fn is_zero(&self) -> bool {
        self.cells.iter().flatten().all(Zero::is_zero)
    }

    /// Adds the outer product of two block tables.
    ///
    /// For each `(ec, error)` the block A cell selected by
    /// `(ec.block_a(), error's A outcome)` is multiplied by the block B cell
    /// selected by `(ec.block_b(), error's B outcome)`.
    pub fn add_outer(&mut self, block_a: &BlockCounts, block_b: &BlockCounts) {
        for ec in EcConfig::ALL {
            for error in LogicalError::ALL {
                let (e_a, e_b) = error.block_outcomes();
                let a = block_a.get(ec.block_a(), e_a);
                let b = block_b.get(ec.block_b(), e_b);
                if a.is_zero() || b.is_zero() {
                    continue;
                }
                *self.get_mut(ec, error) += a * b;
            }
        }
    }

    /// Adds `other * factor` element-wise.
    pub fn add_scaled(&mut self, other: &MaligTable, factor: &BigUint) {
        if factor.is_zero() {
            return;
        }
        for (row, other_row) in self.cells.iter_mut().zip(other.cells.iter()) {
            for (cell, other_cell) in row.iter_mut().zip(other_row.iter()) {
                if !other_cell.is_zero() {
                    *cell += other_cell * factor;
                }
            }
        }
    }

    /// Iterates over `(ec, error, count)` in index order.
    pub fn iter(&self) -> impl Iterator<Item = (EcConfig, LogicalError, &BigUint)> {
        EcConfig::ALL.into_iter().flat_map(move |ec| {
            LogicalError::ALL
                .into_iter()
                .map(move |error| (ec, error, self.get(ec, error)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    #[test]
    fn outer_product_uses_bit_split() {
        let mut a = BlockCounts::new();
        a.set(TecPresence::Removed, Outcome::Benign, big(2));
        a.set(TecPresence::Removed, Outcome::Malignant, big(3));
        a.set(TecPresence::Intact, Outcome::Benign, big(5));
        a.set(TecPresence::Intact, Outcome::Malignant, big(7));
        let mut b = BlockCounts::new();
        b.set(TecPresence::Removed, Outcome::Benign, big(11));
        b.set(TecPresence::Removed, Outcome::Malignant, big(13));
        b.set(TecPresence::Intact, Outcome::Benign, big(17));
        b.set(TecPresence::Intact, Outcome::Malignant, big(19));

        let mut table = MaligTable::new();
        table.add_outer(&a, &b);

        // ec = 0: both removed
        let ec = EcConfig::from_index(0);
        assert_eq!(table.get(ec, LogicalError::IX), &big(2 * 13));
        assert_eq!(table.get(ec, LogicalError::XI), &big(3 * 11));
        assert_eq!(table.get(ec, LogicalError::XX), &big(3 * 13));
        // ec = 1: B intact only
        let ec = EcConfig::from_index(1);
        assert_eq!(table.get(ec, LogicalError::IX), &big(2 * 19));
        assert_eq!(table.get(ec, LogicalError::XI), &big(3 * 17));
        // ec = 2: A intact only
        let ec = EcConfig::from_index(2);
        assert_eq!(table.get(ec, LogicalError::XX), &big(7 * 13));
        // ec = 3: both intact
        assert_eq!(table.intact(), &[big(5 * 19), big(7 * 17), big(7 * 19)]);
    }

    #[test]
    fn add_scaled_and_clear() {
        let mut unit = MaligTable::new();
        *unit.get_mut(EcConfig::BOTH_INTACT, LogicalError::XI) = big(4);
        let mut total = MaligTable::new();
        total.add_scaled(&unit, &big(3));
        total.add_scaled(&unit, &big(0));
        assert_eq!(total.get(EcConfig::BOTH_INTACT, LogicalError::XI), &big(12));
        assert_eq!(total.iter().filter(|(_, _, c)| !c.is_zero()).count(), 1);
        total.clear();
        assert!(total.is_zero());
    }
}
