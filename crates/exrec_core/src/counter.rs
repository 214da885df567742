//! Malignant set counting for a single fault configuration.
//!
//! Within one configuration every location has a fixed fault weight, so the
//! fault sets of the whole exRec are the product of the per-location fault
//! sets. The counter walks the realisable syndromes of the CNOT and both
//! leading ECs, and for the trailing ECs reads the precomputed logical
//! outcome counts at the syndrome each block arrives with.
//!
//! Block A's contribution depends on its leading-EC syndrome and the upper
//! half of the CNOT syndrome. Block B's depends on its own leading-EC
//! syndrome, the lower half of the CNOT syndrome, and block A's *decoded*
//! leading-EC value (the CNOT copies block A's X errors onto block B). It
//! does not depend on block A's trailing-EC outcome, so each block is
//! reduced to a 2x2 table once per iteration and the two are combined with a
//! fixed-size outer product.

use crate::DecodingTable;
use crate::outcome::{BlockCounts, MaligTable};
use crate::tables::{CountTable, LogicalOutcomeTable};
use exrec_common::layout::{Outcome, TecPresence};
use exrec_common::syndrome::{CombinedSyndrome, Syndrome, split_combined};

/// The weight-restricted inputs of one configuration.
///
/// Syndrome lists name the syndromes to iterate; the matching count tables
/// are indexed by those syndromes. Lists are normally the supports of their
/// tables, but any syndromes within range are accepted.
#[derive(Clone, Copy)]
pub struct ConfigTables<'a> {
    pub lec_a_syndromes: &'a [Syndrome],
    pub lec_b_syndromes: &'a [Syndrome],
    pub cnot_syndromes: &'a [CombinedSyndrome],
    pub lec_a_counts: &'a CountTable,
    pub lec_b_counts: &'a CountTable,
    pub cnot_counts: &'a CountTable,
    pub tec_a: &'a LogicalOutcomeTable,
    pub tec_b: &'a LogicalOutcomeTable,
}

impl ConfigTables<'_> {
    /// Number of inner-loop iterations this configuration costs.
    pub fn cost(&self) -> u64 {
        self.cnot_syndromes.len() as u64
            * self.lec_a_syndromes.len() as u64
            * self.lec_b_syndromes.len() as u64
    }
}

/// Counts malignant fault sets of one configuration by `[ec][error]`.
///
/// # Panics
///
/// Panics if a syndrome indexes outside its table or the decoding table.
pub fn count_config(decoder: &DecodingTable, tables: &ConfigTables<'_>) -> MaligTable {
    let mut malig = MaligTable::new();
    let mut malig_cnot = MaligTable::new();
    let mut block_a = BlockCounts::new();
    let mut sums_b = BlockCounts::new();

    for &s_c in tables.cnot_syndromes {
        let count_c = tables.cnot_counts.get(s_c);
        malig_cnot.clear();

        let (s_ca, s_cb) = split_combined(s_c);

        for &s_lec_a in tables.lec_a_syndromes {
            let count_lec_a = tables.lec_a_counts.get(s_lec_a);
            let s_a = s_lec_a ^ s_ca;
            let s_b1 = s_lec_a ^ s_cb;

            let decoded_lec_a = decoder.decode(s_lec_a);
            let a_outcome = Outcome::from_bit(decoder.decode(s_a) ^ decoded_lec_a);

            block_a.set(TecPresence::Removed, a_outcome, count_lec_a.clone());
            block_a.set(TecPresence::Removed, a_outcome.flip(), Default::default());
            block_a.set(
                TecPresence::Intact,
                Outcome::Benign,
                tables.tec_a.count(s_a, decoded_lec_a) * count_lec_a,
            );
            block_a.set(
                TecPresence::Intact,
                Outcome::Malignant,
                tables.tec_a.count(s_a, !decoded_lec_a) * count_lec_a,
            );

            sums_b.clear();
            for &s_lec_b in tables.lec_b_syndromes {
                let count_lec_b = tables.lec_b_counts.get(s_lec_b);
                let expected_b = decoder.decode(s_lec_b) ^ decoded_lec_a;
                let s_b = s_b1 ^ s_lec_b;
                let b_outcome = Outcome::from_bit(decoder.decode(s_b) ^ expected_b);

                sums_b.add(TecPresence::Removed, b_outcome, count_lec_b);
                sums_b.add(
                    TecPresence::Intact,
                    Outcome::Benign,
                    &(tables.tec_b.count(s_b, expected_b) * count_lec_b),
                );
                sums_b.add(
                    TecPresence::Intact,
                    Outcome::Malignant,
                    &(tables.tec_b.count(s_b, !expected_b) * count_lec_b),
                );
            }

            malig_cnot.add_outer(&block_a, &sums_b);
        }

        malig.add_scaled(&malig_cnot, count_c);
    }

    malig
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use exrec_common::layout::{EcConfig, LogicalError};
    use exrec_common::syndrome::{SYNDROME_SPACE, combine};
    use num_bigint::BigUint;
    use num_traits::Zero;

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    fn all_benign() -> LogicalOutcomeTable {
        LogicalOutcomeTable::new(vec![[big(1), big(0)]; SYNDROME_SPACE]).unwrap()
    }

    #[test]
    fn all_zero_input_has_no_logical_errors() {
        let unit = CountTable::new(vec![big(1)]);
        let tec = all_benign();
        let tables = ConfigTables {
            lec_a_syndromes: &[0],
            lec_b_syndromes: &[0],
            cnot_syndromes: &[0],
            lec_a_counts: &unit,
            lec_b_counts: &unit,
            cnot_counts: &unit,
            tec_a: &tec,
            tec_b: &tec,
        };
        let result = count_config(DecodingTable::golay(), &tables);
        assert!(result.is_zero());
        assert_eq!(tables.cost(), 1);
    }

    #[test]
    fn cnot_fault_on_block_a_is_xi_for_every_ec() {
        // Syndrome 1 on block A decodes to a logical error. A weight-zero
        // trailing EC decodes its input ideally, so removing it changes
        // nothing and every ec row sees the same XI count.
        let decoder = DecodingTable::golay();
        let lec = CountTable::new(vec![big(1)]);
        let mut cnot = vec![big(0); combine(1, 0) as usize + 1];
        cnot[combine(1, 0) as usize] = big(6);
        let cnot = CountTable::new(cnot);
        let tec = LogicalOutcomeTable::ideal(decoder);
        let tables = ConfigTables {
            lec_a_syndromes: &[0],
            lec_b_syndromes: &[0],
            cnot_syndromes: &[combine(1, 0)],
            lec_a_counts: &lec,
            lec_b_counts: &lec,
            cnot_counts: &cnot,
            tec_a: &tec,
            tec_b: &tec,
        };
        let result = count_config(decoder, &tables);
        for ec in EcConfig::ALL {
            for error in LogicalError::ALL {
                let expected = if error == LogicalError::XI {
                    big(6)
                } else {
                    BigUint::zero()
                };
                assert_eq!(result.get(ec, error), &expected, "{:?} {:?}", ec, error);
            }
        }
    }

    #[test]
    fn faulty_trailing_ec_is_only_seen_when_intact() {
        // The trailing EC flips the logical value for one of its two fault
        // sets on each block, starting from a clean input.
        let lec = CountTable::new(vec![big(1)]);
        let tec = LogicalOutcomeTable::from_entries([(0, [big(1), big(1)])]).unwrap();
        let tables = ConfigTables {
            lec_a_syndromes: &[0],
            lec_b_syndromes: &[0],
            cnot_syndromes: &[0],
            lec_a_counts: &lec,
            lec_b_counts: &lec,
            cnot_counts: &lec,
            tec_a: &tec,
            tec_b: &tec,
        };
        let result = count_config(DecodingTable::golay(), &tables);
        let row = |ec: usize| -> [BigUint; 3] {
            LogicalError::ALL.map(|e| result.get(EcConfig::from_index(ec), e).clone())
        };
        assert_eq!(row(0), [big(0), big(0), big(0)]);
        assert_eq!(row(1), [big(1), big(0), big(0)]);
        assert_eq!(row(2), [big(0), big(1), big(0)]);
        assert_eq!(row(3), [big(1), big(1), big(1)]);
    }

    #[test]
    fn leading_error_on_a_propagates_expectation_to_b() {
        // A leading-EC syndrome that decodes to 1 on block A is copied onto
        // block B by the CNOT; block B's expected value flips with it, so an
        // ideal pipeline still reports nothing.
        let decoder = DecodingTable::golay();
        let mut lec = vec![big(0); SYNDROME_SPACE];
        lec[0] = big(1);
        lec[1] = big(2);
        let lec = CountTable::new(lec);
        let cnot = CountTable::new(vec![big(1)]);
        let tec = LogicalOutcomeTable::ideal(decoder);
        let tables = ConfigTables {
            lec_a_syndromes: &[0, 1],
            lec_b_syndromes: &[0, 1],
            cnot_syndromes: &[0],
            lec_a_counts: &lec,
            lec_b_counts: &lec,
            cnot_counts: &cnot,
            tec_a: &tec,
            tec_b: &tec,
        };
        let result = count_config(decoder, &tables);
        assert!(result.is_zero());
        assert_eq!(tables.cost(), 4);
    }
}
