//! Fault configurations of the CNOT exRec.
//!
//! A configuration fixes how many faults occur at each of the five exRec
//! locations. The counting problem for a total weight `k` is the sum over
//! every configuration whose weights add up to `k`.

use alloc::vec::Vec;
use exrec_common::layout::{Location, NUM_LOCATIONS};

/// Number of errors the Golay code corrects. Every configuration of this
/// weight or less is benign.
pub const GOLAY_CORRECTABLE: usize = 3;

/// Fault weights assigned to the exRec locations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Configuration {
    pub lec_a: usize,
    pub lec_b: usize,
    pub cnot: usize,
    pub tec_a: usize,
    pub tec_b: usize,
}

impl Configuration {
    pub fn new(lec_a: usize, lec_b: usize, cnot: usize, tec_a: usize, tec_b: usize) -> Self {
        Self {
            lec_a,
            lec_b,
            cnot,
            tec_a,
            tec_b,
        }
    }

    /// Total number of faults in the exRec.
    pub fn total_weight(&self) -> usize {
        self.lec_a + self.lec_b + self.cnot + self.tec_a + self.tec_b
    }

    pub fn weight(&self, location: Location) -> usize {
        match location {
            Location::LecA => self.lec_a,
            Location::LecB => self.lec_b,
            Location::Cnot => self.cnot,
            Location::TecA => self.tec_a,
            Location::TecB => self.tec_b,
        }
    }

    /// Exchanges the roles of blocks A and B in both ECs.
    pub fn swap_blocks(&self) -> Self {
        Self {
            lec_a: self.lec_b,
            lec_b: self.lec_a,
            cnot: self.cnot,
            tec_a: self.tec_b,
            tec_b: self.tec_a,
        }
    }

    /// True when neither the CNOT nor the trailing ECs contain faults.
    pub fn is_leading_only(&self) -> bool {
        self.cnot == 0 && self.tec_a == 0 && self.tec_b == 0
    }

    pub fn as_array(&self) -> [usize; NUM_LOCATIONS] {
        [self.lec_a, self.lec_b, self.cnot, self.tec_a, self.tec_b]
    }
}

impl From<[usize; NUM_LOCATIONS]> for Configuration {
    fn from(k: [usize; NUM_LOCATIONS]) -> Self {
        Self::new(k[0], k[1], k[2], k[3], k[4])
    }
}

impl core::fmt::Display for Configuration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}, {})",
            self.lec_a, self.lec_b, self.cnot, self.tec_a, self.tec_b
        )
    }
}

/// Iterates over every way to split `whole` faults across the five locations.
///
/// Part `i` never exceeds `max_parts[i]`. Splits are produced with the
/// earliest location taking as many faults as it can first.
#[derive(Debug, Clone)]
pub struct PartitionIter {
    max_parts: [usize; NUM_LOCATIONS],
    current: Option<[usize; NUM_LOCATIONS]>,
}

impl PartitionIter {
    pub fn new(whole: usize, max_parts: [usize; NUM_LOCATIONS]) -> Self {
        let current = Self::fill(whole, &max_parts, 0, [0; NUM_LOCATIONS]);
        Self { max_parts, current }
    }

    /// Greedily places `remaining` faults into parts `from..`, or `None` if
    /// they do not fit.
    fn fill(
        mut remaining: usize,
        max_parts: &[usize; NUM_LOCATIONS],
        from: usize,
        mut parts: [usize; NUM_LOCATIONS],
    ) -> Option<[usize; NUM_LOCATIONS]> {
        for i in from..NUM_LOCATIONS {
            parts[i] = remaining.min(max_parts[i]);
            remaining -= parts[i];
        }
        (remaining == 0).then_some(parts)
    }

    fn advance(&self, parts: [usize; NUM_LOCATIONS]) -> Option<[usize; NUM_LOCATIONS]> {
        // Decrement the rightmost part that can give one fault to the parts
        // after it, then refill those greedily.
        for i in (0..NUM_LOCATIONS - 1).rev() {
            if parts[i] == 0 {
                continue;
            }
            let rest: usize = parts[i + 1..].iter().sum::<usize>() + 1;
            let mut next = parts;
            next[i] -= 1;
            if let Some(filled) = Self::fill(rest, &self.max_parts, i + 1, next) {
                return Some(filled);
            }
        }
        None
    }
}

impl Iterator for PartitionIter {
    type Item = Configuration;

    fn next(&mut self) -> Option<Self::Item> {
        let parts = self.current?;
        self.current = self.advance(parts);
        Some(Configuration::from(parts))
    }
}

/// Fault-count limits that decide which configurations are counted.
///
/// Configurations with more faults than some component's good limit are
/// bounded rather than counted; this type reproduces that split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigSpace {
    /// Maximum faults counted in one EC.
    pub k_good_ec: usize,
    /// Maximum faults counted in the transversal CNOT.
    pub k_good_cnot: usize,
    /// Maximum total faults counted in the exRec.
    pub k_good_exrec: usize,
    /// Joint limits `[lec_a, lec_b, cnot]`. A configuration that exceeds
    /// all three (in either block order) is bounded, not counted.
    pub k_good_lec_cnot: [usize; 3],
}

/// Configurations to count (`good`) and to bound (`bad`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSplit {
    pub good: Vec<Configuration>,
    pub bad: Vec<Configuration>,
}

impl ConfigSpace {
    fn max_parts(&self) -> [usize; NUM_LOCATIONS] {
        [
            self.k_good_ec,
            self.k_good_ec,
            self.k_good_cnot,
            self.k_good_ec,
            self.k_good_ec,
        ]
    }

    fn is_bad(&self, c: &Configuration) -> bool {
        let [la, lb, lc] = self.k_good_lec_cnot;
        c.cnot > lc && ((c.lec_a > la && c.lec_b > lb) || (c.lec_a > lb && c.lec_b > la))
    }

    /// Enumerates every configuration from weight `GOLAY_CORRECTABLE + 1`
    /// up to `k_good_exrec`.
    ///
    /// Good configurations whose faults all sit in the leading ECs are
    /// dropped: the leading ECs alone cannot fail the exRec.
    pub fn enumerate(&self) -> ConfigSplit {
        let mut split = ConfigSplit::default();
        for k in GOLAY_CORRECTABLE + 1..=self.k_good_exrec {
            for config in PartitionIter::new(k, self.max_parts()) {
                if self.is_bad(&config) {
                    split.bad.push(config);
                } else if !config.is_leading_only() {
                    split.good.push(config);
                }
            }
        }
        log::debug!(
            "enumerated {} good and {} bad configurations up to k={}",
            split.good.len(),
            split.bad.len(),
            self.k_good_exrec
        );
        split
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn partitions_respect_limits_and_order() {
        let parts: Vec<[usize; 5]> = PartitionIter::new(3, [3, 1, 2, 0, 0])
            .map(|c| c.as_array())
            .collect();
        assert_eq!(
            parts,
            vec![
                [3, 0, 0, 0, 0],
                [2, 1, 0, 0, 0],
                [2, 0, 1, 0, 0],
                [1, 1, 1, 0, 0],
                [1, 0, 2, 0, 0],
                [0, 1, 2, 0, 0],
            ]
        );
    }

    #[test]
    fn partition_count_matches_stars_and_bars() {
        // C(k + 4, 4) unconstrained splits of k into five parts.
        assert_eq!(PartitionIter::new(0, [9; 5]).count(), 1);
        assert_eq!(PartitionIter::new(4, [9; 5]).count(), 70);
        assert_eq!(PartitionIter::new(6, [6; 5]).count(), 210);
        assert!(PartitionIter::new(6, [6; 5]).all(|c| c.total_weight() == 6));
        assert_eq!(PartitionIter::new(11, [2; 5]).count(), 0);
    }

    #[test]
    fn swap_blocks_is_an_involution() {
        let c = Configuration::new(1, 2, 3, 4, 5);
        assert_eq!(c.swap_blocks(), Configuration::new(2, 1, 3, 5, 4));
        assert_eq!(c.swap_blocks().swap_blocks(), c);
        assert_eq!(c.total_weight(), 15);
        assert_eq!(c.weight(Location::TecB), 5);
    }

    #[test]
    fn config_space_split() {
        let space = ConfigSpace {
            k_good_ec: 5,
            k_good_cnot: 3,
            k_good_exrec: 6,
            k_good_lec_cnot: [1, 1, 1],
        };
        let split = space.enumerate();
        assert!(split.good.iter().all(|c| !c.is_leading_only()));
        assert!(split.good.iter().chain(&split.bad).all(|c| {
            (GOLAY_CORRECTABLE + 1..=6).contains(&c.total_weight()) && c.cnot <= 3
        }));
        assert!(split.bad.contains(&Configuration::new(2, 2, 2, 0, 0)));
        assert!(!split.good.contains(&Configuration::new(4, 0, 0, 0, 0)));
        assert!(split.good.contains(&Configuration::new(0, 0, 0, 2, 2)));
    }
}
