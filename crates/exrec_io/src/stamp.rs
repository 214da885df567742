//! Run identity recorded in checkpoints.

use crate::writer::decoder_to_bytes;
use exrec_core::{BatchInputs, Configuration, DecodingTable, LogicalOutcomeTable, WeightedCounts};
use sha2::{Digest, Sha256};

/// Identifies the work a checkpoint belongs to.
///
/// `digest` is a SHA-256 over `k_max`, the decoding table, every input
/// table and the ordered configuration list. A checkpoint may only be
/// resumed by a run with an equal stamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStamp {
    /// Lowercase hex, 64 characters.
    pub digest: String,
    /// Length of the configuration list.
    pub configs: usize,
}

/// Header of a checkpoint file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    pub stamp: RunStamp,
    /// Configurations already folded into the histogram, as a prefix of the
    /// stamped list.
    pub done: usize,
}

fn hash_len(hasher: &mut Sha256, n: usize) {
    hasher.update((n as u64).to_le_bytes());
}

fn hash_counts(hasher: &mut Sha256, counts: &WeightedCounts) {
    hash_len(hasher, counts.num_weights());
    for k in 0..counts.num_weights() {
        let table = counts.table(k);
        let support = counts.support(k);
        hash_len(hasher, table.len());
        hash_len(hasher, support.len());
        for &s in support {
            let bytes = table.get(s).to_bytes_le();
            hasher.update(s.to_le_bytes());
            hash_len(hasher, bytes.len());
            hasher.update(&bytes);
        }
    }
}

fn hash_outcomes(hasher: &mut Sha256, tec: &[LogicalOutcomeTable]) {
    hash_len(hasher, tec.len());
    for table in tec {
        let support = table.support();
        hash_len(hasher, support.len());
        for s in support {
            hasher.update(s.to_le_bytes());
            for count in table.entry(s) {
                let bytes = count.to_bytes_le();
                hash_len(hasher, bytes.len());
                hasher.update(&bytes);
            }
        }
    }
}

impl RunStamp {
    /// Stamps a run over `configs` in the given order.
    pub fn new(
        decoder: &DecodingTable,
        inputs: &BatchInputs,
        configs: &[Configuration],
        k_max: usize,
    ) -> Self {
        let mut hasher = Sha256::new();
        hash_len(&mut hasher, k_max);
        hasher.update(decoder_to_bytes(decoder));
        hash_counts(&mut hasher, &inputs.lec);
        hash_counts(&mut hasher, &inputs.cnot);
        hash_outcomes(&mut hasher, &inputs.tec);
        hash_len(&mut hasher, configs.len());
        for config in configs {
            for k in config.as_array() {
                hash_len(&mut hasher, k);
            }
        }

        Self {
            digest: hasher
                .finalize()
                .iter()
                .map(|byte| format!("{:02x}", byte))
                .collect(),
            configs: configs.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exrec_core::CountTable;
    use num_bigint::BigUint;

    fn inputs(lec_count: u32) -> BatchInputs {
        let lec = WeightedCounts::new(vec![CountTable::new(vec![BigUint::from(lec_count); 4])]);
        let cnot = WeightedCounts::new(vec![CountTable::new(vec![BigUint::from(1u32)])]);
        BatchInputs::new(lec, cnot, vec![LogicalOutcomeTable::zeros()])
    }

    #[test]
    fn stamp_follows_every_part_of_the_run() {
        let golay = DecodingTable::golay();
        let configs = vec![Configuration::default(), Configuration::new(0, 0, 0, 0, 1)];
        let base = RunStamp::new(golay, &inputs(1), &configs, 2);
        assert_eq!(base.digest.len(), 64);
        assert_eq!(base.configs, 2);
        assert_eq!(base, RunStamp::new(golay, &inputs(1), &configs, 2));

        let reordered: Vec<_> = configs.iter().rev().copied().collect();
        assert_ne!(base, RunStamp::new(golay, &inputs(1), &reordered, 2));
        assert_ne!(base, RunStamp::new(golay, &inputs(1), &configs[..1], 2));
        assert_ne!(base, RunStamp::new(golay, &inputs(2), &configs, 2));
        assert_ne!(base, RunStamp::new(golay, &inputs(1), &configs, 3));
    }
}
