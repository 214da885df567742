//! Synthetic counting inputs for benchmarks and end-to-end tests.
//!
//! Models every location as a pool of independent single faults, each with
//! a random syndrome. A weight-`k` fault set is a `k`-subset of the pool and
//! its syndrome is the XOR of its members, so the weight-`k` count table is
//! the number of `k`-subsets reaching each syndrome. The trailing EC applies
//! its fault set to the incoming syndrome and then decodes ideally, which
//! makes its weight-zero table exactly the ideal decoder's.

use anyhow::{Result, ensure};
use exrec_common::syndrome::{SYNDROME_BITS, SYNDROME_SPACE, Syndrome, combine};
use exrec_core::{CountTable, DecodingTable, LogicalOutcomeTable, WeightedCounts};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::path::Path;

/// Parameters of a synthetic data set.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticParams {
    /// Largest fault weight tabulated at each location.
    pub max_weight: usize,
    /// Single faults per location.
    pub pool_size: usize,
    /// Bits of block A a CNOT fault may touch; bounds the CNOT table size.
    pub cnot_span_bits: u32,
    pub seed: u64,
}

/// Generated inputs, ready to count or save.
pub struct SyntheticData {
    pub lec: WeightedCounts,
    pub cnot: WeightedCounts,
    pub tec: Vec<LogicalOutcomeTable>,
}

/// Counts `k`-subsets of `pool` by XOR for every `k` up to `max_weight`.
///
/// `space` must be a power of two above every pool element.
fn subset_xor_counts(pool: &[u32], space: usize, max_weight: usize) -> Vec<Vec<BigUint>> {
    let mut counts = vec![vec![BigUint::zero(); space]; max_weight + 1];
    counts[0][0] = BigUint::one();
    for &fault in pool {
        for k in (1..=max_weight).rev() {
            let (lower, upper) = counts.split_at_mut(k);
            let (from, to) = (&lower[k - 1], &mut upper[0]);
            for (s, count) in from.iter().enumerate() {
                if !count.is_zero() {
                    to[s ^ fault as usize] += count;
                }
            }
        }
    }
    counts
}

/// Trailing-EC outcomes when the EC's own faults shift the syndrome by a
/// draw from `faults` before an ideal decode.
fn trailing_outcomes(
    decoder: &DecodingTable,
    faults: &CountTable,
) -> Result<LogicalOutcomeTable> {
    let support = faults.support();
    let outcomes: Vec<[BigUint; 2]> = (0..SYNDROME_SPACE as Syndrome)
        .into_par_iter()
        .map(|s| {
            let mut entry = [BigUint::zero(), BigUint::zero()];
            for &t in &support {
                entry[decoder.decode(s ^ t) as usize] += faults.get(t);
            }
            entry
        })
        .collect();
    Ok(LogicalOutcomeTable::new(outcomes)?)
}

/// Draws a synthetic data set.
pub fn generate(decoder: &DecodingTable, params: &SyntheticParams) -> Result<SyntheticData> {
    ensure!(
        params.cnot_span_bits <= SYNDROME_BITS,
        "CNOT span of {} bits exceeds a block syndrome",
        params.cnot_span_bits
    );
    let mut rng = StdRng::seed_from_u64(params.seed);

    let block_pool: Vec<u32> = (0..params.pool_size)
        .map(|_| rng.gen_range(1..SYNDROME_SPACE as u32))
        .collect();
    let cnot_pool: Vec<u32> = (0..params.pool_size)
        .map(|_| {
            let a = rng.gen_range(0..1u32 << params.cnot_span_bits);
            let b = rng.gen_range(0..SYNDROME_SPACE as u32);
            combine(a, b)
        })
        .collect();

    let lec_tables: Vec<CountTable> =
        subset_xor_counts(&block_pool, SYNDROME_SPACE, params.max_weight)
            .into_iter()
            .map(CountTable::new)
            .collect();
    let cnot_space = 1usize << (SYNDROME_BITS + params.cnot_span_bits);
    let cnot_tables: Vec<CountTable> =
        subset_xor_counts(&cnot_pool, cnot_space, params.max_weight)
            .into_iter()
            .map(CountTable::new)
            .collect();

    // Trailing ECs share the leading ECs' fault model.
    let tec = lec_tables
        .iter()
        .map(|faults| trailing_outcomes(decoder, faults))
        .collect::<Result<Vec<_>>>()?;

    Ok(SyntheticData {
        lec: WeightedCounts::new(lec_tables),
        cnot: WeightedCounts::new(cnot_tables),
        tec,
    })
}

/// Generates a data set and writes `lec.counts`, `cnot.counts`,
/// `tec.outcomes` and `decoder.b8` into `out_dir`.
pub fn generate_to_dir(
    out_dir: &Path,
    decoder: &DecodingTable,
    params: &SyntheticParams,
) -> Result<()> {
    println!(
        "Generating synthetic exRec tables (max weight {}, pool {}, seed {})...",
        params.max_weight, params.pool_size, params.seed
    );
    let data = generate(decoder, params)?;

    std::fs::create_dir_all(out_dir)?;
    exrec_io::save_counts(out_dir.join("lec.counts"), &data.lec)?;
    exrec_io::save_counts(out_dir.join("cnot.counts"), &data.cnot)?;
    exrec_io::save_outcomes(out_dir.join("tec.outcomes"), &data.tec)?;
    exrec_io::save_decoder_file(out_dir.join("decoder.b8"), decoder)?;

    for k in 0..data.lec.num_weights() {
        println!(
            "weight {}: {} LEC syndromes, {} CNOT syndromes",
            k,
            data.lec.support(k).len(),
            data.cnot.support(k).len()
        );
    }
    println!("Wrote tables to {}", out_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SyntheticParams {
        SyntheticParams {
            max_weight: 2,
            pool_size: 6,
            cnot_span_bits: 2,
            seed: 7,
        }
    }

    #[test]
    fn subset_counts_are_binomial() {
        let counts = subset_xor_counts(&[1, 2, 4, 8], 16, 3);
        let totals: Vec<BigUint> = counts.iter().map(|row| row.iter().sum()).collect();
        assert_eq!(totals, [1u32, 4, 6, 4].map(BigUint::from));
        assert_eq!(counts[2][3], BigUint::one());
        assert!(counts[2][1].is_zero());
    }

    #[test]
    fn weight_zero_is_ideal() {
        let decoder = DecodingTable::golay();
        let data = generate(decoder, &params()).unwrap();
        assert_eq!(data.lec.support(0), &[0]);
        assert_eq!(data.cnot.support(0), &[0]);
        assert_eq!(data.tec[0], LogicalOutcomeTable::ideal(decoder));
        assert_eq!(data.tec.len(), 3);
    }

    #[test]
    fn seed_fixes_the_data() {
        let decoder = DecodingTable::golay();
        let a = generate(decoder, &params()).unwrap();
        let b = generate(decoder, &params()).unwrap();
        assert_eq!(a.lec.tables(), b.lec.tables());
        assert_eq!(a.cnot.tables(), b.cnot.tables());
        for table in a.cnot.tables() {
            assert_eq!(table.len(), 1 << (SYNDROME_BITS + 2));
        }
        // Every trailing-EC fault set lands on exactly one logical value.
        for (k, tec) in a.tec.iter().enumerate() {
            let [zero, one] = tec.entry(5);
            assert_eq!(zero + one, a.lec.table(k).total());
        }
    }

    #[test]
    fn rejects_oversized_cnot_span() {
        let mut p = params();
        p.cnot_span_bits = SYNDROME_BITS + 1;
        assert!(generate(DecodingTable::golay(), &p).is_err());
    }
}
