//! Batch counting over many fault configurations.

use crate::config::Configuration;
use crate::counter::{ConfigTables, count_config};
use crate::histogram::MaligHistogram;
use crate::outcome::MaligTable;
use crate::tables::{LogicalOutcomeTable, WeightedCounts};
use crate::{CountError, DecodingTable};
use alloc::vec::Vec;
use exrec_common::layout::Location;

/// Per-weight tables for every exRec location.
///
/// Both leading ECs share one set of count tables and both trailing ECs
/// share one set of outcome tables; the blocks differ only in which weight
/// each configuration selects.
#[derive(Debug, Clone, Default)]
pub struct BatchInputs {
    pub lec: WeightedCounts,
    pub cnot: WeightedCounts,
    pub tec: Vec<LogicalOutcomeTable>,
}

impl BatchInputs {
    pub fn new(lec: WeightedCounts, cnot: WeightedCounts, tec: Vec<LogicalOutcomeTable>) -> Self {
        Self { lec, cnot, tec }
    }

    /// Checks that every weight `config` asks for has a table.
    pub fn check(&self, config: &Configuration) -> Result<(), CountError> {
        self.lec.check_weight(Location::LecA, config.lec_a)?;
        self.lec.check_weight(Location::LecB, config.lec_b)?;
        self.cnot.check_weight(Location::Cnot, config.cnot)?;
        for (location, k) in [(Location::TecA, config.tec_a), (Location::TecB, config.tec_b)] {
            if k >= self.tec.len() {
                return Err(CountError::MissingWeight {
                    location,
                    weight: k,
                    available: self.tec.len(),
                });
            }
        }
        Ok(())
    }

    /// Resolves the weight-restricted tables of one configuration.
    ///
    /// # Panics
    ///
    /// Panics if a weight has no table; call [`BatchInputs::check`] first
    /// for untrusted configurations.
    pub fn config_tables(&self, config: &Configuration) -> ConfigTables<'_> {
        ConfigTables {
            lec_a_syndromes: self.lec.support(config.lec_a),
            lec_b_syndromes: self.lec.support(config.lec_b),
            cnot_syndromes: self.cnot.support(config.cnot),
            lec_a_counts: self.lec.table(config.lec_a),
            lec_b_counts: self.lec.table(config.lec_b),
            cnot_counts: self.cnot.table(config.cnot),
            tec_a: &self.tec[config.tec_a],
            tec_b: &self.tec[config.tec_b],
        }
    }

    /// Inner-loop iterations needed to count `config`.
    pub fn cost(&self, config: &Configuration) -> u64 {
        self.config_tables(config).cost()
    }

    /// Validates a whole batch against these inputs and `k_max`.
    pub fn validate(&self, configs: &[Configuration], k_max: usize) -> Result<(), CountError> {
        for config in configs {
            self.check(config)?;
            let weight = config.total_weight();
            if weight > k_max {
                return Err(CountError::WeightExceedsKMax { weight, k_max });
            }
        }
        Ok(())
    }
}

/// Counts a single configuration against batch inputs.
pub fn count_one(
    decoder: &DecodingTable,
    inputs: &BatchInputs,
    config: &Configuration,
) -> MaligTable {
    count_config(decoder, &inputs.config_tables(config))
}

/// Adds every configuration of `configs` into `histogram`.
///
/// Inputs must already be validated; a weight outside the histogram panics.
pub fn accumulate(
    decoder: &DecodingTable,
    inputs: &BatchInputs,
    configs: &[Configuration],
    histogram: &mut MaligHistogram,
) {
    for config in configs {
        let table = count_one(decoder, inputs, config);
        histogram.add_table(config.total_weight(), &table);
    }
}

/// Counts malignant fault sets for every configuration, bucketed by total
/// weight.
///
/// # Errors
///
/// Returns an error, without counting anything, if any configuration needs
/// a weight with no table or has a total weight above `k_max`.
pub fn count_configs(
    decoder: &DecodingTable,
    inputs: &BatchInputs,
    configs: &[Configuration],
    k_max: usize,
) -> Result<MaligHistogram, CountError> {
    inputs.validate(configs, k_max)?;
    log::debug!("counting {} configurations up to k={}", configs.len(), k_max);

    let mut histogram = MaligHistogram::zeros(k_max);
    accumulate(decoder, inputs, configs, &mut histogram);
    Ok(histogram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::CountTable;
    use alloc::vec;
    use exrec_common::layout::{EcConfig, LogicalError};
    use num_bigint::BigUint;

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    /// Inputs where a single fault in either trailing EC flips its block.
    fn follow_tec_inputs() -> BatchInputs {
        let weighted = WeightedCounts::new(vec![
            CountTable::new(vec![big(1)]),
            CountTable::new(vec![big(0), big(1)]),
        ]);
        let tec = vec![
            LogicalOutcomeTable::from_entries([(0, [big(1), big(1)]), (1, [big(0), big(1)])])
                .unwrap(),
            LogicalOutcomeTable::from_entries([(0, [big(0), big(1)]), (1, [big(0), big(1)])])
                .unwrap(),
        ];
        BatchInputs::new(weighted.clone(), weighted, tec)
    }

    #[test]
    fn logical_error_follows_trailing_ec() {
        let inputs = follow_tec_inputs();
        let configs = [Configuration::default()];
        let hist = count_configs(DecodingTable::golay(), &inputs, &configs, 0).unwrap();
        for ec in EcConfig::ALL {
            for error in LogicalError::ALL {
                let (e_a, e_b) = error.block_outcomes();
                let a_err = e_a.index() == 1;
                let b_err = e_b.index() == 1;
                let a_ec = ec.block_a().index() == 1;
                let b_ec = ec.block_b().index() == 1;
                // An error on a block only appears when that block's trailing
                // EC is present, and never on a block whose EC is missing.
                let expected = (!a_err || a_ec) && (!b_err || b_ec);
                assert_eq!(
                    hist.get(ec, error, 0),
                    &big(expected as u64),
                    "{} {}",
                    ec.label(),
                    error.label()
                );
            }
        }
    }

    #[test]
    fn rejects_weight_above_k_max() {
        let inputs = follow_tec_inputs();
        let configs = [Configuration::new(0, 0, 1, 0, 1)];
        assert_eq!(
            count_configs(DecodingTable::golay(), &inputs, &configs, 1).unwrap_err(),
            CountError::WeightExceedsKMax { weight: 2, k_max: 1 }
        );
    }

    #[test]
    fn rejects_missing_weight() {
        let inputs = follow_tec_inputs();
        let configs = [Configuration::new(0, 0, 0, 5, 0)];
        assert_eq!(
            count_configs(DecodingTable::golay(), &inputs, &configs, 9).unwrap_err(),
            CountError::MissingWeight {
                location: Location::TecA,
                weight: 5,
                available: 2
            }
        );
    }

    #[test]
    fn cost_is_product_of_supports() {
        let inputs = follow_tec_inputs();
        assert_eq!(inputs.cost(&Configuration::new(1, 0, 1, 0, 0)), 1);
        let table = count_one(DecodingTable::golay(), &inputs, &Configuration::default());
        assert_eq!(table.intact(), &[big(1), big(1), big(1)]);
    }
}
