//! Core counting engine for the Golay CNOT exRec.
//!
//! This crate counts, for each distribution of physical faults over the five
//! locations of a CNOT exRec (leading EC on two blocks, transversal CNOT,
//! trailing EC on two blocks), how many fault sets end in each joint logical
//! error. Counts are exact and arbitrary precision. All modules are `no_std`
//! with `alloc`, so the engine carries no runtime assumptions of its own;
//! parallelism and I/O live in the host crates.

#![no_std]

extern crate alloc;

/// Multi-configuration driver that accumulates weight-indexed histograms.
///
/// Resolves each configuration's per-weight tables, runs the single
/// configuration counter and adds the result into the histogram bucket of
/// the configuration's total weight. Inputs are validated up front so that a
/// failed run never yields a partially summed histogram.
pub mod aggregator;

/// Bit manipulation utilities for packed lookup tables.
pub mod bit_utils;

/// Fault configurations and their enumeration.
///
/// A configuration assigns a fault weight to each exRec location. This
/// module also enumerates every configuration of a given total weight and
/// separates the configurations that must be counted from those that are
/// bounded separately.
pub mod config;

/// Per-configuration malignant set counter.
///
/// Implements the triple loop over CNOT, leading-EC-A and leading-EC-B
/// syndromes, factoring the two blocks into 2x2 tables and combining them
/// with a fixed-size outer product.
pub mod counter;

/// Logical decoding table for a single code block.
///
/// Maps each 12-bit syndrome to the logical bit inferred by an ideal
/// decoder. The Golay table is embedded as a bit-packed static.
pub mod decoding_table;

/// Weight-indexed histograms of malignant counts.
pub mod histogram;

/// Fixed-size count tables indexed by the layout enumerations.
///
/// Provides the 2x2 per-block table and the 4x3 per-configuration table,
/// both holding arbitrary-precision counts.
pub mod outcome;

/// Syndrome-indexed count tables supplied by the caller.
///
/// Dense tables of fault counts for the leading EC and CNOT locations and of
/// logical outcome counts for the trailing EC, each restricted to a single
/// fault weight.
pub mod tables;

pub use aggregator::{BatchInputs, count_configs};
pub use config::Configuration;
pub use counter::{ConfigTables, count_config};
pub use decoding_table::DecodingTable;
pub use histogram::MaligHistogram;
pub use outcome::{BlockCounts, MaligTable};
pub use tables::{CountTable, LogicalOutcomeTable, WeightedCounts};

use exrec_common::layout::Location;

/// Error types returned when building counting inputs.
///
/// These cover validation at the boundary of the engine: table
/// construction and batch input checks. Once inputs are accepted, the
/// counting loops treat any inconsistency as a contract violation and panic
/// rather than returning an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CountError {
    /// The decoding table does not cover the full syndrome space or holds a
    /// value other than 0 or 1.
    #[error("invalid decoding table: {0}")]
    InvalidDecodingTable(&'static str),

    /// A trailing-EC outcome table is not dense over the syndrome space.
    ///
    /// The counter indexes these tables with syndromes derived by XOR of
    /// leading-EC and CNOT syndromes, so every block syndrome must be present.
    #[error("logical outcome table has {got} entries, expected {expected}")]
    InvalidOutcomeTable { expected: usize, got: usize },

    /// A syndrome lies outside the domain of the table it indexes.
    #[error("syndrome {syndrome} out of range for table of size {len}")]
    SyndromeOutOfRange { syndrome: u32, len: usize },

    /// A configuration asks for a fault weight that has no table.
    #[error("no table for weight {weight} at {location:?} (have {available})")]
    MissingWeight {
        location: Location,
        weight: usize,
        available: usize,
    },

    /// A configuration's total weight does not fit in the histogram.
    #[error("configuration weight {weight} exceeds k_max {k_max}")]
    WeightExceedsKMax { weight: usize, k_max: usize },

    /// Two histograms with different weight ranges were combined.
    #[error("histogram k_max mismatch: {left} vs {right}")]
    HistogramShapeMismatch { left: usize, right: usize },
}
