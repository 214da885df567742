//! I/O utilities for exRec counting inputs and results.
//!
//! Reads and writes the per-weight syndrome count tables of the leading EC
//! and the CNOT, the trailing-EC logical outcome tables, configuration lists,
//! and malignant-count histograms (including resumable checkpoints stamped
//! with a SHA-256 of the run they belong to). All of these are plain text;
//! the decoding table is a packed binary `.b8` file.

/// File loading for counting inputs, decoding tables and histograms.
///
/// Builds the engine's table types from parsed files, enforcing the syndrome
/// domain of each location and reporting failures with the file and line
/// they occurred on.
pub mod loader;

/// `nom` line grammars shared by every text format.
pub mod parser;

/// Run stamps that tie a checkpoint to the exact work it covers.
pub mod stamp;

/// Text and binary writers, the inverse of [`loader`].
pub mod writer;

pub use loader::{
    HistogramFile, SyndromeDomain, load_configs, load_counts, load_decoder_file, load_histogram,
    load_outcomes,
};
pub use stamp::{Checkpoint, RunStamp};
pub use writer::{
    save_checkpoint, save_configs, save_counts, save_decoder_file, save_histogram, save_outcomes,
};
