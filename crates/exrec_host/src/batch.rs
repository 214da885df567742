//! Parallel batch counting with progress reporting and checkpoints.
//!
//! Configurations are processed in chunks. Inside a chunk every rayon worker
//! folds its configurations into a private histogram and the partial
//! histograms are merged once the chunk is done. Between chunks the running
//! total may be written to a checkpoint, which a later run resumes from.

use crate::stats::ConfigTimings;
use anyhow::{Result, bail, ensure};
use exrec_core::aggregator::count_one;
use exrec_core::{BatchInputs, Configuration, CountError, DecodingTable, MaligHistogram};
use exrec_io::{Checkpoint, RunStamp};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Options controlling a batch run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Configurations per chunk; progress and checkpoints happen between chunks.
    pub chunk_size: usize,
    pub checkpoint: Option<PathBuf>,
    /// Continue from `checkpoint` when it exists.
    pub resume: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            chunk_size: 64,
            checkpoint: None,
            resume: false,
        }
    }
}

/// Result of a batch run.
pub struct RunOutcome {
    pub histogram: MaligHistogram,
    pub timings: ConfigTimings,
    /// Configurations restored from a checkpoint instead of counted.
    pub resumed: usize,
    pub elapsed: Duration,
}

/// One worker's share of a chunk.
struct Partial {
    histogram: MaligHistogram,
    timings: ConfigTimings,
}

impl Partial {
    fn new(k_max: usize) -> Self {
        Self {
            histogram: MaligHistogram::zeros(k_max),
            timings: ConfigTimings::new(),
        }
    }

    fn count(
        mut self,
        decoder: &DecodingTable,
        inputs: &BatchInputs,
        config: &Configuration,
        progress: &AtomicU64,
    ) -> Self {
        let start = Instant::now();
        let table = count_one(decoder, inputs, config);
        self.histogram.add_table(config.total_weight(), &table);

        let cost = inputs.cost(config);
        self.timings.update(start.elapsed().as_nanos() as u64, cost);
        progress.fetch_add(cost, Ordering::Relaxed);
        self
    }

    fn merge(mut self, other: Partial) -> Result<Self, CountError> {
        self.histogram.merge(&other.histogram)?;
        self.timings.merge(&other.timings);
        Ok(self)
    }
}

/// Restores the histogram and position of the run `stamp` identifies.
fn restore(path: &Path, stamp: &RunStamp, k_max: usize) -> Result<(MaligHistogram, usize)> {
    let file = exrec_io::load_histogram(path)?;
    let Some(checkpoint) = file.checkpoint else {
        bail!("{} is a finished histogram, not a checkpoint", path.display());
    };
    ensure!(
        file.histogram.k_max() == k_max,
        "checkpoint {} has k_max {}, this run uses {}",
        path.display(),
        file.histogram.k_max(),
        k_max
    );
    ensure!(
        checkpoint.stamp == *stamp,
        "checkpoint {} belongs to another run ({} configurations, digest {}); \
         this run has {} configurations, digest {}",
        path.display(),
        checkpoint.stamp.configs,
        checkpoint.stamp.digest,
        stamp.configs,
        stamp.digest
    );
    log::info!(
        "resuming from {} after {} configurations",
        path.display(),
        checkpoint.done
    );
    Ok((file.histogram, checkpoint.done))
}

fn format_eta(remaining: f64) -> String {
    let secs = remaining.max(0.0).round() as u64;
    format!("{}h{:02}m{:02}s", secs / 3600, (secs / 60) % 60, secs % 60)
}

/// Counts every configuration in parallel and returns the summed histogram.
///
/// Inputs are validated before any counting starts. With a checkpoint path,
/// the running histogram is saved after every chunk; with `resume` set, a
/// run picks up after the configurations an existing checkpoint covers.
/// Checkpoints are stamped with a digest of the decoder, the input tables,
/// `k_max` and the ordered configuration list, and only a run with the same
/// stamp may resume one.
///
/// # Errors
///
/// Returns an error if validation fails, the checkpoint does not match this
/// run, or a checkpoint cannot be read or written.
pub fn run_batch(
    decoder: &DecodingTable,
    inputs: &BatchInputs,
    configs: &[Configuration],
    k_max: usize,
    options: &RunOptions,
) -> Result<RunOutcome> {
    ensure!(options.chunk_size > 0, "chunk size must be positive");
    inputs.validate(configs, k_max)?;

    let stamped = options
        .checkpoint
        .as_deref()
        .map(|path| (path, RunStamp::new(decoder, inputs, configs, k_max)));
    let (mut histogram, resumed) = match &stamped {
        Some((path, stamp)) if options.resume && path.exists() => restore(path, stamp, k_max)?,
        _ => (MaligHistogram::zeros(k_max), 0),
    };

    let pending = &configs[resumed..];
    let total_cost: u64 = pending.iter().map(|c| inputs.cost(c)).sum();
    log::info!(
        "counting {} configurations ({} inner iterations) on {} threads",
        pending.len(),
        total_cost,
        rayon::current_num_threads()
    );

    let progress = AtomicU64::new(0);
    let mut timings = ConfigTimings::new();
    let mut done = resumed;
    let start = Instant::now();

    for chunk in pending.chunks(options.chunk_size) {
        let partial = chunk
            .par_iter()
            .fold(
                || Partial::new(k_max),
                |partial, config| partial.count(decoder, inputs, config, &progress),
            )
            .map(Ok::<_, CountError>)
            .try_reduce(|| Partial::new(k_max), Partial::merge)?;

        histogram.merge(&partial.histogram)?;
        timings.merge(&partial.timings);
        done += chunk.len();

        let finished = progress.load(Ordering::Relaxed);
        let elapsed = start.elapsed().as_secs_f64();
        let fraction = if total_cost == 0 {
            1.0
        } else {
            finished as f64 / total_cost as f64
        };
        let eta = if fraction > 0.0 {
            elapsed / fraction - elapsed
        } else {
            0.0
        };
        log::info!(
            "{}/{} configurations, {:.1}% of work, ETA {}",
            done,
            configs.len(),
            100.0 * fraction,
            format_eta(eta)
        );

        if let Some((path, stamp)) = &stamped {
            let checkpoint = Checkpoint {
                stamp: stamp.clone(),
                done,
            };
            exrec_io::save_checkpoint(path, &histogram, &checkpoint)?;
        }
    }

    Ok(RunOutcome {
        histogram,
        timings,
        resumed,
        elapsed: start.elapsed(),
    })
}
