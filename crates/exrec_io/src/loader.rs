//! Loading counting inputs and results from disk.

use crate::parser::{
    CountsLine, HistogramLine, OutcomesLine, config_line, counts_line, histogram_line,
    outcomes_line, parse_document,
};
use crate::stamp::{Checkpoint, RunStamp};
use anyhow::{Context, Result, anyhow, bail, ensure};
use exrec_common::syndrome::{COMBINED_SPACE, SYNDROME_SPACE};
use exrec_core::{
    Configuration, CountTable, DecodingTable, LogicalOutcomeTable, MaligHistogram,
    WeightedCounts,
};
use std::fs;
use std::path::Path;

/// Syndrome domain of a counts file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyndromeDomain {
    /// Single-block syndromes; tables span the whole block space.
    Block,
    /// Two-block CNOT syndromes; each table ends at its largest syndrome.
    Combined,
}

impl SyndromeDomain {
    fn limit(self) -> usize {
        match self {
            SyndromeDomain::Block => SYNDROME_SPACE,
            SyndromeDomain::Combined => COMBINED_SPACE,
        }
    }
}

/// A parsed histogram, with its header if it is a checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistogramFile {
    pub histogram: MaligHistogram,
    pub checkpoint: Option<Checkpoint>,
}

fn read_source(path: &Path, what: &str) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("Failed to open {} file {}", what, path.display()))
}

/// Groups `weight` headers and their entries into per-weight lists.
///
/// Weights missing from the file get an empty list.
fn group_by_weight<L, T>(
    lines: Vec<(usize, L)>,
    split: impl Fn(L) -> Result<usize, T>,
) -> Result<Vec<Vec<T>>> {
    let mut groups: Vec<Vec<T>> = Vec::new();
    let mut current = None;
    for (line_no, line) in lines {
        match split(line) {
            Ok(k) => {
                if groups.len() <= k {
                    groups.resize_with(k + 1, Vec::new);
                }
                current = Some(k);
            }
            Err(entry) => {
                let k = current
                    .ok_or_else(|| anyhow!("line {}: entry before any weight header", line_no))?;
                groups[k].push(entry);
            }
        }
    }
    Ok(groups)
}

/// Parses a counts file into per-weight tables.
pub fn parse_counts(source: &str, domain: SyndromeDomain) -> Result<WeightedCounts> {
    let lines = parse_document(source, counts_line)?;
    for (line_no, line) in &lines {
        if let CountsLine::Entry(s, _) = line {
            ensure!(
                (*s as usize) < domain.limit(),
                "line {}: syndrome {} out of range for {:?} syndromes",
                line_no,
                s,
                domain
            );
        }
    }

    let groups = group_by_weight(lines, |line| match line {
        CountsLine::Weight(k) => Ok(k),
        CountsLine::Entry(s, c) => Err((s, c)),
    })?;

    let tables = groups
        .into_iter()
        .map(|entries| {
            let len = match domain {
                SyndromeDomain::Block => SYNDROME_SPACE,
                SyndromeDomain::Combined => entries
                    .iter()
                    .map(|(s, _)| *s as usize + 1)
                    .max()
                    .unwrap_or(0),
            };
            CountTable::from_entries(len, entries)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(WeightedCounts::new(tables))
}

/// Parses an outcomes file into per-weight trailing-EC tables.
pub fn parse_outcomes(source: &str) -> Result<Vec<LogicalOutcomeTable>> {
    let lines = parse_document(source, outcomes_line)?;
    let groups = group_by_weight(lines, |line| match line {
        OutcomesLine::Weight(k) => Ok(k),
        OutcomesLine::Entry(s, counts) => Err((s, counts)),
    })?;
    groups
        .into_iter()
        .enumerate()
        .map(|(k, entries)| {
            LogicalOutcomeTable::from_entries(entries)
                .with_context(|| format!("trailing-EC table for weight {}", k))
        })
        .collect()
}

/// Parses a configuration list, one `lec_a lec_b cnot tec_a tec_b` per line.
pub fn parse_configs(source: &str) -> Result<Vec<Configuration>> {
    Ok(parse_document(source, config_line)?
        .into_iter()
        .map(|(_, config)| config)
        .collect())
}

/// Parses a histogram or checkpoint file.
///
/// `k_max` must come before any cell. A checkpoint carries both a `run` and
/// a `done` line; a file with only one of them is rejected.
pub fn parse_histogram(source: &str) -> Result<HistogramFile> {
    let mut histogram: Option<MaligHistogram> = None;
    let mut done = None;
    let mut stamp = None;
    for (line_no, line) in parse_document(source, histogram_line)? {
        match line {
            HistogramLine::KMax(k_max) => {
                ensure!(histogram.is_none(), "line {}: repeated k_max", line_no);
                histogram = Some(MaligHistogram::zeros(k_max));
            }
            HistogramLine::Done(n) => {
                ensure!(done.is_none(), "line {}: repeated done", line_no);
                done = Some(n);
            }
            HistogramLine::Run { digest, configs } => {
                ensure!(stamp.is_none(), "line {}: repeated run", line_no);
                stamp = Some(RunStamp { digest, configs });
            }
            HistogramLine::Cell { ec, error, k, count } => {
                let hist = histogram
                    .as_mut()
                    .ok_or_else(|| anyhow!("line {}: cell before k_max", line_no))?;
                ensure!(
                    k <= hist.k_max(),
                    "line {}: weight {} exceeds k_max {}",
                    line_no,
                    k,
                    hist.k_max()
                );
                hist.add(ec, error, k, &count);
            }
        }
    }
    let histogram = histogram.ok_or_else(|| anyhow!("missing k_max line"))?;
    let checkpoint = match (stamp, done) {
        (Some(stamp), Some(done)) => {
            ensure!(
                done <= stamp.configs,
                "checkpoint is done with {} of {} configurations",
                done,
                stamp.configs
            );
            Some(Checkpoint { stamp, done })
        }
        (None, None) => None,
        (Some(_), None) => bail!("checkpoint has a run line but no done line"),
        (None, Some(_)) => bail!("checkpoint has a done line but no run line"),
    };
    Ok(HistogramFile {
        histogram,
        checkpoint,
    })
}

/// Builds a decoding table from the packed bytes of a `.b8` file.
///
/// Bits are little endian within each byte: syndrome `s` is bit `s % 8` of
/// byte `s / 8`.
pub fn decoder_from_bytes(bytes: &[u8]) -> Result<DecodingTable> {
    ensure!(
        bytes.len() * 8 == SYNDROME_SPACE,
        "decoding table holds {} bits, expected {}",
        bytes.len() * 8,
        SYNDROME_SPACE
    );
    Ok(DecodingTable::from_bytes(bytes)?)
}

/// Loads a decoding table stored as a packed `.b8` bit file.
pub fn load_decoder_file<P: AsRef<Path>>(path: P) -> Result<DecodingTable> {
    let path = path.as_ref();
    let bytes = fs::read(path).context("Failed to open decoding table file")?;
    let decoder = decoder_from_bytes(&bytes)
        .with_context(|| format!("Invalid decoding table {}", path.display()))?;
    log::info!(
        "loaded decoding table from {} ({} logical syndromes)",
        path.display(),
        decoder.num_logical()
    );
    Ok(decoder)
}

/// Loads a counts file.
///
/// # Arguments
///
/// * `path` - Text file with `weight k` headers followed by `syndrome count` lines
/// * `domain` - Syndrome domain the entries must fall in
///
/// # Returns
///
/// One dense table per weight, or an error naming the file and line that
/// failed to parse or held an out-of-range syndrome.
pub fn load_counts<P: AsRef<Path>>(path: P, domain: SyndromeDomain) -> Result<WeightedCounts> {
    let path = path.as_ref();
    let counts = parse_counts(&read_source(path, "counts")?, domain)
        .with_context(|| format!("Failed to parse counts file {}", path.display()))?;
    log::info!(
        "loaded {} weights of {:?} counts from {}",
        counts.num_weights(),
        domain,
        path.display()
    );
    Ok(counts)
}

/// Loads a trailing-EC outcomes file, one table per weight.
pub fn load_outcomes<P: AsRef<Path>>(path: P) -> Result<Vec<LogicalOutcomeTable>> {
    let path = path.as_ref();
    let outcomes = parse_outcomes(&read_source(path, "outcomes")?)
        .with_context(|| format!("Failed to parse outcomes file {}", path.display()))?;
    log::info!(
        "loaded {} weights of trailing-EC outcomes from {}",
        outcomes.len(),
        path.display()
    );
    Ok(outcomes)
}

/// Loads a configuration list.
pub fn load_configs<P: AsRef<Path>>(path: P) -> Result<Vec<Configuration>> {
    let path = path.as_ref();
    let configs = parse_configs(&read_source(path, "configs")?)
        .with_context(|| format!("Failed to parse configs file {}", path.display()))?;
    log::info!("loaded {} configurations from {}", configs.len(), path.display());
    Ok(configs)
}

/// Loads a histogram or checkpoint.
///
/// # Returns
///
/// The histogram, and the checkpoint header when the file has `run` and
/// `done` lines.
pub fn load_histogram<P: AsRef<Path>>(path: P) -> Result<HistogramFile> {
    let path = path.as_ref();
    parse_histogram(&read_source(path, "histogram")?)
        .with_context(|| format!("Failed to parse histogram file {}", path.display()))
}
