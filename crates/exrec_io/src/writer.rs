//! Writers for the exRec text formats.
//!
//! Everything written here is accepted back by the parsers in
//! [`crate::loader`]. Zero counts are omitted.

use crate::stamp::Checkpoint;
use anyhow::{Context, Result};
use bitvec::prelude::*;
use exrec_common::syndrome::{SYNDROME_SPACE, Syndrome};
use exrec_core::{
    Configuration, DecodingTable, LogicalOutcomeTable, MaligHistogram, WeightedCounts,
};
use num_traits::Zero;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes per-weight counts as `weight k` blocks of `syndrome count` lines.
pub fn write_counts<W: Write>(out: &mut W, counts: &WeightedCounts) -> Result<()> {
    for k in 0..counts.num_weights() {
        writeln!(out, "weight {}", k)?;
        let table = counts.table(k);
        for &s in counts.support(k) {
            writeln!(out, "{} {}", s, table.get(s))?;
        }
    }
    Ok(())
}

/// Writes per-weight outcome tables as `syndrome count_for_0 count_for_1`.
pub fn write_outcomes<W: Write>(out: &mut W, outcomes: &[LogicalOutcomeTable]) -> Result<()> {
    for (k, table) in outcomes.iter().enumerate() {
        writeln!(out, "weight {}", k)?;
        for s in table.support() {
            let [zero, one] = table.entry(s);
            writeln!(out, "{} {} {}", s, zero, one)?;
        }
    }
    Ok(())
}

/// Writes one configuration per line.
pub fn write_configs<W: Write>(out: &mut W, configs: &[Configuration]) -> Result<()> {
    for c in configs {
        writeln!(
            out,
            "{} {} {} {} {}",
            c.lec_a, c.lec_b, c.cnot, c.tec_a, c.tec_b
        )?;
    }
    Ok(())
}

/// Writes a histogram, preceded by the checkpoint header when there is one.
pub fn write_histogram<W: Write>(
    out: &mut W,
    histogram: &MaligHistogram,
    checkpoint: Option<&Checkpoint>,
) -> Result<()> {
    writeln!(out, "k_max {}", histogram.k_max())?;
    if let Some(checkpoint) = checkpoint {
        writeln!(
            out,
            "run {} {}",
            checkpoint.stamp.digest, checkpoint.stamp.configs
        )?;
        writeln!(out, "done {}", checkpoint.done)?;
    }
    writeln!(out, "# ec error k count")?;
    for (ec, error, k, count) in histogram.iter() {
        if !count.is_zero() {
            writeln!(out, "{} {} {} {}", ec.index(), error.label(), k, count)?;
        }
    }
    Ok(())
}

/// Packs a decoding table into `.b8` bytes, syndrome `s` at bit `s % 8` of
/// byte `s / 8`.
pub fn decoder_to_bytes(decoder: &DecodingTable) -> Vec<u8> {
    let mut bits = BitVec::<u8, Lsb0>::repeat(false, SYNDROME_SPACE);
    for s in 0..SYNDROME_SPACE {
        bits.set(s, decoder.decode(s as Syndrome));
    }
    bits.into_vec()
}

fn save_with<P, F>(path: P, what: &str, write: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create {} file {}", what, path.display()))?;
    let mut out = BufWriter::new(file);
    write(&mut out)?;
    out.flush()?;
    Ok(())
}

/// Saves a counts file.
///
/// # Arguments
///
/// * `path` - Destination, created or truncated
/// * `counts` - Tables to write, one block per weight
pub fn save_counts<P: AsRef<Path>>(path: P, counts: &WeightedCounts) -> Result<()> {
    save_with(path, "counts", |out| write_counts(out, counts))
}

/// Saves an outcomes file.
pub fn save_outcomes<P: AsRef<Path>>(path: P, outcomes: &[LogicalOutcomeTable]) -> Result<()> {
    save_with(path, "outcomes", |out| write_outcomes(out, outcomes))
}

/// Saves a configuration list in the order given.
pub fn save_configs<P: AsRef<Path>>(path: P, configs: &[Configuration]) -> Result<()> {
    save_with(path, "configs", |out| write_configs(out, configs))
}

/// Saves a finished histogram. It carries no checkpoint header, so a later
/// run cannot resume from it.
pub fn save_histogram<P: AsRef<Path>>(path: P, histogram: &MaligHistogram) -> Result<()> {
    save_with(path, "histogram", |out| write_histogram(out, histogram, None))
}

/// Writes a checkpoint next to `path` and renames it into place, so a crash
/// leaves either the old checkpoint or the new one.
pub fn save_checkpoint<P: AsRef<Path>>(
    path: P,
    histogram: &MaligHistogram,
    checkpoint: &Checkpoint,
) -> Result<()> {
    let path = path.as_ref();
    let staging = path.with_extension("partial");
    save_with(&staging, "checkpoint", |out| {
        write_histogram(out, histogram, Some(checkpoint))
    })?;
    fs::rename(&staging, path)
        .with_context(|| format!("Failed to move checkpoint into {}", path.display()))?;
    log::debug!(
        "checkpoint after {} of {} configurations written to {}",
        checkpoint.done,
        checkpoint.stamp.configs,
        path.display()
    );
    Ok(())
}

/// Saves a decoding table as a packed `.b8` file.
pub fn save_decoder_file<P: AsRef<Path>>(path: P, decoder: &DecodingTable) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, decoder_to_bytes(decoder))
        .with_context(|| format!("Failed to create decoding table file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{decoder_from_bytes, parse_configs, parse_histogram};
    use crate::stamp::RunStamp;
    use exrec_common::layout::{EcConfig, LogicalError};
    use num_bigint::BigUint;

    #[test]
    fn histogram_text_layout() {
        let mut hist = MaligHistogram::zeros(2);
        hist.add(EcConfig::from_index(1), LogicalError::XX, 2, &BigUint::from(5u32));
        let mut out = Vec::new();
        let checkpoint = Checkpoint {
            stamp: RunStamp {
                digest: "0".repeat(64),
                configs: 8,
            },
            done: 3,
        };
        write_histogram(&mut out, &hist, Some(&checkpoint)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            format!(
                "k_max 2\nrun {} 8\ndone 3\n# ec error k count\n1 XX 2 5\n",
                "0".repeat(64)
            )
        );

        let parsed = parse_histogram(&text).unwrap();
        assert_eq!(parsed.histogram, hist);
        assert_eq!(parsed.checkpoint, Some(checkpoint));
    }

    #[test]
    fn configs_text_layout() {
        let configs = vec![Configuration::new(1, 0, 2, 0, 3)];
        let mut out = Vec::new();
        write_configs(&mut out, &configs).unwrap();
        assert_eq!(out, b"1 0 2 0 3\n");
        assert_eq!(parse_configs(std::str::from_utf8(&out).unwrap()).unwrap(), configs);
    }

    #[test]
    fn golay_decoder_survives_b8_packing() {
        let bytes = decoder_to_bytes(DecodingTable::golay());
        assert_eq!(bytes.len(), SYNDROME_SPACE / 8);
        assert_eq!(&decoder_from_bytes(&bytes).unwrap(), DecodingTable::golay());
    }
}
