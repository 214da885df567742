mod batch;
mod generator;
mod report;
mod stats;

use anyhow::{Result, bail};
use batch::RunOptions;
use clap::{Args, Parser, Subcommand};
use exrec_core::config::ConfigSpace;
use exrec_core::{BatchInputs, Configuration, DecodingTable};
use exrec_io::SyndromeDomain;
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "Malignant fault set counting for the Golay CNOT exRec")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Limits selecting which fault configurations are counted.
#[derive(Args, Clone)]
struct SpaceArgs {
    /// Maximum faults counted in one EC.
    #[arg(long)]
    k_good_ec: Option<usize>,
    /// Maximum faults counted in the CNOT.
    #[arg(long)]
    k_good_cnot: Option<usize>,
    /// Maximum total faults counted in the exRec.
    #[arg(long)]
    k_good_exrec: Option<usize>,
    /// Joint leading-EC/CNOT limits `lec_a,lec_b,cnot`.
    #[arg(long, value_delimiter = ',')]
    lec_cnot: Option<Vec<usize>>,
}

impl SpaceArgs {
    fn space(&self) -> Result<ConfigSpace> {
        let (Some(k_good_ec), Some(k_good_cnot), Some(k_good_exrec), Some(lec_cnot)) = (
            self.k_good_ec,
            self.k_good_cnot,
            self.k_good_exrec,
            self.lec_cnot.as_deref(),
        ) else {
            bail!("--k-good-ec, --k-good-cnot, --k-good-exrec and --lec-cnot are all required");
        };
        let [a, b, c] = lec_cnot else {
            bail!("--lec-cnot takes exactly three limits");
        };
        Ok(ConfigSpace {
            k_good_ec,
            k_good_cnot,
            k_good_exrec,
            k_good_lec_cnot: [*a, *b, *c],
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write synthetic input tables.
    Gen {
        #[arg(long, default_value = "exrec_data")]
        out_dir: PathBuf,
        #[arg(long, default_value_t = 3)]
        max_weight: usize,
        #[arg(long, default_value_t = 24)]
        pool_size: usize,
        #[arg(long, default_value_t = 4)]
        cnot_span_bits: u32,
        #[arg(long, default_value_t = 12345)]
        seed: u64,
    },
    /// Enumerate the configurations to count.
    Configs {
        #[command(flatten)]
        space: SpaceArgs,
        /// Swap blocks A and B, for counting Z errors.
        #[arg(long)]
        swap_blocks: bool,
        #[arg(short, long)]
        out: PathBuf,
        /// Also write the bounded (uncounted) configurations here.
        #[arg(long)]
        bad_out: Option<PathBuf>,
    },
    /// Count malignant fault sets.
    Count {
        #[arg(long)]
        lec: PathBuf,
        #[arg(long)]
        cnot: PathBuf,
        #[arg(long)]
        tec: PathBuf,
        /// Packed decoding table; the built-in Golay table when absent.
        #[arg(long)]
        decoder: Option<PathBuf>,
        /// Configuration list; enumerated from the limits when absent.
        #[arg(long)]
        configs: Option<PathBuf>,
        #[command(flatten)]
        space: SpaceArgs,
        /// Largest weight kept in the histogram; the largest configuration
        /// weight when absent.
        #[arg(long)]
        k_max: Option<usize>,
        /// Count with blocks A and B swapped and swap the result back.
        #[arg(long)]
        swap_blocks: bool,
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[arg(long)]
        checkpoint: Option<PathBuf>,
        #[arg(long)]
        resume: bool,
        #[arg(long, default_value_t = 64)]
        chunk_size: usize,
    },
}

fn swap_all(configs: &[Configuration]) -> Vec<Configuration> {
    configs.iter().map(Configuration::swap_blocks).collect()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Gen {
            out_dir,
            max_weight,
            pool_size,
            cnot_span_bits,
            seed,
        } => {
            let params = generator::SyntheticParams {
                max_weight,
                pool_size,
                cnot_span_bits,
                seed,
            };
            generator::generate_to_dir(&out_dir, DecodingTable::golay(), &params)?;
        }
        Commands::Configs {
            space,
            swap_blocks,
            out,
            bad_out,
        } => {
            let mut split = space.space()?.enumerate();
            if swap_blocks {
                split.good = swap_all(&split.good);
                split.bad = swap_all(&split.bad);
            }
            exrec_io::save_configs(&out, &split.good)?;
            if let Some(path) = bad_out {
                exrec_io::save_configs(&path, &split.bad)?;
            }
            println!(
                "Wrote {} good configurations to {} ({} bad)",
                split.good.len(),
                out.display(),
                split.bad.len()
            );
        }
        Commands::Count {
            lec,
            cnot,
            tec,
            decoder,
            configs,
            space,
            k_max,
            swap_blocks,
            out,
            checkpoint,
            resume,
            chunk_size,
        } => {
            let decoder = match decoder {
                Some(path) => exrec_io::load_decoder_file(path)?,
                None => DecodingTable::golay().clone(),
            };
            let inputs = BatchInputs::new(
                exrec_io::load_counts(lec, SyndromeDomain::Block)?,
                exrec_io::load_counts(cnot, SyndromeDomain::Combined)?,
                exrec_io::load_outcomes(tec)?,
            );

            let mut configs = match configs {
                Some(path) => exrec_io::load_configs(path)?,
                None => space.space()?.enumerate().good,
            };
            if swap_blocks {
                configs = swap_all(&configs);
            }
            let k_max = k_max
                .or_else(|| configs.iter().map(Configuration::total_weight).max())
                .unwrap_or(0);

            let options = RunOptions {
                chunk_size,
                checkpoint,
                resume,
            };
            let outcome = batch::run_batch(&decoder, &inputs, &configs, k_max, &options)?;
            println!(
                "Counted {} configurations in {:.2?} ({} resumed)",
                configs.len() - outcome.resumed,
                outcome.elapsed,
                outcome.resumed
            );

            let histogram = if swap_blocks {
                outcome.histogram.swap_blocks()
            } else {
                outcome.histogram
            };
            report::print_histogram(&histogram);
            outcome.timings.print_report();
            if let Some(path) = out {
                exrec_io::save_histogram(&path, &histogram)?;
                println!("Histogram written to {}", path.display());
            }
        }
    }
    Ok(())
}
