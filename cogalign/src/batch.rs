use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use lib_cogalign::{
    alignment_result::AlignmentStatistics,
    batch::align_batch_with_progress,
    config::{AlignerConfig, FeatureDomain},
    segment::{FeatureValue, Sequence, Ternary},
};
use log::{LevelFilter, debug, info, warn};
use noisy_float::types::R64;
use serde::{Serialize, de::DeserializeOwned};

use crate::setup::{init_logging, read_configuration};

#[derive(Parser)]
pub struct Cli {
    #[clap(long, short = 'l', default_value = "info")]
    log_level: LevelFilter,

    /// The aligner configuration in toml format.
    #[clap(long, short = 'c')]
    configuration: PathBuf,

    /// A file with one pair of word forms per line, separated by whitespace.
    ///
    /// Empty lines are skipped.
    #[clap(long, short = 'p')]
    pairs: PathBuf,

    /// The file to store the statistics of all pairs in toml format.
    #[clap(long, short = 'o')]
    output: Option<PathBuf>,

    /// The number of threads to align with.
    ///
    /// Defaults to the number of available cores.
    #[clap(long, short = 't')]
    threads: Option<usize>,

    /// Do not print the alignments, only the summary.
    #[clap(long)]
    quiet: bool,

    /// Do not show a progress bar.
    #[clap(long)]
    no_progress: bool,
}

#[derive(Debug, Serialize)]
struct BatchOutput {
    summary: BatchSummary,
    pairs: Vec<AlignmentStatistics>,
}

#[derive(Debug, Serialize)]
struct BatchSummary {
    pair_count: usize,
    aligned_count: usize,
    failed_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    mean_score: Option<R64>,
}

pub fn cli(cli: Cli) -> Result<()> {
    init_logging(cli.log_level);
    let (configuration, feature_domain) = read_configuration(&cli.configuration)?;

    match feature_domain {
        FeatureDomain::Integer => execute_with_domain::<i64>(cli, &configuration),
        FeatureDomain::Boolean => execute_with_domain::<bool>(cli, &configuration),
        FeatureDomain::Ternary => execute_with_domain::<Ternary>(cli, &configuration),
        FeatureDomain::Real => execute_with_domain::<f64>(cli, &configuration),
    }
}

fn execute_with_domain<T: FeatureValue + DeserializeOwned>(
    cli: Cli,
    configuration: &str,
) -> Result<()> {
    let aligner = AlignerConfig::<T>::from_toml_str(configuration)?.build()?;

    info!("Loading pairs file {:?}", cli.pairs);
    let input = std::fs::read_to_string(&cli.pairs)
        .with_context(|| format!("Could not read pairs file {:?}", cli.pairs))?;

    let mut pair_count = 0;
    let mut failed_count = 0;
    let mut pairs: Vec<(Sequence<T>, Sequence<T>)> = Vec::new();
    for (line_index, line) in input.lines().enumerate() {
        let words: Vec<_> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        pair_count += 1;
        let [left, right] = words.as_slice() else {
            warn!(
                "Line {} contains {} word forms instead of two, skipping it",
                line_index + 1,
                words.len()
            );
            failed_count += 1;
            continue;
        };

        match (
            aligner.factory().parse_word(left),
            aligner.factory().parse_word(right),
        ) {
            (Ok(left), Ok(right)) => pairs.push((left, right)),
            (Err(error), _) | (_, Err(error)) => {
                warn!("Could not parse line {}: {error}", line_index + 1);
                failed_count += 1;
            }
        }
    }

    let thread_pool = {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(threads) = cli.threads {
            builder = builder.num_threads(threads);
        }
        builder.build().context("Could not create the thread pool")?
    };

    info!(
        "Aligning {} pairs with aligner '{}' on {} threads",
        pairs.len(),
        aligner.name(),
        thread_pool.current_num_threads()
    );
    let progress_bar = if cli.no_progress {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(pairs.len() as u64)
    };
    progress_bar.set_style(ProgressStyle::with_template(
        "{elapsed_precise} [{bar:40}] {pos}/{len} pairs ({eta})",
    )?);
    let results = thread_pool.install(|| {
        align_batch_with_progress(aligner.algorithm(), &pairs, || progress_bar.inc(1))
    });
    progress_bar.finish_and_clear();

    let mut statistics = Vec::new();
    for ((left, right), result) in pairs.iter().zip(results) {
        match result {
            Ok(result) => {
                debug!("Aligned '{left}' and '{right}' with score {}", result.score());
                if !cli.quiet {
                    println!("{left} {right} {}", result.score());
                    if let Some(alignment) = result.best_alignment() {
                        println!("{alignment}");
                    }
                    println!();
                }
                statistics.push(result.statistics().clone());
            }
            Err(error) => {
                warn!("Could not align '{left}' and '{right}': {error}");
                failed_count += 1;
            }
        }
    }

    let summary = BatchSummary {
        pair_count,
        aligned_count: statistics.len(),
        failed_count,
        // None if empty or if the sum overflows.
        mean_score: (!statistics.is_empty())
            .then(|| {
                let sum: f64 = statistics
                    .iter()
                    .map(|statistics| statistics.score.raw())
                    .sum();
                R64::try_new(sum / statistics.len() as f64)
            })
            .flatten(),
    };
    info!(
        "Aligned {} of {} pairs, {} failed",
        summary.aligned_count, summary.pair_count, summary.failed_count
    );

    if let Some(output) = cli.output {
        info!("Writing statistics to {output:?}");
        let mut output = std::io::BufWriter::new(std::fs::File::create(output)?);
        write!(
            output,
            "{}",
            toml::to_string(&BatchOutput {
                summary,
                pairs: statistics,
            })?
        )?;
    }

    Ok(())
}
