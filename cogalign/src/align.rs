use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use lib_cogalign::{
    config::{AlignerConfig, FeatureDomain},
    segment::{FeatureValue, Ternary},
};
use log::{LevelFilter, info};
use serde::de::DeserializeOwned;

use crate::setup::{init_logging, read_configuration};

#[derive(Parser)]
pub struct Cli {
    #[clap(long, short = 'l', default_value = "info")]
    log_level: LevelFilter,

    /// The aligner configuration in toml format.
    ///
    /// See `test_files/config` for examples.
    #[clap(long, short = 'c')]
    configuration: PathBuf,

    /// The file to store the alignment statistics in toml format.
    #[clap(long, short = 'o')]
    output: Option<PathBuf>,

    /// Print the best score of each cell of the dynamic programming matrix.
    ///
    /// Linear-space algorithms do not compute a full matrix, so this is ignored for them.
    #[clap(long)]
    print_table: bool,

    /// The first word form, without the boundary symbol.
    left: String,

    /// The second word form, without the boundary symbol.
    right: String,
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
    info!(
        "Aligning '{}' and '{}' with aligner '{}'",
        cli.left,
        cli.right,
        aligner.name()
    );

    let result = aligner
        .align_words(&cli.left, &cli.right)
        .with_context(|| format!("Could not align '{}' and '{}'", cli.left, cli.right))?;

    if cli.print_table {
        if let Some(table) = result.table() {
            println!("{table}");
            println!();
        } else {
            info!("The {} algorithm keeps no table", result.statistics().algorithm);
        }
    }
    println!("{result}");

    if let Some(output) = cli.output {
        info!("Writing statistics to {output:?}");
        let mut output = std::io::BufWriter::new(std::fs::File::create(output)?);
        write!(output, "{}", toml::to_string(result.statistics())?)?;
    }

    Ok(())
}
