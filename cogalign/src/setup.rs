use std::path::Path;

use anyhow::{Context, Result};
use lib_cogalign::config::{FeatureDomain, read_feature_domain};
use log::{LevelFilter, debug, info};
use simplelog::{ColorChoice, TermLogger, TerminalMode};

pub(crate) fn init_logging(log_level: LevelFilter) {
    if let Err(error) = TermLogger::init(
        log_level,
        Default::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        // Happens when several commands run in the same process.
        debug!("Keeping the existing logger: {error}");
    }
}

/// Reads the configuration file and the feature domain it declares.
pub(crate) fn read_configuration(path: &Path) -> Result<(String, FeatureDomain)> {
    info!("Loading configuration {path:?}");
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read configuration file {path:?}"))?;
    let feature_domain = read_feature_domain(&input)
        .with_context(|| format!("Could not read the feature domain from {path:?}"))?;
    debug!("Feature domain is {feature_domain:?}");
    Ok((input, feature_domain))
}
