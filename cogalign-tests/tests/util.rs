use std::{env, path::Path};

use anyhow::{Result, anyhow};
use clap::Parser;
use cogalign::{align, batch};

pub fn run_in_repo_root(args: &str) -> Result<()> {
    // The manifest directory is this crate, a.k.a. "[...]/cogalign-tests",
    // simulate a call from the repo root by switching to its parent.
    env::set_current_dir(
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .ok_or(anyhow!("No parent directory"))?,
    )?;

    if args.starts_with("align ") {
        let args = align::Cli::parse_from(args.split_whitespace());
        align::cli(args)?;
    } else if args.starts_with("batch ") {
        let args = batch::Cli::parse_from(args.split_whitespace());
        batch::cli(args)?;
    } else {
        return Err(anyhow!("Unknown subcommand in '{args}'"));
    }

    Ok(())
}

/// A path in the system's temporary directory that is unique to one test.
pub fn output_path(name: &str) -> String {
    env::temp_dir()
        .join(format!("cogalign-tests-{}-{name}", std::process::id()))
        .to_string_lossy()
        .into_owned()
}
