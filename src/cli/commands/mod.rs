pub mod compile;
pub mod extract;
pub mod init;
pub mod transform;

use std::{env, path::PathBuf};

use anyhow::{Context, Result};

use super::args::CommonArgs;
use crate::config::{ConfigLoadResult, load_config};

/// Load the config for `--root`, or the current directory.
///
/// The start directory is canonicalized so paths reported by the file
/// watcher line up with the scanned ones.
pub(crate) fn load_project(common: &CommonArgs) -> Result<ConfigLoadResult> {
    let start: PathBuf = match &common.root {
        Some(root) => root.clone(),
        None => env::current_dir().context("Failed to read the current directory")?,
    };
    let start = start
        .canonicalize()
        .with_context(|| format!("Directory not found: {}", start.display()))?;

    let project = load_config(&start)?;
    if !project.from_file {
        tracing::info!("no config file found, using defaults");
    }
    Ok(project)
}
