//! Configuration discovery.

use std::path::{Path, PathBuf};

use tracing::debug;

use docparse_core::{DocparseConfig, DocparseError};

const CONFIG_FILE: &str = "config.json";

/// DPI values accepted from the command line and from config files.
pub const DPI_RANGE: std::ops::RangeInclusive<u32> = 1..=10_000;

/// `<user config dir>/docparse/config.json`.
fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("docparse").join(CONFIG_FILE))
}

/// Candidate files in lookup order when no explicit path is given.
fn candidates() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE)];
    paths.extend(user_config_path());
    paths
}

fn read(path: &Path) -> Result<DocparseConfig, DocparseError> {
    let config = DocparseConfig::from_file(path)
        .map_err(|e| DocparseError::Config(format!("{}: {e}", path.display())))?;
    validate(&config).map_err(|e| DocparseError::Config(format!("{}: {e}", path.display())))?;
    Ok(config)
}

fn validate(config: &DocparseConfig) -> Result<(), String> {
    let dpi = config.pdf.default_dpi;
    if !DPI_RANGE.contains(&dpi) {
        return Err(format!(
            "pdf.default_dpi {dpi} is outside {}-{}",
            DPI_RANGE.start(),
            DPI_RANGE.end()
        ));
    }
    Ok(())
}

/// Load the configuration.
///
/// An explicit path must load. Otherwise the first existing candidate is
/// used, falling back to defaults.
pub fn load(explicit: Option<&Path>) -> Result<(DocparseConfig, Option<PathBuf>), DocparseError> {
    if let Some(path) = explicit {
        return Ok((read(path)?, Some(path.to_path_buf())));
    }

    match candidates().into_iter().find(|p| p.is_file()) {
        Some(path) => Ok((read(&path)?, Some(path))),
        None => {
            debug!("No config file found, using defaults");
            Ok((DocparseConfig::default(), None))
        }
    }
}
