use std::{fs, path::Path};

use fs_bundle::BundleOptions;

use crate::AppError;

/// Conventional name of the encode configuration file
pub const CONFIG_FILE: &str = "blitter.toml";

/// Read encode options from a TOML file
///
/// Keys missing from the file keep their defaults.
pub fn load_options(path: &Path) -> Result<BundleOptions, AppError> {
    let content =
        fs::read_to_string(path).map_err(|e| AppError::ConfigLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let options: BundleOptions =
        toml::from_str(&content).map_err(|e| AppError::ConfigLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    log::debug!("Loaded options from {}", path.display());
    Ok(options)
}
