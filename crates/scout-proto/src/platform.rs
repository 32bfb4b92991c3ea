//! Platform paths for config, data, and downloads.

use std::path::PathBuf;

/// Directory for the config file: `$XDG_CONFIG_HOME/soundscout` (or the
/// platform equivalent).
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("soundscout")
}

/// Directory for session state and logs: `$XDG_DATA_HOME/soundscout`.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("soundscout")
}

/// Default location for the demo dataset download.
pub fn default_downloads_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}
