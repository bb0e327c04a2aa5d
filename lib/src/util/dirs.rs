//! Wrapper for getting default config and data paths.
//!
//! Follows these rules:
//!
//! - XDG base directory (all platforms if environment variable is set)
//! - Platform-specific well known directory (see [`dirs`])
//! - Home directory
//! - Current directory

use std::env;
use std::path::PathBuf;

const XDG_CONFIG_HOME: &str = "XDG_CONFIG_HOME";
const XDG_DATA_HOME: &str = "XDG_DATA_HOME";

/// Gets the config directory for `name`. It is not created.
#[must_use]
pub fn config_dir(name: &str) -> Option<PathBuf> {
    locate(XDG_CONFIG_HOME, dirs::config_dir, name)
}

/// Gets the data directory for `name`. It is not created.
#[must_use]
pub fn data_dir(name: &str) -> Option<PathBuf> {
    locate(XDG_DATA_HOME, dirs::data_dir, name)
}

fn locate(xdg_var: &str, platform: fn() -> Option<PathBuf>, name: &str) -> Option<PathBuf> {
    if let Some(path) = env::var_os(xdg_var).filter(|p| !p.is_empty()) {
        Some(PathBuf::from(path).join(name))
    } else if let Some(path) = platform() {
        Some(path.join(name))
    } else if let Some(path) = dirs::home_dir() {
        Some(path.join(format!(".{name}")))
    } else {
        env::current_dir().ok().map(|path| path.join(format!(".{name}")))
    }
}
