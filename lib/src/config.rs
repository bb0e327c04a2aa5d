use std::fs;

use anyhow::Context;
use anyhow::Result;
use camino::Utf8Path;
use camino::Utf8PathBuf;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::util::dirs;

/// Name used for the config and data directories.
pub const APP_NAME: &str = "jumpto";

const CONFIG_FILE_NAME: &str = "config.toml";

/// Default command run on jumpboxes to list machines.
pub const DEFAULT_INVENTORY_COMMAND: &str = "govuk_node_list";

const KNOWN_KEYS: [&str; 3] = ["ssh_username", "ssh_identity_file", "inventory_command"];

/// Contents of the user config file. Every key is optional and unknown keys
/// are ignored.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Remote user for jumpboxes and machines.
    pub ssh_username: Option<String>,

    /// Private key handed to `ssh` and `scp`.
    pub ssh_identity_file: Option<Utf8PathBuf>,

    /// Command run on jumpboxes to query the inventory.
    pub inventory_command: Option<String>,
}

impl Config {
    /// Loads the config at `path`. A missing file yields the default config.
    ///
    /// # Errors
    ///
    /// - If the file exists but cannot be read or parsed.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        if !path.exists() {
            debug!(%path, "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents =
            fs::read_to_string(path).with_context(|| format!("unable to read config {path}"))?;
        let table: toml::Table =
            toml::from_str(&contents).with_context(|| format!("unable to parse config {path}"))?;
        for key in table.keys().filter(|key| !KNOWN_KEYS.contains(&key.as_str())) {
            debug!(%path, %key, "ignoring unknown config key");
        }
        let config: Self = toml::Value::Table(table)
            .try_into()
            .with_context(|| format!("invalid config {path}"))?;
        debug!(%path, ?config, "loaded config");
        Ok(config)
    }

    /// Username to connect as: the override if set, then the config file,
    /// then the login name of the invoking user.
    #[must_use]
    pub fn ssh_username(&self, overridden: Option<&str>) -> String {
        overridden
            .map(ToOwned::to_owned)
            .or_else(|| self.ssh_username.clone())
            .unwrap_or_else(whoami::username)
    }

    #[must_use]
    pub fn inventory_command(&self) -> &str {
        self.inventory_command
            .as_deref()
            .unwrap_or(DEFAULT_INVENTORY_COMMAND)
    }
}

/// Default location of the config file, if any directory can be found.
#[must_use]
pub fn default_path() -> Option<Utf8PathBuf> {
    let dir = dirs::config_dir(APP_NAME)?;
    Utf8PathBuf::from_path_buf(dir.join(CONFIG_FILE_NAME)).ok()
}
