//! Interface for loading and saving the [`Config`] structure.
//!
//! The actual place where the config will be saved to or read from is not tied to this interface
//! and it's considered to be implementation detail.
use crate::result::ConfigurationErr;

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub type CfgResolver = Box<dyn ConfigResolver>;

pub type CfgLoader = Box<dyn ConfigLoader>;

/// Responsible for reading/saving the configuration from/to some medium.
pub trait ConfigLoader: Send {
    /// Reads the configuration pointed by `path`.
    fn load(&self, path: &Path) -> Result<Config, ConfigurationErr>;

    /// Saves the configuration in the place pointed by `path`.
    fn store(&self, path: &Path, cfg: &Config) -> Result<(), ConfigurationErr>;
}

/// Handles config override.
///
/// When user specifies configuration path during startup, this interface handles this case.
pub trait ConfigResolver: Send {
    /// Loads the [`Config`] using specified path.
    ///
    /// If the path is `None`, then no override takes place and configuration should be loaded from
    /// original path.
    fn handle_config(&self, path_override: Option<String>) -> Result<Config, ConfigurationErr>;
}

#[derive(Debug, PartialEq, Eq, Deserialize, Serialize, Clone)]
pub struct Config {
    pub watched_dir: PathBuf,
    #[serde(default)]
    pub notifier: NotifierKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reload_interval: Option<Duration>,
}

/// Which notifier implementation should observe the watched directory.
#[derive(Debug, Default, PartialEq, Eq, Deserialize, Serialize, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    /// Backed by native filesystem notifications.
    #[default]
    Watch,

    /// Lists the directory only on start and on reload.
    Simple,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watched_dir: watched_dir_default(),
            notifier: NotifierKind::default(),
            reload_interval: None,
        }
    }
}

fn watched_dir_default() -> PathBuf {
    env::temp_dir().join("fsnotify")
}
