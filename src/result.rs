use std::path::PathBuf;

use thiserror::Error;

/// Errors which prevent a notifier from being constructed.
///
/// When any of them is returned, no processing thread has been spawned.
#[derive(Debug, Error)]
pub enum NotifierErr {
    #[error("failed to resolve absolute path of '{path}': '{source}'")]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("path '{0}' has no parent directory to watch")]
    NoParent(PathBuf),

    #[error("failed to initialize fs watcher: '{0}'")]
    Init(#[source] notify::Error),

    #[error("failed to watch parent directory '{path}': '{source}'")]
    ParentWatch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

/// Operational errors. They travel inside [`crate::entities::event::NotifyEventOp::Error`]
/// events and never stop a running notifier.
#[derive(Debug, Error)]
pub enum EventErr {
    #[error("failed to list directory '{path}': '{source}'")]
    Listing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to watch '{path}': '{source}'")]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("error from fs watcher: '{0}'")]
    Upstream(#[from] notify::Error),
}

/// Reason for which a processing loop stopped.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HaltErr {
    #[error("notifier was closed")]
    Closed,

    #[error("watch source disconnected")]
    SourceGone,
}

#[derive(Debug, Error)]
pub enum ConfigurationErr {
    #[error("failed to read or write configuration: '{0}'")]
    Io(#[from] std::io::Error),

    #[error("error when deserializing from toml: '{0}'")]
    Deserialize(#[from] toml::de::Error),

    #[error("error when serializing to toml: '{0}'")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config path: '{0}'")]
    InvalidConfigPath(String),

    #[error("invalid watched directory path: '{0}'")]
    InvalidWatchedDirPath(String),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("UNKNOWN({0})")]
pub struct UnknownOp(pub u8);
