//! Resolved location of the watched container.
use crate::result::NotifierErr;

use std::env;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Absolute path of the container together with the directory it lives in.
///
/// The parent is what gets watched structurally: a watch can't be placed on a path which
/// doesn't exist yet, but its creation is visible in the parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTarget {
    path: PathBuf,
    parent: PathBuf,
}

/// How a path reported by the watch subsystem relates to the [`WatchTarget`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    /// The container itself.
    Container,

    /// Entry directly inside the container, carrying its base name.
    Element(String),

    /// Sibling traffic seen through the parent watch, or anything deeper.
    Unrelated,
}

impl WatchTarget {
    pub fn resolve<P: AsRef<Path>>(path: P) -> Result<Self, NotifierErr> {
        let path = path.as_ref();
        let absolute = absolute(path).map_err(|source| NotifierErr::Resolve {
            path: path.to_path_buf(),
            source,
        })?;
        let (parent, name) = match (absolute.parent(), absolute.file_name()) {
            (Some(parent), Some(name)) => (parent, name),
            _ => return Err(NotifierErr::NoParent(absolute)),
        };
        // watch backends report canonical paths (e.g. /private/var on macOS)
        let parent = fs::canonicalize(parent).unwrap_or_else(|_| parent.to_path_buf());
        Ok(Self {
            path: parent.join(name),
            parent,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parent(&self) -> &Path {
        &self.parent
    }

    pub fn relation<P: AsRef<Path>>(&self, candidate: P) -> Relation {
        let candidate = candidate.as_ref();
        if candidate == self.path {
            return Relation::Container;
        }
        match (candidate.parent(), candidate.file_name()) {
            (Some(parent), Some(name)) if parent == self.path => {
                Relation::Element(name.to_string_lossy().into_owned())
            }
            _ => Relation::Unrelated,
        }
    }

    /// Whether the container currently exists as a directory.
    pub fn is_present(&self) -> bool {
        self.path.is_dir()
    }
}

/// Makes `path` absolute against the current directory and cleans it lexically.
///
/// The path doesn't need to exist.
pub fn absolute<P: AsRef<Path>>(path: P) -> io::Result<PathBuf> {
    let path = path.as_ref();
    if path.is_absolute() {
        Ok(clean(path))
    } else {
        Ok(clean(env::current_dir()?.join(path)))
    }
}

fn clean<P: AsRef<Path>>(path: P) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // popping at the root is a no-op, like `/..` resolving to `/`
                cleaned.pop();
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    cleaned
}
