use bitflags::bitflags;
use std::path::PathBuf;

bitflags! {
    /// Operations reported for a single path by the watch subsystem.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WatchOp: u8 {
        const CREATE = 1;
        const WRITE = 1 << 1;
        const REMOVE = 1 << 2;
        const RENAME = 1 << 3;
        const CHMOD = 1 << 4;
        /// Hint: the path is known to be a directory.
        const DIR = 1 << 5;
        /// The subsystem lost events and the state needs to be listed again.
        const RESCAN = 1 << 6;
    }
}

impl WatchOp {
    /// The path is gone (or moved away).
    pub const REMOVAL: Self = Self::REMOVE.union(Self::RENAME);

    /// The path appeared or its content changed.
    pub const CHANGE: Self = Self::CREATE.union(Self::WRITE);

    pub fn is_removal(self) -> bool {
        self.intersects(Self::REMOVAL)
    }

    pub fn is_change(self) -> bool {
        self.intersects(Self::CHANGE)
    }
}

/// Raw change notification, before it is reconciled against the container lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNotification {
    pub path: PathBuf,
    pub op: WatchOp,
}

impl RawNotification {
    pub fn new<P: Into<PathBuf>>(path: P, op: WatchOp) -> Self {
        Self {
            path: path.into(),
            op,
        }
    }
}
