use crate::entities::watch_op::RawNotification;

use crossbeam_channel::Receiver;
use std::path::Path;

pub type WatchSrc = Box<dyn WatchSource>;

/// Native filesystem-change notification subsystem.
///
/// Watches are non-recursive. Dropping the source releases every registration and
/// disconnects both channels.
pub trait WatchSource: Send {
    fn watch(&mut self, path: &Path) -> notify::Result<()>;

    fn unwatch(&mut self, path: &Path) -> notify::Result<()>;

    fn notifications(&self) -> Receiver<RawNotification>;

    fn errors(&self) -> Receiver<notify::Error>;
}
