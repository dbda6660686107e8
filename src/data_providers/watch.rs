//! [`WatchSource`] implemented on top of the [`notify`] crate.
//!
//! `notify` reports rich [`EventKind`]s; they are folded here into the plain [`WatchOp`]
//! bitmask the notifiers reason about.
use crate::entities::watch_op::{RawNotification, WatchOp};
use crate::use_cases::watch::WatchSource;

use crossbeam_channel::{unbounded, Receiver};
use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use tracing::{debug, trace};

pub struct NotifyWatch {
    watcher: RecommendedWatcher,
    notifications: Receiver<RawNotification>,
    errors: Receiver<notify::Error>,
}

impl NotifyWatch {
    pub fn new() -> notify::Result<Self> {
        let (notifications_tx, notifications) = unbounded();
        let (errors_tx, errors) = unbounded();
        // the callback runs on the backend's thread and must never block
        let watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                for raw in translate(event) {
                    let _ = notifications_tx.send(raw);
                }
            }
            Err(e) => {
                debug!("watch error: {:?}", e);
                let _ = errors_tx.send(e);
            }
        })?;
        Ok(Self {
            watcher,
            notifications,
            errors,
        })
    }
}

impl WatchSource for NotifyWatch {
    fn watch(&mut self, path: &Path) -> notify::Result<()> {
        debug!("watching '{}'", path.display());
        self.watcher.watch(path, RecursiveMode::NonRecursive)
    }

    fn unwatch(&mut self, path: &Path) -> notify::Result<()> {
        debug!("unwatching '{}'", path.display());
        self.watcher.unwatch(path)
    }

    fn notifications(&self) -> Receiver<RawNotification> {
        self.notifications.clone()
    }

    fn errors(&self) -> Receiver<notify::Error> {
        self.errors.clone()
    }
}

fn translate(event: Event) -> Vec<RawNotification> {
    trace!("raw event: {:?}", event);
    if event.need_rescan() {
        let path = event.paths.into_iter().next().unwrap_or_default();
        return vec![RawNotification::new(path, WatchOp::RESCAN)];
    }
    event
        .paths
        .into_iter()
        .filter_map(|path| {
            let op = watch_op(&event.kind, &path);
            if op.is_empty() {
                None
            } else {
                Some(RawNotification::new(path, op))
            }
        })
        .collect()
}

fn watch_op(kind: &EventKind, path: &Path) -> WatchOp {
    match kind {
        EventKind::Create(CreateKind::Folder) => WatchOp::CREATE | WatchOp::DIR,
        EventKind::Create(_) => WatchOp::CREATE,
        EventKind::Remove(RemoveKind::Folder) => WatchOp::REMOVE | WatchOp::DIR,
        EventKind::Remove(_) => WatchOp::REMOVE,
        EventKind::Modify(ModifyKind::Name(mode)) => match mode {
            RenameMode::From => WatchOp::RENAME,
            RenameMode::To => WatchOp::CREATE,
            // both halves are reported on their own as well
            RenameMode::Both => WatchOp::empty(),
            RenameMode::Any | RenameMode::Other => {
                if path.symlink_metadata().is_ok() {
                    WatchOp::CREATE
                } else {
                    WatchOp::RENAME
                }
            }
        },
        EventKind::Modify(ModifyKind::Metadata(_)) => WatchOp::CHMOD,
        EventKind::Modify(_) => WatchOp::WRITE,
        EventKind::Access(_) | EventKind::Any | EventKind::Other => WatchOp::empty(),
    }
}
