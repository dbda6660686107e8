//! Notifier backed by native filesystem notifications.
//!
//! Two watches are registered: one on the parent directory, so that (re)creation and removal
//! of the container itself are visible, and a direct one on the container, which reports
//! changes of its elements. Every time the container (re)appears its content is listed again
//! instead of trusting incremental events, because anything which happened before the direct
//! watch got registered would be missed otherwise.
use crate::data_providers::watch::NotifyWatch;
use crate::entities::event::NotifyEvent;
use crate::entities::target::{Relation, WatchTarget};
use crate::entities::watch_op::{RawNotification, WatchOp};
use crate::result::{EventErr, HaltErr, NotifierErr};
use crate::use_cases::emitter::Emitter;
use crate::use_cases::lister::list_elements;
use crate::use_cases::notifier::{EventRx, Notifier};
use crate::use_cases::signal::{shutdown_signal, Shutdown, ShutdownTrigger};
use crate::use_cases::watch::WatchSrc;

use crossbeam_channel::{bounded, select, Receiver, Sender, TrySendError};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::thread;
use tracing::{debug, instrument, trace, warn};

#[derive(Debug)]
pub struct WatchNotifier {
    events: EventRx,
    reload_tx: Sender<()>,
    trigger: ShutdownTrigger,
}

impl WatchNotifier {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, NotifierErr> {
        let source = NotifyWatch::new().map_err(NotifierErr::Init)?;
        Self::with_source(path, Box::new(source))
    }

    /// Creates the notifier on top of an already initialized [`WatchSrc`].
    ///
    /// Only failing to watch the parent directory is fatal. The container itself may not exist
    /// yet, it's picked up through the parent watch once it's created.
    #[instrument(skip(path, source), fields(path = %path.as_ref().display()))]
    pub fn with_source<P: AsRef<Path>>(path: P, mut source: WatchSrc) -> Result<Self, NotifierErr> {
        let target = WatchTarget::resolve(path)?;
        source
            .watch(target.parent())
            .map_err(|source| NotifierErr::ParentWatch {
                path: target.parent().to_path_buf(),
                source,
            })?;
        if let Err(e) = source.watch(target.path()) {
            debug!("container not watched directly (yet): {}", e);
        }

        let (events_tx, events) = bounded(0);
        let (reload_tx, reload_rx) = bounded(1);
        let (trigger, shutdown) = shutdown_signal();
        let inbox = Inbox {
            shutdown: shutdown.clone(),
            reload: reload_rx,
            notifications: source.notifications(),
            errors: source.errors(),
        };
        let reconciler = Reconciler {
            target,
            source,
            emitter: Emitter::new(events_tx, shutdown),
            container: ContainerState::Absent,
            non_regular: HashSet::new(),
        };

        debug!("spawning watching thread");
        thread::spawn(move || WatchLoop { inbox, reconciler }.run());

        Ok(Self {
            events,
            reload_tx,
            trigger,
        })
    }
}

impl Notifier for WatchNotifier {
    fn events(&self) -> EventRx {
        self.events.clone()
    }

    fn reload(&self) {
        match self.reload_tx.try_send(()) {
            Ok(()) => trace!("reload requested"),
            Err(TrySendError::Full(())) => debug!("reload already pending"),
            Err(TrySendError::Disconnected(())) => debug!("reload after notifier stopped"),
        }
    }

    fn close(&self) {
        self.trigger.pull();
    }
}

impl Drop for WatchNotifier {
    fn drop(&mut self) {
        self.close();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerState {
    Present,
    Absent,
}

/// Everything the watching thread blocks on.
struct Inbox {
    shutdown: Shutdown,
    reload: Receiver<()>,
    notifications: Receiver<RawNotification>,
    errors: Receiver<notify::Error>,
}

/// Lifecycle state machine of the container.
struct Reconciler {
    target: WatchTarget,
    source: WatchSrc,
    emitter: Emitter,
    container: ContainerState,
    /// Entries last seen as something else than a regular file.
    non_regular: HashSet<String>,
}

struct WatchLoop {
    inbox: Inbox,
    reconciler: Reconciler,
}

impl WatchLoop {
    fn run(mut self) {
        debug!("watching thread spawned");
        match self.process() {
            Err(HaltErr::SourceGone) => warn!("watch source disconnected, stopping notifier"),
            Err(HaltErr::Closed) | Ok(()) => debug!("notifier closed"),
        }
        // dropping `self` releases the watch and disconnects the event channel
    }

    fn process(&mut self) -> Result<(), HaltErr> {
        self.reconciler.list()?;
        loop {
            self.inbox.shutdown.ensure_running()?;
            trace!("waiting for notification");
            select! {
                recv(self.inbox.shutdown.receiver()) -> _ => return Err(HaltErr::Closed),
                recv(self.inbox.reload) -> msg => {
                    msg.map_err(|_| HaltErr::Closed)?;
                    self.reconciler.list()?;
                }
                recv(self.inbox.errors) -> msg => {
                    let err = msg.map_err(|_| HaltErr::SourceGone)?;
                    self.reconciler.emit(NotifyEvent::error(EventErr::Upstream(err)))?;
                }
                recv(self.inbox.notifications) -> msg => {
                    let raw = msg.map_err(|_| HaltErr::SourceGone)?;
                    self.reconciler.handle(raw)?;
                }
            }
        }
    }
}

impl Reconciler {
    fn emit(&self, event: NotifyEvent) -> Result<(), HaltErr> {
        self.emitter.emit(event)
    }

    fn list(&mut self) -> Result<(), HaltErr> {
        let pass = list_elements(self.target.path(), &self.emitter)?;
        self.non_regular = pass.skipped;
        // what the pass observed, a removal during the hand-off is still to be reported
        self.container = if pass.failed {
            ContainerState::Absent
        } else {
            ContainerState::Present
        };
        Ok(())
    }

    fn handle(&mut self, raw: RawNotification) -> Result<(), HaltErr> {
        trace!("got {:?} on '{}'", raw.op, raw.path.display());
        if raw.op.contains(WatchOp::RESCAN) {
            debug!("events were lost, listing the container again");
            return self.list();
        }
        match self.target.relation(&raw.path) {
            Relation::Container => self.on_container(raw.op),
            Relation::Element(name) => self.on_element(&raw.path, name, raw.op),
            Relation::Unrelated => Ok(()),
        }
    }

    fn on_container(&mut self, op: WatchOp) -> Result<(), HaltErr> {
        if op.is_removal() {
            if let Err(e) = self.source.unwatch(self.target.path()) {
                trace!("container watch already gone: {}", e);
            }
            if self.container == ContainerState::Absent {
                debug!("container removal already reported");
                return Ok(());
            }
            self.container = ContainerState::Absent;
            self.non_regular.clear();
            return self.emit(NotifyEvent::destroy());
        }
        if op.contains(WatchOp::CREATE) {
            if let Err(source) = self.source.watch(self.target.path()) {
                self.emit(NotifyEvent::error(EventErr::Watch {
                    path: self.target.path().to_path_buf(),
                    source,
                }))?;
            }
            return self.list();
        }
        trace!("ignoring {:?} on container", op);
        Ok(())
    }

    fn on_element(&mut self, path: &Path, name: String, op: WatchOp) -> Result<(), HaltErr> {
        if op.is_removal() {
            if self.non_regular.remove(&name) || op.contains(WatchOp::DIR) {
                trace!("ignoring removal of non-regular '{}'", name);
                return Ok(());
            }
            return self.emit(NotifyEvent::delete(name));
        }
        if op.is_change() {
            return match fs::symlink_metadata(path) {
                Ok(meta) if meta.is_file() => {
                    self.non_regular.remove(&name);
                    self.emit(NotifyEvent::update(name))
                }
                Ok(_) => {
                    trace!("ignoring non-regular '{}'", name);
                    self.non_regular.insert(name);
                    Ok(())
                }
                Err(e) => {
                    trace!("'{}' vanished before it could be checked: {}", name, e);
                    Ok(())
                }
            };
        }
        Ok(())
    }
}
