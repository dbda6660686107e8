use crate::entities::event::{NotifyEvent, NotifyEventOp};
use crate::entities::watch_op::{RawNotification, WatchOp};
use crate::use_cases::watch::WatchSource;

use anyhow::{anyhow, bail, Result};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

const TIMEOUT: Duration = Duration::from_secs(30);

/// Scripted [`WatchSource`]. Notifications are injected by the [`FakeWatchHandle`].
pub struct FakeWatch {
    state: Arc<Mutex<FakeState>>,
    notifications: Receiver<RawNotification>,
    errors: Receiver<notify::Error>,
    _alive: Sender<()>,
}

#[derive(Default)]
struct FakeState {
    watched: Vec<PathBuf>,
    unwatched: Vec<PathBuf>,
    failing: HashSet<PathBuf>,
}

impl FakeWatch {
    pub fn new() -> (Self, FakeWatchHandle) {
        let state = Arc::new(Mutex::new(FakeState::default()));
        let (notifications_tx, notifications) = unbounded();
        let (errors_tx, errors) = unbounded();
        let (alive_tx, alive_rx) = unbounded();
        (
            Self {
                state: state.clone(),
                notifications,
                errors,
                _alive: alive_tx,
            },
            FakeWatchHandle {
                state,
                senders: Mutex::new(Some((notifications_tx, errors_tx))),
                alive: alive_rx,
            },
        )
    }
}

impl WatchSource for FakeWatch {
    fn watch(&mut self, path: &Path) -> notify::Result<()> {
        let mut state = self.state.lock().expect("poisoned mutex");
        if state.failing.contains(path) {
            debug!("pretending watch of '{}' failed", path.display());
            return Err(notify::Error::path_not_found().add_path(path.to_path_buf()));
        }
        state.watched.push(path.to_path_buf());
        Ok(())
    }

    fn unwatch(&mut self, path: &Path) -> notify::Result<()> {
        self.state
            .lock()
            .expect("poisoned mutex")
            .unwatched
            .push(path.to_path_buf());
        Ok(())
    }

    fn notifications(&self) -> Receiver<RawNotification> {
        self.notifications.clone()
    }

    fn errors(&self) -> Receiver<notify::Error> {
        self.errors.clone()
    }
}

type Senders = (Sender<RawNotification>, Sender<notify::Error>);

pub struct FakeWatchHandle {
    state: Arc<Mutex<FakeState>>,
    senders: Mutex<Option<Senders>>,
    alive: Receiver<()>,
}

impl FakeWatchHandle {
    pub fn notify<P: AsRef<Path>>(&self, path: P, op: WatchOp) {
        if let Some((tx, _)) = self.senders.lock().expect("poisoned mutex").as_ref() {
            tx.send(RawNotification::new(path.as_ref(), op))
                .expect("failed to send notification");
        }
    }

    pub fn fail(&self, err: notify::Error) {
        if let Some((_, tx)) = self.senders.lock().expect("poisoned mutex").as_ref() {
            tx.send(err).expect("failed to send error");
        }
    }

    pub fn fail_watch_on<P: AsRef<Path>>(&self, path: P) {
        self.state
            .lock()
            .expect("poisoned mutex")
            .failing
            .insert(path.as_ref().to_path_buf());
    }

    /// Drops both upstream senders, like a crashed backend would.
    pub fn disconnect(&self) {
        self.senders.lock().expect("poisoned mutex").take();
    }

    pub fn watched(&self) -> Vec<PathBuf> {
        self.state.lock().expect("poisoned mutex").watched.clone()
    }

    pub fn unwatched(&self) -> Vec<PathBuf> {
        self.state.lock().expect("poisoned mutex").unwatched.clone()
    }

    /// Waits until the [`FakeWatch`] is dropped.
    pub fn wait_released(&self) -> bool {
        matches!(
            self.alive.recv_timeout(TIMEOUT),
            Err(RecvTimeoutError::Disconnected)
        )
    }
}

pub trait EventsExt {
    fn next_event(&self) -> Result<NotifyEvent>;

    fn next_pair(&self) -> Result<(NotifyEventOp, String)> {
        let event = self.next_event()?;
        Ok((event.op(), event.name().to_string()))
    }

    fn next_n(&self, n: usize) -> Result<Vec<(NotifyEventOp, String)>> {
        (0..n).map(|_| self.next_pair()).collect()
    }

    /// Receives until the channel is disconnected, returning how many events arrived meanwhile.
    fn drain_until_disconnected(&self) -> Result<usize>;
}

impl EventsExt for Receiver<NotifyEvent> {
    fn next_event(&self) -> Result<NotifyEvent> {
        self.recv_timeout(TIMEOUT)
            .map_err(|e| anyhow!("no event received: {}", e))
    }

    fn drain_until_disconnected(&self) -> Result<usize> {
        let mut count = 0;
        loop {
            match self.recv_timeout(TIMEOUT) {
                Ok(event) => {
                    debug!("drained {}", event);
                    count += 1;
                }
                Err(RecvTimeoutError::Disconnected) => return Ok(count),
                Err(RecvTimeoutError::Timeout) => bail!("channel still connected"),
            }
        }
    }
}
