//! Notifier which lists the directory on start and on every reload, and nothing else.
use crate::entities::target::absolute;
use crate::result::{HaltErr, NotifierErr};
use crate::use_cases::emitter::Emitter;
use crate::use_cases::lister::list_elements;
use crate::use_cases::notifier::{EventRx, Notifier};
use crate::use_cases::signal::{shutdown_signal, Shutdown, ShutdownTrigger};

use crossbeam_channel::{bounded, select, Receiver, Sender};
use std::path::{Path, PathBuf};
use std::thread;
use tracing::{debug, instrument, trace};

#[derive(Debug)]
pub struct SimpleNotifier {
    events: EventRx,
    reload_tx: Sender<()>,
    trigger: ShutdownTrigger,
    shutdown: Shutdown,
}

impl SimpleNotifier {
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, NotifierErr> {
        let path = path.as_ref();
        let dir = absolute(path).map_err(|source| NotifierErr::Resolve {
            path: path.to_path_buf(),
            source,
        })?;

        let (events_tx, events) = bounded(0);
        let (reload_tx, reload_rx) = bounded(0);
        let (trigger, shutdown) = shutdown_signal();
        let emitter = Emitter::new(events_tx, shutdown.clone());

        debug!("spawning listing thread");
        thread::spawn(move || ListingLoop::new(dir, emitter, reload_rx).run());

        Ok(Self {
            events,
            reload_tx,
            trigger,
            shutdown,
        })
    }
}

impl Notifier for SimpleNotifier {
    fn events(&self) -> EventRx {
        self.events.clone()
    }

    /// Blocks until the listing thread accepts the request or the notifier gets closed.
    fn reload(&self) {
        if self.shutdown.is_pulled() {
            debug!("reload after close ignored");
            return;
        }
        select! {
            send(self.reload_tx, ()) -> res => match res {
                Ok(()) => trace!("reload accepted"),
                Err(_) => debug!("listing thread already stopped"),
            },
            recv(self.shutdown.receiver()) -> _ => debug!("closed while reloading"),
        }
    }

    fn close(&self) {
        self.trigger.pull();
    }
}

impl Drop for SimpleNotifier {
    fn drop(&mut self) {
        self.close();
    }
}

struct ListingLoop {
    dir: PathBuf,
    emitter: Emitter,
    reload: Receiver<()>,
}

impl ListingLoop {
    fn new(dir: PathBuf, emitter: Emitter, reload: Receiver<()>) -> Self {
        Self {
            dir,
            emitter,
            reload,
        }
    }

    fn run(self) {
        debug!("listing thread spawned");
        if let Err(e) = self.process() {
            debug!("listing thread stopped: {}", e);
        }
    }

    fn process(&self) -> Result<(), HaltErr> {
        list_elements(&self.dir, &self.emitter)?;
        let shutdown = self.emitter.shutdown();
        loop {
            shutdown.ensure_running()?;
            select! {
                recv(shutdown.receiver()) -> _ => return Err(HaltErr::Closed),
                recv(self.reload) -> msg => {
                    msg.map_err(|_| HaltErr::Closed)?;
                    list_elements(&self.dir, &self.emitter)?;
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::configuration::telemetry::init_tracing;
    use crate::entities::event::NotifyEventOp;
    use crate::testingtools::EventsExt;

    use anyhow::Result;
    use claim::{assert_matches, assert_none};
    use crossbeam_channel::RecvTimeoutError;
    use std::fs::{self, File};
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    #[test]
    fn initial_listing_is_emitted() -> Result<()> {
        // given
        init_tracing();
        let dir = tempdir()?;
        File::create(dir.path().join("a.txt"))?;

        // when
        let notifier = SimpleNotifier::new(dir.path())?;

        // then
        assert_eq!(
            notifier.events().next_n(3)?,
            vec![
                (NotifyEventOp::Make, String::new()),
                (NotifyEventOp::List, "a.txt".to_string()),
                (NotifyEventOp::List, String::new()),
            ]
        );

        Ok(())
    }

    #[test]
    fn missing_dir_is_accepted() -> Result<()> {
        // given
        init_tracing();
        let parent = tempdir()?;

        // when
        let notifier = SimpleNotifier::new(parent.path().join("missing"))?;

        // then
        let ops: Vec<_> = notifier.events().next_n(3)?.into_iter().map(|(op, _)| op).collect();
        assert_eq!(
            ops,
            vec![NotifyEventOp::Make, NotifyEventOp::Error, NotifyEventOp::List]
        );

        Ok(())
    }

    #[test]
    fn reload_lists_current_content() -> Result<()> {
        // given
        init_tracing();
        let dir = tempdir()?;
        let notifier = Arc::new(SimpleNotifier::new(dir.path())?);
        let events = notifier.events();
        events.next_n(2)?;
        File::create(dir.path().join("x.txt"))?;

        // when
        let reloader = notifier.clone();
        let handle = thread::spawn(move || reloader.reload());

        // then
        assert_eq!(
            events.next_n(3)?,
            vec![
                (NotifyEventOp::Make, String::new()),
                (NotifyEventOp::List, "x.txt".to_string()),
                (NotifyEventOp::List, String::new()),
            ]
        );
        handle.join().expect("reload panicked");

        Ok(())
    }

    #[test]
    fn changes_between_reloads_are_not_reported() -> Result<()> {
        // given
        init_tracing();
        let dir = tempdir()?;
        let notifier = SimpleNotifier::new(dir.path())?;
        let events = notifier.events();
        events.next_n(2)?;

        // when
        File::create(dir.path().join("a.txt"))?;
        fs::remove_file(dir.path().join("a.txt"))?;

        // then
        assert_matches!(
            events.recv_timeout(Duration::from_millis(300)),
            Err(RecvTimeoutError::Timeout)
        );

        Ok(())
    }

    #[test]
    fn close_disconnects_event_channel() -> Result<()> {
        // given
        init_tracing();
        let dir = tempdir()?;
        let notifier = SimpleNotifier::new(dir.path())?;
        let events = notifier.events();
        events.next_n(2)?;

        // when
        notifier.close();

        // then
        assert_eq!(events.drain_until_disconnected()?, 0);

        Ok(())
    }

    #[test]
    fn close_mid_pass_disconnects_event_channel() -> Result<()> {
        // given
        init_tracing();
        let dir = tempdir()?;
        File::create(dir.path().join("a.txt"))?;
        let notifier = SimpleNotifier::new(dir.path())?;
        let events = notifier.events();

        // when
        notifier.close();

        // then
        assert!(events.drain_until_disconnected()? <= 1);

        Ok(())
    }

    #[test]
    fn reload_after_close_returns_promptly() -> Result<()> {
        // given
        init_tracing();
        let dir = tempdir()?;
        let notifier = SimpleNotifier::new(dir.path())?;
        let events = notifier.events();
        notifier.close();
        events.drain_until_disconnected()?;

        // when
        let started = Instant::now();
        notifier.reload();

        // then
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_none!(events.try_iter().next());

        Ok(())
    }

    #[test]
    fn close_unblocks_pending_reload() -> Result<()> {
        // given
        init_tracing();
        let dir = tempdir()?;
        let notifier = Arc::new(SimpleNotifier::new(dir.path())?);
        let _events = notifier.events(); // initial pass stays blocked, nobody reads
        let reloader = notifier.clone();
        let handle = thread::spawn(move || reloader.reload());

        // when
        notifier.close();

        // then
        handle.join().expect("reload panicked");

        Ok(())
    }
}
