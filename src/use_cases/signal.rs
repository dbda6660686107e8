//! Level-triggered shutdown signal.
//!
//! The signal is a zero-capacity channel on which nothing is ever sent. Pulling the
//! [`ShutdownTrigger`] drops the only sender, after which every [`Shutdown`] clone sees the
//! channel disconnected, forever. This makes it usable in any number of `select!`s at once.
use crate::result::HaltErr;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use std::sync::Mutex;

pub fn shutdown_signal() -> (ShutdownTrigger, Shutdown) {
    let (tx, rx) = bounded(0);
    (ShutdownTrigger(Mutex::new(Some(tx))), Shutdown(rx))
}

#[derive(Debug)]
pub struct ShutdownTrigger(Mutex<Option<Sender<()>>>);

impl ShutdownTrigger {
    /// Sets the signal. Idempotent and never blocks for longer than the inner lock.
    pub fn pull(&self) {
        let mut tx = match self.0.lock() {
            Ok(tx) => tx,
            Err(poisoned) => poisoned.into_inner(),
        };
        tx.take();
    }
}

#[derive(Debug, Clone)]
pub struct Shutdown(Receiver<()>);

impl Shutdown {
    pub fn is_pulled(&self) -> bool {
        matches!(self.0.try_recv(), Err(TryRecvError::Disconnected))
    }

    pub fn ensure_running(&self) -> Result<(), HaltErr> {
        if self.is_pulled() {
            Err(HaltErr::Closed)
        } else {
            Ok(())
        }
    }

    /// Becomes ready (disconnected) once the trigger is pulled.
    pub fn receiver(&self) -> &Receiver<()> {
        &self.0
    }
}
