use crate::entities::event::NotifyEvent;
use crate::result::HaltErr;
use crate::use_cases::signal::Shutdown;

use crossbeam_channel::{select, Sender};
use tracing::trace;

/// Sending side of the event channel, guarded by the shutdown signal.
///
/// The event channel has no buffer, so every emit blocks until the consumer takes the event.
/// It's a race between the consumer and [`Shutdown`]; the shutdown wins when it was already
/// pulled before the emit started.
#[derive(Debug)]
pub struct Emitter {
    events: Sender<NotifyEvent>,
    shutdown: Shutdown,
}

impl Emitter {
    pub fn new(events: Sender<NotifyEvent>, shutdown: Shutdown) -> Self {
        Self { events, shutdown }
    }

    pub fn emit(&self, event: NotifyEvent) -> Result<(), HaltErr> {
        self.shutdown.ensure_running()?;
        trace!("emitting {}", event);
        select! {
            send(self.events, event) -> res => res.map_err(|_| HaltErr::Closed),
            recv(self.shutdown.receiver()) -> _ => Err(HaltErr::Closed),
        }
    }

    pub fn shutdown(&self) -> &Shutdown {
        &self.shutdown
    }
}
