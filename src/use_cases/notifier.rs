//! Public contract shared by every notifier.
use crate::entities::event::NotifyEvent;

use crossbeam_channel::Receiver;
use std::sync::Arc;

pub type DirNotify = Arc<dyn Notifier>;

pub type EventRx = Receiver<NotifyEvent>;

/// Sends events about its container and the content of it.
///
/// Events are produced by a single background thread. The event channel has no buffer:
/// the producer waits until the consumer takes each event. The channel is disconnected by the
/// producer only, once it stops after [`Notifier::close`].
pub trait Notifier: Send + Sync {
    /// Returns the receiving end of the event channel.
    fn events(&self) -> EventRx;

    /// Requests a fresh listing pass of the container.
    fn reload(&self);

    /// Stops the notifier. Idempotent and non-blocking.
    fn close(&self);
}
