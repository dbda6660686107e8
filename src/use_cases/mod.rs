pub mod config;
pub mod emitter;
pub mod lister;
pub mod notifier;
pub mod signal;
pub mod watch;
