pub mod config;
pub mod dir_notifier;
pub mod simple_notifier;
pub mod watch;
