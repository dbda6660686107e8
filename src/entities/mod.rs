pub mod event;
pub mod target;
pub mod watch_op;
