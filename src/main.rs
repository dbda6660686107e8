#![allow(clippy::module_name_repetitions)]

use dirnotify::configuration::factories::{config_loader, config_resolver, notifier};
use dirnotify::configuration::telemetry::init_tracing;
use dirnotify::use_cases::notifier::DirNotify;

use anyhow::Result;
use crossbeam_channel::tick;
use std::env;
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

fn main() -> Result<()> {
    init_tracing();

    let path_override = env::var("DIRNOTIFY_CONFIG_PATH")
        .ok()
        .or_else(|| env::args().nth(1));

    let resolver = config_resolver(config_loader());
    let cfg = resolver.handle_config(path_override)?;

    debug!("watching '{}'", cfg.watched_dir.display());
    let notifier = notifier(&cfg)?;
    if let Some(interval) = cfg.reload_interval {
        spawn_reloader(notifier.clone(), interval);
    }

    for event in notifier.events() {
        match event.err() {
            Some(err) => info!(op = %event.op(), name = event.name(), "{}", err),
            None => info!(op = %event.op(), name = event.name()),
        }
    }
    debug!("event channel disconnected");

    Ok(())
}

fn spawn_reloader(notifier: DirNotify, interval: Duration) {
    debug!("reloading every {:?}", interval);
    thread::spawn(move || {
        for _ in tick(interval) {
            notifier.reload();
        }
    });
}
