use std::sync::Arc;

use crate::data_providers::config::{FsConfigLoader, FsConfigResolver};
use crate::data_providers::dir_notifier::WatchNotifier;
use crate::data_providers::simple_notifier::SimpleNotifier;
use crate::result::NotifierErr;
use crate::use_cases::config::{CfgLoader, CfgResolver, Config, NotifierKind};
use crate::use_cases::notifier::DirNotify;

pub fn config_resolver(config_loader: CfgLoader) -> CfgResolver {
    Box::new(FsConfigResolver::new(config_loader))
}

pub fn config_loader() -> CfgLoader {
    Box::new(FsConfigLoader)
}

pub fn notifier(cfg: &Config) -> Result<DirNotify, NotifierErr> {
    Ok(match cfg.notifier {
        NotifierKind::Watch => Arc::new(WatchNotifier::new(&cfg.watched_dir)?),
        NotifierKind::Simple => Arc::new(SimpleNotifier::new(&cfg.watched_dir)?),
    })
}
