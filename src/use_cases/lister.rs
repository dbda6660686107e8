//! Full listing pass, shared by every notifier.
//!
//! A pass always looks like: `Make`, zero or more named `List`s, nameless `List`. The
//! terminator is sent even when the directory couldn't be read (the failure is reported as an
//! `Error` event in between), so consumers can rely on it to know the pass ended.
use crate::entities::event::NotifyEvent;
use crate::result::{EventErr, HaltErr};
use crate::use_cases::emitter::Emitter;

use std::collections::HashSet;
use std::fs::{self, DirEntry};
use std::path::Path;
use tracing::{debug, instrument, trace};

/// Summary of a finished listing pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListingPass {
    /// Number of regular files reported.
    pub listed: usize,

    /// Names of entries which were skipped because they aren't regular files.
    pub skipped: HashSet<String>,

    /// Whether the directory itself couldn't be read.
    pub failed: bool,
}

#[instrument(skip(emitter))]
pub fn list_elements(dir: &Path, emitter: &Emitter) -> Result<ListingPass, HaltErr> {
    emitter.emit(NotifyEvent::make())?;
    let mut pass = ListingPass::default();
    match fs::read_dir(dir) {
        Ok(entries) => {
            for entry in entries.filter_map(std::result::Result::ok) {
                let name = entry.file_name().to_string_lossy().into_owned();
                if is_regular(&entry) {
                    emitter.emit(NotifyEvent::listed(name))?;
                    pass.listed += 1;
                } else {
                    trace!("skipping non-regular entry '{}'", name);
                    pass.skipped.insert(name);
                }
            }
        }
        Err(source) => {
            debug!("failed to read '{}': {}", dir.display(), source);
            pass.failed = true;
            emitter.emit(NotifyEvent::error(EventErr::Listing {
                path: dir.to_path_buf(),
                source,
            }))?;
        }
    }
    emitter.emit(NotifyEvent::end_of_listing())?;
    debug!(
        "listed {} files, skipped {} entries",
        pass.listed,
        pass.skipped.len()
    );
    Ok(pass)
}

// `DirEntry::metadata` doesn't traverse symlinks
fn is_regular(entry: &DirEntry) -> bool {
    entry.metadata().map(|m| m.is_file()).unwrap_or(false)
}
