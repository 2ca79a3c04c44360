pub mod config;
pub mod storage;
pub mod study;

use std::path::PathBuf;

use config::Config;
use storage::{FileStore, Result};
use study::StudyTracker;

/// Open the study log, creating the data directory and writing sample
/// sessions on first use when the config allows it.
pub fn open(data_dir: PathBuf, config: &Config) -> Result<StudyTracker<FileStore>> {
    let store = FileStore::new(data_dir);
    store.init()?;
    let fresh = store.is_fresh();

    let mut tracker = StudyTracker::new(store);
    if fresh && config.seed_sample_data {
        tracker.seed_sample_data()?;
    }

    log::debug!("Opened study log at {:?}", tracker.store().base_path());
    Ok(tracker)
}
