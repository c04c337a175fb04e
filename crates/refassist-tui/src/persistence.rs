use std::path::PathBuf;

use refassist_core::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};

/// Log directory: `~/.cache/refassist/logs/`, created on demand.
pub fn log_dir() -> Option<PathBuf> {
    let dir = dirs::cache_dir()?.join("refassist").join("logs");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Preference store in the platform config dir, or an in-memory one when
/// the platform has no config dir (the theme then lasts for one session).
pub fn preference_store() -> Box<dyn PreferenceStore> {
    match FilePreferenceStore::platform() {
        Some(store) => Box::new(store),
        None => Box::new(MemoryPreferenceStore::new()),
    }
}
