//! In-memory registry of accepted upload files.
//!
//! Entries are keyed by an opaque [`FileId`] and kept in insertion order via
//! a separate position index, so removal never scans and rendering never
//! re-sorts.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Opaque identifier for a registry entry. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(u64);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file-{}", self.0)
    }
}

/// A candidate or accepted upload: display name plus raw bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub data: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Payload size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("name", &self.name)
            .field("size", &self.data.len())
            .finish()
    }
}

/// Display status of a registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Ready,
    Processing,
    Processed,
    Error,
}

impl FileStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::Processing => "Processing",
            Self::Processed => "Processed",
            Self::Error => "Error",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Processed | Self::Error)
    }

    /// Ready → Processing → {Processed, Error}. Nothing else.
    pub fn can_transition_to(self, next: FileStatus) -> bool {
        matches!(
            (self, next),
            (Self::Ready, Self::Processing)
                | (Self::Processing, Self::Processed)
                | (Self::Processing, Self::Error)
        )
    }
}

/// One accepted upload tracked by the registry.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub id: FileId,
    pub file: UploadFile,
    pub status: FileStatus,
}

#[derive(Debug)]
struct Slot {
    position: u64,
    entry: FileEntry,
}

/// Ordered, id-keyed collection of [`FileEntry`] values.
#[derive(Debug, Default)]
pub struct FileRegistry {
    entries: HashMap<FileId, Slot>,
    order: BTreeMap<u64, FileId>,
    next_id: u64,
    next_position: u64,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> FileId {
        self.next_id += 1;
        FileId(self.next_id)
    }

    /// Append `file` with status Ready under a fresh id.
    ///
    /// Files are never deduplicated: two uploads with the same name and size
    /// are two entries.
    pub fn add(&mut self, file: UploadFile) -> &FileEntry {
        let id = self.allocate_id();
        let position = self.next_position;
        self.next_position += 1;

        self.order.insert(position, id);
        let slot = self.entries.entry(id).or_insert(Slot {
            position,
            entry: FileEntry {
                id,
                file,
                status: FileStatus::Ready,
            },
        });
        &slot.entry
    }

    /// Remove the entry with `id`. Absent ids are ignored.
    pub fn remove(&mut self, id: FileId) -> Option<FileEntry> {
        let slot = self.entries.remove(&id)?;
        self.order.remove(&slot.position);
        Some(slot.entry)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Move an entry to `status` if the transition is legal.
    ///
    /// Returns `false` when the id is gone (removed mid-flight) or the
    /// transition is not allowed; neither is an error for the caller.
    pub fn set_status(&mut self, id: FileId, status: FileStatus) -> bool {
        let Some(slot) = self.entries.get_mut(&id) else {
            return false;
        };
        if !slot.entry.status.can_transition_to(status) {
            tracing::debug!(
                %id,
                from = slot.entry.status.label(),
                to = status.label(),
                "ignoring illegal status transition"
            );
            return false;
        }
        slot.entry.status = status;
        true
    }

    /// Replace a terminal entry with a fresh Ready entry at the same position.
    ///
    /// Returns the id to use from now on: the new id for a renewed entry, the
    /// unchanged id for a non-terminal one, or `None` if absent.
    pub fn renew(&mut self, id: FileId) -> Option<FileId> {
        let status = self.entries.get(&id)?.entry.status;
        if !status.is_terminal() {
            return Some(id);
        }
        let slot = self.entries.remove(&id)?;
        let new_id = self.allocate_id();
        self.order.insert(slot.position, new_id);
        self.entries.insert(
            new_id,
            Slot {
                position: slot.position,
                entry: FileEntry {
                    id: new_id,
                    file: slot.entry.file,
                    status: FileStatus::Ready,
                },
            },
        );
        Some(new_id)
    }

    pub fn get(&self, id: FileId) -> Option<&FileEntry> {
        self.entries.get(&id).map(|s| &s.entry)
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn list(&self) -> impl Iterator<Item = &FileEntry> + '_ {
        self.order
            .values()
            .filter_map(move |id| self.entries.get(id).map(|s| &s.entry))
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> Vec<FileId> {
        self.order.values().copied().collect()
    }
}

/// Human-readable byte size: `0 Bytes`, `512 Bytes`, `1.5 KB`, `2.25 MB`.
pub fn format_file_size(bytes: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    // `{}` on f64 drops trailing zeros: 1.50 -> 1.5, 2.00 -> 2
    format!("{} {}", rounded, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, size: usize) -> UploadFile {
        UploadFile::new(name, vec![0u8; size])
    }

    fn names(reg: &FileRegistry) -> Vec<String> {
        reg.list().map(|e| e.file.name.clone()).collect()
    }

    #[test]
    fn add_appends_ready_entries_in_order() {
        let mut reg = FileRegistry::new();
        reg.add(file("a.pdf", 1));
        reg.add(file("b.pdf", 2));
        reg.add(file("c.pdf", 3));

        assert_eq!(reg.count(), 3);
        assert_eq!(names(&reg), ["a.pdf", "b.pdf", "c.pdf"]);
        assert!(reg.list().all(|e| e.status == FileStatus::Ready));
    }

    #[test]
    fn identical_files_get_distinct_ids() {
        let mut reg = FileRegistry::new();
        let a = reg.add(file("same.txt", 10)).id;
        let b = reg.add(file("same.txt", 10)).id;
        assert_ne!(a, b);
        assert_eq!(reg.count(), 2);
    }

    #[test]
    fn add_then_remove_restores_previous_state() {
        let mut reg = FileRegistry::new();
        reg.add(file("a.pdf", 1));
        reg.add(file("b.pdf", 1));
        let before = names(&reg);

        let id = reg.add(file("c.pdf", 1)).id;
        assert!(reg.remove(id).is_some());

        assert_eq!(reg.count(), 2);
        assert_eq!(names(&reg), before);
    }

    #[test]
    fn removing_middle_entry_keeps_order() {
        let mut reg = FileRegistry::new();
        reg.add(file("a.pdf", 1));
        let b = reg.add(file("b.pdf", 1)).id;
        reg.add(file("c.pdf", 1));

        reg.remove(b);
        assert_eq!(names(&reg), ["a.pdf", "c.pdf"]);
    }

    #[test]
    fn remove_absent_id_is_noop() {
        let mut reg = FileRegistry::new();
        let id = reg.add(file("a.pdf", 1)).id;
        reg.clear();
        assert!(reg.remove(id).is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn ids_stay_unique_across_clear() {
        let mut reg = FileRegistry::new();
        let first = reg.add(file("a.pdf", 1)).id;
        reg.clear();
        let second = reg.add(file("a.pdf", 1)).id;
        assert_ne!(first, second);
    }

    #[test]
    fn status_follows_lifecycle() {
        let mut reg = FileRegistry::new();
        let id = reg.add(file("a.pdf", 1)).id;

        assert!(!reg.set_status(id, FileStatus::Processed));
        assert!(reg.set_status(id, FileStatus::Processing));
        assert!(!reg.set_status(id, FileStatus::Ready));
        assert!(reg.set_status(id, FileStatus::Error));
        assert!(!reg.set_status(id, FileStatus::Processing));
        assert_eq!(reg.get(id).map(|e| e.status), Some(FileStatus::Error));
    }

    #[test]
    fn set_status_on_removed_entry_is_noop() {
        let mut reg = FileRegistry::new();
        let id = reg.add(file("a.pdf", 1)).id;
        reg.remove(id);
        assert!(!reg.set_status(id, FileStatus::Processing));
    }

    #[test]
    fn renew_replaces_terminal_entry_in_place() {
        let mut reg = FileRegistry::new();
        reg.add(file("a.pdf", 1));
        let b = reg.add(file("b.pdf", 1)).id;
        reg.add(file("c.pdf", 1));
        reg.set_status(b, FileStatus::Processing);
        reg.set_status(b, FileStatus::Processed);

        let renewed = reg.renew(b).unwrap();
        assert_ne!(renewed, b);
        assert!(reg.get(b).is_none());
        assert_eq!(reg.get(renewed).map(|e| e.status), Some(FileStatus::Ready));
        assert_eq!(names(&reg), ["a.pdf", "b.pdf", "c.pdf"]);
    }

    #[test]
    fn renew_keeps_ready_entry() {
        let mut reg = FileRegistry::new();
        let id = reg.add(file("a.pdf", 1)).id;
        assert_eq!(reg.renew(id), Some(id));
    }

    #[test]
    fn file_size_formatting() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024), "1 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
    }
}
