//! Form snapshot persistence
//!
//! One slot (`<store>/form.json`) mirrors the form. Saves replace the slot
//! wholesale; loads treat a missing or malformed slot as "no snapshot".
pub mod writer;

use std::fs;
use std::path::{Path, PathBuf};

use ac_base::snapshot::FormSnapshot;

use writer::{PersistenceWriter, WriteOp};

pub struct SnapshotStore {
    path: PathBuf,
    /// When set, saves are handed to the background writer instead of
    /// hitting the disk on the caller's thread.
    writer: Option<PersistenceWriter>,
}

impl SnapshotStore {
    /// Synchronous store: every save is on disk when `save` returns.
    pub fn new(path: PathBuf) -> Self {
        Self { path, writer: None }
    }

    /// Debounced store for the interactive UI.
    pub fn with_background_writer(path: PathBuf) -> std::io::Result<Self> {
        Ok(Self { path, writer: Some(PersistenceWriter::new()?) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, snapshot: &FormSnapshot) {
        let op = WriteOp { path: self.path.clone(), content: snapshot.to_json().into_bytes() };
        match &self.writer {
            Some(writer) => writer.send(op),
            None => writer::write_file(&op.path, &op.content),
        }
    }

    pub fn load(&self) -> Option<FormSnapshot> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "cannot read form snapshot: {}", e);
                return None;
            }
        };
        FormSnapshot::from_json(&content)
    }

    /// Make sure the last save is on disk (called before quitting).
    pub fn flush(&self) {
        if let Some(writer) = &self.writer {
            writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_snapshot() -> FormSnapshot {
        FormSnapshot {
            agent_type: Some("blog_artist_ai_agent".into()),
            agent_name: Some("prompt_artist".into()),
            topic: String::new(),
            image_prompt: " misty harbour ".into(),
            webhook_url: "https://hooks.example/mj".into(),
            chaos_percentage: "30".into(),
            filename: Some("harbour.md".into()),
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("form.json"));
        store.save(&full_snapshot());
        assert_eq!(store.load(), Some(full_snapshot()));
    }

    #[test]
    fn background_store_round_trips_after_flush() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::with_background_writer(dir.path().join("form.json")).unwrap();
        store.save(&FormSnapshot::default());
        store.save(&full_snapshot());
        store.flush();
        assert_eq!(store.load(), Some(full_snapshot()));
    }

    #[test]
    fn load_without_save_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("form.json"));
        assert_eq!(store.load(), None);
    }

    #[test]
    fn malformed_slot_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.json");
        fs::write(&path, "{\"agent_type\": ").unwrap();
        assert_eq!(SnapshotStore::new(path).load(), None);
    }

    #[test]
    fn save_replaces_previous_slot() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("form.json"));
        store.save(&full_snapshot());
        let smaller = FormSnapshot { topic: "only topic".into(), ..FormSnapshot::default() };
        store.save(&smaller);
        assert_eq!(store.load(), Some(smaller));
    }
}
