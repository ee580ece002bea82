//! Background snapshot writer
//!
//! Receives serialized snapshots from the UI thread and writes them on a
//! dedicated I/O thread. Saves arriving within the debounce window are
//! coalesced: only the latest content for the slot reaches disk.
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use ac_base::config::constants::{PERSIST_DEBOUNCE_MS, PERSIST_FLUSH_TIMEOUT_SECS};

/// A single file write operation
#[derive(Debug, Clone)]
pub struct WriteOp {
    pub path: PathBuf,
    pub content: Vec<u8>,
}

/// Messages sent to the writer thread
enum WriterMsg {
    /// Replaces any pending write (last-write-wins)
    Write(WriteOp),
    /// Write the pending op now and signal completion
    Flush,
    Shutdown,
}

/// Handle to the background writer
pub struct PersistenceWriter {
    tx: Sender<WriterMsg>,
    flush_sync: Arc<(Mutex<bool>, Condvar)>,
    handle: Option<JoinHandle<()>>,
}

impl PersistenceWriter {
    pub fn new() -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let flush_sync = Arc::new((Mutex::new(false), Condvar::new()));
        let flush_sync_clone = flush_sync.clone();

        let handle = thread::Builder::new().name("snapshot-writer".to_string()).spawn(move || {
            writer_loop(rx, flush_sync_clone);
        })?;

        Ok(Self { tx, flush_sync, handle: Some(handle) })
    }

    /// Queue a write (debounced)
    pub fn send(&self, op: WriteOp) {
        let _ = self.tx.send(WriterMsg::Write(op));
    }

    /// Write whatever is pending and block until it is on disk.
    pub fn flush(&self) {
        {
            let (lock, _) = &*self.flush_sync;
            let mut flushed = lock.lock().unwrap_or_else(|e| e.into_inner());
            *flushed = false;
        }

        if self.tx.send(WriterMsg::Flush).is_err() {
            return;
        }

        let (lock, cvar) = &*self.flush_sync;
        let mut flushed = lock.lock().unwrap_or_else(|e| e.into_inner());
        while !*flushed {
            let result = cvar
                .wait_timeout(flushed, Duration::from_secs(PERSIST_FLUSH_TIMEOUT_SECS))
                .unwrap_or_else(|e| e.into_inner());
            flushed = result.0;
            if result.1.timed_out() {
                tracing::warn!("snapshot flush timed out");
                break;
            }
        }
    }

    pub fn shutdown(&mut self) {
        let _ = self.tx.send(WriterMsg::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for PersistenceWriter {
    fn drop(&mut self) {
        self.flush();
        self.shutdown();
    }
}

fn writer_loop(rx: Receiver<WriterMsg>, flush_sync: Arc<(Mutex<bool>, Condvar)>) {
    let mut pending: Option<WriteOp> = None;

    loop {
        // With a pending write, wait at most the debounce window
        let msg = if pending.is_some() {
            match rx.recv_timeout(Duration::from_millis(PERSIST_DEBOUNCE_MS)) {
                Ok(msg) => Some(msg),
                Err(mpsc::RecvTimeoutError::Timeout) => None,
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        } else {
            match rx.recv() {
                Ok(msg) => Some(msg),
                Err(_) => break,
            }
        };

        match msg {
            Some(WriterMsg::Write(op)) => {
                pending = Some(op);
            }
            Some(WriterMsg::Flush) => {
                if let Some(op) = pending.take() {
                    write_file(&op.path, &op.content);
                }
                let (lock, cvar) = &*flush_sync;
                let mut flushed = lock.lock().unwrap_or_else(|e| e.into_inner());
                *flushed = true;
                cvar.notify_all();
            }
            Some(WriterMsg::Shutdown) => break,
            None => {
                if let Some(op) = pending.take() {
                    write_file(&op.path, &op.content);
                }
            }
        }
    }

    if let Some(op) = pending.take() {
        write_file(&op.path, &op.content);
    }
}

/// Write a file, creating parent directories if needed. Errors are logged.
pub fn write_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && let Err(e) = fs::create_dir_all(parent)
    {
        tracing::error!(dir = %parent.display(), "failed to create snapshot dir: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, content) {
        tracing::error!(path = %path.display(), "failed to write snapshot: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flush_writes_latest_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("slot.json");
        let writer = PersistenceWriter::new().unwrap();

        writer.send(WriteOp { path: path.clone(), content: b"first".to_vec() });
        writer.send(WriteOp { path: path.clone(), content: b"second".to_vec() });
        writer.flush();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn drop_persists_pending_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slot.json");
        {
            let writer = PersistenceWriter::new().unwrap();
            writer.send(WriteOp { path: path.clone(), content: b"bye".to_vec() });
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), "bye");
    }

    #[test]
    fn debounce_window_eventually_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slot.json");
        let writer = PersistenceWriter::new().unwrap();
        writer.send(WriteOp { path: path.clone(), content: b"later".to_vec() });
        thread::sleep(Duration::from_millis(PERSIST_DEBOUNCE_MS * 6));
        assert_eq!(fs::read_to_string(&path).unwrap(), "later");
    }
}
