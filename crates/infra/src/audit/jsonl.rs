use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use bluesky_core::CustomerId;
use bluesky_ledger::log::keep_most_recent;
use bluesky_ledger::{LogEntry, LogError, TransactionLog};

/// Append-only JSON-lines file, one `LogEntry` object per line.
///
/// Appends are serialized through a mutex so concurrent writers cannot
/// interleave partial lines. Reads reopen the file every time.
#[derive(Debug)]
pub struct JsonlTransactionLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlTransactionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, err: impl core::fmt::Display) -> LogError {
        LogError::Unavailable(format!("{}: {err}", self.path.display()))
    }
}

impl TransactionLog for JsonlTransactionLog {
    fn append(&self, entry: LogEntry) -> Result<(), LogError> {
        let mut line = serde_json::to_string(&entry).map_err(|e| self.unavailable(e))?;
        line.push('\n');

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| self.unavailable("lock poisoned"))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.unavailable(e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.unavailable(e))?;
        file.write_all(line.as_bytes()).map_err(|e| self.unavailable(e))?;
        Ok(())
    }

    fn list_for(&self, customer_id: CustomerId, limit: usize) -> Result<Vec<LogEntry>, LogError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.unavailable(e)),
        };

        let mut matching = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| self.unavailable(e))?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: LogEntry = serde_json::from_str(&line)
                .map_err(|e| self.unavailable(format!("line {}: {e}", idx + 1)))?;
            if entry.customer_id == customer_id {
                matching.push(entry);
            }
        }

        Ok(keep_most_recent(matching, limit))
    }
}
