//! Append-only transaction log
//!
//! Each committed ledger event becomes one plain-text line,
//! `<account_name>: <description>`. Writes are flushed and synced before
//! returning so a line the ledger reports as committed survives a crash.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{TellerError, TellerResult};

/// One line of the transaction log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub account: String,
    pub description: String,
}

impl LogEntry {
    pub fn new(account: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            description: description.into(),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.account, self.description)
    }
}

/// Handles appending entries to the transaction log file
///
/// The file is opened per write in append mode. Committed lines are never
/// rewritten; only the bytes of a failed append are cut back off. The parent
/// directory is not created: a missing directory is a write failure.
#[derive(Debug, Clone)]
pub struct TransactionLog {
    log_path: PathBuf,
}

impl TransactionLog {
    /// Create a log that writes to the specified path
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
        }
    }

    /// Append a single entry
    pub fn append(&self, account_name: &str, description: &str) -> TellerResult<()> {
        self.append_all(&[LogEntry::new(account_name, description)])
    }

    /// Append several entries belonging to one operation
    ///
    /// The lines are written in order with a single write call, then flushed
    /// and synced once. On any failure the file is truncated back to its
    /// previous length.
    pub fn append_all(&self, entries: &[LogEntry]) -> TellerResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut buffer = String::new();
        for entry in entries {
            buffer.push_str(&entry.to_string());
            buffer.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| self.write_error("open", e))?;

        append_durably(&mut file, buffer.as_bytes()).map_err(|failure| {
            let mut message = format!(
                "Failed to {} {}: {}",
                failure.action,
                self.log_path.display(),
                failure.source
            );
            if let Some(rollback) = failure.rollback {
                message.push_str(&format!("; rollback failed: {}", rollback));
            }
            TellerError::LogWrite(message)
        })
    }

    /// Read every line back, oldest first
    ///
    /// Only for audit tooling and tests; the ledger never rebuilds state from
    /// the log.
    pub fn read_lines(&self) -> TellerResult<Vec<String>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path).map_err(|e| {
            TellerError::Io(format!(
                "Failed to open transaction log {}: {}",
                self.log_path.display(),
                e
            ))
        })?;

        let mut lines = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                TellerError::Io(format!(
                    "Failed to read transaction log line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;
            if !line.is_empty() {
                lines.push(line);
            }
        }

        Ok(lines)
    }

    /// Read lines back as entries, splitting at the first `": "`
    ///
    /// Account names containing `": "` cannot be told apart from the
    /// description here.
    pub fn read_entries(&self) -> TellerResult<Vec<LogEntry>> {
        Ok(self
            .read_lines()?
            .into_iter()
            .map(|line| match line.split_once(": ") {
                Some((account, description)) => LogEntry::new(account, description),
                None => LogEntry::new(line, ""),
            })
            .collect())
    }

    /// Get the number of entries in the log
    pub fn entry_count(&self) -> TellerResult<usize> {
        Ok(self.read_lines()?.len())
    }

    /// Check if the log file exists
    pub fn exists(&self) -> bool {
        self.log_path.exists()
    }

    /// Get the path to the log file
    pub fn path(&self) -> &Path {
        &self.log_path
    }

    fn write_error(&self, action: &str, err: std::io::Error) -> TellerError {
        TellerError::LogWrite(format!(
            "Failed to {} {}: {}",
            action,
            self.log_path.display(),
            err
        ))
    }
}

/// File operations needed for an append that can be undone
trait AppendTarget: Write {
    fn current_len(&self) -> io::Result<u64>;
    fn sync(&mut self) -> io::Result<()>;
    fn truncate_to(&mut self, len: u64) -> io::Result<()>;
}

impl AppendTarget for File {
    fn current_len(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_data()
    }

    fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)?;
        self.sync_data()
    }
}

struct AppendFailure {
    action: &'static str,
    source: io::Error,
    rollback: Option<io::Error>,
}

/// Write, flush and sync `bytes`, or leave the target at its prior length
///
/// A failed append must not leave a whole or torn line behind: the ledger
/// treats the event as never having happened.
fn append_durably<T: AppendTarget>(target: &mut T, bytes: &[u8]) -> Result<(), AppendFailure> {
    let prev_len = target.current_len().map_err(|source| AppendFailure {
        action: "inspect",
        source,
        rollback: None,
    })?;

    let result = target
        .write_all(bytes)
        .map_err(|e| ("write", e))
        .and_then(|_| target.flush().map_err(|e| ("flush", e)))
        .and_then(|_| target.sync().map_err(|e| ("sync", e)));

    result.map_err(|(action, source)| AppendFailure {
        action,
        source,
        rollback: target.truncate_to(prev_len).err(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Clone, Copy, PartialEq)]
    enum Fault {
        /// accept this many bytes, then fail
        WriteAfter(usize),
        Flush,
        Sync,
    }

    struct FaultyTarget {
        data: Vec<u8>,
        fault: Fault,
    }

    impl FaultyTarget {
        fn new(existing: &[u8], fault: Fault) -> Self {
            Self {
                data: existing.to_vec(),
                fault,
            }
        }
    }

    impl Write for FaultyTarget {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if let Fault::WriteAfter(limit) = self.fault {
                let room = limit.saturating_sub(self.data.len());
                if room == 0 {
                    return Err(io::Error::new(io::ErrorKind::Other, "no space left"));
                }
                let n = room.min(buf.len());
                self.data.extend_from_slice(&buf[..n]);
                return Ok(n);
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            if self.fault == Fault::Flush {
                return Err(io::Error::new(io::ErrorKind::Other, "flush failed"));
            }
            Ok(())
        }
    }

    impl AppendTarget for FaultyTarget {
        fn current_len(&self) -> io::Result<u64> {
            Ok(self.data.len() as u64)
        }

        fn sync(&mut self) -> io::Result<()> {
            if self.fault == Fault::Sync {
                return Err(io::Error::new(io::ErrorKind::Other, "sync failed"));
            }
            Ok(())
        }

        fn truncate_to(&mut self, len: u64) -> io::Result<()> {
            self.data.truncate(len as usize);
            Ok(())
        }
    }

    #[test]
    fn test_failed_append_leaves_prior_contents() {
        let existing = b"alice: Deposit: $5\n";
        let line = b"alice: Deposit: $1\n";

        for fault in [
            Fault::WriteAfter(existing.len() + 7),
            Fault::Flush,
            Fault::Sync,
        ] {
            let mut target = FaultyTarget::new(existing, fault);
            let failure = append_durably(&mut target, line).err().unwrap();
            assert!(failure.rollback.is_none());
            assert_eq!(target.data, existing.to_vec());
        }
    }

    #[test]
    fn test_successful_append_keeps_bytes() {
        let mut target = FaultyTarget::new(b"", Fault::WriteAfter(1024));
        assert!(append_durably(&mut target, b"bob: Deposit: $2\n").is_ok());
        assert_eq!(target.data, b"bob: Deposit: $2\n".to_vec());
    }

    #[test]
    fn test_file_truncate_restores_length() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.txt");
        std::fs::write(&path, "alice: Deposit: $5\n").unwrap();

        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        let prev_len = file.current_len().unwrap();
        file.write_all(b"alice: Depo").unwrap();
        file.truncate_to(prev_len).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "alice: Deposit: $5\n");
    }

    fn create_test_log() -> (TransactionLog, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let log = TransactionLog::new(temp_dir.path().join("transactions.txt"));
        (log, temp_dir)
    }

    #[test]
    fn test_append_format() {
        let (log, _temp) = create_test_log();

        log.append("alice", "Deposit: $100").unwrap();

        let raw = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(raw, "alice: Deposit: $100\n");
    }

    #[test]
    fn test_append_is_append_only() {
        let (log, _temp) = create_test_log();

        log.append("alice", "Deposit: $100").unwrap();
        log.append("alice", "Withdrawal: $40").unwrap();
        log.append("bob", "Deposit: $5.5").unwrap();

        assert_eq!(
            log.read_lines().unwrap(),
            vec![
                "alice: Deposit: $100",
                "alice: Withdrawal: $40",
                "bob: Deposit: $5.5",
            ]
        );
    }

    #[test]
    fn test_append_all_preserves_order() {
        let (log, _temp) = create_test_log();

        log.append_all(&[
            LogEntry::new("A", "Transfer to B: $30"),
            LogEntry::new("B", "Transfer from A: $30"),
        ])
        .unwrap();

        let entries = log.read_entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], LogEntry::new("A", "Transfer to B: $30"));
        assert_eq!(entries[1], LogEntry::new("B", "Transfer from A: $30"));
    }

    #[test]
    fn test_append_all_empty_does_not_touch_file() {
        let (log, _temp) = create_test_log();

        log.append_all(&[]).unwrap();
        assert!(!log.exists());
    }

    #[test]
    fn test_missing_directory_is_log_write_error() {
        let temp_dir = TempDir::new().unwrap();
        let log = TransactionLog::new(temp_dir.path().join("missing").join("log.txt"));

        let err = log.append("alice", "Deposit: $1").unwrap_err();
        assert!(err.is_log_write());
    }

    #[test]
    fn test_directory_path_is_log_write_error() {
        let temp_dir = TempDir::new().unwrap();
        let log = TransactionLog::new(temp_dir.path());

        assert!(log.append("alice", "Deposit: $1").unwrap_err().is_log_write());
    }

    #[test]
    fn test_empty_log() {
        let (log, _temp) = create_test_log();

        assert!(!log.exists());
        assert_eq!(log.entry_count().unwrap(), 0);
        assert!(log.read_entries().unwrap().is_empty());
    }

    #[test]
    fn test_survives_reopen() {
        let (log, temp) = create_test_log();
        log.append("alice", "Deposit: $1").unwrap();

        let reopened = TransactionLog::new(temp.path().join("transactions.txt"));
        reopened.append("alice", "Deposit: $2").unwrap();

        assert_eq!(reopened.entry_count().unwrap(), 2);
    }
}
