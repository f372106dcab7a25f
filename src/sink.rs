//! Append-only persistence of accepted records.

use crate::record::Record;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Writer for the session's record log.
///
/// One line per record, `elapsed,channel_a,channel_b`, no header. Each write
/// is flushed immediately; at serial sample rates durability per record is
/// worth more than write throughput. The file is opened in append mode so an
/// existing log is extended, matching the original capture tool.
pub struct RecordSink {
    file: Option<File>,
}

impl RecordSink {
    /// Open (or create) the log file at `path`, creating parent directories
    /// as needed.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file: Some(file) })
    }

    /// Append one record and flush it through to the OS.
    pub fn write(&mut self, record: &Record) -> std::io::Result<()> {
        if let Some(file) = self.file.as_mut() {
            writeln!(
                file,
                "{},{},{}",
                record.elapsed_secs, record.channel_a, record.channel_b
            )?;
            file.flush()?;
        }
        Ok(())
    }

    /// Flush and release the file handle. Safe to call more than once.
    pub fn close(&mut self) -> std::io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }
        Ok(())
    }
}

impl Drop for RecordSink {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_one_line_per_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.txt");

        let mut sink = RecordSink::open(&path).unwrap();
        sink.write(&Record::new(0.5, 10, 20)).unwrap();
        sink.write(&Record::new(1.25, 30, 40)).unwrap();
        sink.close().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "0.5,10,20\n1.25,30,40\n");
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("2024-06-26").join("10-30-00.txt");

        let mut sink = RecordSink::open(&path).unwrap();
        sink.write(&Record::new(0.0, 1, 2)).unwrap();
        sink.close().unwrap();

        assert!(path.exists());
    }

    #[test]
    fn appends_to_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.txt");

        let mut sink = RecordSink::open(&path).unwrap();
        sink.write(&Record::new(0.0, 1, 2)).unwrap();
        sink.close().unwrap();

        let mut sink = RecordSink::open(&path).unwrap();
        sink.write(&Record::new(0.0, 3, 4)).unwrap();
        sink.close().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn close_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut sink = RecordSink::open(&dir.path().join("log.txt")).unwrap();
        sink.close().unwrap();
        sink.close().unwrap();
        // Writes after close are silently dropped rather than a panic.
        sink.write(&Record::new(0.0, 1, 2)).unwrap();
    }

    #[test]
    fn open_fails_for_unwritable_path() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        // Parent "directory" is a regular file, so open must fail.
        assert!(RecordSink::open(&blocker.join("log.txt")).is_err());
    }
}
