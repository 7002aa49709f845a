//! Rotating log file with size-based rotation and backup retention.
//!
//! [`RotatingFileWriter`] is handed to the `tracing-subscriber` fmt layer as its
//! [`MakeWriter`]. Before each write the file size is checked; a file that has
//! grown past the limit is renamed with a timestamp suffix and a fresh file is
//! started. Only the newest backups are kept.

use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;

/// Maximum file size before rotation (10 MB).
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
pub const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe rotating file writer.
///
/// # Rotation Strategy
///
/// 1. Check file size before each write
/// 2. If size > limit, rotate:
///    - Rename current file to `<name>.<timestamp>-<seq>`
///    - Create new empty file
///    - Remove oldest backups beyond the retention count
///
/// # Example
///
/// ```rust
/// use std::io::Write;
/// use vuege::observability::RotatingFileWriter;
///
/// let dir = tempfile::tempdir()?;
/// let writer = RotatingFileWriter::new(dir.path().join("vuege.log"));
/// (&writer).write_all(b"table recomputed\n")?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct RotatingFileWriter {
    /// Path to the active log file.
    file_path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    /// Lazily opened on first write.
    writer: Mutex<Option<File>>,
    rotations: AtomicU32,
}

impl RotatingFileWriter {
    /// Creates a writer with the default limits (10 MB, 3 backups).
    ///
    /// The file is not opened until the first write.
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self::with_limits(file_path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    pub fn with_limits(file_path: impl Into<PathBuf>, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            file_path: file_path.into(),
            max_bytes,
            max_backups,
            writer: Mutex::new(None),
            rotations: AtomicU32::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Appends `buf` to the file, rotating first if the file is over the limit.
    ///
    /// # Errors
    ///
    /// Fails on file system errors or if another thread panicked while
    /// holding the file lock.
    pub fn append(&self, buf: &[u8]) -> io::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Mutex poisoned: {e}")))?;

        self.check_and_rotate(&mut writer)?;

        if writer.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)?;
            *writer = Some(file);
        }

        let file = writer
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No file available"))?;
        file.write_all(buf)?;
        file.flush()
    }

    fn check_and_rotate(&self, writer: &mut Option<File>) -> io::Result<()> {
        if let Ok(metadata) = fs::metadata(&self.file_path) {
            if metadata.len() > self.max_bytes {
                *writer = None;
                self.rotate_files()?;
            }
        }
        Ok(())
    }

    /// Backups sort by name in creation order: local timestamp, then a
    /// per-writer sequence number.
    fn rotate_files(&self) -> io::Result<()> {
        let seq = self.rotations.fetch_add(1, Ordering::Relaxed);
        let stamp = Local::now().format("%Y%m%dT%H%M%S%3f");
        let backup = self.backup_prefix()?;
        let backup_path = self.file_path.with_file_name(format!("{backup}{stamp}-{seq:06}"));

        if self.file_path.exists() {
            fs::rename(&self.file_path, &backup_path)?;
        }

        self.cleanup_old_backups()
    }

    fn backup_prefix(&self) -> io::Result<String> {
        self.file_path
            .file_name()
            .and_then(|s| s.to_str())
            .map(|name| format!("{name}."))
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "Invalid file name"))
    }

    /// Backups of this log file, newest first.
    pub fn backups(&self) -> io::Result<Vec<PathBuf>> {
        let prefix = self.backup_prefix()?;
        let parent_dir = match self.file_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let mut backups: Vec<PathBuf> = fs::read_dir(parent_dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(&prefix))
            })
            .collect();
        backups.sort_by(|a, b| b.file_name().cmp(&a.file_name()));
        Ok(backups)
    }

    fn cleanup_old_backups(&self) -> io::Result<()> {
        for old_backup in self.backups()?.iter().skip(self.max_backups) {
            let _ = fs::remove_file(old_backup);
        }
        Ok(())
    }
}

impl Write for &RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for RotatingFileWriter {
    type Writer = &'a RotatingFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self
    }
}

impl std::fmt::Debug for RotatingFileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFileWriter")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .field("max_backups", &self.max_backups)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotates_and_keeps_newest_backups() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RotatingFileWriter::with_limits(dir.path().join("vuege.log"), 8, 2);

        for line in ["first line\n", "second line\n", "third line\n", "fourth line\n", "fifth\n"] {
            (&writer).write_all(line.as_bytes()).unwrap();
        }

        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "fifth\n");
        let backups = writer.backups().unwrap();
        assert_eq!(backups.len(), 2);
        assert_eq!(fs::read_to_string(&backups[0]).unwrap(), "fourth line\n");
        assert_eq!(fs::read_to_string(&backups[1]).unwrap(), "third line\n");
    }

    #[test]
    fn small_files_are_not_rotated() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RotatingFileWriter::new(dir.path().join("app.log"));
        (&writer).write_all(b"a\n").unwrap();
        (&writer).write_all(b"b\n").unwrap();
        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "a\nb\n");
        assert!(writer.backups().unwrap().is_empty());
    }
}
