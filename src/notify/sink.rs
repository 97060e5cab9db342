use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::{FAILURE_LOG_FILE, FailureLog, FailureRecord, NotifyError};

struct ActiveFile {
    file: File,
    size: u64,
}

/// JSON-lines failure log rotated by size.
///
/// When the next record would push `errors.log` past `max_bytes`, the file is
/// shifted to `errors.log.1` (older backups move up by one, the oldest beyond
/// `max_backups` is removed) and a fresh file is started.
pub struct FileFailureLog {
    path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    active: Mutex<ActiveFile>,
}

impl FileFailureLog {
    pub fn open(dir: &Path, max_bytes: u64, max_backups: usize) -> Result<Self, NotifyError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(FAILURE_LOG_FILE);
        let file = open_append(&path)?;
        let size = file.metadata()?.len();
        Ok(Self {
            path,
            max_bytes,
            max_backups,
            active: Mutex::new(ActiveFile { file, size }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    fn rotate(&self, active: &mut ActiveFile) -> Result<(), NotifyError> {
        active.file.flush()?;

        if self.max_backups == 0 {
            active.file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&self.path)?;
            active.size = 0;
            return Ok(());
        }

        let oldest = self.backup_path(self.max_backups);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.max_backups).rev() {
            let from = self.backup_path(index);
            if from.exists() {
                fs::rename(&from, self.backup_path(index + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1))?;

        active.file = open_append(&self.path)?;
        active.size = 0;
        Ok(())
    }
}

fn open_append(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl FailureLog for FileFailureLog {
    fn append(&self, record: &FailureRecord) -> Result<(), NotifyError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut active = self.active.lock();
        if active.size > 0 && active.size + line.len() as u64 > self.max_bytes {
            self.rotate(&mut active)?;
        }
        active.file.write_all(&line)?;
        active.size += line.len() as u64;
        Ok(())
    }
}

/// In-memory failure log.
#[derive(Default)]
pub struct MemoryFailureLog {
    records: Mutex<Vec<FailureRecord>>,
}

impl MemoryFailureLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<FailureRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl FailureLog for MemoryFailureLog {
    fn append(&self, record: &FailureRecord) -> Result<(), NotifyError> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}
