//! File I/O utilities with atomic writes and cross-process locking

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use fs2::FileExt;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::AccountingError;

/// Read JSON from a file, returning a default value if the file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, AccountingError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path).map_err(|e| {
        AccountingError::Storage(format!("Failed to open {}: {}", path.display(), e))
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        AccountingError::Storage(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Write JSON to a file atomically (write to temp, sync, then rename)
///
/// The target is either fully replaced or left untouched.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), AccountingError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            AccountingError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target so the rename stays atomic
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| AccountingError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| AccountingError::Storage(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| AccountingError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| AccountingError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        AccountingError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

/// Run `f` while holding an exclusive advisory lock for the data file `path`
///
/// The lock is taken on a sidecar `.lock` file since the data file itself is
/// replaced by every atomic write. Other processes block until `f` returns.
pub fn with_exclusive_lock<T, P, F>(path: P, f: F) -> Result<T, AccountingError>
where
    P: AsRef<Path>,
    F: FnOnce() -> Result<T, AccountingError>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            AccountingError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let lock_path = path.with_extension("json.lock");
    let lock_file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)
        .map_err(|e| {
            AccountingError::Storage(format!("Failed to open {}: {}", lock_path.display(), e))
        })?;

    FileExt::lock_exclusive(&lock_file).map_err(|e| {
        AccountingError::Storage(format!("Failed to lock {}: {}", lock_path.display(), e))
    })?;

    let result = f();

    // Closing the file releases the lock as well
    let _ = FileExt::unlock(&lock_file);

    result
}
