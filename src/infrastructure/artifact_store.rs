use crate::domain::error::{AppError, Result};
use std::fs;
use std::io::{Cursor, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Suffix of in-flight writes; such files are never listed.
const PARTIAL_SUFFIX: &str = ".partial";

fn io_err(msg: impl Into<String>) -> AppError {
    AppError::IoError(msg.into())
}

/// Flat directory of generated chart images.
///
/// All access to the directory goes through this type. A single lock
/// serializes writes, lookups, listings and archiving so concurrent requests
/// never observe half-written files.
#[derive(Debug)]
pub struct ArtifactStore {
    root: PathBuf,
    lock: Mutex<()>,
}

impl ArtifactStore {
    /// Open the store, creating the directory if it does not exist.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        ensure_dir(&root)?;
        Ok(Self {
            root,
            lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write one artifact, replacing any existing artifact of the same name.
    pub fn save(&self, name: &str, bytes: &[u8]) -> Result<()> {
        if !is_artifact_name(name) {
            return Err(AppError::ValidationError(format!(
                "Invalid artifact name: {:?}",
                name
            )));
        }
        let _guard = self.guard();
        atomic_write_bytes(&self.root, name, bytes)
    }

    /// Read one artifact by exact file name.
    ///
    /// Names that could address anything outside the directory are reported
    /// as not found.
    pub fn get(&self, name: &str) -> Result<Vec<u8>> {
        if !is_artifact_name(name) {
            return Err(AppError::NotFound(name.to_string()));
        }
        let _guard = self.guard();
        let path = self.root.join(name);
        if !path.is_file() {
            return Err(AppError::NotFound(name.to_string()));
        }
        fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => AppError::NotFound(name.to_string()),
            _ => io_err(format!("Failed to read artifact {}: {e}", path.display())),
        })
    }

    /// Sorted names of every stored artifact.
    pub fn list(&self) -> Result<Vec<String>> {
        let _guard = self.guard();
        self.list_unlocked()
    }

    /// Zip every file currently in the directory, entry names = file names.
    pub fn archive_all(&self) -> Result<Vec<u8>> {
        let _guard = self.guard();
        let names = self.list_unlocked()?;

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for name in &names {
            let path = self.root.join(name);
            let bytes = fs::read(&path)
                .map_err(|e| io_err(format!("Failed to open {}: {e}", path.display())))?;
            writer
                .start_file(name.as_str(), options)
                .map_err(|e| io_err(format!("Failed to add {} to archive: {e}", name)))?;
            writer
                .write_all(&bytes)
                .map_err(|e| io_err(format!("Failed to write {} to archive: {e}", name)))?;
        }

        let cursor = writer
            .finish()
            .map_err(|e| io_err(format!("Failed to finish archive: {e}")))?;
        Ok(cursor.into_inner())
    }

    fn list_unlocked(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)
            .map_err(|e| io_err(format!("Failed to read dir {}: {e}", self.root.display())))?
        {
            let entry = entry.map_err(|e| io_err(format!("Failed dir entry: {e}")))?;
            let meta = entry
                .metadata()
                .map_err(|e| io_err(format!("Failed to stat {}: {e}", entry.path().display())))?;
            if !meta.is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            if name.ends_with(PARTIAL_SUFFIX) {
                continue;
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        // The lock protects no data, so a poisoned lock is still usable.
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A plain file name: non-empty, no separators, no NUL, not hidden.
fn is_artifact_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.ends_with(PARTIAL_SUFFIX)
        && !name.contains(&['/', '\\', '\0'][..])
}

fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .map_err(|e| io_err(format!("Failed to create dir {}: {e}", path.display())))?;
    Ok(())
}

/// Write to a temp file in the same directory, then rename over the target.
fn atomic_write_bytes(dir: &Path, name: &str, bytes: &[u8]) -> Result<()> {
    let path = dir.join(name);
    let tmp_path = dir.join(format!(".{}.{}{}", name, Uuid::new_v4(), PARTIAL_SUFFIX));
    {
        let mut file = fs::File::create(&tmp_path).map_err(|e| {
            io_err(format!(
                "Failed to create temp file {}: {e}",
                tmp_path.display()
            ))
        })?;
        if let Err(e) = file.write_all(bytes) {
            let _ = fs::remove_file(&tmp_path);
            return Err(io_err(format!(
                "Failed to write temp file {}: {e}",
                tmp_path.display()
            )));
        }
        file.sync_all().ok();
    }

    fs::rename(&tmp_path, &path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        io_err(format!(
            "Failed to rename temp file {} to {}: {e}",
            tmp_path.display(),
            path.display()
        ))
    })
}
