use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Names of the regular files in `dir`. A missing directory has none.
pub fn existing_file_names(dir: &Path) -> Result<Vec<String>, PersistError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Writes `{dir}/{filename}` through a temp file and rename, so a failed
/// write never leaves a partial file behind.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Writer for the parent directory of `path`, plus the file name to write.
    pub fn for_path(path: &Path) -> Result<(Self, String), PersistError> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| PersistError::OutputDir(format!("no file name in {}", path.display())))?;
        Ok((Self::new(dir.to_path_buf()), filename.to_string()))
    }

    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        let mut pending = self.begin(filename)?;
        pending.tmp.write_all(content)?;
        pending.tmp.flush()?;
        pending.commit()
    }

    /// Opens a temp file next to `{dir}/{filename}`. Nothing appears at the
    /// target until [`PendingFile::commit`]; dropping the pending file
    /// deletes the temp file.
    pub fn begin(&self, filename: &str) -> Result<PendingFile, PersistError> {
        ensure_output_dir(&self.dir)?;
        Ok(PendingFile {
            tmp: NamedTempFile::new_in(&self.dir)?,
            target: self.dir.join(filename),
        })
    }
}

pub struct PendingFile {
    tmp: NamedTempFile,
    target: PathBuf,
}

impl PendingFile {
    /// Second handle to the temp file for async writers.
    pub fn async_handle(&self) -> Result<tokio::fs::File, PersistError> {
        Ok(tokio::fs::File::from_std(self.tmp.as_file().try_clone()?))
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Syncs the temp file and renames it over the target.
    pub fn commit(mut self) -> Result<PathBuf, PersistError> {
        self.tmp.as_file_mut().sync_all()?;
        if self.target.exists() {
            fs::remove_file(&self.target)?;
        }
        self.tmp
            .persist(&self.target)
            .map_err(|e| PersistError::Io(e.error))?;
        Ok(self.target)
    }
}
