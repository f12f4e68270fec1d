// Saved files - copies of user-chosen files kept under the app data directory
// Metadata is persisted as the `files` list; the copies live in `dir`

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{now_timestamp, LibraryError};

/// Metadata for one saved file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SavedFile {
    pub filename: String,
    /// Extension without the dot, or "Unknown"
    #[serde(rename = "type", default)]
    pub file_type: String,
    #[serde(default)]
    pub date_added: String,
    pub path: PathBuf,
}

/// File operations against the saved-files directory
#[derive(Debug, Clone)]
pub struct FileLibrary {
    dir: PathBuf,
}

impl FileLibrary {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy `source` into the library and record it in `files`.
    ///
    /// An existing copy with the same name is only replaced when `overwrite`
    /// is set; its metadata entry is replaced too.
    #[must_use = "this returns a Result that should be handled"]
    pub fn add_file(
        &self,
        files: &mut Vec<SavedFile>,
        source: &Path,
        overwrite: bool,
    ) -> Result<SavedFile, LibraryError> {
        let filename = source
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|_| source.is_file())
            .ok_or_else(|| LibraryError::NotAFile(source.display().to_string()))?
            .to_string();
        let dest = self.dir.join(&filename);

        if dest.exists() && !overwrite {
            return Err(LibraryError::FileExists(filename));
        }

        fs::create_dir_all(&self.dir)?;
        // Copying a file onto itself truncates it
        if is_same_file(source, &dest) {
            crate::debug!("{:?} is already in saved files", filename);
        } else {
            fs::copy(source, &dest)?;
            crate::info!("Copied {:?} into saved files", filename);
        }

        let entry = SavedFile {
            file_type: file_type(&filename),
            filename: filename.clone(),
            date_added: now_timestamp(),
            path: dest,
        };
        files.retain(|f| f.filename != filename);
        files.push(entry.clone());
        Ok(entry)
    }

    /// Delete the copy at `index`, then its metadata.
    /// If the file cannot be removed the metadata is kept.
    #[must_use = "this returns a Result that should be handled"]
    pub fn delete_file(&self, files: &mut Vec<SavedFile>, index: usize) -> Result<SavedFile, LibraryError> {
        let entry = files
            .get(index)
            .ok_or(LibraryError::IndexOutOfRange(index))?;

        match fs::remove_file(&entry.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                crate::warn!("Saved file {:?} already missing, dropping entry", entry.filename);
            }
            Err(e) => return Err(e.into()),
        }
        Ok(files.remove(index))
    }
}

/// Read a saved file as UTF-8 text
pub fn read_text(file: &SavedFile) -> io::Result<String> {
    fs::read_to_string(&file.path)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn file_type(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext.to_string(),
        _ => "Unknown".to_string(),
    }
}

#[cfg(test)]
#[path = "files_test.rs"]
mod tests;
