use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Result, ViewerError};

/// Insertion-ordered set of scan folders, persisted one path per line.
#[derive(Debug, Clone)]
pub struct FolderRegistry {
    file: PathBuf,
    folders: Vec<PathBuf>,
}

impl FolderRegistry {
    /// Reads the registry file. A missing file is an empty registry.
    pub fn load(file: impl Into<PathBuf>) -> Result<Self> {
        let file = file.into();
        let contents = match fs::read(&file) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err.into()),
        };

        let mut folders: Vec<PathBuf> = Vec::new();
        for (number, line) in contents.split(|&byte| byte == b'\n').enumerate() {
            // add() only admits UTF-8 paths, so other lines cannot be kept
            let Ok(line) = std::str::from_utf8(line) else {
                log::warn!(
                    "Ignoring non UTF-8 line {} in {}",
                    number + 1,
                    file.display()
                );
                continue;
            };
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let path = PathBuf::from(line);
            if !folders.contains(&path) {
                folders.push(path);
            }
        }

        log::info!(
            "Loaded {} folder(s) from {}",
            folders.len(),
            file.display()
        );
        Ok(Self { file, folders })
    }

    /// A registry with no folders that persists to `file` on the first edit.
    pub fn empty(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            folders: Vec::new(),
        }
    }

    pub fn folders(&self) -> &[PathBuf] {
        &self.folders
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.folders.iter().any(|folder| folder == path)
    }

    /// Appends `path` and rewrites the file. Returns `false` without touching
    /// the file when the path is already registered.
    pub fn add(&mut self, path: PathBuf) -> Result<bool> {
        let persistable = path
            .to_str()
            .is_some_and(|text| !text.trim().is_empty() && !text.contains(['\n', '\r']));
        if !persistable {
            return Err(ViewerError::InvalidFolder(path));
        }
        if self.contains(&path) {
            return Ok(false);
        }

        self.folders.push(path);
        if let Err(err) = self.persist() {
            self.folders.pop();
            return Err(err);
        }
        log::info!("Registered folder {}", self.folders[self.folders.len() - 1].display());
        Ok(true)
    }

    /// Removes `path` only. Returns `false` when it was not registered.
    pub fn remove(&mut self, path: &Path) -> Result<bool> {
        let Some(position) = self.folders.iter().position(|folder| folder == path) else {
            return Ok(false);
        };

        let removed = self.folders.remove(position);
        if let Err(err) = self.persist() {
            self.folders.insert(position, removed);
            return Err(err);
        }
        log::info!("Removed folder {}", removed.display());
        Ok(true)
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.file.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut contents = String::new();
        for folder in &self.folders {
            // add() only admits UTF-8 paths
            if let Some(text) = folder.to_str() {
                contents.push_str(text);
                contents.push('\n');
            }
        }

        let mut staging = self.file.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);
        fs::write(&staging, contents)?;
        fs::rename(&staging, &self.file)?;
        Ok(())
    }
}
