//! File system collaborators used by the concrete loaders.

use crate::error::{ContentError, Result};
use ahash::AHashMap;
use std::cell::RefCell;
use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

/// Virtual root mapped onto the configured asset directory
pub const ASSETS_ROOT: &str = "assets://";

/// Source of raw content bytes
pub trait FileSystem {
    /// Open a path for reading
    fn open(&self, path: &str) -> Result<Box<dyn Read>>;

    /// Check if a path resolves to a readable file
    fn exists(&self, path: &str) -> bool;

    /// Read the whole file
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let mut reader = self.open(path)?;
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    /// Read the whole file as UTF-8
    fn read_to_string(&self, path: &str) -> Result<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes)
            .map_err(|e| ContentError::Decode(format!("UTF-8 decode error in {path}: {e}")))
    }
}

/// Disk-backed file system resolving `assets://` against an asset root
#[derive(Clone, Debug)]
pub struct DiskFileSystem {
    asset_root: PathBuf,
}

impl DiskFileSystem {
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: asset_root.into(),
        }
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    /// Map a content path onto a disk path
    pub fn resolve(&self, path: &str) -> Result<PathBuf> {
        if let Some(rest) = path.strip_prefix(ASSETS_ROOT) {
            Ok(self.asset_root.join(rest))
        } else if path.contains("://") {
            Err(ContentError::NotFound(format!(
                "Unknown virtual root in {path}"
            )))
        } else {
            Ok(PathBuf::from(path))
        }
    }

    /// Get file size
    pub fn file_size(&self, path: &str) -> Result<u64> {
        let disk_path = self.resolve(path)?;
        fs::metadata(&disk_path).map(|m| m.len()).map_err(|e| {
            ContentError::Io(format!("Failed to get file size {path}: {e}"))
        })
    }

    /// List files in directory with the given extension
    pub fn list_files(&self, directory: &str, extension: &str) -> Result<Vec<String>> {
        let disk_path = self.resolve(directory)?;
        let mut files = Vec::new();

        for entry in fs::read_dir(&disk_path).map_err(|e| {
            ContentError::Io(format!("Failed to read directory {directory}: {e}"))
        })? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(extension) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                files.push(name.to_string());
            }
        }

        files.sort();
        Ok(files)
    }
}

impl FileSystem for DiskFileSystem {
    fn open(&self, path: &str) -> Result<Box<dyn Read>> {
        let disk_path = self.resolve(path)?;
        match fs::File::open(&disk_path) {
            Ok(file) => Ok(Box::new(file)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ContentError::NotFound(path.to_string()))
            }
            Err(e) => Err(ContentError::Io(format!("Failed to open {path}: {e}"))),
        }
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok_and(|p| p.is_file())
    }
}

/// In-memory file system keyed by the exact content path
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: RefCell<AHashMap<String, Vec<u8>>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: &str, bytes: impl Into<Vec<u8>>) {
        self.files.borrow_mut().insert(path.to_string(), bytes.into());
    }

    pub fn remove(&self, path: &str) -> Option<Vec<u8>> {
        self.files.borrow_mut().remove(path)
    }

    pub fn len(&self) -> usize {
        self.files.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.borrow().is_empty()
    }
}

impl FileSystem for MemoryFileSystem {
    fn open(&self, path: &str) -> Result<Box<dyn Read>> {
        let bytes = self
            .files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| ContentError::NotFound(path.to_string()))?;
        Ok(Box::new(Cursor::new(bytes)))
    }

    fn exists(&self, path: &str) -> bool {
        self.files.borrow().contains_key(path)
    }
}
