// JSON persistence helpers
// Whole-document reads and writes. Every save overwrites the file with a
// complete document.

use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage error, always naming the path involved
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Permission denied: cannot {action} {path:?}")]
    PermissionDenied { action: &'static str, path: PathBuf },

    #[error("Cannot write to {0:?}: filesystem is read-only")]
    ReadOnly(PathBuf),

    #[error("Failed to {action} {path:?}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize data: {0}")]
    Serialize(#[source] serde_json::Error),
}

fn io_error(action: &'static str, path: &Path, e: std::io::Error) -> StorageError {
    match e.kind() {
        ErrorKind::PermissionDenied => StorageError::PermissionDenied {
            action,
            path: path.to_path_buf(),
        },
        ErrorKind::ReadOnlyFilesystem => StorageError::ReadOnly(path.to_path_buf()),
        _ => StorageError::Io {
            action,
            path: path.to_path_buf(),
            source: e,
        },
    }
}

/// Read file contents, `None` if the file does not exist
fn read_file(path: &Path) -> Result<Option<String>, StorageError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_error("read", path, e)),
    }
}

/// Load a JSON document from `path`
///
/// Returns `None` if the file doesn't exist or holds only whitespace.
/// Returns an error if the file exists but can't be read or parsed.
pub fn load_from<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    let Some(content) = read_file(path)? else {
        return Ok(None);
    };

    if content.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| StorageError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Save `data` as pretty-printed JSON to `path`
///
/// Creates parent directories if they don't exist.
pub fn save_to<T: Serialize>(path: &Path, data: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| io_error("create directory", parent, e))?;
        }
    }

    // serde_json writes UTF-8 and leaves non-ASCII characters unescaped.
    let content = serde_json::to_string_pretty(data).map_err(StorageError::Serialize)?;

    fs::write(path, content).map_err(|e| io_error("write to", path, e))
}
