//! Directory seeding from a JSON export of the `users` subtree.
//!
//! The file holds one object keyed by user id:
//!
//! ```json
//! { "u-1": { "email": "a@x.com", "firstName": "A", "lastName": "B", "role": "CoopCoffee" } }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use thiserror::Error;

use crate::domain::{DirectoryEntry, DirectoryRecord, UserId, UserValidationError};

/// Errors raised while loading a directory seed file.
#[derive(Debug, Error)]
pub enum DirectorySeedError {
    /// The file could not be opened or read.
    #[error("failed to read directory seed at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not a JSON object of directory entries.
    #[error("invalid directory seed at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A key is not a valid user id.
    #[error("invalid user id {key:?} in directory seed: {source}")]
    InvalidKey {
        key: String,
        #[source]
        source: UserValidationError,
    },
}

/// Read directory records from `path`, ordered by user id.
///
/// # Examples
///
/// ```rust
/// use backend::outbound::realtime::load_directory_seed;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dir = tempfile::tempdir()?;
/// let path = dir.path().join("users.json");
/// std::fs::write(
///     &path,
///     r#"{"u-1":{"email":"a@x.com","firstName":"A","lastName":"B","role":"CoopCoffee"}}"#,
/// )?;
///
/// let records = load_directory_seed(&path)?;
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].entry.full_name(), "A B");
/// # Ok(())
/// # }
/// ```
pub fn load_directory_seed(path: &Path) -> Result<Vec<DirectoryRecord>, DirectorySeedError> {
    let contents = read_file(path)?;
    let users: BTreeMap<String, DirectoryEntry> =
        serde_json::from_str(&contents).map_err(|source| DirectorySeedError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    users
        .into_iter()
        .map(|(key, entry)| {
            let id = UserId::new(key.as_str())
                .map_err(|source| DirectorySeedError::InvalidKey { key, source })?;
            Ok(DirectoryRecord::new(id, entry))
        })
        .collect()
}

fn read_file(path: &Path) -> Result<String, DirectorySeedError> {
    let read_error = |source| DirectorySeedError::Read {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "directory seed path must be a file",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    dir.read_to_string(Path::new(file_name)).map_err(read_error)
}
