use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Local-disk file store for binary attachments (person face images).
///
/// Saves happen outside the database transaction that writes the owning
/// record, so callers are responsible for best-effort cleanup when the
/// surrounding write fails.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Save `bytes` under `folder` with a generated unique filename and
    /// return the path relative to the store root.
    pub fn save(&self, folder: &str, extension: &str, bytes: &[u8]) -> std::io::Result<String> {
        let dir = self.root.join(folder);
        fs::create_dir_all(&dir)?;

        let filename = format!("{}.{}", Uuid::new_v4(), extension.trim_start_matches('.'));
        let relative = Path::new(folder).join(&filename);
        fs::write(self.root.join(&relative), bytes)?;

        Ok(relative.to_string_lossy().into_owned())
    }

    /// Delete a previously saved file by its store-relative path.
    pub fn delete(&self, path: &str) -> std::io::Result<()> {
        fs::remove_file(self.root.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> FileStore {
        let root = std::env::temp_dir().join(format!("acm-store-test-{}", Uuid::new_v4()));
        FileStore::new(root)
    }

    #[test]
    fn test_save_and_delete_round_trip() {
        let store = temp_store();
        let path = store
            .save("faces", "jpg", b"not really a jpeg")
            .expect("save should succeed");

        assert!(path.starts_with("faces"));
        assert!(path.ends_with(".jpg"));

        let on_disk = store.root.join(&path);
        assert_eq!(fs::read(&on_disk).expect("file should exist"), b"not really a jpeg");

        store.delete(&path).expect("delete should succeed");
        assert!(!on_disk.exists());
    }

    #[test]
    fn test_delete_missing_file_errors() {
        let store = temp_store();
        assert!(store.delete("faces/nothing-here.jpg").is_err());
    }
}
