//! Storage of profile files.

use crate::error::ProfileError;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// File extension of profile files.
pub const PROFILE_EXTENSION: &str = "txt";

/// Backing storage for file-backed profiles.
///
/// Content is read fresh on every call; implementations must not cache it.
#[cfg_attr(test, mockall::automock)]
pub trait ProfileStore: Send + Sync {
    /// Names of every stored profile, without extension.
    fn list(&self) -> Result<Vec<String>, ProfileError>;

    /// Raw lines of the named profile.
    fn read(&self, name: &str) -> Result<Vec<String>, ProfileError>;

    /// Create or replace the named profile.
    fn write(&self, name: &str, lines: &[String]) -> Result<(), ProfileError>;
}

/// Profiles stored as `<name>.txt` files in one directory.
#[derive(Debug, Clone)]
pub struct DirectoryProfileStore {
    dir: Utf8PathBuf,
}

impl DirectoryProfileStore {
    pub fn new<P: AsRef<Utf8Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Path of the named profile's file inside the profile directory.
    pub fn profile_path(&self, name: &str) -> Result<Utf8PathBuf, ProfileError> {
        validate_profile_name(name)?;
        Ok(self.dir.join(format!("{name}.{PROFILE_EXTENSION}")))
    }
}

/// Accept only names that are one plain file-name component.
///
/// Rejects empty names, `.`/`..`, and anything containing a path separator.
pub fn validate_profile_name(name: &str) -> Result<(), ProfileError> {
    if name.contains('\\') || Utf8Path::new(name).file_name() != Some(name) {
        return Err(ProfileError::InvalidProfileName(name.to_string()));
    }
    Ok(())
}

impl ProfileStore for DirectoryProfileStore {
    fn list(&self) -> Result<Vec<String>, ProfileError> {
        let io_err = |source| ProfileError::Io {
            name: self.dir.to_string(),
            source,
        };

        if !self.dir.exists() {
            tracing::warn!("Profile directory not found at {}", self.dir);
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in self.dir.read_dir_utf8().map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            if path.extension() != Some(PROFILE_EXTENSION) {
                tracing::debug!("Ignoring file {}", entry.file_name());
                continue;
            }
            if let Some(stem) = path.file_stem() {
                names.push(stem.to_string());
            }
        }

        // Directory order is platform dependent.
        names.sort();
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<Vec<String>, ProfileError> {
        let path = self.profile_path(name)?;
        let contents = fs::read_to_string(&path).map_err(|source| ProfileError::Io {
            name: name.to_string(),
            source,
        })?;

        tracing::debug!("Read profile {} from {}", name, path);
        Ok(contents.lines().map(str::to_string).collect())
    }

    fn write(&self, name: &str, lines: &[String]) -> Result<(), ProfileError> {
        let path = self.profile_path(name)?;
        let io_err = |source| ProfileError::Io {
            name: name.to_string(),
            source,
        };

        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(io_err)?;
        }

        let mut contents = lines.join("\n");
        contents.push('\n');
        fs::write(&path, contents).map_err(io_err)?;

        tracing::info!("Wrote profile {} to {}", name, path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (DirectoryProfileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        (DirectoryProfileStore::new(dir), temp_dir)
    }

    #[test]
    fn test_list_only_txt_files_sorted() {
        let (store, _temp_dir) = create_test_store();
        fs::write(store.dir().join("b.txt"), "").unwrap();
        fs::write(store.dir().join("a.txt"), "").unwrap();
        fs::write(store.dir().join("notes.md"), "").unwrap();
        fs::create_dir(store.dir().join("sub.txt")).unwrap();

        assert_eq!(store.list().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_missing_directory_lists_nothing() {
        let (store, _temp_dir) = create_test_store();
        let missing = DirectoryProfileStore::new(store.dir().join("missing"));
        assert!(missing.list().unwrap().is_empty());
    }

    #[test]
    fn test_write_then_read() {
        let (store, _temp_dir) = create_test_store();
        let lines = vec!["EXCLUDE".to_string(), ".min_charm".to_string()];
        store.write("Costs", &lines).unwrap();

        assert_eq!(store.read("Costs").unwrap(), lines);
        assert!(store.profile_path("Costs").unwrap().exists());
    }

    #[test]
    fn test_names_outside_directory_are_rejected() {
        let (store, temp_dir) = create_test_store();
        let lines = vec!["INCLUDE".to_string()];

        for name in ["../escaped", "sub/dir", "..\\escaped", "..", ".", ""] {
            assert!(
                matches!(
                    store.write(name, &lines),
                    Err(ProfileError::InvalidProfileName(ref n)) if n == name
                ),
                "{name:?} accepted"
            );
            assert!(matches!(
                store.read(name),
                Err(ProfileError::InvalidProfileName(_))
            ));
        }

        assert!(!temp_dir.path().parent().unwrap().join("escaped.txt").exists());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_plain_names_are_accepted() {
        for name in ["Costs", "Costs Only", "v1.2", ".hidden"] {
            assert!(validate_profile_name(name).is_ok(), "{name:?} rejected");
        }
    }

    #[test]
    fn test_read_missing_profile() {
        let (store, _temp_dir) = create_test_store();
        assert!(matches!(
            store.read("Nope"),
            Err(ProfileError::Io { ref name, .. }) if name == "Nope"
        ));
    }
}
