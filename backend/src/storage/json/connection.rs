use anyhow::Result;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// JsonConnection manages the base directory and the per-key blob files
/// that back all repositories.
#[derive(Clone)]
pub struct JsonConnection {
    base_directory: PathBuf,
}

impl JsonConnection {
    /// Create a new connection with an explicit base directory.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Create a new connection in the default data directory,
    /// ~/Documents/WaterMeter.
    pub fn new_default() -> Result<Self> {
        let home_dir = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| anyhow::anyhow!("Could not determine home directory"))?;

        let data_dir = PathBuf::from(home_dir).join("Documents").join("WaterMeter");
        info!("Using data directory: {}", data_dir.display());

        Self::new(data_dir)
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base_directory.join(format!("{}.json", key))
    }

    /// Read the serialized blob stored under a key, or None when the key
    /// has never been written.
    pub fn read_key(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);

        if !path.exists() {
            return Ok(None);
        }

        Ok(Some(fs::read_to_string(&path)?))
    }

    /// Write a serialized blob under a key. The write is atomic at key
    /// granularity: it either fully succeeds or leaves the previous blob
    /// intact.
    pub fn write_key(&self, key: &str, blob: &str) -> Result<()> {
        let path = self.key_path(key);

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, blob)?;
        fs::rename(&temp_path, &path)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_key_is_absence_not_error() {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();

        assert_eq!(connection.read_key("nothing_here").unwrap(), None);
    }

    #[test]
    fn test_write_then_read_round_trips_blob() {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();

        connection.write_key("some_key", "[1,2,3]").unwrap();
        assert_eq!(
            connection.read_key("some_key").unwrap(),
            Some("[1,2,3]".to_string())
        );

        // Overwrite replaces the previous blob
        connection.write_key("some_key", "[]").unwrap();
        assert_eq!(connection.read_key("some_key").unwrap(), Some("[]".to_string()));
    }
}
