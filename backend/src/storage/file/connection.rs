use anyhow::Result;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the data directory
pub const DATA_DIR_ENV: &str = "REFILLR_DATA_DIR";

const APP_DIRECTORY_NAME: &str = "Refillr";

/// FileConnection owns the data directory the store's files live in
#[derive(Debug, Clone)]
pub struct FileConnection {
    base_directory: PathBuf,
}

impl FileConnection {
    /// Create a connection rooted at `base_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Create a connection in the default data directory.
    ///
    /// Uses `REFILLR_DATA_DIR` when set, otherwise `<platform data dir>/Refillr`,
    /// falling back to the system temp directory when the platform has none.
    pub fn new_default() -> Result<Self> {
        Self::new(Self::resolve_default_directory())
    }

    fn resolve_default_directory() -> PathBuf {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|value| !value.is_empty()) {
            let path = PathBuf::from(dir);
            info!("Using data directory from {}: {}", DATA_DIR_ENV, path.display());
            return path;
        }

        match dirs::data_dir() {
            Some(dir) => dir.join(APP_DIRECTORY_NAME),
            None => {
                let fallback = std::env::temp_dir().join(APP_DIRECTORY_NAME);
                warn!(
                    "No platform data directory available, using {}",
                    fallback.display()
                );
                fallback
            }
        }
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Path of a named record inside the data directory
    pub fn record_path(&self, file_name: &str) -> PathBuf {
        self.base_directory.join(file_name)
    }

    /// Write `contents` to `path` via a temp file and rename
    pub fn write_atomically(&self, path: &Path, contents: &str) -> Result<()> {
        if !self.base_directory.exists() {
            fs::create_dir_all(&self.base_directory)?;
            info!("Recreated data directory: {}", self.base_directory.display());
        }

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, contents)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }
}
