use anyhow::{anyhow, Result};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "catalog-fetch";
const RESPONSE_FILE: &str = "response.json";

pub struct AppPaths;

impl AppPaths {
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow!("Cannot determine data directory"))?
            .join(APP_DIR);

        fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn config_dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?
            .join(APP_DIR))
    }

    /// Where the last successful catalog response is kept
    pub fn response_file() -> Result<PathBuf> {
        Ok(Self::response_file_in(&Self::data_dir()?))
    }

    pub fn response_file_in(data_dir: &Path) -> PathBuf {
        data_dir.join(RESPONSE_FILE)
    }
}
