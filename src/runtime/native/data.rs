//! Native dataset access: reads `monsters.json` from disk or downloads it.

use crate::app_core::indexing::cache_busted_url;
use crate::error::LoadError;
use crate::model::parse_dataset;
use anyhow::Result;
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub const DEFAULT_DATASET_PATH: &str = "data/monsters.json";

#[derive(Debug, Clone, Copy)]
pub struct DownloadProgress {
    pub downloaded: u64,
    pub total: Option<u64>,
}

/// Where the dataset is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    File(PathBuf),
    Url(String),
}

impl DatasetSource {
    /// Picks the URL when given, then the file, then the default path.
    pub fn from_args(file: Option<&str>, url: Option<&str>) -> Self {
        match (url, file) {
            (Some(url), _) => DatasetSource::Url(url.to_string()),
            (None, Some(file)) => DatasetSource::File(PathBuf::from(file)),
            (None, None) => DatasetSource::File(PathBuf::from(DEFAULT_DATASET_PATH)),
        }
    }

    pub fn label(&self) -> String {
        match self {
            DatasetSource::File(path) => path.display().to_string(),
            DatasetSource::Url(url) => url.clone(),
        }
    }
}

pub fn get_data_dir() -> Result<PathBuf> {
    let project_dirs = directories::ProjectDirs::from("com", "mobdex", "mobdex")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = project_dirs.data_dir().to_path_buf();
    fs::create_dir_all(&data_dir)?;
    Ok(data_dir)
}

pub fn load_dataset_file(path: &Path) -> Result<Vec<Value>, LoadError> {
    log::info!("reading dataset from {}", path.display());
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_dataset(&text)
}

/// Downloads and parses the dataset. A fresh `v=<millis>` parameter is
/// appended on every call so intermediate caches are bypassed.
pub fn fetch_dataset_with_progress<F>(url: &str, mut on_progress: F) -> Result<Vec<Value>, LoadError>
where
    F: FnMut(DownloadProgress),
{
    let url = cache_busted_url(url, unix_millis());
    log::info!("downloading dataset from {url}");

    let client = reqwest::blocking::Client::builder().build()?;
    let mut response = client.get(&url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url,
            status: status.as_u16(),
        });
    }

    let total = response.content_length();
    let mut body = Vec::with_capacity(total.unwrap_or(0) as usize);
    let mut buffer = [0u8; 65536];
    on_progress(DownloadProgress {
        downloaded: 0,
        total,
    });

    loop {
        let read = response.read(&mut buffer).map_err(|source| LoadError::Io {
            path: PathBuf::from(&url),
            source,
        })?;
        if read == 0 {
            break;
        }
        body.extend_from_slice(&buffer[..read]);
        on_progress(DownloadProgress {
            downloaded: body.len() as u64,
            total,
        });
    }

    log::debug!("downloaded {} bytes", body.len());
    parse_dataset(&String::from_utf8_lossy(&body))
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_prefers_url() {
        assert_eq!(
            DatasetSource::from_args(Some("a.json"), Some("https://host/m.json")),
            DatasetSource::Url("https://host/m.json".to_string())
        );
        assert_eq!(
            DatasetSource::from_args(None, None),
            DatasetSource::File(PathBuf::from(DEFAULT_DATASET_PATH))
        );
        assert_eq!(
            DatasetSource::from_args(Some("a.json"), None).label(),
            "a.json"
        );
    }

    #[test]
    fn test_load_dataset_file() {
        let dir = std::env::temp_dir().join(format!("mobdex-data-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("monsters.json");
        fs::write(&path, r#"[{"name": "Slime"}, {"name": "Wolf"}]"#).unwrap();

        let records = load_dataset_file(&path).unwrap();
        assert_eq!(records.len(), 2);

        let missing = load_dataset_file(&dir.join("absent.json")).unwrap_err();
        assert!(matches!(missing, LoadError::Io { .. }));

        fs::remove_dir_all(&dir).unwrap();
    }
}
