//! Web-specific data fetching: downloads `monsters.json` next to the page.

use crate::app_core::indexing::cache_busted_url;
use crate::error::LoadError;
use crate::model::parse_dataset;
use serde_json::Value;

pub const DATASET_PATH: &str = "data/monsters.json";

/// Resolves the dataset path against the page URL and appends a cache buster.
pub fn dataset_url() -> String {
    let relative = cache_busted_url(DATASET_PATH, js_sys::Date::now() as u64);
    web_sys::window()
        .and_then(|window| window.location().href().ok())
        .and_then(|href| reqwest::Url::parse(&href).ok())
        .and_then(|base| base.join(&relative).ok())
        .map(|url| url.to_string())
        .unwrap_or(relative)
}

pub async fn fetch_dataset() -> Result<Vec<Value>, LoadError> {
    let url = dataset_url();
    log::info!("downloading dataset from {url}");

    let response = reqwest::get(&url).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url,
            status: status.as_u16(),
        });
    }

    let text = response.text().await?;
    parse_dataset(&text)
}
