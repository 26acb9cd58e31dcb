//! Shared indexing helpers for building the lookup index from raw JSON data.
//!
//! This module is synchronous and has no runtime-specific dependencies.
//! Runtimes wrap these helpers with their own progress-reporting and
//! timing mechanisms (native: `std::time::Instant`; web: `now_ms()` + yields).

use crate::model::Entity;
use crate::search_index::LookupIndex;
use serde_json::Value;

/// Fraction of overall indexing progress budget spent normalizing records.
/// The remaining `1.0 - NORMALIZE_PROGRESS_WEIGHT` is spent on index construction.
pub const NORMALIZE_PROGRESS_WEIGHT: f64 = 0.4;

/// Appends a per-load cache-busting parameter to a dataset URL.
pub fn cache_busted_url(url: &str, stamp_ms: u64) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}v={stamp_ms}")
}

/// Normalizes raw records in input order.
///
/// `on_progress` receives a value in `[0.0, NORMALIZE_PROGRESS_WEIGHT]`.
pub fn normalize_records<F>(records: &[Value], mut on_progress: F) -> Vec<Entity>
where
    F: FnMut(f64),
{
    let total = records.len();
    let mut entities = Vec::with_capacity(total);

    for (idx, record) in records.iter().enumerate() {
        entities.push(Entity::from_value(record));

        if total > 0 && (idx % 500 == 0 || idx + 1 == total) {
            on_progress((idx + 1) as f64 / total as f64 * NORMALIZE_PROGRESS_WEIGHT);
        }
    }

    entities
}

/// Normalizes and indexes a dataset, reporting overall progress in `[0.0, 1.0]`.
pub fn build_lookup_index<F>(records: &[Value], mut on_progress: F) -> LookupIndex
where
    F: FnMut(f64),
{
    let entities = normalize_records(records, &mut on_progress);
    let index = LookupIndex::build_with_progress(entities, |done, total| {
        on_progress(indexing_ratio(done, total));
    });

    log::info!(
        "Loaded {} creatures, {} drop entries",
        index.entity_count(),
        index.drop_key_count()
    );
    index
}

/// Maps index-construction progress onto the overall `[0.0, 1.0]` range.
pub fn indexing_ratio(done: usize, total: usize) -> f64 {
    if total == 0 {
        return 1.0;
    }
    NORMALIZE_PROGRESS_WEIGHT + (1.0 - NORMALIZE_PROGRESS_WEIGHT) * (done as f64 / total as f64)
}

/// Converts a download progress value into a `[0.0, 1.0]` ratio.
///
/// When total size is unknown, uses a hyperbolic curve that approaches 1.0
/// as `downloaded` grows.
pub fn progress_ratio(downloaded: u64, total: Option<u64>) -> f64 {
    if let Some(t) = total
        && t > 0
    {
        return downloaded as f64 / t as f64;
    }

    let d = downloaded as f64;
    d / (d + 1_000_000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cache_busted_url() {
        assert_eq!(
            cache_busted_url("data/monsters.json", 42),
            "data/monsters.json?v=42"
        );
        assert_eq!(
            cache_busted_url("https://host/monsters.json?lang=en", 7),
            "https://host/monsters.json?lang=en&v=7"
        );
    }

    #[test]
    fn test_build_lookup_index_reports_full_progress() {
        let records = vec![
            json!({"name": "Slime", "drops": ["Jelly"]}),
            json!({"name": "Wolf", "drops": ["Fang", "Jelly"]}),
        ];
        let mut ratios = Vec::new();
        let index = build_lookup_index(&records, |ratio| ratios.push(ratio));

        assert_eq!(index.entity_count(), 2);
        assert!(ratios.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(ratios.last().copied(), Some(1.0));
    }

    #[test]
    fn test_empty_dataset() {
        let index = build_lookup_index(&[], |_| {});
        assert!(index.is_empty());
        assert_eq!(indexing_ratio(0, 0), 1.0);
    }

    #[test]
    fn test_progress_ratio() {
        assert_eq!(progress_ratio(50, Some(100)), 0.5);
        let unknown = progress_ratio(1_000_000, None);
        assert!((unknown - 0.5).abs() < f64::EPSILON);
    }
}
