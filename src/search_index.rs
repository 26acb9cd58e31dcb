use crate::model::Entity;
use foldhash::HashMap;
use indexmap::IndexMap;

/// Immutable lookup structures over the creature list.
///
/// `by_name` maps the exact display name to a position in `entities` (last
/// write wins on duplicate names). `by_drop` maps a lowercased item name to the
/// positions of every entity that drops it, in dataset order; keys keep their
/// first-seen order so queries iterate deterministically.
#[derive(Debug, Default)]
pub struct LookupIndex {
    pub(crate) entities: Vec<Entity>,
    pub(crate) by_name: HashMap<String, usize>,
    pub(crate) by_drop: IndexMap<String, Vec<usize>>,
}

/// Incremental construction of a [`LookupIndex`].
///
/// The web runtime feeds entities in batches so it can yield to the browser;
/// everything else goes through [`LookupIndex::build`].
#[derive(Debug, Default)]
pub struct LookupIndexBuilder {
    index: LookupIndex,
}

impl LookupIndexBuilder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: LookupIndex {
                entities: Vec::with_capacity(capacity),
                by_name: Default::default(),
                by_drop: IndexMap::new(),
            },
        }
    }

    pub fn push(&mut self, entity: Entity) {
        let idx = self.index.entities.len();
        self.index.by_name.insert(entity.name.clone(), idx);

        for drop_lower in &entity.drops_lower {
            let bucket = self.index.by_drop.entry(drop_lower.clone()).or_default();
            // An entity listing the same drop twice is bucketed once.
            if bucket.last() != Some(&idx) {
                bucket.push(idx);
            }
        }

        self.index.entities.push(entity);
    }

    pub fn finish(self) -> LookupIndex {
        self.index
    }
}

impl LookupIndex {
    /// Creates a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds both lookup maps in one ordered pass over `entities`.
    pub fn build(entities: Vec<Entity>) -> Self {
        Self::build_with_progress(entities, |_, _| {})
    }

    pub fn build_with_progress<F>(entities: Vec<Entity>, mut on_progress: F) -> Self
    where
        F: FnMut(usize, usize),
    {
        let total = entities.len();
        let mut builder = LookupIndexBuilder::with_capacity(total);

        for (idx, entity) in entities.into_iter().enumerate() {
            builder.push(entity);

            if idx % 250 == 0 || idx + 1 == total {
                on_progress(idx + 1, total);
            }
        }

        builder.finish()
    }

    /// Exact, case-sensitive lookup by display name.
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.by_name.get(name).map(|&idx| &self.entities[idx])
    }

    /// Entities dropping the item with the given lowercased name, in dataset order.
    pub fn holders(&self, drop_lower: &str) -> Vec<&Entity> {
        self.by_drop
            .get(drop_lower)
            .map(|indices| indices.iter().map(|&idx| &self.entities[idx]).collect())
            .unwrap_or_default()
    }

    /// All entities in dataset order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn drop_key_count(&self) -> usize {
        self.by_drop.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::normalize_all;
    use serde_json::json;

    fn build(records: Vec<serde_json::Value>) -> LookupIndex {
        LookupIndex::build(normalize_all(&records))
    }

    fn names(entities: Vec<&Entity>) -> Vec<&str> {
        entities.into_iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_index_building() {
        let index = build(vec![
            json!({"name": "Slime", "drops": ["Jelly"]}),
            json!({"name": "Wolf", "drops": ["Fang", "Jelly"]}),
        ]);

        assert_eq!(index.entity_count(), 2);
        assert_eq!(index.drop_key_count(), 2);
        assert_eq!(index.entity("Slime").unwrap().name, "Slime");
        assert_eq!(index.entity("Wolf").unwrap().drops, vec!["Fang", "Jelly"]);
    }

    #[test]
    fn test_entity_lookup_is_case_sensitive() {
        let index = build(vec![json!({"name": "Slime"})]);
        assert!(index.entity("Slime").is_some());
        assert!(index.entity("slime").is_none());
    }

    #[test]
    fn test_duplicate_names_last_write_wins() {
        let index = build(vec![
            json!({"name": "Slime", "level": 1}),
            json!({"name": "Slime", "level": 9}),
        ]);

        assert_eq!(index.entity("Slime").unwrap().level, 9);
        assert_eq!(index.entity_count(), 2);
    }

    #[test]
    fn test_holders_in_dataset_order() {
        let index = build(vec![
            json!({"name": "Wolf", "drops": ["JELLY"]}),
            json!({"name": "Bat", "drops": ["Wing"]}),
            json!({"name": "Slime", "drops": ["Jelly"]}),
        ]);

        assert_eq!(names(index.holders("jelly")), vec!["Wolf", "Slime"]);
        assert_eq!(names(index.holders("wing")), vec!["Bat"]);
        assert!(index.holders("Jelly").is_empty());
        assert!(index.holders("missing").is_empty());
    }

    #[test]
    fn test_repeated_drop_bucketed_once() {
        let index = build(vec![json!({"name": "Slime", "drops": ["Jelly", "jelly"]})]);
        assert_eq!(names(index.holders("jelly")), vec!["Slime"]);
    }

    #[test]
    fn test_drop_keys_keep_first_seen_order() {
        let index = build(vec![
            json!({"name": "A", "drops": ["Zeta", "Alpha"]}),
            json!({"name": "B", "drops": ["Mid", "Zeta"]}),
        ]);

        let keys: Vec<&str> = index.by_drop.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_build_with_progress_reports_completion() {
        let records: Vec<_> = (0..600).map(|i| json!({"name": format!("m{i}")})).collect();
        let mut last = (0, 0);
        let index = LookupIndex::build_with_progress(normalize_all(&records), |done, total| {
            last = (done, total);
        });

        assert_eq!(last, (600, 600));
        assert_eq!(index.entity_count(), 600);
    }

    #[test]
    fn test_empty_index() {
        let index = LookupIndex::new();
        assert!(index.is_empty());
        assert!(index.entity("anything").is_none());
        assert!(index.holders("anything").is_empty());
    }
}
