use crate::search_index::LookupIndex;
use foldhash::HashSet;

/// What a suggestion names, used by renderers to pick a decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    /// A creature that has an icon of its own.
    Creature,
    /// An item, or a creature without an icon.
    Item,
}

/// Trims and lowercases raw input into a query term.
pub fn normalize_term(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Finds every entity name and item name containing `term`.
///
/// `term` must already be normalized (see [`normalize_term`]). The result is
/// deduplicated by display string and ordered by discovery: entity names in
/// dataset order, then item names in drop-key order.
///
/// Item names keep their original casing, recovered from the first position
/// in each holder's `drops_lower` equal to the matched key. When one entity
/// lists the same item with two different casings only the first is surfaced.
pub fn find_matches(index: &LookupIndex, term: &str) -> Vec<String> {
    if term.is_empty() {
        return Vec::new();
    }

    let mut seen: HashSet<&str> = HashSet::default();
    let mut names = Vec::new();

    for entity in &index.entities {
        if entity.name_lower.contains(term) && seen.insert(entity.name.as_str()) {
            names.push(entity.name.clone());
        }
    }

    for (drop_lower, holders) in &index.by_drop {
        if !drop_lower.contains(term) {
            continue;
        }
        for &idx in holders {
            let entity = &index.entities[idx];
            if let Some(pos) = entity.drops_lower.iter().position(|d| d == drop_lower) {
                let original = entity.drops[pos].as_str();
                if seen.insert(original) {
                    names.push(original.to_string());
                }
            }
        }
    }

    log::debug!("query {:?} matched {} names", term, names.len());
    names
}

/// A name is decorated as a creature only when it resolves to an entity with
/// an image; everything else is treated as an item.
pub fn classify(index: &LookupIndex, name: &str) -> SuggestionKind {
    match index.entity(name) {
        Some(entity) if !entity.image.is_empty() => SuggestionKind::Creature,
        _ => SuggestionKind::Item,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::normalize_all;
    use serde_json::{Value, json};

    fn build(records: Vec<Value>) -> LookupIndex {
        LookupIndex::build(normalize_all(&records))
    }

    fn sample_index() -> LookupIndex {
        build(vec![
            json!({"name": "Slime", "image": "slime.png", "drops": ["Jelly"]}),
            json!({"name": "Wolf", "drops": ["Fang", "Jelly"]}),
            json!({"name": "Dragon", "image": "dragon.png", "drops": ["Dragon Scale"]}),
        ])
    }

    #[test]
    fn test_normalize_term() {
        assert_eq!(normalize_term("  JeL "), "jel");
        assert_eq!(normalize_term("   "), "");
    }

    #[test]
    fn test_empty_term_matches_nothing() {
        assert!(find_matches(&sample_index(), "").is_empty());
    }

    #[test]
    fn test_substring_case_insensitive() {
        let results = find_matches(&sample_index(), "rag");
        assert!(results.contains(&"Dragon".to_string()));
    }

    #[test]
    fn test_drop_match_deduplicated() {
        let results = find_matches(&sample_index(), "jel");
        assert_eq!(results, vec!["Jelly"]);
    }

    #[test]
    fn test_entity_names_then_items() {
        let results = find_matches(&sample_index(), "dragon");
        assert_eq!(results, vec!["Dragon", "Dragon Scale"]);
    }

    #[test]
    fn test_name_colliding_with_item_listed_once() {
        let index = build(vec![
            json!({"name": "Mushroom", "drops": ["Cap"]}),
            json!({"name": "Farmer", "drops": ["Mushroom"]}),
        ]);
        assert_eq!(find_matches(&index, "mush"), vec!["Mushroom"]);
    }

    #[test]
    fn test_original_case_from_first_holder() {
        let index = build(vec![
            json!({"name": "A", "drops": ["Red Potion"]}),
            json!({"name": "B", "drops": ["RED POTION"]}),
        ]);
        // Each holder contributes its own casing.
        assert_eq!(find_matches(&index, "potion"), vec!["Red Potion", "RED POTION"]);
    }

    #[test]
    fn test_repeated_casing_only_first_surfaced() {
        let index = build(vec![json!({"name": "A", "drops": ["Ore", "ORE"]})]);
        assert_eq!(find_matches(&index, "ore"), vec!["Ore"]);
    }

    #[test]
    fn test_query_is_idempotent() {
        let index = sample_index();
        assert_eq!(find_matches(&index, "l"), find_matches(&index, "l"));
    }

    #[test]
    fn test_no_match() {
        assert!(find_matches(&sample_index(), "zzz").is_empty());
        assert!(find_matches(&LookupIndex::new(), "slime").is_empty());
    }

    #[test]
    fn test_classify() {
        let index = sample_index();
        assert_eq!(classify(&index, "Slime"), SuggestionKind::Creature);
        assert_eq!(classify(&index, "Wolf"), SuggestionKind::Item);
        assert_eq!(classify(&index, "Jelly"), SuggestionKind::Item);
    }
}
