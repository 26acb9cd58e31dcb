use mobdex::app_core::indexing::build_lookup_index;
use mobdex::app_core::input::{AppKeyCode, AppKeyEvent};
use mobdex::app_core::reducer::handle_key_event;
use mobdex::app_core::resolver::DetailView;
use mobdex::app_core::state::AppState;
use mobdex::app_core::suggest::SuggestionPhase;
use mobdex::assets::AssetRoots;
use mobdex::theme::Theme;
use serde_json::json;
use std::time::Duration;

const DEBOUNCE: Duration = Duration::from_millis(150);

fn loaded_app() -> AppState {
    let records = vec![
        json!({
            "name": "Slime",
            "image": "slime.png",
            "level": 2,
            "hp": 15,
            "drops": ["Jelly", "Slime Bubble"],
            "locations": ["Meadow"]
        }),
        json!({
            "name": "Wolf",
            "image": "wolf.png",
            "level": 9,
            "drops": ["Fang", "Jelly"],
            "locations": ["Forest"]
        }),
    ];
    let index = build_lookup_index(&records, |_| {});
    let mut app = AppState::new(
        Theme::default().config(),
        AssetRoots::default(),
        DEBOUNCE,
        "v0.0.0".to_string(),
        "monsters.json".to_string(),
    );
    app.apply_dataset(index, 1.0);
    app
}

fn type_text(app: &mut AppState, text: &str) {
    for c in text.chars() {
        handle_key_event(app, AppKeyEvent::new(AppKeyCode::Char(c)));
    }
}

fn names(app: &AppState) -> Vec<&str> {
    app.suggestions
        .items()
        .iter()
        .map(|s| s.name.as_str())
        .collect()
}

#[test]
fn typing_waits_for_the_debounce_then_lists_matches() {
    let mut app = loaded_app();
    type_text(&mut app, "jel");
    assert_eq!(app.suggestions.phase(), SuggestionPhase::Pending);

    assert!(!app.tick(Duration::from_millis(149)));
    assert!(app.tick(DEBOUNCE));
    assert_eq!(names(&app), vec!["Jelly"]);
}

#[test]
fn choosing_an_item_lists_every_creature_that_drops_it() {
    let mut app = loaded_app();
    type_text(&mut app, "jel");
    app.tick(DEBOUNCE);
    handle_key_event(&mut app, AppKeyEvent::new(AppKeyCode::Enter));

    assert_eq!(app.search_text, "Jelly");
    let DetailView::Item(item) = &app.detail else {
        panic!("expected item page, got {:?}", app.detail);
    };
    let holders: Vec<&str> = item.holders.iter().map(|h| h.label.as_str()).collect();
    assert_eq!(holders, vec!["Slime", "Wolf"]);

    // Follow the first holder link back to a creature page.
    app.follow_link(0);
    assert!(matches!(&app.detail, DetailView::Creature(view) if view.name == "Slime"));
}

#[test]
fn arrow_keys_cycle_through_suggestions() {
    let mut app = loaded_app();
    type_text(&mut app, "e");
    app.tick(DEBOUNCE);
    assert_eq!(names(&app), vec!["Slime", "Jelly", "Slime Bubble"]);

    let down = AppKeyEvent::new(AppKeyCode::Down);
    let up = AppKeyEvent::new(AppKeyCode::Up);

    handle_key_event(&mut app, down);
    handle_key_event(&mut app, down);
    handle_key_event(&mut app, down);
    assert_eq!(app.suggestions.highlighted(), Some(2));

    handle_key_event(&mut app, down);
    assert_eq!(app.suggestions.highlighted(), Some(0));

    handle_key_event(&mut app, up);
    assert_eq!(app.suggestions.highlighted(), Some(2));

    handle_key_event(&mut app, AppKeyEvent::new(AppKeyCode::Enter));
    assert_eq!(app.search_text, "Slime Bubble");
    assert!(matches!(&app.detail, DetailView::Item(view) if view.name == "Slime Bubble"));
}

#[test]
fn unknown_name_shows_not_found() {
    let mut app = loaded_app();
    app.show_detail("Golden Egg");
    assert_eq!(
        app.detail.to_string(),
        "No results found for \"Golden Egg\"\n"
    );
}
