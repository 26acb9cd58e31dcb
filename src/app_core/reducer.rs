//! Shared event reducer: pure-ish handlers for key and mouse events.
//!
//! Both the native and web runtimes call these functions after converting their
//! platform-specific events to [`AppKeyEvent`] / [`AppMouseEvent`].

use crate::app_core::input::{AppKeyCode, AppKeyEvent, AppMouseEvent, AppMouseKind};
use crate::app_core::state::{AppState, FocusPane};
use crate::ui;

pub const SCROLL_LINES: u16 = 1;

/// Returns the pane that contains the given cell coordinates, if any.
pub fn pane_at(app: &AppState, column: u16, row: u16) -> Option<FocusPane> {
    if let Some(area) = app.search_area
        && area.contains((column, row).into())
    {
        return Some(FocusPane::Search);
    }
    if let Some(area) = app.details_area
        && area.contains((column, row).into())
    {
        return Some(FocusPane::Details);
    }
    None
}

/// Handle a runtime-agnostic key event, mutating `app` in place.
pub fn handle_key_event(app: &mut AppState, event: AppKeyEvent) {
    fn apply_search_edit(app: &mut AppState, edit: impl FnOnce(&mut AppState)) {
        let before = app.search_text.clone();
        edit(app);
        if app.search_text != before {
            app.on_search_edited();
        }
    }

    if event.is_release {
        return;
    }

    let code = event.code;
    let ctrl = event.ctrl;
    let alt = event.alt;

    if ctrl && code == AppKeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.show_help {
        if matches!(code, AppKeyCode::Char('?') | AppKeyCode::Esc) {
            app.show_help = false;
        }
        return;
    }

    if code == AppKeyCode::Tab || code == AppKeyCode::BackTab {
        app.toggle_focus();
        return;
    }

    match app.focused_pane {
        FocusPane::Search => match code {
            AppKeyCode::Down if app.suggestions.is_active() => app.highlight_next(),
            AppKeyCode::Up if app.suggestions.is_active() => app.highlight_prev(),
            AppKeyCode::Enter => app.confirm_search(),
            AppKeyCode::Esc => {
                if app.suggestions.is_visible() || app.debouncer.is_pending() {
                    app.dismiss_suggestions();
                } else {
                    app.focus_pane(FocusPane::Details);
                }
            }
            AppKeyCode::Char('u') if ctrl => {
                apply_search_edit(app, AppState::search_clear);
            }
            AppKeyCode::Char('w') if ctrl => {
                apply_search_edit(app, AppState::search_delete_word);
            }
            AppKeyCode::Char('a') if ctrl => app.search_move_to_start(),
            AppKeyCode::Char('e') if ctrl => app.search_move_to_end(),
            AppKeyCode::Char(c) if !ctrl && !alt => {
                apply_search_edit(app, |app| app.search_add_char(c));
            }
            AppKeyCode::Backspace => apply_search_edit(app, AppState::search_backspace),
            AppKeyCode::Delete => apply_search_edit(app, AppState::search_delete),
            AppKeyCode::Left => app.search_move_cursor_left(),
            AppKeyCode::Right => app.search_move_cursor_right(),
            AppKeyCode::Home => app.search_move_to_start(),
            AppKeyCode::End => app.search_move_to_end(),
            _ => {}
        },
        FocusPane::Details => match code {
            AppKeyCode::Char('q') => app.should_quit = true,
            AppKeyCode::Char('?') => app.show_help = true,
            AppKeyCode::Char('/') => app.focus_pane(FocusPane::Search),
            AppKeyCode::Esc => app.focus_pane(FocusPane::Search),
            AppKeyCode::Up => app.move_link_cursor(-1),
            AppKeyCode::Down => app.move_link_cursor(1),
            AppKeyCode::Enter => app.follow_link_cursor(),
            AppKeyCode::PageUp => app.details_scroll_state.scroll_page_up(),
            AppKeyCode::PageDown => app.details_scroll_state.scroll_page_down(),
            AppKeyCode::Home => app.details_scroll_state.scroll_to_top(),
            AppKeyCode::End => app.details_scroll_state.scroll_to_bottom(),
            AppKeyCode::Char(c) if c.is_alphanumeric() && !ctrl && !alt => {
                app.focus_pane(FocusPane::Search);
                app.search_move_to_end();
                apply_search_edit(app, |app| app.search_add_char(c));
            }
            _ => {}
        },
    }
}

/// Handle a runtime-agnostic mouse event.
///
/// `event.column` and `event.row` must already be in terminal cell coordinates.
/// Returns `true` if the UI needs to be redrawn.
pub fn handle_mouse_event(app: &mut AppState, event: AppMouseEvent) -> bool {
    let column = event.column;
    let row = event.row;

    if app.show_progress {
        return false;
    }
    if app.show_help {
        if event.kind == AppMouseKind::LeftDown {
            app.show_help = false;
            return true;
        }
        return false;
    }

    // The suggestion popup floats above the details pane and wins hit-testing.
    if let Some(idx) = ui::hit_test_suggestion(app, column, row) {
        return match event.kind {
            AppMouseKind::Move => {
                if app.suggestions.is_active() && app.suggestions.highlighted() != Some(idx) {
                    app.suggestions.set_highlight(Some(idx));
                    app.sync_suggestion_highlight();
                    true
                } else {
                    false
                }
            }
            AppMouseKind::LeftDown => {
                app.select_suggestion(idx);
                true
            }
            AppMouseKind::ScrollUp | AppMouseKind::ScrollDown => {
                if !app.suggestions.is_active() {
                    return false;
                }
                if event.kind == AppMouseKind::ScrollDown {
                    app.highlight_next();
                } else {
                    app.highlight_prev();
                }
                true
            }
        };
    }

    let hovered_pane = pane_at(app, column, row);
    let hovered_link = ui::hit_test_link(app, column, row);
    let mut transitioned = false;

    if event.kind == AppMouseKind::Move && app.hovered_link != hovered_link {
        app.hovered_link = hovered_link;
        transitioned = true;
    }

    if matches!(
        event.kind,
        AppMouseKind::ScrollUp | AppMouseKind::ScrollDown
    ) && hovered_pane == Some(FocusPane::Details)
    {
        app.scroll_details_by_lines(SCROLL_LINES, event.kind == AppMouseKind::ScrollDown);
        transitioned = true;
    }

    if event.kind == AppMouseKind::LeftDown {
        if let Some(pane) = hovered_pane
            && pane != app.focused_pane
        {
            app.focus_pane(pane);
            transitioned = true;
        }

        if hovered_pane == Some(FocusPane::Search)
            && let Some(input_area) = app.search_input_area
            && input_area.contains((column, row).into())
        {
            let horizontal_scroll =
                ui::search_horizontal_scroll(&app.search_text, app.search_cursor, input_area.width);
            let target_column = horizontal_scroll + column.saturating_sub(input_area.x);
            let new_cursor = ui::search_cursor_for_column(&app.search_text, target_column);
            if new_cursor != app.search_cursor {
                app.search_cursor = new_cursor;
                transitioned = true;
            }
        }

        if hovered_pane == Some(FocusPane::Details) {
            if app.suggestions.is_visible() {
                app.dismiss_suggestions();
                transitioned = true;
            }
            if let Some(idx) = hovered_link {
                app.follow_link(idx);
                transitioned = true;
            }
        }
    }

    transitioned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_core::indexing::build_lookup_index;
    use crate::app_core::resolver::DetailView;
    use crate::app_core::suggest::SuggestionPhase;
    use crate::assets::AssetRoots;
    use crate::theme;
    use ratatui::{Terminal, backend::TestBackend, layout::Rect};
    use serde_json::json;
    use std::time::Duration;

    fn make_key(code: AppKeyCode) -> AppKeyEvent {
        AppKeyEvent::new(code)
    }

    fn make_key_ctrl(code: AppKeyCode) -> AppKeyEvent {
        AppKeyEvent::with_ctrl(code)
    }

    fn make_mouse(kind: AppMouseKind, column: u16, row: u16) -> AppMouseEvent {
        AppMouseEvent::new(kind, column, row)
    }

    fn make_test_app() -> AppState {
        let mut app = AppState::new(
            theme::Theme::Dracula.config(),
            AssetRoots::default(),
            Duration::from_millis(150),
            "v1".to_string(),
            "monsters.json".to_string(),
        );
        let index = build_lookup_index(
            &[
                json!({"name": "Slime", "image": "slime.png", "drops": ["Jelly"]}),
                json!({"name": "Wolf", "drops": ["Fang", "Jelly"]}),
                json!({"name": "Goblin", "drops": ["Gold Coin"]}),
            ],
            |_| {},
        );
        app.apply_dataset(index, 0.0);
        app
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            handle_key_event(app, make_key(AppKeyCode::Char(c)));
        }
    }

    /// Types `text` and lets the debounce elapse.
    fn search(app: &mut AppState, text: &str) {
        type_text(app, text);
        let now = app.now + Duration::from_millis(200);
        app.tick(now);
    }

    fn render(app: &mut AppState) {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|f| ui::ui(f, app)).unwrap();
    }

    fn names(app: &AppState) -> Vec<&str> {
        app.suggestions
            .items()
            .iter()
            .map(|s| s.name.as_str())
            .collect()
    }

    #[test]
    fn test_typing_runs_query_after_debounce() {
        let mut app = make_test_app();
        type_text(&mut app, "l");
        assert_eq!(app.suggestions.phase(), SuggestionPhase::Pending);
        assert!(app.suggestions.items().is_empty());

        app.tick(Duration::from_millis(150));
        assert_eq!(names(&app), vec!["Slime", "Wolf", "Goblin", "Jelly", "Gold Coin"]);
    }

    #[test]
    fn test_arrow_highlight_wraps() {
        let mut app = make_test_app();
        search(&mut app, "l");

        handle_key_event(&mut app, make_key(AppKeyCode::Up));
        assert_eq!(app.suggestions.highlighted(), Some(4));
        assert_eq!(app.suggestion_list_state.selected(), Some(4));

        handle_key_event(&mut app, make_key(AppKeyCode::Down));
        assert_eq!(app.suggestions.highlighted(), Some(0));

        handle_key_event(&mut app, make_key(AppKeyCode::Up));
        assert_eq!(app.suggestions.highlighted(), Some(4));
    }

    #[test]
    fn test_arrows_ignored_while_pending() {
        let mut app = make_test_app();
        search(&mut app, "l");
        type_text(&mut app, "i");

        handle_key_event(&mut app, make_key(AppKeyCode::Down));
        assert_eq!(app.suggestions.highlighted(), None);
        assert!(app.suggestions.is_visible());
        assert!(!app.suggestions.is_active());
    }

    #[test]
    fn test_enter_without_highlight_takes_first() {
        let mut app = make_test_app();
        search(&mut app, "jel");

        handle_key_event(&mut app, make_key(AppKeyCode::Enter));
        assert_eq!(app.search_text, "Jelly");
        assert_eq!(app.detail.title(), "Item: Jelly");
        let holders: Vec<&str> = app.detail.links().iter().map(|l| l.label.as_str()).collect();
        assert_eq!(holders, vec!["Slime", "Wolf"]);
        assert!(!app.suggestions.is_visible());
    }

    #[test]
    fn test_enter_takes_highlighted() {
        let mut app = make_test_app();
        search(&mut app, "l");
        handle_key_event(&mut app, make_key(AppKeyCode::Down));
        handle_key_event(&mut app, make_key(AppKeyCode::Down));
        handle_key_event(&mut app, make_key(AppKeyCode::Enter));

        assert_eq!(app.search_text, "Wolf");
        assert_eq!(app.search_cursor, 4);
        assert!(matches!(app.detail, DetailView::Creature(_)));
    }

    #[test]
    fn test_enter_with_no_matches_keeps_page() {
        let mut app = make_test_app();
        search(&mut app, "zzz");
        handle_key_event(&mut app, make_key(AppKeyCode::Enter));
        assert_eq!(app.detail, DetailView::Welcome);
        assert_eq!(app.search_text, "zzz");
    }

    #[test]
    fn test_unchanged_text_does_not_schedule() {
        let mut app = make_test_app();
        handle_key_event(&mut app, make_key(AppKeyCode::Backspace));
        assert!(!app.debouncer.is_pending());
        assert_eq!(app.suggestions.phase(), SuggestionPhase::Idle);
    }

    #[test]
    fn test_esc_dismisses_then_leaves_search() {
        let mut app = make_test_app();
        search(&mut app, "wo");
        assert!(app.suggestions.is_visible());

        handle_key_event(&mut app, make_key(AppKeyCode::Esc));
        assert!(!app.suggestions.is_visible());
        assert_eq!(app.focused_pane, FocusPane::Search);
        assert_eq!(app.search_text, "wo");

        handle_key_event(&mut app, make_key(AppKeyCode::Esc));
        assert_eq!(app.focused_pane, FocusPane::Details);
    }

    #[test]
    fn test_esc_cancels_pending_query() {
        let mut app = make_test_app();
        type_text(&mut app, "wo");
        handle_key_event(&mut app, make_key(AppKeyCode::Esc));
        assert!(!app.tick(Duration::from_secs(1)));
        assert_eq!(app.suggestions.phase(), SuggestionPhase::Closed);
    }

    #[test]
    fn test_details_link_navigation() {
        let mut app = make_test_app();
        search(&mut app, "wolf");
        handle_key_event(&mut app, make_key(AppKeyCode::Enter));
        handle_key_event(&mut app, make_key(AppKeyCode::Tab));
        assert_eq!(app.focused_pane, FocusPane::Details);

        handle_key_event(&mut app, make_key(AppKeyCode::Down));
        handle_key_event(&mut app, make_key(AppKeyCode::Down));
        handle_key_event(&mut app, make_key(AppKeyCode::Enter));
        assert_eq!(app.detail.title(), "Item: Jelly");

        handle_key_event(&mut app, make_key(AppKeyCode::Down));
        handle_key_event(&mut app, make_key(AppKeyCode::Enter));
        assert_eq!(app.detail.title(), "Slime");
    }

    #[test]
    fn test_details_home_scrolls_to_top() {
        let mut app = make_test_app();
        app.focus_pane(FocusPane::Details);
        app.scroll_details_by_lines(5, true);
        handle_key_event(&mut app, make_key(AppKeyCode::Home));
        assert_eq!(app.details_scroll_state.offset().y, 0);
    }

    #[test]
    fn test_typing_in_details_jumps_to_search() {
        let mut app = make_test_app();
        app.focus_pane(FocusPane::Details);
        handle_key_event(&mut app, make_key(AppKeyCode::Char('g')));
        assert_eq!(app.focused_pane, FocusPane::Search);
        assert_eq!(app.search_text, "g");
        assert!(app.debouncer.is_pending());
    }

    #[test]
    fn test_input_shortcuts() {
        let mut app = make_test_app();
        app.search_text = "hello world".to_string();
        app.search_cursor = 11;

        handle_key_event(&mut app, make_key_ctrl(AppKeyCode::Char('a')));
        assert_eq!(app.search_cursor, 0);

        handle_key_event(&mut app, make_key_ctrl(AppKeyCode::Char('e')));
        assert_eq!(app.search_cursor, 11);

        handle_key_event(&mut app, make_key_ctrl(AppKeyCode::Char('w')));
        assert_eq!(app.search_text, "hello ");
        assert_eq!(app.search_cursor, 6);

        handle_key_event(&mut app, make_key_ctrl(AppKeyCode::Char('u')));
        assert_eq!(app.search_text, "");
        assert_eq!(app.search_cursor, 0);
    }

    #[test]
    fn test_quit_behavior() {
        let mut app = make_test_app();
        handle_key_event(&mut app, make_key(AppKeyCode::Char('q')));
        assert!(!app.should_quit);
        assert_eq!(app.search_text, "q");

        app.focus_pane(FocusPane::Details);
        handle_key_event(&mut app, make_key(AppKeyCode::Char('q')));
        assert!(app.should_quit);

        let mut app = make_test_app();
        handle_key_event(&mut app, make_key_ctrl(AppKeyCode::Char('c')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_help_swallows_keys() {
        let mut app = make_test_app();
        app.focus_pane(FocusPane::Details);
        handle_key_event(&mut app, make_key(AppKeyCode::Char('?')));
        assert!(app.show_help);

        handle_key_event(&mut app, make_key(AppKeyCode::Char('q')));
        assert!(!app.should_quit);

        handle_key_event(&mut app, make_key(AppKeyCode::Esc));
        assert!(!app.show_help);
    }

    #[test]
    fn test_handle_key_event_ignores_release() {
        let mut app = make_test_app();
        let release_event = AppKeyEvent {
            is_release: true,
            ..make_key(AppKeyCode::Char('a'))
        };
        handle_key_event(&mut app, release_event);
        assert!(app.search_text.is_empty());
    }

    #[test]
    fn test_mouse_hover_and_click_suggestion() {
        let mut app = make_test_app();
        search(&mut app, "l");
        render(&mut app);
        assert_eq!(app.suggestions_content_area, Some(Rect::new(1, 4, 58, 5)));

        assert!(handle_mouse_event(&mut app, make_mouse(AppMouseKind::Move, 5, 6)));
        assert_eq!(app.suggestions.highlighted(), Some(2));
        assert!(!handle_mouse_event(&mut app, make_mouse(AppMouseKind::Move, 6, 6)));

        assert!(handle_mouse_event(&mut app, make_mouse(AppMouseKind::LeftDown, 5, 7)));
        assert_eq!(app.search_text, "Jelly");
        assert_eq!(app.detail.title(), "Item: Jelly");
    }

    #[test]
    fn test_mouse_click_link_follows_it() {
        let mut app = make_test_app();
        app.choose("Wolf");
        render(&mut app);

        // Details content starts at row 4; "Jelly" is the seventh line.
        assert!(handle_mouse_event(&mut app, make_mouse(AppMouseKind::Move, 6, 10)));
        assert_eq!(app.hovered_link, Some(1));

        assert!(handle_mouse_event(&mut app, make_mouse(AppMouseKind::LeftDown, 6, 10)));
        assert_eq!(app.focused_pane, FocusPane::Details);
        assert_eq!(app.detail.title(), "Item: Jelly");
    }

    #[test]
    fn test_mouse_click_search_sets_caret_position() {
        let mut app = make_test_app();
        app.search_text = "abcdef".to_string();
        app.search_cursor = 6;
        app.focus_pane(FocusPane::Details);
        app.search_area = Some(Rect::new(0, 0, 60, 3));
        app.search_input_area = Some(Rect::new(1, 1, 58, 1));

        let transitioned = handle_mouse_event(&mut app, make_mouse(AppMouseKind::LeftDown, 3, 1));

        assert!(transitioned);
        assert_eq!(app.focused_pane, FocusPane::Search);
        assert_eq!(app.search_cursor, 2);
    }

    #[test]
    fn test_mouse_click_search_past_end_clamps_to_end() {
        let mut app = make_test_app();
        app.search_text = "abc".to_string();
        app.search_cursor = 0;
        app.search_area = Some(Rect::new(0, 0, 30, 3));
        app.search_input_area = Some(Rect::new(1, 1, 28, 1));

        let transitioned = handle_mouse_event(&mut app, make_mouse(AppMouseKind::LeftDown, 20, 1));

        assert!(transitioned);
        assert_eq!(app.search_cursor, 3);
    }

    #[test]
    fn test_mouse_scroll_hovered_details_moves_by_constant() {
        let mut app = make_test_app();
        app.details_area = Some(Rect::new(0, 3, 60, 16));

        let transitioned =
            handle_mouse_event(&mut app, make_mouse(AppMouseKind::ScrollDown, 25, 8));

        assert!(transitioned);
        assert_eq!(app.details_scroll_state.offset().y, SCROLL_LINES);
    }

    #[test]
    fn test_mouse_click_details_dismisses_suggestions() {
        let mut app = make_test_app();
        search(&mut app, "wo");
        render(&mut app);

        assert!(handle_mouse_event(&mut app, make_mouse(AppMouseKind::LeftDown, 30, 15)));
        assert!(!app.suggestions.is_visible());
        assert_eq!(app.focused_pane, FocusPane::Details);
    }
}
