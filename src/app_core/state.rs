//! Shared application state, types, and state-mutation methods.
//!
//! This module is runtime-agnostic. The lookup index is injected once the
//! runtime has loaded the dataset; until then every query comes back empty.

use crate::app_core::debounce::Debouncer;
use crate::app_core::resolver::{self, DetailView};
use crate::app_core::suggest::{self, SuggestionList};
use crate::assets::AssetRoots;
use crate::error::LoadError;
use crate::matcher;
use crate::search_index::LookupIndex;
use crate::theme::ThemeConfig;
use crate::ui::DetailLine;
use ratatui::{layout::Rect, widgets::ListState};
use std::time::Duration;
use tui_scrollview::ScrollViewState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Search,
    Details,
}

#[derive(Debug, Clone)]
pub struct ProgressStage {
    pub label: String,
    pub ratio: f64,
    pub done: bool,
}

/// Application state for the Ratatui app.
pub struct AppState {
    /// Lookup index, present once the dataset has fully loaded
    pub index: Option<LookupIndex>,
    /// Icon path resolution
    pub assets: AssetRoots,
    /// Search input text
    pub search_text: String,
    /// Cursor position in the search input, in characters
    pub search_cursor: usize,
    /// Debounce between keystrokes and the query
    pub debouncer: Debouncer,
    /// Suggestion list under the search input
    pub suggestions: SuggestionList,
    /// Render state of the suggestion list (scroll offset follows the highlight)
    pub suggestion_list_state: ListState,
    /// Current detail page
    pub detail: DetailView,
    /// Keyboard-selected link on the detail page
    pub link_cursor: Option<usize>,
    /// Link under the mouse pointer
    pub hovered_link: Option<usize>,
    /// Scroll the selected link into view on the next render
    pub reveal_link: bool,
    /// Which pane currently has keyboard focus
    pub focused_pane: FocusPane,
    /// Theme configuration
    pub theme: ThemeConfig,
    /// Latest runtime clock reading
    pub now: Duration,
    /// App version string
    pub app_version: String,
    /// Where the dataset came from (file path or URL)
    pub dataset_label: String,
    /// Time taken to normalize and index the dataset
    pub load_time_ms: f64,
    /// State for scrolling the details pane
    pub details_scroll_state: ScrollViewState,
    /// Rendered detail lines for the current width (used for rendering and hit-testing)
    pub details_lines: Vec<DetailLine>,
    /// Width used for current details_lines; 0 forces a rebuild
    pub details_lines_width: u16,
    /// Screen region of the search pane (including borders)
    pub search_area: Option<Rect>,
    /// Screen region of the search text (inside borders)
    pub search_input_area: Option<Rect>,
    /// Screen region of the suggestion popup (including borders)
    pub suggestions_area: Option<Rect>,
    /// Screen region of suggestion rows (inside borders)
    pub suggestions_content_area: Option<Rect>,
    /// Screen region of the details pane (including borders)
    pub details_area: Option<Rect>,
    /// Screen region of the scrollable detail content
    pub details_content_area: Option<Rect>,
    /// Flag to quit app
    pub should_quit: bool,
    /// Whether help overlay is visible
    pub show_help: bool,
    /// Whether progress modal is visible
    pub show_progress: bool,
    /// Progress modal title
    pub progress_title: String,
    /// Progress stages for modal display
    pub progress_stages: Vec<ProgressStage>,
}

impl AppState {
    pub fn new(
        theme: ThemeConfig,
        assets: AssetRoots,
        debounce: Duration,
        app_version: String,
        dataset_label: String,
    ) -> Self {
        Self {
            index: None,
            assets,
            search_text: String::new(),
            search_cursor: 0,
            debouncer: Debouncer::new(debounce),
            suggestions: SuggestionList::default(),
            suggestion_list_state: ListState::default(),
            detail: DetailView::Welcome,
            link_cursor: None,
            hovered_link: None,
            reveal_link: false,
            focused_pane: FocusPane::Search,
            theme,
            now: Duration::ZERO,
            app_version,
            dataset_label,
            load_time_ms: 0.0,
            details_scroll_state: ScrollViewState::default(),
            details_lines: Vec::new(),
            details_lines_width: 0,
            search_area: None,
            search_input_area: None,
            suggestions_area: None,
            suggestions_content_area: None,
            details_area: None,
            details_content_area: None,
            should_quit: false,
            show_help: false,
            show_progress: false,
            progress_title: String::new(),
            progress_stages: Vec::new(),
        }
    }

    /// Installs the fully built index.
    pub fn apply_dataset(&mut self, index: LookupIndex, load_time_ms: f64) {
        self.index = Some(index);
        self.load_time_ms = load_time_ms;
    }

    /// Records a terminal load failure; the message replaces the detail page.
    pub fn fail_load(&mut self, err: &LoadError) {
        log::warn!("dataset load failed: {err}");
        self.set_detail(DetailView::LoadFailed {
            message: err.user_message(),
        });
    }

    pub fn entity_count(&self) -> usize {
        self.index.as_ref().map_or(0, LookupIndex::entity_count)
    }

    /// Advances the clock and runs the debounced query when due.
    /// Returns `true` when the UI needs to be redrawn.
    pub fn tick(&mut self, now: Duration) -> bool {
        self.now = now;
        if self.debouncer.fire_if_due(now) {
            self.run_query();
            return true;
        }
        false
    }

    /// Runs the query engine for the current input and refreshes the list.
    pub fn run_query(&mut self) {
        let term = matcher::normalize_term(&self.search_text);
        if term.is_empty() {
            self.suggestions.reset_idle();
        } else {
            let items = self
                .index
                .as_ref()
                .map(|index| suggest::build_suggestions(index, &term))
                .unwrap_or_default();
            self.suggestions.show(items);
        }
        self.suggestion_list_state = ListState::default();
        self.sync_suggestion_highlight();
    }

    /// Called after every edit of the search input.
    pub fn on_search_edited(&mut self) {
        self.debouncer.schedule(self.now);
        self.suggestions.mark_pending();
        self.sync_suggestion_highlight();
    }

    pub fn highlight_next(&mut self) {
        self.suggestions.highlight_next();
        self.sync_suggestion_highlight();
    }

    pub fn highlight_prev(&mut self) {
        self.suggestions.highlight_prev();
        self.sync_suggestion_highlight();
    }

    pub fn sync_suggestion_highlight(&mut self) {
        self.suggestion_list_state
            .select(self.suggestions.highlighted());
    }

    /// Enter in the search input: flushes a pending query, then chooses the
    /// highlighted suggestion or the first one.
    pub fn confirm_search(&mut self) {
        if self.debouncer.flush() {
            self.run_query();
        }
        if let Some(suggestion) = self.suggestions.enter_target() {
            let name = suggestion.name.clone();
            self.choose(&name);
        }
    }

    pub fn select_suggestion(&mut self, idx: usize) {
        if let Some(suggestion) = self.suggestions.get(idx) {
            let name = suggestion.name.clone();
            self.choose(&name);
        }
    }

    /// Hides the suggestion list and drops any pending query.
    pub fn dismiss_suggestions(&mut self) {
        self.debouncer.cancel();
        self.suggestions.close();
        self.sync_suggestion_highlight();
    }

    /// Commits a suggestion: writes it into the input and opens its page.
    pub fn choose(&mut self, name: &str) {
        self.search_text = name.to_string();
        self.search_move_to_end();
        self.dismiss_suggestions();
        self.show_detail(name);
    }

    /// Resolves `name` and shows the result, scrolled to the top.
    pub fn show_detail(&mut self, name: &str) {
        let detail = match &self.index {
            Some(index) => resolver::resolve(index, name, &self.assets),
            None => DetailView::NotFound {
                term: name.to_string(),
            },
        };
        self.set_detail(detail);
    }

    fn set_detail(&mut self, detail: DetailView) {
        self.detail = detail;
        self.link_cursor = None;
        self.hovered_link = None;
        self.details_scroll_state = ScrollViewState::default();
        self.invalidate_details();
    }

    pub fn invalidate_details(&mut self) {
        self.details_lines.clear();
        self.details_lines_width = 0;
    }

    pub fn follow_link(&mut self, idx: usize) {
        if let Some(link) = self.detail.links().get(idx) {
            let target = link.target.clone();
            self.show_detail(&target);
        }
    }

    /// Moves the link cursor by `direction` (+1 or -1), stopping at the ends.
    pub fn move_link_cursor(&mut self, direction: i32) {
        let len = self.detail.links().len();
        if len == 0 {
            return;
        }
        self.link_cursor = Some(match (self.link_cursor, direction < 0) {
            (None, false) => 0,
            (None, true) => len - 1,
            (Some(idx), false) => (idx + 1).min(len - 1),
            (Some(idx), true) => idx.saturating_sub(1),
        });
        self.reveal_link = true;
    }

    pub fn follow_link_cursor(&mut self) {
        if let Some(idx) = self.link_cursor {
            self.follow_link(idx);
        }
    }

    pub fn scroll_details_up(&mut self) {
        self.details_scroll_state.scroll_up();
    }

    pub fn scroll_details_down(&mut self) {
        self.details_scroll_state.scroll_down();
    }

    pub fn scroll_details_by_lines(&mut self, lines: u16, down: bool) {
        for _ in 0..lines {
            if down {
                self.scroll_details_down();
            } else {
                self.scroll_details_up();
            }
        }
    }

    pub fn search_add_char(&mut self, c: char) {
        let byte_idx = self
            .search_text
            .char_indices()
            .nth(self.search_cursor)
            .map(|(idx, _)| idx)
            .unwrap_or(self.search_text.len());
        self.search_text.insert(byte_idx, c);
        self.search_cursor += 1;
    }

    pub fn search_backspace(&mut self) {
        if self.search_cursor > 0 {
            self.search_cursor -= 1;
            if let Some((byte_idx, _)) = self.search_text.char_indices().nth(self.search_cursor) {
                self.search_text.remove(byte_idx);
            }
        }
    }

    pub fn search_delete(&mut self) {
        if let Some((byte_idx, _)) = self.search_text.char_indices().nth(self.search_cursor) {
            self.search_text.remove(byte_idx);
        }
    }

    pub fn search_move_cursor_left(&mut self) {
        self.search_cursor = self.search_cursor.saturating_sub(1);
    }

    pub fn search_move_cursor_right(&mut self) {
        let char_count = self.search_text.chars().count();
        if self.search_cursor < char_count {
            self.search_cursor += 1;
        }
    }

    pub fn search_move_to_start(&mut self) {
        self.search_cursor = 0;
    }

    pub fn search_move_to_end(&mut self) {
        self.search_cursor = self.search_text.chars().count();
    }

    pub fn search_clear(&mut self) {
        self.search_text.clear();
        self.search_cursor = 0;
    }

    /// Deletes the word before the cursor, along with trailing whitespace.
    pub fn search_delete_word(&mut self) {
        let chars: Vec<char> = self.search_text.chars().collect();
        let mut start = self.search_cursor.min(chars.len());

        while start > 0 && chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !chars[start - 1].is_whitespace() {
            start -= 1;
        }

        let remaining: String = chars[..start]
            .iter()
            .chain(&chars[self.search_cursor.min(chars.len())..])
            .collect();
        self.search_text = remaining;
        self.search_cursor = start;
    }

    pub fn focus_pane(&mut self, pane: FocusPane) {
        self.focused_pane = pane;
    }

    pub fn toggle_focus(&mut self) {
        let next = match self.focused_pane {
            FocusPane::Search => FocusPane::Details,
            FocusPane::Details => FocusPane::Search,
        };
        self.focus_pane(next);
    }

    pub fn start_progress(&mut self, title: impl Into<String>, stages: &[&str]) {
        self.show_progress = true;
        self.progress_title = title.into();
        self.progress_stages = stages
            .iter()
            .map(|label| ProgressStage {
                label: (*label).to_string(),
                ratio: 0.0,
                done: false,
            })
            .collect();
    }

    pub fn update_stage(&mut self, label: &str, ratio: f64) {
        if let Some(stage) = self
            .progress_stages
            .iter_mut()
            .find(|stage| stage.label == label)
        {
            stage.ratio = ratio.clamp(0.0, 1.0);
            if stage.ratio >= 1.0 {
                stage.done = true;
            }
        }
    }

    pub fn finish_stage(&mut self, label: &str) {
        self.update_stage(label, 1.0);
    }

    pub fn clear_progress(&mut self) {
        self.show_progress = false;
        self.progress_title.clear();
        self.progress_stages.clear();
    }
}
