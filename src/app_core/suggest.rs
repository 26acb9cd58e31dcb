//! Suggestion list state: visibility phase, items and keyboard highlight.

use crate::matcher::{self, SuggestionKind};
use crate::search_index::LookupIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionPhase {
    /// No term; list hidden.
    Idle,
    /// Input changed, debounce armed.
    Pending,
    /// List populated and visible.
    Showing,
    /// List hidden after a selection, Esc, or a query without matches.
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub name: String,
    pub kind: SuggestionKind,
}

/// Runs the query engine for an already-normalized term and decorates results.
pub fn build_suggestions(index: &LookupIndex, term: &str) -> Vec<Suggestion> {
    matcher::find_matches(index, term)
        .into_iter()
        .map(|name| {
            let kind = matcher::classify(index, &name);
            Suggestion { name, kind }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct SuggestionList {
    items: Vec<Suggestion>,
    highlighted: Option<usize>,
    phase: SuggestionPhase,
    no_matches: bool,
}

impl Default for SuggestionList {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            highlighted: None,
            phase: SuggestionPhase::Idle,
            no_matches: false,
        }
    }
}

impl SuggestionList {
    pub fn items(&self) -> &[Suggestion] {
        &self.items
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn phase(&self) -> SuggestionPhase {
        self.phase
    }

    /// The last query found nothing.
    pub fn no_matches(&self) -> bool {
        self.no_matches
    }

    /// Whether keyboard navigation and selection act on the list.
    pub fn is_active(&self) -> bool {
        self.phase == SuggestionPhase::Showing
    }

    /// Whether the list is drawn. Previous results stay on screen while the
    /// next query is pending.
    pub fn is_visible(&self) -> bool {
        match self.phase {
            SuggestionPhase::Showing => true,
            SuggestionPhase::Pending => !self.items.is_empty(),
            SuggestionPhase::Idle | SuggestionPhase::Closed => false,
        }
    }

    pub fn mark_pending(&mut self) {
        if self.phase != SuggestionPhase::Showing {
            self.items.clear();
        }
        self.phase = SuggestionPhase::Pending;
        self.highlighted = None;
    }

    /// Replaces the list with fresh results.
    pub fn show(&mut self, items: Vec<Suggestion>) {
        self.highlighted = None;
        self.no_matches = items.is_empty();
        self.phase = if items.is_empty() {
            SuggestionPhase::Closed
        } else {
            SuggestionPhase::Showing
        };
        self.items = items;
    }

    pub fn reset_idle(&mut self) {
        self.items.clear();
        self.highlighted = None;
        self.no_matches = false;
        self.phase = SuggestionPhase::Idle;
    }

    pub fn close(&mut self) {
        self.highlighted = None;
        self.phase = SuggestionPhase::Closed;
    }

    /// Moves the highlight forward, wrapping from the last item to the first.
    /// With nothing highlighted the first item is chosen.
    pub fn highlight_next(&mut self) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(idx) => (idx + 1) % len,
            None => 0,
        });
    }

    /// Moves the highlight backward, wrapping from the first item to the last.
    /// With nothing highlighted the last item is chosen.
    pub fn highlight_prev(&mut self) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(idx) => (idx + len - 1) % len,
            None => len - 1,
        });
    }

    /// Highlights `idx` when it is in range; otherwise clears the highlight.
    pub fn set_highlight(&mut self, idx: Option<usize>) {
        self.highlighted = idx.filter(|&i| i < self.items.len());
    }

    /// The item Enter would choose: the highlighted one, else the first.
    pub fn enter_target(&self) -> Option<&Suggestion> {
        if !self.is_active() {
            return None;
        }
        self.highlighted
            .and_then(|idx| self.items.get(idx))
            .or_else(|| self.items.first())
    }

    pub fn get(&self, idx: usize) -> Option<&Suggestion> {
        self.items.get(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(names: &[&str]) -> Vec<Suggestion> {
        names
            .iter()
            .map(|name| Suggestion {
                name: name.to_string(),
                kind: SuggestionKind::Item,
            })
            .collect()
    }

    #[test]
    fn test_arrow_down_wraps() {
        let mut list = SuggestionList::default();
        list.show(items(&["a", "b", "c"]));
        assert_eq!(list.highlighted(), None);

        let mut seen = Vec::new();
        for _ in 0..4 {
            list.highlight_next();
            seen.push(list.highlighted().unwrap());
        }
        assert_eq!(seen, vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_arrow_up_wraps() {
        let mut list = SuggestionList::default();
        list.show(items(&["a", "b", "c"]));

        list.highlight_next();
        assert_eq!(list.highlighted(), Some(0));
        list.highlight_prev();
        assert_eq!(list.highlighted(), Some(2));
        list.highlight_prev();
        assert_eq!(list.highlighted(), Some(1));
    }

    #[test]
    fn test_arrow_up_from_none_picks_last() {
        let mut list = SuggestionList::default();
        list.show(items(&["a", "b", "c"]));
        list.highlight_prev();
        assert_eq!(list.highlighted(), Some(2));
    }

    #[test]
    fn test_enter_target() {
        let mut list = SuggestionList::default();
        assert!(list.enter_target().is_none());

        list.show(items(&["a", "b"]));
        assert_eq!(list.enter_target().unwrap().name, "a");

        list.highlight_prev();
        assert_eq!(list.enter_target().unwrap().name, "b");

        list.close();
        assert!(list.enter_target().is_none());
    }

    #[test]
    fn test_empty_results_close_with_flag() {
        let mut list = SuggestionList::default();
        list.show(Vec::new());
        assert_eq!(list.phase(), SuggestionPhase::Closed);
        assert!(list.no_matches());
        assert!(!list.is_visible());

        list.highlight_next();
        assert_eq!(list.highlighted(), None);
    }

    #[test]
    fn test_pending_keeps_previous_results_visible_but_inactive() {
        let mut list = SuggestionList::default();
        list.show(items(&["a"]));
        list.mark_pending();

        assert_eq!(list.phase(), SuggestionPhase::Pending);
        assert!(list.is_visible());
        assert!(!list.is_active());
        assert!(list.enter_target().is_none());

        list.reset_idle();
        assert!(!list.is_visible());
        assert!(list.items().is_empty());
    }

    #[test]
    fn test_set_highlight_out_of_range_clears() {
        let mut list = SuggestionList::default();
        list.show(items(&["a", "b"]));
        list.set_highlight(Some(1));
        assert_eq!(list.highlighted(), Some(1));
        list.set_highlight(Some(5));
        assert_eq!(list.highlighted(), None);
    }
}
