use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect, Size},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, LineGauge, List, ListItem, Paragraph},
};
use tui_scrollview::{ScrollView, ScrollbarVisibility};

use crate::app_core::resolver::{CreatureView, DetailView, Link};
use crate::app_core::state::{AppState, FocusPane, ProgressStage};
use crate::matcher::SuggestionKind;
use crate::theme::ThemeConfig;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Upper bound on suggestion rows drawn at once; the list scrolls past it.
pub const MAX_SUGGESTION_ROWS: u16 = 10;

#[derive(Debug, Clone)]
pub struct DetailSpan {
    pub span: Span<'static>,
    /// Index into [`DetailView::links`] when the span is a link.
    pub link: Option<usize>,
}

/// One row of the detail page.
pub type DetailLine = Vec<DetailSpan>;

fn plain(text: impl Into<String>, style: Style) -> DetailSpan {
    DetailSpan {
        span: Span::styled(text.into(), style),
        link: None,
    }
}

/// Main UI entry point that renders the entire application layout.
pub fn ui(f: &mut Frame, app: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search input
            Constraint::Min(0),    // Details
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    app.search_area = Some(chunks[0]);
    app.details_area = Some(chunks[1]);

    render_search(f, app, chunks[0]);
    render_details(f, app, chunks[1]);
    render_status_bar(f, app, chunks[2]);
    render_suggestions(f, app);

    if app.show_progress {
        render_progress_modal(f, app);
    } else if app.show_help {
        render_help_overlay(f, app);
    }
}

/// Renders the search input box.
fn render_search(f: &mut Frame, app: &mut AppState, area: Rect) {
    let is_focused = app.focused_pane == FocusPane::Search;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            app.theme.border_selected
        } else {
            app.theme.border
        })
        .title(" Search ")
        .title_style(app.theme.title)
        .title_bottom(if is_focused {
            Line::from(" ↑/↓ suggestions • Enter open • Esc close ").right_aligned()
        } else {
            Line::from("")
        });

    let inner = block.inner(area);
    app.search_input_area = Some(inner);
    let horizontal_scroll =
        search_horizontal_scroll(&app.search_text, app.search_cursor, inner.width);

    let content = if app.search_text.is_empty() && !is_focused {
        Text::from(Line::from(Span::styled(
            "creature or item name",
            app.theme.muted().add_modifier(Modifier::ITALIC),
        )))
    } else {
        Text::from(app.search_text.as_str())
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .style(app.theme.text)
        .scroll((0, horizontal_scroll));

    f.render_widget(paragraph, area);

    if is_focused && !app.show_help && inner.width > 0 && inner.height > 0 {
        let cursor_offset = search_cursor_offset(&app.search_text, app.search_cursor);
        let max_x = inner.width.saturating_sub(1);
        let visible_cursor_offset = cursor_offset.saturating_sub(horizontal_scroll);
        f.set_cursor_position((inner.x + visible_cursor_offset.min(max_x), inner.y));
    }
}

/// Renders the suggestion popup directly under the search box, over the details pane.
fn render_suggestions(f: &mut Frame, app: &mut AppState) {
    app.suggestions_area = None;
    app.suggestions_content_area = None;
    if !app.suggestions.is_visible() || app.show_help || app.show_progress {
        return;
    }
    let (Some(search), Some(details)) = (app.search_area, app.details_area) else {
        return;
    };

    let rows = app.suggestions.items().len() as u16;
    let top = search.y + search.height;
    let available = (details.y + details.height).saturating_sub(top);
    let height = (rows.min(MAX_SUGGESTION_ROWS) + 2).min(available);
    if height < 3 || search.width < 4 {
        return;
    }
    let popup = Rect::new(search.x, top, search.width, height);
    f.render_widget(Clear, popup);

    let active = app.suggestions.is_active();
    let style = app.theme.detail_style;
    let items: Vec<ListItem> = app
        .suggestions
        .items()
        .iter()
        .map(|suggestion| {
            let marker = match suggestion.kind {
                SuggestionKind::Creature => Span::styled("◆ ", Style::default().fg(style.hp)),
                SuggestionKind::Item => Span::styled("◇ ", Style::default().fg(style.link)),
            };
            ListItem::new(Line::from(vec![marker, Span::raw(suggestion.name.as_str())]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_selected)
        .title(format!(" Suggestions ({}) ", rows))
        .title_style(app.theme.title)
        .style(app.theme.list_normal);

    app.suggestions_content_area = Some(block.inner(popup));
    app.suggestions_area = Some(popup);

    let mut list = List::new(items).block(block).scroll_padding(1);
    if active {
        list = list
            .style(app.theme.list_normal)
            .highlight_style(app.theme.list_selected);
    } else {
        list = list.style(app.theme.list_normal.add_modifier(Modifier::DIM));
    }

    f.render_stateful_widget(list, popup, &mut app.suggestion_list_state);
}

/// Renders the detail page inside a scroll view.
fn render_details(f: &mut Frame, app: &mut AppState, area: Rect) {
    let is_focused = app.focused_pane == FocusPane::Details;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            app.theme.border_selected
        } else {
            app.theme.border
        })
        .style(app.theme.text)
        .title(format!(" {} ", app.detail.title()))
        .title_alignment(Alignment::Left)
        .title_style(app.theme.title)
        .title_bottom(if is_focused {
            Line::from(" ↑/↓ links • Enter open • PgUp/PgDn scroll • Tab search ").right_aligned()
        } else {
            Line::from("").right_aligned()
        });

    let inner_area = block.inner(area);
    f.render_widget(block, area);
    app.details_content_area = None;

    let horizontal_padding = 1;
    let content_width = inner_area.width.saturating_sub(horizontal_padding * 2);
    if content_width == 0 || inner_area.height == 0 {
        return;
    }

    // Re-wrap if width changed or the page was replaced
    if app.details_lines_width != content_width {
        let lines = build_detail_lines(&app.detail, &app.theme);
        app.details_lines = wrap_detail_lines(&lines, content_width);
        app.details_lines_width = content_width;
    }
    app.details_content_area = Some(inner_area);

    if app.reveal_link {
        reveal_selected_link(app, inner_area.height);
        app.reveal_link = false;
    }

    let content_height = app.details_lines.len() as u16;
    let mut scroll_view = ScrollView::new(Size::new(content_width, content_height))
        .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
        .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

    // Match the background of the scroll view buffer to the theme
    let scroll_area = scroll_view.area();
    scroll_view.buf_mut().set_style(scroll_area, app.theme.text);

    let text = detail_to_text(
        &app.details_lines,
        &app.theme,
        app.link_cursor,
        app.hovered_link,
    );
    scroll_view.render_widget(
        Paragraph::new(text).style(app.theme.text),
        Rect::new(0, 0, content_width, content_height),
    );

    let scroll_view_area = Rect::new(
        inner_area.x + horizontal_padding,
        inner_area.y,
        content_width,
        inner_area.height,
    );
    f.render_stateful_widget(scroll_view, scroll_view_area, &mut app.details_scroll_state);
}

/// Adjusts the scroll offset so the keyboard-selected link is on screen.
fn reveal_selected_link(app: &mut AppState, viewport_height: u16) {
    let Some(selected) = app.link_cursor else {
        return;
    };
    let Some(line_idx) = app
        .details_lines
        .iter()
        .position(|line| line.iter().any(|span| span.link == Some(selected)))
    else {
        return;
    };

    let line_idx = line_idx as u16;
    let mut offset = app.details_scroll_state.offset();
    if line_idx < offset.y {
        offset.y = line_idx;
    } else if line_idx >= offset.y + viewport_height {
        offset.y = line_idx + 1 - viewport_height;
    }
    app.details_scroll_state.set_offset(offset);
}

/// Lays out a detail page as styled lines, before wrapping.
pub fn build_detail_lines(detail: &DetailView, theme: &ThemeConfig) -> Vec<DetailLine> {
    let mut lines: Vec<DetailLine> = Vec::new();
    let section = theme.title.add_modifier(Modifier::UNDERLINED);

    match detail {
        DetailView::Welcome => {
            lines.push(vec![plain(
                "Type a creature or item name to search.",
                theme.text,
            )]);
            lines.push(Vec::new());
            lines.push(vec![plain(
                "Pick a suggestion with ↑/↓ and Enter, or click it. Press ? for help.",
                theme.muted(),
            )]);
        }
        DetailView::Creature(view) => {
            lines.push(vec![plain(view.name.clone(), theme.title)]);
            if let Some(image) = &view.image {
                lines.push(vec![plain(format!("icon: {image}"), theme.muted())]);
            }
            lines.push(Vec::new());
            lines.push(stat_line(view, theme));

            if let Some(notes) = &view.notes {
                lines.push(Vec::new());
                push_text(&mut lines, notes, theme.text);
            }

            lines.push(Vec::new());
            lines.push(vec![plain("Drops", section)]);
            push_links(&mut lines, &view.drops, theme);

            lines.push(Vec::new());
            lines.push(vec![plain("Locations", section)]);
            if view.locations.is_empty() {
                lines.push(vec![plain("  (none)", theme.muted())]);
            }
            for location in &view.locations {
                lines.push(vec![
                    plain("  • ", theme.muted()),
                    plain(location.clone(), theme.text),
                ]);
            }

            if let Some(episode) = &view.episode {
                lines.push(Vec::new());
                push_text(&mut lines, episode, theme.muted());
            }
        }
        DetailView::Item(view) => {
            lines.push(vec![
                plain("Item: ", theme.muted()),
                plain(view.name.clone(), theme.title),
            ]);
            if let Some(icon) = &view.icon {
                lines.push(vec![plain(format!("icon: {icon}"), theme.muted())]);
            }
            lines.push(Vec::new());
            lines.push(vec![plain("Dropped by", section)]);
            push_links(&mut lines, &view.holders, theme);
        }
        DetailView::NotFound { term } => {
            lines.push(vec![plain(
                format!("No results found for \"{term}\""),
                theme.muted(),
            )]);
        }
        DetailView::LoadFailed { message } => {
            lines.push(vec![plain(message.clone(), theme.error())]);
        }
    }

    lines
}

fn stat_line(view: &CreatureView, theme: &ThemeConfig) -> DetailLine {
    let style = theme.detail_style;
    let value = |n: i64, color: Color| {
        plain(
            n.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )
    };
    vec![
        plain("Level ", theme.muted()),
        value(view.level, style.level),
        plain("   HP ", theme.muted()),
        value(view.hp, style.hp),
        plain("   MP ", theme.muted()),
        value(view.mp, style.mp),
        plain("   EXP ", theme.muted()),
        value(view.exp, style.exp),
    ]
}

fn push_text(lines: &mut Vec<DetailLine>, text: &str, style: Style) {
    for line in text.lines() {
        if line.is_empty() {
            lines.push(Vec::new());
        } else {
            lines.push(vec![plain(line.to_string(), style)]);
        }
    }
}

fn push_links(lines: &mut Vec<DetailLine>, links: &[Link], theme: &ThemeConfig) {
    if links.is_empty() {
        lines.push(vec![plain("  (none)", theme.muted())]);
        return;
    }
    for (idx, link) in links.iter().enumerate() {
        let mut line = vec![
            plain("  • ", theme.muted()),
            DetailSpan {
                span: Span::styled(link.label.clone(), theme.link()),
                link: Some(idx),
            },
        ];
        if let Some(icon) = &link.icon {
            line.push(plain(format!("  {icon}"), theme.muted()));
        }
        lines.push(line);
    }
}

/// Converts detail lines into a ratatui Text, styling the selected and hovered links.
pub fn detail_to_text<'a>(
    lines: &'a [DetailLine],
    theme: &ThemeConfig,
    selected_link: Option<usize>,
    hovered_link: Option<usize>,
) -> Text<'a> {
    Text::from(
        lines
            .iter()
            .map(|line| {
                Line::from(
                    line.iter()
                        .map(|detail_span| {
                            let mut style = detail_span.span.style;
                            if let Some(link) = detail_span.link {
                                if selected_link == Some(link) {
                                    style = theme.link_selected();
                                }
                                if hovered_link == Some(link) {
                                    style = style.add_modifier(Modifier::UNDERLINED);
                                }
                            }
                            Span::styled(detail_span.span.content.as_ref(), style)
                        })
                        .collect::<Vec<_>>(),
                )
            })
            .collect::<Vec<_>>(),
    )
}

/// Wraps detail lines so they fit within the given width.
/// Performs simple character-level wrapping; link indices carry over to every fragment.
pub fn wrap_detail_lines(lines: &[DetailLine], width: u16) -> Vec<DetailLine> {
    let mut wrapped = Vec::new();
    let width = width as usize;
    if width == 0 {
        return Vec::new();
    }

    for line in lines {
        if line.is_empty() {
            wrapped.push(Vec::new());
            continue;
        }

        let mut current_line = Vec::new();
        let mut current_width = 0;

        for detail_span in line {
            let mut content = &detail_span.span.content[..];
            while !content.is_empty() {
                let remaining_width = width.saturating_sub(current_width);
                if remaining_width == 0 {
                    wrapped.push(std::mem::take(&mut current_line));
                    current_width = 0;
                    continue;
                }

                let mut fit_len = 0;
                let mut fit_width = 0;
                for c in content.chars() {
                    let w = UnicodeWidthChar::width(c).unwrap_or(0);
                    if fit_width + w > remaining_width {
                        break;
                    }
                    fit_len += c.len_utf8();
                    fit_width += w;
                }

                if fit_len == 0 {
                    if !current_line.is_empty() {
                        wrapped.push(std::mem::take(&mut current_line));
                        current_width = 0;
                        continue;
                    }
                    // Not even one character fits; force it onto its own line.
                    fit_len = content.chars().next().map_or(content.len(), char::len_utf8);
                    fit_width = width;
                }

                current_line.push(DetailSpan {
                    span: Span::styled(content[..fit_len].to_string(), detail_span.span.style),
                    link: detail_span.link,
                });
                current_width += fit_width;
                content = &content[fit_len..];
            }
        }
        if !current_line.is_empty() {
            wrapped.push(current_line);
        }
    }
    wrapped
}

/// Renders the multisection status bar at the bottom.
fn render_status_bar(f: &mut Frame, app: &mut AppState, area: Rect) {
    let area = Rect::new(
        area.x + 1,
        area.y,
        area.width.saturating_sub(2),
        area.height,
    );

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(area);

    let key_style = app.theme.title;
    let bar_style = app.theme.muted();

    let shortcuts = Line::from(vec![
        Span::styled("Tab ", key_style),
        Span::raw("focus  "),
        Span::styled("? ", key_style),
        Span::raw("help  "),
        Span::styled("q ", key_style),
        Span::raw("quit"),
    ]);
    f.render_widget(
        Paragraph::new(shortcuts)
            .style(bar_style)
            .alignment(Alignment::Left),
        chunks[0],
    );

    let mut spans = vec![Span::raw(format!("Creatures: {}", app.entity_count()))];
    if app.debouncer.is_pending() {
        spans.push(Span::raw(" | searching…"));
    } else if app.suggestions.no_matches() {
        spans.push(Span::raw(" | no matches"));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans))
            .style(bar_style)
            .alignment(Alignment::Center),
        chunks[1],
    );

    f.render_widget(
        Paragraph::new(Line::from(format!("{} {}", app.dataset_label, app.app_version)))
            .style(bar_style)
            .alignment(Alignment::Right),
        chunks[2],
    );
}

fn render_help_overlay(f: &mut Frame, app: &mut AppState) {
    let area = f.area();
    let popup_width = area.width.min(64).saturating_sub(4);
    let popup_height = 24.min(area.height.saturating_sub(2));
    if popup_width == 0 || popup_height == 0 {
        return;
    }
    let popup_rect = Rect::new(
        area.x + (area.width.saturating_sub(popup_width)) / 2,
        area.y + (area.height.saturating_sub(popup_height)) / 2,
        popup_width,
        popup_height,
    );

    f.render_widget(Clear, popup_rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_selected)
        .style(app.theme.text)
        .title(" Help ")
        .border_type(ratatui::widgets::BorderType::Double)
        .title_style(app.theme.title);

    let inner_area = block.inner(popup_rect);
    f.render_widget(block, popup_rect);

    let key_style = app.theme.title;
    let desc_style = app.theme.text;
    let header_style = key_style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

    let format_section = |title: &str, items: Vec<(&str, &str)>| -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(Span::styled(title.to_string(), header_style))];
        for (key, desc) in items {
            lines.push(Line::from(vec![
                Span::styled(format!("{: <16}", key), key_style),
                Span::styled(desc.to_string(), desc_style),
            ]));
        }
        lines
    };

    let mut lines = format_section(
        "Search",
        vec![
            ("Up | Down", "move through suggestions"),
            ("Enter", "open highlighted (or first)"),
            ("Esc", "close suggestions"),
            ("Ctrl+U", "clear input"),
            ("Ctrl+W", "delete word"),
            ("Ctrl+A | E", "start | end of line"),
        ],
    );
    lines.push(Line::from(""));
    lines.extend(format_section(
        "Details",
        vec![
            ("Up | Down", "select a link"),
            ("Enter", "open selected link"),
            ("PgUp | PgDn", "scroll"),
            ("Home | End", "top | bottom"),
            ("Mouse Click", "open a link"),
        ],
    ));
    lines.push(Line::from(""));
    lines.extend(format_section(
        "General",
        vec![("Tab", "switch pane"), ("?", "toggle help"), ("q", "quit")],
    ));

    let content = Rect::new(
        inner_area.x + 1,
        inner_area.y + 1,
        inner_area.width.saturating_sub(2),
        inner_area.height.saturating_sub(2),
    );
    f.render_widget(Paragraph::new(lines), content);
}

fn render_progress_modal(f: &mut Frame, app: &mut AppState) {
    let area = f.area();
    let stages_len = app.progress_stages.len().max(1) as u16;
    let popup_width = area.width.min(68).saturating_sub(4);
    let popup_height = area.height.saturating_sub(2).min(stages_len + 4);
    if popup_width == 0 || popup_height == 0 {
        return;
    }

    let popup_rect = Rect::new(
        area.x + (area.width.saturating_sub(popup_width)) / 2,
        area.y + (area.height.saturating_sub(popup_height)) / 2,
        popup_width,
        popup_height,
    );

    f.render_widget(Clear, popup_rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_selected)
        .style(app.theme.text)
        .title(format!(" {} ", app.progress_title))
        .title_style(app.theme.title);

    let inner_area = block.inner(popup_rect);
    f.render_widget(block, popup_rect);

    let content_area = Rect::new(
        inner_area.x + 1,
        inner_area.y + 1,
        inner_area.width.saturating_sub(2),
        inner_area.height.saturating_sub(2),
    );
    if content_area.width == 0 || content_area.height == 0 {
        return;
    }

    let min_gauge_width = 10u16;
    let percent_width = 4u16;
    let mut label_width = app
        .progress_stages
        .iter()
        .map(|stage| stage.label.width())
        .max()
        .unwrap_or(0) as u16;
    if content_area.width <= min_gauge_width {
        label_width = 0;
    } else {
        let max_label = content_area
            .width
            .saturating_sub(min_gauge_width + percent_width + 2);
        label_width = label_width.min(max_label);
    }
    let gap = if label_width > 0 { 1 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1); stages_len as usize])
        .split(content_area);

    for (idx, row) in chunks.iter().enumerate() {
        let stage = app
            .progress_stages
            .get(idx)
            .cloned()
            .unwrap_or_else(|| ProgressStage {
                label: "Working".to_string(),
                ratio: 0.0,
                done: false,
            });
        let ratio = stage.ratio.clamp(0.0, 1.0);
        let row_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(label_width),
                Constraint::Length(gap),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(percent_width),
            ])
            .split(*row);

        if label_width > 0 {
            f.render_widget(
                Paragraph::new(stage.label.clone()).style(app.theme.text),
                row_chunks[0],
            );
        }

        let gauge = LineGauge::default()
            .filled_style(app.theme.title)
            .unfilled_style(app.theme.border)
            .ratio(ratio)
            .label("");
        f.render_widget(gauge, row_chunks[2]);

        f.render_widget(
            Paragraph::new(format!("{:.0}%", ratio * 100.0))
                .style(app.theme.text)
                .alignment(Alignment::Right),
            row_chunks[4],
        );
    }
}

/// Given a pointer at (column, row), returns the index of the link under it.
/// Returns None outside the detail content or over plain text.
pub fn hit_test_link(app: &AppState, column: u16, row: u16) -> Option<usize> {
    let area = app.details_content_area?;
    let horizontal_padding = 1;

    // Strictly check bounds, excluding the horizontal gutters
    let content_x_start = area.x + horizontal_padding;
    let content_x_end = (area.x + area.width).saturating_sub(horizontal_padding);
    if column < content_x_start
        || column >= content_x_end
        || row < area.y
        || row >= area.y + area.height
    {
        return None;
    }

    let rel_x = column - content_x_start;
    let rel_y = row - area.y;
    let content_y = (rel_y + app.details_scroll_state.offset().y) as usize;

    let line = app.details_lines.get(content_y)?;
    let mut current_x = 0;
    for detail_span in line {
        let span_width = detail_span.span.width() as u16;
        if rel_x >= current_x && rel_x < current_x + span_width {
            return detail_span.link;
        }
        current_x += span_width;
    }
    None
}

/// Returns the suggestion index drawn at (column, row), if any.
pub fn hit_test_suggestion(app: &AppState, column: u16, row: u16) -> Option<usize> {
    let area = app.suggestions_content_area?;
    if !area.contains((column, row).into()) {
        return None;
    }
    let idx = app.suggestion_list_state.offset() + (row - area.y) as usize;
    (idx < app.suggestions.items().len()).then_some(idx)
}

/// Calculates the terminal cell width offset for a given character index.
/// Uses `unicode-width` to correctly handle multibyte and multi-cell characters.
pub fn search_cursor_offset(text: &str, cursor: usize) -> u16 {
    text.chars()
        .take(cursor)
        .filter_map(|c| c.width())
        .map(|w| w as u16)
        .sum::<u16>()
}

/// Calculates horizontal viewport offset so the cursor stays visible in the input.
pub fn search_horizontal_scroll(text: &str, cursor: usize, visible_width: u16) -> u16 {
    if visible_width == 0 {
        return 0;
    }

    let cursor_offset = search_cursor_offset(text, cursor);
    cursor_offset.saturating_sub(visible_width.saturating_sub(1))
}

pub fn search_cursor_for_column(text: &str, target_column: u16) -> usize {
    let mut width = 0u16;
    for (idx, ch) in text.chars().enumerate() {
        let char_width = ch.width().unwrap_or(0) as u16;
        if width + char_width > target_column {
            return idx;
        }
        width += char_width;
    }
    text.chars().count()
}
