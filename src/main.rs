//! # mobdex
//!
//! A terminal user interface (TUI) for looking up creatures and the items they drop.

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use mobdex::app_core::indexing::{build_lookup_index, progress_ratio};
use mobdex::app_core::input::{AppKeyCode, AppKeyEvent, AppMouseEvent, AppMouseKind};
use mobdex::app_core::reducer;
use mobdex::app_core::resolver::{self, DetailView};
use mobdex::app_core::state::AppState;
use mobdex::app_core::suggest::build_suggestions;
use mobdex::assets::AssetRoots;
use mobdex::error::LoadError;
use mobdex::matcher::{SuggestionKind, normalize_term};
use mobdex::runtime::native::data::{self, DatasetSource, DownloadProgress};
use mobdex::runtime::native::logging;
use mobdex::search_index::LookupIndex;
use mobdex::{theme, ui};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde_json::Value;

use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Poll timeout while no search is pending.
const IDLE_POLL: Duration = Duration::from_millis(250);
/// Minimum interval between progress redraws.
const PROGRESS_REDRAW: Duration = Duration::from_millis(120);

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "mobdex: a terminal lookup tool for creature stats and item drops.\n\
                  Type a creature or item name, pick a suggestion, and follow drop links between pages."
)]
struct Args {
    /// Path to the monsters.json file
    #[arg(short, long)]
    file: Option<String>,

    /// Download monsters.json from this URL instead of reading a file
    #[arg(short, long, conflicts_with = "file")]
    url: Option<String>,

    /// Directory holding mob_icons/ and item_icons/; missing icons are hidden
    #[arg(short, long)]
    assets: Option<String>,

    /// UI theme (dracula, solarized, gruvbox, everforest_light)
    #[arg(short, long)]
    theme: Option<String>,

    /// Delay between the last keystroke and the search, in milliseconds
    #[arg(long, default_value_t = 150)]
    debounce_ms: u64,

    /// Show all paths used by the application (data, log file)
    #[arg(long)]
    config: bool,

    /// Print suggestions (and the detail page, if the name resolves) and exit
    #[arg(short, long)]
    query: Option<String>,
}

// ---------------------------------------------------------------------------
// Crossterm → shared-reducer adapters
// ---------------------------------------------------------------------------

fn crossterm_to_app_key_event(
    code: KeyCode,
    modifiers: KeyModifiers,
    kind: KeyEventKind,
) -> Option<AppKeyEvent> {
    if matches!(kind, KeyEventKind::Release) {
        return None;
    }

    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let alt = modifiers.contains(KeyModifiers::ALT);
    let shift = modifiers.contains(KeyModifiers::SHIFT);
    let super_key = modifiers.contains(KeyModifiers::SUPER);

    let key_code = match code {
        KeyCode::Char(c) => AppKeyCode::Char(c),
        KeyCode::Backspace => AppKeyCode::Backspace,
        KeyCode::Delete => AppKeyCode::Delete,
        KeyCode::Enter => AppKeyCode::Enter,
        KeyCode::Esc => AppKeyCode::Esc,
        KeyCode::Up => AppKeyCode::Up,
        KeyCode::Down => AppKeyCode::Down,
        KeyCode::Left => AppKeyCode::Left,
        KeyCode::Right => AppKeyCode::Right,
        KeyCode::Home => AppKeyCode::Home,
        KeyCode::End => AppKeyCode::End,
        KeyCode::PageUp => AppKeyCode::PageUp,
        KeyCode::PageDown => AppKeyCode::PageDown,
        KeyCode::Tab => AppKeyCode::Tab,
        KeyCode::BackTab => AppKeyCode::BackTab,
        _ => return None,
    };

    Some(AppKeyEvent {
        code: key_code,
        ctrl: ctrl || super_key,
        alt,
        shift,
        is_release: false,
    })
}

fn crossterm_to_app_mouse_event(mouse: &event::MouseEvent) -> Option<AppMouseEvent> {
    let kind = match mouse.kind {
        MouseEventKind::Down(event::MouseButton::Left) => AppMouseKind::LeftDown,
        MouseEventKind::ScrollUp => AppMouseKind::ScrollUp,
        MouseEventKind::ScrollDown => AppMouseKind::ScrollDown,
        MouseEventKind::Moved | MouseEventKind::Drag(_) => AppMouseKind::Move,
        _ => return None,
    };
    Some(AppMouseEvent::new(kind, mouse.column, mouse.row))
}

fn handle_event(app: &mut AppState, event: Event) -> bool {
    match event {
        Event::Key(key) => {
            let Some(event) = crossterm_to_app_key_event(key.code, key.modifiers, key.kind) else {
                return false;
            };
            reducer::handle_key_event(app, event);
            true
        }
        Event::Mouse(mouse) => crossterm_to_app_mouse_event(&mouse)
            .is_some_and(|event| reducer::handle_mouse_event(app, event)),
        Event::Resize(_, _) => true,
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let args = Args::parse();
    let app_version = format!("v{}", env!("CARGO_PKG_VERSION"));

    // Theme selection
    let theme_name = args.theme.as_deref().unwrap_or("dracula");
    let theme = theme::Theme::from_str(theme_name)
        .map_err(anyhow::Error::msg)?
        .config();

    let data_dir = data::get_data_dir()?;
    let log_path = data_dir.join(logging::LOG_FILE_NAME);

    if args.config {
        println!("App Paths:");
        println!("  Data:    {}", data_dir.display());
        println!("  Log:     {}", log_path.display());
        return Ok(());
    }

    if let Err(err) = logging::init(&log_path) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let source = DatasetSource::from_args(args.file.as_deref(), args.url.as_deref());
    let assets = AssetRoots::new(args.assets.as_deref().map(PathBuf::from));

    if let Some(query) = &args.query {
        let records = load_records(&source, |_| {})
            .with_context(|| format!("failed to load {}", source.label()))?;
        let index = build_lookup_index(&records, |_| {});
        let mut stdout = io::stdout().lock();
        write_query_report(&mut stdout, &index, &assets, query)?;
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = AppState::new(
        theme,
        assets,
        Duration::from_millis(args.debounce_ms),
        app_version,
        source.label(),
    );

    let res = (|| -> Result<()> {
        load_dataset_with_ui(&mut terminal, &mut app, &source)?;
        run_app(&mut terminal, &mut app)
    })();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let start = Instant::now();
    app.tick(start.elapsed());
    terminal.draw(|f| ui::ui(f, app))?;

    loop {
        if app.should_quit {
            break;
        }

        let timeout = app
            .debouncer
            .time_until_due(start.elapsed())
            .unwrap_or(IDLE_POLL);

        let mut redraw = false;
        if event::poll(timeout)? {
            let event = event::read()?;
            redraw |= app.tick(start.elapsed());
            redraw |= handle_event(app, event);
        } else {
            redraw |= app.tick(start.elapsed());
        }

        if redraw {
            terminal.draw(|f| ui::ui(f, app))?;
        }
    }
    Ok(())
}

fn load_records<F>(source: &DatasetSource, on_progress: F) -> Result<Vec<Value>, LoadError>
where
    F: FnMut(DownloadProgress),
{
    match source {
        DatasetSource::File(path) => data::load_dataset_file(path),
        DatasetSource::Url(url) => data::fetch_dataset_with_progress(url, on_progress),
    }
}

/// Loads and indexes the dataset behind a progress modal. A load failure is
/// shown in the detail pane instead of aborting.
fn load_dataset_with_ui<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    source: &DatasetSource,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let first_stage = match source {
        DatasetSource::File(_) => "Reading",
        DatasetSource::Url(_) => "Downloading",
    };
    app.start_progress("Loading data", &[first_stage, "Indexing"]);
    terminal.draw(|f| ui::ui(f, app))?;

    let mut last_ratio = -1.0;
    let mut last_draw = Instant::now();
    let mut draw_error: Option<anyhow::Error> = None;
    let records = load_records(source, |progress| {
        let ratio = progress_ratio(progress.downloaded, progress.total);
        let elapsed_ok = last_draw.elapsed() >= PROGRESS_REDRAW;
        let ratio_ok = (ratio - last_ratio).abs() >= 0.01;
        let should_draw = if progress.total.is_some() {
            ratio_ok || elapsed_ok
        } else {
            elapsed_ok
        };
        if !should_draw || draw_error.is_some() {
            return;
        }
        app.update_stage("Downloading", ratio);
        if let Err(err) = terminal.draw(|f| ui::ui(f, app)) {
            draw_error = Some(anyhow::Error::from(err));
        } else {
            last_draw = Instant::now();
            last_ratio = ratio;
        }
    });

    if let Some(err) = draw_error {
        return Err(err);
    }

    let records = match records {
        Ok(records) => records,
        Err(err) => {
            app.clear_progress();
            app.fail_load(&err);
            return Ok(());
        }
    };

    app.finish_stage(first_stage);
    terminal.draw(|f| ui::ui(f, app))?;

    let (index, index_time_ms) = build_index_with_progress(terminal, app, &records)?;
    app.apply_dataset(index, index_time_ms);

    app.finish_stage("Indexing");
    terminal.draw(|f| ui::ui(f, app))?;
    app.clear_progress();

    Ok(())
}

fn build_index_with_progress<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    records: &[Value],
) -> Result<(LookupIndex, f64)>
where
    B::Error: Send + Sync + 'static,
{
    let start = Instant::now();
    let mut last_draw = Instant::now();
    let mut draw_error: Option<anyhow::Error> = None;

    let index = build_lookup_index(records, |ratio| {
        if draw_error.is_some() {
            return;
        }
        app.update_stage("Indexing", ratio);
        if last_draw.elapsed() >= PROGRESS_REDRAW || ratio >= 1.0 {
            if let Err(err) = terminal.draw(|f| ui::ui(f, app)) {
                draw_error = Some(anyhow::Error::from(err));
            } else {
                last_draw = Instant::now();
            }
        }
    });

    if let Some(err) = draw_error {
        return Err(err);
    }

    let index_time_ms = start.elapsed().as_secs_f64() * 1000.0;
    Ok((index, index_time_ms))
}

/// Writes the non-interactive report for `--query`.
fn write_query_report<W: Write>(
    out: &mut W,
    index: &LookupIndex,
    assets: &AssetRoots,
    raw: &str,
) -> io::Result<()> {
    let term = normalize_term(raw);
    let suggestions = build_suggestions(index, &term);

    if suggestions.is_empty() {
        writeln!(out, "No results found for \"{}\"", raw.trim())?;
        return Ok(());
    }

    writeln!(out, "Suggestions for \"{}\":", raw.trim())?;
    for suggestion in &suggestions {
        let kind = match suggestion.kind {
            SuggestionKind::Creature => "creature",
            SuggestionKind::Item => "item",
        };
        writeln!(out, "  {} ({kind})", suggestion.name)?;
    }

    let detail = resolver::resolve(index, raw.trim(), assets);
    if !matches!(detail, DetailView::NotFound { .. }) {
        writeln!(out)?;
        write!(out, "{detail}")?;
    }
    Ok(())
}
