#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, unused_imports, unused_variables)
)]

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("mobdex-web must be built for wasm32-unknown-unknown");
}

// ---------------------------------------------------------------------------
// Web target (wasm32): everything below is only compiled for the browser.
// ---------------------------------------------------------------------------

#[cfg(target_arch = "wasm32")]
use anyhow::Result;
#[cfg(target_arch = "wasm32")]
use js_sys::Promise;
#[cfg(target_arch = "wasm32")]
use mobdex::app_core::indexing::{indexing_ratio, normalize_records};
#[cfg(target_arch = "wasm32")]
use mobdex::app_core::input::{AppKeyCode, AppKeyEvent, AppMouseEvent, AppMouseKind};
#[cfg(target_arch = "wasm32")]
use mobdex::app_core::reducer;
#[cfg(target_arch = "wasm32")]
use mobdex::app_core::state::AppState;
#[cfg(target_arch = "wasm32")]
use mobdex::app_core::web_mouse::{GridGeometry, pixel_to_cell};
#[cfg(target_arch = "wasm32")]
use mobdex::assets::AssetRoots;
#[cfg(target_arch = "wasm32")]
use mobdex::runtime::web::data;
#[cfg(target_arch = "wasm32")]
use mobdex::search_index::{LookupIndex, LookupIndexBuilder};
#[cfg(target_arch = "wasm32")]
use mobdex::{theme, ui};
#[cfg(target_arch = "wasm32")]
use ratatui::Terminal;
#[cfg(target_arch = "wasm32")]
use ratzilla::web_sys::wasm_bindgen::{JsCast, JsValue};
#[cfg(target_arch = "wasm32")]
use ratzilla::{
    DomBackend, WebRenderer,
    event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind},
};
#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use std::str::FromStr;
#[cfg(target_arch = "wasm32")]
use std::time::Duration;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen_futures::{JsFuture, spawn_local};

#[cfg(target_arch = "wasm32")]
const DEBOUNCE: Duration = Duration::from_millis(150);

// ---------------------------------------------------------------------------
// Ratzilla → shared input type adapters
// ---------------------------------------------------------------------------

#[cfg(target_arch = "wasm32")]
fn ratzilla_to_app_key_event(key: KeyEvent) -> Option<AppKeyEvent> {
    let key_code = match key.code {
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
        // Shift-Tab arrives as Tab with the shift modifier.
        KeyCode::Tab if key.shift => AppKeyCode::BackTab,
        KeyCode::Tab => AppKeyCode::Tab,
        _ => return None,
    };
    Some(AppKeyEvent {
        code: key_code,
        ctrl: key.ctrl,
        alt: key.alt,
        shift: key.shift,
        is_release: false,
    })
}

#[cfg(target_arch = "wasm32")]
fn ratzilla_to_app_mouse_event(column: u16, row: u16, mouse: &MouseEvent) -> AppMouseEvent {
    // ratzilla 0.3 does not deliver wheel events through on_mouse_event.
    let kind = match mouse.event {
        MouseEventKind::Pressed if mouse.button == MouseButton::Left => AppMouseKind::LeftDown,
        _ => AppMouseKind::Move,
    };
    AppMouseEvent::new(kind, column, row)
}

// ---------------------------------------------------------------------------
// Web-specific helpers
// ---------------------------------------------------------------------------

#[cfg(target_arch = "wasm32")]
async fn yield_to_browser() {
    let promise = Promise::new(&mut |resolve, _reject| {
        if let Some(window) = ratzilla::web_sys::window() {
            let _ = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(resolve.unchecked_ref(), 0);
        } else {
            let _ = resolve.call0(&JsValue::NULL);
        }
    });
    let _ = JsFuture::from(promise).await;
}

#[cfg(target_arch = "wasm32")]
fn now_ms() -> f64 {
    if let Some(window) = ratzilla::web_sys::window()
        && let Some(performance) = window.performance()
    {
        return performance.now();
    }
    js_sys::Date::now()
}

#[cfg(target_arch = "wasm32")]
fn app_terminal_size(app: &AppState) -> Option<(u16, u16)> {
    let mut max_right = 0u16;
    let mut max_bottom = 0u16;

    for area in [app.search_area, app.details_area, app.suggestions_area]
        .into_iter()
        .flatten()
    {
        max_right = max_right.max(area.x.saturating_add(area.width));
        max_bottom = max_bottom.max(area.y.saturating_add(area.height));
    }

    // The status bar sits below the details pane.
    let max_bottom = max_bottom.saturating_add(1);
    if max_right == 0 || max_bottom <= 1 {
        None
    } else {
        Some((max_right, max_bottom))
    }
}

/// Converts a ratzilla pointer position to terminal cell coordinates.
#[cfg(target_arch = "wasm32")]
fn mouse_to_cell_position(app: &AppState, mouse: &MouseEvent) -> Option<(u16, u16)> {
    let window = ratzilla::web_sys::window()?;
    let document = window.document()?;
    let grid: ratzilla::web_sys::HtmlElement = document
        .get_element_by_id("grid_ratzilla_grid")?
        .dyn_into()
        .ok()?;
    let rect = grid.get_bounding_client_rect();

    let mut cell_width = 0.0;
    let mut cell_height = 0.0;
    if let Some(first_row) = grid.first_element_child()
        && let Ok(first_row) = first_row.dyn_into::<ratzilla::web_sys::HtmlElement>()
    {
        cell_height = first_row.get_bounding_client_rect().height();
        if let Some(first_cell) = first_row.first_element_child()
            && let Ok(first_cell) = first_cell.dyn_into::<ratzilla::web_sys::HtmlElement>()
        {
            cell_width = first_cell.get_bounding_client_rect().width();
        }
    }

    let cell = (cell_width > 0.0 && cell_height > 0.0).then_some((cell_width, cell_height));

    pixel_to_cell(
        mouse.x as f64,
        mouse.y as f64,
        GridGeometry {
            left: rect.left(),
            top: rect.top(),
            width: rect.width(),
            height: rect.height(),
            cell,
            cells: app_terminal_size(app),
        },
    )
}

// ---------------------------------------------------------------------------
// Web event handlers (thin adapters over shared reducer)
// ---------------------------------------------------------------------------

#[cfg(target_arch = "wasm32")]
fn handle_key_event(app: &mut AppState, key_event: KeyEvent) {
    if let Some(event) = ratzilla_to_app_key_event(key_event) {
        reducer::handle_key_event(app, event);
    }
}

#[cfg(target_arch = "wasm32")]
fn handle_mouse_event(app: &mut AppState, mouse: MouseEvent) -> bool {
    let Some((column, row)) = mouse_to_cell_position(app, &mouse) else {
        if matches!(mouse.event, MouseEventKind::Moved) && app.hovered_link.is_some() {
            app.hovered_link = None;
            return true;
        }
        return false;
    };
    let app_event = ratzilla_to_app_mouse_event(column, row, &mouse);
    reducer::handle_mouse_event(app, app_event)
}

// ---------------------------------------------------------------------------
// Async indexing (yields to the browser between batches)
// ---------------------------------------------------------------------------

#[cfg(target_arch = "wasm32")]
async fn build_index_with_progress<F>(
    records: Vec<serde_json::Value>,
    mut on_progress: F,
) -> (LookupIndex, f64)
where
    F: FnMut(f64),
{
    let start_ms = now_ms();

    let entities = normalize_records(&records, &mut on_progress);
    drop(records);
    yield_to_browser().await;

    let total = entities.len();
    let mut builder = LookupIndexBuilder::with_capacity(total);
    for (idx, entity) in entities.into_iter().enumerate() {
        builder.push(entity);

        if idx % 250 == 0 || idx + 1 == total {
            on_progress(indexing_ratio(idx + 1, total));
        }
        if idx % 1000 == 0 || idx + 1 == total {
            yield_to_browser().await;
        }
    }
    let index = builder.finish();

    log::info!(
        "Loaded {} creatures, {} drop entries",
        index.entity_count(),
        index.drop_key_count()
    );
    let index_time_ms = (now_ms() - start_ms).max(0.0);
    (index, index_time_ms)
}

// ---------------------------------------------------------------------------
// Dataset loading
// ---------------------------------------------------------------------------

#[cfg(target_arch = "wasm32")]
fn start_load(app_state: Rc<RefCell<AppState>>) {
    app_state
        .borrow_mut()
        .start_progress("Loading data", &["Downloading", "Indexing"]);

    spawn_local(async move {
        let records = {
            app_state.borrow_mut().update_stage("Downloading", 0.05);
            data::fetch_dataset().await
        };

        let records = match records {
            Ok(records) => records,
            Err(err) => {
                let mut app = app_state.borrow_mut();
                app.clear_progress();
                app.fail_load(&err);
                return;
            }
        };

        {
            let mut app = app_state.borrow_mut();
            app.finish_stage("Downloading");
            app.update_stage("Indexing", 0.01);
        }

        let (index, index_time_ms) = build_index_with_progress(records, |ratio| {
            app_state.borrow_mut().update_stage("Indexing", ratio);
        })
        .await;

        let mut app = app_state.borrow_mut();
        app.apply_dataset(index, index_time_ms);
        app.finish_stage("Indexing");
        app.clear_progress();
    });
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[cfg(target_arch = "wasm32")]
fn main() -> Result<()> {
    console_error_panic_hook::set_once();

    let app_version = format!("v{}", env!("CARGO_PKG_VERSION"));
    let theme = theme::Theme::from_str("dracula")
        .map_err(anyhow::Error::msg)?
        .config();

    let app = Rc::new(RefCell::new(AppState::new(
        theme,
        AssetRoots::default(),
        DEBOUNCE,
        app_version,
        data::DATASET_PATH.to_string(),
    )));

    start_load(app.clone());

    let backend = DomBackend::new_by_id("grid").map_err(|err| anyhow::anyhow!(err.to_string()))?;
    let terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let event_state = app.clone();
        move |key_event| {
            let mut state = event_state.borrow_mut();
            state.tick(Duration::from_secs_f64(now_ms().max(0.0) / 1000.0));
            handle_key_event(&mut state, key_event);
        }
    });

    terminal.on_mouse_event({
        let event_state = app.clone();
        move |mouse_event| {
            let mut state = event_state.borrow_mut();
            let _ = handle_mouse_event(&mut state, mouse_event);
        }
    });

    // draw_web runs every animation frame, which is what fires the debounce.
    terminal.draw_web(move |f| {
        let mut state = app.borrow_mut();
        state.tick(Duration::from_secs_f64(now_ms().max(0.0) / 1000.0));
        ui::ui(f, &mut state);
    });

    Ok(())
}
