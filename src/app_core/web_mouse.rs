//! Pointer coordinate translation for the browser runtime.
//!
//! The DOM reports pixels; the reducer works in terminal cells. The mapping is
//! kept here, free of `web_sys`, so it can be tested natively.

/// Pixel geometry of the rendered cell grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Size of one cell in pixels, when it could be measured.
    pub cell: Option<(f64, f64)>,
    /// Grid size in cells, used to clamp and as a proportional fallback.
    pub cells: Option<(u16, u16)>,
}

impl GridGeometry {
    fn contains(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && y >= 0.0 && x < self.width && y < self.height
    }
}

/// Maps a pointer position to `(column, row)`, or `None` outside the grid or
/// when neither cell size nor grid size is known.
pub fn pixel_to_cell(x: f64, y: f64, grid: GridGeometry) -> Option<(u16, u16)> {
    if grid.width <= 0.0 || grid.height <= 0.0 {
        return None;
    }
    let (local_x, local_y) = (x - grid.left, y - grid.top);
    if !grid.contains(local_x, local_y) {
        return None;
    }

    let clamp = |col: u16, row: u16| match grid.cells {
        Some((cols, rows)) if cols > 0 && rows > 0 => {
            (col.min(cols - 1), row.min(rows - 1))
        }
        _ => (col, row),
    };

    match (grid.cell, grid.cells) {
        (Some((cw, ch)), _) if cw > 0.0 && ch > 0.0 => {
            Some(clamp((local_x / cw) as u16, (local_y / ch) as u16))
        }
        (_, Some((cols, rows))) if cols > 0 && rows > 0 => {
            let col = (local_x / grid.width * f64::from(cols)) as u16;
            let row = (local_y / grid.height * f64::from(rows)) as u16;
            Some(clamp(col, row))
        }
        _ => None,
    }
}
