use crate::geometry::{Line, Point, Rect};

pub const DEFAULT_HANDLE_LENGTH: f64 = 70.0;
pub const DEFAULT_MAX_GRID_LINES: u32 = 5;
pub const DEFAULT_MIN_GRID_SIZE: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStyle {
    pub max_lines: u32,
    pub min_cell: u32,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            max_lines: DEFAULT_MAX_GRID_LINES,
            min_cell: DEFAULT_MIN_GRID_SIZE,
        }
    }
}

/// Decorations the host draws over the bitmap for the current frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Overlay {
    pub frame: Option<Rect>,
    pub handles: Vec<Line>,
    pub grid: Vec<Line>,
}

impl Overlay {
    pub fn is_empty(&self) -> bool {
        self.frame.is_none() && self.handles.is_empty() && self.grid.is_empty()
    }
}

/// L-shaped strokes at the four corners followed by a centered stroke on each edge.
pub fn handle_segments(rect: Rect, handle_length: f64) -> Vec<Line> {
    let Rect { x0, y0, x1, y1 } = rect;
    let half = handle_length / 2.0;
    let center_x = (x0 + x1) / 2.0;
    let center_y = (y0 + y1) / 2.0;
    let segment =
        |ax: f64, ay: f64, bx: f64, by: f64| Line::new(Point::new(ax, ay), Point::new(bx, by));

    vec![
        segment(x0, y0, x0, y0 + handle_length),
        segment(x0, y0, x0 + handle_length, y0),
        segment(x1, y0, x1, y0 + handle_length),
        segment(x1, y0, x1 - handle_length, y0),
        segment(x0, y1, x0, y1 - handle_length),
        segment(x0, y1, x0 + handle_length, y1),
        segment(x1, y1, x1, y1 - handle_length),
        segment(x1, y1, x1 - handle_length, y1),
        segment(center_x - half, y0, center_x + half, y0),
        segment(center_x - half, y1, center_x + half, y1),
        segment(x0, center_y - half, x0, center_y + half),
        segment(x1, center_y - half, x1, center_y + half),
    ]
}

/// Interior grid lines splitting `rect` into at most `style.max_lines` cells per axis.
pub fn grid_segments(rect: Rect, style: GridStyle) -> Vec<Line> {
    let step_x = grid_step(rect.width(), style);
    let step_y = grid_step(rect.height(), style);
    let vertical = (1..=interior_count(rect.width(), step_x)).map(|i| {
        let x = rect.x0 + i as f64 * step_x;
        Line::new(Point::new(x, rect.y0), Point::new(x, rect.y1))
    });
    let horizontal = (1..=interior_count(rect.height(), step_y)).map(|i| {
        let y = rect.y0 + i as f64 * step_y;
        Line::new(Point::new(rect.x0, y), Point::new(rect.x1, y))
    });
    vertical.chain(horizontal).collect()
}

fn grid_step(extent: f64, style: GridStyle) -> f64 {
    let ideal = (extent / f64::from(style.max_lines.max(1))).trunc();
    ideal.max(f64::from(style.min_cell.max(1)))
}

/// Multiples of `step` strictly inside `(0, extent)`.
fn interior_count(extent: f64, step: f64) -> usize {
    if !extent.is_finite() {
        return 0;
    }
    ((extent / step).ceil() as usize).saturating_sub(1)
}
