use crate::geometry::{Point, Rect};

pub const DEFAULT_HANDLE_SIZE: f64 = 70.0;

/// Interaction zone of a rectangle hit by a touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    None,
}

impl Handle {
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

/// Classifies `point` against the handle zones of `rect`.
///
/// Corner zones span `handle_size` on every side of each corner and are tested
/// before the edge zones, which span `handle_size / 2` around each edge
/// midpoint. Points outside every zone yield [`Handle::None`].
pub fn locate(point: Point, rect: Rect, handle_size: f64) -> Handle {
    let half = handle_size / 2.0;
    let center_x = (rect.x0 + rect.x1) / 2.0;
    let center_y = (rect.y0 + rect.y1) / 2.0;

    let corner = |x: f64, y: f64| {
        Rect::new(
            x - handle_size,
            y - handle_size,
            x + handle_size,
            y + handle_size,
        )
    };
    let horizontal_edge = |y: f64| Rect::new(center_x - half, y - half, center_x + half, y + half);
    let vertical_edge = |x: f64| Rect::new(x - half, center_y - half, x + half, center_y + half);

    let zones = [
        (corner(rect.x0, rect.y0), Handle::TopLeft),
        (corner(rect.x1, rect.y0), Handle::TopRight),
        (corner(rect.x0, rect.y1), Handle::BottomLeft),
        (corner(rect.x1, rect.y1), Handle::BottomRight),
        (horizontal_edge(rect.y0), Handle::Top),
        (horizontal_edge(rect.y1), Handle::Bottom),
        (vertical_edge(rect.x0), Handle::Left),
        (vertical_edge(rect.x1), Handle::Right),
    ];

    zones
        .into_iter()
        .find(|(zone, _)| zone_contains(*zone, point))
        .map_or(Handle::None, |(_, handle)| handle)
}

/// Half-open containment that never matches an empty zone.
fn zone_contains(zone: Rect, point: Point) -> bool {
    zone.x0 < zone.x1
        && zone.y0 < zone.y1
        && point.x >= zone.x0
        && point.x < zone.x1
        && point.y >= zone.y0
        && point.y < zone.y1
}
