use wordpeek_config::popup::PopupConfig;
use wordpeek_types::{Point, Size};

/// Top-left corner for a popup of `size` shown next to `anchor`.
///
/// Prefers below-right of the anchor, flips to the other side on each axis
/// that would overflow the viewport (minus the edge margin), then clamps to
/// the minimum edge distance.
pub fn place(anchor: Point, size: Size, viewport: Size, config: &PopupConfig) -> Point {
    let mut left = anchor.x + config.offset;
    let mut top = anchor.y + config.offset;

    if left + size.width > viewport.width - config.edge_margin {
        left = anchor.x - size.width - config.offset;
    }
    if top + size.height > viewport.height - config.edge_margin {
        top = anchor.y - size.height - config.offset;
    }

    Point::new(left.max(config.min_edge), top.max(config.min_edge))
}
