use crate::foundation::core::{Rect, overlaps};

/// Vertical delta that centers `content` inside `region`.
///
/// Content taller than the region is top-aligned instead.
pub fn center_vertically(content: Rect, region: Rect) -> f64 {
    let rem = (region.height() - content.height()).max(0.0);
    region.y0 + rem * 0.5 - content.y0
}

/// Narrow `text_box` so it ends `spacing` before `neighbor` starts.
///
/// Used for single-line fields that share a row with an icon (card name and
/// mana cost, type line and expansion symbol). A neighbor that does not
/// overlap the box, even after shifting it by `spacing`, leaves it unchanged.
pub fn width_before_neighbor(text_box: Rect, neighbor: Rect, spacing: f64) -> Rect {
    let padded = Rect::new(
        neighbor.x0 - spacing,
        neighbor.y0,
        neighbor.x1,
        neighbor.y1,
    );
    if !overlaps(text_box, padded) {
        return text_box;
    }
    let right = padded.x0.clamp(text_box.x0, text_box.x1);
    Rect::new(text_box.x0, text_box.y0, right, text_box.y1)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/align.rs"]
mod tests;
