use crate::foundation::error::{TypesetError, TypesetResult};

pub use kurbo::{Point, Rect, Size};

/// Returns `true` when the two rectangles share a region of positive area.
///
/// Rectangles that merely touch along an edge do not overlap.
pub fn overlaps(a: Rect, b: Rect) -> bool {
    let a = a.abs();
    let b = b.abs();
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}

/// Translate a rectangle vertically.
pub fn translate_y(r: Rect, dy: f64) -> Rect {
    Rect::new(r.x0, r.y0 + dy, r.x1, r.y1 + dy)
}

/// Rectangle with the same horizontal extent and top edge moved to `top`.
pub fn with_top(r: Rect, top: f64) -> Rect {
    translate_y(r, top - r.y0)
}

pub(crate) fn ensure_finite(what: &str, v: f64) -> TypesetResult<()> {
    if !v.is_finite() {
        return Err(TypesetError::invalid(format!("{what} must be finite")));
    }
    Ok(())
}

pub(crate) fn ensure_non_negative(what: &str, v: f64) -> TypesetResult<()> {
    ensure_finite(what, v)?;
    if v < 0.0 {
        return Err(TypesetError::invalid(format!("{what} must be >= 0")));
    }
    Ok(())
}

pub(crate) fn ensure_rect(what: &str, r: Rect) -> TypesetResult<()> {
    for v in [r.x0, r.y0, r.x1, r.y1] {
        ensure_finite(what, v)?;
    }
    if r.x1 < r.x0 || r.y1 < r.y0 {
        return Err(TypesetError::invalid(format!(
            "{what} must have right >= left and bottom >= top"
        )));
    }
    Ok(())
}

/// Validate a containing region: finite and of positive width and height.
pub fn validate_region(what: &str, r: Rect) -> TypesetResult<()> {
    ensure_rect(what, r)?;
    if r.width() <= 0.0 || r.height() <= 0.0 {
        return Err(TypesetError::invalid(format!(
            "{what} must have positive width and height"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
