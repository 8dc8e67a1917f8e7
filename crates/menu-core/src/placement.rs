use crate::geometry::{Rect, Size, Viewport};

/// Gap kept between a dialog, the selection it edits and the edges of the
/// visible area.
pub const DIALOG_MARGIN: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Right,
    Left,
    Above,
    Below,
}

impl Side {
    pub const PREFERENCE: [Side; 4] = [Side::Right, Side::Left, Side::Above, Side::Below];
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub side: Side,
    pub top: f32,
    pub left: f32,
    /// False when no side fit and the dialog was clamped below the selection.
    pub fits: bool,
}

impl Placement {
    pub fn frame(&self, size: Size) -> Rect {
        Rect::from_origin(self.left, self.top, size)
    }
}

/// Like `f32::clamp`, but prefers `min` instead of panicking when the range
/// is empty (a dialog larger than the visible area).
fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if max < min { min } else { value.max(min).min(max) }
}

fn candidate(side: Side, anchor: Rect, size: Size, area: Rect, margin: f32) -> (f32, f32) {
    let centered_top = clamp(
        anchor.mid_y() - size.height / 2.0,
        area.top + margin,
        area.bottom - margin - size.height,
    );
    let centered_left = clamp(
        anchor.mid_x() - size.width / 2.0,
        area.left + margin,
        area.right - margin - size.width,
    );
    match side {
        Side::Right => (centered_top, anchor.right + margin),
        Side::Left => (centered_top, anchor.left - margin - size.width),
        Side::Above => (anchor.top - margin - size.height, centered_left),
        Side::Below => (anchor.bottom + margin, centered_left),
    }
}

/// Where to put a dialog of `size` next to the selection `anchor`.
///
/// Tries right, left, above, then below, and takes the first side where the
/// dialog plus margin lies inside the visible area under the toolbar. When
/// nothing fits the dialog goes below the selection, clamped into view. Pure:
/// equal inputs always give equal output.
pub fn place_dialog(anchor: Rect, size: Size, viewport: Viewport) -> Placement {
    let area = viewport.usable();
    let margin = DIALOG_MARGIN;
    let inner = Rect::new(
        area.top + margin,
        area.left + margin,
        area.right - margin,
        area.bottom - margin,
    );

    for side in Side::PREFERENCE {
        let (top, left) = candidate(side, anchor, size, area, margin);
        if inner.contains_rect(&Rect::from_origin(left, top, size)) {
            return Placement {
                side,
                top,
                left,
                fits: true,
            };
        }
    }

    let (_, left) = candidate(Side::Below, anchor, size, area, margin);
    let top = clamp(
        anchor.bottom + margin,
        area.top + margin,
        area.bottom - margin - size.height,
    );
    Placement {
        side: Side::Below,
        top,
        left,
        fits: false,
    }
}
