use serde::{Deserialize, Serialize};

/// Rectangle in document coordinates (scroll offsets included).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub top: f32,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(top: f32, left: f32, right: f32, bottom: f32) -> Self {
        Self {
            top,
            left,
            right,
            bottom,
        }
    }

    pub fn from_origin(left: f32, top: f32, size: Size) -> Self {
        Self {
            top,
            left,
            right: left + size.width,
            bottom: top + size.height,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn mid_x(&self) -> f32 {
        (self.left + self.right) / 2.0
    }

    pub fn mid_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// What the host can currently see of the document.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Visible part of the scrollable area, in document coordinates.
    pub visible: Rect,
    /// Height of the toolbar band pinned to the top of `visible`.
    pub toolbar_height: f32,
}

impl Viewport {
    pub fn new(visible: Rect, toolbar_height: f32) -> Self {
        Self {
            visible,
            toolbar_height,
        }
    }

    /// The visible area minus the toolbar band.
    pub fn usable(&self) -> Rect {
        Rect {
            top: self.visible.top + self.toolbar_height,
            ..self.visible
        }
    }
}
