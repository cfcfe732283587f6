//! Alpha bounding box detection.
//!
//! [`find_bounds`] locates the smallest rectangle holding every pixel whose alpha is
//! non-zero. Rows are resolved first; columns are then searched only inside the
//! resulting row span. An image with no visible pixel keeps its full extent.

use image::RgbaImage;

/// Pixel rectangle, `left`/`top` inclusive and `right`/`bottom` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl BoundingBox {
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Box covering a whole `width` x `height` canvas.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    pub fn is_full(&self, width: u32, height: u32) -> bool {
        *self == Self::full(width, height)
    }

    /// True when the box is non-empty and lies inside a `width` x `height` canvas.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.left < self.right
            && self.top < self.bottom
            && self.right <= width
            && self.bottom <= height
    }
}

/// Walks `0..len` from both ends at once and returns `(first, last + 1)` for the
/// indices where `hit` holds, stopping as soon as both ends are known.
fn scan_inward(len: u32, hit: impl Fn(u32) -> bool) -> Option<(u32, u32)> {
    let mut first = None;
    let mut end = None;
    let mut step = 0;

    while step < len && (first.is_none() || end.is_none()) {
        if first.is_none() && hit(step) {
            first = Some(step);
        }
        let back = len - 1 - step;
        if end.is_none() && hit(back) {
            end = Some(back + 1);
        }
        step += 1;
    }

    Some((first?, end?))
}

pub fn find_bounds(image: &RgbaImage) -> BoundingBox {
    let (width, height) = image.dimensions();
    let visible = |x: u32, y: u32| image.get_pixel(x, y)[3] != 0;

    let Some((top, bottom)) = scan_inward(height, |y| (0..width).any(|x| visible(x, y))) else {
        return BoundingBox::full(width, height);
    };

    let Some((left, right)) = scan_inward(width, |x| (top..bottom).any(|y| visible(x, y))) else {
        return BoundingBox::full(width, height);
    };

    log::trace!(
        "bounds of {}x{} image: ({}, {}, {}, {})",
        width,
        height,
        left,
        top,
        right,
        bottom
    );

    BoundingBox::new(left, top, right, bottom)
}
