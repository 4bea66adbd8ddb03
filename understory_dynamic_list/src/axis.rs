// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll axis projection helpers.

use kurbo::{Rect, Size, Vec2};

/// The axis along which a list lays out its elements and scrolls.
///
/// All offsets and extents handled by this crate are measured along this axis.
/// Host geometry is expressed in [`kurbo`] types with the usual y-down
/// convention, so the *leading* edge of a vertical list is its top and the
/// *trailing* edge its bottom.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Elements flow left to right.
    Horizontal,
    /// Elements flow top to bottom.
    #[default]
    Vertical,
}

impl Axis {
    /// Returns the axis for a host that reports whether it scrolls vertically.
    #[must_use]
    pub const fn from_vertical(vertical: bool) -> Self {
        if vertical {
            Self::Vertical
        } else {
            Self::Horizontal
        }
    }

    /// Returns the extent of `size` along this axis.
    #[must_use]
    pub const fn extent(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// Returns `size` with its extent along this axis replaced.
    #[must_use]
    pub const fn with_extent(self, size: Size, extent: f64) -> Size {
        match self {
            Self::Horizontal => Size::new(extent, size.height),
            Self::Vertical => Size::new(size.width, extent),
        }
    }

    /// Returns the component of `v` along this axis.
    #[must_use]
    pub const fn component(self, v: Vec2) -> f64 {
        match self {
            Self::Horizontal => v.x,
            Self::Vertical => v.y,
        }
    }

    /// Returns `v` with `delta` added to its component along this axis.
    #[must_use]
    pub const fn offset_component(self, v: Vec2, delta: f64) -> Vec2 {
        match self {
            Self::Horizontal => Vec2::new(v.x + delta, v.y),
            Self::Vertical => Vec2::new(v.x, v.y + delta),
        }
    }

    /// Leading edge of `rect` (left or top).
    #[must_use]
    pub const fn leading(self, rect: Rect) -> f64 {
        match self {
            Self::Horizontal => rect.x0,
            Self::Vertical => rect.y0,
        }
    }

    /// Trailing edge of `rect` (right or bottom).
    #[must_use]
    pub const fn trailing(self, rect: Rect) -> f64 {
        match self {
            Self::Horizontal => rect.x1,
            Self::Vertical => rect.y1,
        }
    }
}

/// Returns `true` if the rects overlap or touch.
pub(crate) fn rects_touch(a: Rect, b: Rect) -> bool {
    !(a.x1 < b.x0 || a.x0 > b.x1 || a.y1 < b.y0 || a.y0 > b.y1)
}
