// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Content size and scroll offset compensation.
//!
//! When the content container grows or shrinks by `delta` along the scroll
//! axis, it does so around its pivot. [`ScrollAnchor`] computes how far the
//! scroll offset must move so that either the leading or the trailing edge of
//! the content stays where it was.

/// Which edge of the content should hold still across a size change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollAnchor {
    /// Keep the leading edge in place; growth appears at the trailing edge.
    #[default]
    Beginning,
    /// Keep the trailing edge in place; growth appears at the leading edge.
    ///
    /// This is the chat/log behavior for lists that are scrolled to the end.
    End,
}

impl ScrollAnchor {
    /// Returns the scroll delta that keeps this anchor stationary when the
    /// content changes size by `size_delta`.
    ///
    /// `pivot` is the content's pivot along the scroll axis, in `0.0..=1.0`.
    #[must_use]
    pub fn scroll_delta(self, size_delta: f64, pivot: f64) -> f64 {
        match self {
            Self::Beginning => size_delta * pivot,
            Self::End => -size_delta * (1.0 - pivot),
        }
    }
}

/// A pending change to the content size and scroll offset.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContentAdjustment {
    /// Change of the content extent along the scroll axis.
    pub size_delta: f64,
    /// Change of the scroll offset along the scroll axis.
    pub scroll_delta: f64,
}

impl ContentAdjustment {
    /// Creates an adjustment that resizes the content and keeps `anchor` still.
    #[must_use]
    pub fn anchored(size_delta: f64, anchor: ScrollAnchor, pivot: f64) -> Self {
        Self {
            size_delta,
            scroll_delta: anchor.scroll_delta(size_delta, pivot),
        }
    }

    /// Returns `true` if applying this adjustment would change nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.size_delta == 0.0 && self.scroll_delta == 0.0
    }
}
