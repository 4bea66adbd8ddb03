// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sticky section header state.

/// Which section header, if any, is pinned to the leading edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StickyState {
    /// No header is pinned.
    #[default]
    Inactive,
    /// The header of `section` is pinned.
    Pinned {
        /// Section whose header is shown.
        section: usize,
        /// Absolute element index of that header.
        header_index: usize,
    },
}

/// The pinned header element and its state.
#[derive(Clone, Copy, Debug)]
pub(crate) struct StickyHeader<E> {
    pub(crate) element: Option<E>,
    pub(crate) state: StickyState,
}

impl<E> Default for StickyHeader<E> {
    fn default() -> Self {
        Self {
            element: None,
            state: StickyState::Inactive,
        }
    }
}

/// Outcome of moving the sticky header to a new section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PinChange {
    /// Same header as before.
    Unchanged,
    /// A different header was pinned; `was_inactive` if nothing was before.
    Switched { was_inactive: bool },
}

impl<E> StickyHeader<E> {
    /// Pins the header of `section`.
    pub(crate) fn pin(&mut self, section: usize, header_index: usize) -> PinChange {
        let was_inactive = match self.state {
            StickyState::Pinned {
                header_index: current,
                ..
            } if current == header_index => return PinChange::Unchanged,
            StickyState::Pinned { .. } => false,
            StickyState::Inactive => true,
        };
        self.state = StickyState::Pinned {
            section,
            header_index,
        };
        PinChange::Switched { was_inactive }
    }

    /// Returns to the inactive state.
    pub(crate) fn unpin(&mut self) {
        self.state = StickyState::Inactive;
    }
}

/// Leading offset of the pinned header within the viewport.
///
/// `next_header_begin` is the content offset of the next header that is
/// visible, `visible_begin` the content offset at the viewport's leading edge,
/// and `header_extent` the pinned header's size. The result is zero unless the
/// next header intrudes, in which case the pinned header is pushed back just far
/// enough for the two to touch.
#[must_use]
pub(crate) fn pinned_offset(
    next_header_begin: Option<f64>,
    visible_begin: f64,
    header_extent: f64,
) -> f64 {
    let Some(begin) = next_header_begin else {
        return 0.0;
    };
    let pinned_end = visible_begin + header_extent;
    if begin < pinned_end {
        begin - pinned_end
    } else {
        0.0
    }
}
