// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visible range resolution and display reconciliation.
//!
//! Lists where every kind has a fixed size resolve their visible range in
//! closed form. Lists with variable sizes either expand outward from a pivot
//! element that must not move (while some kind still relies on an estimate),
//! or scan from an average-based guess (once every size is known).

use core::ops::RangeInclusive;

use tracing::{debug, warn};

use crate::DynamicList;
use crate::adjust::{ContentAdjustment, ScrollAnchor};
use crate::display::DisplayedElement;
use crate::host::{ElementNotifications, ListDataSource, ListHost};
use crate::kind::ElementKind;
use crate::sections::{ElementLocation, SectionTable};
use crate::sticky::{PinChange, pinned_offset};

/// Elements on screen and elements instantiated.
///
/// The displayed range contains the visible range and may extend one
/// navigable element past it on each side, so that keyboard or gamepad focus
/// can move onto an element just outside the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VisibleRange {
    /// First element at least partially inside the viewport.
    pub first_visible: usize,
    /// Last element at least partially inside the viewport.
    pub last_visible: usize,
    /// First instantiated element.
    pub first_displayed: usize,
    /// Last instantiated element.
    pub last_displayed: usize,
}

impl VisibleRange {
    /// A range of one element.
    #[must_use]
    pub const fn single(index: usize) -> Self {
        Self {
            first_visible: index,
            last_visible: index,
            first_displayed: index,
            last_displayed: index,
        }
    }

    /// The visible indices.
    #[must_use]
    pub const fn visible(&self) -> RangeInclusive<usize> {
        self.first_visible..=self.last_visible
    }

    /// The displayed indices.
    #[must_use]
    pub const fn displayed(&self) -> RangeInclusive<usize> {
        self.first_displayed..=self.last_displayed
    }
}

/// Visible part of the content, in content space along the scroll axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct VisibleBounds {
    pub(crate) leading: f64,
    pub(crate) trailing: f64,
}

/// Result of one visibility calculation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct VisibilityPass {
    pub(crate) range: Option<VisibleRange>,
    /// Lowest index whose size was measured during the pass.
    pub(crate) first_resized: Option<usize>,
    pub(crate) size_change: f64,
    pub(crate) scroll_change: f64,
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "ceil of a non-negative offset ratio; callers clamp to the element count"
)]
fn ceil_index(value: f64) -> usize {
    let value = libm::ceil(value);
    if value > 0.0 { value as usize } else { 0 }
}

fn note_resized(first_resized: &mut Option<usize>, index: usize) {
    *first_resized = Some(first_resized.map_or(index, |f| f.min(index)));
}

/// Visible range of a list without sections whose items are `item_extent` long.
pub(crate) fn fixed_visible_range(
    bounds: VisibleBounds,
    item_extent: f64,
    len: usize,
) -> Option<(usize, usize)> {
    if item_extent <= 0.0 || len == 0 {
        return None;
    }
    let last_index = len - 1;
    let first = ceil_index(bounds.leading / item_extent)
        .saturating_sub(1)
        .min(last_index);
    let last = ceil_index(bounds.trailing / item_extent)
        .saturating_sub(1)
        .min(last_index);
    Some((first, last))
}

/// Visible range of a sectioned list with fixed header and item extents.
///
/// Walks the sections once: the trailing bound resumes where the leading bound
/// stopped.
pub(crate) fn fixed_visible_range_in_sections(
    bounds: VisibleBounds,
    header_extent: f64,
    item_extent: f64,
    sections: &SectionTable,
) -> Option<(usize, usize)> {
    if header_extent <= 0.0 && item_extent <= 0.0 {
        return None;
    }
    let mut offset = 0.0;
    let mut current = 0;
    let mut find = |bound: f64| -> Option<usize> {
        while let Some(section) = sections.get(current) {
            let header_end = offset + header_extent;
            if header_end >= bound {
                return Some(section.header_index);
            }
            let section_end = header_end + item_extent * section.item_count as f64;
            if section_end >= bound {
                let item = if item_extent > 0.0 {
                    ceil_index((bound - header_end) / item_extent)
                } else {
                    0
                };
                return Some(section.header_index + item);
            }
            if current + 1 == sections.len() {
                return Some(section.last_index());
            }
            offset = section_end;
            current += 1;
        }
        None
    };
    let first = find(bounds.leading)?;
    let last = find(bounds.trailing)?;
    Some((first, last))
}

/// Nearest element before `first` that can take navigation focus.
///
/// Without sections every element shares the item kind, so the neighbor is
/// taken directly.
pub(crate) fn navigable_before(
    first: usize,
    has_sections: bool,
    navigable: impl Fn(usize) -> bool,
) -> Option<usize> {
    if !has_sections {
        return first.checked_sub(1);
    }
    (0..first).rev().find(|&i| navigable(i))
}

/// Nearest element after `last` that can take navigation focus.
pub(crate) fn navigable_after(
    last: usize,
    len: usize,
    has_sections: bool,
    navigable: impl Fn(usize) -> bool,
) -> Option<usize> {
    let next = last + 1;
    if next >= len {
        return None;
    }
    if !has_sections {
        return Some(next);
    }
    (next..len).find(|&i| navigable(i))
}

/// Widens `first..=last` by one navigable element on each side.
///
/// With sections the search skips non-navigable kinds, and a side with no
/// navigable element left is not widened.
pub(crate) fn widen_for_navigation(
    first: usize,
    last: usize,
    len: usize,
    has_sections: bool,
    navigable: impl Fn(usize) -> bool,
) -> (usize, usize) {
    (
        navigable_before(first, has_sections, &navigable).unwrap_or(first),
        navigable_after(last, len, has_sections, &navigable).unwrap_or(last),
    )
}

impl<H, D, N> DynamicList<H, D, N>
where
    H: ListHost,
    D: ListDataSource,
    N: ElementNotifications<H>,
{
    /// Visible content bounds, or `None` if there is nothing to show.
    pub(crate) fn visible_content_bounds(&self) -> Option<VisibleBounds> {
        if self.num_elements == 0 {
            return None;
        }
        let (content, viewport) = self.content_and_viewport_rects()?;
        if !crate::axis::rects_touch(content, viewport) {
            return None;
        }
        let axis = self.axis;
        let content_begin = axis.leading(content);
        Some(VisibleBounds {
            leading: (axis.leading(viewport) - content_begin).max(0.0),
            trailing: axis.trailing(viewport).min(axis.trailing(content)) - content_begin,
        })
    }

    /// Brings the displayed elements in line with the viewport.
    ///
    /// Measures newly visible elements as needed, recycles elements that left
    /// the displayed range, shows new ones, and finally applies the content
    /// size and scroll compensation for every size that changed.
    pub(crate) fn update_element_visibility(&mut self, keep_at_end_if_was_at_end: bool) {
        let bounds = self.visible_content_bounds();
        let pass = match bounds {
            Some(bounds) => self.calculate_visible_element_indices(keep_at_end_if_was_at_end, bounds),
            None => VisibilityPass::default(),
        };

        // Viewport leading edge in content space once the adjustment lands.
        self.last_visible_offset = bounds.map_or(0.0, |b| b.leading)
            + self.scroll_delta(ScrollAnchor::Beginning, pass.size_change)
            - pass.scroll_change;

        if self.sticky_headers_enabled() {
            self.update_sticky_header(pass.range, self.last_visible_offset);
        }

        self.display
            .release_outside(pass.range.map(|r| r.displayed()), &mut self.host);
        if let Some(range) = pass.range {
            for index in range.displayed() {
                if let Some(shown) = self.display.at_index(index) {
                    if pass.first_resized.is_some_and(|first| first <= index) {
                        let element = shown.element;
                        self.position_element(element, index);
                    }
                } else {
                    self.display_element(index);
                }
            }
        }
        self.range = pass.range;

        debug!(
            range = ?pass.range,
            size_change = pass.size_change,
            scroll_change = pass.scroll_change,
            "element visibility updated"
        );
        self.apply_adjustment(ContentAdjustment {
            size_delta: pass.size_change,
            scroll_delta: pass.scroll_change,
        });
    }

    fn display_element(&mut self, index: usize) {
        let Some(location) = self.sections.locate(index) else {
            return;
        };
        let kind = location.kind();
        let Some(element) = self.element_for_display(kind) else {
            warn!(index, ?kind, "could not obtain an element to display");
            return;
        };
        self.display.insert(DisplayedElement {
            element,
            index,
            location,
        });
        if self.variable.has(kind) {
            self.size_element(element, index);
        }
        self.position_element(element, index);
        self.notify_becoming_visible(element, location);
    }

    /// Reuses a pooled element of `kind`, or clones the prototype.
    fn element_for_display(&mut self, kind: ElementKind) -> Option<H::Element> {
        if let Some(element) = self.display.take_pooled(kind, &mut self.host) {
            return Some(element);
        }
        let content = self.host.content()?;
        let prototype = self.kinds[kind].prototype?;
        self.host.clone_element(prototype, content)
    }

    fn calculate_visible_element_indices(
        &mut self,
        keep_at_end_if_was_at_end: bool,
        bounds: VisibleBounds,
    ) -> VisibilityPass {
        if !self.all_prototypes_valid() || self.num_elements == 0 {
            return VisibilityPass::default();
        }
        let len = self.num_elements;
        let visible = if !self.any_variable() {
            let item = self.kinds[ElementKind::Item].extent;
            if self.has_sections() {
                let header = self.kinds[ElementKind::SectionHeader].extent;
                fixed_visible_range_in_sections(bounds, header, item, &self.sections)
            } else {
                fixed_visible_range(bounds, item, len)
            }
        } else if self.any_estimated() {
            let keep_at_end = keep_at_end_if_was_at_end && self.is_scrolled_to_end();
            let pivot = if keep_at_end {
                len - 1
            } else {
                self.pivot_to_remain_in_place(bounds)
            };
            return self.expand_from_pivot(pivot, bounds, keep_at_end);
        } else {
            let estimate = self.estimate_first_visible_index(bounds);
            let (first, mut end) = self.find_first_visible_index(estimate, bounds);
            let mut last = first;
            while end < bounds.trailing && last + 1 < len {
                last += 1;
                end += self.variable_size(last);
            }
            Some((first, last))
        };

        let Some((first, last)) = visible else {
            return VisibilityPass::default();
        };
        let (first_displayed, last_displayed) = if self.any_navigable() {
            widen_for_navigation(first, last, len, self.has_sections(), |i| {
                self.navigable.has(self.sections.kind_at(i))
            })
        } else {
            (first, last)
        };
        VisibilityPass {
            range: Some(VisibleRange {
                first_visible: first,
                last_visible: last,
                first_displayed,
                last_displayed,
            }),
            ..VisibilityPass::default()
        }
    }

    /// Guess at the first visible index from the running average size.
    fn estimate_first_visible_index(&self, bounds: VisibleBounds) -> usize {
        let average = self.cache.average().get();
        let mut estimate = 0;
        if average > 0.0 {
            if let Some(previous) = self.range {
                let delta = bounds.leading - self.last_visible_offset;
                let jump = ceil_index(libm::fabs(delta / average)).saturating_sub(1);
                estimate = if delta < 0.0 {
                    previous.first_visible.saturating_sub(jump)
                } else {
                    previous.first_visible.saturating_add(jump)
                };
            } else {
                estimate = ceil_index(bounds.leading / average).saturating_sub(1);
            }
        }
        estimate.min(self.num_elements.saturating_sub(1))
    }

    /// Walks from `estimate` to the first visible element.
    ///
    /// Returns the index and the offset of its trailing edge.
    fn find_first_visible_index(&self, estimate: usize, bounds: VisibleBounds) -> (usize, f64) {
        let mut index = estimate;
        let mut position = self.variable_offset(index);
        if position <= bounds.leading {
            position += self.variable_size(index);
            while position < bounds.leading && index + 1 < self.num_elements {
                index += 1;
                position += self.variable_size(index);
            }
        } else {
            while position > bounds.leading && index > 0 {
                index -= 1;
                position -= self.variable_size(index);
            }
            position += self.variable_size(index);
        }
        (index, position)
    }

    /// The element that should hold its position while estimates are replaced.
    ///
    /// Prefers the first element of the previous visible range that still
    /// reaches the leading edge.
    fn pivot_to_remain_in_place(&self, bounds: VisibleBounds) -> usize {
        if let Some(previous) = self.range.filter(|r| r.last_visible < self.num_elements) {
            let first_begin = self.variable_offset(previous.first_visible);
            let last_end =
                self.variable_offset(previous.last_visible) + self.variable_size(previous.last_visible);
            let overlaps = !(first_begin > bounds.trailing || last_end < bounds.leading);
            if overlaps {
                if let Some(index) = previous.visible().find(|&i| {
                    self.variable_offset(i) + self.variable_size(i) >= bounds.leading
                }) {
                    return index;
                }
            }
        }

        let estimate = self.estimate_first_visible_index(bounds);
        let (mut index, end) = self.find_first_visible_index(estimate, bounds);
        // Skip an unmeasured element that is mostly clipped off the leading edge.
        if self.cache.size(index).is_none() && index + 1 < self.num_elements {
            let begin = end - self.variable_size(index);
            if begin < bounds.leading && end < bounds.trailing {
                index += 1;
            }
        }
        index
    }

    /// Nearest element before (or after, `toward_end`) `from` that can take
    /// navigation focus.
    fn nearest_navigable(&self, from: usize, toward_end: bool) -> Option<usize> {
        let has_sections = self.has_sections();
        let navigable = |i: usize| self.navigable.has(self.sections.kind_at(i));
        if toward_end {
            navigable_after(from, self.num_elements, has_sections, navigable)
        } else {
            navigable_before(from, has_sections, navigable)
        }
    }

    /// Space left in the viewport before and after `pivot`.
    fn visible_space_around(&self, pivot: usize, keep_at_end: bool, visible_begin: f64) -> (f64, f64) {
        let area = self.visible_area_extent();
        if keep_at_end {
            return ((area - self.variable_size(pivot)).max(0.0), 0.0);
        }
        let begin = self.variable_offset(pivot);
        let end = begin + self.variable_size(pivot);
        (
            (begin - visible_begin).max(0.0),
            (area - (end - visible_begin)).max(0.0),
        )
    }

    /// Size of `index` for expansion, measuring it if needed.
    ///
    /// Returns the size and, if it was measured now, the change from its
    /// previous estimate.
    fn size_for_expansion(&mut self, index: usize) -> (f64, Option<f64>) {
        if let Some(size) = self.cache.size(index) {
            return (size, None);
        }
        let previous = self.variable_size(index);
        let size = self.measure(index);
        (size, Some(size - previous))
    }

    /// Fills the viewport outward from `pivot`, measuring as it goes.
    fn expand_from_pivot(
        &mut self,
        pivot: usize,
        bounds: VisibleBounds,
        keep_at_end: bool,
    ) -> VisibilityPass {
        let len = self.num_elements;
        let navigation = self.any_navigable();
        let mut size_change = 0.0;
        let mut change_before_pivot = 0.0;
        let mut first_resized: Option<usize> = None;

        if self.cache.size(pivot).is_none() {
            let previous = self.variable_size(pivot);
            let size = self.measure(pivot);
            size_change = size - previous;
            first_resized = Some(pivot);
        }
        let (mut space_before, mut space_after) =
            self.visible_space_around(pivot, keep_at_end, bounds.leading);
        // Viewport-relative leading edge of the pivot, which holds still.
        let pivot_begin = self.variable_offset(pivot) - bounds.leading;
        let mut range = VisibleRange::single(pivot);

        // Toward the beginning. Once the space runs out, keep going up to the
        // nearest navigable element past the visible edge, if there is one.
        let mut had_space = true;
        let mut extra: Option<usize> = None;
        while range.first_displayed > 0 {
            if space_before <= 0.0 {
                if had_space {
                    range.first_visible = range.first_displayed;
                    had_space = false;
                    if navigation {
                        extra = self.nearest_navigable(range.first_displayed, false);
                    }
                }
                if extra.is_none_or(|target| target >= range.first_displayed) {
                    break;
                }
            }
            range.first_displayed -= 1;
            let index = range.first_displayed;
            let (size, change) = self.size_for_expansion(index);
            space_before -= size;
            if let Some(change) = change {
                size_change += change;
                change_before_pivot += change;
                note_resized(&mut first_resized, index);
            }
        }
        if had_space {
            range.first_visible = range.first_displayed;
        }

        // Toward the end.
        let mut had_space = true;
        let mut extra: Option<usize> = None;
        while range.last_displayed + 1 < len {
            if space_after <= 0.0 {
                if had_space {
                    range.last_visible = range.last_displayed;
                    had_space = false;
                    if navigation {
                        extra = self.nearest_navigable(range.last_displayed, true);
                    }
                }
                if extra.is_none_or(|target| target <= range.last_displayed) {
                    break;
                }
            }
            range.last_displayed += 1;
            let index = range.last_displayed;
            let (size, change) = self.size_for_expansion(index);
            space_after -= size;
            if let Some(change) = change {
                size_change += change;
                note_resized(&mut first_resized, index);
            }
        }
        if had_space {
            range.last_visible = range.last_displayed;
        }

        // A pivot that measured smaller than its estimate may end above the
        // viewport.
        if !keep_at_end && range.first_visible == pivot {
            let mut end = pivot_begin + self.variable_size(pivot);
            while end <= 0.0 && range.first_visible < range.last_visible {
                range.first_visible += 1;
                end += self.variable_size(range.first_visible);
            }
        }

        // The pinned header is measured like any other element.
        if self.sticky_headers_enabled() {
            let header = self
                .sections
                .locate(range.first_visible)
                .and_then(ElementLocation::section)
                .and_then(|s| self.sections.header_index(s));
            if let Some(header) = header.filter(|&h| self.cache.size(h).is_none()) {
                let previous = self.variable_size(header);
                let size = self.measure(header);
                let change = size - previous;
                size_change += change;
                let end = self.variable_offset(header) + size;
                self.cache.set_accumulated(header, end);
                let rewrite_from =
                    first_resized.map_or(range.first_displayed, |f| f.max(range.first_displayed));
                self.cache.shift_accumulated(header + 1..rewrite_from, change);
                if header <= pivot {
                    change_before_pivot += change;
                }
                note_resized(&mut first_resized, header);
            }
        }

        self.disable_measurement_elements();

        if let Some(first) = first_resized {
            let start = first.max(range.first_displayed);
            let mut position = self.variable_offset(start);
            for index in start..=range.last_displayed {
                position += self.variable_size(index);
                self.cache.set_accumulated(index, position);
            }
            self.cache
                .shift_accumulated(range.last_displayed + 1..len, size_change);
        }

        self.cache.average_mut().update(0, size_change);

        let scroll_change = if keep_at_end {
            self.scroll_delta(ScrollAnchor::End, size_change)
        } else {
            self.scroll_delta(ScrollAnchor::Beginning, size_change) - change_before_pivot
        };

        VisibilityPass {
            range: Some(range),
            first_resized,
            size_change,
            scroll_change,
        }
    }

    /// Pins the header of the first visible section and pushes it back when
    /// the next header reaches it.
    fn update_sticky_header(&mut self, range: Option<VisibleRange>, visible_begin: f64) {
        let Some(element) = self.sticky.element else {
            return;
        };
        let pinned = range.and_then(|r| {
            let section = self.sections.locate(r.first_visible)?.section()?;
            Some((r, section, self.sections.header_index(section)?))
        });
        let Some((range, section, header)) = pinned else {
            self.sticky.unpin();
            self.host.set_enabled(element, false);
            return;
        };

        if let PinChange::Switched { was_inactive } = self.sticky.pin(section, header) {
            if was_inactive {
                self.host.set_enabled(element, true);
            }
            if self.variable.has(ElementKind::SectionHeader) {
                self.size_element(element, header);
            }
            self.notifications
                .section_header_becoming_visible(&mut self.host, element, section);
        }

        let next_begin = self
            .sections
            .first_header_in(range.first_visible, range.last_visible, header)
            .map(|h| self.element_offset(h));
        let extent = if self.variable.has(ElementKind::SectionHeader) {
            self.variable_size(header)
        } else {
            self.kinds[ElementKind::SectionHeader].extent
        };
        let offset = pinned_offset(next_begin, visible_begin, extent);
        self.host.set_leading_offset(element, self.axis, offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(leading: f64, trailing: f64) -> VisibleBounds {
        VisibleBounds { leading, trailing }
    }

    #[test]
    fn fixed_items_fill_viewport_exactly() {
        assert_eq!(fixed_visible_range(bounds(0.0, 100.0), 20.0, 100), Some((0, 4)));
        // An element ending exactly at the leading bound still counts.
        assert_eq!(fixed_visible_range(bounds(20.0, 120.0), 20.0, 100), Some((0, 5)));
        assert_eq!(fixed_visible_range(bounds(30.0, 130.0), 20.0, 100), Some((1, 6)));
    }

    #[test]
    fn fixed_range_clamps_to_last_element() {
        assert_eq!(fixed_visible_range(bounds(0.0, 100.0), 20.0, 3), Some((0, 2)));
        assert_eq!(fixed_visible_range(bounds(0.0, 100.0), 0.0, 3), None);
        assert_eq!(fixed_visible_range(bounds(0.0, 100.0), 20.0, 0), None);
    }

    #[test]
    fn fixed_sections_resolve_headers_and_items() {
        // Header 10, items 5: H0 0..10, items 10..25, H1 25..35, items 35..50.
        let table = SectionTable::from_counts([3, 3]);
        assert_eq!(
            fixed_visible_range_in_sections(bounds(0.0, 12.0), 10.0, 5.0, &table),
            Some((0, 1))
        );
        assert_eq!(
            fixed_visible_range_in_sections(bounds(20.0, 32.0), 10.0, 5.0, &table),
            Some((2, 4))
        );
        // Past the end of the last section resolves to the last element.
        assert_eq!(
            fixed_visible_range_in_sections(bounds(40.0, 60.0), 10.0, 5.0, &table),
            Some((5, 7))
        );
        assert_eq!(
            fixed_visible_range_in_sections(bounds(0.0, 10.0), 10.0, 5.0, &SectionTable::new()),
            None
        );
    }

    #[test]
    fn zero_sized_sections_show_nothing() {
        let table = SectionTable::from_counts([3, 3]);
        assert_eq!(
            fixed_visible_range_in_sections(bounds(0.0, 12.0), 0.0, 0.0, &table),
            None
        );
        // Zero-sized headers alone still leave the items visible.
        assert_eq!(
            fixed_visible_range_in_sections(bounds(0.0, 12.0), 0.0, 5.0, &table),
            Some((0, 3))
        );
    }

    #[test]
    fn nearest_navigable_respects_list_edges() {
        let headers = |i: usize| i == 0 || i == 7;
        assert_eq!(navigable_before(0, false, |_| true), None);
        assert_eq!(navigable_after(9, 10, false, |_| true), None);
        assert_eq!(navigable_before(4, true, headers), Some(0));
        assert_eq!(navigable_after(4, 10, true, headers), Some(7));
        assert_eq!(navigable_after(7, 10, true, headers), None);
    }

    #[test]
    fn navigation_widens_by_one_without_sections() {
        assert_eq!(widen_for_navigation(3, 5, 10, false, |_| true), (2, 6));
        assert_eq!(widen_for_navigation(0, 9, 10, false, |_| true), (0, 9));
    }

    #[test]
    fn navigation_skips_to_navigable_kinds() {
        // Only even indices are navigable.
        let navigable = |i: usize| i % 2 == 0;
        assert_eq!(widen_for_navigation(3, 5, 10, true, navigable), (2, 6));
        assert_eq!(widen_for_navigation(5, 6, 10, true, navigable), (4, 8));
        // Nothing navigable on either side: no widening.
        assert_eq!(widen_for_navigation(1, 8, 10, true, |i| (2..8).contains(&i)), (1, 8));
    }

    #[test]
    fn visible_range_iterators() {
        let r = VisibleRange {
            first_visible: 2,
            last_visible: 4,
            first_displayed: 1,
            last_displayed: 5,
        };
        assert_eq!(r.visible().count(), 3);
        assert_eq!(r.displayed().count(), 5);
        assert_eq!(VisibleRange::single(7).displayed(), 7..=7);
    }
}
