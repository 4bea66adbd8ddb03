// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The list controller.

use alloc::vec::Vec;
use core::fmt;

use kurbo::{Rect, Vec2};
use tracing::{debug, warn};

use crate::adjust::{ContentAdjustment, ScrollAnchor};
use crate::axis::Axis;
use crate::config::{ElementSizing, ListConfig};
use crate::display::{DisplayList, DisplayedElement};
use crate::error::ListError;
use crate::host::{ElementNotifications, ListDataSource, ListHost};
use crate::kind::{ElementKind, KindSet, PerKind};
use crate::sections::{ElementLocation, SectionTable};
use crate::size_cache::SizeCache;
use crate::sticky::{StickyHeader, StickyState};
use crate::visibility::VisibleRange;

/// Viewport size changes at or below this are ignored.
const VIEWPORT_RESIZE_TOLERANCE: f64 = 0.05;

/// Per-kind state captured when the list is prepared.
#[derive(Clone, Copy, Debug)]
pub(crate) struct KindState<E> {
    pub(crate) prototype: Option<E>,
    /// Prototype extent along the scroll axis.
    pub(crate) extent: f64,
    pub(crate) auto_calculate: bool,
    /// Zero when the kind has no estimate.
    pub(crate) estimated: f64,
    /// Clone used only for auto-size measurement.
    pub(crate) measure_element: Option<E>,
}

impl<E> Default for KindState<E> {
    fn default() -> Self {
        Self {
            prototype: None,
            extent: 0.0,
            auto_calculate: false,
            estimated: 0.0,
            measure_element: None,
        }
    }
}

/// A virtualized list that instantiates only the elements needed to fill its
/// viewport.
///
/// The list owns its three collaborators: the [`ListHost`] that holds the
/// elements, a [`ListDataSource`], and an [`ElementNotifications`] sink. All
/// operations are synchronous; the host is expected to call
/// [`on_scroll_offset_changed`](Self::on_scroll_offset_changed) and
/// [`on_viewport_rect_changed`](Self::on_viewport_rect_changed) as those
/// events happen.
pub struct DynamicList<H: ListHost, D = (), N = ()> {
    pub(crate) host: H,
    pub(crate) data: D,
    pub(crate) notifications: N,
    pub(crate) config: ListConfig<H::Element>,
    pub(crate) prepared: bool,
    pub(crate) axis: Axis,
    pub(crate) kinds: PerKind<KindState<H::Element>>,
    /// Kinds in play: items, plus headers when sections are enabled.
    pub(crate) active: KindSet,
    pub(crate) variable: KindSet,
    pub(crate) estimated: KindSet,
    pub(crate) navigable: KindSet,
    pub(crate) sections: SectionTable,
    pub(crate) num_elements: usize,
    pub(crate) cache: SizeCache,
    pub(crate) display: DisplayList<H::Element>,
    pub(crate) range: Option<VisibleRange>,
    /// Leading visible offset seen by the last visibility pass.
    pub(crate) last_visible_offset: f64,
    pub(crate) sticky: StickyHeader<H::Element>,
}

impl<H: ListHost, D, N> fmt::Debug for DynamicList<H, D, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicList")
            .field("prepared", &self.prepared)
            .field("axis", &self.axis)
            .field("num_elements", &self.num_elements)
            .field("sections", &self.sections.len())
            .field("range", &self.range)
            .field("displayed", &self.display.len())
            .field("sticky", &self.sticky.state)
            .finish_non_exhaustive()
    }
}

impl<H, D, N> DynamicList<H, D, N>
where
    H: ListHost,
    D: ListDataSource,
    N: ElementNotifications<H>,
{
    /// Creates an unprepared list.
    pub fn new(host: H, data: D, notifications: N, config: ListConfig<H::Element>) -> Self {
        Self {
            host,
            data,
            notifications,
            config,
            prepared: false,
            axis: Axis::default(),
            kinds: PerKind::default(),
            active: KindSet::ITEM,
            variable: KindSet::empty(),
            estimated: KindSet::empty(),
            navigable: KindSet::empty(),
            sections: SectionTable::new(),
            num_elements: 0,
            cache: SizeCache::new(),
            display: DisplayList::default(),
            range: None,
            last_visible_offset: 0.0,
            sticky: StickyHeader::default(),
        }
    }

    /// The host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The data source.
    #[must_use]
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Mutable access to the data source.
    ///
    /// Changes to element counts take effect on the next
    /// [`refresh_content`](Self::refresh_content), or for appended elements via
    /// [`add_elements_to_end`](Self::add_elements_to_end).
    pub fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    /// The notification sink.
    #[must_use]
    pub fn notifications(&self) -> &N {
        &self.notifications
    }

    /// Mutable access to the notification sink.
    pub fn notifications_mut(&mut self) -> &mut N {
        &mut self.notifications
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &ListConfig<H::Element> {
        &self.config
    }

    /// Whether the list has been prepared for display.
    #[must_use]
    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    /// The scroll axis captured at preparation.
    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Number of elements, headers included.
    #[must_use]
    pub fn num_elements(&self) -> usize {
        self.num_elements
    }

    /// The section table. Empty for lists without sections.
    #[must_use]
    pub fn sections(&self) -> &SectionTable {
        &self.sections
    }

    /// Where `index` lives, or `None` if it is out of range.
    #[must_use]
    pub fn element_location(&self, index: usize) -> Option<ElementLocation> {
        if index >= self.num_elements {
            return None;
        }
        self.sections.locate(index)
    }

    /// The range computed by the last visibility pass.
    #[must_use]
    pub fn visible_range(&self) -> Option<VisibleRange> {
        self.range
    }

    /// Currently displayed elements in index order.
    pub fn displayed_elements(&self) -> impl Iterator<Item = &DisplayedElement<H::Element>> {
        self.display.iter()
    }

    /// Elements of `kind` waiting in the recycle pool, most recent last.
    #[must_use]
    pub fn pooled_elements(&self, kind: ElementKind) -> &[H::Element] {
        self.display.pooled(kind)
    }

    /// Measured sizes and accumulated offsets of variable-size lists.
    #[must_use]
    pub fn size_cache(&self) -> &SizeCache {
        &self.cache
    }

    /// State of the sticky header.
    #[must_use]
    pub fn sticky_state(&self) -> StickyState {
        self.sticky.state
    }

    /// The sticky header element, if sticky headers are in use.
    #[must_use]
    pub fn sticky_header_element(&self) -> Option<H::Element> {
        self.sticky.element
    }

    /// Prepares the list for display.
    ///
    /// Captures the scroll axis and the prototype sizes, validates the
    /// prototypes, and clears out the content. Called implicitly by
    /// [`refresh_content`](Self::refresh_content); does nothing once prepared.
    pub fn prepare(&mut self) {
        if self.prepared {
            return;
        }
        self.axis = Axis::from_vertical(self.host.is_vertical());
        let sections = self.config.sections_enabled;
        self.active = if sections {
            KindSet::all()
        } else {
            KindSet::ITEM
        };

        let content = self.host.content();
        let children = content.map(|c| self.host.children(c)).unwrap_or_default();

        let mut item_prototype = self.config.item.prototype;
        if !item_prototype.is_some_and(|p| self.is_valid_prototype(p)) {
            if let Some(p) = item_prototype {
                warn!(prototype = ?p, "item prototype would clone the list into itself");
            }
            item_prototype = children
                .first()
                .copied()
                .filter(|&c| self.is_valid_prototype(c));
            if item_prototype.is_none() {
                warn!("dynamic list has no usable item prototype");
            }
        }
        let mut header_prototype = None;
        if sections {
            header_prototype = self.config.header.prototype;
            if let Some(p) = header_prototype {
                if !self.is_valid_prototype(p) {
                    warn!(prototype = ?p, "header prototype would clone the list into itself");
                    header_prototype = None;
                }
            } else {
                warn!("dynamic list has sections but no header prototype");
            }
        }

        self.variable = KindSet::empty();
        self.estimated = KindSet::empty();
        self.navigable = KindSet::empty();
        let slots = [
            (ElementKind::Item, item_prototype, self.config.item),
            (ElementKind::SectionHeader, header_prototype, self.config.header),
        ];
        for (kind, prototype, sizing) in slots {
            self.prepare_kind(kind, prototype, &sizing);
        }

        if let Some(content) = content {
            for child in children.into_iter().rev() {
                self.host.remove_child(content, child);
                if Some(child) != item_prototype && Some(child) != header_prototype {
                    self.host.destroy_element(child);
                }
            }

            self.sticky = StickyHeader::default();
            if sections && self.config.sticky_headers {
                if let (Some(prototype), Some(viewport)) =
                    (header_prototype, self.host.parent(content))
                {
                    let element = self.host.clone_element(prototype, viewport);
                    if let Some(e) = element {
                        self.host.set_enabled(e, false);
                    }
                    self.sticky.element = element;
                }
            }
        }

        self.prepared = true;
        debug!(
            axis = ?self.axis,
            variable = ?self.variable,
            estimated = ?self.estimated,
            navigable = ?self.navigable,
            "dynamic list prepared"
        );
    }

    fn prepare_kind(
        &mut self,
        kind: ElementKind,
        prototype: Option<H::Element>,
        sizing: &ElementSizing<H::Element>,
    ) {
        let in_play = self.active.has(kind);
        let variable = in_play && sizing.vary_in_size;
        let mut state = KindState {
            prototype,
            auto_calculate: variable && sizing.auto_calculate_size,
            estimated: if variable {
                sizing.estimated_size.max(0.0)
            } else {
                0.0
            },
            ..KindState::default()
        };
        self.variable.put(kind, variable);
        self.estimated.put(kind, state.estimated > 0.0);
        if let Some(p) = prototype {
            self.navigable.put(kind, in_play && self.host.is_navigable(p));
            state.extent = self.axis.extent(self.host.canvas_rect(p).size());
            self.host.anchor_to_leading_edge(p, self.axis);
        }
        self.kinds[kind] = state;
    }

    fn is_valid_prototype(&self, element: H::Element) -> bool {
        let list = self.host.list_element();
        element != list && !self.host.is_ancestor(element, list)
    }

    /// Calls [`refresh_content`](Self::refresh_content) if configured to do so.
    ///
    /// Hosts call this once the list and its children are fully set up.
    pub fn activate(&mut self) {
        if self.config.auto_refresh_on_activate {
            self.refresh_content();
        }
    }

    /// Rebuilds the list from the data source.
    ///
    /// Re-reads element and section counts, resizes the content to fit every
    /// element, releases all displayed elements, and fills the viewport again.
    pub fn refresh_content(&mut self) {
        let _span = tracing::debug_span!("refresh_content").entered();
        self.prepare();
        self.resize_content_to_fit_elements();
        self.clear_displayed_elements();
        let keep_at_end = self.any_estimated() && self.content_pivot() == 1.0;
        self.update_element_visibility(keep_at_end);
    }

    /// Appends `count` elements to a list without sections.
    ///
    /// With `scroll_to_end_if_was_at_end`, a list that was showing its end
    /// keeps showing it; otherwise the leading edge holds still.
    pub fn add_elements_to_end(
        &mut self,
        count: usize,
        scroll_to_end_if_was_at_end: bool,
    ) -> Result<(), ListError> {
        self.require_unsectioned("add_elements_to_end")?;
        if count == 0 {
            return Ok(());
        }
        let first_new = self.num_elements;
        self.num_elements += count;

        let size_delta = if self.variable.has(ElementKind::Item) {
            self.cache.extend(count);
            let mut added = 0.0;
            for index in first_new..self.num_elements {
                added += self.resolve_size(index);
            }
            if self.kinds[ElementKind::Item].auto_calculate {
                self.disable_measurement_elements();
            }
            self.cache.average_mut().update(count, added);
            added
        } else {
            count as f64 * self.kinds[ElementKind::Item].extent
        };

        if scroll_to_end_if_was_at_end && self.is_scrolled_to_end() {
            self.adjust_content(size_delta, ScrollAnchor::End);
            if self.is_scrolled_to_end() {
                self.update_element_visibility(true);
            } else {
                self.scroll_content_to_end();
            }
        } else {
            self.adjust_content(size_delta, ScrollAnchor::Beginning);
            self.update_element_visibility(false);
        }
        Ok(())
    }

    /// Removes up to `count` elements from the front of a list without
    /// sections, keeping the remaining elements where they are on screen.
    pub fn remove_elements_from_front(&mut self, count: usize) -> Result<(), ListError> {
        self.require_unsectioned("remove_elements_from_front")?;
        if count > self.num_elements {
            warn!(
                count,
                available = self.num_elements,
                "removing more elements than the list holds"
            );
        }
        let count = count.min(self.num_elements);
        if count == 0 {
            return Ok(());
        }

        let removed = if self.variable.has(ElementKind::Item) {
            let last = count - 1;
            let removed = self.variable_offset(last) + self.variable_size(last);
            self.cache.remove_front(count, removed);
            removed
        } else {
            count as f64 * self.kinds[ElementKind::Item].extent
        };
        self.num_elements -= count;

        self.clear_displayed_elements();
        let size_delta = -removed;
        let scroll_delta = self.scroll_delta(ScrollAnchor::Beginning, size_delta) - size_delta;
        self.apply_adjustment(ContentAdjustment {
            size_delta,
            scroll_delta,
        });
        self.update_element_visibility(false);
        Ok(())
    }

    /// Scrolls so that the trailing edge of the content meets the viewport's.
    pub fn scroll_to_end(&mut self) -> Result<(), ListError> {
        if !self.prepared {
            warn!("scroll_to_end called before the list was prepared");
            return Err(ListError::NotPrepared);
        }
        self.scroll_content_to_end();
        Ok(())
    }

    fn scroll_content_to_end(&mut self) {
        let Some((content, viewport)) = self.content_and_viewport_rects() else {
            return;
        };
        let content_end = self.axis.trailing(content);
        let viewport_end = self.axis.trailing(viewport);
        if content_end > viewport_end {
            self.apply_adjustment(ContentAdjustment {
                size_delta: 0.0,
                scroll_delta: viewport_end - content_end,
            });
            self.update_element_visibility(true);
        }
    }

    fn require_unsectioned(&self, operation: &'static str) -> Result<(), ListError> {
        if !self.prepared {
            warn!(operation, "list has not been prepared for display");
            return Err(ListError::NotPrepared);
        }
        if self.has_sections() {
            warn!(operation, "operation is not supported on lists with sections");
            return Err(ListError::SectionsEnabled);
        }
        Ok(())
    }

    /// Whether the content's trailing edge is inside the viewport.
    #[must_use]
    pub fn is_scrolled_to_end(&self) -> bool {
        self.content_and_viewport_rects()
            .is_some_and(|(c, v)| self.axis.trailing(v) >= self.axis.trailing(c))
    }

    /// Recalculates visibility after the scroll offset started changing.
    pub fn on_scroll_offset_changing(&mut self, offset: Vec2) {
        let _ = offset;
        if self.prepared {
            self.update_element_visibility(false);
        }
    }

    /// Recalculates visibility after the scroll offset changed.
    pub fn on_scroll_offset_changed(&mut self, offset: Vec2) {
        let _ = offset;
        if self.prepared {
            self.update_element_visibility(false);
        }
    }

    /// Recalculates visibility if the viewport changed size.
    ///
    /// `old == new` is treated as the initial notification and also triggers
    /// a recalculation.
    pub fn on_viewport_rect_changed(&mut self, old: Rect, new: Rect) {
        if !self.prepared {
            return;
        }
        let (a, b) = (old.size(), new.size());
        let resized = libm::fabs(a.width - b.width) > VIEWPORT_RESIZE_TOLERANCE
            || libm::fabs(a.height - b.height) > VIEWPORT_RESIZE_TOLERANCE;
        if resized || old == new {
            self.update_element_visibility(false);
        }
    }

    /// Destroys every element the list owns, including its prototypes, and
    /// returns it to the unprepared state.
    pub fn teardown(&mut self) {
        let mut owned: Vec<H::Element> = self.display.drain_all().collect();
        owned.extend(self.sticky.element.take());
        for (_, state) in self.kinds.iter_mut() {
            owned.extend(state.measure_element.take());
            owned.extend(state.prototype.take());
        }
        for element in owned {
            self.host.destroy_element(element);
        }
        self.config.item.prototype = None;
        self.config.header.prototype = None;
        self.sticky = StickyHeader::default();
        self.range = None;
        self.cache.reset(0);
        self.sections = SectionTable::new();
        self.num_elements = 0;
        self.prepared = false;
    }

    /// Resolves `child`, or any of its descendants, to its element index.
    ///
    /// Returns the absolute index for lists without sections and the index
    /// within the section otherwise. Headers and elements that are not
    /// displayed yield `None`.
    #[must_use]
    pub fn element_index_of_child(&self, child: H::Element) -> Option<usize> {
        let immediate = self.immediate_content_child(child)?;
        self.display.by_element(immediate)?.location.item()
    }

    /// Resolves `child`, or any of its descendants, to its section index.
    #[must_use]
    pub fn section_index_of_child(&self, child: H::Element) -> Option<usize> {
        if !self.has_sections() {
            warn!("section_index_of_child called on a list without sections");
            return None;
        }
        let immediate = self.immediate_content_child(child)?;
        self.display.by_element(immediate)?.location.section()
    }

    /// The element displaying `index` in a list without sections.
    #[must_use]
    pub fn child_at_element_index(&self, index: usize) -> Option<H::Element> {
        if self.has_sections() {
            warn!("child_at_element_index called on a list with sections");
            return None;
        }
        self.display.at_index(index).map(|d| d.element)
    }

    /// The element displaying `item` of `section`.
    #[must_use]
    pub fn child_at_section_and_element_index(
        &self,
        section: usize,
        item: usize,
    ) -> Option<H::Element> {
        if !self.has_sections() {
            warn!("child_at_section_and_element_index called on a list without sections");
            return None;
        }
        let index = self
            .sections
            .index_of(ElementLocation::ItemInSection { section, item })?;
        self.display.at_index(index).map(|d| d.element)
    }

    fn immediate_content_child(&self, element: H::Element) -> Option<H::Element> {
        let content = self.host.content()?;
        let mut current = element;
        loop {
            let parent = self.host.parent(current)?;
            if parent == content {
                return Some(current);
            }
            current = parent;
        }
    }

    // Configuration setters. These are refused once the list is prepared.

    fn configure(
        &mut self,
        property: &'static str,
        f: impl FnOnce(&mut ListConfig<H::Element>),
    ) -> Result<(), ListError> {
        if self.prepared {
            warn!(property, "list configuration cannot change after preparation");
            return Err(ListError::AlreadyPrepared);
        }
        f(&mut self.config);
        Ok(())
    }

    /// Sets the item prototype.
    pub fn set_prototype_element(&mut self, prototype: Option<H::Element>) -> Result<(), ListError> {
        self.configure("prototype_element", |c| c.item.prototype = prototype)
    }

    /// Sets whether items vary in size.
    pub fn set_elements_vary_in_size(&mut self, vary: bool) -> Result<(), ListError> {
        self.configure("elements_vary_in_size", |c| c.item.vary_in_size = vary)
    }

    /// Sets whether variable item sizes come from the host's layout.
    pub fn set_auto_calculate_variable_element_size(&mut self, auto: bool) -> Result<(), ListError> {
        self.configure("auto_calculate_element_size", |c| {
            c.item.auto_calculate_size = auto;
        })
    }

    /// Sets the estimated item size. Negative values are clamped to zero.
    pub fn set_estimated_variable_element_size(&mut self, size: f64) -> Result<(), ListError> {
        self.configure("estimated_element_size", |c| {
            c.item.estimated_size = size.max(0.0);
        })
    }

    /// Sets whether items are grouped into sections.
    pub fn set_sections_enabled(&mut self, enabled: bool) -> Result<(), ListError> {
        self.configure("sections_enabled", |c| c.sections_enabled = enabled)
    }

    /// Sets the header prototype.
    pub fn set_prototype_header(&mut self, prototype: Option<H::Element>) -> Result<(), ListError> {
        self.configure("prototype_header", |c| c.header.prototype = prototype)
    }

    /// Sets whether headers stick to the leading edge.
    pub fn set_headers_sticky(&mut self, sticky: bool) -> Result<(), ListError> {
        self.configure("sticky_headers", |c| c.sticky_headers = sticky)
    }

    /// Sets whether headers vary in size.
    pub fn set_headers_vary_in_size(&mut self, vary: bool) -> Result<(), ListError> {
        self.configure("headers_vary_in_size", |c| c.header.vary_in_size = vary)
    }

    /// Sets whether variable header sizes come from the host's layout.
    pub fn set_auto_calculate_variable_header_size(&mut self, auto: bool) -> Result<(), ListError> {
        self.configure("auto_calculate_header_size", |c| {
            c.header.auto_calculate_size = auto;
        })
    }

    /// Sets the estimated header size. Negative values are clamped to zero.
    pub fn set_estimated_variable_header_size(&mut self, size: f64) -> Result<(), ListError> {
        self.configure("estimated_header_size", |c| {
            c.header.estimated_size = size.max(0.0);
        })
    }

    /// Sets whether [`activate`](Self::activate) refreshes the content.
    ///
    /// Unlike the other settings this can change at any time.
    pub fn set_auto_refresh_on_activate(&mut self, auto: bool) {
        self.config.auto_refresh_on_activate = auto;
    }

    // Kind predicates.

    pub(crate) fn has_sections(&self) -> bool {
        self.config.sections_enabled
    }

    pub(crate) fn any_variable(&self) -> bool {
        !self.variable.is_empty()
    }

    pub(crate) fn any_estimated(&self) -> bool {
        !self.estimated.is_empty()
    }

    pub(crate) fn all_estimated(&self) -> bool {
        self.estimated.contains(self.active)
    }

    pub(crate) fn any_navigable(&self) -> bool {
        !self.navigable.is_empty()
    }

    pub(crate) fn all_prototypes_valid(&self) -> bool {
        ElementKind::ALL
            .into_iter()
            .filter(|&kind| self.active.has(kind))
            .all(|kind| self.kinds[kind].prototype.is_some())
    }

    pub(crate) fn sticky_headers_enabled(&self) -> bool {
        self.has_sections() && self.config.sticky_headers && self.sticky.element.is_some()
    }

    // Content geometry.

    fn resize_content_to_fit_elements(&mut self) {
        if !self.all_prototypes_valid() {
            return;
        }
        if self.has_sections() {
            let count = self
                .data
                .num_sections()
                .unwrap_or(self.config.default_num_sections)
                .max(1);
            let default_items = self.config.default_num_elements;
            let data = &self.data;
            self.sections = SectionTable::from_counts(
                (0..count).map(|s| data.num_items_in_section(s).unwrap_or(default_items)),
            );
            self.num_elements = self.sections.element_count();
        } else {
            self.sections = SectionTable::new();
            self.num_elements = self
                .data
                .num_elements()
                .unwrap_or(self.config.default_num_elements);
        }

        let new_extent = if !self.any_variable() {
            self.uniform_total(PerKind::new(
                self.kinds[ElementKind::Item].extent,
                self.kinds[ElementKind::SectionHeader].extent,
            ))
        } else {
            self.cache.reset(self.num_elements);
            let total = if self.all_estimated() {
                self.uniform_total(PerKind::new(
                    self.kinds[ElementKind::Item].estimated,
                    self.kinds[ElementKind::SectionHeader].estimated,
                ))
            } else {
                let mut total = 0.0;
                for index in 0..self.num_elements {
                    total += self.resolve_size(index);
                }
                self.disable_measurement_elements();
                total
            };
            let average = self.cache.average_mut();
            average.reset();
            average.update(self.num_elements, total);
            total
        };
        debug!(
            num_elements = self.num_elements,
            sections = self.sections.len(),
            extent = new_extent,
            "content resized to fit elements"
        );
        self.resize_content(new_extent);
    }

    /// Total extent when every element of a kind has the same size.
    fn uniform_total(&self, per_kind: PerKind<f64>) -> f64 {
        if self.has_sections() {
            self.sections.header_count() as f64 * per_kind[ElementKind::SectionHeader]
                + self.sections.item_count() as f64 * per_kind[ElementKind::Item]
        } else {
            self.num_elements as f64 * per_kind[ElementKind::Item]
        }
    }

    fn resize_content(&mut self, extent: f64) {
        let Some(content) = self.host.content() else {
            return;
        };
        let current = self.axis.extent(self.host.canvas_rect(content).size());
        if current != extent {
            self.host.resize_element(content, self.axis, extent);
        }
    }

    pub(crate) fn clear_displayed_elements(&mut self) {
        self.display.release_all(&mut self.host);
        self.range = None;
    }

    pub(crate) fn content_and_viewport_rects(&self) -> Option<(Rect, Rect)> {
        let content = self.host.content()?;
        let viewport = self.host.parent(content)?;
        Some((
            self.host.canvas_rect(content),
            self.host.canvas_rect(viewport),
        ))
    }

    /// Extent of the viewport along the scroll axis.
    pub(crate) fn visible_area_extent(&self) -> f64 {
        self.content_and_viewport_rects()
            .map_or(0.0, |(_, v)| self.axis.extent(v.size()))
    }

    fn content_pivot(&self) -> f64 {
        self.host
            .content()
            .map_or(0.0, |c| self.axis.component(self.host.pivot(c)))
    }

    /// Scroll delta keeping `anchor` still when the content changes by
    /// `size_delta`.
    pub(crate) fn scroll_delta(&self, anchor: ScrollAnchor, size_delta: f64) -> f64 {
        anchor.scroll_delta(size_delta, self.content_pivot())
    }

    fn adjust_content(&mut self, size_delta: f64, anchor: ScrollAnchor) {
        let adjustment = ContentAdjustment::anchored(size_delta, anchor, self.content_pivot());
        self.apply_adjustment(adjustment);
    }

    pub(crate) fn apply_adjustment(&mut self, adjustment: ContentAdjustment) {
        if adjustment.is_noop() {
            return;
        }
        let Some(content) = self.host.content() else {
            return;
        };
        let mut size = self.host.canvas_rect(content).size();
        if adjustment.size_delta != 0.0 {
            size = self
                .axis
                .with_extent(size, self.axis.extent(size) + adjustment.size_delta);
        }
        let mut offset = self.host.scroll_offset();
        if adjustment.scroll_delta != 0.0 {
            offset = self.axis.offset_component(offset, adjustment.scroll_delta);
        }
        self.host.change_content_size_and_scroll_offset(size, offset);
    }

    // Notification dispatch.

    pub(crate) fn notify_becoming_visible(&mut self, element: H::Element, location: ElementLocation) {
        let host = &mut self.host;
        match location {
            ElementLocation::Item(index) => {
                self.notifications
                    .element_becoming_visible(host, element, index);
            }
            ElementLocation::ItemInSection { section, item } => {
                self.notifications
                    .item_in_section_becoming_visible(host, element, section, item);
            }
            ElementLocation::SectionHeader { section } => {
                self.notifications
                    .section_header_becoming_visible(host, element, section);
            }
        }
    }

    pub(crate) fn notify_prepare_for_measurement(
        &mut self,
        element: H::Element,
        location: ElementLocation,
    ) {
        let host = &mut self.host;
        match location {
            ElementLocation::Item(index) => {
                self.notifications
                    .prepare_element_for_size_calculation(host, element, index);
            }
            ElementLocation::ItemInSection { section, item } => {
                self.notifications
                    .prepare_item_in_section_for_size_calculation(host, element, section, item);
            }
            ElementLocation::SectionHeader { section } => {
                self.notifications
                    .prepare_section_header_for_size_calculation(host, element, section);
            }
        }
    }
}
