// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-based invariant tests for `understory_dynamic_list`.
//!
//! These hold for any element count, element sizes, viewport, and sequence of
//! scroll positions:
//!
//! 1. Displayed indices form one sorted, contiguous run.
//! 2. Every visible element of a fixed-size list touches the viewport.
//! 3. Every clone is either displayed or pooled, never both.
//! 4. Repeating an update changes nothing.
//! 5. With estimates, the content extent is the sum of all element sizes and
//!    offsets are their prefix sums.
//! 6. Displayed elements of a sectioned list carry the kind of their index.
//! 7. When estimates match the real sizes, a variable-size list shows exactly
//!    what the equivalent fixed-size list shows, navigation included.
//! 8. Sectioned lists with estimates keep offsets as prefix sums, keep
//!    displayed elements where their offsets say, and never push the sticky
//!    header past its pin.

use kurbo::Size;
use proptest::prelude::*;
use understory_dynamic_list::{
    Axis, DynamicList, ElementId, ElementKind, ElementLocation, ElementSizing, HeadlessHost,
    ListConfig, ListDataSource, ListHost, StickyState,
};

// ── Helpers ─────────────────────────────────────────────────────────────

const VIEWPORT_WIDTH: f64 = 80.0;

/// Per-index extents.
struct Extents {
    extents: Vec<f64>,
}

impl ListDataSource for Extents {
    fn num_elements(&self) -> Option<usize> {
        Some(self.extents.len())
    }

    fn element_extent(&self, index: usize, _axis: Axis) -> f64 {
        self.extents.get(index).copied().unwrap_or(0.0)
    }
}

/// Sections with the given item counts.
struct Counts(Vec<usize>);

impl ListDataSource for Counts {
    fn num_sections(&self) -> Option<usize> {
        Some(self.0.len())
    }

    fn num_items_in_section(&self, section: usize) -> Option<usize> {
        self.0.get(section).copied()
    }
}

/// A list in a `viewport` tall scroll box whose row prototype is
/// `row_extent` tall.
fn build(
    viewport: f64,
    row_extent: f64,
    extents: Vec<f64>,
    config: impl FnOnce(ElementId) -> ListConfig<ElementId>,
) -> DynamicList<HeadlessHost, Extents> {
    let mut host = HeadlessHost::vertical(Size::new(VIEWPORT_WIDTH, viewport));
    let content = host.content().unwrap();
    let row = host.insert(content, Size::new(VIEWPORT_WIDTH, row_extent));
    DynamicList::new(host, Extents { extents }, (), config(row))
}

/// Scrolls to `fraction` of the scrollable range, in whole units.
fn scroll_to_fraction<D: ListDataSource>(list: &mut DynamicList<HeadlessHost, D>, fraction: f64) {
    let viewport = list.host().extent(list.host().viewport());
    let range = (list.host().content_extent() - viewport).max(0.0);
    let position = -(range * fraction).round();
    list.host_mut().set_scroll_position(position);
    let offset = list.host().scroll_offset();
    list.on_scroll_offset_changed(offset);
}

/// Sections whose headers and items all share one extent per kind.
struct Uniform {
    counts: Vec<usize>,
    header: f64,
    item: f64,
}

impl ListDataSource for Uniform {
    fn num_elements(&self) -> Option<usize> {
        Some(self.counts.len() + self.counts.iter().sum::<usize>())
    }

    fn num_sections(&self) -> Option<usize> {
        Some(self.counts.len())
    }

    fn num_items_in_section(&self, section: usize) -> Option<usize> {
        self.counts.get(section).copied()
    }

    fn element_extent(&self, _index: usize, _axis: Axis) -> f64 {
        self.item
    }

    fn item_in_section_extent(&self, _section: usize, _item: usize, _axis: Axis) -> f64 {
        self.item
    }

    fn section_header_extent(&self, _section: usize, _axis: Axis) -> f64 {
        self.header
    }
}

/// Sections whose extents vary with position, shifted by `salt`.
struct Varied {
    counts: Vec<usize>,
    salt: usize,
}

impl Varied {
    fn header(&self, section: usize) -> f64 {
        (4 + (section * 7 + self.salt) % 9) as f64
    }

    fn item(&self, section: usize, item: usize) -> f64 {
        (1 + (section * 3 + item * 5 + self.salt) % 13) as f64
    }
}

impl ListDataSource for Varied {
    fn num_sections(&self) -> Option<usize> {
        Some(self.counts.len())
    }

    fn num_items_in_section(&self, section: usize) -> Option<usize> {
        self.counts.get(section).copied()
    }

    fn item_in_section_extent(&self, section: usize, item: usize, _axis: Axis) -> f64 {
        self.item(section, item)
    }

    fn section_header_extent(&self, section: usize, _axis: Axis) -> f64 {
        self.header(section)
    }
}

/// How section headers are sized.
#[derive(Clone, Copy, Debug)]
enum HeaderSizing {
    Fixed,
    Estimated,
    MeasuredUpFront,
}

fn header_sizing_strategy() -> impl Strategy<Value = HeaderSizing> {
    prop_oneof![
        Just(HeaderSizing::Fixed),
        Just(HeaderSizing::Estimated),
        Just(HeaderSizing::MeasuredUpFront),
    ]
}

/// Prototypes for a sectioned list: `(host, item, header)`.
fn section_host(
    viewport: f64,
    item_extent: f64,
    header_extent: f64,
    item_navigable: bool,
    header_navigable: bool,
) -> (HeadlessHost, ElementId, ElementId) {
    let mut host = HeadlessHost::vertical(Size::new(VIEWPORT_WIDTH, viewport));
    let content = host.content().unwrap();
    let item = host.insert(content, Size::new(VIEWPORT_WIDTH, item_extent));
    let header = host.insert(content, Size::new(VIEWPORT_WIDTH, header_extent));
    host.set_navigable(item, item_navigable);
    host.set_navigable(header, header_navigable);
    (host, item, header)
}

/// Scrolls to `fraction` of the scrollable range, half a unit off any element
/// boundary.
fn scroll_between_units<D: ListDataSource>(list: &mut DynamicList<HeadlessHost, D>, fraction: f64) {
    let viewport = list.host().extent(list.host().viewport());
    let range = (list.host().content_extent() - viewport).max(0.0);
    let position = -((range * fraction).round() + 0.5);
    list.host_mut().set_scroll_position(position);
    let offset = list.host().scroll_offset();
    list.on_scroll_offset_changed(offset);
}

fn assert_contiguous<D: ListDataSource>(list: &DynamicList<HeadlessHost, D>) -> Result<(), TestCaseError> {
    let indices: Vec<usize> = list.displayed_elements().map(|d| d.index).collect();
    for pair in indices.windows(2) {
        prop_assert_eq!(pair[0] + 1, pair[1], "displayed run has a gap: {:?}", indices);
    }
    if let Some(range) = list.visible_range() {
        prop_assert!(range.first_displayed <= range.first_visible);
        prop_assert!(range.first_visible <= range.last_visible);
        prop_assert!(range.last_visible <= range.last_displayed);
        prop_assert!(range.last_displayed < list.num_elements());
        prop_assert_eq!(indices.first().copied(), Some(range.first_displayed));
        prop_assert_eq!(indices.last().copied(), Some(range.last_displayed));
    } else {
        prop_assert!(indices.is_empty());
    }
    Ok(())
}

fn assert_pools_exclusive<D: ListDataSource>(list: &DynamicList<HeadlessHost, D>) -> Result<(), TestCaseError> {
    let pooled = list.pooled_elements(ElementKind::Item);
    for element in pooled {
        prop_assert!(!list.host().is_enabled(*element));
        prop_assert!(list.displayed_elements().all(|d| d.element != *element));
    }
    prop_assert_eq!(
        list.displayed_elements().count() + pooled.len(),
        list.host().clone_count()
    );
    Ok(())
}

fn extents_strategy() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec((1u32..=40).prop_map(f64::from), 1..=120)
}

// ═════════════════════════════════════════════════════════════════════════
// 1-4. Fixed-size lists
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn fixed_lists_show_exactly_what_touches_the_viewport(
        count in 1usize..=300,
        extent in (1u32..=50).prop_map(f64::from),
        viewport in (10u32..=300).prop_map(f64::from),
        fractions in proptest::collection::vec(0.0f64..=1.0, 1..=8),
    ) {
        let mut list = build(viewport, extent, vec![extent; count], ListConfig::items);
        list.refresh_content();
        prop_assert_eq!(list.host().content_extent(), extent * count as f64);

        for fraction in fractions {
            scroll_to_fraction(&mut list, fraction);
            assert_contiguous(&list)?;
            assert_pools_exclusive(&list)?;

            let range = list.visible_range().unwrap();
            for index in range.visible() {
                let element = list.child_at_element_index(index).unwrap();
                let rect = list.host().canvas_rect(element);
                prop_assert!(rect.y1 >= 0.0 && rect.y0 <= viewport, "{index} at {rect:?}");
            }

            let before: Vec<_> = list.displayed_elements().copied().collect();
            let clones = list.host().clone_count();
            let offset = list.host().scroll_offset();
            list.on_scroll_offset_changed(offset);
            let after: Vec<_> = list.displayed_elements().copied().collect();
            prop_assert_eq!(before, after);
            prop_assert_eq!(list.host().clone_count(), clones);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Estimated sizes
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn estimated_lists_conserve_size(
        extents in extents_strategy(),
        estimate in (1u32..=40).prop_map(f64::from),
        viewport in (20u32..=200).prop_map(f64::from),
        fractions in proptest::collection::vec(0.0f64..=1.0, 1..=8),
    ) {
        let len = extents.len();
        let mut list = build(viewport, 16.0, extents.clone(), |row| ListConfig {
            item: ElementSizing::fixed(row).variable(false, estimate),
            ..ListConfig::default()
        });
        list.refresh_content();

        for fraction in fractions {
            scroll_to_fraction(&mut list, fraction);
            assert_contiguous(&list)?;

            let mut prefix = 0.0;
            for index in 0..len {
                prop_assert_eq!(list.element_offset(index), prefix, "offset of {}", index);
                let size = list.element_size(index);
                if list.size_cache().size(index).is_some() {
                    prop_assert_eq!(size, extents[index]);
                } else {
                    prop_assert_eq!(size, estimate);
                }
                prefix += size;
            }
            prop_assert_eq!(list.host().content_extent(), prefix);

            for d in list.displayed_elements() {
                prop_assert!(list.size_cache().size(d.index).is_some());
                prop_assert_eq!(list.host().extent(d.element), extents[d.index]);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Sections
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn sectioned_lists_display_matching_kinds(
        counts in proptest::collection::vec(0usize..=6, 1..=12),
        viewport in (8u32..=60).prop_map(f64::from),
        fraction in 0.0f64..=1.0,
    ) {
        let mut host = HeadlessHost::vertical(Size::new(VIEWPORT_WIDTH, viewport));
        let content = host.content().unwrap();
        let item = host.insert(content, Size::new(VIEWPORT_WIDTH, 4.0));
        let header = host.insert(content, Size::new(VIEWPORT_WIDTH, 7.0));
        let config = ListConfig::items(item).with_sections(header, false);
        let expected = counts.len() + counts.iter().sum::<usize>();
        let mut list = DynamicList::new(host, Counts(counts), (), config);
        list.refresh_content();
        prop_assert_eq!(list.num_elements(), expected);

        scroll_to_fraction(&mut list, fraction);
        assert_contiguous(&list)?;
        for d in list.displayed_elements() {
            prop_assert_eq!(d.kind(), list.sections().kind_at(d.index));
            prop_assert_eq!(list.element_location(d.index), Some(d.location));
            prop_assert_eq!(list.host().leading_offset(d.element), list.element_offset(d.index));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Estimates that match the real sizes
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn matching_estimates_show_what_fixed_sizes_show(
        counts in proptest::collection::vec(0usize..=6, 1..=10),
        sectioned in any::<bool>(),
        item in (1u32..=12).prop_map(f64::from),
        header in (1u32..=12).prop_map(f64::from),
        header_sizing in header_sizing_strategy(),
        item_navigable in any::<bool>(),
        header_navigable in any::<bool>(),
        sticky in any::<bool>(),
        viewport in (5u32..=60).prop_map(f64::from),
        fractions in proptest::collection::vec(0.0f64..=1.0, 1..=6),
    ) {
        let make = |variable: bool| {
            let (host, item_proto, header_proto) =
                section_host(viewport, item, header, item_navigable, header_navigable);
            let mut config = ListConfig::items(item_proto);
            if sectioned {
                config = config.with_sections(header_proto, sticky);
            }
            if variable {
                config.item = config.item.variable(false, item);
                config.header = match header_sizing {
                    HeaderSizing::Fixed => config.header,
                    HeaderSizing::Estimated => config.header.variable(false, header),
                    HeaderSizing::MeasuredUpFront => config.header.variable(false, 0.0),
                };
            }
            let data = Uniform { counts: counts.clone(), header, item };
            let mut list = DynamicList::new(host, data, (), config);
            list.refresh_content();
            list
        };
        let mut fixed = make(false);
        let mut variable = make(true);

        prop_assert_eq!(variable.host().content_extent(), fixed.host().content_extent());
        prop_assert_eq!(variable.visible_range(), fixed.visible_range());

        for fraction in fractions {
            scroll_between_units(&mut fixed, fraction);
            scroll_between_units(&mut variable, fraction);
            assert_contiguous(&variable)?;
            prop_assert_eq!(variable.visible_range(), fixed.visible_range(), "at {}", fraction);
            prop_assert_eq!(variable.host().scroll_position(), fixed.host().scroll_position());
            prop_assert_eq!(variable.host().content_extent(), fixed.host().content_extent());

            let before: Vec<_> = variable.displayed_elements().copied().collect();
            let clones = variable.host().clone_count();
            let offset = variable.host().scroll_offset();
            variable.on_scroll_offset_changed(offset);
            let after: Vec<_> = variable.displayed_elements().copied().collect();
            prop_assert_eq!(before, after);
            prop_assert_eq!(variable.host().clone_count(), clones);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Sectioned lists with estimates
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn sectioned_estimates_conserve_size_and_pin_headers(
        counts in proptest::collection::vec(0usize..=6, 1..=10),
        salt in 0usize..50,
        item_estimate in (1u32..=12).prop_map(f64::from),
        header_estimate in (1u32..=12).prop_map(f64::from),
        header_sizing in header_sizing_strategy(),
        item_navigable in any::<bool>(),
        header_navigable in any::<bool>(),
        sticky in any::<bool>(),
        viewport in (10u32..=60).prop_map(f64::from),
        fractions in proptest::collection::vec(0.0f64..=1.0, 1..=8),
    ) {
        const HEADER_PROTOTYPE: f64 = 6.0;
        let (host, item, header) =
            section_host(viewport, 3.0, HEADER_PROTOTYPE, item_navigable, header_navigable);
        let mut config = ListConfig::items(item).with_sections(header, sticky);
        config.item = config.item.variable(false, item_estimate);
        config.header = match header_sizing {
            HeaderSizing::Fixed => config.header,
            HeaderSizing::Estimated => config.header.variable(false, header_estimate),
            HeaderSizing::MeasuredUpFront => config.header.variable(false, 0.0),
        };
        let data = Varied { counts, salt };
        let mut list = DynamicList::new(host, data, (), config);
        list.refresh_content();

        // Size an element really has once measured.
        let real_size = |list: &DynamicList<HeadlessHost, Varied>, index: usize| {
            match list.element_location(index) {
                Some(ElementLocation::SectionHeader { section }) => {
                    match header_sizing {
                        HeaderSizing::Fixed => HEADER_PROTOTYPE,
                        _ => list.data().header(section),
                    }
                }
                Some(ElementLocation::ItemInSection { section, item }) => {
                    list.data().item(section, item)
                }
                _ => 0.0,
            }
        };

        for fraction in fractions {
            scroll_between_units(&mut list, fraction);
            assert_contiguous(&list)?;

            let mut prefix = 0.0;
            for index in 0..list.num_elements() {
                prop_assert_eq!(list.element_offset(index), prefix, "offset of {}", index);
                let size = list.element_size(index);
                if list.size_cache().size(index).is_some() {
                    prop_assert_eq!(size, real_size(&list, index), "size of {}", index);
                }
                prefix += size;
            }
            prop_assert_eq!(list.host().content_extent(), prefix);

            for d in list.displayed_elements() {
                prop_assert_eq!(d.kind(), list.sections().kind_at(d.index));
                prop_assert_eq!(list.host().extent(d.element), real_size(&list, d.index));
                prop_assert_eq!(list.host().leading_offset(d.element), list.element_offset(d.index));
            }

            if let StickyState::Pinned { section, header_index } = list.sticky_state() {
                prop_assert!(sticky);
                let first = list.visible_range().unwrap().first_visible;
                let location = list.element_location(first).unwrap();
                prop_assert_eq!(location.section(), Some(section));
                prop_assert_eq!(list.sections().header_index(section), Some(header_index));

                let element = list.sticky_header_element().unwrap();
                let extent = list.host().extent(element);
                let offset = list.host().leading_offset(element);
                prop_assert_eq!(extent, real_size(&list, header_index));
                prop_assert!(offset <= 0.0, "pinned header moved down to {}", offset);
                prop_assert!(offset >= -extent, "pinned header pushed out to {}", offset);
            }
        }
    }
}
