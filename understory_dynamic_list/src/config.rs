// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! List configuration.

/// How elements of one kind are produced and sized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementSizing<E> {
    /// Template element cloned for every displayed element of this kind.
    pub prototype: Option<E>,
    /// Whether elements of this kind may differ in size.
    ///
    /// When `false`, every element uses the prototype's extent.
    pub vary_in_size: bool,
    /// Whether variable sizes come from the host's layout system rather than
    /// from the data source.
    pub auto_calculate_size: bool,
    /// Size assumed for elements that have not been measured yet.
    ///
    /// Zero means every element is measured up front.
    pub estimated_size: f64,
}

impl<E> Default for ElementSizing<E> {
    fn default() -> Self {
        Self {
            prototype: None,
            vary_in_size: false,
            auto_calculate_size: true,
            estimated_size: 0.0,
        }
    }
}

impl<E> ElementSizing<E> {
    /// Creates a fixed-size configuration for `prototype`.
    #[must_use]
    pub fn fixed(prototype: E) -> Self {
        Self {
            prototype: Some(prototype),
            ..Self::default()
        }
    }

    /// Marks the kind as varying in size, with an optional estimate.
    #[must_use]
    pub fn variable(mut self, auto_calculate_size: bool, estimated_size: f64) -> Self {
        self.vary_in_size = true;
        self.auto_calculate_size = auto_calculate_size;
        self.estimated_size = estimated_size.max(0.0);
        self
    }
}

/// Configuration of a [`DynamicList`](crate::DynamicList).
///
/// Everything except [`auto_refresh_on_activate`](Self::auto_refresh_on_activate)
/// is frozen once the list has been prepared for display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ListConfig<E> {
    /// Whether [`DynamicList::activate`](crate::DynamicList::activate)
    /// refreshes the content.
    pub auto_refresh_on_activate: bool,
    /// Element count used when the data source does not provide one.
    ///
    /// With sections, this is the per-section item count fallback.
    pub default_num_elements: usize,
    /// Item prototype and sizing.
    pub item: ElementSizing<E>,
    /// Whether items are grouped into sections with headers.
    pub sections_enabled: bool,
    /// Section count used when the data source does not provide one.
    pub default_num_sections: usize,
    /// Whether the current section's header stays pinned to the leading edge.
    pub sticky_headers: bool,
    /// Header prototype and sizing. Ignored without sections.
    pub header: ElementSizing<E>,
}

impl<E> Default for ListConfig<E> {
    fn default() -> Self {
        Self {
            auto_refresh_on_activate: true,
            default_num_elements: 0,
            item: ElementSizing::default(),
            sections_enabled: false,
            default_num_sections: 1,
            sticky_headers: false,
            header: ElementSizing::default(),
        }
    }
}

impl<E> ListConfig<E> {
    /// A list of items built from `prototype`.
    #[must_use]
    pub fn items(prototype: E) -> Self {
        Self {
            item: ElementSizing::fixed(prototype),
            ..Self::default()
        }
    }

    /// Enables sections, with headers built from `prototype`.
    #[must_use]
    pub fn with_sections(mut self, prototype: E, sticky_headers: bool) -> Self {
        self.sections_enabled = true;
        self.sticky_headers = sticky_headers;
        self.header.prototype = Some(prototype);
        self
    }
}
