// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element size and offset resolution.
//!
//! Fixed-size kinds always report their prototype's extent. Variable-size
//! kinds report a measured size once one is cached, their estimate before
//! that, and are measured on demand when they have no estimate. Measuring goes
//! through the data source, or through a dedicated measurement element when
//! the kind auto-calculates its size.

use tracing::{error, trace, warn};

use crate::DynamicList;
use crate::host::{ElementNotifications, ListDataSource, ListHost};
use crate::kind::{ElementKind, PerKind};
use crate::sections::ElementLocation;

impl<H, D, N> DynamicList<H, D, N>
where
    H: ListHost,
    D: ListDataSource,
    N: ElementNotifications<H>,
{
    /// Size of the element at `index` along the scroll axis.
    ///
    /// Variable-size elements that have not been measured report their
    /// estimate. Out-of-range indices report zero.
    #[must_use]
    pub fn element_size(&self, index: usize) -> f64 {
        if index >= self.num_elements {
            warn!(index, len = self.num_elements, "element index out of range");
            return 0.0;
        }
        let kind = self.sections.kind_at(index);
        if self.variable.has(kind) {
            self.variable_size(index)
        } else {
            self.kinds[kind].extent
        }
    }

    /// Offset of the leading edge of the element at `index` within the content.
    ///
    /// Out-of-range indices report zero.
    #[must_use]
    pub fn element_offset(&self, index: usize) -> f64 {
        if index >= self.num_elements {
            warn!(index, len = self.num_elements, "element index out of range");
            return 0.0;
        }
        if self.any_variable() {
            self.variable_offset(index)
        } else {
            self.fixed_offset(index)
        }
    }

    pub(crate) fn fixed_offset(&self, index: usize) -> f64 {
        let item = self.kinds[ElementKind::Item].extent;
        if self.has_sections() {
            let header = self.kinds[ElementKind::SectionHeader].extent;
            self.sections.fixed_offset(index, header, item)
        } else {
            index as f64 * item
        }
    }

    pub(crate) fn variable_offset(&self, index: usize) -> f64 {
        self.cache.offset(index, &self.sections, &self.estimates())
    }

    fn estimates(&self) -> PerKind<f64> {
        PerKind::new(
            self.kinds[ElementKind::Item].estimated,
            self.kinds[ElementKind::SectionHeader].estimated,
        )
    }

    /// Cached size, else the estimate.
    pub(crate) fn variable_size(&self, index: usize) -> f64 {
        if let Some(size) = self.cache.size(index) {
            return size;
        }
        let estimated = self.kinds[self.sections.kind_at(index)].estimated;
        if estimated > 0.0 {
            return estimated;
        }
        error!(index, "element size requested before it was measured");
        0.0
    }

    /// Size of `index`, caching it unless it is only an estimate.
    pub(crate) fn resolve_size(&mut self, index: usize) -> f64 {
        if index >= self.num_elements {
            warn!(index, len = self.num_elements, "element index out of range");
            return 0.0;
        }
        if let Some(size) = self.cache.size(index) {
            return size;
        }
        let kind = self.sections.kind_at(index);
        if !self.variable.has(kind) {
            let size = self.kinds[kind].extent;
            self.cache.set_size(index, size);
            let end = self.variable_offset(index) + size;
            self.cache.set_accumulated(index, end);
            size
        } else if self.kinds[kind].estimated > 0.0 {
            self.kinds[kind].estimated
        } else {
            let size = self.measure(index);
            let end = self.variable_offset(index) + size;
            self.cache.set_accumulated(index, end);
            size
        }
    }

    /// Measures `index` and caches its size.
    ///
    /// Does not touch the accumulated size; callers decide how the change
    /// propagates.
    pub(crate) fn measure(&mut self, index: usize) -> f64 {
        let Some(location) = self.sections.locate(index) else {
            warn!(index, "cannot measure an element outside every section");
            return 0.0;
        };
        let kind = location.kind();
        let axis = self.axis;
        let size = if !self.kinds[kind].auto_calculate {
            match location {
                ElementLocation::Item(i) => self.data.element_extent(i, axis),
                ElementLocation::ItemInSection { section, item } => {
                    self.data.item_in_section_extent(section, item, axis)
                }
                ElementLocation::SectionHeader { section } => {
                    self.data.section_header_extent(section, axis)
                }
            }
        } else if let Some(element) = self.measurement_element(kind) {
            self.notify_prepare_for_measurement(element, location);
            self.host.layout_target_extent(element, axis)
        } else {
            warn!(?kind, "no element available to calculate a size with");
            0.0
        };
        let size = size.max(0.0);
        trace!(index, size, "element measured");
        self.cache.set_size(index, size);
        size
    }

    /// The enabled measurement element for `kind`, cloned on first use.
    fn measurement_element(&mut self, kind: ElementKind) -> Option<H::Element> {
        if let Some(element) = self.kinds[kind].measure_element {
            self.host.set_enabled(element, true);
            return Some(element);
        }
        let content = self.host.content()?;
        let prototype = self.kinds[kind].prototype?;
        let element = self.host.clone_element(prototype, content)?;
        self.kinds[kind].measure_element = Some(element);
        Some(element)
    }

    pub(crate) fn disable_measurement_elements(&mut self) {
        for kind in ElementKind::ALL {
            if let Some(element) = self.kinds[kind].measure_element {
                self.host.set_enabled(element, false);
            }
        }
    }

    /// Resizes a displayed element to the size of `index`.
    pub(crate) fn size_element(&mut self, element: H::Element, index: usize) {
        let current = self.axis.extent(self.host.canvas_rect(element).size());
        let size = self.variable_size(index);
        if current != size {
            self.host.resize_element(element, self.axis, size);
        }
    }

    /// Moves a displayed element to the offset of `index`.
    pub(crate) fn position_element(&mut self, element: H::Element, index: usize) {
        let offset = self.element_offset(index);
        self.host.set_leading_offset(element, self.axis, offset);
    }
}
