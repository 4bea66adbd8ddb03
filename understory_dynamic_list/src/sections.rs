// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Section table and element index mapping.
//!
//! A sectioned list is a flat run of elements where every section starts with
//! its header, followed by its items. [`SectionTable`] converts between
//! absolute element indices and [`ElementLocation`]s. All functions here are
//! pure queries over the table.

use alloc::vec::Vec;

use crate::kind::ElementKind;

/// Describes one section of a sectioned list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Section {
    /// Position of the section in the table.
    pub index: usize,
    /// Number of items following the header.
    pub item_count: usize,
    /// Absolute element index of the header.
    pub header_index: usize,
}

impl Section {
    /// Absolute index of the last element in this section.
    #[must_use]
    pub const fn last_index(&self) -> usize {
        self.header_index + self.item_count
    }
}

/// Where an absolute element index lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementLocation {
    /// An element of a list without sections.
    Item(usize),
    /// An item inside a section.
    ItemInSection {
        /// Section index.
        section: usize,
        /// Item index within the section.
        item: usize,
    },
    /// The header of a section.
    SectionHeader {
        /// Section index.
        section: usize,
    },
}

impl ElementLocation {
    /// The structural kind at this location.
    #[must_use]
    pub const fn kind(self) -> ElementKind {
        match self {
            Self::Item(_) | Self::ItemInSection { .. } => ElementKind::Item,
            Self::SectionHeader { .. } => ElementKind::SectionHeader,
        }
    }

    /// The section index, if the location belongs to a section.
    #[must_use]
    pub const fn section(self) -> Option<usize> {
        match self {
            Self::Item(_) => None,
            Self::ItemInSection { section, .. } | Self::SectionHeader { section } => Some(section),
        }
    }

    /// The item index: the absolute index without sections, the index within
    /// the section otherwise, and `None` for headers.
    #[must_use]
    pub const fn item(self) -> Option<usize> {
        match self {
            Self::Item(index) => Some(index),
            Self::ItemInSection { item, .. } => Some(item),
            Self::SectionHeader { .. } => None,
        }
    }
}

/// Ordered, contiguous sections.
///
/// An empty table describes a list without sections, where every element is
/// an [`ElementKind::Item`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SectionTable {
    sections: Vec<Section>,
}

impl SectionTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    /// Builds a table from per-section item counts.
    pub fn from_counts(counts: impl IntoIterator<Item = usize>) -> Self {
        let mut header_index = 0;
        let sections = counts
            .into_iter()
            .enumerate()
            .map(|(index, item_count)| {
                let section = Section {
                    index,
                    item_count,
                    header_index,
                };
                header_index += 1 + item_count;
                section
            })
            .collect();
        Self { sections }
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns `true` if there are no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// All sections in order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Returns the section at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    /// Total number of elements, headers included.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.sections.last().map_or(0, |s| s.last_index() + 1)
    }

    /// Number of headers in the table.
    #[must_use]
    pub fn header_count(&self) -> usize {
        self.sections.len()
    }

    /// Number of items across all sections.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.item_count).sum()
    }

    /// Returns the header index of `section`.
    #[must_use]
    pub fn header_index(&self, section: usize) -> Option<usize> {
        self.sections.get(section).map(|s| s.header_index)
    }

    /// Returns the kind of the element at `index`.
    #[must_use]
    pub fn kind_at(&self, index: usize) -> ElementKind {
        if self
            .sections
            .binary_search_by_key(&index, |s| s.header_index)
            .is_ok()
        {
            ElementKind::SectionHeader
        } else {
            ElementKind::Item
        }
    }

    /// Returns where `index` lives.
    ///
    /// Without sections every index maps to [`ElementLocation::Item`]. With
    /// sections, indices past the last element return `None`.
    #[must_use]
    pub fn locate(&self, index: usize) -> Option<ElementLocation> {
        if self.sections.is_empty() {
            return Some(ElementLocation::Item(index));
        }
        let pos = self.sections.partition_point(|s| s.last_index() < index);
        let section = self.sections.get(pos)?;
        Some(if index == section.header_index {
            ElementLocation::SectionHeader { section: pos }
        } else {
            ElementLocation::ItemInSection {
                section: pos,
                item: index - section.header_index - 1,
            }
        })
    }

    /// Inverse of [`locate`](Self::locate).
    #[must_use]
    pub fn index_of(&self, location: ElementLocation) -> Option<usize> {
        match location {
            ElementLocation::Item(index) => self.sections.is_empty().then_some(index),
            ElementLocation::ItemInSection { section, item } => {
                let s = self.sections.get(section)?;
                (item < s.item_count).then_some(s.header_index + 1 + item)
            }
            ElementLocation::SectionHeader { section } => self.header_index(section),
        }
    }

    /// Offset of `index` when every header is `header_extent` long and every
    /// item `item_extent` long.
    #[must_use]
    pub fn fixed_offset(&self, index: usize, header_extent: f64, item_extent: f64) -> f64 {
        if self.sections.is_empty() {
            return 0.0;
        }
        let headers = self.sections.partition_point(|s| s.header_index < index);
        let items = index - headers;
        headers as f64 * header_extent + items as f64 * item_extent
    }

    /// Finds the first header in `first..=last` other than `exclude`.
    #[must_use]
    pub fn first_header_in(&self, first: usize, last: usize, exclude: usize) -> Option<usize> {
        let start = self.sections.partition_point(|s| s.header_index < first);
        self.sections[start..]
            .iter()
            .map(|s| s.header_index)
            .take_while(|&h| h <= last)
            .find(|&h| h != exclude)
    }
}
