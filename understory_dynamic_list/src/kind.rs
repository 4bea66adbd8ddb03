// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element kinds and per-kind storage.

use core::ops::{Index, IndexMut};

/// The structural kind of an element.
///
/// Kinds are not stored per element; they are derived from the section table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A regular list entry.
    Item,
    /// The first element of a section.
    SectionHeader,
}

impl ElementKind {
    /// All kinds, in storage order.
    pub const ALL: [Self; 2] = [Self::Item, Self::SectionHeader];

    const fn slot(self) -> usize {
        match self {
            Self::Item => 0,
            Self::SectionHeader => 1,
        }
    }
}

bitflags::bitflags! {
    /// A set of [`ElementKind`]s.
    ///
    /// Used to record which kinds vary in size, carry an estimate, or can take
    /// navigation focus once the list has been prepared.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KindSet: u8 {
        /// Regular items.
        const ITEM = 1 << 0;
        /// Section headers.
        const SECTION_HEADER = 1 << 1;
    }
}

impl Default for KindSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<ElementKind> for KindSet {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Item => Self::ITEM,
            ElementKind::SectionHeader => Self::SECTION_HEADER,
        }
    }
}

impl KindSet {
    /// Returns `true` if `kind` is a member of this set.
    #[must_use]
    pub fn has(self, kind: ElementKind) -> bool {
        self.contains(kind.into())
    }

    /// Adds or removes `kind`.
    pub fn put(&mut self, kind: ElementKind, value: bool) {
        self.set(kind.into(), value);
    }
}

/// One value per [`ElementKind`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PerKind<T>([T; 2]);

impl<T> PerKind<T> {
    /// Creates storage from the item and header values.
    pub const fn new(item: T, header: T) -> Self {
        Self([item, header])
    }

    /// Consumes the storage, returning `[item, header]`.
    pub fn into_array(self) -> [T; 2] {
        self.0
    }

    /// Iterates `(kind, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (ElementKind, &T)> {
        ElementKind::ALL.into_iter().zip(self.0.iter())
    }

    /// Iterates `(kind, value)` pairs mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ElementKind, &mut T)> {
        ElementKind::ALL.into_iter().zip(self.0.iter_mut())
    }
}

impl<T> Index<ElementKind> for PerKind<T> {
    type Output = T;

    fn index(&self, kind: ElementKind) -> &T {
        &self.0[kind.slot()]
    }
}

impl<T> IndexMut<ElementKind> for PerKind<T> {
    fn index_mut(&mut self, kind: ElementKind) -> &mut T {
        &mut self.0[kind.slot()]
    }
}
