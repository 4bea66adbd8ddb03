// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Displayed elements and recycle pools.
//!
//! The displayed elements always form one contiguous run of indices, kept
//! sorted. Elements that leave the run are disabled and pushed onto the pool
//! for their kind; new indices take from the pool before anything is cloned.

use alloc::collections::VecDeque;
use core::ops::RangeInclusive;

use smallvec::SmallVec;

use crate::host::ListHost;
use crate::kind::{ElementKind, PerKind};
use crate::sections::ElementLocation;

/// An element currently instantiated for an index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayedElement<E> {
    /// Host element showing this index.
    pub element: E,
    /// Absolute element index.
    pub index: usize,
    /// Where the index lives.
    pub location: ElementLocation,
}

impl<E> DisplayedElement<E> {
    /// Kind of the displayed index.
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        self.location.kind()
    }
}

/// Most recently released elements are reused first.
type Pool<E> = SmallVec<[E; 8]>;

/// The displayed run plus per-kind recycle pools.
#[derive(Clone, Debug)]
pub(crate) struct DisplayList<E> {
    displayed: VecDeque<DisplayedElement<E>>,
    pools: PerKind<Pool<E>>,
}

impl<E> Default for DisplayList<E> {
    fn default() -> Self {
        Self {
            displayed: VecDeque::new(),
            pools: PerKind::new(SmallVec::new(), SmallVec::new()),
        }
    }
}

impl<E: Copy + Eq> DisplayList<E> {
    pub(crate) fn iter(&self) -> impl Iterator<Item = &DisplayedElement<E>> {
        self.displayed.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.displayed.len()
    }

    pub(crate) fn pooled(&self, kind: ElementKind) -> &[E] {
        &self.pools[kind]
    }

    /// Returns the displayed element for `index`.
    pub(crate) fn at_index(&self, index: usize) -> Option<&DisplayedElement<E>> {
        let pos = self.displayed.binary_search_by_key(&index, |d| d.index).ok()?;
        self.displayed.get(pos)
    }

    /// Returns the displayed entry backed by `element`.
    pub(crate) fn by_element(&self, element: E) -> Option<&DisplayedElement<E>> {
        self.displayed.iter().find(|d| d.element == element)
    }

    /// Releases every displayed element outside `keep` into the pools.
    pub(crate) fn release_outside<H: ListHost<Element = E>>(
        &mut self,
        keep: Option<RangeInclusive<usize>>,
        host: &mut H,
    ) {
        let kept = |index: usize| keep.as_ref().is_some_and(|r| r.contains(&index));
        while let Some(d) = self.displayed.front() {
            if kept(d.index) {
                break;
            }
            if let Some(d) = self.displayed.pop_front() {
                self.release(d, host);
            }
        }
        while let Some(d) = self.displayed.back() {
            if kept(d.index) {
                break;
            }
            if let Some(d) = self.displayed.pop_back() {
                self.release(d, host);
            }
        }
    }

    /// Releases every displayed element into the pools.
    pub(crate) fn release_all<H: ListHost<Element = E>>(&mut self, host: &mut H) {
        self.release_outside(None, host);
    }

    fn release<H: ListHost<Element = E>>(&mut self, d: DisplayedElement<E>, host: &mut H) {
        host.set_enabled(d.element, false);
        self.pools[d.kind()].push(d.element);
    }

    /// Takes an element from the pool for `kind`, enabling it.
    pub(crate) fn take_pooled<H: ListHost<Element = E>>(
        &mut self,
        kind: ElementKind,
        host: &mut H,
    ) -> Option<E> {
        let element = self.pools[kind].pop()?;
        host.set_enabled(element, true);
        Some(element)
    }

    /// Inserts a newly displayed element, keeping the run sorted.
    pub(crate) fn insert(&mut self, entry: DisplayedElement<E>) {
        let pos = self.displayed.partition_point(|d| d.index < entry.index);
        debug_assert!(
            self.displayed.get(pos).is_none_or(|d| d.index != entry.index),
            "index {} is already displayed",
            entry.index
        );
        self.displayed.insert(pos, entry);
    }

    /// Removes everything, returning all owned elements.
    pub(crate) fn drain_all(&mut self) -> impl Iterator<Item = E> + '_ {
        let displayed = self.displayed.drain(..).map(|d| d.element);
        let [items, headers] = core::mem::take(&mut self.pools).into_array();
        displayed.chain(items).chain(headers)
    }
}
