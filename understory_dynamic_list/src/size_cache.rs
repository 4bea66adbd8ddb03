// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-element size cache for variable-size lists.
//!
//! Each index records its measured size and its accumulated size (the end
//! offset of the element). Either may be unknown. Accumulated sizes are never
//! recomputed from scratch: when a size changes, the delta is pushed forward
//! into every later accumulated size that is already known.

use alloc::vec::Vec;

use crate::kind::{ElementKind, PerKind};
use crate::sections::SectionTable;

/// Cached size information for one element.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CachedElementInfo {
    /// Measured size along the scroll axis.
    pub size: Option<f64>,
    /// Sum of the sizes of elements `0..=index`.
    pub accumulated: Option<f64>,
}

/// Running average of element sizes.
///
/// Only used to guess where a scan for the first visible element should start.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AverageSize {
    count: usize,
    average: f64,
}

impl AverageSize {
    /// The current average, or zero when nothing has been counted.
    #[must_use]
    pub const fn get(&self) -> f64 {
        self.average
    }

    /// Number of elements counted.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Forgets everything counted so far.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Counts `added` more elements whose combined size changes the total by
    /// `size_delta`.
    pub fn update(&mut self, added: usize, size_delta: f64) {
        let total = self.average * self.count as f64;
        self.count += added;
        self.average = if self.count > 0 {
            (total + size_delta).max(0.0) / self.count as f64
        } else {
            0.0
        };
    }
}

/// Per-index size cache.
#[derive(Clone, Debug, Default)]
pub struct SizeCache {
    entries: Vec<CachedElementInfo>,
    average: AverageSize,
}

impl SizeCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the cache has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops all entries and reserves `len` unknown ones.
    pub fn reset(&mut self, len: usize) {
        self.entries.clear();
        self.entries.resize(len, CachedElementInfo::default());
    }

    /// Appends `count` unknown entries.
    pub fn extend(&mut self, count: usize) {
        let len = self.entries.len() + count;
        self.entries.resize(len, CachedElementInfo::default());
    }

    /// Removes the first `count` entries, whose combined size was
    /// `removed_extent`, and shifts the remaining accumulated sizes back.
    pub fn remove_front(&mut self, count: usize, removed_extent: f64) {
        let count = count.min(self.entries.len());
        self.entries.drain(..count);
        for entry in &mut self.entries {
            if let Some(acc) = &mut entry.accumulated {
                *acc -= removed_extent;
            }
        }
    }

    /// Returns the entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CachedElementInfo> {
        self.entries.get(index)
    }

    /// Measured size at `index`, if known.
    #[must_use]
    pub fn size(&self, index: usize) -> Option<f64> {
        self.entries.get(index).and_then(|e| e.size)
    }

    /// Accumulated size at `index`, if known.
    #[must_use]
    pub fn accumulated(&self, index: usize) -> Option<f64> {
        self.entries.get(index).and_then(|e| e.accumulated)
    }

    /// Records the measured size at `index`.
    pub fn set_size(&mut self, index: usize, size: f64) {
        if let Some(e) = self.entries.get_mut(index) {
            e.size = Some(size);
        }
    }

    /// Records the accumulated size at `index`.
    pub fn set_accumulated(&mut self, index: usize, accumulated: f64) {
        if let Some(e) = self.entries.get_mut(index) {
            e.accumulated = Some(accumulated);
        }
    }

    /// Adds `delta` to every known accumulated size in `range`.
    pub fn shift_accumulated(&mut self, range: core::ops::Range<usize>, delta: f64) {
        let end = range.end.min(self.entries.len());
        let start = range.start.min(end);
        for entry in &mut self.entries[start..end] {
            if let Some(acc) = &mut entry.accumulated {
                *acc += delta;
            }
        }
    }

    /// Offset of the element at `index`.
    ///
    /// Uses the accumulated size of the previous element when known. Otherwise
    /// walks back to the nearest known accumulated size and adds the
    /// per-kind `estimates` for every element in between.
    #[must_use]
    pub fn offset(&self, index: usize, sections: &SectionTable, estimates: &PerKind<f64>) -> f64 {
        if index == 0 {
            return 0.0;
        }
        let index = index.min(self.entries.len());
        let mut unknown = PerKind::new(0_usize, 0_usize);
        let mut base = 0.0;
        for i in (0..index).rev() {
            if let Some(acc) = self.entries[i].accumulated {
                base = acc;
                break;
            }
            unknown[sections.kind_at(i)] += 1;
        }
        ElementKind::ALL.into_iter().fold(base, |acc, kind| {
            acc + unknown[kind] as f64 * estimates[kind]
        })
    }

    /// The running average element size.
    #[must_use]
    pub fn average(&self) -> &AverageSize {
        &self.average
    }

    /// Mutable access to the running average.
    pub fn average_mut(&mut self) -> &mut AverageSize {
        &mut self.average
    }
}
