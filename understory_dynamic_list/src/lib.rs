// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Dynamic List: a virtualized list visibility engine.
//!
//! A [`DynamicList`] shows a long, scrollable list while only instantiating the
//! elements that intersect the viewport. Elements that scroll out of view are
//! disabled and kept in a recycle pool; elements that scroll into view reuse a
//! pooled element before a new one is cloned from a prototype.
//!
//! The list supports:
//!
//! - fixed or variable element sizes, with variable sizes coming either from
//!   a [`ListDataSource`] or from the host's layout system,
//! - estimated sizes, so that huge lists need not be measured up front; the
//!   list measures elements as they become visible and compensates the scroll
//!   offset so that nothing on screen jumps,
//! - grouping into sections with headers, optionally with a sticky header
//!   pinned to the leading edge,
//! - keyboard and gamepad navigation, by keeping one extra navigable element
//!   instantiated past each end of the viewport,
//! - chat-style lists that stay scrolled to the end as elements are appended.
//!
//! The list does not own a UI tree. It talks to the host through three
//! collaborators:
//!
//! - [`ListHost`]: element creation, destruction, geometry, and scrolling.
//! - [`ListDataSource`]: element counts and, optionally, element sizes.
//! - [`ElementNotifications`]: told when an element is about to be shown or
//!   measured, so the host can fill in its content.
//!
//! [`HeadlessHost`] is an in-memory [`ListHost`] for tests and examples.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Size;
//! use understory_dynamic_list::{DynamicList, HeadlessHost, ListConfig, ListDataSource, ListHost};
//!
//! struct Rows(usize);
//!
//! impl ListDataSource for Rows {
//!     fn num_elements(&self) -> Option<usize> {
//!         Some(self.0)
//!     }
//! }
//!
//! // A 100x100 viewport and a 20 tall row prototype inside the content.
//! let mut host = HeadlessHost::vertical(Size::new(100.0, 100.0));
//! let content = host.content().unwrap();
//! let row = host.insert(content, Size::new(100.0, 20.0));
//!
//! let mut list = DynamicList::new(host, Rows(1000), (), ListConfig::items(row));
//! list.refresh_content();
//! assert_eq!(list.host().content_extent(), 20_000.0);
//! assert_eq!(list.visible_range().map(|r| r.visible()), Some(0..=4));
//!
//! // Scroll 30 down. Scroll offsets grow negative toward the end.
//! list.host_mut().set_scroll_position(-30.0);
//! let offset = list.host().scroll_offset();
//! list.on_scroll_offset_changed(offset);
//! assert_eq!(list.visible_range().map(|r| r.visible()), Some(1..=6));
//! assert_eq!(list.displayed_elements().count(), 6);
//! ```
//!
//! This crate is `no_std` and uses `alloc`. Diagnostics are reported through
//! [`tracing`](https://docs.rs/tracing).

#![no_std]

extern crate alloc;

mod adjust;
mod axis;
mod config;
mod display;
mod error;
mod headless;
mod host;
mod kind;
mod list;
mod sections;
mod size_cache;
mod sizes;
mod sticky;
mod visibility;

pub use adjust::{ContentAdjustment, ScrollAnchor};
pub use axis::Axis;
pub use config::{ElementSizing, ListConfig};
pub use display::DisplayedElement;
pub use error::ListError;
pub use headless::{ElementId, HeadlessHost};
pub use host::{ElementNotifications, ListDataSource, ListHost};
pub use kind::{ElementKind, KindSet, PerKind};
pub use list::DynamicList;
pub use sections::{ElementLocation, Section, SectionTable};
pub use size_cache::{AverageSize, CachedElementInfo, SizeCache};
pub use sticky::StickyState;
pub use visibility::VisibleRange;
