// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator traits.
//!
//! A [`DynamicList`](crate::DynamicList) talks to three collaborators:
//!
//! - a [`ListHost`], which owns the actual elements and their geometry,
//! - a [`ListDataSource`], which says how many elements there are and, for
//!   lists that do not auto-calculate sizes, how big they are,
//! - an [`ElementNotifications`] sink, which is told when an element is about
//!   to be shown or measured so it can fill in its content.
//!
//! The data source and sink traits have default implementations for every
//! method, and `()` implements both.

use alloc::vec::Vec;
use core::fmt::Debug;

use kurbo::{Rect, Size, Vec2};

use crate::axis::Axis;

/// Element and transform services provided by the host UI.
///
/// The list is made of three nested elements: the list itself, a viewport
/// (the parent of the content), and the content, whose children are the
/// displayed elements. Geometry is reported in a shared canvas space.
pub trait ListHost {
    /// Handle to a host element.
    type Element: Copy + Eq + Debug;

    /// The element that owns the list.
    fn list_element(&self) -> Self::Element;

    /// Whether the list scrolls vertically.
    fn is_vertical(&self) -> bool;

    /// The content element, if the list has one.
    fn content(&self) -> Option<Self::Element>;

    /// Parent of `element`.
    fn parent(&self, element: Self::Element) -> Option<Self::Element>;

    /// Children of `element`, in order.
    fn children(&self, element: Self::Element) -> Vec<Self::Element>;

    /// Returns `true` if `ancestor` is a strict ancestor of `element`.
    fn is_ancestor(&self, ancestor: Self::Element, element: Self::Element) -> bool;

    /// Detaches `child` from `parent` without destroying it.
    fn remove_child(&mut self, parent: Self::Element, child: Self::Element);

    /// Canvas-space rectangle of `element`, ignoring scale and rotation.
    fn canvas_rect(&self, element: Self::Element) -> Rect;

    /// Normalized pivot of `element`.
    fn pivot(&self, element: Self::Element) -> Vec2;

    /// Changes the extent of `element` along `axis`, keeping its pivot still.
    fn resize_element(&mut self, element: Self::Element, axis: Axis, extent: f64);

    /// Moves the leading edge of `element` along `axis` to `offset` within its
    /// parent, keeping its extent.
    fn set_leading_offset(&mut self, element: Self::Element, axis: Axis, offset: f64);

    /// Anchors `element` to the leading edge of its parent along `axis`.
    fn anchor_to_leading_edge(&mut self, element: Self::Element, axis: Axis) {
        let _ = (element, axis);
    }

    /// Enables or disables `element`.
    fn set_enabled(&mut self, element: Self::Element, enabled: bool);

    /// Clones `prototype` (and its descendants) under `parent`.
    fn clone_element(
        &mut self,
        prototype: Self::Element,
        parent: Self::Element,
    ) -> Option<Self::Element>;

    /// Destroys `element` and its descendants.
    fn destroy_element(&mut self, element: Self::Element);

    /// Whether `element` can take keyboard or gamepad focus.
    fn is_navigable(&self, element: Self::Element) -> bool;

    /// Extent along `axis` that the layout system would give `element`.
    fn layout_target_extent(&self, element: Self::Element, axis: Axis) -> f64;

    /// Current scroll offset of the content.
    fn scroll_offset(&self) -> Vec2;

    /// Sets the content size and scroll offset together.
    fn change_content_size_and_scroll_offset(&mut self, size: Size, offset: Vec2);
}

/// Supplies element counts and, optionally, element sizes.
///
/// Counts returning `None` fall back to the list configuration.
pub trait ListDataSource {
    /// Number of elements in a list without sections.
    fn num_elements(&self) -> Option<usize> {
        None
    }

    /// Number of sections.
    fn num_sections(&self) -> Option<usize> {
        None
    }

    /// Number of items in `section`.
    fn num_items_in_section(&self, section: usize) -> Option<usize> {
        let _ = section;
        None
    }

    /// Extent of the element at `index` along `axis`.
    fn element_extent(&self, index: usize, axis: Axis) -> f64 {
        let _ = (index, axis);
        0.0
    }

    /// Extent of `item` in `section` along `axis`.
    fn item_in_section_extent(&self, section: usize, item: usize, axis: Axis) -> f64 {
        let _ = (section, item, axis);
        0.0
    }

    /// Extent of the header of `section` along `axis`.
    fn section_header_extent(&self, section: usize, axis: Axis) -> f64 {
        let _ = (section, axis);
        0.0
    }
}

impl ListDataSource for () {}

/// Receives element lifecycle notifications.
///
/// Each call gets mutable access to the host so the element can be populated.
pub trait ElementNotifications<H: ListHost> {
    /// The element at `index` is about to become visible.
    fn element_becoming_visible(&mut self, host: &mut H, element: H::Element, index: usize) {
        let _ = (host, element, index);
    }

    /// `item` of `section` is about to become visible.
    fn item_in_section_becoming_visible(
        &mut self,
        host: &mut H,
        element: H::Element,
        section: usize,
        item: usize,
    ) {
        let _ = (host, element, section, item);
    }

    /// The header of `section` is about to become visible.
    fn section_header_becoming_visible(&mut self, host: &mut H, element: H::Element, section: usize) {
        let _ = (host, element, section);
    }

    /// `element` is about to be measured on behalf of `index`.
    fn prepare_element_for_size_calculation(
        &mut self,
        host: &mut H,
        element: H::Element,
        index: usize,
    ) {
        let _ = (host, element, index);
    }

    /// `element` is about to be measured on behalf of `item` in `section`.
    fn prepare_item_in_section_for_size_calculation(
        &mut self,
        host: &mut H,
        element: H::Element,
        section: usize,
        item: usize,
    ) {
        let _ = (host, element, section, item);
    }

    /// `element` is about to be measured on behalf of the header of `section`.
    fn prepare_section_header_for_size_calculation(
        &mut self,
        host: &mut H,
        element: H::Element,
        section: usize,
    ) {
        let _ = (host, element, section);
    }
}

impl<H: ListHost> ElementNotifications<H> for () {}
