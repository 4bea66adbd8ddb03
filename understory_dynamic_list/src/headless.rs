// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory [`ListHost`] for tests, benchmarks, and examples.
//!
//! [`HeadlessHost`] models a scroll box as three nested elements: the list,
//! a viewport the size of the list, and the content inside the viewport. Every
//! other element is a rectangle in its parent's space.
//!
//! Content placement along the scroll axis follows the usual pivot rule:
//!
//! ```text
//! content_leading = viewport_leading + scroll + pivot * (viewport_extent - content_extent)
//! ```
//!
//! so a content pivot of `0.0` pins the content's leading edge at scroll zero,
//! and a pivot of `1.0` pins its trailing edge to the viewport's. Scroll offsets
//! are not clamped.

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{Rect, Size, Vec2};

use crate::axis::Axis;
use crate::host::ListHost;

/// Handle to an element of a [`HeadlessHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u32);

impl ElementId {
    /// The raw id.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Debug)]
struct Node {
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    /// Rectangle in the parent's space.
    local: Rect,
    pivot: Vec2,
    enabled: bool,
    navigable: bool,
    /// Size the layout system would give the element.
    preferred: Size,
}

impl Node {
    fn new(parent: Option<ElementId>, local: Rect) -> Self {
        Self {
            parent,
            children: Vec::new(),
            local,
            pivot: Vec2::ZERO,
            enabled: true,
            navigable: false,
            preferred: local.size(),
        }
    }
}

/// A headless scroll box.
#[derive(Clone, Debug)]
pub struct HeadlessHost {
    axis: Axis,
    nodes: HashMap<ElementId, Node>,
    next_id: u32,
    list: ElementId,
    viewport: ElementId,
    content: ElementId,
    viewport_size: Size,
    content_extent: f64,
    content_pivot: Vec2,
    scroll_offset: Vec2,
    clones: usize,
}

impl HeadlessHost {
    /// Creates a scroll box scrolling along `axis` with a viewport of
    /// `viewport` size and empty content.
    #[must_use]
    pub fn new(axis: Axis, viewport: Size) -> Self {
        let mut host = Self {
            axis,
            nodes: HashMap::new(),
            next_id: 0,
            list: ElementId(0),
            viewport: ElementId(0),
            content: ElementId(0),
            viewport_size: viewport,
            content_extent: 0.0,
            content_pivot: Vec2::ZERO,
            scroll_offset: Vec2::ZERO,
            clones: 0,
        };
        let bounds = viewport.to_rect();
        host.list = host.alloc(Node::new(None, bounds));
        host.viewport = host.alloc(Node::new(Some(host.list), bounds));
        host.content = host.alloc(Node::new(Some(host.viewport), Rect::ZERO));
        host.attach(host.list, host.viewport);
        host.attach(host.viewport, host.content);
        host
    }

    /// A vertical scroll box.
    #[must_use]
    pub fn vertical(viewport: Size) -> Self {
        Self::new(Axis::Vertical, viewport)
    }

    fn alloc(&mut self, node: Node) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    fn attach(&mut self, parent: ElementId, child: ElementId) {
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(child);
        }
    }

    /// The viewport element.
    #[must_use]
    pub fn viewport(&self) -> ElementId {
        self.viewport
    }

    /// Adds an element of `size` at the leading corner of `parent`.
    pub fn insert(&mut self, parent: ElementId, size: Size) -> ElementId {
        let id = self.alloc(Node::new(Some(parent), size.to_rect()));
        self.attach(parent, id);
        id
    }

    /// Whether `element` exists.
    #[must_use]
    pub fn contains(&self, element: ElementId) -> bool {
        self.nodes.contains_key(&element)
    }

    /// Number of live elements, including the list, viewport, and content.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the host has no elements. Never true in practice.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of clones made so far.
    #[must_use]
    pub fn clone_count(&self) -> usize {
        self.clones
    }

    /// Whether `element` is enabled.
    #[must_use]
    pub fn is_enabled(&self, element: ElementId) -> bool {
        self.nodes.get(&element).is_some_and(|n| n.enabled)
    }

    /// Marks `element` as able to take navigation focus.
    pub fn set_navigable(&mut self, element: ElementId, navigable: bool) {
        if let Some(n) = self.nodes.get_mut(&element) {
            n.navigable = navigable;
        }
    }

    /// Sets the pivot of `element`.
    pub fn set_pivot(&mut self, element: ElementId, pivot: Vec2) {
        if element == self.content {
            self.content_pivot = pivot;
        } else if let Some(n) = self.nodes.get_mut(&element) {
            n.pivot = pivot;
        }
    }

    /// Sets the extent the layout system reports for `element` along the
    /// scroll axis.
    pub fn set_preferred_extent(&mut self, element: ElementId, extent: f64) {
        let axis = self.axis;
        if let Some(n) = self.nodes.get_mut(&element) {
            n.preferred = axis.with_extent(n.preferred, extent);
        }
    }

    /// Leading offset of `element` within its parent along the scroll axis.
    #[must_use]
    pub fn leading_offset(&self, element: ElementId) -> f64 {
        self.nodes
            .get(&element)
            .map_or(0.0, |n| self.axis.leading(n.local))
    }

    /// Extent of `element` along the scroll axis.
    #[must_use]
    pub fn extent(&self, element: ElementId) -> f64 {
        self.axis.extent(self.canvas_rect(element).size())
    }

    /// Extent of the content along the scroll axis.
    #[must_use]
    pub fn content_extent(&self) -> f64 {
        self.content_extent
    }

    /// Scroll offset along the scroll axis.
    #[must_use]
    pub fn scroll_position(&self) -> f64 {
        self.axis.component(self.scroll_offset)
    }

    /// Sets the scroll offset along the scroll axis.
    ///
    /// Scrolling toward the end of the content makes this more negative.
    pub fn set_scroll_position(&mut self, position: f64) {
        self.scroll_offset = match self.axis {
            Axis::Horizontal => Vec2::new(position, self.scroll_offset.y),
            Axis::Vertical => Vec2::new(self.scroll_offset.x, position),
        };
    }

    /// Resizes the viewport (and the list) to `size`.
    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport_size = size;
        for id in [self.list, self.viewport] {
            if let Some(n) = self.nodes.get_mut(&id) {
                n.local = size.to_rect();
            }
        }
    }

    /// Enabled children of `parent`, in order.
    #[must_use]
    pub fn enabled_children(&self, parent: ElementId) -> Vec<ElementId> {
        self.children(parent)
            .into_iter()
            .filter(|&c| self.is_enabled(c))
            .collect()
    }

    fn content_local_rect(&self) -> Rect {
        let view = self.axis.extent(self.viewport_size);
        let pivot = self.axis.component(self.content_pivot);
        let leading = self.axis.component(self.scroll_offset) + pivot * (view - self.content_extent);
        match self.axis {
            Axis::Vertical => Rect::new(
                0.0,
                leading,
                self.viewport_size.width,
                leading + self.content_extent,
            ),
            Axis::Horizontal => Rect::new(
                leading,
                0.0,
                leading + self.content_extent,
                self.viewport_size.height,
            ),
        }
    }

    fn local_rect(&self, element: ElementId) -> Rect {
        if element == self.content {
            self.content_local_rect()
        } else {
            self.nodes.get(&element).map_or(Rect::ZERO, |n| n.local)
        }
    }

    fn clone_subtree(&mut self, source: ElementId, parent: ElementId) -> Option<ElementId> {
        let node = self.nodes.get(&source)?.clone();
        let id = self.alloc(Node {
            parent: Some(parent),
            children: Vec::new(),
            enabled: true,
            ..node
        });
        self.attach(parent, id);
        for child in node.children {
            self.clone_subtree(child, id);
        }
        Some(id)
    }

    fn detach(&mut self, element: ElementId) {
        let parent = self.nodes.get_mut(&element).and_then(|n| n.parent.take());
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            p.children.retain(|&c| c != element);
        }
    }
}

impl ListHost for HeadlessHost {
    type Element = ElementId;

    fn list_element(&self) -> ElementId {
        self.list
    }

    fn is_vertical(&self) -> bool {
        self.axis == Axis::Vertical
    }

    fn content(&self) -> Option<ElementId> {
        Some(self.content)
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.nodes.get(&element)?.parent
    }

    fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.nodes
            .get(&element)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn is_ancestor(&self, ancestor: ElementId, element: ElementId) -> bool {
        let mut current = self.parent(element);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    fn remove_child(&mut self, parent: ElementId, child: ElementId) {
        if self.parent(child) == Some(parent) {
            self.detach(child);
        }
    }

    fn canvas_rect(&self, element: ElementId) -> Rect {
        let local = self.local_rect(element);
        match self.parent(element) {
            Some(p) => {
                let origin = self.canvas_rect(p).origin();
                local + origin.to_vec2()
            }
            None => local,
        }
    }

    fn pivot(&self, element: ElementId) -> Vec2 {
        if element == self.content {
            self.content_pivot
        } else {
            self.nodes.get(&element).map_or(Vec2::ZERO, |n| n.pivot)
        }
    }

    fn resize_element(&mut self, element: ElementId, axis: Axis, extent: f64) {
        if element == self.content {
            self.content_extent = extent;
            return;
        }
        let Some(n) = self.nodes.get_mut(&element) else {
            return;
        };
        let delta = extent - axis.extent(n.local.size());
        let pivot = axis.component(n.pivot);
        let (lead, trail) = (delta * pivot, delta * (1.0 - pivot));
        n.local = match axis {
            Axis::Vertical => Rect::new(n.local.x0, n.local.y0 - lead, n.local.x1, n.local.y1 + trail),
            Axis::Horizontal => Rect::new(n.local.x0 - lead, n.local.y0, n.local.x1 + trail, n.local.y1),
        };
    }

    fn set_leading_offset(&mut self, element: ElementId, axis: Axis, offset: f64) {
        let Some(n) = self.nodes.get_mut(&element) else {
            return;
        };
        let extent = axis.extent(n.local.size());
        n.local = match axis {
            Axis::Vertical => Rect::new(n.local.x0, offset, n.local.x1, offset + extent),
            Axis::Horizontal => Rect::new(offset, n.local.y0, offset + extent, n.local.y1),
        };
    }

    fn set_enabled(&mut self, element: ElementId, enabled: bool) {
        if let Some(n) = self.nodes.get_mut(&element) {
            n.enabled = enabled;
        }
    }

    fn clone_element(&mut self, prototype: ElementId, parent: ElementId) -> Option<ElementId> {
        if !self.contains(parent) {
            return None;
        }
        let id = self.clone_subtree(prototype, parent)?;
        self.clones += 1;
        Some(id)
    }

    fn destroy_element(&mut self, element: ElementId) {
        self.detach(element);
        let mut stack = alloc::vec![element];
        while let Some(id) = stack.pop() {
            if let Some(n) = self.nodes.remove(&id) {
                stack.extend(n.children);
            }
        }
    }

    fn is_navigable(&self, element: ElementId) -> bool {
        self.nodes.get(&element).is_some_and(|n| n.navigable)
    }

    fn layout_target_extent(&self, element: ElementId, axis: Axis) -> f64 {
        self.nodes
            .get(&element)
            .map_or(0.0, |n| axis.extent(n.preferred))
    }

    fn scroll_offset(&self) -> Vec2 {
        self.scroll_offset
    }

    fn change_content_size_and_scroll_offset(&mut self, size: Size, offset: Vec2) {
        self.content_extent = self.axis.extent(size);
        self.scroll_offset = offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_follows_scroll_and_pivot() {
        let mut host = HeadlessHost::vertical(Size::new(50.0, 100.0));
        let content = host.content().unwrap();
        host.resize_element(content, Axis::Vertical, 400.0);
        assert_eq!(host.canvas_rect(content), Rect::new(0.0, 0.0, 50.0, 400.0));

        host.set_scroll_position(-30.0);
        assert_eq!(host.canvas_rect(content).y0, -30.0);

        host.set_scroll_position(0.0);
        host.set_pivot(content, Vec2::new(0.0, 1.0));
        // Trailing edges line up.
        assert_eq!(host.canvas_rect(content).y1, 100.0);
    }

    #[test]
    fn clones_are_placed_in_parent_space() {
        let mut host = HeadlessHost::vertical(Size::new(50.0, 100.0));
        let content = host.content().unwrap();
        host.resize_element(content, Axis::Vertical, 400.0);
        let proto = host.insert(content, Size::new(50.0, 20.0));
        let _label = host.insert(proto, Size::new(10.0, 10.0));
        host.remove_child(content, proto);

        let row = host.clone_element(proto, content).unwrap();
        host.set_leading_offset(row, Axis::Vertical, 60.0);
        host.set_scroll_position(-40.0);
        assert_eq!(host.canvas_rect(row), Rect::new(0.0, 20.0, 50.0, 40.0));
        assert_eq!(host.children(row).len(), 1);
        assert!(host.is_ancestor(content, host.children(row)[0]));
        assert_eq!(host.clone_count(), 1);

        let before = host.len();
        host.destroy_element(row);
        assert_eq!(host.len(), before - 2);
        assert!(host.children(content).is_empty());
    }

    #[test]
    fn resize_keeps_pivot_still() {
        let mut host = HeadlessHost::vertical(Size::new(50.0, 100.0));
        let content = host.content().unwrap();
        let e = host.insert(content, Size::new(50.0, 20.0));
        host.set_pivot(e, Vec2::new(0.5, 0.5));
        host.resize_element(e, Axis::Vertical, 40.0);
        assert_eq!(host.leading_offset(e), -10.0);
        assert_eq!(host.extent(e), 40.0);
    }
}
