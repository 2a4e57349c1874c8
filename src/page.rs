//! The top-level solver: one cell tree laying out one container.
//!
//! [`PageLayout`] owns a [`CellTree`] and its root, keeps a margin between
//! the container's insets and the root, answers the container's size
//! queries and runs the layout pass when the container is resized.
//!
//! # Example
//!
//! ```
//! use zenpage::{AddOptions, Alignment, CellTree, Component, ComponentTable, PageLayout, Rect, Size};
//!
//! let mut host = ComponentTable::new();
//! let list = host.insert(Component::new(Size::new(200, 300)));
//!
//! let mut tree = CellTree::new();
//! let col = tree.column(Alignment::None, Alignment::None);
//! tree.add(col, list, AddOptions::new()).unwrap();
//!
//! let mut page = PageLayout::new(tree, col);
//! page.attach(&mut host);
//! assert_eq!(page.preferred_size(&host), Size::new(210, 310));
//!
//! page.layout_container(&mut host, Size::new(400, 400));
//! assert_eq!(host.bounds(list), Some(Rect::new(5, 5, 390, 390)));
//! ```

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::cell::CellId;
use crate::host::{ComponentId, Host};
use crate::link::ContainerLink;
use crate::spring::{Axis, Rect, Size, Tier};
use crate::tree::CellTree;

/// Layout manager for a single container.
#[derive(Clone, Debug)]
pub struct PageLayout {
    tree: CellTree,
    root: CellId,
    gaps: Size,
    container_links: Vec<ContainerLink>,
}

impl PageLayout {
    /// Manage `root` with the default 5-pixel container gaps.
    pub fn new(tree: CellTree, root: CellId) -> Self {
        Self {
            tree,
            root,
            gaps: Size::new(5, 5),
            container_links: Vec::new(),
        }
    }

    /// Space between the container's insets and the root cell.
    pub fn container_gaps(mut self, horizontal: i32, vertical: i32) -> Self {
        self.gaps = Size::new(horizontal, vertical);
        self
    }

    /// Size each component's width from the container's: `width * scale + offset`.
    pub fn link_to_container_width(&mut self, links: &[(ComponentId, f64, f64)]) {
        self.link_to_container(Axis::Horizontal, links);
    }

    /// Size each component's height from the container's: `height * scale + offset`.
    pub fn link_to_container_height(&mut self, links: &[(ComponentId, f64, f64)]) {
        self.link_to_container(Axis::Vertical, links);
    }

    fn link_to_container(&mut self, axis: Axis, links: &[(ComponentId, f64, f64)]) {
        for &(component, scale, offset) in links {
            self.container_links
                .retain(|l| !(l.component == component && l.axis == axis));
            self.container_links
                .push(ContainerLink::new(component, axis, scale, offset));
        }
        tracing::debug!(?axis, count = links.len(), "container links registered");
    }

    pub fn container_links(&self) -> &[ContainerLink] {
        &self.container_links
    }

    pub fn tree(&self) -> &CellTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut CellTree {
        &mut self.tree
    }

    pub fn root(&self) -> CellId {
        self.root
    }

    pub fn gaps(&self) -> Size {
        self.gaps
    }

    /// Attach every component to the container, hiding cards and tabs that
    /// are not showing.
    pub fn attach(&self, host: &mut dyn Host) {
        self.tree.attach_components(host, self.root);
    }

    /// Drop every cached spring.
    pub fn invalidate(&mut self) {
        self.tree.invalidate(self.root);
    }

    pub fn minimum_size(&mut self, host: &dyn Host) -> Size {
        self.container_size(host, Tier::Minimum)
    }

    /// Preferred container size, recomputed from the components' current
    /// declared sizes.
    pub fn preferred_size(&mut self, host: &dyn Host) -> Size {
        self.invalidate();
        self.container_size(host, Tier::Preferred)
    }

    pub fn maximum_size(&mut self, host: &dyn Host) -> Size {
        self.container_size(host, Tier::Maximum)
    }

    fn container_size(&mut self, host: &dyn Host, tier: Tier) -> Size {
        let inner = self.tree.spring(self.root, host).size(tier);
        let insets = host.container_insets();
        Size::new(
            inner
                .width
                .saturating_add(2 * self.gaps.width + insets.total(Axis::Horizontal)),
            inner
                .height
                .saturating_add(2 * self.gaps.height + insets.total(Axis::Vertical)),
        )
    }

    /// Lay out the container at `size`.
    ///
    /// Container links are applied first, then the tree is recomputed and
    /// the root placed inside the insets and gaps.
    pub fn layout_container(&mut self, host: &mut dyn Host, size: Size) {
        let mut resized = 0;
        for link in &self.container_links {
            if link.apply(host, size) {
                resized += 1;
            }
        }
        self.invalidate();

        let insets = host.container_insets();
        let g = self.gaps;
        let rect = Rect::new(
            g.width + insets.left,
            g.height + insets.top,
            size.width - 2 * g.width - insets.total(Axis::Horizontal),
            size.height - 2 * g.height - insets.total(Axis::Vertical),
        );
        tracing::debug!(?size, ?rect, resized, "layout container");
        self.tree.layout(self.root, host, rect);
    }
}
