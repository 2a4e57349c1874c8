//! Proportional size links.
//!
//! [`CellTree::link_width`] and [`CellTree::link_height`] resize components
//! to a factor of an anchor component's size. When anchor and targets are
//! siblings in the same row or column, the link is also recorded in that
//! sequence's [`LinkTable`], and from then on the sizes are recomputed from
//! the anchor's share of the band every layout pass. Links are live across
//! the sequence only: height links in a row, width links in a column. Along
//! the main axis the resized springs already carry the proportion.
//!
//! [`ContainerLink`] ties a component's size to the size of the managed
//! container instead; the [`PageLayout`](crate::PageLayout) applies those
//! before each pass.
//!
//! # Example
//!
//! ```
//! use zenpage::{CellTree, Component, ComponentTable, Host, Size};
//!
//! let mut host = ComponentTable::new();
//! let anchor = host.insert(Component::fixed(Size::new(120, 24)));
//! let other = host.insert(Component::fixed(Size::new(60, 24)));
//!
//! let mut tree = CellTree::new();
//! tree.link_width(&mut host, anchor, &[(other, 0.5)]);
//! assert_eq!(host.preferred_size(other), Size::new(60, 24));
//! assert_eq!(host.maximum_size(other), Size::new(60, 24));
//! ```

#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::cell::CellKind;
use crate::error::Diagnostic;
use crate::host::{ComponentId, Host};
use crate::spring::{Axis, Size, Tier, UNBOUNDED, round_half_up};
use crate::tree::CellTree;

/// Anchor/dependent links among the children of one sequence.
///
/// Every child has an entry. A child is either free, an anchor, or a
/// dependent of exactly one anchor with a scale factor; an anchor never
/// depends on another anchor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinkTable {
    entries: Vec<LinkEntry>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct LinkEntry {
    anchor: Option<usize>,
    factor: f64,
    is_anchor: bool,
}

impl LinkTable {
    /// Whether any link is recorded.
    pub fn is_empty(&self) -> bool {
        !self.entries.iter().any(|e| e.is_anchor)
    }

    pub fn is_anchor(&self, index: usize) -> bool {
        self.entries.get(index).is_some_and(|e| e.is_anchor)
    }

    /// Anchor index and factor of a dependent child.
    pub fn anchor_of(&self, index: usize) -> Option<(usize, f64)> {
        let e = self.entries.get(index)?;
        e.anchor.map(|a| (a, e.factor))
    }

    /// Make room for a child inserted at `index`.
    pub(crate) fn insert(&mut self, index: usize) {
        for e in &mut self.entries {
            if let Some(a) = e.anchor.as_mut() {
                if *a >= index {
                    *a += 1;
                }
            }
        }
        let index = index.min(self.entries.len());
        self.entries.insert(index, LinkEntry::default());
    }

    /// Drop the child at `index` and every link through it.
    pub(crate) fn remove(&mut self, index: usize) {
        if index >= self.entries.len() {
            return;
        }
        let removed = self.entries.remove(index);
        if removed.is_anchor {
            for e in &mut self.entries {
                if e.anchor == Some(index) {
                    *e = LinkEntry::default();
                }
            }
        }
        for e in &mut self.entries {
            if let Some(a) = e.anchor.as_mut() {
                if *a > index {
                    *a -= 1;
                }
            }
        }
        self.clear_orphan_anchors();
    }

    /// Link `targets` to `anchor`, unifying with existing links.
    pub(crate) fn link(&mut self, anchor: usize, targets: &[(usize, f64)]) {
        let n = self.entries.len();
        if anchor >= n {
            return;
        }
        let (root, base) = match self.entries[anchor].anchor {
            Some(root) => (root, self.entries[anchor].factor),
            None => (anchor, 1.0),
        };
        let mut linked = false;
        for &(target, scale) in targets {
            if target >= n || target == anchor || target == root {
                continue;
            }
            let factor = base * scale;
            if self.entries[target].is_anchor {
                for e in &mut self.entries {
                    if e.anchor == Some(target) {
                        e.anchor = Some(root);
                        e.factor *= factor;
                    }
                }
            }
            self.entries[target] = LinkEntry {
                anchor: Some(root),
                factor,
                is_anchor: false,
            };
            linked = true;
        }
        if linked {
            self.entries[root].is_anchor = true;
            self.entries[root].anchor = None;
        }
        self.clear_orphan_anchors();
    }

    /// Sizes for linked children given the band each anchor may fill.
    /// Unlinked children get `None`.
    pub(crate) fn resolve(&self, n: usize, available: i32) -> Vec<Option<i32>> {
        let mut sizes = vec![None; n];
        for (i, e) in self.entries.iter().enumerate() {
            if !e.is_anchor || i >= n {
                continue;
            }
            let fmax = self
                .dependents(i)
                .map(|(_, f)| f)
                .fold(1.0_f64, f64::max);
            let f = f64::from(available) / fmax;
            sizes[i] = Some(round_half_up(f));
            for (j, factor) in self.dependents(i) {
                if j < n {
                    sizes[j] = Some(round_half_up(factor * f));
                }
            }
        }
        sizes
    }

    fn dependents(&self, anchor: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.anchor == Some(anchor))
            .map(|(j, e)| (j, e.factor))
    }

    fn clear_orphan_anchors(&mut self) {
        for i in 0..self.entries.len() {
            if self.entries[i].is_anchor && self.dependents(i).next().is_none() {
                self.entries[i].is_anchor = false;
            }
        }
    }
}

/// A component sized from the managed container: `extent * scale + offset`.
///
/// Applied to all three size tiers before each layout pass, unless the
/// result would be at least the container's own extent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContainerLink {
    pub component: ComponentId,
    pub axis: Axis,
    pub scale: f64,
    pub offset: f64,
}

impl ContainerLink {
    pub fn new(component: ComponentId, axis: Axis, scale: f64, offset: f64) -> Self {
        Self {
            component,
            axis,
            scale,
            offset,
        }
    }

    /// Resize the component for a container of `container`. Returns whether
    /// anything was written.
    pub(crate) fn apply(&self, host: &mut dyn Host, container: Size) -> bool {
        let extent = container.get(self.axis);
        let value = round_half_up(f64::from(extent) * self.scale + self.offset);
        if value >= extent {
            return false;
        }
        for tier in Tier::ALL {
            let size = host.size(self.component, tier).with(self.axis, value);
            host.set_size(self.component, tier, size);
        }
        true
    }
}

impl CellTree {
    /// Set each target's widths to `factor` times the anchor's.
    pub fn link_width(
        &mut self,
        host: &mut dyn Host,
        anchor: ComponentId,
        targets: &[(ComponentId, f64)],
    ) {
        self.link_size(host, Axis::Horizontal, anchor, targets);
    }

    /// Set each target's heights to `factor` times the anchor's.
    pub fn link_height(
        &mut self,
        host: &mut dyn Host,
        anchor: ComponentId,
        targets: &[(ComponentId, f64)],
    ) {
        self.link_size(host, Axis::Vertical, anchor, targets);
    }

    /// Give every component the width of the widest one.
    pub fn link_maximum_width(&mut self, host: &mut dyn Host, components: &[ComponentId]) {
        self.link_maximum(host, Axis::Horizontal, components);
    }

    /// Give every component the height of the tallest one.
    pub fn link_maximum_height(&mut self, host: &mut dyn Host, components: &[ComponentId]) {
        self.link_maximum(host, Axis::Vertical, components);
    }

    fn link_maximum(&mut self, host: &mut dyn Host, axis: Axis, components: &[ComponentId]) {
        let Some(&anchor) = components
            .iter()
            .max_by_key(|&&c| host.size(c, Tier::Preferred).get(axis))
        else {
            return;
        };
        let targets: Vec<(ComponentId, f64)> = components
            .iter()
            .filter(|&&c| c != anchor)
            .map(|&c| (c, 1.0))
            .collect();
        self.link_size(host, axis, anchor, &targets);
    }

    /// Resize `targets` along `axis` and register a live link when possible.
    pub fn link_size(
        &mut self,
        host: &mut dyn Host,
        axis: Axis,
        anchor: ComponentId,
        targets: &[(ComponentId, f64)],
    ) {
        let anchor_sizes = Tier::ALL.map(|t| host.size(anchor, t).get(axis));
        for &(target, factor) in targets {
            for (tier, &dim) in Tier::ALL.iter().zip(anchor_sizes.iter()) {
                let value = if dim >= UNBOUNDED {
                    UNBOUNDED
                } else {
                    round_half_up(factor * f64::from(dim))
                };
                let size = host.size(target, *tier).with(axis, value);
                host.set_size(target, *tier, size);
            }
            self.touch_component(target);
        }

        if anchor_sizes[0] == anchor_sizes[1] && anchor_sizes[1] == anchor_sizes[2] {
            return;
        }
        if let Err(reason) = self.register_link(axis, anchor, targets) {
            tracing::warn!(?axis, ?anchor, reason, "link resized targets only");
            self.report(Diagnostic::LinkNotRegistered { axis, reason });
        }
    }

    fn register_link(
        &mut self,
        axis: Axis,
        anchor: ComponentId,
        targets: &[(ComponentId, f64)],
    ) -> Result<(), &'static str> {
        let anchor_cell = self.leaf_of(anchor).ok_or("anchor has no leaf cell")?;
        let parent = self
            .parent(anchor_cell)
            .ok_or("anchor is not inside a row or column")?;
        let seq = self
            .sequence(parent)
            .map_err(|_| "anchor is not inside a row or column")?;
        if seq.axis() != axis.cross() {
            return Err("links along a sequence's main axis are not tracked");
        }

        let index_of = |component: ComponentId| {
            seq.children().iter().position(|&c| {
                matches!(
                    self.get(c).map(|cell| &cell.kind),
                    Some(CellKind::Leaf(l)) if l.component() == component
                )
            })
        };
        let anchor_index = index_of(anchor).ok_or("anchor is not inside a row or column")?;
        let mut indices = Vec::with_capacity(targets.len());
        for &(target, factor) in targets {
            let i = index_of(target).ok_or("target is not a sibling of the anchor")?;
            indices.push((i, factor));
        }

        if let Ok(seq) = self.sequence_mut(parent) {
            seq.links.link(anchor_index, &indices);
        }
        self.touch(parent);
        tracing::debug!(cell = parent.0, anchor = anchor_index, ?indices, "registered link");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::Alignment;
    use crate::cell::AddOptions;
    use crate::host::{Component, ComponentTable};
    use crate::spring::Rect;

    fn table(n: usize) -> LinkTable {
        let mut t = LinkTable::default();
        for i in 0..n {
            t.insert(i);
        }
        t
    }

    // ── LinkTable ───────────────────────────────────────────────────────

    #[test]
    fn simple_link_resolves_from_band() {
        let mut t = table(3);
        t.link(0, &[(1, 1.0), (2, 0.5)]);
        assert!(t.is_anchor(0));
        assert_eq!(t.resolve(3, 40), vec![Some(40), Some(40), Some(20)]);
    }

    #[test]
    fn factor_above_one_scales_anchor_down() {
        let mut t = table(2);
        t.link(0, &[(1, 2.0)]);
        assert_eq!(t.resolve(2, 40), vec![Some(20), Some(40)]);
    }

    #[test]
    fn linking_from_a_dependent_uses_its_anchor() {
        let mut t = table(3);
        t.link(0, &[(1, 0.5)]);
        t.link(1, &[(2, 0.5)]);
        assert_eq!(t.anchor_of(2), Some((0, 0.25)));
        assert!(!t.is_anchor(1));
    }

    #[test]
    fn target_anchor_hands_over_its_dependents() {
        let mut t = table(4);
        t.link(1, &[(2, 3.0)]);
        t.link(0, &[(1, 0.5)]);
        assert!(t.is_anchor(0));
        assert!(!t.is_anchor(1));
        assert_eq!(t.anchor_of(1), Some((0, 0.5)));
        assert_eq!(t.anchor_of(2), Some((0, 1.5)));
    }

    #[test]
    fn self_links_are_ignored() {
        let mut t = table(2);
        t.link(0, &[(0, 2.0), (5, 1.0)]);
        assert!(t.is_empty());
    }

    #[test]
    fn removal_shifts_and_drops_links() {
        let mut t = table(4);
        t.link(1, &[(3, 0.5)]);
        t.remove(0);
        assert_eq!(t.anchor_of(2), Some((0, 0.5)));
        t.remove(0);
        assert!(t.is_empty());
        assert_eq!(t.anchor_of(1), None);
    }

    #[test]
    fn insertion_shifts_anchor_indices() {
        let mut t = table(2);
        t.link(0, &[(1, 1.0)]);
        t.insert(0);
        assert_eq!(t.anchor_of(2), Some((1, 1.0)));
    }

    // ── Tree links ──────────────────────────────────────────────────────

    #[test]
    fn unbounded_anchor_makes_target_unbounded() {
        let mut host = ComponentTable::new();
        let anchor = host.insert(Component::new(Size::new(120, 20)));
        let target = host.insert(Component::fixed(Size::new(10, 10)));
        let mut tree = CellTree::new();
        tree.link_width(&mut host, anchor, &[(target, 2.0)]);
        assert_eq!(host.minimum_size(target), Size::new(0, 10));
        assert_eq!(host.preferred_size(target), Size::new(240, 10));
        assert_eq!(host.maximum_size(target), Size::new(UNBOUNDED, 10));
    }

    #[test]
    fn height_link_is_live_in_a_row() {
        let mut host = ComponentTable::new();
        let anchor = host.insert(Component::new(Size::new(50, 20)));
        let half = host.insert(Component::new(Size::new(50, 5)));
        let mut tree = CellTree::new();
        let row = tree.row(Alignment::None, Alignment::Center);
        tree.add(row, anchor, AddOptions::new()).unwrap();
        tree.add(row, half, AddOptions::new()).unwrap();
        tree.link_height(&mut host, anchor, &[(half, 0.5)]);
        assert!(!tree.sequence(row).unwrap().links().is_empty());

        tree.layout(row, &mut host, Rect::new(0, 0, 100, 80));
        assert_eq!(host.bounds(anchor), Some(Rect::new(0, 0, 50, 80)));
        assert_eq!(host.bounds(half), Some(Rect::new(50, 20, 50, 40)));
    }

    #[test]
    fn width_link_in_a_row_is_not_live() {
        let mut tree = CellTree::with_config(crate::TreeConfig::new().diagnostics(true));
        let mut host = ComponentTable::new();
        let anchor = host.insert(Component::new(Size::new(50, 20)));
        let other = host.insert(Component::new(Size::new(10, 20)));
        let row = tree.row(Alignment::None, Alignment::None);
        tree.add(row, anchor, AddOptions::new()).unwrap();
        tree.add(row, other, AddOptions::new()).unwrap();
        tree.link_width(&mut host, anchor, &[(other, 1.0)]);
        assert_eq!(host.preferred_size(other), Size::new(50, 20));
        assert!(tree.sequence(row).unwrap().links().is_empty());
        assert!(matches!(
            tree.take_diagnostics().as_slice(),
            [Diagnostic::LinkNotRegistered { axis: Axis::Horizontal, .. }]
        ));
    }

    #[test]
    fn maximum_link_uses_the_largest() {
        let mut host = ComponentTable::new();
        let a = host.insert(Component::fixed(Size::new(70, 20)));
        let b = host.insert(Component::fixed(Size::new(90, 20)));
        let c = host.insert(Component::fixed(Size::new(40, 20)));
        let mut tree = CellTree::new();
        tree.link_maximum_width(&mut host, &[a, b, c]);
        for id in [a, b, c] {
            assert_eq!(host.preferred_size(id).width, 90);
            assert_eq!(host.maximum_size(id).width, 90);
        }
    }

    // ── Container links ─────────────────────────────────────────────────

    #[test]
    fn container_link_is_affine_and_bounded() {
        let mut host = ComponentTable::new();
        let c = host.insert(Component::new(Size::new(10, 10)));
        let link = ContainerLink::new(c, Axis::Horizontal, 0.5, -10.0);
        assert!(link.apply(&mut host, Size::new(200, 100)));
        assert_eq!(host.preferred_size(c), Size::new(90, 10));
        assert_eq!(host.maximum_size(c), Size::new(90, UNBOUNDED));

        let too_big = ContainerLink::new(c, Axis::Horizontal, 1.0, 5.0);
        assert!(!too_big.apply(&mut host, Size::new(200, 100)));
        assert_eq!(host.preferred_size(c), Size::new(90, 10));
    }
}
