//! Cells: the nodes of a layout tree.
//!
//! A [`Cell`] carries the state every node shares (name, parent, cached
//! spring, fixed-size overrides, alignment override, last bounds) and a
//! [`CellKind`] with the variant-specific data. Cells live in a
//! [`CellTree`](crate::CellTree) arena and refer to each other by [`CellId`].

#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::align::Alignment;
use crate::cards::{CardStack, TabGroup};
use crate::grid::Grid;
use crate::host::{ComponentId, Host};
use crate::panel::PanelCell;
use crate::sequence::Sequence;
use crate::spring::{Axis, Extent, Rect, Size, Spring, Tier, UNBOUNDED};

/// Handle to a cell in a [`CellTree`](crate::CellTree).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub(crate) u32);

impl CellId {
    /// Arena slot of this cell.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node in a layout tree.
#[derive(Clone, Debug)]
pub struct Cell {
    pub(crate) name: Option<String>,
    pub(crate) parent: Option<CellId>,
    pub(crate) spring: Option<Spring>,
    pub(crate) fixed: [bool; 2],
    pub(crate) fix_max: bool,
    pub(crate) align: Option<Alignment>,
    pub(crate) bounds: Option<Rect>,
    pub(crate) kind: CellKind,
}

impl Cell {
    pub(crate) fn new(kind: CellKind) -> Self {
        Self {
            name: None,
            parent: None,
            spring: None,
            fixed: [false; 2],
            fix_max: false,
            align: None,
            bounds: None,
            kind,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parent(&self) -> Option<CellId> {
        self.parent
    }

    pub fn kind(&self) -> &CellKind {
        &self.kind
    }

    /// Rectangle assigned by the last layout pass, in the coordinates of the
    /// enclosing component.
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// Alignment override within the parent, if any.
    pub fn alignment(&self) -> Option<Alignment> {
        self.align
    }

    /// Whether the spring is forced to its preferred size along `axis`.
    pub fn is_fixed(&self, axis: Axis) -> bool {
        self.fixed[axis.index()]
    }

    /// Whether the spring's maximum is capped at twice its preferred size.
    pub fn fix_max_size(&self) -> bool {
        self.fix_max
    }

    /// Spring cached by the last computation, if still valid.
    pub fn cached_spring(&self) -> Option<Spring> {
        self.spring
    }
}

/// Variant-specific data of a [`Cell`].
#[derive(Clone, Debug)]
pub enum CellKind {
    Gap(GapCell),
    Leaf(LeafCell),
    Sequence(Sequence),
    Grid(Grid),
    Cards(CardStack),
    Tabs(TabGroup),
    Panel(PanelCell),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum KindTag {
    Gap,
    Leaf,
    Sequence,
    Grid,
    Cards,
    Tabs,
    Panel,
}

impl CellKind {
    /// Short lowercase name of the variant.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Gap(_) => "gap",
            Self::Leaf(_) => "leaf",
            Self::Sequence(s) if s.axis() == Axis::Horizontal => "row",
            Self::Sequence(_) => "column",
            Self::Grid(_) => "grid",
            Self::Cards(_) => "card stack",
            Self::Tabs(_) => "tab group",
            Self::Panel(_) => "panel",
        }
    }

    pub(crate) fn tag(&self) -> KindTag {
        match self {
            Self::Gap(_) => KindTag::Gap,
            Self::Leaf(_) => KindTag::Leaf,
            Self::Sequence(_) => KindTag::Sequence,
            Self::Grid(_) => KindTag::Grid,
            Self::Cards(_) => KindTag::Cards,
            Self::Tabs(_) => KindTag::Tabs,
            Self::Panel(_) => KindTag::Panel,
        }
    }

    /// Direct children, in layout order.
    pub fn children(&self) -> Vec<CellId> {
        match self {
            Self::Gap(_) | Self::Leaf(_) => Vec::new(),
            Self::Sequence(s) => s.children().to_vec(),
            Self::Grid(g) => g.cells().collect(),
            Self::Cards(c) => c.cards().map(|(_, id)| id).collect(),
            Self::Tabs(t) => t.tabs().map(|(_, id)| id).collect(),
            Self::Panel(p) => [p.child()].to_vec(),
        }
    }

    pub(crate) fn child_slots_mut(&mut self) -> Vec<&mut CellId> {
        match self {
            Self::Gap(_) | Self::Leaf(_) => Vec::new(),
            Self::Sequence(s) => s.children.iter_mut().collect(),
            Self::Grid(g) => g.cell_slots_mut(),
            Self::Cards(c) => c.cards.iter_mut().map(|(_, id)| id).collect(),
            Self::Tabs(t) => t.tabs.iter_mut().map(|(_, id)| id).collect(),
            Self::Panel(p) => [&mut p.child].into_iter().collect(),
        }
    }

    /// Components owned directly by this node (not by its children).
    pub(crate) fn own_component(&self) -> Option<ComponentId> {
        match self {
            Self::Leaf(l) => Some(l.component),
            Self::Panel(p) => Some(p.component),
            Self::Tabs(t) => Some(t.pane),
            _ => None,
        }
    }

    pub(crate) fn remap_component(&mut self, map: &mut dyn FnMut(ComponentId) -> ComponentId) {
        match self {
            Self::Leaf(l) => l.component = map(l.component),
            Self::Panel(p) => p.component = map(p.component),
            Self::Tabs(t) => t.pane = map(t.pane),
            _ => {}
        }
    }

    pub(crate) fn clear_cache(&mut self) {
        match self {
            Self::Sequence(s) => s.cache = None,
            Self::Grid(g) => g.cache = None,
            _ => {}
        }
    }
}

/// Empty space along one axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GapCell {
    axis: Axis,
    extent: Extent,
}

impl GapCell {
    /// Rigid gap of `length` pixels along `axis`.
    pub fn fixed(axis: Axis, length: i32) -> Self {
        Self {
            axis,
            extent: Extent::fixed(length),
        }
    }

    /// Stretchable gap along `axis`.
    pub fn flexible(axis: Axis, min: i32, pref: i32, max: i32) -> Self {
        Self {
            axis,
            extent: Extent::new(min, pref, max),
        }
    }

    /// Rigid horizontal gap.
    pub fn horizontal(length: i32) -> Self {
        Self::fixed(Axis::Horizontal, length)
    }

    /// Rigid vertical gap.
    pub fn vertical(length: i32) -> Self {
        Self::fixed(Axis::Vertical, length)
    }

    /// The stretch gap sequences insert to realise center, end and
    /// justified alignment.
    pub fn filler(axis: Axis) -> Self {
        Self::flexible(axis, 0, 1, UNBOUNDED)
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn spring(&self) -> Spring {
        Spring::gap(self.axis, self.extent)
    }
}

/// Builder for a leaf cell wrapping a component.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Leaf {
    component: ComponentId,
    gaps: Option<Size>,
    baseline: bool,
}

impl Leaf {
    pub fn new(component: ComponentId) -> Self {
        Self {
            component,
            gaps: None,
            baseline: false,
        }
    }

    /// Space on each side of the component. Defaults to the tree's
    /// configured leaf gaps.
    pub fn gaps(mut self, horizontal: i32, vertical: i32) -> Self {
        self.gaps = Some(Size::new(horizontal, vertical));
        self
    }

    /// Whether the component has a text baseline worth aligning.
    pub fn baseline(mut self, capable: bool) -> Self {
        self.baseline = capable;
        self
    }

    pub(crate) fn build(self, default_gaps: Size) -> LeafCell {
        LeafCell {
            component: self.component,
            gaps: self.gaps.unwrap_or(default_gaps),
            baseline: self.baseline,
            baseline_offset: 0,
        }
    }
}

impl From<ComponentId> for Leaf {
    fn from(component: ComponentId) -> Self {
        Self::new(component)
    }
}

/// A cell wrapping one host component.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LeafCell {
    pub(crate) component: ComponentId,
    pub(crate) gaps: Size,
    pub(crate) baseline: bool,
    pub(crate) baseline_offset: i32,
}

impl LeafCell {
    pub fn component(&self) -> ComponentId {
        self.component
    }

    /// Horizontal and vertical space on each side of the component.
    pub fn gaps(&self) -> Size {
        self.gaps
    }

    pub fn is_baseline_capable(&self) -> bool {
        self.baseline
    }

    /// Extra space above the component from explicit baseline alignment.
    pub fn baseline_offset(&self) -> i32 {
        self.baseline_offset
    }

    pub(crate) fn spring(&self, host: &dyn Host) -> Spring {
        let c = self.component;
        Spring::from_sizes(
            host.size(c, Tier::Minimum),
            host.size(c, Tier::Preferred),
            host.size(c, Tier::Maximum),
        )
        .inset(
            2 * self.gaps.width,
            2 * self.gaps.height + self.baseline_offset,
        )
    }

    /// Distance from the top of the cell to the component's baseline.
    pub(crate) fn baseline(&self, host: &dyn Host) -> Option<i32> {
        if !self.baseline {
            return None;
        }
        host.baseline(self.component)
            .map(|b| b + self.gaps.height + self.baseline_offset)
    }

    /// Push `rect` to the component and return the cell's actual bounds.
    pub(crate) fn place(&self, host: &mut dyn Host, rect: Rect, spring: Spring) -> Rect {
        let width = if spring.is_fixed(Axis::Horizontal) {
            spring.pref(Axis::Horizontal)
        } else {
            rect.width
        };
        let height = if spring.is_fixed(Axis::Vertical) {
            spring.pref(Axis::Vertical)
        } else {
            rect.height
        };
        let g = self.gaps;
        host.set_bounds(
            self.component,
            Rect::new(
                rect.x + g.width,
                rect.y + g.height + self.baseline_offset,
                width - 2 * g.width,
                height - 2 * g.height - self.baseline_offset,
            ),
        );
        Rect::new(rect.x, rect.y, width, height)
    }
}

/// Anything that can be added to a container.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Item {
    /// An existing cell without a parent.
    Cell(CellId),
    /// A component, wrapped in a leaf with the tree's default gaps.
    Component(ComponentId),
    /// A configured leaf.
    Leaf(Leaf),
    /// Empty space.
    Gap(GapCell),
}

impl From<CellId> for Item {
    fn from(id: CellId) -> Self {
        Self::Cell(id)
    }
}

impl From<ComponentId> for Item {
    fn from(id: ComponentId) -> Self {
        Self::Component(id)
    }
}

impl From<Leaf> for Item {
    fn from(leaf: Leaf) -> Self {
        Self::Leaf(leaf)
    }
}

impl From<GapCell> for Item {
    fn from(gap: GapCell) -> Self {
        Self::Gap(gap)
    }
}

/// Options for adding an [`Item`] to a container.
///
/// ```
/// use zenpage::{AddOptions, Alignment};
///
/// let opts = AddOptions::new().align(Alignment::Center).name("ok-button");
/// assert_eq!(opts.alignment(), Some(Alignment::Center));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AddOptions {
    align: Option<Alignment>,
    name: Option<String>,
}

impl AddOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cross-axis alignment for this child, overriding the container's.
    pub fn align(mut self, align: Alignment) -> Self {
        self.align = Some(align);
        self
    }

    /// Name for lookup with [`CellTree::find`](crate::CellTree::find).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn alignment(&self) -> Option<Alignment> {
        self.align
    }

    pub(crate) fn take_name(&mut self) -> Option<String> {
        self.name.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Component, ComponentTable};

    #[test]
    fn gap_spring_is_zero_across() {
        let s = GapCell::horizontal(12).spring();
        assert!(s.is_gap());
        assert_eq!(s.extent(Axis::Horizontal), Extent::fixed(12));
        assert_eq!(s.extent(Axis::Vertical), Extent::ZERO);
    }

    #[test]
    fn filler_is_stretchable() {
        let s = GapCell::filler(Axis::Vertical).spring();
        assert_eq!(s.extent(Axis::Vertical), Extent::new(0, 1, UNBOUNDED));
        assert!(!s.is_fixed(Axis::Vertical));
    }

    #[test]
    fn leaf_spring_adds_gaps_on_both_sides() {
        let mut host = ComponentTable::new();
        let c = host.insert(Component::fixed(Size::new(100, 20)));
        let leaf = Leaf::new(c).gaps(3, 2).build(Size::ZERO);
        let s = leaf.spring(&host);
        assert_eq!(s.extent(Axis::Horizontal), Extent::fixed(106));
        assert_eq!(s.extent(Axis::Vertical), Extent::fixed(24));
    }

    #[test]
    fn leaf_place_shrinks_fixed_axis_and_insets() {
        let mut host = ComponentTable::new();
        let c = host.insert(Component::fixed(Size::new(100, 20)));
        let leaf = Leaf::new(c).gaps(3, 2).build(Size::ZERO);
        let spring = leaf.spring(&host);
        let actual = leaf.place(&mut host, Rect::new(10, 10, 300, 50), spring);
        assert_eq!(actual, Rect::new(10, 10, 106, 24));
        assert_eq!(host.bounds(c), Some(Rect::new(13, 12, 100, 20)));
    }

    #[test]
    fn baseline_needs_capability() {
        let mut host = ComponentTable::new();
        let c = host.insert(Component::new(Size::new(50, 20)).with_baseline(15));
        let plain = Leaf::new(c).build(Size::new(0, 4));
        let text = Leaf::new(c).baseline(true).build(Size::new(0, 4));
        assert_eq!(plain.baseline(&host), None);
        assert_eq!(text.baseline(&host), Some(19));
    }
}
