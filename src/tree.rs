//! The cell arena: ownership, caching, editing and the layout pass.
//!
//! A [`CellTree`] owns every cell. Containers refer to their children and
//! children to their parent by [`CellId`]; a cell has at most one parent and
//! a parent exclusively owns its children. Removing a cell frees its whole
//! subtree and its slots are reused by later cells, so ids of removed cells
//! must not be kept.
//!
//! Springs are cached per cell. Every edit made through the tree clears the
//! cache of the edited subtree and of each ancestor up to the root; edits
//! made directly on the host (changing a component's declared size, say)
//! need an explicit [`CellTree::invalidate`].
//!
//! # Example
//!
//! ```
//! use zenpage::{AddOptions, Alignment, CellTree, Component, ComponentTable, Rect, Size};
//!
//! let mut host = ComponentTable::new();
//! let label = host.insert(Component::fixed(Size::new(60, 20)));
//! let field = host.insert(Component::new(Size::new(150, 20)));
//!
//! let mut tree = CellTree::new();
//! let row = tree.row(Alignment::None, Alignment::Center);
//! tree.add(row, label, AddOptions::new()).unwrap();
//! let f = tree.add(row, field, AddOptions::new().name("field")).unwrap();
//!
//! tree.layout(row, &mut host, Rect::new(0, 0, 400, 20));
//! assert_eq!(tree.find(row, "field"), Some(f));
//! assert_eq!(host.bounds(field), Some(Rect::new(60, 0, 340, 20)));
//! ```

#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::align::Alignment;
use crate::cell::{Cell, CellId, CellKind, GapCell, Item, KindTag, Leaf};
use crate::error::{CellError, Diagnostic};
use crate::host::{ComponentId, Host};
use crate::spring::{Axis, Rect, Size, Spring, Tier, UNBOUNDED};

/// Defaults applied when cells are created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeConfig {
    /// Space on each side of a component wrapped without explicit gaps.
    pub leaf_gaps: Size,
    /// Space between a panel's border and its content.
    pub panel_gaps: Size,
    /// Whether new card stacks size to the union of all cards.
    pub cards_use_max_bounds: bool,
    /// Record [`Diagnostic`]s for [`CellTree::take_diagnostics`].
    pub diagnostics: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            leaf_gaps: Size::ZERO,
            panel_gaps: Size::ZERO,
            cards_use_max_bounds: true,
            diagnostics: false,
        }
    }
}

impl TreeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Three pixels around every component and inside every panel.
    pub fn spaced() -> Self {
        Self::new().leaf_gaps(3, 3).panel_gaps(3, 3)
    }

    pub fn leaf_gaps(mut self, horizontal: i32, vertical: i32) -> Self {
        self.leaf_gaps = Size::new(horizontal, vertical);
        self
    }

    pub fn panel_gaps(mut self, horizontal: i32, vertical: i32) -> Self {
        self.panel_gaps = Size::new(horizontal, vertical);
        self
    }

    pub fn cards_use_max_bounds(mut self, enabled: bool) -> Self {
        self.cards_use_max_bounds = enabled;
        self
    }

    pub fn diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }
}

/// Arena of layout cells.
#[derive(Clone, Debug, Default)]
pub struct CellTree {
    cells: Vec<Option<Cell>>,
    free: Vec<u32>,
    config: TreeConfig,
    diagnostics: Vec<Diagnostic>,
}

impl CellTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Number of live cells.
    pub fn len(&self) -> usize {
        self.cells.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: CellId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.index()).and_then(Option::as_ref)
    }

    pub(crate) fn cell_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.cells.get_mut(id.index()).and_then(Option::as_mut)
    }

    fn cell_or_err(&self, id: CellId) -> Result<&Cell, CellError> {
        self.get(id).ok_or(CellError::UnknownCell(id))
    }

    pub(crate) fn create(&mut self, kind: CellKind) -> CellId {
        self.insert_cell(Cell::new(kind))
    }

    fn insert_cell(&mut self, cell: Cell) -> CellId {
        match self.free.pop() {
            Some(slot) => {
                self.cells[slot as usize] = Some(cell);
                CellId(slot)
            }
            None => {
                self.cells.push(Some(cell));
                CellId((self.cells.len() - 1) as u32)
            }
        }
    }

    /// Free a single cell that was never attached to the host.
    pub(crate) fn discard(&mut self, id: CellId) {
        if let Some(slot) = self.cells.get_mut(id.index()) {
            if slot.take().is_some() {
                self.free.push(id.0);
            }
        }
    }

    /// A free-standing gap cell.
    pub fn gap(&mut self, gap: GapCell) -> CellId {
        self.create(CellKind::Gap(gap))
    }

    /// A free-standing leaf for `component`.
    pub fn leaf(&mut self, leaf: impl Into<Leaf>) -> CellId {
        let leaf = leaf.into().build(self.config.leaf_gaps);
        self.create(CellKind::Leaf(leaf))
    }

    pub fn set_name(&mut self, id: CellId, name: impl Into<String>) -> Result<(), CellError> {
        let cell = self.cell_mut(id).ok_or(CellError::UnknownCell(id))?;
        cell.name = Some(name.into());
        Ok(())
    }

    // ── Navigation ──────────────────────────────────────────────────────

    pub fn parent(&self, id: CellId) -> Option<CellId> {
        self.get(id).and_then(|c| c.parent)
    }

    /// Topmost ancestor of `id`, or `id` itself.
    pub fn root_of(&self, id: CellId) -> CellId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Direct children in layout order. Empty for leaves and unknown ids.
    pub fn children(&self, id: CellId) -> Vec<CellId> {
        self.get(id).map(|c| c.kind.children()).unwrap_or_default()
    }

    /// Bounds assigned to the cell by the last layout pass.
    pub fn bounds(&self, id: CellId) -> Option<Rect> {
        self.get(id).and_then(|c| c.bounds)
    }

    /// `id` and every cell below it, parents before children.
    pub fn descendants(&self, id: CellId) -> Vec<CellId> {
        let mut out = Vec::new();
        let mut stack = Vec::new();
        if self.contains(id) {
            stack.push(id);
        }
        while let Some(current) = stack.pop() {
            out.push(current);
            let children = self.children(current);
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// First cell below `root` (inclusive) with the given name.
    pub fn find(&self, root: CellId, name: &str) -> Option<CellId> {
        self.descendants(root)
            .into_iter()
            .find(|&id| self.get(id).and_then(Cell::name) == Some(name))
    }

    /// Leaf wrapping `component` below `root` (inclusive).
    pub fn find_component(&self, root: CellId, component: ComponentId) -> Option<CellId> {
        self.descendants(root)
            .into_iter()
            .find(|&id| self.leaf_component(id) == Some(component))
    }

    /// Every component below `id`, including panel and tab pane components.
    pub fn components(&self, id: CellId) -> Vec<ComponentId> {
        self.descendants(id)
            .into_iter()
            .filter_map(|c| self.get(c).and_then(|cell| cell.kind.own_component()))
            .collect()
    }

    /// Leaf in the arena wrapping `component`. One that sits inside a
    /// container wins over a free-standing one.
    pub(crate) fn leaf_of(&self, component: ComponentId) -> Option<CellId> {
        let mut loose = None;
        for (i, c) in self.cells.iter().enumerate() {
            let Some(Cell {
                kind: CellKind::Leaf(l),
                parent,
                ..
            }) = c
            else {
                continue;
            };
            if l.component != component {
                continue;
            }
            let id = CellId(i as u32);
            if parent.is_some() {
                return Some(id);
            }
            loose.get_or_insert(id);
        }
        loose
    }

    fn leaf_component(&self, id: CellId) -> Option<ComponentId> {
        match &self.get(id)?.kind {
            CellKind::Leaf(l) => Some(l.component),
            _ => None,
        }
    }

    fn is_ancestor(&self, ancestor: CellId, id: CellId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent(c);
        }
        false
    }

    /// Component that hosts the components below `id`: the nearest panel or
    /// tab pane above it, or the top-level container.
    fn host_container(&self, id: CellId) -> Option<ComponentId> {
        let mut current = self.parent(id);
        while let Some(c) = current {
            match &self.get(c)?.kind {
                CellKind::Panel(p) => return Some(p.component),
                CellKind::Tabs(t) => return Some(t.pane),
                _ => current = self.parent(c),
            }
        }
        None
    }

    // ── Structure ───────────────────────────────────────────────────────

    /// Turn `item` into a cell whose parent is `parent`. The caller records
    /// the child in the parent's own structure.
    pub(crate) fn adopt(&mut self, parent: CellId, item: Item) -> Result<CellId, CellError> {
        self.cell_or_err(parent)?;
        let child = match item {
            Item::Cell(id) => {
                let cell = self.cell_or_err(id)?;
                if cell.parent.is_some() {
                    return Err(CellError::AlreadyAttached(id));
                }
                if self.is_ancestor(id, parent) {
                    return Err(CellError::Cycle(id));
                }
                id
            }
            Item::Component(component) => self.leaf(component),
            Item::Leaf(leaf) => self.leaf(leaf),
            Item::Gap(gap) => self.gap(gap),
        };
        if let Some(cell) = self.cell_mut(child) {
            cell.parent = Some(parent);
        }
        Ok(child)
    }

    /// Put `item` where `old` is in its parent. The old subtree is freed and
    /// its components detached from the host; the new one's are attached.
    pub fn replace(
        &mut self,
        host: &mut dyn Host,
        old: CellId,
        item: impl Into<Item>,
    ) -> Result<CellId, CellError> {
        let cell = self.cell_or_err(old)?;
        let parent = cell.parent.ok_or(CellError::NoParent(old))?;
        let align = cell.align;
        let new = self.adopt(parent, item.into())?;
        if let Some(p) = self.cell_mut(parent) {
            for slot in p.kind.child_slots_mut() {
                if *slot == old {
                    *slot = new;
                }
            }
        }
        if let Some(cell) = self.cell_mut(new) {
            if cell.align.is_none() {
                cell.align = align;
            }
        }
        self.release(host, old);
        self.attach_components(host, new);
        self.touch(parent);
        tracing::debug!(old = old.0, new = new.0, parent = parent.0, "replaced cell");
        Ok(new)
    }

    /// Take a cell out of its parent, detach its components from the host
    /// and free the subtree.
    ///
    /// A panel's only child is replaced by an empty gap.
    pub fn remove(&mut self, host: &mut dyn Host, id: CellId) -> Result<(), CellError> {
        let parent = self.cell_or_err(id)?.parent;
        if let Some(parent) = parent {
            let placeholder = match self.get(parent).map(|p| p.kind.tag()) {
                Some(KindTag::Panel) => Some(self.gap(GapCell::horizontal(0))),
                _ => None,
            };
            if let Some(p) = placeholder {
                if let Some(cell) = self.cell_mut(p) {
                    cell.parent = Some(parent);
                }
            }
            if let Some(cell) = self.cell_mut(parent) {
                match &mut cell.kind {
                    CellKind::Sequence(s) => {
                        s.remove_child(id);
                    }
                    CellKind::Grid(g) => g.remove_cell(id),
                    CellKind::Cards(c) => c.remove_card(id),
                    CellKind::Tabs(t) => t.remove_tab(id),
                    CellKind::Panel(p) => {
                        if let Some(placeholder) = placeholder {
                            p.child = placeholder;
                        }
                    }
                    CellKind::Gap(_) | CellKind::Leaf(_) => {}
                }
            }
            self.touch(parent);
        }
        self.release(host, id);
        tracing::debug!(cell = id.0, "removed cell");
        Ok(())
    }

    /// Remove the leaf wrapping `component` below `root`. Returns whether one
    /// was found.
    pub fn remove_component(
        &mut self,
        host: &mut dyn Host,
        root: CellId,
        component: ComponentId,
    ) -> Result<bool, CellError> {
        self.cell_or_err(root)?;
        match self.find_component(root, component) {
            Some(leaf) => self.remove(host, leaf).map(|()| true),
            None => Ok(false),
        }
    }

    pub(crate) fn release(&mut self, host: &mut dyn Host, id: CellId) {
        for component in self.components(id) {
            host.detach(component);
        }
        for cell in self.descendants(id) {
            if let Some(slot) = self.cells.get_mut(cell.index()) {
                if slot.take().is_some() {
                    self.free.push(cell.0);
                }
            }
        }
    }

    /// Deep-copy a subtree, passing every component through `map`. The copy
    /// has no parent.
    pub fn duplicate(
        &mut self,
        id: CellId,
        map: &mut dyn FnMut(ComponentId) -> ComponentId,
    ) -> Result<CellId, CellError> {
        self.cell_or_err(id)?;
        self.duplicate_into(id, None, map)
            .ok_or(CellError::UnknownCell(id))
    }

    fn duplicate_into(
        &mut self,
        id: CellId,
        parent: Option<CellId>,
        map: &mut dyn FnMut(ComponentId) -> ComponentId,
    ) -> Option<CellId> {
        let mut cell = self.get(id)?.clone();
        cell.parent = parent;
        cell.spring = None;
        cell.bounds = None;
        cell.kind.clear_cache();
        cell.kind.remap_component(map);
        let copy = self.insert_cell(cell);

        let copies: Vec<CellId> = self
            .children(id)
            .into_iter()
            .filter_map(|child| self.duplicate_into(child, Some(copy), map))
            .collect();
        if let Some(cell) = self.cell_mut(copy) {
            for (slot, child) in cell.kind.child_slots_mut().into_iter().zip(copies) {
                *slot = child;
            }
        }
        Some(copy)
    }

    // ── Invalidation ────────────────────────────────────────────────────

    /// Drop cached springs of `id` and everything below it.
    pub fn invalidate(&mut self, id: CellId) {
        for cell in self.descendants(id) {
            if let Some(c) = self.cell_mut(cell) {
                c.spring = None;
                c.kind.clear_cache();
            }
        }
    }

    /// Invalidate `id`'s subtree and every ancestor.
    pub(crate) fn touch(&mut self, id: CellId) {
        self.invalidate(id);
        let mut current = self.parent(id);
        while let Some(c) = current {
            if let Some(cell) = self.cell_mut(c) {
                cell.spring = None;
                cell.kind.clear_cache();
            }
            current = self.parent(c);
        }
    }

    /// Touch every leaf wrapping `component`.
    pub(crate) fn touch_component(&mut self, component: ComponentId) {
        let leaves: Vec<CellId> = (0..self.cells.len() as u32)
            .map(CellId)
            .filter(|&id| self.leaf_component(id) == Some(component))
            .collect();
        for leaf in leaves {
            self.touch(leaf);
        }
    }

    // ── Springs and layout ──────────────────────────────────────────────

    /// The cell's spring, computed on first use and cached until invalidated.
    pub fn spring(&mut self, id: CellId, host: &dyn Host) -> Spring {
        let Some(cell) = self.get(id) else {
            return Spring::EMPTY;
        };
        if let Some(spring) = cell.spring {
            return spring;
        }
        let raw = match cell.kind.tag() {
            KindTag::Gap | KindTag::Leaf => match &cell.kind {
                CellKind::Gap(g) => g.spring(),
                CellKind::Leaf(l) => l.spring(host),
                _ => Spring::EMPTY,
            },
            KindTag::Sequence => self.sequence_spring(id, host),
            KindTag::Grid => self.grid_spring(id, host),
            KindTag::Cards => self.cards_spring(id, host),
            KindTag::Tabs => self.tabs_spring(id, host),
            KindTag::Panel => self.panel_spring(id, host),
        };

        let Some(cell) = self.cell_mut(id) else {
            return raw;
        };
        let mut spring = raw;
        for axis in Axis::BOTH {
            if cell.fixed[axis.index()] {
                spring = spring.fix(axis);
            }
        }
        if cell.fix_max {
            spring = spring.fix_max();
        }
        cell.spring = Some(spring);
        spring
    }

    /// Distance from the cell's top edge to the baseline it exposes.
    pub fn baseline(&self, id: CellId, host: &dyn Host) -> Option<i32> {
        match &self.get(id)?.kind {
            CellKind::Leaf(l) => l.baseline(host),
            CellKind::Sequence(_) => self.sequence_baseline(id, host),
            CellKind::Cards(c) => c.current_card().and_then(|card| self.baseline(card, host)),
            _ => None,
        }
    }

    /// Lay out the tree rooted at `root` inside `rect`.
    ///
    /// On an axis where the root is fixed it gets its preferred size, placed
    /// by its own alignment if it is a row or column. Elsewhere it gets the
    /// available extent, capped at its maximum.
    pub fn layout(&mut self, root: CellId, host: &mut dyn Host, rect: Rect) {
        tracing::debug!(cell = root.0, ?rect, "layout pass");
        let spring = self.spring(root, &*host);
        let own_align = match self.get(root).map(|c| &c.kind) {
            Some(CellKind::Sequence(s)) => [s.alignment(Axis::Horizontal), s.alignment(Axis::Vertical)],
            _ => [Alignment::None; 2],
        };
        let mut placed = rect;
        for axis in Axis::BOTH {
            let start = rect.start(axis);
            let available = rect.extent(axis);
            placed = if spring.is_fixed(axis) {
                let size = spring.pref(axis);
                let offset = own_align[axis.index()].offset(available, size).max(0);
                placed.with_span(axis, start + offset, size)
            } else {
                placed.with_span(axis, start, available.min(spring.max(axis)))
            };
        }
        self.place(root, host, placed);
    }

    /// Place a cell at `rect` and record its bounds.
    pub(crate) fn place(&mut self, id: CellId, host: &mut dyn Host, rect: Rect) {
        let Some(tag) = self.get(id).map(|c| c.kind.tag()) else {
            return;
        };
        let actual = match tag {
            KindTag::Gap => rect,
            KindTag::Leaf => {
                let spring = self.spring(id, &*host);
                match self.get(id).map(|c| &c.kind) {
                    Some(CellKind::Leaf(l)) => l.place(host, rect, spring),
                    _ => rect,
                }
            }
            KindTag::Sequence => {
                self.place_sequence(id, host, rect);
                rect
            }
            KindTag::Grid => {
                self.place_grid(id, host, rect);
                rect
            }
            KindTag::Cards => {
                self.place_cards(id, host, rect);
                rect
            }
            KindTag::Tabs => {
                self.place_tabs(id, host, rect);
                rect
            }
            KindTag::Panel => {
                self.place_panel(id, host, rect);
                rect
            }
        };
        if let Some(cell) = self.cell_mut(id) {
            cell.bounds = Some(actual);
        }
    }

    // ── Components ──────────────────────────────────────────────────────

    /// Attach every component below `id` to its hosting container, and hide
    /// the ones in cards or tabs that are not showing.
    pub fn attach_components(&self, host: &mut dyn Host, id: CellId) {
        let container = self.host_container(id);
        self.attach_subtree(host, id, container);
    }

    fn attach_subtree(&self, host: &mut dyn Host, id: CellId, container: Option<ComponentId>) {
        let Some(cell) = self.get(id) else {
            return;
        };
        match &cell.kind {
            CellKind::Leaf(l) => host.attach(l.component, container),
            CellKind::Panel(p) => {
                host.attach(p.component, container);
                self.attach_subtree(host, p.child, Some(p.component));
            }
            CellKind::Tabs(t) => {
                host.attach(t.pane, container);
                for (i, (_, tab)) in t.tabs.iter().enumerate() {
                    self.attach_subtree(host, *tab, Some(t.pane));
                    self.set_visible(host, *tab, t.selected == Some(i));
                }
            }
            CellKind::Cards(c) => {
                for (i, (_, card)) in c.cards.iter().enumerate() {
                    self.attach_subtree(host, *card, container);
                    self.set_visible(host, *card, c.current == Some(i));
                }
            }
            kind => {
                for child in kind.children() {
                    self.attach_subtree(host, child, container);
                }
            }
        }
    }

    /// Detach every component below `id` from the host.
    pub fn detach_components(&self, host: &mut dyn Host, id: CellId) {
        for component in self.components(id) {
            host.detach(component);
        }
    }

    /// Show or hide every component below `id`. Card stacks and tab groups
    /// only ever show their current card.
    pub fn set_visible(&self, host: &mut dyn Host, id: CellId, visible: bool) {
        let Some(cell) = self.get(id) else {
            return;
        };
        match &cell.kind {
            CellKind::Gap(_) => {}
            CellKind::Leaf(l) => host.set_visible(l.component, visible),
            CellKind::Panel(p) => {
                host.set_visible(p.component, visible);
                self.set_visible(host, p.child, visible);
            }
            CellKind::Tabs(t) => {
                host.set_visible(t.pane, visible);
                for (i, (_, tab)) in t.tabs.iter().enumerate() {
                    self.set_visible(host, *tab, visible && t.selected == Some(i));
                }
            }
            CellKind::Cards(c) => {
                for (i, (_, card)) in c.cards.iter().enumerate() {
                    self.set_visible(host, *card, visible && c.current == Some(i));
                }
            }
            kind => {
                for child in kind.children() {
                    self.set_visible(host, child, visible);
                }
            }
        }
    }

    /// Set the gaps of every leaf below `id`, including hidden cards.
    pub fn set_component_gaps(
        &mut self,
        id: CellId,
        horizontal: i32,
        vertical: i32,
    ) -> Result<(), CellError> {
        self.cell_or_err(id)?;
        for cell in self.descendants(id) {
            if let Some(Cell {
                kind: CellKind::Leaf(l),
                ..
            }) = self.cell_mut(cell)
            {
                l.gaps = Size::new(horizontal, vertical);
            }
        }
        self.touch(id);
        Ok(())
    }

    /// Shift baseline-capable components down so their baselines line up.
    ///
    /// Each listed component that is wrapped in a baseline-capable leaf gets
    /// a top offset of `max_baseline - baseline`, which its leaf's spring
    /// and placement include.
    pub fn align_baseline(&mut self, host: &dyn Host, components: &[ComponentId]) {
        let measured: Vec<(CellId, i32)> = components
            .iter()
            .filter_map(|&c| {
                let leaf = self.leaf_of(c)?;
                match &self.get(leaf)?.kind {
                    CellKind::Leaf(l) if l.baseline => {
                        host.baseline(c).map(|b| (leaf, b + l.gaps.height))
                    }
                    _ => None,
                }
            })
            .collect();
        let Some(top) = measured.iter().map(|&(_, b)| b).max() else {
            return;
        };
        for (leaf, baseline) in measured {
            if let Some(Cell {
                kind: CellKind::Leaf(l),
                ..
            }) = self.cell_mut(leaf)
            {
                l.baseline_offset = top - baseline;
            }
            self.touch(leaf);
        }
    }

    // ── Fixed sizes ─────────────────────────────────────────────────────

    pub fn set_fixed_width(&mut self, id: CellId, fixed: bool) -> Result<(), CellError> {
        self.set_fixed(id, Axis::Horizontal, fixed)
    }

    pub fn set_fixed_height(&mut self, id: CellId, fixed: bool) -> Result<(), CellError> {
        self.set_fixed(id, Axis::Vertical, fixed)
    }

    pub fn set_fixed_size(&mut self, id: CellId, fixed: bool) -> Result<(), CellError> {
        self.set_fixed(id, Axis::Horizontal, fixed)?;
        self.set_fixed(id, Axis::Vertical, fixed)
    }

    /// Pin the cell's spring maximum to its preferred size along `axis`.
    pub fn set_fixed(&mut self, id: CellId, axis: Axis, fixed: bool) -> Result<(), CellError> {
        let cell = self.cell_mut(id).ok_or(CellError::UnknownCell(id))?;
        cell.fixed[axis.index()] = fixed;
        self.touch(id);
        Ok(())
    }

    /// Cap the cell's flexible maximums at twice the preferred size.
    pub fn set_fix_max_size(&mut self, id: CellId, enabled: bool) -> Result<(), CellError> {
        let cell = self.cell_mut(id).ok_or(CellError::UnknownCell(id))?;
        cell.fix_max = enabled;
        self.touch(id);
        Ok(())
    }

    pub fn set_component_fixed_width(&mut self, host: &mut dyn Host, component: ComponentId, fixed: bool) {
        self.set_component_fixed(host, component, Axis::Horizontal, fixed);
    }

    pub fn set_component_fixed_height(&mut self, host: &mut dyn Host, component: ComponentId, fixed: bool) {
        self.set_component_fixed(host, component, Axis::Vertical, fixed);
    }

    pub fn set_component_fixed_size(&mut self, host: &mut dyn Host, component: ComponentId, fixed: bool) {
        self.set_component_fixed(host, component, Axis::Horizontal, fixed);
        self.set_component_fixed(host, component, Axis::Vertical, fixed);
    }

    /// Set the component's declared maximum to its preferred size along
    /// `axis`, or back to unbounded.
    pub fn set_component_fixed(
        &mut self,
        host: &mut dyn Host,
        component: ComponentId,
        axis: Axis,
        fixed: bool,
    ) {
        let value = if fixed {
            host.size(component, Tier::Preferred).get(axis)
        } else {
            UNBOUNDED
        };
        let max = host.size(component, Tier::Maximum).with(axis, value);
        host.set_size(component, Tier::Maximum, max);
        self.touch_component(component);
    }

    pub fn is_component_fixed_width(&self, host: &dyn Host, component: ComponentId) -> bool {
        host.size(component, Tier::Maximum).width == host.size(component, Tier::Preferred).width
    }

    pub fn is_component_fixed_height(&self, host: &dyn Host, component: ComponentId) -> bool {
        host.size(component, Tier::Maximum).height == host.size(component, Tier::Preferred).height
    }

    // ── Diagnostics ─────────────────────────────────────────────────────

    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        if self.config.diagnostics {
            self.diagnostics.push(diagnostic);
        }
    }

    /// Diagnostics recorded so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drain the recorded diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        core::mem::take(&mut self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::AddOptions;
    use crate::host::{Component, ComponentTable};
    use crate::spring::Extent;

    fn host_with(sizes: &[(i32, i32)]) -> (ComponentTable, Vec<ComponentId>) {
        let mut host = ComponentTable::new();
        let ids = sizes
            .iter()
            .map(|&(w, h)| host.insert(Component::new(Size::new(w, h))))
            .collect();
        (host, ids)
    }

    // ── Structure ───────────────────────────────────────────────────────

    #[test]
    fn reparenting_requires_detached_cell() {
        let mut tree = CellTree::new();
        let a = tree.row(Alignment::None, Alignment::None);
        let b = tree.row(Alignment::None, Alignment::None);
        let inner = tree.column(Alignment::None, Alignment::None);
        tree.add(a, inner, AddOptions::new()).unwrap();
        assert_eq!(
            tree.add(b, inner, AddOptions::new()),
            Err(CellError::AlreadyAttached(inner))
        );
        assert_eq!(tree.parent(inner), Some(a));
        assert_eq!(tree.root_of(inner), a);
    }

    #[test]
    fn cycles_are_rejected() {
        let mut tree = CellTree::new();
        let outer = tree.row(Alignment::None, Alignment::None);
        let inner = tree.column(Alignment::None, Alignment::None);
        tree.add(outer, inner, AddOptions::new()).unwrap();
        assert_eq!(
            tree.add(inner, outer, AddOptions::new()),
            Err(CellError::Cycle(outer))
        );
        assert_eq!(tree.add(inner, inner, AddOptions::new()), Err(CellError::AlreadyAttached(inner)));
    }

    #[test]
    fn wrong_kind_is_an_error() {
        let mut tree = CellTree::new();
        let gap = tree.gap(GapCell::horizontal(4));
        assert!(matches!(
            tree.add(gap, GapCell::horizontal(1), AddOptions::new()),
            Err(CellError::WrongKind { expected: "row or column", found: "gap", .. })
        ));
    }

    #[test]
    fn find_by_name_and_component() {
        let (_, ids) = host_with(&[(10, 10), (20, 10)]);
        let mut tree = CellTree::new();
        let col = tree.column(Alignment::None, Alignment::None);
        let row = tree.row(Alignment::None, Alignment::None);
        tree.add(col, row, AddOptions::new().name("buttons")).unwrap();
        let leaf = tree.add(row, ids[1], AddOptions::new()).unwrap();
        assert_eq!(tree.find(col, "buttons"), Some(row));
        assert_eq!(tree.find(col, "missing"), None);
        assert_eq!(tree.find_component(col, ids[1]), Some(leaf));
        assert_eq!(tree.find_component(col, ids[0]), None);
    }

    #[test]
    fn remove_frees_and_detaches() {
        let (mut host, ids) = host_with(&[(10, 10), (20, 10)]);
        let mut tree = CellTree::new();
        let row = tree.row(Alignment::None, Alignment::None);
        tree.add(row, ids[0], AddOptions::new()).unwrap();
        let inner = tree.column(Alignment::None, Alignment::None);
        tree.add(inner, ids[1], AddOptions::new()).unwrap();
        tree.add(row, inner, AddOptions::new()).unwrap();
        tree.attach_components(&mut host, row);
        assert_eq!(tree.len(), 4);

        tree.remove(&mut host, inner).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.children(row).len(), 1);
        assert_eq!(host.get(ids[1]).unwrap().parent, None);
        assert_eq!(host.get(ids[0]).unwrap().parent, Some(None));
        assert!(!tree.contains(inner));
    }

    #[test]
    fn remove_component_finds_its_leaf() {
        let (mut host, ids) = host_with(&[(10, 10), (20, 10)]);
        let mut tree = CellTree::new();
        let row = tree.row(Alignment::None, Alignment::None);
        tree.add(row, ids[0], AddOptions::new()).unwrap();
        tree.add(row, ids[1], AddOptions::new()).unwrap();
        assert_eq!(tree.remove_component(&mut host, row, ids[0]), Ok(true));
        assert_eq!(tree.remove_component(&mut host, row, ids[0]), Ok(false));
        assert_eq!(tree.spring(row, &host).pref(Axis::Horizontal), 20);
    }

    #[test]
    fn replace_swaps_in_place() {
        let (mut host, ids) = host_with(&[(10, 10), (20, 10), (30, 10)]);
        let mut tree = CellTree::new();
        let row = tree.row(Alignment::None, Alignment::None);
        tree.add(row, ids[0], AddOptions::new()).unwrap();
        let middle = tree.add(row, ids[1], AddOptions::new().align(Alignment::End)).unwrap();
        assert_eq!(tree.spring(row, &host).pref(Axis::Horizontal), 30);

        let new = tree.replace(&mut host, middle, ids[2]).unwrap();
        assert_eq!(tree.children(row)[1], new);
        assert_eq!(tree.get(new).unwrap().alignment(), Some(Alignment::End));
        assert_eq!(tree.spring(row, &host).pref(Axis::Horizontal), 40);
        assert_eq!(host.get(ids[2]).unwrap().parent, Some(None));
        assert_eq!(tree.replace(&mut host, row, ids[1]), Err(CellError::NoParent(row)));
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut host = ComponentTable::new();
        let mut tree = CellTree::new();
        let row = tree.row(Alignment::None, Alignment::None);
        let gap = tree.add(row, GapCell::horizontal(3), AddOptions::new()).unwrap();
        tree.remove(&mut host, gap).unwrap();
        let again = tree.gap(GapCell::vertical(1));
        assert_eq!(again, gap);
    }

    #[test]
    fn duplicate_maps_components() {
        let (mut host, ids) = host_with(&[(10, 10), (20, 10)]);
        let extra = host.insert(Component::new(Size::new(40, 10)));
        let mut tree = CellTree::new();
        let row = tree.row(Alignment::Center, Alignment::None);
        tree.add(row, ids[0], AddOptions::new().name("first")).unwrap();
        tree.set_fixed_height(row, true).unwrap();

        let copy = tree
            .duplicate(row, &mut |c| if c == ids[0] { extra } else { c })
            .unwrap();
        assert_ne!(copy, row);
        assert_eq!(tree.parent(copy), None);
        assert!(tree.get(copy).unwrap().is_fixed(Axis::Vertical));
        let first = tree.find(copy, "first").unwrap();
        assert_eq!(tree.parent(first), Some(copy));
        assert_eq!(tree.find_component(copy, extra), Some(first));
        assert_eq!(tree.spring(copy, &host).pref(Axis::Horizontal), 42);
    }

    // ── Springs ─────────────────────────────────────────────────────────

    #[test]
    fn springs_are_cached_until_invalidated() {
        let (mut host, ids) = host_with(&[(10, 10)]);
        let mut tree = CellTree::new();
        let row = tree.row(Alignment::None, Alignment::None);
        tree.add(row, ids[0], AddOptions::new()).unwrap();
        assert_eq!(tree.spring(row, &host).pref(Axis::Horizontal), 10);

        host.set_preferred_size(ids[0], Size::new(50, 10));
        assert_eq!(tree.spring(row, &host).pref(Axis::Horizontal), 10);
        tree.invalidate(row);
        assert_eq!(tree.spring(row, &host).pref(Axis::Horizontal), 50);
    }

    #[test]
    fn fixed_flags_override_the_spring() {
        let (host, ids) = host_with(&[(100, 10)]);
        let mut tree = CellTree::new();
        let leaf = tree.leaf(ids[0]);
        tree.set_fixed_width(leaf, true).unwrap();
        let s = tree.spring(leaf, &host);
        assert_eq!(s.extent(Axis::Horizontal), Extent::new(0, 100, 100));
        assert!(!s.is_fixed(Axis::Vertical));

        tree.set_fixed_width(leaf, false).unwrap();
        tree.set_fix_max_size(leaf, true).unwrap();
        assert_eq!(tree.spring(leaf, &host).max(Axis::Horizontal), 200);
        assert_eq!(tree.spring(leaf, &host).max(Axis::Vertical), 20);
    }

    #[test]
    fn component_fixing_edits_the_host() {
        let (mut host, ids) = host_with(&[(100, 10)]);
        let mut tree = CellTree::new();
        let leaf = tree.leaf(ids[0]);
        assert!(!tree.spring(leaf, &host).is_fixed(Axis::Horizontal));
        tree.set_component_fixed_width(&mut host, ids[0], true);
        assert!(tree.is_component_fixed_width(&host, ids[0]));
        assert!(!tree.is_component_fixed_height(&host, ids[0]));
        assert!(tree.spring(leaf, &host).is_fixed(Axis::Horizontal));
        tree.set_component_fixed_size(&mut host, ids[0], false);
        assert_eq!(host.maximum_size(ids[0]), Size::new(UNBOUNDED, UNBOUNDED));
    }

    #[test]
    fn configured_leaf_gaps_apply_to_new_leaves() {
        let (host, ids) = host_with(&[(100, 10)]);
        let mut tree = CellTree::with_config(TreeConfig::spaced());
        let leaf = tree.leaf(ids[0]);
        let explicit = tree.leaf(Leaf::new(ids[0]).gaps(0, 0));
        assert_eq!(tree.spring(leaf, &host).pref(Axis::Horizontal), 106);
        assert_eq!(tree.spring(explicit, &host).pref(Axis::Horizontal), 100);
    }

    #[test]
    fn component_gaps_apply_recursively() {
        let (host, ids) = host_with(&[(100, 10), (50, 10)]);
        let mut tree = CellTree::new();
        let col = tree.column(Alignment::None, Alignment::None);
        let row = tree.row(Alignment::None, Alignment::None);
        tree.add(row, ids[0], AddOptions::new()).unwrap();
        tree.add(col, row, AddOptions::new()).unwrap();
        tree.add(col, ids[1], AddOptions::new()).unwrap();
        assert_eq!(tree.spring(col, &host).pref(Axis::Vertical), 20);
        tree.set_component_gaps(col, 2, 1).unwrap();
        assert_eq!(tree.spring(col, &host).pref(Axis::Vertical), 24);
        assert_eq!(tree.spring(col, &host).pref(Axis::Horizontal), 104);
    }

    // ── Baselines ───────────────────────────────────────────────────────

    #[test]
    fn explicit_baseline_alignment_offsets_leaves() {
        let mut host = ComponentTable::new();
        let small = host.insert(Component::fixed(Size::new(40, 14)).with_baseline(10));
        let big = host.insert(Component::fixed(Size::new(40, 30)).with_baseline(24));
        let mut tree = CellTree::new();
        let col = tree.column(Alignment::None, Alignment::None);
        tree.add(col, Leaf::new(small).baseline(true), AddOptions::new()).unwrap();
        tree.add(col, Leaf::new(big).baseline(true), AddOptions::new()).unwrap();

        tree.align_baseline(&host, &[small, big]);
        let leaf = tree.find_component(col, small).unwrap();
        assert_eq!(tree.spring(leaf, &host).pref(Axis::Vertical), 28);

        tree.layout(col, &mut host, Rect::new(0, 0, 40, 58));
        assert_eq!(host.bounds(small), Some(Rect::new(0, 14, 40, 14)));
        // Repeating is idempotent
        tree.align_baseline(&host, &[small, big]);
        assert_eq!(tree.spring(leaf, &host).pref(Axis::Vertical), 28);
    }

    // ── Visibility ──────────────────────────────────────────────────────

    #[test]
    fn visibility_is_recursive() {
        let (mut host, ids) = host_with(&[(10, 10), (20, 10)]);
        let mut tree = CellTree::new();
        let row = tree.row(Alignment::None, Alignment::None);
        tree.add(row, ids[0], AddOptions::new()).unwrap();
        tree.add(row, ids[1], AddOptions::new()).unwrap();
        tree.set_visible(&mut host, row, false);
        assert!(!host.is_visible(ids[0]));
        assert!(!host.is_visible(ids[1]));
        tree.set_visible(&mut host, row, true);
        assert!(host.is_visible(ids[1]));
    }

    #[test]
    fn root_layout_caps_at_maximum() {
        let mut host = ComponentTable::new();
        let c = host.insert(Component::new(Size::new(50, 10)).with_maximum(Size::new(80, 30)));
        let mut tree = CellTree::new();
        let leaf = tree.leaf(c);
        tree.layout(leaf, &mut host, Rect::new(5, 5, 200, 200));
        assert_eq!(tree.bounds(leaf), Some(Rect::new(5, 5, 80, 30)));
    }
}
