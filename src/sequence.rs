//! Rows and columns: cells laid out one after another along an axis.
//!
//! A [`Sequence`] stacks its children's springs along its main axis and
//! splits the available length with [`distribute`](crate::distribute). Main-axis
//! alignment is realised with stretchable filler gaps that are derived from
//! the alignment whenever the spring is computed, so the child list itself
//! never contains them:
//!
//! | main alignment | fillers |
//! |---|---|
//! | none, start | none |
//! | end | one before the children |
//! | center | one before and one after |
//! | justified | one between each pair of children |
//!
//! Across the main axis, children stretch to the band (up to their maximum)
//! unless they are fixed on that axis or sized by a live link, in which case
//! they keep their size and sit according to the cross alignment. A row whose
//! vertical alignment is [`Alignment::Baseline`] lines up its children's
//! baselines instead.
//!
//! # Example
//!
//! ```
//! use zenpage::{AddOptions, Alignment, CellTree, Component, ComponentTable, Rect, Size};
//!
//! let mut host = ComponentTable::new();
//! let ok = host.insert(Component::fixed(Size::new(80, 24)));
//! let cancel = host.insert(Component::fixed(Size::new(80, 24)));
//!
//! let mut tree = CellTree::new();
//! let row = tree.row(Alignment::End, Alignment::Center);
//! tree.add(row, ok, AddOptions::new()).unwrap();
//! tree.add(row, cancel, AddOptions::new()).unwrap();
//!
//! tree.layout(row, &mut host, Rect::new(0, 0, 300, 40));
//! assert_eq!(host.bounds(ok), Some(Rect::new(140, 8, 80, 24)));
//! assert_eq!(host.bounds(cancel), Some(Rect::new(220, 8, 80, 24)));
//! ```

#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::align::Alignment;
use crate::cell::{AddOptions, CellId, CellKind, GapCell, Item};
use crate::distribute::{distribute, minimum_total};
use crate::error::{CellError, Diagnostic};
use crate::host::Host;
use crate::link::LinkTable;
use crate::spring::{Axis, Rect, Spring};
use crate::tree::CellTree;

/// One position in a sequence's layout order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Slot {
    /// The child at this index of [`Sequence::children`].
    Child(usize),
    /// A stretchable filler inserted for alignment.
    Filler,
}

/// Children laid out along one axis: a row (horizontal) or a column (vertical).
#[derive(Clone, Debug)]
pub struct Sequence {
    axis: Axis,
    align: [Alignment; 2],
    pub(crate) children: Vec<CellId>,
    pub(crate) links: LinkTable,
    pub(crate) cache: Option<SequenceCache>,
}

#[derive(Clone, Debug)]
pub(crate) struct SequenceCache {
    slots: Vec<Slot>,
    springs: Vec<Spring>,
    offsets: Vec<i32>,
}

impl Sequence {
    pub(crate) fn new(axis: Axis, horizontal: Alignment, vertical: Alignment) -> Self {
        let mut seq = Self {
            axis,
            align: [Alignment::None; 2],
            children: Vec::new(),
            links: LinkTable::default(),
            cache: None,
        };
        seq.set_alignment(horizontal, vertical);
        seq
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn is_row(&self) -> bool {
        self.axis == Axis::Horizontal
    }

    /// Alignment along `axis`.
    pub fn alignment(&self, axis: Axis) -> Alignment {
        self.align[axis.index()]
    }

    pub fn main_alignment(&self) -> Alignment {
        self.alignment(self.axis)
    }

    pub fn cross_alignment(&self) -> Alignment {
        self.alignment(self.axis.cross())
    }

    /// Real children, without fillers.
    pub fn children(&self) -> &[CellId] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Live proportional links between children.
    pub fn links(&self) -> &LinkTable {
        &self.links
    }

    /// Children and fillers in layout order.
    pub fn slots(&self) -> Vec<Slot> {
        let n = self.children.len();
        if n == 0 {
            return Vec::new();
        }
        let children = (0..n).map(Slot::Child);
        match self.main_alignment() {
            Alignment::Center => core::iter::once(Slot::Filler)
                .chain(children)
                .chain(core::iter::once(Slot::Filler))
                .collect(),
            Alignment::End => core::iter::once(Slot::Filler).chain(children).collect(),
            Alignment::Justified => {
                let mut slots = Vec::with_capacity(2 * n - 1);
                for i in 0..n {
                    if i > 0 {
                        slots.push(Slot::Filler);
                    }
                    slots.push(Slot::Child(i));
                }
                slots
            }
            _ => children.collect(),
        }
    }

    pub(crate) fn set_alignment(&mut self, horizontal: Alignment, vertical: Alignment) {
        let main = self.axis;
        let cross = main.cross();
        let requested = [horizontal, vertical];
        self.align[main.index()] = requested[main.index()].for_main_axis();
        self.align[cross.index()] = requested[cross.index()].for_cross_axis(cross);
        self.cache = None;
    }

    pub(crate) fn insert_child(&mut self, index: usize, id: CellId) {
        self.children.insert(index, id);
        self.links.insert(index);
        self.cache = None;
    }

    pub(crate) fn remove_child(&mut self, id: CellId) -> Option<usize> {
        let index = self.children.iter().position(|&c| c == id)?;
        self.children.remove(index);
        self.links.remove(index);
        self.cache = None;
        Some(index)
    }
}

impl CellTree {
    /// New empty row. `horizontal` is the main-axis alignment.
    pub fn row(&mut self, horizontal: Alignment, vertical: Alignment) -> CellId {
        let id = self.create(CellKind::Sequence(Sequence::new(
            Axis::Horizontal,
            horizontal,
            vertical,
        )));
        self.check_alignment(id, [horizontal, vertical]);
        id
    }

    /// New empty column. `vertical` is the main-axis alignment.
    pub fn column(&mut self, horizontal: Alignment, vertical: Alignment) -> CellId {
        let id = self.create(CellKind::Sequence(Sequence::new(
            Axis::Vertical,
            horizontal,
            vertical,
        )));
        self.check_alignment(id, [horizontal, vertical]);
        id
    }

    /// Append an item to a row or column and return the child's id.
    pub fn add(
        &mut self,
        sequence: CellId,
        item: impl Into<Item>,
        options: AddOptions,
    ) -> Result<CellId, CellError> {
        let len = self.sequence(sequence)?.len();
        self.insert(sequence, len, item, options)
    }

    /// Insert an item into a row or column before `index`.
    pub fn insert(
        &mut self,
        sequence: CellId,
        index: usize,
        item: impl Into<Item>,
        mut options: AddOptions,
    ) -> Result<CellId, CellError> {
        let len = self.sequence(sequence)?.len();
        if index > len {
            return Err(CellError::IndexOutOfRange { index, len });
        }
        let child = self.adopt(sequence, item.into())?;
        if let Some(cell) = self.cell_mut(child) {
            cell.align = options.alignment();
            if let Some(name) = options.take_name() {
                cell.name = Some(name);
            }
        }
        self.sequence_mut(sequence)?.insert_child(index, child);
        self.touch(sequence);
        Ok(child)
    }

    /// Change a row's or column's alignment. Fillers follow automatically.
    pub fn set_alignment(
        &mut self,
        sequence: CellId,
        horizontal: Alignment,
        vertical: Alignment,
    ) -> Result<(), CellError> {
        self.sequence_mut(sequence)?.set_alignment(horizontal, vertical);
        self.check_alignment(sequence, [horizontal, vertical]);
        self.touch(sequence);
        Ok(())
    }

    fn check_alignment(&mut self, id: CellId, requested: [Alignment; 2]) {
        let Ok(seq) = self.sequence(id) else {
            return;
        };
        let dropped: Vec<(Axis, Alignment)> = Axis::BOTH
            .into_iter()
            .filter(|&axis| seq.alignment(axis) != requested[axis.index()])
            .map(|axis| (axis, requested[axis.index()]))
            .collect();
        for (axis, requested) in dropped {
            tracing::warn!(cell = id.0, ?axis, ?requested, "alignment not supported here, using none");
            self.report(Diagnostic::InvalidAlignment {
                cell: id,
                axis,
                requested,
            });
        }
    }

    pub(crate) fn sequence(&self, id: CellId) -> Result<&Sequence, CellError> {
        match &self.get(id).ok_or(CellError::UnknownCell(id))?.kind {
            CellKind::Sequence(s) => Ok(s),
            other => Err(CellError::WrongKind {
                cell: id,
                expected: "row or column",
                found: other.label(),
            }),
        }
    }

    pub(crate) fn sequence_mut(&mut self, id: CellId) -> Result<&mut Sequence, CellError> {
        match &mut self.cell_mut(id).ok_or(CellError::UnknownCell(id))?.kind {
            CellKind::Sequence(s) => Ok(s),
            other => Err(CellError::WrongKind {
                cell: id,
                expected: "row or column",
                found: other.label(),
            }),
        }
    }

    pub(crate) fn sequence_spring(&mut self, id: CellId, host: &dyn Host) -> Spring {
        let Ok(seq) = self.sequence(id) else {
            return Spring::EMPTY;
        };
        let axis = seq.axis;
        let baseline_mode = seq.is_row() && seq.cross_alignment() == Alignment::Baseline;
        let children = seq.children.clone();
        let slots = seq.slots();

        let child_springs: Vec<Spring> = children.iter().map(|&c| self.spring(c, host)).collect();
        let child_offsets = if baseline_mode {
            let baselines: Vec<Option<i32>> =
                children.iter().map(|&c| self.baseline(c, host)).collect();
            let top = baselines.iter().flatten().max().copied();
            baselines
                .iter()
                .map(|b| match (b, top) {
                    (Some(b), Some(top)) => top - b,
                    _ => 0,
                })
                .collect()
        } else {
            vec![0; children.len()]
        };

        let filler = GapCell::filler(axis).spring();
        let mut springs = Vec::with_capacity(slots.len());
        let mut offsets = Vec::with_capacity(slots.len());
        let mut total = Spring::EMPTY;
        for slot in &slots {
            let (spring, offset) = match *slot {
                Slot::Child(i) => (child_springs[i], child_offsets[i]),
                Slot::Filler => (filler, 0),
            };
            total = total.stack(axis, spring.inset(0, offset));
            springs.push(spring);
            offsets.push(offset);
        }

        if let Ok(seq) = self.sequence_mut(id) {
            seq.cache = Some(SequenceCache {
                slots,
                springs,
                offsets,
            });
        }
        tracing::debug!(cell = id.0, spring = %total, "sequence spring");
        total
    }

    pub(crate) fn sequence_baseline(&self, id: CellId, host: &dyn Host) -> Option<i32> {
        let seq = self.sequence(id).ok()?;
        if seq.is_row() {
            seq.children.iter().filter_map(|&c| self.baseline(c, host)).max()
        } else {
            seq.children.first().and_then(|&c| self.baseline(c, host))
        }
    }

    pub(crate) fn place_sequence(&mut self, id: CellId, host: &mut dyn Host, rect: Rect) {
        if self.sequence(id).is_ok_and(|s| s.cache.is_none()) {
            self.sequence_spring(id, &*host);
        }
        let Ok(seq) = self.sequence(id) else {
            return;
        };
        let Some(cache) = seq.cache.clone() else {
            return;
        };
        let axis = seq.axis;
        let cross = axis.cross();
        let cross_align = seq.cross_alignment();
        let baseline_mode = seq.is_row() && cross_align == Alignment::Baseline;
        let children = seq.children.clone();
        let linked = seq.links.resolve(children.len(), rect.extent(cross));

        let length = rect.extent(axis);
        let needed = minimum_total(&cache.springs, axis);
        if needed > i64::from(length) {
            tracing::warn!(cell = id.0, ?axis, length, needed, "sequence overflows");
            self.report(Diagnostic::Overflow {
                cell: id,
                axis,
                available: length,
                minimum: needed.min(i64::from(i32::MAX)) as i32,
            });
        }
        let lengths = distribute(&cache.springs, axis, length);

        let band_start = rect.start(cross);
        let band = rect.extent(cross);
        let mut pos = rect.start(axis);
        for (k, slot) in cache.slots.iter().enumerate() {
            let len = lengths[k];
            if let Slot::Child(i) = *slot {
                let child = children[i];
                let spring = cache.springs[k];
                let span = if baseline_mode {
                    let offset = cache.offsets[k];
                    let avail = band - offset;
                    let size = match linked[i] {
                        Some(v) if v > 0 => v.min(avail),
                        _ if spring.is_fixed(cross) => spring.pref(cross),
                        _ => avail.min(spring.max(cross)),
                    };
                    (band_start + offset, size)
                } else {
                    let align = self
                        .get(child)
                        .and_then(|c| c.align)
                        .map_or(cross_align, |a| a.for_cross_axis(cross));
                    cross_span(spring, cross, band_start, band, align, linked[i])
                };
                self.place(child, host, Rect::from_spans(axis, (pos, len), span));
            }
            pos += len;
        }
    }
}

/// Start and extent of a child across the sequence's band.
fn cross_span(
    spring: Spring,
    cross: Axis,
    start: i32,
    band: i32,
    align: Alignment,
    linked: Option<i32>,
) -> (i32, i32) {
    let target = match linked {
        Some(v) if v > 0 => Some(v),
        _ if spring.is_fixed(cross) => Some(spring.pref(cross)),
        _ => None,
    };
    let size = match target {
        Some(v) => v.min(band),
        None => band.min(spring.max(cross)),
    };
    (start + align.offset(band, size).max(0), size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Component, ComponentTable};
    use crate::spring::{Extent, Size, UNBOUNDED};

    fn setup() -> (CellTree, ComponentTable) {
        (CellTree::new(), ComponentTable::new())
    }

    // ── Fillers ─────────────────────────────────────────────────────────

    #[test]
    fn fillers_follow_main_alignment() {
        let (mut tree, _) = setup();
        let row = tree.row(Alignment::None, Alignment::None);
        for _ in 0..3 {
            tree.add(row, GapCell::horizontal(5), AddOptions::new()).unwrap();
        }
        let slots = |tree: &CellTree| tree.sequence(row).unwrap().slots();

        assert_eq!(slots(&tree), vec![Slot::Child(0), Slot::Child(1), Slot::Child(2)]);

        tree.set_alignment(row, Alignment::End, Alignment::None).unwrap();
        assert_eq!(slots(&tree)[0], Slot::Filler);
        assert_eq!(slots(&tree).len(), 4);

        tree.set_alignment(row, Alignment::Center, Alignment::None).unwrap();
        let s = slots(&tree);
        assert_eq!((s[0], s[4]), (Slot::Filler, Slot::Filler));

        tree.set_alignment(row, Alignment::Justified, Alignment::None).unwrap();
        assert_eq!(
            slots(&tree),
            vec![
                Slot::Child(0),
                Slot::Filler,
                Slot::Child(1),
                Slot::Filler,
                Slot::Child(2)
            ]
        );
    }

    #[test]
    fn realigning_keeps_children() {
        let (mut tree, mut host) = setup();
        let row = tree.row(Alignment::Start, Alignment::None);
        let a = host.insert(Component::new(Size::new(10, 10)));
        let b = host.insert(Component::new(Size::new(10, 10)));
        tree.add(row, a, AddOptions::new()).unwrap();
        tree.add(row, b, AddOptions::new()).unwrap();
        let before = tree.children(row);
        tree.set_alignment(row, Alignment::Justified, Alignment::Center).unwrap();
        tree.set_alignment(row, Alignment::Start, Alignment::None).unwrap();
        assert_eq!(tree.children(row), before);
    }

    #[test]
    fn invalid_axis_alignments_are_dropped() {
        let mut tree = CellTree::with_config(crate::TreeConfig::new().diagnostics(true));
        let col = tree.column(Alignment::Baseline, Alignment::Baseline);
        let seq = tree.sequence(col).unwrap();
        assert_eq!(seq.alignment(Axis::Horizontal), Alignment::None);
        assert_eq!(seq.alignment(Axis::Vertical), Alignment::None);
        assert_eq!(tree.take_diagnostics().len(), 2);

        let row = tree.row(Alignment::Justified, Alignment::Baseline);
        assert!(tree.take_diagnostics().is_empty());
        tree.set_alignment(row, Alignment::Center, Alignment::Justified).unwrap();
        assert!(matches!(
            tree.take_diagnostics().as_slice(),
            [Diagnostic::InvalidAlignment { axis: Axis::Vertical, requested: Alignment::Justified, .. }]
        ));
    }

    // ── Springs ─────────────────────────────────────────────────────────

    #[test]
    fn row_spring_stacks_children() {
        let (mut tree, mut host) = setup();
        let row = tree.row(Alignment::None, Alignment::None);
        let a = host.insert(Component::new(Size::new(100, 20)));
        let b = host.insert(Component::fixed(Size::new(50, 30)));
        tree.add(row, a, AddOptions::new()).unwrap();
        tree.add(row, b, AddOptions::new()).unwrap();
        let s = tree.spring(row, &host);
        assert_eq!(s.extent(Axis::Horizontal), Extent::new(50, 150, UNBOUNDED));
        assert_eq!(s.extent(Axis::Vertical), Extent::new(30, 30, UNBOUNDED));
        assert!(!s.is_gap());
    }

    #[test]
    fn centered_row_is_never_fixed() {
        let (mut tree, mut host) = setup();
        let row = tree.row(Alignment::Center, Alignment::None);
        let a = host.insert(Component::fixed(Size::new(100, 20)));
        tree.add(row, a, AddOptions::new()).unwrap();
        let s = tree.spring(row, &host);
        assert_eq!(s.pref(Axis::Horizontal), 102);
        assert_eq!(s.max(Axis::Horizontal), UNBOUNDED);
    }

    #[test]
    fn empty_sequence_has_empty_spring() {
        let (mut tree, host) = setup();
        let col = tree.column(Alignment::Center, Alignment::Center);
        assert_eq!(tree.spring(col, &host), Spring::EMPTY);
    }

    // ── Layout ──────────────────────────────────────────────────────────

    #[test]
    fn fixed_children_align_across_the_band() {
        let (mut tree, mut host) = setup();
        let row = tree.row(Alignment::None, Alignment::End);
        let a = host.insert(Component::fixed(Size::new(40, 10)));
        let b = host.insert(Component::new(Size::new(40, 10)));
        tree.add(row, a, AddOptions::new()).unwrap();
        tree.add(row, b, AddOptions::new().align(Alignment::Center)).unwrap();
        tree.layout(row, &mut host, Rect::new(0, 0, 200, 50));
        assert_eq!(host.bounds(a), Some(Rect::new(0, 40, 40, 10)));
        // Flexible across: stretches to the band regardless of alignment
        assert_eq!(host.bounds(b), Some(Rect::new(40, 0, 160, 50)));
    }

    #[test]
    fn stretch_is_capped_at_maximum_and_aligned() {
        let (mut tree, mut host) = setup();
        let col = tree.column(Alignment::Center, Alignment::None);
        let a = host.insert(Component::new(Size::new(40, 10)).with_maximum(Size::new(60, 100)));
        let wide = host.insert(Component::new(Size::new(100, 0)));
        tree.add(col, a, AddOptions::new()).unwrap();
        tree.add(col, wide, AddOptions::new()).unwrap();
        tree.layout(col, &mut host, Rect::new(0, 0, 100, 100));
        assert_eq!(host.bounds(a), Some(Rect::new(20, 0, 60, 100)));
    }

    #[test]
    fn baseline_row_lines_up_text() {
        let (mut tree, mut host) = setup();
        let row = tree.row(Alignment::None, Alignment::Baseline);
        let label = host.insert(Component::fixed(Size::new(50, 16)).with_baseline(12));
        let field = host.insert(Component::fixed(Size::new(100, 24)).with_baseline(18));
        tree.add(row, crate::Leaf::new(label).baseline(true), AddOptions::new()).unwrap();
        tree.add(row, crate::Leaf::new(field).baseline(true), AddOptions::new()).unwrap();

        let s = tree.spring(row, &host);
        // The label shifted down by 6 needs 22; the field needs 24
        assert_eq!(s.pref(Axis::Vertical), 24);

        tree.layout(row, &mut host, Rect::new(0, 0, 150, 24));
        assert_eq!(host.bounds(label), Some(Rect::new(0, 6, 50, 16)));
        assert_eq!(host.bounds(field), Some(Rect::new(50, 0, 100, 24)));
    }

    #[test]
    fn root_layout_aligns_fixed_sequence() {
        let (mut tree, mut host) = setup();
        let row = tree.row(Alignment::None, Alignment::Center);
        let a = host.insert(Component::fixed(Size::new(40, 10)));
        tree.add(row, a, AddOptions::new()).unwrap();
        tree.layout(row, &mut host, Rect::new(0, 0, 100, 100));
        // The row is rigid in both axes: vertically centered by its own alignment
        assert_eq!(tree.bounds(row), Some(Rect::new(0, 45, 40, 10)));
        assert_eq!(host.bounds(a), Some(Rect::new(0, 45, 40, 10)));
    }

    #[test]
    fn overflow_is_reported_in_diagnostics_mode() {
        let mut tree = CellTree::with_config(crate::TreeConfig::new().diagnostics(true));
        let mut host = ComponentTable::new();
        let row = tree.row(Alignment::None, Alignment::None);
        let a = host.insert(Component::new(Size::new(100, 10)).with_minimum(Size::new(80, 0)));
        tree.add(row, a, AddOptions::new()).unwrap();
        tree.layout(row, &mut host, Rect::new(0, 0, 50, 10));
        assert_eq!(host.bounds(a).map(|r| r.width), Some(80));
        assert!(matches!(
            tree.take_diagnostics().as_slice(),
            [Diagnostic::Overflow { available: 50, minimum: 80, .. }]
        ));
    }

    #[test]
    fn insert_rejects_bad_index() {
        let (mut tree, _) = setup();
        let row = tree.row(Alignment::None, Alignment::None);
        assert_eq!(
            tree.insert(row, 3, GapCell::horizontal(1), AddOptions::new()),
            Err(CellError::IndexOutOfRange { index: 3, len: 0 })
        );
    }
}
