//! Grids: cells in rows and columns, each optionally spanning several tracks.
//!
//! Column widths and row heights are computed independently. Every column
//! gets the vertical stack of the cells that sit in it without spanning
//! sideways, every row the horizontal stack of the cells that do not span
//! down. A spanning cell whose requirement exceeds the tracks it covers
//! grows them: the shortfall is split evenly over the flexible tracks, with
//! the division residual on the last one, or goes entirely to the last track
//! when none is flexible. Layout then splits the grid's width across the
//! columns and its height across the rows with
//! [`distribute`](crate::distribute).
//!
//! Grids are built from [`GridRows`] or filled in place with
//! [`CellTree::place_in_grid`].
//!
//! # Example
//!
//! ```
//! use zenpage::{CellTree, Component, ComponentTable, GridRow, GridRows, Rect, Size};
//!
//! let mut host = ComponentTable::new();
//! let title = host.insert(Component::new(Size::new(200, 20)));
//! let a = host.insert(Component::new(Size::new(80, 20)));
//! let b = host.insert(Component::new(Size::new(80, 20)));
//!
//! let mut tree = CellTree::new();
//! let grid = tree
//!     .grid(
//!         GridRows::new()
//!             .row(GridRow::new().add(title).span(2))
//!             .row(GridRow::new().add(a).add(b)),
//!     )
//!     .unwrap();
//!
//! tree.layout(grid, &mut host, Rect::new(0, 0, 200, 40));
//! assert_eq!(tree.as_grid(grid).unwrap().column_widths(), &[100, 100]);
//! assert_eq!(host.bounds(title), Some(Rect::new(0, 0, 200, 20)));
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
use crate::spring::{Axis, Extent, Rect, Spring, Tier, UNBOUNDED};
use crate::tree::CellTree;

/// What occupies one grid position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum GridEntry {
    #[default]
    Empty,
    /// Origin (top-left position) of a cell.
    Cell(CellId),
    /// Covered by a cell whose origin is further left in the same row.
    HSpan,
    /// Covered by a cell whose origin is in a row above.
    VSpan,
}

/// Which end of a row or column a margin goes on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Start,
    End,
}

/// Rows × columns of cells.
#[derive(Clone, Debug)]
pub struct Grid {
    rows: usize,
    columns: usize,
    entries: Vec<GridEntry>,
    spans: Vec<(usize, usize)>,
    align: Vec<[Alignment; 2]>,
    fixed_rows: Vec<bool>,
    fixed_columns: Vec<bool>,
    pub(crate) cache: Option<GridCache>,
    column_widths: Vec<i32>,
    row_heights: Vec<i32>,
}

#[derive(Clone, Debug)]
pub(crate) struct GridCache {
    columns: Vec<Spring>,
    rows: Vec<Spring>,
}

impl Grid {
    pub(crate) fn new(rows: usize, columns: usize) -> Self {
        let n = rows * columns;
        Self {
            rows,
            columns,
            entries: vec![GridEntry::Empty; n],
            spans: vec![(1, 1); n],
            align: vec![[Alignment::None; 2]; n],
            fixed_rows: vec![false; rows],
            fixed_columns: vec![false; columns],
            cache: None,
            column_widths: Vec::new(),
            row_heights: Vec::new(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    fn pos(&self, row: usize, column: usize) -> Option<usize> {
        (row < self.rows && column < self.columns).then(|| row * self.columns + column)
    }

    pub fn entry(&self, row: usize, column: usize) -> Option<GridEntry> {
        self.pos(row, column).map(|p| self.entries[p])
    }

    /// `(rows, columns)` covered by the cell whose origin is at this position.
    pub fn span(&self, row: usize, column: usize) -> Option<(usize, usize)> {
        let p = self.pos(row, column)?;
        matches!(self.entries[p], GridEntry::Cell(_)).then(|| self.spans[p])
    }

    /// Horizontal and vertical alignment of the cell at this position.
    pub fn alignment(&self, row: usize, column: usize) -> Option<(Alignment, Alignment)> {
        self.pos(row, column).map(|p| (self.align[p][0], self.align[p][1]))
    }

    pub fn is_fixed_row(&self, row: usize) -> bool {
        self.fixed_rows.get(row).copied().unwrap_or(false)
    }

    pub fn is_fixed_column(&self, column: usize) -> bool {
        self.fixed_columns.get(column).copied().unwrap_or(false)
    }

    /// Column widths from the last layout pass.
    pub fn column_widths(&self) -> &[i32] {
        &self.column_widths
    }

    /// Row heights from the last layout pass.
    pub fn row_heights(&self) -> &[i32] {
        &self.row_heights
    }

    /// Cells in row-major order of their origins.
    pub fn cells(&self) -> impl Iterator<Item = CellId> + '_ {
        self.entries.iter().filter_map(|e| match e {
            GridEntry::Cell(id) => Some(*id),
            _ => None,
        })
    }

    /// Origin position of a cell.
    pub fn position_of(&self, id: CellId) -> Option<(usize, usize)> {
        let p = self.entries.iter().position(|e| *e == GridEntry::Cell(id))?;
        Some((p / self.columns, p % self.columns))
    }

    /// `(row, column, cell, (rows, columns))` for every cell.
    fn origins(&self) -> Vec<(usize, usize, CellId, (usize, usize))> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(p, e)| match e {
                GridEntry::Cell(id) => Some((p / self.columns, p % self.columns, *id, self.spans[p])),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn cell_slots_mut(&mut self) -> Vec<&mut CellId> {
        self.entries
            .iter_mut()
            .filter_map(|e| match e {
                GridEntry::Cell(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    fn set_cell(&mut self, row: usize, column: usize, id: CellId, span: (usize, usize), align: [Alignment; 2]) {
        let (rows, columns) = span;
        for r in row..row + rows {
            for c in column..column + columns {
                if let Some(p) = self.pos(r, c) {
                    self.entries[p] = if r > row {
                        GridEntry::VSpan
                    } else {
                        GridEntry::HSpan
                    };
                }
            }
        }
        if let Some(p) = self.pos(row, column) {
            self.entries[p] = GridEntry::Cell(id);
            self.spans[p] = span;
            self.align[p] = align.map(|a| a.for_cross_axis(Axis::Horizontal));
        }
        self.cache = None;
    }

    pub(crate) fn remove_cell(&mut self, id: CellId) {
        let Some((row, column)) = self.position_of(id) else {
            return;
        };
        let Some(origin) = self.pos(row, column) else {
            return;
        };
        let (rows, columns) = self.spans[origin];
        for r in row..row + rows {
            for c in column..column + columns {
                if let Some(p) = self.pos(r, c) {
                    self.entries[p] = GridEntry::Empty;
                }
            }
        }
        self.spans[origin] = (1, 1);
        self.cache = None;
    }

    /// First position in the block that is not empty.
    fn first_occupied(&self, row: usize, column: usize, rows: usize, columns: usize) -> Option<(usize, usize)> {
        (row..row + rows)
            .flat_map(|r| (column..column + columns).map(move |c| (r, c)))
            .find(|&(r, c)| self.entry(r, c) != Some(GridEntry::Empty))
    }

    /// Cell at the start or end of a row (`axis` horizontal) or column.
    /// At the end, only a cell reaching the grid's last track counts.
    fn edge_cell(&self, axis: Axis, side: Side, track: usize) -> Option<CellId> {
        let along: Vec<_> = self
            .origins()
            .into_iter()
            .filter(|&(r, c, _, _)| match axis {
                Axis::Horizontal => r == track,
                Axis::Vertical => c == track,
            })
            .collect();
        match side {
            Side::Start => along.first().map(|o| o.2),
            Side::End => along.last().and_then(|&(r, c, id, (rs, cs))| {
                let reaches = match axis {
                    Axis::Horizontal => c + cs == self.columns,
                    Axis::Vertical => r + rs == self.rows,
                };
                reaches.then_some(id)
            }),
        }
    }

    fn check(&self, row: usize, column: usize) -> Result<usize, CellError> {
        self.pos(row, column).ok_or(CellError::OutOfGrid {
            row,
            column,
            rows: self.rows,
            columns: self.columns,
        })
    }
}

// ============================================================================
// Builders
// ============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Draft {
    Empty,
    Item(Item, [Alignment; 2]),
    HSpan,
    VSpan,
}

/// One row of a grid under construction.
///
/// ```
/// use zenpage::{Alignment, ComponentId, GridRow};
///
/// // Label, then a field spanning the remaining two columns.
/// let row = GridRow::new()
///     .add_aligned(ComponentId(0), Alignment::End, Alignment::Center)
///     .add(ComponentId(1))
///     .span(2);
/// assert_eq!(row.len(), 3);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GridRow {
    entries: Vec<Draft>,
}

impl GridRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(self, item: impl Into<Item>) -> Self {
        self.add_aligned(item, Alignment::None, Alignment::None)
    }

    /// Add an item placed by `horizontal` and `vertical` on any axis where it
    /// is fixed.
    pub fn add_aligned(mut self, item: impl Into<Item>, horizontal: Alignment, vertical: Alignment) -> Self {
        self.entries.push(Draft::Item(item.into(), [horizontal, vertical]));
        self
    }

    /// Let the previous item cover `columns` columns in total.
    pub fn span(mut self, columns: usize) -> Self {
        for _ in 1..columns {
            self.entries.push(Draft::HSpan);
        }
        self
    }

    /// Let the item in the row above, same column, extend into this position.
    pub fn span_down(mut self) -> Self {
        self.entries.push(Draft::VSpan);
        self
    }

    /// Leave `n` positions empty.
    pub fn skip(mut self, n: usize) -> Self {
        for _ in 0..n {
            self.entries.push(Draft::Empty);
        }
        self
    }

    /// Positions in this row, span markers included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rows of a grid under construction. Short rows are padded with empty
/// positions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GridRows {
    rows: Vec<GridRow>,
}

impl GridRows {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(mut self, row: GridRow) -> Self {
        self.rows.push(row);
        self
    }

    pub fn push(&mut self, row: GridRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Span and alignment for [`CellTree::place_in_grid`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridPlacement {
    pub rows: usize,
    pub columns: usize,
    pub horizontal: Alignment,
    pub vertical: Alignment,
}

impl Default for GridPlacement {
    fn default() -> Self {
        Self {
            rows: 1,
            columns: 1,
            horizontal: Alignment::None,
            vertical: Alignment::None,
        }
    }
}

impl GridPlacement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn span(mut self, rows: usize, columns: usize) -> Self {
        self.rows = rows.max(1);
        self.columns = columns.max(1);
        self
    }

    pub fn align(mut self, horizontal: Alignment, vertical: Alignment) -> Self {
        self.horizontal = horizontal;
        self.vertical = vertical;
        self
    }
}

/// A well-formed grid plan: origins with their spans, the span markers of
/// covered positions, and what was repaired on the way.
struct Normalized {
    rows: usize,
    columns: usize,
    origins: Vec<(usize, usize, Item, [Alignment; 2], (usize, usize))>,
    diagnostics: Vec<Diagnostic>,
}

fn normalize(rows: &GridRows) -> Normalized {
    let nrows = rows.rows.len();
    let ncols = rows.rows.iter().map(GridRow::len).max().unwrap_or(0);
    let mut drafts = Vec::with_capacity(nrows * ncols);
    for row in &rows.rows {
        drafts.extend_from_slice(&row.entries);
        drafts.extend(core::iter::repeat_n(Draft::Empty, ncols - row.len()));
    }

    let mut covered = vec![false; drafts.len()];
    let mut origins = Vec::new();
    let mut diagnostics = Vec::new();
    for r in 0..nrows {
        for c in 0..ncols {
            let p = r * ncols + c;
            let Draft::Item(item, align) = drafts[p] else {
                continue;
            };
            if covered[p] {
                diagnostics.push(Diagnostic::CoveredCellDropped { row: r, column: c });
                continue;
            }
            let columns = 1 + (c + 1..ncols)
                .take_while(|&k| drafts[r * ncols + k] == Draft::HSpan && !covered[r * ncols + k])
                .count();
            let span_rows = 1 + (r + 1..nrows)
                .take_while(|&k| drafts[k * ncols + c] == Draft::VSpan && !covered[k * ncols + c])
                .count();
            for rr in r..r + span_rows {
                for cc in c..c + columns {
                    covered[rr * ncols + cc] = true;
                }
            }
            origins.push((r, c, item, align, (span_rows, columns)));
        }
    }
    for (p, draft) in drafts.iter().enumerate() {
        if matches!(draft, Draft::HSpan | Draft::VSpan) && !covered[p] {
            diagnostics.push(Diagnostic::OrphanSpan {
                row: p / ncols,
                column: p % ncols,
            });
        }
    }

    Normalized {
        rows: nrows,
        columns: ncols,
        origins,
        diagnostics,
    }
}

// ============================================================================
// Track sizing
// ============================================================================

fn fix_tracks(tracks: &mut [Spring], fixed: &[bool], axis: Axis) {
    for (track, &fixed) in tracks.iter_mut().zip(fixed) {
        if fixed {
            *track = track.fix(axis);
        }
    }
}

/// Grow `tracks` along `axis` until they hold `need`, tier by tier.
fn expand(tracks: &mut [Spring], axis: Axis, need: Spring) {
    let Some(last) = tracks.len().checked_sub(1) else {
        return;
    };
    // A spanned track holds content even if no cell starts in it.
    for t in tracks.iter_mut() {
        *t = t.enclose(Spring::new(Extent::ZERO, Extent::ZERO));
    }
    let flexible: Vec<usize> = (0..tracks.len()).filter(|&i| !tracks[i].is_fixed(axis)).collect();
    let targets: Vec<usize> = if flexible.is_empty() { vec![last] } else { flexible };

    let mut extents: Vec<Extent> = tracks.iter().map(|t| t.extent(axis)).collect();
    for tier in Tier::ALL {
        let required = i64::from(need.get(tier, axis));
        let have: i64 = extents.iter().map(|e| i64::from(e.get(tier))).sum();
        let shortfall = required - have;
        if shortfall <= 0 {
            continue;
        }
        let n = targets.len() as i64;
        let (each, residual) = (shortfall / n, shortfall % n);
        for (k, &i) in targets.iter().enumerate() {
            let extra = if k + 1 == targets.len() { each + residual } else { each };
            let grown = (i64::from(extents[i].get(tier)) + extra).min(i64::from(UNBOUNDED)) as i32;
            extents[i] = extents[i].with_tier(tier, grown);
        }
    }
    for (t, e) in tracks.iter_mut().zip(extents) {
        *t = t.with_extent(axis, e);
    }
}

// ============================================================================
// Tree operations
// ============================================================================

impl CellTree {
    /// Build a grid from rows of items.
    ///
    /// Ragged rows are padded, span markers without an origin become empty
    /// and items under another cell's span are left out; each repair is
    /// reported as a [`Diagnostic`].
    pub fn grid(&mut self, rows: GridRows) -> Result<CellId, CellError> {
        let plan = normalize(&rows);

        let mut seen = Vec::new();
        for (_, _, item, _, _) in &plan.origins {
            if let Item::Cell(id) = *item {
                let cell = self.get(id).ok_or(CellError::UnknownCell(id))?;
                if cell.parent.is_some() || seen.contains(&id) {
                    return Err(CellError::AlreadyAttached(id));
                }
                seen.push(id);
            }
        }

        let id = self.create(CellKind::Grid(Grid::new(plan.rows, plan.columns)));
        for diagnostic in plan.diagnostics {
            tracing::warn!(cell = id.0, ?diagnostic, "repaired grid");
            self.report(diagnostic);
        }
        for (r, c, item, align, span) in plan.origins {
            let child = self.adopt(id, item)?;
            self.as_grid_mut(id)?.set_cell(r, c, child, span, align);
        }
        Ok(id)
    }

    /// An empty grid to fill with [`place_in_grid`](Self::place_in_grid).
    pub fn empty_grid(&mut self, rows: usize, columns: usize) -> CellId {
        self.create(CellKind::Grid(Grid::new(rows, columns)))
    }

    /// Put an item at `(row, column)`. A span running past the grid edge is
    /// shortened; every covered position must be empty.
    pub fn place_in_grid(
        &mut self,
        grid: CellId,
        row: usize,
        column: usize,
        item: impl Into<Item>,
        placement: GridPlacement,
    ) -> Result<CellId, CellError> {
        let g = self.as_grid(grid)?;
        g.check(row, column)?;
        let requested = (placement.rows.max(1), placement.columns.max(1));
        let span = (
            requested.0.min(g.rows - row),
            requested.1.min(g.columns - column),
        );
        if let Some((row, column)) = g.first_occupied(row, column, span.0, span.1) {
            return Err(CellError::Occupied { row, column });
        }

        let child = self.adopt(grid, item.into())?;
        self.as_grid_mut(grid)?.set_cell(
            row,
            column,
            child,
            span,
            [placement.horizontal, placement.vertical],
        );
        if span != requested {
            tracing::warn!(cell = grid.0, row, column, ?requested, ?span, "span clipped to grid");
            self.report(Diagnostic::SpanClipped {
                row,
                column,
                requested,
                clipped: span,
            });
        }
        self.touch(grid);
        Ok(child)
    }

    /// Alignment of the cell at `(row, column)` on axes where it is fixed.
    pub fn set_grid_alignment(
        &mut self,
        grid: CellId,
        row: usize,
        column: usize,
        horizontal: Alignment,
        vertical: Alignment,
    ) -> Result<(), CellError> {
        let g = self.as_grid_mut(grid)?;
        let p = g.check(row, column)?;
        g.align[p] = [horizontal, vertical].map(|a| a.for_cross_axis(Axis::Horizontal));
        g.cache = None;
        self.touch(grid);
        Ok(())
    }

    /// Keep the listed rows at their preferred height.
    pub fn set_fixed_rows(&mut self, grid: CellId, rows: &[usize], fixed: bool) -> Result<(), CellError> {
        let g = self.as_grid_mut(grid)?;
        for &row in rows {
            g.check(row, 0)?;
            g.fixed_rows[row] = fixed;
        }
        self.touch(grid);
        Ok(())
    }

    /// Keep the listed columns at their preferred width.
    pub fn set_fixed_columns(&mut self, grid: CellId, columns: &[usize], fixed: bool) -> Result<(), CellError> {
        let g = self.as_grid_mut(grid)?;
        for &column in columns {
            g.check(0, column)?;
            g.fixed_columns[column] = fixed;
        }
        self.touch(grid);
        Ok(())
    }

    /// Put a fixed horizontal margin before (or after) the first (or last)
    /// cell of each listed row. At the end, only a cell reaching the last
    /// column gets one.
    pub fn set_row_margins(
        &mut self,
        grid: CellId,
        side: Side,
        margin: i32,
        rows: &[usize],
    ) -> Result<(), CellError> {
        self.add_margins(grid, Axis::Horizontal, side, margin, rows)
    }

    /// Column counterpart of [`set_row_margins`](Self::set_row_margins).
    pub fn set_column_margins(
        &mut self,
        grid: CellId,
        side: Side,
        margin: i32,
        columns: &[usize],
    ) -> Result<(), CellError> {
        self.add_margins(grid, Axis::Vertical, side, margin, columns)
    }

    fn add_margins(
        &mut self,
        grid: CellId,
        axis: Axis,
        side: Side,
        margin: i32,
        tracks: &[usize],
    ) -> Result<(), CellError> {
        let g = self.as_grid(grid)?;
        let mut targets = Vec::with_capacity(tracks.len());
        for &t in tracks {
            match axis {
                Axis::Horizontal => g.check(t, 0)?,
                Axis::Vertical => g.check(0, t)?,
            };
            if let Some(cell) = g.edge_cell(axis, side, t) {
                // Listing a track twice still wraps its cell once
                if !targets.contains(&cell) {
                    targets.push(cell);
                }
            }
        }

        for cell in targets {
            let wrapper = match axis {
                Axis::Horizontal => self.row(Alignment::None, Alignment::None),
                Axis::Vertical => self.column(Alignment::None, Alignment::None),
            };
            if let Some(c) = self.cell_mut(cell) {
                c.parent = None;
            }
            let gap = Item::Gap(GapCell::fixed(axis, margin));
            let (first, second) = match side {
                Side::Start => (gap, Item::Cell(cell)),
                Side::End => (Item::Cell(cell), gap),
            };
            self.add(wrapper, first, AddOptions::new())?;
            self.add(wrapper, second, AddOptions::new())?;

            for slot in self.as_grid_mut(grid)?.cell_slots_mut() {
                if *slot == cell {
                    *slot = wrapper;
                }
            }
            if let Some(w) = self.cell_mut(wrapper) {
                w.parent = Some(grid);
            }
        }
        self.touch(grid);
        Ok(())
    }

    /// The grid data of a grid cell.
    pub fn as_grid(&self, id: CellId) -> Result<&Grid, CellError> {
        match &self.get(id).ok_or(CellError::UnknownCell(id))?.kind {
            CellKind::Grid(g) => Ok(g),
            other => Err(CellError::WrongKind {
                cell: id,
                expected: "grid",
                found: other.label(),
            }),
        }
    }

    pub(crate) fn as_grid_mut(&mut self, id: CellId) -> Result<&mut Grid, CellError> {
        match &mut self.cell_mut(id).ok_or(CellError::UnknownCell(id))?.kind {
            CellKind::Grid(g) => Ok(g),
            other => Err(CellError::WrongKind {
                cell: id,
                expected: "grid",
                found: other.label(),
            }),
        }
    }

    pub(crate) fn grid_spring(&mut self, id: CellId, host: &dyn Host) -> Spring {
        let Ok(g) = self.as_grid(id) else {
            return Spring::EMPTY;
        };
        let origins = g.origins();
        let fixed_rows = g.fixed_rows.clone();
        let fixed_columns = g.fixed_columns.clone();
        let mut columns = vec![Spring::EMPTY; g.columns];
        let mut rows = vec![Spring::EMPTY; g.rows];

        let mut spanning = Vec::new();
        for &(r, c, cell, (rs, cs)) in &origins {
            let s = self.spring(cell, host);
            if rs == 1 {
                rows[r] = rows[r].stack_horizontal(s);
            }
            if cs == 1 {
                columns[c] = columns[c].stack_vertical(s);
            }
            if rs > 1 || cs > 1 {
                spanning.push((r, c, rs, cs, s));
            }
        }

        fix_tracks(&mut columns, &fixed_columns, Axis::Horizontal);
        fix_tracks(&mut rows, &fixed_rows, Axis::Vertical);
        for (r, c, rs, cs, s) in spanning {
            if cs > 1 {
                expand(&mut columns[c..c + cs], Axis::Horizontal, s);
            }
            if rs > 1 {
                expand(&mut rows[r..r + rs], Axis::Vertical, s);
            }
        }
        fix_tracks(&mut columns, &fixed_columns, Axis::Horizontal);
        fix_tracks(&mut rows, &fixed_rows, Axis::Vertical);

        let width = columns.iter().fold(Spring::EMPTY, |acc, s| acc.stack_horizontal(*s));
        let height = rows.iter().fold(Spring::EMPTY, |acc, s| acc.stack_vertical(*s));
        let total = Spring::outer_product(width, height);

        if let Ok(g) = self.as_grid_mut(id) {
            g.cache = Some(GridCache { columns, rows });
        }
        tracing::debug!(cell = id.0, spring = %total, "grid spring");
        total
    }

    pub(crate) fn place_grid(&mut self, id: CellId, host: &mut dyn Host, rect: Rect) {
        if self.as_grid(id).is_ok_and(|g| g.cache.is_none()) {
            self.grid_spring(id, &*host);
        }
        let Ok(g) = self.as_grid(id) else {
            return;
        };
        let Some(cache) = g.cache.clone() else {
            return;
        };
        let origins = g.origins();
        let align = g.align.clone();
        let ncols = g.columns;

        for (axis, tracks) in [(Axis::Horizontal, &cache.columns), (Axis::Vertical, &cache.rows)] {
            let needed = minimum_total(tracks, axis);
            let available = rect.extent(axis);
            if needed > i64::from(available) {
                tracing::warn!(cell = id.0, ?axis, available, needed, "grid overflows");
                self.report(Diagnostic::Overflow {
                    cell: id,
                    axis,
                    available,
                    minimum: needed.min(i64::from(i32::MAX)) as i32,
                });
            }
        }
        let widths = distribute(&cache.columns, Axis::Horizontal, rect.width);
        let heights = distribute(&cache.rows, Axis::Vertical, rect.height);
        tracing::trace!(cell = id.0, ?widths, ?heights, "grid tracks");

        let offsets = |lengths: &[i32], start: i32| -> Vec<i32> {
            lengths
                .iter()
                .scan(start, |pos, &len| {
                    let here = *pos;
                    *pos += len;
                    Some(here)
                })
                .collect()
        };
        let xs = offsets(&widths, rect.x);
        let ys = offsets(&heights, rect.y);

        for (r, c, cell, (rs, cs)) in origins {
            let w = widths[c..c + cs].iter().sum();
            let h = heights[r..r + rs].iter().sum();
            let mut bounds = Rect::new(xs[c], ys[r], w, h);
            let spring = self.spring(cell, &*host);
            let cell_align = align[r * ncols + c];
            for axis in Axis::BOTH {
                if spring.is_fixed(axis) {
                    let band = bounds.extent(axis);
                    let size = spring.pref(axis);
                    let offset = cell_align[axis.index()].offset(band, size).max(0);
                    bounds = bounds.with_span(axis, bounds.start(axis) + offset, size);
                }
            }
            self.place(cell, host, bounds);
        }

        if let Ok(g) = self.as_grid_mut(id) {
            g.column_widths = widths;
            g.row_heights = heights;
        }
    }
}
