//! API errors and layout diagnostics.
//!
//! Layout itself never fails: malformed grids, unknown card keys and
//! overflowing sequences degrade to an imperfect layout. When diagnostics
//! are enabled on the tree, each such degradation is recorded as a
//! [`Diagnostic`]. [`CellError`] is reserved for misuse of the tree API.

#[cfg(not(feature = "std"))]
use alloc::string::String;

use thiserror::Error;

use crate::align::Alignment;
use crate::cell::CellId;
use crate::spring::Axis;

/// Misuse of the [`CellTree`](crate::CellTree) API.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CellError {
    /// The id does not refer to a live cell in this tree.
    #[error("cell {0:?} does not exist")]
    UnknownCell(CellId),
    /// The operation needs a different kind of cell.
    #[error("cell {cell:?} is a {found}, expected a {expected}")]
    WrongKind {
        cell: CellId,
        expected: &'static str,
        found: &'static str,
    },
    /// The cell already has a parent; detach it first.
    #[error("cell {0:?} already has a parent")]
    AlreadyAttached(CellId),
    /// Attaching the cell would make it its own ancestor.
    #[error("attaching {0:?} would create a cycle")]
    Cycle(CellId),
    /// Grid position outside the grid.
    #[error("grid position ({row}, {column}) is outside a {rows}x{columns} grid")]
    OutOfGrid {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },
    /// The grid positions an item would cover are not all empty.
    #[error("grid position ({row}, {column}) is already occupied")]
    Occupied { row: usize, column: usize },
    /// The operation needs a cell that sits inside a container.
    #[error("cell {0:?} has no parent")]
    NoParent(CellId),
    /// Child index past the end of a sequence.
    #[error("index {index} is out of range for {len} children")]
    IndexOutOfRange { index: usize, len: usize },
    /// Alignment name not recognized.
    #[error("unknown alignment name")]
    UnknownAlignment,
}

/// A condition the layout tolerated rather than rejected.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// A requested span ran past the grid edge and was shortened.
    SpanClipped {
        row: usize,
        column: usize,
        requested: (usize, usize),
        clipped: (usize, usize),
    },
    /// A span marker had no origin cell and was treated as empty.
    OrphanSpan { row: usize, column: usize },
    /// An item sat inside another cell's span and was left out of the grid.
    CoveredCellDropped { row: usize, column: usize },
    /// `show_card` named a key the stack does not hold.
    UnknownCard(String),
    /// `show_card` named the card that is already showing.
    CardAlreadyShown(String),
    /// A link target was resized but could not be tracked live at layout time.
    LinkNotRegistered { axis: Axis, reason: &'static str },
    /// An alignment the sequence cannot honour on that axis was replaced by none.
    InvalidAlignment {
        cell: CellId,
        axis: Axis,
        requested: Alignment,
    },
    /// Available space fell below the sum of minimums; elements overflow.
    Overflow {
        cell: CellId,
        axis: Axis,
        available: i32,
        minimum: i32,
    },
}
