//! Spring-based page layout for component trees.
//!
//! Every layout cell reduces to a [`Spring`]: minimum, preferred and maximum
//! extents along both axes. Containers combine their children's springs and
//! share out whatever space they are given, so a whole form answers its size
//! queries and lays itself out from a handful of rows, columns and grids.
//! Integer pixels throughout, `no_std` compatible with `alloc`.
//!
//! # Modules
//!
//! - [`spring`] — Extents, springs and the geometry types
//! - [`distribute`] — Sharing a length among springs along one axis
//! - [`cell`] — Cell kinds, gaps and leaves
//! - [`tree`] — The cell arena: editing, caching, the layout pass
//! - [`sequence`] — Rows and columns with alignment and fillers
//! - [`grid`] — Grids with row and column spans
//! - [`cards`] — Card stacks and tab groups
//! - [`panel`] — Subtrees hosted by a container component
//! - [`link`] — Proportional size links between components
//! - [`page`] — The top-level solver for one container
//! - [`host`] — The component contract and an in-memory host
//! - `svg` — SVG rendering of a laid-out tree (feature `svg`)
//!
//! # Example
//!
//! ```
//! use zenpage::{AddOptions, Alignment, CellTree, Component, ComponentTable, PageLayout, Rect, Size};
//!
//! let mut host = ComponentTable::new();
//! let name = host.insert(Component::fixed(Size::new(60, 20)));
//! let field = host.insert(Component::new(Size::new(150, 20)));
//!
//! let mut tree = CellTree::new();
//! let row = tree.row(Alignment::None, Alignment::Center);
//! tree.add(row, name, AddOptions::new()).unwrap();
//! tree.add(row, field, AddOptions::new()).unwrap();
//!
//! let mut page = PageLayout::new(tree, row);
//! page.attach(&mut host);
//! assert_eq!(page.preferred_size(&host), Size::new(220, 30));
//!
//! page.layout_container(&mut host, Size::new(410, 30));
//! assert_eq!(host.bounds(field), Some(Rect::new(65, 5, 340, 20)));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod align;
pub mod cards;
pub mod cell;
pub mod distribute;
pub mod error;
pub mod grid;
pub mod host;
pub mod link;
pub mod page;
pub mod panel;
pub mod sequence;
pub mod spring;
pub mod tree;

#[cfg(feature = "svg")]
pub mod svg;

// Re-exports: geometry and springs
pub use spring::{Axis, Extent, Insets, Rect, Size, Spring, Tier, UNBOUNDED};

// Re-exports: cells and containers
pub use align::Alignment;
pub use cards::{CardStack, TabGroup};
pub use cell::{AddOptions, Cell, CellId, CellKind, GapCell, Item, Leaf, LeafCell};
pub use distribute::distribute;
pub use grid::{Grid, GridEntry, GridPlacement, GridRow, GridRows, Side};
pub use link::{ContainerLink, LinkTable};
pub use panel::PanelCell;
pub use sequence::{Sequence, Slot};
pub use tree::{CellTree, TreeConfig};

// Re-exports: host contract, solver, errors
pub use error::{CellError, Diagnostic};
pub use host::{Component, ComponentId, ComponentTable, Host};
pub use page::PageLayout;
