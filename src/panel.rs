//! Panels: a subtree laid out inside a container component.
//!
//! The panel's component is placed in the enclosing coordinates; the
//! subtree is placed in the component's own coordinates, inside its insets
//! and the tree's panel gaps. After layout the component's declared minimum
//! and preferred sizes are updated to what its content needs, so a toolkit
//! that sizes it elsewhere sees the right values.

use crate::cell::{CellId, CellKind, Item};
use crate::error::CellError;
use crate::host::{ComponentId, Host};
use crate::spring::{Rect, Size, Spring, Tier};
use crate::tree::CellTree;

/// A container component holding one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PanelCell {
    pub(crate) component: ComponentId,
    pub(crate) child: CellId,
    gaps: Size,
}

impl PanelCell {
    pub fn component(&self) -> ComponentId {
        self.component
    }

    pub fn child(&self) -> CellId {
        self.child
    }

    /// Space between the insets and the content.
    pub fn gaps(&self) -> Size {
        self.gaps
    }
}

impl CellTree {
    /// Wrap `child` in the container component `container`.
    pub fn panel(&mut self, container: ComponentId, child: impl Into<Item>) -> Result<CellId, CellError> {
        let gaps = self.config().panel_gaps;
        let id = self.create(CellKind::Panel(PanelCell {
            component: container,
            child: CellId(u32::MAX),
            gaps,
        }));
        let child = match self.adopt(id, child.into()) {
            Ok(child) => child,
            Err(e) => {
                self.discard(id);
                return Err(e);
            }
        };
        if let Some(CellKind::Panel(p)) = self.cell_mut(id).map(|c| &mut c.kind) {
            p.child = child;
        }
        Ok(id)
    }

    fn panel_data(&self, id: CellId) -> Option<PanelCell> {
        match self.get(id)?.kind {
            CellKind::Panel(p) => Some(p),
            _ => None,
        }
    }

    pub(crate) fn panel_spring(&mut self, id: CellId, host: &dyn Host) -> Spring {
        let Some(panel) = self.panel_data(id) else {
            return Spring::EMPTY;
        };
        let insets = host.insets(panel.component);
        self.spring(panel.child, host).inset(
            2 * panel.gaps.width + insets.left + insets.right,
            2 * panel.gaps.height + insets.top + insets.bottom,
        )
    }

    pub(crate) fn place_panel(&mut self, id: CellId, host: &mut dyn Host, rect: Rect) {
        let Some(panel) = self.panel_data(id) else {
            return;
        };
        let spring = self.spring(id, &*host);
        host.set_bounds(panel.component, rect);
        host.set_size(panel.component, Tier::Minimum, spring.size(Tier::Minimum));
        host.set_size(panel.component, Tier::Preferred, spring.size(Tier::Preferred));

        let insets = host.insets(panel.component);
        let g = panel.gaps;
        let inner = Rect::new(
            g.width + insets.left,
            g.height + insets.top,
            rect.width - 2 * g.width - insets.left - insets.right,
            rect.height - 2 * g.height - insets.top - insets.bottom,
        );
        self.place(panel.child, host, inner);
    }
}
