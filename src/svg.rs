//! SVG visualization of a laid-out cell tree.
//!
//! Draws the bounds recorded by the last layout pass as nested, labelled
//! rectangles: containers outlined, leaves filled, gaps dashed. Only the
//! showing card of a stack and the selected tab of a group are drawn.
//!
//! # Example
//!
//! ```
//! use zenpage::{AddOptions, Alignment, CellTree, Component, ComponentTable, Rect, Size};
//! use zenpage::svg::render_tree_svg;
//!
//! let mut host = ComponentTable::new();
//! let ok = host.insert(Component::fixed(Size::new(80, 24)));
//! let mut tree = CellTree::new();
//! let row = tree.row(Alignment::Center, Alignment::Center);
//! tree.add(row, ok, AddOptions::new().name("ok")).unwrap();
//! tree.layout(row, &mut host, Rect::new(0, 0, 200, 40));
//!
//! let svg = render_tree_svg(&tree, row);
//! assert!(svg.contains("ok  80×24"));
//! ```

#[cfg(not(feature = "std"))]
use alloc::format;
#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::cell::{CellId, CellKind};
use crate::spring::Rect;
use crate::tree::CellTree;

/// Maximum drawing width for the tree.
const MAX_DRAW_W: f64 = 600.0;
/// Maximum drawing height for the tree.
const MAX_DRAW_H: f64 = 400.0;
/// Horizontal margin.
const MARGIN_X: f64 = 30.0;
/// Top margin, above the title.
const MARGIN_TOP: f64 = 30.0;
/// Height of the title area above the drawing.
const LABEL_H: f64 = 22.0;
/// Labels are skipped on boxes narrower than this after scaling.
const MIN_LABEL_W: f64 = 40.0;

/// One cell's box in root coordinates.
struct Node {
    label: String,
    rect: Rect,
    class: &'static str,
    depth: usize,
}

/// Render a complete SVG document of the tree rooted at `root`.
///
/// Cells that have not been laid out yet are left out.
pub fn render_tree_svg(tree: &CellTree, root: CellId) -> String {
    let mut nodes = Vec::new();
    collect(tree, root, (0, 0), 0, &mut nodes);
    render_nodes(&nodes)
}

/// Walk the showing part of the tree. Panel and tab contents are placed in
/// their container's coordinates, so `origin` accumulates.
fn collect(tree: &CellTree, id: CellId, origin: (i32, i32), depth: usize, out: &mut Vec<Node>) {
    let Some(cell) = tree.get(id) else {
        return;
    };
    let Some(local) = cell.bounds() else {
        return;
    };
    let rect = Rect::new(origin.0 + local.x, origin.1 + local.y, local.width, local.height);
    let kind = cell.kind();
    let class = match kind {
        CellKind::Gap(_) => "gap",
        CellKind::Leaf(_) => "leaf",
        _ => "container",
    };
    let label = match cell.name() {
        Some(name) => format!("{name}  {}×{}", rect.width, rect.height),
        None => format!("{}  {}×{}", kind.label(), rect.width, rect.height),
    };
    out.push(Node {
        label,
        rect,
        class,
        depth,
    });

    let inner = (rect.x, rect.y);
    match kind {
        CellKind::Panel(p) => collect(tree, p.child(), inner, depth + 1, out),
        CellKind::Tabs(t) => {
            if let Some(tab) = t.selected_tab() {
                collect(tree, tab, inner, depth + 1, out);
            }
        }
        CellKind::Cards(c) => {
            if let Some(card) = c.current_card() {
                collect(tree, card, origin, depth + 1, out);
            }
        }
        other => {
            for child in other.children() {
                collect(tree, child, origin, depth + 1, out);
            }
        }
    }
}

/// Scale factor that fits `rect` within MAX_DRAW_W × MAX_DRAW_H.
fn scale_to_fit(rect: Rect) -> f64 {
    let w = rect.width as f64;
    let h = rect.height as f64;
    if w <= 0.0 || h <= 0.0 {
        return 1.0;
    }
    (MAX_DRAW_W / w).min(MAX_DRAW_H / h)
}

fn render_nodes(nodes: &[Node]) -> String {
    let Some(root) = nodes.first() else {
        return String::from(r#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"/>"#);
    };
    let scale = scale_to_fit(root.rect);
    let draw_w = root.rect.width.max(0) as f64 * scale;
    let draw_h = root.rect.height.max(0) as f64 * scale;
    let total_w = draw_w + 2.0 * MARGIN_X;
    let total_h = MARGIN_TOP + LABEL_H + draw_h + MARGIN_TOP;

    let mut svg = String::with_capacity(4096);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        total_w as u32, total_h as u32, total_w, total_h
    ));
    svg.push('\n');

    // Style — light/dark mode via prefers-color-scheme
    svg.push_str(r##"<style>
  text { font-family: "Consolas", "DejaVu Sans Mono", "Courier New", monospace; }
  .label { font-size: 13px; font-weight: bold; fill: #333; }
  .annotation { font-size: 10px; fill: #666; }
  .container { fill: none; stroke: #999; stroke-width: 1; }
  .leaf { fill: #6ba3d6; stroke: #2c6faa; stroke-width: 1.5; }
  .gap { fill: #b8d4ee; stroke: #7baed0; stroke-width: 1; stroke-dasharray: 4,2; }
  .outer { fill: #e8e8e8; stroke: #999; stroke-width: 1; }
  @media (prefers-color-scheme: dark) {
    .label { fill: #e0e0e0; }
    .annotation { fill: #aaa; }
    .container { stroke: #555; }
    .leaf { fill: #3a72a4; stroke: #5a9fd4; }
    .gap { fill: #2a4a65; stroke: #4a7a9e; }
    .outer { fill: #2d2d2d; stroke: #555; }
  }
</style>
"##);

    svg.push_str(&format!(
        r#"<text x="{}" y="{}" class="label" text-anchor="middle">{}</text>"#,
        total_w / 2.0,
        MARGIN_TOP + 14.0,
        escape_xml(&root.label)
    ));
    svg.push('\n');

    let left = MARGIN_X;
    let top = MARGIN_TOP + LABEL_H;
    svg.push_str(&format!(
        r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" class="outer"/>"#,
        left, top, draw_w, draw_h
    ));
    svg.push('\n');

    for node in &nodes[1..] {
        let x = left + (node.rect.x - root.rect.x) as f64 * scale;
        let y = top + (node.rect.y - root.rect.y) as f64 * scale;
        let w = node.rect.width.max(0) as f64 * scale;
        let h = node.rect.height.max(0) as f64 * scale;
        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" class="{}" data-depth="{}"/>"#,
            x, y, w, h, node.class, node.depth
        ));
        svg.push('\n');
        if node.class != "gap" && w >= MIN_LABEL_W && h >= 12.0 {
            svg.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" class="annotation">{}</text>"#,
                x + 3.0,
                y + 11.0,
                escape_xml(&node.label)
            ));
            svg.push('\n');
        }
    }

    svg.push_str("</svg>\n");
    svg
}

/// Escape special characters for XML text content.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::Alignment;
    use crate::cell::{AddOptions, GapCell};
    use crate::host::{Component, ComponentTable};
    use crate::spring::{Insets, Size};

    #[test]
    fn svg_before_layout_is_empty() {
        let mut tree = CellTree::new();
        let row = tree.row(Alignment::None, Alignment::None);
        let svg = render_tree_svg(&tree, row);
        assert!(svg.starts_with("<svg"));
        assert!(!svg.contains("<rect"));
    }

    #[test]
    fn svg_draws_every_placed_cell() {
        let mut host = ComponentTable::new();
        let a = host.insert(Component::new(Size::new(100, 20)));
        let mut tree = CellTree::new();
        let row = tree.row(Alignment::None, Alignment::None);
        tree.add(row, a, AddOptions::new().name("field")).unwrap();
        tree.add(row, GapCell::horizontal(10), AddOptions::new()).unwrap();
        tree.layout(row, &mut host, Rect::new(0, 0, 300, 20));

        let svg = render_tree_svg(&tree, row);
        assert!(svg.contains("row  300×20"));
        assert!(svg.contains("field  290×20"));
        assert_eq!(svg.matches(r#"class="gap""#).count(), 1);
        assert_eq!(svg.matches(r#"class="leaf""#).count(), 1);
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn svg_offsets_panel_contents() {
        let mut host = ComponentTable::new();
        let frame = host.insert(Component::new(Size::ZERO).with_insets(Insets::new(20, 20, 0, 0)));
        let inside = host.insert(Component::new(Size::new(100, 100)));
        let mut tree = CellTree::new();
        let col = tree.column(Alignment::None, Alignment::None);
        let gap = tree.add(col, GapCell::vertical(50), AddOptions::new()).unwrap();
        let panel = tree.panel(frame, inside).unwrap();
        tree.add(col, panel, AddOptions::new()).unwrap();
        tree.layout(col, &mut host, Rect::new(0, 0, 120, 170));
        assert_eq!(tree.bounds(gap), Some(Rect::new(0, 0, 0, 50)));

        // The leaf sits at (20, 20) inside a panel at (0, 50): root scale is 400 / 170.
        let scale = 400.0 / 170.0;
        let y = MARGIN_TOP + LABEL_H + 70.0 * scale;
        let svg = render_tree_svg(&tree, col);
        assert!(svg.contains(&format!(r#"y="{y:.1}""#)));
    }

    #[test]
    fn svg_escapes_names() {
        let mut host = ComponentTable::new();
        let a = host.insert(Component::new(Size::new(100, 20)));
        let mut tree = CellTree::new();
        let row = tree.row(Alignment::None, Alignment::None);
        tree.add(row, a, AddOptions::new().name("<ok & go>")).unwrap();
        tree.layout(row, &mut host, Rect::new(0, 0, 100, 20));
        let svg = render_tree_svg(&tree, row);
        assert!(svg.contains("&lt;ok &amp; go&gt;"));
    }
}
