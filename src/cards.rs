//! Mutually exclusive groups: card stacks and tab groups.
//!
//! A [`CardStack`] holds keyed cards and shows one at a time. By default it
//! is sized to fit every card, so switching cards never changes the
//! surrounding layout; with `use_max_bounds` off it takes the current
//! card's size instead. A [`TabGroup`] is the same idea inside a pane
//! component: the tabs are laid out in the pane's own coordinates, within
//! its insets.
//!
//! # Example
//!
//! ```
//! use zenpage::{CellTree, Component, ComponentTable, Rect, Size};
//!
//! let mut host = ComponentTable::new();
//! let a = host.insert(Component::fixed(Size::new(200, 50)));
//! let b = host.insert(Component::fixed(Size::new(120, 30)));
//!
//! let mut tree = CellTree::new();
//! let stack = tree.card_stack();
//! tree.add_card(&mut host, stack, "A", a).unwrap();
//! tree.add_card(&mut host, stack, "B", b).unwrap();
//!
//! tree.show_card(&mut host, stack, "B").unwrap();
//! tree.layout(stack, &mut host, Rect::new(0, 0, 200, 50));
//! assert_eq!(host.bounds(b), Some(Rect::new(0, 0, 120, 30)));
//! assert!(!host.is_visible(a));
//! ```

#[cfg(not(feature = "std"))]
use alloc::string::{String, ToString};
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::cell::{CellId, CellKind, Item};
use crate::error::{CellError, Diagnostic};
use crate::host::{ComponentId, Host};
use crate::spring::{Rect, Spring};
use crate::tree::CellTree;

/// Keyed cards, one of which is showing.
#[derive(Clone, Debug)]
pub struct CardStack {
    pub(crate) cards: Vec<(String, CellId)>,
    pub(crate) current: Option<usize>,
    use_max_bounds: bool,
}

impl CardStack {
    pub(crate) fn new(use_max_bounds: bool) -> Self {
        Self {
            cards: Vec::new(),
            current: None,
            use_max_bounds,
        }
    }

    /// Keys and cards in insertion order.
    pub fn cards(&self) -> impl Iterator<Item = (&str, CellId)> + '_ {
        self.cards.iter().map(|(k, id)| (k.as_str(), *id))
    }

    pub fn card(&self, key: &str) -> Option<CellId> {
        self.index_of(key).map(|i| self.cards[i].1)
    }

    /// Key of the card showing.
    pub fn current(&self) -> Option<&str> {
        self.current.map(|i| self.cards[i].0.as_str())
    }

    pub fn current_card(&self) -> Option<CellId> {
        self.current.map(|i| self.cards[i].1)
    }

    pub fn uses_max_bounds(&self) -> bool {
        self.use_max_bounds
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.cards.iter().position(|(k, _)| k == key)
    }

    pub(crate) fn remove_card(&mut self, id: CellId) {
        remove_keyed(&mut self.cards, &mut self.current, id);
    }
}

/// Tabs inside a pane component, one of which is selected.
#[derive(Clone, Debug)]
pub struct TabGroup {
    pub(crate) pane: ComponentId,
    pub(crate) tabs: Vec<(String, CellId)>,
    pub(crate) selected: Option<usize>,
}

impl TabGroup {
    /// The component that hosts the tabs.
    pub fn pane(&self) -> ComponentId {
        self.pane
    }

    /// Titles and contents in insertion order.
    pub fn tabs(&self) -> impl Iterator<Item = (&str, CellId)> + '_ {
        self.tabs.iter().map(|(t, id)| (t.as_str(), *id))
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.map(|i| self.tabs[i].0.as_str())
    }

    pub fn selected_tab(&self) -> Option<CellId> {
        self.selected.map(|i| self.tabs[i].1)
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub(crate) fn remove_tab(&mut self, id: CellId) {
        remove_keyed(&mut self.tabs, &mut self.selected, id);
    }
}

fn remove_keyed(entries: &mut Vec<(String, CellId)>, current: &mut Option<usize>, id: CellId) {
    let Some(i) = entries.iter().position(|(_, c)| *c == id) else {
        return;
    };
    entries.remove(i);
    *current = match *current {
        _ if entries.is_empty() => None,
        Some(c) if c == i => Some(0),
        Some(c) if c > i => Some(c - 1),
        other => other,
    };
}

/// Insert or replace a keyed entry; the first entry becomes current.
/// Returns the entry it replaced.
fn put_keyed(
    entries: &mut Vec<(String, CellId)>,
    current: &mut Option<usize>,
    key: &str,
    id: CellId,
) -> Option<CellId> {
    if let Some(slot) = entries.iter_mut().find(|(k, _)| k == key) {
        return Some(core::mem::replace(&mut slot.1, id));
    }
    entries.push((key.to_string(), id));
    if current.is_none() {
        *current = Some(0);
    }
    None
}

impl CellTree {
    /// New empty card stack, sized per the tree's `cards_use_max_bounds`.
    pub fn card_stack(&mut self) -> CellId {
        let use_max = self.config().cards_use_max_bounds;
        self.create(CellKind::Cards(CardStack::new(use_max)))
    }

    /// Add a card under `key`. The first card becomes current.
    ///
    /// An existing card with the same key is replaced: its subtree is freed
    /// and its components detached, and the new card is attached in its
    /// place, visible only if the old one was current.
    pub fn add_card(
        &mut self,
        host: &mut dyn Host,
        stack: CellId,
        key: &str,
        item: impl Into<Item>,
    ) -> Result<CellId, CellError> {
        self.cards(stack)?;
        let child = self.adopt(stack, item.into())?;
        let cards = self.cards_mut(stack)?;
        let replaced = put_keyed(&mut cards.cards, &mut cards.current, key, child);
        let current = cards.current_card() == Some(child);
        if let Some(old) = replaced {
            self.swap_keyed(host, old, child, current);
            tracing::debug!(cell = stack.0, key, "replaced card");
        }
        self.touch(stack);
        Ok(child)
    }

    fn swap_keyed(&mut self, host: &mut dyn Host, old: CellId, child: CellId, current: bool) {
        self.release(host, old);
        self.attach_components(host, child);
        self.set_visible(host, child, current);
    }

    /// Size the stack to all cards (`true`) or to the current one.
    pub fn set_use_max_bounds(&mut self, stack: CellId, enabled: bool) -> Result<(), CellError> {
        self.cards_mut(stack)?.use_max_bounds = enabled;
        self.touch(stack);
        Ok(())
    }

    /// Show the card under `key` and hide the current one.
    ///
    /// Unknown keys and the key already showing leave everything as it is.
    pub fn show_card(&mut self, host: &mut dyn Host, stack: CellId, key: &str) -> Result<(), CellError> {
        let cards = self.cards(stack)?;
        let Some(next) = cards.index_of(key) else {
            tracing::warn!(cell = stack.0, key, "no such card");
            self.report(Diagnostic::UnknownCard(key.to_string()));
            return Ok(());
        };
        if cards.current == Some(next) {
            tracing::debug!(cell = stack.0, key, "card already showing");
            self.report(Diagnostic::CardAlreadyShown(key.to_string()));
            return Ok(());
        }
        let previous = cards.current_card();
        let shown = cards.cards[next].1;

        if let Some(previous) = previous {
            self.set_visible(host, previous, false);
        }
        self.set_visible(host, shown, true);
        self.cards_mut(stack)?.current = Some(next);
        self.touch(stack);
        host.revalidate();
        tracing::debug!(cell = stack.0, key, "showing card");
        Ok(())
    }

    fn cards(&self, id: CellId) -> Result<&CardStack, CellError> {
        match &self.get(id).ok_or(CellError::UnknownCell(id))?.kind {
            CellKind::Cards(c) => Ok(c),
            other => Err(CellError::WrongKind {
                cell: id,
                expected: "card stack",
                found: other.label(),
            }),
        }
    }

    fn cards_mut(&mut self, id: CellId) -> Result<&mut CardStack, CellError> {
        match &mut self.cell_mut(id).ok_or(CellError::UnknownCell(id))?.kind {
            CellKind::Cards(c) => Ok(c),
            other => Err(CellError::WrongKind {
                cell: id,
                expected: "card stack",
                found: other.label(),
            }),
        }
    }

    pub(crate) fn cards_spring(&mut self, id: CellId, host: &dyn Host) -> Spring {
        let Ok(cards) = self.cards(id) else {
            return Spring::EMPTY;
        };
        let members: Vec<CellId> = if cards.use_max_bounds {
            cards.cards().map(|(_, c)| c).collect()
        } else {
            cards.current_card().into_iter().collect()
        };
        let mut total: Option<Spring> = None;
        for card in members {
            let s = self.spring(card, host);
            total = Some(total.map_or(s, |t| t.enclose(s)));
        }
        total.unwrap_or(Spring::EMPTY)
    }

    pub(crate) fn place_cards(&mut self, id: CellId, host: &mut dyn Host, rect: Rect) {
        if let Some(card) = self.cards(id).ok().and_then(CardStack::current_card) {
            self.place(card, host, rect);
        }
    }

    // ── Tabs ────────────────────────────────────────────────────────────

    /// New empty tab group hosted by the `pane` component.
    pub fn tabs(&mut self, pane: ComponentId) -> CellId {
        self.create(CellKind::Tabs(TabGroup {
            pane,
            tabs: Vec::new(),
            selected: None,
        }))
    }

    /// Add a tab. The first tab is selected; a tab with the same title is
    /// replaced and released like a card.
    pub fn add_tab(
        &mut self,
        host: &mut dyn Host,
        tabs: CellId,
        title: &str,
        item: impl Into<Item>,
    ) -> Result<CellId, CellError> {
        self.tab_group(tabs)?;
        let child = self.adopt(tabs, item.into())?;
        let group = self.tab_group_mut(tabs)?;
        let replaced = put_keyed(&mut group.tabs, &mut group.selected, title, child);
        let selected = group.selected_tab() == Some(child);
        if let Some(old) = replaced {
            self.swap_keyed(host, old, child, selected);
            tracing::debug!(cell = tabs.0, title, "replaced tab");
        }
        self.touch(tabs);
        Ok(child)
    }

    /// Select the tab titled `title`. Unknown and already selected titles
    /// leave everything as it is.
    pub fn select_tab(&mut self, host: &mut dyn Host, tabs: CellId, title: &str) -> Result<(), CellError> {
        let group = self.tab_group(tabs)?;
        let Some(next) = group.tabs.iter().position(|(t, _)| t == title) else {
            tracing::warn!(cell = tabs.0, title, "no such tab");
            self.report(Diagnostic::UnknownCard(title.to_string()));
            return Ok(());
        };
        if group.selected == Some(next) {
            self.report(Diagnostic::CardAlreadyShown(title.to_string()));
            return Ok(());
        }
        let previous = group.selected_tab();
        let shown = group.tabs[next].1;
        if let Some(previous) = previous {
            self.set_visible(host, previous, false);
        }
        self.set_visible(host, shown, true);
        self.tab_group_mut(tabs)?.selected = Some(next);
        self.touch(tabs);
        host.revalidate();
        tracing::debug!(cell = tabs.0, title, "selected tab");
        Ok(())
    }

    fn tab_group(&self, id: CellId) -> Result<&TabGroup, CellError> {
        match &self.get(id).ok_or(CellError::UnknownCell(id))?.kind {
            CellKind::Tabs(t) => Ok(t),
            other => Err(CellError::WrongKind {
                cell: id,
                expected: "tab group",
                found: other.label(),
            }),
        }
    }

    fn tab_group_mut(&mut self, id: CellId) -> Result<&mut TabGroup, CellError> {
        match &mut self.cell_mut(id).ok_or(CellError::UnknownCell(id))?.kind {
            CellKind::Tabs(t) => Ok(t),
            other => Err(CellError::WrongKind {
                cell: id,
                expected: "tab group",
                found: other.label(),
            }),
        }
    }

    pub(crate) fn tabs_spring(&mut self, id: CellId, host: &dyn Host) -> Spring {
        let Ok(group) = self.tab_group(id) else {
            return Spring::EMPTY;
        };
        let pane = group.pane;
        let members: Vec<CellId> = group.tabs().map(|(_, c)| c).collect();
        let content = members
            .into_iter()
            .map(|c| self.spring(c, host))
            .fold(Spring::EMPTY, Spring::enclose);
        let insets = host.insets(pane);
        let own = Spring::from_sizes(
            host.minimum_size(pane),
            host.preferred_size(pane),
            host.maximum_size(pane),
        );
        content
            .inset(insets.left + insets.right, insets.top + insets.bottom)
            .enclose(own)
    }

    pub(crate) fn place_tabs(&mut self, id: CellId, host: &mut dyn Host, rect: Rect) {
        let Ok(group) = self.tab_group(id) else {
            return;
        };
        let pane = group.pane;
        let selected = group.selected_tab();
        let others: Vec<CellId> = group
            .tabs()
            .map(|(_, c)| c)
            .filter(|&c| Some(c) != selected)
            .collect();

        host.set_bounds(pane, rect);
        let insets = host.insets(pane);
        let inner = Rect::new(
            insets.left,
            insets.top,
            rect.width - insets.left - insets.right,
            rect.height - insets.top - insets.bottom,
        );
        if let Some(tab) = selected {
            self.place(tab, host, inner);
        }
        for tab in others {
            self.set_visible(host, tab, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::Alignment;
    use crate::cell::AddOptions;
    use crate::host::{Component, ComponentTable};
    use crate::spring::{Axis, Insets, Size};
    use crate::TreeConfig;

    fn two_cards(tree: &mut CellTree, host: &mut ComponentTable) -> (CellId, ComponentId, ComponentId) {
        let a = host.insert(Component::fixed(Size::new(200, 50)));
        let b = host.insert(Component::fixed(Size::new(120, 30)));
        let stack = tree.card_stack();
        tree.add_card(host, stack, "A", a).unwrap();
        tree.add_card(host, stack, "B", b).unwrap();
        (stack, a, b)
    }

    // ── Card stacks ─────────────────────────────────────────────────────

    #[test]
    fn first_card_is_current() {
        let mut tree = CellTree::new();
        let mut host = ComponentTable::new();
        let (stack, _, _) = two_cards(&mut tree, &mut host);
        let CellKind::Cards(cards) = tree.get(stack).unwrap().kind() else {
            panic!("not a card stack");
        };
        assert_eq!(cards.current(), Some("A"));
        assert_eq!(cards.len(), 2);
    }

    #[test]
    fn enclosing_spring_ignores_the_current_card() {
        let mut tree = CellTree::new();
        let mut host = ComponentTable::new();
        let (stack, _, _) = two_cards(&mut tree, &mut host);
        let before = tree.spring(stack, &host);
        tree.show_card(&mut host, stack, "B").unwrap();
        assert_eq!(tree.spring(stack, &host), before);
        assert_eq!(before.size(crate::Tier::Preferred), Size::new(200, 50));
    }

    #[test]
    fn current_only_spring_follows_the_card() {
        let mut tree = CellTree::with_config(TreeConfig::new().cards_use_max_bounds(false));
        let mut host = ComponentTable::new();
        let (stack, _, _) = two_cards(&mut tree, &mut host);
        assert_eq!(tree.spring(stack, &host).pref(Axis::Horizontal), 200);
        tree.show_card(&mut host, stack, "B").unwrap();
        assert_eq!(tree.spring(stack, &host).pref(Axis::Horizontal), 120);
        tree.set_use_max_bounds(stack, true).unwrap();
        assert_eq!(tree.spring(stack, &host).pref(Axis::Horizontal), 200);
    }

    #[test]
    fn show_card_switches_visibility_and_revalidates() {
        let mut tree = CellTree::new();
        let mut host = ComponentTable::new();
        let (stack, a, b) = two_cards(&mut tree, &mut host);
        tree.attach_components(&mut host, stack);
        assert!(host.is_visible(a));
        assert!(!host.is_visible(b));

        tree.show_card(&mut host, stack, "B").unwrap();
        assert!(!host.is_visible(a));
        assert!(host.is_visible(b));
        assert_eq!(host.revalidations(), 1);
    }

    #[test]
    fn unknown_or_current_key_is_a_no_op() {
        let mut tree = CellTree::with_config(TreeConfig::new().diagnostics(true));
        let mut host = ComponentTable::new();
        let (stack, _, _) = two_cards(&mut tree, &mut host);
        tree.show_card(&mut host, stack, "C").unwrap();
        tree.show_card(&mut host, stack, "A").unwrap();
        assert_eq!(host.revalidations(), 0);
        assert_eq!(
            tree.take_diagnostics(),
            vec![
                Diagnostic::UnknownCard("C".into()),
                Diagnostic::CardAlreadyShown("A".into())
            ]
        );
    }

    #[test]
    fn same_key_replaces_and_releases_the_card() {
        let mut tree = CellTree::new();
        let mut host = ComponentTable::new();
        let (stack, a, b) = two_cards(&mut tree, &mut host);
        tree.attach_components(&mut host, stack);
        let old = tree.find_component(stack, a).unwrap();
        let c = host.insert(Component::fixed(Size::new(10, 10)));
        let new = tree.add_card(&mut host, stack, "A", c).unwrap();

        assert!(tree.get(old).is_none());
        assert_eq!(tree.children(stack), vec![new, tree.find_component(stack, b).unwrap()]);
        assert_eq!(host.get(a).unwrap().parent, None);
        assert_eq!(host.get(c).unwrap().parent, Some(None));
        assert!(host.is_visible(c));
    }

    #[test]
    fn replacing_a_waiting_card_keeps_it_hidden() {
        let mut tree = CellTree::new();
        let mut host = ComponentTable::new();
        let (stack, _, b) = two_cards(&mut tree, &mut host);
        tree.attach_components(&mut host, stack);
        let c = host.insert(Component::fixed(Size::new(10, 10)));
        tree.add_card(&mut host, stack, "B", c).unwrap();
        assert_eq!(host.get(b).unwrap().parent, None);
        assert!(!host.is_visible(c));
    }

    #[test]
    fn replaced_component_can_anchor_a_link_elsewhere() {
        let mut tree = CellTree::with_config(TreeConfig::new().diagnostics(true));
        let mut host = ComponentTable::new();
        let x = host.insert(Component::new(Size::new(120, 20)));
        let y = host.insert(Component::new(Size::new(120, 20)));
        let z = host.insert(Component::new(Size::new(60, 20)));
        let stack = tree.card_stack();
        tree.add_card(&mut host, stack, "A", x).unwrap();
        tree.add_card(&mut host, stack, "A", y).unwrap();

        let col = tree.column(Alignment::None, Alignment::None);
        tree.add(col, x, AddOptions::new()).unwrap();
        tree.add(col, z, AddOptions::new()).unwrap();
        tree.link_width(&mut host, x, &[(z, 0.5)]);
        assert!(
            !tree
                .diagnostics()
                .iter()
                .any(|d| matches!(d, Diagnostic::LinkNotRegistered { .. }))
        );

        tree.layout(col, &mut host, Rect::new(0, 0, 300, 40));
        assert_eq!(host.bounds(x), Some(Rect::new(0, 0, 300, 20)));
        assert_eq!(host.bounds(z), Some(Rect::new(0, 20, 150, 20)));
    }

    #[test]
    fn removing_the_current_card_shows_the_first() {
        let mut tree = CellTree::new();
        let mut host = ComponentTable::new();
        let (stack, _, b) = two_cards(&mut tree, &mut host);
        let a_leaf = tree.children(stack)[0];
        tree.remove(&mut host, a_leaf).unwrap();
        tree.layout(stack, &mut host, Rect::new(0, 0, 200, 50));
        assert_eq!(host.bounds(b), Some(Rect::new(0, 0, 120, 30)));
    }

    #[test]
    fn nested_stack_shows_only_its_current_card() {
        let mut tree = CellTree::new();
        let mut host = ComponentTable::new();
        let (inner, a, b) = two_cards(&mut tree, &mut host);
        let col = tree.column(Alignment::None, Alignment::None);
        tree.add(col, inner, AddOptions::new()).unwrap();
        tree.set_visible(&mut host, col, true);
        assert!(host.is_visible(a));
        assert!(!host.is_visible(b));
    }

    // ── Tabs ────────────────────────────────────────────────────────────

    #[test]
    fn tabs_lay_out_inside_the_pane() {
        let mut tree = CellTree::new();
        let mut host = ComponentTable::new();
        let pane = host.insert(
            Component::new(Size::new(0, 0)).with_insets(Insets::new(20, 2, 2, 2)),
        );
        let first = host.insert(Component::new(Size::new(100, 40)));
        let second = host.insert(Component::new(Size::new(150, 20)));
        let tabs = tree.tabs(pane);
        tree.add_tab(&mut host, tabs, "General", first).unwrap();
        tree.add_tab(&mut host, tabs, "Advanced", second).unwrap();

        let s = tree.spring(tabs, &host);
        assert_eq!(s.pref(Axis::Horizontal), 154);
        assert_eq!(s.pref(Axis::Vertical), 62);

        tree.layout(tabs, &mut host, Rect::new(10, 10, 200, 100));
        assert_eq!(host.bounds(pane), Some(Rect::new(10, 10, 200, 100)));
        assert_eq!(host.bounds(first), Some(Rect::new(2, 20, 196, 78)));
        assert!(!host.is_visible(second));

        tree.select_tab(&mut host, tabs, "Advanced").unwrap();
        assert!(host.is_visible(second));
        assert!(!host.is_visible(first));
    }

    #[test]
    fn tab_contents_attach_to_the_pane() {
        let mut tree = CellTree::new();
        let mut host = ComponentTable::new();
        let pane = host.insert(Component::new(Size::ZERO));
        let content = host.insert(Component::new(Size::new(10, 10)));
        let tabs = tree.tabs(pane);
        tree.add_tab(&mut host, tabs, "One", content).unwrap();
        tree.attach_components(&mut host, tabs);
        assert_eq!(host.get(pane).unwrap().parent, Some(None));
        assert_eq!(host.get(content).unwrap().parent, Some(Some(pane)));
    }

    #[test]
    fn same_title_replaces_and_releases_the_tab() {
        let mut tree = CellTree::new();
        let mut host = ComponentTable::new();
        let pane = host.insert(Component::new(Size::ZERO));
        let first = host.insert(Component::new(Size::new(10, 10)));
        let second = host.insert(Component::new(Size::new(20, 10)));
        let tabs = tree.tabs(pane);
        let old = tree.add_tab(&mut host, tabs, "One", first).unwrap();
        tree.attach_components(&mut host, tabs);

        let new = tree.add_tab(&mut host, tabs, "One", second).unwrap();
        assert!(tree.get(old).is_none());
        assert_eq!(tree.children(tabs), vec![new]);
        assert_eq!(host.get(first).unwrap().parent, None);
        assert_eq!(host.get(second).unwrap().parent, Some(Some(pane)));
        assert!(host.is_visible(second));
    }
}
