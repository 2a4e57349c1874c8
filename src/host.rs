//! The component contract between the layout engine and a UI toolkit.
//!
//! Components are opaque to the engine. It identifies them by
//! [`ComponentId`], reads and writes their declared sizes through [`Host`],
//! and pushes the computed bounds back. [`ComponentTable`] is a complete
//! in-memory host for headless layout and tests.
//!
//! # Example
//!
//! ```
//! use zenpage::{Component, ComponentTable, Host, Size, Tier};
//!
//! let mut host = ComponentTable::new();
//! let ok = host.insert(Component::fixed(Size::new(80, 24)).with_baseline(17));
//!
//! assert_eq!(host.size(ok, Tier::Maximum), Size::new(80, 24));
//! assert_eq!(host.baseline(ok), Some(17));
//! ```

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::spring::{Insets, Rect, Size, Tier, UNBOUNDED};

/// Handle to a component owned by the host toolkit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub u32);

/// What the layout engine needs from the toolkit.
///
/// Only size access and [`set_bounds`](Host::set_bounds) are required; the
/// remaining methods default to a toolkit with no baselines, no insets and
/// no container bookkeeping.
pub trait Host {
    /// One of the component's declared sizes.
    fn size(&self, component: ComponentId, tier: Tier) -> Size;

    /// Replace one of the component's declared sizes.
    fn set_size(&mut self, component: ComponentId, tier: Tier, size: Size);

    /// Position the component within its parent container.
    fn set_bounds(&mut self, component: ComponentId, bounds: Rect);

    /// Distance from the component's top edge to its text baseline.
    fn baseline(&self, component: ComponentId) -> Option<i32> {
        let _ = component;
        None
    }

    /// Insets of a component that itself contains components.
    fn insets(&self, component: ComponentId) -> Insets {
        let _ = component;
        Insets::ZERO
    }

    /// Insets of the top-level container managed by a [`PageLayout`](crate::PageLayout).
    fn container_insets(&self) -> Insets {
        Insets::ZERO
    }

    fn set_visible(&mut self, component: ComponentId, visible: bool) {
        let _ = (component, visible);
    }

    /// Add the component to a container. `None` is the top-level container.
    fn attach(&mut self, component: ComponentId, parent: Option<ComponentId>) {
        let _ = (component, parent);
    }

    /// Remove the component from whichever container holds it.
    fn detach(&mut self, component: ComponentId) {
        let _ = component;
    }

    /// Ask the toolkit to lay out and repaint again.
    fn revalidate(&mut self) {}

    fn minimum_size(&self, component: ComponentId) -> Size {
        self.size(component, Tier::Minimum)
    }

    fn preferred_size(&self, component: ComponentId) -> Size {
        self.size(component, Tier::Preferred)
    }

    fn maximum_size(&self, component: ComponentId) -> Size {
        self.size(component, Tier::Maximum)
    }

    fn set_minimum_size(&mut self, component: ComponentId, size: Size) {
        self.set_size(component, Tier::Minimum, size);
    }

    fn set_preferred_size(&mut self, component: ComponentId, size: Size) {
        self.set_size(component, Tier::Preferred, size);
    }

    fn set_maximum_size(&mut self, component: ComponentId, size: Size) {
        self.set_size(component, Tier::Maximum, size);
    }
}

/// A component record held by [`ComponentTable`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Component {
    pub minimum: Size,
    pub preferred: Size,
    pub maximum: Size,
    pub baseline: Option<i32>,
    pub insets: Insets,
    /// Bounds assigned by the last layout pass.
    pub bounds: Option<Rect>,
    pub visible: bool,
    /// `Some(None)` when attached to the top-level container.
    pub parent: Option<Option<ComponentId>>,
}

impl Component {
    /// Flexible component: zero minimum, unbounded maximum.
    pub const fn new(preferred: Size) -> Self {
        Self {
            minimum: Size::ZERO,
            preferred,
            maximum: Size::new(UNBOUNDED, UNBOUNDED),
            baseline: None,
            insets: Insets::ZERO,
            bounds: None,
            visible: true,
            parent: None,
        }
    }

    /// Rigid component: minimum, preferred and maximum all equal.
    pub const fn fixed(size: Size) -> Self {
        Self {
            minimum: size,
            maximum: size,
            ..Self::new(size)
        }
    }

    pub const fn with_minimum(mut self, size: Size) -> Self {
        self.minimum = size;
        self
    }

    pub const fn with_maximum(mut self, size: Size) -> Self {
        self.maximum = size;
        self
    }

    pub const fn with_baseline(mut self, baseline: i32) -> Self {
        self.baseline = Some(baseline);
        self
    }

    pub const fn with_insets(mut self, insets: Insets) -> Self {
        self.insets = insets;
        self
    }
}

/// In-memory [`Host`]: a table of [`Component`] records.
///
/// Unknown ids read as zero-sized and writes to them are ignored.
#[derive(Clone, Debug, Default)]
pub struct ComponentTable {
    components: Vec<Component>,
    container_insets: Insets,
    revalidations: u32,
}

impl ComponentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insets reported for the top-level container.
    pub fn with_container_insets(mut self, insets: Insets) -> Self {
        self.container_insets = insets;
        self
    }

    /// Add a component and return its id.
    pub fn insert(&mut self, component: Component) -> ComponentId {
        let id = ComponentId(self.components.len() as u32);
        self.components.push(component);
        id
    }

    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.components.get_mut(id.0 as usize)
    }

    /// Bounds assigned by the last layout pass.
    pub fn bounds(&self, id: ComponentId) -> Option<Rect> {
        self.get(id).and_then(|c| c.bounds)
    }

    pub fn is_visible(&self, id: ComponentId) -> bool {
        self.get(id).is_some_and(|c| c.visible)
    }

    /// How many times layout asked for a revalidation.
    pub fn revalidations(&self) -> u32 {
        self.revalidations
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl Host for ComponentTable {
    fn size(&self, component: ComponentId, tier: Tier) -> Size {
        match self.get(component) {
            Some(c) => match tier {
                Tier::Minimum => c.minimum,
                Tier::Preferred => c.preferred,
                Tier::Maximum => c.maximum,
            },
            None => Size::ZERO,
        }
    }

    fn set_size(&mut self, component: ComponentId, tier: Tier, size: Size) {
        if let Some(c) = self.get_mut(component) {
            match tier {
                Tier::Minimum => c.minimum = size,
                Tier::Preferred => c.preferred = size,
                Tier::Maximum => c.maximum = size,
            }
        }
    }

    fn set_bounds(&mut self, component: ComponentId, bounds: Rect) {
        if let Some(c) = self.get_mut(component) {
            c.bounds = Some(bounds);
        }
    }

    fn baseline(&self, component: ComponentId) -> Option<i32> {
        self.get(component).and_then(|c| c.baseline)
    }

    fn insets(&self, component: ComponentId) -> Insets {
        self.get(component).map_or(Insets::ZERO, |c| c.insets)
    }

    fn container_insets(&self) -> Insets {
        self.container_insets
    }

    fn set_visible(&mut self, component: ComponentId, visible: bool) {
        if let Some(c) = self.get_mut(component) {
            c.visible = visible;
        }
    }

    fn attach(&mut self, component: ComponentId, parent: Option<ComponentId>) {
        if let Some(c) = self.get_mut(component) {
            c.parent = Some(parent);
        }
    }

    fn detach(&mut self, component: ComponentId) {
        if let Some(c) = self.get_mut(component) {
            c.parent = None;
        }
    }

    fn revalidate(&mut self) {
        self.revalidations += 1;
    }
}
