//! Springs: minimum, preferred and maximum extents in both axes.
//!
//! Every cell in a layout tree reports a [`Spring`]. Composite cells build
//! theirs from their children with the combinators here: stacking along one
//! axis adds extents and takes the maximum across the other, the outer
//! product pairs a horizontal spring with a vertical one, and [`Spring::enclose`]
//! takes the field-wise maximum.
//!
//! All extents are clamped to [`UNBOUNDED`], and sums saturate there.
//!
//! # Example
//!
//! ```
//! use zenpage::{Axis, Extent, Spring};
//!
//! let a = Spring::new(Extent::new(10, 50, 100), Extent::new(5, 20, 20));
//! let b = Spring::new(Extent::fixed(30), Extent::new(0, 40, 80));
//!
//! let row = a.stack_horizontal(b);
//! assert_eq!(row.extent(Axis::Horizontal), Extent::new(40, 80, 130));
//! assert_eq!(row.extent(Axis::Vertical), Extent::new(5, 40, 80));
//! ```

use core::fmt;

use num_traits::Float;

/// Largest extent a spring can express. Component sizes are clamped to it
/// and stacked sums saturate at it.
pub const UNBOUNDED: i32 = 32_767;

/// One of the two layout axes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// Left to right (widths, x coordinates).
    Horizontal,
    /// Top to bottom (heights, y coordinates).
    Vertical,
}

impl Axis {
    /// Both axes, horizontal first.
    pub const BOTH: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

    /// The other axis.
    pub const fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Horizontal => 0,
            Self::Vertical => 1,
        }
    }
}

/// Which of the three declared sizes of a component or spring.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
    Minimum,
    Preferred,
    Maximum,
}

impl Tier {
    /// All tiers in ascending order.
    pub const ALL: [Tier; 3] = [Tier::Minimum, Tier::Preferred, Tier::Maximum];
}

/// Width × height in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const ZERO: Self = Self::new(0, 0);

    /// Create a new size.
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Extent along `axis`.
    pub const fn get(self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Copy with the extent along `axis` replaced.
    pub const fn with(self, axis: Axis, value: i32) -> Self {
        match axis {
            Axis::Horizontal => Self::new(value, self.height),
            Axis::Vertical => Self::new(self.width, value),
        }
    }
}

/// Axis-aligned rectangle in the coordinate space of the containing component.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Create a new rect.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Leading coordinate along `axis`.
    pub const fn start(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Extent along `axis`.
    pub const fn extent(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Copy with the span along `axis` replaced.
    pub const fn with_span(self, axis: Axis, start: i32, extent: i32) -> Self {
        match axis {
            Axis::Horizontal => Self::new(start, self.y, extent, self.height),
            Axis::Vertical => Self::new(self.x, start, self.width, extent),
        }
    }

    /// Build a rect from a span on each axis.
    pub(crate) const fn from_spans(axis: Axis, main: (i32, i32), cross: (i32, i32)) -> Self {
        match axis {
            Axis::Horizontal => Self::new(main.0, cross.0, main.1, cross.1),
            Axis::Vertical => Self::new(cross.0, main.0, cross.1, main.1),
        }
    }
}

/// Space reserved along the edges of a container.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Insets {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl Insets {
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    pub const fn new(top: i32, left: i32, bottom: i32, right: i32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Total inset along `axis` (left + right, or top + bottom).
    pub const fn total(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.left + self.right,
            Axis::Vertical => self.top + self.bottom,
        }
    }

    /// Leading inset along `axis`.
    pub const fn leading(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.left,
            Axis::Vertical => self.top,
        }
    }
}

/// Minimum, preferred and maximum extent along one axis.
///
/// Constructors normalise so that `min <= pref <= max <= UNBOUNDED`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Extent {
    pub min: i32,
    pub pref: i32,
    pub max: i32,
}

impl Extent {
    pub const ZERO: Self = Self {
        min: 0,
        pref: 0,
        max: 0,
    };

    /// Normalised extent.
    pub fn new(min: i32, pref: i32, max: i32) -> Self {
        let min = min.min(UNBOUNDED);
        let pref = pref.min(UNBOUNDED).max(min);
        let max = max.min(UNBOUNDED).max(pref);
        Self { min, pref, max }
    }

    /// Rigid extent: `min == pref == max == length`.
    pub fn fixed(length: i32) -> Self {
        Self::new(length, length, length)
    }

    /// Whether the extent cannot grow beyond its preferred length.
    pub const fn is_fixed(&self) -> bool {
        self.max == self.pref
    }

    /// Whether all three tiers are equal.
    pub const fn is_rigid(&self) -> bool {
        self.min == self.pref && self.pref == self.max
    }

    pub const fn get(&self, tier: Tier) -> i32 {
        match tier {
            Tier::Minimum => self.min,
            Tier::Preferred => self.pref,
            Tier::Maximum => self.max,
        }
    }

    /// Copy with one tier replaced. Not normalised; callers normalise once
    /// after adjusting all tiers.
    pub(crate) const fn with_tier(self, tier: Tier, value: i32) -> Self {
        match tier {
            Tier::Minimum => Self { min: value, ..self },
            Tier::Preferred => Self { pref: value, ..self },
            Tier::Maximum => Self { max: value, ..self },
        }
    }

    pub(crate) fn normalized(self) -> Self {
        Self::new(self.min, self.pref, self.max)
    }

    /// Saturating sum of two extents laid end to end.
    pub fn stack(self, other: Self) -> Self {
        Self {
            min: saturating(self.min, other.min),
            pref: saturating(self.pref, other.pref),
            max: saturating(self.max, other.max),
        }
    }

    /// Field-wise maximum.
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.max(other.min),
            pref: self.pref.max(other.pref),
            max: self.max.max(other.max),
        }
    }

    /// Add `delta` to all three tiers.
    pub fn inset(self, delta: i32) -> Self {
        Self {
            min: saturating(self.min, delta),
            pref: saturating(self.pref, delta),
            max: saturating(self.max, delta),
        }
    }

    /// Cap `max` at twice `pref` unless the extent is already fixed.
    pub fn fix_max(self) -> Self {
        if self.is_fixed() {
            return self;
        }
        let cap = self.pref.saturating_mul(2).min(UNBOUNDED);
        Self {
            max: self.max.min(cap),
            ..self
        }
    }

    /// Pin `max` to `pref`.
    pub const fn fix(self) -> Self {
        Self {
            max: self.pref,
            ..self
        }
    }
}

/// Two-axis spring: the size requirements of a cell.
///
/// `is_gap` marks springs that come purely from spacer cells; it survives
/// composition only if every contributing spring is a gap.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Spring {
    width: Extent,
    height: Extent,
    is_gap: bool,
}

impl Default for Spring {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Spring {
    /// Zero-sized gap. The identity for stacking and enclosing.
    pub const EMPTY: Self = Self {
        width: Extent::ZERO,
        height: Extent::ZERO,
        is_gap: true,
    };

    /// Content spring from a horizontal and a vertical extent.
    pub fn new(width: Extent, height: Extent) -> Self {
        Self {
            width: width.normalized(),
            height: height.normalized(),
            is_gap: false,
        }
    }

    /// Spacer extending along `axis`, zero-sized on the other axis.
    pub fn gap(axis: Axis, extent: Extent) -> Self {
        let extent = extent.normalized();
        match axis {
            Axis::Horizontal => Self {
                width: extent,
                height: Extent::ZERO,
                is_gap: true,
            },
            Axis::Vertical => Self {
                width: Extent::ZERO,
                height: extent,
                is_gap: true,
            },
        }
    }

    /// Spring from a component's declared sizes, clamped to [`UNBOUNDED`].
    pub fn from_sizes(min: Size, pref: Size, max: Size) -> Self {
        Self::new(
            Extent::new(min.width, pref.width, max.width),
            Extent::new(min.height, pref.height, max.height),
        )
    }

    pub const fn extent(&self, axis: Axis) -> Extent {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Copy with the extent along `axis` replaced.
    pub fn with_extent(self, axis: Axis, extent: Extent) -> Self {
        let extent = extent.normalized();
        match axis {
            Axis::Horizontal => Self {
                width: extent,
                ..self
            },
            Axis::Vertical => Self {
                height: extent,
                ..self
            },
        }
    }

    pub const fn is_gap(&self) -> bool {
        self.is_gap
    }

    pub const fn min(&self, axis: Axis) -> i32 {
        self.extent(axis).min
    }

    pub const fn pref(&self, axis: Axis) -> i32 {
        self.extent(axis).pref
    }

    pub const fn max(&self, axis: Axis) -> i32 {
        self.extent(axis).max
    }

    /// The value of one tier on one axis.
    pub const fn get(&self, tier: Tier, axis: Axis) -> i32 {
        self.extent(axis).get(tier)
    }

    /// Both axes of one tier as a size.
    pub const fn size(&self, tier: Tier) -> Size {
        Size::new(self.width.get(tier), self.height.get(tier))
    }

    /// Whether `max == pref` on `axis`.
    pub const fn is_fixed(&self, axis: Axis) -> bool {
        self.extent(axis).is_fixed()
    }

    /// Lay `other` after `self` along `axis`: extents add along `axis` and
    /// take the maximum across it.
    pub fn stack(self, axis: Axis, other: Self) -> Self {
        let cross = axis.cross();
        let mut out = Self::EMPTY;
        out = out.with_raw(axis, self.extent(axis).stack(other.extent(axis)));
        out = out.with_raw(cross, self.extent(cross).union(other.extent(cross)));
        out.is_gap = self.is_gap && other.is_gap;
        out
    }

    /// Side-by-side composition.
    pub fn stack_horizontal(self, other: Self) -> Self {
        self.stack(Axis::Horizontal, other)
    }

    /// Top-to-bottom composition.
    pub fn stack_vertical(self, other: Self) -> Self {
        self.stack(Axis::Vertical, other)
    }

    /// Width from `horizontal`, height from `vertical`.
    pub fn outer_product(horizontal: Self, vertical: Self) -> Self {
        Self {
            width: horizontal.width,
            height: vertical.height,
            is_gap: horizontal.is_gap && vertical.is_gap,
        }
    }

    /// Field-wise maximum of both springs.
    pub fn enclose(self, other: Self) -> Self {
        Self {
            width: self.width.union(other.width),
            height: self.height.union(other.height),
            is_gap: self.is_gap && other.is_gap,
        }
    }

    /// Grow every width tier by `dx` and every height tier by `dy`.
    pub fn inset(self, dx: i32, dy: i32) -> Self {
        Self {
            width: self.width.inset(dx),
            height: self.height.inset(dy),
            is_gap: self.is_gap,
        }
    }

    /// Pin `max` to `pref` on `axis`.
    pub fn fix(self, axis: Axis) -> Self {
        self.with_raw(axis, self.extent(axis).fix())
    }

    /// Cap each flexible axis at twice its preferred extent.
    pub fn fix_max(self) -> Self {
        Self {
            width: self.width.fix_max(),
            height: self.height.fix_max(),
            is_gap: self.is_gap,
        }
    }

    const fn with_raw(self, axis: Axis, extent: Extent) -> Self {
        match axis {
            Axis::Horizontal => Self {
                width: extent,
                ..self
            },
            Axis::Vertical => Self {
                height: extent,
                ..self
            },
        }
    }
}

impl fmt::Display for Spring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "min[{}, {}] pref[{}, {}] max[{}, {}]",
            self.width.min,
            self.height.min,
            self.width.pref,
            self.height.pref,
            self.width.max,
            self.height.max
        )?;
        if self.is_gap {
            f.write_str(" gap")?;
        }
        Ok(())
    }
}

// ============================================================================
// Internal arithmetic
// ============================================================================

fn saturating(a: i32, b: i32) -> i32 {
    a.saturating_add(b).min(UNBOUNDED)
}

/// Round half up, as `floor(v + 0.5)`.
pub(crate) fn round_half_up(v: f64) -> i32 {
    let r = Float::floor(v + 0.5);
    if r >= UNBOUNDED as f64 {
        UNBOUNDED
    } else if r <= i32::MIN as f64 {
        i32::MIN
    } else {
        r as i32
    }
}
