//! Alignment policies for sequences, grid cells and card contents.

use core::str::FromStr;

use crate::error::CellError;
use crate::spring::Axis;

/// How a cell, or the children of a sequence, sit within spare space.
///
/// The same value serves both axes: [`Alignment::Start`] is left on the
/// horizontal axis and top on the vertical one.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// No alignment: children fill from the start and stretch.
    #[default]
    None,
    /// Left or top.
    Start,
    /// Centered.
    Center,
    /// Right or bottom.
    End,
    /// Spare space spread between children (main axis only).
    Justified,
    /// Text baselines lined up (vertical axis of a row only).
    Baseline,
}

impl Alignment {
    pub const LEFT: Self = Self::Start;
    pub const TOP: Self = Self::Start;
    pub const RIGHT: Self = Self::End;
    pub const BOTTOM: Self = Self::End;

    /// Map a numeric alignment code.
    ///
    /// `0` none, `1` left/top, `2` center, `3` right/bottom, `4` justified,
    /// `5` baseline. Any other value maps to [`Alignment::None`].
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::None,
            1 => Self::Start,
            2 => Self::Center,
            3 => Self::End,
            4 => Self::Justified,
            5 => Self::Baseline,
            other => {
                tracing::warn!(code = other, "invalid alignment code, using none");
                Self::None
            }
        }
    }

    /// Numeric code, the inverse of [`from_code`](Self::from_code).
    pub const fn code(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Start => 1,
            Self::Center => 2,
            Self::End => 3,
            Self::Justified => 4,
            Self::Baseline => 5,
        }
    }

    /// Restrict to what a sequence supports along its main axis.
    pub(crate) fn for_main_axis(self) -> Self {
        match self {
            Self::Baseline => Self::None,
            other => other,
        }
    }

    /// Restrict to what a sequence supports across `cross`. Baseline is
    /// meaningful only when the cross axis is vertical.
    pub(crate) fn for_cross_axis(self, cross: Axis) -> Self {
        match (self, cross) {
            (Self::Justified, _) => Self::None,
            (Self::Baseline, Axis::Horizontal) => Self::None,
            (other, _) => other,
        }
    }

    /// Offset of an item of `size` inside a band of `band`.
    pub(crate) fn offset(self, band: i32, size: i32) -> i32 {
        match self {
            Self::Center => (band - size) / 2,
            Self::End => band - size,
            _ => 0,
        }
    }
}

impl FromStr for Alignment {
    type Err = CellError;

    /// Parse a name such as `"left"`, `"center"` or `"baseline"`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parsed = [
            ("none", Self::None),
            ("left", Self::Start),
            ("top", Self::Start),
            ("start", Self::Start),
            ("center", Self::Center),
            ("centre", Self::Center),
            ("right", Self::End),
            ("bottom", Self::End),
            ("end", Self::End),
            ("justified", Self::Justified),
            ("justify", Self::Justified),
            ("baseline", Self::Baseline),
        ]
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(s))
        .map(|(_, align)| align);
        parsed.ok_or(CellError::UnknownAlignment)
    }
}
