// Copyright 2026 the Packwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer pixel geometry for packed elements.
//!
//! Packing works entirely in whole pixels. [`Area`] is the rectangle an
//! element occupies inside its window, and [`SizeRange`] bounds the length an
//! element may receive along one axis. Conversion to [`kurbo::Rect`] is
//! provided for renderers that invalidate in floating-point space.

use core::fmt;

/// An axis of distribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Left to right (`w`, `x`).
    Horizontal,
    /// Top to bottom (`h`, `y`).
    Vertical,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        })
    }
}

/// A rectangle in integer pixels.
///
/// `x`/`y` are signed so elements can be positioned partly outside their
/// window; `w`/`h` are never negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Area {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

impl Area {
    /// The empty area at the origin.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Creates an area from its origin and size.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Returns the right edge (`x + w`), saturating.
    #[inline]
    #[must_use]
    pub const fn right(self) -> i32 {
        self.x.saturating_add_unsigned(self.w)
    }

    /// Returns the bottom edge (`y + h`), saturating.
    #[inline]
    #[must_use]
    pub const fn bottom(self) -> i32 {
        self.y.saturating_add_unsigned(self.h)
    }

    /// Returns the length along `axis`.
    #[inline]
    #[must_use]
    pub const fn length(self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.w,
            Axis::Vertical => self.h,
        }
    }

    /// Returns the leading edge along `axis`.
    #[inline]
    #[must_use]
    pub const fn start(self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Returns a copy with the span along `axis` replaced. The cross axis is
    /// kept.
    #[inline]
    #[must_use]
    pub const fn with_span(self, axis: Axis, start: i32, length: u32) -> Self {
        match axis {
            Axis::Horizontal => Self::new(start, self.y, length, self.h),
            Axis::Vertical => Self::new(self.x, start, self.w, length),
        }
    }

    /// Returns `true` if the area covers no pixels.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Converts to a [`kurbo::Rect`].
    #[must_use]
    pub fn to_rect(self) -> kurbo::Rect {
        kurbo::Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.right()),
            f64::from(self.bottom()),
        )
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{} {}x{})", self.x, self.y, self.w, self.h)
    }
}

/// Minimum and maximum length of an element along one axis.
///
/// A maximum of [`u32::MAX`] is treated as unbounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SizeRange {
    /// Smallest acceptable length.
    pub min: u32,
    /// Largest useful length.
    pub max: u32,
}

impl SizeRange {
    /// No minimum, no maximum.
    pub const UNBOUNDED: Self = Self { min: 0, max: u32::MAX };

    /// Creates a range.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        assert!(min <= max, "SizeRange min exceeds max");
        Self { min, max }
    }

    /// A range that accepts anything up to `max`.
    #[inline]
    #[must_use]
    pub const fn at_most(max: u32) -> Self {
        Self { min: 0, max }
    }

    /// A range that accepts exactly `len`.
    #[inline]
    #[must_use]
    pub const fn exact(len: u32) -> Self {
        Self { min: len, max: len }
    }

    /// Returns `true` if `len` lies within the range.
    #[inline]
    #[must_use]
    pub const fn contains(self, len: u32) -> bool {
        self.min <= len && len <= self.max
    }
}

impl Default for SizeRange {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}
