// Copyright 2026 the Packwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pack modes and element kinds.

use core::fmt;
use core::str::FromStr;

use crate::error::PackError;

/// How an element anchors inside its parent.
///
/// `Top`, `Main` and `Bottom` share the vertical pass; `Left`, `Main` and
/// `Right` share the horizontal pass, inside the height left over by the
/// vertical one. At most one visible child per parent may be `Main`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PackMode {
    /// Not laid out at all. The element keeps whatever area it was given.
    #[default]
    None,
    /// Covers the parent's whole area, ignoring every other sibling.
    Fill,
    /// Stacked downward from the parent's top edge.
    Top,
    /// Stacked upward from the parent's bottom edge.
    Bottom,
    /// Stacked rightward from the parent's left edge.
    Left,
    /// Stacked leftward from the parent's right edge.
    Right,
    /// The single flexible slot between the anchored siblings.
    Main,
}

impl PackMode {
    /// Every mode, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::None,
        Self::Fill,
        Self::Top,
        Self::Bottom,
        Self::Left,
        Self::Right,
        Self::Main,
    ];

    /// Returns the lowercase name of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Fill => "fill",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
            Self::Main => "main",
        }
    }
}

impl fmt::Display for PackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackMode {
    type Err = PackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| PackError::UnsupportedPackMode { name: s.into() })
    }
}

/// Whether an element is a top-level window or an ordinary element.
///
/// Windows are always repacked in full when scheduled, and each of their
/// children is repacked in turn whether or not it moved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A root container owned by the windowing system.
    Window,
    /// Any other element.
    #[default]
    Element,
}
