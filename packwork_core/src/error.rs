// Copyright 2026 the Packwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Packing errors.

use thiserror::Error;

use crate::element::ElementId;
use crate::geometry::Axis;

/// Broad category of a [`PackError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The element tree is configured in a way the engine cannot lay out.
    Configuration,
    /// Constraints cannot be satisfied in the available space.
    Invariant,
    /// A scheduling request broke the configured duplicate policy.
    Scheduling,
}

/// Errors raised while scheduling or packing elements.
///
/// Errors abort the current pass and surface from
/// [`Organizer::pack_items`](crate::Organizer::pack_items) unchanged. Areas
/// written before the failure are kept.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PackError {
    /// A pack mode name did not match any known mode.
    #[error("unsupported pack mode `{name}`")]
    UnsupportedPackMode {
        /// The rejected name.
        name: String,
    },

    /// More than one visible child of `parent` has the `main` pack mode.
    #[error("{parent:?} has more than one `main` child ({first:?} and {second:?})")]
    AmbiguousMain {
        /// The parent being packed.
        parent: ElementId,
        /// The first `main` child in child order.
        first: ElementId,
        /// The second `main` child in child order.
        second: ElementId,
    },

    /// The children of `parent` need more space than is available.
    #[error(
        "children of {parent:?} need {required}px on the {axis} axis but only {available}px are available"
    )]
    Overcommitted {
        /// The parent being packed.
        parent: ElementId,
        /// Axis of the failing pass.
        axis: Axis,
        /// Pixels required by the computed allocation.
        required: u64,
        /// Pixels available along `axis`.
        available: u32,
    },

    /// An element was allocated less than its minimum length.
    #[error("{element:?} got {allocated}px on the {axis} axis, below its minimum of {minimum}px")]
    BelowMinimum {
        /// The undersized element.
        element: ElementId,
        /// Axis of the failing pass.
        axis: Axis,
        /// Length the pass allocated.
        allocated: u32,
        /// The element's minimum length.
        minimum: u32,
    },

    /// The element that absorbs the rounding remainder of a pass would
    /// exceed its maximum length.
    #[error("{element:?} would get {allocated}px on the {axis} axis, above its maximum of {maximum}px")]
    AboveMaximum {
        /// The oversized element.
        element: ElementId,
        /// Axis of the failing pass.
        axis: Axis,
        /// Length the pass would allocate.
        allocated: u32,
        /// The element's maximum length.
        maximum: u32,
    },

    /// The element is already pending.
    #[error("{element:?} is already scheduled for packing")]
    DuplicateSchedule {
        /// The element that was scheduled twice.
        element: ElementId,
    },
}

impl PackError {
    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedPackMode { .. } | Self::AmbiguousMain { .. } => {
                ErrorKind::Configuration
            }
            Self::Overcommitted { .. } | Self::BelowMinimum { .. } | Self::AboveMaximum { .. } => {
                ErrorKind::Invariant
            }
            Self::DuplicateSchedule { .. } => ErrorKind::Scheduling,
        }
    }
}
