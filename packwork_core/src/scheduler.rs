// Copyright 2026 the Packwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pending-work queues.
//!
//! The [`Scheduler`] keeps two deduplicated queues: one for windows, which
//! are always repacked in full, and one for ordinary elements, which are
//! repacked shallowest-first. Both are [`IndexSet`]s, so membership checks
//! are O(1) and insertion order survives until the queue is drained.
//!
//! Duplicates are detected through the element's pending flag rather than
//! queue membership. An element stays pending from the moment it is queued
//! until its pass has packed it, so re-scheduling it while a drained list is
//! being processed does not queue it a second time.
//!
//! A queue is drained by swapping it out for an empty one. Anything else
//! scheduled while the drained list is being processed lands in the fresh
//! queue and waits for the next drain.

use indexmap::IndexSet;

use crate::element::{ElementId, ElementKind, ElementStore};
use crate::error::PackError;

/// What to do when an element that is already pending is scheduled again.
///
/// Passed to the [`Scheduler`] via
/// [`OrganizerConfig::duplicate_policy`](crate::OrganizerConfig::duplicate_policy).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DuplicatePolicy {
    /// Keep the existing entry and report success.
    #[default]
    Ignore,
    /// Fail with [`PackError::DuplicateSchedule`].
    Reject,
}

/// Two deduplicated queues of elements waiting to be packed.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    windows: IndexSet<ElementId>,
    elements: IndexSet<ElementId>,
}

impl Scheduler {
    /// Creates a scheduler with both queues empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `id` and marks it pending.
    ///
    /// Windows go to the window queue, everything else to the element queue.
    /// Returns `true` if the element was newly queued and `false` if it was
    /// already pending and `policy` is [`DuplicatePolicy::Ignore`]. An
    /// element is pending while it waits in a queue and while a running pass
    /// holds it in a drained list.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::DuplicateSchedule`] if the element is already
    /// pending and `policy` is [`DuplicatePolicy::Reject`].
    pub fn schedule(
        &mut self,
        store: &mut ElementStore,
        id: ElementId,
        policy: DuplicatePolicy,
    ) -> Result<bool, PackError> {
        if store.is_pending(id) {
            return match policy {
                DuplicatePolicy::Ignore => {
                    tracing::trace!(element = ?id, "already scheduled");
                    Ok(false)
                }
                DuplicatePolicy::Reject => Err(PackError::DuplicateSchedule { element: id }),
            };
        }
        let queue = match store.kind(id) {
            ElementKind::Window => &mut self.windows,
            ElementKind::Element => &mut self.elements,
        };
        queue.insert(id);
        store.set_pending(id, true);
        tracing::trace!(element = ?id, "scheduled");
        Ok(true)
    }

    /// Removes `id` from whichever queue holds it and clears its pending
    /// flag. Returns `false` if it was not queued.
    pub fn unschedule(&mut self, store: &mut ElementStore, id: ElementId) -> bool {
        let removed = self.windows.shift_remove(&id) || self.elements.shift_remove(&id);
        if removed {
            store.set_pending(id, false);
        }
        removed
    }

    /// Returns whether `id` is waiting in either queue.
    #[must_use]
    pub fn is_scheduled(&self, id: ElementId) -> bool {
        self.windows.contains(&id) || self.elements.contains(&id)
    }

    /// Number of windows waiting.
    #[must_use]
    pub fn pending_windows(&self) -> usize {
        self.windows.len()
    }

    /// Number of ordinary elements waiting.
    #[must_use]
    pub fn pending_elements(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if both queues are empty.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.windows.is_empty() && self.elements.is_empty()
    }

    /// Swaps out the window queue, keeping scheduling order.
    pub(crate) fn take_windows(&mut self, store: &ElementStore) -> Vec<ElementId> {
        live(store, core::mem::take(&mut self.windows))
    }

    /// Swaps out the element queue, stable-sorted by ascending depth.
    pub(crate) fn take_elements(&mut self, store: &ElementStore) -> Vec<ElementId> {
        let mut items = live(store, core::mem::take(&mut self.elements));
        items.sort_by_key(|&id| store.z(id));
        items
    }

    /// Puts drained but unprocessed items back in front of their queue.
    ///
    /// Their pending flag is still set, so nothing is touched in the store.
    pub(crate) fn requeue(&mut self, store: &ElementStore, items: &[ElementId]) {
        let mut front = [0_usize; 2];
        for &id in items.iter().filter(|&&id| store.is_alive(id)) {
            let (queue, slot) = match store.kind(id) {
                ElementKind::Window => (&mut self.windows, 0),
                ElementKind::Element => (&mut self.elements, 1),
            };
            let (index, _) = queue.insert_full(id);
            queue.move_index(index, front[slot]);
            front[slot] += 1;
        }
    }
}

/// Drops handles whose element was destroyed while queued.
fn live(store: &ElementStore, queue: IndexSet<ElementId>) -> Vec<ElementId> {
    queue
        .into_iter()
        .filter(|&id| {
            let alive = store.is_alive(id);
            if !alive {
                tracing::warn!(element = ?id, "skipping stale handle in pack queue");
            }
            alive
        })
        .collect()
}
