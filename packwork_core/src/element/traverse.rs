// Copyright 2026 the Packwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Walks over the element tree.
//!
//! Child order is significant to packing: it decides the stacking order
//! inside each bucket and which element absorbs the rounding remainder.
//! Both iterators here follow the sibling links, so they report children in
//! the order they were linked (with [`insert_before`] able to reorder).
//!
//! [`insert_before`]: ElementStore::insert_before

use super::id::{ElementId, INVALID};
use super::store::ElementStore;

fn handle(store: &ElementStore, idx: u32) -> ElementId {
    ElementId {
        idx,
        generation: store.generation[idx as usize],
    }
}

/// The direct children of an element, in child order.
///
/// Created by [`ElementStore::children`].
#[derive(Debug)]
pub struct Children<'a> {
    store: &'a ElementStore,
    next: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(store: &'a ElementStore, first: u32) -> Self {
        Self { store, next: first }
    }
}

impl Iterator for Children<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        if self.next == INVALID {
            return None;
        }
        let idx = self.next;
        self.next = self.store.next_sibling[idx as usize];
        Some(handle(self.store, idx))
    }
}

/// A subtree in pre-order, starting with its root.
///
/// Every element is yielded before its children, so a walk can derive
/// per-element state from the parent it has already visited. The walk
/// follows parent links back up instead of keeping a stack.
///
/// Created by [`ElementStore::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    store: &'a ElementStore,
    root: u32,
    next: u32,
}

impl<'a> Descendants<'a> {
    pub(crate) fn new(store: &'a ElementStore, root: u32) -> Self {
        Self {
            store,
            root,
            next: root,
        }
    }

    fn successor(&self, mut idx: u32) -> u32 {
        let first = self.store.first_child[idx as usize];
        if first != INVALID {
            return first;
        }
        // Never step past the root onto its siblings.
        while idx != self.root {
            let sibling = self.store.next_sibling[idx as usize];
            if sibling != INVALID {
                return sibling;
            }
            idx = self.store.parent[idx as usize];
        }
        INVALID
    }
}

impl Iterator for Descendants<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        if self.next == INVALID {
            return None;
        }
        let idx = self.next;
        self.next = self.successor(idx);
        Some(handle(self.store, idx))
    }
}
