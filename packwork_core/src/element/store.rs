// Copyright 2026 the Packwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays element storage with allocation, topology, and property management.

use crate::geometry::{Area, Axis, SizeRange};

use super::id::{ElementId, INVALID};
use super::mode::{ElementKind, PackMode};
use super::traverse::{Children, Descendants};

/// Per-element visibility flags.
///
/// An element is skipped by packing when either flag is set. It keeps its
/// last area while suppressed and gets a fresh one on the first pass after
/// it becomes visible again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ElementFlags {
    /// Whether the element itself is hidden.
    pub hidden: bool,
    /// Whether any ancestor is hidden. Maintained by the store.
    pub parent_hidden: bool,
}

impl ElementFlags {
    /// Returns `true` if the element is hidden itself or through an ancestor.
    #[inline]
    #[must_use]
    pub const fn is_suppressed(self) -> bool {
        self.hidden || self.parent_hidden
    }
}

/// Struct-of-arrays storage for all elements.
///
/// Elements are addressed by [`ElementId`] handles. Internally, each element
/// occupies a slot in parallel arrays. Destroyed elements are recycled via a
/// free list, and generation counters prevent stale handle access.
#[derive(Debug)]
pub struct ElementStore {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Layout inputs (set by callers) --
    pub(crate) kind: Vec<ElementKind>,
    pub(crate) pack_mode: Vec<PackMode>,
    pub(crate) w_range: Vec<SizeRange>,
    pub(crate) h_range: Vec<SizeRange>,
    pub(crate) flags: Vec<ElementFlags>,

    // -- Layout outputs (written by packing) --
    pub(crate) area: Vec<Area>,
    pub(crate) z: Vec<u32>,

    // -- Scheduling --
    pub(crate) pending: Vec<bool>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,
}

impl Default for ElementStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementStore {
    /// Creates an empty element store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            kind: Vec::new(),
            pack_mode: Vec::new(),
            w_range: Vec::new(),
            h_range: Vec::new(),
            flags: Vec::new(),
            area: Vec::new(),
            z: Vec::new(),
            pending: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    // -- Allocation API --

    /// Creates a detached ordinary element.
    ///
    /// The element starts with pack mode [`PackMode::None`], unbounded size
    /// ranges, an empty area at depth 0, and no parent.
    pub fn create_element(&mut self) -> ElementId {
        self.create(ElementKind::Element, Area::ZERO)
    }

    /// Creates a window occupying `area`.
    ///
    /// Windows are the roots that own a client area; their own area is never
    /// written by packing.
    pub fn create_window(&mut self, area: Area) -> ElementId {
        self.create(ElementKind::Window, area)
    }

    fn create(&mut self, kind: ElementKind, area: Area) -> ElementId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            let i = idx as usize;
            self.generation[i] += 1;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.kind[i] = kind;
            self.pack_mode[i] = PackMode::None;
            self.w_range[i] = SizeRange::UNBOUNDED;
            self.h_range[i] = SizeRange::UNBOUNDED;
            self.flags[i] = ElementFlags::default();
            self.area[i] = area;
            self.z[i] = 0;
            self.pending[i] = false;
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.kind.push(kind);
            self.pack_mode.push(PackMode::None);
            self.w_range.push(SizeRange::UNBOUNDED);
            self.h_range.push(SizeRange::UNBOUNDED);
            self.flags.push(ElementFlags::default());
            self.area.push(area);
            self.z.push(0);
            self.pending.push(false);
            self.generation.push(0);
            idx
        };

        ElementId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys an element, freeing its slot for reuse.
    ///
    /// Prefer [`Organizer::destroy_element`](crate::Organizer::destroy_element),
    /// which also unschedules the element and repacks its parent.
    ///
    /// # Panics
    ///
    /// Panics if the element has children, is still scheduled for packing,
    /// or if the handle is stale.
    pub fn destroy_element(&mut self, id: ElementId) {
        self.validate(id);
        let idx = id.idx as usize;
        assert!(
            self.first_child[idx] == INVALID,
            "cannot destroy element with children"
        );
        assert!(!self.pending[idx], "cannot destroy a scheduled element");

        if self.parent[idx] != INVALID {
            self.unlink_from_parent(id.idx);
        }

        // Bump generation so old handles immediately fail validation.
        self.generation[idx] += 1;
        self.free_list.push(id.idx);
    }

    /// Returns whether the given handle refers to a live element.
    #[must_use]
    pub fn is_alive(&self, id: ElementId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    /// Returns the number of live elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    /// Returns `true` if the store holds no live elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // -- Topology API --

    /// Adds `child` as the last child of `parent`.
    ///
    /// Restamps the depth of `child`'s subtree below `parent` and inherits
    /// `parent`'s hidden state.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, or if `child` already has a parent.
    pub fn add_child(&mut self, parent: ElementId, child: ElementId) {
        self.validate(parent);
        self.validate(child);
        assert!(
            self.parent[child.idx as usize] == INVALID,
            "child already has a parent"
        );
        self.link_last(parent.idx, child.idx);
        self.refresh_linked(child.idx);
    }

    /// Removes `child` from its current parent.
    ///
    /// The detached subtree is restamped from depth 0 and loses any hidden
    /// state it inherited.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the element has no parent.
    pub fn remove_from_parent(&mut self, child: ElementId) {
        self.validate(child);
        let c = child.idx;
        assert!(self.parent[c as usize] != INVALID, "element has no parent");

        self.unlink_from_parent(c);
        self.refresh_linked(c);
    }

    /// Moves `child` to be the last child of `new_parent`.
    ///
    /// If `child` already has a parent, it is removed first.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn reparent(&mut self, child: ElementId, new_parent: ElementId) {
        self.validate(child);
        self.validate(new_parent);

        if self.parent[child.idx as usize] != INVALID {
            self.unlink_from_parent(child.idx);
        }
        self.link_last(new_parent.idx, child.idx);
        self.refresh_linked(child.idx);
    }

    /// Inserts `child` before `sibling` in the sibling list.
    ///
    /// `child` must not already have a parent. `sibling` must have a parent.
    ///
    /// # Panics
    ///
    /// Panics if handles are stale, `child` already has a parent, or `sibling`
    /// has no parent.
    pub fn insert_before(&mut self, child: ElementId, sibling: ElementId) {
        self.validate(child);
        self.validate(sibling);
        let c = child.idx;
        let s = sibling.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        let p = self.parent[s as usize];
        assert!(p != INVALID, "sibling has no parent");

        self.parent[c as usize] = p;
        self.next_sibling[c as usize] = s;
        self.prev_sibling[c as usize] = self.prev_sibling[s as usize];

        if self.prev_sibling[s as usize] != INVALID {
            self.next_sibling[self.prev_sibling[s as usize] as usize] = c;
        } else {
            // `sibling` was the first child.
            self.first_child[p as usize] = c;
        }
        self.prev_sibling[s as usize] = c;

        self.refresh_linked(c);
    }

    /// Returns the parent of an element, if any.
    #[must_use]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        if p == INVALID {
            None
        } else {
            Some(ElementId {
                idx: p,
                generation: self.generation[p as usize],
            })
        }
    }

    /// Returns an iterator over the direct children of an element.
    #[must_use]
    pub fn children(&self, id: ElementId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns an iterator over `id` and everything below it, parents
    /// before their children.
    #[must_use]
    pub fn descendants(&self, id: ElementId) -> Descendants<'_> {
        self.validate(id);
        Descendants::new(self, id.idx)
    }

    /// Returns the live elements that have no parent.
    #[must_use]
    pub fn roots(&self) -> Vec<ElementId> {
        (0..self.len)
            .filter(|&idx| self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx))
            .map(|idx| ElementId {
                idx,
                generation: self.generation[idx as usize],
            })
            .collect()
    }

    // -- Property getters --

    /// Returns whether the element is a window.
    #[must_use]
    pub fn kind(&self, id: ElementId) -> ElementKind {
        self.validate(id);
        self.kind[id.idx as usize]
    }

    /// Returns the element's current area.
    #[must_use]
    pub fn area(&self, id: ElementId) -> Area {
        self.validate(id);
        self.area[id.idx as usize]
    }

    /// Returns the element's depth.
    #[must_use]
    pub fn z(&self, id: ElementId) -> u32 {
        self.validate(id);
        self.z[id.idx as usize]
    }

    /// Returns the element's pack mode.
    #[must_use]
    pub fn pack_mode(&self, id: ElementId) -> PackMode {
        self.validate(id);
        self.pack_mode[id.idx as usize]
    }

    /// Returns the element's horizontal size range.
    #[must_use]
    pub fn w_range(&self, id: ElementId) -> SizeRange {
        self.validate(id);
        self.w_range[id.idx as usize]
    }

    /// Returns the element's vertical size range.
    #[must_use]
    pub fn h_range(&self, id: ElementId) -> SizeRange {
        self.validate(id);
        self.h_range[id.idx as usize]
    }

    /// Returns the element's size range along `axis`.
    #[must_use]
    pub fn range(&self, id: ElementId, axis: Axis) -> SizeRange {
        match axis {
            Axis::Horizontal => self.w_range(id),
            Axis::Vertical => self.h_range(id),
        }
    }

    /// Returns the element's visibility flags.
    #[must_use]
    pub fn flags(&self, id: ElementId) -> ElementFlags {
        self.validate(id);
        self.flags[id.idx as usize]
    }

    /// Returns whether the element is hidden itself or through an ancestor.
    #[must_use]
    pub fn is_suppressed(&self, id: ElementId) -> bool {
        self.flags(id).is_suppressed()
    }

    /// Returns whether the element is waiting in a pack queue.
    #[must_use]
    pub fn is_pending(&self, id: ElementId) -> bool {
        self.validate(id);
        self.pending[id.idx as usize]
    }

    // -- Mutation API --
    //
    // Setters only record the new value. Callers schedule a repack through
    // the `Organizer` once they are done mutating.

    /// Moves or resizes an element directly.
    ///
    /// For packed elements the next pass of the parent overwrites this.
    /// For windows this is how the client area is resized.
    pub fn set_area(&mut self, id: ElementId, area: Area) {
        self.validate(id);
        self.area[id.idx as usize] = area;
    }

    /// Sets the element's pack mode.
    pub fn set_pack_mode(&mut self, id: ElementId, mode: PackMode) {
        self.validate(id);
        self.pack_mode[id.idx as usize] = mode;
    }

    /// Sets the element's horizontal size range.
    pub fn set_w_range(&mut self, id: ElementId, range: SizeRange) {
        self.validate(id);
        self.w_range[id.idx as usize] = range;
    }

    /// Sets the element's vertical size range.
    pub fn set_h_range(&mut self, id: ElementId, range: SizeRange) {
        self.validate(id);
        self.h_range[id.idx as usize] = range;
    }

    /// Sets the element's own hidden flag and updates the inherited flag of
    /// every descendant.
    pub fn set_hidden(&mut self, id: ElementId, hidden: bool) {
        self.validate(id);
        self.flags[id.idx as usize].hidden = hidden;
        self.refresh_descendants(id.idx);
    }

    // -- Crate-internal writers --

    pub(crate) fn set_pending(&mut self, id: ElementId, pending: bool) {
        self.validate(id);
        self.pending[id.idx as usize] = pending;
    }

    /// Writes a packing result.
    pub(crate) fn place(&mut self, id: ElementId, area: Area, z: u32) {
        self.validate(id);
        self.area[id.idx as usize] = area;
        self.z[id.idx as usize] = z;
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    fn validate(&self, id: ElementId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale ElementId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Appends `c` to the child list of `p`.
    fn link_last(&mut self, p: u32, c: u32) {
        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }
    }

    /// Removes `idx` from its parent's child list.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }

    /// Recomputes depth and inherited hidden state of `idx` from its current
    /// parent (or resets them for a root), then of its whole subtree.
    fn refresh_linked(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        if p == INVALID {
            self.z[idx as usize] = 0;
            self.flags[idx as usize].parent_hidden = false;
        } else {
            self.z[idx as usize] = self.z[p as usize] + 1;
            self.flags[idx as usize].parent_hidden = self.flags[p as usize].is_suppressed();
        }
        self.refresh_descendants(idx);
    }

    /// Propagates depth and inherited hidden state from `idx` to every
    /// descendant.
    fn refresh_descendants(&mut self, idx: u32) {
        let below: Vec<u32> = Descendants::new(self, idx)
            .skip(1)
            .map(|id| id.idx)
            .collect();
        // Pre-order: each parent is already refreshed.
        for child in below {
            let p = self.parent[child as usize] as usize;
            self.z[child as usize] = self.z[p] + 1;
            self.flags[child as usize].parent_hidden = self.flags[p].is_suppressed();
        }
    }
}
