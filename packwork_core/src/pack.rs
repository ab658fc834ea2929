// Copyright 2026 the Packwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Distribution of a parent's area over its children, and propagation of the
//! resulting area changes down the tree.
//!
//! Children are split into buckets by [`PackMode`]. `fill` children take the
//! parent's whole area. `top`, `main`, and `bottom` share the parent's height;
//! `left`, `main`, and `right` then share its width inside the band left over
//! between the top and bottom stacks. `main` is the one element that takes
//! part in both passes.
//!
//! ```text
//! +-----------------------------+
//! |            top              |
//! +------+-------------+--------+
//! | left |    main     | right  |
//! +------+-------------+--------+
//! |           bottom            |
//! +-----------------------------+
//! ```

use crate::distribute::{DistributeError, distribute};
use crate::element::{ElementId, ElementKind, PackMode};
use crate::error::PackError;
use crate::geometry::{Area, Axis, SizeRange};
use crate::observer::AreaObserver;
use crate::organizer::Organizer;
use crate::trace::{PackChildrenEvent, Tracer};
#[cfg(feature = "trace-rich")]
use crate::trace::{AreaChangeEvent, AxisEvent};

/// One element whose area was changed by a pack pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AreaChange {
    /// The element that moved or resized.
    pub element: ElementId,
    /// Area before the pass.
    pub old: Area,
    /// Area after the pass.
    pub new: Area,
}

/// Result of a pack pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PackReport {
    /// Queue items that were repacked, in processing order.
    pub packed: Vec<ElementId>,
    /// Area changes, parents before their descendants.
    pub area_changes: Vec<AreaChange>,
    /// Items scheduled during the pass, waiting for the next one.
    pub deferred: usize,
}

impl PackReport {
    /// Clears all lists.
    pub fn clear(&mut self) {
        self.packed.clear();
        self.area_changes.clear();
        self.deferred = 0;
    }

    /// Returns `true` if nothing was packed and nothing was deferred.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packed.is_empty() && self.area_changes.is_empty() && self.deferred == 0
    }

    /// Returns the change recorded for `element`, if it moved.
    #[must_use]
    pub fn change_of(&self, element: ElementId) -> Option<&AreaChange> {
        self.area_changes.iter().find(|c| c.element == element)
    }

    /// Returns the union of the old and new areas of every changed element,
    /// or `None` if nothing visible moved.
    #[must_use]
    pub fn damage(&self) -> Option<kurbo::Rect> {
        self.area_changes
            .iter()
            .flat_map(|c| [c.old, c.new])
            .filter(|a| !a.is_empty())
            .map(Area::to_rect)
            .reduce(|acc, r| acc.union(r))
    }
}

/// State threaded through one pass.
pub(crate) struct Pass<'p, 't, O: ?Sized> {
    pub(crate) index: u64,
    pub(crate) observer: &'p mut O,
    pub(crate) tracer: &'p mut Tracer<'t>,
    pub(crate) report: &'p mut PackReport,
    pub(crate) parents_packed: usize,
}

/// Children of one parent, split by pack mode, in child order.
#[derive(Debug, Default)]
struct Buckets {
    fill: Vec<ElementId>,
    top: Vec<ElementId>,
    bottom: Vec<ElementId>,
    left: Vec<ElementId>,
    right: Vec<ElementId>,
    main: Option<ElementId>,
}

impl Buckets {
    fn has_vertical(&self) -> bool {
        !self.top.is_empty() || self.main.is_some() || !self.bottom.is_empty()
    }

    fn has_horizontal(&self) -> bool {
        !self.left.is_empty() || self.main.is_some() || !self.right.is_empty()
    }
}

impl Organizer {
    /// Distributes `parent`'s area over `children` and propagates the changes.
    ///
    /// `children` is normally the parent's current child list. Hidden
    /// children and children with [`PackMode::None`] are skipped and keep
    /// their area. If `parent` is a window, every distributed child is
    /// repacked whether or not it moved; below that, and for ordinary
    /// parents, only children whose area changed are descended into.
    ///
    /// This bypasses the queues. Use it for one-off layout of a detached
    /// subtree; regular frame work goes through [`pack_items`](Self::pack_items).
    ///
    /// # Errors
    ///
    /// Returns [`PackError::AmbiguousMain`] if more than one visible child is
    /// `main`, and [`PackError::Overcommitted`], [`PackError::AboveMaximum`],
    /// or [`PackError::BelowMinimum`] if the constraints of some parent in the
    /// subtree cannot be met.
    pub fn pack_children<O: AreaObserver + ?Sized>(
        &mut self,
        parent: ElementId,
        children: &[ElementId],
        observer: &mut O,
    ) -> Result<PackReport, PackError> {
        let mut report = PackReport::default();
        let mut tracer = Tracer::none();
        let force = self.elements.kind(parent) == ElementKind::Window;
        let mut pass = Pass {
            index: self.pass_index(),
            observer,
            tracer: &mut tracer,
            report: &mut report,
            parents_packed: 0,
        };
        self.pack_parent(parent, children, force, &mut pass)?;
        report.packed.push(parent);
        Ok(report)
    }

    /// Packs `children` into `parent` and recurses.
    ///
    /// With `force` set, every distributed child is descended into. Deeper
    /// levels only descend into children that moved.
    pub(crate) fn pack_parent<O: AreaObserver + ?Sized>(
        &mut self,
        parent: ElementId,
        children: &[ElementId],
        force: bool,
        pass: &mut Pass<'_, '_, O>,
    ) -> Result<(), PackError> {
        if children.is_empty() {
            return Ok(());
        }
        let area = self.elements.area(parent);
        let z = self.elements.z(parent).saturating_add(1);

        let mut buckets = Buckets::default();
        let mut distributed = Vec::with_capacity(children.len());
        for &child in children {
            if self.elements.is_suppressed(child) {
                continue;
            }
            match self.elements.pack_mode(child) {
                PackMode::None => continue,
                PackMode::Fill => buckets.fill.push(child),
                PackMode::Top => buckets.top.push(child),
                PackMode::Bottom => buckets.bottom.push(child),
                PackMode::Left => buckets.left.push(child),
                PackMode::Right => buckets.right.push(child),
                PackMode::Main => {
                    if let Some(first) = buckets.main {
                        return Err(PackError::AmbiguousMain {
                            parent,
                            first,
                            second: child,
                        });
                    }
                    buckets.main = Some(child);
                }
            }
            distributed.push((child, self.elements.area(child)));
        }

        for &child in &buckets.fill {
            self.elements.place(child, area, z);
        }

        let (top_height, bottom_height) = if buckets.has_vertical() {
            self.pack_axis(
                parent,
                Axis::Vertical,
                area,
                z,
                (buckets.top.as_slice(), buckets.main, buckets.bottom.as_slice()),
                pass,
            )?
        } else {
            (0, 0)
        };

        if buckets.has_horizontal() {
            let band = Area::new(
                area.x,
                area.y.saturating_add_unsigned(top_height),
                area.w,
                area.h.saturating_sub(top_height.saturating_add(bottom_height)),
            );
            self.pack_axis(
                parent,
                Axis::Horizontal,
                band,
                z,
                (buckets.left.as_slice(), buckets.main, buckets.right.as_slice()),
                pass,
            )?;
        }

        pass.parents_packed += 1;
        tracing::trace!(
            parent = ?parent,
            distributed = distributed.len(),
            forced = force,
            "packed children"
        );
        pass.tracer.pack_children(&PackChildrenEvent {
            pass_index: pass.index,
            parent: parent.index(),
            distributed: distributed.len(),
            forced: force,
        });

        for (child, old) in distributed {
            // The observer may have destroyed it while handling a sibling.
            if !self.elements.is_alive(child) {
                continue;
            }
            let new = self.elements.area(child);
            let changed = new != old;
            if changed {
                pass.report.area_changes.push(AreaChange {
                    element: child,
                    old,
                    new,
                });
                #[cfg(feature = "trace-rich")]
                pass.tracer.area_change(&AreaChangeEvent {
                    pass_index: pass.index,
                    element: child.index(),
                    old,
                    new,
                });
            }
            if changed || force {
                let grandchildren: Vec<ElementId> = self.elements.children(child).collect();
                self.pack_parent(child, &grandchildren, false, pass)?;
            }
            if changed && self.elements.is_alive(child) {
                pass.observer.area_changed(self, child, old);
            }
        }
        Ok(())
    }

    /// Distributes `frame` along `axis` over a leading stack, an optional
    /// main element, and a trailing stack.
    ///
    /// Leading elements stack from the start edge, trailing elements from
    /// the end edge, and main sits right after the leading stack. Stacked
    /// elements take the frame's cross-axis span; main keeps its own.
    /// Returns the lengths of the leading and trailing stacks.
    fn pack_axis<O: AreaObserver + ?Sized>(
        &mut self,
        parent: ElementId,
        axis: Axis,
        frame: Area,
        z: u32,
        (leading, main, trailing): (&[ElementId], Option<ElementId>, &[ElementId]),
        pass: &mut Pass<'_, '_, O>,
    ) -> Result<(u32, u32), PackError> {
        let order: Vec<ElementId> = leading
            .iter()
            .copied()
            .chain(main)
            .chain(trailing.iter().copied())
            .collect();
        let ranges: Vec<SizeRange> = order
            .iter()
            .map(|&id| self.elements.range(id, axis))
            .collect();
        let available = frame.length(axis);

        let dist = distribute(available, &ranges).map_err(|e| match e {
            DistributeError::Overcommitted { required } => PackError::Overcommitted {
                parent,
                axis,
                required,
                available,
            },
            DistributeError::AboveMaximum {
                index,
                allocated,
                maximum,
            } => PackError::AboveMaximum {
                element: order[index],
                axis,
                allocated,
                maximum,
            },
        })?;
        for ((&element, range), &allocated) in order.iter().zip(&ranges).zip(&dist.lengths) {
            if allocated < range.min {
                return Err(PackError::BelowMinimum {
                    element,
                    axis,
                    allocated,
                    minimum: range.min,
                });
            }
        }

        #[cfg(feature = "trace-rich")]
        pass.tracer.axis(&AxisEvent {
            pass_index: pass.index,
            parent: parent.index(),
            axis,
            available,
            share: dist.share,
            extra: dist.extra,
            small: dist.small_count(),
            count: order.len(),
        });
        #[cfg(not(feature = "trace-rich"))]
        {
            _ = &pass;
        }

        let start = frame.start(axis);
        let end = start.saturating_add_unsigned(available);
        let (leading_lengths, mut rest) = dist.lengths.split_at(leading.len());

        let mut offset = 0_u32;
        for (&id, &len) in leading.iter().zip(leading_lengths) {
            let placed = frame.with_span(axis, start.saturating_add_unsigned(offset), len);
            self.elements.place(id, placed, z);
            offset = offset.saturating_add(len);
        }

        if let Some(id) = main
            && let Some((&len, tail)) = rest.split_first()
        {
            let placed = self.elements.area(id).with_span(
                axis,
                start.saturating_add_unsigned(offset),
                len,
            );
            self.elements.place(id, placed, z);
            rest = tail;
        }

        let mut from_end = 0_u32;
        for (&id, &len) in trailing.iter().zip(rest) {
            from_end = from_end.saturating_add(len);
            let placed = frame.with_span(axis, end.saturating_sub_unsigned(from_end), len);
            self.elements.place(id, placed, z);
        }

        Ok((offset, from_end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;

    fn window(org: &mut Organizer, w: u32, h: u32) -> ElementId {
        org.elements_mut().create_window(Area::new(0, 0, w, h))
    }

    fn child(org: &mut Organizer, parent: ElementId, mode: PackMode) -> ElementId {
        let store = org.elements_mut();
        let id = store.create_element();
        store.set_pack_mode(id, mode);
        store.add_child(parent, id);
        id
    }

    fn children(org: &Organizer, parent: ElementId) -> Vec<ElementId> {
        org.elements().children(parent).collect()
    }

    fn pack(org: &mut Organizer, parent: ElementId) -> Result<PackReport, PackError> {
        let kids = children(org, parent);
        org.pack_children(parent, &kids, &mut NoopObserver)
    }

    #[test]
    fn tops_split_height_evenly() {
        let mut org = Organizer::default();
        let win = window(&mut org, 100, 100);
        let a = child(&mut org, win, PackMode::Top);
        let b = child(&mut org, win, PackMode::Top);
        org.elements_mut().set_h_range(a, SizeRange::at_most(1000));
        org.elements_mut().set_h_range(b, SizeRange::at_most(1000));

        pack(&mut org, win).unwrap();
        assert_eq!(org.elements().area(a), Area::new(0, 0, 100, 50));
        assert_eq!(org.elements().area(b), Area::new(0, 50, 100, 50));
        assert_eq!(org.elements().z(a), 1);
    }

    #[test]
    fn capped_top_leaves_space_to_sibling() {
        let mut org = Organizer::default();
        let win = window(&mut org, 100, 100);
        let a = child(&mut org, win, PackMode::Top);
        let b = child(&mut org, win, PackMode::Top);
        org.elements_mut().set_h_range(a, SizeRange::at_most(10));
        org.elements_mut().set_h_range(b, SizeRange::at_most(1000));

        pack(&mut org, win).unwrap();
        assert_eq!(org.elements().area(a).h, 10);
        assert_eq!(org.elements().area(b), Area::new(0, 10, 100, 90));
    }

    #[test]
    fn left_main_right_remainder_goes_left() {
        let mut org = Organizer::default();
        let win = window(&mut org, 100, 40);
        let l = child(&mut org, win, PackMode::Left);
        let m = child(&mut org, win, PackMode::Main);
        let r = child(&mut org, win, PackMode::Right);
        org.elements_mut().set_w_range(l, SizeRange::at_most(1000));
        org.elements_mut().set_w_range(r, SizeRange::at_most(1000));

        pack(&mut org, win).unwrap();
        let store = org.elements();
        assert_eq!(store.area(l), Area::new(0, 0, 34, 40));
        assert_eq!(store.area(m), Area::new(34, 0, 33, 40));
        assert_eq!(store.area(r), Area::new(67, 0, 33, 40));
    }

    #[test]
    fn bottoms_stack_up_from_the_end_edge() {
        let mut org = Organizer::default();
        let win = window(&mut org, 50, 90);
        let top = child(&mut org, win, PackMode::Top);
        let b1 = child(&mut org, win, PackMode::Bottom);
        let b2 = child(&mut org, win, PackMode::Bottom);

        pack(&mut org, win).unwrap();
        let store = org.elements();
        assert_eq!(store.area(top), Area::new(0, 0, 50, 30));
        assert_eq!(store.area(b1), Area::new(0, 60, 50, 30));
        assert_eq!(store.area(b2), Area::new(0, 30, 50, 30));
    }

    #[test]
    fn horizontal_pass_uses_band_between_stacks() {
        let mut org = Organizer::default();
        let win = window(&mut org, 100, 100);
        let top = child(&mut org, win, PackMode::Top);
        let left = child(&mut org, win, PackMode::Left);
        let main = child(&mut org, win, PackMode::Main);
        let right = child(&mut org, win, PackMode::Right);
        org.elements_mut().set_h_range(top, SizeRange::at_most(20));

        pack(&mut org, win).unwrap();
        let store = org.elements();
        assert_eq!(store.area(top), Area::new(0, 0, 100, 20));
        assert_eq!(store.area(left), Area::new(0, 20, 34, 80));
        assert_eq!(store.area(main), Area::new(34, 20, 33, 80));
        assert_eq!(store.area(right), Area::new(67, 20, 33, 80));
    }

    #[test]
    fn fill_takes_parent_area() {
        let mut org = Organizer::default();
        let win = window(&mut org, 100, 100);
        let panel = child(&mut org, win, PackMode::Fill);
        org.elements_mut().set_area(panel, Area::new(5, 5, 10, 10));
        let top = child(&mut org, win, PackMode::Top);
        let inner = child(&mut org, panel, PackMode::Fill);

        pack(&mut org, win).unwrap();
        let store = org.elements();
        assert_eq!(store.area(panel), Area::new(0, 0, 100, 100));
        assert_eq!(store.area(top), Area::new(0, 0, 100, 100));
        assert_eq!(store.area(inner), Area::new(0, 0, 100, 100));
        assert_eq!(store.z(inner), 2);
    }

    #[test]
    fn hidden_and_unpacked_children_keep_their_area() {
        let mut org = Organizer::default();
        let win = window(&mut org, 100, 100);
        let shown = child(&mut org, win, PackMode::Top);
        let hidden = child(&mut org, win, PackMode::Top);
        let unpacked = child(&mut org, win, PackMode::None);
        let parked = Area::new(7, 7, 7, 7);
        org.elements_mut().set_area(hidden, parked);
        org.elements_mut().set_area(unpacked, parked);
        org.elements_mut().set_hidden(hidden, true);

        let report = pack(&mut org, win).unwrap();
        let store = org.elements();
        assert_eq!(store.area(shown), Area::new(0, 0, 100, 100));
        assert_eq!(store.area(hidden), parked);
        assert_eq!(store.area(unpacked), parked);
        assert!(report.change_of(hidden).is_none());
    }

    #[test]
    fn second_main_is_rejected() {
        let mut org = Organizer::default();
        let win = window(&mut org, 100, 100);
        let first = child(&mut org, win, PackMode::Main);
        let second = child(&mut org, win, PackMode::Main);

        let err = pack(&mut org, win).unwrap_err();
        assert_eq!(
            err,
            PackError::AmbiguousMain {
                parent: win,
                first,
                second,
            }
        );
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
    }

    #[test]
    fn hidden_second_main_is_fine() {
        let mut org = Organizer::default();
        let win = window(&mut org, 100, 100);
        child(&mut org, win, PackMode::Main);
        let second = child(&mut org, win, PackMode::Main);
        org.elements_mut().set_hidden(second, true);

        assert!(pack(&mut org, win).is_ok());
    }

    #[test]
    fn shortfall_below_minimum_fails() {
        let mut org = Organizer::default();
        let win = window(&mut org, 100, 100);
        let greedy = child(&mut org, win, PackMode::Top);
        child(&mut org, win, PackMode::Top);
        org.elements_mut()
            .set_h_range(greedy, SizeRange::new(60, u32::MAX));

        let err = pack(&mut org, win).unwrap_err();
        assert_eq!(
            err,
            PackError::BelowMinimum {
                element: greedy,
                axis: Axis::Vertical,
                allocated: 50,
                minimum: 60,
            }
        );
    }

    #[test]
    fn remainder_past_maximum_fails() {
        let mut org = Organizer::default();
        let win = window(&mut org, 100, 100);
        let first = child(&mut org, win, PackMode::Top);
        let second = child(&mut org, win, PackMode::Top);
        let third = child(&mut org, win, PackMode::Top);
        for id in [first, second, third] {
            org.elements_mut().set_h_range(id, SizeRange::at_most(33));
        }

        let err = pack(&mut org, win).unwrap_err();
        assert_eq!(
            err,
            PackError::AboveMaximum {
                element: first,
                axis: Axis::Vertical,
                allocated: 34,
                maximum: 33,
            }
        );
        assert_eq!(err.kind(), crate::ErrorKind::Invariant);
    }

    #[test]
    fn repacking_is_idempotent() {
        let mut org = Organizer::default();
        let win = window(&mut org, 120, 80);
        let top = child(&mut org, win, PackMode::Top);
        child(&mut org, win, PackMode::Main);
        child(&mut org, win, PackMode::Right);
        child(&mut org, top, PackMode::Left);
        child(&mut org, top, PackMode::Left);

        let first = pack(&mut org, win).unwrap();
        assert!(!first.area_changes.is_empty());
        let second = pack(&mut org, win).unwrap();
        assert!(second.area_changes.is_empty());
    }

    #[test]
    fn observer_sees_old_area_after_subtree() {
        let mut org = Organizer::default();
        let win = window(&mut org, 100, 100);
        let panel = child(&mut org, win, PackMode::Fill);
        let inner = child(&mut org, panel, PackMode::Top);

        let mut seen = Vec::new();
        let kids = children(&org, win);
        org.pack_children(
            win,
            &kids,
            &mut |org: &mut Organizer, id: ElementId, old: Area| {
                seen.push((id, old, org.elements().area(id)));
            },
        )
        .unwrap();

        // Inner is notified first: the panel's notification follows its
        // subtree.
        assert_eq!(
            seen,
            vec![
                (inner, Area::ZERO, Area::new(0, 0, 100, 100)),
                (panel, Area::ZERO, Area::new(0, 0, 100, 100)),
            ]
        );
    }

    #[test]
    fn report_damage_unions_old_and_new() {
        let mut org = Organizer::default();
        let win = window(&mut org, 100, 100);
        let a = child(&mut org, win, PackMode::Top);
        org.elements_mut().set_area(a, Area::new(150, 150, 10, 10));

        let report = pack(&mut org, win).unwrap();
        assert_eq!(report.damage(), Some(kurbo::Rect::new(0.0, 0.0, 160.0, 160.0)));

        let idle = pack(&mut org, win).unwrap();
        assert_eq!(idle.damage(), None);
    }

    #[test]
    fn no_children_is_a_no_op() {
        let mut org = Organizer::default();
        let win = window(&mut org, 100, 100);
        let report = pack(&mut org, win).unwrap();
        assert!(report.area_changes.is_empty());
        assert_eq!(report.packed, vec![win]);
    }
}
