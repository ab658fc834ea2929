// Copyright 2026 the Packwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Organizer`]: element store, pending queues, and the per-tick pack
//! entry point.

use crate::element::{ElementId, ElementStore};
use crate::error::PackError;
use crate::observer::AreaObserver;
use crate::pack::{PackReport, Pass};
use crate::scheduler::{DuplicatePolicy, Scheduler};
use crate::trace::{
    PassBeginEvent, PassPhase, PassSummary, PhaseBeginEvent, PhaseEndEvent, Tracer,
};

/// Configuration for the [`Organizer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrganizerConfig {
    /// How [`Organizer::schedule_pack`] treats an element that is already
    /// queued.
    pub duplicate_policy: DuplicatePolicy,
}

impl OrganizerConfig {
    /// Re-scheduling a queued element is a silent no-op.
    #[must_use]
    pub const fn tolerant() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Ignore,
        }
    }

    /// Re-scheduling a queued element is an error.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Reject,
        }
    }
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self::tolerant()
    }
}

/// Owns the element tree and the pending pack work.
///
/// Callers mutate elements through [`elements_mut`](Self::elements_mut),
/// queue the affected containers with [`schedule_pack`](Self::schedule_pack)
/// or [`request_pack`](Self::request_pack), and call
/// [`pack_items`](Self::pack_items) once per tick.
///
/// A pass first repacks every queued window in full, along with each of
/// the window's children. It then repacks the queued ordinary elements
/// shallowest first, descending only into children whose area changed.
/// Ordinary elements queued while the windows are packed (for example from
/// an [`AreaObserver`]) join the same pass; work scheduled after that waits
/// for the next one.
#[derive(Debug, Default)]
pub struct Organizer {
    pub(crate) elements: ElementStore,
    pub(crate) scheduler: Scheduler,
    config: OrganizerConfig,
    pass_index: u64,
}

impl Organizer {
    /// Creates an organizer with an empty element store.
    #[must_use]
    pub fn new(config: OrganizerConfig) -> Self {
        Self {
            elements: ElementStore::new(),
            scheduler: Scheduler::new(),
            config,
            pass_index: 0,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> OrganizerConfig {
        self.config
    }

    /// Returns the element store.
    #[must_use]
    pub fn elements(&self) -> &ElementStore {
        &self.elements
    }

    /// Returns the element store for mutation.
    pub fn elements_mut(&mut self) -> &mut ElementStore {
        &mut self.elements
    }

    /// Returns the pending queues.
    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Number of passes run so far.
    #[must_use]
    pub fn pass_index(&self) -> u64 {
        self.pass_index
    }

    // -- Scheduling --

    /// Queues `item` for the next pass.
    ///
    /// Returns `true` if the item was newly queued.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::DuplicateSchedule`] if the item is already pending
    /// and the configured [`DuplicatePolicy`] is `Reject`.
    pub fn schedule_pack(&mut self, item: ElementId) -> Result<bool, PackError> {
        self.scheduler
            .schedule(&mut self.elements, item, self.config.duplicate_policy)
    }

    /// Removes `item` from the queues. Returns `false` if it was not queued.
    pub fn unschedule_pack(&mut self, item: ElementId) -> bool {
        self.scheduler.unschedule(&mut self.elements, item)
    }

    /// Asks for `element` to be laid out again by queueing its parent, or
    /// the element itself when it has no parent.
    ///
    /// A target that is already pending counts as satisfied regardless of
    /// the duplicate policy. Returns `true` if the target was newly queued.
    pub fn request_pack(&mut self, element: ElementId) -> bool {
        let target = self.elements.parent(element).unwrap_or(element);
        self.queue_quietly(target)
    }

    // -- Element operations that imply a repack --

    /// Links `child` as the last child of `parent` and queues `parent`.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale or `child` already has a parent.
    pub fn add_child(&mut self, parent: ElementId, child: ElementId) {
        self.elements.add_child(parent, child);
        self.queue_quietly(parent);
    }

    /// Hides or shows `element` and its subtree, and queues its parent so the
    /// siblings take up or give back the space.
    pub fn set_hidden(&mut self, element: ElementId, hidden: bool) {
        self.elements.set_hidden(element, hidden);
        self.request_pack(element);
    }

    /// Unqueues, detaches, and frees `element`, then queues its former
    /// parent.
    ///
    /// # Panics
    ///
    /// Panics if the element still has children or the handle is stale.
    pub fn destroy_element(&mut self, element: ElementId) {
        self.scheduler.unschedule(&mut self.elements, element);
        // It may sit in a list drained by the running pass.
        self.elements.set_pending(element, false);
        let parent = self.elements.parent(element);
        self.elements.destroy_element(element);
        if let Some(parent) = parent {
            self.queue_quietly(parent);
        }
    }

    fn queue_quietly(&mut self, target: ElementId) -> bool {
        // `Ignore` never fails.
        self.scheduler
            .schedule(&mut self.elements, target, DuplicatePolicy::Ignore)
            .unwrap_or(false)
    }

    // -- Packing --

    /// Runs one pass over everything queued.
    ///
    /// The window queue is taken when the pass starts and repacked first.
    /// The ordinary queue is taken once the windows are done, so it includes
    /// anything their observers queued, and is repacked in ascending depth.
    ///
    /// # Errors
    ///
    /// Returns the first [`PackError`] raised by any parent. The failing item
    /// leaves the queue; items that were not reached stay queued.
    pub fn pack_items<O: AreaObserver + ?Sized>(
        &mut self,
        observer: &mut O,
    ) -> Result<PackReport, PackError> {
        let mut report = PackReport::default();
        self.pack_items_into(observer, &mut Tracer::none(), &mut report)?;
        Ok(report)
    }

    /// Like [`pack_items`](Self::pack_items), but reports to `tracer` and
    /// reuses a caller-provided report buffer.
    ///
    /// # Errors
    ///
    /// See [`pack_items`](Self::pack_items).
    pub fn pack_items_into<O: AreaObserver + ?Sized>(
        &mut self,
        observer: &mut O,
        tracer: &mut Tracer<'_>,
        report: &mut PackReport,
    ) -> Result<(), PackError> {
        report.clear();
        let pass_index = self.pass_index;
        self.pass_index += 1;

        let windows = self.scheduler.take_windows(&self.elements);
        let queued_elements = self.scheduler.pending_elements();
        tracing::debug!(
            pass_index,
            windows = windows.len(),
            elements = queued_elements,
            "pack pass begin"
        );
        tracer.pass_begin(&PassBeginEvent {
            pass_index,
            windows: windows.len(),
            elements: queued_elements,
        });

        let mut pass = Pass {
            index: pass_index,
            observer,
            tracer,
            report,
            parents_packed: 0,
        };

        pass.tracer.phase_begin(&PhaseBeginEvent {
            pass_index,
            phase: PassPhase::Windows,
        });
        self.drain(&windows, true, &mut pass)?;
        pass.tracer.phase_end(&PhaseEndEvent {
            pass_index,
            phase: PassPhase::Windows,
        });
        let windows_packed = pass.report.packed.len();

        let elements = self.scheduler.take_elements(&self.elements);

        pass.tracer.phase_begin(&PhaseBeginEvent {
            pass_index,
            phase: PassPhase::Elements,
        });
        self.drain(&elements, false, &mut pass)?;
        pass.tracer.phase_end(&PhaseEndEvent {
            pass_index,
            phase: PassPhase::Elements,
        });

        let deferred = self.scheduler.pending_windows() + self.scheduler.pending_elements();
        pass.report.deferred = deferred;
        let summary = PassSummary {
            pass_index,
            windows_packed,
            elements_packed: pass.report.packed.len() - windows_packed,
            parents_packed: pass.parents_packed,
            area_changes: pass.report.area_changes.len(),
            deferred,
        };
        tracing::debug!(
            pass_index,
            parents = summary.parents_packed,
            changed = summary.area_changes,
            deferred,
            "pack pass end"
        );
        pass.tracer.pass_summary(&summary);
        Ok(())
    }

    /// Packs each drained item's current children in order.
    fn drain<O: AreaObserver + ?Sized>(
        &mut self,
        items: &[ElementId],
        force: bool,
        pass: &mut Pass<'_, '_, O>,
    ) -> Result<(), PackError> {
        for (i, &item) in items.iter().enumerate() {
            // Destroyed by an observer earlier in this pass.
            if !self.elements.is_alive(item) {
                continue;
            }
            let children: Vec<ElementId> = self.elements.children(item).collect();
            let result = self.pack_parent(item, &children, force, pass);
            if self.elements.is_alive(item) && !self.scheduler.is_scheduled(item) {
                self.elements.set_pending(item, false);
            }
            if let Err(err) = result {
                let rest = &items[i + 1..];
                tracing::warn!(
                    item = ?item,
                    requeued = rest.len(),
                    error = %err,
                    "pack pass aborted"
                );
                self.scheduler.requeue(&self.elements, rest);
                return Err(err);
            }
            pass.report.packed.push(item);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::PackMode;
    use crate::geometry::{Area, SizeRange};
    use crate::observer::NoopObserver;

    fn child(org: &mut Organizer, parent: ElementId, mode: PackMode) -> ElementId {
        let id = org.elements_mut().create_element();
        org.elements_mut().set_pack_mode(id, mode);
        org.add_child(parent, id);
        id
    }

    /// Window with a `fill` panel holding two `top` rows.
    fn tree(org: &mut Organizer) -> (ElementId, ElementId, ElementId, ElementId) {
        let win = org.elements_mut().create_window(Area::new(0, 0, 100, 100));
        let panel = child(org, win, PackMode::Fill);
        let a = child(org, panel, PackMode::Top);
        let b = child(org, panel, PackMode::Top);
        (win, panel, a, b)
    }

    #[test]
    fn default_config_is_tolerant() {
        assert_eq!(OrganizerConfig::default(), OrganizerConfig::tolerant());
        assert_eq!(
            OrganizerConfig::strict().duplicate_policy,
            DuplicatePolicy::Reject
        );
    }

    #[test]
    fn pack_items_lays_out_queued_window() {
        let mut org = Organizer::default();
        let (win, panel, a, b) = tree(&mut org);
        // `add_child` queued the window and the panel.
        assert!(org.elements().is_pending(win));

        let report = org.pack_items(&mut NoopObserver).unwrap();
        assert_eq!(report.packed, vec![win, panel]);
        assert_eq!(org.elements().area(a), Area::new(0, 0, 100, 50));
        assert_eq!(org.elements().area(b), Area::new(0, 50, 100, 50));
        assert!(!org.elements().is_pending(win));
        assert!(!org.elements().is_pending(panel));
        assert!(org.scheduler().is_idle());
        assert_eq!(org.pass_index(), 1);
    }

    #[test]
    fn double_schedule_packs_once() {
        let mut org = Organizer::default();
        let (_, panel, _, _) = tree(&mut org);
        org.pack_items(&mut NoopObserver).unwrap();

        assert_eq!(org.schedule_pack(panel), Ok(true));
        assert_eq!(org.schedule_pack(panel), Ok(false));
        let report = org.pack_items(&mut NoopObserver).unwrap();
        assert_eq!(report.packed, vec![panel]);
    }

    #[test]
    fn strict_config_rejects_double_schedule() {
        let mut org = Organizer::new(OrganizerConfig::strict());
        let el = org.elements_mut().create_element();
        org.schedule_pack(el).unwrap();
        assert_eq!(
            org.schedule_pack(el),
            Err(PackError::DuplicateSchedule { element: el })
        );
    }

    #[test]
    fn unschedule_pack_drops_work() {
        let mut org = Organizer::default();
        let (win, panel, a, _) = tree(&mut org);
        assert!(org.unschedule_pack(win));
        assert!(org.unschedule_pack(panel));
        assert!(!org.unschedule_pack(panel));

        let report = org.pack_items(&mut NoopObserver).unwrap();
        assert!(report.is_empty());
        assert_eq!(org.elements().area(a), Area::ZERO);
    }

    #[test]
    fn request_pack_queues_parent() {
        let mut org = Organizer::default();
        let (win, panel, a, b) = tree(&mut org);
        org.pack_items(&mut NoopObserver).unwrap();

        assert!(org.request_pack(a));
        assert!(org.scheduler().is_scheduled(panel));
        assert!(org.request_pack(win), "a root queues itself");
        assert!(!org.request_pack(b), "already queued");
    }

    #[test]
    fn ordinary_element_only_descends_into_changed_children() {
        let mut org = Organizer::default();
        let (_, panel, a, b) = tree(&mut org);
        let grandchild = child(&mut org, b, PackMode::Fill);
        org.pack_items(&mut NoopObserver).unwrap();
        assert_eq!(org.elements().area(grandchild), Area::new(0, 50, 100, 50));

        // Detach the grandchild's area from what packing would give it, then
        // repack only the panel. Neither row moves, so b is not descended
        // into and the grandchild keeps the stale area.
        org.elements_mut().set_area(grandchild, Area::ZERO);
        org.schedule_pack(panel).unwrap();
        let report = org.pack_items(&mut NoopObserver).unwrap();
        assert!(report.area_changes.is_empty());
        assert_eq!(org.elements().area(grandchild), Area::ZERO);

        // Capping `a` moves `b`, which is then repacked.
        org.elements_mut().set_h_range(a, SizeRange::at_most(20));
        org.schedule_pack(panel).unwrap();
        org.pack_items(&mut NoopObserver).unwrap();
        assert_eq!(org.elements().area(grandchild), Area::new(0, 20, 100, 80));
    }

    #[test]
    fn window_repack_forces_only_its_children() {
        let mut org = Organizer::default();
        let (win, panel, a, b) = tree(&mut org);
        let grandchild = child(&mut org, b, PackMode::Fill);
        org.pack_items(&mut NoopObserver).unwrap();

        // The panel is repacked because its parent is the window, even
        // though it did not move. The rows did not move either, so `b` is
        // not descended into and the grandchild keeps the stale area.
        org.elements_mut().set_area(a, Area::ZERO);
        org.elements_mut().set_area(grandchild, Area::ZERO);
        org.schedule_pack(win).unwrap();
        let report = org.pack_items(&mut NoopObserver).unwrap();
        assert_eq!(org.elements().area(a), Area::new(0, 0, 100, 50));
        assert_eq!(org.elements().area(grandchild), Area::ZERO);
        assert!(report.change_of(panel).is_none());
        assert!(report.change_of(b).is_none());
    }

    #[test]
    fn resizing_window_propagates() {
        let mut org = Organizer::default();
        let (win, panel, _, b) = tree(&mut org);
        org.pack_items(&mut NoopObserver).unwrap();

        org.elements_mut().set_area(win, Area::new(0, 0, 200, 60));
        org.schedule_pack(win).unwrap();
        let report = org.pack_items(&mut NoopObserver).unwrap();
        assert_eq!(org.elements().area(panel), Area::new(0, 0, 200, 60));
        assert_eq!(org.elements().area(b), Area::new(0, 30, 200, 30));
        assert_eq!(report.area_changes.len(), 3);
        assert_eq!(report.area_changes[0].element, panel);
    }

    #[test]
    fn elements_queued_during_window_phase_join_the_pass() {
        let mut org = Organizer::default();
        let (win, panel, a, b) = tree(&mut org);

        let mut observer = |org: &mut Organizer, id: ElementId, _old: Area| {
            if id == a {
                org.schedule_pack(b).unwrap();
            }
        };
        let report = org.pack_items(&mut observer).unwrap();
        assert_eq!(report.packed, vec![win, panel, b]);
        assert_eq!(report.deferred, 0);
        assert!(!org.elements().is_pending(b));
    }

    #[test]
    fn work_scheduled_during_element_phase_is_deferred() {
        let mut org = Organizer::default();
        let (_, panel, a, b) = tree(&mut org);
        org.pack_items(&mut NoopObserver).unwrap();

        let mut observer = |org: &mut Organizer, id: ElementId, _old: Area| {
            if id == a {
                org.schedule_pack(b).unwrap();
            }
        };
        org.elements_mut().set_h_range(a, SizeRange::at_most(20));
        org.schedule_pack(panel).unwrap();
        let report = org.pack_items(&mut observer).unwrap();
        assert_eq!(report.packed, vec![panel]);
        assert_eq!(report.deferred, 1);
        assert!(org.elements().is_pending(b));

        let next = org.pack_items(&mut observer).unwrap();
        assert_eq!(next.packed, vec![b]);
        assert_eq!(next.deferred, 0);
    }

    #[test]
    fn rescheduling_item_being_packed_is_absorbed() {
        let mut org = Organizer::default();
        let (_, panel, a, _) = tree(&mut org);
        org.pack_items(&mut NoopObserver).unwrap();

        let mut results = Vec::new();
        let mut observer = |org: &mut Organizer, id: ElementId, _old: Area| {
            if id == a {
                results.push(org.schedule_pack(panel));
            }
        };
        org.elements_mut().set_h_range(a, SizeRange::at_most(20));
        org.schedule_pack(panel).unwrap();
        let report = org.pack_items(&mut observer).unwrap();
        assert_eq!(results, vec![Ok(false)]);
        assert_eq!(report.packed, vec![panel]);
        assert_eq!(report.deferred, 0);
        assert!(!org.elements().is_pending(panel));
        assert!(org.pack_items(&mut NoopObserver).unwrap().is_empty());
    }

    #[test]
    fn set_hidden_gives_space_back() {
        let mut org = Organizer::default();
        let (_, _, a, b) = tree(&mut org);
        org.pack_items(&mut NoopObserver).unwrap();

        org.set_hidden(a, true);
        org.pack_items(&mut NoopObserver).unwrap();
        assert_eq!(org.elements().area(b), Area::new(0, 0, 100, 100));

        org.set_hidden(a, false);
        org.pack_items(&mut NoopObserver).unwrap();
        assert_eq!(org.elements().area(b), Area::new(0, 50, 100, 50));
    }

    #[test]
    fn destroy_element_repacks_parent() {
        let mut org = Organizer::default();
        let (_, panel, a, b) = tree(&mut org);
        org.pack_items(&mut NoopObserver).unwrap();

        org.destroy_element(a);
        assert!(!org.elements().is_alive(a));
        assert!(org.scheduler().is_scheduled(panel));
        org.pack_items(&mut NoopObserver).unwrap();
        assert_eq!(org.elements().area(b), Area::new(0, 0, 100, 100));
    }

    #[test]
    fn destroying_queued_element_unschedules_it() {
        let mut org = Organizer::default();
        let el = org.elements_mut().create_element();
        org.schedule_pack(el).unwrap();
        org.destroy_element(el);
        assert!(org.scheduler().is_idle());
        assert!(org.pack_items(&mut NoopObserver).unwrap().is_empty());
    }

    #[test]
    fn error_requeues_unreached_items() {
        let mut org = Organizer::default();
        let bad = org.elements_mut().create_element();
        let good = org.elements_mut().create_element();
        org.elements_mut().set_area(good, Area::new(0, 0, 10, 10));
        child(&mut org, bad, PackMode::Main);
        child(&mut org, bad, PackMode::Main);
        let row = child(&mut org, good, PackMode::Top);

        // Equal depth keeps scheduling order: `bad` fails before `good`.
        let err = org.pack_items(&mut NoopObserver).unwrap_err();
        assert!(matches!(err, PackError::AmbiguousMain { parent, .. } if parent == bad));
        assert!(!org.elements().is_pending(bad));
        assert!(org.elements().is_pending(good));
        assert_eq!(org.scheduler().pending_elements(), 1);

        let report = org.pack_items(&mut NoopObserver).unwrap();
        assert_eq!(report.packed, vec![good]);
        assert_eq!(org.elements().area(row), Area::new(0, 0, 10, 10));
    }
}
