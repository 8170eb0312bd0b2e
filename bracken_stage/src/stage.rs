// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The widget arena: slots, links, geometry, and interaction bookkeeping.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use kurbo::{Point, Rect, Size};

use crate::ctx::Ctx;
use crate::error::{Error, Result};
use crate::event::{InputHandler, PointerEvent};
use crate::listeners::Listeners;
use crate::types::{PointerId, WidgetFlags, WidgetId};
use crate::widget::Widget;

/// Work deferred to the next frame boundary.
pub type Task = Box<dyn FnOnce(&mut Stage)>;

/// Shared per-widget interaction state, kept in the arena next to the payload.
pub(crate) struct NodeRecord {
    pub(crate) origin: Point,
    pub(crate) size: Size,
    pub(crate) hit_margin: f64,
    pub(crate) flags: WidgetFlags,
    pub(crate) pressed: u32,
    pub(crate) pressing: u32,
    pub(crate) dragging: u32,
    pub(crate) parent: Option<WidgetId>,
    pub(crate) children: Vec<WidgetId>,
    pub(crate) input_listeners: Listeners<InputHandler>,
}

impl NodeRecord {
    fn new(bounds: Rect) -> Self {
        Self {
            origin: bounds.origin(),
            size: bounds.size(),
            hit_margin: 0.0,
            flags: WidgetFlags::default(),
            pressed: 0,
            pressing: 0,
            dragging: 0,
            parent: None,
            children: Vec::new(),
            input_listeners: Listeners::new(),
        }
    }
}

struct Slot {
    record: NodeRecord,
    // `None` for free slots and while the widget's own handler is running.
    widget: Option<Box<dyn Widget>>,
    generation: u32,
    live: bool,
}

/// Arena owning all widgets of one user interface.
///
/// The stage also carries the pending-dirty queue and the deferred task queue;
/// the frame drains both once per render tick.
#[derive(Default)]
pub struct Stage {
    slots: Vec<Slot>,
    free: Vec<u32>,
    pending_dirty: Vec<WidgetId>,
    tasks: Vec<Task>,
}

impl Stage {
    /// Creates an empty stage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a widget with the given parent-relative bounds, unattached.
    pub fn insert(&mut self, widget: impl Widget, bounds: Rect) -> WidgetId {
        let mut record = NodeRecord::new(bounds);
        if widget.wants_interactive() {
            record.flags |= WidgetFlags::INTERACTIVE;
        }
        let boxed: Box<dyn Widget> = Box::new(widget);
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.record = record;
            slot.widget = Some(boxed);
            slot.live = true;
            WidgetId::new(idx, slot.generation)
        } else {
            let idx = u32::try_from(self.slots.len()).expect("stage slot count exceeds u32");
            self.slots.push(Slot {
                record,
                widget: Some(boxed),
                generation: 0,
                live: true,
            });
            WidgetId::new(idx, 0)
        }
    }

    /// Removes a detached widget and its whole subtree, returning the widget.
    ///
    /// # Panics
    ///
    /// Panics if the widget is still attached to a parent; detach it first.
    pub fn remove(&mut self, id: WidgetId) -> Result<Box<dyn Widget>> {
        let slot = self.slot(id).ok_or(Error::NotFound)?;
        assert!(
            slot.record.parent.is_none(),
            "widget is still attached to its parent; detach it before removal"
        );
        let children = slot.record.children.clone();
        for child in children {
            self.slot_mut(child)
                .expect("child link points at a dead slot")
                .record
                .parent = None;
            // Subtree teardown; the child was just unlinked, so this succeeds.
            let _ = self.remove(child);
        }
        let slot = &mut self.slots[id.idx()];
        let widget = slot.widget.take().ok_or(Error::NotFound)?;
        slot.live = false;
        slot.generation = slot.generation.wrapping_add(1);
        slot.record = NodeRecord::new(Rect::ZERO);
        self.free.push(id.0);
        Ok(widget)
    }

    /// Whether `id` refers to a live widget.
    pub fn is_alive(&self, id: WidgetId) -> bool {
        self.slot(id).is_some()
    }

    // --- Links ---------------------------------------------------------------

    /// Attaches `child` as the last child of `parent`.
    ///
    /// The attached subtree is marked dirty so it gets stepped and repainted.
    ///
    /// # Panics
    ///
    /// Panics if `child` is already attached or if the attachment would form a
    /// cycle; both are caller bugs.
    pub fn attach(&mut self, parent: WidgetId, child: WidgetId) -> Result<()> {
        let index = self.slot(parent).ok_or(Error::NotFound)?.record.children.len();
        self.attach_at(parent, index, child)
    }

    /// Attaches `child` to `parent` at the given child index.
    ///
    /// # Panics
    ///
    /// Panics on an out-of-range index, an already-attached child, or a cycle.
    pub fn attach_at(&mut self, parent: WidgetId, index: usize, child: WidgetId) -> Result<()> {
        if !self.is_alive(child) || !self.is_alive(parent) {
            return Err(Error::NotFound);
        }
        assert!(
            self.slots[child.idx()].record.parent.is_none(),
            "widget is already attached to a parent; detach it before re-attaching"
        );
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            assert!(id != child, "attaching a widget under its own subtree");
            cursor = self.slots[id.idx()].record.parent;
        }
        self.slots[parent.idx()].record.children.insert(index, child);
        self.slots[child.idx()].record.parent = Some(parent);
        self.make_all_dirty(child);
        Ok(())
    }

    /// Detaches `child` from its parent. Returns `false` if it had none.
    pub fn detach(&mut self, child: WidgetId) -> bool {
        let Some(slot) = self.slot(child) else {
            return false;
        };
        let Some(parent) = slot.record.parent else {
            return false;
        };
        let children = &mut self.slots[parent.idx()].record.children;
        let index = children
            .iter()
            .position(|c| *c == child)
            .expect("parent link without matching child entry");
        children.remove(index);
        self.slots[child.idx()].record.parent = None;
        true
    }

    /// Parent of a live widget, if attached.
    pub fn parent_of(&self, id: WidgetId) -> Option<WidgetId> {
        self.slot(id)?.record.parent
    }

    /// Children of a live widget, in insertion order.
    pub fn children_of(&self, id: WidgetId) -> &[WidgetId] {
        self.slot(id).map_or(&[], |s| &s.record.children)
    }

    // --- Geometry ------------------------------------------------------------

    /// Parent-relative origin of a live widget.
    pub fn origin(&self, id: WidgetId) -> Option<Point> {
        self.slot(id).map(|s| s.record.origin)
    }

    /// Moves a widget within its parent.
    pub fn set_origin(&mut self, id: WidgetId, origin: Point) {
        if let Some(slot) = self.slot_mut(id) {
            slot.record.origin = origin;
        }
    }

    /// Size of a live widget.
    pub fn size(&self, id: WidgetId) -> Option<Size> {
        self.slot(id).map(|s| s.record.size)
    }

    /// Resizes a widget. Unchanged sizes are a no-op: no hook fires.
    ///
    /// A real change invokes the widget's [`Widget::resized`] hook and then the
    /// parent's [`Widget::child_resized`], so layout containers can realign.
    /// Returns whether the size actually changed.
    pub fn set_size(&mut self, id: WidgetId, size: Size) -> bool {
        let Some(slot) = self.slot_mut(id) else {
            return false;
        };
        if slot.record.size == size {
            return false;
        }
        slot.record.size = size;
        self.with_widget_dyn(id, |w, ctx| w.resized(ctx));
        if let Some(parent) = self.parent_of(id) {
            self.with_widget_dyn(parent, |w, ctx| w.child_resized(ctx, id));
        }
        true
    }

    /// Origin of a widget in frame coordinates (ancestor origins accumulated).
    pub fn frame_origin(&self, id: WidgetId) -> Option<Point> {
        let mut slot = self.slot(id)?;
        let mut origin = slot.record.origin.to_vec2();
        while let Some(parent) = slot.record.parent {
            slot = self.slot(parent)?;
            origin += slot.record.origin.to_vec2();
        }
        Some(origin.to_point())
    }

    /// Interactive-area extension applied around the widget's bounds.
    pub fn hit_margin(&self, id: WidgetId) -> Option<f64> {
        self.slot(id).map(|s| s.record.hit_margin)
    }

    /// Sets the interactive-area extension.
    pub fn set_hit_margin(&mut self, id: WidgetId, margin: f64) {
        if let Some(slot) = self.slot_mut(id) {
            slot.record.hit_margin = margin;
        }
    }

    // --- Flags ---------------------------------------------------------------

    /// Whether the widget participates in input.
    pub fn is_enabled(&self, id: WidgetId) -> bool {
        self.has_flag(id, WidgetFlags::ENABLED)
    }

    /// Enables or disables input participation.
    pub fn set_enabled(&mut self, id: WidgetId, enabled: bool) {
        self.update_flag(id, WidgetFlags::ENABLED, enabled);
    }

    /// Whether the widget's subtree is painted.
    pub fn is_visible(&self, id: WidgetId) -> bool {
        self.has_flag(id, WidgetFlags::VISIBLE)
    }

    /// Shows or hides the widget's subtree.
    pub fn set_visible(&mut self, id: WidgetId, visible: bool) {
        self.update_flag(id, WidgetFlags::VISIBLE, visible);
    }

    /// Whether the widget tracks pressing/dragging pointers.
    pub fn is_interactive(&self, id: WidgetId) -> bool {
        self.has_flag(id, WidgetFlags::INTERACTIVE)
    }

    /// Makes the widget track pointers and consume touch events.
    /// One-way latch; there is no way back to the inert state.
    pub fn make_interactive(&mut self, id: WidgetId) {
        self.update_flag(id, WidgetFlags::INTERACTIVE, true);
    }

    fn has_flag(&self, id: WidgetId, flag: WidgetFlags) -> bool {
        self.slot(id).is_some_and(|s| s.record.flags.contains(flag))
    }

    fn update_flag(&mut self, id: WidgetId, flag: WidgetFlags, value: bool) {
        if let Some(slot) = self.slot_mut(id) {
            slot.record.flags.set(flag, value);
        }
    }

    // --- Press/drag bookkeeping ----------------------------------------------

    /// Number of pointers currently pressing within the widget's bounds.
    pub fn pressing(&self, id: WidgetId) -> u32 {
        self.slot(id).map_or(0, |s| s.record.pressing)
    }

    /// Number of pointers dragging the widget (held since touch-down).
    pub fn dragging(&self, id: WidgetId) -> u32 {
        self.slot(id).map_or(0, |s| s.record.dragging)
    }

    /// Whether any pointer is pressing the widget.
    pub fn is_pressed(&self, id: WidgetId) -> bool {
        self.pressing(id) > 0
    }

    /// Whether the given pointer is in the widget's pressed set.
    pub fn is_pressed_by(&self, id: WidgetId, pointer: PointerId) -> bool {
        self.slot(id)
            .is_some_and(|s| s.record.pressed & pointer.bit() != 0)
    }

    // --- Input listeners -----------------------------------------------------

    /// Registers an input listener; a tagged add replaces in place.
    pub fn add_input_listener(
        &mut self,
        id: WidgetId,
        tag: Option<&'static str>,
        handler: InputHandler,
    ) {
        if let Some(slot) = self.slot_mut(id) {
            match tag {
                Some(tag) => slot.record.input_listeners.insert(tag, handler),
                None => slot.record.input_listeners.push(handler),
            }
        }
    }

    /// Removes the input listener registered under `tag`.
    pub fn remove_input_listener(&mut self, id: WidgetId, tag: &'static str) -> bool {
        self.slot_mut(id)
            .is_some_and(|s| s.record.input_listeners.remove(tag).is_some())
    }

    /// Runs the widget's input listeners in registration order; the first
    /// listener returning `true` consumes the event.
    pub fn run_input_listeners(&mut self, id: WidgetId, event: &PointerEvent) -> bool {
        let Some(slot) = self.slot_mut(id) else {
            return false;
        };
        for listener in slot.record.input_listeners.iter_mut() {
            if listener(event) {
                return true;
            }
        }
        false
    }

    // --- Dirty tracking and deferred work ------------------------------------

    /// Requests a step-update for the widget before the next paint.
    pub fn make_dirty(&mut self, id: WidgetId) {
        if self.is_alive(id) {
            self.pending_dirty.push(id);
        }
    }

    /// Marks a widget and its entire subtree dirty.
    pub fn make_all_dirty(&mut self, id: WidgetId) {
        if !self.is_alive(id) {
            return;
        }
        let mut queue = Vec::from([id]);
        while let Some(next) = queue.pop() {
            self.pending_dirty.push(next);
            queue.extend_from_slice(self.children_of(next));
        }
    }

    /// Drains the pending-dirty queue.
    pub fn take_pending_dirty(&mut self) -> Vec<WidgetId> {
        core::mem::take(&mut self.pending_dirty)
    }

    /// Posts work to run at the next frame boundary.
    pub fn post(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Drains the deferred task queue.
    pub fn take_tasks(&mut self) -> Vec<Task> {
        core::mem::take(&mut self.tasks)
    }

    // --- Widget access -------------------------------------------------------

    /// Read-only typed access to a widget.
    pub fn widget_ref<W: Widget>(&self, id: WidgetId) -> Result<&W> {
        let widget = self
            .slot(id)
            .and_then(|s| s.widget.as_deref())
            .ok_or(Error::NotFound)?;
        (widget as &dyn Any)
            .downcast_ref()
            .ok_or(Error::TypeMismatch)
    }

    /// Mutable typed access to a widget's own state.
    ///
    /// This borrows the widget in place; use [`Stage::with_widget`] when the
    /// widget needs to act on the rest of the stage as well.
    pub fn widget_mut<W: Widget>(&mut self, id: WidgetId) -> Result<&mut W> {
        let widget = self
            .slot_mut(id)
            .and_then(|s| s.widget.as_deref_mut())
            .ok_or(Error::NotFound)?;
        (widget as &mut dyn Any)
            .downcast_mut()
            .ok_or(Error::TypeMismatch)
    }

    /// Runs `f` with typed access to the widget and a [`Ctx`] over the rest of
    /// the stage. The widget's slot is vacated for the duration, so hooks
    /// re-entering this widget are skipped.
    pub fn with_widget<W: Widget, R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut W, &mut Ctx<'_>) -> R,
    ) -> Result<R> {
        let mut widget = self.take_widget(id).ok_or(Error::NotFound)?;
        if (widget.as_mut() as &mut dyn Any).downcast_mut::<W>().is_none() {
            self.restore_widget(id, widget);
            return Err(Error::TypeMismatch);
        }
        let result = {
            let mut ctx = Ctx::new(self, id);
            let typed = (widget.as_mut() as &mut dyn Any)
                .downcast_mut::<W>()
                .expect("downcast re-checked above");
            f(typed, &mut ctx)
        };
        self.restore_widget(id, widget);
        Ok(result)
    }

    /// Runs `f` with dynamic access to the widget and a [`Ctx`] over the rest
    /// of the stage. Returns `None` for dead or vacated slots.
    pub fn with_widget_dyn<R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut dyn Widget, &mut Ctx<'_>) -> R,
    ) -> Option<R> {
        let mut widget = self.take_widget(id)?;
        let result = {
            let mut ctx = Ctx::new(self, id);
            f(widget.as_mut(), &mut ctx)
        };
        self.restore_widget(id, widget);
        Some(result)
    }

    pub(crate) fn take_widget(&mut self, id: WidgetId) -> Option<Box<dyn Widget>> {
        self.slot_mut(id)?.widget.take()
    }

    pub(crate) fn restore_widget(&mut self, id: WidgetId, widget: Box<dyn Widget>) {
        // The widget may have removed itself while it was vacated; in that
        // case the slot was already freed and the payload is dropped here.
        if let Some(slot) = self.slot_mut(id) {
            slot.widget = Some(widget);
        }
    }

    pub(crate) fn record(&self, id: WidgetId) -> Option<&NodeRecord> {
        self.slot(id).map(|s| &s.record)
    }

    pub(crate) fn record_mut(&mut self, id: WidgetId) -> Option<&mut NodeRecord> {
        self.slot_mut(id).map(|s| &mut s.record)
    }

    fn slot(&self, id: WidgetId) -> Option<&Slot> {
        let slot = self.slots.get(id.idx())?;
        (slot.live && slot.generation == id.generation()).then_some(slot)
    }

    fn slot_mut(&mut self, id: WidgetId) -> Option<&mut Slot> {
        let slot = self.slots.get_mut(id.idx())?;
        (slot.live && slot.generation == id.generation()).then_some(slot)
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("slots", &self.slots.len())
            .field("free", &self.free.len())
            .field("pending_dirty", &self.pending_dirty.len())
            .field("tasks", &self.tasks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::Widget;
    use alloc::vec;

    struct Probe;
    impl Widget for Probe {}

    struct Grabby;
    impl Widget for Grabby {
        fn wants_interactive(&self) -> bool {
            true
        }
    }

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(x, y, x + w, y + h)
    }

    #[test]
    fn insert_reuses_slots_with_new_generation() {
        let mut stage = Stage::new();
        let a = stage.insert(Probe, rect(0.0, 0.0, 10.0, 10.0));
        stage.remove(a).unwrap();
        let b = stage.insert(Probe, rect(0.0, 0.0, 5.0, 5.0));
        assert!(!stage.is_alive(a));
        assert!(stage.is_alive(b));
        assert_ne!(a, b);
        assert_eq!(a.idx(), b.idx());
    }

    #[test]
    fn attach_detach_roundtrip() {
        let mut stage = Stage::new();
        let parent = stage.insert(Probe, rect(0.0, 0.0, 100.0, 100.0));
        let child = stage.insert(Probe, rect(10.0, 20.0, 30.0, 40.0));
        stage.attach(parent, child).unwrap();
        assert_eq!(stage.parent_of(child), Some(parent));
        assert_eq!(stage.children_of(parent), &[child]);
        assert!(stage.detach(child));
        assert_eq!(stage.parent_of(child), None);
        assert!(stage.children_of(parent).is_empty());
        assert!(!stage.detach(child));
    }

    #[test]
    #[should_panic(expected = "already attached")]
    fn attaching_twice_panics() {
        let mut stage = Stage::new();
        let a = stage.insert(Probe, rect(0.0, 0.0, 10.0, 10.0));
        let b = stage.insert(Probe, rect(0.0, 0.0, 10.0, 10.0));
        let child = stage.insert(Probe, rect(0.0, 0.0, 1.0, 1.0));
        stage.attach(a, child).unwrap();
        stage.attach(b, child).unwrap();
    }

    #[test]
    #[should_panic(expected = "own subtree")]
    fn attach_cycle_panics() {
        let mut stage = Stage::new();
        let a = stage.insert(Probe, rect(0.0, 0.0, 10.0, 10.0));
        let b = stage.insert(Probe, rect(0.0, 0.0, 10.0, 10.0));
        stage.attach(a, b).unwrap();
        stage.attach(b, a).unwrap();
    }

    #[test]
    #[should_panic(expected = "still attached")]
    fn removing_attached_widget_panics() {
        let mut stage = Stage::new();
        let parent = stage.insert(Probe, rect(0.0, 0.0, 10.0, 10.0));
        let child = stage.insert(Probe, rect(0.0, 0.0, 1.0, 1.0));
        stage.attach(parent, child).unwrap();
        let _ = stage.remove(child);
    }

    #[test]
    fn remove_tears_down_subtree() {
        let mut stage = Stage::new();
        let root = stage.insert(Probe, rect(0.0, 0.0, 10.0, 10.0));
        let child = stage.insert(Probe, rect(0.0, 0.0, 1.0, 1.0));
        let grandchild = stage.insert(Probe, rect(0.0, 0.0, 1.0, 1.0));
        stage.attach(root, child).unwrap();
        stage.attach(child, grandchild).unwrap();
        stage.remove(root).unwrap();
        assert!(!stage.is_alive(child));
        assert!(!stage.is_alive(grandchild));
    }

    #[test]
    fn frame_origin_accumulates_ancestors() {
        let mut stage = Stage::new();
        let root = stage.insert(Probe, rect(0.0, 0.0, 100.0, 100.0));
        let mid = stage.insert(Probe, rect(10.0, 20.0, 50.0, 50.0));
        let leaf = stage.insert(Probe, rect(5.0, 6.0, 10.0, 10.0));
        stage.attach(root, mid).unwrap();
        stage.attach(mid, leaf).unwrap();
        assert_eq!(stage.frame_origin(leaf), Some(Point::new(15.0, 26.0)));
    }

    #[test]
    fn set_size_suppresses_no_op_changes() {
        let mut stage = Stage::new();
        let id = stage.insert(Probe, rect(0.0, 0.0, 10.0, 20.0));
        assert!(!stage.set_size(id, Size::new(10.0, 20.0)));
        assert!(stage.set_size(id, Size::new(10.0, 21.0)));
        assert_eq!(stage.size(id), Some(Size::new(10.0, 21.0)));
    }

    #[test]
    fn wants_interactive_sets_flag_on_insert() {
        let mut stage = Stage::new();
        let inert = stage.insert(Probe, rect(0.0, 0.0, 1.0, 1.0));
        let grabby = stage.insert(Grabby, rect(0.0, 0.0, 1.0, 1.0));
        assert!(!stage.is_interactive(inert));
        assert!(stage.is_interactive(grabby));
    }

    #[test]
    fn make_all_dirty_covers_subtree() {
        let mut stage = Stage::new();
        let root = stage.insert(Probe, rect(0.0, 0.0, 10.0, 10.0));
        let child = stage.insert(Probe, rect(0.0, 0.0, 1.0, 1.0));
        stage.attach(root, child).unwrap();
        stage.take_pending_dirty();
        stage.make_all_dirty(root);
        let dirty = stage.take_pending_dirty();
        assert!(dirty.contains(&root));
        assert!(dirty.contains(&child));
    }

    #[test]
    fn input_listeners_short_circuit_in_order() {
        let mut stage = Stage::new();
        let id = stage.insert(Probe, rect(0.0, 0.0, 10.0, 10.0));
        stage.add_input_listener(id, Some("veto"), Box::new(|_| true));
        stage.add_input_listener(id, None, Box::new(|_| panic!("must not run")));
        let event = PointerEvent::Down {
            x: 1.0,
            y: 1.0,
            pointer: PointerId(0),
        };
        assert!(stage.run_input_listeners(id, &event));
        assert!(stage.remove_input_listener(id, "veto"));
        // Without the veto the remaining listener runs (and panics), so drop it.
        assert!(!stage.remove_input_listener(id, "veto"));
    }

    #[test]
    fn with_widget_vacates_and_restores_slot() {
        let mut stage = Stage::new();
        let id = stage.insert(Probe, rect(0.0, 0.0, 10.0, 10.0));
        stage
            .with_widget::<Probe, _>(id, |_, ctx| {
                // While the handler runs the slot is vacated.
                assert!(ctx.stage().with_widget_dyn(id, |_, _| ()).is_none());
            })
            .unwrap();
        assert!(stage.widget_ref::<Probe>(id).is_ok());
        assert_eq!(
            stage.with_widget::<Grabby, _>(id, |_, _| ()),
            Err(Error::TypeMismatch)
        );
    }

    #[test]
    fn tasks_are_drained_in_post_order() {
        let mut stage = Stage::new();
        let id = stage.insert(Probe, rect(0.0, 0.0, 10.0, 10.0));
        stage.post(Box::new(move |s| s.set_origin(id, Point::new(1.0, 0.0))));
        stage.post(Box::new(move |s| s.set_origin(id, Point::new(2.0, 0.0))));
        let tasks = stage.take_tasks();
        assert_eq!(tasks.len(), 2);
        for task in tasks {
            task(&mut stage);
        }
        assert_eq!(stage.origin(id), Some(Point::new(2.0, 0.0)));
        assert!(stage.take_tasks().is_empty());
    }

    #[test]
    fn children_insert_at_index() {
        let mut stage = Stage::new();
        let parent = stage.insert(Probe, rect(0.0, 0.0, 10.0, 10.0));
        let a = stage.insert(Probe, rect(0.0, 0.0, 1.0, 1.0));
        let b = stage.insert(Probe, rect(0.0, 0.0, 1.0, 1.0));
        let c = stage.insert(Probe, rect(0.0, 0.0, 1.0, 1.0));
        stage.attach(parent, a).unwrap();
        stage.attach(parent, c).unwrap();
        stage.attach_at(parent, 1, b).unwrap();
        assert_eq!(stage.children_of(parent), &[a, b, c]);
        assert_eq!(vec![a, b, c].len(), 3);
    }
}
