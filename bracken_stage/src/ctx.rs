// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The context handed to widget handlers.

use kurbo::{Point, Size};

use crate::stage::{Stage, Task};
use crate::types::{PointerId, WidgetId};
use crate::widget::PointerLift;

/// Access to the stage on behalf of one widget.
///
/// A `Ctx` is created by [`Stage::with_widget`] while the widget's own slot is
/// vacated. Convenience methods operate on the widget's own node; everything
/// else goes through [`Ctx::stage`].
#[derive(Debug)]
pub struct Ctx<'a> {
    stage: &'a mut Stage,
    id: WidgetId,
}

impl<'a> Ctx<'a> {
    pub(crate) fn new(stage: &'a mut Stage, id: WidgetId) -> Self {
        Self { stage, id }
    }

    /// The widget this context belongs to.
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// The stage, for operations beyond the widget's own node.
    pub fn stage(&mut self) -> &mut Stage {
        self.stage
    }

    /// Read access to the stage.
    pub fn stage_ref(&self) -> &Stage {
        self.stage
    }

    /// Parent-relative origin of this widget.
    pub fn origin(&self) -> Point {
        self.stage.origin(self.id).unwrap_or_default()
    }

    /// Moves this widget within its parent.
    pub fn set_origin(&mut self, origin: Point) {
        self.stage.set_origin(self.id, origin);
    }

    /// Size of this widget.
    pub fn size(&self) -> Size {
        self.stage.size(self.id).unwrap_or_default()
    }

    /// Resizes this widget; returns whether the size actually changed.
    pub fn set_size(&mut self, size: Size) -> bool {
        self.stage.set_size(self.id, size)
    }

    /// Origin of this widget in frame coordinates.
    pub fn frame_origin(&self) -> Point {
        self.stage.frame_origin(self.id).unwrap_or_default()
    }

    /// Children of this widget, in insertion order.
    pub fn children(&self) -> &[WidgetId] {
        self.stage.children_of(self.id)
    }

    /// Interactive-area extension applied around this widget's bounds.
    pub fn hit_margin(&self) -> f64 {
        self.stage.hit_margin(self.id).unwrap_or_default()
    }

    /// Whether this widget participates in input.
    pub fn is_enabled(&self) -> bool {
        self.stage.is_enabled(self.id)
    }

    /// Whether this widget tracks pressing/dragging pointers.
    pub fn is_interactive(&self) -> bool {
        self.stage.is_interactive(self.id)
    }

    /// Number of pointers currently pressing this widget.
    pub fn pressing(&self) -> u32 {
        self.stage.pressing(self.id)
    }

    /// Number of pointers dragging this widget.
    pub fn dragging(&self) -> u32 {
        self.stage.dragging(self.id)
    }

    /// Whether any pointer is pressing this widget.
    pub fn is_pressed(&self) -> bool {
        self.pressing() > 0
    }

    /// Requests a step-update for this widget before the next paint.
    pub fn make_dirty(&mut self) {
        self.stage.make_dirty(self.id);
    }

    /// Posts work to run at the next frame boundary.
    pub fn post(&mut self, task: Task) {
        self.stage.post(task);
    }

    // --- Counter primitives used by the base touch behavior ------------------

    /// Records a pointer going down on this widget.
    ///
    /// Returns `(first_press, first_drag)`: whether the pressing count and the
    /// dragging count just went from zero to one.
    pub fn record_touch_down(&mut self, pointer: PointerId) -> (bool, bool) {
        let Some(record) = self.stage.record_mut(self.id) else {
            return (false, false);
        };
        record.pressed |= pointer.bit();
        record.pressing += 1;
        record.dragging += 1;
        (record.pressing == 1, record.dragging == 1)
    }

    /// Records a pointer lift and classifies it.
    ///
    /// A pointer still in the pressed set releases both counters; one that was
    /// dragged out of the active area only releases the dragging count; a
    /// pointer this widget never saw leaves the counters alone.
    pub fn record_touch_up(&mut self, pointer: PointerId) -> PointerLift {
        let Some(record) = self.stage.record_mut(self.id) else {
            return PointerLift::Stray;
        };
        if record.pressed & pointer.bit() != 0 {
            record.pressed &= !pointer.bit();
            record.pressing -= 1;
            record.dragging -= 1;
            PointerLift::Pressing
        } else if record.dragging > 0 {
            record.dragging -= 1;
            PointerLift::DragOnly
        } else {
            PointerLift::Stray
        }
    }

    /// Records a dragging pointer re-entering the active area.
    /// Returns whether the pressing count just went from zero to one.
    pub fn record_drag_in(&mut self, pointer: PointerId) -> bool {
        let Some(record) = self.stage.record_mut(self.id) else {
            return false;
        };
        if record.pressed & pointer.bit() != 0 {
            return false;
        }
        record.pressed |= pointer.bit();
        record.pressing += 1;
        record.pressing == 1
    }

    /// Records a dragging pointer leaving the active area.
    /// Returns whether the pressing count just dropped to zero.
    pub fn record_drag_out(&mut self, pointer: PointerId) -> bool {
        let Some(record) = self.stage.record_mut(self.id) else {
            return false;
        };
        if record.pressed & pointer.bit() == 0 {
            return false;
        }
        record.pressed &= !pointer.bit();
        record.pressing -= 1;
        record.pressing == 0
    }
}
