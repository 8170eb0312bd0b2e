// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The widget trait and the base touch behavior.
//!
//! ## Overview
//!
//! Every payload stored in a [`Stage`](crate::Stage) implements [`Widget`].
//! The trait is flat: input handlers, lifecycle hooks, layout notifications,
//! stepping, and painting all live on it, with defaults so simple widgets
//! implement next to nothing.
//!
//! The default touch handlers delegate to the `base_*` functions in this
//! module, which maintain the shared press/drag counters and fire the
//! [`Widget::pressed`], [`Widget::released`], [`Widget::drag_started`], and
//! [`Widget::drag_stopped`] hooks on the zero/non-zero edges. Widgets that
//! override a touch handler and still want that bookkeeping call the matching
//! `base_*` function themselves, then layer their own behavior on top.

use core::any::Any;

use kurbo::Point;
use smallvec::SmallVec;

use crate::ctx::Ctx;
use crate::paint::PaintCtx;
use crate::types::{PointerId, WidgetId};

/// Classification of a pointer lift by [`Ctx::record_touch_up`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PointerLift {
    /// The pointer was in the pressed set; both counters were released.
    Pressing,
    /// The pointer had been dragged out of the active area; only the dragging
    /// count was released.
    DragOnly,
    /// This widget never saw the pointer go down; nothing changed.
    Stray,
}

/// A widget stored in a [`Stage`](crate::Stage).
#[allow(unused_variables, reason = "default bodies ignore most parameters")]
pub trait Widget: Any {
    /// Whether the widget should be made interactive when inserted.
    fn wants_interactive(&self) -> bool {
        false
    }

    /// Whether the widget admits at most one pressing pointer at a time.
    ///
    /// The input router skips touch-down delivery for additional pointers
    /// while one is already registered on this widget.
    fn single_touch(&self) -> bool {
        false
    }

    /// Whether the widget-local point lies in the widget's active area.
    ///
    /// The default is the widget's bounds extended by its hit margin on every
    /// side. Widgets with a moving hot zone (a switch grip) override this.
    fn inside_active_area(&self, ctx: &Ctx<'_>, x: f64, y: f64) -> bool {
        let size = ctx.size();
        let margin = ctx.hit_margin();
        x > -margin && y > -margin && x < size.width + margin && y < size.height + margin
    }

    /// Children to consider during hit testing, front to back.
    ///
    /// The default exposes all children; containers that stack layers expose
    /// only the active one.
    fn hit_candidates(&self, ctx: &Ctx<'_>, x: f64, y: f64, out: &mut SmallVec<[WidgetId; 8]>) {
        out.extend_from_slice(ctx.children());
    }

    // --- Touch handlers ------------------------------------------------------

    /// A pointer went down inside the active area. Returns whether the event
    /// was consumed.
    fn on_touch_down(&mut self, ctx: &mut Ctx<'_>, x: f64, y: f64, pointer: PointerId) -> bool {
        base_touch_down(self, ctx, pointer)
    }

    /// A pointer that went down on this widget was lifted.
    fn on_touch_up(&mut self, ctx: &mut Ctx<'_>, x: f64, y: f64, pointer: PointerId) -> bool {
        base_touch_up(self, ctx, pointer)
    }

    /// A held pointer moved. Returning `false` escalates the drag to the
    /// parent chain; the nearest accepting ancestor captures it.
    fn on_drag(
        &mut self,
        ctx: &mut Ctx<'_>,
        x: f64,
        y: f64,
        dx: f64,
        dy: f64,
        pointer: PointerId,
    ) -> bool {
        base_drag(ctx)
    }

    /// A dragging pointer re-entered the active area.
    fn on_drag_in(
        &mut self,
        ctx: &mut Ctx<'_>,
        x: f64,
        y: f64,
        dx: f64,
        dy: f64,
        pointer: PointerId,
    ) {
        base_drag_in(self, ctx, pointer);
    }

    /// A dragging pointer left the active area.
    fn on_drag_out(
        &mut self,
        ctx: &mut Ctx<'_>,
        x: f64,
        y: f64,
        dx: f64,
        dy: f64,
        pointer: PointerId,
    ) {
        base_drag_out(self, ctx, pointer);
    }

    /// A tap was recognized. Returns whether it was consumed; unconsumed taps
    /// bubble up the parent chain.
    fn on_tap(&mut self, ctx: &mut Ctx<'_>, x: f64, y: f64, count: u32, pointer: PointerId) -> bool {
        false
    }

    /// The pointer was lifted while in motion. Returns whether the fling was
    /// consumed; unconsumed flings bubble up the parent chain.
    fn on_fling(
        &mut self,
        ctx: &mut Ctx<'_>,
        x: f64,
        y: f64,
        vx: f64,
        vy: f64,
        pointer: PointerId,
    ) -> bool {
        false
    }

    // --- Hover handlers ------------------------------------------------------

    /// The hover cursor moved within the widget.
    fn on_mouse_move(&mut self, ctx: &mut Ctx<'_>, x: f64, y: f64, dx: f64, dy: f64) -> bool {
        false
    }

    /// The hover cursor entered the widget.
    fn on_mouse_over(&mut self, ctx: &mut Ctx<'_>, x: f64, y: f64, dx: f64, dy: f64) -> bool {
        false
    }

    /// The hover cursor left the widget.
    fn on_mouse_out(&mut self, ctx: &mut Ctx<'_>, x: f64, y: f64, dx: f64, dy: f64) -> bool {
        false
    }

    // --- Interaction hooks ---------------------------------------------------

    /// The pressing count went from zero to one.
    fn pressed(&mut self, ctx: &mut Ctx<'_>) {}

    /// The pressing count dropped back to zero.
    fn released(&mut self, ctx: &mut Ctx<'_>) {}

    /// The total dragging count (own plus captured) went from zero to one.
    fn drag_started(&mut self, ctx: &mut Ctx<'_>) {}

    /// The total dragging count dropped back to zero.
    fn drag_stopped(&mut self, ctx: &mut Ctx<'_>) {}

    /// Drags captured from descendants, counted into the dragging total.
    fn extra_drag_count(&self) -> u32 {
        0
    }

    /// A descendant's unconsumed drag reached this widget. Returning `true`
    /// captures the pointer; subsequent drag events arrive here directly.
    fn on_drag_received(&mut self, ctx: &mut Ctx<'_>, pointer: PointerId) -> bool {
        false
    }

    /// A previously captured drag moved on to another receiver or ended.
    fn on_drag_capture_stopped(&mut self, ctx: &mut Ctx<'_>, pointer: PointerId) {}

    // --- Layout notifications ------------------------------------------------

    /// This widget's size changed.
    fn resized(&mut self, ctx: &mut Ctx<'_>) {}

    /// A direct child's size changed.
    fn child_resized(&mut self, ctx: &mut Ctx<'_>, child: WidgetId) {}

    // --- Drag-and-drop target protocol ---------------------------------------

    /// Whether this widget accepts the dragged payload.
    fn accepts_drag(&self, item: &dyn Any) -> bool {
        false
    }

    /// A dragged payload is hovering over this widget.
    fn on_drag_over(&mut self, ctx: &mut Ctx<'_>, item: &dyn Any) {}

    /// A hovering payload moved away without being dropped.
    fn on_drag_leave(&mut self, ctx: &mut Ctx<'_>, item: &dyn Any) {}

    /// A payload was dropped on this widget. Returns whether it was taken.
    fn on_drop(&mut self, ctx: &mut Ctx<'_>, item: &dyn Any) -> bool {
        false
    }

    // --- Stepping and painting -----------------------------------------------

    /// Advances time-dependent state by `delay` seconds. Widgets that are
    /// still in motion call [`Ctx::make_dirty`] to be stepped again.
    fn step(&mut self, ctx: &mut Ctx<'_>, delay: f64) {}

    /// Paints the widget. The default paints the children.
    fn paint(&mut self, ctx: &mut PaintCtx<'_, '_>) {
        ctx.paint_children();
    }

    /// Frame origin of the widget's drag overlay, while one is active.
    ///
    /// The frame paints [`Widget::drag_paint`] at this origin on top of the
    /// regular tree. `None` means the widget has no overlay.
    fn drag_overlay_origin(&self, ctx: &Ctx<'_>) -> Option<Point> {
        None
    }

    /// Paints the widget's drag overlay at the current drag position.
    fn drag_paint(&mut self, ctx: &mut PaintCtx<'_, '_>) {}
}

/// Base touch-down behavior: registers the pointer and fires edge hooks.
///
/// Inert widgets ignore the event and leave it to the widgets beneath them.
pub fn base_touch_down<W: Widget + ?Sized>(
    widget: &mut W,
    ctx: &mut Ctx<'_>,
    pointer: PointerId,
) -> bool {
    if !ctx.is_interactive() {
        return false;
    }
    let (first_press, first_drag) = ctx.record_touch_down(pointer);
    if first_press {
        widget.pressed(ctx);
    }
    if first_drag && widget.extra_drag_count() == 0 {
        widget.drag_started(ctx);
    }
    true
}

/// Base touch-up behavior: releases the pointer and fires edge hooks.
pub fn base_touch_up<W: Widget + ?Sized>(
    widget: &mut W,
    ctx: &mut Ctx<'_>,
    pointer: PointerId,
) -> bool {
    if !ctx.is_interactive() {
        return false;
    }
    match ctx.record_touch_up(pointer) {
        PointerLift::Pressing => {
            if ctx.pressing() == 0 {
                widget.released(ctx);
            }
            if ctx.dragging() + widget.extra_drag_count() == 0 {
                widget.drag_stopped(ctx);
            }
            true
        }
        PointerLift::DragOnly => {
            if ctx.dragging() + widget.extra_drag_count() == 0 {
                widget.drag_stopped(ctx);
            }
            true
        }
        PointerLift::Stray => false,
    }
}

/// Base drag behavior: a pressed interactive widget keeps its drags.
pub fn base_drag(ctx: &Ctx<'_>) -> bool {
    ctx.is_interactive() && ctx.is_pressed()
}

/// Base drag-in behavior: the pointer rejoins the pressed set.
pub fn base_drag_in<W: Widget + ?Sized>(widget: &mut W, ctx: &mut Ctx<'_>, pointer: PointerId) {
    if !ctx.is_interactive() {
        return;
    }
    if ctx.record_drag_in(pointer) {
        widget.pressed(ctx);
    }
}

/// Base drag-out behavior: the pointer leaves the pressed set but keeps
/// counting as a drag until it is lifted.
pub fn base_drag_out<W: Widget + ?Sized>(widget: &mut W, ctx: &mut Ctx<'_>, pointer: PointerId) {
    if !ctx.is_interactive() {
        return;
    }
    if ctx.record_drag_out(pointer) {
        widget.released(ctx);
    }
}
