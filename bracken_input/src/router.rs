// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer routing over a widget stage.
//!
//! ## Overview
//!
//! The router owns all transient pointer state: which widget each pointer went
//! down on, which widget currently receives its drags, hover tracking, and
//! per-widget tap chains. The embedder feeds it raw screen-pixel events plus a
//! monotonic nanosecond timestamp; the router picks into the stage, converts
//! to widget-local coordinates, and drives the widget handlers.
//!
//! Delivery order for every event is: the target's input listeners first, then
//! the widget's own handler, with the first consumer winning.
//!
//! ## Drag escalation
//!
//! A drag is first offered to the widget the pointer went down on. If that
//! widget declines, the router climbs the parent chain and offers the pointer
//! to each enabled ancestor via [`bracken_stage::Widget::on_drag_received`];
//! the first one to accept captures the pointer and receives all further drag
//! events, until it declines a later drag and the climb resumes from there.

use bracken_stage::{PointerEvent, PointerId, Stage, WidgetId};
use kurbo::Point;
use smallvec::SmallVec;

use crate::pick::Viewport;
use crate::taps::TapCounters;

/// Longest press that still counts as a tap.
pub const TAP_MAX_DURATION_NS: u64 = 333_333_333;

/// Largest per-axis travel, in physical centimeters, that still counts as a
/// tap.
pub const TAP_MAX_DRAG_CM: f64 = 0.5;

/// Depth of the canvas plane; every widget lives on it.
const CANVAS_PLANE_Z: f64 = 0.0;

#[derive(Copy, Clone, Debug)]
struct PointerRecord {
    pointer: PointerId,
    /// Widget the pointer went down on.
    widget: WidgetId,
    /// Widget currently receiving this pointer's drag events.
    receiver: WidgetId,
    start: Point,
    start_ns: u64,
    prev: Point,
    prev_ns: u64,
    last: Point,
    last_ns: u64,
    /// Whether the pointer is currently outside the widget's active area.
    outside: bool,
}

/// Routes screen-space pointer events into a [`Stage`].
#[derive(Debug)]
pub struct InputRouter<V> {
    viewport: V,
    records: Vec<PointerRecord>,
    taps: TapCounters,
    /// Widget holding the touch session while cross-widget multi-touch is off.
    current_control: Option<WidgetId>,
    hovered: Option<WidgetId>,
    cursor: Point,
    multi_touch: bool,
    cross_widget_multi_touch: bool,
}

impl<V: Viewport> InputRouter<V> {
    /// Creates a router over the given viewport.
    ///
    /// Multi-touch starts enabled; cross-widget multi-touch starts disabled,
    /// so simultaneous pointers must land on the same widget.
    pub fn new(viewport: V) -> Self {
        Self {
            viewport,
            records: Vec::new(),
            taps: TapCounters::default(),
            current_control: None,
            hovered: None,
            cursor: Point::ZERO,
            multi_touch: true,
            cross_widget_multi_touch: false,
        }
    }

    /// The viewport used for picking.
    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    /// Replaces the viewport; subsequent events pick through the new one,
    /// including moves of pointers already held.
    pub fn set_viewport(&mut self, viewport: V) {
        self.viewport = viewport;
    }

    /// Enables or disables additional pointers while one is down.
    pub fn set_multi_touch(&mut self, enabled: bool) {
        self.multi_touch = enabled;
    }

    /// Allows simultaneous pointers on different widgets.
    pub fn set_cross_widget_multi_touch(&mut self, enabled: bool) {
        self.cross_widget_multi_touch = enabled;
    }

    /// Number of pointers currently down.
    pub fn active_pointers(&self) -> usize {
        self.records.len()
    }

    /// Pointers currently held, in the order they went down.
    pub fn pointers(&self) -> impl Iterator<Item = PointerId> + '_ {
        self.records.iter().map(|r| r.pointer)
    }

    /// Widget the pointer went down on, while it is held.
    pub fn pointer_widget(&self, pointer: PointerId) -> Option<WidgetId> {
        self.record(pointer).map(|r| r.widget)
    }

    /// Widget currently receiving the pointer's drag events.
    pub fn drag_receiver(&self, pointer: PointerId) -> Option<WidgetId> {
        self.record(pointer).map(|r| r.receiver)
    }

    /// Last tracked canvas position of a held pointer.
    pub fn pointer_position(&self, pointer: PointerId) -> Option<Point> {
        self.record(pointer).map(|r| r.last)
    }

    /// Widget currently under the hover cursor.
    pub fn hovered(&self) -> Option<WidgetId> {
        self.hovered
    }

    /// Routes a pointer-down at a screen-pixel position.
    ///
    /// Hit testing walks the tree under `root` front to back, children before
    /// their container, and delivers to the first enabled widget whose active
    /// area contains the picked point and whose handler consumes the event.
    /// Returns whether any widget took the pointer.
    pub fn touch_down(
        &mut self,
        stage: &mut Stage,
        root: WidgetId,
        screen_x: f64,
        screen_y: f64,
        pointer: PointerId,
        now_ns: u64,
    ) -> bool {
        self.taps.clear_expired(now_ns);
        if !self.multi_touch && !self.records.is_empty() {
            return false;
        }
        if self.record(pointer).is_some() {
            log::warn!("pointer {pointer:?} went down twice without a lift");
            return false;
        }
        let Some(point) = self
            .viewport
            .picking_ray(screen_x, screen_y)
            .intersect_plane(CANVAS_PLANE_Z)
        else {
            return false;
        };
        let Some(root_origin) = stage.frame_origin(root) else {
            return false;
        };
        let local = point - root_origin.to_vec2();
        let Some(hit) = self.deliver_touch_down(stage, root, local, pointer) else {
            return false;
        };
        log::trace!("pointer {pointer:?} down on {hit:?} at {point:?}");
        self.records.push(PointerRecord {
            pointer,
            widget: hit,
            receiver: hit,
            start: point,
            start_ns: now_ns,
            prev: point,
            prev_ns: now_ns,
            last: point,
            last_ns: now_ns,
            outside: false,
        });
        self.current_control = Some(hit);
        true
    }

    fn deliver_touch_down(
        &mut self,
        stage: &mut Stage,
        id: WidgetId,
        local: Point,
        pointer: PointerId,
    ) -> Option<WidgetId> {
        if !stage.is_enabled(id) {
            return None;
        }
        let inside = stage
            .with_widget_dyn(id, |w, ctx| w.inside_active_area(ctx, local.x, local.y))
            .unwrap_or(false);
        if !inside {
            return None;
        }
        let mut candidates: SmallVec<[WidgetId; 8]> = SmallVec::new();
        let _ = stage.with_widget_dyn(id, |w, ctx| {
            w.hit_candidates(ctx, local.x, local.y, &mut candidates);
        });
        for child in candidates {
            let Some(rel) = stage.origin(child) else {
                continue;
            };
            let child_local = local - rel.to_vec2();
            if let Some(hit) = self.deliver_touch_down(stage, child, child_local, pointer) {
                return Some(hit);
            }
        }
        let admitted = self.cross_widget_multi_touch
            || self.current_control.is_none()
            || self.current_control == Some(id);
        if !admitted {
            return None;
        }
        let single_touch = stage
            .with_widget_dyn(id, |w, _| w.single_touch())
            .unwrap_or(false);
        if single_touch && self.records.iter().any(|r| r.widget == id) {
            return None;
        }
        send_touch_down(stage, id, local, pointer).then_some(id)
    }

    /// Routes a pointer lift: touch-up delivery, then tap and fling
    /// recognition. Returns whether the touch-up itself was consumed.
    pub fn touch_up(
        &mut self,
        stage: &mut Stage,
        screen_x: f64,
        screen_y: f64,
        pointer: PointerId,
        now_ns: u64,
    ) -> bool {
        let Some(idx) = self.records.iter().position(|r| r.pointer == pointer) else {
            return false;
        };
        let record = self.records.remove(idx);
        let mut handled = false;
        if stage.is_enabled(record.widget) {
            let point = self
                .viewport
                .picking_ray(screen_x, screen_y)
                .intersect_plane(CANVAS_PLANE_Z)
                .unwrap_or(record.last);
            handled = send_lift(stage, &record, point, pointer);
            self.recognize_tap(stage, &record, point, pointer, now_ns, handled);
            recognize_fling(stage, &record, pointer);
        }
        if self.records.is_empty() {
            self.current_control = None;
        }
        handled
    }

    fn recognize_tap(
        &mut self,
        stage: &mut Stage,
        record: &PointerRecord,
        point: Point,
        pointer: PointerId,
        now_ns: u64,
        touch_up_handled: bool,
    ) {
        if record.start_ns + TAP_MAX_DURATION_NS < now_ns {
            return;
        }
        let slop = TAP_MAX_DRAG_CM * self.viewport.units_per_centimeter();
        if (record.last.x - record.start.x).abs() > slop
            || (record.last.y - record.start.y).abs() > slop
        {
            return;
        }
        // Touches still held on the same widget after this lift; a multi-tap
        // chain only continues while this number repeats.
        let touches = self.records.iter().filter(|r| r.widget == record.widget).count();
        let touches = u32::try_from(touches).unwrap_or(u32::MAX);
        let count = self.taps.count_tap(record.widget, touches, now_ns);
        let Some(origin) = stage.frame_origin(record.widget) else {
            return;
        };
        let local = point - origin.to_vec2();
        let tap_handled = if touch_up_handled {
            send_tap(stage, record.widget, local, count, pointer)
        } else {
            propagate_tap(stage, record.widget, local, count, pointer)
        };
        // A consumed tap is used up; the next one starts a fresh chain.
        if tap_handled {
            self.taps.reset(record.widget);
        }
    }

    /// Routes a pointer move while the pointer is held.
    ///
    /// The original widget sees drag-in/drag-out transitions as the pointer
    /// crosses its active-area boundary; the drag itself goes to the current
    /// receiver, escalating to ancestors when declined. Returns whether the
    /// drag was consumed by anyone.
    pub fn touch_dragged(
        &mut self,
        stage: &mut Stage,
        screen_x: f64,
        screen_y: f64,
        pointer: PointerId,
        now_ns: u64,
    ) -> bool {
        let Some(idx) = self.records.iter().position(|r| r.pointer == pointer) else {
            return false;
        };
        let Some(point) = self
            .viewport
            .picking_ray(screen_x, screen_y)
            .intersect_plane(CANVAS_PLANE_Z)
        else {
            return false;
        };
        let (dx, dy) = {
            let record = &mut self.records[idx];
            let dx = point.x - record.last.x;
            let dy = point.y - record.last.y;
            record.prev = record.last;
            record.prev_ns = record.last_ns;
            record.last = point;
            record.last_ns = now_ns;
            (dx, dy)
        };
        let record = self.records[idx];
        if record.widget == record.receiver && stage.is_enabled(record.widget) {
            if let Some(origin) = stage.frame_origin(record.widget) {
                let local = point - origin.to_vec2();
                let inside = stage
                    .with_widget_dyn(record.widget, |w, ctx| {
                        w.inside_active_area(ctx, local.x, local.y)
                    })
                    .unwrap_or(false);
                if inside && record.outside {
                    self.records[idx].outside = false;
                    send_drag_in(stage, record.widget, local, dx, dy, pointer);
                } else if !inside && !record.outside {
                    self.records[idx].outside = true;
                    send_drag_out(stage, record.widget, local, dx, dy, pointer);
                }
            }
        }
        self.propagate_drag(stage, idx, point, dx, dy, pointer)
    }

    fn propagate_drag(
        &mut self,
        stage: &mut Stage,
        idx: usize,
        point: Point,
        dx: f64,
        dy: f64,
        pointer: PointerId,
    ) -> bool {
        let receiver = self.records[idx].receiver;
        let original = self.records[idx].widget;
        let Some(origin) = stage.frame_origin(receiver) else {
            return false;
        };
        let local = point - origin.to_vec2();
        if stage.is_enabled(receiver) && send_drag(stage, receiver, local, dx, dy, pointer) {
            return true;
        }
        // The receiver declined; offer the pointer up the ancestor chain.
        let mut node = receiver;
        while let Some(parent) = stage.parent_of(node) {
            if stage.is_enabled(parent) {
                let captured = stage
                    .with_widget_dyn(parent, |w, ctx| w.on_drag_received(ctx, pointer))
                    .unwrap_or(false);
                if captured {
                    if receiver != original {
                        let _ = stage.with_widget_dyn(receiver, |w, ctx| {
                            w.on_drag_capture_stopped(ctx, pointer);
                        });
                    }
                    log::trace!("pointer {pointer:?} drag captured by {parent:?}");
                    self.records[idx].receiver = parent;
                    return self.propagate_drag(stage, idx, point, dx, dy, pointer);
                }
            }
            node = parent;
        }
        false
    }

    /// Routes a hover move, maintaining over/out transitions.
    ///
    /// The target is the deepest enabled widget under the cursor. Returns
    /// whether any widget is hovered.
    pub fn mouse_moved(
        &mut self,
        stage: &mut Stage,
        root: WidgetId,
        screen_x: f64,
        screen_y: f64,
    ) -> bool {
        let Some(point) = self
            .viewport
            .picking_ray(screen_x, screen_y)
            .intersect_plane(CANVAS_PLANE_Z)
        else {
            return false;
        };
        let dx = point.x - self.cursor.x;
        let dy = point.y - self.cursor.y;
        self.cursor = point;
        let target = stage
            .frame_origin(root)
            .and_then(|origin| find_hover_target(stage, root, point - origin.to_vec2()));
        if target != self.hovered {
            if let Some(old) = self.hovered {
                if let Some(origin) = stage.frame_origin(old) {
                    let local = point - origin.to_vec2();
                    send_mouse(stage, old, MouseKind::Out, local, dx, dy);
                }
            }
            if let Some(new) = target {
                if let Some(origin) = stage.frame_origin(new) {
                    let local = point - origin.to_vec2();
                    send_mouse(stage, new, MouseKind::Over, local, dx, dy);
                }
            }
            self.hovered = target;
        } else if let Some(id) = target {
            if let Some(origin) = stage.frame_origin(id) {
                let local = point - origin.to_vec2();
                send_mouse(stage, id, MouseKind::Move, local, dx, dy);
            }
        }
        target.is_some()
    }

    /// Lifts every held pointer in place and forgets all transient state.
    ///
    /// Called when the embedder pauses or loses its input source, so widget
    /// press/drag counters cannot be left dangling.
    pub fn clear_inputs(&mut self, stage: &mut Stage) {
        if !self.records.is_empty() {
            log::debug!("clearing {} held pointer(s)", self.records.len());
        }
        let records = core::mem::take(&mut self.records);
        for record in records {
            if stage.is_enabled(record.widget) {
                send_lift(stage, &record, record.last, record.pointer);
            }
        }
        self.taps.clear();
        self.current_control = None;
        self.hovered = None;
    }

    fn record(&self, pointer: PointerId) -> Option<&PointerRecord> {
        self.records.iter().find(|r| r.pointer == pointer)
    }
}

fn propagate_tap(
    stage: &mut Stage,
    widget: WidgetId,
    mut local: Point,
    count: u32,
    pointer: PointerId,
) -> bool {
    let mut node = widget;
    loop {
        if stage.is_enabled(node) && send_tap(stage, node, local, count, pointer) {
            return true;
        }
        let Some(rel) = stage.origin(node) else {
            return false;
        };
        let Some(parent) = stage.parent_of(node) else {
            return false;
        };
        local += rel.to_vec2();
        node = parent;
    }
}

/// Lifting a pointer that was still in motion turns the motion of its last
/// two samples into a fling, offered up the chain like an unconsumed tap.
fn recognize_fling(stage: &mut Stage, record: &PointerRecord, pointer: PointerId) {
    if record.last == record.prev {
        return;
    }
    let elapsed_ns = record.last_ns.saturating_sub(record.prev_ns).max(1);
    let elapsed = elapsed_ns as f64 / 1e9;
    let vx = (record.last.x - record.prev.x) / elapsed;
    let vy = (record.last.y - record.prev.y) / elapsed;
    let Some(origin) = stage.frame_origin(record.widget) else {
        return;
    };
    let mut local = record.last - origin.to_vec2();
    let mut node = record.widget;
    loop {
        if stage.is_enabled(node) && send_fling(stage, node, local, vx, vy, pointer) {
            return;
        }
        let Some(rel) = stage.origin(node) else {
            return;
        };
        let Some(parent) = stage.parent_of(node) else {
            return;
        };
        local += rel.to_vec2();
        node = parent;
    }
}

fn find_hover_target(stage: &mut Stage, id: WidgetId, local: Point) -> Option<WidgetId> {
    if !stage.is_enabled(id) {
        return None;
    }
    let inside = stage
        .with_widget_dyn(id, |w, ctx| w.inside_active_area(ctx, local.x, local.y))
        .unwrap_or(false);
    if !inside {
        return None;
    }
    let mut candidates: SmallVec<[WidgetId; 8]> = SmallVec::new();
    let _ = stage.with_widget_dyn(id, |w, ctx| {
        w.hit_candidates(ctx, local.x, local.y, &mut candidates);
    });
    for child in candidates {
        let Some(rel) = stage.origin(child) else {
            continue;
        };
        if let Some(hit) = find_hover_target(stage, child, local - rel.to_vec2()) {
            return Some(hit);
        }
    }
    Some(id)
}

// --- Event delivery: listeners first, then the widget's own handler ----------

fn send_touch_down(stage: &mut Stage, id: WidgetId, local: Point, pointer: PointerId) -> bool {
    let event = PointerEvent::Down {
        x: local.x,
        y: local.y,
        pointer,
    };
    if stage.run_input_listeners(id, &event) {
        return true;
    }
    stage
        .with_widget_dyn(id, |w, ctx| w.on_touch_down(ctx, local.x, local.y, pointer))
        .unwrap_or(false)
}

fn send_lift(stage: &mut Stage, record: &PointerRecord, point: Point, pointer: PointerId) -> bool {
    // A receiver still capturing this pointer's drags hears about the lift
    // before the widget itself does.
    if record.receiver != record.widget {
        let _ = stage.with_widget_dyn(record.receiver, |w, ctx| {
            w.on_drag_capture_stopped(ctx, pointer);
        });
    }
    let Some(origin) = stage.frame_origin(record.widget) else {
        return false;
    };
    let local = point - origin.to_vec2();
    let event = PointerEvent::Up {
        x: local.x,
        y: local.y,
        pointer,
    };
    if stage.run_input_listeners(record.widget, &event) {
        return true;
    }
    stage
        .with_widget_dyn(record.widget, |w, ctx| {
            w.on_touch_up(ctx, local.x, local.y, pointer)
        })
        .unwrap_or(false)
}

fn send_tap(stage: &mut Stage, id: WidgetId, local: Point, count: u32, pointer: PointerId) -> bool {
    let event = PointerEvent::Tap {
        x: local.x,
        y: local.y,
        count,
        pointer,
    };
    if stage.run_input_listeners(id, &event) {
        return true;
    }
    stage
        .with_widget_dyn(id, |w, ctx| w.on_tap(ctx, local.x, local.y, count, pointer))
        .unwrap_or(false)
}

fn send_fling(
    stage: &mut Stage,
    id: WidgetId,
    local: Point,
    vx: f64,
    vy: f64,
    pointer: PointerId,
) -> bool {
    let event = PointerEvent::Fling {
        x: local.x,
        y: local.y,
        vx,
        vy,
        pointer,
    };
    if stage.run_input_listeners(id, &event) {
        return true;
    }
    stage
        .with_widget_dyn(id, |w, ctx| w.on_fling(ctx, local.x, local.y, vx, vy, pointer))
        .unwrap_or(false)
}

fn send_drag(
    stage: &mut Stage,
    id: WidgetId,
    local: Point,
    dx: f64,
    dy: f64,
    pointer: PointerId,
) -> bool {
    let event = PointerEvent::Drag {
        x: local.x,
        y: local.y,
        dx,
        dy,
        pointer,
    };
    if stage.run_input_listeners(id, &event) {
        return true;
    }
    stage
        .with_widget_dyn(id, |w, ctx| {
            w.on_drag(ctx, local.x, local.y, dx, dy, pointer)
        })
        .unwrap_or(false)
}

fn send_drag_in(
    stage: &mut Stage,
    id: WidgetId,
    local: Point,
    dx: f64,
    dy: f64,
    pointer: PointerId,
) {
    let event = PointerEvent::DragIn {
        x: local.x,
        y: local.y,
        dx,
        dy,
        pointer,
    };
    if stage.run_input_listeners(id, &event) {
        return;
    }
    let _ = stage.with_widget_dyn(id, |w, ctx| {
        w.on_drag_in(ctx, local.x, local.y, dx, dy, pointer);
    });
}

fn send_drag_out(
    stage: &mut Stage,
    id: WidgetId,
    local: Point,
    dx: f64,
    dy: f64,
    pointer: PointerId,
) {
    let event = PointerEvent::DragOut {
        x: local.x,
        y: local.y,
        dx,
        dy,
        pointer,
    };
    if stage.run_input_listeners(id, &event) {
        return;
    }
    let _ = stage.with_widget_dyn(id, |w, ctx| {
        w.on_drag_out(ctx, local.x, local.y, dx, dy, pointer);
    });
}

#[derive(Copy, Clone)]
enum MouseKind {
    Move,
    Over,
    Out,
}

fn send_mouse(stage: &mut Stage, id: WidgetId, kind: MouseKind, local: Point, dx: f64, dy: f64) {
    let (x, y) = (local.x, local.y);
    let event = match kind {
        MouseKind::Move => PointerEvent::Move { x, y, dx, dy },
        MouseKind::Over => PointerEvent::Over { x, y, dx, dy },
        MouseKind::Out => PointerEvent::Out { x, y, dx, dy },
    };
    if stage.run_input_listeners(id, &event) {
        return;
    }
    let _ = stage.with_widget_dyn(id, |w, ctx| match kind {
        MouseKind::Move => {
            w.on_mouse_move(ctx, x, y, dx, dy);
        }
        MouseKind::Over => {
            w.on_mouse_over(ctx, x, y, dx, dy);
        }
        MouseKind::Out => {
            w.on_mouse_out(ctx, x, y, dx, dy);
        }
    });
}
