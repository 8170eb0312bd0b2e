// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag and drop: draggable items and the target search.
//!
//! ## Overview
//!
//! A [`DraggableItem`] follows the pointer as a ghost while its widget stays
//! put; the frame paints the ghost through
//! [`drag_paint`](bracken_stage::Widget::drag_paint). While dragged, the item
//! continuously searches the tree for a drop target willing to accept its
//! payload, notifying targets as the ghost moves over and off them. On
//! release the payload is offered to the hovered target, or the drag is
//! reported as aborted.
//!
//! The target search starts at the item's own container and widens outward:
//! within each container, candidates deeper in the tree are preferred over
//! the container itself, and the subtree the item came from is skipped.

use core::any::Any;

use bracken_stage::{Ctx, Listeners, PaintCtx, PointerId, Stage, Widget, WidgetId};
use kurbo::Point;
use smallvec::SmallVec;

/// Progress report of one drag gesture.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DragEvent {
    /// The item started following the pointer.
    Started,
    /// The item was released with no target under it.
    Aborted,
    /// The item was dropped on a target, at target-local coordinates.
    Dropped {
        /// The accepting widget.
        target: WidgetId,
        /// Drop point, relative to the target's frame origin.
        x: f64,
        /// Drop point, relative to the target's frame origin.
        y: f64,
    },
}

/// Listener invoked as a drag progresses.
pub type DragDropListener = Box<dyn FnMut(&mut Ctx<'_>, DragEvent)>;

/// Finds the widget that would accept `payload` dropped at `drop`.
///
/// `drop` is in frame coordinates. The search climbs from `origin`'s
/// container outward; within each container that contains the point, enabled
/// candidates are probed depth first (children before the candidate itself),
/// skipping `origin`'s own subtree. The first accepting widget wins.
pub fn find_drag_target(
    stage: &mut Stage,
    origin: WidgetId,
    payload: &dyn Any,
    drop: Point,
) -> Option<WidgetId> {
    let frame = stage.frame_origin(origin)?;
    climb(stage, origin, payload, drop - frame.to_vec2())
}

fn climb(
    stage: &mut Stage,
    origin: WidgetId,
    payload: &dyn Any,
    local: Point,
) -> Option<WidgetId> {
    let container = stage.parent_of(origin)?;
    let rel = stage.origin(origin)?;
    let point = local + rel.to_vec2();
    let inside = stage
        .with_widget_dyn(container, |w, ctx| {
            w.inside_active_area(ctx, point.x, point.y)
        })
        .unwrap_or(false);
    if inside {
        let mut candidates: SmallVec<[WidgetId; 8]> = SmallVec::new();
        stage.with_widget_dyn(container, |w, ctx| {
            w.hit_candidates(ctx, point.x, point.y, &mut candidates);
        });
        for child in candidates {
            if child == origin {
                continue;
            }
            let Some(rel) = stage.origin(child) else {
                continue;
            };
            if let Some(target) = probe(stage, child, payload, point - rel.to_vec2()) {
                return Some(target);
            }
        }
        if accepts(stage, container, payload) {
            return Some(container);
        }
    }
    climb(stage, container, payload, point)
}

/// Probes one subtree, children before the widget itself.
fn probe(
    stage: &mut Stage,
    id: WidgetId,
    payload: &dyn Any,
    local: Point,
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
    stage.with_widget_dyn(id, |w, ctx| {
        w.hit_candidates(ctx, local.x, local.y, &mut candidates);
    });
    for child in candidates {
        let Some(rel) = stage.origin(child) else {
            continue;
        };
        if let Some(target) = probe(stage, child, payload, local - rel.to_vec2()) {
            return Some(target);
        }
    }
    accepts(stage, id, payload).then_some(id)
}

fn accepts(stage: &mut Stage, id: WidgetId, payload: &dyn Any) -> bool {
    stage
        .with_widget_dyn(id, |w, _| w.accepts_drag(payload))
        .unwrap_or(false)
}

/// A widget that can be picked up and dropped on accepting targets.
///
/// The widget itself never moves; while dragged, a half-transparent ghost
/// follows the pointer and the drop point is the ghost's center.
pub struct DraggableItem {
    payload: Box<dyn Any>,
    drag_pos: Option<Point>,
    hover: Option<WidgetId>,
    drag_listeners: Listeners<DragDropListener>,
}

impl DraggableItem {
    /// Creates an item carrying the given payload.
    pub fn new(payload: Box<dyn Any>) -> Self {
        Self {
            payload,
            drag_pos: None,
            hover: None,
            drag_listeners: Listeners::new(),
        }
    }

    /// The carried payload.
    pub fn payload(&self) -> &dyn Any {
        self.payload.as_ref()
    }

    /// The ghost's frame origin while dragged.
    pub fn drag_position(&self) -> Option<Point> {
        self.drag_pos
    }

    /// Whether a target under the ghost would currently accept the payload.
    pub fn is_accepted(&self) -> bool {
        self.hover.is_some()
    }

    /// Registers a drag listener; a tagged add replaces in place.
    pub fn add_drag_listener(&mut self, tag: Option<&'static str>, listener: DragDropListener) {
        match tag {
            Some(tag) => self.drag_listeners.insert(tag, listener),
            None => self.drag_listeners.push(listener),
        }
    }

    fn fire(&mut self, ctx: &mut Ctx<'_>, event: DragEvent) {
        let mut listeners = core::mem::take(&mut self.drag_listeners);
        for listener in listeners.iter_mut() {
            listener(ctx, event);
        }
        self.drag_listeners = listeners;
    }

    /// The drop point is the ghost's center, in frame coordinates.
    fn drop_point(&self, ctx: &Ctx<'_>) -> Option<Point> {
        let pos = self.drag_pos?;
        Some(pos + ctx.size().to_vec2() * 0.5)
    }

    fn update_target(&mut self, ctx: &mut Ctx<'_>) {
        let Some(drop) = self.drop_point(ctx) else {
            return;
        };
        let id = ctx.id();
        let target = find_drag_target(ctx.stage(), id, self.payload.as_ref(), drop);
        if target != self.hover {
            if let Some(old) = self.hover {
                ctx.stage()
                    .with_widget_dyn(old, |w, c| w.on_drag_leave(c, self.payload.as_ref()));
            }
            self.hover = target;
            if let Some(new) = self.hover {
                ctx.stage()
                    .with_widget_dyn(new, |w, c| w.on_drag_over(c, self.payload.as_ref()));
            }
        }
    }
}

impl Widget for DraggableItem {
    fn wants_interactive(&self) -> bool {
        true
    }

    fn single_touch(&self) -> bool {
        true
    }

    fn drag_started(&mut self, ctx: &mut Ctx<'_>) {
        self.drag_pos = Some(ctx.frame_origin());
        self.fire(ctx, DragEvent::Started);
        self.update_target(ctx);
        ctx.make_dirty();
    }

    fn on_drag(
        &mut self,
        ctx: &mut Ctx<'_>,
        _x: f64,
        _y: f64,
        dx: f64,
        dy: f64,
        _pointer: PointerId,
    ) -> bool {
        if let Some(pos) = &mut self.drag_pos {
            pos.x += dx;
            pos.y += dy;
        }
        self.update_target(ctx);
        ctx.make_dirty();
        true
    }

    fn drag_stopped(&mut self, ctx: &mut Ctx<'_>) {
        if let Some(target) = self.hover.take() {
            let drop = self.drop_point(ctx).unwrap_or_default();
            let frame = ctx.stage_ref().frame_origin(target).unwrap_or_default();
            let local = drop - frame.to_vec2();
            self.fire(
                ctx,
                DragEvent::Dropped {
                    target,
                    x: local.x,
                    y: local.y,
                },
            );
            ctx.stage()
                .with_widget_dyn(target, |w, c| {
                    w.on_drop(c, self.payload.as_ref());
                });
        } else {
            self.fire(ctx, DragEvent::Aborted);
        }
        self.drag_pos = None;
        ctx.make_dirty();
    }

    fn drag_overlay_origin(&self, _ctx: &Ctx<'_>) -> Option<Point> {
        self.drag_pos
    }

    fn drag_paint(&mut self, ctx: &mut PaintCtx<'_, '_>) {
        ctx.painter().push_opacity(0.5);
        self.paint(ctx);
        ctx.painter().pop_opacity();
    }
}

impl core::fmt::Debug for DraggableItem {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DraggableItem")
            .field("drag_pos", &self.drag_pos)
            .field("hover", &self.hover)
            .finish_non_exhaustive()
    }
}
