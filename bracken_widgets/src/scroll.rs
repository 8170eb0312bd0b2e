// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kinetic scrolling over a single content child.
//!
//! ## Overview
//!
//! [`ScrollState`] holds the scroll mechanics: clamped offsets, per-axis fling
//! velocities with linear deceleration, drag overshoot, and captured-pointer
//! bookkeeping. [`ScrollView`] wires it into the widget hooks; the pager
//! embeds the same state and layers paging on top.
//!
//! The content is the first child. Scrolling moves it to `(-scroll_x,
//! -scroll_y)`; offsets are clamped to `[0, content - viewport]` per axis,
//! collapsing to zero when the content fits.

use bracken_stage::{Ctx, PaintCtx, PointerId, Widget, WidgetId};
use kurbo::Point;

/// Default deceleration factor, in viewport extents per second squared.
pub const DEFAULT_ACCELERATION: f64 = 2.5;

/// Clamps a scroll offset to the scrollable range.
fn trim(value: f64, viewport: f64, content: f64) -> f64 {
    if value < 0.0 {
        return 0.0;
    }
    let max = content - viewport;
    if max > 0.0 { value.min(max) } else { 0.0 }
}

/// Scroll mechanics shared by [`ScrollView`] and the pager.
#[derive(Debug)]
pub struct ScrollState {
    scroll_x: f64,
    scroll_y: f64,
    velocity_x: f64,
    velocity_y: f64,
    acceleration_x: f64,
    acceleration_y: f64,
    overshoot_x: f64,
    overshoot_y: f64,
    captured_bits: u32,
    captured: u32,
}

impl ScrollState {
    pub(crate) fn new() -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            velocity_x: 0.0,
            velocity_y: 0.0,
            acceleration_x: DEFAULT_ACCELERATION,
            acceleration_y: DEFAULT_ACCELERATION,
            overshoot_x: 0.0,
            overshoot_y: 0.0,
            captured_bits: 0,
            captured: 0,
        }
    }

    pub(crate) fn content(ctx: &Ctx<'_>) -> Option<WidgetId> {
        ctx.children().first().copied()
    }

    pub(crate) fn scroll_x(&self) -> f64 {
        self.scroll_x
    }

    pub(crate) fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub(crate) fn velocities(&self) -> (f64, f64) {
        (self.velocity_x, self.velocity_y)
    }

    pub(crate) fn captured(&self) -> u32 {
        self.captured
    }

    pub(crate) fn set_acceleration_x(&mut self, acceleration: f64) {
        assert!(acceleration > 0.0, "scroll acceleration must be positive");
        self.acceleration_x = acceleration;
    }

    pub(crate) fn set_acceleration_y(&mut self, acceleration: f64) {
        assert!(acceleration > 0.0, "scroll acceleration must be positive");
        self.acceleration_y = acceleration;
    }

    /// Whether a pointer is dragging directly or by capture.
    pub(crate) fn is_dragged(&self, ctx: &Ctx<'_>) -> bool {
        ctx.dragging() + self.captured > 0
    }

    /// Clamps the offsets and moves the content accordingly.
    pub(crate) fn update_position(&mut self, ctx: &mut Ctx<'_>) {
        let Some(content) = Self::content(ctx) else {
            return;
        };
        let viewport = ctx.size();
        let Some(content_size) = ctx.stage().size(content) else {
            return;
        };
        self.scroll_x = trim(self.scroll_x, viewport.width, content_size.width);
        self.scroll_y = trim(self.scroll_y, viewport.height, content_size.height);
        ctx.stage()
            .set_origin(content, Point::new(-self.scroll_x, -self.scroll_y));
    }

    pub(crate) fn set_scroll_x(&mut self, ctx: &mut Ctx<'_>, value: f64) {
        self.velocity_x = 0.0;
        self.scroll_x = value;
        self.update_position(ctx);
    }

    pub(crate) fn set_scroll_y(&mut self, ctx: &mut Ctx<'_>, value: f64) {
        self.velocity_y = 0.0;
        self.scroll_y = value;
        self.update_position(ctx);
    }

    /// One animation step: decelerate, advance, clamp, and stay dirty while
    /// still in motion.
    pub(crate) fn step(&mut self, ctx: &mut Ctx<'_>, delay: f64) {
        if self.is_dragged(ctx) {
            return;
        }
        let viewport = ctx.size();
        let mut do_scroll = false;
        if self.velocity_x != 0.0 {
            let decel = viewport.width * self.acceleration_x * delay;
            let next = self.velocity_x - self.velocity_x.signum() * decel;
            if next.signum() != self.velocity_x.signum() {
                self.velocity_x = 0.0;
            } else {
                self.velocity_x = next;
                do_scroll = true;
            }
        }
        if self.velocity_y != 0.0 {
            let decel = viewport.height * self.acceleration_y * delay;
            let next = self.velocity_y - self.velocity_y.signum() * decel;
            if next.signum() != self.velocity_y.signum() {
                self.velocity_y = 0.0;
            } else {
                self.velocity_y = next;
                do_scroll = true;
            }
        }
        if do_scroll {
            let before = (self.scroll_x, self.scroll_y);
            self.scroll_x -= self.velocity_x * delay;
            self.scroll_y -= self.velocity_y * delay;
            self.update_position(ctx);
            // An axis pinned at a boundary sheds its velocity.
            if self.scroll_x == before.0 {
                self.velocity_x = 0.0;
            }
            if self.scroll_y == before.1 {
                self.velocity_y = 0.0;
            }
            ctx.make_dirty();
        }
    }

    /// Follows a drag, accumulating overshoot past the boundaries so the
    /// content sticks to the finger on the way back.
    pub(crate) fn handle_drag(&mut self, ctx: &mut Ctx<'_>, dx: f64, dy: f64) -> bool {
        let desired_x = self.scroll_x - dx + self.overshoot_x;
        let desired_y = self.scroll_y - dy + self.overshoot_y;
        self.scroll_x = desired_x;
        self.scroll_y = desired_y;
        self.update_position(ctx);
        self.overshoot_x = desired_x - self.scroll_x;
        self.overshoot_y = desired_y - self.scroll_y;
        ctx.make_dirty();
        true
    }

    pub(crate) fn handle_fling(&mut self, ctx: &mut Ctx<'_>, vx: f64, vy: f64) -> bool {
        self.velocity_x = vx;
        self.velocity_y = vy;
        ctx.make_dirty();
        true
    }

    /// Records a captured pointer; returns whether it is the first drag
    /// overall (own and captured).
    pub(crate) fn capture(&mut self, ctx: &Ctx<'_>, pointer: PointerId) -> bool {
        let bit = 1_u32 << (pointer.0 & 31);
        if self.captured_bits & bit != 0 {
            return false;
        }
        self.captured_bits |= bit;
        self.captured += 1;
        ctx.dragging() + self.captured == 1
    }

    /// Releases a captured pointer; returns whether no drag remains.
    pub(crate) fn release_capture(&mut self, ctx: &Ctx<'_>, pointer: PointerId) -> bool {
        let bit = 1_u32 << (pointer.0 & 31);
        if self.captured_bits & bit == 0 {
            return false;
        }
        self.captured_bits &= !bit;
        self.captured -= 1;
        ctx.dragging() + self.captured == 0
    }

    pub(crate) fn stop_drag(&mut self) {
        self.overshoot_x = 0.0;
        self.overshoot_y = 0.0;
    }
}

/// A viewport over one larger content child.
///
/// Drags anywhere inside (including drags escalated from non-consuming
/// descendants) pan the content; a fling keeps it moving with linear
/// deceleration. Painting clips to the view's bounds.
#[derive(Debug)]
pub struct ScrollView {
    state: ScrollState,
}

impl ScrollView {
    /// Creates a scroll view; attach the content as its first child.
    pub fn new() -> Self {
        Self {
            state: ScrollState::new(),
        }
    }

    /// Horizontal scroll offset.
    pub fn scroll_x(&self) -> f64 {
        self.state.scroll_x()
    }

    /// Vertical scroll offset.
    pub fn scroll_y(&self) -> f64 {
        self.state.scroll_y()
    }

    /// Sets the horizontal offset (clamped) and stops horizontal motion.
    pub fn set_scroll_x(&mut self, ctx: &mut Ctx<'_>, value: f64) {
        self.state.set_scroll_x(ctx, value);
    }

    /// Sets the vertical offset (clamped) and stops vertical motion.
    pub fn set_scroll_y(&mut self, ctx: &mut Ctx<'_>, value: f64) {
        self.state.set_scroll_y(ctx, value);
    }

    /// Sets the horizontal deceleration factor.
    ///
    /// # Panics
    ///
    /// Panics unless the factor is strictly positive.
    pub fn set_acceleration_x(&mut self, acceleration: f64) {
        self.state.set_acceleration_x(acceleration);
    }

    /// Sets the vertical deceleration factor.
    ///
    /// # Panics
    ///
    /// Panics unless the factor is strictly positive.
    pub fn set_acceleration_y(&mut self, acceleration: f64) {
        self.state.set_acceleration_y(acceleration);
    }

    /// Whether a pointer is panning the view right now.
    pub fn is_dragged(&self, ctx: &Ctx<'_>) -> bool {
        self.state.is_dragged(ctx)
    }
}

impl Default for ScrollView {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for ScrollView {
    fn wants_interactive(&self) -> bool {
        true
    }

    fn extra_drag_count(&self) -> u32 {
        self.state.captured()
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
        self.state.handle_drag(ctx, dx, dy)
    }

    fn on_fling(
        &mut self,
        ctx: &mut Ctx<'_>,
        _x: f64,
        _y: f64,
        vx: f64,
        vy: f64,
        _pointer: PointerId,
    ) -> bool {
        self.state.handle_fling(ctx, vx, vy)
    }

    fn on_drag_received(&mut self, ctx: &mut Ctx<'_>, pointer: PointerId) -> bool {
        if self.state.capture(ctx, pointer) {
            self.drag_started(ctx);
        }
        true
    }

    fn on_drag_capture_stopped(&mut self, ctx: &mut Ctx<'_>, pointer: PointerId) {
        if self.state.release_capture(ctx, pointer) {
            self.drag_stopped(ctx);
        }
    }

    fn drag_stopped(&mut self, _ctx: &mut Ctx<'_>) {
        self.state.stop_drag();
    }

    fn step(&mut self, ctx: &mut Ctx<'_>, delay: f64) {
        self.state.step(ctx, delay);
    }

    fn resized(&mut self, ctx: &mut Ctx<'_>) {
        self.state.update_position(ctx);
        ctx.make_dirty();
    }

    fn child_resized(&mut self, ctx: &mut Ctx<'_>, _child: WidgetId) {
        self.state.update_position(ctx);
        ctx.make_dirty();
    }

    fn paint(&mut self, ctx: &mut PaintCtx<'_, '_>) {
        let bounds = ctx.bounds();
        if ctx.painter().push_clip(bounds) {
            ctx.paint_children();
            ctx.painter().pop_clip();
        }
    }
}
