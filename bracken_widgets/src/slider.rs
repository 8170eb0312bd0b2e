// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slider: a draggable grip mapping a position to a value range.
//!
//! The grip travels along the main axis; the travel length is the widget's
//! main extent minus the grip length. Taps outside the grip glide it toward
//! the tapped point at a configurable speed.

use bracken_stage::{Ctx, Listeners, PointerId, Widget, base_touch_down, base_touch_up};

use crate::linear::Orientation;

/// Listener invoked with the slider's current value.
pub type ValueListener = Box<dyn FnMut(&mut Ctx<'_>, f64)>;

/// A value selector with a grip dragged along one axis.
pub struct Slider {
    min: f64,
    max: f64,
    grip_length: f64,
    position: f64,
    target: f64,
    speed: f64,
    overshoot: f64,
    orientation: Orientation,
    value_listeners: Listeners<ValueListener>,
}

impl Slider {
    /// Creates a slider over `[min, max]` with the grip at the minimum.
    pub fn new(orientation: Orientation, min: f64, max: f64, grip_length: f64) -> Self {
        Self {
            min,
            max,
            grip_length,
            position: 0.0,
            target: 0.0,
            speed: 1.0,
            overshoot: 0.0,
            orientation,
            value_listeners: Listeners::new(),
        }
    }

    /// Lower bound of the value range.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound of the value range.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Main-axis extent of the grip.
    pub fn grip_length(&self) -> f64 {
        self.grip_length
    }

    /// Main-axis offset of the grip's leading edge.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Glide speed for tap-to-seek, in travel lengths per second.
    ///
    /// # Panics
    ///
    /// Panics unless the speed is strictly positive.
    pub fn set_speed(&mut self, speed: f64) {
        assert!(speed > 0.0, "slider speed must be positive");
        self.speed = speed;
    }

    /// Registers a value listener; a tagged add replaces in place.
    pub fn add_value_listener(&mut self, tag: Option<&'static str>, listener: ValueListener) {
        match tag {
            Some(tag) => self.value_listeners.insert(tag, listener),
            None => self.value_listeners.push(listener),
        }
    }

    /// Distance the grip can travel.
    fn length(&self, ctx: &Ctx<'_>) -> f64 {
        self.orientation.main_of(ctx.size()) - self.grip_length
    }

    /// Current value, interpolated from the grip position.
    pub fn value(&self, ctx: &Ctx<'_>) -> f64 {
        let length = self.length(ctx);
        if length <= 0.0 {
            return self.min;
        }
        self.min + (self.max - self.min) * self.position / length
    }

    /// Moves the grip to the given value, without animation.
    pub fn set_value(&mut self, ctx: &mut Ctx<'_>, value: f64) {
        let span = self.max - self.min;
        let length = self.length(ctx);
        let position = if span == 0.0 {
            0.0
        } else {
            (value - self.min) / span * length
        };
        self.set_position(ctx, position);
        ctx.make_dirty();
    }

    /// Clamps and applies a grip position, then notifies value listeners.
    fn set_current_position(&mut self, ctx: &mut Ctx<'_>, position: f64) {
        let length = self.length(ctx);
        self.position = position.clamp(0.0, length.max(0.0));
        let value = self.value(ctx);
        let mut listeners = core::mem::take(&mut self.value_listeners);
        for listener in listeners.iter_mut() {
            listener(ctx, value);
        }
        self.value_listeners = listeners;
    }

    /// Starts a glide toward the given grip position.
    pub fn set_target_position(&mut self, ctx: &mut Ctx<'_>, position: f64) {
        let length = self.length(ctx);
        self.target = position.clamp(0.0, length.max(0.0));
    }

    /// Moves the grip and its glide target together.
    pub fn set_position(&mut self, ctx: &mut Ctx<'_>, position: f64) {
        self.set_current_position(ctx, position);
        self.target = self.position;
    }
}

impl Widget for Slider {
    fn wants_interactive(&self) -> bool {
        true
    }

    fn single_touch(&self) -> bool {
        true
    }

    fn on_touch_down(&mut self, ctx: &mut Ctx<'_>, x: f64, y: f64, pointer: PointerId) -> bool {
        base_touch_down(self, ctx, pointer);
        let main = self.orientation.main_of_point(kurbo::Point::new(x, y));
        let margin = ctx.hit_margin();
        // A press off the grip seeks toward it; a press on the grip only arms
        // the drag.
        if main < self.position - margin || main > self.position + self.grip_length + margin {
            self.set_target_position(ctx, main - self.grip_length / 2.0);
        }
        ctx.make_dirty();
        true
    }

    fn on_touch_up(&mut self, ctx: &mut Ctx<'_>, _x: f64, _y: f64, pointer: PointerId) -> bool {
        base_touch_up(self, ctx, pointer);
        self.target = self.position;
        if ctx.dragging() == 0 {
            self.overshoot = 0.0;
        }
        ctx.make_dirty();
        true
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
        let diff = self.orientation.main_of_point(kurbo::Point::new(dx, dy));
        let desired = self.position + diff + self.overshoot;
        if self.target == self.position {
            self.set_position(ctx, desired);
        } else {
            // Mid-glide, the drag shifts the target along with the grip.
            let target = self.target + diff;
            self.set_target_position(ctx, target);
            self.set_current_position(ctx, desired);
        }
        self.overshoot = desired - self.position;
        ctx.make_dirty();
        true
    }

    fn step(&mut self, ctx: &mut Ctx<'_>, delay: f64) {
        if self.position == self.target {
            return;
        }
        let travel = self.length(ctx).max(0.0) * self.speed * delay;
        let offset = self.target - self.position;
        let movement = travel.copysign(offset);
        let next = if movement.abs() >= offset.abs() {
            self.target
        } else {
            self.position + movement
        };
        self.set_current_position(ctx, next);
        ctx.make_dirty();
    }

    fn resized(&mut self, ctx: &mut Ctx<'_>) {
        let length = self.length(ctx).max(0.0);
        self.position = self.position.clamp(0.0, length);
        self.target = self.target.clamp(0.0, length);
        ctx.make_dirty();
    }
}

impl core::fmt::Debug for Slider {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Slider")
            .field("min", &self.min)
            .field("max", &self.max)
            .field("position", &self.position)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}
