// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Switches: a grip dragged between two end positions.
//!
//! ## Overview
//!
//! [`Switch`] toggles when the grip reaches an end and stays there; released
//! mid-travel it glides to the nearer end. [`ReturningSwitch`] is momentary:
//! it always springs back to its rest position once released.
//!
//! Internally the on state sits at position zero and the off state at the far
//! end of the travel. A reversed switch swaps the reported states, not the
//! geometry. State listeners fire exactly once per logical transition, no
//! matter how the grip got there.

use bracken_stage::{Ctx, Error, Listeners, PointerId, Result, Stage, Widget, WidgetId};
use kurbo::{Point, Rect};

use crate::linear::Orientation;

/// Listener invoked with the switch's new logical state.
pub type SwitchListener = Box<dyn FnMut(&mut Ctx<'_>, bool)>;

/// Default acceleration, in travel lengths per second squared.
const DEFAULT_ACCELERATION: f64 = 2.5;

/// Grip mechanics shared by [`Switch`] and [`ReturningSwitch`].
struct SwitchState {
    orientation: Orientation,
    reversed: bool,
    grip_length: f64,
    length: f64,
    position: f64,
    target: f64,
    velocity: f64,
    acceleration: f64,
    overshoot: f64,
    on: bool,
    change_listeners: Listeners<SwitchListener>,
}

impl SwitchState {
    fn new(orientation: Orientation, grip_length: f64, start_on: bool, reversed: bool) -> Self {
        Self {
            orientation,
            reversed,
            grip_length,
            length: 0.0,
            position: 0.0,
            target: 0.0,
            velocity: 0.0,
            acceleration: DEFAULT_ACCELERATION,
            overshoot: 0.0,
            on: start_on ^ reversed,
            change_listeners: Listeners::new(),
        }
    }

    /// Logical state, with the reversal applied.
    fn is_on(&self) -> bool {
        self.on ^ self.reversed
    }

    fn set_acceleration(&mut self, acceleration: f64) {
        assert!(acceleration > 0.0, "switch acceleration must be positive");
        self.acceleration = acceleration;
    }

    /// Recomputes the travel length from the widget's bounds.
    fn update_length(&mut self, ctx: &Ctx<'_>) {
        self.length = self.orientation.main_of(ctx.size()) - self.grip_length;
        if self.position > self.length {
            self.position = self.length;
        }
        if self.target > self.length {
            self.target = self.length;
        }
    }

    /// Snaps the grip to the end matching its internal state.
    fn settle_initial(&mut self, ctx: &Ctx<'_>) {
        self.update_length(ctx);
        if !self.on {
            self.position = self.length;
            self.target = self.length;
        }
    }

    fn fire(&mut self, ctx: &mut Ctx<'_>, on: bool) {
        let mut listeners = core::mem::take(&mut self.change_listeners);
        for listener in listeners.iter_mut() {
            listener(ctx, on);
        }
        self.change_listeners = listeners;
    }

    fn switched_on(&mut self, ctx: &mut Ctx<'_>) {
        if !self.on {
            self.on = true;
            let state = !self.reversed;
            self.fire(ctx, state);
        }
    }

    fn switched_off(&mut self, ctx: &mut Ctx<'_>) {
        if self.on {
            self.on = false;
            let state = self.reversed;
            self.fire(ctx, state);
        }
    }

    /// Clamps the grip to its travel, firing the state edge at either end.
    fn set_current_position(&mut self, ctx: &mut Ctx<'_>, position: f64) {
        if position <= 0.0 {
            self.position = 0.0;
            self.switched_on(ctx);
        } else if position >= self.length {
            self.position = self.length;
            self.switched_off(ctx);
        } else {
            self.position = position;
        }
    }

    fn set_target_position(&mut self, position: f64) {
        self.target = position.clamp(0.0, self.length.max(0.0));
    }

    fn handle_drag(&mut self, ctx: &mut Ctx<'_>, diff: f64) -> bool {
        let desired = self.position + diff + self.overshoot;
        self.set_current_position(ctx, desired);
        self.target = self.position;
        self.overshoot = desired - self.position;
        ctx.make_dirty();
        true
    }

    fn handle_fling(&mut self, ctx: &mut Ctx<'_>, velocity: f64) -> bool {
        self.velocity = velocity;
        ctx.make_dirty();
        true
    }

    fn stop_drag(&mut self, ctx: &mut Ctx<'_>) {
        self.overshoot = 0.0;
        ctx.make_dirty();
    }

    /// One animation step for a latching switch: glide to the target if one is
    /// pending, otherwise fall toward the nearer end.
    fn glide_step(&mut self, ctx: &mut Ctx<'_>, delay: f64) {
        if ctx.dragging() > 0 {
            return;
        }
        let accel = self.length * self.acceleration * delay;
        if self.position != self.target {
            self.velocity += if self.target > self.position { accel } else { -accel };
            let next = self.position + self.velocity * delay;
            self.set_current_position(ctx, next);
            ctx.make_dirty();
        } else if self.position > 0.0 && self.position < self.length {
            self.velocity += if self.position > self.length * 0.5 { accel } else { -accel };
            let next = self.position + self.velocity * delay;
            self.set_current_position(ctx, next);
            self.target = self.position;
            ctx.make_dirty();
        } else {
            self.velocity = 0.0;
        }
    }

    /// One animation step for a momentary switch: spring toward the rest end.
    fn return_step(&mut self, ctx: &mut Ctx<'_>, delay: f64) {
        if ctx.dragging() > 0 {
            return;
        }
        let accel = self.length * self.acceleration * delay;
        if self.reversed {
            // Rest position is zero; any spring-back from the far end starts
            // from a standstill.
            if self.position == self.length {
                self.velocity = 0.0;
            }
            if self.position > 0.0 {
                self.velocity -= accel;
                let next = self.position + self.velocity * delay;
                self.set_current_position(ctx, next);
                ctx.make_dirty();
            } else {
                self.velocity = 0.0;
            }
        } else {
            if self.position == 0.0 {
                self.velocity = 0.0;
            }
            if self.position < self.length {
                self.velocity += accel;
                let next = self.position + self.velocity * delay;
                self.set_current_position(ctx, next);
                ctx.make_dirty();
            } else {
                self.velocity = 0.0;
            }
        }
    }

    /// The active area is the grip, not the whole travel.
    fn inside_grip(&self, ctx: &Ctx<'_>, x: f64, y: f64) -> bool {
        let margin = ctx.hit_margin();
        let point = Point::new(x, y);
        let main = self.orientation.main_of_point(point);
        let cross = self.orientation.cross_of_point(point);
        let cross_extent = self.orientation.cross_of(ctx.size());
        main > self.position - margin
            && main < self.position + self.grip_length + margin
            && cross > -margin
            && cross < cross_extent + margin
    }
}

/// A two-state switch toggled by dragging its grip between the ends.
///
/// Released mid-travel, the grip glides to the nearer end. State listeners
/// fire when the grip reaches an end that changes the logical state.
pub struct Switch {
    state: SwitchState,
}

impl Switch {
    fn new(orientation: Orientation, grip_length: f64, start_on: bool, reversed: bool) -> Self {
        Self {
            state: SwitchState::new(orientation, grip_length, start_on, reversed),
        }
    }

    /// Inserts a switch and places the grip for its initial state.
    pub fn insert(
        stage: &mut Stage,
        bounds: Rect,
        orientation: Orientation,
        grip_length: f64,
        start_on: bool,
        reversed: bool,
    ) -> Result<WidgetId> {
        let id = stage.insert(Self::new(orientation, grip_length, start_on, reversed), bounds);
        stage.with_widget::<Self, _>(id, |w, ctx| w.state.settle_initial(ctx))?;
        Ok(id)
    }

    /// Logical state.
    pub fn is_on(&self) -> bool {
        self.state.is_on()
    }

    /// Main-axis offset of the grip's leading edge.
    pub fn position(&self) -> f64 {
        self.state.position
    }

    /// Main-axis extent of the grip.
    pub fn grip_length(&self) -> f64 {
        self.state.grip_length
    }

    /// Sets the glide acceleration, in travel lengths per second squared.
    ///
    /// # Panics
    ///
    /// Panics unless the acceleration is strictly positive.
    pub fn set_acceleration(&mut self, acceleration: f64) {
        self.state.set_acceleration(acceleration);
    }

    /// Registers a state listener; a tagged add replaces in place.
    pub fn add_change_listener(&mut self, tag: Option<&'static str>, listener: SwitchListener) {
        match tag {
            Some(tag) => self.state.change_listeners.insert(tag, listener),
            None => self.state.change_listeners.push(listener),
        }
    }

    /// Removes the state listener registered under `tag`.
    pub fn remove_change_listener(&mut self, tag: &'static str) -> bool {
        self.state.change_listeners.remove(tag).is_some()
    }

    /// Glides the grip to the given logical state at the next frame boundary.
    ///
    /// The state edge fires immediately when the task runs; the grip motion
    /// is cosmetic.
    pub fn set_on(&mut self, ctx: &mut Ctx<'_>, on: bool) {
        let id = ctx.id();
        ctx.post(Box::new(move |stage| {
            // The switch may be gone by the time the task runs.
            let _ = stage.with_widget::<Self, _>(id, |w, ctx| w.apply_set_on(ctx, on));
        }));
    }

    fn apply_set_on(&mut self, ctx: &mut Ctx<'_>, on: bool) {
        if on ^ self.state.reversed {
            self.state.switched_on(ctx);
            self.state.set_target_position(0.0);
        } else {
            self.state.switched_off(ctx);
            let length = self.state.length;
            self.state.set_target_position(length);
        }
        ctx.make_dirty();
    }
}

impl Widget for Switch {
    fn wants_interactive(&self) -> bool {
        true
    }

    fn single_touch(&self) -> bool {
        true
    }

    fn inside_active_area(&self, ctx: &Ctx<'_>, x: f64, y: f64) -> bool {
        self.state.inside_grip(ctx, x, y)
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
        let diff = self.state.orientation.main_of_point(Point::new(dx, dy));
        self.state.handle_drag(ctx, diff)
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
        let velocity = self.state.orientation.main_of_point(Point::new(vx, vy));
        self.state.handle_fling(ctx, velocity)
    }

    fn drag_stopped(&mut self, ctx: &mut Ctx<'_>) {
        self.state.stop_drag(ctx);
    }

    fn step(&mut self, ctx: &mut Ctx<'_>, delay: f64) {
        self.state.glide_step(ctx, delay);
    }

    fn resized(&mut self, ctx: &mut Ctx<'_>) {
        self.state.update_length(ctx);
        ctx.make_dirty();
    }
}

impl core::fmt::Debug for Switch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Switch")
            .field("on", &self.state.on)
            .field("position", &self.state.position)
            .field("target", &self.state.target)
            .finish_non_exhaustive()
    }
}

/// A momentary switch that springs back to its rest position when released.
///
/// It cannot be switched programmatically; the only way to actuate it is a
/// drag. Listeners fire on reaching the far end and again on the return.
pub struct ReturningSwitch {
    state: SwitchState,
}

impl ReturningSwitch {
    fn new(orientation: Orientation, grip_length: f64, reversed: bool) -> Self {
        Self {
            state: SwitchState::new(orientation, grip_length, false, reversed),
        }
    }

    /// Inserts a momentary switch with the grip at its rest position.
    pub fn insert(
        stage: &mut Stage,
        bounds: Rect,
        orientation: Orientation,
        grip_length: f64,
        reversed: bool,
    ) -> Result<WidgetId> {
        let id = stage.insert(Self::new(orientation, grip_length, reversed), bounds);
        stage.with_widget::<Self, _>(id, |w, ctx| w.state.settle_initial(ctx))?;
        Ok(id)
    }

    /// Logical state; true only while the grip is held at the far end.
    pub fn is_on(&self) -> bool {
        self.state.is_on()
    }

    /// Main-axis offset of the grip's leading edge.
    pub fn position(&self) -> f64 {
        self.state.position
    }

    /// Sets the spring acceleration, in travel lengths per second squared.
    ///
    /// # Panics
    ///
    /// Panics unless the acceleration is strictly positive.
    pub fn set_acceleration(&mut self, acceleration: f64) {
        self.state.set_acceleration(acceleration);
    }

    /// Registers a state listener; a tagged add replaces in place.
    pub fn add_change_listener(&mut self, tag: Option<&'static str>, listener: SwitchListener) {
        match tag {
            Some(tag) => self.state.change_listeners.insert(tag, listener),
            None => self.state.change_listeners.push(listener),
        }
    }

    /// Always fails: a momentary switch only responds to drags.
    pub fn set_on(&mut self, _on: bool) -> Result<()> {
        Err(Error::Unsupported(
            "returning switch cannot be switched programmatically",
        ))
    }
}

impl Widget for ReturningSwitch {
    fn wants_interactive(&self) -> bool {
        true
    }

    fn single_touch(&self) -> bool {
        true
    }

    fn inside_active_area(&self, ctx: &Ctx<'_>, x: f64, y: f64) -> bool {
        self.state.inside_grip(ctx, x, y)
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
        let diff = self.state.orientation.main_of_point(Point::new(dx, dy));
        self.state.handle_drag(ctx, diff)
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
        let velocity = self.state.orientation.main_of_point(Point::new(vx, vy));
        self.state.handle_fling(ctx, velocity)
    }

    fn drag_stopped(&mut self, ctx: &mut Ctx<'_>) {
        self.state.stop_drag(ctx);
    }

    fn step(&mut self, ctx: &mut Ctx<'_>, delay: f64) {
        self.state.return_step(ctx, delay);
    }

    fn resized(&mut self, ctx: &mut Ctx<'_>) {
        self.state.update_length(ctx);
        ctx.make_dirty();
    }
}

impl core::fmt::Debug for ReturningSwitch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReturningSwitch")
            .field("position", &self.state.position)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Horizontal switch, 120 wide with a 20 grip: travel length 100.
    const BOUNDS: Rect = Rect::new(0.0, 0.0, 120.0, 30.0);

    fn run_frames(stage: &mut Stage, id: WidgetId, max: usize) {
        let mut frames = 0;
        while !stage.take_pending_dirty().is_empty() && frames < max {
            stage
                .with_widget_dyn(id, |w, ctx| w.step(ctx, 1.0 / 60.0))
                .unwrap();
            frames += 1;
        }
        assert!(frames < max, "switch never settled");
    }

    fn listen(stage: &mut Stage, id: WidgetId) -> Rc<RefCell<Vec<bool>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        stage
            .with_widget::<Switch, _>(id, |w, _| {
                w.add_change_listener(None, Box::new(move |_, on| sink.borrow_mut().push(on)));
            })
            .unwrap();
        seen
    }

    #[test]
    fn insert_places_grip_for_initial_state() {
        let mut stage = Stage::new();
        let off = Switch::insert(
            &mut stage,
            BOUNDS,
            Orientation::Horizontal,
            20.0,
            false,
            false,
        )
        .unwrap();
        let on = Switch::insert(
            &mut stage,
            BOUNDS,
            Orientation::Horizontal,
            20.0,
            true,
            false,
        )
        .unwrap();
        stage
            .with_widget::<Switch, _>(off, |w, _| {
                assert_eq!(w.position(), 100.0);
                assert!(!w.is_on());
            })
            .unwrap();
        stage
            .with_widget::<Switch, _>(on, |w, _| {
                assert_eq!(w.position(), 0.0);
                assert!(w.is_on());
            })
            .unwrap();
    }

    #[test]
    fn drag_to_the_end_flips_and_notifies_once() {
        let mut stage = Stage::new();
        let switch = Switch::insert(
            &mut stage,
            BOUNDS,
            Orientation::Horizontal,
            20.0,
            false,
            false,
        )
        .unwrap();
        let seen = listen(&mut stage, switch);
        stage
            .with_widget::<Switch, _>(switch, |w, ctx| {
                assert!(w.on_touch_down(ctx, 110.0, 15.0, PointerId(0)));
                assert!(w.on_drag(ctx, 10.0, 15.0, -100.0, 0.0, PointerId(0)));
                assert_eq!(w.position(), 0.0);
                // Dragging further past the end is overshoot, not a new edge.
                w.on_drag(ctx, -10.0, 15.0, -20.0, 0.0, PointerId(0));
                assert_eq!(w.position(), 0.0);
                w.on_touch_up(ctx, -10.0, 15.0, PointerId(0));
                assert!(w.is_on());
            })
            .unwrap();
        assert_eq!(&*seen.borrow(), &[true]);
    }

    #[test]
    fn released_mid_travel_glides_to_the_nearer_end() {
        let mut stage = Stage::new();
        let switch = Switch::insert(
            &mut stage,
            BOUNDS,
            Orientation::Horizontal,
            20.0,
            true,
            false,
        )
        .unwrap();
        let seen = listen(&mut stage, switch);
        stage
            .with_widget::<Switch, _>(switch, |w, ctx| {
                w.on_touch_down(ctx, 10.0, 15.0, PointerId(0));
                w.on_drag(ctx, 50.0, 15.0, 40.0, 0.0, PointerId(0));
                assert_eq!(w.position(), 40.0);
                w.on_touch_up(ctx, 50.0, 15.0, PointerId(0));
            })
            .unwrap();
        run_frames(&mut stage, switch, 600);
        stage
            .with_widget::<Switch, _>(switch, |w, _| {
                assert_eq!(w.position(), 0.0);
                assert!(w.is_on());
            })
            .unwrap();
        // No edge fired: the grip came back to the side it started on.
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn released_past_halfway_falls_to_the_far_end() {
        let mut stage = Stage::new();
        let switch = Switch::insert(
            &mut stage,
            BOUNDS,
            Orientation::Horizontal,
            20.0,
            true,
            false,
        )
        .unwrap();
        let seen = listen(&mut stage, switch);
        stage
            .with_widget::<Switch, _>(switch, |w, ctx| {
                w.on_touch_down(ctx, 10.0, 15.0, PointerId(0));
                w.on_drag(ctx, 70.0, 15.0, 60.0, 0.0, PointerId(0));
                w.on_touch_up(ctx, 70.0, 15.0, PointerId(0));
            })
            .unwrap();
        run_frames(&mut stage, switch, 600);
        stage
            .with_widget::<Switch, _>(switch, |w, _| {
                assert_eq!(w.position(), 100.0);
                assert!(!w.is_on());
            })
            .unwrap();
        assert_eq!(&*seen.borrow(), &[false]);
    }

    #[test]
    fn set_on_defers_to_the_frame_boundary() {
        let mut stage = Stage::new();
        let switch = Switch::insert(
            &mut stage,
            BOUNDS,
            Orientation::Horizontal,
            20.0,
            false,
            false,
        )
        .unwrap();
        let seen = listen(&mut stage, switch);
        stage
            .with_widget::<Switch, _>(switch, |w, ctx| w.set_on(ctx, true))
            .unwrap();
        assert!(seen.borrow().is_empty());
        for task in stage.take_tasks() {
            task(&mut stage);
        }
        // The state edge fires when the task runs; the grip then glides.
        assert_eq!(&*seen.borrow(), &[true]);
        run_frames(&mut stage, switch, 600);
        stage
            .with_widget::<Switch, _>(switch, |w, _| {
                assert_eq!(w.position(), 0.0);
                assert!(w.is_on());
            })
            .unwrap();
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn reversed_switch_reports_logical_state() {
        let mut stage = Stage::new();
        let switch = Switch::insert(
            &mut stage,
            BOUNDS,
            Orientation::Horizontal,
            20.0,
            false,
            true,
        )
        .unwrap();
        let seen = listen(&mut stage, switch);
        stage
            .with_widget::<Switch, _>(switch, |w, ctx| {
                // Logically off, but the grip rests at zero when reversed.
                assert_eq!(w.position(), 0.0);
                assert!(!w.is_on());
                w.on_touch_down(ctx, 10.0, 15.0, PointerId(0));
                w.on_drag(ctx, 110.0, 15.0, 100.0, 0.0, PointerId(0));
                w.on_touch_up(ctx, 110.0, 15.0, PointerId(0));
                assert!(w.is_on());
            })
            .unwrap();
        assert_eq!(&*seen.borrow(), &[true]);
    }

    #[test]
    fn active_area_follows_the_grip() {
        let mut stage = Stage::new();
        let switch = Switch::insert(
            &mut stage,
            BOUNDS,
            Orientation::Horizontal,
            20.0,
            false,
            false,
        )
        .unwrap();
        stage.set_hit_margin(switch, 4.0);
        stage
            .with_widget::<Switch, _>(switch, |w, ctx| {
                // Grip at 100..120.
                assert!(w.inside_active_area(ctx, 110.0, 15.0));
                assert!(w.inside_active_area(ctx, 97.0, 15.0));
                assert!(!w.inside_active_area(ctx, 95.0, 15.0));
                assert!(!w.inside_active_area(ctx, 110.0, 35.0));
            })
            .unwrap();
    }

    #[test]
    fn returning_switch_springs_back() {
        let mut stage = Stage::new();
        let switch =
            ReturningSwitch::insert(&mut stage, BOUNDS, Orientation::Horizontal, 20.0, false)
                .unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        stage
            .with_widget::<ReturningSwitch, _>(switch, |w, ctx| {
                w.add_change_listener(None, Box::new(move |_, on| sink.borrow_mut().push(on)));
                assert_eq!(w.position(), 100.0);
                w.on_touch_down(ctx, 110.0, 15.0, PointerId(0));
                w.on_drag(ctx, 10.0, 15.0, -100.0, 0.0, PointerId(0));
                assert!(w.is_on());
                w.on_touch_up(ctx, 10.0, 15.0, PointerId(0));
            })
            .unwrap();
        run_frames(&mut stage, switch, 600);
        stage
            .with_widget::<ReturningSwitch, _>(switch, |w, _| {
                assert_eq!(w.position(), 100.0);
                assert!(!w.is_on());
            })
            .unwrap();
        assert_eq!(&*seen.borrow(), &[true, false]);
    }

    #[test]
    fn returning_switch_rejects_programmatic_switching() {
        let mut stage = Stage::new();
        let switch =
            ReturningSwitch::insert(&mut stage, BOUNDS, Orientation::Horizontal, 20.0, false)
                .unwrap();
        stage
            .with_widget::<ReturningSwitch, _>(switch, |w, _| {
                assert!(matches!(w.set_on(true), Err(Error::Unsupported(_))));
            })
            .unwrap();
    }
}
