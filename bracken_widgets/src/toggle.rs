// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Toggle button: a two-state button flipped by taps.

use bracken_stage::{Ctx, Listeners, PointerId, Widget};

/// Listener invoked with the new checked state.
pub type CheckedListener = Box<dyn FnMut(&mut Ctx<'_>, bool)>;

/// A button holding a checked flag, flipped on every tap.
pub struct ToggleButton {
    checked: bool,
    change_listeners: Listeners<CheckedListener>,
}

impl ToggleButton {
    /// Creates a toggle starting in the given state.
    pub fn new(checked: bool) -> Self {
        Self {
            checked,
            change_listeners: Listeners::new(),
        }
    }

    /// Current state.
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Sets the state; listeners fire only on an actual change.
    pub fn set_checked(&mut self, ctx: &mut Ctx<'_>, checked: bool) {
        if self.checked == checked {
            return;
        }
        self.checked = checked;
        ctx.make_dirty();
        let mut listeners = core::mem::take(&mut self.change_listeners);
        for listener in listeners.iter_mut() {
            listener(ctx, checked);
        }
        self.change_listeners = listeners;
    }

    /// Registers a change listener; a tagged add replaces in place.
    pub fn add_change_listener(&mut self, tag: Option<&'static str>, listener: CheckedListener) {
        match tag {
            Some(tag) => self.change_listeners.insert(tag, listener),
            None => self.change_listeners.push(listener),
        }
    }
}

impl Widget for ToggleButton {
    fn wants_interactive(&self) -> bool {
        true
    }

    fn single_touch(&self) -> bool {
        true
    }

    fn on_tap(
        &mut self,
        ctx: &mut Ctx<'_>,
        _x: f64,
        _y: f64,
        _count: u32,
        _pointer: PointerId,
    ) -> bool {
        let next = !self.checked;
        self.set_checked(ctx, next);
        true
    }
}

impl core::fmt::Debug for ToggleButton {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ToggleButton")
            .field("checked", &self.checked)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bracken_stage::Stage;
    use kurbo::Rect;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn taps_flip_state_and_notify() {
        let mut stage = Stage::new();
        let toggle = stage.insert(ToggleButton::new(false), Rect::new(0.0, 0.0, 60.0, 30.0));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        stage
            .with_widget::<ToggleButton, _>(toggle, |w, ctx| {
                w.add_change_listener(None, Box::new(move |_, on| sink.borrow_mut().push(on)));
                w.on_tap(ctx, 1.0, 1.0, 1, PointerId(0));
                w.on_tap(ctx, 1.0, 1.0, 1, PointerId(0));
                assert!(!w.is_checked());
            })
            .unwrap();
        assert_eq!(&*seen.borrow(), &[true, false]);
    }

    #[test]
    fn redundant_set_checked_is_silent() {
        let mut stage = Stage::new();
        let toggle = stage.insert(ToggleButton::new(true), Rect::new(0.0, 0.0, 60.0, 30.0));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        stage
            .with_widget::<ToggleButton, _>(toggle, |w, ctx| {
                w.add_change_listener(None, Box::new(move |_, on| sink.borrow_mut().push(on)));
                w.set_checked(ctx, true);
            })
            .unwrap();
        assert!(seen.borrow().is_empty());
    }
}
