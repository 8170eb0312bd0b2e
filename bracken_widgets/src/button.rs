// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Push button: consumes taps and fires click listeners.

use bracken_stage::{Ctx, Listeners, PointerId, Widget};

/// Listener invoked once per click.
pub type ClickListener = Box<dyn FnMut(&mut Ctx<'_>)>;

/// A tappable widget.
///
/// The press/release visual state is the shared pressing count
/// ([`Ctx::is_pressed`]); subclass-style customization happens by wrapping or
/// by registering listeners.
#[derive(Default)]
pub struct Button {
    click_listeners: Listeners<ClickListener>,
}

impl Button {
    /// Creates a button with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a click listener; a tagged add replaces in place.
    pub fn add_click_listener(&mut self, tag: Option<&'static str>, listener: ClickListener) {
        match tag {
            Some(tag) => self.click_listeners.insert(tag, listener),
            None => self.click_listeners.push(listener),
        }
    }

    /// Removes the click listener registered under `tag`.
    pub fn remove_click_listener(&mut self, tag: &'static str) -> bool {
        self.click_listeners.remove(tag).is_some()
    }

    fn click(&mut self, ctx: &mut Ctx<'_>) {
        let mut listeners = core::mem::take(&mut self.click_listeners);
        for listener in listeners.iter_mut() {
            listener(ctx);
        }
        self.click_listeners = listeners;
    }
}

impl Widget for Button {
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
        self.click(ctx);
        true
    }
}

impl core::fmt::Debug for Button {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Button")
            .field("click_listeners", &self.click_listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bracken_stage::Stage;
    use kurbo::Rect;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn tap_fires_every_click_listener() {
        let mut stage = Stage::new();
        let button = stage.insert(Button::new(), Rect::new(0.0, 0.0, 100.0, 40.0));
        let clicks = Rc::new(Cell::new(0));
        let (a, b) = (clicks.clone(), clicks.clone());
        stage
            .with_widget::<Button, _>(button, |w, ctx| {
                w.add_click_listener(None, Box::new(move |_| a.set(a.get() + 1)));
                w.add_click_listener(Some("again"), Box::new(move |_| b.set(b.get() + 10)));
                assert!(w.on_tap(ctx, 5.0, 5.0, 1, PointerId(0)));
            })
            .unwrap();
        assert_eq!(clicks.get(), 11);
    }

    #[test]
    fn tagged_listener_replaces_in_place() {
        let mut stage = Stage::new();
        let button = stage.insert(Button::new(), Rect::new(0.0, 0.0, 100.0, 40.0));
        let clicks = Rc::new(Cell::new(0));
        let (a, b) = (clicks.clone(), clicks.clone());
        stage
            .with_widget::<Button, _>(button, |w, ctx| {
                w.add_click_listener(Some("only"), Box::new(move |_| a.set(a.get() + 1)));
                w.add_click_listener(Some("only"), Box::new(move |_| b.set(b.get() + 100)));
                w.on_tap(ctx, 5.0, 5.0, 1, PointerId(0));
            })
            .unwrap();
        assert_eq!(clicks.get(), 100);
    }
}
