// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A container stacking named layers, with one active at a time.

use bracken_stage::{Ctx, Error, Listeners, PaintCtx, Result, Widget, WidgetId};
use hashbrown::HashMap;
use smallvec::SmallVec;

/// Listener invoked as `(ctx, new_active, previous_active)`.
pub type LayerChangeListener =
    Box<dyn FnMut(&mut Ctx<'_>, Option<&'static str>, Option<&'static str>)>;

struct LayerEntry {
    widget: WidgetId,
    /// An opaque layer hides everything beneath it when it becomes active.
    opaque: bool,
}

/// Holds registered layers and a stack of currently visible ones.
///
/// Only the front (active) layer receives input; the rest of the visible
/// stack is painted beneath it. Activating an opaque layer drops the layers
/// it would cover from the visible stack.
pub struct LayerContainer {
    layers: HashMap<&'static str, LayerEntry>,
    /// Visible layers, front first.
    visible: Vec<&'static str>,
    change_listeners: Listeners<LayerChangeListener>,
}

impl LayerContainer {
    /// Creates an empty layer container.
    pub fn new() -> Self {
        Self {
            layers: HashMap::new(),
            visible: Vec::new(),
            change_listeners: Listeners::new(),
        }
    }

    /// Registers a layer under a name. The widget should already be attached
    /// as a child of this container; it starts hidden.
    pub fn add_layer(&mut self, ctx: &mut Ctx<'_>, name: &'static str, widget: WidgetId, opaque: bool) {
        ctx.stage().set_visible(widget, false);
        ctx.stage().set_enabled(widget, false);
        self.layers.insert(name, LayerEntry { widget, opaque });
    }

    /// Unregisters a layer and detaches its widget.
    pub fn remove_layer(&mut self, ctx: &mut Ctx<'_>, name: &'static str) -> Result<WidgetId> {
        let entry = self.layers.remove(name).ok_or(Error::NotFound)?;
        self.visible.retain(|n| *n != name);
        self.apply_visibility(ctx);
        ctx.stage().detach(entry.widget);
        Ok(entry.widget)
    }

    /// Makes `name` the active layer, pushing it onto the front of the
    /// visible stack. An opaque layer empties the rest of the stack.
    ///
    /// Change listeners run after the stack is updated.
    pub fn set_active_layer(&mut self, ctx: &mut Ctx<'_>, name: &'static str) -> Result<()> {
        let entry = self.layers.get(name).ok_or(Error::NotFound)?;
        let opaque = entry.opaque;
        let previous = self.active_layer();
        if previous == Some(name) {
            return Ok(());
        }
        self.visible.retain(|n| *n != name);
        if opaque {
            self.visible.clear();
        }
        self.visible.insert(0, name);
        self.apply_visibility(ctx);
        ctx.make_dirty();
        let mut listeners = core::mem::take(&mut self.change_listeners);
        for listener in listeners.iter_mut() {
            listener(ctx, Some(name), previous);
        }
        self.change_listeners = listeners;
        Ok(())
    }

    /// The active (front) layer, if any.
    pub fn active_layer(&self) -> Option<&'static str> {
        self.visible.first().copied()
    }

    /// The visible stack, front first.
    pub fn visible_layers(&self) -> &[&'static str] {
        &self.visible
    }

    /// Registers a change listener; a tagged add replaces in place.
    pub fn add_change_listener(&mut self, tag: Option<&'static str>, listener: LayerChangeListener) {
        match tag {
            Some(tag) => self.change_listeners.insert(tag, listener),
            None => self.change_listeners.push(listener),
        }
    }

    fn widget_of(&self, name: &'static str) -> Option<WidgetId> {
        self.layers.get(name).map(|e| e.widget)
    }

    fn apply_visibility(&self, ctx: &mut Ctx<'_>) {
        let active = self.active_layer();
        for (name, entry) in &self.layers {
            let shown = self.visible.contains(name);
            ctx.stage().set_visible(entry.widget, shown);
            ctx.stage().set_enabled(entry.widget, active == Some(*name));
        }
    }
}

impl Default for LayerContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for LayerContainer {
    /// Only the active layer takes part in hit testing.
    fn hit_candidates(&self, _ctx: &Ctx<'_>, _x: f64, _y: f64, out: &mut SmallVec<[WidgetId; 8]>) {
        if let Some(widget) = self.active_layer().and_then(|n| self.widget_of(n)) {
            out.push(widget);
        }
    }

    /// Paints the visible stack back to front, active layer last.
    fn paint(&mut self, ctx: &mut PaintCtx<'_, '_>) {
        for name in self.visible.iter().rev() {
            if let Some(widget) = self.widget_of(name) {
                ctx.paint_child(widget);
            }
        }
    }
}

impl core::fmt::Debug for LayerContainer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayerContainer")
            .field("layers", &self.layers.len())
            .field("visible", &self.visible)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bracken_stage::Stage;
    use kurbo::Rect;

    struct Pane;
    impl Widget for Pane {}

    fn setup() -> (Stage, WidgetId, WidgetId, WidgetId) {
        let mut stage = Stage::new();
        let container = stage.insert(LayerContainer::new(), Rect::new(0.0, 0.0, 400.0, 300.0));
        let base = stage.insert(Pane, Rect::new(0.0, 0.0, 400.0, 300.0));
        let overlay = stage.insert(Pane, Rect::new(50.0, 50.0, 350.0, 250.0));
        stage.attach(container, base).unwrap();
        stage.attach(container, overlay).unwrap();
        stage
            .with_widget::<LayerContainer, _>(container, |c, ctx| {
                c.add_layer(ctx, "base", base, true);
                c.add_layer(ctx, "overlay", overlay, false);
            })
            .unwrap();
        (stage, container, base, overlay)
    }

    #[test]
    fn activation_stacks_and_gates_input() {
        let (mut stage, container, base, overlay) = setup();
        stage
            .with_widget::<LayerContainer, _>(container, |c, ctx| {
                c.set_active_layer(ctx, "base").unwrap();
                assert_eq!(c.active_layer(), Some("base"));
                c.set_active_layer(ctx, "overlay").unwrap();
                assert_eq!(c.visible_layers(), &["overlay", "base"]);
            })
            .unwrap();
        assert!(stage.is_visible(base));
        assert!(!stage.is_enabled(base));
        assert!(stage.is_visible(overlay));
        assert!(stage.is_enabled(overlay));
    }

    #[test]
    fn opaque_layer_drops_covered_stack() {
        let (mut stage, container, base, overlay) = setup();
        stage
            .with_widget::<LayerContainer, _>(container, |c, ctx| {
                c.set_active_layer(ctx, "overlay").unwrap();
                c.set_active_layer(ctx, "base").unwrap();
                assert_eq!(c.visible_layers(), &["base"]);
            })
            .unwrap();
        assert!(!stage.is_visible(overlay));
        assert!(stage.is_enabled(base));
    }

    #[test]
    fn missing_layer_is_reported() {
        let (mut stage, container, _, _) = setup();
        let result = stage
            .with_widget::<LayerContainer, _>(container, |c, ctx| {
                c.set_active_layer(ctx, "nowhere")
            })
            .unwrap();
        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn change_listener_sees_old_and_new() {
        let (mut stage, container, _, _) = setup();
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = seen.clone();
        stage
            .with_widget::<LayerContainer, _>(container, |c, ctx| {
                c.add_change_listener(
                    None,
                    Box::new(move |_, new, old| sink.borrow_mut().push((new, old))),
                );
                c.set_active_layer(ctx, "base").unwrap();
                c.set_active_layer(ctx, "overlay").unwrap();
            })
            .unwrap();
        assert_eq!(
            &*seen.borrow(),
            &[(Some("base"), None), (Some("overlay"), Some("base"))]
        );
    }
}
