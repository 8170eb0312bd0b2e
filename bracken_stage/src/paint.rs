// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Painting: the painter abstraction and the tree walk driving it.

use kurbo::{Point, Rect, Size};

use crate::stage::Stage;
use crate::types::WidgetId;

/// An RGBA color multiplier, unpremultiplied, each channel in `0.0..=1.0`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tint {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Tint {
    /// Opaque white; the identity tint.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    /// An opaque tint from RGB channels.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// The drawing backend widgets paint into.
///
/// Coordinates are frame-space canvas units; the embedder maps them to
/// pixels via its viewport.
pub trait Painter {
    /// Size of the drawable canvas.
    fn canvas_size(&self) -> Size;

    /// Pushes a clip rectangle, intersected with the current clip. Returns
    /// `false` if the intersection is empty; the caller then skips painting
    /// and does not pop.
    fn push_clip(&mut self, rect: Rect) -> bool;

    /// Pops the most recent clip rectangle.
    fn pop_clip(&mut self);

    /// Pushes an opacity layer multiplied into subsequent fills.
    fn push_opacity(&mut self, opacity: f32);

    /// Pops the most recent opacity layer.
    fn pop_opacity(&mut self);

    /// Fills a rectangle with a tint.
    fn fill_rect(&mut self, rect: Rect, tint: Tint);
}

/// Paint access for one widget: the painter plus the widget's frame origin.
pub struct PaintCtx<'a, 'p> {
    stage: &'a mut Stage,
    painter: &'p mut dyn Painter,
    id: WidgetId,
    origin: Point,
}

impl PaintCtx<'_, '_> {
    /// The widget being painted.
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// The widget's origin in frame coordinates.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// The widget's size.
    pub fn size(&self) -> Size {
        self.stage.size(self.id).unwrap_or_default()
    }

    /// The widget's bounds in frame coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.size())
    }

    /// Read access to the stage, for child geometry.
    pub fn stage(&self) -> &Stage {
        self.stage
    }

    /// The drawing backend.
    pub fn painter(&mut self) -> &mut dyn Painter {
        self.painter
    }

    /// Paints all children in insertion order.
    pub fn paint_children(&mut self) {
        let children = self.stage.children_of(self.id).to_vec();
        for child in children {
            self.paint_child(child);
        }
    }

    /// Paints one child.
    pub fn paint_child(&mut self, child: WidgetId) {
        let Some(rel) = self.stage.origin(child) else {
            return;
        };
        let origin = self.origin + rel.to_vec2();
        paint_widget(self.stage, self.painter, child, origin);
    }
}

/// Paints a widget subtree rooted at `id`, whose frame origin is `origin`.
///
/// Invisible widgets are skipped along with their whole subtree. Widgets whose
/// own handler is currently running are skipped silently.
pub fn paint_widget(stage: &mut Stage, painter: &mut dyn Painter, id: WidgetId, origin: Point) {
    if !stage.is_visible(id) {
        return;
    }
    let Some(mut widget) = stage.take_widget(id) else {
        return;
    };
    let mut ctx = PaintCtx {
        stage,
        painter,
        id,
        origin,
    };
    widget.paint(&mut ctx);
    stage.restore_widget(id, widget);
}

/// Paints a widget's drag overlay with its frame origin forced to `origin`.
///
/// Used by the frame to draw a dragged widget's ghost at its drag position,
/// on top of the regular tree.
pub fn drag_paint_widget(stage: &mut Stage, painter: &mut dyn Painter, id: WidgetId, origin: Point) {
    let Some(mut widget) = stage.take_widget(id) else {
        return;
    };
    let mut ctx = PaintCtx {
        stage,
        painter,
        id,
        origin,
    };
    widget.drag_paint(&mut ctx);
    stage.restore_widget(id, widget);
}

impl core::fmt::Debug for PaintCtx<'_, '_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PaintCtx")
            .field("id", &self.id)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}
