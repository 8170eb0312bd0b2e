// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A plain container: groups children, optionally under a layout.

use bracken_stage::{Ctx, Stage, Widget, WidgetId};
use smallvec::SmallVec;

/// Positions the children of a container.
pub trait Layout {
    /// Assigns child origins (and, for wrap-content layouts, the container
    /// size) from the current child sizes.
    fn align(&self, stage: &mut Stage, container: WidgetId);
}

/// A widget that exists to hold children.
///
/// Without a layout it leaves child origins alone. With one, it realigns
/// whenever it or one of its children is resized; call
/// [`PlainContainer::realign`] after attaching or detaching children.
#[derive(Default)]
pub struct PlainContainer {
    layout: Option<Box<dyn Layout>>,
}

impl PlainContainer {
    /// Creates a container without a layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a container using the given layout.
    pub fn with_layout(layout: impl Layout + 'static) -> Self {
        Self {
            layout: Some(Box::new(layout)),
        }
    }

    /// Replaces the layout; pass `None` to stop managing child origins.
    pub fn set_layout(&mut self, layout: Option<Box<dyn Layout>>) {
        self.layout = layout;
    }

    /// The layout, if any.
    pub fn layout(&self) -> Option<&dyn Layout> {
        self.layout.as_deref()
    }

    /// Runs the layout over the container's current children.
    pub fn realign(&self, stage: &mut Stage, container: WidgetId) {
        if let Some(layout) = &self.layout {
            layout.align(stage, container);
        }
    }
}

impl Widget for PlainContainer {
    /// Later siblings paint on top of earlier ones, so they are probed first.
    fn hit_candidates(&self, ctx: &Ctx<'_>, _x: f64, _y: f64, out: &mut SmallVec<[WidgetId; 8]>) {
        out.extend(ctx.children().iter().rev().copied());
    }

    fn resized(&mut self, ctx: &mut Ctx<'_>) {
        let id = ctx.id();
        self.realign(ctx.stage(), id);
    }

    fn child_resized(&mut self, ctx: &mut Ctx<'_>, _child: WidgetId) {
        let id = ctx.id();
        self.realign(ctx.stage(), id);
    }
}

impl core::fmt::Debug for PlainContainer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PlainContainer")
            .field("has_layout", &self.layout.is_some())
            .finish()
    }
}
