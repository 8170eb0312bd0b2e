// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bracken Stage: the widget arena at the heart of the Bracken UI toolkit.
//!
//! ## Overview
//!
//! The stage owns every widget of a user interface in a generational-id arena
//! and keeps the shared interaction state (geometry, enabled/visible flags,
//! pressed-pointer bookkeeping, per-widget input listeners) in per-slot node
//! records next to the widget payloads. Widget behavior lives behind the flat
//! [`Widget`] trait; containers are just widgets that override the child
//! enumeration and resize hooks.
//!
//! ## Handles
//!
//! [`WidgetId`] is a copyable `(index, generation)` handle. Removing a widget
//! bumps the slot generation, so stale handles fail liveness checks instead of
//! aliasing a new widget.
//!
//! ## Running widget code
//!
//! Handlers need mutable access to both their own widget and the rest of the
//! stage. [`Stage::with_widget`] temporarily vacates the widget's slot, hands
//! the handler a [`Ctx`] over the remaining stage, and restores the slot
//! afterwards. Hooks targeting a vacated slot (a widget whose own handler is
//! already on the stack) are skipped.
//!
//! ## Deferred work
//!
//! The stage carries the pending-dirty queue and a deferred task queue so
//! widget code can request a step-update or post work for the next frame
//! boundary without a reference to the frame driving it.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod ctx;
mod error;
mod event;
mod listeners;
mod paint;
mod stage;
mod types;
mod widget;

pub use ctx::Ctx;
pub use error::{Error, Result};
pub use event::{InputHandler, PointerEvent};
pub use listeners::Listeners;
pub use paint::{PaintCtx, Painter, Tint, drag_paint_widget, paint_widget};
pub use stage::{Stage, Task};
pub use types::{PointerId, WidgetFlags, WidgetId};
pub use widget::{
    PointerLift, Widget, base_drag, base_drag_in, base_drag_out, base_touch_down, base_touch_up,
};
