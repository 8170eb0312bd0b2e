// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer events delivered to per-widget input listeners.

use alloc::boxed::Box;

use crate::types::PointerId;

/// A resolved pointer event, in widget-local canvas coordinates.
///
/// Input listeners registered on a widget receive these before the widget's
/// own handler runs; the first listener returning `true` consumes the event.
#[derive(Copy, Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum PointerEvent {
    /// A pointer went down on the widget.
    Down {
        /// Widget-local x.
        x: f64,
        /// Widget-local y.
        y: f64,
        /// Pointer that went down.
        pointer: PointerId,
    },
    /// A pointer that went down on the widget was lifted.
    Up {
        /// Widget-local x.
        x: f64,
        /// Widget-local y.
        y: f64,
        /// Pointer that was lifted.
        pointer: PointerId,
    },
    /// A pointer moved while held.
    Drag {
        /// Receiver-local x.
        x: f64,
        /// Receiver-local y.
        y: f64,
        /// Movement since the last drag event.
        dx: f64,
        /// Movement since the last drag event.
        dy: f64,
        /// Dragging pointer.
        pointer: PointerId,
    },
    /// A dragging pointer re-entered the widget's active area.
    DragIn {
        /// Widget-local x.
        x: f64,
        /// Widget-local y.
        y: f64,
        /// Movement since the last drag event.
        dx: f64,
        /// Movement since the last drag event.
        dy: f64,
        /// Dragging pointer.
        pointer: PointerId,
    },
    /// A dragging pointer left the widget's active area.
    DragOut {
        /// Widget-local x.
        x: f64,
        /// Widget-local y.
        y: f64,
        /// Movement since the last drag event.
        dx: f64,
        /// Movement since the last drag event.
        dy: f64,
        /// Dragging pointer.
        pointer: PointerId,
    },
    /// The hover cursor moved within the widget.
    Move {
        /// Widget-local x.
        x: f64,
        /// Widget-local y.
        y: f64,
        /// Movement since the last hover event.
        dx: f64,
        /// Movement since the last hover event.
        dy: f64,
    },
    /// The hover cursor entered the widget.
    Over {
        /// Widget-local x.
        x: f64,
        /// Widget-local y.
        y: f64,
        /// Movement since the last hover event.
        dx: f64,
        /// Movement since the last hover event.
        dy: f64,
    },
    /// The hover cursor left the widget.
    Out {
        /// Widget-local x.
        x: f64,
        /// Widget-local y.
        y: f64,
        /// Movement since the last hover event.
        dx: f64,
        /// Movement since the last hover event.
        dy: f64,
    },
    /// A short, small-displacement press was recognized.
    Tap {
        /// Widget-local x.
        x: f64,
        /// Widget-local y.
        y: f64,
        /// Consecutive tap count within the multi-tap window.
        count: u32,
        /// Tapping pointer.
        pointer: PointerId,
    },
    /// The pointer was lifted while in motion.
    Fling {
        /// Widget-local x.
        x: f64,
        /// Widget-local y.
        y: f64,
        /// Velocity in canvas units per second.
        vx: f64,
        /// Velocity in canvas units per second.
        vy: f64,
        /// Flinging pointer.
        pointer: PointerId,
    },
}

/// Boxed input listener; returns `true` to consume the event.
pub type InputHandler = Box<dyn FnMut(&PointerEvent) -> bool>;
