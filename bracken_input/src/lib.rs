// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer input routing for the Bracken widget stage.
//!
//! ## Overview
//!
//! This crate turns raw screen-pixel pointer events into widget interactions
//! on a [`bracken_stage::Stage`]:
//!
//! - hit testing via a pick ray through a [`Viewport`],
//! - touch-down/up delivery with press and drag bookkeeping,
//! - tap recognition with per-widget multi-tap chains,
//! - fling recognition from the pointer's last motion,
//! - drag escalation up the ancestor chain, and
//! - hover (over/move/out) tracking for a mouse cursor.
//!
//! All timing is explicit: every entry point takes a monotonic timestamp in
//! nanoseconds, so embedders control the clock and tests never sleep.

mod pick;
mod router;
mod taps;

pub use pick::{OrthoViewport, PickRay, Viewport};
pub use router::{InputRouter, TAP_MAX_DRAG_CM, TAP_MAX_DURATION_NS};
pub use taps::MULTI_TAP_DELAY_NS;
