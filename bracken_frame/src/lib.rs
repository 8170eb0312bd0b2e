// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The outermost layer of a Bracken interface.
//!
//! A [`Frame`] owns a [`bracken_stage::Stage`], an input router, and the
//! demand-driven render loop: the embedder forwards raw pointer events,
//! calls [`Frame::render`] once per display frame, and may stop rendering
//! whenever `render` reports that the interface is at rest.

mod dirty;
mod frame;

pub use dirty::DirtyTracker;
pub use frame::{Frame, LifecycleEvent, LifecycleListener};
