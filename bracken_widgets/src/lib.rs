// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widgets built on the [`bracken_stage`] tree.
//!
//! ## Overview
//!
//! Containers ([`PlainContainer`], [`GridContainer`], [`LayerContainer`]) own
//! the layout of their children; [`LinearLayout`] is the workhorse layout for
//! rows and columns. Interactive widgets cover the common physical controls:
//! buttons and toggles, a kinetic [`ScrollView`], a page-snapping [`Pager`],
//! a [`Slider`], latching and momentary switches, and drag-and-drop via
//! [`DraggableItem`].
//!
//! Widgets here are logic only: they maintain geometry, animation state, and
//! listeners, and paint through the
//! [`Painter`](bracken_stage::Painter) abstraction without prescribing a
//! visual style.

mod button;
mod dragdrop;
mod grid;
mod layers;
mod linear;
mod pager;
mod plain;
mod scroll;
mod slider;
mod switch;
mod toggle;

pub use button::{Button, ClickListener};
pub use dragdrop::{DragDropListener, DragEvent, DraggableItem, find_drag_target};
pub use grid::GridContainer;
pub use layers::{LayerChangeListener, LayerContainer};
pub use linear::{CrossAlign, LinearLayout, MainAlign, Orientation, SpanAdjust};
pub use pager::{PageListener, Pager};
pub use plain::{Layout, PlainContainer};
pub use scroll::{DEFAULT_ACCELERATION, ScrollView};
pub use slider::{Slider, ValueListener};
pub use switch::{ReturningSwitch, Switch, SwitchListener};
pub use toggle::{CheckedListener, ToggleButton};
