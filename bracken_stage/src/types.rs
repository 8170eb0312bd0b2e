// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the stage: widget identifiers, flags, and pointer ids.

/// Identifier for a widget in the stage (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct WidgetId(pub(crate) u32, pub(crate) u32);

impl WidgetId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Widget flags controlling input and paint participation.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct WidgetFlags: u8 {
        /// Widget receives input events and is considered during hit testing.
        const ENABLED     = 0b0000_0001;
        /// Widget (and its subtree) is painted.
        const VISIBLE     = 0b0000_0010;
        /// Widget tracks pressing/dragging pointers and consumes touch events.
        /// One-way latch: set via [`crate::Stage::make_interactive`], never cleared.
        const INTERACTIVE = 0b0000_0100;
    }
}

impl Default for WidgetFlags {
    fn default() -> Self {
        Self::ENABLED | Self::VISIBLE
    }
}

/// Host-assigned identifier of one touch point or mouse pointer.
///
/// Pointer indices are expected to be small (touch slots, mouse buttons);
/// indices of 32 and above alias in the pressed-pointer bitmask.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u32);

impl PointerId {
    /// Bit used for this pointer in a pressed-pointer bitmask.
    pub(crate) const fn bit(self) -> u32 {
        1 << (self.0 & 31)
    }
}
