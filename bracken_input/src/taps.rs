// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-widget multi-tap counting.

use bracken_stage::WidgetId;
use hashbrown::HashMap;

/// Window within which consecutive taps keep incrementing the count.
pub const MULTI_TAP_DELAY_NS: u64 = 1_000_000_000;

#[derive(Copy, Clone, Debug)]
struct TapEntry {
    count: u32,
    last_tap_ns: u64,
    touches: u32,
}

/// Tracks consecutive taps per widget.
///
/// A tap chains onto the previous one when it lands within the multi-tap
/// window and involves the same number of simultaneous touches; otherwise the
/// count restarts at one.
#[derive(Debug, Default)]
pub(crate) struct TapCounters {
    entries: HashMap<WidgetId, TapEntry>,
}

impl TapCounters {
    /// Counts a tap on `widget` and returns the new consecutive count.
    pub(crate) fn count_tap(&mut self, widget: WidgetId, touches: u32, now_ns: u64) -> u32 {
        let entry = self.entries.entry(widget).or_insert(TapEntry {
            count: 0,
            last_tap_ns: 0,
            touches,
        });
        if entry.count > 0
            && entry.last_tap_ns + MULTI_TAP_DELAY_NS >= now_ns
            && entry.touches == touches
        {
            entry.count += 1;
        } else {
            entry.count = 1;
            entry.touches = touches;
        }
        entry.last_tap_ns = now_ns;
        entry.count
    }

    /// Forgets the widget's chain, so its next tap counts as the first.
    pub(crate) fn reset(&mut self, widget: WidgetId) {
        self.entries.remove(&widget);
    }

    /// Drops chains whose multi-tap window has expired.
    pub(crate) fn clear_expired(&mut self, now_ns: u64) {
        self.entries
            .retain(|_, entry| entry.last_tap_ns + MULTI_TAP_DELAY_NS >= now_ns);
    }

    /// Drops all chains.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
