// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Double-buffered dirty bookkeeping for the frame loop.

use bracken_stage::WidgetId;
use hashbrown::HashSet;

/// Collects step requests for the next frame, deduplicated.
///
/// Widgets reported while a frame is being stepped land in the next frame's
/// batch; [`DirtyTracker::drain`] hands out the current batch and starts the
/// next one. A request is kept even if the same widget is reported again
/// before the drain.
#[derive(Debug, Default)]
pub struct DirtyTracker {
    pending: Vec<WidgetId>,
    seen: HashSet<WidgetId>,
}

impl DirtyTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a widget for the next step batch.
    pub fn report(&mut self, id: WidgetId) {
        if self.seen.insert(id) {
            self.pending.push(id);
        }
    }

    /// Whether anything is queued for the next batch.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Takes the queued batch, in report order.
    pub fn drain(&mut self) -> Vec<WidgetId> {
        self.seen.clear();
        core::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bracken_stage::{Stage, Widget};
    use kurbo::Rect;

    struct Probe;
    impl Widget for Probe {}

    #[test]
    fn reports_deduplicate_until_drained() {
        let mut stage = Stage::new();
        let a = stage.insert(Probe, Rect::new(0.0, 0.0, 1.0, 1.0));
        let b = stage.insert(Probe, Rect::new(0.0, 0.0, 1.0, 1.0));
        let mut tracker = DirtyTracker::new();
        tracker.report(a);
        tracker.report(b);
        tracker.report(a);
        assert_eq!(tracker.drain(), vec![a, b]);
        assert!(!tracker.has_pending());
        // A fresh batch accepts the widget again.
        tracker.report(a);
        assert_eq!(tracker.drain(), vec![a]);
    }
}
