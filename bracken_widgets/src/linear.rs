// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear layout: children in a row or column with spacing and margins.

use bracken_stage::{Stage, WidgetId};
use kurbo::{Point, Size};

use crate::plain::Layout;

/// Main axis of a linear arrangement.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Orientation {
    /// Children flow left to right.
    Horizontal,
    /// Children flow top to bottom.
    Vertical,
}

impl Orientation {
    pub(crate) fn main_of(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    pub(crate) fn cross_of(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.height,
            Self::Vertical => size.width,
        }
    }

    pub(crate) fn main_of_point(self, point: Point) -> f64 {
        match self {
            Self::Horizontal => point.x,
            Self::Vertical => point.y,
        }
    }

    pub(crate) fn cross_of_point(self, point: Point) -> f64 {
        match self {
            Self::Horizontal => point.y,
            Self::Vertical => point.x,
        }
    }

    pub(crate) fn point(self, main: f64, cross: f64) -> Point {
        match self {
            Self::Horizontal => Point::new(main, cross),
            Self::Vertical => Point::new(cross, main),
        }
    }

    pub(crate) fn size(self, main: f64, cross: f64) -> Size {
        match self {
            Self::Horizontal => Size::new(main, cross),
            Self::Vertical => Size::new(cross, main),
        }
    }
}

/// Placement of the whole run of children on the main axis.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MainAlign {
    /// The run starts at the leading margin.
    Start,
    /// The run is centered in the container.
    Center,
    /// The run ends at the trailing margin.
    End,
}

/// Placement of children on the cross axis.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CrossAlign {
    /// Flush with the leading edge (top for rows, left for columns).
    Start,
    /// Centered.
    Center,
    /// Flush with the trailing edge.
    End,
}

/// How the gap between children reacts to leftover or missing space.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SpanAdjust {
    /// The configured span is used as-is.
    Fixed,
    /// The span grows so the children fill the container's main axis.
    Extend,
    /// The span shrinks (possibly below the configured value) so the children
    /// fit the container's main axis.
    Compress,
}

/// Lays children out along one axis, in insertion order.
///
/// Children keep their own sizes; the layout assigns origins only, except in
/// wrap-content mode where it also sets the container's main-axis extent to
/// the content's extent.
#[derive(Debug)]
pub struct LinearLayout {
    orientation: Orientation,
    margin: f64,
    span: f64,
    main_align: MainAlign,
    cross_align: CrossAlign,
    adjust: SpanAdjust,
    wrap_content: bool,
}

impl LinearLayout {
    /// Creates a layout with the given leading margin and inter-child span.
    pub fn new(orientation: Orientation, margin: f64, span: f64) -> Self {
        Self {
            orientation,
            margin,
            span,
            main_align: MainAlign::Start,
            cross_align: CrossAlign::Start,
            adjust: SpanAdjust::Fixed,
            wrap_content: false,
        }
    }

    /// Sets the main-axis alignment; wrap-content layouts always start at the
    /// margin.
    pub fn with_main_align(mut self, main_align: MainAlign) -> Self {
        self.main_align = main_align;
        self
    }

    /// Sets the cross-axis alignment.
    pub fn with_cross_align(mut self, cross_align: CrossAlign) -> Self {
        self.cross_align = cross_align;
        self
    }

    /// Sets the span adjustment mode.
    pub fn with_adjust(mut self, adjust: SpanAdjust) -> Self {
        self.adjust = adjust;
        self
    }

    /// Makes the container's main-axis size follow the content.
    pub fn with_wrap_content(mut self, wrap_content: bool) -> Self {
        self.wrap_content = wrap_content;
        self
    }

    /// The leading margin on the main axis.
    pub fn margin(&self) -> f64 {
        self.margin
    }

    fn effective_span(&self, stage: &Stage, container: WidgetId) -> f64 {
        if self.adjust == SpanAdjust::Fixed || self.wrap_content {
            return self.span;
        }
        let children = stage.children_of(container);
        if children.len() < 2 {
            return self.span;
        }
        let Some(size) = stage.size(container) else {
            return self.span;
        };
        let content: f64 = children
            .iter()
            .filter_map(|c| stage.size(*c))
            .map(|s| self.orientation.main_of(s))
            .sum();
        let gaps = (children.len() - 1) as f64;
        let fit = (self.orientation.main_of(size) - 2.0 * self.margin - content) / gaps;
        match self.adjust {
            SpanAdjust::Extend => self.span.max(fit),
            SpanAdjust::Compress => self.span.min(fit),
            SpanAdjust::Fixed => self.span,
        }
    }

    /// Main-axis position of the run's leading edge.
    ///
    /// The run length counts one span per child; subtracting one span back out
    /// gives the content extent, matching the trailing-gap bookkeeping in
    /// [`Layout::align`].
    fn run_start(&self, stage: &Stage, container: WidgetId, main_extent: f64, span: f64) -> f64 {
        if self.wrap_content || self.main_align == MainAlign::Start {
            return self.margin;
        }
        let run: f64 = stage
            .children_of(container)
            .iter()
            .filter_map(|c| stage.size(*c))
            .map(|s| self.orientation.main_of(s) + span)
            .sum();
        let free = main_extent - run + span;
        match self.main_align {
            MainAlign::Start => self.margin,
            MainAlign::Center => free * 0.5,
            MainAlign::End => free - self.margin,
        }
    }
}

impl Layout for LinearLayout {
    fn align(&self, stage: &mut Stage, container: WidgetId) {
        let Some(container_size) = stage.size(container) else {
            return;
        };
        let span = self.effective_span(stage, container);
        let cross_extent = self.orientation.cross_of(container_size);
        let main_extent = self.orientation.main_of(container_size);
        let children = stage.children_of(container).to_vec();
        let mut cursor = self.run_start(stage, container, main_extent, span);
        for child in &children {
            let Some(child_size) = stage.size(*child) else {
                continue;
            };
            let cross = match self.cross_align {
                CrossAlign::Start => 0.0,
                CrossAlign::Center => (cross_extent - self.orientation.cross_of(child_size)) / 2.0,
                CrossAlign::End => cross_extent - self.orientation.cross_of(child_size),
            };
            stage.set_origin(*child, self.orientation.point(cursor, cross));
            cursor += self.orientation.main_of(child_size) + span;
        }
        if self.wrap_content && !children.is_empty() {
            let main = cursor - span + self.margin;
            stage.set_size(
                container,
                self.orientation.size(main, cross_extent),
            );
        }
    }
}
