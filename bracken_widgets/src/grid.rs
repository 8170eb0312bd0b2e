// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A fixed grid of equally sized cells.

use bracken_stage::{Ctx, Stage, Widget, WidgetId};
use kurbo::Point;
use smallvec::SmallVec;

/// A container dividing its bounds into `columns x rows` cells, filled with
/// children in insertion order, row by row.
///
/// Children keep their own sizes and are centered in their cells. Cell
/// geometry follows the container, so resizing the grid re-centers everything,
/// and a resized child is re-centered in place. Hit testing is O(1): the cell
/// under the point names the only candidate.
#[derive(Debug)]
pub struct GridContainer {
    columns: usize,
    rows: usize,
}

impl GridContainer {
    /// Creates a grid.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(columns: usize, rows: usize) -> Self {
        assert!(columns > 0 && rows > 0, "grid dimensions must be non-zero");
        Self { columns, rows }
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of cells.
    pub fn capacity(&self) -> usize {
        self.columns * self.rows
    }

    fn cell_extent(&self, ctx: &Ctx<'_>) -> (f64, f64) {
        let size = ctx.size();
        (
            size.width / self.columns as f64,
            size.height / self.rows as f64,
        )
    }

    /// Re-centers every child in its cell.
    pub fn realign(&self, stage: &mut Stage, container: WidgetId) {
        let Some(size) = stage.size(container) else {
            return;
        };
        let cell_w = size.width / self.columns as f64;
        let cell_h = size.height / self.rows as f64;
        let children = stage.children_of(container).to_vec();
        for (index, child) in children.into_iter().enumerate() {
            if index >= self.capacity() {
                log::warn!("grid holds more children than cells; extras stay unplaced");
                break;
            }
            self.center_in_cell(stage, child, index, cell_w, cell_h);
        }
    }

    fn center_in_cell(
        &self,
        stage: &mut Stage,
        child: WidgetId,
        index: usize,
        cell_w: f64,
        cell_h: f64,
    ) {
        let Some(size) = stage.size(child) else {
            return;
        };
        let col = (index % self.columns) as f64;
        let row = (index / self.columns) as f64;
        stage.set_origin(
            child,
            Point::new(
                col * cell_w + 0.5 * (cell_w - size.width),
                row * cell_h + 0.5 * (cell_h - size.height),
            ),
        );
    }
}

impl Widget for GridContainer {
    fn resized(&mut self, ctx: &mut Ctx<'_>) {
        let id = ctx.id();
        self.realign(ctx.stage(), id);
    }

    fn child_resized(&mut self, ctx: &mut Ctx<'_>, child: WidgetId) {
        let Some(index) = ctx.children().iter().position(|c| *c == child) else {
            return;
        };
        if index >= self.capacity() {
            return;
        }
        let (cell_w, cell_h) = self.cell_extent(ctx);
        self.center_in_cell(ctx.stage(), child, index, cell_w, cell_h);
    }

    fn hit_candidates(&self, ctx: &Ctx<'_>, x: f64, y: f64, out: &mut SmallVec<[WidgetId; 8]>) {
        let (cell_w, cell_h) = self.cell_extent(ctx);
        if x < 0.0 || y < 0.0 || cell_w <= 0.0 || cell_h <= 0.0 {
            return;
        }
        let col = (x / cell_w) as usize;
        let row = (y / cell_h) as usize;
        if col >= self.columns || row >= self.rows {
            return;
        }
        if let Some(child) = ctx.children().get(row * self.columns + col) {
            out.push(*child);
        }
    }
}
