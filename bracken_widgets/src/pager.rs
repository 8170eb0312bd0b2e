// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pager: a scroll view that settles on one item at a time.
//!
//! Items live in a linear item container that is the pager's content child.
//! Free scrolling and flinging work exactly as in a scroll view; once motion
//! ends, the pager animates the nearest item (or an explicitly selected one)
//! to the viewport center and reports page changes and settles.

use bracken_stage::{Ctx, Error, Listeners, PaintCtx, PointerId, Result, Stage, Widget, WidgetId};
use kurbo::{Point, Rect};

use crate::linear::{CrossAlign, LinearLayout, Orientation};
use crate::plain::PlainContainer;
use crate::scroll::ScrollState;

/// Listener invoked with a page index.
pub type PageListener = Box<dyn FnMut(&mut Ctx<'_>, usize)>;

/// A paging scroll view.
///
/// Construct with [`Pager::insert`], which also builds the item container.
/// The item-container margin doubles as the maximum overshoot; it should be
/// at least half the viewport so edge items can reach the center.
pub struct Pager {
    scroll: ScrollState,
    orientation: Orientation,
    /// Explicitly selected page still being animated to.
    target: Option<usize>,
    change_listeners: Listeners<PageListener>,
    settle_listeners: Listeners<PageListener>,
}

impl Pager {
    fn new(orientation: Orientation) -> Self {
        Self {
            scroll: ScrollState::new(),
            orientation,
            target: None,
            change_listeners: Listeners::new(),
            settle_listeners: Listeners::new(),
        }
    }

    /// Inserts a pager plus its item container, attached under nothing yet.
    ///
    /// `span` is the gap between items and `max_overshoot` the margin kept
    /// around them.
    pub fn insert(
        stage: &mut Stage,
        bounds: Rect,
        orientation: Orientation,
        span: f64,
        max_overshoot: f64,
    ) -> Result<WidgetId> {
        let pager = stage.insert(Self::new(orientation), bounds);
        let layout = LinearLayout::new(orientation, max_overshoot, span)
            .with_cross_align(CrossAlign::Center)
            .with_wrap_content(true);
        let cross = orientation.cross_of(bounds.size());
        let container = stage.insert(
            PlainContainer::with_layout(layout),
            Rect::from_origin_size(Point::ZERO, orientation.size(0.0, cross)),
        );
        stage.attach(pager, container)?;
        Ok(pager)
    }

    /// The item container.
    pub fn item_container(stage: &Stage, pager: WidgetId) -> Result<WidgetId> {
        stage
            .children_of(pager)
            .first()
            .copied()
            .ok_or(Error::NotFound)
    }

    /// Number of items.
    pub fn item_count(stage: &Stage, pager: WidgetId) -> usize {
        Self::item_container(stage, pager).map_or(0, |c| stage.children_of(c).len())
    }

    /// Inserts an item at `index`. The first item is selected immediately.
    pub fn add_item(
        stage: &mut Stage,
        pager: WidgetId,
        item: WidgetId,
        index: usize,
    ) -> Result<()> {
        let container = Self::item_container(stage, pager)?;
        stage.attach_at(container, index, item)?;
        Self::realign(stage, pager)?;
        if stage.children_of(container).len() == 1 {
            Self::select_item(stage, pager, 0, false)?;
        }
        Ok(())
    }

    /// Detaches and returns the item at `index`, keeping the current page in
    /// place when an earlier item disappears.
    pub fn remove_item(stage: &mut Stage, pager: WidgetId, index: usize) -> Result<WidgetId> {
        let container = Self::item_container(stage, pager)?;
        let item = *stage
            .children_of(container)
            .get(index)
            .ok_or(Error::NotFound)?;
        let nearest = stage.with_widget::<Self, _>(pager, |p, ctx| p.nearest_position(ctx))?;
        if let Some(nearest) = nearest {
            if index < nearest {
                Self::select_item(stage, pager, nearest - 1, false)?;
            }
        }
        stage.detach(item);
        Self::realign(stage, pager)?;
        Ok(item)
    }

    /// Selects a page: animated scrolls there over the next frames, otherwise
    /// the item is centered (and reported) immediately.
    pub fn select_item(
        stage: &mut Stage,
        pager: WidgetId,
        index: usize,
        animated: bool,
    ) -> Result<()> {
        stage.with_widget::<Self, _>(pager, |p, ctx| p.select(ctx, index, animated))?
    }

    /// The page nearest to the viewport center right now.
    pub fn current_page(stage: &mut Stage, pager: WidgetId) -> Result<Option<usize>> {
        stage.with_widget::<Self, _>(pager, |p, ctx| p.nearest_position(ctx))
    }

    fn realign(stage: &mut Stage, pager: WidgetId) -> Result<()> {
        let container = Self::item_container(stage, pager)?;
        stage.with_widget::<PlainContainer, _>(container, |c, ctx| {
            let id = ctx.id();
            c.realign(ctx.stage(), id);
        })?;
        stage.with_widget::<Self, _>(pager, |p, ctx| {
            p.scroll.update_position(ctx);
            ctx.make_dirty();
        })?;
        Ok(())
    }

    /// Registers a page-change listener; fires when the settled-on page
    /// changes. A tagged add replaces in place.
    pub fn add_page_change_listener(&mut self, tag: Option<&'static str>, listener: PageListener) {
        match tag {
            Some(tag) => self.change_listeners.insert(tag, listener),
            None => self.change_listeners.push(listener),
        }
    }

    /// Registers a page-settle listener; fires when a page comes to rest in
    /// the center. A tagged add replaces in place.
    pub fn add_page_settle_listener(&mut self, tag: Option<&'static str>, listener: PageListener) {
        match tag {
            Some(tag) => self.settle_listeners.insert(tag, listener),
            None => self.settle_listeners.push(listener),
        }
    }

    fn fire_change(&mut self, ctx: &mut Ctx<'_>, page: usize) {
        let mut listeners = core::mem::take(&mut self.change_listeners);
        for listener in listeners.iter_mut() {
            listener(ctx, page);
        }
        self.change_listeners = listeners;
    }

    fn fire_settle(&mut self, ctx: &mut Ctx<'_>, page: usize) {
        let mut listeners = core::mem::take(&mut self.settle_listeners);
        for listener in listeners.iter_mut() {
            listener(ctx, page);
        }
        self.settle_listeners = listeners;
    }

    fn scroll_main(&self) -> f64 {
        match self.orientation {
            Orientation::Horizontal => self.scroll.scroll_x(),
            Orientation::Vertical => self.scroll.scroll_y(),
        }
    }

    fn set_scroll_main(&mut self, ctx: &mut Ctx<'_>, value: f64) {
        match self.orientation {
            Orientation::Horizontal => self.scroll.set_scroll_x(ctx, value),
            Orientation::Vertical => self.scroll.set_scroll_y(ctx, value),
        }
    }

    fn item_center(&self, ctx: &Ctx<'_>, container: WidgetId, index: usize) -> Option<f64> {
        let item = *ctx.stage_ref().children_of(container).get(index)?;
        let origin = ctx.stage_ref().origin(item)?;
        let size = ctx.stage_ref().size(item)?;
        Some(self.orientation.main_of_point(origin) + self.orientation.main_of(size) / 2.0)
    }

    /// Index of the item whose center is closest to the viewport center.
    ///
    /// Item positions must increase along the main axis (the linear layout
    /// guarantees this); the scan stops at the first item that is farther
    /// than its predecessor.
    fn nearest_position(&self, ctx: &Ctx<'_>) -> Option<usize> {
        let container = ScrollState::content(ctx)?;
        let viewport = self.orientation.main_of(ctx.size());
        let scroll = self.scroll_main();
        let count = ctx.stage_ref().children_of(container).len();
        let mut best = None;
        let mut min_distance = f64::INFINITY;
        for index in 0..count {
            let center = self.item_center(ctx, container, index)?;
            let distance = (center - scroll - viewport / 2.0).abs();
            if distance <= min_distance {
                min_distance = distance;
                best = Some(index);
            } else {
                return best;
            }
        }
        best
    }

    fn select(&mut self, ctx: &mut Ctx<'_>, index: usize, animated: bool) -> Result<()> {
        if animated {
            self.target = Some(index);
            ctx.make_dirty();
            return Ok(());
        }
        self.target = None;
        let container = ScrollState::content(ctx).ok_or(Error::NotFound)?;
        if index >= ctx.stage_ref().children_of(container).len() {
            return Err(Error::NotFound);
        }
        let center = self.item_center(ctx, container, index).ok_or(Error::NotFound)?;
        let viewport = self.orientation.main_of(ctx.size());
        self.set_scroll_main(ctx, center - viewport / 2.0);
        ctx.make_dirty();
        self.fire_change(ctx, index);
        self.fire_settle(ctx, index);
        Ok(())
    }

    fn settle_step(&mut self, ctx: &mut Ctx<'_>, delay: f64) {
        if self.scroll.is_dragged(ctx) {
            return;
        }
        if self.scroll.velocities() != (0.0, 0.0) {
            return;
        }
        let Some(nearest) = self.nearest_position(ctx) else {
            return;
        };
        if self.target == Some(nearest) {
            self.target = None;
            self.fire_change(ctx, nearest);
        }
        let page = self.target.unwrap_or(nearest);
        let Some(container) = ScrollState::content(ctx) else {
            return;
        };
        let Some(center) = self.item_center(ctx, container, page) else {
            return;
        };
        let viewport = self.orientation.main_of(ctx.size());
        let scroll = self.scroll_main();
        let offset = center - scroll - viewport / 2.0;
        if offset == 0.0 {
            self.fire_settle(ctx, nearest);
            return;
        }
        let movement = (2.0 * viewport * delay).min(offset.abs());
        self.set_scroll_main(ctx, scroll + movement.copysign(offset));
        if self.scroll_main() == scroll {
            // Pinned at a boundary; the item cannot get any closer.
            self.fire_settle(ctx, nearest);
            return;
        }
        ctx.make_dirty();
    }
}

impl Widget for Pager {
    fn wants_interactive(&self) -> bool {
        true
    }

    fn extra_drag_count(&self) -> u32 {
        self.scroll.captured()
    }

    fn on_drag(
        &mut self,
        ctx: &mut Ctx<'_>,
        _x: f64,
        _y: f64,
        dx: f64,
        dy: f64,
        _pointer: PointerId,
    ) -> bool {
        self.scroll.handle_drag(ctx, dx, dy)
    }

    fn on_fling(
        &mut self,
        ctx: &mut Ctx<'_>,
        _x: f64,
        _y: f64,
        vx: f64,
        vy: f64,
        _pointer: PointerId,
    ) -> bool {
        self.scroll.handle_fling(ctx, vx, vy)
    }

    fn on_drag_received(&mut self, ctx: &mut Ctx<'_>, pointer: PointerId) -> bool {
        if self.scroll.capture(ctx, pointer) {
            self.drag_started(ctx);
        }
        true
    }

    fn on_drag_capture_stopped(&mut self, ctx: &mut Ctx<'_>, pointer: PointerId) {
        if self.scroll.release_capture(ctx, pointer) {
            self.drag_stopped(ctx);
        }
    }

    fn drag_stopped(&mut self, ctx: &mut Ctx<'_>) {
        self.scroll.stop_drag();
        self.target = None;
        if let Some(nearest) = self.nearest_position(ctx) {
            self.fire_change(ctx, nearest);
        }
        ctx.make_dirty();
    }

    fn step(&mut self, ctx: &mut Ctx<'_>, delay: f64) {
        self.scroll.step(ctx, delay);
        self.settle_step(ctx, delay);
    }

    fn resized(&mut self, ctx: &mut Ctx<'_>) {
        let cross = self.orientation.cross_of(ctx.size());
        if let Some(container) = ScrollState::content(ctx) {
            if let Some(size) = ctx.stage().size(container) {
                let main = self.orientation.main_of(size);
                ctx.stage().set_size(container, self.orientation.size(main, cross));
            }
        }
        self.scroll.update_position(ctx);
        ctx.make_dirty();
    }

    fn child_resized(&mut self, ctx: &mut Ctx<'_>, _child: WidgetId) {
        self.scroll.update_position(ctx);
        ctx.make_dirty();
    }

    fn paint(&mut self, ctx: &mut PaintCtx<'_, '_>) {
        let bounds = ctx.bounds();
        if ctx.painter().push_clip(bounds) {
            ctx.paint_children();
            ctx.painter().pop_clip();
        }
    }
}

impl core::fmt::Debug for Pager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pager")
            .field("orientation", &self.orientation)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Item;
    impl Widget for Item {}

    // Viewport 200 wide; items 80 wide with a 20 gap and 100 margin, so item
    // i sits at 100 + 100*i and centers at 140 + 100*i.
    fn setup(items: usize) -> (Stage, WidgetId) {
        let mut stage = Stage::new();
        let pager = Pager::insert(
            &mut stage,
            Rect::new(0.0, 0.0, 200.0, 100.0),
            Orientation::Horizontal,
            20.0,
            100.0,
        )
        .unwrap();
        for i in 0..items {
            let item = stage.insert(Item, Rect::new(0.0, 0.0, 80.0, 60.0));
            Pager::add_item(&mut stage, pager, item, i).unwrap();
        }
        (stage, pager)
    }

    fn scroll_of(stage: &mut Stage, pager: WidgetId) -> f64 {
        stage
            .with_widget::<Pager, _>(pager, |p, _| p.scroll_main())
            .unwrap()
    }

    /// Steps the pager like a frame would: only while something is dirty.
    fn run_frames(stage: &mut Stage, pager: WidgetId, max: usize) -> usize {
        let mut frames = 0;
        while !stage.take_pending_dirty().is_empty() && frames < max {
            stage
                .with_widget::<Pager, _>(pager, |p, ctx| p.step(ctx, 1.0 / 60.0))
                .unwrap();
            frames += 1;
        }
        frames
    }

    #[test]
    fn first_item_is_selected_on_insert() {
        let (mut stage, pager) = setup(3);
        assert_eq!(Pager::current_page(&mut stage, pager).unwrap(), Some(0));
        // Item 0 centers at 140; the viewport center is 100.
        assert_eq!(scroll_of(&mut stage, pager), 40.0);
    }

    #[test]
    fn immediate_selection_centers_and_reports() {
        let (mut stage, pager) = setup(3);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (changes, settles) = (seen.clone(), seen.clone());
        stage
            .with_widget::<Pager, _>(pager, |p, _| {
                p.add_page_change_listener(
                    None,
                    Box::new(move |_, page| changes.borrow_mut().push(("change", page))),
                );
                p.add_page_settle_listener(
                    None,
                    Box::new(move |_, page| settles.borrow_mut().push(("settle", page))),
                );
            })
            .unwrap();
        Pager::select_item(&mut stage, pager, 2, false).unwrap();
        assert_eq!(scroll_of(&mut stage, pager), 240.0);
        assert_eq!(Pager::current_page(&mut stage, pager).unwrap(), Some(2));
        assert_eq!(&*seen.borrow(), &[("change", 2), ("settle", 2)]);
    }

    #[test]
    fn animated_selection_glides_and_settles_once() {
        let (mut stage, pager) = setup(3);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (changes, settles) = (seen.clone(), seen.clone());
        stage
            .with_widget::<Pager, _>(pager, |p, _| {
                p.add_page_change_listener(
                    None,
                    Box::new(move |_, page| changes.borrow_mut().push(("change", page))),
                );
                p.add_page_settle_listener(
                    None,
                    Box::new(move |_, page| settles.borrow_mut().push(("settle", page))),
                );
            })
            .unwrap();
        Pager::select_item(&mut stage, pager, 1, true).unwrap();
        run_frames(&mut stage, pager, 200);
        assert_eq!(scroll_of(&mut stage, pager), 140.0);
        assert_eq!(&*seen.borrow(), &[("change", 1), ("settle", 1)]);
        // Once settled, nothing is dirty and further frames stay quiet.
        run_frames(&mut stage, pager, 5);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn settled_pager_marks_nothing_dirty() {
        let (mut stage, pager) = setup(2);
        run_frames(&mut stage, pager, 10);
        // A settled pager steps without producing new dirty entries.
        stage
            .with_widget::<Pager, _>(pager, |p, ctx| p.step(ctx, 1.0 / 60.0))
            .unwrap();
        assert!(stage.take_pending_dirty().is_empty());
    }

    #[test]
    fn removing_an_earlier_item_keeps_the_page() {
        let (mut stage, pager) = setup(3);
        Pager::select_item(&mut stage, pager, 2, false).unwrap();
        Pager::remove_item(&mut stage, pager, 0).unwrap();
        assert_eq!(Pager::item_count(&stage, pager), 2);
        assert_eq!(Pager::current_page(&mut stage, pager).unwrap(), Some(1));
    }

    #[test]
    fn drag_release_reports_the_nearest_page() {
        let (mut stage, pager) = setup(3);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let changes = seen.clone();
        stage
            .with_widget::<Pager, _>(pager, |p, ctx| {
                p.add_page_change_listener(
                    None,
                    Box::new(move |_, page| changes.borrow_mut().push(page)),
                );
                // Drag left far enough that item 1 is nearest, then let go.
                ctx.record_touch_down(PointerId(0));
                p.on_drag(ctx, 100.0, 50.0, -90.0, 0.0, PointerId(0));
                ctx.record_touch_up(PointerId(0));
                p.drag_stopped(ctx);
            })
            .unwrap();
        assert_eq!(&*seen.borrow(), &[1]);
        run_frames(&mut stage, pager, 200);
        assert_eq!(scroll_of(&mut stage, pager), 140.0);
    }
}
