// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The frame: owns the stage, routes input, and drives the render loop.

use bracken_input::{InputRouter, Viewport};
use bracken_stage::{
    Ctx, Listeners, Painter, PointerId, Result, Stage, Widget, WidgetId, drag_paint_widget,
    paint_widget,
};
use kurbo::{Point, Rect, Size};

use crate::dirty::DirtyTracker;

/// Largest time step handed to widgets, in seconds.
///
/// Longer real gaps (a stall, a breakpoint) are clamped so physics cannot
/// jump across boundaries in one step.
const MAX_DELTA_TIME: f64 = 0.125;

/// Application lifecycle transitions reported by the embedder.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LifecycleEvent {
    /// The application lost the foreground.
    Paused,
    /// The application returned to the foreground.
    Resumed,
    /// The frame was resized to the given canvas size.
    Resized(Size),
}

/// Listener invoked on lifecycle transitions.
pub type LifecycleListener = Box<dyn FnMut(&mut Stage, LifecycleEvent)>;

/// The invisible root of the widget tree.
///
/// It swallows nothing: hit testing always enters it so the content
/// underneath decides, and painting just descends.
#[derive(Debug)]
struct RootPane;

impl Widget for RootPane {
    fn inside_active_area(&self, _ctx: &Ctx<'_>, _x: f64, _y: f64) -> bool {
        true
    }
}

/// Drives one user interface: a [`Stage`], an [`InputRouter`], and the
/// step/paint cycle.
///
/// The embedder forwards raw input events and calls [`Frame::render`] once
/// per frame. Rendering is demand-driven: `render` returns whether any
/// widget asked to be stepped again, so the embedder can idle when the
/// interface is at rest. While idle, the next step runs with a zero delay so
/// animations resume without jumping.
pub struct Frame<V: Viewport> {
    stage: Stage,
    root: WidgetId,
    router: InputRouter<V>,
    dirty: DirtyTracker,
    skip_delay: bool,
    lifecycle: Listeners<LifecycleListener>,
}

impl<V: Viewport> Frame<V> {
    /// Creates a frame with an empty root pane of the given canvas size.
    pub fn new(size: Size, viewport: V) -> Self {
        let mut stage = Stage::new();
        let root = stage.insert(RootPane, Rect::from_origin_size(Point::ZERO, size));
        stage.make_dirty(root);
        Self {
            stage,
            root,
            router: InputRouter::new(viewport),
            dirty: DirtyTracker::new(),
            skip_delay: false,
            lifecycle: Listeners::new(),
        }
    }

    /// The widget arena.
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Mutable access to the widget arena.
    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    /// The root pane's id.
    pub fn root(&self) -> WidgetId {
        self.root
    }

    /// The input router.
    pub fn router(&self) -> &InputRouter<V> {
        &self.router
    }

    /// Mutable access to the input router.
    pub fn router_mut(&mut self) -> &mut InputRouter<V> {
        &mut self.router
    }

    /// The single content widget, if one is assigned.
    pub fn content(&self) -> Option<WidgetId> {
        self.stage.children_of(self.root).first().copied()
    }

    /// Assigns the content, detaching any previous content first.
    ///
    /// The new subtree is marked dirty throughout so it is stepped and
    /// painted on the next render.
    pub fn set_content(&mut self, content: WidgetId) -> Result<()> {
        for child in self.stage.children_of(self.root).to_vec() {
            self.stage.detach(child);
        }
        self.stage.attach(self.root, content)
    }

    /// Registers a lifecycle listener; a tagged add replaces in place.
    pub fn add_lifecycle_listener(&mut self, tag: Option<&'static str>, listener: LifecycleListener) {
        match tag {
            Some(tag) => self.lifecycle.insert(tag, listener),
            None => self.lifecycle.push(listener),
        }
    }

    fn fire(&mut self, event: LifecycleEvent) {
        let mut listeners = core::mem::take(&mut self.lifecycle);
        for listener in listeners.iter_mut() {
            listener(&mut self.stage, event);
        }
        self.lifecycle = listeners;
    }

    /// Resizes the frame's canvas.
    pub fn resize(&mut self, size: Size) {
        self.stage.set_size(self.root, size);
        self.fire(LifecycleEvent::Resized(size));
    }

    // --- Input forwarding ----------------------------------------------------

    /// Routes a pointer-down at a screen-pixel position.
    pub fn touch_down(&mut self, x: f64, y: f64, pointer: PointerId, now_ns: u64) -> bool {
        self.router
            .touch_down(&mut self.stage, self.root, x, y, pointer, now_ns)
    }

    /// Routes a pointer lift.
    pub fn touch_up(&mut self, x: f64, y: f64, pointer: PointerId, now_ns: u64) -> bool {
        self.router.touch_up(&mut self.stage, x, y, pointer, now_ns)
    }

    /// Routes a held pointer's motion.
    pub fn touch_dragged(&mut self, x: f64, y: f64, pointer: PointerId, now_ns: u64) -> bool {
        self.router
            .touch_dragged(&mut self.stage, x, y, pointer, now_ns)
    }

    /// Routes hover-cursor motion.
    pub fn mouse_moved(&mut self, x: f64, y: f64) -> bool {
        self.router.mouse_moved(&mut self.stage, self.root, x, y)
    }

    // --- Lifecycle -----------------------------------------------------------

    /// The application lost the foreground: held pointers are lifted so no
    /// widget stays pressed across the gap.
    pub fn pause(&mut self) {
        log::debug!("frame paused");
        self.router.clear_inputs(&mut self.stage);
        self.fire(LifecycleEvent::Paused);
    }

    /// The application regained the foreground. The next step runs with a
    /// zero delay so animations continue where they left off.
    pub fn resume(&mut self) {
        log::debug!("frame resumed");
        self.skip_delay = true;
        self.fire(LifecycleEvent::Resumed);
    }

    // --- The frame loop ------------------------------------------------------

    /// Whether the widget is still attached under this frame's root.
    fn under_root(&self, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(widget) = current {
            if widget == self.root {
                return true;
            }
            current = self.stage.parent_of(widget);
        }
        false
    }

    /// Runs one frame: deferred tasks, one step batch, then painting.
    ///
    /// `raw_delta` is the real time since the last render, in seconds; it is
    /// clamped to [`MAX_DELTA_TIME`], and forced to zero after an idle or
    /// resumed gap. Returns whether another render is needed; `false` means
    /// the interface is at rest and the embedder may stop rendering until
    /// the next input or [`Stage::post`]ed task.
    pub fn render(&mut self, raw_delta: f64, painter: &mut dyn Painter) -> bool {
        for task in self.stage.take_tasks() {
            task(&mut self.stage);
        }
        let delta = if self.skip_delay {
            0.0
        } else {
            raw_delta.min(MAX_DELTA_TIME)
        };
        for id in self.stage.take_pending_dirty() {
            self.dirty.report(id);
        }
        for id in self.dirty.drain() {
            // Widgets detached since they reported are left alone.
            if self.under_root(id) {
                self.stage.with_widget_dyn(id, |w, ctx| w.step(ctx, delta));
            }
        }
        for id in self.stage.take_pending_dirty() {
            self.dirty.report(id);
        }
        self.skip_delay = !self.dirty.has_pending();

        let origin = self.stage.origin(self.root).unwrap_or_default();
        paint_widget(&mut self.stage, painter, self.root, origin);
        self.paint_drag_overlays(painter);
        self.dirty.has_pending()
    }

    /// Paints the ghost of every dragged widget on top of the tree.
    fn paint_drag_overlays(&mut self, painter: &mut dyn Painter) {
        let pointers: Vec<PointerId> = self.router.pointers().collect();
        let mut painted: Vec<WidgetId> = Vec::new();
        for pointer in pointers {
            let Some(widget) = self.router.drag_receiver(pointer) else {
                continue;
            };
            if painted.contains(&widget) {
                continue;
            }
            let origin = self
                .stage
                .with_widget_dyn(widget, |w, ctx| w.drag_overlay_origin(ctx))
                .flatten();
            if let Some(origin) = origin {
                painted.push(widget);
                drag_paint_widget(&mut self.stage, painter, widget, origin);
            }
        }
    }
}

impl<V: Viewport> core::fmt::Debug for Frame<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Frame")
            .field("root", &self.root)
            .field("skip_delay", &self.skip_delay)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bracken_input::OrthoViewport;
    use bracken_stage::Tint;
    use bracken_widgets::{DraggableItem, Orientation, ScrollView, Switch};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct RecordingPainter {
        fills: Vec<Rect>,
        opacity_pushes: u32,
    }

    impl Painter for RecordingPainter {
        fn canvas_size(&self) -> Size {
            Size::new(800.0, 600.0)
        }

        fn push_clip(&mut self, _rect: Rect) -> bool {
            true
        }

        fn pop_clip(&mut self) {}

        fn push_opacity(&mut self, _opacity: f32) {
            self.opacity_pushes += 1;
        }

        fn pop_opacity(&mut self) {}

        fn fill_rect(&mut self, rect: Rect, _tint: Tint) {
            self.fills.push(rect);
        }
    }

    fn frame() -> Frame<OrthoViewport> {
        let _ = env_logger::builder().is_test(true).try_init();
        Frame::new(Size::new(800.0, 600.0), OrthoViewport::new(1.0, 10.0))
    }

    struct StepRecorder {
        deltas: Rc<RefCell<Vec<f64>>>,
    }

    impl Widget for StepRecorder {
        fn step(&mut self, _ctx: &mut Ctx<'_>, delay: f64) {
            self.deltas.borrow_mut().push(delay);
        }
    }

    #[test]
    fn idle_frame_reports_rest() {
        let mut frame = frame();
        let deltas = Rc::new(RefCell::new(Vec::new()));
        let content = frame.stage_mut().insert(
            StepRecorder {
                deltas: deltas.clone(),
            },
            Rect::new(0.0, 0.0, 800.0, 600.0),
        );
        frame.set_content(content).unwrap();
        let mut painter = RecordingPainter::default();
        assert!(!frame.render(1.0 / 60.0, &mut painter));
        assert!(!frame.render(1.0 / 60.0, &mut painter));
        // Stepped once from the initial dirty marking, never again.
        assert_eq!(deltas.borrow().len(), 1);
    }

    #[test]
    fn delta_is_clamped_and_zeroed_after_idle() {
        let mut frame = frame();
        let deltas = Rc::new(RefCell::new(Vec::new()));
        let content = frame.stage_mut().insert(
            StepRecorder {
                deltas: deltas.clone(),
            },
            Rect::new(0.0, 0.0, 800.0, 600.0),
        );
        frame.set_content(content).unwrap();
        let mut painter = RecordingPainter::default();
        // A huge real gap is clamped.
        frame.render(10.0, &mut painter);
        assert_eq!(*deltas.borrow(), vec![MAX_DELTA_TIME]);
        // After an idle frame the next step pretends no time passed.
        frame.stage_mut().make_dirty(content);
        frame.render(1.0, &mut painter);
        assert_eq!(*deltas.borrow(), vec![MAX_DELTA_TIME, 0.0]);
    }

    struct Animating {
        remaining: u32,
    }

    impl Widget for Animating {
        fn step(&mut self, ctx: &mut Ctx<'_>, _delay: f64) {
            if self.remaining > 0 {
                self.remaining -= 1;
                ctx.make_dirty();
            }
        }
    }

    #[test]
    fn re_marked_widgets_run_one_batch_per_render() {
        let mut frame = frame();
        let content = frame
            .stage_mut()
            .insert(Animating { remaining: 3 }, Rect::new(0.0, 0.0, 10.0, 10.0));
        frame.set_content(content).unwrap();
        let mut painter = RecordingPainter::default();
        let mut renders = 0;
        while frame.render(1.0 / 60.0, &mut painter) {
            renders += 1;
            assert!(renders < 10, "frame never settled");
        }
        assert_eq!(renders, 3);
        assert_eq!(frame.stage().widget_ref::<Animating>(content).unwrap().remaining, 0);
    }

    struct Probe;

    impl Widget for Probe {
        fn wants_interactive(&self) -> bool {
            true
        }
    }

    #[test]
    fn pause_releases_held_pointers() {
        let mut frame = frame();
        let content = frame
            .stage_mut()
            .insert(Probe, Rect::new(0.0, 0.0, 800.0, 600.0));
        frame.set_content(content).unwrap();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        frame.add_lifecycle_listener(
            None,
            Box::new(move |_, event| sink.borrow_mut().push(event)),
        );
        assert!(frame.touch_down(100.0, 100.0, PointerId(0), 0));
        assert_eq!(frame.stage().pressing(content), 1);
        frame.pause();
        assert_eq!(frame.stage().pressing(content), 0);
        assert_eq!(frame.router().active_pointers(), 0);
        frame.resume();
        assert_eq!(
            &*events.borrow(),
            &[LifecycleEvent::Paused, LifecycleEvent::Resumed]
        );
    }

    struct Panel;
    impl Widget for Panel {}

    #[test]
    fn unconsumed_drags_escalate_to_the_scroll_view() {
        let mut frame = frame();
        let view = frame
            .stage_mut()
            .insert(ScrollView::new(), Rect::new(0.0, 0.0, 200.0, 200.0));
        let content = frame
            .stage_mut()
            .insert(Panel, Rect::new(0.0, 0.0, 600.0, 200.0));
        let button = frame
            .stage_mut()
            .insert(Probe, Rect::new(0.0, 0.0, 40.0, 40.0));
        frame.stage_mut().attach(view, content).unwrap();
        frame.stage_mut().attach(content, button).unwrap();
        frame.set_content(view).unwrap();

        assert!(frame.touch_down(20.0, 20.0, PointerId(0), 0));
        assert_eq!(frame.router().pointer_widget(PointerId(0)), Some(button));
        // Dragging far off the button escalates to the nearest ancestor
        // willing to take the pointer.
        frame.touch_dragged(140.0, 20.0, PointerId(0), 1_000_000);
        assert_eq!(frame.router().drag_receiver(PointerId(0)), Some(view));
        frame.touch_dragged(100.0, 20.0, PointerId(0), 2_000_000);
        let scroll = frame
            .stage()
            .widget_ref::<ScrollView>(view)
            .unwrap()
            .scroll_x();
        assert!(scroll > 0.0, "scroll view never moved: {scroll}");
    }

    #[test]
    fn posted_tasks_run_before_the_step_batch() {
        let mut frame = frame();
        let switch = Switch::insert(
            frame.stage_mut(),
            Rect::new(0.0, 0.0, 120.0, 30.0),
            Orientation::Horizontal,
            20.0,
            false,
            false,
        )
        .unwrap();
        frame.set_content(switch).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        frame
            .stage_mut()
            .with_widget::<Switch, _>(switch, |w, ctx| {
                w.add_change_listener(None, Box::new(move |_, on| sink.borrow_mut().push(on)));
                w.set_on(ctx, true);
            })
            .unwrap();
        assert!(seen.borrow().is_empty());
        let mut painter = RecordingPainter::default();
        let mut renders = 0;
        while frame.render(1.0 / 60.0, &mut painter) {
            renders += 1;
            assert!(renders < 600, "switch never settled");
        }
        assert_eq!(&*seen.borrow(), &[true]);
        frame
            .stage_mut()
            .with_widget::<Switch, _>(switch, |w, _| {
                assert!(w.is_on());
                assert_eq!(w.position(), 0.0);
            })
            .unwrap();
    }

    #[test]
    fn drag_overlays_paint_on_top() {
        let mut frame = frame();
        let pane = frame
            .stage_mut()
            .insert(Panel, Rect::new(0.0, 0.0, 800.0, 600.0));
        let item = frame.stage_mut().insert(
            DraggableItem::new(Box::new(1_u32)),
            Rect::new(0.0, 0.0, 20.0, 20.0),
        );
        frame.stage_mut().attach(pane, item).unwrap();
        frame.set_content(pane).unwrap();

        frame.touch_down(10.0, 10.0, PointerId(0), 0);
        frame.touch_dragged(60.0, 60.0, PointerId(0), 1_000_000);
        let mut painter = RecordingPainter::default();
        frame.render(1.0 / 60.0, &mut painter);
        assert_eq!(painter.opacity_pushes, 1);

        frame.touch_up(60.0, 60.0, PointerId(0), 2_000_000);
        let mut painter = RecordingPainter::default();
        frame.render(1.0 / 60.0, &mut painter);
        assert_eq!(painter.opacity_pushes, 0);
    }
}
