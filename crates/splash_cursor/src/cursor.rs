//! The mountable cursor effect
//!
//! `SplashCursor` wires a `ParticleEmitter` to a host: it binds a canvas to
//! the drawing surface, registers a frame callback and input/resize
//! listeners, and owns every registration so that unmounting (or dropping)
//! stops the loop and leaves nothing behind.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rand::RngCore;
use splash_animation::{Clock, FrameInfo, FrameRequest, SchedulerHandle};
use splash_core::{Point, Size};
use splash_paint::{Canvas, PixelSize, Surface};
use splash_platform::{
    Event, EventBusHandle, EventKind, InputEvent, ListenerGuard, MouseEvent, TouchEvent,
    WindowEvent,
};

use crate::config::{SplashConfig, Timestep};
use crate::emitter::{EmitterStats, ParticleEmitter};

/// Splat force for a pointer moving over the canvas
pub const MOVE_FORCE: f32 = 1.5;
/// Splat force for a pointer entering the canvas
pub const ENTER_FORCE: f32 = 2.0;
/// Splat force for a dragging touch
pub const TOUCH_FORCE: f32 = 1.5;

struct CursorState {
    surface: Box<dyn Surface>,
    canvas: Canvas,
    emitter: ParticleEmitter,
    timestep: Timestep,
    frames_rendered: u64,
    blobs_drawn: u64,
}

impl CursorState {
    fn render_frame(&mut self, info: &FrameInfo) {
        let steps = self.timestep.steps(info.delta_ms);
        let CursorState {
            surface,
            canvas,
            emitter,
            ..
        } = self;

        let mut drawn = 0;
        let frame = canvas.record(|ctx| {
            drawn = emitter.advance_and_render(ctx, steps);
        });
        surface.present(frame);

        self.frames_rendered += 1;
        self.blobs_drawn += drawn as u64;
        tracing::trace!(
            "frame {}: {} live, {} drawn",
            info.frame,
            self.emitter.live_count(),
            drawn
        );
    }

    /// Splat at a point in window coordinates
    fn splat_at_window_point(&mut self, x: f32, y: f32, force: f32) {
        // The emitter rejects points that land off the canvas
        let local = self.canvas.bounds().to_local(Point::new(x, y));
        self.emitter.on_pointer_move(local.x, local.y, force);
    }

    fn handle_pointer(&mut self, event: &Event) {
        match event {
            Event::Input(InputEvent::Mouse(MouseEvent::Moved { x, y })) => {
                self.splat_at_window_point(*x, *y, MOVE_FORCE);
            }
            Event::Input(InputEvent::Mouse(MouseEvent::Entered { x, y })) => {
                self.splat_at_window_point(*x, *y, ENTER_FORCE);
            }
            Event::Input(InputEvent::Touch(touch @ TouchEvent::Moved { .. })) => {
                if let Some(point) = touch.primary() {
                    self.splat_at_window_point(point.x, point.y, TOUCH_FORCE);
                }
            }
            _ => {}
        }
    }

    /// Re-read the container and resize the canvas to match
    fn resize(&mut self) {
        self.canvas
            .resize(self.surface.bounds(), self.surface.scale_factor());
        self.emitter.set_bounds(self.canvas.logical_size());
    }
}

/// Pointer-trail particle effect bound to a host surface
pub struct SplashCursor {
    state: Option<Rc<RefCell<CursorState>>>,
    running: Rc<Cell<bool>>,
    frame_request: Option<FrameRequest>,
    listeners: Vec<ListenerGuard>,
}

impl SplashCursor {
    /// Attach the effect to a surface and start its frame loop
    ///
    /// If no drawing context can be acquired the component is inert: no
    /// particles, no loop, no listeners. That is logged, never returned.
    pub fn mount<S, R>(
        surface: S,
        scheduler: &SchedulerHandle,
        events: &EventBusHandle,
        config: &SplashConfig,
        rng: R,
        clock: Rc<dyn Clock>,
    ) -> Self
    where
        S: Surface + 'static,
        R: RngCore + 'static,
    {
        let canvas = match Canvas::attach(&surface, config.canvas_options()) {
            Ok(canvas) => canvas,
            Err(err) => {
                tracing::debug!("splash cursor inert: {}", err);
                return Self::inert();
            }
        };

        let emitter = ParticleEmitter::new(
            config.resolve(),
            canvas.logical_size(),
            Box::new(rng),
            clock,
        );
        let state = Rc::new(RefCell::new(CursorState {
            surface: Box::new(surface),
            canvas,
            emitter,
            timestep: config.timestep,
            frames_rendered: 0,
            blobs_drawn: 0,
        }));
        let running = Rc::new(Cell::new(true));

        let frame_request = {
            let state = Rc::clone(&state);
            let running = Rc::clone(&running);
            scheduler.request_frames(move |info| {
                if running.get() {
                    state.borrow_mut().render_frame(info);
                }
            })
        };
        if frame_request.is_none() {
            tracing::debug!("frame scheduler gone; splash cursor will not animate");
        }

        let mut listeners = Vec::with_capacity(3);
        for kind in [EventKind::Mouse, EventKind::Touch] {
            let state = Rc::clone(&state);
            listeners.extend(events.subscribe(kind, move |event| {
                state.borrow_mut().handle_pointer(event);
            }));
        }
        {
            let state = Rc::clone(&state);
            listeners.extend(events.subscribe(EventKind::Window, move |event| {
                if let Event::Window(
                    WindowEvent::Resized { .. } | WindowEvent::ScaleFactorChanged { .. },
                ) = event
                {
                    state.borrow_mut().resize();
                }
            }));
        }

        tracing::debug!(
            "splash cursor mounted: {:?} px, {} listeners",
            state.borrow().canvas.pixel_size(),
            listeners.len()
        );

        Self {
            state: Some(state),
            running,
            frame_request,
            listeners,
        }
    }

    fn inert() -> Self {
        Self {
            state: None,
            running: Rc::new(Cell::new(false)),
            frame_request: None,
            listeners: Vec::new(),
        }
    }

    /// Stop the loop and release every registration
    ///
    /// Safe to call more than once; `Drop` calls it too.
    pub fn unmount(&mut self) {
        let was_running = self.running.replace(false);
        if let Some(mut request) = self.frame_request.take() {
            request.cancel();
        }
        self.listeners.clear();
        if let Some(state) = &self.state {
            state.borrow_mut().emitter.clear();
        }
        if was_running {
            tracing::debug!("splash cursor unmounted");
        }
    }

    /// Splat at a canvas-local point, as a pointer move would
    pub fn on_pointer_move(&self, x: f32, y: f32, force: f32) {
        if !self.running.get() {
            return;
        }
        if let Some(state) = &self.state {
            state.borrow_mut().emitter.on_pointer_move(x, y, force);
        }
    }

    /// Whether the effect is mounted and animating
    pub fn is_active(&self) -> bool {
        self.running.get()
            && self
                .frame_request
                .as_ref()
                .map(FrameRequest::is_active)
                .unwrap_or(false)
    }

    /// Whether a drawing surface was acquired at mount
    pub fn has_surface(&self) -> bool {
        self.state.is_some()
    }

    /// Live particle count
    pub fn live_count(&self) -> usize {
        self.with_state(|s| s.emitter.live_count()).unwrap_or(0)
    }

    /// Frames drawn since mount
    pub fn frames_rendered(&self) -> u64 {
        self.with_state(|s| s.frames_rendered).unwrap_or(0)
    }

    /// Particle blobs drawn since mount
    pub fn blobs_drawn(&self) -> u64 {
        self.with_state(|s| s.blobs_drawn).unwrap_or(0)
    }

    /// Canvas backing-store size, `None` when inert
    pub fn canvas_size(&self) -> Option<PixelSize> {
        self.with_state(|s| s.canvas.pixel_size())
    }

    /// Canvas size in logical pixels, `None` when inert
    pub fn logical_size(&self) -> Option<Size> {
        self.with_state(|s| s.canvas.logical_size())
    }

    /// Whether the canvas runs below the host's pixel ratio
    pub fn is_downgraded(&self) -> bool {
        self.with_state(|s| s.canvas.is_downgraded())
            .unwrap_or(false)
    }

    pub fn stats(&self) -> EmitterStats {
        self.with_state(|s| s.emitter.stats()).unwrap_or_default()
    }

    /// Copy of the live particle set
    pub fn particles(&self) -> Vec<crate::Particle> {
        self.with_state(|s| s.emitter.particles().to_vec())
            .unwrap_or_default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&CursorState) -> T) -> Option<T> {
        self.state.as_ref().map(|state| f(&state.borrow()))
    }
}

impl Drop for SplashCursor {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for SplashCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SplashCursor")
            .field("running", &self.running.get())
            .field("has_surface", &self.has_surface())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use splash_animation::{FrameScheduler, ManualClock};
    use splash_core::{BlendMode, Rect};
    use splash_paint::HeadlessSurface;
    use splash_platform::{EventBus, TouchPoint};

    struct Host {
        scheduler: FrameScheduler,
        bus: EventBus,
        clock: ManualClock,
    }

    impl Host {
        fn new() -> Self {
            let clock = ManualClock::new(0.0);
            Self {
                scheduler: FrameScheduler::new(Rc::new(clock.clone())),
                bus: EventBus::new(),
                clock,
            }
        }

        fn mount(&self, surface: HeadlessSurface) -> SplashCursor {
            SplashCursor::mount(
                surface,
                &self.scheduler.handle(),
                &self.bus.handle(),
                &SplashConfig::default(),
                ChaCha8Rng::seed_from_u64(1),
                Rc::new(self.clock.clone()),
            )
        }

        fn frame(&self) {
            self.clock.advance(1000.0 / 60.0);
            self.scheduler.tick();
        }
    }

    fn surface_at(x: f32, y: f32) -> HeadlessSurface {
        HeadlessSurface::new(Rect::new(x, y, 400.0, 300.0), 1.0)
    }

    #[test]
    fn test_mount_registers_everything() {
        let host = Host::new();
        let cursor = host.mount(surface_at(0.0, 0.0));
        assert!(cursor.is_active());
        assert_eq!(host.scheduler.callback_count(), 1);
        assert_eq!(host.bus.listener_count(), 3);
        assert_eq!(cursor.canvas_size(), Some(PixelSize::new(400, 300)));
    }

    #[test]
    fn test_mouse_events_use_canvas_local_coordinates() {
        let host = Host::new();
        let cursor = host.mount(surface_at(100.0, 100.0));

        host.bus.dispatch(&Event::mouse_moved(150.0, 150.0));
        assert_eq!(cursor.live_count(), 3);
        for p in cursor.particles() {
            assert!((p.position.x - 50.0).abs() <= 10.0);
        }

        // Left of the canvas
        host.bus.dispatch(&Event::mouse_moved(50.0, 150.0));
        assert_eq!(cursor.live_count(), 3);
        assert_eq!(cursor.stats().rejected, 1);
    }

    #[test]
    fn test_enter_and_touch_splat() {
        let host = Host::new();
        let cursor = host.mount(surface_at(0.0, 0.0));

        host.bus.dispatch(&Event::Input(InputEvent::Mouse(MouseEvent::Entered {
            x: 10.0,
            y: 10.0,
        })));
        host.bus.dispatch(&Event::Input(InputEvent::Touch(TouchEvent::moved([
            TouchPoint::new(1, 20.0, 20.0),
            TouchPoint::new(2, 390.0, 290.0),
        ]))));
        host.bus.dispatch(&Event::Input(InputEvent::Mouse(MouseEvent::Left)));

        // One splat each; only the first touch counts
        assert_eq!(cursor.live_count(), 6);
    }

    #[test]
    fn test_frames_present_to_surface() {
        let host = Host::new();
        let surface = surface_at(0.0, 0.0);
        let cursor = host.mount(surface.clone());

        cursor.on_pointer_move(50.0, 50.0, 1.5);
        host.frame();
        host.frame();

        assert_eq!(cursor.frames_rendered(), 2);
        assert_eq!(surface.presented_frames(), 2);
        assert_eq!(cursor.blobs_drawn(), 6);

        let frame = surface.last_frame().unwrap();
        assert_eq!(frame.composite.blend_mode, BlendMode::Screen);
        assert_eq!(frame.composite.opacity, 0.4);
    }

    #[test]
    fn test_resize_reads_container() {
        let host = Host::new();
        let surface = surface_at(0.0, 0.0);
        let cursor = host.mount(surface.clone());

        surface.set_bounds(Rect::new(0.0, 0.0, 100.0, 80.0));
        surface.set_scale_factor(2.0);
        host.bus.dispatch(&Event::Window(WindowEvent::Resized {
            width: 100.0,
            height: 80.0,
        }));

        assert_eq!(cursor.canvas_size(), Some(PixelSize::new(200, 160)));
        assert_eq!(cursor.logical_size(), Some(Size::new(100.0, 80.0)));
        assert_eq!(cursor.live_count(), 0);

        cursor.on_pointer_move(150.0, 10.0, 1.5);
        assert_eq!(cursor.live_count(), 0);
    }

    #[test]
    fn test_unmount_releases_and_is_idempotent() {
        let host = Host::new();
        let mut cursor = host.mount(surface_at(0.0, 0.0));
        cursor.on_pointer_move(10.0, 10.0, 1.5);

        cursor.unmount();
        assert!(!cursor.is_active());
        assert_eq!(host.scheduler.callback_count(), 0);
        assert_eq!(host.bus.listener_count(), 0);
        assert_eq!(cursor.live_count(), 0);

        cursor.unmount();
        host.frame();
        assert_eq!(cursor.frames_rendered(), 0);

        cursor.on_pointer_move(10.0, 10.0, 1.5);
        assert_eq!(cursor.live_count(), 0);
    }

    #[test]
    fn test_drop_releases() {
        let host = Host::new();
        let cursor = host.mount(surface_at(0.0, 0.0));
        drop(cursor);
        assert!(!host.scheduler.has_pending());
        assert_eq!(host.bus.listener_count(), 0);
    }

    #[test]
    fn test_inert_without_context() {
        let host = Host::new();
        let surface = HeadlessSurface::unavailable(Rect::new(0.0, 0.0, 10.0, 10.0));
        let cursor = host.mount(surface.clone());

        assert!(!cursor.is_active());
        assert!(!cursor.has_surface());
        assert_eq!(cursor.canvas_size(), None);
        assert_eq!(host.scheduler.callback_count(), 0);
        assert_eq!(host.bus.listener_count(), 0);

        cursor.on_pointer_move(5.0, 5.0, 1.5);
        host.frame();
        assert_eq!(cursor.live_count(), 0);
        assert_eq!(surface.presented_frames(), 0);
    }

    #[test]
    fn test_mount_after_scheduler_dropped() {
        let host = Host::new();
        let handle = host.scheduler.handle();
        let Host { scheduler, bus, clock } = host;
        drop(scheduler);

        let cursor = SplashCursor::mount(
            surface_at(0.0, 0.0),
            &handle,
            &bus.handle(),
            &SplashConfig::default(),
            ChaCha8Rng::seed_from_u64(1),
            Rc::new(clock),
        );
        assert!(!cursor.is_active());
        // Input still lands; nothing advances it
        cursor.on_pointer_move(10.0, 10.0, 1.5);
        assert_eq!(cursor.live_count(), 3);
    }
}
