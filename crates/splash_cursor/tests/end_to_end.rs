//! Whole-pipeline scenarios: host loop, scheduler, listeners, emitter, surface

use std::rc::Rc;

use splash_animation::{FrameScheduler, ManualClock};
use splash_cursor::{seeded_rng, SplashConfig, SplashCursor, Timestep};
use splash_paint::{HeadlessSurface, PixelSize, Rect, Surface};
use splash_platform::{
    ControlFlow, Event, EventBus, EventLoop, HeadlessEventLoop, Window, WindowConfig, WindowEvent,
};

const FRAME_MS: f64 = 1000.0 / 60.0;

struct Harness {
    clock: ManualClock,
    scheduler: FrameScheduler,
    bus: EventBus,
    surface: HeadlessSurface,
}

impl Harness {
    fn new(width: f32, height: f32) -> Self {
        let clock = ManualClock::new(0.0);
        Self {
            scheduler: FrameScheduler::new(Rc::new(clock.clone())),
            bus: EventBus::new(),
            surface: HeadlessSurface::new(Rect::new(0.0, 0.0, width, height), 1.0),
            clock,
        }
    }

    fn mount(&self, config: &SplashConfig) -> SplashCursor {
        SplashCursor::mount(
            self.surface.clone(),
            &self.scheduler.handle(),
            &self.bus.handle(),
            config,
            seeded_rng(Some(2024)),
            Rc::new(self.clock.clone()),
        )
    }

    fn run_frames(&self, n: usize) {
        for _ in 0..n {
            self.clock.advance(FRAME_MS);
            self.scheduler.tick();
        }
    }
}

#[test]
fn test_splat_then_ten_frames() {
    let harness = Harness::new(400.0, 300.0);
    let cursor = harness.mount(&SplashConfig::default());

    cursor.on_pointer_move(50.0, 50.0, 1.5);
    let spawned = cursor.particles();
    assert_eq!(spawned.len(), 3);
    for p in &spawned {
        assert_eq!(p.life(), 1.0);
        assert!((p.position.x - 50.0).abs() <= 10.0);
        assert!((p.position.y - 50.0).abs() <= 10.0);
    }

    harness.run_frames(10);
    let after = cursor.particles();
    assert_eq!(after.len(), 3);
    for p in &after {
        assert!((p.life() - 0.92).abs() < 1e-5, "life {}", p.life());
    }
}

#[test]
fn test_single_particle_gone_at_frame_126() {
    let mut config = SplashConfig::default();
    config.particles.per_splat = 1;
    let harness = Harness::new(400.0, 300.0);
    let cursor = harness.mount(&config);

    cursor.on_pointer_move(200.0, 150.0, 1.5);
    assert_eq!(cursor.live_count(), 1);

    harness.run_frames(125);
    assert_eq!(cursor.live_count(), 1);

    harness.run_frames(1);
    assert_eq!(cursor.live_count(), 0);
    assert_eq!(cursor.stats().expired, 1);
}

#[test]
fn test_out_of_bounds_leaves_live_set() {
    let harness = Harness::new(400.0, 300.0);
    let cursor = harness.mount(&SplashConfig::default());
    cursor.on_pointer_move(10.0, 10.0, 1.5);

    cursor.on_pointer_move(401.0, 10.0, 1.5);
    cursor.on_pointer_move(10.0, -0.5, 1.5);
    harness.bus.dispatch(&Event::mouse_moved(-20.0, 20.0));
    assert_eq!(cursor.live_count(), 3);
}

#[test]
fn test_resize_with_empty_live_set() {
    let harness = Harness::new(400.0, 300.0);
    let cursor = harness.mount(&SplashConfig::default());
    assert_eq!(cursor.live_count(), 0);

    harness.surface.set_bounds(Rect::new(0.0, 0.0, 1024.0, 768.0));
    harness.surface.set_scale_factor(1.5);
    harness
        .bus
        .dispatch(&Event::Window(WindowEvent::ScaleFactorChanged {
            scale_factor: 1.5,
        }));

    assert_eq!(cursor.canvas_size(), Some(PixelSize::new(1536, 1152)));
    harness.run_frames(3);
    assert_eq!(cursor.frames_rendered(), 3);
}

#[test]
fn test_texture_limit_downgrades_quietly() {
    let harness = Harness {
        surface: HeadlessSurface::new(Rect::new(0.0, 0.0, 3000.0, 1000.0), 2.0)
            .with_max_texture_dimension(4096),
        ..Harness::new(0.0, 0.0)
    };
    let cursor = harness.mount(&SplashConfig::default());

    assert!(cursor.is_active());
    assert!(cursor.is_downgraded());
    let size = cursor.canvas_size().unwrap();
    assert!(size.width <= 4096);

    cursor.on_pointer_move(2500.0, 500.0, 1.5);
    harness.run_frames(1);
    assert_eq!(cursor.blobs_drawn(), 3);
}

#[test]
fn test_unmount_releases_loop_and_listeners() {
    let harness = Harness::new(400.0, 300.0);
    let mut cursor = harness.mount(&SplashConfig::default());
    harness.run_frames(2);

    cursor.unmount();
    assert_eq!(harness.scheduler.callback_count(), 0);
    assert_eq!(harness.bus.listener_count(), 0);

    harness.run_frames(5);
    assert_eq!(cursor.frames_rendered(), 2);
    assert_eq!(harness.surface.presented_frames(), 2);
}

#[test]
fn test_missing_surface_is_inert() {
    let harness = Harness {
        surface: HeadlessSurface::unavailable(Rect::new(0.0, 0.0, 400.0, 300.0)),
        ..Harness::new(0.0, 0.0)
    };
    let cursor = harness.mount(&SplashConfig::default());

    harness.bus.dispatch(&Event::mouse_moved(10.0, 10.0));
    harness.run_frames(3);

    assert!(!cursor.is_active());
    assert_eq!(cursor.live_count(), 0);
    assert_eq!(harness.surface.presented_frames(), 0);
    assert!(!harness.scheduler.has_pending());
}

#[test]
fn test_scaled_timestep_matches_per_frame_at_reference_rate() {
    let per_frame = Harness::new(400.0, 300.0);
    let a = per_frame.mount(&SplashConfig::default());

    let scaled = Harness::new(400.0, 300.0);
    let b = scaled.mount(&SplashConfig {
        timestep: Timestep::Scaled {
            reference_fps: 60.0,
        },
        ..Default::default()
    });

    a.on_pointer_move(100.0, 100.0, 1.5);
    b.on_pointer_move(100.0, 100.0, 1.5);
    per_frame.run_frames(30);
    scaled.run_frames(30);

    for (pa, pb) in a.particles().iter().zip(b.particles().iter()) {
        assert!((pa.life() - pb.life()).abs() < 1e-4);
        assert!((pa.position.x - pb.position.x).abs() < 1e-2);
        assert!((pa.position.y - pb.position.y).abs() < 1e-2);
    }
}

#[test]
fn test_scaled_timestep_ages_by_elapsed_time() {
    let harness = Harness::new(400.0, 300.0);
    let cursor = harness.mount(&SplashConfig {
        timestep: Timestep::Scaled {
            reference_fps: 60.0,
        },
        ..Default::default()
    });
    cursor.on_pointer_move(100.0, 100.0, 1.5);

    // First frame counts as one step, then 30 fps frames count double
    harness.scheduler.tick();
    for _ in 0..5 {
        harness.clock.advance(2.0 * FRAME_MS);
        harness.scheduler.tick();
    }

    let life = cursor.particles()[0].life();
    assert!((life - (1.0 - 11.0 * 0.008)).abs() < 1e-4, "life {}", life);
}

#[test]
fn test_headless_loop_drives_effect() {
    let harness = Harness::new(800.0, 600.0);
    let cursor = harness.mount(&SplashConfig::default());

    let window = WindowConfig::new("e2e").size(800.0, 600.0);
    let mut event_loop = HeadlessEventLoop::new(&window, 60, 60.0).unwrap();
    for frame in 1..=20u64 {
        let x = 100.0 + frame as f32 * 20.0;
        event_loop.push(frame, Event::mouse_moved(x, 300.0)).unwrap();
    }
    event_loop
        .push(
            30,
            Event::Window(WindowEvent::Resized {
                width: 400.0,
                height: 300.0,
            }),
        )
        .unwrap();

    let interval = event_loop.frame_interval_ms();
    let surface = harness.surface.clone();
    event_loop
        .run(|event, window| {
            match &event {
                Event::Frame => {
                    harness.clock.advance(interval);
                    harness.scheduler.tick();
                }
                Event::Window(WindowEvent::Resized { .. }) => {
                    let (w, h) = window.logical_size();
                    surface.set_bounds(Rect::new(0.0, 0.0, w, h));
                    harness.bus.dispatch(&event);
                }
                _ => {
                    harness.bus.dispatch(&event);
                }
            }
            ControlFlow::Continue
        })
        .unwrap();

    assert_eq!(cursor.frames_rendered(), 60);
    assert_eq!(cursor.stats().emitted, 60);
    assert_eq!(cursor.live_count(), 60);
    assert_eq!(cursor.canvas_size(), Some(PixelSize::new(400, 300)));
    assert_eq!(harness.surface.bounds(), Rect::new(0.0, 0.0, 400.0, 300.0));
}
