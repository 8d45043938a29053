//! Headless preloader run
//!
//! Steps a [`Preloader`] on a manual clock until it completes, painting
//! every step into a recording context, and reports when each phase began.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use splash_animation::{Clock, ManualClock};
use splash_core::{RecordingContext, Size};
use splash_cursor::seeded_rng;
use splash_widgets::{Preloader, PreloaderConfig, PreloaderPhase, MIN_TICK_MS};
use tracing::debug;

/// Upper bound on simulated time, far past any sane loading screen
const MAX_RUN_MS: f64 = 600_000.0;

#[derive(Debug, Serialize)]
pub struct PhaseChange {
    pub at_ms: f64,
    pub phase: String,
    pub percent: u32,
}

/// What one preloader run produced
#[derive(Debug, Serialize)]
pub struct PreloadReport {
    pub tick_ms: f64,
    pub steps: u64,
    pub completed: bool,
    pub completions: u32,
    pub finished_at_ms: f64,
    pub commands_drawn: u64,
    pub timeline: Vec<PhaseChange>,
}

impl fmt::Display for PreloadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for change in &self.timeline {
            writeln!(
                f,
                "{:>9.1} ms  {:<9} {:>3}%",
                change.at_ms, change.phase, change.percent
            )?;
        }
        writeln!(
            f,
            "{} after {} steps ({:.1} ms), completion fired {} time(s)",
            if self.completed { "Completed" } else { "Stopped" },
            self.steps,
            self.finished_at_ms,
            self.completions
        )?;
        writeln!(f, "Draw commands: {}", self.commands_drawn)
    }
}

fn phase_name(phase: PreloaderPhase) -> String {
    format!("{:?}", phase).to_lowercase()
}

/// Reject step intervals the preloader would not honor
pub fn check_tick_ms(tick_ms: f64) -> anyhow::Result<()> {
    if !(tick_ms.is_finite() && tick_ms >= MIN_TICK_MS) {
        anyhow::bail!(
            "Invalid tick interval {}ms: must be at least {}ms",
            tick_ms,
            MIN_TICK_MS
        );
    }
    Ok(())
}

/// Run the preloader at `tick_ms` resolution until it completes
pub fn run(seed: Option<u64>, tick_ms: f64) -> PreloadReport {
    let clock = ManualClock::new(0.0);
    let completions = Rc::new(Cell::new(0u32));

    let config = PreloaderConfig::new().tick_ms(tick_ms);
    let mut preloader = {
        let completions = Rc::clone(&completions);
        Preloader::new(config, seeded_rng(seed), clock.now_ms())
            .on_complete(move || completions.set(completions.get() + 1))
    };

    let viewport = Size::new(1280.0, 720.0);
    let mut timeline = vec![PhaseChange {
        at_ms: 0.0,
        phase: phase_name(preloader.phase()),
        percent: preloader.display_percent(),
    }];
    let mut steps = 0;
    let mut commands_drawn = 0;

    while !preloader.is_complete() && clock.now_ms() < MAX_RUN_MS {
        clock.advance(tick_ms);
        let now = clock.now_ms();
        let before = preloader.phase();
        preloader.advance(now);
        steps += 1;

        let mut ctx = RecordingContext::new(viewport);
        preloader.paint(&mut ctx, viewport, now);
        commands_drawn += ctx.commands().len() as u64;

        if preloader.phase() != before {
            debug!("preloader {:?} -> {:?} at {} ms", before, preloader.phase(), now);
            timeline.push(PhaseChange {
                at_ms: now,
                phase: phase_name(preloader.phase()),
                percent: preloader.display_percent(),
            });
        }
    }

    // Late ticks after completion must not fire the callback again
    for _ in 0..3 {
        clock.advance(tick_ms);
        preloader.advance(clock.now_ms());
    }

    PreloadReport {
        tick_ms: preloader.tick_ms(),
        steps,
        completed: preloader.is_complete(),
        completions: completions.get(),
        finished_at_ms: clock.now_ms() - 3.0 * tick_ms,
        commands_drawn,
        timeline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_completes_once() {
        let report = run(Some(3), 50.0);
        assert!(report.completed);
        assert_eq!(report.completions, 1);
        let phases: Vec<_> = report.timeline.iter().map(|c| c.phase.as_str()).collect();
        assert_eq!(phases, ["loading", "holding", "exiting", "complete"]);
    }

    #[test]
    fn test_hold_and_exit_spacing() {
        let report = run(Some(11), 50.0);
        let at = |phase: &str| {
            report
                .timeline
                .iter()
                .find(|c| c.phase == phase)
                .map(|c| c.at_ms)
                .unwrap()
        };
        assert!((at("exiting") - at("holding") - 500.0).abs() <= 50.0);
        assert!((at("complete") - at("exiting") - 800.0).abs() <= 50.0);
        assert_eq!(report.timeline[1].percent, 100);
    }

    #[test]
    fn test_sub_millisecond_tick_rejected() {
        assert!(check_tick_ms(0.5).is_err());
        assert!(check_tick_ms(0.0).is_err());
        assert!(check_tick_ms(f64::NAN).is_err());
        assert!(check_tick_ms(MIN_TICK_MS).is_ok());
        assert!(check_tick_ms(50.0).is_ok());
    }

    #[test]
    fn test_report_shows_interval_in_use() {
        assert_eq!(run(Some(3), 50.0).tick_ms, 50.0);
    }

    #[test]
    fn test_same_seed_same_timeline() {
        let a = run(Some(5), 50.0);
        let b = run(Some(5), 50.0);
        assert_eq!(a.finished_at_ms, b.finished_at_ms);
        assert_eq!(a.commands_drawn, b.commands_drawn);
    }
}
