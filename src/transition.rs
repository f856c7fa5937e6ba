//! Bar transitions between scenes.
//!
//! Every bar animates over a fixed duration after a per-country delay, with
//! cubic in-out easing. A new target arriving mid-flight supersedes the old
//! transition: bars restart from wherever they are drawn at that instant.

use crate::chart::{BarGeom, Scene};
use std::time::Duration;

/// SMIL `keySplines` approximating [`ease_cubic_in_out`].
pub const CUBIC_IN_OUT_SPLINE: &str = "0.645 0.045 0.355 1";

pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

pub fn lerp_geom(from: &BarGeom, to: &BarGeom, t: f64) -> BarGeom {
    BarGeom {
        x: lerp(from.x, to.x, t),
        y: lerp(from.y, to.y, t),
        width: lerp(from.width, to.width, t),
        height: lerp(from.height, to.height, t),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Track {
    from: BarGeom,
    to: BarGeom,
    delay: Duration,
}

/// Drives bar geometry over time for a sequence of target scenes.
///
/// Time is passed in explicitly as "elapsed since the animator was created"
/// so the caller owns the clock.
#[derive(Debug, Clone, Default)]
pub struct Animator {
    tracks: Vec<Track>,
    started: Duration,
    duration: Duration,
    generation: u64,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of targets applied so far; bumps on every [`Animator::retarget`].
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Point every bar at `scene`, starting from its geometry at `now`.
    ///
    /// Bars that did not exist before enter from the collapsed baseline.
    /// Bars beyond the new scene's count are dropped.
    pub fn retarget(&mut self, scene: &Scene, now: Duration) {
        let current = self.frame(now);
        self.tracks = scene
            .bars
            .iter()
            .enumerate()
            .map(|(i, bar)| Track {
                from: current.get(i).copied().unwrap_or_else(|| {
                    BarGeom::collapsed(bar.geom.x, bar.geom.width, scene.baseline_y)
                }),
                to: bar.geom,
                delay: bar.delay,
            })
            .collect();
        self.started = now;
        self.duration = scene.duration;
        self.generation += 1;
        log::debug!(
            "transition {} towards {} mode ({} bars)",
            self.generation,
            scene.mode,
            self.tracks.len()
        );
    }

    /// Eased progress of the bar with `delay` at time `now`.
    fn progress(&self, delay: Duration, now: Duration) -> f64 {
        let since = now.saturating_sub(self.started);
        if since <= delay {
            return 0.0;
        }
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = (since - delay).as_secs_f64() / self.duration.as_secs_f64();
        ease_cubic_in_out(t)
    }

    /// Interpolated geometry of every bar at `now`.
    pub fn frame(&self, now: Duration) -> Vec<BarGeom> {
        self.tracks
            .iter()
            .map(|t| lerp_geom(&t.from, &t.to, self.progress(t.delay, now)))
            .collect()
    }

    /// True while any bar has not reached its target.
    pub fn is_running(&self, now: Duration) -> bool {
        let since = now.saturating_sub(self.started);
        self.tracks
            .iter()
            .any(|t| since < t.delay + self.duration)
    }
}
