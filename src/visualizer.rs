//! Decorative gradient shown on the playback screen.
//!
//! Two colours (left and right edge) are replaced by random ones every
//! `interval`, easing from the previous pair over `transition`. Time is
//! passed in by the caller so the animation follows the event loop's clock.

use std::time::{Duration, Instant};

use ratatui::style::Color;

use crate::config::VisualizerSettings;

const MIN_INTERVAL: Duration = Duration::from_millis(3000);
const MAX_INTERVAL: Duration = Duration::from_millis(5000);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Linear interpolation, `t` clamped to `[0, 1]`.
    pub fn lerp(self, to: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb(mix(self.0, to.0), mix(self.1, to.1), mix(self.2, to.2))
    }
}

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Color::Rgb(c.0, c.1, c.2)
    }
}

pub fn random_color() -> Rgb {
    Rgb(rand::random(), rand::random(), rand::random())
}

type ColorSource = Box<dyn FnMut() -> Rgb + Send>;

pub struct GradientVisualizer {
    interval: Duration,
    transition: Duration,
    from: (Rgb, Rgb),
    to: (Rgb, Rgb),
    changed_at: Instant,
    next_change: Instant,
    source: ColorSource,
}

impl GradientVisualizer {
    pub fn new(settings: &VisualizerSettings, now: Instant) -> Self {
        Self::with_source(settings, now, Box::new(random_color))
    }

    pub fn with_source(settings: &VisualizerSettings, now: Instant, mut source: ColorSource) -> Self {
        let interval = Duration::from_millis(settings.interval_ms).clamp(MIN_INTERVAL, MAX_INTERVAL);
        let pair = (source(), source());
        Self {
            interval,
            transition: Duration::from_millis(settings.transition_ms),
            from: pair,
            to: pair,
            changed_at: now,
            next_change: now + interval,
            source,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Pick a new target pair once the interval has elapsed.
    pub fn tick(&mut self, now: Instant) {
        if now < self.next_change {
            return;
        }
        self.retarget(now);
        // Skip missed intervals instead of replaying them.
        while self.next_change <= now {
            self.next_change += self.interval;
        }
    }

    /// Start over: new colours now and a full interval until the next change.
    pub fn reset(&mut self, now: Instant) {
        self.retarget(now);
        self.next_change = now + self.interval;
    }

    /// Current left and right colours.
    pub fn colors(&self, now: Instant) -> (Rgb, Rgb) {
        let t = if self.transition.is_zero() {
            1.0
        } else {
            let elapsed = now.saturating_duration_since(self.changed_at);
            elapsed.as_secs_f32() / self.transition.as_secs_f32()
        };
        (self.from.0.lerp(self.to.0, t), self.from.1.lerp(self.to.1, t))
    }

    fn retarget(&mut self, now: Instant) {
        self.from = self.colors(now);
        self.to = ((self.source)(), (self.source)());
        self.changed_at = now;
    }
}
