//! Normalized-progress timers
//!
//! Every time-driven behavior in the simulation (ball ramp-up, powerup
//! durations) reads one of these instead of raw clocks. A timer maps the
//! session clock onto a value in [0, 1] according to its mode.

/// How the timer's value evolves once started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    /// Rises 0 -> 1 over one period, then auto-stops at 1
    Once,
    /// Cycles 0 -> 1 every period indefinitely
    Looping,
    /// Rises 0 -> 1 over one period, falls 1 -> 0 over the next, repeating
    PingPong,
}

/// A normalized-progress time source.
///
/// `progress` is a side-effecting query: it recomputes the value from the
/// elapsed time on every call while running. While stopped or paused it
/// returns the last computed value unchanged.
#[derive(Debug, Clone)]
pub struct Timer {
    period: f32,
    mode: TimerMode,
    running: bool,
    paused: bool,
    epoch: f64,
    value: f32,
    descending: bool,
}

impl Timer {
    pub fn new(period: f32, mode: TimerMode) -> Self {
        Self {
            // Zero/negative periods would divide to NaN; clamp defensively
            period: period.max(f32::EPSILON),
            mode,
            running: false,
            paused: false,
            epoch: 0.0,
            value: 0.0,
            descending: false,
        }
    }

    /// Capture `now` as the epoch and begin running.
    pub fn start(&mut self, now: f64) {
        self.epoch = now;
        self.paused = false;
        self.running = true;
    }

    /// Halt progress. The last computed value stays readable.
    pub fn stop(&mut self) {
        self.paused = false;
        self.running = false;
    }

    /// Freeze or unfreeze progress. Resuming recomputes the epoch so the
    /// value continues from where it was frozen.
    pub fn pause(&mut self, now: f64, paused: bool) {
        if !self.running {
            return;
        }
        self.paused = paused;
        if !paused {
            let consumed = match self.mode {
                TimerMode::Once | TimerMode::Looping => self.value * self.period,
                TimerMode::PingPong => {
                    self.period
                        * if self.descending {
                            2.0 - self.value
                        } else {
                            self.value
                        }
                }
            };
            self.epoch = now - consumed as f64;
        }
    }

    /// Current normalized value in [0, 1].
    ///
    /// A `Once` timer that reaches 1.0 stops itself; subsequent reads keep
    /// returning 1.0 until the timer is restarted.
    pub fn progress(&mut self, now: f64) -> f32 {
        if self.running && !self.paused {
            let elapsed = ((now - self.epoch) as f32).max(0.0);
            match self.mode {
                TimerMode::Once => {
                    self.value = (elapsed / self.period).min(1.0);
                    if self.value >= 1.0 {
                        self.running = false;
                        self.paused = false;
                    }
                }
                TimerMode::Looping => {
                    self.value = (elapsed % self.period) / self.period;
                }
                TimerMode::PingPong => {
                    let phase = (elapsed % (2.0 * self.period)) / self.period;
                    self.descending = phase > 1.0;
                    self.value = if phase <= 1.0 { phase } else { 2.0 - phase };
                }
            }
        }
        self.value
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// PingPong only: true while the value is falling from 1 toward 0.
    pub fn is_descending(&self) -> bool {
        self.descending
    }

    pub fn period(&self) -> f32 {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn once_ramps_and_auto_stops() {
        let mut t = Timer::new(2.0, TimerMode::Once);
        t.start(10.0);
        assert!(t.is_running());
        assert!((t.progress(11.0) - 0.5).abs() < 1e-6);
        assert_eq!(t.progress(12.0), 1.0);
        assert!(!t.is_running());
        // Saturated, not wrapping
        assert_eq!(t.progress(100.0), 1.0);
    }

    #[test]
    fn once_progress_is_monotonic() {
        let mut t = Timer::new(1.0, TimerMode::Once);
        t.start(0.0);
        let mut last = 0.0;
        for i in 0..=20 {
            let v = t.progress(i as f64 * 0.07);
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn stopped_value_is_cached_and_idempotent() {
        let mut t = Timer::new(1.0, TimerMode::Once);
        t.start(0.0);
        let _ = t.progress(0.25);
        t.stop();
        let frozen = t.progress(0.9);
        assert_eq!(frozen, t.progress(5.0));
        assert_eq!(frozen, t.progress(50.0));
    }

    #[test]
    fn looping_wraps() {
        let mut t = Timer::new(1.0, TimerMode::Looping);
        t.start(0.0);
        assert!((t.progress(0.25) - 0.25).abs() < 1e-6);
        assert!((t.progress(1.75) - 0.75).abs() < 1e-6);
        assert!(t.is_running());
    }

    #[test]
    fn pingpong_rises_then_falls() {
        let mut t = Timer::new(1.0, TimerMode::PingPong);
        t.start(0.0);
        assert!((t.progress(0.5) - 0.5).abs() < 1e-6);
        assert!(!t.is_descending());
        assert!((t.progress(1.5) - 0.5).abs() < 1e-6);
        assert!(t.is_descending());
        assert!((t.progress(2.25) - 0.25).abs() < 1e-6);
        assert!(!t.is_descending());
    }

    #[test]
    fn pause_freezes_and_resume_continues() {
        let mut t = Timer::new(1.0, TimerMode::Once);
        t.start(0.0);
        let _ = t.progress(0.4);
        t.pause(0.4, true);
        assert!((t.progress(0.8) - 0.4).abs() < 1e-6);
        t.pause(1.0, false);
        // 0.4 consumed before the pause; 0.3 more after resume
        assert!((t.progress(1.3) - 0.7).abs() < 1e-5);
    }

    #[test]
    fn pause_on_stopped_timer_is_a_no_op() {
        let mut t = Timer::new(1.0, TimerMode::Once);
        t.pause(0.0, true);
        assert!(!t.is_paused());
    }
}
