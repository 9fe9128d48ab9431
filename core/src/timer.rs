use std::fmt;
use std::time::Duration;

type TickCallback = Box<dyn FnMut(u32) + Send>;

/// Restartable counter of elapsed ticks.
///
/// The timer does not schedule itself: whoever owns it calls [`Timer::tick`] once per
/// [`Timer::interval`], from the same event loop that delivers input. Ticks while idle
/// are ignored, so the host can keep its interval running for the lifetime of the app.
pub struct Timer {
    interval: Duration,
    duration: u32,
    running: bool,
    on_tick: Option<TickCallback>,
}

impl Timer {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

    pub fn new() -> Self {
        Self::with_interval(Self::DEFAULT_INTERVAL)
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            duration: 0,
            running: false,
            on_tick: None,
        }
    }

    /// Registers the function called with the current duration after every counted tick.
    pub fn on_tick(&mut self, callback: impl FnMut(u32) + Send + 'static) {
        self.on_tick = Some(Box::new(callback));
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Returns `true` if the timer is started by this call, `false` if it was already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        true
    }

    /// Returns `true` if the timer is stopped by this call, `false` if it was not running.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        true
    }

    /// Stops the timer and returns it to its initial state.
    pub fn reset(&mut self) {
        self.running = false;
        self.duration = 0;
    }

    /// Counts one elapsed interval. Returns the new duration, or `None` while idle.
    pub fn tick(&mut self) -> Option<u32> {
        if !self.running {
            return None;
        }

        self.duration = self.duration.saturating_add(1);
        if let Some(on_tick) = self.on_tick.as_mut() {
            on_tick(self.duration);
        }
        Some(self.duration)
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("interval", &self.interval)
            .field("duration", &self.duration)
            .field("running", &self.running)
            .field("on_tick", &self.on_tick.is_some())
            .finish()
    }
}
