//! Fixed timestep clock
//!
//! Splits real elapsed time into fixed-length simulation ticks plus a
//! leftover fraction used for interpolation.

use std::time::{Duration, Instant};

use crate::config::RuntimeSettings;
use crate::console::ConsoleSpecs;

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Target tick rate in Hz
    pub tick_rate: u32,
    /// Maximum delta time clamp (prevents spiral of death)
    pub max_delta: Duration,
    /// CPU budget warning threshold per tick
    pub cpu_budget: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_rate: 30,
            max_delta: Duration::from_millis(100),
            cpu_budget: Duration::from_micros(33_000),
        }
    }
}

impl RuntimeConfig {
    /// Combine the console's defaults with user settings.
    ///
    /// A configured tick rate the console does not support is ignored.
    pub fn new(settings: &RuntimeSettings, specs: &ConsoleSpecs) -> Self {
        let tick_rate = match settings.tick_rate {
            Some(rate) if specs.tick_rates.contains(&rate) => rate,
            Some(rate) => {
                tracing::warn!(
                    "Tick rate {} Hz not supported by {} (supported: {:?}), using {} Hz",
                    rate,
                    specs.name,
                    specs.tick_rates,
                    specs.default_tick_hz()
                );
                specs.default_tick_hz()
            }
            None => specs.default_tick_hz(),
        };
        Self {
            tick_rate,
            max_delta: Duration::from_millis(settings.max_delta_ms.max(1)),
            cpu_budget: Duration::from_micros(specs.cpu_budget_us),
        }
    }
}

/// Accumulator-based fixed timestep.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    config: RuntimeConfig,
    accumulator: Duration,
    last_update: Option<Instant>,
    tick_duration: Duration,
}

impl FixedTimestep {
    pub fn new(config: RuntimeConfig) -> Self {
        let tick_duration = Duration::from_secs_f64(1.0 / config.tick_rate as f64);
        Self {
            config,
            accumulator: Duration::ZERO,
            last_update: None,
            tick_duration,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn tick_rate(&self) -> u32 {
        self.config.tick_rate
    }

    pub fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    /// Time since the previous call. The first call reports one tick.
    pub fn measure(&mut self, now: Instant) -> Duration {
        let delta = match self.last_update {
            Some(last) => now.saturating_duration_since(last),
            None => self.tick_duration,
        };
        self.last_update = Some(now);
        delta
    }

    /// Add a frame's delta to the accumulator, clamped to `max_delta`.
    ///
    /// Returns the clamped delta.
    pub fn accumulate(&mut self, delta: Duration) -> Duration {
        let delta = delta.min(self.config.max_delta);
        self.accumulator += delta;
        delta
    }

    /// Take one tick out of the accumulator if a whole tick is available.
    pub fn consume_tick(&mut self) -> bool {
        if self.accumulator >= self.tick_duration {
            self.accumulator -= self.tick_duration;
            true
        } else {
            false
        }
    }

    /// Drop any time left over from the previous level.
    pub fn reset_accumulator(&mut self) {
        self.accumulator = Duration::ZERO;
    }

    /// Interpolation factor between the last two ticks, at most 1.0.
    ///
    /// Time owed to ticks that were cut short by a transition does not
    /// count.
    pub fn alpha(&self) -> f32 {
        (self.accumulator.as_secs_f32() / self.tick_duration.as_secs_f32()).min(1.0)
    }

    /// Warn when a tick ran longer than the CPU budget.
    pub fn check_budget(&self, tick_time: Duration) {
        if tick_time > self.config.cpu_budget {
            tracing::warn!(
                "Tick took {:?}, exceeds budget of {:?}",
                tick_time,
                self.config.cpu_budget
            );
        }
    }
}
