//! Console specifications for the Partybox console.

/// Specifications for the console.
///
/// Defines the fixed hardware limits the engine targets. Used by the runner
/// for the tick rate and by the launcher for display metadata.
#[derive(Debug, Clone)]
pub struct ConsoleSpecs {
    /// Console name
    pub name: &'static str,
    /// Framebuffer resolution (width, height)
    pub resolution: (u32, u32),
    /// Available fixed-update tick rates in Hz
    pub tick_rates: &'static [u32],
    /// Default tick rate index
    pub default_tick_rate: usize,
    /// Size of the non-volatile save memory in bytes
    pub save_memory: usize,
    /// CPU budget per fixed tick in microseconds
    pub cpu_budget_us: u64,
}

impl ConsoleSpecs {
    /// The default fixed-update rate in Hz.
    pub fn default_tick_hz(&self) -> u32 {
        self.tick_rates[self.default_tick_rate]
    }
}

/// Partybox tick rates (fixed updates per second)
pub const PARTYBOX_TICK_RATES: &[u32] = &[30, 60];

/// Get Partybox console specifications.
///
/// A 320x240 framebuffer console with four controller ports and a small
/// EEPROM, enough for a single tournament record.
pub const fn partybox_specs() -> &'static ConsoleSpecs {
    &ConsoleSpecs {
        name: "Partybox",
        resolution: (320, 240),
        tick_rates: PARTYBOX_TICK_RATES,
        default_tick_rate: 0,
        save_memory: 512,
        cpu_budget_us: 33_000,
    }
}
