// Uptime, CPU, GPU, memory, disk and fan models

use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: u64 = 86_400;

/// Uptime decomposed the way a duration object does it: whole days plus the
/// seconds remaining within the current day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uptime {
    pub days: u64,
    pub seconds: u64,
}

impl Uptime {
    pub fn from_secs(total: u64) -> Self {
        Self {
            days: total / SECONDS_PER_DAY,
            seconds: total % SECONDS_PER_DAY,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuCore {
    #[serde(default = "default_online")]
    pub online: bool,
    /// Current frequency in kHz, as reported by cpufreq.
    pub cur_freq: u64,
}

fn default_online() -> bool {
    true
}

impl CpuCore {
    pub fn at(cur_freq: u64) -> Self {
        Self {
            online: true,
            cur_freq,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GpuStatus {
    /// Load percentage (0.0 to 100.0).
    pub load: f64,
}

/// RAM and SWAP usage in kB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    pub ram: RamUsage,
    pub swap: SwapUsage,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RamUsage {
    pub used: u64,
    pub shared: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapUsage {
    pub used: u64,
    pub total: u64,
}

/// Root filesystem usage in GB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskUsage {
    pub used: f64,
    pub total: f64,
    pub available: f64,
    pub available_no_root: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FanState {
    /// PWM duty as a percentage.
    pub speed: f64,
    pub rpm: f64,
}
