// Telemetry snapshot models

mod board;
mod power;
mod resources;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use board::BoardInfo;
pub use power::RailReading;
pub use resources::{CpuCore, DiskUsage, FanState, GpuStatus, Memory, RamUsage, SwapUsage, Uptime};

/// Point-in-time read of the board. Frozen once returned by a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub board: BoardInfo,
    pub power_mode: String,
    pub uptime: Uptime,
    /// One entry per physical core, in core-index order.
    pub cpu: Vec<CpuCore>,
    #[serde(default)]
    pub gpu: BTreeMap<String, GpuStatus>,
    pub memory: Memory,
    pub disk: DiskUsage,
    #[serde(default)]
    pub fan: BTreeMap<String, FanState>,
    /// Sparse: boards only expose some of the known sensors.
    #[serde(default)]
    pub temperature: BTreeMap<String, f64>,
    #[serde(default)]
    pub rails: BTreeMap<String, RailReading>,
}
