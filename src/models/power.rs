// Power rail readings

use serde::{Deserialize, Serialize};

/// One INA3221 channel: milliwatts, millivolts, milliamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RailReading {
    pub power: f64,
    pub volt: f64,
    pub curr: f64,
}
