// Thermal zones and fan state.

use super::{entries_with_prefix, read_number, read_trimmed};
use crate::models::FanState;
use crate::schema::FAN_UNIT;
use std::collections::BTreeMap;
use std::path::Path;

const PWM_MAX: f64 = 255.0;

/// Temperatures in degrees C keyed by sensor name (`CPU-therm` -> `CPU`,
/// `Tdiode_tegra` -> `Tdiode`). Zones that cannot be read are left out.
pub(super) fn read_temperatures(root: &Path) -> BTreeMap<String, f64> {
    let mut zones = entries_with_prefix(&root.join("sys/class/thermal"), "thermal_zone");
    zones.sort_by_key(|p| zone_index(p));

    let mut temps = BTreeMap::new();
    for zone in zones {
        let Some(kind) = read_trimmed(&zone.join("type")) else {
            continue;
        };
        let Some(millideg) = read_number::<f64>(&zone.join("temp")) else {
            continue;
        };
        temps
            .entry(sensor_name(&kind).to_string())
            .or_insert(millideg / 1000.0);
    }
    temps
}

fn zone_index(path: &Path) -> u32 {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_prefix("thermal_zone"))
        .and_then(|n| n.parse().ok())
        .unwrap_or(u32::MAX)
}

fn sensor_name(kind: &str) -> &str {
    kind.split(['-', '_']).next().unwrap_or(kind)
}

/// The tegra pwm fan is reported under `FAN_UNIT`, from the hwmon `pwmfan`
/// device (newer L4T) or the legacy `pwm-fan` node. Other hwmon pwm fans are
/// keyed by their hwmon name.
pub(super) fn read_fans(root: &Path) -> BTreeMap<String, FanState> {
    let mut fans = BTreeMap::new();

    for hwmon in entries_with_prefix(&root.join("sys/class/hwmon"), "hwmon") {
        let Some(name) = read_trimmed(&hwmon.join("name")) else {
            continue;
        };
        if !name.contains("pwm") {
            continue;
        }
        let Some(pwm) = read_number::<f64>(&hwmon.join("pwm1")) else {
            continue;
        };
        let rpm = read_number::<f64>(&hwmon.join("rpm"))
            .or_else(|| read_number(&hwmon.join("fan1_input")))
            .unwrap_or(0.0);
        fans.insert(fan_unit(name), fan_state(pwm, rpm));
    }

    let legacy = root.join("sys/devices/pwm-fan");
    if let Some(pwm) = read_number::<f64>(&legacy.join("target_pwm")) {
        let rpm = read_number(&legacy.join("rpm_measured")).unwrap_or(0.0);
        fans.insert(FAN_UNIT.to_string(), fan_state(pwm, rpm));
    }

    fans
}

/// Hwmon names the tegra pwm-fan driver registers under.
const TEGRA_FAN_HWMON: [&str; 2] = ["pwmfan", "pwm_fan"];

fn fan_unit(hwmon_name: String) -> String {
    if TEGRA_FAN_HWMON.contains(&hwmon_name.as_str()) {
        FAN_UNIT.to_string()
    } else {
        hwmon_name
    }
}

fn fan_state(pwm: f64, rpm: f64) -> FanState {
    FanState {
        speed: pwm * 100.0 / PWM_MAX,
        rpm,
    }
}
