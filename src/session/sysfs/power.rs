// INA3221 power monitor rails (iio driver on L4T 32, hwmon driver on L4T 35+).

use super::{entries_with_prefix, read_number, read_trimmed};
use crate::models::RailReading;
use std::collections::BTreeMap;
use std::path::Path;

const CHANNELS: usize = 3;

pub(super) fn read_rails(root: &Path) -> BTreeMap<String, RailReading> {
    let mut rails = BTreeMap::new();
    read_iio_rails(root, &mut rails);
    read_hwmon_rails(root, &mut rails);
    rails
}

/// `rail_name_N` with `in_power/voltage/currentN_input` in mW, mV and mA.
fn read_iio_rails(root: &Path, rails: &mut BTreeMap<String, RailReading>) {
    for device in entries_with_prefix(&root.join("sys/bus/i2c/drivers/ina3221x"), "") {
        for iio in entries_with_prefix(&device, "iio:device") {
            for ch in 0..CHANNELS {
                let Some(name) = read_trimmed(&iio.join(format!("rail_name_{}", ch))) else {
                    continue;
                };
                let read = |attr: &str| -> f64 {
                    read_number(&iio.join(format!("in_{}{}_input", attr, ch))).unwrap_or(0.0)
                };
                rails.insert(
                    rail_name(&name),
                    RailReading {
                        power: read("power"),
                        volt: read("voltage"),
                        curr: read("current"),
                    },
                );
            }
        }
    }
}

/// `inN_label` with `inN_input` (mV) and `currN_input` (mA); power is derived.
fn read_hwmon_rails(root: &Path, rails: &mut BTreeMap<String, RailReading>) {
    for device in entries_with_prefix(&root.join("sys/bus/i2c/drivers/ina3221"), "") {
        for hwmon in entries_with_prefix(&device.join("hwmon"), "hwmon") {
            for ch in 1..=CHANNELS {
                let Some(name) = read_trimmed(&hwmon.join(format!("in{}_label", ch))) else {
                    continue;
                };
                let volt: f64 = read_number(&hwmon.join(format!("in{}_input", ch))).unwrap_or(0.0);
                let curr: f64 =
                    read_number(&hwmon.join(format!("curr{}_input", ch))).unwrap_or(0.0);
                rails.insert(
                    rail_name(&name),
                    RailReading {
                        power: volt * curr / 1000.0,
                        volt,
                        curr,
                    },
                );
            }
        }
    }
}

fn rail_name(raw: &str) -> String {
    raw.strip_prefix("VDD_").unwrap_or(raw).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::sysfs::tests::write;

    #[test]
    fn reads_iio_rails() {
        let dir = tempfile::TempDir::new().unwrap();
        let base = "sys/bus/i2c/drivers/ina3221x/1-0040/iio:device0";
        let rails = [("GPU", 1532.0, 5000.0, 306.0), ("CPU", 612.0, 5008.0, 122.0)];
        for (ch, (name, power, volt, curr)) in rails.iter().enumerate() {
            write(dir.path(), &format!("{}/rail_name_{}", base, ch), name);
            write(dir.path(), &format!("{}/in_power{}_input", base, ch), &power.to_string());
            write(dir.path(), &format!("{}/in_voltage{}_input", base, ch), &volt.to_string());
            write(dir.path(), &format!("{}/in_current{}_input", base, ch), &curr.to_string());
        }

        let read = read_rails(dir.path());
        assert_eq!(read.len(), 2);
        assert_eq!(
            read["GPU"],
            RailReading {
                power: 1532.0,
                volt: 5000.0,
                curr: 306.0
            }
        );
        assert_eq!(read["CPU"].curr, 122.0);
    }

    #[test]
    fn reads_hwmon_rails_and_strips_vdd_prefix() {
        let dir = tempfile::TempDir::new().unwrap();
        let base = "sys/bus/i2c/drivers/ina3221/1-0040/hwmon/hwmon2";
        write(dir.path(), &format!("{}/in1_label", base), "VDD_SOC\n");
        write(dir.path(), &format!("{}/in1_input", base), "5000\n");
        write(dir.path(), &format!("{}/curr1_input", base), "400\n");
        write(dir.path(), &format!("{}/in2_label", base), "VDDRQ\n");
        write(dir.path(), &format!("{}/in2_input", base), "4000\n");

        let read = read_rails(dir.path());
        assert_eq!(read["SOC"].power, 2000.0);
        assert_eq!(read["SOC"].volt, 5000.0);
        assert_eq!(read["VDDRQ"].curr, 0.0);
    }
}
