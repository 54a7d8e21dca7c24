// Snapshot -> metric families. Pure: no I/O after the single snapshot read.

use super::{MetricFamily, MetricRecord};
use crate::error::{RenderError, ScrapeError};
use crate::models::{RailReading, TelemetrySnapshot};
use crate::schema::{self, BoardSection, FieldGroup};
use crate::session::TelemetrySession;
use std::iter::FusedIterator;

const SECONDS_PER_DAY: u64 = 86_400;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit a companion family telling reported sensors apart from defaulted ones.
    pub temperature_presence: bool,
}

/// Renders telemetry snapshots into Prometheus-ready metric families.
///
/// Holds no state between passes; one instance is shared by all scrapes.
#[derive(Debug, Clone, Default)]
pub struct SnapshotRenderer {
    options: RenderOptions,
}

impl SnapshotRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Lazily render `snapshot`, one family per item.
    pub fn render<'a>(&self, snapshot: &'a TelemetrySnapshot) -> Families<'a> {
        Families {
            snapshot,
            options: self.options,
            next: 0,
            rails: None,
            done: false,
        }
    }

    pub fn render_all(&self, snapshot: &TelemetrySnapshot) -> Result<Vec<MetricFamily>, RenderError> {
        self.render(snapshot).collect()
    }

    /// One scrape: liveness check, one snapshot read, full render.
    ///
    /// A dead session yields no families at all, so "no data" is never
    /// confused with a legitimate zero.
    pub fn scrape(&self, session: &dyn TelemetrySession) -> Result<Vec<MetricFamily>, ScrapeError> {
        if !session.is_alive() {
            tracing::debug!(operation = "scrape", "telemetry session not alive; rendering no families");
            return Ok(Vec::new());
        }
        let snapshot = session.snapshot()?;
        Ok(self.render_all(&snapshot)?)
    }
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    BoardInfo,
    PowerMode,
    Uptime,
    Cpu,
    Gpu,
    Ram,
    Disk,
    Fan,
    Swap,
    Temperature,
    TemperaturePresence,
    Power,
    Voltage,
    Current,
}

const STAGES: [Stage; 14] = [
    Stage::BoardInfo,
    Stage::PowerMode,
    Stage::Uptime,
    Stage::Cpu,
    Stage::Gpu,
    Stage::Ram,
    Stage::Disk,
    Stage::Fan,
    Stage::Swap,
    Stage::Temperature,
    Stage::TemperaturePresence,
    Stage::Power,
    Stage::Voltage,
    Stage::Current,
];

/// Iterator over the families of one render pass.
///
/// Families are independent of each other, so stopping early has no effect.
/// After the first error the iterator is exhausted.
pub struct Families<'a> {
    snapshot: &'a TelemetrySnapshot,
    options: RenderOptions,
    next: usize,
    /// All six rails, resolved once when the power group starts.
    rails: Option<[RailReading; 6]>,
    done: bool,
}

impl Iterator for Families<'_> {
    type Item = Result<MetricFamily, RenderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let stage = *STAGES.get(self.next)?;
            self.next += 1;
            if matches!(stage, Stage::TemperaturePresence) && !self.options.temperature_presence {
                continue;
            }
            let result = self.build(stage);
            if result.is_err() {
                self.done = true;
            }
            return Some(result);
        }
    }
}

impl FusedIterator for Families<'_> {}

impl Families<'_> {
    fn build(&mut self, stage: Stage) -> Result<MetricFamily, RenderError> {
        match stage {
            Stage::BoardInfo => self.board_info(),
            Stage::PowerMode => Ok(self.power_mode()),
            Stage::Uptime => Ok(self.uptime()),
            Stage::Cpu => self.cpu(),
            Stage::Gpu => self.gpu(),
            Stage::Ram => Ok(self.ram()),
            Stage::Disk => Ok(self.disk()),
            Stage::Fan => self.fan(),
            Stage::Swap => Ok(self.swap()),
            Stage::Temperature => self.temperature(),
            Stage::TemperaturePresence => Ok(self.temperature_presence()),
            Stage::Power => {
                self.rail_family("jetson_usage_power", "Power usage", "power", |r| r.power)
            }
            Stage::Voltage => {
                self.rail_family("jetson_usage_voltage_levels", "Voltage", "voltage", |r| r.volt)
            }
            Stage::Current => {
                self.rail_family("jetson_usage_current_values", "Current", "current", |r| r.curr)
            }
        }
    }

    fn board_info(&self) -> Result<MetricFamily, RenderError> {
        let board = &self.snapshot.board;
        let mut labels = Vec::with_capacity(schema::BOARD_FIELDS.len());
        for field in schema::BOARD_FIELDS {
            let table = match field.section {
                BoardSection::Platform => &board.platform,
                BoardSection::Hardware => &board.hardware,
            };
            let value = FieldGroup::Board.resolve(table.get(field.key).cloned(), field.key)?;
            labels.push((field.label.to_string(), value));
        }
        Ok(
            MetricFamily::info("jetson_info_board", "Board sys info", "board_info")
                .push(MetricRecord::info("info", labels)),
        )
    }

    fn power_mode(&self) -> MetricFamily {
        let labels = vec![("mode".to_string(), self.snapshot.power_mode.clone())];
        MetricFamily::info("jetson_nvpmode", "NV power mode", "nvpmode")
            .push(MetricRecord::info("mode", labels))
    }

    fn uptime(&self) -> MetricFamily {
        // Days come from the duration's own split; only the in-day remainder is broken down.
        let uptime = self.snapshot.uptime;
        let in_day = uptime.seconds % SECONDS_PER_DAY;
        let hours = in_day / 3600;
        let minutes = (in_day / 60) % 60;
        MetricFamily::gauge("jetson_uptime", "System uptime", "uptime")
            .add("days", uptime.days as f64)
            .add("hours", hours as f64)
            .add("minutes", minutes as f64)
    }

    fn cpu(&self) -> Result<MetricFamily, RenderError> {
        let mut family = MetricFamily::gauge("jetson_usage_cpu", "CPU % schedutil", "cpu");
        for idx in 0..schema::CPU_CORES {
            let found = self.snapshot.cpu.get(idx).copied();
            let core = FieldGroup::CpuCore.resolve(found, &format!("cpu[{}]", idx))?;
            family = family.add(format!("cpu_{}", idx + 1), core.cur_freq as f64);
        }
        Ok(family)
    }

    fn gpu(&self) -> Result<MetricFamily, RenderError> {
        let found = self.snapshot.gpu.get(schema::GPU_UNIT).copied();
        let gpu = FieldGroup::GpuUnit.resolve(found, schema::GPU_UNIT)?;
        Ok(MetricFamily::gauge("jetson_usage_gpu", "GPU % schedutil", "gpu").add("val", gpu.load))
    }

    fn ram(&self) -> MetricFamily {
        let ram = self.snapshot.memory.ram;
        MetricFamily::gauge("jetson_usage_ram", "Memory usage", "ram")
            .add("used", ram.used as f64)
            .add("shared", ram.shared as f64)
            .add("total", ram.total as f64)
    }

    fn disk(&self) -> MetricFamily {
        let disk = self.snapshot.disk;
        MetricFamily::gauge("jetson_usage_disk", "Disk space usage", "disk")
            .add("used", disk.used)
            .add("total", disk.total)
            .add("available", disk.available)
            .add("available_no_root", disk.available_no_root)
    }

    fn fan(&self) -> Result<MetricFamily, RenderError> {
        let found = self.snapshot.fan.get(schema::FAN_UNIT).copied();
        let fan = FieldGroup::FanUnit.resolve(found, schema::FAN_UNIT)?;
        Ok(MetricFamily::gauge("jetson_usage_fan", "Fan usage", "fan")
            .add("speed", fan.speed)
            .add("rpm", fan.rpm))
    }

    fn swap(&self) -> MetricFamily {
        let swap = self.snapshot.memory.swap;
        MetricFamily::gauge("jetson_usage_swap", "Swapfile usage", "swap")
            .add("used", swap.used as f64)
            .add("total", swap.total as f64)
    }

    fn temperature(&self) -> Result<MetricFamily, RenderError> {
        let mut family =
            MetricFamily::gauge("jetson_temperatures", "Sensor temperatures", "temperature");
        for (key, label) in schema::TEMPERATURE_SENSORS {
            let found = self.snapshot.temperature.get(key).copied();
            family = family.add(label, FieldGroup::Temperature.resolve(found, key)?);
        }
        Ok(family)
    }

    fn temperature_presence(&self) -> MetricFamily {
        let mut family = MetricFamily::gauge(
            "jetson_temperature_sensor_present",
            "Whether the sensor reported a reading (1) or was absent and rendered as 0",
            "temperature",
        );
        for (key, label) in schema::TEMPERATURE_SENSORS {
            let present = self.snapshot.temperature.contains_key(key);
            family = family.add(label, if present { 1.0 } else { 0.0 });
        }
        family
    }

    fn rails(&mut self) -> Result<[RailReading; 6], RenderError> {
        if let Some(readings) = self.rails {
            return Ok(readings);
        }
        let mut readings = [RailReading::default(); 6];
        for (slot, (key, _)) in readings.iter_mut().zip(schema::RAILS) {
            let found = self.snapshot.rails.get(key).copied();
            *slot = FieldGroup::Rail.resolve(found, key)?;
        }
        self.rails = Some(readings);
        Ok(readings)
    }

    fn rail_family(
        &mut self,
        name: &'static str,
        help: &'static str,
        label_key: &'static str,
        pick: fn(&RailReading) -> f64,
    ) -> Result<MetricFamily, RenderError> {
        let readings = self.rails()?;
        let mut family = MetricFamily::gauge(name, help, label_key);
        for (reading, (_, label)) in readings.iter().zip(schema::RAILS) {
            family = family.add(label, pick(reading));
        }
        Ok(family)
    }
}
