// Shared test helpers
#![allow(dead_code)]

use jetson_exporter::error::SessionError;
use jetson_exporter::models::*;
use jetson_exporter::session::TelemetrySession;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub fn board() -> BoardInfo {
    BoardInfo::default()
        .with_platform("Machine", "aarch64")
        .with_platform("Distribution", "Ubuntu 18.04 Bionic Beaver")
        .with_platform("Release", "4.9.140-tegra")
        .with_hardware("Jetpack", "4.4")
        .with_hardware("L4T", "32.4.3")
        .with_hardware("Module", "P2888-0001")
        .with_hardware("Model", "Jetson-AGX")
        .with_hardware("Codename", "galen")
        .with_hardware("SoC", "tegra194")
        .with_hardware("CUDA Arch BIN", "7.2")
        .with_hardware("Serial Number", "1420419055312")
}

pub fn rails() -> BTreeMap<String, RailReading> {
    [
        ("CPU", 612.0, 5008.0, 122.0),
        ("CV", 0.0, 5000.0, 0.0),
        ("GPU", 1532.0, 5000.0, 306.0),
        ("SOC", 1838.0, 5000.0, 367.0),
        ("SYS5V", 2814.0, 5004.0, 562.0),
        ("VDDRQ", 459.0, 5000.0, 91.0),
    ]
    .into_iter()
    .map(|(name, power, volt, curr)| (name.to_string(), RailReading { power, volt, curr }))
    .collect()
}

/// A snapshot with every required field present.
pub fn full_snapshot() -> TelemetrySnapshot {
    TelemetrySnapshot {
        board: board(),
        power_mode: "MODE_15W".into(),
        uptime: Uptime {
            days: 2,
            seconds: 10_000,
        },
        cpu: [100, 200, 300, 400, 500, 600, 700, 800]
            .into_iter()
            .map(CpuCore::at)
            .collect(),
        gpu: BTreeMap::from([("gv11b".to_string(), GpuStatus { load: 45.3 })]),
        memory: Memory {
            ram: RamUsage {
                used: 3_500_000,
                shared: 250_000,
                total: 32_692_948,
            },
            swap: SwapUsage {
                used: 1_000,
                total: 16_346_472,
            },
        },
        disk: DiskUsage {
            used: 12.5,
            total: 28.0,
            available: 15.5,
            available_no_root: 14.1,
        },
        fan: BTreeMap::from([(
            "tegra_pwmfan".to_string(),
            FanState {
                speed: 40.0,
                rpm: 2100.0,
            },
        )]),
        temperature: BTreeMap::from([("CPU".to_string(), 45.0), ("GPU".to_string(), 38.2)]),
        rails: rails(),
    }
}

/// In-memory session with scripted liveness and counters for every call.
pub struct StaticSession {
    snapshot: Option<TelemetrySnapshot>,
    alive: AtomicBool,
    fail_open: bool,
    pub opens: AtomicUsize,
    pub reads: AtomicUsize,
    pub closes: AtomicUsize,
}

impl StaticSession {
    pub fn new(snapshot: TelemetrySnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            alive: AtomicBool::new(true),
            fail_open: false,
            opens: AtomicUsize::new(0),
            reads: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
        }
    }

    /// Alive, but every snapshot read fails.
    pub fn failing_reads() -> Self {
        Self {
            snapshot: None,
            ..Self::new(full_snapshot())
        }
    }

    pub fn unreachable() -> Self {
        Self {
            fail_open: true,
            ..Self::new(full_snapshot())
        }
    }

    pub fn set_alive(&self, alive: bool) {
        self.alive.store(alive, Ordering::SeqCst);
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

impl TelemetrySession for StaticSession {
    fn open(&self) -> Result<(), SessionError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if self.fail_open {
            return Err(SessionError::Connection("no telemetry service".into()));
        }
        Ok(())
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    fn snapshot(&self) -> Result<TelemetrySnapshot, SessionError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.snapshot
            .clone()
            .ok_or_else(|| SessionError::Read("telemetry service dropped the request".into()))
    }

    fn close(&self) -> Result<(), SessionError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
