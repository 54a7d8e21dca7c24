// Field presence policy and the fixed enumerations the renderer maps onto metrics.
//
// Every lookup the renderer performs against a snapshot goes through
// `FieldGroup::resolve`, so the required-vs-default decision is made here and
// nowhere else.

use crate::error::RenderError;
use std::fmt;

/// What to do when a field is absent from a live snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Absence is an integration defect: fail the render pass.
    Required,
    /// Absence is normal on some board variants: render as zero.
    DefaultZero,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldGroup {
    Board,
    CpuCore,
    GpuUnit,
    FanUnit,
    Temperature,
    Rail,
}

impl FieldGroup {
    pub const fn presence(self) -> Presence {
        match self {
            FieldGroup::Board => Presence::Required,
            FieldGroup::CpuCore => Presence::Required,
            FieldGroup::GpuUnit => Presence::Required,
            FieldGroup::FanUnit => Presence::Required,
            FieldGroup::Temperature => Presence::DefaultZero,
            FieldGroup::Rail => Presence::Required,
        }
    }

    /// Apply this group's presence policy to a lookup result.
    pub fn resolve<V: Default>(self, found: Option<V>, key: &str) -> Result<V, RenderError> {
        match (found, self.presence()) {
            (Some(v), _) => Ok(v),
            (None, Presence::DefaultZero) => Ok(V::default()),
            (None, Presence::Required) => Err(RenderError::FieldMissing {
                group: self,
                key: key.to_string(),
            }),
        }
    }
}

impl fmt::Display for FieldGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldGroup::Board => "board",
            FieldGroup::CpuCore => "cpu core",
            FieldGroup::GpuUnit => "gpu unit",
            FieldGroup::FanUnit => "fan unit",
            FieldGroup::Temperature => "temperature",
            FieldGroup::Rail => "power rail",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardSection {
    Platform,
    Hardware,
}

/// A board identity field: where it lives in the snapshot and the label it is exported under.
#[derive(Debug, Clone, Copy)]
pub struct BoardField {
    pub section: BoardSection,
    pub key: &'static str,
    pub label: &'static str,
}

const fn platform(key: &'static str, label: &'static str) -> BoardField {
    BoardField {
        section: BoardSection::Platform,
        key,
        label,
    }
}

const fn hardware(key: &'static str, label: &'static str) -> BoardField {
    BoardField {
        section: BoardSection::Hardware,
        key,
        label,
    }
}

pub const BOARD_FIELDS: [BoardField; 11] = [
    platform("Machine", "machine"),
    platform("Distribution", "distribution"),
    platform("Release", "release"),
    hardware("Jetpack", "jetpack"),
    hardware("L4T", "l4t"),
    hardware("Module", "module"),
    hardware("Model", "type"),
    hardware("Codename", "codename"),
    hardware("SoC", "soc"),
    hardware("CUDA Arch BIN", "cuda_arch_bin"),
    hardware("Serial Number", "serial_number"),
];

/// Board topology is static: the CPU family always has this many records.
pub const CPU_CORES: usize = 8;

pub const GPU_UNIT: &str = "gv11b";

pub const FAN_UNIT: &str = "tegra_pwmfan";

/// Known thermal sensors as (snapshot key, label), in export order.
pub const TEMPERATURE_SENSORS: [(&str, &str); 7] = [
    ("AO", "ao"),
    ("GPU", "gpu"),
    ("Tdiode", "tdiode"),
    ("AUX", "aux"),
    ("CPU", "cpu"),
    ("thermal", "thermal"),
    ("Tboard", "tboard"),
];

/// Power rails as (snapshot key, label), in export order.
pub const RAILS: [(&str, &str); 6] = [
    ("CPU", "cpu"),
    ("CV", "cv"),
    ("GPU", "gpu"),
    ("SOC", "soc"),
    ("SYS5V", "sys5v"),
    ("VDDRQ", "vddrq"),
];
