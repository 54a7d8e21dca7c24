// Typed metric families produced by the renderer and consumed by the exposition layer

pub mod exposition;
mod renderer;

use serde::Serialize;

pub use renderer::{Families, RenderOptions, SnapshotRenderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FamilyKind {
    Gauge,
    /// Constant-1 series whose payload is carried in labels.
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    Number(f64),
    Info(Vec<(String, String)>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRecord {
    pub label_value: String,
    pub value: Value,
}

impl MetricRecord {
    pub fn number(label_value: impl Into<String>, value: f64) -> Self {
        Self {
            label_value: label_value.into(),
            value: Value::Number(value),
        }
    }

    pub fn info(label_value: impl Into<String>, labels: Vec<(String, String)>) -> Self {
        Self {
            label_value: label_value.into(),
            value: Value::Info(labels),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.value {
            Value::Number(v) => Some(v),
            Value::Info(_) => None,
        }
    }
}

/// A named group of records sharing one label key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricFamily {
    pub name: &'static str,
    pub help: &'static str,
    pub label_key: &'static str,
    pub kind: FamilyKind,
    pub records: Vec<MetricRecord>,
}

impl MetricFamily {
    fn gauge(name: &'static str, help: &'static str, label_key: &'static str) -> Self {
        Self {
            name,
            help,
            label_key,
            kind: FamilyKind::Gauge,
            records: Vec::new(),
        }
    }

    fn info(name: &'static str, help: &'static str, label_key: &'static str) -> Self {
        Self {
            name,
            help,
            label_key,
            kind: FamilyKind::Info,
            records: Vec::new(),
        }
    }

    fn push(mut self, record: MetricRecord) -> Self {
        self.records.push(record);
        self
    }

    fn add(self, label_value: impl Into<String>, value: f64) -> Self {
        self.push(MetricRecord::number(label_value, value))
    }

    /// Value of the record with the given label, if it is numeric.
    pub fn value_of(&self, label_value: &str) -> Option<f64> {
        self.records
            .iter()
            .find(|r| r.label_value == label_value)
            .and_then(MetricRecord::as_number)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.label_value.as_str()).collect()
    }
}
