// Prometheus text exposition for rendered families.
// A fresh registry is built per scrape; nothing is retained between scrapes.

use super::{FamilyKind, MetricFamily, Value};
use crate::error::ExpositionError;
use prometheus::{GaugeVec, Opts, Registry, TextEncoder};

pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Encode families in the Prometheus text format. No families -> empty body.
pub fn encode(families: &[MetricFamily]) -> Result<String, ExpositionError> {
    if families.is_empty() {
        return Ok(String::new());
    }

    let registry = Registry::new();
    for family in families {
        let collector = match family.kind {
            FamilyKind::Gauge => gauge_vec(family)?,
            FamilyKind::Info => info_vec(family)?,
        };
        registry.register(Box::new(collector))?;
    }

    let encoder = TextEncoder::new();
    Ok(encoder.encode_to_string(&registry.gather())?)
}

fn gauge_vec(family: &MetricFamily) -> Result<GaugeVec, ExpositionError> {
    let opts = Opts::new(family.name, family.help);
    let gauge = GaugeVec::new(opts, &[family.label_key])?;
    for record in &family.records {
        if let Value::Number(v) = record.value {
            gauge
                .get_metric_with_label_values(&[record.label_value.as_str()])?
                .set(v);
        }
    }
    Ok(gauge)
}

/// Info families follow the client convention: `<name>_info{<key>=..., <labels>...} 1`.
fn info_vec(family: &MetricFamily) -> Result<GaugeVec, ExpositionError> {
    let info_keys: Vec<&str> = family
        .records
        .first()
        .and_then(|r| match &r.value {
            Value::Info(labels) => Some(labels.iter().map(|(k, _)| k.as_str()).collect()),
            Value::Number(_) => None,
        })
        .unwrap_or_default();

    let mut label_names = Vec::with_capacity(info_keys.len() + 1);
    label_names.push(family.label_key);
    label_names.extend(info_keys);

    let opts = Opts::new(format!("{}_info", family.name), family.help);
    let gauge = GaugeVec::new(opts, &label_names)?;
    for record in &family.records {
        if let Value::Info(labels) = &record.value {
            let mut values = Vec::with_capacity(labels.len() + 1);
            values.push(record.label_value.as_str());
            values.extend(labels.iter().map(|(_, v)| v.as_str()));
            gauge.get_metric_with_label_values(&values)?.set(1.0);
        }
    }
    Ok(gauge)
}
