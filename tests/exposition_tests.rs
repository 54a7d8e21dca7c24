// Prometheus text output for rendered families

mod common;

use common::full_snapshot;
use jetson_exporter::metrics::exposition::{CONTENT_TYPE, encode};
use jetson_exporter::metrics::{RenderOptions, SnapshotRenderer};

fn exposition(options: RenderOptions) -> String {
    let families = SnapshotRenderer::new(options)
        .render_all(&full_snapshot())
        .expect("render");
    encode(&families).expect("encode")
}

#[test]
fn no_families_encode_to_an_empty_body() {
    assert_eq!(encode(&[]).unwrap(), "");
}

#[test]
fn gauge_families_carry_help_type_and_samples() {
    let text = exposition(RenderOptions::default());
    assert!(text.contains("# HELP jetson_usage_cpu CPU % schedutil"));
    assert!(text.contains("# TYPE jetson_usage_cpu gauge"));
    assert!(text.contains("jetson_usage_cpu{cpu=\"cpu_1\"} 100"));
    assert!(text.contains("jetson_usage_cpu{cpu=\"cpu_8\"} 800"));
    assert!(text.contains("jetson_usage_gpu{gpu=\"val\"} 45.3"));
    assert!(text.contains("jetson_uptime{uptime=\"minutes\"} 46"));
    assert!(text.contains("jetson_usage_power{power=\"sys5v\"} 2814"));
    assert!(text.contains("jetson_temperatures{temperature=\"ao\"} 0"));
}

#[test]
fn info_families_are_constant_one_with_labels() {
    let text = exposition(RenderOptions::default());
    let board = text
        .lines()
        .find(|l| l.starts_with("jetson_info_board_info{"))
        .expect("board info sample");
    assert!(board.ends_with(" 1"));
    assert!(board.contains("board_info=\"info\""));
    assert!(board.contains("type=\"Jetson-AGX\""));
    assert!(board.contains("serial_number=\"1420419055312\""));

    let mode = text
        .lines()
        .find(|l| l.starts_with("jetson_nvpmode_info{"))
        .expect("power mode sample");
    assert!(mode.contains("mode=\"MODE_15W\""));
    assert!(mode.contains("nvpmode=\"mode\""));
}

#[test]
fn every_family_appears_once() {
    let text = exposition(RenderOptions::default());
    let types = text.lines().filter(|l| l.starts_with("# TYPE ")).count();
    assert_eq!(types, 13);
}

#[test]
fn presence_family_is_encoded_when_enabled() {
    let text = exposition(RenderOptions {
        temperature_presence: true,
    });
    assert!(text.contains("jetson_temperature_sensor_present{temperature=\"cpu\"} 1"));
    assert!(text.contains("jetson_temperature_sensor_present{temperature=\"tboard\"} 0"));
}

#[test]
fn content_type_is_prometheus_text() {
    assert!(CONTENT_TYPE.starts_with("text/plain; version=0.0.4"));
}
