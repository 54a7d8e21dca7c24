use clap::Parser;
use std::path::PathBuf;

/// Jetson telemetry exporter for Prometheus.
#[derive(Debug, Parser)]
#[command(name = "jetson-exporter", version, about)]
pub struct Cli {
    /// Metrics collector port number (overrides server.port).
    #[arg(long)]
    pub port: Option<u16>,

    /// Config file (overrides CONFIG_FILE).
    #[arg(long)]
    pub config: Option<PathBuf>,
}
