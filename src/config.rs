use serde::Deserialize;
use std::path::PathBuf;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub exporter: ExporterConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
    /// Path the Prometheus scrape endpoint is served on.
    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            metrics_path: default_metrics_path(),
        }
    }
}

fn default_port() -> u16 {
    8000
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_metrics_path() -> String {
    "/metrics".into()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    /// Live board: procfs, sysfs and device tree.
    #[default]
    Sysfs,
    /// JSON snapshot document maintained by an external agent.
    File,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub backend: SessionBackend,
    /// Filesystem root the sysfs backend resolves its paths under.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Snapshot document for the file backend.
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: SessionBackend::default(),
            root: default_root(),
            snapshot_path: None,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("/")
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ExporterConfig {
    /// Also export whether each known temperature sensor actually reported.
    #[serde(default)]
    pub temperature_presence: bool,
}

impl AppConfig {
    /// Load from `path`, else `CONFIG_FILE`, else `config.toml`. Only a missing
    /// default file falls back to built-in defaults; an explicit path must exist.
    pub fn load(path: Option<PathBuf>) -> anyhow::Result<Self> {
        let explicit = path.or_else(|| std::env::var("CONFIG_FILE").ok().map(PathBuf::from));
        let path = match explicit {
            Some(p) => p,
            None => {
                let p = PathBuf::from(DEFAULT_CONFIG_PATH);
                if !p.exists() {
                    let config = Self::default();
                    config.validate()?;
                    return Ok(config);
                }
                p
            }
        };
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("config {}: {}", path.display(), e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides and re-validate.
    pub fn with_port(mut self, port: Option<u16>) -> anyhow::Result<Self> {
        if let Some(port) = port {
            self.server.port = port;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        anyhow::ensure!(
            self.server.metrics_path.starts_with('/'),
            "server.metrics_path must start with '/', got {:?}",
            self.server.metrics_path
        );
        anyhow::ensure!(
            self.server.metrics_path != "/" && self.server.metrics_path != "/version",
            "server.metrics_path must not shadow a built-in route, got {:?}",
            self.server.metrics_path
        );
        match self.session.backend {
            SessionBackend::Sysfs => anyhow::ensure!(
                !self.session.root.as_os_str().is_empty(),
                "session.root must be non-empty"
            ),
            SessionBackend::File => anyhow::ensure!(
                self.session
                    .snapshot_path
                    .as_ref()
                    .is_some_and(|p| !p.as_os_str().is_empty()),
                "session.snapshot_path is required for the file backend"
            ),
        }
        Ok(())
    }
}
