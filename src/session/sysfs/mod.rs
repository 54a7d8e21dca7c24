// Live Jetson telemetry read from procfs, sysfs and the device tree.
// Every path is resolved under a configurable root so the readers can run
// against a fake tree.

mod board;
mod power;
mod resources;
mod thermal;

use crate::error::SessionError;
use crate::models::{TelemetrySnapshot, Uptime};
use crate::session::TelemetrySession;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::instrument;

pub struct SysfsSession {
    root: PathBuf,
    opened: AtomicBool,
}

impl SysfsSession {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            opened: AtomicBool::new(false),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TelemetrySession for SysfsSession {
    fn open(&self) -> Result<(), SessionError> {
        if !board::is_jetson(&self.root) {
            return Err(SessionError::Connection(format!(
                "{} does not expose Jetson telemetry (no nv_tegra_release or tegra device-tree entry)",
                self.root.display()
            )));
        }
        self.opened.store(true, Ordering::Release);
        tracing::info!(root = %self.root.display(), "Sysfs telemetry session opened");
        Ok(())
    }

    fn is_alive(&self) -> bool {
        self.opened.load(Ordering::Acquire)
    }

    #[instrument(skip(self), fields(session = "sysfs", operation = "snapshot"))]
    fn snapshot(&self) -> Result<TelemetrySnapshot, SessionError> {
        if !self.is_alive() {
            return Err(SessionError::Read("sysfs session is not open".into()));
        }
        let root = self.root.as_path();

        let power_mode = board::read_power_mode(root).ok_or_else(|| {
            SessionError::Read("nvpmodel mode unavailable (var/lib/nvpmodel/status)".into())
        })?;
        let memory =
            resources::read_memory(root).map_err(|e| SessionError::read("proc/meminfo", e))?;
        let disk = resources::read_disk(root)
            .map_err(|e| SessionError::read(&format!("statvfs {}", root.display()), e))?;

        Ok(TelemetrySnapshot {
            board: board::read_board_info(root),
            power_mode,
            uptime: Uptime::from_secs(sysinfo::System::uptime()),
            cpu: resources::read_cpu_cores(root),
            gpu: resources::read_gpu(root),
            memory,
            disk,
            fan: thermal::read_fans(root),
            temperature: thermal::read_temperatures(root),
            rails: power::read_rails(root),
        })
    }

    fn close(&self) -> Result<(), SessionError> {
        self.opened.store(false, Ordering::Release);
        Ok(())
    }
}

/// Read a sysfs/device-tree attribute, trimming whitespace and trailing NULs.
fn read_trimmed(path: &Path) -> Option<String> {
    let raw = std::fs::read(path).ok()?;
    let s = String::from_utf8_lossy(&raw);
    let s = s.trim_matches(|c: char| c.is_whitespace() || c == '\0');
    Some(s.to_string())
}

fn read_number<T: FromStr>(path: &Path) -> Option<T> {
    read_trimmed(path)?.parse().ok()
}

/// Entries of `dir` whose file name starts with `prefix`, sorted by name.
fn entries_with_prefix(dir: &Path, prefix: &str) -> Vec<PathBuf> {
    let Ok(read_dir) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut out: Vec<PathBuf> = read_dir
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with(prefix))
        .map(|e| e.path())
        .collect();
    out.sort();
    out
}

#[cfg(test)]
pub(super) mod tests {
    use std::path::Path;

    pub(crate) fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn read_trimmed_strips_device_tree_nul() {
        let dir = tempfile::TempDir::new().unwrap();
        write(dir.path(), "model", "NVIDIA Jetson AGX Xavier\0");
        assert_eq!(
            super::read_trimmed(&dir.path().join("model")).as_deref(),
            Some("NVIDIA Jetson AGX Xavier")
        );
    }
}
