// Board identity (L4T, device tree, host platform) and nvpmodel power mode.

use super::read_trimmed;
use crate::models::BoardInfo;
use std::path::Path;
use sysinfo::System;

/// L4T release -> JetPack version, for the releases NVIDIA shipped as JetPack.
const JETPACK_RELEASES: &[(&str, &str)] = &[
    ("32.4.3", "4.4"),
    ("32.4.4", "4.4.1"),
    ("32.5.0", "4.5"),
    ("32.5.1", "4.5.1"),
    ("32.5.2", "4.5.1"),
    ("32.6.1", "4.6"),
    ("32.7.1", "4.6.1"),
    ("32.7.2", "4.6.2"),
    ("32.7.3", "4.6.3"),
    ("32.7.4", "4.6.4"),
    ("32.7.5", "4.6.5"),
    ("35.1.0", "5.0.2"),
    ("35.2.1", "5.1"),
    ("35.3.1", "5.1.1"),
    ("35.4.1", "5.1.2"),
    ("35.5.0", "5.1.3"),
    ("36.3.0", "6.0"),
    ("36.4.0", "6.1"),
];

/// SoC -> CUDA compute capability.
const CUDA_ARCH_BY_SOC: &[(&str, &str)] = &[
    ("tegra210", "5.3"),
    ("tegra186", "6.2"),
    ("tegra194", "7.2"),
    ("tegra234", "8.7"),
];

pub(super) fn is_jetson(root: &Path) -> bool {
    root.join("etc/nv_tegra_release").is_file()
        || device_tree_compatible(root)
            .iter()
            .any(|c| c.starts_with("nvidia,tegra"))
}

/// Collect identity fields. File-backed fields are only present when readable;
/// table-derived fields are always present, empty when the table has no entry.
pub(super) fn read_board_info(root: &Path) -> BoardInfo {
    let mut board = BoardInfo::default()
        .with_platform("Machine", host_arch())
        .with_platform(
            "Distribution",
            System::long_os_version().unwrap_or_default(),
        )
        .with_platform("Release", System::kernel_version().unwrap_or_default());

    let l4t = read_trimmed(&root.join("etc/nv_tegra_release"))
        .and_then(|s| parse_l4t_release(&s));
    let jetpack = l4t
        .as_deref()
        .and_then(|v| lookup(JETPACK_RELEASES, v))
        .unwrap_or_default();
    board = board.with_hardware("Jetpack", jetpack);
    if let Some(l4t) = l4t {
        board = board.with_hardware("L4T", l4t);
    }

    let dt = root.join("proc/device-tree");
    if let Some(model) = read_trimmed(&dt.join("model")) {
        board = board.with_hardware("Model", model);
    }
    if let Some(module) = read_trimmed(&dt.join("nvidia,proc-boardid")) {
        board = board.with_hardware("Module", module);
    }
    if let Some(serial) = read_trimmed(&dt.join("serial-number")) {
        board = board.with_hardware("Serial Number", serial);
    }

    let compatible = device_tree_compatible(root);
    let vendor_suffix = |entry: &String| {
        entry
            .rsplit(',')
            .next()
            .unwrap_or(entry.as_str())
            .to_string()
    };
    let soc = compatible.last().map(vendor_suffix);
    if compatible.len() >= 2 {
        board = board.with_hardware("Codename", vendor_suffix(&compatible[compatible.len() - 2]));
    }
    let cuda_arch = soc
        .as_deref()
        .and_then(|s| lookup(CUDA_ARCH_BY_SOC, s))
        .unwrap_or_default();
    board = board.with_hardware("CUDA Arch BIN", cuda_arch);
    if let Some(soc) = soc {
        board = board.with_hardware("SoC", soc);
    }

    board
}

/// Host CPU architecture as reported by the kernel.
fn host_arch() -> String {
    let arch = System::cpu_arch();
    if arch.is_empty() {
        std::env::consts::ARCH.to_string()
    } else {
        arch
    }
}

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn device_tree_compatible(root: &Path) -> Vec<String> {
    let Ok(raw) = std::fs::read(root.join("proc/device-tree/compatible")) else {
        return Vec::new();
    };
    raw.split(|b| *b == 0)
        .filter(|s| !s.is_empty())
        .map(|s| String::from_utf8_lossy(s).trim().to_string())
        .collect()
}

/// `# R32 (release), REVISION: 4.3, GCID: ...` -> `32.4.3`.
fn parse_l4t_release(content: &str) -> Option<String> {
    let line = content.lines().find(|l| l.trim_start().starts_with("# R"))?;
    let major = line
        .trim_start()
        .strip_prefix("# R")?
        .split(|c: char| !c.is_ascii_digit())
        .next()
        .filter(|s| !s.is_empty())?;
    let revision = line
        .split(',')
        .find_map(|part| part.trim().strip_prefix("REVISION:"))?
        .trim();
    Some(format!("{}.{}", major, revision))
}

/// Current nvpmodel mode name: the id from the status file resolved against the config.
pub(super) fn read_power_mode(root: &Path) -> Option<String> {
    let status = read_trimmed(&root.join("var/lib/nvpmodel/status"))?;
    let id = parse_status_mode_id(&status)?;
    let conf = std::fs::read_to_string(root.join("etc/nvpmodel.conf")).ok()?;
    parse_mode_names(&conf)
        .into_iter()
        .find(|(mode_id, _)| *mode_id == id)
        .map(|(_, name)| name)
}

/// `pmode:0002 fmode:quiet` -> 2.
fn parse_status_mode_id(status: &str) -> Option<u32> {
    status
        .split_whitespace()
        .find_map(|t| t.strip_prefix("pmode:"))?
        .parse()
        .ok()
}

/// `< POWER_MODEL ID=2 NAME=MODE_15W >` lines -> (2, "MODE_15W").
fn parse_mode_names(conf: &str) -> Vec<(u32, String)> {
    conf.lines()
        .filter(|l| l.contains("POWER_MODEL"))
        .filter_map(|l| {
            let mut id = None;
            let mut name = None;
            for token in l.split_whitespace() {
                if let Some(v) = token.strip_prefix("ID=") {
                    id = v.parse().ok();
                } else if let Some(v) = token.strip_prefix("NAME=") {
                    name = Some(v.to_string());
                }
            }
            Some((id?, name?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::sysfs::tests::write;

    const NVPMODEL_CONF: &str = "\
< POWER_MODEL ID=0 NAME=MAXN >
CPU_ONLINE CORE_0 1
< POWER_MODEL ID=1 NAME=MODE_10W >
< POWER_MODEL ID=2 NAME=MODE_15W >
< PM_CONFIG DEFAULT=2 >
";

    #[test]
    fn parses_l4t_release_line() {
        let s = "# R32 (release), REVISION: 4.3, GCID: 21589087, BOARD: t186ref, EABI: aarch64";
        assert_eq!(parse_l4t_release(s).as_deref(), Some("32.4.3"));
        assert_eq!(parse_l4t_release("garbage"), None);
    }

    #[test]
    fn resolves_power_mode_name() {
        let dir = tempfile::TempDir::new().unwrap();
        write(dir.path(), "var/lib/nvpmodel/status", "pmode:0002 fmode:quiet\n");
        write(dir.path(), "etc/nvpmodel.conf", NVPMODEL_CONF);
        assert_eq!(read_power_mode(dir.path()).as_deref(), Some("MODE_15W"));
    }

    #[test]
    fn unknown_power_mode_id_is_none() {
        let dir = tempfile::TempDir::new().unwrap();
        write(dir.path(), "var/lib/nvpmodel/status", "pmode:0007\n");
        write(dir.path(), "etc/nvpmodel.conf", NVPMODEL_CONF);
        assert_eq!(read_power_mode(dir.path()), None);
    }

    #[test]
    fn reads_hardware_identity_from_device_tree() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path();
        write(
            root,
            "etc/nv_tegra_release",
            "# R32 (release), REVISION: 4.3, GCID: 21589087\n",
        );
        write(root, "proc/device-tree/model", "Jetson-AGX\0");
        write(root, "proc/device-tree/nvidia,proc-boardid", "2888\0");
        write(root, "proc/device-tree/serial-number", "1420419055312\0");
        write(
            root,
            "proc/device-tree/compatible",
            "nvidia,p2972-0000\0nvidia,galen\0nvidia,tegra194\0",
        );

        assert!(is_jetson(root));
        let board = read_board_info(root);
        let hw = |k: &str| board.hardware.get(k).map(String::as_str);
        assert_eq!(hw("L4T"), Some("32.4.3"));
        assert_eq!(hw("Jetpack"), Some("4.4"));
        assert_eq!(hw("Model"), Some("Jetson-AGX"));
        assert_eq!(hw("Module"), Some("2888"));
        assert_eq!(hw("Codename"), Some("galen"));
        assert_eq!(hw("SoC"), Some("tegra194"));
        assert_eq!(hw("CUDA Arch BIN"), Some("7.2"));
        assert_eq!(hw("Serial Number"), Some("1420419055312"));
        assert_eq!(board.platform.get("Machine"), Some(&host_arch()));
        assert!(!host_arch().is_empty());
        assert!(board.platform.contains_key("Distribution"));
        assert!(board.platform.contains_key("Release"));
    }

    #[test]
    fn non_jetson_root_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        write(dir.path(), "proc/device-tree/compatible", "raspberrypi,4-model-b\0brcm,bcm2711\0");
        assert!(!is_jetson(dir.path()));
    }
}
