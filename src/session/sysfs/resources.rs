// CPU frequency, GPU load, memory and disk readers.

use super::{entries_with_prefix, read_number, read_trimmed};
use crate::models::{CpuCore, DiskUsage, GpuStatus, Memory, RamUsage, SwapUsage};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

const MAX_CORES: usize = 256;
const GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// One entry per `cpuN` directory, stopping at the first gap. A core without a
/// readable cpufreq node is offline.
pub(super) fn read_cpu_cores(root: &Path) -> Vec<CpuCore> {
    let base = root.join("sys/devices/system/cpu");
    let mut cores = Vec::new();
    for idx in 0..MAX_CORES {
        let dir = base.join(format!("cpu{}", idx));
        if !dir.is_dir() {
            break;
        }
        let freq: Option<u64> = read_number(&dir.join("cpufreq/scaling_cur_freq"));
        cores.push(CpuCore {
            online: freq.is_some(),
            cur_freq: freq.unwrap_or(0),
        });
    }
    cores
}

/// devfreq entries exposing a `device/load` node, keyed by the unit name after
/// the bus address (`17000000.gv11b` -> `gv11b`). Load is reported per mille.
pub(super) fn read_gpu(root: &Path) -> BTreeMap<String, GpuStatus> {
    let mut gpus = BTreeMap::new();
    for dir in entries_with_prefix(&root.join("sys/class/devfreq"), "") {
        let Some(load) = read_number::<f64>(&dir.join("device/load")) else {
            continue;
        };
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let unit = name.rsplit('.').next().unwrap_or(name.as_str()).to_string();
        gpus.insert(unit, GpuStatus { load: load / 10.0 });
    }
    gpus
}

/// RAM and SWAP from `/proc/meminfo`, in kB. Shared is the NvMap carve-out
/// used by the integrated GPU.
pub(super) fn read_memory(root: &Path) -> Result<Memory, String> {
    let content = read_trimmed(&root.join("proc/meminfo")).ok_or("unreadable")?;
    let info = parse_meminfo(&content);
    let get = |key: &str| info.get(key).copied().unwrap_or(0);
    let total = info.get("MemTotal").copied().ok_or("MemTotal missing")?;

    let cached = get("MemFree") + get("Buffers") + get("Cached");
    Ok(Memory {
        ram: RamUsage {
            used: total.saturating_sub(cached),
            shared: get("NvMapMemUsed"),
            total,
        },
        swap: SwapUsage {
            used: get("SwapTotal").saturating_sub(get("SwapFree")),
            total: get("SwapTotal"),
        },
    })
}

fn parse_meminfo(content: &str) -> HashMap<String, u64> {
    content
        .lines()
        .filter_map(|line| {
            let (key, rest) = line.split_once(':')?;
            let value = rest.split_whitespace().next()?.parse().ok()?;
            Some((key.trim().to_string(), value))
        })
        .collect()
}

/// Filesystem usage of the root in GB. `available` includes blocks reserved
/// for root; `available_no_root` does not.
#[cfg(unix)]
pub(super) fn read_disk(root: &Path) -> std::io::Result<DiskUsage> {
    use std::ffi::CString;
    use std::mem::MaybeUninit;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(root.as_os_str().as_bytes())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let mut stat = MaybeUninit::<libc::statvfs>::uninit();
    // SAFETY: c_path is NUL-terminated and stat points to writable storage of the right type.
    let rc = unsafe { libc::statvfs(c_path.as_ptr(), stat.as_mut_ptr()) };
    if rc != 0 {
        return Err(std::io::Error::last_os_error());
    }
    // SAFETY: statvfs returned 0, so the struct is initialised.
    let stat = unsafe { stat.assume_init() };

    let frsize = stat.f_frsize as f64;
    let to_gb = |blocks: f64| blocks * frsize / GB;
    let blocks = stat.f_blocks as f64;
    let free = stat.f_bfree as f64;
    let avail = stat.f_bavail as f64;

    Ok(DiskUsage {
        used: to_gb(blocks - free),
        total: to_gb(blocks),
        available: to_gb(free),
        available_no_root: to_gb(avail),
    })
}

#[cfg(not(unix))]
pub(super) fn read_disk(_root: &Path) -> std::io::Result<DiskUsage> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "statvfs is only available on unix",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::sysfs::tests::write;

    #[test]
    fn reads_cores_until_gap() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path();
        write(root, "sys/devices/system/cpu/cpu0/cpufreq/scaling_cur_freq", "1190400\n");
        write(root, "sys/devices/system/cpu/cpu1/cpufreq/scaling_cur_freq", "2265600\n");
        std::fs::create_dir_all(root.join("sys/devices/system/cpu/cpu2")).unwrap();
        write(root, "sys/devices/system/cpu/cpu4/cpufreq/scaling_cur_freq", "1\n");

        let cores = read_cpu_cores(root);
        assert_eq!(cores.len(), 3);
        assert_eq!(cores[0], CpuCore::at(1_190_400));
        assert_eq!(cores[1].cur_freq, 2_265_600);
        assert!(!cores[2].online);
        assert_eq!(cores[2].cur_freq, 0);
    }

    #[test]
    fn reads_gpu_load_from_devfreq() {
        let dir = tempfile::TempDir::new().unwrap();
        write(dir.path(), "sys/class/devfreq/17000000.gv11b/device/load", "453\n");
        std::fs::create_dir_all(dir.path().join("sys/class/devfreq/15340000.vic")).unwrap();

        let gpus = read_gpu(dir.path());
        assert_eq!(gpus.len(), 1);
        assert_eq!(gpus["gv11b"].load, 45.3);
    }

    #[test]
    fn reads_memory_in_kb() {
        let dir = tempfile::TempDir::new().unwrap();
        write(
            dir.path(),
            "proc/meminfo",
            "MemTotal:       32692948 kB\n\
             MemFree:        28000000 kB\n\
             Buffers:          100000 kB\n\
             Cached:          1000000 kB\n\
             SwapTotal:       8000000 kB\n\
             SwapFree:        7000000 kB\n\
             NvMapMemUsed:     250000 kB\n",
        );
        let mem = read_memory(dir.path()).unwrap();
        assert_eq!(mem.ram.total, 32_692_948);
        assert_eq!(mem.ram.used, 32_692_948 - 29_100_000);
        assert_eq!(mem.ram.shared, 250_000);
        assert_eq!(mem.swap.total, 8_000_000);
        assert_eq!(mem.swap.used, 1_000_000);
    }

    #[test]
    fn memory_without_total_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        write(dir.path(), "proc/meminfo", "MemFree: 1 kB\n");
        assert!(read_memory(dir.path()).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn disk_usage_is_consistent() {
        let dir = tempfile::TempDir::new().unwrap();
        let disk = read_disk(dir.path()).unwrap();
        assert!(disk.total > 0.0);
        assert!(disk.used >= 0.0);
        assert!(disk.available >= disk.available_no_root);
        assert!((disk.used + disk.available - disk.total).abs() < 1e-6);
    }
}
