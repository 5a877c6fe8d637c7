//! System health sampling for the status surface.

use std::path::Path;

use reelsort_core::orchestrator::LibraryPaths;
use reelsort_model::{DiskUsage, SystemHealth};
use sysinfo::{Disks, MINIMUM_CPU_UPDATE_INTERVAL, System};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Sample disk usage for the three roots plus CPU/memory. Blocking (the
/// CPU reading needs a short measurement window); call through
/// `spawn_blocking`.
pub fn sample(paths: &LibraryPaths, tool_version: &str) -> SystemHealth {
    let disks = Disks::new_with_refreshed_list();
    let disk_for = |root: &Path| disk_usage_for(&disks, root);

    let mut system = System::new();
    system.refresh_memory();
    system.refresh_cpu_usage();
    std::thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
    system.refresh_cpu_usage();

    let total_memory = system.total_memory() as f64;
    let used_memory = system.used_memory() as f64;

    SystemHealth {
        disk_downloads: paths
            .download_roots
            .first()
            .map(|root| disk_for(root))
            .unwrap_or_default(),
        disk_extracted: disk_for(&paths.extracted_root),
        disk_finished: disk_for(&paths.finished_root),
        tool_version: tool_version.to_string(),
        cpu_percent: system.global_cpu_usage(),
        memory_used_gb: used_memory / GIB,
        memory_total_gb: total_memory / GIB,
        memory_percent: if total_memory > 0.0 {
            (used_memory / total_memory * 100.0) as f32
        } else {
            0.0
        },
    }
}

/// Usage of the disk whose mount point is the deepest prefix of `root`.
fn disk_usage_for(disks: &Disks, root: &Path) -> DiskUsage {
    let mut best: Option<&sysinfo::Disk> = None;
    for disk in disks.list() {
        if !root.starts_with(disk.mount_point()) {
            continue;
        }
        let deeper = best.is_none_or(|current| {
            disk.mount_point().components().count()
                > current.mount_point().components().count()
        });
        if deeper {
            best = Some(disk);
        }
    }

    let Some(disk) = best else {
        return DiskUsage::default();
    };
    let total = disk.total_space() as f64;
    let free = disk.available_space() as f64;
    let used = (total - free).max(0.0);
    DiskUsage {
        total_gb: total / GIB,
        used_gb: used / GIB,
        free_gb: free / GIB,
        percent: if total > 0.0 {
            (used / total * 100.0) as f32
        } else {
            0.0
        },
    }
}
