//! Process resource usage via the sysinfo crate

use super::reporter::{CpuUsage, MemoryUsage};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use sysinfo::{ProcessesToUpdate, System};

static SYSTEM: Lazy<Mutex<System>> = Lazy::new(|| Mutex::new(System::new()));

/// Memory and CPU usage of this process.
///
/// Returns zeroed values when the platform cannot resolve the current
/// process; callers always get a well-formed snapshot.
pub(super) fn process_usage() -> (MemoryUsage, CpuUsage) {
    let Ok(pid) = sysinfo::get_current_pid() else {
        return (MemoryUsage::default(), CpuUsage::default());
    };

    let mut system = SYSTEM.lock();
    system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

    match system.process(pid) {
        Some(process) => (
            MemoryUsage {
                rss: process.memory(),
                virtual_memory: process.virtual_memory(),
            },
            CpuUsage {
                percent: process.cpu_usage() as f64,
            },
        ),
        None => (MemoryUsage::default(), CpuUsage::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_usage_is_well_formed() {
        let (_memory, cpu) = process_usage();
        // Repeat calls share the cached System handle
        let (_memory, _cpu) = process_usage();
        assert!(cpu.percent >= 0.0);
    }
}
