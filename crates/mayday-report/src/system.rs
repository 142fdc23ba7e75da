//! Host and runtime facts
//!
//! Collected fresh for every report. Memory figures come from `/proc` on
//! Linux and are reported as 0 elsewhere.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::Instant;

static PROCESS_START: Lazy<Instant> = Lazy::new(Instant::now);

/// Record the process start reference used for `uptime_ms`
///
/// Called by the crash handling stack on construction; calling it again
/// has no effect.
pub fn mark_process_start() {
    Lazy::force(&PROCESS_START);
}

/// Host snapshot stored in a crash report
///
/// Field names are kept stable for report consumers; `java_version` and
/// `java_vendor` describe the Rust toolchain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Toolchain version
    pub java_version: String,
    /// Toolchain vendor
    pub java_vendor: String,
    /// Operating system family
    pub os_name: String,
    /// Operating system release
    pub os_version: String,
    /// CPU architecture
    pub os_arch: String,
    /// Physical memory
    pub max_memory_mb: u64,
    /// Resident memory of this process
    pub total_memory_mb: u64,
    /// Memory available for new allocations
    pub free_memory_mb: u64,
    /// Logical processors available to the process
    pub processors: u32,
    /// Milliseconds since the process start reference
    pub uptime_ms: u64,
}

impl SystemInfo {
    /// Collect a point-in-time snapshot
    #[must_use]
    pub fn collect() -> Self {
        let memory = MemoryFigures::read();
        Self {
            java_version: toolchain_version(),
            java_vendor: "rust-lang".to_string(),
            os_name: std::env::consts::OS.to_string(),
            os_version: os_release(),
            os_arch: std::env::consts::ARCH.to_string(),
            max_memory_mb: memory.total_kb / 1024,
            total_memory_mb: memory.resident_kb / 1024,
            free_memory_mb: memory.available_kb / 1024,
            processors: std::thread::available_parallelism()
                .map_or(1, |n| u32::try_from(n.get()).unwrap_or(u32::MAX)),
            uptime_ms: u64::try_from(PROCESS_START.elapsed().as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// `"<os_name> <os_version>"`
    #[must_use]
    pub fn operating_system(&self) -> String {
        format!("{} {}", self.os_name, self.os_version)
    }
}

/// `rust <rust-version>` from the package manifest, i.e. the minimum toolchain
fn toolchain_version() -> String {
    match option_env!("CARGO_PKG_RUST_VERSION") {
        None | Some("") => "rust".to_string(),
        Some(version) => format!("rust {version}"),
    }
}

#[cfg(target_os = "linux")]
fn os_release() -> String {
    std::fs::read_to_string("/proc/sys/kernel/osrelease")
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

#[cfg(not(target_os = "linux"))]
fn os_release() -> String {
    "unknown".to_string()
}

#[derive(Debug, Default, Clone, Copy)]
struct MemoryFigures {
    total_kb: u64,
    available_kb: u64,
    resident_kb: u64,
}

impl MemoryFigures {
    #[cfg(target_os = "linux")]
    fn read() -> Self {
        let meminfo = std::fs::read_to_string("/proc/meminfo").unwrap_or_default();
        let status = std::fs::read_to_string("/proc/self/status").unwrap_or_default();
        Self {
            total_kb: kb_field(&meminfo, "MemTotal:"),
            available_kb: kb_field(&meminfo, "MemAvailable:"),
            resident_kb: kb_field(&status, "VmRSS:"),
        }
    }

    #[cfg(not(target_os = "linux"))]
    fn read() -> Self {
        Self::default()
    }
}

/// Value of a `Key:   1234 kB` line, 0 when absent
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn kb_field(text: &str, key: &str) -> u64 {
    text.lines()
        .find_map(|line| line.strip_prefix(key))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kb_field_parses_proc_lines() {
        let text = "MemTotal:       16318176 kB\nMemFree:         1234 kB\n";
        assert_eq!(kb_field(text, "MemTotal:"), 16_318_176);
        assert_eq!(kb_field(text, "MemAvailable:"), 0);
    }

    #[test]
    fn collect_fills_host_facts() {
        mark_process_start();
        let info = SystemInfo::collect();
        assert_eq!(info.os_name, std::env::consts::OS);
        assert_eq!(info.os_arch, std::env::consts::ARCH);
        assert_eq!(info.java_vendor, "rust-lang");
        assert!(info.processors >= 1);
        assert!(info.operating_system().starts_with(std::env::consts::OS));
    }

    #[test]
    fn toolchain_version_names_minimum_rust() {
        let version = toolchain_version();
        assert!(version.starts_with("rust"));
        if let Some(msrv) = option_env!("CARGO_PKG_RUST_VERSION").filter(|v| !v.is_empty()) {
            assert_eq!(version, format!("rust {msrv}"));
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_memory_is_reported() {
        let info = SystemInfo::collect();
        assert!(info.max_memory_mb > 0);
    }
}
