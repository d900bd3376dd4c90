//! Memory and timing checkpoints
//!
//! - Memory: reads RSS (Resident Set Size) from /proc/self/status
//! - Timing: uses std::time::Instant

use std::fs;
use std::time::Instant;

/// Get current RSS (Resident Set Size) in bytes from /proc/self/status
pub fn get_rss_bytes() -> u64 {
    if let Ok(status) = fs::read_to_string("/proc/self/status") {
        for line in status.lines() {
            if line.starts_with("VmRSS:") {
                // Format: "VmRSS:    123456 kB"
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() >= 2 {
                    if let Ok(kb) = parts[1].parse::<u64>() {
                        return kb * 1024;
                    }
                }
            }
        }
    }
    0
}

/// Get current RSS in megabytes
pub fn get_rss_mb() -> f64 {
    get_rss_bytes() as f64 / (1024.0 * 1024.0)
}

/// Print a memory checkpoint with label
pub fn checkpoint(label: &str) {
    let rss = get_rss_mb();
    eprintln!("MEMPROF [{:.2} MB]: {}", rss, label);
}

/// Start a new timing checkpoint, returns the Instant
pub fn time_start(label: &str) -> Instant {
    eprintln!("TIMEPROF: {} ...", label);
    Instant::now()
}

/// Print elapsed time from a previous checkpoint, returns new Instant for chaining
pub fn time_elapsed(label: &str, start: Instant) -> Instant {
    let elapsed = start.elapsed();
    eprintln!("TIMEPROF: {} [{:.3}s]", label, elapsed.as_secs_f64());
    Instant::now()
}
