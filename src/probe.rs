//! Accelerator capability probing
//!
//! Device auto-detection is behind the [`AcceleratorProbe`] trait so the
//! resolver can run against real hardware in production and a deterministic
//! fake in tests. The real probe answers within a bounded timeout; a probe
//! that cannot answer in time reports [`ProbeOutcome::Indeterminate`], which
//! the resolver maps to the cpu device.

use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Result of an accelerator capability query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// An accelerator is present and usable
    Present,
    /// No accelerator is available
    Absent,
    /// Detection failed or timed out; callers must assume no accelerator
    Indeterminate,
}

/// Hardware capability query used during device resolution
///
/// `detect` must be idempotent and free of side effects beyond the query
/// itself.
pub trait AcceleratorProbe {
    fn detect(&self) -> ProbeOutcome;
}

/// Probe backed by the host's driver state
///
/// Checks the CUDA driver interface and device nodes. The check runs on a
/// helper thread and is abandoned after `timeout`, reporting
/// `Indeterminate` rather than blocking resolution.
#[derive(Debug, Clone)]
pub struct HostProbe {
    timeout: Duration,
}

impl HostProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn query_host() -> ProbeOutcome {
        // CUDA_VISIBLE_DEVICES="" or "-1" hides every device from the runtime
        // even when the driver is loaded.
        if let Ok(visible) = std::env::var("CUDA_VISIBLE_DEVICES") {
            let visible = visible.trim();
            if visible.is_empty() || visible == "-1" {
                return ProbeOutcome::Absent;
            }
        }

        if Path::new("/proc/driver/nvidia/version").exists()
            || Path::new("/dev/nvidia0").exists()
        {
            ProbeOutcome::Present
        } else {
            ProbeOutcome::Absent
        }
    }
}

impl Default for HostProbe {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(250),
        }
    }
}

impl AcceleratorProbe for HostProbe {
    fn detect(&self) -> ProbeOutcome {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            // Receiver may be gone if the deadline already passed.
            let _ = tx.send(Self::query_host());
        });

        match rx.recv_timeout(self.timeout) {
            Ok(outcome) => outcome,
            Err(_) => ProbeOutcome::Indeterminate,
        }
    }
}

/// Probe with a fixed answer, for tests and forced configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedProbe(pub ProbeOutcome);

impl FixedProbe {
    pub fn present() -> Self {
        Self(ProbeOutcome::Present)
    }

    pub fn absent() -> Self {
        Self(ProbeOutcome::Absent)
    }

    pub fn indeterminate() -> Self {
        Self(ProbeOutcome::Indeterminate)
    }
}

impl AcceleratorProbe for FixedProbe {
    fn detect(&self) -> ProbeOutcome {
        self.0
    }
}
