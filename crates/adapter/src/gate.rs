//! Startup gate for interactive debugging.
//!
//! In local mode the process holds off serving until a debugger is attached, so breakpoints
//! set before the first request are honored. The gate has two states and moves forward
//! exactly once:
//!
//! `WaitingForDebugger --(first attach observed)--> Serving`
//!
//! Attach detection is behind [`AttachProbe`] so the state machine can be driven without
//! a real debugger or a wall clock.

use std::time::Duration;

/// Interval between attach probes while waiting.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

pub trait AttachProbe: Send {
    fn is_attached(&mut self) -> bool;
}

impl<F> AttachProbe for F
where
    F: FnMut() -> bool + Send,
{
    fn is_attached(&mut self) -> bool {
        self()
    }
}

/// Detects a tracer (gdb, lldb, a DAP adapter using ptrace) via `/proc/self/status`.
///
/// On platforms without procfs this always reports "not attached".
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcStatusProbe;

impl AttachProbe for ProcStatusProbe {
    fn is_attached(&mut self) -> bool {
        std::fs::read_to_string("/proc/self/status")
            .ok()
            .and_then(|status| tracer_pid(&status))
            .is_some_and(|pid| pid != 0)
    }
}

/// `TracerPid` from a `/proc/<pid>/status` document.
#[must_use]
pub fn tracer_pid(status: &str) -> Option<u32> {
    status
        .lines()
        .find_map(|line| line.strip_prefix("TracerPid:"))
        .and_then(|v| v.trim().parse().ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    WaitingForDebugger,
    Serving,
}

pub struct DebuggerGate<P> {
    probe: P,
    state: GateState,
    polls: u64,
}

impl<P: AttachProbe> DebuggerGate<P> {
    #[must_use]
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            state: GateState::WaitingForDebugger,
            polls: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Number of probes issued so far.
    #[must_use]
    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Probe once. Once serving, the probe is no longer consulted.
    pub fn step(&mut self) -> GateState {
        if self.state == GateState::Serving {
            return self.state;
        }

        self.polls += 1;
        if self.probe.is_attached() {
            self.state = GateState::Serving;
            tracing::info!(polls = self.polls, "debugger attached");
        }
        self.state
    }

    /// Probe every `interval` until the first attach is observed.
    ///
    /// There is no timeout; only process termination ends the wait.
    pub async fn wait(&mut self, interval: Duration) -> GateState {
        if self.state == GateState::WaitingForDebugger {
            tracing::info!(pid = std::process::id(), "waiting for debugger to attach");
        }
        while self.step() == GateState::WaitingForDebugger {
            tokio::time::sleep(interval).await;
        }
        self.state
    }
}
