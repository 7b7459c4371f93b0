use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::config::ScriptLimits;

/// Shared flag that stops a running script at its next progress check.
///
/// Clones share the flag, so one clone can be handed to another thread
/// (a UI "stop" button, a watchdog) while the engine holds the other.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Re-arm the token for another run.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Per-call overrides for [`ScriptEngine::execute_with`](super::ScriptEngine::execute_with).
#[derive(Debug, Clone, Default)]
pub struct ExecutionOptions {
    /// Replaces the engine's own limits for this call only.
    pub limits: Option<ScriptLimits>,
    pub cancel: Option<CancelToken>,
}

impl ExecutionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(mut self, limits: ScriptLimits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

// ---------------------------------------------------------------------------
// RunGuard – state read by the progress callback during one evaluation
// ---------------------------------------------------------------------------

pub(crate) const CANCELLED: &str = "cancelled";
pub(crate) const TIMED_OUT: &str = "timed out";

/// Operations between two deadline/cancellation checks.
pub(crate) const CHECK_INTERVAL: u64 = 256;

#[derive(Debug, Default)]
pub(crate) struct RunGuard {
    pub deadline: Option<Instant>,
    pub cancel: Option<CancelToken>,
}

impl RunGuard {
    /// Reason to stop now, if any.
    pub fn interrupt(&self) -> Option<&'static str> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Some(CANCELLED);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(TIMED_OUT),
            _ => None,
        }
    }
}
