use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::GraphBuildError;

/// Shared flag a caller can flip from another thread to stop a long build.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Bounds on visibility-graph construction, which is quadratic in open cells.
#[derive(Clone, Debug, Default)]
pub struct VisibilityLimits {
    pub cancel: Option<CancelToken>,
    pub max_pair_checks: Option<u64>,
}

impl VisibilityLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_pair_checks(max_pair_checks: u64) -> Self {
        Self { cancel: None, max_pair_checks: Some(max_pair_checks) }
    }

    pub(super) fn check(&self, pair_checks: u64) -> Result<(), GraphBuildError> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(GraphBuildError::Cancelled);
        }
        match self.max_pair_checks {
            Some(max) if pair_checks > max => Err(GraphBuildError::BudgetExhausted(max)),
            _ => Ok(()),
        }
    }
}
