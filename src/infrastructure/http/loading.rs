use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use crate::errors::AppError;

/// `isLoading` of one operation: true exactly while at least one of its
/// requests is outstanding.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicUsize>);

impl LoadingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.0.load(Ordering::Acquire) > 0
    }

    /// Starts an exclusive request. Fails while another one is pending,
    /// which is how double submission is refused.
    pub fn begin(&self) -> Result<LoadingGuard, AppError> {
        self.0
            .compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AppError::AlreadyInFlight)?;
        Ok(LoadingGuard(Arc::clone(&self.0)))
    }

    /// Starts a request that may overlap others, e.g. a refetch.
    pub fn begin_shared(&self) -> LoadingGuard {
        self.0.fetch_add(1, Ordering::AcqRel);
        LoadingGuard(Arc::clone(&self.0))
    }
}

/// Marks its request finished when dropped, including on cancellation.
#[derive(Debug)]
pub struct LoadingGuard(Arc<AtomicUsize>);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}
