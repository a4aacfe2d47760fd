use std::sync::{Mutex, OnceLock, PoisonError};
use tracing::{info, warn};
use crate::image_pipeline::common::error::Result;

/// Readiness barrier for a lazily loaded detector.
///
/// The first successful initialization wins and is never repeated. A failed
/// initialization leaves the gate closed so a later call can try again.
/// Concurrent callers block until the in-flight initialization finishes.
pub struct DetectorGate<D> {
    ready: OnceLock<D>,
    init_lock: Mutex<()>,
}

impl<D> Default for DetectorGate<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> DetectorGate<D> {
    pub fn new() -> Self {
        Self {
            ready: OnceLock::new(),
            init_lock: Mutex::new(()),
        }
    }

    pub fn get(&self) -> Option<&D> {
        self.ready.get()
    }

    pub fn is_ready(&self) -> bool {
        self.ready.get().is_some()
    }

    pub fn get_or_try_init<F>(&self, init: F) -> Result<&D>
    where
        F: FnOnce() -> Result<D>,
    {
        if let Some(detector) = self.ready.get() {
            return Ok(detector);
        }

        // The guarded section holds no data, so a poisoned lock is still usable.
        let _guard = self.init_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(detector) = self.ready.get() {
            return Ok(detector);
        }

        match init() {
            Ok(detector) => {
                info!("Eye detector ready");
                Ok(self.ready.get_or_init(|| detector))
            }
            Err(e) => {
                warn!("Eye detector initialization failed: {}", e);
                Err(e)
            }
        }
    }
}
