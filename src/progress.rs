use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::foundation::error::{NoiseError, NoiseResult};

/// Shared job id -> percent map, readable from any thread.
///
/// Entries exist only while a job is running: [`ProgressRegistry::begin`] inserts 0 and the
/// returned [`ProgressHandle`] removes the entry when dropped.
#[derive(Clone, Debug, Default)]
pub struct ProgressRegistry {
    inner: Arc<RwLock<HashMap<String, u8>>>,
}

impl ProgressRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `job` at 0%.
    ///
    /// Fails with a validation error when a job with the same id is still active.
    pub fn begin(&self, job: impl Into<String>) -> NoiseResult<ProgressHandle> {
        let job = job.into();
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if map.contains_key(&job) {
            return Err(NoiseError::validation(format!(
                "job '{job}' is already in progress"
            )));
        }
        map.insert(job.clone(), 0);
        Ok(ProgressHandle {
            registry: self.clone(),
            job,
        })
    }

    /// Current percent for `job`, or `None` when the job is unknown or finished.
    pub fn get(&self, job: &str) -> Option<u8> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(job)
            .copied()
    }

    /// Ids of all running jobs, sorted.
    pub fn active_jobs(&self) -> Vec<String> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<String> = map.keys().cloned().collect();
        ids.sort();
        ids
    }

    fn raise(&self, job: &str, pct: u8) -> u8 {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let Some(entry) = map.get_mut(job) else {
            return pct;
        };
        *entry = (*entry).max(pct.min(100));
        *entry
    }

    fn remove(&self, job: &str) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(job);
    }
}

/// Writer side of one job's progress entry.
#[derive(Debug)]
pub struct ProgressHandle {
    registry: ProgressRegistry,
    job: String,
}

impl ProgressHandle {
    /// Job id this handle writes.
    pub fn job_id(&self) -> &str {
        &self.job
    }

    /// Publish `pct` if it is higher than the current value; returns the stored value.
    pub fn report(&self, pct: u8) -> u8 {
        self.registry.raise(&self.job, pct)
    }

    /// Publish 100%.
    pub fn complete(&self) {
        self.registry.raise(&self.job, 100);
    }
}

impl Drop for ProgressHandle {
    fn drop(&mut self) {
        self.registry.remove(&self.job);
    }
}

#[cfg(test)]
#[path = "../tests/unit/progress.rs"]
mod tests;
