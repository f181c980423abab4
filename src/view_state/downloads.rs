use crate::error::{DownloadInFlightSnafu, RegistrarResult};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
    time::Instant,
};

/// Which records currently have an admission form being generated, keyed by record id.
#[derive(Debug, Clone, Default)]
pub struct DownloadTracker(Arc<Mutex<HashMap<String, Instant>>>);

impl DownloadTracker {
    ///fails if this record already has a download going; other records are unaffected
    pub fn begin(&self, id: &str) -> RegistrarResult<DownloadGuard> {
        let mut in_flight = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        snafu::ensure!(!in_flight.contains_key(id), DownloadInFlightSnafu { id });
        in_flight.insert(id.to_string(), Instant::now());

        Ok(DownloadGuard {
            tracker: self.clone(),
            id: id.to_string(),
        })
    }

    pub fn is_downloading(&self, id: &str) -> bool {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    pub fn in_flight(&self) -> usize {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Clears its own record's flag when dropped, however the download ended.
#[derive(Debug)]
pub struct DownloadGuard {
    tracker: DownloadTracker,
    id: String,
}

impl Drop for DownloadGuard {
    fn drop(&mut self) {
        let started = self
            .tracker
            .0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
        if let Some(started) = started {
            debug!(id = %self.id, elapsed = ?started.elapsed(), "Admission form download finished");
        }
    }
}
