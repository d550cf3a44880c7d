use std::time::Instant;

use log::{self, Level};

/// Logs how long it lived when dropped. The label is only built when debug
/// logging is enabled.
pub struct ScopedTimer {
    label: Option<String>,
    start: Instant,
}

impl ScopedTimer {
    pub fn debug_lazy<F>(label_gen: F) -> Self
    where
        F: FnOnce() -> String,
    {
        Self {
            label: log::log_enabled!(Level::Debug).then(label_gen),
            start: Instant::now(),
        }
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        if let Some(label) = &self.label {
            let micros = self.start.elapsed().as_micros();
            log::debug!("{} took {} us", label, micros);
        }
    }
}
