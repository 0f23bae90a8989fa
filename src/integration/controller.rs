//! Progress, cancellation and error flags shared with a tracking worker.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Thread-safe status channel between a tracking worker and its caller.
///
/// Each flag is synchronized on its own; the worker writes progress and
/// completion, the caller requests cancellation and reads the rest.
#[derive(Debug, Default)]
pub struct ProcessingController {
    progress: AtomicU32,
    finished: AtomicBool,
    stop: AtomicBool,
    error: Mutex<ErrorState>,
}

#[derive(Debug, Default, Clone)]
struct ErrorState {
    failed: bool,
    message: String,
}

impl ProcessingController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record progress as a percentage, clamped to 100.
    pub fn set_progress(&self, percent: u32) {
        self.progress.store(percent.min(100), Ordering::SeqCst);
    }

    pub fn progress(&self) -> u32 {
        self.progress.load(Ordering::SeqCst)
    }

    /// Ask the worker to stop at the next frame boundary.
    pub fn cancel(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn should_stop(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    pub fn set_finished(&self, finished: bool) {
        self.finished.store(finished, Ordering::SeqCst);
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    pub fn set_error(&self, failed: bool, message: impl Into<String>) {
        let mut state = self.error.lock().unwrap_or_else(|e| e.into_inner());
        state.failed = failed;
        state.message = message.into();
    }

    pub fn error(&self) -> bool {
        self.error.lock().unwrap_or_else(|e| e.into_inner()).failed
    }

    pub fn error_message(&self) -> String {
        self.error
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .message
            .clone()
    }
}
