//! Recording signal callback

use ebms_pull::{PullSignal, PullSignalCallback};
use parking_lot::Mutex;
use std::sync::Arc;

/// Keeps every signal it receives; clones share the same record
#[derive(Clone, Default)]
pub struct RecordingSignals {
    signals: Arc<Mutex<Vec<PullSignal>>>,
}

impl RecordingSignals {
    /// Empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals received so far, in order
    pub fn signals(&self) -> Vec<PullSignal> {
        self.signals.lock().clone()
    }

    /// Names of producers reported as failed
    pub fn failed_producers(&self) -> Vec<String> {
        self.signals
            .lock()
            .iter()
            .filter_map(|signal| match signal {
                PullSignal::ProducerFailed { producer, .. } => Some(producer.clone()),
                _ => None,
            })
            .collect()
    }

    /// Names of producers reported as timed out
    pub fn timed_out_producers(&self) -> Vec<String> {
        self.signals
            .lock()
            .iter()
            .filter_map(|signal| match signal {
                PullSignal::ProducerTimedOut { producer, .. } => Some(producer.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of signals matching `predicate`
    pub fn count(&self, predicate: impl Fn(&PullSignal) -> bool) -> usize {
        self.signals.lock().iter().filter(|s| predicate(s)).count()
    }
}

impl PullSignalCallback for RecordingSignals {
    fn on_pull_signal(&self, signal: PullSignal) {
        self.signals.lock().push(signal);
    }
}
