use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use relay_core::ContainerId;
use relay_telemetry::RelayMetrics;

use crate::progress::ProgressTracker;
use crate::sequencer::Sequencer;

/// Process-lifetime request codes for return actions, one per source
/// container, assigned from 1 upwards on first use.
#[derive(Debug, Default)]
pub struct RequestCodes {
    inner: Mutex<RequestCodeTable>,
}

#[derive(Debug, Default)]
struct RequestCodeTable {
    last: i32,
    codes: HashMap<ContainerId, i32>,
}

impl RequestCodes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn code_for(&self, container: &ContainerId) -> i32 {
        let mut table = self.inner.lock();
        if let Some(code) = table.codes.get(container) {
            return *code;
        }
        table.last += 1;
        let code = table.last;
        let _ = table.codes.insert(container.clone(), code);
        code
    }

    pub fn len(&self) -> usize {
        self.inner.lock().codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// All mutable relay state. Built once at start-up and shared by `Arc`;
/// a restart begins from empty tables.
#[derive(Debug)]
pub struct RelayState {
    pub progress: ProgressTracker,
    pub sequencer: Sequencer,
    pub request_codes: RequestCodes,
    pub metrics: Arc<RelayMetrics>,
}

impl RelayState {
    pub fn new(metrics: Arc<RelayMetrics>) -> Self {
        Self {
            progress: ProgressTracker::new(),
            sequencer: Sequencer::new(),
            request_codes: RequestCodes::new(),
            metrics,
        }
    }
}

impl Default for RelayState {
    fn default() -> Self {
        Self::new(Arc::new(RelayMetrics::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_start_at_one_and_are_stable() {
        let codes = RequestCodes::new();
        let c1 = ContainerId::from_raw("c1");
        let c2 = ContainerId::from_raw("c2");
        assert_eq!(codes.code_for(&c1), 1);
        assert_eq!(codes.code_for(&c2), 2);
        assert_eq!(codes.code_for(&c1), 1);
        assert_eq!(codes.len(), 2);
    }

    #[test]
    fn fresh_state_is_empty() {
        let state = RelayState::default();
        assert!(state.progress.is_empty());
        assert!(state.sequencer.is_empty());
        assert!(state.request_codes.is_empty());
        assert_eq!(state.metrics.snapshot().applied, 0);
    }
}
