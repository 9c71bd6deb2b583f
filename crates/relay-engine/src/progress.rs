use std::collections::HashSet;

use parking_lot::Mutex;
use relay_core::{NotificationIdentity, Progress};

/// Identities currently inside a progress-bar sequence.
///
/// The first update of a sequence and its finish are forwarded; everything
/// in between is suppressed.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    active: Mutex<HashSet<NotificationIdentity>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if this post only moves an already-relayed progress bar.
    pub fn is_progress_update_only(&self, identity: &NotificationIdentity, progress: &Progress) -> bool {
        let mut active = self.active.lock();
        let tracked = active.contains(identity);
        if !tracked && !progress.shows_progress() {
            return false;
        }
        if !tracked {
            let _ = active.insert(identity.clone());
            return false;
        }
        if progress.is_finished() {
            let _ = active.remove(identity);
            return false;
        }
        true
    }

    /// Drop any sequence state for `identity`, e.g. on cancel.
    pub fn forget(&self, identity: &NotificationIdentity) -> bool {
        self.active.lock().remove(identity)
    }

    pub fn is_tracked(&self, identity: &NotificationIdentity) -> bool {
        self.active.lock().contains(identity)
    }

    pub fn len(&self) -> usize {
        self.active.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
