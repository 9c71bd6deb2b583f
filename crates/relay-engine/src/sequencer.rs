//! Last-timestamp-wins ordering of relayed posts and cancels.
//!
//! The transport may redeliver or reorder messages across reconnects. Each
//! global id remembers the newest timestamp applied to it, and anything not
//! strictly newer is dropped, whatever its operation.

use std::collections::HashMap;

use parking_lot::Mutex;
use relay_core::{GlobalId, InboundNotification, Payload, RelayBody, RelayError, RelayMessage};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Apply,
    Discard { last_applied: u64 },
}

#[derive(Debug, Default)]
pub struct Sequencer {
    last_applied: Mutex<HashMap<GlobalId, u64>>,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&self, inbound: &InboundNotification) -> Verdict {
        self.accept_at(&inbound.global_id(), inbound.message.timestamp)
    }

    /// Absent keys count as timestamp 0.
    pub fn accept_at(&self, global_id: &GlobalId, timestamp: u64) -> Verdict {
        let mut table = self.last_applied.lock();
        let last_applied = table.get(global_id).copied().unwrap_or(0);
        if timestamp <= last_applied {
            return Verdict::Discard { last_applied };
        }
        let _ = table.insert(global_id.clone(), timestamp);
        Verdict::Apply
    }

    pub fn last_applied(&self, global_id: &GlobalId) -> Option<u64> {
        self.last_applied.lock().get(global_id).copied()
    }

    pub fn len(&self) -> usize {
        self.last_applied.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Checks run before sequencing.
///
/// A standard post must carry a usable icon and a custom post a non-empty
/// render. Host-originated posts and cancels pass as-is.
pub fn validate(message: &RelayMessage) -> Result<(), RelayError> {
    match &message.body {
        RelayBody::Cancel => Ok(()),
        RelayBody::Post { payload, .. } => match payload {
            Payload::Base(_) => Ok(()),
            Payload::Custom(p) if p.has_content() => Ok(()),
            Payload::Custom(p) => Err(RelayError::Rejected(format!(
                "custom post without content ({} bytes, {}x{})",
                p.rendered.len(),
                p.width,
                p.height
            ))),
            Payload::Standard(p) if p.has_icon() => Ok(()),
            Payload::Standard(p) => Err(RelayError::Rejected(format!(
                "standard post without icon ({} bytes, {}x{})",
                p.icon.len(),
                p.icon_width,
                p.icon_height
            ))),
        },
    }
}
