use std::sync::Arc;

use relay_core::{
    DeviceControl, HostCommand, InboundNotification, NotificationSink, RelayBody, RelayError,
};
use tracing::{debug, info, warn};

use crate::reconstructor::Reconstructor;
use crate::sequencer::{self, Verdict};
use crate::state::RelayState;

/// How a host command ended. Only sink and device failures are errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Posted,
    Cancelled,
    /// Not newer than what was already applied.
    Discarded,
    Rejected,
    BuildFailed,
    Device,
}

/// Display side: applies commands arriving from the host.
pub struct ServiceReceiver {
    state: Arc<RelayState>,
    reconstructor: Reconstructor,
    sink: Arc<dyn NotificationSink>,
    device: Arc<dyn DeviceControl>,
}

impl ServiceReceiver {
    pub fn new(
        state: Arc<RelayState>,
        reconstructor: Reconstructor,
        sink: Arc<dyn NotificationSink>,
        device: Arc<dyn DeviceControl>,
    ) -> Self {
        Self {
            state,
            reconstructor,
            sink,
            device,
        }
    }

    pub fn handle(&self, cmd: HostCommand) -> Result<Outcome, RelayError> {
        debug!(command = cmd.name(), "handling host command");
        match cmd {
            HostCommand::Suspend => self.device.suspend().map(|()| Outcome::Device),
            HostCommand::Resume => self.device.resume().map(|()| Outcome::Device),
            HostCommand::Shutdown => self.device.shutdown().map(|()| Outcome::Device),
            HostCommand::AirplaneModeChanged(on) => {
                info!(enabled = on, "setting airplane mode");
                self.device.set_airplane_mode(on).map(|()| Outcome::Device)
            }
            HostCommand::WifiUserEnabledChanged(on) => {
                info!(enabled = on, "setting wifi");
                self.device.set_wifi_enabled(on).map(|()| Outcome::Device)
            }
            HostCommand::Notification(inbound) => self.apply(&inbound),
        }
    }

    /// Validate, sequence, then publish or cancel.
    pub fn apply(&self, inbound: &InboundNotification) -> Result<Outcome, RelayError> {
        let metrics = &self.state.metrics;
        let message = &inbound.message;
        let global_id = inbound.global_id();
        let id = message.identity.id;

        if let Err(e) = sequencer::validate(message) {
            warn!(global_id = %global_id, id, error = %e, "rejected notification");
            metrics.rejected.increment();
            return Ok(Outcome::Rejected);
        }

        if let Verdict::Discard { last_applied } = self.state.sequencer.accept(inbound) {
            debug!(
                global_id = %global_id,
                id,
                timestamp = message.timestamp,
                last_applied,
                "stale notification discarded"
            );
            metrics.discarded_stale.increment();
            return Ok(Outcome::Discarded);
        }

        if let RelayBody::Post { payload, .. } = &message.body {
            let notification = match self.reconstructor.build(
                &inbound.source,
                inbound.source_color.as_deref(),
                message,
            ) {
                Ok(n) => n,
                Err(e) => {
                    warn!(global_id = %global_id, id, error = %e, "failed to rebuild notification");
                    metrics.build_failures.increment();
                    return Ok(Outcome::BuildFailed);
                }
            };
            info!(
                global_id = %global_id,
                id,
                timestamp = message.timestamp,
                shape = payload.shape(),
                "posting relayed notification"
            );
            self.reconstructor
                .publish_placeholder(self.sink.as_ref(), &global_id, id)?;
            self.reconstructor
                .publish(self.sink.as_ref(), &global_id, id, &notification)?;
            metrics.applied.increment();
            Ok(Outcome::Posted)
        } else {
            info!(global_id = %global_id, id, timestamp = message.timestamp, "cancelling relayed notification");
            self.sink.cancel(&global_id, id)?;
            metrics.applied.increment();
            Ok(Outcome::Cancelled)
        }
    }
}
