use std::sync::Arc;

use relay_core::{
    MessageSink, OutboundMessage, RankingSnapshot, RawNotificationEvent, RelayError,
    StatusBarNotification,
};
use relay_settings::RelaySettings;
use tracing::{debug, info};

use crate::projector::{Projection, Projector};
use crate::stacking;
use crate::state::RelayState;

/// Package and category filters applied before projection.
#[derive(Clone, Debug, Default)]
pub struct CaptureFilters {
    pub own_package: String,
    pub stacked_packages: Vec<String>,
    pub template_filtered_packages: Vec<String>,
    pub filtered_categories: Vec<String>,
}

impl From<&RelaySettings> for CaptureFilters {
    fn from(s: &RelaySettings) -> Self {
        Self {
            own_package: s.own_package.clone(),
            stacked_packages: s.stacked_packages.clone(),
            template_filtered_packages: s.template_filtered_packages.clone(),
            filtered_categories: s.filtered_categories.clone(),
        }
    }
}

/// Capture side: filters platform events, projects them and hands the
/// resulting messages to the transport.
pub struct NotificationListener {
    filters: CaptureFilters,
    projector: Projector,
    sink: Arc<dyn MessageSink>,
    state: Arc<RelayState>,
}

impl NotificationListener {
    pub fn new(
        filters: CaptureFilters,
        projector: Projector,
        sink: Arc<dyn MessageSink>,
        state: Arc<RelayState>,
    ) -> Self {
        Self {
            filters,
            projector,
            sink,
            state,
        }
    }

    /// Returns whether a message was sent.
    pub fn on_event(&self, event: RawNotificationEvent, ranking: &RankingSnapshot) -> Result<bool, RelayError> {
        match &event {
            RawNotificationEvent::Posted(sbn) => {
                if !self.admit_post(sbn, ranking) {
                    return Ok(false);
                }
            }
            RawNotificationEvent::Removed(sbn) => {
                if sbn.package() == self.filters.own_package {
                    return Ok(false);
                }
            }
        }
        self.forward(&event)
    }

    pub fn on_posted(&self, sbn: StatusBarNotification, ranking: &RankingSnapshot) -> Result<bool, RelayError> {
        self.on_event(RawNotificationEvent::Posted(sbn), ranking)
    }

    pub fn on_removed(&self, sbn: StatusBarNotification) -> Result<bool, RelayError> {
        self.on_event(RawNotificationEvent::Removed(sbn), &RankingSnapshot::default())
    }

    fn admit_post(&self, sbn: &StatusBarNotification, ranking: &RankingSnapshot) -> bool {
        let package = sbn.package();
        let metrics = &self.state.metrics;

        if package == self.filters.own_package {
            return false;
        }
        if sbn.content.template.is_some()
            && self.filters.template_filtered_packages.iter().any(|p| p == package)
        {
            debug!(package, "templated duplicate dropped");
            metrics.filtered.increment();
            return false;
        }
        if let Some(category) = sbn.content.category.as_deref() {
            if self.filters.filtered_categories.iter().any(|c| c == category) {
                debug!(package, category, "filtered category dropped");
                metrics.filtered.increment();
                return false;
            }
        }
        if self.filters.stacked_packages.iter().any(|p| p == package)
            && !stacking::should_forward(
                &sbn.identity,
                &ranking.active,
                ranking.ordered.as_deref(),
                package,
            )
        {
            debug!(identity = %sbn.identity, "stacked notification suppressed");
            metrics.suppressed_stack.increment();
            return false;
        }
        true
    }

    fn forward(&self, event: &RawNotificationEvent) -> Result<bool, RelayError> {
        let metrics = &self.state.metrics;
        match self.projector.classify(event) {
            Projection::Forward(msg) => {
                info!(
                    identity = %msg.identity,
                    op = msg.op_name(),
                    timestamp = msg.timestamp,
                    "relaying notification"
                );
                self.sink.send(OutboundMessage::Notification(msg))?;
                metrics.forwarded.increment();
                Ok(true)
            }
            Projection::DroppedCustom => {
                metrics.dropped_custom.increment();
                Ok(false)
            }
            Projection::DuplicateProgress => {
                metrics.suppressed_progress.increment();
                Ok(false)
            }
        }
    }
}
