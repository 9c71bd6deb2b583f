//! Capabilities the relay needs from its surroundings.
//!
//! The engine only makes decisions; everything that touches the device,
//! the display or the socket goes through one of these traits.

use tokio::sync::mpsc;

use crate::bitmap::Bitmap;
use crate::display::DisplayableNotification;
use crate::errors::RelayError;
use crate::ids::GlobalId;
use crate::message::OutboundMessage;
use crate::notification::StatusBarNotification;

/// Hands fully formed messages to the transport.
pub trait MessageSink: Send + Sync {
    fn send(&self, msg: OutboundMessage) -> Result<(), RelayError>;
}

impl MessageSink for mpsc::UnboundedSender<OutboundMessage> {
    fn send(&self, msg: OutboundMessage) -> Result<(), RelayError> {
        mpsc::UnboundedSender::send(self, msg).map_err(|_| RelayError::ChannelClosed)
    }
}

/// Resource resolution inside other packages. Both lookups are best effort.
pub trait PlatformResources: Send + Sync {
    fn resolve_icon(&self, package: &str, icon_id: i32) -> Option<Bitmap>;

    /// Render the notification's content view to a bitmap.
    fn render_content(&self, sbn: &StatusBarNotification) -> Option<Bitmap>;
}

/// The local notification manager, keyed by `(global_id, id)`.
pub trait NotificationSink: Send + Sync {
    fn notify(
        &self,
        global_id: &GlobalId,
        id: i32,
        notification: &DisplayableNotification,
    ) -> Result<(), RelayError>;

    fn cancel(&self, global_id: &GlobalId, id: i32) -> Result<(), RelayError>;
}

pub trait DeviceControl: Send + Sync {
    fn suspend(&self) -> Result<(), RelayError>;
    fn resume(&self) -> Result<(), RelayError>;
    fn shutdown(&self) -> Result<(), RelayError>;
    fn set_airplane_mode(&self, enabled: bool) -> Result<(), RelayError>;
    fn set_wifi_enabled(&self, enabled: bool) -> Result<(), RelayError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn channel_sink_forwards() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        MessageSink::send(&tx, OutboundMessage::BootCompleted).unwrap();
        assert_eq!(rx.try_recv().unwrap(), OutboundMessage::BootCompleted);
    }

    #[test]
    fn closed_channel_reports_error() {
        let (tx, rx) = mpsc::unbounded_channel::<OutboundMessage>();
        drop(rx);
        assert_matches!(
            MessageSink::send(&tx, OutboundMessage::BootCompleted),
            Err(RelayError::ChannelClosed)
        );
    }
}
