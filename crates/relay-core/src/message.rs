use crate::ids::{ContainerId, GlobalId};
use crate::notification::NotificationIdentity;

/// Title, text and the raw small icon of a regular notification.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StandardPayload {
    pub title: String,
    pub text: String,
    pub icon: Vec<u8>,
    pub icon_width: u32,
    pub icon_height: u32,
}

impl StandardPayload {
    pub fn has_icon(&self) -> bool {
        !self.icon.is_empty() && self.icon_width != 0 && self.icon_height != 0
    }
}

/// A fully rendered notification image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomPayload {
    pub rendered: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl CustomPayload {
    pub fn has_content(&self) -> bool {
        !self.rendered.is_empty() && self.width != 0 && self.height != 0
    }
}

/// A notification originated by the host itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BasePayload {
    pub title: String,
    pub text: String,
    /// Name of a system icon replacing the default status bar icon.
    pub custom_icon: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    Standard(StandardPayload),
    Custom(CustomPayload),
    Base(BasePayload),
}

impl Payload {
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Standard(_) => "standard",
            Self::Custom(_) => "custom",
            Self::Base(_) => "base",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelayBody {
    Post { no_clear: bool, payload: Payload },
    Cancel,
}

/// One post or cancel of a logical notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayMessage {
    pub identity: NotificationIdentity,
    pub timestamp: u64,
    pub body: RelayBody,
}

impl RelayMessage {
    pub fn post(identity: NotificationIdentity, timestamp: u64, no_clear: bool, payload: Payload) -> Self {
        Self {
            identity,
            timestamp,
            body: RelayBody::Post { no_clear, payload },
        }
    }

    pub fn cancel(identity: NotificationIdentity, timestamp: u64) -> Self {
        Self {
            identity,
            timestamp,
            body: RelayBody::Cancel,
        }
    }

    pub fn global_id(&self, source: &ContainerId) -> GlobalId {
        GlobalId::compose(source, &self.identity.package, self.identity.tag.as_deref())
    }

    pub fn is_cancel(&self) -> bool {
        matches!(self.body, RelayBody::Cancel)
    }

    pub fn op_name(&self) -> &'static str {
        match self.body {
            RelayBody::Post { .. } => "post",
            RelayBody::Cancel => "cancel",
        }
    }
}

/// Messages the service sends to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutboundMessage {
    BootCompleted,
    Notification(RelayMessage),
    SwitchContainer(ContainerId),
}

/// A relayed notification as delivered by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundNotification {
    pub source: ContainerId,
    /// Accent color of the source container, `#RRGGBB` or `#AARRGGBB`.
    pub source_color: Option<String>,
    pub message: RelayMessage,
}

impl InboundNotification {
    pub fn global_id(&self) -> GlobalId {
        self.message.global_id(&self.source)
    }
}

/// Commands the host sends to the service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostCommand {
    Suspend,
    Resume,
    Shutdown,
    Notification(InboundNotification),
    AirplaneModeChanged(bool),
    WifiUserEnabledChanged(bool),
}

impl HostCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Suspend => "suspend",
            Self::Resume => "resume",
            Self::Shutdown => "shutdown",
            Self::Notification(_) => "notification",
            Self::AirplaneModeChanged(_) => "airplane_mode_changed",
            Self::WifiUserEnabledChanged(_) => "wifi_user_enabled_changed",
        }
    }
}
