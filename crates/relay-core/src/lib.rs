//! Core types for relaying notifications between containers.
//!
//! Identities, the notification and message models, the protobuf codec,
//! bitmaps and the capability traits the engine is written against.

pub mod bitmap;
pub mod codec;
pub mod display;
pub mod errors;
pub mod ids;
pub mod message;
pub mod notification;
pub mod platform;
pub mod wire;

pub use bitmap::{Bitmap, Color};
pub use display::{DisplayStyle, DisplayableNotification, ReturnAction, SmallIcon};
pub use errors::{BuildError, CodecError, RelayError};
pub use ids::{ContainerId, GlobalId};
pub use message::{
    BasePayload, CustomPayload, HostCommand, InboundNotification, OutboundMessage, Payload,
    RelayBody, RelayMessage, StandardPayload,
};
pub use notification::{
    NotificationContent, NotificationIdentity, Progress, RankingSnapshot, RawNotificationEvent,
    StatusBarNotification,
};
pub use platform::{DeviceControl, MessageSink, NotificationSink, PlatformResources};
