//! Rebuilds relayed messages into locally displayable notifications.

use std::sync::Arc;

use relay_core::bitmap::dogear;
use relay_core::{
    BasePayload, Bitmap, BuildError, Color, ContainerId, CustomPayload, DisplayStyle,
    DisplayableNotification, GlobalId, NotificationSink, Payload, RelayBody, RelayError,
    RelayMessage, ReturnAction, SmallIcon, StandardPayload,
};
use tracing::debug;

use crate::state::RelayState;

pub struct Reconstructor {
    state: Arc<RelayState>,
    dogear_size: u32,
}

impl Reconstructor {
    pub fn new(state: Arc<RelayState>, dogear_size: u32) -> Self {
        Self { state, dogear_size }
    }

    /// Build the notification for a post from `source`.
    ///
    /// `source_color` is `#RRGGBB` or `#AARRGGBB`; absent means black.
    pub fn build(
        &self,
        source: &ContainerId,
        source_color: Option<&str>,
        message: &RelayMessage,
    ) -> Result<DisplayableNotification, BuildError> {
        let RelayBody::Post { no_clear, payload } = &message.body else {
            return Err(BuildError::NotAPost);
        };
        let accent = match source_color {
            Some(color) => Color::parse(color)?,
            None => Color::BLACK,
        };

        let mut notification = match payload {
            Payload::Base(p) => Self::base(p),
            Payload::Custom(p) => Self::custom(p)?,
            Payload::Standard(p) => Self::standard(p)?,
        };
        notification.accent = accent;
        notification.dogear = Some(dogear(accent, self.dogear_size)?);
        notification.ongoing = *no_clear;
        notification.return_action = Some(ReturnAction {
            request_code: self.state.request_codes.code_for(source),
            target_container: source.clone(),
        });
        debug!(
            source = %source,
            style = ?notification.style,
            accent = %accent,
            "rebuilt notification"
        );
        Ok(notification)
    }

    fn base(p: &BasePayload) -> DisplayableNotification {
        DisplayableNotification {
            style: DisplayStyle::Base,
            small_icon: p
                .custom_icon
                .clone()
                .map_or(SmallIcon::Default, SmallIcon::Named),
            title: p.title.clone(),
            text: p.text.clone(),
            ..DisplayableNotification::placeholder()
        }
    }

    fn custom(p: &CustomPayload) -> Result<DisplayableNotification, BuildError> {
        let content = Bitmap::from_raw(p.width, p.height, p.rendered.clone())?;
        Ok(DisplayableNotification {
            style: DisplayStyle::Custom,
            title: String::new(),
            text: String::new(),
            content: Some(content),
            ..DisplayableNotification::placeholder()
        })
    }

    fn standard(p: &StandardPayload) -> Result<DisplayableNotification, BuildError> {
        if !p.has_icon() {
            return Err(BuildError::MissingIcon);
        }
        let icon = Bitmap::from_raw(p.icon_width, p.icon_height, p.icon.clone())?;
        Ok(DisplayableNotification {
            style: DisplayStyle::Standard,
            title: p.title.clone(),
            text: p.text.clone(),
            large_icon: Some(icon.inverted()),
            ..DisplayableNotification::placeholder()
        })
    }

    /// First half of the two-step publish: reset the slot to neutral content.
    pub fn publish_placeholder(
        &self,
        sink: &dyn NotificationSink,
        global_id: &GlobalId,
        id: i32,
    ) -> Result<(), RelayError> {
        sink.notify(global_id, id, &DisplayableNotification::placeholder())
    }

    /// Second half: the real content, into the slot just reset.
    pub fn publish(
        &self,
        sink: &dyn NotificationSink,
        global_id: &GlobalId,
        id: i32,
        notification: &DisplayableNotification,
    ) -> Result<(), RelayError> {
        sink.notify(global_id, id, notification)
    }
}
