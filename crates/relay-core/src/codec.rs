//! Conversion between domain messages and their protobuf byte form.

use prost::Message;

use crate::errors::CodecError;
use crate::ids::ContainerId;
use crate::message::{
    BasePayload, CustomPayload, HostCommand, InboundNotification, OutboundMessage, Payload,
    RelayBody, RelayMessage, StandardPayload,
};
use crate::notification::NotificationIdentity;
use crate::wire::{
    CmldToServiceMessage, ContainerNotification, HostCode, NotificationCode, ServiceCode,
    ServiceToCmldMessage,
};

pub fn encode_outbound(msg: &OutboundMessage) -> Vec<u8> {
    ServiceToCmldMessage::from(msg).encode_to_vec()
}

pub fn decode_outbound(bytes: &[u8]) -> Result<OutboundMessage, CodecError> {
    OutboundMessage::try_from(ServiceToCmldMessage::decode(bytes)?)
}

pub fn encode_inbound(cmd: &HostCommand) -> Vec<u8> {
    CmldToServiceMessage::from(cmd).encode_to_vec()
}

pub fn decode_inbound(bytes: &[u8]) -> Result<HostCommand, CodecError> {
    HostCommand::try_from(CmldToServiceMessage::decode(bytes)?)
}

// ── Notification body ───────────────────────────────────────────────────────

impl From<&RelayMessage> for ContainerNotification {
    fn from(msg: &RelayMessage) -> Self {
        let mut wire = ContainerNotification {
            id: Some(msg.identity.id),
            tag: msg.identity.tag.clone(),
            pkg_name: Some(msg.identity.package.clone()),
            timestamp: msg.timestamp,
            ..Default::default()
        };

        match &msg.body {
            RelayBody::Cancel => wire.code = Some(NotificationCode::Cancel as i32),
            RelayBody::Post { no_clear, payload } => {
                wire.code = Some(NotificationCode::Post as i32);
                wire.no_clear = *no_clear;
                match payload {
                    Payload::Standard(p) => {
                        wire.title = p.title.clone();
                        wire.text = p.text.clone();
                        wire.original_icon = p.icon.clone();
                        wire.original_icon_width = p.icon_width;
                        wire.original_icon_height = p.icon_height;
                    }
                    Payload::Custom(p) => {
                        wire.custom_notification = p.rendered.clone();
                        wire.custom_notification_width = p.width;
                        wire.custom_notification_height = p.height;
                    }
                    Payload::Base(p) => {
                        wire.is_base = true;
                        wire.title = p.title.clone();
                        wire.text = p.text.clone();
                        wire.custom_icon = p.custom_icon.clone();
                    }
                }
            }
        }
        wire
    }
}

impl TryFrom<ContainerNotification> for RelayMessage {
    type Error = CodecError;

    fn try_from(wire: ContainerNotification) -> Result<Self, Self::Error> {
        let code = match wire.code {
            None => return Err(CodecError::malformed("missing notification code")),
            Some(raw) => NotificationCode::try_from(raw)
                .map_err(|_| CodecError::malformed(format!("unknown notification code {raw}")))?,
        };
        let id = wire
            .id
            .ok_or_else(|| CodecError::malformed("missing notification id"))?;
        let package = wire
            .pkg_name
            .ok_or_else(|| CodecError::malformed("missing package name"))?;
        let identity = NotificationIdentity {
            package,
            tag: wire.tag,
            id,
        };

        match code {
            NotificationCode::Unspecified => Err(CodecError::malformed("unspecified notification code")),
            NotificationCode::Cancel => Ok(RelayMessage::cancel(identity, wire.timestamp)),
            NotificationCode::Post => {
                // Shape priority: host-originated, then custom size, then standard.
                let payload = if wire.is_base {
                    Payload::Base(BasePayload {
                        title: wire.title,
                        text: wire.text,
                        custom_icon: wire.custom_icon.filter(|s| !s.is_empty()),
                    })
                } else if wire.custom_notification_width != 0 || wire.custom_notification_height != 0 {
                    Payload::Custom(CustomPayload {
                        rendered: wire.custom_notification,
                        width: wire.custom_notification_width,
                        height: wire.custom_notification_height,
                    })
                } else {
                    Payload::Standard(StandardPayload {
                        title: wire.title,
                        text: wire.text,
                        icon: wire.original_icon,
                        icon_width: wire.original_icon_width,
                        icon_height: wire.original_icon_height,
                    })
                };
                Ok(RelayMessage::post(identity, wire.timestamp, wire.no_clear, payload))
            }
        }
    }
}

// ── Service -> host ─────────────────────────────────────────────────────────

impl From<&OutboundMessage> for ServiceToCmldMessage {
    fn from(msg: &OutboundMessage) -> Self {
        match msg {
            OutboundMessage::BootCompleted => Self {
                code: Some(ServiceCode::BootCompleted as i32),
                ..Default::default()
            },
            OutboundMessage::Notification(n) => Self {
                code: Some(ServiceCode::Notification as i32),
                notification: Some(ContainerNotification::from(n)),
                ..Default::default()
            },
            OutboundMessage::SwitchContainer(target) => Self {
                code: Some(ServiceCode::SwitchContainer as i32),
                target_container: Some(target.to_string()),
                ..Default::default()
            },
        }
    }
}

impl TryFrom<ServiceToCmldMessage> for OutboundMessage {
    type Error = CodecError;

    fn try_from(wire: ServiceToCmldMessage) -> Result<Self, Self::Error> {
        let raw = wire
            .code
            .ok_or_else(|| CodecError::malformed("missing service message code"))?;
        let code = ServiceCode::try_from(raw)
            .map_err(|_| CodecError::malformed(format!("unknown service message code {raw}")))?;
        match code {
            ServiceCode::Unspecified => Err(CodecError::malformed("unspecified service message code")),
            ServiceCode::BootCompleted => Ok(Self::BootCompleted),
            ServiceCode::Notification => {
                let body = wire
                    .notification
                    .ok_or_else(|| CodecError::malformed("notification message without body"))?;
                Ok(Self::Notification(RelayMessage::try_from(body)?))
            }
            ServiceCode::SwitchContainer => {
                let target = wire
                    .target_container
                    .ok_or_else(|| CodecError::malformed("switch request without target"))?;
                Ok(Self::SwitchContainer(ContainerId::from_raw(target)))
            }
        }
    }
}

// ── Host -> service ─────────────────────────────────────────────────────────

impl From<&HostCommand> for CmldToServiceMessage {
    fn from(cmd: &HostCommand) -> Self {
        let code = match cmd {
            HostCommand::Suspend => HostCode::Suspend,
            HostCommand::Resume => HostCode::Resume,
            HostCommand::Shutdown => HostCode::Shutdown,
            HostCommand::Notification(_) => HostCode::Notification,
            HostCommand::AirplaneModeChanged(_) => HostCode::AirplaneModeChanged,
            HostCommand::WifiUserEnabledChanged(_) => HostCode::WifiUserEnabledChanged,
        };
        let mut wire = Self {
            code: Some(code as i32),
            ..Default::default()
        };
        match cmd {
            HostCommand::Notification(n) => {
                wire.source_id = Some(n.source.to_string());
                wire.source_color = n.source_color.clone();
                wire.notification = Some(ContainerNotification::from(&n.message));
            }
            HostCommand::AirplaneModeChanged(on) => wire.airplane_mode = *on,
            HostCommand::WifiUserEnabledChanged(on) => wire.wifi_user_enabled = *on,
            HostCommand::Suspend | HostCommand::Resume | HostCommand::Shutdown => {}
        }
        wire
    }
}

impl TryFrom<CmldToServiceMessage> for HostCommand {
    type Error = CodecError;

    fn try_from(wire: CmldToServiceMessage) -> Result<Self, Self::Error> {
        let raw = wire
            .code
            .ok_or_else(|| CodecError::malformed("missing host message code"))?;
        let code = HostCode::try_from(raw)
            .map_err(|_| CodecError::malformed(format!("unknown host message code {raw}")))?;
        match code {
            HostCode::Unspecified => Err(CodecError::malformed("unspecified host message code")),
            HostCode::Suspend => Ok(Self::Suspend),
            HostCode::Resume => Ok(Self::Resume),
            HostCode::Shutdown => Ok(Self::Shutdown),
            HostCode::AirplaneModeChanged => Ok(Self::AirplaneModeChanged(wire.airplane_mode)),
            HostCode::WifiUserEnabledChanged => {
                Ok(Self::WifiUserEnabledChanged(wire.wifi_user_enabled))
            }
            HostCode::Notification => {
                let source = wire
                    .source_id
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| CodecError::malformed("notification without source container"))?;
                let body = wire
                    .notification
                    .ok_or_else(|| CodecError::malformed("notification command without body"))?;
                Ok(Self::Notification(InboundNotification {
                    source: ContainerId::from_raw(source),
                    source_color: wire.source_color.filter(|s| !s.is_empty()),
                    message: RelayMessage::try_from(body)?,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn identity() -> NotificationIdentity {
        NotificationIdentity::new("com.example.chat", Some("thread-1"), 12)
    }

    fn standard_post() -> RelayMessage {
        RelayMessage::post(
            identity(),
            1_000,
            true,
            Payload::Standard(StandardPayload {
                title: "T".into(),
                text: "X".into(),
                icon: (0..64).collect(),
                icon_width: 4,
                icon_height: 4,
            }),
        )
    }

    #[test]
    fn outbound_standard_post_survives_encoding() {
        let msg = OutboundMessage::Notification(standard_post());
        let decoded = decode_outbound(&encode_outbound(&msg)).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn outbound_switch_and_boot() {
        let switch = OutboundMessage::SwitchContainer(ContainerId::from_raw("c2"));
        assert_eq!(decode_outbound(&encode_outbound(&switch)).unwrap(), switch);
        let boot = OutboundMessage::BootCompleted;
        assert_eq!(decode_outbound(&encode_outbound(&boot)).unwrap(), boot);
    }

    #[test]
    fn inbound_notification_keeps_envelope() {
        let cmd = HostCommand::Notification(InboundNotification {
            source: ContainerId::from_raw("c1"),
            source_color: Some("#3366ff".into()),
            message: RelayMessage::cancel(identity(), 77),
        });
        assert_eq!(decode_inbound(&encode_inbound(&cmd)).unwrap(), cmd);
    }

    #[test]
    fn inbound_toggles_carry_flag() {
        let cmd = HostCommand::WifiUserEnabledChanged(true);
        assert_eq!(decode_inbound(&encode_inbound(&cmd)).unwrap(), cmd);
        let cmd = HostCommand::AirplaneModeChanged(false);
        assert_eq!(decode_inbound(&encode_inbound(&cmd)).unwrap(), cmd);
    }

    #[test]
    fn base_flag_wins_over_custom_size() {
        let wire = ContainerNotification {
            code: Some(NotificationCode::Post as i32),
            id: Some(1),
            pkg_name: Some("cmld".into()),
            is_base: true,
            title: "Update".into(),
            custom_notification_width: 10,
            custom_icon: Some("stat_sys_warning".into()),
            ..Default::default()
        };
        let msg = RelayMessage::try_from(wire).unwrap();
        assert_matches!(
            msg.body,
            RelayBody::Post { payload: Payload::Base(BasePayload { ref custom_icon, .. }), .. }
                if custom_icon.as_deref() == Some("stat_sys_warning")
        );
    }

    #[test]
    fn custom_height_alone_selects_custom_shape() {
        let wire = ContainerNotification {
            code: Some(NotificationCode::Post as i32),
            id: Some(1),
            pkg_name: Some("pkg".into()),
            custom_notification_height: 64,
            ..Default::default()
        };
        let msg = RelayMessage::try_from(wire).unwrap();
        assert_matches!(msg.body, RelayBody::Post { payload: Payload::Custom(_), .. });
    }

    #[test]
    fn missing_code_is_malformed() {
        let wire = ContainerNotification {
            id: Some(1),
            pkg_name: Some("pkg".into()),
            ..Default::default()
        };
        assert_matches!(RelayMessage::try_from(wire), Err(CodecError::Malformed(_)));
    }

    #[test]
    fn unknown_code_is_malformed() {
        let wire = ContainerNotification {
            code: Some(9),
            id: Some(1),
            pkg_name: Some("pkg".into()),
            ..Default::default()
        };
        let err = RelayMessage::try_from(wire).unwrap_err();
        assert!(err.to_string().contains("unknown notification code 9"));
    }

    #[test]
    fn missing_id_or_package_is_malformed() {
        let no_id = ContainerNotification {
            code: Some(NotificationCode::Cancel as i32),
            pkg_name: Some("pkg".into()),
            ..Default::default()
        };
        assert_matches!(RelayMessage::try_from(no_id), Err(CodecError::Malformed(_)));

        let no_pkg = ContainerNotification {
            code: Some(NotificationCode::Cancel as i32),
            id: Some(3),
            ..Default::default()
        };
        assert_matches!(RelayMessage::try_from(no_pkg), Err(CodecError::Malformed(_)));
    }

    #[test]
    fn notification_command_requires_source_and_body() {
        let wire = CmldToServiceMessage {
            code: Some(HostCode::Notification as i32),
            notification: Some(ContainerNotification::from(&standard_post())),
            ..Default::default()
        };
        assert_matches!(HostCommand::try_from(wire), Err(CodecError::Malformed(_)));

        let wire = CmldToServiceMessage {
            code: Some(HostCode::Notification as i32),
            source_id: Some("c1".into()),
            ..Default::default()
        };
        assert_matches!(HostCommand::try_from(wire), Err(CodecError::Malformed(_)));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert_matches!(decode_inbound(&[0xff, 0xff, 0xff]), Err(CodecError::Decode(_)));
    }
}
