//! Stand-in platform for running the relay outside the device image.
//!
//! Capture events, icons and rendered views arrive as JSON lines; rebuilt
//! notifications are written to stdout as JSON lines.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use relay_core::{
    Bitmap, ContainerId, DeviceControl, DisplayableNotification, GlobalId, NotificationSink,
    PlatformResources, RankingSnapshot, RelayError, StatusBarNotification,
};
use relay_engine::{ActionReceiver, NotificationListener};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::Notify;
use tracing::{info, warn};

/// One line of capture input.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShimInput {
    RegisterIcon {
        package: String,
        icon_id: i32,
        bitmap: Bitmap,
    },
    /// Rendered content view for a notification.
    RegisterRender {
        package: String,
        id: i32,
        bitmap: Bitmap,
    },
    Posted {
        notification: StatusBarNotification,
        #[serde(default)]
        ranking: RankingSnapshot,
    },
    Removed {
        notification: StatusBarNotification,
    },
    /// The user asked to switch containers.
    Switch {
        #[serde(default)]
        target: Option<ContainerId>,
    },
}

#[derive(Debug, Default)]
pub struct ShimResources {
    icons: RwLock<HashMap<(String, i32), Bitmap>>,
    renders: RwLock<HashMap<(String, i32), Bitmap>>,
}

impl PlatformResources for ShimResources {
    fn resolve_icon(&self, package: &str, icon_id: i32) -> Option<Bitmap> {
        self.icons.read().get(&(package.to_string(), icon_id)).cloned()
    }

    fn render_content(&self, sbn: &StatusBarNotification) -> Option<Bitmap> {
        let key = (sbn.identity.package.clone(), sbn.identity.id);
        self.renders.read().get(&key).cloned()
    }
}

/// Feeds capture input into the listener.
pub struct CaptureShim {
    listener: NotificationListener,
    actions: Arc<ActionReceiver>,
    resources: Arc<ShimResources>,
    started: Instant,
}

impl CaptureShim {
    pub fn new(
        listener: NotificationListener,
        actions: Arc<ActionReceiver>,
        resources: Arc<ShimResources>,
    ) -> Self {
        Self {
            listener,
            actions,
            resources,
            started: Instant::now(),
        }
    }

    pub fn apply(&self, input: ShimInput) -> Result<(), RelayError> {
        match input {
            ShimInput::RegisterIcon {
                package,
                icon_id,
                bitmap,
            } => {
                let _ = self.resources.icons.write().insert((package, icon_id), bitmap);
            }
            ShimInput::RegisterRender {
                package,
                id,
                bitmap,
            } => {
                let _ = self.resources.renders.write().insert((package, id), bitmap);
            }
            ShimInput::Posted {
                notification,
                ranking,
            } => {
                let _ = self.listener.on_posted(self.stamp(notification), &ranking)?;
            }
            ShimInput::Removed { notification } => {
                let _ = self.listener.on_removed(self.stamp(notification))?;
            }
            ShimInput::Switch { target } => self.actions.switch_container(target.as_ref())?,
        }
        Ok(())
    }

    /// Events without a capture time get one from the process clock.
    fn stamp(&self, mut sbn: StatusBarNotification) -> StatusBarNotification {
        if sbn.timestamp == 0 {
            sbn.timestamp = u64::try_from(self.started.elapsed().as_nanos())
                .unwrap_or(u64::MAX)
                .max(1);
        }
        sbn
    }

    /// Read JSON lines from `path` (`-` for stdin) until EOF.
    pub async fn run(self, path: &Path) -> anyhow::Result<()> {
        let input: Box<dyn AsyncRead + Unpin + Send> = if path == Path::new("-") {
            Box::new(tokio::io::stdin())
        } else {
            Box::new(tokio::fs::File::open(path).await?)
        };
        let mut lines = BufReader::new(input).lines();
        let mut line_no = 0u64;
        while let Some(line) = lines.next_line().await? {
            line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ShimInput>(&line) {
                Ok(input) => self.apply(input)?,
                Err(e) => warn!(line = line_no, error = %e, "skipping malformed capture input"),
            }
        }
        info!(lines = line_no, "capture input exhausted");
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum DisplayRecord<'a> {
    Notify {
        global_id: &'a GlobalId,
        id: i32,
        notification: &'a DisplayableNotification,
    },
    Cancel {
        global_id: &'a GlobalId,
        id: i32,
    },
}

/// Writes display operations to stdout, one JSON object per line.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl StdoutSink {
    fn emit(&self, record: &DisplayRecord<'_>) -> Result<(), RelayError> {
        let line =
            serde_json::to_string(record).map_err(|e| RelayError::Platform(e.to_string()))?;
        let mut out = std::io::stdout().lock();
        writeln!(out, "{line}").map_err(|e| RelayError::Platform(e.to_string()))
    }
}

impl NotificationSink for StdoutSink {
    fn notify(
        &self,
        global_id: &GlobalId,
        id: i32,
        notification: &DisplayableNotification,
    ) -> Result<(), RelayError> {
        self.emit(&DisplayRecord::Notify {
            global_id,
            id,
            notification,
        })
    }

    fn cancel(&self, global_id: &GlobalId, id: i32) -> Result<(), RelayError> {
        self.emit(&DisplayRecord::Cancel { global_id, id })
    }
}

/// Logs power and radio requests; shutdown wakes the main loop.
#[derive(Debug)]
pub struct LoggingDevice {
    shutdown: Arc<Notify>,
}

impl LoggingDevice {
    pub fn new(shutdown: Arc<Notify>) -> Self {
        Self { shutdown }
    }
}

impl DeviceControl for LoggingDevice {
    fn suspend(&self) -> Result<(), RelayError> {
        info!("host requested suspend");
        Ok(())
    }

    fn resume(&self) -> Result<(), RelayError> {
        info!("host requested resume");
        Ok(())
    }

    fn shutdown(&self) -> Result<(), RelayError> {
        info!("host requested shutdown");
        self.shutdown.notify_one();
        Ok(())
    }

    fn set_airplane_mode(&self, enabled: bool) -> Result<(), RelayError> {
        info!(enabled, "airplane mode");
        Ok(())
    }

    fn set_wifi_enabled(&self, enabled: bool) -> Result<(), RelayError> {
        info!(enabled, "wifi");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use relay_core::{OutboundMessage, Payload, RelayBody};
    use relay_engine::{CaptureFilters, Projector, RelayState};
    use relay_settings::RelaySettings;
    use tokio::sync::mpsc;

    fn shim() -> (CaptureShim, mpsc::UnboundedReceiver<OutboundMessage>) {
        let settings = RelaySettings::default();
        let state = Arc::new(RelayState::default());
        let resources = Arc::new(ShimResources::default());
        let (tx, rx) = mpsc::unbounded_channel();
        let sink: Arc<dyn relay_core::MessageSink> = Arc::new(tx);
        let projector = Projector::new(state.clone(), resources.clone(), false);
        let listener = NotificationListener::new(
            CaptureFilters::from(&settings),
            projector,
            sink.clone(),
            state,
        );
        let actions = Arc::new(ActionReceiver::new(
            sink,
            ContainerId::from_raw(settings.default_container),
        ));
        (CaptureShim::new(listener, actions, resources), rx)
    }

    fn parse(line: &str) -> ShimInput {
        serde_json::from_str(line).unwrap()
    }

    #[test]
    fn registered_icon_is_attached() {
        let (shim, mut rx) = shim();
        shim.apply(parse(
            r#"{"type":"register_icon","package":"com.example.chat","icon_id":7,
                "bitmap":{"width":1,"height":1,"pixels":"AQIDBA=="}}"#,
        ))
        .unwrap();
        shim.apply(parse(
            r#"{"type":"posted","notification":{"identity":{"package":"com.example.chat","id":1},
                "timestamp":5,"content":{"title":"Hi","text":"there","small_icon":7}}}"#,
        ))
        .unwrap();

        let Ok(OutboundMessage::Notification(msg)) = rx.try_recv() else {
            panic!("expected a relayed notification");
        };
        assert_matches!(
            msg.body,
            RelayBody::Post { payload: Payload::Standard(ref s), .. } if s.icon == vec![1, 2, 3, 4]
        );
    }

    #[test]
    fn missing_timestamp_is_stamped() {
        let (shim, mut rx) = shim();
        shim.apply(parse(
            r#"{"type":"removed","notification":{"identity":{"package":"com.example.chat","id":1}}}"#,
        ))
        .unwrap();
        let Ok(OutboundMessage::Notification(msg)) = rx.try_recv() else {
            panic!("expected a cancel");
        };
        assert!(msg.is_cancel());
        assert!(msg.timestamp > 0);
    }

    #[test]
    fn switch_without_target_goes_to_default() {
        let (shim, mut rx) = shim();
        shim.apply(parse(r#"{"type":"switch"}"#)).unwrap();
        assert_eq!(
            rx.try_recv().unwrap(),
            OutboundMessage::SwitchContainer(ContainerId::from_raw(
                "00000000-0000-0000-0000-000000000000"
            ))
        );
    }

    #[test]
    fn render_lookup_uses_package_and_id() {
        let resources = ShimResources::default();
        let bitmap = Bitmap::from_raw(1, 1, vec![0; 4]).unwrap();
        resources
            .renders
            .write()
            .insert(("pkg".into(), 3), bitmap.clone());
        let sbn = StatusBarNotification {
            identity: relay_core::NotificationIdentity::new("pkg", None, 3),
            timestamp: 1,
            content: Default::default(),
        };
        assert_eq!(resources.render_content(&sbn), Some(bitmap));
    }
}
