use std::sync::Arc;

use relay_core::{
    CustomPayload, Payload, PlatformResources, RawNotificationEvent, RelayMessage,
    StandardPayload, StatusBarNotification,
};
use tracing::debug;

use crate::state::RelayState;

/// What became of a captured event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Projection {
    Forward(RelayMessage),
    /// Custom layout while custom relaying is switched off.
    DroppedCustom,
    /// Intermediate step of a progress bar already relayed.
    DuplicateProgress,
}

/// Turns captured notification events into relay messages.
pub struct Projector {
    state: Arc<RelayState>,
    resources: Arc<dyn PlatformResources>,
    custom_notifications: bool,
}

impl Projector {
    pub fn new(
        state: Arc<RelayState>,
        resources: Arc<dyn PlatformResources>,
        custom_notifications: bool,
    ) -> Self {
        Self {
            state,
            resources,
            custom_notifications,
        }
    }

    pub fn project(&self, event: &RawNotificationEvent) -> Option<RelayMessage> {
        match self.classify(event) {
            Projection::Forward(msg) => Some(msg),
            Projection::DroppedCustom | Projection::DuplicateProgress => None,
        }
    }

    pub fn classify(&self, event: &RawNotificationEvent) -> Projection {
        match event {
            RawNotificationEvent::Removed(sbn) => {
                let _ = self.state.progress.forget(&sbn.identity);
                Projection::Forward(RelayMessage::cancel(sbn.identity.clone(), sbn.timestamp))
            }
            RawNotificationEvent::Posted(sbn) => self.classify_post(sbn),
        }
    }

    fn classify_post(&self, sbn: &StatusBarNotification) -> Projection {
        let content = &sbn.content;
        let no_clear = content.is_sticky();

        if content.is_custom() {
            if !self.custom_notifications {
                debug!(package = %sbn.package(), id = sbn.identity.id, "custom notification relaying disabled");
                return Projection::DroppedCustom;
            }
            return Projection::Forward(RelayMessage::post(
                sbn.identity.clone(),
                sbn.timestamp,
                no_clear,
                Payload::Custom(self.render(sbn)),
            ));
        }

        if self
            .state
            .progress
            .is_progress_update_only(&sbn.identity, &content.progress)
        {
            debug!(identity = %sbn.identity, "progress update suppressed");
            return Projection::DuplicateProgress;
        }

        Projection::Forward(RelayMessage::post(
            sbn.identity.clone(),
            sbn.timestamp,
            no_clear,
            Payload::Standard(self.standard(sbn)),
        ))
    }

    fn render(&self, sbn: &StatusBarNotification) -> CustomPayload {
        match self.resources.render_content(sbn) {
            Some(bitmap) => CustomPayload {
                width: bitmap.width,
                height: bitmap.height,
                rendered: bitmap.pixels,
            },
            None => {
                debug!(package = %sbn.package(), "content render failed, sending empty payload");
                CustomPayload::default()
            }
        }
    }

    fn standard(&self, sbn: &StatusBarNotification) -> StandardPayload {
        let content = &sbn.content;
        let icon = content
            .small_icon
            .and_then(|icon_id| self.resources.resolve_icon(sbn.package(), icon_id));
        if icon.is_none() {
            debug!(package = %sbn.package(), icon_id = ?content.small_icon, "small icon unavailable");
        }

        let mut payload = StandardPayload {
            title: content.title.clone().unwrap_or_default(),
            text: content.text.clone().unwrap_or_default(),
            ..Default::default()
        };
        if let Some(icon) = icon {
            payload.icon_width = icon.width;
            payload.icon_height = icon.height;
            payload.icon = icon.pixels;
        }
        payload
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use relay_core::{Bitmap, NotificationContent, NotificationIdentity, Progress, RelayBody};
    use std::collections::HashMap;

    /// Icons by `(package, id)`; content renders to a fixed 2x1 bitmap.
    #[derive(Default)]
    pub(crate) struct FakeResources {
        pub icons: HashMap<(String, i32), Bitmap>,
        pub render_fails: bool,
    }

    impl FakeResources {
        pub fn with_icon(package: &str, icon_id: i32, bitmap: Bitmap) -> Self {
            let mut icons = HashMap::new();
            icons.insert((package.to_string(), icon_id), bitmap);
            Self {
                icons,
                render_fails: false,
            }
        }
    }

    impl PlatformResources for FakeResources {
        fn resolve_icon(&self, package: &str, icon_id: i32) -> Option<Bitmap> {
            self.icons.get(&(package.to_string(), icon_id)).cloned()
        }

        fn render_content(&self, _sbn: &StatusBarNotification) -> Option<Bitmap> {
            if self.render_fails {
                return None;
            }
            Bitmap::from_raw(2, 1, vec![9; 8]).ok()
        }
    }

    pub(crate) fn posted(package: &str, id: i32, timestamp: u64, content: NotificationContent) -> RawNotificationEvent {
        RawNotificationEvent::Posted(StatusBarNotification {
            identity: NotificationIdentity::new(package, Some("tag"), id),
            timestamp,
            content,
        })
    }

    pub(crate) fn titled(title: &str, text: &str) -> NotificationContent {
        NotificationContent {
            title: Some(title.into()),
            text: Some(text.into()),
            small_icon: Some(7),
            ..Default::default()
        }
    }

    fn projector(resources: FakeResources, custom: bool) -> Projector {
        Projector::new(Arc::new(RelayState::default()), Arc::new(resources), custom)
    }

    fn icon_4x4() -> Bitmap {
        Bitmap::from_raw(4, 4, (0..64).collect()).unwrap()
    }

    #[test]
    fn standard_post_carries_title_text_and_icon() {
        let p = projector(FakeResources::with_icon("pkg", 7, icon_4x4()), false);
        let msg = p.project(&posted("pkg", 1, 5, titled("T", "X"))).unwrap();
        assert_eq!(msg.timestamp, 5);
        assert_matches!(
            msg.body,
            RelayBody::Post { no_clear: false, payload: Payload::Standard(ref s) }
                if s.title == "T" && s.text == "X" && s.icon_width == 4 && s.icon_height == 4
                    && s.icon == (0..64).collect::<Vec<u8>>()
        );
    }

    #[test]
    fn missing_icon_degrades_to_empty_fields() {
        let p = projector(FakeResources::default(), false);
        let msg = p.project(&posted("pkg", 1, 5, titled("T", "X"))).unwrap();
        assert_matches!(
            msg.body,
            RelayBody::Post { payload: Payload::Standard(ref s), .. }
                if s.icon.is_empty() && s.icon_width == 0 && !s.has_icon()
        );
    }

    #[test]
    fn sticky_flags_set_no_clear() {
        let p = projector(FakeResources::default(), false);
        let mut content = titled("T", "X");
        content.ongoing = true;
        let msg = p.project(&posted("pkg", 1, 5, content)).unwrap();
        assert_matches!(msg.body, RelayBody::Post { no_clear: true, .. });
    }

    #[test]
    fn custom_gate() {
        let mut media = titled("", "");
        media.template = Some("android.app.Notification$MediaStyle".into());

        let off = projector(FakeResources::default(), false);
        assert_eq!(off.classify(&posted("pkg", 1, 5, media.clone())), Projection::DroppedCustom);

        let on = projector(FakeResources::default(), true);
        let msg = on.project(&posted("pkg", 1, 5, media)).unwrap();
        assert_matches!(
            msg.body,
            RelayBody::Post { payload: Payload::Custom(CustomPayload { width: 2, height: 1, .. }), .. }
        );
    }

    #[test]
    fn titleless_standard_is_treated_as_custom() {
        let p = projector(FakeResources::default(), false);
        let event = posted("pkg", 1, 5, titled("", "Download complete"));
        assert_eq!(p.classify(&event), Projection::DroppedCustom);
    }

    #[test]
    fn failed_render_sends_empty_custom_payload() {
        let resources = FakeResources {
            render_fails: true,
            ..Default::default()
        };
        let p = projector(resources, true);
        let msg = p.project(&posted("pkg", 1, 5, titled("", ""))).unwrap();
        assert_matches!(
            msg.body,
            RelayBody::Post { payload: Payload::Custom(ref c), .. } if *c == CustomPayload::default()
        );
    }

    #[test]
    fn progress_series_is_deduplicated() {
        let p = projector(FakeResources::default(), false);
        let step = |ts, max, cur| {
            let mut c = titled("Downloading", "file.zip");
            c.progress = Progress::new(max, cur, false);
            p.classify(&posted("pkg", 1, ts, c))
        };
        assert_matches!(step(1, 10, 1), Projection::Forward(_));
        assert_eq!(step(2, 10, 2), Projection::DuplicateProgress);
        assert_eq!(step(3, 10, 9), Projection::DuplicateProgress);
        assert_matches!(step(4, 0, 0), Projection::Forward(_));
        assert!(p.state.progress.is_empty());
    }

    #[test]
    fn removal_cancels_and_ends_progress() {
        let p = projector(FakeResources::default(), false);
        let mut c = titled("Downloading", "file.zip");
        c.progress = Progress::new(10, 1, false);
        p.project(&posted("pkg", 1, 1, c.clone()));
        assert_eq!(p.state.progress.len(), 1);

        let RawNotificationEvent::Posted(sbn) = posted("pkg", 1, 2, c) else {
            unreachable!()
        };
        let msg = p.project(&RawNotificationEvent::Removed(sbn)).unwrap();
        assert!(msg.is_cancel());
        assert_eq!(msg.timestamp, 2);
        assert!(p.state.progress.is_empty());
    }

    #[test]
    fn custom_posts_never_touch_progress_tracking() {
        let p = projector(FakeResources::default(), true);
        let mut c = titled("", "");
        c.progress = Progress::new(10, 1, false);
        p.project(&posted("pkg", 1, 1, c));
        assert!(p.state.progress.is_empty());
    }
}
