use serde::{Deserialize, Serialize};

/// Identity of a notification inside its source container.
///
/// The source container is implicit on the capture side (it is always the
/// local one); the host stamps it onto the envelope on the way out.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct NotificationIdentity {
    pub package: String,
    #[serde(default)]
    pub tag: Option<String>,
    pub id: i32,
}

impl NotificationIdentity {
    pub fn new(package: impl Into<String>, tag: Option<&str>, id: i32) -> Self {
        Self {
            package: package.into(),
            tag: tag.map(str::to_owned),
            id,
        }
    }

    pub fn tag_or_empty(&self) -> &str {
        self.tag.as_deref().unwrap_or("")
    }
}

impl std::fmt::Display for NotificationIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}|{}", self.package, self.tag_or_empty(), self.id)
    }
}

/// Progress-bar fields of a notification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    #[serde(default)]
    pub max: i32,
    #[serde(default)]
    pub current: i32,
    #[serde(default)]
    pub indeterminate: bool,
}

impl Progress {
    pub fn new(max: i32, current: i32, indeterminate: bool) -> Self {
        Self {
            max,
            current,
            indeterminate,
        }
    }

    /// Whether these fields alone show a progress bar.
    pub fn shows_progress(&self) -> bool {
        self.max != 0 || self.indeterminate
    }

    /// `setProgress(0, 0, false)`: the sentinel an app posts when it is done.
    pub fn is_finished(&self) -> bool {
        self.max == 0 && self.current == 0 && !self.indeterminate
    }
}

/// Platform-neutral view of a notification's content.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationContent {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub no_clear: bool,
    #[serde(default)]
    pub ongoing: bool,
    /// Style template marker (big text, inbox, media...).
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    /// Resource id of the small icon inside the posting package.
    #[serde(default)]
    pub small_icon: Option<i32>,
    #[serde(default)]
    pub progress: Progress,
}

impl NotificationContent {
    /// Custom-rendered notifications cannot be rebuilt from title and text.
    ///
    /// Template-free custom layouts (media controls) carry no marker, so an
    /// empty title or text is taken as a custom layout too. This misfires on
    /// legitimately title-less standard notifications.
    pub fn is_custom(&self) -> bool {
        self.template.is_some()
            || self.title.as_deref().unwrap_or("").is_empty()
            || self.text.as_deref().unwrap_or("").is_empty()
    }

    /// Flags that keep the relayed copy from being swiped away.
    pub fn is_sticky(&self) -> bool {
        self.no_clear || self.ongoing
    }
}

/// A notification as observed by the platform listener.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusBarNotification {
    pub identity: NotificationIdentity,
    /// Capture-time monotonic counter in nanoseconds. Zero when unknown.
    #[serde(default)]
    pub timestamp: u64,
    #[serde(default)]
    pub content: NotificationContent,
}

impl StatusBarNotification {
    pub fn package(&self) -> &str {
        &self.identity.package
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawNotificationEvent {
    Posted(StatusBarNotification),
    Removed(StatusBarNotification),
}

/// What the listener could see when the event fired.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingSnapshot {
    /// Notifications currently visible.
    #[serde(default)]
    pub active: Vec<NotificationIdentity>,
    /// Ranking order, highest first. `None` when the platform gave none.
    #[serde(default)]
    pub ordered: Option<Vec<NotificationIdentity>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(title: Option<&str>, text: Option<&str>) -> NotificationContent {
        NotificationContent {
            title: title.map(str::to_owned),
            text: text.map(str::to_owned),
            ..Default::default()
        }
    }

    #[test]
    fn plain_title_and_text_is_standard() {
        assert!(!content(Some("Mail"), Some("2 new")).is_custom());
    }

    #[test]
    fn template_marker_is_custom() {
        let mut c = content(Some("Mail"), Some("2 new"));
        c.template = Some("android.app.Notification$BigTextStyle".into());
        assert!(c.is_custom());
    }

    #[test]
    fn missing_title_or_text_is_custom() {
        assert!(content(None, Some("x")).is_custom());
        assert!(content(Some("x"), Some("")).is_custom());
        // Known false positive: a title-less standard notification.
        assert!(content(Some(""), Some("Download complete")).is_custom());
    }

    #[test]
    fn sticky_from_either_flag() {
        let mut c = NotificationContent::default();
        assert!(!c.is_sticky());
        c.ongoing = true;
        assert!(c.is_sticky());
        c.ongoing = false;
        c.no_clear = true;
        assert!(c.is_sticky());
    }

    #[test]
    fn progress_sentinels() {
        assert!(Progress::new(0, 0, false).is_finished());
        assert!(!Progress::new(0, 0, false).shows_progress());
        assert!(Progress::new(10, 3, false).shows_progress());
        assert!(Progress::new(0, 0, true).shows_progress());
        assert!(!Progress::new(0, 1, false).is_finished());
    }

    #[test]
    fn event_serde_is_tagged() {
        let event = RawNotificationEvent::Removed(StatusBarNotification {
            identity: NotificationIdentity::new("pkg", None, 7),
            timestamp: 42,
            content: NotificationContent::default(),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "removed");
        assert_eq!(json["identity"]["id"], 7);
        let back: RawNotificationEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
