use serde::{Deserialize, Serialize};

use crate::bitmap::{Bitmap, Color};
use crate::ids::ContainerId;

/// Which builder produced a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStyle {
    Placeholder,
    Base,
    Standard,
    Custom,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum SmallIcon {
    #[default]
    Default,
    /// A named system drawable.
    Named(String),
}

/// Tapping the notification switches the foreground to `target_container`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnAction {
    /// Distinct per source container so concurrent notifications keep
    /// independent actions.
    pub request_code: i32,
    pub target_container: ContainerId,
}

/// A notification rebuilt for the local display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayableNotification {
    pub style: DisplayStyle,
    pub accent: Color,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dogear: Option<Bitmap>,
    pub small_icon: SmallIcon,
    pub title: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_icon: Option<Bitmap>,
    /// Full rendered content of a custom notification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Bitmap>,
    pub ongoing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_action: Option<ReturnAction>,
}

impl DisplayableNotification {
    /// Neutral notification replacing prior content before an update.
    pub fn placeholder() -> Self {
        Self {
            style: DisplayStyle::Placeholder,
            accent: Color::BLACK,
            dogear: None,
            small_icon: SmallIcon::Default,
            title: ".".into(),
            text: ".".into(),
            large_icon: None,
            content: None,
            ongoing: false,
            return_action: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.style == DisplayStyle::Placeholder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_neutral() {
        let p = DisplayableNotification::placeholder();
        assert!(p.is_placeholder());
        assert!(p.return_action.is_none());
        assert!(p.large_icon.is_none() && p.content.is_none());
        assert!(!p.ongoing);
    }

    #[test]
    fn serde_skips_absent_images() {
        let json = serde_json::to_value(DisplayableNotification::placeholder()).unwrap();
        assert_eq!(json["style"], "placeholder");
        assert_eq!(json["small_icon"]["kind"], "default");
        assert!(json.get("large_icon").is_none());
        assert!(json.get("return_action").is_none());
    }

    #[test]
    fn named_icon_serde() {
        let json = serde_json::to_value(SmallIcon::Named("stat_sys_warning".into())).unwrap();
        assert_eq!(json["kind"], "named");
        assert_eq!(json["name"], "stat_sys_warning");
    }
}
