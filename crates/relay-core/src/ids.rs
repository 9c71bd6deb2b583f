use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn from_raw(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_owned()))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(ContainerId);
string_id!(GlobalId);

impl GlobalId {
    /// Cross-container key of a logical notification: `source.package.tag`.
    ///
    /// The numeric notification id is deliberately not part of it, so a
    /// cancel and a later post under a new id still order against each other.
    pub fn compose(source: &ContainerId, package: &str, tag: Option<&str>) -> Self {
        Self(format!("{}.{}.{}", source, package, tag.unwrap_or("")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_id_joins_with_dots() {
        let source = ContainerId::from_raw("c1");
        let id = GlobalId::compose(&source, "com.example.mail", Some("inbox"));
        assert_eq!(id.as_str(), "c1.com.example.mail.inbox");
    }

    #[test]
    fn global_id_with_missing_tag_keeps_trailing_separator() {
        let source = ContainerId::from_raw("c1");
        let id = GlobalId::compose(&source, "pkg", None);
        assert_eq!(id.as_str(), "c1.pkg.");
    }

    #[test]
    fn display_and_from_str_roundtrip() {
        let id = ContainerId::from_raw("00000000-0000-0000-0000-000000000001");
        let parsed: ContainerId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn serde_is_transparent() {
        let id = ContainerId::from_raw("a0");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"a0\"");
    }
}
