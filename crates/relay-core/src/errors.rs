/// Failures turning bytes into messages.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("protobuf decode failed: {0}")]
    Decode(#[from] prost::DecodeError),

    /// Bytes parsed but a mandatory field is missing or out of range.
    #[error("malformed message: {0}")]
    Malformed(String),
}

impl CodecError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

/// Failures rebuilding a displayable notification.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("standard notification has no usable icon")]
    MissingIcon,

    #[error("bitmap of {width}x{height} cannot hold {len} bytes")]
    InvalidBitmap { width: u32, height: u32, len: usize },

    #[error("invalid accent color: {0}")]
    InvalidColor(String),

    #[error("cancel messages carry no content")]
    NotAPost,
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("build error: {0}")]
    Build(#[from] BuildError),

    /// Message was well-formed but cannot be applied.
    #[error("rejected: {0}")]
    Rejected(String),

    #[error("platform error: {0}")]
    Platform(String),

    #[error("outbound channel closed")]
    ChannelClosed,
}

impl RelayError {
    /// Short classification string for logging/metrics.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Codec(CodecError::Decode(_)) => "decode",
            Self::Codec(CodecError::Malformed(_)) => "malformed",
            Self::Build(_) => "build",
            Self::Rejected(_) => "rejected",
            Self::Platform(_) => "platform",
            Self::ChannelClosed => "channel_closed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_display() {
        let err = CodecError::malformed("missing notification id");
        assert_eq!(err.to_string(), "malformed message: missing notification id");
    }

    #[test]
    fn build_error_display() {
        let err = BuildError::InvalidBitmap {
            width: 4,
            height: 4,
            len: 3,
        };
        assert_eq!(err.to_string(), "bitmap of 4x4 cannot hold 3 bytes");
    }

    #[test]
    fn relay_error_from_conversions() {
        let err: RelayError = CodecError::malformed("x").into();
        assert_eq!(err.error_kind(), "malformed");
        let err: RelayError = BuildError::MissingIcon.into();
        assert_eq!(err.error_kind(), "build");
        assert_eq!(RelayError::ChannelClosed.error_kind(), "channel_closed");
    }
}
