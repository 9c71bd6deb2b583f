use std::path::Path;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::UnixStream;
use tokio_util::codec::{FramedRead, FramedWrite, LengthDelimitedCodec};
use tracing::info;

use crate::error::TransportError;

/// 4-byte big-endian length prefix, then the protobuf message.
pub fn frame_codec(max_frame_bytes: usize) -> LengthDelimitedCodec {
    LengthDelimitedCodec::builder()
        .length_field_length(4)
        .big_endian()
        .max_frame_length(max_frame_bytes)
        .new_codec()
}

pub type FrameReader<R = OwnedReadHalf> = FramedRead<R, LengthDelimitedCodec>;
pub type FrameWriter<W = OwnedWriteHalf> = FramedWrite<W, LengthDelimitedCodec>;

pub async fn connect(path: &Path) -> Result<UnixStream, TransportError> {
    let stream = UnixStream::connect(path)
        .await
        .map_err(|e| TransportError::Connect(path.display().to_string(), e))?;
    info!(path = %path.display(), "connected to host socket");
    Ok(stream)
}

pub fn split(stream: UnixStream, max_frame_bytes: usize) -> (FrameReader, FrameWriter) {
    let (read, write) = stream.into_split();
    framed(read, write, max_frame_bytes)
}

pub fn framed<R, W>(read: R, write: W, max_frame_bytes: usize) -> (FrameReader<R>, FrameWriter<W>)
where
    R: AsyncRead,
    W: AsyncWrite,
{
    (
        FramedRead::new(read, frame_codec(max_frame_bytes)),
        FramedWrite::new(write, frame_codec(max_frame_bytes)),
    )
}
