//! Length-prefixed protobuf frames over the host's Unix socket.
//!
//! The writer task drains the outbound channel in order; the reader hands
//! each decoded command to a synchronous handler in receipt order.

pub mod error;
pub mod framing;

pub use error::TransportError;
pub use framing::{connect, frame_codec, framed, split, FrameReader, FrameWriter};

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use relay_core::codec::{decode_inbound, encode_outbound};
use relay_core::{HostCommand, OutboundMessage};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Spawn the task writing outbound messages. It ends cleanly when every
/// sender is dropped and with an error when the socket fails.
pub fn spawn_writer<W>(
    mut writer: FrameWriter<W>,
    mut rx: mpsc::UnboundedReceiver<OutboundMessage>,
) -> JoinHandle<Result<(), TransportError>>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let frame = Bytes::from(encode_outbound(&msg));
            debug!(bytes = frame.len(), "writing frame");
            writer.send(frame).await?;
        }
        SinkExt::<Bytes>::close(&mut writer).await?;
        Ok::<(), TransportError>(())
    })
}

/// Read frames until the peer closes the socket.
///
/// Frames that do not decode are logged and skipped. Returns the number of
/// commands delivered to `handler`.
pub async fn run_reader<R, F>(mut reader: FrameReader<R>, mut handler: F) -> Result<u64, TransportError>
where
    R: AsyncRead + Unpin,
    F: FnMut(HostCommand),
{
    let mut delivered = 0;
    while let Some(frame) = reader.next().await {
        let frame = frame?;
        match decode_inbound(&frame) {
            Ok(cmd) => {
                delivered += 1;
                handler(cmd);
            }
            Err(e) => warn!(error = %e, bytes = frame.len(), "dropping undecodable frame"),
        }
    }
    debug!(delivered, "host closed the socket");
    Ok(delivered)
}
