use crate::{catalog::Catalog, helpers::*, types::SharedConnection};
use songcast_protocol::*;
use std::{sync::Arc, time::Duration};
use tokio::io::{AsyncRead, AsyncWrite};

/// Read commands off the socket and queue them on the connection.
///
/// Each read is bounded by `recv_timeout` so the loop notices when the
/// outbound side has given up. Ends the connection on end-of-stream or any
/// non-transient read error.
pub async fn inbound<R: AsyncRead + Unpin>(
    connection: SharedConnection,
    reader: R,
    recv_timeout: Duration,
    max_frame_len: usize,
) {
    let id = connection.id();
    let mut frames = AsyncFrameReader::new(reader, max_frame_len);

    while connection.is_connected() {
        let command = match tokio::time::timeout(recv_timeout, frames.read_frame()).await {
            Err(_elapsed) => Command::none(),
            Ok(Ok(Some(command))) => command,
            Ok(Ok(None)) => {
                tracing::info!("Client ID {id} has disconnected");
                connection.disconnect();
                break;
            }
            Ok(Err(FrameError::Io(e))) if is_transient(e.kind()) => Command::none(),
            Ok(Err(FrameError::Io(e))) => {
                tracing::info!("Client ID {id} has disconnected: {e}");
                connection.disconnect();
                break;
            }
            Ok(Err(e)) => {
                tracing::warn!(client = id, "Discarding frame: {e}");
                continue;
            }
        };

        if command.kind != Tag::None {
            tracing::debug!(client = id, "Received {} {}", command.kind, command.secondary);
        }
        connection.enqueue(command);
    }
}

/// Push chunks and command replies to the client until it disconnects.
///
/// Frames are built while holding the connection lock; the lock is released
/// before anything is written, so a slow peer never blocks `inbound`.
pub async fn outbound<W: AsyncWrite + Unpin>(
    connection: SharedConnection,
    mut writer: W,
    catalog: Arc<Catalog>,
) {
    let id = connection.id();

    loop {
        let frames = {
            let mut state = connection.lock();
            if !state.is_connected() {
                break;
            }
            state.cycle(&catalog)
        };

        if frames.is_empty() {
            connection.woken().await;
            continue;
        }

        for frame in frames {
            let bytes = match encode(&frame) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::error!(client = id, "Could not encode {} frame: {e}", frame.kind);
                    if frame.kind == Tag::Data {
                        connection.lock().pause();
                    }
                    match encode(&Command::error(&format!("cannot send {}: {e}", frame.kind))) {
                        Ok(bytes) => bytes,
                        Err(_) => continue,
                    }
                }
            };
            if let Err(e) = send_to_client(&mut writer, &bytes).await {
                tracing::warn!(client = id, "Send failed: {e}");
                connection.disconnect();
                return;
            }
        }
    }

    tracing::debug!(client = id, "Outbound handler finished");
}
