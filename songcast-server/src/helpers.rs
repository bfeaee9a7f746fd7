use std::io::{self, ErrorKind};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Errors that say "try again" rather than "the peer is gone".
pub fn is_transient(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::WouldBlock | ErrorKind::Interrupted | ErrorKind::TimedOut
    )
}

/// Write a whole encoded frame, retrying transient failures from where the
/// last write stopped. Only a terminal error gives up on the frame.
pub async fn send_to_client<W: AsyncWrite + Unpin>(writer: &mut W, frame: &[u8]) -> io::Result<()> {
    let mut written = 0;
    while written < frame.len() {
        match writer.write(&frame[written..]).await {
            Ok(0) => return Err(ErrorKind::WriteZero.into()),
            Ok(n) => written += n,
            Err(e) if is_transient(e.kind()) => {
                tracing::debug!("Retrying send after {e}");
                tokio::task::yield_now().await;
            }
            Err(e) => return Err(e),
        }
    }
    loop {
        match writer.flush().await {
            Err(e) if is_transient(e.kind()) => tokio::task::yield_now().await,
            other => return other,
        }
    }
}
