use crate::{Command, FrameError, LENGTH_PREFIX_LEN, SEND_BUFFER, decode_body, encode, parse_length};
use std::io::{Read, Write};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Bytes received but not yet split into frames.
///
/// Partial frames stay buffered across reads, so a read that times out or is
/// cancelled never loses alignment with the stream.
#[derive(Debug)]
pub struct FrameBuffer {
    buf: Vec<u8>,
    max_len: usize,
}

impl FrameBuffer {
    pub fn new(max_len: usize) -> Self {
        Self {
            buf: Vec::with_capacity(SEND_BUFFER),
            max_len,
        }
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Take the next complete frame, if one has fully arrived.
    pub fn next_frame(&mut self) -> Option<Result<Command, FrameError>> {
        if self.buf.len() < LENGTH_PREFIX_LEN {
            return None;
        }
        let len = match parse_length(&self.buf[..LENGTH_PREFIX_LEN]) {
            Ok(len) if len <= self.max_len => len,
            Ok(len) => {
                self.buf.clear();
                return Some(Err(FrameError::Malformed(format!(
                    "declared length {len} exceeds limit {}",
                    self.max_len
                ))));
            }
            Err(e) => {
                // No way to find the next frame boundary after a bad prefix.
                self.buf.clear();
                return Some(Err(e));
            }
        };
        if self.buf.len() < LENGTH_PREFIX_LEN + len {
            return None;
        }
        let frame: Vec<u8> = self.buf.drain(..LENGTH_PREFIX_LEN + len).collect();
        Some(decode_body(&frame[LENGTH_PREFIX_LEN..]))
    }

    fn end_of_stream(&self) -> Result<Option<Command>, FrameError> {
        if self.buf.is_empty() {
            Ok(None)
        } else {
            Err(FrameError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("stream ended inside a frame ({} bytes pending)", self.buf.len()),
            )))
        }
    }
}

/// Blocking frame reader.
pub struct FrameReader<R> {
    inner: R,
    frames: FrameBuffer,
}

impl<R: Read> FrameReader<R> {
    pub fn new(inner: R, max_len: usize) -> Self {
        Self {
            inner,
            frames: FrameBuffer::new(max_len),
        }
    }

    /// Read the next frame. `Ok(None)` means the peer closed the stream cleanly.
    pub fn read_frame(&mut self) -> Result<Option<Command>, FrameError> {
        let mut chunk = [0u8; SEND_BUFFER];
        loop {
            if let Some(frame) = self.frames.next_frame() {
                return frame.map(Some);
            }
            let n = self.inner.read(&mut chunk)?;
            if n == 0 {
                return self.frames.end_of_stream();
            }
            self.frames.push(&chunk[..n]);
        }
    }
}

/// Async counterpart of [`FrameReader`]. `read_frame` is cancel safe.
pub struct AsyncFrameReader<R> {
    inner: R,
    frames: FrameBuffer,
}

impl<R: AsyncRead + Unpin> AsyncFrameReader<R> {
    pub fn new(inner: R, max_len: usize) -> Self {
        Self {
            inner,
            frames: FrameBuffer::new(max_len),
        }
    }

    pub async fn read_frame(&mut self) -> Result<Option<Command>, FrameError> {
        let mut chunk = [0u8; SEND_BUFFER];
        loop {
            if let Some(frame) = self.frames.next_frame() {
                return frame.map(Some);
            }
            let n = self.inner.read(&mut chunk).await?;
            if n == 0 {
                return self.frames.end_of_stream();
            }
            self.frames.push(&chunk[..n]);
        }
    }
}

pub fn write_frame<W: Write>(writer: &mut W, command: &Command) -> Result<(), FrameError> {
    let frame = encode(command)?;
    writer.write_all(&frame)?;
    writer.flush()?;
    Ok(())
}

pub async fn write_frame_async<W: AsyncWrite + Unpin>(
    writer: &mut W,
    command: &Command,
) -> Result<(), FrameError> {
    let frame = encode(command)?;
    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_MAX_FRAME_LEN, Tag};
    use std::io::Cursor;

    fn frames_of(commands: &[Command]) -> Vec<u8> {
        commands
            .iter()
            .flat_map(|c| encode(c).unwrap())
            .collect::<Vec<u8>>()
    }

    #[test]
    fn test_reads_back_to_back_frames() {
        let commands = vec![
            Command::data("a.mp3", &[7; 5000]),
            Command::finished("a.mp3"),
            Command::list(),
        ];
        let mut reader = FrameReader::new(Cursor::new(frames_of(&commands)), DEFAULT_MAX_FRAME_LEN);

        for expected in &commands {
            assert_eq!(reader.read_frame().unwrap().as_ref(), Some(expected));
        }
        assert!(reader.read_frame().unwrap().is_none());
    }

    #[test]
    fn test_malformed_frame_is_skipped() {
        let mut bytes = b"0000000007BAD%%%%".to_vec();
        bytes.extend(frames_of(&[Command::stop()]));
        let mut reader = FrameReader::new(Cursor::new(bytes), DEFAULT_MAX_FRAME_LEN);

        assert!(reader.read_frame().unwrap_err().is_malformed());
        assert_eq!(reader.read_frame().unwrap(), Some(Command::stop()));
    }

    #[test]
    fn test_truncated_frame_is_io_error() {
        let mut bytes = frames_of(&[Command::play("1")]);
        bytes.truncate(bytes.len() - 2);
        let mut reader = FrameReader::new(Cursor::new(bytes), DEFAULT_MAX_FRAME_LEN);

        match reader.read_frame() {
            Err(FrameError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
            other => panic!("expected eof error, got {other:?}"),
        }
    }

    #[test]
    fn test_oversized_length_rejected() {
        let mut reader = FrameReader::new(Cursor::new(b"9999999999DATA".to_vec()), 1024);
        assert!(reader.read_frame().unwrap_err().is_malformed());
    }

    #[test]
    fn test_frame_split_across_pushes() {
        let bytes = frames_of(&[Command::error("nope")]);
        let mut frames = FrameBuffer::new(DEFAULT_MAX_FRAME_LEN);

        frames.push(&bytes[..4]);
        assert!(frames.next_frame().is_none());
        frames.push(&bytes[4..12]);
        assert!(frames.next_frame().is_none());
        frames.push(&bytes[12..]);
        let command = frames.next_frame().unwrap().unwrap();
        assert_eq!(command.kind, Tag::Error);
        assert_eq!(command.payload_str(), "nope");
        assert!(frames.is_empty());
    }

    #[test]
    fn test_write_frame_blocking() {
        let mut out = Vec::new();
        write_frame(&mut out, &Command::play("0")).unwrap();
        assert_eq!(out, b"0000000016PLAY%%%%%0%%%%%_".to_vec());
    }

    #[tokio::test]
    async fn test_async_round_trip_over_duplex() {
        let (mut client, server) = tokio::io::duplex(8192);
        let mut reader = AsyncFrameReader::new(server, DEFAULT_MAX_FRAME_LEN);

        write_frame_async(&mut client, &Command::data("s.mp3", &[1; 3000]))
            .await
            .unwrap();
        write_frame_async(&mut client, &Command::stop()).await.unwrap();
        drop(client);

        let first = reader.read_frame().await.unwrap().unwrap();
        assert_eq!(first.kind, Tag::Data);
        assert_eq!(first.payload.len(), 3000);
        assert_eq!(reader.read_frame().await.unwrap(), Some(Command::stop()));
        assert!(reader.read_frame().await.unwrap().is_none());
    }
}
