use crate::{helpers, types::*};
use colored::Colorize;
use songcast_protocol::*;
use std::{
    io::ErrorKind,
    net::TcpStream,
    sync::Arc,
    thread::{self, JoinHandle},
};

/// Something the user should see.
#[derive(PartialEq, Debug)]
pub enum Notice {
    Listing(Vec<SongEntry>),
    Error(String),
    Finished(String),
}

/// Apply one server frame to the buffer.
pub fn handle_frame(buffer: &SharedBuffer, frame: Command) -> Option<Notice> {
    match frame.kind {
        Tag::Data => {
            buffer.update(|b| b.append(&frame.secondary, &frame.payload));
            None
        }
        Tag::Finished => {
            buffer.update(|b| b.finish(&frame.secondary));
            Some(Notice::Finished(frame.secondary))
        }
        Tag::SongList => Some(Notice::Listing(parse_listing(&frame.payload_str()))),
        Tag::Error => Some(Notice::Error(frame.payload_str().into_owned())),
        other => {
            tracing::debug!("Ignoring {other} from server");
            None
        }
    }
}

pub fn server_interface(stream: TcpStream, buffer: Arc<SharedBuffer>) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut frames = FrameReader::new(stream, DEFAULT_MAX_FRAME_LEN);
        loop {
            match frames.read_frame() {
                Ok(Some(frame)) => {
                    if let Some(notice) = handle_frame(&buffer, frame) {
                        helpers::show_notice(notice);
                    }
                }
                Ok(None) => {
                    println!("{}", "Connection closed by server".red());
                    break;
                }
                Err(FrameError::Io(e)) if e.kind() == ErrorKind::Interrupted => continue,
                Err(FrameError::Io(e)) => {
                    println!("{} {}", "Connection lost:".red(), e);
                    break;
                }
                Err(e) => tracing::debug!("Discarding frame: {e}"),
            }
        }
        buffer.update(PlaybackBuffer::close);
    })
}
