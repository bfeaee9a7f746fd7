use crate::PLACEHOLDER;
use std::{borrow::Cow, fmt};

/// Message kinds carried in the tag field of a frame.
#[derive(PartialEq, Clone, Copy, Debug, Eq, Hash)]
pub enum Tag {
    List,
    Play,
    Stop,
    Data,
    Finished,
    SongList,
    Error,
    /// Synthetic "no command" produced on a receive timeout. Never encoded.
    None,
}

impl Tag {
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Tag::List => b"LIST",
            Tag::Play => b"PLAY",
            Tag::Stop => b"STOP",
            Tag::Data => b"DATA",
            Tag::Finished => b"FINI",
            Tag::SongList => b"MP3S",
            Tag::Error => b"ERRO",
            Tag::None => b"NONE",
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let tag = match bytes {
            b"LIST" => Tag::List,
            b"PLAY" => Tag::Play,
            b"STOP" => Tag::Stop,
            b"DATA" => Tag::Data,
            b"FINI" => Tag::Finished,
            b"MP3S" => Tag::SongList,
            b"ERRO" => Tag::Error,
            b"NONE" => Tag::None,
            _ => return None,
        };
        Some(tag)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.as_bytes()))
    }
}

/// One decoded frame.
#[derive(PartialEq, Clone, Debug, Eq)]
pub struct Command {
    pub kind: Tag,
    /// Song index or name, or [`PLACEHOLDER`].
    pub secondary: String,
    pub payload: Vec<u8>,
}

impl Command {
    pub fn new(kind: Tag, secondary: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            secondary: secondary.into(),
            payload: payload.into(),
        }
    }

    pub fn none() -> Self {
        Self::new(Tag::None, PLACEHOLDER, PLACEHOLDER)
    }

    pub fn list() -> Self {
        Self::new(Tag::List, PLACEHOLDER, PLACEHOLDER)
    }

    pub fn play(target: &str) -> Self {
        Self::new(Tag::Play, target, PLACEHOLDER)
    }

    pub fn stop() -> Self {
        Self::new(Tag::Stop, PLACEHOLDER, PLACEHOLDER)
    }

    pub fn data(song: &str, chunk: &[u8]) -> Self {
        Self::new(Tag::Data, song, chunk)
    }

    pub fn finished(song: &str) -> Self {
        Self::new(Tag::Finished, song, PLACEHOLDER)
    }

    pub fn song_list(listing: &str) -> Self {
        Self::new(Tag::SongList, PLACEHOLDER, listing)
    }

    pub fn error(message: &str) -> Self {
        Self::new(Tag::Error, PLACEHOLDER, message)
    }

    pub fn payload_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }
}
