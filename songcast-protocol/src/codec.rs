use crate::{Command, LENGTH_PREFIX_LEN, SEPARATOR, Tag};
use thiserror::Error;

/// Largest body length the 10-digit prefix can express.
pub const MAX_BODY_LEN: u64 = 9_999_999_999;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("malformed frame: {0}")]
    Malformed(String),

    #[error("frame body of {0} bytes does not fit the length prefix")]
    LengthOverflow(usize),

    #[error("NONE is internal and cannot be sent")]
    UnencodableTag,

    #[error("secondary field would collide with the separator")]
    SeparatorInSecondary,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FrameError {
    /// True for errors that leave the stream aligned on a frame boundary.
    pub fn is_malformed(&self) -> bool {
        matches!(self, FrameError::Malformed(_))
    }
}

pub fn encode(command: &Command) -> Result<Vec<u8>, FrameError> {
    encode_parts(command.kind, &command.secondary, &command.payload)
}

/// Build a complete frame, prefix included.
pub fn encode_parts(kind: Tag, secondary: &str, payload: &[u8]) -> Result<Vec<u8>, FrameError> {
    if kind == Tag::None {
        return Err(FrameError::UnencodableTag);
    }
    // A trailing '%' would let the separator match one byte early on decode.
    if find(secondary.as_bytes(), SEPARATOR).is_some() || secondary.ends_with('%') {
        return Err(FrameError::SeparatorInSecondary);
    }

    let tag = kind.as_bytes();
    let body_len = tag.len() + 2 * SEPARATOR.len() + secondary.len() + payload.len();
    if body_len as u64 > MAX_BODY_LEN {
        return Err(FrameError::LengthOverflow(body_len));
    }

    let mut frame = Vec::with_capacity(LENGTH_PREFIX_LEN + body_len);
    frame.extend_from_slice(format!("{body_len:010}").as_bytes());
    frame.extend_from_slice(tag);
    frame.extend_from_slice(SEPARATOR);
    frame.extend_from_slice(secondary.as_bytes());
    frame.extend_from_slice(SEPARATOR);
    frame.extend_from_slice(payload);
    Ok(frame)
}

/// Decode a complete frame, prefix included.
pub fn decode(frame: &[u8]) -> Result<Command, FrameError> {
    if frame.len() < LENGTH_PREFIX_LEN {
        return Err(FrameError::Malformed(format!(
            "{} bytes is shorter than the length prefix",
            frame.len()
        )));
    }
    let (prefix, body) = frame.split_at(LENGTH_PREFIX_LEN);
    let declared = parse_length(prefix)?;
    if declared != body.len() {
        return Err(FrameError::Malformed(format!(
            "declared {declared} bytes, got {}",
            body.len()
        )));
    }
    decode_body(body)
}

pub fn parse_length(prefix: &[u8]) -> Result<usize, FrameError> {
    if prefix.len() != LENGTH_PREFIX_LEN || !prefix.iter().all(u8::is_ascii_digit) {
        return Err(FrameError::Malformed(format!(
            "bad length prefix {:?}",
            String::from_utf8_lossy(prefix)
        )));
    }
    let len = prefix
        .iter()
        .fold(0u64, |acc, digit| acc * 10 + u64::from(digit - b'0'));
    usize::try_from(len).map_err(|_| FrameError::Malformed(format!("length {len} too large")))
}

/// Split a frame body into tag, secondary and payload.
///
/// Only the first two separators count; anything after them is payload.
pub fn decode_body(body: &[u8]) -> Result<Command, FrameError> {
    let (tag, rest) = split_once(body)
        .ok_or_else(|| FrameError::Malformed("expected three fields, found one".into()))?;
    let (secondary, payload) = split_once(rest)
        .ok_or_else(|| FrameError::Malformed("expected three fields, found two".into()))?;

    let kind = Tag::from_bytes(tag).ok_or_else(|| {
        FrameError::Malformed(format!("unknown tag {:?}", String::from_utf8_lossy(tag)))
    })?;
    let secondary = std::str::from_utf8(secondary)
        .map_err(|_| FrameError::Malformed("secondary field is not UTF-8".into()))?;

    Ok(Command::new(kind, secondary, payload))
}

fn split_once(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let at = find(bytes, SEPARATOR)?;
    Some((&bytes[..at], &bytes[at + SEPARATOR.len()..]))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PLACEHOLDER;

    #[test]
    fn test_encode_matches_wire_layout() {
        let frame = encode(&Command::list()).unwrap();
        assert_eq!(frame, b"0000000016LIST%%%%%_%%%%%_".to_vec());
    }

    #[test]
    fn test_round_trip_each_tag() {
        let commands = vec![
            Command::list(),
            Command::play("3"),
            Command::stop(),
            Command::data("song.mp3", &[0, 1, 2, 255]),
            Command::finished("song.mp3"),
            Command::song_list("0: a.mp3\n1: b.mp3"),
            Command::error("invalid song"),
        ];
        for command in commands {
            let frame = encode(&command).unwrap();
            assert_eq!(decode(&frame).unwrap(), command);
        }
    }

    #[test]
    fn test_payload_containing_separator_survives() {
        let mut chunk = b"ID3".to_vec();
        chunk.extend_from_slice(SEPARATOR);
        chunk.extend_from_slice(b"%%%%%%%%tail");
        let command = Command::data("track.mp3", &chunk);

        let decoded = decode(&encode(&command).unwrap()).unwrap();
        assert_eq!(decoded.payload, chunk);
        assert_eq!(decoded.secondary, "track.mp3");
    }

    #[test]
    fn test_empty_payload_round_trips() {
        let command = Command::new(Tag::Data, "x.mp3", Vec::new());
        assert_eq!(decode(&encode(&command).unwrap()).unwrap(), command);
    }

    #[test]
    fn test_none_is_not_encodable() {
        assert!(matches!(
            encode(&Command::none()),
            Err(FrameError::UnencodableTag)
        ));
    }

    #[test]
    fn test_secondary_with_separator_rejected() {
        assert!(matches!(
            encode_parts(Tag::Play, "a%%%%%b", PLACEHOLDER.as_bytes()),
            Err(FrameError::SeparatorInSecondary)
        ));
        assert!(matches!(
            encode_parts(Tag::Play, "50%", PLACEHOLDER.as_bytes()),
            Err(FrameError::SeparatorInSecondary)
        ));
    }

    #[test]
    fn test_secondary_with_inner_percent_is_fine() {
        let command = Command::data("100% pure.mp3", b"abc");
        assert_eq!(decode(&encode(&command).unwrap()).unwrap(), command);
    }

    #[test]
    fn test_two_fields_is_malformed() {
        let err = decode_body(b"LIST%%%%%_").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_one_field_is_malformed() {
        assert!(decode_body(b"garbage").unwrap_err().is_malformed());
    }

    #[test]
    fn test_unknown_tag_is_malformed() {
        assert!(decode_body(b"PLAZ%%%%%_%%%%%_").unwrap_err().is_malformed());
    }

    #[test]
    fn test_length_mismatch_is_malformed() {
        let mut frame = encode(&Command::stop()).unwrap();
        frame.pop();
        assert!(decode(&frame).unwrap_err().is_malformed());
    }

    #[test]
    fn test_non_digit_prefix_is_malformed() {
        assert!(parse_length(b"00000001x6").unwrap_err().is_malformed());
        assert!(parse_length(b"123").unwrap_err().is_malformed());
    }

    #[test]
    fn test_parse_length_reads_decimal() {
        assert_eq!(parse_length(b"0000004096").unwrap(), 4096);
    }
}
