//! Wire protocol shared by the songcast server and client.
//!
//! Every message is a frame of the form
//!
//! ```text
//! <10-digit zero-padded ASCII length><TAG>%%%%%<secondary>%%%%%<payload>
//! ```
//!
//! where the length counts the bytes after the prefix. The length alone decides
//! how many bytes belong to a frame; the separator only splits those bytes into
//! the three fields, and the payload is taken verbatim after the second one.

mod codec;
mod interface;
mod io;
mod songs;

pub use codec::*;
pub use interface::*;
pub use io::*;
pub use songs::*;

/// Token between the tag, secondary and payload fields.
pub const SEPARATOR: &[u8] = b"%%%%%";

/// Filler for fields a message does not use.
pub const PLACEHOLDER: &str = "_";

/// Width of the ASCII length prefix.
pub const LENGTH_PREFIX_LEN: usize = 10;

pub const SEND_BUFFER: usize = 4096;

/// Chunk size that keeps a DATA frame within one send buffer.
pub const DEFAULT_CHUNK_SIZE: usize = SEND_BUFFER - 100;

/// Largest frame body a reader accepts before treating the stream as malformed.
pub const DEFAULT_MAX_FRAME_LEN: usize = 16 * 1024 * 1024;
