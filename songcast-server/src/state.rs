use crate::catalog::{Catalog, Chunk, SongId};
use songcast_protocol::{Command, Tag};

#[derive(PartialEq, Clone, Copy, Debug, Eq)]
pub enum Status {
    Paused,
    Playing,
}

/// Per-client playback state shared by a connection's inbound and outbound
/// handlers.
///
/// `status == Playing` implies `current_song.is_some()`, and `current_chunk`
/// is reset whenever `current_song` changes. `connected` only ever goes from
/// true to false.
#[derive(Debug)]
pub struct ConnectionState {
    pub id: u64,
    pub status: Status,
    pub current_song: Option<SongId>,
    pub current_chunk: usize,
    pub pending_commands: Vec<Command>,
    connected: bool,
}

impl ConnectionState {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            status: Status::Paused,
            current_song: None,
            current_chunk: 0,
            pending_commands: Vec::new(),
            connected: true,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Returns true only for the call that actually flipped the flag.
    pub fn disconnect(&mut self) -> bool {
        std::mem::replace(&mut self.connected, false)
    }

    /// Queue a command for the outbound handler. NONE is dropped here.
    pub fn enqueue(&mut self, command: Command) -> bool {
        if command.kind == Tag::None {
            return false;
        }
        self.pending_commands.push(command);
        true
    }

    fn start(&mut self, song: SongId) {
        self.status = Status::Playing;
        self.current_song = Some(song);
        self.current_chunk = 0;
    }

    /// Back to PAUSED with no song and the cursor at 0.
    pub fn pause(&mut self) {
        self.status = Status::Paused;
        self.current_song = None;
        self.current_chunk = 0;
    }

    /// Advance the cursor by one chunk. Only meaningful while playing.
    pub fn next_chunk_frame(&mut self, catalog: &Catalog) -> Option<Command> {
        if self.status != Status::Playing {
            return None;
        }
        let Some(song) = self.current_song else {
            self.pause();
            return None;
        };
        let name = catalog.name(song).unwrap_or_default().to_string();

        match catalog.chunk(song, self.current_chunk) {
            Chunk::Data(data) => {
                self.current_chunk += 1;
                Some(Command::data(&name, data))
            }
            Chunk::EndOfSong => {
                tracing::debug!(client = self.id, "Finished {name}");
                self.pause();
                Some(Command::finished(&name))
            }
            Chunk::InvalidSong => {
                self.pause();
                Some(Command::error("invalid song"))
            }
        }
    }

    /// Apply one client command, returning the reply to send, if any.
    pub fn apply(&mut self, command: &Command, catalog: &Catalog) -> Option<Command> {
        match command.kind {
            Tag::Play => match catalog.resolve(&command.secondary) {
                Some(song) => {
                    tracing::info!(
                        client = self.id,
                        "Playing {}",
                        catalog.name(song).unwrap_or_default()
                    );
                    self.start(song);
                    None
                }
                None => {
                    tracing::info!(client = self.id, "Rejected play of {:?}", command.secondary);
                    Some(Command::error(&format!(
                        "invalid song name: {}",
                        command.secondary
                    )))
                }
            },
            Tag::Stop => {
                tracing::info!(client = self.id, "Stopped");
                self.pause();
                None
            }
            Tag::List => Some(Command::song_list(&catalog.listing())),
            other => {
                tracing::debug!(client = self.id, "Ignoring {other} from client");
                None
            }
        }
    }

    /// Apply every pending command in arrival order and clear the queue.
    pub fn drain(&mut self, catalog: &Catalog) -> Vec<Command> {
        let pending = std::mem::take(&mut self.pending_commands);
        pending
            .iter()
            .filter_map(|command| self.apply(command, catalog))
            .collect()
    }

    /// One outbound cycle: push the next chunk if playing with nothing
    /// pending, then drain pending commands. Returns the frames to send, in
    /// order.
    pub fn cycle(&mut self, catalog: &Catalog) -> Vec<Command> {
        let mut frames = Vec::new();
        if self.status == Status::Playing
            && self.pending_commands.is_empty()
            && let Some(frame) = self.next_chunk_frame(catalog)
        {
            frames.push(frame);
        }
        frames.extend(self.drain(catalog));
        frames
    }
}
