use std::{
    collections::VecDeque,
    sync::{Condvar, Mutex, MutexGuard, PoisonError},
};

/// Song bytes received from the server but not yet decoded.
///
/// Bytes only ever belong to one song. DATA for the current song is appended;
/// DATA for any other song throws the old bytes away first. Every switch,
/// stop or restart bumps `generation` so a decoder reading an older stream
/// knows it has been cut off.
#[derive(Debug)]
pub struct PlaybackBuffer {
    data: VecDeque<u8>,
    song: Option<String>,
    generation: u64,
    stopped: bool,
    finished: bool,
    closed: bool,
}

impl Default for PlaybackBuffer {
    fn default() -> Self {
        Self {
            data: VecDeque::new(),
            song: None,
            generation: 0,
            stopped: true,
            finished: false,
            closed: false,
        }
    }
}

impl PlaybackBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a DATA payload tagged with `song`.
    pub fn append(&mut self, song: &str, bytes: &[u8]) {
        if self.song.as_deref() == Some(song) && !self.finished {
            self.data.extend(bytes);
            return;
        }
        self.data.clear();
        self.data.extend(bytes);
        self.song = Some(song.to_string());
        self.finished = false;
        self.generation += 1;
    }

    /// The server has sent every chunk of `song`.
    pub fn finish(&mut self, song: &str) {
        if self.song.as_deref() == Some(song) {
            self.finished = true;
        }
    }

    /// Forget the current stream and allow playback of whatever arrives next.
    pub fn start(&mut self) {
        self.reset();
        self.stopped = false;
    }

    pub fn stop(&mut self) {
        self.reset();
        self.stopped = true;
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    fn reset(&mut self) {
        self.data.clear();
        self.song = None;
        self.finished = false;
        self.generation += 1;
    }

    /// Move up to `out.len()` bytes from the front of the buffer into `out`.
    pub fn take(&mut self, out: &mut [u8]) -> usize {
        let n = out.len().min(self.data.len());
        for (dst, src) in out.iter_mut().zip(self.data.drain(..n)) {
            *dst = src;
        }
        n
    }

    pub fn is_playable(&self) -> bool {
        !self.stopped && !self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn song(&self) -> Option<&str> {
        self.song.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// A [`PlaybackBuffer`] shared between the receiver, the player and the prompt.
#[derive(Debug, Default)]
pub struct SharedBuffer {
    inner: Mutex<PlaybackBuffer>,
    changed: Condvar,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, PlaybackBuffer> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mutate the buffer and wake everyone waiting on it.
    pub fn update<T>(&self, f: impl FnOnce(&mut PlaybackBuffer) -> T) -> T {
        let result = f(&mut self.lock());
        self.changed.notify_all();
        result
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation()
    }

    /// Block until there are bytes to play and return their generation.
    /// Returns `None` once the buffer is closed and nothing playable is left.
    pub fn wait_playable(&self) -> Option<u64> {
        let buffer = self
            .changed
            .wait_while(self.lock(), |b| !b.is_closed() && !b.is_playable())
            .unwrap_or_else(PoisonError::into_inner);
        buffer.is_playable().then(|| buffer.generation())
    }

    /// Blocking read for a decoder attached to `generation`.
    ///
    /// Waits while the stream is merely starved. Returns 0 (end of stream)
    /// when the generation moved on, playback stopped, or the song is
    /// finished or the connection closed and every byte has been taken.
    pub fn read(&self, generation: u64, out: &mut [u8]) -> usize {
        let mut buffer = self
            .changed
            .wait_while(self.lock(), |b| {
                b.generation() == generation
                    && !b.is_stopped()
                    && !b.is_closed()
                    && !b.is_finished()
                    && b.is_empty()
            })
            .unwrap_or_else(PoisonError::into_inner);
        if buffer.generation() != generation || buffer.is_stopped() {
            return 0;
        }
        buffer.take(out)
    }
}
