use crate::{player::*, types::*};
use std::{
    sync::Arc,
    thread::{self, JoinHandle},
    time::Duration,
};

/// Decoded units allowed to sit in the output before the player waits.
pub const MAX_QUEUED_UNITS: usize = 32;

pub fn player(buffer: Arc<SharedBuffer>, sink: RodioSink) -> JoinHandle<()> {
    thread::spawn(move || {
        run_player(&buffer, &*sink, |reader| {
            Mp3Decoder::open(reader).map(|d| Box::new(d) as Box<dyn UnitSource>)
        });
    })
}

/// Feed the buffer through a fresh decoder per generation until the buffer
/// is closed and drained.
pub fn run_player<O, F>(buffer: &Arc<SharedBuffer>, output: &O, mut open: F)
where
    O: AudioOutput + ?Sized,
    F: FnMut(BufferReader) -> anyhow::Result<Box<dyn UnitSource>>,
{
    while let Some(generation) = buffer.wait_playable() {
        let mut source = match open(BufferReader::new(buffer.clone(), generation)) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!("Could not open stream: {e:#}");
                continue;
            }
        };
        tracing::debug!("Decoding generation {generation}");

        loop {
            match source.next_unit() {
                Ok(Some(unit)) => {
                    if buffer.generation() != generation {
                        break;
                    }
                    output.play(unit);
                    throttle(buffer, output, generation);
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::debug!("Decoder stopped: {e:#}");
                    break;
                }
            }
        }
    }
    tracing::debug!("Player finished");
}

fn throttle<O: AudioOutput + ?Sized>(buffer: &SharedBuffer, output: &O, generation: u64) {
    while output.queued() >= MAX_QUEUED_UNITS && buffer.generation() == generation {
        thread::sleep(Duration::from_millis(10));
    }
}
