use crate::types::SharedBuffer;
use rodio::{Sink, buffer::SamplesBuffer};
use std::{
    io::{self, Read},
    sync::Arc,
};
use symphonia::core::{
    audio::SampleBuffer,
    codecs::{CODEC_TYPE_NULL, Decoder, DecoderOptions},
    errors::Error as SymphoniaError,
    formats::{FormatOptions, FormatReader},
    io::{MediaSourceStream, ReadOnlySource},
    meta::MetadataOptions,
    probe::Hint,
};

/// Non-seekable view of one generation of the playback buffer.
pub struct BufferReader {
    shared: Arc<SharedBuffer>,
    generation: u64,
}

impl BufferReader {
    pub fn new(shared: Arc<SharedBuffer>, generation: u64) -> Self {
        Self { shared, generation }
    }
}

impl Read for BufferReader {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if out.is_empty() {
            return Ok(0);
        }
        Ok(self.shared.read(self.generation, out))
    }
}

/// One decoded packet as interleaved samples.
#[derive(PartialEq, Clone, Debug)]
pub struct DecodedUnit {
    pub channels: u16,
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

pub trait UnitSource {
    /// The next decoded unit, or `None` at end of stream.
    fn next_unit(&mut self) -> anyhow::Result<Option<DecodedUnit>>;
}

pub trait AudioOutput {
    fn play(&self, unit: DecodedUnit);
    /// Drop everything queued and keep accepting new units.
    fn clear(&self);
    fn queued(&self) -> usize;
}

impl AudioOutput for Sink {
    fn play(&self, unit: DecodedUnit) {
        self.append(SamplesBuffer::new(unit.channels, unit.sample_rate, unit.samples));
    }

    fn clear(&self) {
        // Sink::clear also pauses.
        Sink::clear(self);
        Sink::play(self);
    }

    fn queued(&self) -> usize {
        self.len()
    }
}

pub struct Mp3Decoder {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
}

impl Mp3Decoder {
    /// Probe the stream behind `reader`. Blocks until enough bytes arrive to
    /// recognise the format.
    pub fn open(reader: BufferReader) -> anyhow::Result<Self> {
        let mss = MediaSourceStream::new(Box::new(ReadOnlySource::new(reader)), Default::default());

        let mut hint = Hint::new();
        hint.with_extension("mp3");

        let probed = symphonia::default::get_probe().format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )?;
        let format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| anyhow::anyhow!("No supported audio tracks"))?;
        let track_id = track.id;
        let decoder =
            symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

        Ok(Self {
            format,
            decoder,
            track_id,
        })
    }
}

impl UnitSource for Mp3Decoder {
    fn next_unit(&mut self) -> anyhow::Result<Option<DecodedUnit>> {
        loop {
            let packet = match self.format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(_)) => return Ok(None), // EOF
                Err(SymphoniaError::ResetRequired) => return Ok(None),
                Err(e) => return Err(e.into()),
            };
            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = match self.decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(e)) => {
                    tracing::debug!("Skipping undecodable packet: {e}");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let spec = *decoded.spec();
            let mut samples = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
            samples.copy_interleaved_ref(decoded);

            return Ok(Some(DecodedUnit {
                channels: spec.channels.count() as u16,
                sample_rate: spec.rate,
                samples: samples.samples().to_vec(),
            }));
        }
    }
}
