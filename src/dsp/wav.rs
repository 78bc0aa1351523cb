//! RIFF/WAVE container writer for 16-bit integer PCM.
//!
//! The header is 44 bytes and carries absolute sizes, so the total frame
//! count has to be known before the first frame is written.

use std::io::Write;

use crate::error::SynthError;

/// Size of the canonical PCM header in bytes.
pub const HEADER_LEN: usize = 44;

const FMT_CHUNK_LEN: u32 = 16;
const FORMAT_PCM: u16 = 1;

/// Sample layout of the output stream: always stereo, 16-bit integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub sample_rate: u32,
    channels: u16,
    bits_per_sample: u16,
}

impl AudioFormat {
    pub const CHANNELS: u16 = 2;
    pub const BITS_PER_SAMPLE: u16 = 16;

    pub fn stereo_pcm16(sample_rate: u32) -> Self {
        AudioFormat {
            sample_rate,
            channels: Self::CHANNELS,
            bits_per_sample: Self::BITS_PER_SAMPLE,
        }
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    /// Bytes per frame (block alignment): `channels * bits_per_sample / 8`.
    pub fn bytes_per_frame(&self) -> u16 {
        self.channels * self.bits_per_sample / 8
    }

    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.bytes_per_frame() as u32
    }
}

/// One stereo sample instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PcmFrame {
    pub left: i16,
    pub right: i16,
}

impl PcmFrame {
    /// The same sample on both channels.
    pub fn mono(sample: i16) -> Self {
        PcmFrame {
            left: sample,
            right: sample,
        }
    }

    pub fn to_le_bytes(self) -> [u8; 4] {
        let [l0, l1] = self.left.to_le_bytes();
        let [r0, r1] = self.right.to_le_bytes();
        [l0, l1, r0, r1]
    }
}

/// Header fields derived from the format and the total frame count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub format: AudioFormat,
    pub frame_count: u32,
}

impl WavHeader {
    pub fn new(format: AudioFormat, frame_count: u32) -> Self {
        WavHeader {
            format,
            frame_count,
        }
    }

    /// Bytes in the `data` chunk payload.
    pub fn data_size(&self) -> u32 {
        self.frame_count * self.format.bytes_per_frame() as u32
    }

    /// Value of the RIFF size field: the file length minus the 8-byte tag and size.
    pub fn chunk_size(&self) -> u32 {
        36 + self.data_size()
    }

    pub fn file_len(&self) -> usize {
        HEADER_LEN + self.data_size() as usize
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let format = &self.format;
        let mut buf = [0u8; HEADER_LEN];
        let fields: [&[u8]; 13] = [
            // RIFF header
            b"RIFF",
            &self.chunk_size().to_le_bytes(),
            b"WAVE",
            // fmt chunk
            b"fmt ",
            &FMT_CHUNK_LEN.to_le_bytes(),
            &FORMAT_PCM.to_le_bytes(),
            &format.channels().to_le_bytes(),
            &format.sample_rate.to_le_bytes(),
            &format.byte_rate().to_le_bytes(),
            &format.bytes_per_frame().to_le_bytes(),
            &format.bits_per_sample().to_le_bytes(),
            // data chunk
            b"data",
            &self.data_size().to_le_bytes(),
        ];
        let mut pos = 0;
        for field in fields {
            buf[pos..pos + field.len()].copy_from_slice(field);
            pos += field.len();
        }
        debug_assert_eq!(pos, HEADER_LEN);
        buf
    }
}

/// Number of whole frames in `duration` seconds: `floor(duration * sample_rate)`.
pub fn frame_count(duration: f64, sample_rate: u32) -> u64 {
    (duration * sample_rate as f64).floor() as u64
}

/// Total file length for a stereo 16-bit render, header included.
pub fn filesize(duration: f64, sample_rate: u32) -> u64 {
    HEADER_LEN as u64 + 4 * frame_count(duration, sample_rate)
}

pub fn write_header<W: Write>(
    out: &mut W,
    format: AudioFormat,
    frame_count: u32,
) -> Result<(), SynthError> {
    out.write_all(&WavHeader::new(format, frame_count).to_bytes())?;
    Ok(())
}

/// Left sample then right sample, each little-endian.
pub fn write_frame<W: Write>(out: &mut W, frame: PcmFrame) -> Result<(), SynthError> {
    out.write_all(&frame.to_le_bytes())?;
    Ok(())
}

/// `len` as a header frame count, if the data and RIFF sizes fit in 32 bits.
fn riff_frame_count(len: usize, format: AudioFormat) -> Result<u32, SynthError> {
    let fits = u32::try_from(len).ok().filter(|&frames| {
        frames
            .checked_mul(format.bytes_per_frame() as u32)
            .and_then(|data| data.checked_add(36))
            .is_some()
    });
    fits.ok_or_else(|| SynthError::invalid("frames", len as f64, "too many frames for a RIFF file"))
}

/// Encode a complete file into memory. Fails if the frames do not fit the
/// 32-bit size fields.
pub fn encode_wav(frames: &[PcmFrame], format: AudioFormat) -> Result<Vec<u8>, SynthError> {
    let frame_count = riff_frame_count(frames.len(), format)?;
    let header = WavHeader::new(format, frame_count);
    let mut buf = Vec::with_capacity(header.file_len());
    buf.extend_from_slice(&header.to_bytes());
    for frame in frames {
        buf.extend_from_slice(&frame.to_le_bytes());
    }
    Ok(buf)
}
