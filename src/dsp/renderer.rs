//! Synthesis driver: Generator → Quantizer → WAV writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, warn};

use crate::config::RenderRequest;
use crate::error::SynthError;

use super::quantizer::{self, OverflowPolicy};
use super::wav::{self, PcmFrame};

/// Raw signal value and quantized frame at index `i`. Time is
/// `i / sample_rate`, computed from the integer index so long renders do
/// not accumulate rounding error.
fn sample_at(request: &RenderRequest, index: u32) -> Result<(f64, PcmFrame), SynthError> {
    let t = index as f64 / request.format().sample_rate as f64;
    let value = request.generator().generate(t)?;
    let sample = quantizer::quantize_with(value, request.max_level(), request.overflow())?;
    Ok((value, PcmFrame::mono(sample)))
}

/// Stream a complete WAV file for `request` into `out`. Returns the number
/// of frames written.
pub fn render<W: Write>(request: &RenderRequest, out: &mut W) -> Result<u32, SynthError> {
    let format = request.format();
    let frame_count = request.frame_count();
    debug!(
        "rendering {frame_count} frames ({} s) at {} Hz ({:?})",
        request.duration_seconds(),
        format.sample_rate,
        request.signal().waveform
    );

    wav::write_header(out, format, frame_count)?;
    let track_wraps = request.overflow() == OverflowPolicy::Wrap;
    let mut wrapped = 0u64;
    for i in 0..frame_count {
        let (value, frame) = sample_at(request, i)?;
        if track_wraps && quantizer::overflows(value, request.max_level()) {
            wrapped += 1;
        }
        wav::write_frame(out, frame)?;
    }
    out.flush()?;

    if wrapped > 0 {
        warn!(
            "{wrapped} samples exceeded 16 bits at max level {} and wrapped",
            request.max_level()
        );
    }
    debug!("wrote {} bytes", wav::HEADER_LEN + frame_count as usize * 4);
    Ok(frame_count)
}

/// Render every frame into memory, in index order.
pub fn render_frames(request: &RenderRequest) -> Result<Vec<PcmFrame>, SynthError> {
    (0..request.frame_count())
        .map(|i| sample_at(request, i).map(|(_, frame)| frame))
        .collect()
}

/// Render `request` to WAV bytes.
pub fn render_wav(request: &RenderRequest) -> Result<Vec<u8>, SynthError> {
    let frames = render_frames(request)?;
    wav::encode_wav(&frames, request.format())
}

/// Render `request` to a file at `path`, replacing any existing file.
pub fn render_file(request: &RenderRequest, path: impl AsRef<Path>) -> Result<u32, SynthError> {
    let mut out = BufWriter::new(File::create(path)?);
    render(request, &mut out)
}
