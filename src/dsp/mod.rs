//! Signal path, leaves first.
//!
//! Special functions feed the generator, the quantizer narrows its output
//! to 16 bits, and the renderer streams the result through the WAV writer.
//! Every stage is deterministic, so the same request always yields the
//! same bytes.

pub mod generator;
pub mod quantizer;
pub mod renderer;
pub mod special;
pub mod wav;
