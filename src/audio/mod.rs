//! Audio pipeline — microphone capture → speech gating → resampling.
//!
//! ```text
//! Microphone → cpal callback → AudioChunk (mpsc) → MicFeed
//!           → SpeechGate (phrase boundaries) → stereo_to_mono
//!           → resample_to_16k → transcription engine
//! ```

pub mod capture;
pub mod level;
pub mod resample;

pub use capture::{AudioCapture, AudioChunk, CaptureError, MicFeed, StreamHandle};
pub use level::{rms, SpeechGate};
pub use resample::{resample_to_16k, stereo_to_mono};
