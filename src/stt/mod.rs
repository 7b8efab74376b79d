//! Speech-to-text module.
//!
//! [`Transcriber`] is the blocking listen-and-transcribe interface the
//! session worker drives; [`WhisperTranscriber`] is the production
//! implementation (microphone feed + `whisper_rs` inference).
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use voice_to_session::config::ListenConfig;
//! use voice_to_session::stt::{ListenOutcome, Transcriber, TranscribeParams, WhisperTranscriber};
//!
//! let mut engine = WhisperTranscriber::new(
//!     "models/ggml-base.en.bin",
//!     TranscribeParams::default(),
//!     ListenConfig::default(),
//! );
//! engine.initialize().expect("model not found");
//!
//! match engine.listen(Duration::from_secs(2)).unwrap() {
//!     ListenOutcome::Phrase(text) => println!("{text}"),
//!     ListenOutcome::TimedOut | ListenOutcome::Empty => {}
//! }
//! ```

pub mod engine;
pub mod transcribe;
pub mod whisper;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use engine::{ListenOutcome, SttError, Transcriber};
pub use transcribe::{SamplingStrategy, TranscribeParams};
pub use whisper::WhisperTranscriber;

// test-only re-export so session tests can import the scripted engine
// without `use voice_to_session::stt::engine::ScriptedTranscriber`.
#[cfg(test)]
pub use engine::ScriptedTranscriber;
