//! Core transcriber trait and outcome types.
//!
//! # Overview
//!
//! [`Transcriber`] is the interface the session layer drives: a slow
//! [`initialize`](Transcriber::initialize) followed by repeated blocking
//! [`listen`](Transcriber::listen) calls. Both run entirely on the session
//! worker thread, never on the foreground.
//!
//! [`ListenOutcome`] discriminates the three ways a listen call can come
//! back without an error: a real phrase, a timeout waiting for speech to
//! start, or a capture that transcribed to nothing.
//!
//! [`ScriptedTranscriber`] (available under `#[cfg(test)]`) replays a fixed
//! sequence of outcomes — useful for unit-testing the streaming loop and the
//! session controller without a microphone or a model file.

use std::time::Duration;

use thiserror::Error;

// ---------------------------------------------------------------------------
// SttError
// ---------------------------------------------------------------------------

/// All errors that can arise from the speech-to-text subsystem.
#[derive(Debug, Clone, Error)]
pub enum SttError {
    /// The GGML model file was not found at the given path.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// `whisper_rs` failed to initialise a `WhisperContext` or `WhisperState`.
    #[error("whisper context initialisation failed: {0}")]
    ContextInit(String),

    /// The microphone feed could not be opened or died mid-session.
    #[error("microphone capture failed: {0}")]
    Capture(String),

    /// An error occurred during the inference pass.
    #[error("transcription error: {0}")]
    Transcription(String),

    /// `listen` was called before a successful `initialize`.
    #[error("transcriber not initialized")]
    NotInitialized,
}

// ---------------------------------------------------------------------------
// ListenOutcome
// ---------------------------------------------------------------------------

/// The result of a single blocking listen call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenOutcome {
    /// A recognized phrase, already trimmed and non-empty.
    Phrase(String),
    /// No speech started within the listen timeout. Normal idle behavior —
    /// the loop uses this window to re-check its stop flag.
    TimedOut,
    /// Speech was captured but transcribed to nothing (or to whitespace).
    Empty,
}

// ---------------------------------------------------------------------------
// Transcriber trait
// ---------------------------------------------------------------------------

/// Blocking listen-and-transcribe engine driven by the session worker.
///
/// Implementations must be `Send` so a boxed engine can move onto the worker
/// thread; the worker owns it exclusively for the session's duration, so
/// `Sync` is not required.
pub trait Transcriber: Send {
    /// Load models and open the audio source. Slow; called once per session
    /// before any listen.
    fn initialize(&mut self) -> Result<(), SttError>;

    /// Block until a phrase completes, no speech starts within `timeout`,
    /// or the capture fails.
    ///
    /// Once speech has started the full phrase is captured regardless of
    /// duration; `timeout` only bounds the wait for speech to begin.
    fn listen(&mut self, timeout: Duration) -> Result<ListenOutcome, SttError>;
}

// Compile-time assertion: Box<dyn Transcriber> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn Transcriber>) {}
};

// ---------------------------------------------------------------------------
// ScriptedTranscriber  (test-only)
// ---------------------------------------------------------------------------

#[cfg(test)]
pub use scripted::ScriptedTranscriber;


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
