//! voice-to-session — dictate speech into a tmux session.
//!
//! Transcribes microphone speech with Whisper and types each recognized
//! phrase into a named tmux session, followed by Enter — hands-free input
//! for an AI coding agent (or any interactive program) running there.
//!
//! # Architecture
//!
//! ```text
//! SessionController (foreground)
//!   └─ start() ─▶ worker thread
//!        ├─ Transcriber::initialize()      model load + mic open
//!        └─ run_streaming()                cooperative capture loop
//!             ├─ Transcriber::listen()     blocking, timeout-bounded
//!             └─ TextSink::dispatch()      tmux send-keys -l … + Enter
//! ```
//!
//! The controller exposes a [`session::SharedStatus`] observable for
//! frontend binding and a one-way cancel flag checked between listen calls;
//! see the `session` module for the lifecycle details.

pub mod audio;
pub mod config;
pub mod factory;
pub mod feedback;
pub mod session;
pub mod sink;
pub mod stt;
