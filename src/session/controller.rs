//! Session controller — owns the capture lifecycle state machine.
//!
//! [`SessionController`] is the foreground control surface: `start()` spawns
//! exactly one background worker per session and returns immediately;
//! `stop()` sets the cooperative cancel flag and returns without waiting.
//! The worker initializes the transcriber, runs the streaming loop, and is
//! the single place that resets the phase to `Idle` — on natural exit,
//! cancellation, and every error path alike.
//!
//! # Worker coordination
//!
//! Foreground and worker communicate through two pieces of shared state:
//! the atomic cancel flag (written by `stop()`, read by the loop's
//! continuation predicate) and the mutex-guarded [`SharedStatus`] (written
//! by the worker, read by the frontend). The blocking `initialize()` and
//! `listen()` calls run entirely on the worker thread so no interactive
//! surface ever freezes behind them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use thiserror::Error;

use crate::config::AppConfig;
use crate::feedback;
use crate::sink::TextSink;
use crate::stt::Transcriber;

use super::state::{self, new_shared_status, SessionPhase, SharedStatus};
use super::streaming;

// ---------------------------------------------------------------------------
// SessionError / TranscriberFactory
// ---------------------------------------------------------------------------

/// Errors surfaced directly to the foreground caller.
#[derive(Debug, Error)]
pub enum SessionError {
    /// `start()` was called while a session was not `Idle`.
    #[error("a voice session is already running")]
    AlreadyRunning,
}

/// Builds a fresh transcriber for each session.
///
/// Construction must be cheap and infallible; all slow or fallible work
/// belongs in [`Transcriber::initialize`], which runs on the worker.
pub type TranscriberFactory = Box<dyn Fn() -> Box<dyn Transcriber> + Send + Sync>;

// ---------------------------------------------------------------------------
// SessionController
// ---------------------------------------------------------------------------

/// Foreground handle to the voice capture session.
///
/// At most one session is active per controller instance; a second
/// `start()` fails with [`SessionError::AlreadyRunning`] until the worker
/// has reset the phase to `Idle`.
pub struct SessionController {
    status: SharedStatus,
    cancel: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    transcribers: TranscriberFactory,
    sink: Arc<dyn TextSink>,
    listen_timeout: Duration,
    vocalize_response: bool,
}

impl SessionController {
    /// Create a controller. No worker is spawned until [`start`](Self::start).
    pub fn new(
        transcribers: TranscriberFactory,
        sink: Arc<dyn TextSink>,
        config: &AppConfig,
    ) -> Self {
        Self {
            status: new_shared_status(),
            cancel: Arc::new(AtomicBool::new(false)),
            worker: None,
            transcribers,
            sink,
            listen_timeout: Duration::from_secs_f32(config.listen.timeout_secs),
            vocalize_response: config.vocalize_response,
        }
    }

    /// Handle to the observable session status for frontend binding.
    pub fn status(&self) -> SharedStatus {
        Arc::clone(&self.status)
    }

    /// Start a capture session.
    ///
    /// Non-blocking: clears the cancel flag, moves the phase to
    /// `Initializing` and spawns the worker. The phase check is what makes
    /// a double start impossible — the phase only leaves `Idle` here, on
    /// the foreground, and only returns to `Idle` from the worker.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if state::phase_of(&self.status) != SessionPhase::Idle {
            log::warn!("start requested but a session is already running");
            return Err(SessionError::AlreadyRunning);
        }

        // Reclaim the previous worker's handle. With the phase at Idle the
        // worker has finished (or is returning), so this join is prompt and
        // a new worker can never overlap the old one.
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }

        self.cancel.store(false, Ordering::SeqCst);
        {
            let mut st = self.status.lock().unwrap();
            st.phase = SessionPhase::Initializing;
            st.last_error = None;
        }

        let transcriber = (self.transcribers)();
        let sink = Arc::clone(&self.sink);
        let status = Arc::clone(&self.status);
        let cancel = Arc::clone(&self.cancel);
        let listen_timeout = self.listen_timeout;
        let vocalize_response = self.vocalize_response;

        let worker = std::thread::Builder::new()
            .name("voice-session".into())
            .spawn(move || {
                run_worker(
                    transcriber,
                    sink,
                    status,
                    cancel,
                    listen_timeout,
                    vocalize_response,
                )
            })
            .expect("failed to spawn voice-session thread");

        self.worker = Some(worker);
        Ok(())
    }

    /// Request cooperative cancellation.
    ///
    /// Logged no-op when no session is running. Does not block: the worker
    /// observes the flag at its next check between listen calls, which may
    /// be up to one listen timeout away (longer if a phrase is in flight —
    /// an in-progress utterance always completes first).
    pub fn stop(&self) {
        let mut st = self.status.lock().unwrap();
        if st.phase == SessionPhase::Idle {
            log::debug!("stop requested but no session is running");
            return;
        }
        log::info!("stopping voice session...");
        self.cancel.store(true, Ordering::SeqCst);
        st.phase = SessionPhase::Stopping;
    }
}

impl Drop for SessionController {
    /// Cancel any running session and wait for the worker to exit.
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

// ---------------------------------------------------------------------------
// Worker procedure
// ---------------------------------------------------------------------------

/// Runs off the foreground path, once per session.
///
/// Every exit path ends with the phase back at `Idle`; nothing may leave
/// the machine lingering in `Initializing`, `Listening` or `Stopping`.
fn run_worker(
    mut transcriber: Box<dyn Transcriber>,
    sink: Arc<dyn TextSink>,
    status: SharedStatus,
    cancel: Arc<AtomicBool>,
    listen_timeout: Duration,
    vocalize_response: bool,
) {
    log::info!("=== voice session starting ===");

    // Relay the vocalization preference before capture begins, so the agent
    // switches modes ahead of the first utterance.
    sink.toggle_vocalization(vocalize_response);

    if let Err(e) = transcriber.initialize() {
        log::error!("failed to initialize transcriber: {e}");
        feedback::notify("Voice to Session", "Failed to initialize the transcriber");
        state::set_failed(&status, e.to_string());
        return;
    }

    state::set_phase(&status, SessionPhase::Listening);
    log::info!("ready, listening for speech");
    feedback::speak("voice session starting");

    let result = streaming::run_streaming(
        transcriber.as_mut(),
        sink.as_ref(),
        || !cancel.load(Ordering::SeqCst),
        listen_timeout,
    );

    match result {
        Ok(()) => {
            log::info!("=== voice session stopped ===");
            feedback::speak("voice session ending");
            state::set_phase(&status, SessionPhase::Idle);
        }
        Err(e) => {
            log::error!("streaming error: {e}");
            state::set_failed(&status, e.to_string());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
