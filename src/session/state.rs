//! Session phase state machine and shared observable status.
//!
//! [`SessionPhase`] drives the capture session's state machine. The
//! frontend reads it via [`SharedStatus`] to render button/indicator state.
//!
//! [`SharedStatus`] is a type alias for `Arc<Mutex<SessionStatus>>` — cheap
//! to clone and safe to share across threads. The worker writes it; the
//! foreground only reads (apart from the `Stopping` transition in `stop()`).

use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// SessionPhase
// ---------------------------------------------------------------------------

/// Phases of a voice capture session.
///
/// The state machine transitions are:
///
/// ```text
/// Idle ──start()──▶ Initializing ──engine ready──▶ Listening
///                        │                            │
///                        │ init failure               │ stop() ▶ Stopping
///                        ▼                            ▼
///                      Idle ◀──────loop exit / listen error
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No session is running.
    Idle,

    /// The worker is loading the model and opening the microphone.
    Initializing,

    /// The streaming loop is capturing and dispatching utterances.
    Listening,

    /// Stop was requested; the worker will exit at its next check between
    /// listen calls.
    Stopping,
}

impl SessionPhase {
    /// Returns `true` while a session worker exists for this run.
    ///
    /// The frontend uses this to flip its start/stop controls.
    pub fn is_active(&self) -> bool {
        !matches!(self, SessionPhase::Idle)
    }

    /// A short human-readable label suitable for a status indicator.
    pub fn label(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "Idle",
            SessionPhase::Initializing => "Initializing",
            SessionPhase::Listening => "Listening",
            SessionPhase::Stopping => "Stopping",
        }
    }
}

impl Default for SessionPhase {
    fn default() -> Self {
        SessionPhase::Idle
    }
}

// ---------------------------------------------------------------------------
// SessionStatus / SharedStatus
// ---------------------------------------------------------------------------

/// Observable session state — what a frontend needs for its indicators.
#[derive(Debug, Default)]
pub struct SessionStatus {
    /// Current phase of the capture session.
    pub phase: SessionPhase,

    /// Message from the most recent initialization or listen failure.
    ///
    /// Cleared when a new session starts; `None` while everything is fine.
    pub last_error: Option<String>,
}

/// Thread-safe handle to [`SessionStatus`].
///
/// Cheap to clone (`Arc` clone). Lock with `.lock().unwrap()` for a short
/// critical section.
pub type SharedStatus = Arc<Mutex<SessionStatus>>;

/// Construct a new [`SharedStatus`] starting at [`SessionPhase::Idle`].
pub fn new_shared_status() -> SharedStatus {
    Arc::new(Mutex::new(SessionStatus::default()))
}

/// Read the current phase.
pub fn phase_of(status: &SharedStatus) -> SessionPhase {
    status.lock().unwrap().phase
}

/// Set the phase, leaving any error message untouched.
pub(crate) fn set_phase(status: &SharedStatus, phase: SessionPhase) {
    status.lock().unwrap().phase = phase;
}

/// Record a failure and reset to [`SessionPhase::Idle`].
pub(crate) fn set_failed(status: &SharedStatus, message: String) {
    let mut st = status.lock().unwrap();
    st.phase = SessionPhase::Idle;
    st.last_error = Some(message);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- SessionPhase::is_active ----

    #[test]
    fn idle_is_not_active() {
        assert!(!SessionPhase::Idle.is_active());
    }

    #[test]
    fn initializing_is_active() {
        assert!(SessionPhase::Initializing.is_active());
    }

    #[test]
    fn listening_is_active() {
        assert!(SessionPhase::Listening.is_active());
    }

    #[test]
    fn stopping_is_active() {
        assert!(SessionPhase::Stopping.is_active());
    }

    // ---- SessionPhase::label ----

    #[test]
    fn labels_match_indicator_strings() {
        assert_eq!(SessionPhase::Idle.label(), "Idle");
        assert_eq!(SessionPhase::Initializing.label(), "Initializing");
        assert_eq!(SessionPhase::Listening.label(), "Listening");
        assert_eq!(SessionPhase::Stopping.label(), "Stopping");
    }

    // ---- Default ----

    #[test]
    fn default_phase_is_idle() {
        assert_eq!(SessionPhase::default(), SessionPhase::Idle);
    }

    // ---- SharedStatus ----

    #[test]
    fn shared_status_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedStatus>();
    }

    #[test]
    fn shared_status_can_be_cloned_and_mutated() {
        let status = new_shared_status();
        let status2 = Arc::clone(&status);

        set_phase(&status, SessionPhase::Listening);
        assert_eq!(phase_of(&status2), SessionPhase::Listening);
    }

    #[test]
    fn set_failed_records_error_and_resets_to_idle() {
        let status = new_shared_status();
        set_phase(&status, SessionPhase::Initializing);
        set_failed(&status, "model not found".into());

        let st = status.lock().unwrap();
        assert_eq!(st.phase, SessionPhase::Idle);
        assert_eq!(st.last_error.as_deref(), Some("model not found"));
    }
}
