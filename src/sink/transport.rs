//! tmux key-delivery transport.
//!
//! [`TargetTransport`] abstracts the two external commands the sink issues
//! per utterance so the sink logic can be tested without a tmux server.
//! [`TmuxTransport`] is the production implementation over
//! `std::process::Command`.

use std::process::Command;

use thiserror::Error;

// ---------------------------------------------------------------------------
// SinkError
// ---------------------------------------------------------------------------

/// Errors that can occur while delivering text to the target.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The `tmux` binary could not be executed at all.
    #[error("failed to run tmux: {0}")]
    Spawn(#[from] std::io::Error),

    /// tmux ran but exited non-zero (typically: no such session).
    #[error("tmux exited with an error: {0}")]
    Command(String),
}

// ---------------------------------------------------------------------------
// TargetTransport trait
// ---------------------------------------------------------------------------

/// The two-step delivery protocol against an addressable target.
///
/// Text delivery and submission are separate commands: the text goes in
/// literal mode so embedded control sequences in speech are never
/// interpreted, and the submission keystroke follows as its own step.
pub trait TargetTransport: Send + Sync {
    /// Deliver `text` to `target` verbatim, without interpreting control
    /// sequences.
    fn send_text(&self, target: &str, text: &str) -> Result<(), SinkError>;

    /// Deliver the submission keystroke (Enter) to `target`.
    fn send_enter(&self, target: &str) -> Result<(), SinkError>;
}

// ---------------------------------------------------------------------------
// TmuxTransport
// ---------------------------------------------------------------------------

/// Production transport that shells out to `tmux send-keys`.
#[derive(Debug, Default)]
pub struct TmuxTransport;

fn run_tmux(args: &[&str]) -> Result<(), SinkError> {
    let output = Command::new("tmux").args(args).output()?;

    if !output.status.success() {
        return Err(SinkError::Command(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    Ok(())
}

impl TargetTransport for TmuxTransport {
    fn send_text(&self, target: &str, text: &str) -> Result<(), SinkError> {
        // -l sends the text literally so shell metacharacters and key names
        // in dictated speech are never interpreted as commands.
        run_tmux(&["send-keys", "-t", target, "-l", text])
    }

    fn send_enter(&self, target: &str) -> Result<(), SinkError> {
        run_tmux(&["send-keys", "-t", target, "Enter"])
    }
}

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

#[cfg(test)]
pub use doubles::{FailingTransport, RecordingTransport, SentKey};

#[cfg(test)]
mod doubles {
    use super::*;
    use std::sync::Mutex;

    /// One recorded transport call.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum SentKey {
        /// `send_text(target, text)`
        Text { target: String, text: String },
        /// `send_enter(target)`
        Enter { target: String },
    }

    /// Transport that records every call and always succeeds.
    #[derive(Default)]
    pub struct RecordingTransport {
        pub sent: Mutex<Vec<SentKey>>,
    }

    impl RecordingTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> Vec<SentKey> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl TargetTransport for RecordingTransport {
        fn send_text(&self, target: &str, text: &str) -> Result<(), SinkError> {
            self.sent.lock().unwrap().push(SentKey::Text {
                target: target.to_string(),
                text: text.to_string(),
            });
            Ok(())
        }

        fn send_enter(&self, target: &str) -> Result<(), SinkError> {
            self.sent.lock().unwrap().push(SentKey::Enter {
                target: target.to_string(),
            });
            Ok(())
        }
    }

    /// Transport that fails every call but still counts attempts.
    #[derive(Default)]
    pub struct FailingTransport {
        pub attempts: Mutex<usize>,
    }

    impl FailingTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn attempt_count(&self) -> usize {
            *self.attempts.lock().unwrap()
        }
    }

    impl TargetTransport for FailingTransport {
        fn send_text(&self, _target: &str, _text: &str) -> Result<(), SinkError> {
            *self.attempts.lock().unwrap() += 1;
            Err(SinkError::Command("no server running".into()))
        }

        fn send_enter(&self, _target: &str) -> Result<(), SinkError> {
            *self.attempts.lock().unwrap() += 1;
            Err(SinkError::Command("no server running".into()))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_error_display_includes_stderr() {
        let e = SinkError::Command("can't find session: demo".into());
        assert!(e.to_string().contains("can't find session: demo"));
    }

    #[test]
    fn recording_transport_records_in_order() {
        let t = RecordingTransport::new();
        t.send_text("demo", "hi").unwrap();
        t.send_enter("demo").unwrap();
        assert_eq!(
            t.calls(),
            vec![
                SentKey::Text {
                    target: "demo".into(),
                    text: "hi".into()
                },
                SentKey::Enter {
                    target: "demo".into()
                },
            ]
        );
    }

    #[test]
    fn failing_transport_counts_attempts() {
        let t = FailingTransport::new();
        assert!(t.send_text("demo", "hi").is_err());
        assert!(t.send_enter("demo").is_err());
        assert_eq!(t.attempt_count(), 2);
    }
}
