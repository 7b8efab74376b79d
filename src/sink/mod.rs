//! Text sink module — delivery of recognized text to an addressable target.
//!
//! # Overview
//!
//! [`TextSink`] is the interface the streaming loop hands utterances to.
//! Implementations deliver the text to an external target and **contain**
//! every delivery failure: errors are logged at the sink boundary and never
//! reach the loop, because one bad target must not kill an otherwise-working
//! capture session (the user can fix the target while the session runs).
//!
//! [`TmuxSink`] is the production implementation; it resolves the target
//! tmux session name freshly on every call through a [`TargetLookup`].

pub mod tmux;
pub mod transport;

pub use tmux::TmuxSink;
pub use transport::{SinkError, TargetTransport, TmuxTransport};

// ---------------------------------------------------------------------------
// TargetLookup
// ---------------------------------------------------------------------------

/// Zero-argument lookup returning the current target name.
///
/// Supplied by the frontend and invoked fresh on every dispatch and every
/// capability toggle — the sink never caches the result, so the user can
/// redirect output while a session is running.
pub type TargetLookup = Box<dyn Fn() -> String + Send + Sync>;

// ---------------------------------------------------------------------------
// TextSink trait
// ---------------------------------------------------------------------------

/// Destination for recognized text.
///
/// Both methods are infallible at this boundary: implementations log and
/// swallow delivery failures internally.
pub trait TextSink: Send + Sync {
    /// Deliver one utterance to the current target.
    ///
    /// Text that is empty after trimming is silently ignored.
    fn dispatch(&self, text: &str);

    /// Ask the agent in the target session to start or stop vocalizing
    /// short summaries of its responses. No-op on platforms without a
    /// speech command.
    fn toggle_vocalization(&self, on: bool);
}

// ---------------------------------------------------------------------------
// sanitize_line_breaks
// ---------------------------------------------------------------------------

/// Replace every CR and LF character with a single space.
///
/// The tmux transport treats a line terminator as a phrase-submission
/// trigger, so an embedded terminator would split or prematurely submit the
/// utterance. The output has the same number of characters as the input.
pub fn sanitize_line_breaks(text: &str) -> String {
    text.chars()
        .map(|c| if matches!(c, '\r' | '\n') { ' ' } else { c })
        .collect()
}

// ---------------------------------------------------------------------------
// RecordingSink  (test-only)
// ---------------------------------------------------------------------------

#[cfg(test)]
pub use recording::RecordingSink;

#[cfg(test)]
mod recording {
    use super::TextSink;
    use std::sync::Mutex;

    /// Test double that records every dispatched utterance and toggle call.
    #[derive(Default)]
    pub struct RecordingSink {
        pub dispatched: Mutex<Vec<String>>,
        pub toggles: Mutex<Vec<bool>>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn dispatch_count(&self) -> usize {
            self.dispatched.lock().unwrap().len()
        }
    }

    impl TextSink for RecordingSink {
        fn dispatch(&self, text: &str) {
            self.dispatched.lock().unwrap().push(text.to_string());
        }

        fn toggle_vocalization(&self, on: bool) {
            self.toggles.lock().unwrap().push(on);
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
    fn sanitize_replaces_each_terminator_with_one_space() {
        assert_eq!(sanitize_line_breaks("a\n\rb"), "a  b");
    }

    #[test]
    fn sanitize_crlf_becomes_two_spaces() {
        // CR and LF are each replaced individually, preserving length.
        assert_eq!(sanitize_line_breaks("a\r\nb"), "a  b");
    }

    #[test]
    fn sanitize_preserves_length() {
        let input = "one\ntwo\r\nthree\r";
        let out = sanitize_line_breaks(input);
        assert_eq!(out.chars().count(), input.chars().count());
        assert!(!out.contains('\n'));
        assert!(!out.contains('\r'));
    }

    #[test]
    fn sanitize_leaves_clean_text_untouched() {
        assert_eq!(sanitize_line_breaks("hello world"), "hello world");
    }

    #[test]
    fn sanitize_empty_input() {
        assert_eq!(sanitize_line_breaks(""), "");
    }
}
