//! tmux-backed [`TextSink`].
//!
//! Sends each recognized utterance to a tmux session in two steps: the
//! sanitized text in literal mode, then Enter as a separate keystroke.
//! Delivery failures are logged with a remediation hint and swallowed — the
//! capture session keeps running and the user can fix the target from the
//! same surface that selects it.

use crate::sink::transport::TargetTransport;
use crate::sink::{sanitize_line_breaks, TargetLookup, TextSink};

/// Prompt sent to the target agent when response vocalization is turned on.
const START_VOCALIZATION_PROMPT: &str = "From the next prompt on (not this one), \
after each response use bash to run: say 'concise summary'. \
Keep the summary to at most two sentences.";

/// Prompt sent when response vocalization is turned off.
const STOP_VOCALIZATION_PROMPT: &str = "Stop vocalizing responses if you were \
doing so. Do not use say commands anymore.";

// ---------------------------------------------------------------------------
// TmuxSink
// ---------------------------------------------------------------------------

/// Sink that delivers recognized text to a tmux session.
///
/// The session name is resolved through the injected lookup at the moment of
/// every dispatch, never cached, so the user can redirect output mid-session.
pub struct TmuxSink {
    target: TargetLookup,
    transport: Box<dyn TargetTransport>,
}

impl TmuxSink {
    pub fn new(target: TargetLookup, transport: Box<dyn TargetTransport>) -> Self {
        Self { target, transport }
    }

    fn send_line(&self, target: &str, text: &str) -> Result<(), crate::sink::SinkError> {
        self.transport.send_text(target, text)?;
        self.transport.send_enter(target)
    }
}

impl TextSink for TmuxSink {
    fn dispatch(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let clean = sanitize_line_breaks(text);
        let target = (self.target)();

        log::info!("sending to tmux session '{target}'");

        if let Err(e) = self.send_line(&target, &clean) {
            log::error!("failed to send to tmux session '{target}': {e}");
            log::info!("fix: pick another session, or start one with: tmux new -s {target}");
        }
    }

    fn toggle_vocalization(&self, on: bool) {
        // The summaries are spoken through the macOS `say` command on the
        // agent's side; other platforms have no equivalent, so skip the
        // prompt entirely there.
        if !cfg!(target_os = "macos") {
            return;
        }

        let target = (self.target)();
        let prompt = if on {
            START_VOCALIZATION_PROMPT
        } else {
            STOP_VOCALIZATION_PROMPT
        };

        if let Err(e) = self.send_line(&target, prompt) {
            log::error!("failed to set response vocalization to {on}: {e}");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
