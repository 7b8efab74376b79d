//! The streaming loop — bridges a blocking listen primitive with
//! cooperative cancellation and hands recognized phrases to the sink.
//!
//! Cancellation is checked only *between* listen calls, never during one:
//! an in-progress phrase always completes before the loop can stop. The
//! worst-case stop latency is therefore the remainder of the current phrase
//! plus at most one listen-timeout poll interval.

use std::time::Duration;

use crate::sink::TextSink;
use crate::stt::{ListenOutcome, SttError, Transcriber};

/// Run the capture loop until `should_continue` returns `false` or a listen
/// call fails.
///
/// Timeout and empty results are normal idle behavior: no dispatch, no error,
/// only a debug-level log. A listen error is reported and returned — it is
/// fatal to the session, and the caller performs the reset to idle. Dispatch
/// failures never reach this loop; the sink contains them.
pub fn run_streaming(
    transcriber: &mut dyn Transcriber,
    sink: &dyn TextSink,
    mut should_continue: impl FnMut() -> bool,
    listen_timeout: Duration,
) -> Result<(), SttError> {
    let mut chunk: u64 = 0;

    while should_continue() {
        log::debug!("waiting for speech (chunk {chunk})...");

        let outcome = match transcriber.listen(listen_timeout) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("listen failed: {e}");
                return Err(e);
            }
        };

        match outcome {
            ListenOutcome::Phrase(text) => {
                let text = text.trim();
                if text.is_empty() {
                    log::debug!("no speech detected or empty result");
                    continue;
                }
                log::info!("transcribed: {text}");
                sink.dispatch(text);
                chunk += 1;
            }
            ListenOutcome::TimedOut => {
                log::debug!(
                    "no speech detected within {:.1}s timeout",
                    listen_timeout.as_secs_f32()
                );
            }
            ListenOutcome::Empty => {
                log::debug!("no speech detected or empty result");
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
