//! Platform-gated user feedback: desktop notifications and spoken cues.
//!
//! Best-effort by design — a missing `say` or `notify-send` binary degrades
//! to a warn log, never an error the session would see.

use std::process::{Command, Stdio};

/// Show a desktop notification.
///
/// macOS: `osascript` / Notification Center. Linux: `notify-send`.
/// Other platforms: silent no-op.
pub fn notify(title: &str, message: &str) {
    let result = if cfg!(target_os = "macos") {
        let script = format!(
            r#"display notification "{}" with title "{}""#,
            applescript_escape(message),
            applescript_escape(title)
        );
        Command::new("osascript").args(["-e", &script]).output()
    } else if cfg!(target_os = "linux") {
        Command::new("notify-send").args([title, message]).output()
    } else {
        return;
    };

    match result {
        Ok(output) if !output.status.success() => {
            log::warn!(
                "notification failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Err(e) => log::warn!("notification failed: {e}"),
        _ => {}
    }
}

/// Speak a short message out loud.
///
/// macOS: `say`. Linux: `espeak-ng`. Other platforms: silent no-op.
/// Spawned without waiting so the session worker never blocks on speech.
pub fn speak(message: &str) {
    let result = if cfg!(target_os = "macos") {
        Command::new("say")
            .arg(message)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
    } else if cfg!(target_os = "linux") {
        Command::new("espeak-ng")
            .arg(message)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
    } else {
        return;
    };

    if let Err(e) = result {
        log::warn!("speech feedback failed: {e}");
    }
}

/// Escape a string for use inside a double-quoted AppleScript literal.
fn applescript_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_leaves_plain_text_untouched() {
        assert_eq!(applescript_escape("session started"), "session started");
    }

    #[test]
    fn escape_quotes() {
        assert_eq!(applescript_escape(r#"say "hi""#), r#"say \"hi\""#);
    }

    #[test]
    fn escape_backslashes() {
        assert_eq!(applescript_escape(r"a\b"), r"a\\b");
    }
}
