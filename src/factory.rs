//! Construction of transcriber and sink variants keyed by configuration tags.
//!
//! An unrecognized tag is surfaced immediately as a [`FactoryError`] at
//! startup, before any session is started, rather than being silently
//! defaulted.

use std::sync::Arc;

use thiserror::Error;

use crate::config::{AppConfig, AppPaths};
use crate::session::TranscriberFactory;
use crate::sink::{TargetLookup, TextSink, TmuxSink, TmuxTransport};
use crate::stt::{Transcriber, TranscribeParams, WhisperTranscriber};

/// Errors from resolving configuration tags to concrete implementations.
#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("unknown transcriber type: {0}")]
    UnknownTranscriber(String),

    #[error("unknown sink type: {0}")]
    UnknownSink(String),
}

/// Build the per-session transcriber factory for the configured engine.
///
/// The returned closure is called once per `start()`; constructing an
/// engine is cheap, and all slow work happens in its `initialize()` on the
/// session worker.
pub fn create_transcriber_factory(
    config: &AppConfig,
) -> Result<TranscriberFactory, FactoryError> {
    match config.transcriber.as_str() {
        "whisper" => {
            let model_path = AppPaths::new().model_file(&config.stt.model);
            let params = TranscribeParams {
                language: config.stt.language.clone(),
                ..TranscribeParams::default()
            };
            let listen = config.listen.clone();

            Ok(Box::new(move || {
                Box::new(WhisperTranscriber::new(
                    model_path.clone(),
                    params.clone(),
                    listen.clone(),
                )) as Box<dyn Transcriber>
            }))
        }
        other => Err(FactoryError::UnknownTranscriber(other.to_string())),
    }
}

/// Build the configured text sink.
///
/// `target` is the frontend-supplied lookup the sink calls on every
/// dispatch to resolve the current target name.
pub fn create_sink(
    config: &AppConfig,
    target: TargetLookup,
) -> Result<Arc<dyn TextSink>, FactoryError> {
    match config.sink.as_str() {
        "tmux" => Ok(Arc::new(TmuxSink::new(target, Box::new(TmuxTransport)))),
        other => Err(FactoryError::UnknownSink(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_transcriber_tag_is_rejected() {
        let mut config = AppConfig::default();
        config.transcriber = "kaldi".into();

        let err = create_transcriber_factory(&config).unwrap_err();
        assert!(matches!(err, FactoryError::UnknownTranscriber(t) if t == "kaldi"));
    }

    #[test]
    fn unknown_sink_tag_is_rejected() {
        let mut config = AppConfig::default();
        config.sink = "serial-port".into();

        let err = create_sink(&config, Box::new(|| "demo".into())).unwrap_err();
        assert!(matches!(err, FactoryError::UnknownSink(s) if s == "serial-port"));
    }

    #[test]
    fn whisper_tag_builds_a_factory() {
        let config = AppConfig::default();
        let factory = create_transcriber_factory(&config).expect("whisper is a known tag");

        // Each call yields a fresh, not-yet-initialized engine.
        let _engine = factory();
        let _another = factory();
    }

    #[test]
    fn tmux_tag_builds_a_sink() {
        let config = AppConfig::default();
        let sink = create_sink(&config, Box::new(|| "demo".into()));
        assert!(sink.is_ok());
    }
}
