//! Whisper-backed [`Transcriber`] implementation.
//!
//! [`WhisperTranscriber`] owns the full listen-and-transcribe primitive the
//! session worker blocks on: a background microphone feed, an energy gate
//! that finds phrase boundaries, and a `whisper_rs::WhisperContext` that
//! turns the captured phrase into text.
//!
//! A listen call waits up to the configured timeout for speech to start
//! (returning [`ListenOutcome::TimedOut`] otherwise, so the caller can
//! re-check its stop flag), then records until the pause threshold of
//! continuous silence, then runs inference.

use std::path::{Path, PathBuf};
use std::sync::mpsc::RecvTimeoutError;
use std::time::{Duration, Instant};

use whisper_rs::{FullParams, WhisperContext, WhisperContextParameters};

use crate::audio::{resample_to_16k, rms, stereo_to_mono, MicFeed, SpeechGate};
use crate::config::ListenConfig;
use crate::stt::engine::{ListenOutcome, SttError, Transcriber};
use crate::stt::transcribe::{SamplingStrategy, TranscribeParams};

/// Shortest phrase worth handing to Whisper: 0.5 s at 16 kHz. Anything
/// shorter is treated as a spurious noise burst and reported as empty.
const MIN_PHRASE_SAMPLES: usize = 8_000;

// ---------------------------------------------------------------------------
// WhisperTranscriber
// ---------------------------------------------------------------------------

/// Production transcriber: microphone capture + Whisper inference.
///
/// Construction is cheap; all I/O (model load, device open) happens in
/// [`initialize`](Transcriber::initialize) on the session worker thread.
pub struct WhisperTranscriber {
    model_path: PathBuf,
    params: TranscribeParams,
    listen_cfg: ListenConfig,
    gate: SpeechGate,
    ctx: Option<WhisperContext>,
    mic: Option<MicFeed>,
}

impl std::fmt::Debug for WhisperTranscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperTranscriber")
            .field("model_path", &self.model_path)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

// `WhisperContext` holds a raw pointer internally but declares
// `unsafe impl Send` and `unsafe impl Sync` in whisper-rs — the model
// weights are read-only after loading. All other fields are owned values or
// Send handles (the cpal stream itself lives on the MicFeed capture thread).
// SAFETY: WhisperContext is Send+Sync as declared by whisper-rs.
unsafe impl Send for WhisperTranscriber {}

impl WhisperTranscriber {
    /// Create a transcriber that will load the GGML model at `model_path`
    /// when initialized.
    pub fn new(
        model_path: impl Into<PathBuf>,
        params: TranscribeParams,
        listen_cfg: ListenConfig,
    ) -> Self {
        let gate = SpeechGate::new(listen_cfg.energy_threshold, listen_cfg.dynamic_energy);
        Self {
            model_path: model_path.into(),
            params,
            listen_cfg,
            gate,
            ctx: None,
            mic: None,
        }
    }

    fn load_context(path: &Path) -> Result<WhisperContext, SttError> {
        if !path.exists() {
            return Err(SttError::ModelNotFound(path.display().to_string()));
        }

        let path_str = path.to_str().ok_or_else(|| {
            SttError::ModelNotFound(format!(
                "model path contains non-UTF-8 characters: {}",
                path.display()
            ))
        })?;

        let ctx_params = WhisperContextParameters::default();
        WhisperContext::new_with_params(path_str, ctx_params)
            .map_err(|e| SttError::ContextInit(e.to_string()))
    }

    /// Run Whisper over a 16 kHz mono buffer and return the trimmed text.
    fn transcribe(&self, audio: &[f32]) -> Result<String, SttError> {
        let ctx = self.ctx.as_ref().ok_or(SttError::NotInitialized)?;

        use whisper_rs::SamplingStrategy as WS;
        let ws = match self.params.strategy {
            SamplingStrategy::Greedy { best_of } => WS::Greedy { best_of },
            SamplingStrategy::BeamSearch {
                beam_size,
                patience,
            } => WS::BeamSearch {
                beam_size,
                patience,
            },
        };

        let mut fp = FullParams::new(ws);

        // set_language takes an Option<&str> whose lifetime is tied to fp.
        // Both `fp` and the borrow of `self.params.language` remain alive
        // until state.full() returns, so the borrow is valid.
        let lang: Option<&str> = if self.params.language == "auto" {
            None
        } else {
            Some(self.params.language.as_str())
        };
        fp.set_language(lang);
        fp.set_n_threads(self.params.n_threads);

        if self.params.suppress_progress {
            fp.set_print_progress(false);
            fp.set_print_realtime(false);
        }

        let mut state = ctx
            .create_state()
            .map_err(|e| SttError::ContextInit(e.to_string()))?;

        let wall_start = Instant::now();

        state
            .full(fp, audio)
            .map_err(|e| SttError::Transcription(e.to_string()))?;

        let n_segments = state
            .full_n_segments()
            .map_err(|e| SttError::Transcription(e.to_string()))?;

        let mut text = String::new();
        for i in 0..n_segments {
            let seg_text = state
                .full_get_segment_text(i)
                .map_err(|e| SttError::Transcription(format!("segment {i}: {e}")))?;
            text.push_str(&seg_text);
        }

        log::debug!(
            "inference over {:.1} s of audio took {} ms",
            audio.len() as f32 / 16_000.0,
            wall_start.elapsed().as_millis()
        );

        Ok(text.trim().to_string())
    }
}

impl Transcriber for WhisperTranscriber {
    fn initialize(&mut self) -> Result<(), SttError> {
        log::debug!("loading whisper model {}", self.model_path.display());
        let ctx = Self::load_context(&self.model_path)?;
        self.ctx = Some(ctx);

        let mic = MicFeed::open().map_err(|e| SttError::Capture(e.to_string()))?;
        self.mic = Some(mic);

        log::debug!("whisper transcriber ready");
        Ok(())
    }

    fn listen(&mut self, timeout: Duration) -> Result<ListenOutcome, SttError> {
        let mic = self.mic.as_ref().ok_or(SttError::NotInitialized)?;

        // Wait for speech to start, up to `timeout`.
        let deadline = Instant::now() + timeout;
        let (mut samples, sample_rate) = loop {
            let now = Instant::now();
            if now >= deadline {
                return Ok(ListenOutcome::TimedOut);
            }
            match mic.recv_timeout(deadline - now) {
                Ok(chunk) => {
                    let mono = stereo_to_mono(&chunk.samples, chunk.channels);
                    if self.gate.observe(rms(&mono)) {
                        break (mono, chunk.sample_rate);
                    }
                }
                Err(RecvTimeoutError::Timeout) => return Ok(ListenOutcome::TimedOut),
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(SttError::Capture("microphone stream ended".into()))
                }
            }
        };

        // Speech started — record until the pause threshold of continuous
        // silence. The full phrase is always captured; cancellation waits.
        let pause = Duration::from_secs_f32(self.listen_cfg.pause_threshold_secs);
        let mut silence = Duration::ZERO;
        loop {
            match mic.recv_timeout(pause) {
                Ok(chunk) => {
                    let mono = stereo_to_mono(&chunk.samples, chunk.channels);
                    let voiced = self.gate.observe(rms(&mono));
                    let chunk_dur =
                        Duration::from_secs_f64(mono.len() as f64 / sample_rate as f64);
                    samples.extend_from_slice(&mono);
                    if voiced {
                        silence = Duration::ZERO;
                    } else {
                        silence += chunk_dur;
                        if silence >= pause {
                            break;
                        }
                    }
                }
                // The device stopped delivering entirely; treat whatever we
                // have as the end of the phrase.
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(SttError::Capture("microphone stream ended".into()))
                }
            }
        }

        // Drop the trailing pause so Whisper does not hallucinate over
        // seconds of silence.
        let tail = (silence.as_secs_f64() * sample_rate as f64) as usize;
        samples.truncate(samples.len().saturating_sub(tail));

        let audio = resample_to_16k(&samples, sample_rate);
        if audio.len() < MIN_PHRASE_SAMPLES {
            log::debug!("captured burst too short to transcribe ({} samples)", audio.len());
            return Ok(ListenOutcome::Empty);
        }

        let text = self.transcribe(&audio)?;
        if text.is_empty() {
            Ok(ListenOutcome::Empty)
        } else {
            Ok(ListenOutcome::Phrase(text))
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
    fn initialize_missing_model_returns_model_not_found() {
        let mut engine = WhisperTranscriber::new(
            "/nonexistent/model.bin",
            TranscribeParams::default(),
            ListenConfig::default(),
        );
        let err = engine.initialize().unwrap_err();
        assert!(
            matches!(err, SttError::ModelNotFound(_)),
            "expected ModelNotFound, got: {err:?}"
        );
    }

    #[test]
    fn listen_before_initialize_errors() {
        let mut engine = WhisperTranscriber::new(
            "/nonexistent/model.bin",
            TranscribeParams::default(),
            ListenConfig::default(),
        );
        let err = engine.listen(Duration::from_millis(10)).unwrap_err();
        assert!(matches!(err, SttError::NotInitialized));
    }

    #[test]
    fn whisper_transcriber_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<WhisperTranscriber>();
    }
}
