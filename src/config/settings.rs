//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// Settings for the Whisper speech-to-text engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttConfig {
    /// GGML model file stem under the models directory (e.g. `"ggml-base.en"`).
    pub model: String,
    /// Primary speech language as an ISO-639-1 code, or `"auto"` for
    /// Whisper's built-in language detection.
    pub language: String,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model: "ggml-large-v3".into(),
            language: "en".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// ListenConfig
// ---------------------------------------------------------------------------

/// Settings that control phrase capture between transcriptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenConfig {
    /// Maximum seconds to wait for speech to start before the listen call
    /// returns a timeout and the session re-checks its stop flag. This is
    /// the cancellation latency bound while idle.
    pub timeout_secs: f32,
    /// Seconds of continuous silence that end a phrase once speech has
    /// started.
    pub pause_threshold_secs: f32,
    /// RMS amplitude floor below which a chunk is treated as silence.
    /// Typical quiet-room value is `0.01`; raise it in noisy environments.
    pub energy_threshold: f32,
    /// Adapt the effective threshold to ambient noise measured between
    /// phrases.
    pub dynamic_energy: bool,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 2.0,
            pause_threshold_secs: 2.0,
            energy_threshold: 0.01,
            dynamic_energy: true,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use voice_to_session::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Which transcriber implementation to build (`"whisper"`).
    pub transcriber: String,
    /// Where transcribed text is sent (`"tmux"`).
    pub sink: String,
    /// Name of the tmux session that receives dictated text.
    pub target: String,
    /// Ask the agent in the target session to vocalize a short summary of
    /// each of its responses (macOS only; no-op elsewhere).
    pub vocalize_response: bool,
    /// Log all operational detail instead of only start/stop/errors.
    pub debug: bool,
    /// Speech-to-text engine settings.
    pub stt: SttConfig,
    /// Phrase capture settings.
    pub listen: ListenConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            transcriber: "whisper".into(),
            sink: "tmux".into(),
            target: "ai-voice-input".into(),
            vocalize_response: false,
            debug: false,
            stt: SttConfig::default(),
            listen: ListenConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify that a default `AppConfig` can be serialised to TOML and
    /// deserialised back without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.transcriber, loaded.transcriber);
        assert_eq!(original.sink, loaded.sink);
        assert_eq!(original.target, loaded.target);
        assert_eq!(original.vocalize_response, loaded.vocalize_response);
        assert_eq!(original.debug, loaded.debug);

        assert_eq!(original.stt.model, loaded.stt.model);
        assert_eq!(original.stt.language, loaded.stt.language);

        assert_eq!(original.listen.timeout_secs, loaded.listen.timeout_secs);
        assert_eq!(
            original.listen.pause_threshold_secs,
            loaded.listen.pause_threshold_secs
        );
        assert_eq!(
            original.listen.energy_threshold,
            loaded.listen.energy_threshold
        );
        assert_eq!(original.listen.dynamic_energy, loaded.listen.dynamic_energy);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        let default = AppConfig::default();

        assert_eq!(config.transcriber, default.transcriber);
        assert_eq!(config.sink, default.sink);
        assert_eq!(config.target, default.target);
        assert_eq!(config.stt.model, default.stt.model);
        assert_eq!(config.listen.timeout_secs, default.listen.timeout_secs);
    }

    /// Verify default values.
    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.transcriber, "whisper");
        assert_eq!(cfg.sink, "tmux");
        assert_eq!(cfg.target, "ai-voice-input");
        assert!(!cfg.vocalize_response);
        assert!(!cfg.debug);
        assert_eq!(cfg.stt.language, "en");
        assert_eq!(cfg.listen.timeout_secs, 2.0);
        assert_eq!(cfg.listen.pause_threshold_secs, 2.0);
        assert!(cfg.listen.dynamic_energy);
    }

    /// Verify that modified non-default values survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.target = "pair-review".into();
        cfg.vocalize_response = true;
        cfg.stt.model = "ggml-base.en".into();
        cfg.stt.language = "auto".into();
        cfg.listen.timeout_secs = 1.0;
        cfg.listen.pause_threshold_secs = 3.5;
        cfg.listen.energy_threshold = 0.05;
        cfg.listen.dynamic_energy = false;

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.target, "pair-review");
        assert!(loaded.vocalize_response);
        assert_eq!(loaded.stt.model, "ggml-base.en");
        assert_eq!(loaded.stt.language, "auto");
        assert_eq!(loaded.listen.timeout_secs, 1.0);
        assert_eq!(loaded.listen.pause_threshold_secs, 3.5);
        assert_eq!(loaded.listen.energy_threshold, 0.05);
        assert!(!loaded.listen.dynamic_energy);
    }
}
