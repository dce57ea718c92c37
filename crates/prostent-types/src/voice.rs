//! Voice settings for speech synthesis.
//!
//! A `VoiceSettings` value is the fully resolved set of parameters sent to
//! the TTS provider. Requests may leave any of them out; the gaps are filled
//! from the configured defaults with [`VoiceSettings::merged`].

use serde::{Deserialize, Serialize};

/// Voice used when neither the request nor the config names one.
pub const DEFAULT_VOICE_ID: &str = "en-US-thomas";

/// Emotion tone used when none is requested.
pub const DEFAULT_EMOTION: &str = "Neutral";

/// Resolved voice parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VoiceSettings {
    /// Provider voice identifier (e.g. `en-US-thomas`).
    pub voice_id: String,
    /// Speech rate multiplier (1.0 is normal).
    pub rate: f32,
    /// Pitch multiplier (1.0 is normal).
    pub pitch: f32,
    /// Emotion tone label understood by the provider.
    pub emotion: String,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            voice_id: DEFAULT_VOICE_ID.to_string(),
            rate: 1.0,
            pitch: 1.0,
            emotion: DEFAULT_EMOTION.to_string(),
        }
    }
}

impl VoiceSettings {
    /// Fills every missing field from `self`.
    ///
    /// Blank strings and a zero rate or pitch count as missing, so a client
    /// sending `"rate": 0` gets the default rate.
    pub fn merged(
        &self,
        voice_id: Option<String>,
        rate: Option<f32>,
        pitch: Option<f32>,
        emotion: Option<String>,
    ) -> Self {
        Self {
            voice_id: voice_id
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| self.voice_id.clone()),
            rate: rate.filter(|r| *r != 0.0).unwrap_or(self.rate),
            pitch: pitch.filter(|p| *p != 0.0).unwrap_or(self.pitch),
            emotion: emotion
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| self.emotion.clone()),
        }
    }
}
