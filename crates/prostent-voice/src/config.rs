use prostent_types::VoiceSettings;
use serde::Deserialize;
use std::fmt;

fn default_base_url() -> String {
    "https://api.murf.ai/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_probe_timeout_secs() -> u64 {
    5
}

#[derive(Clone, Deserialize)]
pub struct TtsConfig {
    /// API root including the version segment.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    /// Timeout for synthesis requests, in seconds. Default: 60.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Timeout for health probes, in seconds. Default: 5.
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    /// Voice parameters used when a request leaves them out.
    #[serde(default)]
    pub default_voice: VoiceSettings,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
            default_voice: VoiceSettings::default(),
        }
    }
}

impl fmt::Debug for TtsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtsConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .field("probe_timeout_secs", &self.probe_timeout_secs)
            .field("default_voice", &self.default_voice)
            .finish()
    }
}
