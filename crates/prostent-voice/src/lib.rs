//! Text-to-speech for the Prostent backend.
//!
//! Wraps the Murf `speech/generate` API: [`TtsService::synthesize`] turns
//! text plus resolved [`VoiceSettings`](prostent_types::VoiceSettings) into
//! MPEG audio bytes, and [`TtsService::probe`] checks that the provider is
//! reachable and accepts our key.

pub mod config;
pub mod error;
pub mod tts;

pub use config::TtsConfig;
pub use error::VoiceError;
pub use tts::{TtsService, MAX_TTS_INPUT_BYTES};
