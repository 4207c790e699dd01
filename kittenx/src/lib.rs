//! Text-to-speech with the KittenTTS nano model.
//!
//! The model and its phoneme front end are external, pre-built components;
//! this crate loads them, repairs the espeak environment when a bundled
//! install is shipped next to the executable, and degrades phonemization
//! through a fallback chain when the preferred backend is unavailable.

pub mod error;
pub mod onn;
pub mod tts;
pub mod utils;

pub use error::{TtsError, TtsResult};
