//! Error types for the synthesis engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TtsError {
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    #[error("failed to download model assets: {0}")]
    ModelDownload(String),

    #[error("voice not found: {0}")]
    VoiceNotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("phonemization failed: {0}")]
    Phonemize(String),

    #[error("synthesis failed: {0}")]
    Synthesis(String),

    #[error("audio output error: {0}")]
    AudioOutput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TtsResult<T> = Result<T, TtsError>;
