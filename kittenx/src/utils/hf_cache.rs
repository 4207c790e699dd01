use std::path::PathBuf;
use std::time::Duration;

use dirs::cache_dir;
use hf_hub::api::tokio::Api;
use indicatif::ProgressBar;

use crate::error::{TtsError, TtsResult};

const HF_REPO: &str = "KittenML/kitten-tts-nano-0.1";
const MODEL_FILE: &str = "kitten_tts_nano_v0_1.onnx";
const VOICES_FILE: &str = "voices.npz";

/// Local cache directory for model assets.
pub fn get_cache_dir() -> PathBuf {
    cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kitten-tts")
}

pub fn get_model_path() -> PathBuf {
    get_cache_dir().join(MODEL_FILE)
}

pub fn get_voices_path() -> PathBuf {
    get_cache_dir().join(VOICES_FILE)
}

/// Resolve the model and voices files, downloading into the cache when
/// nothing is there yet. Explicit paths bypass the cache and must exist.
pub async fn ensure_files_available(
    custom_model_path: Option<&str>,
    custom_voices_path: Option<&str>,
    verbose: bool,
) -> TtsResult<(PathBuf, PathBuf)> {
    let model_path = match custom_model_path {
        Some(path) => {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(TtsError::ModelLoad(format!(
                    "custom model path does not exist: {}",
                    path.display()
                )));
            }
            path
        }
        None => {
            let cache_path = get_model_path();
            if cache_path.exists() {
                if verbose {
                    eprintln!("Using cached model: {}", cache_path.display());
                }
                cache_path
            } else {
                download_file(MODEL_FILE, &cache_path).await?
            }
        }
    };

    let voices_path = match custom_voices_path {
        Some(path) => {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(TtsError::ModelLoad(format!(
                    "custom voices path does not exist: {}",
                    path.display()
                )));
            }
            path
        }
        None => {
            let cache_path = get_voices_path();
            if cache_path.exists() {
                if verbose {
                    eprintln!("Using cached voices: {}", cache_path.display());
                }
                cache_path
            } else {
                download_file(VOICES_FILE, &cache_path).await?
            }
        }
    };

    Ok((model_path, voices_path))
}

/// Fetch one file from the model repository and copy it into the cache
/// under a stable name.
async fn download_file(file: &str, target: &PathBuf) -> TtsResult<PathBuf> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("Downloading {} from {}", file, HF_REPO));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let api = Api::new().map_err(|e| TtsError::ModelDownload(e.to_string()))?;
    let repo = api.model(HF_REPO.to_string());
    let fetched = repo
        .get(file)
        .await
        .map_err(|e| TtsError::ModelDownload(format!("{}: {}", file, e)))?;

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(&fetched, target)?;

    spinner.finish_with_message(format!("{} cached at {}", file, target.display()));
    Ok(target.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_paths_share_one_directory() {
        let model = get_model_path();
        let voices = get_voices_path();
        assert_eq!(model.parent(), voices.parent());
        assert!(model.ends_with(MODEL_FILE));
        assert!(voices.ends_with(VOICES_FILE));
    }

    #[test]
    fn missing_custom_path_is_rejected() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let result = rt.block_on(ensure_files_available(
            Some("/definitely/not/a/model.onnx"),
            None,
            false,
        ));
        assert!(matches!(result, Err(TtsError::ModelLoad(_))));
    }
}
