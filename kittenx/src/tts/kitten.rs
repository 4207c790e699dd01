use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use ndarray::{s, Array2};
use ndarray_npy::NpzReader;

use crate::error::{TtsError, TtsResult};
use crate::onn::ort_kitten::OrtKitten;
use crate::tts::normalize;
use crate::tts::phonemizer::{self, PhonemeSource, Phonemizer};
use crate::tts::segmentation;
use crate::tts::tokenize::tokenize;
use crate::utils::{hf_cache, wav};

/// Output sample rate of the KittenTTS nano model.
pub const SAMPLE_RATE: u32 = 24_000;

/// Width of one style vector in the voices table.
const STYLE_DIM: usize = 256;

/// Character budget per model call; long inputs are synthesized chunk by
/// chunk and concatenated.
const MAX_CHUNK_CHARS: usize = 400;

#[derive(Debug, Clone)]
pub struct SynthOpts<'a> {
    pub txt: &'a str,
    pub voice: &'a str,
    pub speed: f32,
    pub save_path: &'a str,
}

/// What a finished synthesis looked like, for result reporting.
#[derive(Debug, Clone)]
pub struct SynthSummary {
    pub file_size: u64,
    pub samples: usize,
    pub phoneme_source: PhonemeSource,
}

pub struct TtsKitten {
    model: Arc<OrtKitten>,
    styles: HashMap<String, Array2<f32>>,
    phonemizer: Phonemizer,
    verbose: bool,
}

impl TtsKitten {
    /// Load the model and voice table, resolving assets through the local
    /// cache (downloading on first use) unless explicit paths are given.
    pub async fn new(
        model_path: Option<&str>,
        voices_path: Option<&str>,
        verbose: bool,
    ) -> TtsResult<Self> {
        crate::onn::init_ort(None).map_err(TtsError::ModelLoad)?;

        let (model_path, voices_path) =
            hf_cache::ensure_files_available(model_path, voices_path, verbose).await?;

        let model = OrtKitten::from_file(&model_path)?;
        let styles = Self::load_voices(&voices_path)?;
        if styles.is_empty() {
            return Err(TtsError::ModelLoad(format!(
                "no voices found in {}",
                voices_path.display()
            )));
        }

        Ok(Self {
            model: Arc::new(model),
            styles,
            phonemizer: Phonemizer::new(verbose),
            verbose,
        })
    }

    pub fn available_voices(&self) -> Vec<String> {
        let mut voices: Vec<String> = self.styles.keys().cloned().collect();
        voices.sort();
        voices
    }

    pub fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    /// Synthesize raw mono samples, reporting the most degraded phoneme
    /// tier that was used across chunks.
    pub fn synth_raw_audio(
        &self,
        txt: &str,
        voice: &str,
        speed: f32,
    ) -> TtsResult<(Vec<f32>, PhonemeSource)> {
        if !self.styles.contains_key(voice) {
            return Err(TtsError::VoiceNotFound(format!(
                "{}. Supported: {}",
                voice,
                self.available_voices().join(", ")
            )));
        }

        let text = normalize::normalize_text(txt);
        if text.is_empty() {
            return Err(TtsError::InvalidInput(
                "no speakable text after normalization".to_string(),
            ));
        }

        let chunks = chunk_text(&text, MAX_CHUNK_CHARS);
        let mut final_audio = Vec::new();
        let mut source = PhonemeSource::EspeakNg;

        for chunk in chunks {
            let (ipa, chunk_source) = self.phonemizer.phonemize(&chunk);
            source = source.worse(chunk_source);

            let ps = phonemizer::filter_to_vocab(&ipa);
            let tokens = tokenize(&ps);
            if tokens.is_empty() {
                return Err(TtsError::Phonemize(format!(
                    "no usable phonemes for chunk: {:?}",
                    chunk
                )));
            }

            let style = self.style_for(voice, tokens.len())?;

            // Model contract: pad token id 0 at both ends.
            let mut padded = Vec::with_capacity(tokens.len() + 2);
            padded.push(0);
            padded.extend_from_slice(&tokens);
            padded.push(0);

            let audio = self.model.infer(padded, style, speed)?;
            if self.verbose {
                eprintln!(
                    "chunk synthesized: {} tokens -> {} samples",
                    tokens.len(),
                    audio.len()
                );
            }
            final_audio.extend(audio.iter().copied());
        }

        Ok((final_audio, source))
    }

    /// Synthesize to a WAV file and verify the result landed on disk.
    pub fn synth(
        &self,
        SynthOpts {
            txt,
            voice,
            speed,
            save_path,
        }: SynthOpts,
    ) -> TtsResult<SynthSummary> {
        let (audio, phoneme_source) = self.synth_raw_audio(txt, voice, speed)?;

        wav::write_mono_f32(save_path, &audio, SAMPLE_RATE)?;

        let metadata = std::fs::metadata(save_path)
            .map_err(|e| TtsError::AudioOutput(format!("output file not created: {}", e)))?;
        if metadata.len() == 0 {
            return Err(TtsError::AudioOutput(format!(
                "output file is empty: {}",
                save_path
            )));
        }

        if self.verbose {
            eprintln!("Audio saved to {}", save_path);
        }

        Ok(SynthSummary {
            file_size: metadata.len(),
            samples: audio.len(),
            phoneme_source,
        })
    }

    /// Style vector for a voice, indexed by token count. The nano voice
    /// tables ship a single row; longer tables index by sequence length.
    fn style_for(&self, voice: &str, token_len: usize) -> TtsResult<Array2<f32>> {
        let table = self.styles.get(voice).ok_or_else(|| {
            TtsError::VoiceNotFound(format!(
                "{}. Supported: {}",
                voice,
                self.available_voices().join(", ")
            ))
        })?;
        let row = token_len.min(table.nrows().saturating_sub(1));
        Ok(table.slice(s![row..=row, ..]).to_owned())
    }

    fn load_voices(voices_path: &Path) -> TtsResult<HashMap<String, Array2<f32>>> {
        let file = File::open(voices_path)?;
        let mut npz = NpzReader::new(file)
            .map_err(|e| TtsError::ModelLoad(format!("{}: {}", voices_path.display(), e)))?;

        let names = npz
            .names()
            .map_err(|e| TtsError::ModelLoad(format!("{}: {}", voices_path.display(), e)))?;

        let mut map = HashMap::new();
        for name in names {
            let styles: Array2<f32> = npz
                .by_name(&name)
                .map_err(|e| TtsError::ModelLoad(format!("voice {}: {}", name, e)))?;
            if styles.ncols() != STYLE_DIM {
                return Err(TtsError::ModelLoad(format!(
                    "voice {} has style width {}, expected {}",
                    name,
                    styles.ncols(),
                    STYLE_DIM
                )));
            }
            map.insert(name.trim_end_matches(".npy").to_string(), styles);
        }

        Ok(map)
    }
}

/// Pack sentences greedily into chunks of at most `max_len` characters; a
/// single oversized sentence is force-split on whitespace.
fn chunk_text(text: &str, max_len: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in segmentation::split_into_sentences(text) {
        if sentence.chars().count() > max_len {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            let mut piece = String::new();
            for word in sentence.split_whitespace() {
                if !piece.is_empty()
                    && piece.chars().count() + 1 + word.chars().count() > max_len
                {
                    chunks.push(std::mem::take(&mut piece));
                }
                if !piece.is_empty() {
                    piece.push(' ');
                }
                piece.push_str(word);
            }
            if !piece.is_empty() {
                chunks.push(piece);
            }
            continue;
        }

        if !current.is_empty() && current.chars().count() + 1 + sentence.chars().count() > max_len
        {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&sentence);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        let chunks = chunk_text("Hello world. How are you?", 400);
        assert_eq!(chunks, vec!["Hello world. How are you?"]);
    }

    #[test]
    fn sentences_pack_up_to_the_budget() {
        let chunks = chunk_text("One two three. Four five six. Seven eight nine.", 32);
        assert_eq!(
            chunks,
            vec!["One two three. Four five six.", "Seven eight nine."]
        );
    }

    #[test]
    fn oversized_sentence_splits_on_whitespace() {
        let long = "word ".repeat(30).trim_end().to_string();
        let chunks = chunk_text(&long, 20);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 20);
        }
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("", 400).is_empty());
    }
}
