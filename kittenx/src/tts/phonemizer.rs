use espeak_rs::text_to_phonemes;

use crate::tts::espeak::{self, EspeakInstall};
use crate::tts::vocab::VOCAB;

/// Which tier of the fallback chain produced a phoneme string. Ordered from
/// best to worst so a multi-chunk run can report its most degraded tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PhonemeSource {
    /// Native espeak-ng bindings.
    EspeakNg,
    /// espeak executable invoked as a subprocess.
    EspeakCli,
    /// Hand-written character substitution, last resort.
    CharMap,
}

impl PhonemeSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhonemeSource::EspeakNg => "espeak-ng",
            PhonemeSource::EspeakCli => "espeak-cli",
            PhonemeSource::CharMap => "char-map",
        }
    }

    /// The more degraded of two sources.
    pub fn worse(self, other: Self) -> Self {
        self.max(other)
    }
}

pub struct Phonemizer {
    lang: String,
    preserve_punctuation: bool,
    with_stress: bool,
    install: Option<EspeakInstall>,
    verbose: bool,
}

impl Phonemizer {
    pub fn new(verbose: bool) -> Self {
        Phonemizer {
            lang: "en-us".to_string(),
            preserve_punctuation: true,
            with_stress: true,
            install: espeak::locate(),
            verbose,
        }
    }

    /// Convert text to IPA, degrading through the fallback chain. Each tier
    /// failure is warned about on stderr instead of being silently absorbed.
    pub fn phonemize(&self, text: &str) -> (String, PhonemeSource) {
        match self.phonemize_native(text) {
            Ok(ipa) => {
                if self.verbose {
                    eprintln!("phonemes (espeak-ng): {} -> {}", text, ipa);
                }
                return (ipa, PhonemeSource::EspeakNg);
            }
            Err(err) => eprintln!(
                "Warning: espeak-ng bindings failed ({}), trying the espeak executable",
                err
            ),
        }

        match self.phonemize_command(text) {
            Ok(ipa) => {
                if self.verbose {
                    eprintln!("phonemes (espeak-cli): {} -> {}", text, ipa);
                }
                return (ipa, PhonemeSource::EspeakCli);
            }
            Err(err) => eprintln!(
                "Warning: espeak executable failed ({}), falling back to character substitution",
                err
            ),
        }

        (basic_ipa(text), PhonemeSource::CharMap)
    }

    fn phonemize_native(&self, text: &str) -> Result<String, String> {
        let phonemes = text_to_phonemes(
            text,
            &self.lang,
            None,
            self.preserve_punctuation,
            self.with_stress,
        )
        .map_err(|e| e.to_string())?;

        let joined = phonemes.join("");
        if joined.trim().is_empty() {
            return Err("empty phoneme output".to_string());
        }
        Ok(joined.trim().to_string())
    }

    fn phonemize_command(&self, text: &str) -> Result<String, String> {
        let install = self
            .install
            .as_ref()
            .ok_or_else(|| "no espeak executable found".to_string())?;
        espeak::ipa_via_command(install, text)
    }
}

/// Last-resort text-to-IPA mapping. Crude, but the model degrades far more
/// gracefully on it than on raw English orthography. Digraphs go first so
/// "th" never splits into "t" + mapped "h".
pub fn basic_ipa(text: &str) -> String {
    let mut out = text.to_lowercase();
    for (plain, ipa) in [
        ("th", "θ"),
        ("sh", "ʃ"),
        ("ch", "ʧ"),
        ("ng", "ŋ"),
        ("a", "æ"),
        ("e", "ɛ"),
        ("i", "ɪ"),
        ("o", "ɔ"),
        ("u", "ʊ"),
    ] {
        out = out.replace(plain, ipa);
    }
    out
}

/// Keep only characters the model vocabulary knows.
pub fn filter_to_vocab(phonemes: &str) -> String {
    phonemes.chars().filter(|c| VOCAB.contains_key(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_ipa_maps_vowels() {
        assert_eq!(basic_ipa("cat"), "cæt");
    }

    #[test]
    fn basic_ipa_digraphs_before_vowels() {
        assert_eq!(basic_ipa("thing"), "θɪŋ");
        assert_eq!(basic_ipa("this ship"), "θɪs ʃɪp");
    }

    #[test]
    fn basic_ipa_lowercases() {
        assert_eq!(basic_ipa("CHAT"), "ʧæt");
    }

    #[test]
    fn basic_ipa_output_survives_vocab_filter() {
        let ipa = basic_ipa("the quick brown fox chews 'thorny' shrubs");
        let filtered = filter_to_vocab(&ipa);
        assert_eq!(filtered, ipa);
    }

    #[test]
    fn filter_drops_unknown_characters() {
        assert_eq!(filter_to_vocab("həlˈoʊ\u{200B}!"), "həlˈoʊ!");
    }

    #[test]
    fn source_ordering() {
        use PhonemeSource::*;
        assert_eq!(EspeakNg.worse(EspeakCli), EspeakCli);
        assert_eq!(CharMap.worse(EspeakNg), CharMap);
        assert_eq!(EspeakNg.worse(EspeakNg), EspeakNg);
        assert_eq!(EspeakCli.as_str(), "espeak-cli");
    }
}
