use crate::tts::vocab::{REVERSE_VOCAB, VOCAB};

/// Tokenizes the given phoneme string into a vector of model token ids.
///
/// Characters outside the vocabulary are skipped; the caller is expected to
/// have filtered the string already, so a dropped character is worth a
/// warning rather than an error.
pub fn tokenize(phonemes: &str) -> Vec<i64> {
    let mut tokens = Vec::new();
    let mut dropped = Vec::new();

    for c in phonemes.chars() {
        match VOCAB.get(&c) {
            Some(&idx) => tokens.push(idx as i64),
            None => dropped.push(c),
        }
    }

    if !dropped.is_empty() {
        eprintln!(
            "Warning: dropped {} characters not in the model vocabulary: {:?}",
            dropped.len(),
            dropped
        );
    }

    tokens
}

/// Inverse of [`tokenize`], mostly useful for diagnostics.
pub fn tokens_to_phonemes(tokens: &[i64]) -> String {
    tokens
        .iter()
        .filter_map(|&t| REVERSE_VOCAB.get(&(t as usize)).copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_ipa() {
        let text = "heɪ ðɪs ɪz ˈlʌvliː!";
        let tokens = tokenize(text);

        // One token per character of the IPA string.
        assert_eq!(tokens.len(), text.chars().count());
    }

    #[test]
    fn empty_input() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn punctuation_only() {
        assert_eq!(tokenize("...").len(), 3);
    }

    #[test]
    fn round_trips_through_reverse_table() {
        let tokens = vec![24, 47, 54, 54, 57, 5];
        assert_eq!(tokens_to_phonemes(&tokens), "Hello!");

        let tokens = vec![
            0, 50, 83, 54, 156, 57, 135, 3, 16, 65, 156, 87, 158, 54, 46, 5, 0,
        ];
        assert_eq!(tokens_to_phonemes(&tokens), "$həlˈoʊ, wˈɜːld!$");
    }

    #[test]
    fn unknown_tokens_are_skipped() {
        let empty: Vec<i64> = vec![];
        assert_eq!(tokens_to_phonemes(&empty), "");
        assert_eq!(tokens_to_phonemes(&[9999]), "");
    }
}
