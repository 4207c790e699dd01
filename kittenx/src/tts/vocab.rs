use lazy_static::lazy_static;
use std::collections::HashMap;

/// Build the KittenTTS nano token table (pad, punctuation, Latin letters,
/// IPA symbols). The id of a symbol is its position in the concatenation.
pub fn get_vocab() -> HashMap<char, usize> {
    let pad = "$";
    let punctuation = ";:,.!?\u{00A1}\u{00BF}\u{2014}\u{2026}\"\u{00AB}\u{00BB}\u{201C}\u{201D} ";
    let letters = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
    let letters_ipa = "ɑɐɒæɓʙβɔɕçɗɖðʤəɘɚɛɜɝɞɟʄɡɠɢʛɦɧħɥʜɨɪʝɭɬɫɮʟɱɯɰŋɳɲɴøɵɸθœɶʘɹɺɾɻʀʁɽʂʃʈʧʉʊʋⱱʌɣɤʍχʎʏʑʐʒʔʡʕʢǀǁǂǃˈˌːˑʼʴʰʱʲʷˠˤ˞↓↑→↗↘'̩'ᵻ";

    let symbols: String = [pad, punctuation, letters, letters_ipa].concat();

    symbols
        .chars()
        .enumerate()
        .map(|(idx, c)| (c, idx))
        .collect()
}

lazy_static! {
    /// Symbol to token id.
    pub static ref VOCAB: HashMap<char, usize> = get_vocab();
    /// Token id back to symbol.
    pub static ref REVERSE_VOCAB: HashMap<usize, char> =
        VOCAB.iter().map(|(&c, &idx)| (idx, c)).collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_is_token_zero() {
        assert_eq!(VOCAB.get(&'$'), Some(&0));
    }

    #[test]
    fn known_symbol_ids() {
        // Spot checks against the model's tokenizer table.
        assert_eq!(VOCAB.get(&' '), Some(&16));
        assert_eq!(VOCAB.get(&'A'), Some(&17));
        assert_eq!(VOCAB.get(&'a'), Some(&43));
        assert_eq!(VOCAB.get(&'ɹ'), Some(&123));
        assert_eq!(VOCAB.get(&'ˈ'), Some(&156));
        assert_eq!(VOCAB.get(&'ᵻ'), Some(&177));
    }

    #[test]
    fn reverse_round_trips() {
        for (&c, &idx) in VOCAB.iter() {
            assert_eq!(REVERSE_VOCAB.get(&idx), Some(&c));
        }
    }
}
