/// Sentence segmentation used to keep synthesis chunks small.
///
/// Avoids breaking inside quoted passages, after ordinals ("1. item"),
/// inside decimals ("3.14"), and after abbreviations followed by a
/// lowercase continuation.
pub fn split_into_sentences(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut quote_depth = 0i32;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        current.push(ch);

        match ch {
            // ASCII double quote toggles (same char for open and close)
            '"' => {
                if quote_depth > 0 {
                    quote_depth -= 1;
                } else {
                    quote_depth += 1;
                }
            }
            '\u{201C}' | '\u{00AB}' => quote_depth += 1,
            '\u{201D}' | '\u{00BB}' => quote_depth = (quote_depth - 1).max(0),
            _ => {}
        }

        if ch == '.' || ch == '!' || ch == '?' {
            let mut ends_sentence = true;

            if ch == '.' {
                let after_digit = i > 0 && chars[i - 1].is_ascii_digit();
                if after_digit && next_is(&chars, i, |c| c.is_whitespace()) && i + 2 < chars.len() {
                    // Ordinal like "1. item"
                    ends_sentence = false;
                } else if next_is(&chars, i, |c| c.is_ascii_digit()) {
                    // Decimal like "3.14"
                    ends_sentence = false;
                } else if next_is(&chars, i, |c| c.is_whitespace())
                    && i + 2 < chars.len()
                    && chars[i + 2].is_lowercase()
                {
                    // Abbreviation with a lowercase continuation
                    ends_sentence = false;
                }
            }

            if quote_depth > 0 {
                // Inside a quote the sentence only ends when the quote closes
                // right after the punctuation and the text moves on.
                match chars.get(i + 1) {
                    Some(&next) if is_closing_quote(next) => match chars.get(i + 2) {
                        Some(c2) if c2.is_whitespace() => match chars.get(i + 3) {
                            Some(c3) if c3.is_lowercase() => ends_sentence = false,
                            _ => {
                                i += 1;
                                current.push(chars[i]);
                                quote_depth = (quote_depth - 1).max(0);
                                ends_sentence = true;
                            }
                        },
                        Some(_) => ends_sentence = false,
                        None => {
                            i += 1;
                            current.push(chars[i]);
                            quote_depth = (quote_depth - 1).max(0);
                            ends_sentence = true;
                        }
                    },
                    Some(_) => ends_sentence = false,
                    None => ends_sentence = true,
                }
            }

            if ends_sentence {
                while i + 1 < chars.len() && chars[i + 1].is_whitespace() {
                    i += 1;
                    current.push(chars[i]);
                }

                let trimmed = current.trim();
                if !trimmed.is_empty() {
                    sentences.push(trimmed.to_string());
                }
                current.clear();
            }
        }

        i += 1;
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }

    sentences
}

fn is_closing_quote(c: char) -> bool {
    c == '"' || c == '\u{201D}' || c == '\u{00BB}'
}

fn next_is(chars: &[char], i: usize, pred: impl Fn(char) -> bool) -> bool {
    chars.get(i + 1).map(|&c| pred(c)).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_sentences() {
        let result = split_into_sentences("Hello world. How are you?");
        assert_eq!(result, vec!["Hello world.", "How are you?"]);
    }

    #[test]
    fn ordinal_numbers_stay_joined() {
        let result = split_into_sentences("1. First item 2. Second item 3. Third item");
        assert_eq!(result, vec!["1. First item 2. Second item 3. Third item"]);
    }

    #[test]
    fn decimal_numbers_stay_joined() {
        let result = split_into_sentences("The value is 3.14 and it works.");
        assert_eq!(result, vec!["The value is 3.14 and it works."]);
    }

    #[test]
    fn quoted_passages_stay_joined() {
        let result = split_into_sentences("He said \"Hello. How are you?\" and left.");
        assert_eq!(result, vec!["He said \"Hello. How are you?\" and left."]);

        let result = split_into_sentences("She replied \u{201C}I'm fine. Thanks!\u{201D} quickly.");
        assert_eq!(
            result,
            vec!["She replied \u{201C}I'm fine. Thanks!\u{201D} quickly."]
        );
    }

    #[test]
    fn sentence_ending_with_quote() {
        let result = split_into_sentences("He said \"Hello.\" Then he left.");
        assert_eq!(result, vec!["He said \"Hello.\"", "Then he left."]);
    }

    #[test]
    fn abbreviation_with_lowercase_continuation() {
        let result = split_into_sentences("Dr. smith is here.");
        assert_eq!(result, vec!["Dr. smith is here."]);
    }
}
