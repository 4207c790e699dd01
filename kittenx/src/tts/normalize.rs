use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref SPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    static ref DOCTOR_RE: Regex = Regex::new(r"\bDr\.\s+([A-Z])").unwrap();
    static ref MISTER_RE: Regex = Regex::new(r"\bMr\.\s+([A-Z])").unwrap();
    static ref MISSUS_RE: Regex = Regex::new(r"\bMrs\.\s+([A-Z])").unwrap();
    static ref MISS_RE: Regex = Regex::new(r"\bMs\.\s+([A-Z])").unwrap();
    static ref ETC_RE: Regex = Regex::new(r"\betc\.").unwrap();
    static ref ACRONYM_RE: Regex = Regex::new(r"\b(?:[A-Za-z]\.){2,}").unwrap();
    static ref MONEY_RE: Regex = Regex::new(r"[$£]\d+(?:\.\d+)?").unwrap();
    static ref DECIMAL_RE: Regex = Regex::new(r"\d*\.\d+").unwrap();
    static ref COMMA_NUM_RE: Regex = Regex::new(r"(\d),(\d)").unwrap();
    static ref RANGE_RE: Regex = Regex::new(r"(\d)-(\d)").unwrap();
    static ref NUMBER_RE: Regex = Regex::new(r"\b\d+\b").unwrap();
}

const SMALL: [&str; 21] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen", "twenty",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

/// Normalize raw English text for phonemization: digits, currency and
/// abbreviations are not in the model vocabulary and have to become words.
pub fn normalize_text(text: &str) -> String {
    let mut text = text.to_string();

    // Fold typographic quotes; the vocabulary knows plain ones.
    text = text.replace(['\u{2018}', '\u{2019}'], "'");
    text = text.replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"");

    text = DOCTOR_RE.replace_all(&text, "Doctor ${1}").to_string();
    text = MISTER_RE.replace_all(&text, "Mister ${1}").to_string();
    text = MISSUS_RE.replace_all(&text, "Missus ${1}").to_string();
    text = MISS_RE.replace_all(&text, "Miss ${1}").to_string();
    text = ETC_RE.replace_all(&text, "etcetera").to_string();

    // "U.S.A." reads as letters, not sentence ends.
    text = ACRONYM_RE
        .replace_all(&text, |caps: &Captures| {
            caps[0].trim_end_matches('.').replace('.', "-")
        })
        .to_string();

    // Money before bare numbers so the unit lands after the amount.
    text = MONEY_RE
        .replace_all(&text, |caps: &Captures| expand_money(&caps[0]))
        .to_string();

    // 1,000 -> 1000
    text = COMMA_NUM_RE.replace_all(&text, "${1}${2}").to_string();

    // Decimals before integers so "3.14" keeps its point.
    text = DECIMAL_RE
        .replace_all(&text, |caps: &Captures| expand_decimal(&caps[0]))
        .to_string();

    // 3-4 -> 3 to 4
    text = RANGE_RE.replace_all(&text, "${1} to ${2}").to_string();

    text = NUMBER_RE
        .replace_all(&text, |caps: &Captures| expand_number(&caps[0]))
        .to_string();

    text = SPACE_RE.replace_all(&text, " ").to_string();
    text.trim().to_string()
}

/// Cardinal (and year-aware) number expansion for English.
pub fn expand_number(num_str: &str) -> String {
    if num_str.len() == 4 && num_str.chars().all(|c| c.is_ascii_digit()) {
        let year = num_str.parse::<i64>().unwrap_or(0);
        if (1000..=2099).contains(&year) {
            return expand_year(year);
        }
    }

    match num_str.parse::<i64>() {
        Ok(num) => expand_cardinal(num),
        Err(_) => num_str.to_string(),
    }
}

/// "3.14" -> "three point one four"
pub fn expand_decimal(num_str: &str) -> String {
    let (whole, frac) = match num_str.split_once('.') {
        Some(parts) => parts,
        None => return expand_number(num_str),
    };

    let whole_words = if whole.is_empty() {
        "zero".to_string()
    } else {
        whole
            .parse::<i64>()
            .map(expand_cardinal)
            .unwrap_or_else(|_| whole.to_string())
    };

    let digits: Vec<&str> = frac
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| SMALL[d as usize])
        .collect();

    format!("{} point {}", whole_words, digits.join(" "))
}

fn expand_year(year: i64) -> String {
    // 2000-2009 read as cardinals ("two thousand five"), everything else
    // century-first ("nineteen eighty-five", "nineteen oh five").
    if (2000..=2009).contains(&year) {
        return expand_cardinal(year);
    }

    let century = year / 100;
    let remainder = year % 100;
    if remainder == 0 {
        format!("{} hundred", expand_cardinal(century))
    } else if remainder < 10 {
        format!("{} oh {}", expand_cardinal(century), expand_cardinal(remainder))
    } else {
        format!("{} {}", expand_cardinal(century), expand_cardinal(remainder))
    }
}

fn expand_cardinal(num: i64) -> String {
    if num < 0 {
        return format!("negative {}", expand_cardinal(-num));
    }

    if num <= 20 {
        return SMALL[num as usize].to_string();
    }

    if num < 100 {
        let tens = TENS[(num / 10) as usize];
        let ones = num % 10;
        if ones == 0 {
            return tens.to_string();
        }
        return format!("{}-{}", tens, SMALL[ones as usize]);
    }

    if num < 1000 {
        let hundreds = expand_cardinal(num / 100);
        let remainder = num % 100;
        if remainder == 0 {
            return format!("{} hundred", hundreds);
        }
        return format!("{} hundred and {}", hundreds, expand_cardinal(remainder));
    }

    if num < 1_000_000 {
        let thousands = expand_cardinal(num / 1000);
        let remainder = num % 1000;
        if remainder == 0 {
            return format!("{} thousand", thousands);
        }
        return format!("{} thousand {}", thousands, expand_cardinal(remainder));
    }

    if num < 1_000_000_000 {
        let millions = expand_cardinal(num / 1_000_000);
        let remainder = num % 1_000_000;
        if remainder == 0 {
            return format!("{} million", millions);
        }
        return format!("{} million {}", millions, expand_cardinal(remainder));
    }

    // Past a billion the expansion stops helping the listener.
    num.to_string()
}

fn expand_money(money: &str) -> String {
    let (unit, singular) = if money.starts_with('£') {
        ("pounds", "pound")
    } else {
        ("dollars", "dollar")
    };
    let amount = money.trim_start_matches(['$', '£']);

    match amount.split_once('.') {
        Some((whole, cents)) => {
            let cents_num = cents.parse::<i64>().unwrap_or(0);
            let whole_words = expand_number(whole);
            let unit_words = if whole == "1" { singular } else { unit };
            if cents_num == 0 {
                format!("{} {}", whole_words, unit_words)
            } else {
                let cent_unit = if cents_num == 1 { "cent" } else { "cents" };
                format!(
                    "{} {} and {} {}",
                    whole_words,
                    unit_words,
                    expand_cardinal(cents_num),
                    cent_unit
                )
            }
        }
        None => {
            let unit_words = if amount == "1" { singular } else { unit };
            format!("{} {}", expand_number(amount), unit_words)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinals() {
        assert_eq!(expand_number("0"), "zero");
        assert_eq!(expand_number("7"), "seven");
        assert_eq!(expand_number("21"), "twenty-one");
        assert_eq!(expand_number("100"), "one hundred");
        assert_eq!(expand_number("342"), "three hundred and forty-two");
        assert_eq!(expand_number("5000"), "five thousand");
        assert_eq!(
            expand_number("12345"),
            "twelve thousand three hundred and forty-five"
        );
    }

    #[test]
    fn years() {
        assert_eq!(expand_number("1985"), "nineteen eighty-five");
        assert_eq!(expand_number("1905"), "nineteen oh five");
        assert_eq!(expand_number("1900"), "nineteen hundred");
        assert_eq!(expand_number("2000"), "two thousand");
        assert_eq!(expand_number("2005"), "two thousand five");
        assert_eq!(expand_number("2020"), "twenty twenty");
    }

    #[test]
    fn decimals() {
        assert_eq!(expand_decimal("3.14"), "three point one four");
        assert_eq!(expand_decimal(".5"), "zero point five");
    }

    #[test]
    fn money() {
        assert_eq!(
            normalize_text("It costs $5."),
            "It costs five dollars."
        );
        assert_eq!(
            normalize_text("He paid $5.50 for it."),
            "He paid five dollars and fifty cents for it."
        );
        assert_eq!(normalize_text("Just £1."), "Just one pound.");
    }

    #[test]
    fn abbreviations_and_acronyms() {
        assert_eq!(normalize_text("Dr. Smith is in."), "Doctor Smith is in.");
        assert_eq!(normalize_text("The U.S.A. won."), "The U-S-A won.");
    }

    #[test]
    fn normalizes_mixed_text() {
        assert_eq!(
            normalize_text("Mr. Jones bought 3-4 of the 1,000 items in 1985."),
            "Mister Jones bought three to four of the one thousand items in nineteen eighty-five."
        );
    }

    #[test]
    fn folds_typographic_quotes() {
        assert_eq!(
            normalize_text("\u{201C}It\u{2019}s fine\u{201D}"),
            "\"It's fine\""
        );
    }
}
