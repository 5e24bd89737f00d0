use once_cell::sync::Lazy;
use regex::Regex;

// Card chrome and filler that must never be mistaken for the holder's name.
static NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)cleaned and normalized|gender|date of birth|address|aadhaar|uidai|government|authority",
    )
    .unwrap()
});
static NUMBER_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]{4}\s?[0-9]{4}\s?[0-9]{4}").unwrap());
static DATE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{2}/[0-9]{2}/[0-9]{4}").unwrap());
static GENDER_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)male|female|transgender").unwrap());
// Allowed name scripts: Latin plus the Devanagari block.
static LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z\u{0900}-\u{097F}]").unwrap());
static NON_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\u{0900}-\u{097F}A-Za-z\s]").unwrap());
static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Scan the front-side text top to bottom and return the first line that
/// plausibly holds a person's name: not chrome, not a number, date or gender
/// token, with at least two letters spread over at least two words.
pub fn extract_name(front_text: &str) -> Option<String> {
    front_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .find(|line| is_name_line(line))
        .map(clean_name)
}

fn is_name_line(line: &str) -> bool {
    if NOISE.is_match(line)
        || NUMBER_RUN.is_match(line)
        || DATE_TOKEN.is_match(line)
        || GENDER_WORD.is_match(line)
    {
        return false;
    }
    LETTER.find_iter(line).count() >= 2 && line.split_whitespace().count() >= 2
}

fn clean_name(line: &str) -> String {
    let stripped = NON_NAME.replace_all(line, " ");
    SPACE_RUN.replace_all(&stripped, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::extract_name;

    #[test]
    fn first_plausible_line_wins() {
        let front = "Government of India\nRAJ KUMAR\nS/O Mohan Kumar";
        assert_eq!(extract_name(front).as_deref(), Some("RAJ KUMAR"));
    }

    #[test]
    fn chrome_numbers_dates_and_gender_lines_are_skipped() {
        let front = "Unique Identification Authority\n1234 5678 9012\n15/08/1990\nMALE\nRAJ KUMAR";
        assert_eq!(extract_name(front).as_deref(), Some("RAJ KUMAR"));
    }

    #[test]
    fn single_word_lines_do_not_qualify() {
        assert_eq!(extract_name("RAJ\nKUMAR"), None);
    }

    #[test]
    fn stray_punctuation_and_digits_are_stripped_from_the_name() {
        assert_eq!(
            extract_name("RAJ: KUMAR, 42").as_deref(),
            Some("RAJ KUMAR")
        );
    }

    #[test]
    fn devanagari_names_are_kept_intact() {
        assert_eq!(
            extract_name("राज कुमार\nRAJ KUMAR").as_deref(),
            Some("राज कुमार")
        );
    }

    #[test]
    fn no_qualifying_line_yields_none() {
        assert_eq!(extract_name(""), None);
        assert_eq!(extract_name("1234 5678 9012\n15/08/1990"), None);
    }
}
