use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static AADHAAR_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[0-9]{12}\b|\b[0-9]{4}\s*[0-9]{4}\s*[0-9]{4}\b").unwrap());
static LOOSE_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{1,2})[/\-\s]([0-9]{1,2})[/\-\s]([0-9]{2,4})").unwrap());

/// Deterministic stand-in for the cleanup service: collapse whitespace,
/// regroup the first Aadhaar-shaped digit run as `dddd dddd dddd`, rewrite
/// loose date tokens as DD/MM/YYYY, trim. Step order matters; each step
/// consumes the previous step's output.
pub fn clean_locally(raw_text: &str) -> String {
    let mut cleaned = WHITESPACE.replace_all(raw_text, " ").into_owned();

    if let Some(matched) = AADHAAR_RUN.find(&cleaned).map(|m| m.as_str().to_string()) {
        let digits: String = matched.chars().filter(|c| !c.is_whitespace()).collect();
        if digits.len() == 12 {
            let grouped = format!("{} {} {}", &digits[..4], &digits[4..8], &digits[8..12]);
            cleaned = cleaned.replacen(&matched, &grouped, 1);
        }
    }

    let cleaned = LOOSE_DATE.replace_all(&cleaned, |caps: &Captures<'_>| {
        let year = if caps[3].len() == 2 {
            format!("20{}", &caps[3])
        } else {
            caps[3].to_string()
        };
        format!("{:0>2}/{:0>2}/{}", &caps[1], &caps[2], year)
    });

    cleaned.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::clean_locally;

    #[test]
    fn collapses_whitespace_and_trims() {
        assert_eq!(clean_locally("  RAJ \t KUMAR \n SINGH  "), "RAJ KUMAR SINGH");
    }

    #[test]
    fn regroups_a_bare_twelve_digit_run() {
        assert_eq!(
            clean_locally("ID 123456789012 issued"),
            "ID 1234 5678 9012 issued"
        );
    }

    #[test]
    fn regroups_a_spaced_run_without_touching_other_digits() {
        assert_eq!(
            clean_locally("1234  5678  9012 pin 560001"),
            "1234 5678 9012 pin 560001"
        );
    }

    #[test]
    fn canonicalizes_loose_dates() {
        assert_eq!(clean_locally("DOB 5-8-1990"), "DOB 05/08/1990");
        assert_eq!(clean_locally("DOB 15 08 1990"), "DOB 15/08/1990");
        assert_eq!(clean_locally("DOB 1/2/99"), "DOB 01/02/2099");
    }

    #[test]
    fn never_fails_on_patternless_input() {
        assert_eq!(clean_locally(""), "");
        assert_eq!(clean_locally("no numbers here"), "no numbers here");
    }

    #[test]
    fn idempotent_on_its_own_output() {
        let raw = "GOVERNMENT  OF INDIA\nRAJ KUMAR\nDOB : 15-8-90\n123456789012";
        let once = clean_locally(raw);
        assert_eq!(clean_locally(&once), once);
    }
}
