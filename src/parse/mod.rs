mod address;
mod name;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

pub use address::extract_address;
pub use name::extract_name;

/// Fields mined from a cleaned front/back text pair. Every field is
/// best-effort; a rule that matches nothing leaves its field unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AadhaarRecord {
    pub aadhaar_number: Option<String>,
    pub name: Option<String>,
    pub dob: Option<String>,
    pub yob: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
}

static AADHAAR_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[0-9]{4}\s?[0-9]{4}\s?[0-9]{4}\b").unwrap());
static DOB: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[0-9]{2}/[0-9]{2}/[0-9]{4}\b").unwrap());
static BARE_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19|20)[0-9]{2}\b").unwrap());
static GENDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(MALE|FEMALE|TRANSGENDER|OTHERS|पुरुष|महिला|ट्रांसजेंडर)\b").unwrap()
});

/// Mine structured fields out of the cleaned card text. The address rule
/// reads only the back side; every other rule searches both sides joined
/// with a line break. First match wins throughout, and the DOB-derived year
/// always beats a bare-year match.
pub fn parse_aadhaar(front_text: &str, back_text: &str) -> AadhaarRecord {
    let combined = format!("{}\n{}", front_text, back_text);

    let dob = extract_dob(&combined);
    let yob = dob
        .as_deref()
        .map(|value| value[value.len() - 4..].to_string())
        .or_else(|| extract_bare_year(&combined));

    AadhaarRecord {
        aadhaar_number: extract_aadhaar_number(&combined),
        name: name::extract_name(front_text),
        dob,
        yob,
        gender: extract_gender(&combined),
        address: address::extract_address(back_text),
    }
}

fn extract_aadhaar_number(combined: &str) -> Option<String> {
    AADHAAR_NUMBER.find(combined).map(|found| {
        let digits: String = found
            .as_str()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        format!("{} {} {}", &digits[..4], &digits[4..8], &digits[8..12])
    })
}

fn extract_dob(combined: &str) -> Option<String> {
    DOB.find(combined).map(|found| found.as_str().to_string())
}

fn extract_bare_year(combined: &str) -> Option<String> {
    BARE_YEAR
        .find(combined)
        .map(|found| found.as_str().to_string())
}

fn extract_gender(combined: &str) -> Option<String> {
    GENDER
        .find(combined)
        .map(|found| normalize_gender(found.as_str()))
}

fn normalize_gender(token: &str) -> String {
    let normalized = token.to_uppercase();
    if normalized.contains("पुरुष") || normalized == "MALE" {
        return "MALE".to_string();
    }
    if normalized.contains("महिला") || normalized == "FEMALE" {
        return "FEMALE".to_string();
    }
    if normalized.contains("ट्रांसजेंडर") || normalized == "TRANSGENDER" {
        return "TRANSGENDER".to_string();
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_all_fields_from_a_clean_front() {
        let front = "RAJ KUMAR\n15/08/1990\nMALE\n1234 5678 9012";
        let record = parse_aadhaar(front, "");

        assert_eq!(record.aadhaar_number.as_deref(), Some("1234 5678 9012"));
        assert_eq!(record.name.as_deref(), Some("RAJ KUMAR"));
        assert_eq!(record.dob.as_deref(), Some("15/08/1990"));
        assert_eq!(record.yob.as_deref(), Some("1990"));
        assert_eq!(record.gender.as_deref(), Some("MALE"));
        assert_eq!(record.address, None);
    }

    #[test]
    fn bare_twelve_digit_run_is_regrouped() {
        let record = parse_aadhaar("123456789012", "");
        assert_eq!(record.aadhaar_number.as_deref(), Some("1234 5678 9012"));
    }

    #[test]
    fn no_twelve_digit_run_means_no_number() {
        let record = parse_aadhaar("RAJ KUMAR\n15/08/1990", "pin 560001");
        assert_eq!(record.aadhaar_number, None);
    }

    #[test]
    fn dob_year_beats_a_bare_year_elsewhere() {
        let record = parse_aadhaar("issued 2015\nDOB 15/08/1990", "");
        assert_eq!(record.dob.as_deref(), Some("15/08/1990"));
        assert_eq!(record.yob.as_deref(), Some("1990"));
    }

    #[test]
    fn bare_year_is_the_fallback_when_no_dob_matches() {
        let record = parse_aadhaar("Year of Birth 1987", "");
        assert_eq!(record.dob, None);
        assert_eq!(record.yob.as_deref(), Some("1987"));
    }

    #[test]
    fn gender_tokens_normalize_to_the_latin_enum() {
        assert_eq!(
            parse_aadhaar("पुरुष", "").gender.as_deref(),
            Some("MALE")
        );
        assert_eq!(
            parse_aadhaar("महिला", "").gender.as_deref(),
            Some("FEMALE")
        );
        assert_eq!(
            parse_aadhaar("ट्रांसजेंडर", "").gender.as_deref(),
            Some("TRANSGENDER")
        );
        assert_eq!(parse_aadhaar("female", "").gender.as_deref(), Some("FEMALE"));
        assert_eq!(parse_aadhaar("others", "").gender.as_deref(), Some("OTHERS"));
        assert_eq!(parse_aadhaar("no marker", "").gender, None);
    }

    #[test]
    fn back_side_fields_reach_the_combined_rules() {
        let record = parse_aadhaar("RAJ KUMAR SINGH", "1234 5678 9012\nAddress: Anna Nagar 600040");
        assert_eq!(record.aadhaar_number.as_deref(), Some("1234 5678 9012"));
        assert_eq!(record.address.as_deref(), Some("Anna Nagar 600040"));
    }

    #[test]
    fn identical_inputs_yield_identical_records() {
        let front = "RAJ KUMAR\n15/08/1990\nMALE\n1234 5678 9012";
        let back = "Address: 221B Baker Street 560001";
        assert_eq!(parse_aadhaar(front, back), parse_aadhaar(front, back));
    }
}
