use once_cell::sync::Lazy;
use regex::Regex;

// "Address ... <6-digit PIN>", the PIN anchoring the end of the block.
static WITH_PIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)Address[:\s]*(.*?)([0-9]{6})\b").unwrap());
static TO_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)Address[:\s]*(.*)").unwrap());
static JUNK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9,\-\s]").unwrap());
static COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*,\s*").unwrap());
static COMMA_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r",+").unwrap());
static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Pull the address block out of the back-side text. Prefers the span
/// between the "Address" label and a six-digit postal code; falls back to
/// everything after the label. The captured text is scrubbed down to
/// letters, digits, commas and hyphens, and tokens shorter than three
/// characters are dropped unless they are purely numeric.
pub fn extract_address(back_text: &str) -> Option<String> {
    let raw = if let Some(caps) = WITH_PIN.captures(back_text) {
        format!("{} {}", &caps[1], &caps[2])
    } else {
        TO_END.captures(back_text)?[1].to_string()
    };

    let scrubbed = JUNK.replace_all(&raw, " ");
    let kept = scrubbed
        .split_whitespace()
        .filter(|word| word.len() >= 3 || word.chars().all(|c| c.is_ascii_digit()))
        .collect::<Vec<_>>()
        .join(" ");

    let spaced = COMMA.replace_all(&kept, ", ");
    let deduped = COMMA_RUN.replace_all(&spaced, ",");
    let address = SPACE_RUN.replace_all(&deduped, " ").trim().to_string();

    if address.is_empty() { None } else { Some(address) }
}
