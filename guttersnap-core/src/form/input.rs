use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern")
});

/// Display transform applied to the phone field on every edit.
///
/// `"5551234567"` becomes `"(555) 123-4567"`, `"555123"` becomes
/// `"(555) 123"`. Fewer than three digits are left as typed digits; digits
/// past the tenth are dropped.
pub fn format_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    match digits.len() {
        0..=2 => digits,
        3..=6 => format!("({}) {}", &digits[..3], &digits[3..])
            .trim_end()
            .to_string(),
        _ => {
            let end = digits.len().min(10);
            format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..end])
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailHint {
    Empty,
    LooksValid,
    LooksInvalid,
}

/// Non-blocking hint shown when the email field loses focus.
pub fn email_hint(value: &str) -> EmailHint {
    if value.is_empty() {
        EmailHint::Empty
    } else if EMAIL_SHAPE.is_match(value) {
        EmailHint::LooksValid
    } else {
        EmailHint::LooksInvalid
    }
}
