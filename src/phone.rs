use once_cell::sync::Lazy;
use regex::Regex;

/// Longest number the mask accepts, leading `7` included.
pub const MAX_DIGITS: usize = 11;

static COMPLETE_PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+7 \(\d{3}\) \d{3}-\d{2}-\d{2}$").expect("phone pattern is valid"));

/// Re-renders whatever the user typed as `+7 (XXX) XXX-XX-XX`.
///
/// Non-digits are dropped first. The first digit always stands for the
/// country code, so it is replaced by the `+7` prefix once a second digit
/// arrives. Anything past eleven digits is ignored.
pub fn mask_phone(raw: &str) -> String {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(MAX_DIGITS)
        .collect();

    match digits.len() {
        0 => String::new(),
        1 => format!("+7{}", digits),
        len => {
            let mut masked = String::from("+7 (");
            masked.push_str(&digits[1..len.min(4)]);
            if len > 4 {
                masked.push_str(") ");
                masked.push_str(&digits[4..len.min(7)]);
            }
            if len > 7 {
                masked.push('-');
                masked.push_str(&digits[7..len.min(9)]);
            }
            if len > 9 {
                masked.push('-');
                masked.push_str(&digits[9..len]);
            }
            masked
        }
    }
}

/// True once the value is a fully typed mask.
pub fn is_complete_phone(value: &str) -> bool {
    COMPLETE_PHONE.is_match(value)
}
