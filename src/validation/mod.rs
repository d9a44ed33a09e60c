use bigdecimal::BigDecimal;
use std::str::FromStr;

use crate::error::AppError;

pub const NOTE_MAX_LEN: usize = 248;
pub const AMOUNT_MAX_LEN: usize = 64;
pub const SALESPERSON_MAX_LEN: usize = 254;
pub const CARD_NUMBER_MIN_LEN: usize = 12;
pub const CARD_NUMBER_MAX_LEN: usize = 19;

pub type ValidationResult = Result<(), AppError>;

pub fn sanitize_string(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_control())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn validate_required(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }

    Ok(())
}

pub fn validate_max_len(field: &'static str, value: &str, max_len: usize) -> ValidationResult {
    if value.len() > max_len {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }

    Ok(())
}

/// Amounts travel as decimal strings end to end; parse only to validate.
pub fn validate_amount(amount: &str) -> ValidationResult {
    validate_required("amount", amount)?;
    validate_max_len("amount", amount, AMOUNT_MAX_LEN)?;

    let parsed = BigDecimal::from_str(amount.trim())
        .map_err(|_| AppError::Validation("amount must be a decimal number".to_string()))?;

    if parsed <= BigDecimal::from(0) {
        return Err(AppError::Validation(
            "amount must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

pub fn validate_card_number(card_number: &str) -> ValidationResult {
    validate_required("card_number", card_number)?;

    if !card_number.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(AppError::Validation(
            "card_number must contain only digits".to_string(),
        ));
    }

    if card_number.len() < CARD_NUMBER_MIN_LEN || card_number.len() > CARD_NUMBER_MAX_LEN {
        return Err(AppError::Validation(format!(
            "card_number must be between {CARD_NUMBER_MIN_LEN} and {CARD_NUMBER_MAX_LEN} digits"
        )));
    }

    Ok(())
}

/// Gateway format: YYYY-MM.
pub fn validate_expiration(expiration: &str) -> ValidationResult {
    validate_required("expiration", expiration)?;

    let valid = match expiration.split_once('-') {
        Some((year, month)) => {
            year.len() == 4
                && year.chars().all(|ch| ch.is_ascii_digit())
                && month.len() == 2
                && matches!(month.parse::<u8>(), Ok(1..=12))
        }
        None => false,
    };

    if !valid {
        return Err(AppError::Validation(
            "expiration must be in YYYY-MM format".to_string(),
        ));
    }

    Ok(())
}

pub fn validate_cvv(cvv: &str) -> ValidationResult {
    if !(3..=4).contains(&cvv.len()) || !cvv.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(AppError::Validation(
            "cvv must be 3 or 4 digits".to_string(),
        ));
    }

    Ok(())
}

pub fn validate_note(note: &str) -> ValidationResult {
    validate_required("note", note)?;
    validate_max_len("note", note, NOTE_MAX_LEN)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_required_field() {
        assert!(validate_required("field", "value").is_ok());
        assert!(validate_required("field", "   ").is_err());
    }

    #[test]
    fn validates_max_len() {
        assert!(validate_max_len("field", "abc", 3).is_ok());
        assert!(validate_max_len("field", "abcd", 3).is_err());
    }

    #[test]
    fn sanitizes_string() {
        assert_eq!(sanitize_string("  hello\tworld  "), "hello world");
        assert_eq!(sanitize_string("ab\u{0000}cd\u{0007}"), "abcd");
    }

    #[test]
    fn validates_amount() {
        assert!(validate_amount("49.99").is_ok());
        assert!(validate_amount("0.01").is_ok());
        assert!(validate_amount("0").is_err());
        assert!(validate_amount("-5").is_err());
        assert!(validate_amount("ten dollars").is_err());
        assert!(validate_amount("").is_err());
    }

    #[test]
    fn validates_card_number() {
        assert!(validate_card_number("4111111111111111").is_ok());
        assert!(validate_card_number("4111-1111").is_err());
        assert!(validate_card_number("41111").is_err());
        assert!(validate_card_number("").is_err());
    }

    #[test]
    fn validates_expiration() {
        assert!(validate_expiration("2027-12").is_ok());
        assert!(validate_expiration("2027-01").is_ok());
        assert!(validate_expiration("2027-13").is_err());
        assert!(validate_expiration("12/27").is_err());
        assert!(validate_expiration("2027").is_err());
    }

    #[test]
    fn validates_cvv() {
        assert!(validate_cvv("123").is_ok());
        assert!(validate_cvv("1234").is_ok());
        assert!(validate_cvv("12").is_err());
        assert!(validate_cvv("12a").is_err());
    }

    #[test]
    fn validates_note_length() {
        assert!(validate_note("short note").is_ok());
        assert!(validate_note(&"x".repeat(NOTE_MAX_LEN)).is_ok());
        assert!(validate_note(&"x".repeat(NOTE_MAX_LEN + 1)).is_err());
        assert!(validate_note("").is_err());
    }
}
