//! Document and field validation
//!
//! Checks applied to form fields before a record is sent to the backend:
//! the CPF check-digit algorithm, the CEP pattern, and the small
//! required/minimum-length helpers the record types build on.

use crate::error::ValidationError;
use crate::utils::formatting::{digits, CPF_DIGITS};

/// Validates a CPF
///
/// Accepts raw or masked input. Non-digits are stripped first; the result
/// must have exactly 11 digits, must not be a single repeated digit, and both
/// check digits must match.
///
/// # Arguments
/// - `candidate` - The CPF to check
///
/// # Returns
/// `true` only if the CPF is well formed and both check digits match
pub fn is_valid_cpf(candidate: &str) -> bool {
    let digits: Vec<u32> = candidate.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != CPF_DIGITS {
        return false;
    }

    // Repeated-digit sequences satisfy the checksum but are never issued
    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    check_digit(&digits[..9]) == digits[9] && check_digit(&digits[..10]) == digits[10]
}

/// Computes a CPF check digit over `base`
///
/// Weights run from `base.len() + 1` down to 2.
fn check_digit(base: &[u32]) -> u32 {
    let top = base.len() as u32 + 1;
    let sum: u32 = base
        .iter()
        .enumerate()
        .map(|(i, d)| d * (top - i as u32))
        .sum();

    match sum % 11 {
        r if r < 2 => 0,
        r => 11 - r,
    }
}

/// Completes a 9-digit CPF base with its two check digits
///
/// Returns `None` unless `base` contains exactly 9 digits after stripping
/// non-digits. The result is unmasked.
pub fn complete_cpf(base: &str) -> Option<String> {
    let mut digits: Vec<u32> = base.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 9 {
        return None;
    }

    digits.push(check_digit(&digits));
    digits.push(check_digit(&digits));

    Some(
        digits
            .iter()
            .filter_map(|&d| char::from_digit(d, 10))
            .collect(),
    )
}

/// Validates a CEP
///
/// Surrounding whitespace is ignored. The remainder must be 5 digits,
/// an optional `-`, then 3 digits.
pub fn is_valid_cep(candidate: &str) -> bool {
    let candidate = candidate.trim();
    let bytes = candidate.as_bytes();

    match bytes.len() {
        8 => bytes.iter().all(u8::is_ascii_digit),
        9 => {
            bytes[5] == b'-'
                && bytes[..5].iter().all(u8::is_ascii_digit)
                && bytes[6..].iter().all(u8::is_ascii_digit)
        }
        _ => false,
    }
}

/// Rejects a field that is empty after trimming
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(())
}

/// Rejects a field shorter than `min` characters
pub fn require_min_len(field: &'static str, value: &str, min: usize) -> Result<(), ValidationError> {
    if value.trim().chars().count() < min {
        return Err(ValidationError::TooShort { field, min });
    }
    Ok(())
}

/// Rejects a CPF that is not fully typed or fails the check digits
pub fn require_cpf(field: &'static str, value: &str) -> Result<(), ValidationError> {
    require(field, value)?;
    if digits(value, usize::MAX).len() != CPF_DIGITS {
        return Err(ValidationError::IncompleteCpf { field });
    }
    if !is_valid_cpf(value) {
        return Err(ValidationError::InvalidCpf { field });
    }
    Ok(())
}

/// Rejects a missing or malformed CEP
pub fn require_cep(field: &'static str, value: &str) -> Result<(), ValidationError> {
    require(field, value)?;
    if !is_valid_cep(value) {
        return Err(ValidationError::InvalidCep {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}
