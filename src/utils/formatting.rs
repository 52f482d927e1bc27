//! Input mask formatting
//!
//! Functions that turn raw keystrokes into the display masks used by the
//! registration forms: CPF (`000.000.000-00`) and CEP (`00000-000`).
//! Every function here is total: garbage in yields a (possibly empty) mask.

/// Number of digits in a CPF
pub const CPF_DIGITS: usize = 11;

/// Number of digits in a CEP
pub const CEP_DIGITS: usize = 8;

/// Extracts the decimal digits of `raw`, keeping at most `limit` of them
///
/// # Arguments
/// - `raw` - Arbitrary user input
/// - `limit` - Maximum number of digits to keep
///
/// # Returns
/// The digits in their original order
pub fn digits(raw: &str, limit: usize) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(limit)
        .collect()
}

/// Formats raw input as a CPF mask
///
/// Non-digits are discarded and the rest is truncated to 11 digits. A `.` is
/// inserted before the 4th and 7th digit and a `-` before the 10th, but only
/// when that digit exists, so partial input yields a partial mask.
///
/// # Arguments
/// - `raw` - Arbitrary user input, masked or not
///
/// # Returns
/// The masked CPF, at most 14 characters long
pub fn format_cpf(raw: &str) -> String {
    let digits = digits(raw, CPF_DIGITS);
    let mut masked = String::with_capacity(14);

    for (i, c) in digits.chars().enumerate() {
        match i {
            3 | 6 => masked.push('.'),
            9 => masked.push('-'),
            _ => {}
        }
        masked.push(c);
    }

    masked
}

/// Formats raw input as a CEP mask
///
/// Non-digits are discarded and the rest is truncated to 8 digits. The `-`
/// appears only once a 6th digit has been typed.
///
/// # Arguments
/// - `raw` - Arbitrary user input, masked or not
///
/// # Returns
/// The masked CEP, at most 9 characters long
pub fn format_cep(raw: &str) -> String {
    let digits = digits(raw, CEP_DIGITS);
    if digits.len() <= 5 {
        return digits;
    }
    format!("{}-{}", &digits[..5], &digits[5..])
}
