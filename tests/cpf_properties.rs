//! Property tests for the CPF mask and check digits

use cadastro::utils::validation::complete_cpf;
use cadastro::{format_cpf, is_valid_cpf};
use proptest::prelude::*;
use proptest::test_runner::Config;

fn all_same(digits: &str) -> bool {
    digits.chars().all(|c| Some(c) == digits.chars().next())
}

fn change_digit(cpf: &str, position: usize, delta: u32) -> String {
    cpf.chars()
        .enumerate()
        .map(|(i, c)| {
            if i == position {
                let d = c.to_digit(10).unwrap();
                char::from_digit((d + delta) % 10, 10).unwrap()
            } else {
                c
            }
        })
        .collect()
}

/// Deterministic spread of 9-digit bases
fn sample_bases(count: u32) -> impl Iterator<Item = String> {
    (0..count).map(|n| format!("{:09}", (n as u64 * 4_999_999 + 12_345) % 1_000_000_000))
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn mask_keeps_first_eleven_digits(raw in ".{0,40}") {
        let masked = format_cpf(&raw);
        prop_assert!(masked.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-'));
        prop_assert!(masked.len() <= 14);

        let stripped: String = masked.chars().filter(char::is_ascii_digit).collect();
        let expected: String = raw.chars().filter(char::is_ascii_digit).take(11).collect();
        prop_assert_eq!(stripped, expected);
    }

    #[test]
    fn mask_is_idempotent(raw in "[0-9a-z .\\-]{0,30}") {
        let once = format_cpf(&raw);
        prop_assert_eq!(format_cpf(&once), once);
    }

    #[test]
    fn mask_separators_sit_at_fixed_positions(digits in "[0-9]{0,11}") {
        let masked = format_cpf(&digits);
        for (i, c) in masked.char_indices() {
            match i {
                3 | 7 => {
                    prop_assert_eq!(c, '.');
                }
                11 => {
                    prop_assert_eq!(c, '-');
                }
                _ => {
                    prop_assert!(c.is_ascii_digit());
                }
            }
        }
    }

    #[test]
    fn validator_never_panics(raw in ".{0,40}") {
        let _ = is_valid_cpf(&raw);
    }

    #[test]
    fn completed_base_is_valid_unless_degenerate(base in "[0-9]{9}") {
        let cpf = complete_cpf(&base).unwrap();
        prop_assert_eq!(is_valid_cpf(&cpf), !all_same(&cpf));
        prop_assert_eq!(is_valid_cpf(&format_cpf(&cpf)), !all_same(&cpf));
    }

    #[test]
    fn check_digit_change_is_detected(
        base in "[0-9]{9}",
        position in 9usize..11,
        delta in 1u32..10
    ) {
        let cpf = complete_cpf(&base).unwrap();
        let mutated = change_digit(&cpf, position, delta);
        prop_assert!(!is_valid_cpf(&mutated), "{} -> {} still valid", cpf, mutated);
    }
}

#[test]
fn check_digits_vary_across_bases() {
    let check_digits: std::collections::HashSet<String> = sample_bases(200)
        .filter_map(|base| complete_cpf(&base))
        .map(|cpf| cpf[9..].to_string())
        .collect();

    assert!(check_digits.len() > 10, "check digits look constant: {:?}", check_digits);
}

#[test]
fn base_digit_changes_are_almost_always_detected() {
    // Remainders 0 and 1 share check digit 0, so a handful of
    // substitutions slip through; the rate must stay tiny.
    let mut total = 0u32;
    let mut undetected = 0u32;

    for base in sample_bases(500) {
        let cpf = complete_cpf(&base).unwrap();
        if all_same(&cpf) {
            continue;
        }
        for position in 0..9 {
            for delta in 1..10 {
                total += 1;
                if is_valid_cpf(&change_digit(&cpf, position, delta)) {
                    undetected += 1;
                }
            }
        }
    }

    assert!(total > 0);
    assert!(
        undetected * 100 < total,
        "{} of {} single-digit changes went undetected",
        undetected,
        total
    );
}
