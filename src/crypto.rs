//! Random values and constant-time string comparison.

use hmac::{
    digest::{Key, KeyInit},
    Hmac, Mac,
};
use once_cell::sync::Lazy;
use rand::{Rng, RngCore};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const API_KEY_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Keyed MAC used by [`timing_safe_equal`].
///
/// The key is one SHA-256 block (64 bytes) of random data, created on first
/// use, and lives for the rest of the process. It is never rotated or exposed.
static COMPARE_MAC: Lazy<HmacSha256> = Lazy::new(|| {
    let mut key = Key::<HmacSha256>::default();
    rand::thread_rng().fill_bytes(&mut key);
    <HmacSha256 as KeyInit>::new(&key)
});

/// Compares two strings without leaking where they differ.
///
/// Inputs of different byte length return `false` immediately. Otherwise
/// both are MACed under the process key and the tags are compared in
/// constant time.
pub fn timing_safe_equal(left: &str, right: &str) -> bool {
    if left.len() != right.len() {
        return false;
    }

    let mut left_mac = COMPARE_MAC.clone();
    left_mac.update(left.as_bytes());
    let left_tag = left_mac.finalize().into_bytes();

    let mut right_mac = COMPARE_MAC.clone();
    right_mac.update(right.as_bytes());
    right_mac.verify_slice(&left_tag).is_ok()
}

/// Random integer with exactly `digits` decimal digits.
///
/// Returns `None` unless `digits` is in `1..=19`.
pub fn random_number(digits: u32) -> Option<u64> {
    if !(1..=19).contains(&digits) {
        return None;
    }
    let start = 10u64.pow(digits - 1);
    Some(rand::thread_rng().gen_range(start..start * 10))
}

/// Password shaped like `zuqWan-fajguw-4wojha`.
///
/// Three groups of six lowercase letters joined by hyphens, with one
/// uppercase letter and one digit at distinct random positions.
pub fn random_password() -> String {
    let mut rng = rand::thread_rng();
    let mut chars: Vec<u8> = (0..18).map(|_| pick(&mut rng, LOWER)).collect();

    let upper_at = rng.gen_range(0..chars.len());
    chars[upper_at] = pick(&mut rng, UPPER);

    let mut digit_at = rng.gen_range(0..chars.len());
    while digit_at == upper_at {
        digit_at = rng.gen_range(0..chars.len());
    }
    chars[digit_at] = pick(&mut rng, DIGITS);

    chars
        .chunks(6)
        .map(|group| group.iter().map(|&b| char::from(b)).collect::<String>())
        .collect::<Vec<_>>()
        .join("-")
}

/// `length` characters drawn uniformly from the URL-safe base64 alphabet.
pub fn random_api_key(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(pick(&mut rng, API_KEY_ALPHABET)))
        .collect()
}

fn pick(rng: &mut impl Rng, set: &[u8]) -> u8 {
    set[rng.gen_range(0..set.len())]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use hmac::digest::Key;

    use super::{
        random_api_key, random_number, random_password, timing_safe_equal, HmacSha256,
    };

    #[test]
    fn process_key_is_one_sha256_block() {
        assert_eq!(Key::<HmacSha256>::default().len(), 64);
    }

    #[test]
    fn equal_strings_compare_equal() {
        assert!(timing_safe_equal("secret", "secret"));
        assert!(timing_safe_equal("", ""));
        let special = "test@#$%^&*()_+{}|:\"<>?";
        assert!(timing_safe_equal(special, special));
        assert!(timing_safe_equal("测试🚀💯", "测试🚀💯"));
    }

    #[test]
    fn different_strings_compare_unequal() {
        assert!(!timing_safe_equal("secret", "not a secret"));
        assert!(!timing_safe_equal("abc", "abcde"));
        assert!(!timing_safe_equal("", "a"));
        assert!(!timing_safe_equal("secret", "secreT"));
    }

    #[test]
    fn comparison_is_stable_across_calls() {
        let long = "a".repeat(1000);
        for _ in 0..100 {
            assert!(timing_safe_equal(&long, &long));
        }
    }

    #[test]
    fn random_number_has_requested_digits() {
        for digits in 1..=19 {
            let value = random_number(digits).unwrap();
            assert_eq!(value.to_string().len(), digits as usize);
        }
        assert_eq!(random_number(0), None);
        assert_eq!(random_number(20), None);
    }

    #[test]
    fn random_number_varies() {
        let values: HashSet<_> = (0..10).filter_map(|_| random_number(12)).collect();
        assert!(values.len() > 1);
    }

    #[test]
    fn password_has_expected_shape() {
        let password = random_password();
        assert_eq!(password.len(), 20);
        let groups: Vec<_> = password.split('-').collect();
        assert_eq!(groups.len(), 3);
        assert!(groups.iter().all(|g| g.len() == 6));
        assert_eq!(password.chars().filter(char::is_ascii_uppercase).count(), 1);
        assert_eq!(password.chars().filter(char::is_ascii_digit).count(), 1);
        assert_eq!(password.chars().filter(char::is_ascii_lowercase).count(), 16);
    }

    #[test]
    fn api_key_uses_url_safe_alphabet() {
        let key = random_api_key(32);
        assert_eq!(key.len(), 32);
        assert!(key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert!(random_api_key(0).is_empty());
    }
}
