//! Numeric one-time passwords.

use rand::Rng;

use crate::{crypto::timing_safe_equal, OtpError};

/// Generates a zero-padded numeric code of 4 to 6 digits.
pub fn generate_otp(length: usize) -> Result<String, OtpError> {
    if !(4..=6).contains(&length) {
        return Err(OtpError::InvalidLength(length));
    }
    let max = 10u32.pow(length as u32);
    let code = rand::thread_rng().gen_range(0..max);
    Ok(format!("{code:0length$}"))
}

/// Checks a submitted code against the issued one in constant time.
///
/// The comparison is exact; callers strip user input themselves.
pub fn verify_otp(expected: &str, provided: &str) -> bool {
    timing_safe_equal(expected, provided)
}
