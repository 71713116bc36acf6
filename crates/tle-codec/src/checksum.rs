//! Mod-10 line checksum

use crate::CHECKSUM_SPAN;

/// Calculate the checksum digit of a TLE line.
///
/// Digits count their face value, `-` counts one, everything else zero.
/// Only the first 68 characters take part; anything after (including an
/// existing checksum digit) is ignored.
pub fn checksum(line: &str) -> u8 {
    let sum: u32 = line
        .chars()
        .take(CHECKSUM_SPAN)
        .map(|c| match c {
            '0'..='9' => c as u32 - '0' as u32,
            '-' => 1,
            _ => 0,
        })
        .sum();
    (sum % 10) as u8
}

/// Character form of [`checksum`], ready to append as column 69
pub fn checksum_char(line: &str) -> char {
    char::from(b'0' + checksum(line))
}

/// True when the 69th character is the checksum of the first 68
pub fn verify(line: &str) -> bool {
    line.chars()
        .nth(CHECKSUM_SPAN)
        .map_or(false, |c| c == checksum_char(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISS_LINE1: &str =
        "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
    const ISS_LINE2: &str =
        "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    #[test]
    fn test_reference_lines_verify() {
        assert_eq!(checksum(ISS_LINE1), 7);
        assert_eq!(checksum(ISS_LINE2), 7);
        assert!(verify(ISS_LINE1));
        assert!(verify(ISS_LINE2));
    }

    #[test]
    fn test_minus_counts_one() {
        assert_eq!(checksum("-"), 1);
        assert_eq!(checksum("--9"), 1);
    }

    #[test]
    fn test_non_digits_contribute_zero() {
        assert_eq!(checksum("ABC +.xyz"), 0);
        assert_eq!(checksum("U5 A"), 5);
    }

    #[test]
    fn test_ignores_past_column_68() {
        let base = "1".repeat(68);
        let a = format!("{}0123", base);
        let b = format!("{}9999", base);
        assert_eq!(checksum(&a), checksum(&b));
        assert_eq!(checksum(&base), 8);
    }

    #[test]
    fn test_verify_rejects_bad_digit() {
        let mut bad = ISS_LINE1[..68].to_string();
        bad.push('0');
        assert!(!verify(&bad));
        assert!(!verify("short"));
    }
}
