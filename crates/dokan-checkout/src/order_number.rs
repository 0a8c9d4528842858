//! Human-facing order numbers: `ORD-<unix millis>-<9 uppercase alphanumerics>`.

use chrono::{DateTime, Utc};
use rand::Rng;

const PREFIX: &str = "ORD";
const SUFFIX_LEN: usize = 9;
const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generates a new order number for an order placed at `now`.
///
/// Not guaranteed unique on its own; storage enforces uniqueness and the
/// assembler regenerates on a collision.
pub fn generate_order_number(now: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();

    format!("{}-{}-{}", PREFIX, now.timestamp_millis(), suffix)
}

/// Checks the `ORD-<digits>-<9 of [0-9A-Z]>` shape.
pub fn is_order_number(candidate: &str) -> bool {
    let mut parts = candidate.splitn(3, '-');
    let (Some(prefix), Some(millis), Some(suffix)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    prefix == PREFIX
        && !millis.is_empty()
        && millis.bytes().all(|b| b.is_ascii_digit())
        && suffix.len() == SUFFIX_LEN
        && suffix.bytes().all(|b| ALPHABET.contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format() {
        let now = Utc.timestamp_millis_opt(1_717_000_000_123).unwrap();
        let number = generate_order_number(now);

        assert!(number.starts_with("ORD-1717000000123-"));
        assert!(is_order_number(&number), "{number}");
    }

    #[test]
    fn test_numbers_differ() {
        let now = Utc::now();
        assert_ne!(generate_order_number(now), generate_order_number(now));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(!is_order_number("ORD-123-abcdefghi"));
        assert!(!is_order_number("ORD-123-ABC"));
        assert!(!is_order_number("INV-123-ABCDEFGHI"));
        assert!(!is_order_number("ORD--ABCDEFGHI"));
        assert!(!is_order_number("nonsense"));
    }
}
