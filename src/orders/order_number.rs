use chrono::{DateTime, Utc};
use rand::Rng;

const PREFIX: &str = "PT";
const SUFFIX_LEN: usize = 6;
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a customer-facing order number: `PT-YYYYMMDD-XXXXXX`
///
/// The suffix is random uppercase alphanumerics; uniqueness is enforced by the
/// store, and callers retry on collision.
pub fn generate_order_number(now: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();

    format!("{}-{}-{}", PREFIX, now.format("%Y%m%d"), suffix)
}
