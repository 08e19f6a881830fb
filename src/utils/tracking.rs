use rand::Rng;

/// Generate a candidate 8-digit tracking number (10000000..=99999999).
///
/// Uniqueness is enforced by the caller against the orders table; this only
/// draws from the 90-million-value space.
pub fn generate_tracking_number() -> String {
    let mut rng = rand::thread_rng();
    rng.gen_range(10_000_000_u32..=99_999_999_u32).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracking_number_format() {
        for _ in 0..100 {
            let number = generate_tracking_number();
            assert_eq!(number.len(), 8);
            assert!(number.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(number.chars().next(), Some('0'));
        }
    }
}
