use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of a string
#[must_use]
pub fn compute_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compare `candidate`'s digest with a stored hex digest without
/// short-circuiting on the first differing byte.
#[must_use]
pub fn digest_matches(candidate: &str, expected_hex: &str) -> bool {
    let actual = compute_hash(candidate);
    let expected = expected_hex.trim().to_ascii_lowercase();
    if actual.len() != expected.len() {
        return false;
    }
    actual
        .bytes()
        .zip(expected.bytes())
        .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_hash() {
        assert_eq!(
            compute_hash("hello world"),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_compute_hash_empty() {
        assert_eq!(
            compute_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_digest_matches_same_secret() {
        let stored = compute_hash("s3cret!");
        assert!(digest_matches("s3cret!", &stored));
    }

    #[test]
    fn test_digest_matches_is_case_insensitive_on_stored_hex() {
        let stored = compute_hash("s3cret!").to_uppercase();
        assert!(digest_matches("s3cret!", &stored));
    }

    #[test]
    fn test_digest_rejects_other_secret() {
        let stored = compute_hash("s3cret!");
        assert!(!digest_matches("S3cret!", &stored));
        assert!(!digest_matches("s3cret!", "abc"));
    }
}
