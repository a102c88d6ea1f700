//! Content fingerprints used as cache keys for analysis results.

use md5::{Digest, Md5};

/// Lowercase hex MD5 digest of the UTF-8 bytes of `text`.
#[must_use]
pub fn content_fingerprint(text: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        assert_eq!(content_fingerprint(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(
            content_fingerprint("hello"),
            "5d41402abc4b2a76b9719d911017c592"
        );
    }

    #[test]
    fn test_fingerprint_is_case_sensitive() {
        assert_ne!(content_fingerprint("Hello"), content_fingerprint("hello"));
    }
}
