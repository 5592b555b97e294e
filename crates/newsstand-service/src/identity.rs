//! Article identity derivation.
//!
//! An article's identity is its canonical URL, percent-encoded so it is safe
//! as a storage key and as a literal in bookmark lookups. The encoding is
//! reversible but NOT a normalized identity: two spellings of the same
//! logical URL (trailing slash, query order, encoding case) produce distinct
//! identities. Bookmark matching relies on encode/decode being exact
//! inverses for the strings this module itself produces, so the scheme must
//! not be "improved" in place.

use std::borrow::Cow;

/// Derive a storage identity from an article identifier.
///
/// Raw URLs are percent-encoded. Inputs that carry no URL structure
/// (provider sample IDs, identities that are already encoded) pass through
/// unchanged so re-encoding an identity is idempotent.
pub fn encode(id: &str) -> String {
    if !id.contains("://") && !id.contains('?') && !id.contains('&') {
        return id.to_string();
    }
    urlencoding::encode(id).into_owned()
}

/// Recover the presumed original URL from an identity.
///
/// Identities without a percent marker are legacy plain values and are
/// returned unchanged. A malformed percent sequence also falls back to the
/// input; decoding never fails.
pub fn decode(id: &str) -> String {
    if !id.contains('%') {
        return id.to_string();
    }
    match urlencoding::decode(id) {
        Ok(Cow::Borrowed(s)) => s.to_string(),
        Ok(Cow::Owned(s)) => s,
        Err(_) => id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trips_plain_urls() {
        let url = "https://example.com/a?x=1";
        assert_eq!(decode(&encode(url)), url);
    }

    #[test]
    fn encode_is_deterministic() {
        let url = "https://example.com/story?id=42&lang=en";
        assert_eq!(encode(url), encode(url));
    }

    #[test]
    fn encoding_an_already_encoded_identity_is_idempotent() {
        let once = encode("https://example.com/a?x=1");
        assert_eq!(encode(&once), once);
    }

    #[test]
    fn sample_ids_pass_through_unchanged() {
        assert_eq!(encode("sample-3"), "sample-3");
        assert_eq!(decode("sample-3"), "sample-3");
    }

    #[test]
    fn legacy_plain_identity_decodes_unchanged() {
        assert_eq!(decode("legacy-article-id"), "legacy-article-id");
    }

    #[test]
    fn malformed_percent_sequence_falls_back_to_input() {
        assert_eq!(decode("bad%zzsequence"), "bad%zzsequence");
    }
}
