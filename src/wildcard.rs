use crate::grammar::WILDCARD;

/// Test `candidate` against a pattern containing one wildcard.
///
/// The pattern is split at its first wildcard into a prefix and a suffix;
/// each non-empty part must match its end of the candidate. The two checks
/// are independent, so `ab*ba` matches `aba`.
pub fn matches(pattern: &str, candidate: &str) -> bool {
    let (prefix, suffix) = match pattern.split_once(WILDCARD) {
        Some(parts) => parts,
        None => (pattern, ""),
    };
    (prefix.is_empty() || candidate.starts_with(prefix))
        && (suffix.is_empty() || candidate.ends_with(suffix))
}

#[test]
fn test_prefix_and_suffix() {
    assert!(matches("sav*", "savings"));
    assert!(!matches("sav*", "checking"));
    assert!(matches("*ing", "checking"));
    assert!(matches("sav*a", "savBa"));
    assert!(!matches("sav*a", "savBb"));
}

#[test]
fn test_lone_wildcard_matches_everything() {
    assert!(matches("*", ""));
    assert!(matches("*", "anything"));
}

#[test]
fn test_overlapping_parts_checked_independently() {
    assert!(matches("ab*ba", "aba"));
}

#[test]
fn test_second_wildcard_is_literal_suffix_text() {
    assert!(matches("a*b*", "axb*"));
    assert!(!matches("a*b*", "axbx"));
}
