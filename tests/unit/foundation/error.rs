use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        BitreelError::invalid_entry("x")
            .to_string()
            .contains("invalid entry:")
    );
    assert!(
        BitreelError::corrupt_archive("x")
            .to_string()
            .contains("corrupt archive:")
    );
    assert!(
        BitreelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(BitreelError::media("x").to_string().contains("media error:"));
}

#[test]
fn structural_errors_are_flagged() {
    assert!(BitreelError::TruncatedStream { bits: 7 }.is_structural());
    assert!(BitreelError::MissingHeader { offset: 0 }.is_structural());
    assert!(
        BitreelError::TruncatedRecord {
            offset: 8,
            needed: 2,
            remaining: 1,
        }
        .is_structural()
    );
    assert!(!BitreelError::invalid_entry("x").is_structural());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = BitreelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
