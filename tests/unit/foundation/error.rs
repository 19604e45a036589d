use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CurvetError::invalid_configuration("x")
            .to_string()
            .contains("invalid configuration:")
    );
    assert!(
        CurvetError::compute_unavailable("x")
            .to_string()
            .contains("compute unavailable:")
    );
    assert!(
        CurvetError::encoding_failed("x")
            .to_string()
            .contains("encoding failed:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CurvetError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
