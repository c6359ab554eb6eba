use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PixelflowError::decode("x")
            .to_string()
            .contains("decode failure:")
    );
    assert!(
        PixelflowError::empty_input("x")
            .to_string()
            .contains("empty input:")
    );
    assert!(
        PixelflowError::persistence("x")
            .to_string()
            .contains("persistence failure:")
    );
    assert!(
        PixelflowError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        PixelflowError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        PixelflowError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PixelflowError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
