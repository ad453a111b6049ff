use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TextBehindError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        TextBehindError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(
        TextBehindError::removal("x")
            .to_string()
            .contains("background removal error:")
    );
    assert!(TextBehindError::font("x").to_string().contains("font error:"));
    assert!(
        TextBehindError::encode("x")
            .to_string()
            .contains("encode error:")
    );
}

#[test]
fn kind_matches_variant() {
    assert_eq!(TextBehindError::validation("x").kind(), ErrorKind::Validation);
    assert_eq!(TextBehindError::decode("x").kind(), ErrorKind::Decode);
    assert_eq!(TextBehindError::removal("x").kind(), ErrorKind::Removal);
    assert_eq!(TextBehindError::font("x").kind(), ErrorKind::Font);
    assert_eq!(TextBehindError::encode("x").kind(), ErrorKind::Encode);
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TextBehindError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.kind(), ErrorKind::Other);
}
