use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        KinetextError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        KinetextError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        KinetextError::texture_load("x")
            .to_string()
            .contains("texture load failure:")
    );
    assert!(
        KinetextError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn font_not_found_names_the_request() {
    let err = KinetextError::font_not_found("Comic Sans MS");
    assert_eq!(err.to_string(), "font not found: Comic Sans MS");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = KinetextError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
