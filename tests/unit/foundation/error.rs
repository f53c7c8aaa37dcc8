use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PosterError::document("x")
            .to_string()
            .contains("document error:")
    );
    assert!(PosterError::config("x").to_string().contains("config error:"));
    assert!(PosterError::asset("x").to_string().contains("asset error:"));
    assert!(PosterError::font("x").to_string().contains("font error:"));
    assert!(PosterError::text("x").to_string().contains("text error:"));
    assert!(PosterError::encode("x").to_string().contains("encode error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PosterError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn poster_errors_map_to_element_errors() {
    assert!(matches!(
        RenderError::from(PosterError::font("missing.ttf")),
        RenderError::Font(_)
    ));
    assert!(matches!(
        RenderError::from(PosterError::text("bad size")),
        RenderError::Text(_)
    ));
    assert!(matches!(
        RenderError::from(PosterError::asset("gone")),
        RenderError::Fetch(_)
    ));
    let raster = RenderError::from(PosterError::encode("x"));
    assert!(raster.to_string().contains("encode error"));
}
