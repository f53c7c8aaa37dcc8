use super::*;

#[test]
fn parses_hex_forms() {
    assert_eq!("#ff0000".parse::<Color>().unwrap(), Color::rgb(255, 0, 0));
    assert_eq!("#FFF".parse::<Color>().unwrap(), Color::WHITE);
    assert_eq!("010203".parse::<Color>().unwrap(), Color::INK);
    assert_eq!(
        "#0000ff80".parse::<Color>().unwrap(),
        Color::rgba(0, 0, 255, 128)
    );
    assert_eq!("#fff0".parse::<Color>().unwrap(), Color::rgba(255, 255, 255, 0));
}

#[test]
fn parses_functional_and_named() {
    assert_eq!(
        "rgb(10, 20, 30)".parse::<Color>().unwrap(),
        Color::rgb(10, 20, 30)
    );
    assert_eq!(
        "rgba(10,20,30,0.5)".parse::<Color>().unwrap(),
        Color::rgba(10, 20, 30, 128)
    );
    assert_eq!("White".parse::<Color>().unwrap(), Color::WHITE);
    assert_eq!("transparent".parse::<Color>().unwrap().a, 0);
}

#[test]
fn rejects_garbage() {
    assert!("#12".parse::<Color>().is_err());
    assert!("#zzzzzz".parse::<Color>().is_err());
    assert!("rgb(1,2)".parse::<Color>().is_err());
    assert!("rgb(1,2,3".parse::<Color>().is_err());
    assert!("#ééé".parse::<Color>().is_err());
}

#[test]
fn blank_falls_back_to_default() {
    assert_eq!(Color::parse_or("   ", Color::INK).unwrap(), Color::INK);
    assert_eq!(Color::parse_or("", Color::WHITE).unwrap(), Color::WHITE);
    assert_eq!(
        Color::parse_or(" #000 ", Color::WHITE).unwrap(),
        Color::rgb(0, 0, 0)
    );
}

#[test]
fn opaque_forces_alpha() {
    assert_eq!(Color::rgba(1, 2, 3, 0).opaque(), Color::INK);
}

#[test]
fn full_css_name_table_is_accepted() {
    assert_eq!("rebeccapurple".parse::<Color>().unwrap(), Color::rgb(102, 51, 153));
    assert_eq!("LightGoldenRodYellow".parse::<Color>().unwrap(), Color::rgb(250, 250, 210));
    assert_eq!("darkgrey".parse::<Color>().unwrap(), Color::rgb(169, 169, 169));
    assert_eq!("aliceblue".parse::<Color>().unwrap(), Color::rgb(240, 248, 255));
    assert_eq!("yellowgreen".parse::<Color>().unwrap(), Color::rgb(154, 205, 50));
    assert!("mauve-ish".parse::<Color>().is_err());
}

#[test]
fn name_table_is_sorted_for_lookup() {
    assert!(CSS_NAMES.windows(2).all(|w| w[0].0 < w[1].0));
    assert_eq!(CSS_NAMES.len(), 148);
}
