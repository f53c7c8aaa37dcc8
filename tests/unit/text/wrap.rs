use super::*;

fn glyph_width(ch: char) -> f32 {
    match ch {
        'W' => 30.0,
        ' ' => 4.0,
        '\n' => 0.0,
        _ => 10.0,
    }
}

fn fixed(text: &str) -> PosterResult<f32> {
    Ok(text.chars().map(glyph_width).sum())
}

fn check_invariants(text: &str, max: f32) -> Vec<String> {
    let mut m = fixed;
    let lines = wrap_text(text, &mut m, max).unwrap();
    assert_eq!(lines.concat(), text);
    for line in &lines {
        let w = fixed(line).unwrap();
        assert!(
            w <= max || line.trim_end_matches('\n').chars().count() == 1,
            "line {line:?} is {w}px wide (max {max})"
        );
        assert!(!line.is_empty());
    }
    lines
}

#[test]
fn wraps_greedily_per_character() {
    let lines = check_invariants("abcdefg", 30.0);
    assert_eq!(lines, vec!["abc", "def", "g"]);
}

#[test]
fn exact_fit_stays_on_one_line() {
    let lines = check_invariants("abc", 30.0);
    assert_eq!(lines, vec!["abc"]);
}

#[test]
fn oversize_character_gets_its_own_line() {
    let lines = check_invariants("aWb", 20.0);
    assert_eq!(lines, vec!["a", "W", "b"]);

    let lines = check_invariants("W", 5.0);
    assert_eq!(lines, vec!["W"]);
}

#[test]
fn ignores_word_boundaries() {
    let lines = check_invariants("ab cd", 24.0);
    assert_eq!(lines, vec!["ab ", "cd"]);
}

#[test]
fn newlines_close_fragments() {
    let lines = check_invariants("ab\ncd\n\ne", 100.0);
    assert_eq!(lines, vec!["ab\n", "cd\n", "\n", "e"]);
}

#[test]
fn empty_text_has_no_lines() {
    let mut m = fixed;
    assert!(wrap_text("", &mut m, 10.0).unwrap().is_empty());
}

#[test]
fn multibyte_text_round_trips() {
    let text = "海报生成器支持中文换行";
    let lines = check_invariants(text, 35.0);
    assert_eq!(lines.len(), 4);
    assert!(lines.iter().take(3).all(|l| l.chars().count() == 3));
}

#[test]
fn measurement_errors_propagate() {
    let mut failing =
        |_: &str| -> PosterResult<f32> { Err(crate::PosterError::text("no metrics")) };
    assert!(wrap_text("abc", &mut failing, 10.0).is_err());
}

#[test]
fn measures_once_per_character() {
    let mut calls = 0usize;
    let mut counting = |s: &str| -> PosterResult<f32> {
        calls += 1;
        fixed(s)
    };
    wrap_text("abcdefghij", &mut counting, 25.0).unwrap();
    assert_eq!(calls, 10);
}
