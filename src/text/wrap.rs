use crate::foundation::error::PosterResult;

/// Pixel-width measurement of a single-line string.
pub trait TextMeasure {
    /// Rendered advance width of `text` in pixels.
    fn measure(&mut self, text: &str) -> PosterResult<f32>;
}

impl<F> TextMeasure for F
where
    F: FnMut(&str) -> PosterResult<f32>,
{
    fn measure(&mut self, text: &str) -> PosterResult<f32> {
        self(text)
    }
}

/// Split `text` into line fragments no wider than `max_width_px`.
///
/// Greedy per character, no word-boundary awareness. A character wider than the box still gets
/// its own line. A `\n` closes the current fragment and stays at its end, so concatenating the
/// fragments always reproduces `text`.
pub fn wrap_text(
    text: &str,
    measure: &mut impl TextMeasure,
    max_width_px: f32,
) -> PosterResult<Vec<String>> {
    let mut lines = Vec::new();
    let mut acc = String::new();

    for ch in text.chars() {
        if ch == '\n' {
            acc.push(ch);
            lines.push(std::mem::take(&mut acc));
            continue;
        }

        acc.push(ch);
        if measure.measure(&acc)? > max_width_px {
            acc.pop();
            if !acc.is_empty() {
                lines.push(std::mem::take(&mut acc));
            }
            acc.push(ch);
        }
    }

    if !acc.is_empty() {
        lines.push(acc);
    }
    Ok(lines)
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
