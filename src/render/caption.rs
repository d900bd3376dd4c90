//! Titles and boxed figure captions
//!
//! Captions are wrapped to the figure width and drawn centered inside a
//! light box with a gray border, below the chart.

use super::DrawResult;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};

/// Word-wrap `text` to lines of at most `max_chars` characters
///
/// Words longer than the budget get a line of their own.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Draw centered bold title lines across the top of `area`
pub fn draw_title(
    area: &DrawingArea<BitMapBackend, Shift>,
    lines: &[&str],
    font_px: u32,
) -> DrawResult {
    let (w, _) = area.dim_in_pixel();
    let style = TextStyle::from(FontDesc::new(
        FontFamily::SansSerif,
        font_px as f64,
        FontStyle::Bold,
    ))
    .color(&BLACK)
    .pos(Pos::new(HPos::Center, VPos::Top));

    let line_h = (font_px as f64 * 1.3) as i32;
    for (i, line) in lines.iter().enumerate() {
        area.draw(&Text::new(
            line.to_string(),
            (w as i32 / 2, line_h / 4 + i as i32 * line_h),
            style.clone(),
        ))?;
    }
    Ok(())
}

/// Draw a boxed, wrapped caption filling `area`
pub fn draw_caption(
    area: &DrawingArea<BitMapBackend, Shift>,
    text: &str,
    font_px: u32,
) -> DrawResult {
    let (w, _) = area.dim_in_pixel();

    let margin_x = (w as f64 * 0.04) as i32;
    let pad = (font_px as f64 * 0.9) as i32;
    let char_w = font_px as f64 * 0.50;
    let budget = (((w as i32 - 2 * (margin_x + pad)) as f64 / char_w).max(10.0)) as usize;

    let lines = wrap_text(text, budget);
    let line_h = (font_px as f64 * 1.4) as i32;
    let box_h = lines.len() as i32 * line_h + 2 * pad;

    area.draw(&Rectangle::new(
        [(margin_x, 0), (w as i32 - margin_x, box_h)],
        RGBColor(245, 245, 245).filled(),
    ))?;
    area.draw(&Rectangle::new(
        [(margin_x, 0), (w as i32 - margin_x, box_h)],
        ShapeStyle::from(&RGBColor(128, 128, 128)),
    ))?;

    let style = TextStyle::from(FontDesc::new(
        FontFamily::SansSerif,
        font_px as f64,
        FontStyle::Normal,
    ))
    .color(&BLACK)
    .pos(Pos::new(HPos::Center, VPos::Top));

    for (i, line) in lines.iter().enumerate() {
        area.draw(&Text::new(
            line.clone(),
            (w as i32 / 2, pad + i as i32 * line_h),
            style.clone(),
        ))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_respects_budget() {
        let lines = wrap_text("alpha beta gamma delta epsilon", 11);
        assert_eq!(lines, vec!["alpha beta", "gamma delta", "epsilon"]);
        for line in &lines {
            assert!(line.chars().count() <= 11);
        }
    }

    #[test]
    fn test_wrap_keeps_long_word_whole() {
        let lines = wrap_text("a supercalifragilistic b", 5);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn test_wrap_empty_text() {
        assert!(wrap_text("", 20).is_empty());
        assert!(wrap_text("   ", 20).is_empty());
    }
}
