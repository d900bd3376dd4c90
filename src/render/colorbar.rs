//! Vertical colorbar with ticks and a rotated label

use super::palettes::PaletteDefinition;
use super::DrawResult;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle, FontTransform};

const GRADIENT_STEPS: usize = 128;

/// Draw a vertical colorbar filling `area`
///
/// The gradient runs bottom (vmin) to top (vmax); tick labels sit to the
/// right of the bar and the label is drawn rotated along the right edge.
pub fn draw_colorbar(
    area: &DrawingArea<BitMapBackend, Shift>,
    palette: &PaletteDefinition,
    vmin: f64,
    vmax: f64,
    label: &str,
    font_px: u32,
) -> DrawResult {
    let (w, h) = area.dim_in_pixel();

    let top = (h as f64 * 0.10) as i32;
    let bottom = (h as f64 * 0.90) as i32;
    let bar_x0 = (w as f64 * 0.10) as i32;
    let bar_x1 = (w as f64 * 0.34) as i32;
    let span = (bottom - top) as f64;

    for k in 0..GRADIENT_STEPS {
        let t0 = k as f64 / GRADIENT_STEPS as f64;
        let t1 = (k + 1) as f64 / GRADIENT_STEPS as f64;
        let y_low = bottom - (span * t0) as i32;
        let y_high = bottom - (span * t1) as i32;
        let [r, g, b] = palette.interpolate((t0 + t1) / 2.0);
        area.draw(&Rectangle::new(
            [(bar_x0, y_high), (bar_x1, y_low)],
            RGBColor(r, g, b).filled(),
        ))?;
    }
    area.draw(&Rectangle::new(
        [(bar_x0, top), (bar_x1, bottom)],
        ShapeStyle::from(&RGBColor(80, 80, 80)),
    ))?;

    let tick_len = (font_px as f64 * 0.4).max(2.0) as i32;
    let tick_style = TextStyle::from(FontDesc::new(
        FontFamily::SansSerif,
        font_px as f64,
        FontStyle::Normal,
    ))
    .color(&BLACK)
    .pos(Pos::new(HPos::Left, VPos::Center));

    for k in 0..=4 {
        let frac = k as f64 / 4.0;
        let value = vmin + frac * (vmax - vmin);
        let y = bottom - (span * frac) as i32;
        area.draw(&PathElement::new(
            vec![(bar_x1, y), (bar_x1 + tick_len, y)],
            BLACK,
        ))?;
        area.draw(&Text::new(
            format_tick(value, vmax - vmin),
            (bar_x1 + tick_len + tick_len / 2 + 2, y),
            tick_style.clone(),
        ))?;
    }

    let label_style = TextStyle::from(
        FontDesc::new(FontFamily::SansSerif, font_px as f64, FontStyle::Bold)
            .transform(FontTransform::Rotate270),
    )
    .color(&BLACK)
    .pos(Pos::new(HPos::Center, VPos::Center));
    area.draw(&Text::new(
        label.to_string(),
        (w as i32 - (font_px as f64 * 0.8) as i32, (top + bottom) / 2),
        label_style,
    ))?;

    Ok(())
}

/// Tick label precision scaled to the value range
fn format_tick(value: f64, range: f64) -> String {
    if range.abs() >= 10.0 {
        format!("{value:.0}")
    } else if range.abs() >= 1.0 {
        format!("{value:.1}")
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_precision_follows_range() {
        assert_eq!(format_tick(-150.0, 350.0), "-150");
        assert_eq!(format_tick(1.25, 2.5), "1.2");
        assert_eq!(format_tick(-0.21, 0.4), "-0.21");
    }
}
