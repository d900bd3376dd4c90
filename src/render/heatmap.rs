//! Figure 3: annotated Pearson correlation heatmap
//!
//! Cells are colored with RdBu over a fixed [-1, 1] range (red = negative,
//! blue = positive) and annotated with the coefficient to two decimals.
//! Variable names label the rows and columns.

use super::caption::{draw_caption, draw_title};
use super::colorbar::draw_colorbar;
use super::palettes::{HEATMAP_PALETTE, PALETTE_REGISTRY};
use super::{pt_to_px, DrawResult, FigureResult};
use crate::config::{AnalysisConfig, HEATMAP_FILENAME};
use crate::forecast::stats::CorrelationMatrix;
use crate::forecast::{ForecastError, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};
use std::path::Path;

const TITLE_LINES: [&str; 2] = [
    "Correlation Matrix of Explanatory Variables",
    "and Coral Cover Change",
];

const CAPTION: &str = "Figure 3. Correlation matrix of explanatory variables and coral cover \
change. The heatmap displays Pearson correlation coefficients between coral cover change and \
each explanatory variable, as well as correlations among explanatory variables themselves. \
Negative correlations are shown in shades of red, while positive correlations are in shades \
of blue. The strength of correlation is represented by color intensity, with values closer \
to \u{b1}1 indicating stronger relationships.";

/// Render the correlation heatmap to the configured output directory
pub fn render_correlation_heatmap(
    matrix: &CorrelationMatrix,
    config: &AnalysisConfig,
) -> Result<FigureResult> {
    if matrix.is_empty() {
        return Err(ForecastError::Empty(
            "correlation matrix has no variables".to_string(),
        ));
    }

    let (width, height) = config.pixel_dims(config.heatmap_size_in);
    let path = config.output_dir.join(HEATMAP_FILENAME);

    draw(&path, width, height, matrix, config)
        .map_err(|e| ForecastError::Render(format!("{HEATMAP_FILENAME}: {e}")))?;

    Ok(FigureResult {
        path,
        width,
        height,
    })
}

fn draw(
    path: &Path,
    width: u32,
    height: u32,
    matrix: &CorrelationMatrix,
    config: &AnalysisConfig,
) -> DrawResult {
    let dpi = config.dpi;
    let title_px = pt_to_px(14.0, dpi) as u32;
    let name_px = pt_to_px(10.0, dpi);
    let annot_px = pt_to_px(9.0, dpi);
    let bar_label_px = pt_to_px(10.0, dpi) as u32;
    let caption_px = pt_to_px(8.0, dpi) as u32;

    let n = matrix.len();
    let nf = n as f64;

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let title_h = (title_px as f64 * 3.4) as u32;
    let (title_area, body) = root.split_vertically(title_h);
    draw_title(&title_area, &TITLE_LINES, title_px)?;

    let (_, body_h) = body.dim_in_pixel();
    let (plot_row, caption_area) = body.split_vertically((body_h as f64 * 0.76) as u32);

    let (plot_w, _) = plot_row.dim_in_pixel();
    let bar_w = (plot_w as f64 * 0.12) as u32;
    let (chart_area, bar_area) = plot_row.split_horizontally(plot_w - bar_w);

    // Reserve room for the manually drawn variable names.
    let name_area_px = (name_px * 12.0) as u32;
    let mut chart = ChartBuilder::on(&chart_area)
        .margin((name_px * 0.8) as u32)
        .x_label_area_size((name_px * 2.5) as u32)
        .y_label_area_size(name_area_px)
        .build_cartesian_2d(0.0..nf, 0.0..nf)?;

    let palette = PALETTE_REGISTRY
        .get(HEATMAP_PALETTE)
        .ok_or_else(|| format!("palette '{HEATMAP_PALETTE}' missing"))?;

    // Cell fills; row 0 of the matrix sits at the top.
    chart.draw_series((0..n).flat_map(|i| (0..n).map(move |j| (i, j))).map(
        |(i, j)| {
            let value = matrix.values[i][j];
            let [r, g, b] = cell_color(palette, value);
            Rectangle::new(
                [
                    (j as f64, nf - 1.0 - i as f64),
                    (j as f64 + 1.0, nf - i as f64),
                ],
                RGBColor(r, g, b).filled(),
            )
        },
    ))?;

    // Thin borders between cells.
    for k in 0..=n {
        let kf = k as f64;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(kf, 0.0), (kf, nf)],
            WHITE.stroke_width(2),
        )))?;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(0.0, kf), (nf, kf)],
            WHITE.stroke_width(2),
        )))?;
    }

    // Annotations, white on dark cells.
    for i in 0..n {
        for j in 0..n {
            let value = matrix.values[i][j];
            let [r, g, b] = cell_color(palette, value);
            let dark = luminance(r, g, b) < 140.0;
            let style = TextStyle::from(FontDesc::new(
                FontFamily::SansSerif,
                annot_px,
                FontStyle::Normal,
            ))
            .color(if dark { &WHITE } else { &BLACK })
            .pos(Pos::new(HPos::Center, VPos::Center));
            chart.draw_series(std::iter::once(Text::new(
                format!("{value:.2}"),
                (j as f64 + 0.5, nf - 1.0 - i as f64 + 0.5),
                style,
            )))?;
        }
    }

    // Variable names along the left and bottom edges.
    let name_font = FontDesc::new(FontFamily::SansSerif, name_px, FontStyle::Bold);
    let row_style = TextStyle::from(name_font.clone())
        .color(&BLACK)
        .pos(Pos::new(HPos::Right, VPos::Center));
    let col_style = TextStyle::from(name_font)
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));

    let gap = (name_px * 0.5) as i32;
    for (i, label) in matrix.labels.iter().enumerate() {
        let (x, y) = chart.backend_coord(&(0.0, nf - 1.0 - i as f64 + 0.5));
        root.draw(&Text::new(label.clone(), (x - gap, y), row_style.clone()))?;
    }
    for (j, label) in matrix.labels.iter().enumerate() {
        let (x, y) = chart.backend_coord(&(j as f64 + 0.5, 0.0));
        root.draw(&Text::new(label.clone(), (x, y + gap), col_style.clone()))?;
    }

    draw_colorbar(
        &bar_area,
        palette,
        -1.0,
        1.0,
        "Pearson's Correlation Coefficient",
        bar_label_px,
    )?;

    draw_caption(&caption_area, CAPTION, caption_px)?;

    root.present()?;
    Ok(())
}

/// Cell color for a coefficient; undefined pairs render mid-gray
fn cell_color(palette: &super::palettes::PaletteDefinition, value: f64) -> [u8; 3] {
    if value.is_nan() {
        return [200, 200, 200];
    }
    palette.interpolate((value.clamp(-1.0, 1.0) + 1.0) / 2.0)
}

/// Perceived brightness used to pick the annotation color
fn luminance(r: u8, g: u8, b: u8) -> f64 {
    0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_color_endpoints() {
        let palette = PALETTE_REGISTRY.get(HEATMAP_PALETTE).unwrap();
        assert_eq!(cell_color(palette, -1.0), palette.interpolate(0.0));
        assert_eq!(cell_color(palette, 1.0), palette.interpolate(1.0));
        assert_eq!(cell_color(palette, f64::NAN), [200, 200, 200]);
    }

    #[test]
    fn test_luminance_orders_black_and_white() {
        assert!(luminance(0, 0, 0) < luminance(255, 255, 255));
        assert!(luminance(103, 0, 31) < 140.0); // deep RdBu red reads as dark
    }
}
