//! Figure 2: coral cover change as a function of SST and pH change
//!
//! One point per site, colored by capped percentage change (coolwarm,
//! blue = greater decline).

use super::caption::{draw_caption, draw_title};
use super::colorbar::draw_colorbar;
use super::palettes::{PALETTE_REGISTRY, SCATTER_PALETTE};
use super::{pt_to_px, value_range, DrawResult, FigureResult};
use crate::config::{AnalysisConfig, SCATTER_FILENAME};
use crate::forecast::metrics::{CORAL_CHANGE, PH_CHANGE, SST_CHANGE};
use crate::forecast::stats::complete_rows;
use crate::forecast::{ForecastError, Result};
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};
use std::path::Path;

const TITLE_LINES: [&str; 2] = [
    "Predicted Percentage Change in Coral Cover",
    "as a Function of SST and pH Change",
];

const CAPTION: &str = "Figure 2. Predicted percentage change in coral cover from 2020 to 2100 \
as a function of SST change and pH change, averaged across simulations. Each point represents \
a site, with colors indicating coral cover change percentages (blue for greater declines, red \
for stability or minor declines). This scatter plot highlights the expected decline in coral \
cover under increased SST and decreased pH, illustrating how changes in temperature and ocean \
acidification are linked to coral ecosystem health.";

/// Render the stressor scatter to the configured output directory
pub fn render_stressor_scatter(
    frame: &polars::prelude::DataFrame,
    config: &AnalysisConfig,
) -> Result<FigureResult> {
    let rows = complete_rows(frame, &[SST_CHANGE, PH_CHANGE, CORAL_CHANGE])?;
    if rows.is_empty() {
        return Err(ForecastError::Empty(
            "no sites with complete SST, pH, and cover-change values".to_string(),
        ));
    }

    let (width, height) = config.pixel_dims(config.scatter_size_in);
    let path = config.output_dir.join(SCATTER_FILENAME);

    draw(&path, width, height, &rows, config)
        .map_err(|e| ForecastError::Render(format!("{SCATTER_FILENAME}: {e}")))?;

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
    rows: &[Vec<f64>],
    config: &AnalysisConfig,
) -> DrawResult {
    let dpi = config.dpi;
    let title_px = pt_to_px(12.0, dpi) as u32;
    let tick_px = pt_to_px(8.0, dpi);
    let desc_px = pt_to_px(10.0, dpi);
    let label_px = pt_to_px(9.0, dpi) as u32;
    let caption_px = pt_to_px(8.0, dpi) as u32;
    let radius = pt_to_px(config.scatter_point_size, dpi).max(1.0) as i32;

    let (x_min, x_max) = padded(value_range(rows.iter().map(|row| row[0])));
    let (y_min, y_max) = padded(value_range(rows.iter().map(|row| row[1])));
    let (vmin, vmax) = value_range(rows.iter().map(|row| row[2]));

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let title_h = (title_px as f64 * 3.2) as u32;
    let (title_area, body) = root.split_vertically(title_h);
    draw_title(&title_area, &TITLE_LINES, title_px)?;

    let (_, body_h) = body.dim_in_pixel();
    let (plot_row, caption_area) = body.split_vertically((body_h as f64 * 0.72) as u32);

    let (plot_w, _) = plot_row.dim_in_pixel();
    let bar_w = (plot_w as f64 * 0.13) as u32;
    let (chart_area, bar_area) = plot_row.split_horizontally(plot_w - bar_w);

    let bold_desc = TextStyle::from(FontDesc::new(
        FontFamily::SansSerif,
        desc_px,
        FontStyle::Bold,
    ));

    let mut chart = ChartBuilder::on(&chart_area)
        .margin((tick_px * 1.5) as u32)
        .x_label_area_size((desc_px * 3.0) as u32)
        .y_label_area_size((desc_px * 4.0) as u32)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("SST Change (°C)")
        .y_desc("Predicted pH Change (units)")
        .axis_desc_style(bold_desc)
        .label_style(TextStyle::from(FontDesc::new(
            FontFamily::SansSerif,
            tick_px,
            FontStyle::Normal,
        )))
        .draw()?;

    let palette = PALETTE_REGISTRY
        .get(SCATTER_PALETTE)
        .ok_or_else(|| format!("palette '{SCATTER_PALETTE}' missing"))?;

    chart.draw_series(rows.iter().map(|row| {
        let [r, g, b] = palette.color_for(row[2], vmin, vmax);
        Circle::new((row[0], row[1]), radius, RGBColor(r, g, b).mix(0.6).filled())
    }))?;

    draw_colorbar(
        &bar_area,
        palette,
        vmin,
        vmax,
        "Coral Cover Change (%)",
        label_px,
    )?;

    draw_caption(&caption_area, CAPTION, caption_px)?;

    root.present()?;
    Ok(())
}

/// Pad a range by 5% on each side so edge points are not clipped
fn padded((min, max): (f64, f64)) -> (f64, f64) {
    let span = (max - min).abs().max(1e-9);
    (min - span * 0.05, max + span * 0.05)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_range_contains_input() {
        let (min, max) = padded((-2.0, 3.0));
        assert!(min < -2.0 && max > 3.0);

        // Degenerate ranges still widen
        let (min, max) = padded((1.0, 1.0));
        assert!(min < 1.0 && max > 1.0);
    }
}
