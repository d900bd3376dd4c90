//! Figure 1: global map of predicted coral cover change
//!
//! Sites are plotted on an equirectangular longitude/latitude plane and
//! colored by their capped percentage change (RdYlGn, red = decline,
//! green = increase). Gridlines sit at the fixed locators lon
//! {-180, -90, 0, 90, 180} and lat {-40, -20, 0, 20, 40}.

use super::caption::{draw_caption, draw_title};
use super::colorbar::draw_colorbar;
use super::palettes::{MAP_PALETTE, PALETTE_REGISTRY};
use super::{pt_to_px, value_range, DrawResult, FigureResult};
use crate::config::{AnalysisConfig, MAP_FILENAME};
use crate::forecast::metrics::CORAL_CHANGE;
use crate::forecast::stats::complete_rows;
use crate::forecast::{ForecastError, Result};
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};
use std::path::Path;

const TITLE: &str = "Predicted Average Percentage Change in Coral Cover (2020-2100)";

const CAPTION: &str = "Figure 1. Predicted average percentage change in coral cover from 2020 \
to 2100, based on simulations across approximately 52,000 sites. Each point represents the \
average coral cover change at a given location, with colors ranging from green (increase in \
coral cover) to red (decrease in coral cover). The global view shows the widespread decline \
in tropical coral cover, particularly in the Indo-Pacific and Caribbean regions, illustrating \
the geographical variability and expected impact on coral reefs over the century.";

const LON_GRIDLINES: [f64; 5] = [-180.0, -90.0, 0.0, 90.0, 180.0];
const LAT_GRIDLINES: [f64; 5] = [-40.0, -20.0, 0.0, 20.0, 40.0];

const LON_RANGE: (f64, f64) = (-180.0, 180.0);
const LAT_RANGE: (f64, f64) = (-50.0, 50.0);

/// Render the global cover-change map to the configured output directory
pub fn render_cover_change_map(
    frame: &polars::prelude::DataFrame,
    config: &AnalysisConfig,
) -> Result<FigureResult> {
    let rows = complete_rows(frame, &["longitude", "latitude", CORAL_CHANGE])?;
    if rows.is_empty() {
        return Err(ForecastError::Empty(
            "no sites with a defined coral cover change".to_string(),
        ));
    }

    let (width, height) = config.pixel_dims(config.map_size_in);
    let path = config.output_dir.join(MAP_FILENAME);

    draw(&path, width, height, &rows, config)
        .map_err(|e| ForecastError::Render(format!("{MAP_FILENAME}: {e}")))?;

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
    let title_px = pt_to_px(13.0, dpi) as u32;
    let tick_px = pt_to_px(9.0, dpi);
    let label_px = pt_to_px(8.0, dpi) as u32;
    let caption_px = pt_to_px(8.0, dpi) as u32;
    let radius = pt_to_px(config.map_point_size, dpi).max(1.0) as i32;

    let (vmin, vmax) = value_range(rows.iter().map(|row| row[2]));

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let title_h = (title_px as f64 * 2.0) as u32;
    let (title_area, body) = root.split_vertically(title_h);
    draw_title(&title_area, &[TITLE], title_px)?;

    let (_, body_h) = body.dim_in_pixel();
    let (plot_row, caption_area) = body.split_vertically((body_h as f64 * 0.76) as u32);

    let (plot_w, _) = plot_row.dim_in_pixel();
    let bar_w = (plot_w as f64 * 0.11) as u32;
    let (chart_area, bar_area) = plot_row.split_horizontally(plot_w - bar_w);

    let mut chart = ChartBuilder::on(&chart_area)
        .margin((tick_px * 1.5) as u32)
        .x_label_area_size((tick_px * 2.5) as u32)
        .y_label_area_size((tick_px * 3.5) as u32)
        .build_cartesian_2d(LON_RANGE.0..LON_RANGE.1, LAT_RANGE.0..LAT_RANGE.1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(5)
        .y_labels(5)
        .x_label_formatter(&|v| format!("{v:.0}"))
        .y_label_formatter(&|v| format!("{v:.0}"))
        .label_style(TextStyle::from(FontDesc::new(
            FontFamily::SansSerif,
            tick_px,
            FontStyle::Normal,
        )))
        .draw()?;

    for &lon in &LON_GRIDLINES {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(lon, LAT_RANGE.0), (lon, LAT_RANGE.1)],
            BLACK.mix(0.15),
        )))?;
    }
    for &lat in &LAT_GRIDLINES {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(LON_RANGE.0, lat), (LON_RANGE.1, lat)],
            BLACK.mix(0.15),
        )))?;
    }

    let palette = PALETTE_REGISTRY
        .get(MAP_PALETTE)
        .ok_or_else(|| format!("palette '{MAP_PALETTE}' missing"))?;

    chart.draw_series(rows.iter().map(|row| {
        let [r, g, b] = palette.color_for(row[2], vmin, vmax);
        Circle::new((row[0], row[1]), radius, RGBColor(r, g, b).mix(0.5).filled())
    }))?;

    draw_colorbar(
        &bar_area,
        palette,
        vmin,
        vmax,
        "Average Coral Cover Change (%)",
        label_px,
    )?;

    draw_caption(&caption_area, CAPTION, caption_px)?;

    root.present()?;
    Ok(())
}
