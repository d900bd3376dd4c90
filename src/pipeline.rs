//! Shared analysis pipeline
//!
//! The pipeline:
//! 1. Loads the forecast CSV
//! 2. Aggregates observations by site
//! 3. Derives percentage-change and delta metrics
//! 4. Prints summary statistics and computes the correlation matrix
//! 5. Renders the three figures

use crate::config::AnalysisConfig;
use crate::forecast::metrics::{self, CORAL_CHANGE, PH_CHANGE, SST_CHANGE};
use crate::forecast::{aggregate_sites, load_forecast, site, stats};
use crate::profile;
use crate::render::{heatmap, map, scatter, FigureResult};

/// Error type for pipeline operations
pub type PipelineError = Box<dyn std::error::Error>;

/// Variables entering the correlation matrix, in display order
pub const CORRELATION_COLUMNS: [&str; 7] = [
    CORAL_CHANGE,
    SST_CHANGE,
    PH_CHANGE,
    "SST_seasonal",
    "PAR",
    "longitude",
    "latitude",
];

/// Run the full analysis and return the rendered figures
pub fn run(config: &AnalysisConfig) -> Result<Vec<FigureResult>, PipelineError> {
    profile::checkpoint("analysis start");
    let t0 = profile::time_start("analysis");

    println!("[1/5] Loading forecast data...");
    println!("  Input: {}", config.input_path.display());
    let table = load_forecast(&config.input_path, config.skip_units_row)?;
    println!("✓ {} records loaded", table.frame.height());
    if table.dropped_no_coords > 0 {
        println!(
            "  Dropped {} rows without coordinates",
            table.dropped_no_coords
        );
    }
    let missing = table.missing_counts();
    if missing.iter().any(|(_, count)| *count > 0) {
        println!("  Missing values:");
        for (name, count) in missing.iter().filter(|(_, count)| *count > 0) {
            println!("    {}: {}", name, count);
        }
    }

    println!("\n[2/5] Aggregating sites...");
    let sites = aggregate_sites(&table.frame)?;
    println!(
        "✓ {} sites from {} records",
        sites.height(),
        table.frame.height()
    );
    if let Some(mean_models) = site::mean_models_per_site(&sites) {
        println!("  Models per site: {:.1}", mean_models);
    }

    println!("\n[3/5] Deriving metrics...");
    let derived = metrics::derive_metrics(&sites)?;
    let excluded = metrics::excluded_site_count(&derived)?;
    if excluded > 0 {
        println!(
            "  Excluded {} sites with a zero or missing 2020 baseline",
            excluded
        );
    }
    let capped = metrics::cap_column(
        &derived,
        CORAL_CHANGE,
        Some(config.percent_cap_upper),
        None,
    )?;
    let map_frame = if config.decline_only {
        let declines = metrics::decline_only(&derived)?;
        println!(
            "  Decline-only variant: {} of {} sites retained",
            declines.height(),
            derived.height()
        );
        metrics::cap_column(
            &declines,
            CORAL_CHANGE,
            None,
            Some(config.percent_cap_lower),
        )?
    } else {
        capped.clone()
    };
    println!("✓ Derived {CORAL_CHANGE}, {SST_CHANGE}, {PH_CHANGE}");

    println!("\n[4/5] Summary statistics...");
    let summary = stats::summarize_column(&derived, CORAL_CHANGE)?;
    println!("  {}:\n{}", CORAL_CHANGE, summary);
    let matrix = stats::correlation_matrix(&derived, &CORRELATION_COLUMNS)?;
    println!("✓ {0}×{0} correlation matrix", matrix.len());

    println!("\n[5/5] Rendering figures...");
    std::fs::create_dir_all(&config.output_dir)?;

    let mut figures = Vec::new();
    let fig1 = map::render_cover_change_map(&map_frame, config)?;
    println!("✓ {} ({}×{})", fig1.path.display(), fig1.width, fig1.height);
    figures.push(fig1);

    let fig2 = scatter::render_stressor_scatter(&capped, config)?;
    println!("✓ {} ({}×{})", fig2.path.display(), fig2.width, fig2.height);
    figures.push(fig2);

    let fig3 = heatmap::render_correlation_heatmap(&matrix, config)?;
    println!("✓ {} ({}×{})", fig3.path.display(), fig3.width, fig3.height);
    figures.push(fig3);

    let _ = profile::time_elapsed("analysis", t0);
    Ok(figures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_fixture_csv(path: &std::path::Path) {
        let mut file = std::fs::File::create(path).unwrap();
        writeln!(
            file,
            "longitude,latitude,model,coral_cover_2020,coral_cover_2100,\
             SST_2020,SST_2100,pH_2020,pH_2100,SST_seasonal,PAR"
        )
        .unwrap();
        // Units sub-header, as in the source dataset.
        writeln!(file, "deg,deg,id,pct,pct,degC,degC,pH,pH,degC,mol").unwrap();
        let rows = [
            "150.0,-20.0,0,30.0,15.0,27.0,29.5,8.05,7.85,2.0,40.0",
            "150.0,-20.0,1,32.0,17.0,27.2,29.9,8.06,7.84,2.1,41.0",
            "-60.0,15.0,0,10.0,11.0,25.0,27.0,8.10,7.95,4.0,35.0",
            "-60.0,15.0,1,14.0,13.0,25.4,27.4,8.12,7.93,4.2,36.0",
            "10.0,5.0,0,20.0,8.0,26.0,28.6,8.08,7.88,3.0,38.0",
            "10.0,5.0,1,22.0,9.0,26.2,28.8,8.09,7.87,3.1,39.0",
            "120.0,-8.0,0,25.0,5.0,28.0,31.0,8.04,7.80,1.5,42.0",
            "120.0,-8.0,1,27.0,6.0,28.1,31.2,8.03,7.81,1.6,43.0",
        ];
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
    }

    #[test]
    fn test_end_to_end_pipeline() {
        let base = std::env::temp_dir().join(format!("coral_forecast_e2e_{}", std::process::id()));
        std::fs::create_dir_all(&base).unwrap();
        let input = base.join("coral_forecast.csv");
        write_fixture_csv(&input);

        let config = AnalysisConfig {
            input_path: input,
            output_dir: base.join("figures"),
            dpi: 30,
            ..Default::default()
        };

        let figures = run(&config).unwrap();
        assert_eq!(figures.len(), 3);
        for figure in &figures {
            let meta = std::fs::metadata(&figure.path).unwrap();
            assert!(meta.len() > 0, "{} is empty", figure.path.display());
        }

        std::fs::remove_dir_all(&base).ok();
    }

    #[test]
    fn test_missing_input_fails() {
        let config = AnalysisConfig {
            input_path: std::path::PathBuf::from("/nonexistent/coral_forecast.csv"),
            ..Default::default()
        };
        assert!(run(&config).is_err());
    }
}
