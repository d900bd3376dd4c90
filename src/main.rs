//! coral-forecast - Main entry point
//!
//! Loads the coral forecast dataset, aggregates it by site, derives
//! percentage-change and delta metrics, and writes three PNG figures.

use coral_forecast::config::AnalysisConfig;
use coral_forecast::pipeline;

fn main() {
    println!("coral-forecast v{}", env!("CARGO_PKG_VERSION"));

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = AnalysisConfig::from_args(&args);

    println!("  Input: {}", config.input_path.display());
    println!("  Output dir: {}", config.output_dir.display());
    println!("  DPI: {}", config.dpi);
    if config.decline_only {
        println!("  Variant: decline-only");
    }
    println!();

    match pipeline::run(&config) {
        Ok(figures) => {
            println!(
                "\n✓ {} figures written to {}",
                figures.len(),
                config.output_dir.display()
            );
        }
        Err(e) => {
            eprintln!("\n✗ Analysis failed: {}", e);
            eprintln!("\nNote: expected input columns are");
            eprintln!("  longitude, latitude, model, coral_cover_2020, coral_cover_2100,");
            eprintln!("  SST_2020, SST_2100, pH_2020, pH_2100, SST_seasonal, PAR");
            std::process::exit(1);
        }
    }
}
