//! Analysis configuration
//!
//! Defaults reproduce the original study's behavior: fixed input and output
//! locations, 300 DPI figures, a +200% display cap on coral cover change.
//! A thin `--key value` argument parser can override the paths, the DPI,
//! and the decline-only variant.

use std::path::PathBuf;

/// Output file name of the global cover-change map (figure 1)
pub const MAP_FILENAME: &str = "average_coral_cover_change_map.png";
/// Output file name of the stressor scatter (figure 2)
pub const SCATTER_FILENAME: &str = "coral_cover_change_sst_ph.png";
/// Output file name of the correlation heatmap (figure 3)
pub const HEATMAP_FILENAME: &str = "coral_cover_correlation_heatmap.png";

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Forecast CSV to load
    pub input_path: PathBuf,

    /// Directory the three PNG figures are written to
    pub output_dir: PathBuf,

    /// Render resolution; pixel dimensions are figure inches × DPI
    pub dpi: u32,

    /// Skip the units sub-header (second physical line of the source file)
    pub skip_units_row: bool,

    /// Decline-only variant: figure 1 keeps only sites with change ≤ 0
    pub decline_only: bool,

    /// Upper display cap on coral cover change (%)
    pub percent_cap_upper: f64,

    /// Lower display cap on coral cover change (%), decline-only variant
    pub percent_cap_lower: f64,

    /// Figure sizes in inches (width, height)
    pub map_size_in: (f64, f64),
    pub scatter_size_in: (f64, f64),
    pub heatmap_size_in: (f64, f64),

    /// Marker sizes in points
    pub map_point_size: f64,
    pub scatter_point_size: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data/coral_forecast.csv"),
            output_dir: PathBuf::from("figures"),
            dpi: 300,
            skip_units_row: true,
            decline_only: false,
            percent_cap_upper: 200.0,
            percent_cap_lower: -200.0,
            map_size_in: (20.0, 20.0),
            scatter_size_in: (10.0, 8.0),
            heatmap_size_in: (12.0, 10.0),
            map_point_size: 3.0,
            scatter_point_size: 2.5,
        }
    }
}

impl AnalysisConfig {
    /// Build a config from command-line arguments
    ///
    /// Unknown arguments are ignored; unparseable values keep the default.
    pub fn from_args(args: &[String]) -> Self {
        let mut config = Self::default();

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--input" if i + 1 < args.len() => {
                    config.input_path = PathBuf::from(&args[i + 1]);
                    i += 2;
                }
                "--outputDir" if i + 1 < args.len() => {
                    config.output_dir = PathBuf::from(&args[i + 1]);
                    i += 2;
                }
                "--dpi" if i + 1 < args.len() => {
                    if let Ok(dpi) = args[i + 1].parse::<u32>() {
                        if dpi > 0 {
                            config.dpi = dpi;
                        }
                    }
                    i += 2;
                }
                "--declineOnly" => {
                    config.decline_only = true;
                    i += 1;
                }
                "--keepUnitsRow" => {
                    config.skip_units_row = false;
                    i += 1;
                }
                _ => i += 1,
            }
        }

        config
    }

    /// Pixel dimensions of a figure given its size in inches
    pub fn pixel_dims(&self, size_in: (f64, f64)) -> (u32, u32) {
        (
            (size_in.0 * self.dpi as f64).round() as u32,
            (size_in.1 * self.dpi as f64).round() as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.dpi, 300);
        assert!(config.skip_units_row);
        assert!(!config.decline_only);
        assert_eq!(config.percent_cap_upper, 200.0);
    }

    #[test]
    fn test_from_args_overrides() {
        let config = AnalysisConfig::from_args(&args(&[
            "--input",
            "/tmp/forecast.csv",
            "--outputDir",
            "/tmp/out",
            "--dpi",
            "150",
            "--declineOnly",
        ]));
        assert_eq!(config.input_path, PathBuf::from("/tmp/forecast.csv"));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.dpi, 150);
        assert!(config.decline_only);
    }

    #[test]
    fn test_from_args_ignores_unknown_and_bad_values() {
        let config = AnalysisConfig::from_args(&args(&["--dpi", "zero", "--whatever"]));
        assert_eq!(config.dpi, 300);
    }

    #[test]
    fn test_pixel_dims() {
        let config = AnalysisConfig::default();
        assert_eq!(config.pixel_dims((10.0, 8.0)), (3000, 2400));
    }
}
