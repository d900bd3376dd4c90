//! Figure rendering
//!
//! All three figures are drawn with the plotters bitmap backend:
//! - `map.rs`: global site scatter colored by coral cover change
//! - `scatter.rs`: SST change × pH change scatter
//! - `heatmap.rs`: annotated Pearson correlation heatmap
//! - `palettes.rs`: embedded colormap registry
//! - `caption.rs` / `colorbar.rs`: shared figure furniture

pub mod caption;
pub mod colorbar;
pub mod heatmap;
pub mod map;
pub mod palettes;
pub mod scatter;

use std::path::PathBuf;

/// Error type for drawing operations
pub(crate) type DrawResult = Result<(), Box<dyn std::error::Error>>;

/// A rendered figure on disk
#[derive(Debug, Clone)]
pub struct FigureResult {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Convert a point size to pixels at the configured DPI
pub(crate) fn pt_to_px(pt: f64, dpi: u32) -> f64 {
    pt * dpi as f64 / 72.0
}

/// Min and max of a sample, ignoring non-finite values
pub(crate) fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if min > max {
        (0.0, 1.0)
    } else {
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pt_to_px() {
        assert!((pt_to_px(72.0, 300) - 300.0).abs() < 1e-12);
        assert!((pt_to_px(12.0, 72) - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_value_range() {
        let (min, max) = value_range([3.0, -1.0, f64::NAN, 7.5].into_iter());
        assert_eq!((min, max), (-1.0, 7.5));

        // Empty input falls back to a unit range
        assert_eq!(value_range(std::iter::empty()), (0.0, 1.0));
    }
}
