//! Palette registry for the figure colormaps
//!
//! Loads palettes from palettes.json (embedded at compile time) and provides
//! access by name. The stop lists mirror the colormaps the figures were
//! designed around (RdYlGn for the cover-change map, coolwarm for the
//! stressor scatter, RdBu for the correlation heatmap).
//!
//! Palette types:
//! - `sequential`: gradient from low to high values
//! - `diverging`: gradient with a neutral midpoint (e.g., for +/- deviations)

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;

/// Embedded palettes.json content
const PALETTES_JSON: &str = include_str!("../../palettes.json");

/// Global palette registry, initialized lazily on first access
pub static PALETTE_REGISTRY: Lazy<PaletteRegistry> = Lazy::new(|| {
    PaletteRegistry::from_json(PALETTES_JSON).unwrap_or_else(|e| {
        eprintln!("ERROR: Failed to load palettes.json: {}", e);
        PaletteRegistry::default()
    })
});

/// Colormap of the global cover-change map
pub const MAP_PALETTE: &str = "RdYlGn";
/// Colormap of the stressor scatter
pub const SCATTER_PALETTE: &str = "coolwarm";
/// Colormap of the correlation heatmap
pub const HEATMAP_PALETTE: &str = "RdBu";

/// Palette type as defined in palettes.json
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteType {
    Sequential,
    Diverging,
}

/// A single palette definition from palettes.json
#[derive(Debug, Clone, Deserialize)]
pub struct PaletteDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub palette_type: PaletteType,
    pub colors: Vec<String>,
}

impl PaletteDefinition {
    /// Get a color stop by index
    pub fn get_color(&self, index: usize) -> [u8; 3] {
        if self.colors.is_empty() {
            return [128, 128, 128]; // Gray fallback
        }
        let idx = index.min(self.colors.len() - 1);
        parse_hex_color(&self.colors[idx]).unwrap_or([128, 128, 128])
    }

    /// Get the number of color stops in this palette
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Check if the palette is empty
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Interpolate a color from the palette at position t ∈ [0, 1]
    ///
    /// t=0 returns the first color, t=1 returns the last color.
    /// Values in between are linearly interpolated.
    pub fn interpolate(&self, t: f64) -> [u8; 3] {
        if self.colors.is_empty() {
            return [128, 128, 128]; // Gray fallback
        }

        let t = t.clamp(0.0, 1.0);
        let n = self.colors.len();

        if n == 1 {
            return self.get_color(0);
        }

        // Map t to position in the color array
        let pos = t * (n - 1) as f64;
        let idx_low = pos.floor() as usize;
        let idx_high = (idx_low + 1).min(n - 1);
        let frac = pos - idx_low as f64;

        let color_low = self.get_color(idx_low);
        let color_high = self.get_color(idx_high);

        // Linear interpolation between the two colors
        [
            (color_low[0] as f64 * (1.0 - frac) + color_high[0] as f64 * frac) as u8,
            (color_low[1] as f64 * (1.0 - frac) + color_high[1] as f64 * frac) as u8,
            (color_low[2] as f64 * (1.0 - frac) + color_high[2] as f64 * frac) as u8,
        ]
    }

    /// Color for a value within [vmin, vmax]
    ///
    /// A degenerate range maps everything to the palette midpoint.
    pub fn color_for(&self, value: f64, vmin: f64, vmax: f64) -> [u8; 3] {
        let t = if vmax > vmin {
            (value - vmin) / (vmax - vmin)
        } else {
            0.5
        };
        self.interpolate(t)
    }
}

/// Registry of all available palettes
#[derive(Debug, Clone, Default)]
pub struct PaletteRegistry {
    /// All palettes by name (lowercase keys for case-insensitive lookup)
    palettes: HashMap<String, PaletteDefinition>,
    /// Sequential palette names (for listing)
    sequential_names: Vec<String>,
    /// Diverging palette names (for listing)
    diverging_names: Vec<String>,
}

impl PaletteRegistry {
    /// Load palettes from JSON string
    pub fn from_json(json: &str) -> Result<Self, String> {
        let definitions: Vec<PaletteDefinition> = serde_json::from_str(json)
            .map_err(|e| format!("Failed to parse palettes JSON: {}", e))?;

        let mut registry = Self::default();

        for def in definitions {
            let name = def.name.clone();
            match def.palette_type {
                PaletteType::Sequential => registry.sequential_names.push(name.clone()),
                PaletteType::Diverging => registry.diverging_names.push(name.clone()),
            }
            // Store with lowercase key for case-insensitive lookup
            registry.palettes.insert(name.to_lowercase(), def);
        }

        Ok(registry)
    }

    /// Get a palette by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&PaletteDefinition> {
        self.palettes.get(&name.to_lowercase())
    }

    /// List all sequential palette names
    pub fn sequential_palettes(&self) -> &[String] {
        &self.sequential_names
    }

    /// List all diverging palette names
    pub fn diverging_palettes(&self) -> &[String] {
        &self.diverging_names
    }
}

/// Parse a hex color string to RGB array
///
/// Supports formats:
/// - `#RRGGBB` (6 hex digits)
/// - `#RRGGBBAA` (8 hex digits, alpha ignored)
/// - `RRGGBB` (without #)
/// - `RRGGBBAA` (without #)
fn parse_hex_color(hex: &str) -> Option<[u8; 3]> {
    let hex = hex.trim_start_matches('#');

    // Handle 6-digit (RGB) or 8-digit (RGBA) hex
    if hex.len() != 6 && hex.len() != 8 {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some([r, g, b])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        // 6-digit hex
        assert_eq!(parse_hex_color("#FF0000"), Some([255, 0, 0]));
        assert_eq!(parse_hex_color("#00FF00"), Some([0, 255, 0]));
        assert_eq!(parse_hex_color("#0000FF"), Some([0, 0, 255]));
        assert_eq!(parse_hex_color("#A50026"), Some([165, 0, 38]));

        // Without #
        assert_eq!(parse_hex_color("FF0000"), Some([255, 0, 0]));

        // 8-digit hex (with alpha, ignored)
        assert_eq!(parse_hex_color("#440154FF"), Some([68, 1, 84]));
        assert_eq!(parse_hex_color("440154FF"), Some([68, 1, 84]));

        // Invalid
        assert_eq!(parse_hex_color("#FFF"), None); // Too short
        assert_eq!(parse_hex_color("GGGGGG"), None); // Invalid hex
    }

    #[test]
    fn test_palette_registry_loads() {
        let registry = &*PALETTE_REGISTRY;

        let map_palette = registry.get(MAP_PALETTE);
        assert!(map_palette.is_some());
        let map_palette = map_palette.unwrap();
        assert_eq!(map_palette.palette_type, PaletteType::Diverging);
        assert!(!map_palette.is_empty());

        // First stop of RdYlGn is #A50026 (deep red)
        assert_eq!(map_palette.get_color(0), [165, 0, 38]);

        assert!(registry.get(SCATTER_PALETTE).is_some());
        assert!(registry.get(HEATMAP_PALETTE).is_some());
        // Lookup is case-insensitive
        assert!(registry.get("rdbu").is_some());
    }

    #[test]
    fn test_palette_types() {
        let registry = &*PALETTE_REGISTRY;

        assert!(registry.diverging_palettes().contains(&"RdBu".to_string()));
        assert!(registry
            .diverging_palettes()
            .contains(&"coolwarm".to_string()));
        assert!(registry
            .sequential_palettes()
            .contains(&"Viridis".to_string()));
    }

    #[test]
    fn test_interpolation_endpoints() {
        let palette = PALETTE_REGISTRY.get(HEATMAP_PALETTE).unwrap();
        let n = palette.len();

        assert_eq!(palette.interpolate(0.0), palette.get_color(0));
        assert_eq!(palette.interpolate(1.0), palette.get_color(n - 1));

        // Out-of-range t is clamped
        assert_eq!(palette.interpolate(-1.0), palette.get_color(0));
        assert_eq!(palette.interpolate(2.0), palette.get_color(n - 1));
    }

    #[test]
    fn test_color_for_degenerate_range() {
        let palette = PALETTE_REGISTRY.get(SCATTER_PALETTE).unwrap();
        assert_eq!(palette.color_for(3.0, 3.0, 3.0), palette.interpolate(0.5));
    }
}
