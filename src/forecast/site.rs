//! Site aggregation
//!
//! Sites are characterised by a unique (longitude, latitude) combination.
//! Aggregation averages every observation column across the simulation
//! models at each site and drops the `model` column, leaving one row per
//! coordinate pair.

use super::data::OBSERVATION_COLUMNS;
use super::error::{ForecastError, Result};
use polars::prelude::*;

/// Collapse (site, model) observations to one averaged row per site
pub fn aggregate_sites(frame: &DataFrame) -> Result<DataFrame> {
    if frame.height() == 0 {
        return Err(ForecastError::Empty(
            "no forecast records to aggregate".to_string(),
        ));
    }

    let mut aggregations: Vec<Expr> = OBSERVATION_COLUMNS
        .iter()
        .map(|name| col(*name).mean())
        .collect();
    aggregations.push(col("model").count().alias("n_models"));

    let sites = frame
        .clone()
        .lazy()
        .group_by([col("longitude"), col("latitude")])
        .agg(aggregations)
        .collect()?;

    Ok(sites)
}

/// Mean number of model observations per site
pub fn mean_models_per_site(sites: &DataFrame) -> Option<f64> {
    sites
        .column("n_models")
        .ok()
        .and_then(|c| c.as_materialized_series().mean())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_sites_two_models() -> DataFrame {
        df!(
            "longitude" => [150.0, 150.0, -60.0, -60.0],
            "latitude" => [-20.0, -20.0, 15.0, 15.0],
            "model" => [0.0, 1.0, 0.0, 1.0],
            "coral_cover_2020" => [30.0, 32.0, 10.0, 14.0],
            "coral_cover_2100" => [15.0, 17.0, 11.0, 13.0],
            "SST_2020" => [27.0, 27.2, 25.0, 25.4],
            "SST_2100" => [29.5, 29.9, 27.0, 27.4],
            "pH_2020" => [8.05, 8.06, 8.10, 8.12],
            "pH_2100" => [7.85, 7.84, 7.95, 7.93],
            "SST_seasonal" => [2.0, 2.1, 4.0, 4.2],
            "PAR" => [40.0, 41.0, 35.0, 36.0],
        )
        .unwrap()
    }

    #[test]
    fn test_one_row_per_unique_coordinate() {
        let sites = aggregate_sites(&two_sites_two_models()).unwrap();
        assert_eq!(sites.height(), 2);
    }

    #[test]
    fn test_observations_are_averaged_across_models() {
        let sites = aggregate_sites(&two_sites_two_models()).unwrap();

        // Locate the row for the (150, -20) site.
        let lons: Vec<Option<f64>> = sites
            .column("longitude")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        let idx = lons
            .iter()
            .position(|v| *v == Some(150.0))
            .expect("site (150, -20) present");

        let cover = sites
            .column("coral_cover_2020")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .get(idx)
            .unwrap();
        assert!((cover - 31.0).abs() < 1e-12);
    }

    #[test]
    fn test_model_column_is_dropped() {
        let sites = aggregate_sites(&two_sites_two_models()).unwrap();
        assert!(sites.column("model").is_err());
        assert!((mean_models_per_site(&sites).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let empty = two_sites_two_models().head(Some(0));
        assert!(matches!(
            aggregate_sites(&empty),
            Err(ForecastError::Empty(_))
        ));
    }
}
