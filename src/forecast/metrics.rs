//! Derived site metrics
//!
//! Percentage change in coral cover between the two reference years, plus
//! absolute SST and pH deltas. Sites with a zero (or missing) 2020 coral
//! cover baseline get a missing percentage change and are excluded from
//! downstream figures and correlations.

use super::error::Result;
use polars::prelude::*;

/// Derived column: percentage change in coral cover, 2020 → 2100
pub const CORAL_CHANGE: &str = "coral_change_percent";
/// Derived column: absolute SST change, 2020 → 2100
pub const SST_CHANGE: &str = "SST_change";
/// Derived column: absolute pH change, 2020 → 2100
pub const PH_CHANGE: &str = "pH_change";

/// Add the derived metric columns to an aggregated site table
pub fn derive_metrics(sites: &DataFrame) -> Result<DataFrame> {
    let derived = sites
        .clone()
        .lazy()
        .with_columns([
            when(col("coral_cover_2020").neq(lit(0.0)))
                .then(
                    (col("coral_cover_2100") - col("coral_cover_2020"))
                        / col("coral_cover_2020")
                        * lit(100.0),
                )
                .otherwise(lit(NULL))
                .alias(CORAL_CHANGE),
            (col("SST_2100") - col("SST_2020")).alias(SST_CHANGE),
            (col("pH_2100") - col("pH_2020")).alias(PH_CHANGE),
        ])
        .collect()?;

    Ok(derived)
}

/// Number of sites whose percentage change is missing (zero or missing baseline)
pub fn excluded_site_count(derived: &DataFrame) -> Result<usize> {
    Ok(derived.column(CORAL_CHANGE)?.null_count())
}

/// Clip a column to the given bounds, exactly at the boundary
///
/// Missing values pass through unchanged.
pub fn cap_column(
    frame: &DataFrame,
    column: &str,
    upper: Option<f64>,
    lower: Option<f64>,
) -> Result<DataFrame> {
    let mut expr = col(column);
    if let Some(hi) = upper {
        expr = when(col(column).gt(lit(hi))).then(lit(hi)).otherwise(expr);
    }
    if let Some(lo) = lower {
        expr = when(col(column).lt(lit(lo))).then(lit(lo)).otherwise(expr);
    }

    let capped = frame
        .clone()
        .lazy()
        .with_column(expr.alias(column))
        .collect()?;
    Ok(capped)
}

/// Retain exactly the sites whose percentage change is ≤ 0
pub fn decline_only(frame: &DataFrame) -> Result<DataFrame> {
    let declines = frame
        .clone()
        .lazy()
        .filter(col(CORAL_CHANGE).lt_eq(lit(0.0)))
        .collect()?;
    Ok(declines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site_fixture() -> DataFrame {
        df!(
            "longitude" => [150.0, -60.0, 10.0],
            "latitude" => [-20.0, 15.0, 5.0],
            "coral_cover_2020" => [Some(40.0), Some(0.0), Some(10.0)],
            "coral_cover_2100" => [Some(10.0), Some(5.0), Some(14.0)],
            "SST_2020" => [27.0, 25.0, 26.0],
            "SST_2100" => [29.5, 27.0, 28.0],
            "pH_2020" => [8.05, 8.10, 8.08],
            "pH_2100" => [7.85, 7.95, 7.90],
            "SST_seasonal" => [2.0, 4.0, 3.0],
            "PAR" => [40.0, 35.0, 38.0],
        )
        .unwrap()
    }

    fn change_values(frame: &DataFrame) -> Vec<Option<f64>> {
        frame
            .column(CORAL_CHANGE)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn test_percentage_change_formula() {
        let derived = derive_metrics(&site_fixture()).unwrap();
        let changes = change_values(&derived);
        // (10 - 40) / 40 * 100 = -75
        assert!((changes[0].unwrap() - -75.0).abs() < 1e-12);
        // (14 - 10) / 10 * 100 = +40
        assert!((changes[2].unwrap() - 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_baseline_yields_missing() {
        let derived = derive_metrics(&site_fixture()).unwrap();
        let changes = change_values(&derived);
        assert!(changes[1].is_none());
        assert_eq!(excluded_site_count(&derived).unwrap(), 1);
    }

    #[test]
    fn test_deltas() {
        let derived = derive_metrics(&site_fixture()).unwrap();
        let sst: Vec<Option<f64>> = derived
            .column(SST_CHANGE)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert!((sst[0].unwrap() - 2.5).abs() < 1e-12);
        let ph: Vec<Option<f64>> = derived
            .column(PH_CHANGE)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert!((ph[0].unwrap() - -0.2).abs() < 1e-12);
    }

    #[test]
    fn test_cap_is_exact_at_the_boundary() {
        let frame = df!(
            CORAL_CHANGE => [Some(199.9), Some(200.0), Some(200.1), Some(-250.0), None],
        )
        .unwrap();

        let capped = cap_column(&frame, CORAL_CHANGE, Some(200.0), Some(-200.0)).unwrap();
        let values = change_values(&capped);
        assert_eq!(values[0], Some(199.9));
        assert_eq!(values[1], Some(200.0));
        assert_eq!(values[2], Some(200.0));
        assert_eq!(values[3], Some(-200.0));
        assert_eq!(values[4], None);
    }

    #[test]
    fn test_decline_only_retains_nonpositive_changes() {
        let derived = derive_metrics(&site_fixture()).unwrap();
        let declines = decline_only(&derived).unwrap();
        let values = change_values(&declines);
        assert_eq!(values.len(), 1);
        assert!(values[0].unwrap() <= 0.0);
    }
}
