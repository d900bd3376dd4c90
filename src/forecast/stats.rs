//! Summary statistics and Pearson correlation
//!
//! Correlations are computed pairwise-complete: for each variable pair,
//! rows where both values are present. The matrix is symmetric with a unit
//! diagonal by construction.

use super::error::{ForecastError, Result};
use polars::prelude::*;

/// Pearson correlation coefficient of two equal-length samples
///
/// Returns `None` for fewer than two points or when either sample has zero
/// variance.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }

    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return None;
    }
    Some((cov / denom).clamp(-1.0, 1.0))
}

/// A labelled square correlation matrix
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    /// Row-major coefficients; NaN where a pair was undefined
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Extract one column as optional f64 values
pub fn column_values(frame: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let values = frame
        .column(name)?
        .as_materialized_series()
        .f64()?
        .into_iter()
        .collect();
    Ok(values)
}

/// Rows of `columns` where every value is present
pub fn complete_rows(frame: &DataFrame, columns: &[&str]) -> Result<Vec<Vec<f64>>> {
    let extracted: Vec<Vec<Option<f64>>> = columns
        .iter()
        .map(|name| column_values(frame, name))
        .collect::<Result<_>>()?;

    let mut rows = Vec::new();
    for i in 0..frame.height() {
        let row: Option<Vec<f64>> = extracted.iter().map(|col| col[i]).collect();
        if let Some(row) = row {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Pairwise-complete Pearson correlation matrix over the named columns
pub fn correlation_matrix(frame: &DataFrame, columns: &[&str]) -> Result<CorrelationMatrix> {
    let extracted: Vec<Vec<Option<f64>>> = columns
        .iter()
        .map(|name| column_values(frame, name))
        .collect::<Result<_>>()?;

    let n = columns.len();
    let mut values = vec![vec![f64::NAN; n]; n];

    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let mut xs = Vec::new();
            let mut ys = Vec::new();
            for row in 0..frame.height() {
                if let (Some(x), Some(y)) = (extracted[i][row], extracted[j][row]) {
                    xs.push(x);
                    ys.push(y);
                }
            }
            let r = pearson(&xs, &ys).unwrap_or(f64::NAN);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        labels: columns.iter().map(|s| s.to_string()).collect(),
        values,
    })
}

/// `describe()`-style summary of one sample
#[derive(Debug, Clone)]
pub struct SeriesSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl std::fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "    count  {}", self.count)?;
        writeln!(f, "    mean   {:.4}", self.mean)?;
        writeln!(f, "    std    {:.4}", self.std)?;
        writeln!(f, "    min    {:.4}", self.min)?;
        writeln!(f, "    25%    {:.4}", self.q1)?;
        writeln!(f, "    50%    {:.4}", self.median)?;
        writeln!(f, "    75%    {:.4}", self.q3)?;
        write!(f, "    max    {:.4}", self.max)
    }
}

/// Summarize the non-missing values of one column
pub fn summarize_column(frame: &DataFrame, name: &str) -> Result<SeriesSummary> {
    let values: Vec<f64> = column_values(frame, name)?.into_iter().flatten().collect();
    summarize(&values)
        .ok_or_else(|| ForecastError::Empty(format!("no values to summarize in '{name}'")))
}

/// Summarize a sample; `None` when it is empty
pub fn summarize(values: &[f64]) -> Option<SeriesSummary> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let std = if n > 1 {
        (sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
    } else {
        0.0
    };

    Some(SeriesSummary {
        count: n,
        mean,
        std,
        min: sorted[0],
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max: sorted[n - 1],
    })
}

/// Linear-interpolation quantile of a pre-sorted sample
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q * (n - 1) as f64;
    let low = pos.floor() as usize;
    let high = pos.ceil() as usize;
    let frac = pos - low as f64;
    sorted[low] * (1.0 - frac) + sorted[high] * frac
}
