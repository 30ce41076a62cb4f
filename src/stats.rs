// Sensorsynth - Synthetic IoT telemetry
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Descriptive statistics over dataset columns.
//!
//! Standard deviations are sample deviations (n - 1). Correlations that
//! involve a constant column are undefined and reported as `None`.

use crate::dataset::{Column, SensorDataset};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Basic statistics for a column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; 0 for a single value.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl ColumnStats {
    /// Statistics of `values`, `None` when empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let mean = mean(values);
        let std_dev = if count > 1 {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        } else {
            0.0
        };
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            count,
            mean,
            std_dev,
            min,
            max,
        })
    }

    /// Statistics of one dataset column.
    pub fn of(dataset: &SensorDataset, column: Column) -> Option<Self> {
        Self::from_values(&dataset.column(column))
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Pearson correlation coefficient.
///
/// `None` if the slices differ in length, have fewer than two values, or
/// either one is constant.
pub fn pearson(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() || a.len() < 2 {
        return None;
    }
    let (mean_a, mean_b) = (mean(a), mean(b));

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let (dx, dy) = (x - mean_a, y - mean_b);
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    if var_a <= 0.0 || var_b <= 0.0 {
        return None;
    }
    Some((cov / (var_a.sqrt() * var_b.sqrt())).clamp(-1.0, 1.0))
}

/// Pairwise Pearson correlations between dataset columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<Column>,
    /// Row-major, `values[i][j]` = corr(columns[i], columns[j]).
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Correlations between `columns` of `dataset`.
    pub fn compute(dataset: &SensorDataset, columns: &[Column]) -> Self {
        let n = dataset.len();
        let p = columns.len();

        let mut data = DMatrix::<f64>::zeros(n, p);
        for (j, column) in columns.iter().enumerate() {
            for (i, value) in dataset.column(*column).into_iter().enumerate() {
                data[(i, j)] = value;
            }
        }

        let values = if n < 2 {
            vec![vec![None; p]; p]
        } else {
            let cov = covariance_matrix(&data);
            (0..p)
                .map(|i| {
                    (0..p)
                        .map(|j| {
                            let denom = (cov[(i, i)] * cov[(j, j)]).sqrt();
                            if denom <= 0.0 {
                                None
                            } else if i == j {
                                Some(1.0)
                            } else {
                                Some((cov[(i, j)] / denom).clamp(-1.0, 1.0))
                            }
                        })
                        .collect()
                })
                .collect()
        };

        Self {
            columns: columns.to_vec(),
            values,
        }
    }

    /// The standard 7-column matrix of the analysis.
    pub fn standard(dataset: &SensorDataset) -> Self {
        Self::compute(dataset, &Column::CORRELATED)
    }

    /// Correlation between two columns, if both are in the matrix.
    pub fn get(&self, a: Column, b: Column) -> Option<f64> {
        let i = self.columns.iter().position(|c| *c == a)?;
        let j = self.columns.iter().position(|c| *c == b)?;
        self.values[i][j]
    }

    /// Strictly-lower-triangle entries `(row, col, value)`, the part a
    /// heatmap with a masked upper half shows.
    pub fn lower_triangle(&self) -> Vec<(Column, Column, Option<f64>)> {
        let mut cells = Vec::new();
        for i in 0..self.columns.len() {
            for j in 0..i {
                cells.push((self.columns[i], self.columns[j], self.values[i][j]));
            }
        }
        cells
    }
}

/// Sample covariance of the columns of `data` (samples x channels).
fn covariance_matrix(data: &DMatrix<f64>) -> DMatrix<f64> {
    let n = data.nrows();
    let means = data.row_mean();
    let mut centered = data.clone();
    for j in 0..data.ncols() {
        for i in 0..n {
            centered[(i, j)] -= means[j];
        }
    }
    (centered.transpose() * &centered) / (n as f64 - 1.0)
}

/// Least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Square of the Pearson coefficient.
    pub r_squared: f64,
}

impl LinearFit {
    /// Fit `y` against `x`. `None` when `x` or `y` is constant or lengths differ.
    pub fn fit(x: &[f64], y: &[f64]) -> Option<Self> {
        let r = pearson(x, y)?;
        let (mean_x, mean_y) = (mean(x), mean(y));
        let mut sxy = 0.0;
        let mut sxx = 0.0;
        for (a, b) in x.iter().zip(y) {
            sxy += (a - mean_x) * (b - mean_y);
            sxx += (a - mean_x).powi(2);
        }
        let slope = sxy / sxx;
        Some(Self {
            slope,
            intercept: mean_y - slope * mean_x,
            r_squared: r * r,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Equal-width histogram over the data range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// `bins + 1` edges, ascending.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
    /// `count / (total * width)` per bin; integrates to 1.
    pub density: Vec<f64>,
    pub mean: f64,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins. The last bin is closed.
    ///
    /// A constant input gets the range `[v - 0.5, v + 0.5]`.
    pub fn compute(values: &[f64], bins: usize) -> Option<Self> {
        if values.is_empty() || bins == 0 {
            return None;
        }
        let stats = ColumnStats::from_values(values)?;
        let (lo, hi) = if stats.min == stats.max {
            (stats.min - 0.5, stats.max + 0.5)
        } else {
            (stats.min, stats.max)
        };
        let width = (hi - lo) / bins as f64;

        let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        let total = values.len() as f64;
        let density = counts.iter().map(|&c| c as f64 / (total * width)).collect();

        Some(Self {
            edges,
            counts,
            density,
            mean: stats.mean,
        })
    }

    /// Bin centres, for bar placement.
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Reading;
    use approx::assert_relative_eq;

    fn dataset_from(temps: &[f64], hums: &[f64]) -> SensorDataset {
        let readings = temps
            .iter()
            .zip(hums)
            .enumerate()
            .map(|(i, (&t, &h))| Reading {
                timestamp: i as u64 * 2,
                temperature: t,
                humidity: h,
                light: 50.0,
                accel_x: i as i32,
                accel_y: 0,
                accel_z: 1000,
                gyro_x: 0,
                gyro_y: 0,
                gyro_z: 0,
            })
            .collect();
        SensorDataset::from_readings(readings, 2).unwrap()
    }

    #[test]
    fn test_column_stats() {
        let stats = ColumnStats::from_values(&[10.0, 20.0, 30.0]).unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean, 20.0);
        assert_eq!(stats.std_dev, 10.0);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 30.0);

        assert!(ColumnStats::from_values(&[]).is_none());
        assert_eq!(ColumnStats::from_values(&[4.0]).unwrap().std_dev, 0.0);
    }

    #[test]
    fn test_pearson() {
        let a = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(pearson(&a, &[2.0, 4.0, 6.0, 8.0]).unwrap(), 1.0);
        assert_relative_eq!(pearson(&a, &[8.0, 6.0, 4.0, 2.0]).unwrap(), -1.0);
        assert!(pearson(&a, &[1.0, 1.0, 1.0, 1.0]).is_none());
        assert!(pearson(&a, &[1.0]).is_none());
    }

    #[test]
    fn test_correlation_matrix() {
        let dataset = dataset_from(&[20.0, 22.0, 24.0, 26.0], &[60.0, 57.0, 55.0, 50.0]);
        let matrix = CorrelationMatrix::standard(&dataset);

        assert_eq!(matrix.columns.len(), 7);
        assert_relative_eq!(
            matrix.get(Column::Temperature, Column::Temperature).unwrap(),
            1.0,
            epsilon = 1e-12
        );
        let th = matrix.get(Column::Temperature, Column::Humidity).unwrap();
        let ht = matrix.get(Column::Humidity, Column::Temperature).unwrap();
        assert_relative_eq!(th, ht, epsilon = 1e-12);
        assert!(th < -0.9);

        // Light is constant
        assert_eq!(matrix.get(Column::Light, Column::Temperature), None);

        let pearson_th = pearson(
            &dataset.column(Column::Temperature),
            &dataset.column(Column::Humidity),
        );
        assert_relative_eq!(th, pearson_th.unwrap(), epsilon = 1e-9);
    }

    #[test]
    fn test_lower_triangle() {
        let dataset = dataset_from(&[20.0, 22.0, 24.0], &[60.0, 57.0, 55.0]);
        let matrix = CorrelationMatrix::standard(&dataset);
        // 7 * 6 / 2
        assert_eq!(matrix.lower_triangle().len(), 21);
        assert_eq!(matrix.lower_triangle()[0].0, Column::Humidity);
        assert_eq!(matrix.lower_triangle()[0].1, Column::Temperature);
    }

    #[test]
    fn test_linear_fit() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.0, 3.0, 5.0, 7.0];
        let fit = LinearFit::fit(&x, &y).unwrap();
        assert_relative_eq!(fit.slope, 2.0);
        assert_relative_eq!(fit.intercept, 1.0);
        assert_relative_eq!(fit.r_squared, 1.0);
        assert_relative_eq!(fit.predict(10.0), 21.0);

        assert!(LinearFit::fit(&[1.0, 1.0], &[2.0, 3.0]).is_none());
    }

    #[test]
    fn test_histogram() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 4.0];
        let hist = Histogram::compute(&values, 4).unwrap();
        assert_eq!(hist.edges, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        // Last bin is closed on the right
        assert_eq!(hist.counts, vec![1, 1, 1, 3]);
        assert_eq!(hist.counts.iter().sum::<usize>(), values.len());

        let area: f64 = hist.density.iter().map(|d| d * 1.0).sum();
        assert_relative_eq!(area, 1.0, epsilon = 1e-12);
        assert_eq!(hist.centers()[0], 0.5);
    }

    #[test]
    fn test_histogram_constant_input() {
        let hist = Histogram::compute(&[5.0, 5.0, 5.0], 2).unwrap();
        assert_eq!(hist.edges, vec![4.5, 5.0, 5.5]);
        assert_eq!(hist.counts, vec![0, 3]);
        assert!(Histogram::compute(&[], 5).is_none());
    }
}
