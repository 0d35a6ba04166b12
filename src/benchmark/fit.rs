//! Fitting observed runtimes against a theoretical order of growth.
//!
//! The fit is a single constant factor: each sample yields the coefficient
//! `seconds / theoretical(|V|, |E|)`, and the mean coefficient turns the
//! theoretical cost back into a predicted runtime.

use super::RuntimeSample;

/// Linear cost `|V| + |E|` of a depth-first analysis.
pub fn theoretical_linear(vertices: f64, edges: f64) -> f64 {
    vertices + edges
}

/// Coefficient of every sample whose theoretical cost is non-zero.
pub fn compute_coefficients<F>(samples: &[RuntimeSample], theoretical: F) -> Vec<f64>
where
    F: Fn(f64, f64) -> f64,
{
    samples
        .iter()
        .filter_map(|s| {
            let cost = theoretical(s.vertices, s.edges);
            (cost != 0.0).then(|| s.seconds / cost)
        })
        .collect()
}

/// Arithmetic mean of `coefficients`, `None` when there are none.
pub fn mean_coefficient(coefficients: &[f64]) -> Option<f64> {
    if coefficients.is_empty() {
        return None;
    }
    Some(coefficients.iter().sum::<f64>() / coefficients.len() as f64)
}

/// Runtime predicted for each sample as `coefficient * theoretical(|V|, |E|)`.
pub fn predicted_runtimes<F>(samples: &[RuntimeSample], coefficient: f64, theoretical: F) -> Vec<f64>
where
    F: Fn(f64, f64) -> f64,
{
    samples
        .iter()
        .map(|s| coefficient * theoretical(s.vertices, s.edges))
        .collect()
}

/// Observed and predicted runtime of one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct FitRow {
    pub density: f64,
    pub size: usize,
    pub vertices: f64,
    pub edges: f64,
    pub observed: f64,
    pub predicted: f64,
}

/// Outcome of fitting a set of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct FitReport {
    /// Mean coefficient the predictions are scaled by
    pub coefficient: f64,
    pub rows: Vec<FitRow>,
}

/// Fits `samples` against `theoretical`.
///
/// The first `skip` coefficients are left out of the mean; small graphs are
/// dominated by constant overhead and distort the fit. Returns `None` when
/// no coefficient remains.
///
/// # Example
///
/// ```
/// use sccscope::benchmark::{fit, theoretical_linear, RuntimeSample};
///
/// let samples = vec![
///     RuntimeSample { density: 1.0, size: 10, vertices: 10.0, edges: 10.0, seconds: 0.2 },
///     RuntimeSample { density: 1.0, size: 20, vertices: 20.0, edges: 20.0, seconds: 0.4 },
/// ];
///
/// let report = fit(&samples, theoretical_linear, 0).unwrap();
/// assert!((report.coefficient - 0.01).abs() < 1e-12);
/// assert!((report.rows[1].predicted - 0.4).abs() < 1e-12);
/// ```
pub fn fit<F>(samples: &[RuntimeSample], theoretical: F, skip: usize) -> Option<FitReport>
where
    F: Fn(f64, f64) -> f64,
{
    let coefficients = compute_coefficients(samples, &theoretical);
    let coefficient = mean_coefficient(coefficients.get(skip..).unwrap_or_default())?;

    let rows = samples
        .iter()
        .zip(predicted_runtimes(samples, coefficient, &theoretical))
        .map(|(s, predicted)| FitRow {
            density: s.density,
            size: s.size,
            vertices: s.vertices,
            edges: s.edges,
            observed: s.seconds,
            predicted,
        })
        .collect();

    Some(FitReport { coefficient, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(vertices: f64, edges: f64, seconds: f64) -> RuntimeSample {
        RuntimeSample {
            density: 1.0,
            size: vertices as usize,
            vertices,
            edges,
            seconds,
        }
    }

    #[test]
    fn test_theoretical_linear() {
        assert_eq!(theoretical_linear(10.0, 25.0), 35.0);
    }

    #[test]
    fn test_compute_coefficients() {
        let samples = vec![sample(10.0, 10.0, 2.0), sample(0.0, 0.0, 1.0), sample(5.0, 5.0, 5.0)];
        assert_eq!(compute_coefficients(&samples, theoretical_linear), vec![0.1, 0.5]);
    }

    #[test]
    fn test_mean_coefficient() {
        let mean = mean_coefficient(&[0.1, 0.3]).unwrap();
        assert!((mean - 0.2).abs() < 1e-12);
        assert_eq!(mean_coefficient(&[]), None);
    }

    #[test]
    fn test_predicted_runtimes() {
        let samples = vec![sample(10.0, 10.0, 2.0), sample(5.0, 15.0, 1.0)];
        assert_eq!(predicted_runtimes(&samples, 0.5, theoretical_linear), vec![10.0, 10.0]);
    }

    #[test]
    fn test_fit_skips_leading_coefficients() {
        let samples = vec![sample(1.0, 1.0, 10.0), sample(10.0, 10.0, 2.0), sample(20.0, 20.0, 4.0)];

        let report = fit(&samples, theoretical_linear, 1).unwrap();
        assert!((report.coefficient - 0.1).abs() < 1e-12);
        assert_eq!(report.rows.len(), 3);
        assert!((report.rows[0].predicted - 0.2).abs() < 1e-12);
        assert_eq!(report.rows[0].observed, 10.0);
    }

    #[test]
    fn test_fit_without_coefficients() {
        assert!(fit(&[], theoretical_linear, 0).is_none());
        assert!(fit(&[sample(1.0, 1.0, 1.0)], theoretical_linear, 5).is_none());
    }
}
