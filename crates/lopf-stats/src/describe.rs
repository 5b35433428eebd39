//! Distribution summary of a deviation sample.

use serde::Serialize;

/// Count, moments, quartiles and extremes of one check's samples.
///
/// NaN samples are skipped, so a reconstruction that is undefined for some
/// entity does not poison the whole row. Quartiles interpolate linearly
/// between order statistics; `std` is the sample standard deviation and is
/// NaN for a single sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl Describe {
    /// Summarise `samples`, or `None` when no sample is a number.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = samples.iter().copied().filter(|v| !v.is_nan()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        Some(Self {
            count,
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        })
    }
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_matches_reference_values() {
        let d = Describe::from_samples(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(d.count, 4);
        assert_eq!(d.min, 1.0);
        assert_eq!(d.max, 4.0);
        assert_eq!(d.mean, 2.5);
        assert!((d.q25 - 1.75).abs() < 1e-12);
        assert!((d.median - 2.5).abs() < 1e-12);
        assert!((d.q75 - 3.25).abs() < 1e-12);
        assert!((d.std - 1.2909944487358056).abs() < 1e-12);
    }

    #[test]
    fn test_nan_samples_are_skipped() {
        let d = Describe::from_samples(&[f64::NAN, -2.0, 2.0]).unwrap();
        assert_eq!(d.count, 2);
        assert_eq!(d.mean, 0.0);
    }

    #[test]
    fn test_empty_and_all_nan_yield_none() {
        assert!(Describe::from_samples(&[]).is_none());
        assert!(Describe::from_samples(&[f64::NAN]).is_none());
    }

    #[test]
    fn test_single_sample() {
        let d = Describe::from_samples(&[7.0]).unwrap();
        assert_eq!(d.min, 7.0);
        assert_eq!(d.q75, 7.0);
        assert!(d.std.is_nan());
    }
}
