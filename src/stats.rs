use crate::data::model::{STATUS_COLUMN, StudentDataset};

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Pearson correlation over pairwise-complete observations.
///
/// Returns NaN with fewer than two complete pairs or zero variance.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys.iter())
        .filter_map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((*x, *y)),
            _ => None,
        })
        .collect();

    let n = pairs.len();
    if n < 2 {
        return f64::NAN;
    }

    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for &(x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

/// Correlation of every numeric column with the graduation status, ascending.
///
/// Columns whose correlation is undefined are left out.
pub fn status_correlations(dataset: &StudentDataset) -> Vec<(String, f64)> {
    let status: Vec<Option<f64>> = dataset
        .records
        .iter()
        .map(|r| dataset.status_code(&r.graduation_status))
        .collect();

    let mut out: Vec<(String, f64)> = Vec::new();
    for (name, values) in dataset.numeric_columns() {
        let r = pearson(&values, &status);
        if r.is_nan() {
            log::warn!("Correlation of '{name}' with {STATUS_COLUMN} is undefined; skipped");
            continue;
        }
        out.push((name, r));
    }

    // Stable: ties keep column order.
    out.sort_by(|a, b| a.1.total_cmp(&b.1));
    out
}

// ---------------------------------------------------------------------------
// Histogram binning
// ---------------------------------------------------------------------------

/// Equal-width bin edges shared by one or more histogram groups.
#[derive(Debug, Clone, PartialEq)]
pub struct Bins {
    pub start: f64,
    pub width: f64,
    pub count: usize,
}

impl Bins {
    /// Bins covering `values`. `None` for an empty input.
    ///
    /// A constant input yields a single bin of width 1 centred on the value.
    pub fn covering(values: &[f64], bins: usize) -> Option<Self> {
        let first = *values.first()?;
        let (min, max) = values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));

        if max - min <= f64::EPSILON {
            return Some(Bins {
                start: min - 0.5,
                width: 1.0,
                count: 1,
            });
        }

        let count = bins.max(1);
        Some(Bins {
            start: min,
            width: (max - min) / count as f64,
            count,
        })
    }

    /// Bin index for a value; the maximum falls into the last bin.
    pub fn index(&self, value: f64) -> usize {
        let idx = ((value - self.start) / self.width).floor();
        if idx <= 0.0 {
            0
        } else {
            (idx as usize).min(self.count - 1)
        }
    }

    pub fn counts(&self, values: &[f64]) -> Vec<usize> {
        let mut counts = vec![0usize; self.count];
        for &v in values {
            counts[self.index(v)] += 1;
        }
        counts
    }
}

// ---------------------------------------------------------------------------
// Kernel density
// ---------------------------------------------------------------------------

/// Gaussian kernel density estimate using Scott's rule for the bandwidth.
///
/// Evaluated at `points` evenly spaced over the data range; densities are
/// multiplied by `scale` (use `n * bin_width` to overlay a count histogram).
pub fn gaussian_kde(values: &[f64], points: usize, scale: f64) -> Vec<[f64; 2]> {
    let n = values.len();
    if n < 2 || points < 2 {
        return Vec::new();
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std = variance.sqrt();
    if std == 0.0 {
        return Vec::new();
    }

    let bandwidth = std * (n as f64).powf(-0.2);
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let step = (max - min) / (points - 1) as f64;
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    (0..points)
        .map(|i| {
            let x = min + i as f64 * step;
            let density: f64 = values
                .iter()
                .map(|&v| {
                    let z = (x - v) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                * norm;
            [x, density * scale]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_reader;

    fn some(v: &[f64]) -> Vec<Option<f64>> {
        v.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_pearson_perfect() {
        let x = some(&[1.0, 2.0, 3.0, 4.0]);
        let y = some(&[2.0, 4.0, 6.0, 8.0]);
        assert!((pearson(&x, &y) - 1.0).abs() < 1e-12);
        let neg = some(&[8.0, 6.0, 4.0, 2.0]);
        assert!((pearson(&x, &neg) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_skips_missing() {
        let x = vec![Some(1.0), None, Some(3.0), Some(5.0)];
        let y = vec![Some(1.0), Some(100.0), Some(3.0), Some(5.0)];
        assert!((pearson(&x, &y) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_degenerate() {
        assert!(pearson(&some(&[1.0]), &some(&[2.0])).is_nan());
        assert!(pearson(&some(&[1.0, 1.0, 1.0]), &some(&[1.0, 2.0, 3.0])).is_nan());
    }

    #[test]
    fn test_status_correlations_sorted() {
        let csv = "\
GPA,Absences,StudyTimeWeekly,Constant,GraduationStatus
3.5,1,12,7,1
3.0,4,10,7,1
2.0,15,5,7,0
1.5,25,2,7,0
2.8,6,3,7,1
";
        let ds = load_reader(csv.as_bytes()).unwrap();
        let corr = status_correlations(&ds);
        let names: Vec<&str> = corr.iter().map(|(n, _)| n.as_str()).collect();
        assert!(!names.contains(&"GraduationStatus"));
        assert!(!names.contains(&"Constant"));
        assert_eq!(names.first(), Some(&"Absences"));
        assert!(corr.windows(2).all(|w| w[0].1 <= w[1].1));
    }

    #[test]
    fn test_bins_counts() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0];
        let bins = Bins::covering(&values, 4).unwrap();
        assert_eq!(bins.width, 1.0);
        assert_eq!(bins.counts(&values), vec![1, 1, 1, 2]);
    }

    #[test]
    fn test_bins_empty_and_constant() {
        assert!(Bins::covering(&[], 10).is_none());
        let bins = Bins::covering(&[2.0, 2.0], 10).unwrap();
        assert_eq!(bins.count, 1);
        assert_eq!(bins.counts(&[2.0, 2.0]), vec![2]);
    }

    #[test]
    fn test_kde_curve() {
        let values: Vec<f64> = (0..200).map(|i| (i % 20) as f64).collect();
        let bins = Bins::covering(&values, 20).unwrap();
        let curve = gaussian_kde(&values, 200, values.len() as f64 * bins.width);
        assert_eq!(curve.len(), 200);
        assert!(curve.iter().all(|p| p[1] >= 0.0));
        assert!(gaussian_kde(&[1.0], 50, 1.0).is_empty());
        assert!(gaussian_kde(&[3.0, 3.0, 3.0], 50, 1.0).is_empty());
    }
}
