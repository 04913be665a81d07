//! Statistical helper functions for the ENSO diagnostics.
//!
//! Every helper treats non-finite values (`NaN`, the missing marker) as
//! absent: they are filtered out pairwise or elementwise before any
//! moment is computed. Variances use the population (N) denominator.

/// Count, mean and population variance of the finite values of a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    /// Number of finite values.
    pub count: usize,
    /// Mean of the finite values.
    pub mean: f64,
    /// Population variance (N denominator) of the finite values.
    pub variance: f64,
}

impl Moments {
    /// Population standard deviation.
    pub fn sd(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// Mean over the finite values. Returns `NaN` if there are none.
pub fn nan_mean(data: &[f64]) -> f64 {
    let (sum, n) = data
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), &v| (s + v, n + 1));
    if n == 0 { f64::NAN } else { sum / n as f64 }
}

/// Moments of the finite values, or `None` if there are none.
pub fn moments<I>(data: I) -> Option<Moments>
where
    I: IntoIterator<Item = f64>,
{
    let finite: Vec<f64> = data.into_iter().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    let n = finite.len() as f64;
    let mean = finite.iter().sum::<f64>() / n;
    let variance = finite.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / n;
    Some(Moments {
        count: finite.len(),
        mean,
        variance,
    })
}

/// Weighted mean over entries whose value and weight are both finite.
///
/// Weights are renormalised over the entries that contribute, so a missing
/// value neither biases the mean towards zero nor counts towards the
/// denominator. Returns `NaN` if nothing contributes or the total weight is
/// not positive.
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> f64 {
    let mut num = 0.0;
    let mut den = 0.0;
    for (&v, &w) in values.iter().zip(weights) {
        if v.is_finite() && w.is_finite() {
            num += v * w;
            den += w;
        }
    }
    if den > 0.0 { num / den } else { f64::NAN }
}

/// Ordinary least-squares fit of `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    /// Regression slope.
    pub slope: f64,
    /// Regression intercept.
    pub intercept: f64,
    /// Pearson correlation of the fitted pairs (`NaN` if `y` is constant).
    pub rvalue: f64,
    /// Number of finite pairs used in the fit.
    pub n: usize,
}

impl LinearFit {
    /// Fitted value at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

fn finite_pairs(x: &[f64], y: &[f64]) -> Vec<(f64, f64)> {
    x.iter()
        .zip(y.iter())
        .filter(|(xi, yi)| xi.is_finite() && yi.is_finite())
        .map(|(xi, yi)| (*xi, *yi))
        .collect()
}

/// Least-squares line through the finite `(x, y)` pairs.
///
/// Returns `None` if fewer than 2 finite pairs remain or `x` is constant.
pub fn linear_fit(x: &[f64], y: &[f64]) -> Option<LinearFit> {
    let pairs = finite_pairs(x, y);
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mx: f64 = pairs.iter().map(|(xi, _)| xi).sum::<f64>() / n;
    let my: f64 = pairs.iter().map(|(_, yi)| yi).sum::<f64>() / n;

    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    let mut sum_yy = 0.0;
    for &(xi, yi) in &pairs {
        let dx = xi - mx;
        let dy = yi - my;
        sum_xy += dx * dy;
        sum_xx += dx * dx;
        sum_yy += dy * dy;
    }

    if sum_xx == 0.0 {
        return None;
    }

    let slope = sum_xy / sum_xx;
    let rvalue = if sum_yy == 0.0 {
        f64::NAN
    } else {
        (sum_xy / (sum_xx * sum_yy).sqrt()).clamp(-1.0, 1.0)
    };

    Some(LinearFit {
        slope,
        intercept: my - slope * mx,
        rvalue,
        n: pairs.len(),
    })
}
