//! Summary statistics behind the pre-aggregated charts

use serde::{Deserialize, Serialize};

/// Linearly interpolated quantile of already sorted values
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Five numbers drawn by a box plot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest observation within 1.5 IQR below q1
    pub lowerfence: f64,
    /// Largest observation within 1.5 IQR above q3
    pub upperfence: f64,
}

impl BoxStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let q1 = quantile(&sorted, 0.25)?;
        let median = quantile(&sorted, 0.5)?;
        let q3 = quantile(&sorted, 0.75)?;
        let iqr = q3 - q1;
        let low_limit = q1 - 1.5 * iqr;
        let high_limit = q3 + 1.5 * iqr;

        let lowerfence = sorted.iter().copied().find(|&v| v >= low_limit).unwrap_or(q1);
        let upperfence = sorted.iter().rev().copied().find(|&v| v <= high_limit).unwrap_or(q3);

        Some(Self {
            q1,
            median,
            q3,
            lowerfence,
            upperfence,
        })
    }
}

/// Equal-width histogram over the observed range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub start: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin finite values into `n_bins` bins; the last bin is closed on the right
    pub fn from_values(values: &[f64], n_bins: usize) -> Option<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || n_bins == 0 {
            return None;
        }
        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let span = max - min;
        let bin_width = if span > 0.0 { span / n_bins as f64 } else { 1.0 };
        let mut counts = vec![0usize; n_bins];
        for v in finite {
            let idx = (((v - min) / bin_width) as usize).min(n_bins - 1);
            counts[idx] += 1;
        }

        Some(Self {
            start: min,
            bin_width,
            counts,
        })
    }

    pub fn centers(&self) -> Vec<f64> {
        (0..self.counts.len())
            .map(|i| self.start + (i as f64 + 0.5) * self.bin_width)
            .collect()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}
