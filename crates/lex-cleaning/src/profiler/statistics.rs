//! Descriptive statistics over the present values of a column.
//!
//! All functions take only present values; callers strip [`Absent`] cells
//! first. Empty input yields `None` rather than NaN or zero.
//!
//! [`Absent`]: crate::dataset::Cell::Absent

use std::cmp::Ordering;
use std::collections::HashMap;

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median; the average of the two middle values for even counts.
pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Quantile using linear interpolation between the closest order statistics.
///
/// The position of quantile `q` among `n` sorted values is `(n - 1) * q`.
/// With a single value every quantile is that value.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    let sorted = sorted_copy(values);
    quantile_sorted(&sorted, q)
}

/// [`quantile`] on values that are already sorted ascending.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let position = (sorted.len() - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Most frequent value; ties resolve to the smallest value.
pub fn numeric_mode(values: &[f64]) -> Option<f64> {
    let sorted = sorted_copy(values);
    let mut best: Option<(f64, usize)> = None;
    let mut index = 0;

    // Runs of equal values are contiguous once sorted; strict `>` keeps the
    // first (smallest) run on ties.
    while index < sorted.len() {
        let value = sorted[index];
        let run = sorted[index..].iter().take_while(|v| **v == value).count();
        if best.is_none_or(|(_, count)| run > count) {
            best = Some((value, run));
        }
        index += run;
    }

    best.map(|(value, _)| value)
}

/// Most frequent string; ties resolve to the lexicographically smallest.
pub fn text_mode<'a>(values: &[&'a str]) -> Option<&'a str> {
    value_counts(values).into_iter().next().map(|(value, _)| value)
}

/// Frequency of each distinct string, most frequent first, ties ordered
/// lexicographically.
pub fn value_counts<'a>(values: &[&'a str]) -> Vec<(&'a str, usize)> {
    let mut counts: HashMap<&'a str, usize> = HashMap::new();
    for value in values {
        *counts.entry(*value).or_insert(0) += 1;
    }

    let mut counts: Vec<(&'a str, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    counts
}

/// Sample standard deviation (n - 1 denominator). `None` below two values.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Pearson correlation of two equally long samples.
///
/// `None` when fewer than two pairs exist or either side has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mean_x = mean(xs)?;
    let mean_y = mean(ys)?;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(covariance / (var_x.sqrt() * var_y.sqrt()))
}

/// Sorted copy of the values, ascending.
pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}
