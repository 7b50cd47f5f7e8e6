/// Numeric helpers shared by the transect and layer builders.

/// Linear interpolation between two values
///
/// # Examples
/// ```
/// use hillslope_mesh::math_utils::lerp;
///
/// assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
/// assert_eq!(lerp(100.0, 200.0, 0.25), 125.0);
/// ```
pub fn lerp(a: f64, b: f64, ratio: f64) -> f64 {
    a + (b - a) * ratio
}

/// Evenly spaced samples over `[start, stop]`, both ends included.
///
/// Each sample is `start + i * step`; the last one is pinned to `stop` so
/// float drift never moves the far end of the transect.
///
/// # Examples
/// ```
/// use hillslope_mesh::math_utils::linspace;
///
/// let x = linspace(0.0, 1000.0, 101);
/// assert_eq!(x.len(), 101);
/// assert_eq!(x[1], 10.0);
/// assert_eq!(x[100], 1000.0);
/// ```
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut values: Vec<f64> = (0..num).map(|i| start + i as f64 * step).collect();
            values[num - 1] = stop;
            values
        }
    }
}

/// Sum in insertion order, the same way the layer loop accumulates depth.
pub fn ordered_sum(values: impl IntoIterator<Item = f64>) -> f64 {
    values.into_iter().fold(0.0, |acc, v| acc + v)
}
