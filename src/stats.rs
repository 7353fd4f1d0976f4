//! Sample statistics over repeated simulation runs.

/// Mean and standard error of a sample series.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stats {
    pub mean: f64,
    pub stderr: f64,
    pub n: usize,
}

impl Stats {
    /// Mean and standard error (population standard deviation over
    /// `sqrt(n)`) of `values`; `None` for an empty slice.
    pub fn of(values: &[f64]) -> Option<Stats> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        Some(Stats {
            mean,
            stderr: var.sqrt() / n.sqrt(),
            n: values.len(),
        })
    }
}
