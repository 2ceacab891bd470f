use serde::{Deserialize, Serialize};

/// Online mean and variance accumulator (Welford's algorithm).
pub struct Accumulator {
    n_vals: usize,
    mean: f64,
    diff_2_sum: f64,
    min: f64,
    max: f64,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct AccumulatorReport {
    pub n_vals: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self {
            n_vals: 0,
            mean: 0.0,
            diff_2_sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub fn add(&mut self, val: f64) {
        self.n_vals += 1;

        let diff_a = val - self.mean;
        self.mean += diff_a / self.n_vals as f64;

        let diff_b = val - self.mean;
        self.diff_2_sum += diff_a * diff_b;

        self.min = self.min.min(val);
        self.max = self.max.max(val);
    }

    pub fn report(&self) -> AccumulatorReport {
        let empty = self.n_vals == 0;
        AccumulatorReport {
            n_vals: self.n_vals,
            mean: if empty { f64::NAN } else { self.mean },
            std_dev: if self.n_vals > 1 {
                (self.diff_2_sum / (self.n_vals as f64 - 1.0)).sqrt()
            } else {
                f64::NAN
            },
            min: if empty { f64::NAN } else { self.min },
            max: if empty { f64::NAN } else { self.max },
        }
    }
}

/// Histogram of non-negative integers over `n_bins` equal-width bins.
///
/// Bin width is chosen so that `max_val` falls in the last bin.
pub struct Histogram {
    bin_width: usize,
    counts: Vec<usize>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct HistogramReport {
    pub bin_width: usize,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn new(n_bins: usize, max_val: usize) -> Self {
        let n_bins = n_bins.max(1);
        Self {
            bin_width: max_val / n_bins + 1,
            counts: vec![0; n_bins],
        }
    }

    pub fn add(&mut self, val: usize) {
        let i_bin = (val / self.bin_width).min(self.counts.len() - 1);
        self.counts[i_bin] += 1;
    }

    pub fn report(&self) -> HistogramReport {
        HistogramReport {
            bin_width: self.bin_width,
            counts: self.counts.clone(),
        }
    }
}
