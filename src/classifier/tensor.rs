use std::fmt;

use crate::sample::{Eic, PeakWindow};

/// Default number of points a chromatogram is resampled onto
pub const DEFAULT_TENSOR_WIDTH: usize = 120;

/// Shape of a per-peak input tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TensorShape {
    /// Number of channels
    pub rows: usize,
    /// Points per channel
    pub cols: usize,
}

impl TensorShape {
    /// Create a shape
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total number of values
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// Whether the shape holds no values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for TensorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.rows, self.cols)
    }
}

/// Fixed-shape numeric input for one peak, row major
#[derive(Debug, Clone, PartialEq)]
pub struct PeakTensor {
    shape: TensorShape,
    data: Vec<f32>,
}

impl PeakTensor {
    /// Wrap row-major values; `None` when the length disagrees with `shape`
    pub fn new(shape: TensorShape, data: Vec<f32>) -> Option<Self> {
        (data.len() == shape.len()).then_some(Self { shape, data })
    }

    /// Tensor shape
    pub fn shape(&self) -> TensorShape {
        self.shape
    }

    /// Row-major values
    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

/// Turns an extracted chromatogram into a classifier input
///
/// The EIC is linearly interpolated onto `width` evenly spaced retention
/// times spanning the peak window, then divided by its maximum so values
/// lie in `[0, 1]`. A flat zero signal stays all zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeakFeaturizer {
    width: usize,
}

impl Default for PeakFeaturizer {
    fn default() -> Self {
        Self {
            width: DEFAULT_TENSOR_WIDTH,
        }
    }
}

impl PeakFeaturizer {
    /// Featurizer resampling onto `width` points (at least one)
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
        }
    }

    /// Shape of every tensor produced
    pub fn shape(&self) -> TensorShape {
        TensorShape::new(1, self.width)
    }

    /// Resample and normalize `eic` over `window`
    pub fn featurize(&self, window: &PeakWindow, eic: &Eic) -> PeakTensor {
        let span = window.rt_end - window.rt_start;
        let mut values: Vec<f64> = (0..self.width)
            .map(|k| {
                let rt = if self.width == 1 {
                    window.rt_start + span / 2.0
                } else {
                    window.rt_start + span * k as f64 / (self.width - 1) as f64
                };
                interpolate(eic, rt)
            })
            .collect();

        let max = values.iter().copied().fold(0.0, f64::max);
        if max > 0.0 && max.is_finite() {
            values.iter_mut().for_each(|v| *v /= max);
        } else {
            values.iter_mut().for_each(|v| *v = 0.0);
        }

        PeakTensor {
            shape: self.shape(),
            data: values.into_iter().map(|v| v as f32).collect(),
        }
    }
}

/// Linear interpolation, clamped to the first/last point outside the EIC
fn interpolate(eic: &Eic, rt: f64) -> f64 {
    if eic.is_empty() {
        return 0.0;
    }
    let idx = eic.rt.partition_point(|&t| t < rt);
    if idx == 0 {
        return eic.intensity[0];
    }
    if idx == eic.len() {
        return eic.intensity[eic.len() - 1];
    }

    let (t0, t1) = (eic.rt[idx - 1], eic.rt[idx]);
    let (y0, y1) = (eic.intensity[idx - 1], eic.intensity[idx]);
    if t1 <= t0 {
        return y1;
    }
    y0 + (y1 - y0) * (rt - t0) / (t1 - t0)
}
