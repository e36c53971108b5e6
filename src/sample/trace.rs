use serde::{Deserialize, Serialize};

use super::PeakResolutionError;

/// One MS1 scan: retention time plus centroided points
#[derive(Debug, Clone, PartialEq)]
pub struct Scan {
    rt: f64,
    mz: Vec<f64>,
    intensity: Vec<f64>,
}

impl Scan {
    /// Create a scan, sorting points by m/z
    ///
    /// Extra values in the longer array are dropped.
    pub fn new(rt: f64, mz: Vec<f64>, intensity: Vec<f64>) -> Self {
        let sorted = mz.windows(2).all(|w| w[0] <= w[1]);
        let (mz, intensity) = if sorted && mz.len() == intensity.len() {
            (mz, intensity)
        } else {
            let mut points: Vec<(f64, f64)> = mz.into_iter().zip(intensity).collect();
            points.sort_by(|a, b| a.0.total_cmp(&b.0));
            points.into_iter().unzip()
        };
        Self { rt, mz, intensity }
    }

    /// Retention time in minutes
    pub fn rt(&self) -> f64 {
        self.rt
    }

    /// m/z values, ascending
    pub fn mz(&self) -> &[f64] {
        &self.mz
    }

    /// Intensities aligned with [`Scan::mz`]
    pub fn intensity(&self) -> &[f64] {
        &self.intensity
    }

    /// Summed intensity of all points with `mz_min <= m/z <= mz_max`
    pub fn summed_intensity(&self, mz_min: f64, mz_max: f64) -> f64 {
        let lo = self.mz.partition_point(|&mz| mz < mz_min);
        let hi = self.mz.partition_point(|&mz| mz <= mz_max);
        if lo >= hi {
            return 0.0;
        }
        self.intensity[lo..hi].iter().sum()
    }
}

/// Retention time / m/z box describing where a peak lives in a trace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakWindow {
    /// RT start (minutes)
    pub rt_start: f64,
    /// RT end (minutes)
    pub rt_end: f64,
    /// Lower m/z bound
    pub mz_min: f64,
    /// Upper m/z bound
    pub mz_max: f64,
}

impl PeakWindow {
    fn is_well_formed(&self) -> bool {
        let finite = [self.rt_start, self.rt_end, self.mz_min, self.mz_max]
            .iter()
            .all(|v| v.is_finite());
        finite && self.rt_start <= self.rt_end && self.mz_min <= self.mz_max
    }

    fn malformed(&self) -> PeakResolutionError {
        PeakResolutionError::MalformedWindow {
            rt_start: self.rt_start,
            rt_end: self.rt_end,
            mz_min: self.mz_min,
            mz_max: self.mz_max,
        }
    }
}

/// Extracted ion chromatogram over a peak window
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Eic {
    /// Scan retention times (minutes), ascending
    pub rt: Vec<f64>,
    /// Summed intensity inside the m/z window for each scan
    pub intensity: Vec<f64>,
}

impl Eic {
    /// Number of points
    pub fn len(&self) -> usize {
        self.rt.len()
    }

    /// Whether the chromatogram has no points
    pub fn is_empty(&self) -> bool {
        self.rt.is_empty()
    }

    /// Highest intensity, 0 for an empty chromatogram
    pub fn apex_intensity(&self) -> f64 {
        self.intensity.iter().copied().fold(0.0, f64::max)
    }
}

/// MS1 trace of a sample, scans ordered by retention time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    scans: Vec<Scan>,
}

impl Trace {
    /// Build a trace from scans in any order
    pub fn new(mut scans: Vec<Scan>) -> Self {
        scans.sort_by(|a, b| a.rt.total_cmp(&b.rt));
        Self { scans }
    }

    /// Scans ordered by retention time
    pub fn scans(&self) -> &[Scan] {
        &self.scans
    }

    /// Number of scans
    pub fn len(&self) -> usize {
        self.scans.len()
    }

    /// Whether the trace has no scans
    pub fn is_empty(&self) -> bool {
        self.scans.is_empty()
    }

    /// First and last scan retention time
    pub fn rt_range(&self) -> Option<(f64, f64)> {
        Some((self.scans.first()?.rt, self.scans.last()?.rt))
    }

    /// Extract the ion chromatogram of a peak window
    ///
    /// The RT window must lie inside the recorded RT range and contain at
    /// least one scan.
    pub fn extract(&self, window: &PeakWindow) -> Result<Eic, PeakResolutionError> {
        let (trace_start, trace_end) = self.rt_range().ok_or(PeakResolutionError::EmptyTrace)?;
        if !window.is_well_formed() {
            return Err(window.malformed());
        }
        if window.rt_start < trace_start || window.rt_end > trace_end {
            return Err(PeakResolutionError::OutsideTrace {
                rt_start: window.rt_start,
                rt_end: window.rt_end,
                trace_start,
                trace_end,
            });
        }

        let first = self.scans.partition_point(|s| s.rt < window.rt_start);
        let last = self.scans.partition_point(|s| s.rt <= window.rt_end);
        if first >= last {
            return Err(PeakResolutionError::NoScans {
                rt_start: window.rt_start,
                rt_end: window.rt_end,
            });
        }

        let scans = &self.scans[first..last];
        Ok(Eic {
            rt: scans.iter().map(|s| s.rt).collect(),
            intensity: scans
                .iter()
                .map(|s| s.summed_intensity(window.mz_min, window.mz_max))
                .collect(),
        })
    }
}
