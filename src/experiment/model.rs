use serde::{Deserialize, Serialize};

use crate::feature_table::ValueBlock;
use crate::label::Label;
use crate::sample::{Eic, PeakResolutionError, PeakWindow, SampleId};

/// Position of a consensus feature inside its experiment (file order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConsensusId(usize);

impl ConsensusId {
    /// Zero-based position
    pub fn index(self) -> usize {
        self.0
    }

    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }
}

/// Classifier output for one peak
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted class
    pub label: Label,
    /// Score of the predicted class
    pub confidence: f32,
}

/// Whether a peak could be located in its sample trace
#[derive(Debug, Clone, PartialEq)]
pub enum PeakSignal {
    /// Window resolved; the extracted ion chromatogram
    Resolved(Eic),
    /// Window could not be mapped onto the trace
    Unresolved(PeakResolutionError),
}

/// Classifiable unit attached to a feature
#[derive(Debug, Clone, PartialEq)]
pub struct Peak {
    signal: PeakSignal,
    prediction: Option<Prediction>,
    annotation: Option<Label>,
}

impl Peak {
    /// Peak backed by an extracted chromatogram
    pub fn resolved(eic: Eic) -> Self {
        Self::with_signal(PeakSignal::Resolved(eic))
    }

    /// Invalid peak
    pub fn unresolved(reason: PeakResolutionError) -> Self {
        Self::with_signal(PeakSignal::Unresolved(reason))
    }

    fn with_signal(signal: PeakSignal) -> Self {
        Self {
            signal,
            prediction: None,
            annotation: None,
        }
    }

    /// Whether the peak was resolved against its trace
    pub fn is_valid(&self) -> bool {
        matches!(self.signal, PeakSignal::Resolved(_))
    }

    /// Resolution outcome
    pub fn signal(&self) -> &PeakSignal {
        &self.signal
    }

    /// Chromatogram of a valid peak
    pub fn eic(&self) -> Option<&Eic> {
        match &self.signal {
            PeakSignal::Resolved(eic) => Some(eic),
            PeakSignal::Unresolved(_) => None,
        }
    }

    /// Classifier output, if any
    pub fn prediction(&self) -> Option<&Prediction> {
        self.prediction.as_ref()
    }

    /// Manual label, if any
    pub fn annotation(&self) -> Option<&Label> {
        self.annotation.as_ref()
    }

    /// Set or clear the manual label
    pub fn set_annotation(&mut self, label: Option<Label>) {
        self.annotation = label;
    }

    /// Invalid peaks never carry a prediction
    pub(crate) fn set_prediction(&mut self, prediction: Option<Prediction>) {
        if self.is_valid() {
            self.prediction = prediction;
        }
    }

    /// Label used for filtering and export
    ///
    /// With `use_annotation` a manual label takes precedence over the
    /// prediction. Invalid peaks have no effective label.
    pub fn effective_label(&self, use_annotation: bool) -> Option<&Label> {
        if !self.is_valid() {
            return None;
        }
        if use_annotation {
            if let Some(annotation) = &self.annotation {
                return Some(annotation);
            }
        }
        self.prediction.as_ref().map(|p| &p.label)
    }
}

/// Per-sample instance of a consensus feature
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    sample: SampleId,
    consensus: ConsensusId,
    values: ValueBlock,
    peaks: Vec<Peak>,
}

impl Feature {
    /// Feature owning a single peak
    pub fn new(sample: SampleId, consensus: ConsensusId, values: ValueBlock, peak: Peak) -> Self {
        Self {
            sample,
            consensus,
            values,
            peaks: vec![peak],
        }
    }

    /// Sample this feature was detected in
    pub fn sample(&self) -> SampleId {
        self.sample
    }

    /// Parent consensus feature
    pub fn consensus(&self) -> ConsensusId {
        self.consensus
    }

    /// Raw values from the feature table
    pub fn values(&self) -> &ValueBlock {
        &self.values
    }

    /// Peak RT/m/z window
    pub fn window(&self) -> PeakWindow {
        self.values.window()
    }

    /// Primary peak
    pub fn peak(&self) -> &Peak {
        &self.peaks[0]
    }

    /// Primary peak, mutably
    pub fn peak_mut(&mut self) -> &mut Peak {
        &mut self.peaks[0]
    }

    /// All peaks; exactly one in the default build
    pub fn peaks(&self) -> &[Peak] {
        &self.peaks
    }

    pub(crate) fn peaks_mut(&mut self) -> &mut [Peak] {
        &mut self.peaks
    }
}

/// One aligned feature-table row
#[derive(Debug, Clone, PartialEq)]
pub struct ConsensusFeature {
    id: ConsensusId,
    mz: f64,
    rt: f64,
    features: Vec<Feature>,
}

impl ConsensusFeature {
    /// Empty consensus feature
    pub fn new(id: ConsensusId, mz: f64, rt: f64) -> Self {
        Self {
            id,
            mz,
            rt,
            features: Vec::new(),
        }
    }

    /// Position in the experiment
    pub fn id(&self) -> ConsensusId {
        self.id
    }

    /// Consensus m/z
    pub fn mz(&self) -> f64 {
        self.mz
    }

    /// Consensus retention time (minutes)
    pub fn rt(&self) -> f64 {
        self.rt
    }

    /// Features ordered by sample
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Number of samples the feature was detected in
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether no sample holds this feature
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Feature of a sample, if detected there
    pub fn feature(&self, sample: SampleId) -> Option<&Feature> {
        self.position(sample).ok().map(|i| &self.features[i])
    }

    /// Feature of a sample, mutably
    pub fn feature_mut(&mut self, sample: SampleId) -> Option<&mut Feature> {
        self.position(sample).ok().map(|i| &mut self.features[i])
    }

    /// Attach a feature; returns `false` when the sample already has one
    pub(crate) fn insert(&mut self, feature: Feature) -> bool {
        match self.position(feature.sample) {
            Ok(_) => false,
            Err(i) => {
                self.features.insert(i, feature);
                true
            }
        }
    }

    fn position(&self, sample: SampleId) -> Result<usize, usize> {
        self.features.binary_search_by_key(&sample, |f| f.sample)
    }
}
