//! Peak quality labels
//!
//! A trained model ships with a closed set of classes. The default model uses
//! `High_quality`, `Low_quality` and `Noise`, but nothing downstream assumes
//! those three: filters and exports work on any [`LabelSet`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of the default highest quality class
pub const HIGH_QUALITY: &str = "High_quality";
/// Name of the default lower quality class
pub const LOW_QUALITY: &str = "Low_quality";
/// Name of the default noise class
pub const NOISE: &str = "Noise";

/// Errors raised while building or querying a label set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelError {
    /// Label set without any class
    #[error("Label set must contain at least one class")]
    Empty,

    /// Empty label name
    #[error("Label name must not be empty")]
    EmptyName,

    /// The same class appears twice
    #[error("Duplicate label: {0}")]
    Duplicate(String),

    /// Label not part of the set
    #[error("Unknown label: {0}")]
    Unknown(String),
}

/// A peak quality class
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    /// Create a label from its class name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// `High_quality`
    pub fn high_quality() -> Self {
        Self::new(HIGH_QUALITY)
    }

    /// `Low_quality`
    pub fn low_quality() -> Self {
        Self::new(LOW_QUALITY)
    }

    /// `Noise`
    pub fn noise() -> Self {
        Self::new(NOISE)
    }

    /// Class name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Label {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(LabelError::EmptyName);
        }
        Ok(Self::new(trimmed))
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Ordered, duplicate-free set of classes produced by one model
///
/// Optionally designates two *graded* classes (higher, lower). A prediction
/// threshold arbitrates between these two only; every other class is decided
/// by plain argmax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSet {
    labels: Vec<Label>,
    graded: Option<(usize, usize)>,
}

impl Default for LabelSet {
    fn default() -> Self {
        Self {
            labels: vec![Label::high_quality(), Label::low_quality(), Label::noise()],
            graded: Some((0, 1)),
        }
    }
}

impl LabelSet {
    /// Create a label set without graded classes
    pub fn new(labels: Vec<Label>) -> Result<Self, LabelError> {
        if labels.is_empty() {
            return Err(LabelError::Empty);
        }
        for (i, label) in labels.iter().enumerate() {
            if label.as_str().is_empty() {
                return Err(LabelError::EmptyName);
            }
            if labels[..i].contains(label) {
                return Err(LabelError::Duplicate(label.to_string()));
            }
        }
        Ok(Self {
            labels,
            graded: None,
        })
    }

    /// Designate the pair of classes a threshold arbitrates between
    pub fn with_graded(mut self, higher: &Label, lower: &Label) -> Result<Self, LabelError> {
        let hi = self.require(higher)?;
        let lo = self.require(lower)?;
        if hi == lo {
            return Err(LabelError::Duplicate(higher.to_string()));
        }
        self.graded = Some((hi, lo));
        Ok(self)
    }

    /// Position of a label in the set
    pub fn index_of(&self, label: &Label) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Position of a label, failing for classes outside the set
    pub fn require(&self, label: &Label) -> Result<usize, LabelError> {
        self.index_of(label)
            .ok_or_else(|| LabelError::Unknown(label.to_string()))
    }

    /// Whether the label is part of the set
    pub fn contains(&self, label: &Label) -> bool {
        self.index_of(label).is_some()
    }

    /// Label at a position
    pub fn get(&self, index: usize) -> Option<&Label> {
        self.labels.get(index)
    }

    /// Indices of the (higher, lower) graded classes, if any
    pub fn graded(&self) -> Option<(usize, usize)> {
        self.graded
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false for a constructed set
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate classes in model output order
    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.labels.iter()
    }
}
