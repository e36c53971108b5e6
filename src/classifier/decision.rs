use super::ClassifierError;
use crate::experiment::Prediction;
use crate::label::LabelSet;

/// Reject thresholds outside the open interval (0, 1)
pub fn validate_threshold(threshold: f32) -> Result<(), ClassifierError> {
    if threshold > 0.0 && threshold < 1.0 {
        Ok(())
    } else {
        Err(ClassifierError::InvalidThreshold(threshold))
    }
}

/// Turn one score vector into a prediction
///
/// The argmax class wins unless it is one of the graded pair. Between the
/// graded classes the higher one is chosen when its score reaches
/// `threshold` (inclusive), the lower one otherwise. The confidence is the
/// score of the chosen class.
pub fn decide(labels: &LabelSet, scores: &[f32], threshold: f32) -> Result<Prediction, ClassifierError> {
    if scores.len() != labels.len() {
        return Err(ClassifierError::ScoreLength {
            expected: labels.len(),
            actual: scores.len(),
        });
    }

    let mut best = 0;
    for (i, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] {
            best = i;
        }
    }

    let chosen = match labels.graded() {
        Some((hi, lo)) if best == hi || best == lo => {
            if scores[hi] >= threshold {
                hi
            } else {
                lo
            }
        }
        _ => best,
    };

    let label = labels
        .get(chosen)
        .cloned()
        .ok_or(ClassifierError::ScoreLength {
            expected: labels.len(),
            actual: scores.len(),
        })?;
    Ok(Prediction {
        label,
        confidence: scores[chosen],
    })
}
