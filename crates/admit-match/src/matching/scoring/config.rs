use serde::{Deserialize, Serialize};

/// Weights of the subscores that feed the overall match percentage.
///
/// Location preference and financial feasibility are reported alongside but never weighted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringWeights {
    pub academic_fit: f64,
    pub test_score_compatibility: f64,
    pub extracurricular_match: f64,
    pub program_alignment: f64,
    pub admission_probability: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            academic_fit: 0.30,
            test_score_compatibility: 0.25,
            extracurricular_match: 0.20,
            program_alignment: 0.15,
            admission_probability: 0.10,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.academic_fit
            + self.test_score_compatibility
            + self.extracurricular_match
            + self.program_alignment
            + self.admission_probability
    }

    pub fn validate(&self) -> Result<(), WeightsError> {
        let weights = [
            self.academic_fit,
            self.test_score_compatibility,
            self.extracurricular_match,
            self.program_alignment,
            self.admission_probability,
        ];
        if weights
            .iter()
            .any(|weight| !weight.is_finite() || *weight < 0.0)
        {
            return Err(WeightsError::InvalidWeight);
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(WeightsError::DoesNotSumToOne(sum));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum WeightsError {
    #[error("scoring weights must be finite and non-negative")]
    InvalidWeight,
    #[error("scoring weights must sum to 1.0 (found {0:.4})")]
    DoesNotSumToOne(f64),
}
