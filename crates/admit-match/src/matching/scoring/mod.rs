mod config;
mod narrative;
mod rules;

pub use config::{ScoringWeights, WeightsError};

use super::domain::{ApplicantProfile, InstitutionRecord};
use serde::{Deserialize, Serialize};

const OVERALL_FLOOR: f64 = 45.0;
const OVERALL_CEILING: f64 = 99.0;

/// Stateless engine scoring one applicant against one institution at a time.
#[derive(Debug, Clone, Default)]
pub struct MatchEngine {
    weights: ScoringWeights,
}

impl MatchEngine {
    pub fn new(weights: ScoringWeights) -> Result<Self, WeightsError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn score(
        &self,
        profile: &ApplicantProfile,
        institution: &InstitutionRecord,
    ) -> MatchResult {
        let subscores = rules::score_subscores(profile, institution);
        let overall_match_percent = overall_match_percent(self.weighted_overall(&subscores));
        let match_level = MatchLevel::from_percent(overall_match_percent);

        MatchResult {
            institution: institution.clone(),
            strengths: narrative::strengths(&subscores),
            weaknesses: narrative::weaknesses(&subscores, institution),
            next_steps: narrative::next_steps(profile, &subscores),
            improvement_suggestions: narrative::improvement_suggestions(&subscores),
            overall_recommendation: narrative::overall_recommendation(match_level),
            subscores,
            overall_match_percent,
            match_level,
        }
    }

    /// Unclamped weighted sum of the five weighted subscores.
    pub fn weighted_overall(&self, subscores: &Subscores) -> f64 {
        let weights = &self.weights;
        f64::from(subscores.academic_fit) * weights.academic_fit
            + f64::from(subscores.test_score_compatibility) * weights.test_score_compatibility
            + f64::from(subscores.extracurricular_match) * weights.extracurricular_match
            + f64::from(subscores.program_alignment) * weights.program_alignment
            + f64::from(subscores.admission_probability) * weights.admission_probability
    }
}

/// Clamp a weighted overall into [45, 99] and round to the reported percentage.
pub fn overall_match_percent(weighted: f64) -> u8 {
    weighted.clamp(OVERALL_FLOOR, OVERALL_CEILING).round() as u8
}

/// Per-institution subscores, each in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscores {
    pub academic_fit: u8,
    pub test_score_compatibility: u8,
    pub extracurricular_match: u8,
    /// Informational only; not weighted into the overall percentage.
    pub location_preference: u8,
    pub program_alignment: u8,
    pub admission_probability: u8,
    /// Informational only; not weighted into the overall percentage.
    pub financial_feasibility: u8,
}

/// Categorical label derived from the rounded overall percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MatchLevel {
    Poor,
    Fair,
    Good,
    VeryGood,
    Excellent,
}

impl MatchLevel {
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            p if p >= 85 => Self::Excellent,
            p if p >= 75 => Self::VeryGood,
            p if p >= 65 => Self::Good,
            p if p >= 55 => Self::Fair,
            _ => Self::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchLevel::Poor => "Poor",
            MatchLevel::Fair => "Fair",
            MatchLevel::Good => "Good",
            MatchLevel::VeryGood => "Very Good",
            MatchLevel::Excellent => "Excellent",
        }
    }
}

/// Recommendation bucket keyed on admission probability.
///
/// `Backup` holds the institutions that are easiest to get into and `Ambitious` the hardest,
/// following counseling vocabulary (backup = safety school, ambitious = reach school).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationTier {
    Ambitious,
    Target,
    Safe,
    Backup,
}

impl RecommendationTier {
    pub fn from_admission_probability(probability: u8) -> Self {
        match probability {
            p if p >= 80 => Self::Backup,
            p if p >= 60 => Self::Safe,
            p if p >= 40 => Self::Target,
            _ => Self::Ambitious,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecommendationTier::Ambitious => "ambitious",
            RecommendationTier::Target => "target",
            RecommendationTier::Safe => "safe",
            RecommendationTier::Backup => "backup",
        }
    }

    pub const ALL: [RecommendationTier; 4] = [
        RecommendationTier::Ambitious,
        RecommendationTier::Target,
        RecommendationTier::Safe,
        RecommendationTier::Backup,
    ];
}

/// Scoring output for a single institution, recomputed on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub institution: InstitutionRecord,
    pub subscores: Subscores,
    pub overall_match_percent: u8,
    pub match_level: MatchLevel,
    pub overall_recommendation: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub next_steps: Vec<String>,
    pub improvement_suggestions: Vec<String>,
}

impl MatchResult {
    pub fn tier(&self) -> RecommendationTier {
        RecommendationTier::from_admission_probability(self.subscores.admission_probability)
    }
}
