use chrono::NaiveDate;
use serde::Serialize;

use super::domain::InstitutionId;
use super::pagination::Pagination;
use super::scoring::MatchResult;
use super::service::{RankedPage, TieredRecommendations};

const NOT_SPECIFIED: &str = "Not specified";

/// Client-facing rendering of a `MatchResult`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    pub id: InstitutionId,
    pub name: String,
    pub location: String,
    pub program: String,
    pub university_type: String,
    pub tuition_fee: String,
    pub ranking: RankingView,
    pub acceptance_rate: String,
    pub match_percentage: String,
    pub match_level: &'static str,
    pub tier: &'static str,
    pub ai_analysis: AiAnalysisView,
    pub improvement_suggestions: Vec<String>,
    pub detailed_analysis: DetailedAnalysisView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub living_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingView {
    pub national: String,
    pub international: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAnalysisView {
    pub academic_fit: u8,
    pub test_score_compatibility: u8,
    pub extracurricular_match: u8,
    pub program_alignment: u8,
    pub admission_probability: u8,
    pub financial_feasibility: u8,
    pub location_preference: u8,
    pub overall_recommendation: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedAnalysisView {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub next_steps: Vec<String>,
}

impl From<MatchResult> for MatchView {
    fn from(result: MatchResult) -> Self {
        let tier = result.tier().label();
        let MatchResult {
            institution,
            subscores,
            overall_match_percent,
            match_level,
            overall_recommendation,
            strengths,
            weaknesses,
            next_steps,
            improvement_suggestions,
        } = result;

        Self {
            id: institution.id,
            name: institution.name,
            location: institution
                .location
                .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            program: institution.program,
            university_type: institution
                .university_type
                .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            tuition_fee: tuition_label(institution.tuition_fees_per_year),
            ranking: RankingView {
                national: institution
                    .ranking_national
                    .map(|rank| format!("#{rank}"))
                    .unwrap_or_else(|| "N/A".to_string()),
                international: institution.ranking_international,
            },
            acceptance_rate: acceptance_rate_label(institution.acceptance_rate_percent),
            match_percentage: format!("{overall_match_percent}%"),
            match_level: match_level.label(),
            tier,
            ai_analysis: AiAnalysisView {
                academic_fit: subscores.academic_fit,
                test_score_compatibility: subscores.test_score_compatibility,
                extracurricular_match: subscores.extracurricular_match,
                program_alignment: subscores.program_alignment,
                admission_probability: subscores.admission_probability,
                financial_feasibility: subscores.financial_feasibility,
                location_preference: subscores.location_preference,
                overall_recommendation,
            },
            improvement_suggestions,
            detailed_analysis: DetailedAnalysisView {
                strengths,
                weaknesses,
                next_steps,
            },
            banner_image: institution.banner_image,
            description: institution.description,
            website: institution.website,
            living_cost: institution.living_cost,
            application_fee: institution.application_fee,
            application_deadline: institution.application_deadline,
        }
    }
}

/// Ranked page returned by the find endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct FindResponse {
    pub results: Vec<MatchView>,
    pub pagination: Pagination,
}

/// Tiered recommendation buckets.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub ambitious: Vec<MatchView>,
    pub target: Vec<MatchView>,
    pub safe: Vec<MatchView>,
    pub backup: Vec<MatchView>,
    pub total_evaluated: usize,
}

impl From<RankedPage> for FindResponse {
    fn from(page: RankedPage) -> Self {
        Self {
            results: page.results.into_iter().map(MatchView::from).collect(),
            pagination: page.pagination,
        }
    }
}

impl From<TieredRecommendations> for RecommendationResponse {
    fn from(tiers: TieredRecommendations) -> Self {
        let views = |results: Vec<MatchResult>| -> Vec<MatchView> {
            results.into_iter().map(MatchView::from).collect()
        };
        Self {
            ambitious: views(tiers.ambitious),
            target: views(tiers.target),
            safe: views(tiers.safe),
            backup: views(tiers.backup),
            total_evaluated: tiers.total_evaluated,
        }
    }
}

pub fn tuition_label(tuition: Option<f64>) -> String {
    match tuition {
        Some(amount) => format!("{} per year", group_thousands(amount)),
        None => NOT_SPECIFIED.to_string(),
    }
}

pub fn acceptance_rate_label(rate: Option<f64>) -> String {
    match rate {
        Some(rate) if rate.fract() == 0.0 => format!("{rate:.0}%"),
        Some(rate) => format!("{rate:.1}%"),
        None => NOT_SPECIFIED.to_string(),
    }
}

fn group_thousands(amount: f64) -> String {
    let digits = (amount.round() as u64).to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
