use crate::infra::{load_catalog_drafts, load_profile, seeded_service};
use admit_match::config::AppConfig;
use admit_match::error::AppError;
use admit_match::matching::{
    FindRequest, FindResponse, InstitutionDraft, MatchResult, MatchSettings, ProfileSubmission,
    RawInternship, RawNumber, RawRating, RawTest, RecommendationRequest, RecommendationResponse,
    RecommendationTier,
};
use chrono::{Local, NaiveDate};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file holding the applicant profile submission
    #[arg(long)]
    pub(crate) profile: PathBuf,
    /// Catalog seed (JSON array of institutions, or a CSV export)
    #[arg(long)]
    pub(crate) catalog: PathBuf,
    /// Page to return (1-based)
    #[arg(long)]
    pub(crate) page: Option<usize>,
    /// Page size; defaults to the configured page size
    #[arg(long)]
    pub(crate) limit: Option<usize>,
    /// Emit tiered recommendations instead of a ranked page
    #[arg(long)]
    pub(crate) tiers: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference date for deadline countdowns (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the advisor prompt built from the tiered recommendations.
    #[arg(long)]
    pub(crate) show_prompt: bool,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum ScoreOutput {
    Ranked(FindResponse),
    Tiered(RecommendationResponse),
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let output = score(args, config.matching.settings())?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub(crate) fn score(args: ScoreArgs, settings: MatchSettings) -> Result<ScoreOutput, AppError> {
    let ScoreArgs {
        profile,
        catalog,
        page,
        limit,
        tiers,
    } = args;

    let profile = load_profile(&profile)?;
    let service = seeded_service(settings, load_catalog_drafts(&catalog)?)?;

    if tiers {
        let recommendations = service.recommend(RecommendationRequest {
            profile,
            per_tier: limit,
            ..RecommendationRequest::default()
        })?;
        return Ok(ScoreOutput::Tiered(recommendations.into()));
    }

    let page = service.find(FindRequest {
        profile,
        page,
        limit,
        ..FindRequest::default()
    })?;
    Ok(ScoreOutput::Ranked(page.into()))
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today, show_prompt } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let service = seeded_service(MatchSettings::default(), sample_catalog())?;
    let applicant = sample_applicant();

    println!("University match demo");
    println!("Applicant: B.Tech graduate, CGPA 8.7/10, IELTS + GRE, targeting an MS in Canada");

    let page = service.find(FindRequest {
        profile: applicant.clone(),
        ..FindRequest::default()
    })?;
    println!(
        "\nRanked catalog ({} institutions, page {} of {})",
        page.pagination.total_count, page.pagination.current_page, page.pagination.total_pages
    );
    for (position, result) in page.results.iter().enumerate() {
        render_result(position + 1, result, today);
    }

    let recommendation_request = RecommendationRequest {
        profile: applicant,
        ..RecommendationRequest::default()
    };
    let recommendations = service.recommend(recommendation_request.clone())?;
    println!("\nRecommendation tiers");
    for tier in RecommendationTier::ALL {
        let names: Vec<&str> = recommendations
            .tier(tier)
            .iter()
            .map(|result| result.institution.name.as_str())
            .collect();
        if names.is_empty() {
            println!("- {}: none", tier.label());
        } else {
            println!("- {}: {}", tier.label(), names.join(", "));
        }
    }

    if show_prompt {
        let prompt = service.recommendation_prompt(recommendation_request)?;
        println!("\nAdvisor prompt\n{prompt}");
    }

    Ok(())
}

fn render_result(position: usize, result: &MatchResult, today: NaiveDate) {
    let institution = &result.institution;
    println!(
        "{position}. {} ({}) {}% {} | tier {} | admission {}% | financial {}",
        institution.name,
        institution.program,
        result.overall_match_percent,
        result.match_level.label(),
        result.tier().label(),
        result.subscores.admission_probability,
        result.subscores.financial_feasibility,
    );
    if let Some(deadline) = institution.application_deadline {
        let days = (deadline - today).num_days();
        if days >= 0 {
            println!("   Deadline {deadline} ({days} days left)");
        } else {
            println!("   Deadline {deadline} (passed)");
        }
    }
    if !result.strengths.is_empty() {
        println!("   Strengths: {}", result.strengths.join("; "));
    }
    if !result.weaknesses.is_empty() {
        println!("   Weaknesses: {}", result.weaknesses.join("; "));
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn sample_applicant() -> ProfileSubmission {
    ProfileSubmission {
        academic_score: Some(RawNumber::Text("8.7".to_string())),
        academic_scale: Some(RawNumber::Number(10.0)),
        top_ten_percent: true,
        highest_education_level: Some("B.Tech".to_string()),
        school_board: Some("CBSE".to_string()),
        english_test: Some(RawTest::Kind {
            kind: "ielts".to_string(),
        }),
        aptitude_test: Some(RawTest::Kind {
            kind: "gre".to_string(),
        }),
        ap_exams_taken: false,
        co_curricular_rating: Some(RawRating::List(vec![serde_json::json!(4)])),
        extra_curricular_rating: Some(RawRating::List(vec![serde_json::json!(3)])),
        internship: Some(RawInternship {
            duration_value: Some(RawNumber::Number(12.0)),
            unit: Some("weeks".to_string()),
        }),
        target_country: Some("Canada".to_string()),
        target_field_of_study: Some("Computer Science".to_string()),
        target_degree: Some("MS".to_string()),
    }
}

fn sample_institution(
    name: &str,
    program: &str,
    location: &str,
    acceptance_rate: f64,
    tuition: f64,
    national_rank: Option<u32>,
    deadline: Option<(i32, u32, u32)>,
) -> InstitutionDraft {
    InstitutionDraft {
        name: name.to_string(),
        program: program.to_string(),
        location: Some(location.to_string()),
        category: Some("Postgraduate".to_string()),
        university_type: Some("Public".to_string()),
        acceptance_rate_percent: Some(acceptance_rate),
        tuition_fees_per_year: Some(tuition),
        ranking_national: national_rank,
        application_deadline: deadline
            .and_then(|(year, month, day)| NaiveDate::from_ymd_opt(year, month, day)),
        ..InstitutionDraft::default()
    }
}

fn sample_catalog() -> Vec<InstitutionDraft> {
    vec![
        sample_institution(
            "Maple University",
            "MSc Computer Science",
            "Toronto, Canada",
            45.0,
            32_000.0,
            Some(12),
            Some((2026, 12, 15)),
        ),
        sample_institution(
            "Harbor Institute of Technology",
            "MS Computer Science",
            "Boston, USA",
            8.0,
            75_000.0,
            Some(3),
            Some((2026, 12, 1)),
        ),
        sample_institution(
            "Prairie State College",
            "MBA Finance",
            "Regina, Canada",
            70.0,
            18_500.0,
            None,
            None,
        ),
        sample_institution(
            "Rhine Technical University",
            "MSc Data Science",
            "Aachen, Germany",
            22.0,
            3_000.0,
            Some(7),
            Some((2027, 1, 31)),
        ),
        sample_institution(
            "Pacific Coast University",
            "MEng Computer Science",
            "Vancouver, Canada",
            55.0,
            41_000.0,
            Some(18),
            None,
        ),
    ]
}
