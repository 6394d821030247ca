//! Prompt text handed to the external recommendation model.
//!
//! Output is deterministic for a given profile and set of tiers so responses can be cached or
//! audited by the caller.

use super::domain::ApplicantProfile;
use super::scoring::{MatchResult, RecommendationTier};
use super::service::TieredRecommendations;

const NOT_PROVIDED: &str = "not provided";

pub fn advisor_prompt(
    profile: &ApplicantProfile,
    recommendations: &TieredRecommendations,
) -> String {
    let mut lines = vec![
        "You are an experienced admissions counselor. Review the applicant and the scored \
         institutions below, then recommend where to apply."
            .to_string(),
        String::new(),
        "Applicant profile:".to_string(),
    ];
    lines.extend(profile_lines(profile));

    lines.push(String::new());
    lines.push(format!(
        "Scored institutions ({} evaluated), grouped by admission tier:",
        recommendations.total_evaluated
    ));
    for tier in RecommendationTier::ALL {
        lines.push(format!("{} ({}):", tier_heading(tier), tier_hint(tier)));
        let results = recommendations.tier(tier);
        if results.is_empty() {
            lines.push("- none".to_string());
        }
        lines.extend(results.iter().map(institution_line));
    }

    lines.push(String::new());
    lines.push("Instructions:".to_string());
    lines.push("1. Pick a balanced list across the tiers.".to_string());
    lines.push("2. Explain each pick using the applicant's strengths and gaps.".to_string());
    lines.push("3. Suggest concrete steps that would raise the weakest subscores.".to_string());

    lines.join("\n")
}

fn profile_lines(profile: &ApplicantProfile) -> Vec<String> {
    let internship = profile
        .internship
        .map(|internship| format!("{:.1} months", internship.months()));

    vec![
        field(
            "Academic score",
            profile.academic_score.map(|score| format!("{score:.1}%")),
        ),
        field("Top 10% of class", Some(yes_no(profile.top_ten_percent))),
        field(
            "Highest education",
            profile.highest_education_level.clone(),
        ),
        field("School board", profile.school_board.clone()),
        field(
            "English test",
            profile.english_test.map(|test| test.label().to_string()),
        ),
        field(
            "Aptitude test",
            profile.aptitude_test.map(|test| test.label().to_string()),
        ),
        field("AP exams", Some(yes_no(profile.ap_exams_taken))),
        field(
            "Co-curricular rating",
            profile.co_curricular_rating.map(|rating| format!("{rating}/5")),
        ),
        field(
            "Extracurricular rating",
            profile
                .extra_curricular_rating
                .map(|rating| format!("{rating}/5")),
        ),
        field("Internship", internship),
        field("Target country", profile.target_country.clone()),
        field("Field of study", profile.target_field_of_study.clone()),
        field("Target degree", profile.target_degree.clone()),
    ]
}

fn field(label: &str, value: Option<String>) -> String {
    format!("- {label}: {}", value.as_deref().unwrap_or(NOT_PROVIDED))
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

fn institution_line(result: &MatchResult) -> String {
    let institution = &result.institution;
    format!(
        "- {} | {} | {} | overall {}% ({}) | admission probability {}%",
        institution.name,
        institution.program,
        institution.location.as_deref().unwrap_or(NOT_PROVIDED),
        result.overall_match_percent,
        result.match_level.label(),
        result.subscores.admission_probability,
    )
}

fn tier_heading(tier: RecommendationTier) -> &'static str {
    match tier {
        RecommendationTier::Ambitious => "Ambitious",
        RecommendationTier::Target => "Target",
        RecommendationTier::Safe => "Safe",
        RecommendationTier::Backup => "Backup",
    }
}

fn tier_hint(tier: RecommendationTier) -> &'static str {
    match tier {
        RecommendationTier::Ambitious => "reach schools, admission probability below 40%",
        RecommendationTier::Target => "admission probability 40-59%",
        RecommendationTier::Safe => "admission probability 60-79%",
        RecommendationTier::Backup => "likely admits, admission probability 80% or higher",
    }
}
