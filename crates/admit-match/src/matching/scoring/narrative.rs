use super::super::domain::{ApplicantProfile, DegreeLevel, InstitutionRecord};
use super::{MatchLevel, Subscores};

const COMPETITIVE_ACCEPTANCE_RATE: f64 = 20.0;

pub(crate) fn strengths(subscores: &Subscores) -> Vec<String> {
    let mut strengths = Vec::new();

    if subscores.academic_fit >= 80 {
        strengths.push("Strong academic background".to_string());
    }
    if subscores.test_score_compatibility >= 70 {
        strengths.push("Good test score profile".to_string());
    }
    if subscores.extracurricular_match >= 70 {
        strengths.push("Excellent extracurricular profile".to_string());
    }
    if subscores.program_alignment >= 80 {
        strengths.push("Perfect program match".to_string());
    }

    strengths
}

pub(crate) fn weaknesses(subscores: &Subscores, institution: &InstitutionRecord) -> Vec<String> {
    let mut weaknesses = Vec::new();

    if subscores.academic_fit < 60 {
        weaknesses.push("Academic scores need improvement".to_string());
    }
    if subscores.test_score_compatibility < 50 {
        weaknesses.push("Missing required test scores".to_string());
    }
    if subscores.extracurricular_match < 50 {
        weaknesses.push("Limited extracurricular activities".to_string());
    }
    if institution
        .acceptance_rate_percent
        .is_some_and(|rate| rate < COMPETITIVE_ACCEPTANCE_RATE)
    {
        weaknesses.push("Highly competitive admission".to_string());
    }

    weaknesses
}

pub(crate) fn next_steps(profile: &ApplicantProfile, subscores: &Subscores) -> Vec<String> {
    let mut steps = Vec::new();

    if profile.english_test.is_none() {
        steps.push("Take an English proficiency test (IELTS/TOEFL)".to_string());
    }

    let has_graduate_test = profile
        .aptitude_test
        .is_some_and(|test| test.is_graduate_admission_test());
    if !has_graduate_test && profile.target_degree_level() == Some(DegreeLevel::Graduate) {
        steps.push("Take the GRE or GMAT for graduate admissions".to_string());
    }

    if subscores.extracurricular_match < 60 {
        steps.push("Gain relevant internship or work experience".to_string());
    }

    steps.push("Prepare strong personal statement and essays".to_string());
    steps
}

pub(crate) fn improvement_suggestions(subscores: &Subscores) -> Vec<String> {
    let mut suggestions = Vec::new();

    if subscores.academic_fit < 60 {
        suggestions.push(
            "Raise your academic profile with advanced coursework or certifications".to_string(),
        );
    }
    if subscores.test_score_compatibility < 50 {
        suggestions.push("Schedule the standardized tests this program expects".to_string());
    }
    if subscores.extracurricular_match < 50 {
        suggestions
            .push("Take on leadership roles in clubs, sports, or community work".to_string());
    }
    if subscores.program_alignment < 50 {
        suggestions.push(
            "Compare programs that align more closely with your field of interest".to_string(),
        );
    }
    if subscores.financial_feasibility < 70 {
        suggestions
            .push("Research scholarships and financial aid for this institution".to_string());
    }

    suggestions
}

pub(crate) fn overall_recommendation(level: MatchLevel) -> String {
    match level {
        MatchLevel::Excellent => "Excellent fit: strongly recommended to apply",
        MatchLevel::VeryGood => "Very good fit: recommended to apply",
        MatchLevel::Good => "Good fit: worth applying with a strong application",
        MatchLevel::Fair => "Fair fit: apply after strengthening weaker areas",
        MatchLevel::Poor => "Limited fit: consider as a reach option only",
    }
    .to_string()
}
