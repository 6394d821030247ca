use super::super::domain::{ApplicantProfile, AptitudeTest, EnglishTest, InstitutionRecord};
use super::Subscores;

const ADMISSION_BASE: i32 = 85;
const ADMISSION_FLOOR: i32 = 5;
const ADMISSION_CEILING: i32 = 95;
const FINANCIAL_BASE: i32 = 80;
const LOCATION_ALIGNMENT_POINTS: f64 = 50.0;
const FIELD_ALIGNMENT_POINTS: f64 = 50.0;

pub(crate) fn score_subscores(
    profile: &ApplicantProfile,
    institution: &InstitutionRecord,
) -> Subscores {
    let academic_fit = academic_fit(profile);
    let test_score_compatibility = test_score_compatibility(profile);
    let extracurricular_match = extracurricular_match(profile);
    let location_preference = location_preference(profile, institution);
    let program_alignment = program_alignment(profile, institution);
    let admission_probability =
        admission_probability(institution, academic_fit, test_score_compatibility);
    let financial_feasibility = financial_feasibility(institution);

    Subscores {
        academic_fit,
        test_score_compatibility,
        extracurricular_match,
        location_preference,
        program_alignment,
        admission_probability,
        financial_feasibility,
    }
}

fn clamp_score(value: i32, min: i32, max: i32) -> u8 {
    value.clamp(min, max) as u8
}

pub(crate) fn academic_fit(profile: &ApplicantProfile) -> u8 {
    let mut score = 0;

    if let Some(academic) = profile.academic_score {
        score += match academic {
            s if s >= 95.0 => 25,
            s if s >= 90.0 => 22,
            s if s >= 85.0 => 18,
            s if s >= 80.0 => 15,
            s if s >= 75.0 => 12,
            _ => 8,
        };
    }

    if profile.top_ten_percent {
        score += 10;
    }

    if profile.follows_education_progression() {
        score += 15;
    }

    if let Some(board) = &profile.school_board {
        let board = board.to_lowercase();
        if ["cbse", "icse", "ib"].iter().any(|name| board.contains(name)) {
            score += 5;
        }
    }

    clamp_score(score, 0, 100)
}

pub(crate) fn test_score_compatibility(profile: &ApplicantProfile) -> u8 {
    let mut score = 0;

    score += match profile.english_test {
        Some(EnglishTest::Ielts | EnglishTest::Toefl) => 15,
        Some(EnglishTest::Pte) => 12,
        Some(EnglishTest::Duolingo) => 10,
        None => 0,
    };

    score += match profile.aptitude_test {
        Some(AptitudeTest::Gre) => 20,
        Some(AptitudeTest::Gmat) => 18,
        Some(AptitudeTest::Sat | AptitudeTest::Act) => 15,
        None => 0,
    };

    if profile.ap_exams_taken {
        score += 10;
    }

    clamp_score(score, 0, 100)
}

pub(crate) fn extracurricular_match(profile: &ApplicantProfile) -> u8 {
    let mut score = 0;

    score += profile.co_curricular_rating.map(i32::from).unwrap_or(0) * 5;
    score += profile.extra_curricular_rating.map(i32::from).unwrap_or(0) * 5;

    if let Some(internship) = &profile.internship {
        score += match internship.months() {
            months if months >= 6.0 => 20,
            months if months >= 3.0 => 15,
            months if months >= 1.0 => 10,
            months if months > 0.0 => 5,
            _ => 0,
        };
    }

    clamp_score(score, 0, 100)
}

fn location_matches(profile: &ApplicantProfile, institution: &InstitutionRecord) -> bool {
    match (&profile.target_country, &institution.location) {
        (Some(country), Some(location)) => {
            let country = country.trim().to_lowercase();
            !country.is_empty() && location.to_lowercase().contains(&country)
        }
        _ => false,
    }
}

pub(crate) fn location_preference(
    profile: &ApplicantProfile,
    institution: &InstitutionRecord,
) -> u8 {
    if location_matches(profile, institution) {
        100
    } else {
        0
    }
}

pub(crate) fn program_alignment(profile: &ApplicantProfile, institution: &InstitutionRecord) -> u8 {
    let mut alignment = 0.0;

    if location_matches(profile, institution) {
        alignment += LOCATION_ALIGNMENT_POINTS;
    }

    if let Some(field) = &profile.target_field_of_study {
        let program = institution.program.to_lowercase();
        let field = field.to_lowercase();
        let words: Vec<&str> = field.split_whitespace().collect();
        if !words.is_empty() {
            let matched = words.iter().filter(|word| program.contains(**word)).count();
            alignment += matched as f64 / words.len() as f64 * FIELD_ALIGNMENT_POINTS;
        }
    }

    alignment.min(100.0).round() as u8
}

pub(crate) fn admission_probability(
    institution: &InstitutionRecord,
    academic_fit: u8,
    test_score_compatibility: u8,
) -> u8 {
    let mut probability = ADMISSION_BASE;

    if let Some(rate) = institution.acceptance_rate_percent {
        probability -= match rate {
            r if r <= 10.0 => 30,
            r if r <= 25.0 => 15,
            r if r <= 50.0 => 5,
            _ => 0,
        };
    }

    probability += match academic_fit {
        fit if fit >= 80 => 10,
        fit if fit >= 60 => 5,
        fit if fit < 40 => -15,
        _ => 0,
    };

    probability += match test_score_compatibility {
        tests if tests >= 80 => 5,
        tests if tests < 40 => -10,
        _ => 0,
    };

    clamp_score(probability, ADMISSION_FLOOR, ADMISSION_CEILING)
}

pub(crate) fn financial_feasibility(institution: &InstitutionRecord) -> u8 {
    let mut feasibility = FINANCIAL_BASE;

    if let Some(tuition) = institution.tuition_fees_per_year {
        feasibility -= match tuition {
            t if t > 60_000.0 => 20,
            t if t > 40_000.0 => 10,
            t if t > 20_000.0 => 5,
            _ => 0,
        };
    }

    clamp_score(feasibility, 0, 100)
}
