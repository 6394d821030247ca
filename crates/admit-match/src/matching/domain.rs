use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for catalog institutions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstitutionId(pub String);

/// Validated, immutable applicant snapshot built once per request.
///
/// Every field is optional; an absent field contributes nothing to the subscore it feeds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantProfile {
    /// Academic score normalized to a 0-100 percentage.
    pub academic_score: Option<f64>,
    pub top_ten_percent: bool,
    pub highest_education_level: Option<String>,
    pub school_board: Option<String>,
    pub english_test: Option<EnglishTest>,
    pub aptitude_test: Option<AptitudeTest>,
    pub ap_exams_taken: bool,
    pub co_curricular_rating: Option<u8>,
    pub extra_curricular_rating: Option<u8>,
    pub internship: Option<Internship>,
    pub target_country: Option<String>,
    pub target_field_of_study: Option<String>,
    pub target_degree: Option<String>,
}

impl ApplicantProfile {
    pub fn target_degree_level(&self) -> Option<DegreeLevel> {
        self.target_degree.as_deref().and_then(DegreeLevel::classify)
    }

    pub fn education_stage(&self) -> Option<EducationStage> {
        self.highest_education_level
            .as_deref()
            .and_then(EducationStage::classify)
    }

    /// True when the applicant's highest education is the step right below the target degree.
    pub fn follows_education_progression(&self) -> bool {
        match (self.education_stage(), self.target_degree_level()) {
            (Some(stage), Some(target)) => stage.next_degree() == Some(target),
            _ => false,
        }
    }
}

/// English proficiency tests recognized by the scoring rubric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnglishTest {
    Ielts,
    Toefl,
    Pte,
    Duolingo,
}

impl EnglishTest {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ielts" => Some(Self::Ielts),
            "toefl" => Some(Self::Toefl),
            "pte" => Some(Self::Pte),
            "duolingo" | "det" => Some(Self::Duolingo),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EnglishTest::Ielts => "IELTS",
            EnglishTest::Toefl => "TOEFL",
            EnglishTest::Pte => "PTE",
            EnglishTest::Duolingo => "Duolingo",
        }
    }
}

/// Standardized aptitude tests recognized by the scoring rubric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AptitudeTest {
    Gre,
    Gmat,
    Sat,
    Act,
}

impl AptitudeTest {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "gre" => Some(Self::Gre),
            "gmat" => Some(Self::Gmat),
            "sat" => Some(Self::Sat),
            "act" => Some(Self::Act),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AptitudeTest::Gre => "GRE",
            AptitudeTest::Gmat => "GMAT",
            AptitudeTest::Sat => "SAT",
            AptitudeTest::Act => "ACT",
        }
    }

    pub fn is_graduate_admission_test(&self) -> bool {
        matches!(self, AptitudeTest::Gre | AptitudeTest::Gmat)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Weeks,
    Months,
}

impl DurationUnit {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "week" | "weeks" => Some(Self::Weeks),
            "month" | "months" => Some(Self::Months),
            _ => None,
        }
    }
}

/// Internship experience declared by the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Internship {
    pub duration_value: f64,
    pub unit: DurationUnit,
}

impl Internship {
    pub fn months(&self) -> f64 {
        match self.unit {
            DurationUnit::Weeks => self.duration_value / 4.0,
            DurationUnit::Months => self.duration_value,
        }
    }
}

/// Coarse bucket for the degree an applicant is targeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegreeLevel {
    Undergraduate,
    Graduate,
    Doctoral,
}

impl DegreeLevel {
    pub fn classify(raw: &str) -> Option<Self> {
        let text = raw.trim().to_ascii_lowercase();
        if text.is_empty() {
            return None;
        }

        if is_doctoral(&text) {
            Some(Self::Doctoral)
        } else if is_bachelor(&text) {
            Some(Self::Undergraduate)
        } else if is_master(&text) {
            Some(Self::Graduate)
        } else {
            None
        }
    }
}

/// Highest completed education, matched by substring heuristics on free text.
///
/// A bare "graduate" is read as a finished bachelor's degree here, while the same word as a
/// target degree means a graduate (master's level) program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EducationStage {
    Secondary,
    Bachelor,
    Master,
    Doctorate,
}

impl EducationStage {
    pub fn classify(raw: &str) -> Option<Self> {
        let text = raw.trim().to_ascii_lowercase();
        if text.is_empty() {
            return None;
        }

        if is_doctoral(&text) {
            Some(Self::Doctorate)
        } else if is_bachelor(&text) || is_bare_graduate(&text) {
            Some(Self::Bachelor)
        } else if is_master(&text) {
            Some(Self::Master)
        } else if is_secondary(&text) {
            Some(Self::Secondary)
        } else {
            None
        }
    }

    pub fn next_degree(self) -> Option<DegreeLevel> {
        match self {
            EducationStage::Secondary => Some(DegreeLevel::Undergraduate),
            EducationStage::Bachelor => Some(DegreeLevel::Graduate),
            EducationStage::Master => Some(DegreeLevel::Doctoral),
            EducationStage::Doctorate => None,
        }
    }
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

fn has_token(text: &str, tokens: &[&str]) -> bool {
    text.split(|c: char| !c.is_ascii_alphanumeric() && c != '.')
        .any(|word| tokens.contains(&word))
}

fn is_doctoral(text: &str) -> bool {
    contains_any(text, &["phd", "ph.d", "doctor", "dphil"])
}

const BACHELOR_MARKERS: &[&str] = &[
    "bachelor",
    "undergrad",
    "b.tech",
    "btech",
    "b.sc",
    "b.com",
    "b.e.",
];
const BACHELOR_TOKENS: &[&str] = &["ug", "bsc", "ba", "bba", "be", "bcom", "b.a"];
const MASTER_MARKERS: &[&str] = &[
    "master",
    "postgrad",
    "post-grad",
    "post grad",
    "graduate",
    "mba",
    "m.tech",
    "mtech",
    "m.sc",
];
const MASTER_TOKENS: &[&str] = &["pg", "ms", "msc", "ma", "m.s", "m.a", "meng"];
const SECONDARY_MARKERS: &[&str] = &[
    "high school",
    "secondary",
    "12th",
    "class 12",
    "grade 12",
    "hsc",
    "a level",
    "a-level",
    "intermediate",
    "diploma",
];

fn is_bachelor(text: &str) -> bool {
    contains_any(text, BACHELOR_MARKERS) || has_token(text, BACHELOR_TOKENS)
}

/// "Graduate" or "college graduate" as a completed level means a finished first degree.
fn is_bare_graduate(text: &str) -> bool {
    has_token(text, &["graduate"]) && !contains_any(text, &["post", "master"])
}

fn is_master(text: &str) -> bool {
    contains_any(text, MASTER_MARKERS) || has_token(text, MASTER_TOKENS)
}

fn is_secondary(text: &str) -> bool {
    contains_any(text, SECONDARY_MARKERS)
}

/// Staff-maintained institution/program record read by the matching engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionRecord {
    pub id: InstitutionId,
    pub name: String,
    pub program: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub university_type: Option<String>,
    #[serde(default)]
    pub acceptance_rate_percent: Option<f64>,
    #[serde(default)]
    pub tuition_fees_per_year: Option<f64>,
    #[serde(default)]
    pub ranking_national: Option<u32>,
    #[serde(default)]
    pub ranking_international: Option<u32>,
    #[serde(default)]
    pub banner_image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub living_cost: Option<f64>,
    #[serde(default)]
    pub application_fee: Option<f64>,
    #[serde(default)]
    pub application_deadline: Option<NaiveDate>,
}

impl InstitutionRecord {
    /// Minimal record carrying only the required identity fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            id: InstitutionId(id.into()),
            name: name.into(),
            program: program.into(),
            location: None,
            category: None,
            university_type: None,
            acceptance_rate_percent: None,
            tuition_fees_per_year: None,
            ranking_national: None,
            ranking_international: None,
            banner_image: None,
            description: None,
            website: None,
            living_cost: None,
            application_fee: None,
            application_deadline: None,
        }
    }
}
