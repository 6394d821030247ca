use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{ApplicantProfile, AptitudeTest, DurationUnit, EnglishTest, Internship};

/// Validation errors raised while turning a raw submission into an applicant profile.
#[derive(Debug, thiserror::Error)]
pub enum IntakeViolation {
    #[error("field `{field}` is not a valid number (found {value:?})")]
    MalformedNumber { field: &'static str, value: String },
    #[error("field `{field}` is out of range (found {value})")]
    OutOfRange { field: &'static str, value: String },
    #[error("unrecognized {field} `{value}`")]
    UnknownTestKind { field: &'static str, value: String },
    #[error("internship unit must be weeks or months (found {0:?})")]
    InvalidDurationUnit(String),
}

/// How malformed numeric or vocabulary input is handled at the intake boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericPolicy {
    /// Treat malformed values as absent so they contribute nothing to scoring.
    #[default]
    Coerce,
    /// Reject the whole submission.
    Reject,
}

impl NumericPolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "coerce" | "lenient" => Some(Self::Coerce),
            "reject" | "strict" => Some(Self::Reject),
            _ => None,
        }
    }
}

/// Number as sent by forms: either a JSON number or a string that should hold one.
///
/// Any other JSON shape lands in `Other` and is settled by the numeric policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

/// Rating input. Slider widgets send single-element arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRating {
    Number(f64),
    Text(String),
    List(Vec<serde_json::Value>),
    Other(serde_json::Value),
}

/// Test selection, accepted either as `{ "kind": "ielts" }` or as a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTest {
    Kind { kind: String },
    Name(String),
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawInternship {
    pub duration_value: Option<RawNumber>,
    pub unit: Option<String>,
}

/// Unvalidated applicant answers collected by the intake form or query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileSubmission {
    pub academic_score: Option<RawNumber>,
    /// Grading scale of `academic_score` (e.g. 4, 10 or 100) when known.
    pub academic_scale: Option<RawNumber>,
    pub top_ten_percent: bool,
    pub highest_education_level: Option<String>,
    pub school_board: Option<String>,
    pub english_test: Option<RawTest>,
    pub aptitude_test: Option<RawTest>,
    pub ap_exams_taken: bool,
    pub co_curricular_rating: Option<RawRating>,
    pub extra_curricular_rating: Option<RawRating>,
    pub internship: Option<RawInternship>,
    pub target_country: Option<String>,
    pub target_field_of_study: Option<String>,
    pub target_degree: Option<String>,
}

const DEFAULT_RATING: u8 = 3;
const GPA_FOUR_POINT_MAX: f64 = 4.0;
const CGPA_TEN_POINT_MAX: f64 = 10.0;
const CGPA_PERCENT_MULTIPLIER: f64 = 9.5;

/// Guard responsible for producing validated `ApplicantProfile` values.
#[derive(Debug, Clone, Default)]
pub struct ProfileGuard {
    policy: NumericPolicy,
}

impl ProfileGuard {
    pub fn new(policy: NumericPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> NumericPolicy {
        self.policy
    }

    /// Convert a raw submission into an immutable applicant profile.
    pub fn profile_from_submission(
        &self,
        submission: ProfileSubmission,
    ) -> Result<ApplicantProfile, IntakeViolation> {
        let academic_score = self.academic_score(
            submission.academic_score.as_ref(),
            submission.academic_scale.as_ref(),
        )?;

        let english_test = self.test_kind(
            "englishTest",
            submission.english_test.as_ref(),
            EnglishTest::parse,
        )?;
        let aptitude_test = self.test_kind(
            "aptitudeTest",
            submission.aptitude_test.as_ref(),
            AptitudeTest::parse,
        )?;

        let co_curricular_rating = self.rating(
            "coCurricularRating",
            submission.co_curricular_rating.as_ref(),
        )?;
        let extra_curricular_rating = self.rating(
            "extraCurricularRating",
            submission.extra_curricular_rating.as_ref(),
        )?;

        let internship = self.internship(submission.internship.as_ref())?;

        Ok(ApplicantProfile {
            academic_score,
            top_ten_percent: submission.top_ten_percent,
            highest_education_level: clean_text(submission.highest_education_level),
            school_board: clean_text(submission.school_board),
            english_test,
            aptitude_test,
            ap_exams_taken: submission.ap_exams_taken,
            co_curricular_rating,
            extra_curricular_rating,
            internship,
            target_country: clean_text(submission.target_country),
            target_field_of_study: clean_text(submission.target_field_of_study),
            target_degree: clean_text(submission.target_degree),
        })
    }

    fn settle<T>(
        &self,
        outcome: Result<Option<T>, IntakeViolation>,
    ) -> Result<Option<T>, IntakeViolation> {
        match (outcome, self.policy) {
            (Ok(value), _) => Ok(value),
            (Err(violation), NumericPolicy::Coerce) => {
                warn!(%violation, "treating malformed applicant input as absent");
                Ok(None)
            }
            (Err(violation), NumericPolicy::Reject) => Err(violation),
        }
    }

    fn academic_score(
        &self,
        raw: Option<&RawNumber>,
        scale: Option<&RawNumber>,
    ) -> Result<Option<f64>, IntakeViolation> {
        let Some(raw) = raw else {
            return Ok(None);
        };

        let outcome = parse_number("academicScore", raw).and_then(|score| {
            let scale = match scale {
                Some(scale) => parse_number("academicScale", scale)?,
                None => None,
            };
            score
                .map(|score| normalize_academic_score(score, scale))
                .transpose()
        });

        self.settle(outcome)
    }

    fn test_kind<T>(
        &self,
        field: &'static str,
        raw: Option<&RawTest>,
        parse: fn(&str) -> Option<T>,
    ) -> Result<Option<T>, IntakeViolation> {
        let Some(raw) = raw else {
            return Ok(None);
        };

        let kind = match raw {
            RawTest::Kind { kind } | RawTest::Name(kind) => kind.trim(),
            RawTest::Other(value) => {
                return self.settle(Err(IntakeViolation::UnknownTestKind {
                    field,
                    value: value.to_string(),
                }));
            }
        };
        if kind.is_empty() || kind.eq_ignore_ascii_case("none") {
            return Ok(None);
        }

        let outcome = parse(kind)
            .map(Some)
            .ok_or_else(|| IntakeViolation::UnknownTestKind {
                field,
                value: kind.to_string(),
            });

        self.settle(outcome)
    }

    fn rating(
        &self,
        field: &'static str,
        raw: Option<&RawRating>,
    ) -> Result<Option<u8>, IntakeViolation> {
        let value = match raw {
            None => return Ok(None),
            Some(RawRating::Number(value)) => *value,
            Some(RawRating::Text(text)) => {
                match self.settle(parse_number(field, &RawNumber::Text(text.clone())))? {
                    Some(value) => value,
                    None => return Ok(None),
                }
            }
            Some(RawRating::List(values)) => match values.first().and_then(json_number) {
                Some(value) if value.is_finite() => value,
                _ => return Ok(Some(DEFAULT_RATING)),
            },
            Some(RawRating::Other(value)) => {
                return self.settle(Err(IntakeViolation::MalformedNumber {
                    field,
                    value: value.to_string(),
                }));
            }
        };

        if !value.is_finite() {
            return self.settle(Err(IntakeViolation::MalformedNumber {
                field,
                value: value.to_string(),
            }));
        }

        let rounded = value.round();
        if (1.0..=5.0).contains(&rounded) {
            return Ok(Some(rounded as u8));
        }

        match self.policy {
            NumericPolicy::Coerce => {
                warn!(field, value, "clamping out-of-range rating");
                Ok(Some(rounded.clamp(1.0, 5.0) as u8))
            }
            NumericPolicy::Reject => Err(IntakeViolation::OutOfRange {
                field,
                value: value.to_string(),
            }),
        }
    }

    fn internship(
        &self,
        raw: Option<&RawInternship>,
    ) -> Result<Option<Internship>, IntakeViolation> {
        let Some(raw) = raw else {
            return Ok(None);
        };
        let Some(duration) = raw.duration_value.as_ref() else {
            return Ok(None);
        };

        let outcome = parse_number("internship.durationValue", duration).and_then(|value| {
            let Some(value) = value else {
                return Ok(None);
            };
            if value < 0.0 {
                return Err(IntakeViolation::OutOfRange {
                    field: "internship.durationValue",
                    value: value.to_string(),
                });
            }

            let unit = match raw.unit.as_deref().map(str::trim) {
                None | Some("") => DurationUnit::Months,
                Some(unit) => DurationUnit::parse(unit)
                    .ok_or_else(|| IntakeViolation::InvalidDurationUnit(unit.to_string()))?,
            };

            Ok(Some(Internship {
                duration_value: value,
                unit,
            }))
        });

        self.settle(outcome)
    }
}

fn parse_number(field: &'static str, raw: &RawNumber) -> Result<Option<f64>, IntakeViolation> {
    let value = match raw {
        RawNumber::Number(value) => *value,
        RawNumber::Text(text) => {
            let trimmed = text.trim().trim_end_matches('%').trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .replace(',', "")
                .parse::<f64>()
                .map_err(|_| IntakeViolation::MalformedNumber {
                    field,
                    value: text.clone(),
                })?
        }
        RawNumber::Other(value) => {
            return Err(IntakeViolation::MalformedNumber {
                field,
                value: value.to_string(),
            })
        }
    };

    if value.is_finite() {
        Ok(Some(value))
    } else {
        Err(IntakeViolation::MalformedNumber {
            field,
            value: value.to_string(),
        })
    }
}

fn json_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(number) => number.as_f64(),
        serde_json::Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Convert a GPA/CGPA/percentage into a 0-100 percentage.
///
/// Without an explicit scale, values up to 4.0 are read as a four-point GPA and values up
/// to 10 as a ten-point CGPA (converted with the customary 9.5 multiplier).
pub fn normalize_academic_score(raw: f64, scale: Option<f64>) -> Result<f64, IntakeViolation> {
    if raw < 0.0 {
        return Err(IntakeViolation::OutOfRange {
            field: "academicScore",
            value: raw.to_string(),
        });
    }

    let percent = match scale {
        Some(scale) if scale <= 0.0 => {
            return Err(IntakeViolation::OutOfRange {
                field: "academicScale",
                value: scale.to_string(),
            })
        }
        Some(scale) => raw / scale * 100.0,
        None if raw <= GPA_FOUR_POINT_MAX => raw / GPA_FOUR_POINT_MAX * 100.0,
        None if raw <= CGPA_TEN_POINT_MAX => raw * CGPA_PERCENT_MULTIPLIER,
        None => raw,
    };

    if (0.0..=100.0).contains(&percent) {
        Ok(percent)
    } else {
        Err(IntakeViolation::OutOfRange {
            field: "academicScore",
            value: raw.to_string(),
        })
    }
}

fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
