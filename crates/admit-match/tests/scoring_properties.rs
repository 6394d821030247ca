//! Property checks for the scoring engine: bounds, monotonicity, independence, and purity.

use admit_match::matching::{
    ApplicantProfile, AptitudeTest, DurationUnit, EnglishTest, InstitutionRecord, Internship,
    MatchEngine, RecommendationTier,
};
use proptest::prelude::*;
use proptest::test_runner::Config;

fn english_test() -> impl Strategy<Value = Option<EnglishTest>> {
    prop_oneof![
        Just(None),
        Just(Some(EnglishTest::Ielts)),
        Just(Some(EnglishTest::Toefl)),
        Just(Some(EnglishTest::Pte)),
        Just(Some(EnglishTest::Duolingo)),
    ]
}

fn aptitude_test() -> impl Strategy<Value = Option<AptitudeTest>> {
    prop_oneof![
        Just(None),
        Just(Some(AptitudeTest::Gre)),
        Just(Some(AptitudeTest::Gmat)),
        Just(Some(AptitudeTest::Sat)),
        Just(Some(AptitudeTest::Act)),
    ]
}

fn internship() -> impl Strategy<Value = Option<Internship>> {
    proptest::option::of((0.0_f64..60.0, prop::bool::ANY).prop_map(|(duration_value, weeks)| {
        Internship {
            duration_value,
            unit: if weeks {
                DurationUnit::Weeks
            } else {
                DurationUnit::Months
            },
        }
    }))
}

fn text(options: &'static [&'static str]) -> impl Strategy<Value = Option<String>> {
    proptest::option::of(proptest::sample::select(options).prop_map(str::to_string))
}

prop_compose! {
    fn applicant_profile()(
        academic_score in proptest::option::of(0.0_f64..=100.0),
        flags in (prop::bool::ANY, prop::bool::ANY),
        highest_education_level in text(&["High School", "Bachelor of Engineering", "MSc Physics"]),
        school_board in text(&["CBSE", "ICSE", "State Board", "IB Diploma"]),
        tests in (english_test(), aptitude_test()),
        ratings in (proptest::option::of(1_u8..=5), proptest::option::of(1_u8..=5)),
        internship in internship(),
        target_country in text(&["Canada", "USA", "Germany"]),
        target_field_of_study in text(&["Computer Science", "Finance", "Marine Biology"]),
        target_degree in text(&["Undergraduate", "Masters", "PhD"]),
    ) -> ApplicantProfile {
        ApplicantProfile {
            academic_score,
            top_ten_percent: flags.0,
            highest_education_level,
            school_board,
            english_test: tests.0,
            aptitude_test: tests.1,
            ap_exams_taken: flags.1,
            co_curricular_rating: ratings.0,
            extra_curricular_rating: ratings.1,
            internship,
            target_country,
            target_field_of_study,
            target_degree,
        }
    }
}

prop_compose! {
    fn institution(id: &'static str)(
        program in proptest::sample::select(vec![
            "MSc Computer Science",
            "MBA Finance",
            "BSc Marine Biology",
        ]),
        location in proptest::option::of(proptest::sample::select(vec![
            "Toronto, Canada",
            "Boston, USA",
            "Munich, Germany",
        ])),
        acceptance_rate_percent in proptest::option::of(0.0_f64..=100.0),
        tuition_fees_per_year in proptest::option::of(0.0_f64..120_000.0),
    ) -> InstitutionRecord {
        let mut record = InstitutionRecord::new(id, format!("Institution {id}"), program);
        record.location = location.map(str::to_string);
        record.acceptance_rate_percent = acceptance_rate_percent;
        record.tuition_fees_per_year = tuition_fees_per_year;
        record
    }
}

const ACADEMIC_BAND_FLOORS: [f64; 6] = [0.0, 75.0, 80.0, 85.0, 90.0, 95.0];

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn subscores_and_overall_stay_in_bounds(
        profile in applicant_profile(),
        record in institution("uni-a"),
    ) {
        let result = MatchEngine::default().score(&profile, &record);
        let subscores = result.subscores;

        for value in [
            subscores.academic_fit,
            subscores.test_score_compatibility,
            subscores.extracurricular_match,
            subscores.location_preference,
            subscores.program_alignment,
            subscores.admission_probability,
            subscores.financial_feasibility,
        ] {
            prop_assert!(value <= 100);
        }
        prop_assert!((5..=95).contains(&subscores.admission_probability));
        prop_assert!((45..=99).contains(&result.overall_match_percent));
        prop_assert_eq!(
            result.tier(),
            RecommendationTier::from_admission_probability(subscores.admission_probability)
        );
    }

    #[test]
    fn raising_academic_band_never_lowers_scores(
        profile in applicant_profile(),
        record in institution("uni-a"),
        band in 0_usize..ACADEMIC_BAND_FLOORS.len() - 1,
    ) {
        let engine = MatchEngine::default();
        let lower = ApplicantProfile {
            academic_score: Some(ACADEMIC_BAND_FLOORS[band]),
            ..profile.clone()
        };
        let higher = ApplicantProfile {
            academic_score: Some(ACADEMIC_BAND_FLOORS[band + 1]),
            ..profile
        };

        let lower = engine.score(&lower, &record);
        let higher = engine.score(&higher, &record);

        prop_assert!(higher.subscores.academic_fit >= lower.subscores.academic_fit);
        prop_assert!(higher.overall_match_percent >= lower.overall_match_percent);
    }

    #[test]
    fn scoring_ignores_other_candidates_and_is_repeatable(
        profile in applicant_profile(),
        first in institution("uni-a"),
        second in institution("uni-b"),
    ) {
        let engine = MatchEngine::default();

        let once = engine.score(&profile, &first);
        let again = engine.score(&profile, &first);
        let _ = engine.score(&profile, &second);
        let after_other = engine.score(&profile, &first);

        prop_assert_eq!(&once, &again);
        prop_assert_eq!(&once, &after_other);
    }
}
