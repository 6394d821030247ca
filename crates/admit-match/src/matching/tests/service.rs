use super::common::*;
use crate::matching::catalog::{CatalogError, CatalogFilter, CatalogViolation, InstitutionDraft};
use crate::matching::domain::InstitutionId;
use crate::matching::intake::{NumericPolicy, ProfileSubmission, RawNumber};
use crate::matching::pagination::PaginationError;
use crate::matching::scoring::{RecommendationTier, ScoringWeights, WeightsError};
use crate::matching::service::{
    FindRequest, MatchService, MatchServiceError, MatchSettings, RecommendationRequest,
};
use std::sync::Arc;

#[test]
fn find_orders_best_match_first_and_paginates() {
    let (service, _) = build_service(catalog_records());

    let page = service
        .find(FindRequest {
            profile: strong_submission(),
            limit: Some(2),
            ..FindRequest::default()
        })
        .expect("find succeeds");

    let ids: Vec<&str> = page
        .results
        .iter()
        .map(|result| result.institution.id.0.as_str())
        .collect();
    assert_eq!(ids, vec!["uni-maple", "uni-prairie"]);
    assert_eq!(page.pagination.total_count, 3);
    assert_eq!(page.pagination.total_pages, 2);
    assert!(page.pagination.has_next_page);
    assert!(!page.pagination.has_prev_page);

    let second = service
        .find(FindRequest {
            profile: strong_submission(),
            page: Some(2),
            limit: Some(2),
            ..FindRequest::default()
        })
        .expect("second page");
    assert_eq!(second.results.len(), 1);
    assert_eq!(second.results[0].institution.id.0, "uni-selective");
    assert!(!second.pagination.has_next_page);
    assert!(second.pagination.has_prev_page);
}

#[test]
fn find_applies_catalog_filter_before_scoring() {
    let (service, _) = build_service(catalog_records());

    let page = service
        .find(FindRequest {
            profile: strong_submission(),
            filter: CatalogFilter {
                country: Some("canada".to_string()),
                max_acceptance_rate: Some(50.0),
                ..CatalogFilter::default()
            },
            ..FindRequest::default()
        })
        .expect("find succeeds");

    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].institution.id.0, "uni-maple");
}

#[test]
fn find_rejects_out_of_bounds_pages() {
    let (service, _) = build_service(catalog_records());

    let result = service.find(FindRequest {
        page: Some(0),
        ..FindRequest::default()
    });
    assert!(matches!(
        result,
        Err(MatchServiceError::Pagination(PaginationError::InvalidPage))
    ));

    let result = service.find(FindRequest {
        limit: Some(500),
        ..FindRequest::default()
    });
    assert!(matches!(
        result,
        Err(MatchServiceError::Pagination(PaginationError::InvalidLimit { max: 50 }))
    ));
}

#[test]
fn ranking_is_unaffected_by_other_candidates() {
    let (service, _) = build_service(catalog_records());
    let profile = service.profile(strong_submission()).expect("valid");
    let records = catalog_records();

    let alone = service.rank(&profile, &records[1..2]);
    let together = service.rank(&profile, &records);

    let maple_in_pool = together
        .iter()
        .find(|result| result.institution.id.0 == "uni-maple")
        .expect("maple ranked");
    assert_eq!(&alone[0], maple_in_pool);
}

#[test]
fn ties_keep_catalog_order() {
    let mut first = institution("uni-a", "Alpha College", "BSc Biology", "Lyon, France", None);
    first.category = None;
    let mut second = first.clone();
    second.id = InstitutionId("uni-b".to_string());
    second.name = "Beta College".to_string();

    let (service, _) = build_service(vec![first, second]);
    let page = service
        .find(FindRequest::default())
        .expect("find succeeds");

    assert_eq!(
        page.results[0].overall_match_percent,
        page.results[1].overall_match_percent
    );
    assert_eq!(page.results[0].institution.id.0, "uni-a");
    assert_eq!(page.results[1].institution.id.0, "uni-b");
}

#[test]
fn recommend_buckets_by_admission_probability() {
    let (service, _) = build_service(catalog_records());

    let tiers = service
        .recommend(RecommendationRequest {
            profile: strong_submission(),
            ..RecommendationRequest::default()
        })
        .expect("recommend succeeds");

    assert_eq!(tiers.total_evaluated, 3);
    assert!(tiers.ambitious.is_empty());
    assert!(tiers.backup.is_empty());
    assert_eq!(tiers.target.len(), 1);
    assert_eq!(tiers.target[0].institution.id.0, "uni-selective");
    let safe: Vec<&str> = tiers
        .safe
        .iter()
        .map(|result| result.institution.id.0.as_str())
        .collect();
    assert_eq!(safe, vec!["uni-maple", "uni-prairie"]);
    for tier in RecommendationTier::ALL {
        assert!(tiers.tier(tier).iter().all(|result| result.tier() == tier));
    }
}

#[test]
fn recommend_caps_each_tier() {
    let (service, _) = build_service(catalog_records());

    let tiers = service
        .recommend(RecommendationRequest {
            profile: strong_submission(),
            per_tier: Some(1),
            ..RecommendationRequest::default()
        })
        .expect("recommend succeeds");

    assert_eq!(tiers.safe.len(), 1);
    assert_eq!(tiers.safe[0].institution.id.0, "uni-maple");
    assert_eq!(tiers.total_evaluated, 3);

    let result = service.recommend(RecommendationRequest {
        per_tier: Some(0),
        ..RecommendationRequest::default()
    });
    assert!(matches!(
        result,
        Err(MatchServiceError::Pagination(PaginationError::InvalidLimit { .. }))
    ));
}

#[test]
fn recommendation_prompt_mentions_every_tier() {
    let (service, _) = build_service(catalog_records());

    let prompt = service
        .recommendation_prompt(RecommendationRequest {
            profile: strong_submission(),
            ..RecommendationRequest::default()
        })
        .expect("prompt builds");

    assert!(prompt.contains("(3 evaluated)"));
    assert!(prompt.contains("Ambitious ("));
    assert!(prompt.contains("Backup ("));
    assert!(prompt.contains("Maple University"));
    assert!(prompt.contains("- Target country: Canada"));
}

#[test]
fn match_one_scores_a_single_institution() {
    let (service, _) = build_service(catalog_records());

    let result = service
        .match_one(&InstitutionId("uni-maple".to_string()), strong_submission())
        .expect("institution exists");
    assert_eq!(result.overall_match_percent, 60);

    let missing = service.match_one(
        &InstitutionId("uni-missing".to_string()),
        strong_submission(),
    );
    assert!(matches!(
        missing,
        Err(MatchServiceError::Catalog(CatalogError::NotFound))
    ));
}

#[test]
fn reject_policy_surfaces_intake_errors() {
    let catalog = Arc::new(MemoryCatalog::with_records(catalog_records()));
    let service = MatchService::new(
        catalog,
        MatchSettings {
            numeric_policy: NumericPolicy::Reject,
            ..MatchSettings::default()
        },
    )
    .expect("valid settings");

    let result = service.find(FindRequest {
        profile: ProfileSubmission {
            academic_score: Some(RawNumber::Text("n/a".to_string())),
            ..ProfileSubmission::default()
        },
        ..FindRequest::default()
    });

    assert!(matches!(result, Err(MatchServiceError::Intake(_))));
}

#[test]
fn unavailable_catalog_propagates() {
    let service = MatchService::new(Arc::new(UnavailableCatalog), MatchSettings::default())
        .expect("valid settings");

    assert!(matches!(
        service.find(FindRequest::default()),
        Err(MatchServiceError::Catalog(CatalogError::Unavailable(_)))
    ));
}

#[test]
fn new_rejects_invalid_weights() {
    let settings = MatchSettings {
        weights: ScoringWeights {
            admission_probability: -0.1,
            ..ScoringWeights::default()
        },
        ..MatchSettings::default()
    };

    let result = MatchService::new(Arc::new(MemoryCatalog::default()), settings);
    assert!(matches!(
        result,
        Err(MatchServiceError::Weights(WeightsError::InvalidWeight))
    ));
}

#[test]
fn catalog_lifecycle_assigns_ids_and_validates_drafts() {
    let (service, catalog) = build_service(Vec::new());

    let draft = InstitutionDraft {
        name: " Fjord University ".to_string(),
        program: "MSc Marine Biology".to_string(),
        location: Some("Bergen, Norway".to_string()),
        acceptance_rate_percent: Some(35.0),
        ..InstitutionDraft::default()
    };
    let created = service.create(draft.clone()).expect("create succeeds");
    assert!(created.id.0.starts_with("uni-"));
    assert_eq!(created.name, "Fjord University");
    assert_eq!(catalog.len(), 1);

    let updated = service
        .update(
            &created.id,
            InstitutionDraft {
                tuition_fees_per_year: Some(12_000.0),
                ..draft.clone()
            },
        )
        .expect("update succeeds");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.tuition_fees_per_year, Some(12_000.0));

    let invalid = service.create(InstitutionDraft {
        acceptance_rate_percent: Some(140.0),
        ..draft.clone()
    });
    assert!(matches!(
        invalid,
        Err(MatchServiceError::InvalidInstitution(
            CatalogViolation::AcceptanceRateOutOfRange(_)
        ))
    ));

    let removed = service.remove(&created.id).expect("remove succeeds");
    assert_eq!(removed.id, created.id);
    assert!(matches!(
        service.remove(&created.id),
        Err(MatchServiceError::Catalog(CatalogError::NotFound))
    ));
    assert!(matches!(
        service.update(&created.id, draft),
        Err(MatchServiceError::Catalog(CatalogError::NotFound))
    ));
}

#[test]
fn import_inserts_every_draft() {
    let (service, catalog) = build_service(Vec::new());
    let drafts = vec![
        InstitutionDraft {
            name: "North College".to_string(),
            program: "BA History".to_string(),
            ..InstitutionDraft::default()
        },
        InstitutionDraft {
            name: "South College".to_string(),
            program: "BA Economics".to_string(),
            ..InstitutionDraft::default()
        },
    ];

    let records = service.import(drafts).expect("import succeeds");

    assert_eq!(records.len(), 2);
    assert_ne!(records[0].id, records[1].id);
    assert_eq!(catalog.len(), 2);
}

#[test]
fn import_rejects_the_whole_batch_when_one_draft_is_invalid() {
    let (service, catalog) = build_service(Vec::new());
    let drafts = vec![
        InstitutionDraft {
            name: "North College".to_string(),
            program: "BA History".to_string(),
            ..InstitutionDraft::default()
        },
        InstitutionDraft {
            name: "Broken College".to_string(),
            program: "BA Economics".to_string(),
            acceptance_rate_percent: Some(140.0),
            ..InstitutionDraft::default()
        },
    ];

    let err = service.import(drafts).expect_err("invalid draft rejects the batch");

    assert!(matches!(err, MatchServiceError::InvalidInstitution(_)));
    assert_eq!(catalog.len(), 0);
}
