use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::matching::catalog::{CatalogError, CatalogFilter, InstitutionCatalog};
use crate::matching::domain::{InstitutionId, InstitutionRecord};
use crate::matching::intake::{ProfileSubmission, RawInternship, RawNumber, RawRating, RawTest};
use crate::matching::{match_router, MatchService, MatchSettings};

pub(super) fn institution(
    id: &str,
    name: &str,
    program: &str,
    location: &str,
    acceptance_rate: Option<f64>,
) -> InstitutionRecord {
    let mut record = InstitutionRecord::new(id, name, program);
    record.location = Some(location.to_string());
    record.category = Some("Postgraduate".to_string());
    record.university_type = Some("Public".to_string());
    record.acceptance_rate_percent = acceptance_rate;
    record
}

/// Three institutions of clearly different selectivity.
pub(super) fn catalog_records() -> Vec<InstitutionRecord> {
    let mut selective = institution(
        "uni-selective",
        "Harbor Institute of Technology",
        "MS Computer Science",
        "Boston, USA",
        Some(8.0),
    );
    selective.tuition_fees_per_year = Some(75_000.0);
    selective.ranking_national = Some(3);

    let mut maple = institution(
        "uni-maple",
        "Maple University",
        "MSc Computer Science",
        "Toronto, Canada",
        Some(45.0),
    );
    maple.tuition_fees_per_year = Some(32_000.0);
    maple.ranking_national = Some(12);

    let mut prairie = institution(
        "uni-prairie",
        "Prairie State College",
        "MBA Finance",
        "Regina, Canada",
        Some(70.0),
    );
    prairie.tuition_fees_per_year = Some(18_500.0);

    vec![selective, maple, prairie]
}

/// Bachelor graduate aiming for a computer science master's in Canada.
pub(super) fn strong_submission() -> ProfileSubmission {
    ProfileSubmission {
        academic_score: Some(RawNumber::Number(96.0)),
        academic_scale: None,
        top_ten_percent: true,
        highest_education_level: Some("Bachelor of Technology".to_string()),
        school_board: Some("CBSE".to_string()),
        english_test: Some(RawTest::Kind {
            kind: "ielts".to_string(),
        }),
        aptitude_test: Some(RawTest::Kind {
            kind: "gre".to_string(),
        }),
        ap_exams_taken: false,
        co_curricular_rating: Some(RawRating::Number(4.0)),
        extra_curricular_rating: Some(RawRating::List(vec![serde_json::json!(5)])),
        internship: Some(RawInternship {
            duration_value: Some(RawNumber::Number(6.0)),
            unit: Some("months".to_string()),
        }),
        target_country: Some("Canada".to_string()),
        target_field_of_study: Some("Computer Science".to_string()),
        target_degree: Some("Master of Science".to_string()),
    }
}

pub(super) fn build_service(
    records: Vec<InstitutionRecord>,
) -> (MatchService<MemoryCatalog>, Arc<MemoryCatalog>) {
    let catalog = Arc::new(MemoryCatalog::with_records(records));
    let service = MatchService::new(catalog.clone(), MatchSettings::default())
        .expect("default weights are valid");
    (service, catalog)
}

pub(super) fn router_with_records(records: Vec<InstitutionRecord>) -> axum::Router {
    let (service, _) = build_service(records);
    match_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryCatalog {
    pub(super) records: Arc<Mutex<Vec<InstitutionRecord>>>,
}

impl MemoryCatalog {
    pub(super) fn with_records(records: Vec<InstitutionRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("catalog mutex poisoned").len()
    }
}

impl InstitutionCatalog for MemoryCatalog {
    fn insert(&self, record: InstitutionRecord) -> Result<InstitutionRecord, CatalogError> {
        let mut guard = self.records.lock().expect("catalog mutex poisoned");
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(CatalogError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn update(&self, record: InstitutionRecord) -> Result<InstitutionRecord, CatalogError> {
        let mut guard = self.records.lock().expect("catalog mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == record.id)
            .ok_or(CatalogError::NotFound)?;
        *slot = record.clone();
        Ok(record)
    }

    fn remove(&self, id: &InstitutionId) -> Result<InstitutionRecord, CatalogError> {
        let mut guard = self.records.lock().expect("catalog mutex poisoned");
        let index = guard
            .iter()
            .position(|existing| &existing.id == id)
            .ok_or(CatalogError::NotFound)?;
        Ok(guard.remove(index))
    }

    fn fetch(&self, id: &InstitutionId) -> Result<Option<InstitutionRecord>, CatalogError> {
        let guard = self.records.lock().expect("catalog mutex poisoned");
        Ok(guard.iter().find(|existing| &existing.id == id).cloned())
    }

    fn list(&self, filter: &CatalogFilter) -> Result<Vec<InstitutionRecord>, CatalogError> {
        let guard = self.records.lock().expect("catalog mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableCatalog;

impl InstitutionCatalog for UnavailableCatalog {
    fn insert(&self, _record: InstitutionRecord) -> Result<InstitutionRecord, CatalogError> {
        Err(CatalogError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: InstitutionRecord) -> Result<InstitutionRecord, CatalogError> {
        Err(CatalogError::Unavailable("database offline".to_string()))
    }

    fn remove(&self, _id: &InstitutionId) -> Result<InstitutionRecord, CatalogError> {
        Err(CatalogError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &InstitutionId) -> Result<Option<InstitutionRecord>, CatalogError> {
        Err(CatalogError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _filter: &CatalogFilter) -> Result<Vec<InstitutionRecord>, CatalogError> {
        Err(CatalogError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
