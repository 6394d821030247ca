mod import;

pub use import::{CatalogImportError, InstitutionCsvImporter};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{InstitutionId, InstitutionRecord};

/// Storage abstraction over the staff-maintained institution catalog.
pub trait InstitutionCatalog: Send + Sync {
    fn insert(&self, record: InstitutionRecord) -> Result<InstitutionRecord, CatalogError>;
    fn update(&self, record: InstitutionRecord) -> Result<InstitutionRecord, CatalogError>;
    fn remove(&self, id: &InstitutionId) -> Result<InstitutionRecord, CatalogError>;
    fn fetch(&self, id: &InstitutionId) -> Result<Option<InstitutionRecord>, CatalogError>;
    /// Records matching `filter`, in a stable catalog order.
    fn list(&self, filter: &CatalogFilter) -> Result<Vec<InstitutionRecord>, CatalogError>;
}

/// Error enumeration for catalog failures.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("institution already exists")]
    Conflict,
    #[error("institution not found")]
    NotFound,
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Simple equality/substring/range predicates applied before scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogFilter {
    pub country: Option<String>,
    pub program: Option<String>,
    pub category: Option<String>,
    pub min_acceptance_rate: Option<f64>,
    pub max_acceptance_rate: Option<f64>,
}

impl CatalogFilter {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn matches(&self, record: &InstitutionRecord) -> bool {
        if let Some(country) = non_blank(&self.country) {
            let location = record.location.as_deref().unwrap_or_default().to_lowercase();
            if !location.contains(&country) {
                return false;
            }
        }

        if let Some(program) = non_blank(&self.program) {
            if !record.program.to_lowercase().contains(&program) {
                return false;
            }
        }

        if let Some(category) = non_blank(&self.category) {
            let matches_category = record
                .category
                .as_deref()
                .is_some_and(|value| value.trim().to_lowercase() == category);
            if !matches_category {
                return false;
            }
        }

        if self.min_acceptance_rate.is_some() || self.max_acceptance_rate.is_some() {
            let Some(rate) = record.acceptance_rate_percent else {
                return false;
            };
            if self.min_acceptance_rate.is_some_and(|min| rate < min) {
                return false;
            }
            if self.max_acceptance_rate.is_some_and(|max| rate > max) {
                return false;
            }
        }

        true
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(|text| text.trim().to_lowercase())
        .filter(|text| !text.is_empty())
}

/// Validation errors raised for staff-submitted institution drafts.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CatalogViolation {
    #[error("institution {0} is required")]
    MissingField(&'static str),
    #[error("acceptance rate must be between 0 and 100 (found {0})")]
    AcceptanceRateOutOfRange(f64),
    #[error("{field} must be a non-negative amount (found {value})")]
    NegativeAmount { field: &'static str, value: f64 },
}

/// Staff input used to create or replace a catalog record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstitutionDraft {
    pub name: String,
    pub program: String,
    pub location: Option<String>,
    pub category: Option<String>,
    pub university_type: Option<String>,
    pub acceptance_rate_percent: Option<f64>,
    pub tuition_fees_per_year: Option<f64>,
    pub ranking_national: Option<u32>,
    pub ranking_international: Option<u32>,
    pub banner_image: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub living_cost: Option<f64>,
    pub application_fee: Option<f64>,
    pub application_deadline: Option<NaiveDate>,
}

impl InstitutionDraft {
    pub fn validate(&self) -> Result<(), CatalogViolation> {
        if self.name.trim().is_empty() {
            return Err(CatalogViolation::MissingField("name"));
        }
        if self.program.trim().is_empty() {
            return Err(CatalogViolation::MissingField("program"));
        }

        if let Some(rate) = self.acceptance_rate_percent {
            if !(0.0..=100.0).contains(&rate) {
                return Err(CatalogViolation::AcceptanceRateOutOfRange(rate));
            }
        }

        let amounts = [
            ("tuitionFeesPerYear", self.tuition_fees_per_year),
            ("livingCost", self.living_cost),
            ("applicationFee", self.application_fee),
        ];
        for (field, amount) in amounts {
            if let Some(value) = amount {
                if !value.is_finite() || value < 0.0 {
                    return Err(CatalogViolation::NegativeAmount { field, value });
                }
            }
        }

        Ok(())
    }

    pub fn into_record(self, id: InstitutionId) -> InstitutionRecord {
        InstitutionRecord {
            id,
            name: self.name.trim().to_string(),
            program: self.program.trim().to_string(),
            location: self.location,
            category: self.category,
            university_type: self.university_type,
            acceptance_rate_percent: self.acceptance_rate_percent,
            tuition_fees_per_year: self.tuition_fees_per_year,
            ranking_national: self.ranking_national,
            ranking_international: self.ranking_international,
            banner_image: self.banner_image,
            description: self.description,
            website: self.website,
            living_cost: self.living_cost,
            application_fee: self.application_fee,
            application_deadline: self.application_deadline,
        }
    }
}
