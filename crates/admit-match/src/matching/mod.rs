//! University match scoring, recommendation tiering, and catalog administration.
//!
//! Raw applicant answers pass through the intake guard into an immutable profile, the catalog
//! supplies candidate institutions, and the scoring engine rates every candidate on its own
//! before the service sorts, paginates, or buckets the results.

pub mod catalog;
pub mod domain;
pub mod intake;
pub mod pagination;
pub mod prompt;
pub mod router;
pub mod scoring;
pub mod service;
pub mod view;

#[cfg(test)]
mod tests;

pub use catalog::{
    CatalogError, CatalogFilter, CatalogImportError, CatalogViolation, InstitutionCatalog,
    InstitutionCsvImporter, InstitutionDraft,
};
pub use domain::{
    ApplicantProfile, AptitudeTest, DegreeLevel, DurationUnit, EducationStage, EnglishTest,
    InstitutionId, InstitutionRecord, Internship,
};
pub use intake::{
    IntakeViolation, NumericPolicy, ProfileGuard, ProfileSubmission, RawInternship, RawNumber,
    RawRating, RawTest,
};
pub use pagination::{PageLimits, PageRequest, Pagination, PaginationError};
pub use prompt::advisor_prompt;
pub use router::{match_router, FindQuery};
pub use scoring::{
    overall_match_percent, MatchEngine, MatchLevel, MatchResult, RecommendationTier,
    ScoringWeights, Subscores, WeightsError,
};
pub use service::{
    FindRequest, MatchService, MatchServiceError, MatchSettings, RankedPage,
    RecommendationRequest, TieredRecommendations,
};
pub use view::{FindResponse, MatchView, RecommendationResponse};
