use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::catalog::{
    CatalogError, CatalogFilter, CatalogViolation, InstitutionCatalog, InstitutionDraft,
};
use super::domain::{ApplicantProfile, InstitutionId, InstitutionRecord};
use super::intake::{IntakeViolation, NumericPolicy, ProfileGuard, ProfileSubmission};
use super::pagination::{PageLimits, Pagination, PaginationError};
use super::prompt::advisor_prompt;
use super::scoring::{MatchEngine, MatchResult, RecommendationTier, ScoringWeights, WeightsError};

pub const DEFAULT_TIER_SIZE: usize = 5;

/// Tunables for the matching service.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSettings {
    pub numeric_policy: NumericPolicy,
    pub weights: ScoringWeights,
    pub page_limits: PageLimits,
    pub tier_size: usize,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            numeric_policy: NumericPolicy::default(),
            weights: ScoringWeights::default(),
            page_limits: PageLimits::default(),
            tier_size: DEFAULT_TIER_SIZE,
        }
    }
}

/// Profile plus catalog predicates and page selection for the find endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FindRequest {
    pub profile: ProfileSubmission,
    pub filter: CatalogFilter,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// Profile plus catalog predicates for the tiered recommendation flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendationRequest {
    pub profile: ProfileSubmission,
    pub filter: CatalogFilter,
    pub per_tier: Option<usize>,
}

/// One page of results ordered by overall match, best first.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPage {
    pub results: Vec<MatchResult>,
    pub pagination: Pagination,
}

/// Scored candidates bucketed by admission probability.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TieredRecommendations {
    pub ambitious: Vec<MatchResult>,
    pub target: Vec<MatchResult>,
    pub safe: Vec<MatchResult>,
    pub backup: Vec<MatchResult>,
    pub total_evaluated: usize,
}

impl TieredRecommendations {
    pub fn tier(&self, tier: RecommendationTier) -> &[MatchResult] {
        match tier {
            RecommendationTier::Ambitious => &self.ambitious,
            RecommendationTier::Target => &self.target,
            RecommendationTier::Safe => &self.safe,
            RecommendationTier::Backup => &self.backup,
        }
    }

    fn tier_mut(&mut self, tier: RecommendationTier) -> &mut Vec<MatchResult> {
        match tier {
            RecommendationTier::Ambitious => &mut self.ambitious,
            RecommendationTier::Target => &mut self.target,
            RecommendationTier::Safe => &mut self.safe,
            RecommendationTier::Backup => &mut self.backup,
        }
    }
}

/// Service composing the intake guard, institution catalog, and scoring engine.
pub struct MatchService<C> {
    guard: Arc<ProfileGuard>,
    catalog: Arc<C>,
    engine: Arc<MatchEngine>,
    settings: MatchSettings,
}

static INSTITUTION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_institution_id() -> InstitutionId {
    let id = INSTITUTION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    InstitutionId(format!("uni-{id:06}"))
}

impl<C> MatchService<C>
where
    C: InstitutionCatalog + 'static,
{
    pub fn new(catalog: Arc<C>, settings: MatchSettings) -> Result<Self, MatchServiceError> {
        let engine = Arc::new(MatchEngine::new(settings.weights)?);
        let guard = Arc::new(ProfileGuard::new(settings.numeric_policy));

        Ok(Self {
            guard,
            catalog,
            engine,
            settings,
        })
    }

    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    pub fn catalog(&self) -> &Arc<C> {
        &self.catalog
    }

    /// Validate a raw submission into an immutable profile.
    pub fn profile(
        &self,
        submission: ProfileSubmission,
    ) -> Result<ApplicantProfile, MatchServiceError> {
        Ok(self.guard.profile_from_submission(submission)?)
    }

    /// Score every candidate independently and order best first.
    ///
    /// The sort is stable, so ties keep catalog order.
    pub fn rank(
        &self,
        profile: &ApplicantProfile,
        candidates: &[InstitutionRecord],
    ) -> Vec<MatchResult> {
        let mut results: Vec<MatchResult> = candidates
            .iter()
            .map(|institution| self.engine.score(profile, institution))
            .collect();
        results.sort_by(|a, b| b.overall_match_percent.cmp(&a.overall_match_percent));
        results
    }

    /// Filter, score, sort, and paginate the catalog for one applicant.
    pub fn find(&self, request: FindRequest) -> Result<RankedPage, MatchServiceError> {
        let page_request = self
            .settings
            .page_limits
            .resolve(request.page, request.limit)?;
        let profile = self.profile(request.profile)?;
        let candidates = self.catalog.list(&request.filter)?;

        let ranked = self.rank(&profile, &candidates);
        let (results, pagination) = page_request.apply(ranked);

        info!(
            candidates = candidates.len(),
            returned = results.len(),
            page = pagination.current_page,
            "ranked institutions for find request"
        );

        Ok(RankedPage {
            results,
            pagination,
        })
    }

    /// Score the catalog and bucket candidates into admission tiers.
    pub fn recommend(
        &self,
        request: RecommendationRequest,
    ) -> Result<TieredRecommendations, MatchServiceError> {
        let (_, recommendations) = self.tiered(request)?;
        Ok(recommendations)
    }

    /// Build the advisor prompt for the tiered recommendations of one applicant.
    pub fn recommendation_prompt(
        &self,
        request: RecommendationRequest,
    ) -> Result<String, MatchServiceError> {
        let (profile, recommendations) = self.tiered(request)?;
        Ok(advisor_prompt(&profile, &recommendations))
    }

    fn tiered(
        &self,
        request: RecommendationRequest,
    ) -> Result<(ApplicantProfile, TieredRecommendations), MatchServiceError> {
        let per_tier = request.per_tier.unwrap_or(self.settings.tier_size);
        let max = self.settings.page_limits.max_limit;
        if !(1..=max).contains(&per_tier) {
            return Err(PaginationError::InvalidLimit { max }.into());
        }

        let profile = self.profile(request.profile)?;
        let candidates = self.catalog.list(&request.filter)?;

        let mut recommendations = TieredRecommendations {
            total_evaluated: candidates.len(),
            ..TieredRecommendations::default()
        };
        for result in self.rank(&profile, &candidates) {
            let bucket = recommendations.tier_mut(result.tier());
            if bucket.len() < per_tier {
                bucket.push(result);
            }
        }

        debug!(
            ambitious = recommendations.ambitious.len(),
            target = recommendations.target.len(),
            safe = recommendations.safe.len(),
            backup = recommendations.backup.len(),
            "bucketed recommendations"
        );

        Ok((profile, recommendations))
    }

    /// Score a single institution for the detail view.
    pub fn match_one(
        &self,
        id: &InstitutionId,
        submission: ProfileSubmission,
    ) -> Result<MatchResult, MatchServiceError> {
        let profile = self.profile(submission)?;
        let institution = self.catalog.fetch(id)?.ok_or(CatalogError::NotFound)?;
        Ok(self.engine.score(&profile, &institution))
    }

    /// Add a staff-authored institution to the catalog.
    pub fn create(&self, draft: InstitutionDraft) -> Result<InstitutionRecord, MatchServiceError> {
        draft.validate()?;
        let record = self.catalog.insert(draft.into_record(next_institution_id()))?;
        info!(id = %record.id.0, name = %record.name, "institution created");
        Ok(record)
    }

    /// Replace an existing catalog record.
    pub fn update(
        &self,
        id: &InstitutionId,
        draft: InstitutionDraft,
    ) -> Result<InstitutionRecord, MatchServiceError> {
        draft.validate()?;
        let record = self.catalog.update(draft.into_record(id.clone()))?;
        info!(id = %record.id.0, "institution updated");
        Ok(record)
    }

    pub fn remove(&self, id: &InstitutionId) -> Result<InstitutionRecord, MatchServiceError> {
        let record = self.catalog.remove(id)?;
        info!(id = %record.id.0, "institution removed");
        Ok(record)
    }

    /// Insert a batch of imported drafts.
    ///
    /// Every draft is validated before the first insert, so a rejected batch leaves the
    /// catalog untouched.
    pub fn import(
        &self,
        drafts: Vec<InstitutionDraft>,
    ) -> Result<Vec<InstitutionRecord>, MatchServiceError> {
        for (index, draft) in drafts.iter().enumerate() {
            draft.validate().inspect_err(|violation| {
                warn!(index, name = %draft.name, %violation, "rejecting catalog import");
            })?;
        }

        let records = drafts
            .into_iter()
            .map(|draft| {
                let record = draft.into_record(next_institution_id());
                self.catalog.insert(record)
            })
            .collect::<Result<Vec<_>, _>>()?;
        info!(count = records.len(), "institutions imported");
        Ok(records)
    }
}

/// Error raised by the matching service.
#[derive(Debug, thiserror::Error)]
pub enum MatchServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error(transparent)]
    Pagination(#[from] PaginationError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    InvalidInstitution(#[from] CatalogViolation),
    #[error(transparent)]
    Weights(#[from] WeightsError),
}
