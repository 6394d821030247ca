use std::sync::Arc;

use std::fmt;
use std::str::FromStr;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Deserializer};
use serde_json::json;
use tracing::error;

use super::catalog::{CatalogFilter, InstitutionCatalog, InstitutionDraft};
use super::domain::InstitutionId;
use super::intake::{ProfileSubmission, RawInternship, RawNumber, RawRating, RawTest};
use super::service::{FindRequest, MatchService, RecommendationRequest};
use crate::error::AppError;
use super::view::{FindResponse, MatchView, RecommendationResponse};

/// Router builder exposing the matching and catalog endpoints.
pub fn match_router<C>(service: Arc<MatchService<C>>) -> Router
where
    C: InstitutionCatalog + 'static,
{
    Router::new()
        .route("/api/v1/universities/find", get(find_handler::<C>))
        .route(
            "/api/v1/universities/recommendations",
            post(recommend_handler::<C>),
        )
        .route(
            "/api/v1/universities/recommendations/prompt",
            post(prompt_handler::<C>),
        )
        .route("/api/v1/universities", post(create_handler::<C>))
        .route(
            "/api/v1/universities/:institution_id",
            put(update_handler::<C>).delete(delete_handler::<C>),
        )
        .route(
            "/api/v1/universities/:institution_id/match",
            post(match_handler::<C>),
        )
        .with_state(service)
}

/// Flat query-string form of the find request.
///
/// Numeric profile fields stay textual here so the intake guard decides how to treat
/// malformed values. Blank filter and page values are read as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FindQuery {
    pub academic_score: Option<String>,
    pub academic_scale: Option<String>,
    pub top_ten_percent: bool,
    pub highest_education_level: Option<String>,
    pub school_board: Option<String>,
    pub english_test: Option<String>,
    pub aptitude_test: Option<String>,
    pub ap_exams_taken: bool,
    pub co_curricular_rating: Option<String>,
    pub extra_curricular_rating: Option<String>,
    pub internship_duration: Option<String>,
    pub internship_unit: Option<String>,
    pub target_country: Option<String>,
    pub target_field_of_study: Option<String>,
    pub target_degree: Option<String>,
    pub country: Option<String>,
    pub program: Option<String>,
    pub category: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub min_acceptance_rate: Option<f64>,
    #[serde(deserialize_with = "blank_as_none")]
    pub max_acceptance_rate: Option<f64>,
    #[serde(deserialize_with = "blank_as_none")]
    pub page: Option<usize>,
    #[serde(deserialize_with = "blank_as_none")]
    pub limit: Option<usize>,
}

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|err| serde::de::Error::custom(format!("`{value}`: {err}"))),
    }
}

impl From<FindQuery> for FindRequest {
    fn from(query: FindQuery) -> Self {
        let profile = ProfileSubmission {
            academic_score: query.academic_score.map(RawNumber::Text),
            academic_scale: query.academic_scale.map(RawNumber::Text),
            top_ten_percent: query.top_ten_percent,
            highest_education_level: query.highest_education_level,
            school_board: query.school_board,
            english_test: query.english_test.map(RawTest::Name),
            aptitude_test: query.aptitude_test.map(RawTest::Name),
            ap_exams_taken: query.ap_exams_taken,
            co_curricular_rating: query.co_curricular_rating.map(RawRating::Text),
            extra_curricular_rating: query.extra_curricular_rating.map(RawRating::Text),
            internship: query.internship_duration.map(|duration| RawInternship {
                duration_value: Some(RawNumber::Text(duration)),
                unit: query.internship_unit,
            }),
            target_country: query.target_country,
            target_field_of_study: query.target_field_of_study,
            target_degree: query.target_degree,
        };

        FindRequest {
            profile,
            filter: CatalogFilter {
                country: query.country,
                program: query.program,
                category: query.category,
                min_acceptance_rate: query.min_acceptance_rate,
                max_acceptance_rate: query.max_acceptance_rate,
            },
            page: query.page,
            limit: query.limit,
        }
    }
}

pub(crate) async fn find_handler<C>(
    State(service): State<Arc<MatchService<C>>>,
    query: Result<Query<FindQuery>, QueryRejection>,
) -> Response
where
    C: InstitutionCatalog + 'static,
{
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return error_response(rejection),
    };

    match service.find(FindRequest::from(query)) {
        Ok(page) => (StatusCode::OK, Json(FindResponse::from(page))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn recommend_handler<C>(
    State(service): State<Arc<MatchService<C>>>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Response
where
    C: InstitutionCatalog + 'static,
{
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return error_response(rejection),
    };

    match service.recommend(request) {
        Ok(tiers) => (StatusCode::OK, Json(RecommendationResponse::from(tiers))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn prompt_handler<C>(
    State(service): State<Arc<MatchService<C>>>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Response
where
    C: InstitutionCatalog + 'static,
{
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return error_response(rejection),
    };

    match service.recommendation_prompt(request) {
        Ok(prompt) => (StatusCode::OK, Json(json!({ "prompt": prompt }))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn match_handler<C>(
    State(service): State<Arc<MatchService<C>>>,
    Path(institution_id): Path<String>,
    payload: Result<Json<ProfileSubmission>, JsonRejection>,
) -> Response
where
    C: InstitutionCatalog + 'static,
{
    let Json(submission) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return error_response(rejection),
    };

    let id = InstitutionId(institution_id);
    match service.match_one(&id, submission) {
        Ok(result) => (StatusCode::OK, Json(MatchView::from(result))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_handler<C>(
    State(service): State<Arc<MatchService<C>>>,
    payload: Result<Json<InstitutionDraft>, JsonRejection>,
) -> Response
where
    C: InstitutionCatalog + 'static,
{
    let Json(draft) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return error_response(rejection),
    };

    match service.create(draft) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_handler<C>(
    State(service): State<Arc<MatchService<C>>>,
    Path(institution_id): Path<String>,
    payload: Result<Json<InstitutionDraft>, JsonRejection>,
) -> Response
where
    C: InstitutionCatalog + 'static,
{
    let Json(draft) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return error_response(rejection),
    };

    let id = InstitutionId(institution_id);
    match service.update(&id, draft) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_handler<C>(
    State(service): State<Arc<MatchService<C>>>,
    Path(institution_id): Path<String>,
) -> Response
where
    C: InstitutionCatalog + 'static,
{
    let id = InstitutionId(institution_id);
    match service.remove(&id) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

/// Render any request failure through the shared `AppError` status mapping.
fn error_response(err: impl Into<AppError>) -> Response {
    let err = err.into();
    let message = err.to_string();
    let response = err.into_response();
    if response.status().is_server_error() {
        error!(error = %message, "matching request failed");
    }
    response
}
