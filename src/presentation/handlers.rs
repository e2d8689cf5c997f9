use crate::application::auth_service::AuthService;
use crate::application::budget_service::BudgetService;
use crate::domain::entry::{BudgetEntry, Category, EntryPayload};
use crate::domain::error::DomainError;
use crate::domain::summary::{BudgetSummary, CategoryTotal};
use crate::domain::user::User;
use crate::presentation::validation;
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpResponse, ResponseError, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

pub struct AppState {
    pub auth: Arc<AuthService>,
    pub budget: Arc<BudgetService>,
    pub started_at: Instant,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldDetail {
    pub field: String,
    pub message: String,
}

impl FieldDetail {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Validation failed")]
    ValidationFailed(Vec<FieldDetail>),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Database error: {0}")]
    Database(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<FieldDetail>>,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        match self {
            ApiError::Internal(_) | ApiError::Database(_) => {
                error!(error = %self, status = %status, "Request failed")
            }
            _ => warn!(error = %self, status = %status, "Request rejected"),
        }

        // Store failure detail stays in the logs outside debug builds.
        let message = match self {
            ApiError::Internal(_) | ApiError::Database(_) if !cfg!(debug_assertions) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        let details = match self {
            ApiError::ValidationFailed(details) => Some(details.clone()),
            _ => None,
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: message,
            details,
        })
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::Validation(msg)) => ApiError::Validation(msg.clone()),
            Some(DomainError::Conflict(msg)) => ApiError::Conflict(msg.clone()),
            Some(DomainError::Unauthorized(msg)) => ApiError::Unauthorized(msg.clone()),
            Some(DomainError::NotFound(msg)) => ApiError::NotFound(msg.clone()),
            Some(DomainError::Internal(msg)) => ApiError::Internal(msg.clone()),
            None => ApiError::Database(err.to_string()),
        }
    }
}

/// Live profile of the caller, resolved from the bearer token on every
/// request; there is no in-process session state.
#[derive(Clone)]
pub struct AuthenticatedUser(pub User);

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_owned);

        Box::pin(async move {
            let state = state
                .ok_or_else(|| ApiError::Internal("Application state missing".to_string()))?;
            let token = token.ok_or_else(|| {
                ApiError::Unauthorized("Missing or malformed authorization header".to_string())
            })?;
            let user = state.auth.verify_token(&token).await.map_err(ApiError::from)?;
            Ok(AuthenticatedUser(user))
        })
    }
}

// Budget handlers

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: String,
    uptime_secs: u64,
    timestamp: String,
}

#[instrument(skip(state))]
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "Route not found" }))
}

#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn summary(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let summary = state.budget.summary(&user.0.id).await.map_err(ApiError::from)?;
    Ok(HttpResponse::Ok().json(summary))
}

#[derive(Debug, Deserialize)]
pub struct ListEntriesQuery {
    pub category: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Serialize)]
struct EntriesResponse {
    entries: Vec<BudgetEntry>,
}

#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn list_entries(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<ListEntriesQuery>,
) -> Result<HttpResponse, ApiError> {
    // An unrecognized category value falls back to the unfiltered list.
    let category = query.category.as_deref().and_then(Category::parse);
    let entries = state
        .budget
        .list_entries(&user.0.id, category, query.limit, query.offset)
        .await
        .map_err(ApiError::from)?;
    Ok(HttpResponse::Ok().json(EntriesResponse { entries }))
}

#[derive(Serialize)]
struct EntryMutationResponse {
    message: String,
    entry: BudgetEntry,
    summary: BudgetSummary,
}

#[instrument(skip(state, user, body), fields(user_id = %user.0.id, category = %path))]
pub async fn add_entry(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<EntryPayload>,
) -> Result<HttpResponse, ApiError> {
    let category = Category::parse(&path).ok_or_else(|| {
        ApiError::Validation("Invalid category. Must be needs, wants, or savings.".to_string())
    })?;
    validation::validate_entry(&body)?;

    let (entry, summary) = state
        .budget
        .add_entry(&user.0.id, category, body.into_inner())
        .await
        .map_err(ApiError::from)?;

    info!(entry_id = %entry.id, "Entry created");
    Ok(HttpResponse::Created().json(EntryMutationResponse {
        message: "Entry added successfully".to_string(),
        entry,
        summary,
    }))
}

#[instrument(skip(state, user, body), fields(user_id = %user.0.id, entry_id = %path))]
pub async fn update_entry(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<EntryPayload>,
) -> Result<HttpResponse, ApiError> {
    validation::validate_entry(&body)?;

    let (entry, summary) = state
        .budget
        .update_entry(&path, &user.0.id, body.into_inner())
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(EntryMutationResponse {
        message: "Entry updated successfully".to_string(),
        entry,
        summary,
    }))
}

#[derive(Serialize)]
struct DeleteEntryResponse {
    message: String,
    summary: BudgetSummary,
}

#[instrument(skip(state, user), fields(user_id = %user.0.id, entry_id = %path))]
pub async fn delete_entry(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let summary = state
        .budget
        .delete_entry(&path, &user.0.id)
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(DeleteEntryResponse {
        message: "Entry deleted successfully".to_string(),
        summary,
    }))
}

#[derive(Serialize)]
struct MonthlyTotalsResponse {
    totals: Vec<CategoryTotal>,
}

#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn monthly_totals(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(i32, u32)>,
) -> Result<HttpResponse, ApiError> {
    let (year, month) = path.into_inner();
    let totals = state
        .budget
        .monthly_totals(&user.0.id, year, month)
        .await
        .map_err(ApiError::from)?;
    Ok(HttpResponse::Ok().json(MonthlyTotalsResponse { totals }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResetResponse {
    message: String,
    deleted_count: u64,
    summary: BudgetSummary,
}

#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn reset(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let (deleted_count, summary) = state
        .budget
        .reset(&user.0.id)
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(ResetResponse {
        message: format!("Successfully deleted {deleted_count} entries"),
        deleted_count,
        summary,
    }))
}
