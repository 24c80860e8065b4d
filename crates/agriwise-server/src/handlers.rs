//! HTTP request handlers for the AgriWise API.
//!
//! Public routes: `/`, `/health`, `/api/v1/auth/token`. Everything else
//! under `/api/v1` requires a bearer token.

use crate::auth::AuthUser;
use crate::config::ServerConfig;
use crate::error::AppError;
use crate::session::SessionManager;
use agriwise_domain::analytics::{user_analytics, UserAnalytics};
use agriwise_domain::tips::{farming_tips, FarmingTip};
use agriwise_domain::voice::{process_voice_command, VoiceResponse};
use agriwise_domain::{
    DiseaseDetector, DiseaseDiagnosis, EntropySource, FarmerProfile, LoanAssessor, RandomSource,
    RiskAssessment, SeededSource, ValidationError,
};
use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, JsonRejection, QueryRejection},
        DefaultBodyLimit, Query, State,
    },
    http::{header::CONTENT_TYPE, HeaderMap},
    response::Json,
    routing::{get, post},
    Router as AxumRouter,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// API version reported by `/` and `/health`
pub const API_VERSION: &str = "1.0.0";

/// Service name reported by `/health`
pub const SERVICE_NAME: &str = "AgriWise AI Backend";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Session manager for JWT token operations
    pub session_manager: Arc<SessionManager>,
    /// Loan policy used by the assessment endpoint
    pub assessor: Arc<dyn LoanAssessor>,
    /// Random generators for scoring and the simulated models
    pub random: Arc<dyn RandomSource>,
    /// Simulated disease classifier
    pub detector: Arc<DiseaseDetector>,
    /// Largest accepted request body in bytes
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Build the state described by a configuration
    pub fn from_config(config: &ServerConfig) -> Self {
        let random: Arc<dyn RandomSource> = match config.rng_seed {
            Some(seed) => Arc::new(SeededSource::new(seed)),
            None => Arc::new(EntropySource),
        };

        Self {
            session_manager: Arc::new(SessionManager::new(
                &config.jwt_secret,
                config.token_expiry_secs,
            )),
            assessor: Arc::new(config.loan_policy.clone()),
            random,
            detector: Arc::new(DiseaseDetector::new()),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

/// Root document
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    /// Greeting
    pub message: String,
    /// What the API does
    pub description: String,
    /// API version
    pub version: String,
    /// Health check path
    pub health: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Time of the check
    pub timestamp: DateTime<Utc>,
    /// API version
    pub version: String,
    /// Service name
    pub service: String,
}

/// Token issuance request
#[derive(Debug, Deserialize)]
pub struct IssueTokenRequest {
    /// User the token is issued to (defaults to "default-user")
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

fn default_user_id() -> String {
    "default-user".to_string()
}

/// Token issuance response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Always true
    pub success: bool,
    /// JWT bearer token
    pub token: String,
    /// Always "bearer"
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: u64,
}

/// Loan assessment request body
///
/// Enumerated fields arrive as strings so that unknown values surface as
/// validation errors rather than JSON parse failures.
#[derive(Debug, Clone, Deserialize)]
pub struct LoanAssessmentRequest {
    /// Farm size in acres
    pub farm_size: f64,
    /// Main crop
    pub crop_type: String,
    /// Years of farming experience
    pub experience_years: u32,
    /// Loans taken before
    pub previous_loans: u32,
    /// Credit score
    pub credit_score: i32,
    /// low, medium or high
    pub income_level: String,
    /// Free-form location
    #[serde(default)]
    pub location: String,
}

impl TryFrom<LoanAssessmentRequest> for FarmerProfile {
    type Error = ValidationError;

    fn try_from(request: LoanAssessmentRequest) -> Result<Self, Self::Error> {
        let profile = FarmerProfile {
            farm_size: request.farm_size,
            crop_type: request.crop_type.parse()?,
            experience_years: request.experience_years,
            previous_loans: request.previous_loans,
            credit_score: request.credit_score,
            income_level: request.income_level.parse()?,
            location: request.location,
        };
        profile.validate()?;
        Ok(profile)
    }
}

/// Loan assessment response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanAssessmentResponse {
    /// Always true
    pub success: bool,
    /// The decision
    pub assessment: RiskAssessment,
    /// Time of the assessment
    pub timestamp: DateTime<Utc>,
}

/// Query parameters for disease detection
#[derive(Debug, Deserialize)]
pub struct DiseaseDetectionQuery {
    /// Crop in the photo (defaults to maize)
    pub crop_type: Option<String>,
}

/// Disease detection response
#[derive(Debug, Serialize, Deserialize)]
pub struct DiseaseDetectionResponse {
    /// Always true
    pub success: bool,
    /// Diagnosis
    pub result: DiseaseDiagnosis,
    /// Time of the detection
    pub timestamp: DateTime<Utc>,
}

/// Query parameters for the voice assistant
#[derive(Debug, Deserialize)]
pub struct VoiceQuery {
    /// Spoken language (defaults to swahili)
    pub language: Option<String>,
}

/// Voice assistant response
#[derive(Debug, Serialize, Deserialize)]
pub struct VoiceAssistantResponse {
    /// Always true
    pub success: bool,
    /// Interpreted command
    pub response: VoiceResponse,
    /// Language as requested
    pub language: String,
    /// Time of the reply
    pub timestamp: DateTime<Utc>,
}

/// Query parameters for farming tips
#[derive(Debug, Deserialize)]
pub struct FarmingTipsQuery {
    /// Restrict to tips for this crop
    pub crop_type: Option<String>,
    /// Season (accepted, not yet used for filtering)
    pub season: Option<String>,
}

/// Farming tips response
#[derive(Debug, Serialize, Deserialize)]
pub struct FarmingTipsResponse {
    /// Always true
    pub success: bool,
    /// Matching tips
    pub tips: Vec<FarmingTip>,
    /// Time of the reply
    pub timestamp: DateTime<Utc>,
}

/// Analytics response
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    /// Always true
    pub success: bool,
    /// Snapshot for the caller
    pub analytics: UserAnalytics,
    /// Time of the reply
    pub timestamp: DateTime<Utc>,
}

/// GET / - API information
async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Welcome to AgriWise AI API".to_string(),
        description: "AI-Powered Agricultural Intelligence Platform".to_string(),
        version: API_VERSION.to_string(),
        health: "/health".to_string(),
    })
}

/// GET /health - Liveness check
async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: API_VERSION.to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

/// POST /api/v1/auth/token - Issue a bearer token
///
/// Development issuer: no credentials are checked, any non-empty `user_id`
/// receives a signed token. A bearer token therefore identifies the caller
/// but does not authenticate them.
async fn issue_token(
    State(state): State<AppState>,
    payload: Result<Json<IssueTokenRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Json(request) = payload?;
    if request.user_id.trim().is_empty() {
        return Err(AppError::BadRequest("user_id must not be empty".to_string()));
    }

    let token = state.session_manager.generate_token(&request.user_id)?;
    info!("Issued token for user {}", request.user_id);

    Ok(Json(TokenResponse {
        success: true,
        token,
        token_type: "bearer".to_string(),
        expires_in: state.session_manager.token_expiry_secs(),
    }))
}

/// POST /api/v1/loan-assessment - Score a farmer profile
async fn assess_loan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<LoanAssessmentRequest>, JsonRejection>,
) -> Result<Json<LoanAssessmentResponse>, AppError> {
    let Json(request) = payload?;
    let profile = FarmerProfile::try_from(request)?;

    let mut rng = state.random.rng();
    let assessment = state.assessor.assess(profile, &mut rng)?;

    info!(
        "Loan assessment completed for user {}: eligible={}, risk={:.3}",
        user_id, assessment.eligible, assessment.risk_score
    );

    Ok(Json(LoanAssessmentResponse {
        success: true,
        assessment,
        timestamp: Utc::now(),
    }))
}

/// Reject bodies whose content type does not start with `prefix` or that are empty
fn require_upload(
    headers: &HeaderMap,
    body: &Bytes,
    prefix: &str,
    wrong_type_message: &str,
) -> Result<(), AppError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if !content_type.starts_with(prefix) {
        return Err(AppError::BadRequest(wrong_type_message.to_string()));
    }

    if body.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
    }

    Ok(())
}

/// POST /api/v1/disease-detection - Diagnose a crop photo
async fn detect_disease(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    query: Result<Query<DiseaseDetectionQuery>, QueryRejection>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<DiseaseDetectionResponse>, AppError> {
    let Query(query) = query?;
    let body = body?;
    require_upload(&headers, &body, "image/", "File must be an image")?;

    let crop_type = query.crop_type.unwrap_or_else(|| "maize".to_string());
    let mut rng = state.random.rng();
    let result = state.detector.detect(&crop_type, &mut rng);

    info!(
        "Disease detection completed for user {}, crop: {}: {} ({:.2}%)",
        user_id, crop_type, result.disease, result.confidence
    );

    Ok(Json(DiseaseDetectionResponse {
        success: true,
        result,
        timestamp: Utc::now(),
    }))
}

/// POST /api/v1/voice-assistant - Interpret a voice command
async fn voice_assistant(
    AuthUser(user_id): AuthUser,
    query: Result<Query<VoiceQuery>, QueryRejection>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<VoiceAssistantResponse>, AppError> {
    let Query(query) = query?;
    let body = body?;
    require_upload(&headers, &body, "audio/", "File must be an audio file")?;

    let language = query.language.unwrap_or_else(|| "swahili".to_string());
    let response = process_voice_command(&language);
    info!("Voice command processed for user {} in {}", user_id, language);

    Ok(Json(VoiceAssistantResponse {
        success: true,
        response,
        language,
        timestamp: Utc::now(),
    }))
}

/// GET /api/v1/farming-tips - Tips for an optional crop and season
async fn get_farming_tips(
    AuthUser(_user_id): AuthUser,
    query: Result<Query<FarmingTipsQuery>, QueryRejection>,
) -> Result<Json<FarmingTipsResponse>, AppError> {
    let Query(query) = query?;
    let tips = farming_tips(query.crop_type.as_deref(), query.season.as_deref());

    Ok(Json(FarmingTipsResponse {
        success: true,
        tips,
        timestamp: Utc::now(),
    }))
}

/// GET /api/v1/analytics - Usage analytics for the caller
async fn get_analytics(AuthUser(user_id): AuthUser) -> Json<AnalyticsResponse> {
    Json(AnalyticsResponse {
        success: true,
        analytics: user_analytics(&user_id),
        timestamp: Utc::now(),
    })
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    let max_upload_bytes = state.max_upload_bytes;

    AxumRouter::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api/v1/auth/token", post(issue_token))
        .route("/api/v1/loan-assessment", post(assess_loan))
        .route("/api/v1/disease-detection", post(detect_disease))
        .route("/api/v1/voice-assistant", post(voice_assistant))
        .route("/api/v1/farming-tips", get(get_farming_tips))
        .route("/api/v1/analytics", get(get_analytics))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
