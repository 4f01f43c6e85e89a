use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::{
    error::{AppError, AppResult},
    models::{
        sanitize_redirect, CatalogItem, ContentKind, Favorite, FilterCriteria, ProfileUpdate,
        SessionContext, SignUpForm, UserProfile, AVATAR_CHOICES, COUNTRIES,
    },
    services::{auth::AuthSession, catalog::DEFAULT_TOP_RATED, CatalogStats},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct TopRatedParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedTitleResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
}

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub seeded: bool,
    pub stats: CatalogStats,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub redirect: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    #[serde(flatten)]
    pub form: SignUpForm,
    pub redirect: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub session: AuthSession,
    /// Where the client should navigate next
    pub redirect: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    pub id: String,
    #[serde(rename = "type", default)]
    pub content_type: String,
}

#[derive(Debug, Serialize)]
pub struct FavoritesResponse {
    pub favorites: Vec<Favorite>,
    pub items: Vec<CatalogItem>,
}

#[derive(Debug, Serialize)]
pub struct ProfileOptions {
    pub avatars: Vec<&'static str>,
    pub countries: Vec<&'static str>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Merged movie + series catalog
pub async fn list_titles(State(state): State<AppState>) -> Json<Vec<CatalogItem>> {
    Json(state.catalog.load().await)
}

pub async fn search_titles(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<CatalogItem>> {
    Json(state.catalog.search(&params.q).await)
}

pub async fn filter_titles(
    State(state): State<AppState>,
    Json(criteria): Json<FilterCriteria>,
) -> Json<Vec<CatalogItem>> {
    Json(state.catalog.filter(&criteria).await)
}

pub async fn top_rated(
    State(state): State<AppState>,
    Query(params): Query<TopRatedParams>,
) -> Json<Vec<CatalogItem>> {
    let limit = params.limit.unwrap_or(DEFAULT_TOP_RATED);
    Json(state.catalog.top_rated(limit).await)
}

pub async fn get_title(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<CatalogItem>> {
    Ok(Json(state.catalog.get(&id).await?))
}

/// Adds a title; the target collection follows the record's `type`/`seasons` fields
pub async fn create_title(
    State(state): State<AppState>,
    Json(fields): Json<Map<String, Value>>,
) -> AppResult<(StatusCode, Json<CreatedTitleResponse>)> {
    let kind = ContentKind::resolve(&fields);
    let id = state.catalog.add_title(kind, fields).await?;
    Ok((StatusCode::CREATED, Json(CreatedTitleResponse { id, kind })))
}

pub async fn titles_by_platform(
    State(state): State<AppState>,
    Path(platform): Path<String>,
) -> AppResult<Json<Vec<CatalogItem>>> {
    Ok(Json(state.catalog.by_platform(&platform).await?))
}

pub async fn titles_by_content_type(
    State(state): State<AppState>,
    Path(content_type): Path<String>,
) -> AppResult<Json<Vec<CatalogItem>>> {
    Ok(Json(state.catalog.by_content_type(&content_type).await?))
}

pub async fn titles_by_genre(
    State(state): State<AppState>,
    Path(genre): Path<String>,
) -> AppResult<Json<Vec<CatalogItem>>> {
    Ok(Json(state.catalog.by_genre(&genre).await?))
}

pub async fn catalog_stats(State(state): State<AppState>) -> AppResult<Json<CatalogStats>> {
    Ok(Json(state.catalog.stats().await?))
}

pub async fn seed_catalog(State(state): State<AppState>) -> AppResult<Json<SeedResponse>> {
    let seeded = state.catalog.seed_sample_data().await?;
    let stats = state.catalog.stats().await?;
    Ok(Json(SeedResponse { seeded, stats }))
}

pub async fn sign_up(
    State(state): State<AppState>,
    session: SessionContext,
    Json(request): Json<SignUpRequest>,
) -> AppResult<(StatusCode, Json<LoginResponse>)> {
    let (auth, profile) = state.profiles.sign_up(&request.form).await?;
    let response = LoginResponse {
        session: auth,
        redirect: resume_target(&session, request.redirect.as_deref()),
        profile: Some(profile),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(state): State<AppState>,
    session: SessionContext,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::InvalidInput(
            "Email and password are required".to_string(),
        ));
    }

    let auth = state
        .auth
        .sign_in(request.email.trim(), &request.password)
        .await?;
    tracing::info!(user_id = %auth.user_id, "User signed in");

    Ok(Json(LoginResponse {
        session: auth,
        redirect: resume_target(&session, request.redirect.as_deref()),
        profile: None,
    }))
}

/// Signing out without a session is a no-op
pub async fn logout(State(state): State<AppState>, session: SessionContext) -> AppResult<StatusCode> {
    if let Some(token) = session.id_token.as_deref() {
        state.auth.sign_out(token).await?;
        tracing::info!(user_id = ?session.user_id, "User signed out");
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn current_session(session: SessionContext) -> Json<SessionContext> {
    Json(session)
}

pub async fn list_favorites(
    State(state): State<AppState>,
    session: SessionContext,
) -> AppResult<Json<FavoritesResponse>> {
    let (favorites, items) = state.favorites.list_with_items(&session).await?;
    Ok(Json(FavoritesResponse { favorites, items }))
}

pub async fn add_favorite(
    State(state): State<AppState>,
    session: SessionContext,
    Json(request): Json<AddFavoriteRequest>,
) -> AppResult<Json<Vec<Favorite>>> {
    let favorites = state
        .favorites
        .add(&session, &request.id, &request.content_type)
        .await?;
    Ok(Json(favorites))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Favorite>>> {
    Ok(Json(state.favorites.remove(&session, &id).await?))
}

pub async fn get_profile(
    State(state): State<AppState>,
    session: SessionContext,
) -> AppResult<Json<UserProfile>> {
    Ok(Json(state.profiles.get(&session).await?))
}

pub async fn update_profile(
    State(state): State<AppState>,
    session: SessionContext,
    Json(update): Json<ProfileUpdate>,
) -> AppResult<Json<UserProfile>> {
    Ok(Json(state.profiles.update(&session, &update).await?))
}

pub async fn delete_profile(
    State(state): State<AppState>,
    session: SessionContext,
) -> AppResult<StatusCode> {
    state.profiles.delete(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn profile_options() -> Json<ProfileOptions> {
    Json(ProfileOptions {
        avatars: AVATAR_CHOICES.to_vec(),
        countries: COUNTRIES.to_vec(),
    })
}

/// Body redirect first, then the pending one from the session, then home
fn resume_target(session: &SessionContext, requested: Option<&str>) -> String {
    requested
        .and_then(sanitize_redirect)
        .or_else(|| session.pending_redirect.clone())
        .unwrap_or_else(|| "/".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_target_prefers_request_body() {
        let session = SessionContext::guest().with_pending_redirect(Some("/favorites"));
        assert_eq!(resume_target(&session, Some("/details?id=3")), "/details?id=3");
        assert_eq!(resume_target(&session, None), "/favorites");
    }

    #[test]
    fn test_resume_target_rejects_offsite() {
        let session = SessionContext::guest();
        assert_eq!(resume_target(&session, Some("https://evil.example")), "/");
        assert_eq!(resume_target(&session, Some("//evil.example")), "/");
    }
}
