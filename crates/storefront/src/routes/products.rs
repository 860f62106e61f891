//! Catalog routes: product listing, detail, categories, reviews.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tower_sessions::Session;

use boutique_core::{Product, ProductId};

use crate::db::products::{ProductFilter, ProductRepository, ProductSort, Review};
use crate::error::AppError;
use crate::middleware::auth::RequireAuth;
use crate::models::session::{MAX_RECENT_SEARCHES, keys};
use crate::state::{AppState, CacheKey, CacheValue};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort: Option<ProductSort>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReviewRequest {
    pub rating: i32,
    pub comment: String,
}

/// `GET /api/products` - List products with optional filters.
///
/// A non-empty `search` term is also remembered in the session's recent
/// searches.
pub async fn list(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned);

    if let Some(term) = &search {
        remember_search(&session, term).await?;
    }

    let filter = ProductFilter {
        category: query.category.filter(|c| !c.is_empty()),
        search,
        sort: query.sort.unwrap_or_default(),
    };

    let products = ProductRepository::new(state.pool()).list(&filter).await?;
    Ok(Json(products))
}

/// `GET /api/products/featured` - Featured products for the home page.
pub async fn featured(State(state): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    if let Some(CacheValue::Products(products)) =
        state.catalog_cache().get(&CacheKey::FeaturedProducts).await
    {
        return Ok(Json(products.as_ref().clone()));
    }

    let products = ProductRepository::new(state.pool()).featured().await?;
    state
        .catalog_cache()
        .insert(
            CacheKey::FeaturedProducts,
            CacheValue::Products(Arc::new(products.clone())),
        )
        .await;

    Ok(Json(products))
}

/// `GET /api/products/categories` - Distinct categories for nav filters.
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    let categories = ProductRepository::new(state.pool()).categories().await?;
    Ok(Json(categories))
}

/// `GET /api/products/{id}` - Product detail.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>, AppError> {
    if let Some(CacheValue::Product(product)) =
        state.catalog_cache().get(&CacheKey::Product(id)).await
    {
        return Ok(Json(product.as_ref().clone()));
    }

    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or(AppError::NotFound("product"))?;

    state
        .catalog_cache()
        .insert(
            CacheKey::Product(id),
            CacheValue::Product(Arc::new(product.clone())),
        )
        .await;

    Ok(Json(product))
}

/// `GET /api/products/{id}/reviews` - Reviews for a product, newest first.
pub async fn reviews(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Vec<Review>>, AppError> {
    let repo = ProductRepository::new(state.pool());

    if repo.get(id).await?.is_none() {
        return Err(AppError::NotFound("product"));
    }

    let reviews = repo.reviews(id).await?;
    Ok(Json(reviews))
}

/// `POST /api/products/{id}/reviews` - Add a review (requires auth).
///
/// The product's aggregate rating is recomputed in the same transaction.
pub async fn create_review(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ProductId>,
    Json(body): Json<NewReviewRequest>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    if !(1..=5).contains(&body.rating) {
        return Err(AppError::Validation(
            "rating must be between 1 and 5".to_owned(),
        ));
    }
    if body.comment.trim().is_empty() {
        return Err(AppError::Validation("comment is required".to_owned()));
    }

    let review = ProductRepository::new(state.pool())
        .add_review(id, &user.name, body.rating, body.comment.trim())
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("product"),
            other => AppError::Repository(other),
        })?;

    // The product's rating changed
    state.invalidate_catalog_cache();

    Ok((StatusCode::CREATED, Json(review)))
}

/// `GET /api/products/reviews/featured` - Featured reviews for the home page.
pub async fn featured_reviews(
    State(state): State<AppState>,
) -> Result<Json<Vec<Review>>, AppError> {
    if let Some(CacheValue::Reviews(reviews)) =
        state.catalog_cache().get(&CacheKey::FeaturedReviews).await
    {
        return Ok(Json(reviews.as_ref().clone()));
    }

    let reviews = ProductRepository::new(state.pool()).featured_reviews().await?;
    state
        .catalog_cache()
        .insert(
            CacheKey::FeaturedReviews,
            CacheValue::Reviews(Arc::new(reviews.clone())),
        )
        .await;

    Ok(Json(reviews))
}

/// `GET /api/search/recent` - Recent search terms, newest first.
pub async fn recent_searches(session: Session) -> Result<Json<Vec<String>>, AppError> {
    let recent: Vec<String> = session
        .get(keys::RECENT_SEARCHES)
        .await?
        .unwrap_or_default();
    Ok(Json(recent))
}

/// `DELETE /api/search/recent` - Forget recent searches.
pub async fn clear_recent_searches(session: Session) -> Result<StatusCode, AppError> {
    session
        .remove::<Vec<String>>(keys::RECENT_SEARCHES)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Prepend a term to the session's recent searches, deduplicated and capped.
async fn remember_search(session: &Session, term: &str) -> Result<(), AppError> {
    let mut recent: Vec<String> = session
        .get(keys::RECENT_SEARCHES)
        .await?
        .unwrap_or_default();

    recent.retain(|t| !t.eq_ignore_ascii_case(term));
    recent.insert(0, term.to_owned());
    recent.truncate(MAX_RECENT_SEARCHES);

    session.insert(keys::RECENT_SEARCHES, &recent).await?;
    Ok(())
}
