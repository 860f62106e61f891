//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use boutique_core::{Product, ProductId};

use crate::config::StorefrontConfig;
use crate::db::products::Review;
use crate::services::exchange::{ExchangeError, ExchangeService};

/// Cache TTL for catalog reads.
const CACHE_TTL: Duration = Duration::from_secs(60);

/// Maximum cached entries.
const CACHE_CAPACITY: u64 = 1_000;

/// Key for the catalog read cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Product(ProductId),
    FeaturedProducts,
    FeaturedReviews,
}

/// Cached catalog values. Wrapped in `Arc` so hits are cheap clones.
#[derive(Clone)]
pub enum CacheValue {
    Product(Arc<Product>),
    Products(Arc<Vec<Product>>),
    Reviews(Arc<Vec<Review>>),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    exchange: ExchangeService,
    catalog_cache: Cache<CacheKey, CacheValue>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the exchange-rate HTTP client fails to build.
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Result<Self, ExchangeError> {
        let exchange = ExchangeService::new(config.exchange_rate_url.clone())?;

        let catalog_cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                exchange,
                catalog_cache,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the exchange-rate service.
    #[must_use]
    pub fn exchange(&self) -> &ExchangeService {
        &self.inner.exchange
    }

    /// Get a reference to the catalog read cache.
    #[must_use]
    pub fn catalog_cache(&self) -> &Cache<CacheKey, CacheValue> {
        &self.inner.catalog_cache
    }

    /// Drop all cached catalog reads. Called after catalog writes.
    pub fn invalidate_catalog_cache(&self) {
        self.inner.catalog_cache.invalidate_all();
    }
}
