//! Renew Web Server
//!
//! Axum-based REST API over the Renew core: month views grouped into past
//! and upcoming billing dates, spend totals, category breakdown and the
//! upcoming-charge forecast.
//!
//! Security features:
//! - Restrictive CORS policy
//! - Input validation (month ranges, forecast window limits)
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use renew_core::{Config, SortKey, SpendMode, Subscription, SubscriptionStore};

mod handlers;

/// Longest forecast window accepted by `/api/upcoming`
pub const MAX_UPCOMING_DAYS: u32 = 366;

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Monthly total mode when a request does not name one
    pub spend_mode: SpendMode,
    /// List ordering when a request does not name one
    pub sort: SortKey,
    /// Forecast window when a request does not name one
    pub upcoming_days: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            spend_mode: SpendMode::default(),
            sort: SortKey::default(),
            upcoming_days: 30,
        }
    }
}

impl From<&Config> for ServerConfig {
    fn from(config: &Config) -> Self {
        Self {
            allowed_origins: config.server.allowed_origins.clone(),
            spend_mode: config.spend_mode,
            sort: config.sort,
            upcoming_days: config.upcoming_days,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub subscriptions: RwLock<Vec<Subscription>>,
    pub config: ServerConfig,
    /// Backing store for reloads (absent for fixed in-memory lists)
    pub store: Option<SubscriptionStore>,
}

/// Local calendar date used as "today" when a request does not pass one
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Create the application router over a fixed subscription list
pub fn create_router(subscriptions: Vec<Subscription>, config: ServerConfig) -> Router {
    create_router_with_store(subscriptions, config, None)
}

/// Create the application router with a store to reload from
pub fn create_router_with_store(
    subscriptions: Vec<Subscription>,
    config: ServerConfig,
    store: Option<SubscriptionStore>,
) -> Router {
    info!(
        count = subscriptions.len(),
        mode = %config.spend_mode,
        "Serving subscriptions"
    );

    let state = Arc::new(AppState {
        subscriptions: RwLock::new(subscriptions),
        config: config.clone(),
        store,
    });

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        // Subscriptions
        .route("/subscriptions", get(handlers::list_subscriptions))
        .route("/subscriptions/reload", post(handlers::reload_subscriptions))
        .route("/subscriptions/:id", get(handlers::get_subscription))
        // Month view
        .route("/months/:year/:month", get(handlers::get_month))
        // Spend
        .route("/spend", get(handlers::get_spend))
        .route("/spend/categories", get(handlers::get_spend_by_category))
        // Forecast
        .route("/upcoming", get(handlers::get_upcoming));

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    Router::new()
        .nest("/api", api_routes)
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}

/// Load the store and serve until shutdown
pub async fn serve(
    store: SubscriptionStore,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let subscriptions = store.load()?;
    if subscriptions.is_empty() {
        warn!(
            path = %store.path().display(),
            "No subscriptions found, serving an empty list"
        );
    }

    let app = create_router_with_store(subscriptions, config, Some(store));
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
