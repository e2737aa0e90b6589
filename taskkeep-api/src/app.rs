/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskkeep_api::{app::AppState, config::Config};
/// use taskkeep_shared::store::Stores;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Stores::in_memory(), config);
/// let app = taskkeep_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{auth::jwt_auth_layer, security::SecurityHeadersLayer},
};
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use taskkeep_shared::{
    auth::jwt::TokenService,
    services::{AuthService, TaskService},
    store::Stores,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Registration, login and token checks
    pub auth: Arc<AuthService>,

    /// Owner-scoped task operations
    pub tasks: Arc<TaskService>,

    /// Backing stores, kept for health checks
    pub stores: Stores,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the workflows to `stores`
    pub fn new(stores: Stores, config: Config) -> Self {
        let tokens = TokenService::new(config.jwt.secret.clone(), config.jwt.ttl());

        Self {
            auth: Arc::new(AuthService::new(stores.credentials.clone(), tokens)),
            tasks: Arc::new(TaskService::new(stores.tasks.clone())),
            stores,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET    /health                # Health check (public)
/// ├── /auth/                        # Authentication (public)
/// │   ├── POST /register
/// │   └── POST /login
/// └── /tasks/                       # Tasks (bearer token required)
///     ├── GET    /
///     ├── POST   /
///     ├── GET    /:id
///     ├── DELETE /:id
///     └── PATCH  /:id/status
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Security headers
/// 2. CORS (tower-http CorsLayer)
/// 3. Logging (tower-http TraceLayer)
/// 4. Authentication (task routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/:id",
            get(routes::tasks::get_task).delete(routes::tasks::delete_task),
        )
        .route("/:id/status", patch(routes::tasks::update_task_status))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .nest("/tasks", task_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// CORS policy from configuration
///
/// `*` allows any origin without credentials; otherwise only the listed
/// origins are allowed.
fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
