//! canvass-api library - survey response collection and report delivery

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use canvass_common::config::Config;
use canvass_common::events::EventBus;

use crate::channels::DeliveryChannel;

pub mod api;
pub mod channels;
pub mod error;
pub mod services;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Configuration constructed once at process start
    pub config: Arc<Config>,
    /// Event bus feeding the notification dispatcher
    pub events: EventBus,
    /// Report delivery channel; `None` when credentials are unset
    pub delivery: Option<Arc<dyn DeliveryChannel>>,
    /// Service start time for health reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        config: Arc<Config>,
        events: EventBus,
        delivery: Option<Arc<dyn DeliveryChannel>>,
    ) -> Self {
        Self {
            db,
            config,
            events,
            delivery,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// Admin routes (survey CRUD, export) sit behind the bearer-token middleware.
/// Response submission, survey fetch, and health are public; `route_layer`
/// keeps the auth check per-method where public and admin verbs share a path.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{delete, get, post, put};
    use tower_http::cors::CorsLayer;
    use tower_http::trace::TraceLayer;

    let admin_auth = middleware::from_fn_with_state(state.clone(), api::auth::admin_auth);

    Router::new()
        .route(
            "/api/surveys",
            post(api::surveys::create_survey)
                .get(api::surveys::list_surveys)
                .route_layer(admin_auth.clone()),
        )
        .route(
            "/api/surveys/:id",
            get(api::surveys::get_survey).merge(
                put(api::surveys::update_survey)
                    .delete(api::surveys::delete_survey)
                    .route_layer(admin_auth.clone()),
            ),
        )
        .route(
            "/api/surveys/:id/export",
            post(api::export::export_survey).route_layer(admin_auth),
        )
        .route("/api/responses", post(api::responses::submit_response))
        .merge(api::health::health_routes())
        .layer(TraceLayer::new_for_http())
        // Submissions come from browser forms on other origins
        .layer(CorsLayer::permissive())
        .with_state(state)
}
