pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    Router,
    routing::{get, post, put, patch, delete},
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::{
    config::Settings,
    service::{PaymentService, ServiceContext},
};
use state::AppState;

pub fn create_app(
    service_context: Arc<ServiceContext>,
    payments: Option<Arc<PaymentService>>,
    settings: Arc<Settings>,
) -> Router {
    let app_state = AppState::new(service_context, payments, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))

        // Auth routes
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))

        // Everything else requires a session
        .merge(protected_routes(app_state.clone()))

        // Add state to the router
        .with_state(app_state)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive()) // Configure properly for production
        .layer(TraceLayer::new_for_http())
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Course materials
        .route("/materials", get(handlers::courses::list))
        .route("/materials", post(handlers::courses::create))
        .route("/materials/:id", get(handlers::courses::get))
        .route("/materials/:id", put(handlers::courses::update))
        .route("/materials/:id", patch(handlers::courses::update))
        .route("/materials/:id", delete(handlers::courses::delete))

        // Lessons, addressed through their own sub-paths so the
        // static segments never collide with the :id routes above
        .route("/materials/lesson", get(handlers::lessons::list))
        .route("/materials/lesson/create", post(handlers::lessons::create))
        .route("/materials/lesson/:id", get(handlers::lessons::get))
        .route("/materials/lesson/update/:id", put(handlers::lessons::update))
        .route("/materials/lesson/update/:id", patch(handlers::lessons::update))
        .route("/materials/lesson/delete/:id", delete(handlers::lessons::delete))

        // Subscriptions toggle on repeated calls
        .route("/subscription/create", post(handlers::subscriptions::toggle))

        // Users and their payment history
        .route("/users", get(handlers::users::list))
        .route("/users/payments", get(handlers::payments::list))
        .route("/users/payments", post(handlers::payments::create))
        .route("/users/payments/:id", get(handlers::payments::get))
        .route("/users/:id", get(handlers::users::get))
        .route("/users/:id", put(handlers::users::update))
        .route("/users/:id", patch(handlers::users::update))
        .route("/users/:id", delete(handlers::users::delete))

        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_auth,
        ))
}
