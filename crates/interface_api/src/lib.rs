//! HTTP API Layer
//!
//! This crate provides the REST API for the loan service using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for loans, customers and health
//! - **Middleware**: Authentication, tracing, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent JSON error bodies
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(service, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;

use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use tower_http::trace::TraceLayer;
use tower_http::cors::{CorsLayer, Any};

use domain_lending::LoanService;

use crate::config::ApiConfig;
use crate::middleware::{auth_middleware, audit_middleware};
use crate::handlers::{customers, health, loans};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: LoanService,
    pub config: ApiConfig,
}

/// Creates the main API router
pub fn create_router(service: LoanService, config: ApiConfig) -> Router {
    let state = AppState { service, config };

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let loan_routes = Router::new()
        .route("/", post(loans::create_loan).get(loans::list_loans))
        .route("/:id", get(loans::get_loan))
        .route("/:id/installments", get(loans::list_installments))
        .route("/:id/payments", post(loans::pay_loan));

    let customer_routes = Router::new()
        .route("/", post(customers::create_customer))
        .route("/:id", get(customers::get_customer));

    // Protected API routes
    let api_routes = Router::new()
        .nest("/loans", loan_routes)
        .nest("/customers", customer_routes)
        .layer(axum_middleware::from_fn_with_state(state.clone(), audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use core_kernel::FixedClock;
    use domain_lending::MockLendingPort;

    fn router() -> Router {
        let service = LoanService::new(
            Arc::new(MockLendingPort::new()),
            Arc::new(FixedClock::new(chrono::Utc::now())),
        );
        create_router(service, ApiConfig::default())
    }

    #[tokio::test]
    async fn test_health_needs_no_token() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_routes_need_token() {
        let response = router()
            .oneshot(Request::get("/api/v1/customers/00000000-0000-0000-0000-000000000000").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
