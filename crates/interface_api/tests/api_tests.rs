//! HTTP API tests
//!
//! Drives the full router (auth middleware included) against the in-memory
//! lending port with a fixed clock.

use std::sync::Arc;

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::{TestRequest, TestServer};
use chrono::NaiveDate;
use serde_json::{json, Value};

use core_kernel::{CustomerId, FixedClock, LoanId};
use domain_lending::{LoanService, MockLendingPort};
use interface_api::auth::{create_token, roles};
use interface_api::config::ApiConfig;
use interface_api::create_router;
use interface_api::dto::customers::CustomerResponse;
use interface_api::dto::loans::{InstallmentResponse, LoanResponse, PaymentResponse};
use interface_api::error::ErrorResponse;

// ============================================================================
// Helpers
// ============================================================================

const SECRET: &str = "api-test-secret";

struct TestApp {
    server: TestServer,
    clock: Arc<FixedClock>,
}

fn app() -> TestApp {
    let clock = Arc::new(FixedClock::on(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()));
    let service = LoanService::new(Arc::new(MockLendingPort::new()), clock.clone());
    let config = ApiConfig {
        jwt_secret: SECRET.to_string(),
        ..ApiConfig::default()
    };

    TestApp {
        server: TestServer::new(create_router(service, config)).unwrap(),
        clock,
    }
}

fn admin_token() -> String {
    create_token("back-office", vec![roles::ADMIN.to_string()], None, SECRET, 600).unwrap()
}

fn customer_token(customer_id: CustomerId) -> String {
    create_token("borrower", vec![roles::CUSTOMER.to_string()], Some(customer_id), SECRET, 600).unwrap()
}

fn bearer(request: TestRequest, token: &str) -> TestRequest {
    request.add_header(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    )
}

async fn register_customer(app: &TestApp, credit_limit: &str) -> CustomerResponse {
    let response = bearer(app.server.post("/api/v1/customers"), &admin_token())
        .json(&json!({ "credit_limit": credit_limit }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<CustomerResponse>()
}

async fn create_loan(app: &TestApp, customer_id: CustomerId, amount: &str, rate: &str, count: u32) -> LoanResponse {
    let response = bearer(app.server.post("/api/v1/loans"), &admin_token())
        .json(&json!({
            "customer_id": customer_id,
            "amount": amount,
            "interest_rate": rate,
            "number_of_installments": count,
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<LoanResponse>()
}

// ============================================================================
// Health and authentication
// ============================================================================

mod health_and_auth {
    use super::*;

    #[tokio::test]
    async fn test_health_is_public() {
        let app = app();

        app.server.get("/health").await.assert_status_ok();

        let ready = app.server.get("/health/ready").await;
        ready.assert_status_ok();
        assert_eq!(ready.json::<Value>()["status"], "ready");
    }

    #[tokio::test]
    async fn test_missing_token_rejected() {
        let app = app();

        let response = app.server.get("/api/v1/loans").await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<ErrorResponse>().error, "unauthorized");
    }

    #[tokio::test]
    async fn test_foreign_token_rejected() {
        let app = app();
        let forged = create_token("mallory", vec![roles::ADMIN.to_string()], None, "other-secret", 600).unwrap();

        bearer(app.server.get("/api/v1/loans"), &forged)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_customers_cannot_create_loans() {
        let app = app();
        let customer = register_customer(&app, "10000").await;

        let response = bearer(app.server.post("/api/v1/loans"), &customer_token(customer.id))
            .json(&json!({
                "customer_id": customer.id,
                "amount": "1000",
                "interest_rate": "0.2",
                "number_of_installments": 6,
            }))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
    }
}

// ============================================================================
// Loans
// ============================================================================

mod loans {
    use super::*;

    #[tokio::test]
    async fn test_create_loan_and_list_installments() {
        let app = app();
        let customer = register_customer(&app, "10000").await;

        let loan = create_loan(&app, customer.id, "5000", "0.2", 12).await;
        assert_eq!(loan.loan_amount.to_string(), "6000.00");
        assert!(!loan.is_paid);

        let response = bearer(
            app.server.get(&format!("/api/v1/loans/{}/installments", loan.id.as_uuid())),
            &admin_token(),
        )
        .await;
        response.assert_status_ok();

        let installments = response.json::<Vec<InstallmentResponse>>();
        assert_eq!(installments.len(), 12);
        assert_eq!(installments[0].due_date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(installments[0].amount.to_string(), "500.00");

        let customer = bearer(
            app.server.get(&format!("/api/v1/customers/{}", customer.id.as_uuid())),
            &admin_token(),
        )
        .await
        .json::<CustomerResponse>();
        assert_eq!(customer.used_credit_limit.to_string(), "6000.00");
        assert_eq!(customer.available_credit.to_string(), "4000.00");
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let app = app();
        let customer = register_customer(&app, "10000").await;

        let cases = [
            (json!(10), json!("0.2"), "invalid_installment_count"),
            (json!(6), json!("0.05"), "invalid_interest_rate"),
            (json!(6), json!("0.6"), "invalid_interest_rate"),
        ];

        for (count, rate, expected) in cases {
            let response = bearer(app.server.post("/api/v1/loans"), &admin_token())
                .json(&json!({
                    "customer_id": customer.id,
                    "amount": "1000",
                    "interest_rate": rate,
                    "number_of_installments": count,
                }))
                .await;

            response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(response.json::<ErrorResponse>().error, expected);
        }
    }

    #[tokio::test]
    async fn test_insufficient_credit_is_conflict() {
        let app = app();
        let customer = register_customer(&app, "1000").await;

        let response = bearer(app.server.post("/api/v1/loans"), &admin_token())
            .json(&json!({
                "customer_id": customer.id,
                "amount": "1000",
                "interest_rate": "0.1",
                "number_of_installments": 6,
            }))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(response.json::<ErrorResponse>().error, "insufficient_credit");
    }

    #[tokio::test]
    async fn test_unknown_customer_is_not_found() {
        let app = app();

        let response = bearer(app.server.post("/api/v1/loans"), &admin_token())
            .json(&json!({
                "customer_id": CustomerId::new(),
                "amount": "1000",
                "interest_rate": "0.1",
                "number_of_installments": 6,
            }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<ErrorResponse>().error, "customer_not_found");
    }

    #[tokio::test]
    async fn test_admin_must_name_customer_when_listing() {
        let app = app();

        bearer(app.server.get("/api/v1/loans"), &admin_token())
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_customer_listing_is_scoped_to_token() {
        let app = app();
        let alice = register_customer(&app, "10000").await;
        let bob = register_customer(&app, "10000").await;
        let alice_loan = create_loan(&app, alice.id, "1000", "0.1", 6).await;
        create_loan(&app, bob.id, "2000", "0.1", 6).await;

        // asking for bob's loans with alice's token still yields alice's
        let response = bearer(
            app.server.get(&format!("/api/v1/loans?customer_id={}", bob.id.as_uuid())),
            &customer_token(alice.id),
        )
        .await;
        response.assert_status_ok();

        let loans = response.json::<Vec<LoanResponse>>();
        assert_eq!(loans.len(), 1);
        assert_eq!(loans[0].id, alice_loan.id);
    }

    #[tokio::test]
    async fn test_customer_cannot_read_foreign_loan() {
        let app = app();
        let alice = register_customer(&app, "10000").await;
        let bob = register_customer(&app, "10000").await;
        let bob_loan = create_loan(&app, bob.id, "1000", "0.1", 6).await;

        let uri = format!("/api/v1/loans/{}", bob_loan.id.as_uuid());
        bearer(app.server.get(&uri), &customer_token(alice.id))
            .await
            .assert_status(StatusCode::FORBIDDEN);
        bearer(app.server.get(&uri), &customer_token(bob.id))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_unknown_loan() {
        let app = app();

        let response = bearer(
            app.server.get(&format!("/api/v1/loans/{}", LoanId::new().as_uuid())),
            &admin_token(),
        )
        .await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<ErrorResponse>().error, "loan_not_found");
    }
}

// ============================================================================
// Payments
// ============================================================================

mod payments {
    use super::*;

    #[tokio::test]
    async fn test_owner_pays_due_installments() {
        let app = app();
        let customer = register_customer(&app, "10000").await;
        let loan = create_loan(&app, customer.id, "5000", "0.2", 12).await;
        app.clock.advance_months(1);

        let response = bearer(
            app.server.post(&format!("/api/v1/loans/{}/payments", loan.id.as_uuid())),
            &customer_token(customer.id),
        )
        .json(&json!({ "amount": "1000" }))
        .await;
        response.assert_status_ok();

        let payment = response.json::<PaymentResponse>();
        assert_eq!(payment.installments_paid, 2);
        assert_eq!(payment.amount_spent.to_string(), "1000.00");
        assert!(!payment.loan_fully_paid);
    }

    #[tokio::test]
    async fn test_paying_a_paid_loan_is_conflict() {
        let app = app();
        let customer = register_customer(&app, "10000").await;
        let loan = create_loan(&app, customer.id, "600", "0.1", 6).await;
        app.clock.advance_months(6);
        let uri = format!("/api/v1/loans/{}/payments", loan.id.as_uuid());

        let first = bearer(app.server.post(&uri), &admin_token())
            .json(&json!({ "amount": "660" }))
            .await
            .json::<PaymentResponse>();
        assert!(first.loan_fully_paid);

        let second = bearer(app.server.post(&uri), &admin_token())
            .json(&json!({ "amount": "10" }))
            .await;
        second.assert_status(StatusCode::CONFLICT);
        assert_eq!(second.json::<ErrorResponse>().error, "loan_already_paid");
    }

    #[tokio::test]
    async fn test_negative_payment_rejected() {
        let app = app();
        let customer = register_customer(&app, "10000").await;
        let loan = create_loan(&app, customer.id, "600", "0.1", 6).await;

        let response = bearer(
            app.server.post(&format!("/api/v1/loans/{}/payments", loan.id.as_uuid())),
            &admin_token(),
        )
        .json(&json!({ "amount": "-5" }))
        .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<ErrorResponse>().error, "invalid_amount");
    }

    #[tokio::test]
    async fn test_stranger_cannot_pay() {
        let app = app();
        let owner = register_customer(&app, "10000").await;
        let stranger = register_customer(&app, "10000").await;
        let loan = create_loan(&app, owner.id, "600", "0.1", 6).await;

        bearer(
            app.server.post(&format!("/api/v1/loans/{}/payments", loan.id.as_uuid())),
            &customer_token(stranger.id),
        )
        .json(&json!({ "amount": "110" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
    }
}
