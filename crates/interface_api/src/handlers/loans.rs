//! Loan handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use core_kernel::{LoanId, Money, Rate};
use domain_lending::LoanApplication;

use crate::auth::{authorize_customer, require_role, resolve_customer_scope, roles, Claims};
use crate::dto::loans::*;
use crate::{error::ApiError, AppState};

/// Opens a loan for a customer
pub async fn create_loan(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<CreateLoanRequest>,
) -> Result<(StatusCode, Json<LoanResponse>), ApiError> {
    require_role(&claims, roles::ADMIN)?;

    let application = LoanApplication::new(
        request.customer_id,
        Money::new(request.amount),
        Rate::new(request.interest_rate),
        request.number_of_installments,
    );
    let loan = state.service.create_loan(application).await?;

    Ok((StatusCode::CREATED, Json(loan.into())))
}

/// Lists a customer's loans
///
/// Customer callers always get their own loans.
pub async fn list_loans(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ListLoansQuery>,
) -> Result<Json<Vec<LoanResponse>>, ApiError> {
    let customer_id = resolve_customer_scope(&claims, query.customer_id)?
        .ok_or_else(|| ApiError::BadRequest("customer_id is required".to_string()))?;

    let loans = state.service.list_loans(customer_id).await?;
    Ok(Json(loans.into_iter().map(Into::into).collect()))
}

/// Gets a loan by ID
pub async fn get_loan(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<LoanId>,
) -> Result<Json<LoanResponse>, ApiError> {
    let loan = state.service.get_loan(id).await?;
    authorize_customer(&claims, loan.customer_id)?;
    Ok(Json(loan.into()))
}

/// Lists a loan's installments, earliest due first
pub async fn list_installments(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<LoanId>,
) -> Result<Json<Vec<InstallmentResponse>>, ApiError> {
    if !claims.is_admin() {
        let loan = state.service.get_loan(id).await?;
        authorize_customer(&claims, loan.customer_id)?;
    }

    let installments = state.service.list_installments(id).await?;
    Ok(Json(installments.into_iter().map(Into::into).collect()))
}

/// Applies a payment to a loan
pub async fn pay_loan(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<LoanId>,
    Json(request): Json<PayLoanRequest>,
) -> Result<Json<PaymentResponse>, ApiError> {
    if !claims.is_admin() {
        let loan = state.service.get_loan(id).await?;
        authorize_customer(&claims, loan.customer_id)?;
    }

    let result = state.service.pay_loan(id, Money::new(request.amount)).await?;
    Ok(Json(result.into()))
}
