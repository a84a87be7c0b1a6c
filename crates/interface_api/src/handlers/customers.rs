//! Customer handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use core_kernel::{CustomerId, Money};

use crate::auth::{authorize_customer, require_role, roles, Claims};
use crate::dto::customers::*;
use crate::{error::ApiError, AppState};

/// Registers a customer with a credit limit
pub async fn create_customer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), ApiError> {
    require_role(&claims, roles::ADMIN)?;

    let customer = state
        .service
        .register_customer(Money::new(request.credit_limit))
        .await?;

    Ok((StatusCode::CREATED, Json(customer.into())))
}

/// Gets a customer by ID
pub async fn get_customer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<CustomerId>,
) -> Result<Json<CustomerResponse>, ApiError> {
    authorize_customer(&claims, id)?;
    let customer = state.service.get_customer(id).await?;
    Ok(Json(customer.into()))
}
