//! Customer DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{CustomerId, Money};
use domain_lending::Customer;

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    pub credit_limit: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CustomerResponse {
    pub id: CustomerId,
    pub credit_limit: Money,
    pub used_credit_limit: Money,
    pub available_credit: Money,
    pub created_at: DateTime<Utc>,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            credit_limit: customer.credit_limit,
            used_credit_limit: customer.used_credit_limit,
            available_credit: customer.available_credit(),
            created_at: customer.created_at,
        }
    }
}
