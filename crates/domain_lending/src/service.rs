//! Lending application service
//!
//! [`LoanService`] runs each operation against the storage port inside a
//! single unit of work. Business rules live in [`crate::origination`] and
//! [`crate::allocation`]; this module only loads, locks and persists.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use core_kernel::{Clock, CustomerId, HealthCheckResult, LoanId, Money};

use crate::allocation::{allocate_payment, PaymentResult};
use crate::customer::Customer;
use crate::error::LendingError;
use crate::installment::Installment;
use crate::loan::Loan;
use crate::origination::{originate, LoanApplication};
use crate::policy::LendingPolicy;
use crate::ports::LendingPort;

/// Service for originating, querying and repaying loans
#[derive(Clone)]
pub struct LoanService {
    port: Arc<dyn LendingPort>,
    clock: Arc<dyn Clock>,
    policy: LendingPolicy,
}

impl LoanService {
    /// Creates a service with the default lending policy
    pub fn new(port: Arc<dyn LendingPort>, clock: Arc<dyn Clock>) -> Self {
        Self {
            port,
            clock,
            policy: LendingPolicy::default(),
        }
    }

    /// Replaces the lending policy
    pub fn with_policy(mut self, policy: LendingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &LendingPolicy {
        &self.policy
    }

    /// Health of the underlying storage
    pub async fn storage_health(&self) -> HealthCheckResult {
        self.port.health_check().await
    }

    /// Registers a customer with the given credit limit
    #[instrument(skip(self), fields(credit_limit = %credit_limit))]
    pub async fn register_customer(&self, credit_limit: Money) -> Result<Customer, LendingError> {
        let customer = Customer::new(credit_limit, self.clock.now())?;

        let mut uow = self.port.begin().await?;
        uow.insert_customer(&customer).await?;
        uow.commit().await?;

        info!(customer_id = %customer.id, "Customer registered");
        Ok(customer)
    }

    #[instrument(skip(self), fields(customer_id = %id))]
    pub async fn get_customer(&self, id: CustomerId) -> Result<Customer, LendingError> {
        self.port
            .get_customer(id)
            .await?
            .ok_or(LendingError::CustomerNotFound(id))
    }

    /// Opens a loan and its installment schedule for a customer
    ///
    /// The customer row is locked before the credit check, so concurrent
    /// originations for the same customer are serialized. The loan, its
    /// installments and the customer's used credit are committed together.
    ///
    /// # Errors
    ///
    /// In order of precedence: `InvalidInstallmentCount`,
    /// `InvalidInterestRate`, `InvalidAmount`, `CustomerNotFound`,
    /// `InsufficientCredit`.
    #[instrument(
        skip(self, application),
        fields(
            customer_id = %application.customer_id,
            principal = %application.principal,
            interest_rate = %application.interest_rate,
            installments = application.number_of_installments,
        )
    )]
    pub async fn create_loan(&self, application: LoanApplication) -> Result<Loan, LendingError> {
        if let Err(e) = application.validate(&self.policy) {
            warn!(error = %e, "Loan application rejected");
            return Err(e);
        }

        let mut uow = self.port.begin().await?;
        let mut customer = uow
            .customer_for_update(application.customer_id)
            .await?
            .ok_or(LendingError::CustomerNotFound(application.customer_id))?;

        let origination = match originate(
            &self.policy,
            &application,
            &mut customer,
            self.clock.now(),
            self.clock.today(),
        ) {
            Ok(origination) => origination,
            Err(e) => {
                warn!(error = %e, "Loan application rejected");
                return Err(e);
            }
        };

        uow.insert_loan(&origination.loan).await?;
        uow.insert_installments(&origination.installments).await?;
        uow.save_customer(&customer).await?;
        uow.commit().await?;

        info!(
            loan_id = %origination.loan.id,
            loan_amount = %origination.loan.loan_amount,
            used_credit_limit = %customer.used_credit_limit,
            "Loan created"
        );
        Ok(origination.loan)
    }

    /// Loans of a customer, oldest first
    #[instrument(skip(self), fields(customer_id = %customer_id))]
    pub async fn list_loans(&self, customer_id: CustomerId) -> Result<Vec<Loan>, LendingError> {
        Ok(self.port.list_loans(customer_id).await?)
    }

    #[instrument(skip(self), fields(loan_id = %loan_id))]
    pub async fn get_loan(&self, loan_id: LoanId) -> Result<Loan, LendingError> {
        self.port
            .get_loan(loan_id)
            .await?
            .ok_or(LendingError::LoanNotFound(loan_id))
    }

    /// Installments of a loan, earliest due first
    ///
    /// An unknown loan has no installments.
    #[instrument(skip(self), fields(loan_id = %loan_id))]
    pub async fn list_installments(&self, loan_id: LoanId) -> Result<Vec<Installment>, LendingError> {
        Ok(self.port.list_installments(loan_id).await?)
    }

    /// Applies a payment to a loan's earliest due installments
    ///
    /// The loan row is locked for the whole pass. When nothing can be paid
    /// and the loan's status is already current, nothing is written.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` for a negative amount, `LoanNotFound`, and
    /// `LoanAlreadyPaid` when no installment is outstanding.
    #[instrument(skip(self), fields(loan_id = %loan_id, amount = %amount))]
    pub async fn pay_loan(&self, loan_id: LoanId, amount: Money) -> Result<PaymentResult, LendingError> {
        if amount.is_negative() {
            let e = LendingError::invalid_amount(format!(
                "Payment amount cannot be negative, got {}",
                amount
            ));
            warn!(error = %e, "Payment rejected");
            return Err(e);
        }

        let mut uow = self.port.begin().await?;
        let mut loan = uow
            .loan_for_update(loan_id)
            .await?
            .ok_or(LendingError::LoanNotFound(loan_id))?;

        if loan.is_paid {
            warn!("Payment rejected, loan already paid");
            return Err(LendingError::LoanAlreadyPaid(loan_id));
        }

        let mut installments = uow.installments_for_loan(loan_id).await?;
        let allocation = allocate_payment(
            &mut installments,
            amount,
            self.clock.today(),
            self.clock.now(),
            self.policy.payment_horizon_months,
        )?;

        let status_changed = loan.refresh_paid_status(&installments);
        if allocation.is_empty() && !status_changed {
            info!("Payment covered no installments");
            return Ok(PaymentResult {
                installments_paid: 0,
                amount_spent: Money::zero(),
                loan_fully_paid: loan.is_paid,
            });
        }

        for installment in installments
            .iter()
            .filter(|i| allocation.settled.contains(&i.id))
        {
            uow.save_installment(installment).await?;
        }
        uow.save_loan(&loan).await?;
        uow.commit().await?;

        info!(
            installments_paid = allocation.installments_paid,
            amount_spent = %allocation.amount_spent,
            loan_fully_paid = loan.is_paid,
            "Payment applied"
        );
        Ok(PaymentResult {
            installments_paid: allocation.installments_paid,
            amount_spent: allocation.amount_spent,
            loan_fully_paid: loan.is_paid,
        })
    }
}
