//! Authentication and authorization
//!
//! Callers present a JWT whose claims carry their roles and, for customer
//! callers, the customer they act as. Handlers use the helpers here to
//! decide which customer's data a request may touch.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use core_kernel::CustomerId;

/// Role names carried in tokens
pub mod roles {
    /// Back-office staff, may act on any customer
    pub const ADMIN: &str = "admin";
    /// A borrower, limited to their own loans
    pub const CUSTOMER: &str = "customer";
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User's roles
    pub roles: Vec<String>,
    /// Customer the caller acts as, for customer-role tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == roles::ADMIN)
    }

    /// The caller's own customer id, if the token is a customer token
    pub fn own_customer_id(&self) -> Result<CustomerId, AuthError> {
        if !has_role(self, roles::CUSTOMER) {
            return Err(AuthError::MissingPermission(roles::CUSTOMER.to_string()));
        }
        self.customer_id.ok_or(AuthError::MissingCustomerBinding)
    }
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Missing permission: {0}")]
    MissingPermission(String),
    #[error("Token is not bound to a customer")]
    MissingCustomerBinding,
    #[error("Access to customer {0} denied")]
    CustomerAccessDenied(CustomerId),
}

/// Creates a new JWT token
///
/// # Arguments
///
/// * `user_id` - User identifier
/// * `roles` - User's roles
/// * `customer_id` - Customer the user acts as, if any
/// * `secret` - JWT secret key
/// * `expiration_secs` - Token validity in seconds
pub fn create_token(
    user_id: &str,
    roles: Vec<String>,
    customer_id: Option<CustomerId>,
    secret: &str,
    expiration_secs: u64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = i64::try_from(expiration_secs)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|validity| now.checked_add_signed(validity))
        .ok_or(AuthError::InvalidToken)?;

    let claims = Claims {
        sub: user_id.to_string(),
        roles,
        customer_id,
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Validates a JWT token
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

/// Checks if user has required role
pub fn has_role(claims: &Claims, required_role: &str) -> bool {
    claims.roles.iter().any(|r| r == required_role || r == roles::ADMIN)
}

/// Requires the caller to hold `role`
pub fn require_role(claims: &Claims, role: &str) -> Result<(), AuthError> {
    if has_role(claims, role) {
        Ok(())
    } else {
        Err(AuthError::MissingPermission(role.to_string()))
    }
}

/// Allows admins, or the customer identified by `owner`
pub fn authorize_customer(claims: &Claims, owner: CustomerId) -> Result<(), AuthError> {
    if claims.is_admin() {
        return Ok(());
    }
    if claims.own_customer_id()? == owner {
        Ok(())
    } else {
        Err(AuthError::CustomerAccessDenied(owner))
    }
}

/// Decides which customer's loans a listing covers
///
/// Customer callers always see their own loans, whatever they asked for.
/// Admins must name the customer. Returns `Ok(None)` for an admin who did
/// not name one.
pub fn resolve_customer_scope(
    claims: &Claims,
    requested: Option<CustomerId>,
) -> Result<Option<CustomerId>, AuthError> {
    if claims.is_admin() {
        Ok(requested)
    } else {
        claims.own_customer_id().map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    fn claims(roles: &[&str], customer_id: Option<CustomerId>) -> Claims {
        Claims {
            sub: "user".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            customer_id,
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn test_token_round_trip_keeps_customer_binding() {
        let customer_id = CustomerId::new();
        let token = create_token("alice", vec![roles::CUSTOMER.to_string()], Some(customer_id), SECRET, 60).unwrap();

        let decoded = validate_token(&token, SECRET).unwrap();
        assert_eq!(decoded.sub, "alice");
        assert_eq!(decoded.customer_id, Some(customer_id));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_token("alice", vec![], None, SECRET, 60).unwrap();
        assert!(matches!(validate_token(&token, "other"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_customer_scope_overrides_request() {
        let own = CustomerId::new();
        let caller = claims(&[roles::CUSTOMER], Some(own));

        let scope = resolve_customer_scope(&caller, Some(CustomerId::new())).unwrap();
        assert_eq!(scope, Some(own));
    }

    #[test]
    fn test_admin_scope_follows_request() {
        let admin = claims(&[roles::ADMIN], None);
        let requested = CustomerId::new();

        assert_eq!(resolve_customer_scope(&admin, Some(requested)).unwrap(), Some(requested));
        assert_eq!(resolve_customer_scope(&admin, None).unwrap(), None);
    }

    #[test]
    fn test_customer_access() {
        let own = CustomerId::new();
        let caller = claims(&[roles::CUSTOMER], Some(own));

        assert!(authorize_customer(&caller, own).is_ok());
        assert!(matches!(
            authorize_customer(&caller, CustomerId::new()),
            Err(AuthError::CustomerAccessDenied(_))
        ));
        assert!(authorize_customer(&claims(&[roles::ADMIN], None), own).is_ok());
    }

    #[test]
    fn test_roleless_token_has_no_scope() {
        let caller = claims(&[], None);
        assert!(matches!(
            resolve_customer_scope(&caller, None),
            Err(AuthError::MissingPermission(_))
        ));
        assert!(require_role(&caller, roles::ADMIN).is_err());
    }
}
