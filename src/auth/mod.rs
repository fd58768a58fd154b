//! Request authentication and the data-access scoping policy.
//!
//! Handlers never inspect roles themselves. They take a [`Caller`] (any
//! verified identity) or an [`Admin`] extractor, and pass [`Caller::scope`]
//! to the query layer, which applies it inside each statement.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{issue_token, verify_token, IdentityClaims};

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::db;
use crate::error::AppError;
use crate::models::Role;
use crate::AppState;

/// Rows a caller may read or modify
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every row, as long as `admin` still holds the admin role
    All { admin: String },
    /// Only rows owned by this identity
    Owner(String),
}

impl Scope {
    /// True when the identity bound as `?1` currently holds the admin role
    pub const ADMIN_PREDICATE: &'static str = "EXISTS (SELECT 1 FROM users \
         WHERE users.email = ?1 AND users.role = 'admin')";

    const OWNER_PREDICATE: &'static str = "subscriptions.email = ?1";

    pub fn for_role(email: &str, role: Role) -> Self {
        match role {
            Role::Admin => Scope::All {
                admin: email.to_string(),
            },
            Role::User => Scope::Owner(email.to_string()),
        }
    }

    /// SQL condition over `subscriptions`; expects [`Scope::principal`] bound as `?1`
    pub fn predicate(&self) -> &'static str {
        match self {
            Scope::All { .. } => Self::ADMIN_PREDICATE,
            Scope::Owner(_) => Self::OWNER_PREDICATE,
        }
    }

    /// Identity the predicate is evaluated against
    pub fn principal(&self) -> &str {
        match self {
            Scope::All { admin } => admin,
            Scope::Owner(email) => email,
        }
    }

    /// Whether rows owned by `owner` fall inside this scope
    pub fn covers_owner(&self, owner: &str) -> bool {
        match self {
            Scope::All { .. } => true,
            Scope::Owner(email) => email == owner,
        }
    }
}

/// A request whose bearer token was verified and whose role was looked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub email: String,
    pub role: Role,
}

impl Caller {
    pub fn scope(&self) -> Scope {
        Scope::for_role(&self.email, self.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// A [`Caller`] holding the admin role; rejects everyone else with 403
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admin(pub Caller);

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            tracing::warn!("Request without bearer token: {}", parts.uri.path());
            AppError::Unauthenticated
        })?;

        let claims = verify_token(&state.config, token).ok_or_else(|| {
            tracing::warn!("Rejected invalid or expired token on {}", parts.uri.path());
            AppError::Unauthenticated
        })?;

        let role = db::users::find_role(&state.pool, &claims.email)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Token for unknown identity: {}", claims.email);
                AppError::Unauthenticated
            })?;

        Ok(Caller {
            email: claims.email,
            role,
        })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Admin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let caller = Caller::from_request_parts(parts, state).await?;

        if !caller.is_admin() {
            tracing::warn!(
                "Non-admin {} denied access to {}",
                caller.email,
                parts.uri.path()
            );
            return Err(AppError::Forbidden);
        }

        Ok(Admin(caller))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_scope_for_role_is_exhaustive() {
        assert_eq!(
            Scope::for_role("a@example.com", Role::Admin),
            Scope::All {
                admin: "a@example.com".to_string()
            }
        );
        assert_eq!(
            Scope::for_role("u@example.com", Role::User),
            Scope::Owner("u@example.com".to_string())
        );
    }

    #[test]
    fn test_scope_covers_owner() {
        let owner = Scope::Owner("u@example.com".to_string());
        assert!(owner.covers_owner("u@example.com"));
        assert!(!owner.covers_owner("v@example.com"));

        let all = Scope::All {
            admin: "a@example.com".to_string(),
        };
        assert!(all.covers_owner("v@example.com"));
        assert_eq!(all.principal(), "a@example.com");
    }

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer   xyz"));
        assert_eq!(bearer_token(&headers), Some("xyz"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer"));
        assert_eq!(bearer_token(&headers), None);
    }
}
