use chrono::{DateTime, Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use jwt::{Claims, Header, RegisteredClaims, SignWithKey, Token, VerifyWithKey};
use sha2::Sha256;

use crate::config::Config;
use crate::error::{AppError, Result};

/// Verified contents of an identity token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaims {
    pub email: String,
    pub issued_at: DateTime<Utc>,
    pub expiration: DateTime<Utc>,
}

fn signing_key(secret: &str) -> Result<Hmac<Sha256>> {
    Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Token(e.to_string()))
}

/// Sign a short-lived HS256 identity token for `email`
pub fn issue_token(config: &Config, email: &str) -> Result<String> {
    issue_token_at(config, email, Utc::now())
}

pub(crate) fn issue_token_at(config: &Config, email: &str, now: DateTime<Utc>) -> Result<String> {
    let key = signing_key(&config.access_token_secret)?;
    let expiration = now + Duration::seconds(config.access_token_ttl_secs);

    let claims = Claims::new(RegisteredClaims {
        issuer: Some(config.token_issuer.clone()),
        subject: Some(email.to_string()),
        issued_at: Some(now.timestamp() as u64),
        expiration: Some(expiration.timestamp() as u64),
        ..Default::default()
    });

    claims
        .sign_with_key(&key)
        .map_err(|e| AppError::Token(e.to_string()))
}

/// Check signature, issuer and lifetime. Any failure yields `None`.
pub fn verify_token(config: &Config, token: &str) -> Option<IdentityClaims> {
    let key = signing_key(&config.access_token_secret).ok()?;
    let token: Token<Header, Claims, _> = token.verify_with_key(&key).ok()?;

    let claims = token.claims();

    if claims.registered.issuer.as_ref() != Some(&config.token_issuer) {
        return None;
    }

    let now = Utc::now();

    let iat = Utc
        .timestamp_opt(claims.registered.issued_at? as i64, 0)
        .single()?;
    if iat > now {
        return None;
    }

    let exp = Utc
        .timestamp_opt(claims.registered.expiration? as i64, 0)
        .single()?;
    if exp <= now {
        return None;
    }

    let email = claims.registered.subject.clone()?;

    Some(IdentityClaims {
        email,
        issued_at: iat,
        expiration: exp,
    })
}
