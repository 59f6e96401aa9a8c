use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Claims issued by the hosted auth provider. `sub` is the user's id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| Error::Unauthorized("Token subject is not a user id".into()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    MissingAuthorization,
    BadAuthorization,
    UnsupportedScheme,
    InvalidToken,
}

impl AuthFailure {
    pub fn code(&self) -> &'static str {
        match self {
            AuthFailure::MissingAuthorization => "missing_authorization",
            AuthFailure::BadAuthorization => "bad_authorization",
            AuthFailure::UnsupportedScheme => "unsupported_scheme",
            AuthFailure::InvalidToken => "invalid_token",
        }
    }
}

pub fn decode_token(token: &str, secret: &str) -> std::result::Result<Claims, AuthFailure> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    // hosted auth stamps an audience we do not pin
    validation.validate_aud = false;
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|_| AuthFailure::InvalidToken)
}

pub fn claims_from_headers(
    headers: &HeaderMap,
    secret: &str,
) -> std::result::Result<Claims, AuthFailure> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(AuthFailure::MissingAuthorization)?;
    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthFailure::BadAuthorization)?;
    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or(AuthFailure::UnsupportedScheme)?;
    decode_token(token.trim(), secret)
}

/// Claims for callers that may or may not be signed in.
pub fn optional_claims(headers: &HeaderMap) -> Option<Claims> {
    let config = crate::config::get_config();
    claims_from_headers(headers, &config.jwt_secret).ok()
}

pub async fn require_bearer_auth(mut req: Request, next: Next) -> Response {
    let config = crate::config::get_config();
    match claims_from_headers(req.headers(), &config.jwt_secret) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(failure) => {
            tracing::debug!(reason = failure.code(), "rejected unauthenticated request");
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": failure.code() })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test_secret_key";

    fn token_for(sub: &str, exp_offset: i64) -> String {
        let exp = (chrono::Utc::now().timestamp() + exp_offset) as usize;
        let claims = json!({ "sub": sub, "exp": exp, "aud": "authenticated", "role": "authenticated" });
        encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_str(value).unwrap(),
        );
        headers
    }

    #[test]
    fn accepts_valid_bearer_token_with_audience() {
        let user = Uuid::new_v4();
        let headers = headers_with(&format!("Bearer {}", token_for(&user.to_string(), 3600)));
        let claims = claims_from_headers(&headers, SECRET).unwrap();
        assert_eq!(claims.user_id().unwrap(), user);
    }

    #[test]
    fn classifies_failures() {
        assert_eq!(
            claims_from_headers(&HeaderMap::new(), SECRET).unwrap_err(),
            AuthFailure::MissingAuthorization
        );
        assert_eq!(
            claims_from_headers(&headers_with("Basic abc"), SECRET).unwrap_err(),
            AuthFailure::UnsupportedScheme
        );
        assert_eq!(
            claims_from_headers(&headers_with("Bearer not-a-jwt"), SECRET).unwrap_err(),
            AuthFailure::InvalidToken
        );
    }

    #[test]
    fn rejects_expired_and_foreign_tokens() {
        let sub = Uuid::new_v4().to_string();
        let expired = headers_with(&format!("Bearer {}", token_for(&sub, -3600)));
        assert_eq!(
            claims_from_headers(&expired, SECRET).unwrap_err(),
            AuthFailure::InvalidToken
        );
        let fresh = headers_with(&format!("Bearer {}", token_for(&sub, 3600)));
        assert!(claims_from_headers(&fresh, "another-secret").is_err());
    }

    #[test]
    fn non_uuid_subject_is_unauthorized() {
        let claims = Claims {
            sub: "service-account".into(),
            exp: 0,
            role: None,
            email: None,
        };
        assert!(matches!(claims.user_id(), Err(Error::Unauthorized(_))));
    }
}
