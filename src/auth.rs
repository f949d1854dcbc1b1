use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Claims carried by bearer tokens. Tokens are issued elsewhere; this
/// service only verifies them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub email: Option<String>,
}

/// HS256 bearer token verifier
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str, issuer: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| ApiError::Unauthorized(format!("Invalid token: {}", e)))
    }
}

/// Extractor for the caller identity from `Authorization: Bearer <token>`
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, ApiError> {
    let verifier = req
        .app_data::<web::Data<JwtVerifier>>()
        .ok_or_else(|| ApiError::Unauthorized("Authentication is not configured".to_string()))?;

    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Expected a Bearer token".to_string()))?;

    let claims = verifier.verify(token)?;
    if claims.sub.is_empty() {
        return Err(ApiError::Unauthorized("Token has no subject".to_string()));
    }

    Ok(AuthenticatedUser { user_id: claims.sub })
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = authenticate(req);
        if let Err(e) = &result {
            tracing::debug!("Authentication failed on {}: {}", req.path(), e);
        }
        ready(result)
    }
}
