use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::error::ErrorUnauthorized;
use actix_web::{FromRequest, HttpRequest, web};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

/// Claims carried by the JWT issued by the external auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Stable subject identifier of the user.
    pub sub: String,
    /// Email address, used as the actor identity on mutating operations.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Roles granted to the user.
    pub roles: Vec<String>,
    /// Expiry as a unix timestamp.
    pub exp: usize,
}

/// Returns `true` when `role` is present in `roles`.
pub fn check_role(role: &str, roles: &[String]) -> bool {
    roles.iter().any(|granted| granted == role)
}

/// Server-side secret used to validate incoming tokens.
#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
}

const AUTH_COOKIE: &str = "auth_token";

fn token_from_request(req: &HttpRequest) -> Option<String> {
    if let Some(header) = req.headers().get(actix_web::http::header::AUTHORIZATION) {
        if let Ok(value) = header.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    req.cookie(AUTH_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(config) = req.app_data::<web::Data<AuthConfig>>() else {
            return ready(Err(ErrorUnauthorized("authentication is not configured")));
        };

        let Some(token) = token_from_request(req) else {
            return ready(Err(ErrorUnauthorized("missing credentials")));
        };

        let key = DecodingKey::from_secret(config.secret.as_bytes());
        let result = decode::<AuthenticatedUser>(&token, &key, &Validation::new(Algorithm::HS256));

        ready(
            result
                .map(|data| data.claims)
                .map_err(|_| ErrorUnauthorized("invalid credentials")),
        )
    }
}
