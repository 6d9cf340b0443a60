use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use rocket_okapi::request::OpenApiFromRequest;
use serde::{Deserialize, Serialize};

use crate::models::user::Role;
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // customer id, admin id or airline IATA code
    pub role: Role,
    pub exp: usize,
}

/// Signing secret plus token lifetime, managed as Rocket state.
#[derive(Clone)]
pub struct JwtKeys {
    secret: String,
    ttl_hours: i64,
}

impl JwtKeys {
    pub fn new(secret: impl Into<String>, ttl_hours: i64) -> Self {
        JwtKeys {
            secret: secret.into(),
            ttl_hours,
        }
    }

    pub fn generate_token(&self, principal: &str, role: Role) -> AppResult<String> {
        let expiration = chrono::Utc::now()
            .checked_add_signed(chrono::Duration::hours(self.ttl_hours))
            .ok_or_else(|| AppError::AuthError("token expiry out of range".into()))?
            .timestamp() as usize;

        let claims = Claims {
            sub: principal.to_string(),
            role,
            exp: expiration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::AuthError(e.to_string()))
    }

    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| AppError::AuthError(e.to_string()))
    }
}

#[derive(Debug, OpenApiFromRequest)]
pub struct AuthenticatedUser {
    pub principal: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn customer_id(&self) -> AppResult<i64> {
        if self.role != Role::Customer {
            return Err(AppError::Forbidden("Customer account required".into()));
        }
        self.principal
            .parse()
            .map_err(|_| AppError::AuthError("Malformed customer token".into()))
    }

    pub fn airline_code(&self) -> AppResult<&str> {
        if self.role != Role::Airline {
            return Err(AppError::Forbidden("Airline account required".into()));
        }
        Ok(&self.principal)
    }

    pub fn require_admin(&self) -> AppResult<()> {
        if self.role != Role::Administrator {
            return Err(AppError::Forbidden("Administrator account required".into()));
        }
        Ok(())
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let token = match request.headers().get_one("Authorization") {
            Some(token) if token.starts_with("Bearer ") => token[7..].to_string(),
            _ => return Outcome::Error((Status::Unauthorized, ())),
        };

        let keys = match request.rocket().state::<JwtKeys>() {
            Some(keys) => keys,
            None => return Outcome::Error((Status::InternalServerError, ())),
        };

        match keys.verify_token(&token) {
            Ok(claims) => Outcome::Success(AuthenticatedUser {
                principal: claims.sub,
                role: claims.role,
            }),
            Err(_) => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip_keeps_role_and_principal() {
        let keys = JwtKeys::new("test-secret", 1);
        let token = keys.generate_token("AA", Role::Airline).unwrap();
        let claims = keys.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "AA");
        assert_eq!(claims.role, Role::Airline);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = JwtKeys::new("one", 1).generate_token("1", Role::Customer).unwrap();
        assert!(JwtKeys::new("two", 1).verify_token(&token).is_err());
    }

    #[test]
    fn role_guards() {
        let user = AuthenticatedUser {
            principal: "7".to_string(),
            role: Role::Customer,
        };
        assert_eq!(user.customer_id().unwrap(), 7);
        assert!(matches!(user.airline_code(), Err(AppError::Forbidden(_))));
        assert!(matches!(user.require_admin(), Err(AppError::Forbidden(_))));
    }
}
