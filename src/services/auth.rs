// src/services/auth.rs
//
// Os tokens de admin são emitidos pelo provedor de identidade externo;
// aqui só validamos assinatura e expiração.

use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::{common::error::AppError, models::auth::AdminClaims};

#[derive(Clone)]
pub struct AuthService {
    jwt_secret: String,
}

impl AuthService {
    pub fn new(jwt_secret: String) -> Self {
        Self { jwt_secret }
    }

    pub fn validate_token(&self, token: &str) -> Result<AdminClaims, AppError> {
        let validation = Validation::default();
        let token_data = decode::<AdminClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token(secret: &str, exp_offset: Duration) -> String {
        let claims = AdminClaims {
            sub: "admin-1".to_string(),
            email: "admin@sanaa.dz".to_string(),
            exp: (Utc::now() + exp_offset).timestamp() as usize,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_ref())).unwrap()
    }

    #[test]
    fn test_valid_token_yields_claims() {
        let auth = AuthService::new("segredo".to_string());

        let claims = auth.validate_token(&token("segredo", Duration::hours(1))).unwrap();

        assert_eq!(claims.email, "admin@sanaa.dz");
        assert_eq!(claims.actor(), "admin@sanaa.dz");
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let auth = AuthService::new("segredo".to_string());

        let result = auth.validate_token(&token("outro", Duration::hours(1)));

        assert!(matches!(result, Err(AppError::JwtError(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let auth = AuthService::new("segredo".to_string());

        let result = auth.validate_token(&token("segredo", Duration::hours(-2)));

        assert!(matches!(result, Err(AppError::JwtError(_))));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let auth = AuthService::new("segredo".to_string());
        assert!(matches!(auth.validate_token("abc.def"), Err(AppError::JwtError(_))));
    }
}
