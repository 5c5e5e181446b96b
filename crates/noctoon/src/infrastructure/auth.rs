use anyhow::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::entities::user::User;

/// Tokens stay valid for 31 days.
pub const TOKEN_LIFETIME_DAYS: i64 = 31;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub is_admin: bool,
    pub exp: usize,
}

impl Claims {
    pub fn for_user(user: &User) -> Self {
        let exp = (chrono::Utc::now() + chrono::Duration::days(TOKEN_LIFETIME_DAYS)).timestamp();
        Self {
            sub: user.id,
            username: user.username.clone(),
            is_admin: user.is_admin(),
            exp: exp as usize,
        }
    }
}

pub fn decode_jwt(secret: &str, token: &str) -> Result<Claims> {
    Ok(jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?
    .claims)
}

pub fn encode_jwt(secret: &str, claims: &Claims) -> Result<String> {
    Ok(jsonwebtoken::encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::domain::entities::user::Role;

    #[test]
    fn test_token_roundtrip_keeps_identity() {
        let user = User {
            id: 7,
            username: "reader".to_string(),
            role: Role::Admin,
            ..Default::default()
        };

        let token = encode_jwt("secret", &Claims::for_user(&user)).unwrap();
        let claims = decode_jwt("secret", &token).unwrap();

        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "reader");
        assert!(claims.is_admin);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = encode_jwt("secret", &Claims::for_user(&User::default())).unwrap();

        assert!(decode_jwt("another", &token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let claims = Claims {
            sub: 1,
            username: "reader".to_string(),
            is_admin: false,
            exp: (chrono::Utc::now() - chrono::Duration::days(1)).timestamp() as usize,
        };
        let token = encode_jwt("secret", &claims).unwrap();

        assert!(decode_jwt("secret", &token).is_err());
    }
}
