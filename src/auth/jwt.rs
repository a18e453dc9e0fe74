use crate::models::Claims;
use jsonwebtoken::{DecodingKey, Validation, decode};

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    pub const SECRET: &str = "test-secret";

    /// Mint a token the way the account service would.
    pub fn token_for(user_id: u64, role: u8, employee_id: Option<u64>) -> String {
        let claims = Claims {
            user_id,
            sub: format!("user{}", user_id),
            role,
            exp: 4_102_444_800, // 2100-01-01
            employee_id,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn minted_tokens_verify() {
        let claims = verify_token(&token_for(5, 3, Some(1001)), SECRET).unwrap();
        assert_eq!(claims.user_id, 5);
        assert_eq!(claims.employee_id, Some(1001));
        assert!(verify_token(&token_for(5, 3, None), "other").is_err());
    }
}
