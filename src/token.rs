use crate::model::SessionClaims;
use chrono::Utc;
use jsonwebtoken::errors::Error as JwtError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::Duration;

/// Signs and verifies stateless HS256 session tokens.
///
/// There is no server-side revocation: a token stays valid until its `exp`.
pub struct TokenVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenVerifier {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Returns the claims of a correctly signed, unexpired token and `None` for
    /// anything else. The rejection reason is only logged.
    pub fn verify(&self, token: &str) -> Option<SessionClaims> {
        if token.is_empty() {
            tracing::debug!("Session token rejected: empty");
            return None;
        }
        match decode::<SessionClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(err) => {
                tracing::debug!("Session token rejected: {:?}", err.kind());
                None
            }
        }
    }

    pub fn issue(&self, user_id: i64, email: &str) -> Result<String, JwtError> {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = SessionClaims {
            user_id,
            email: email.to_string(),
            iat: now,
            exp: now.saturating_add(ttl),
        };
        self.encode(&claims)
    }

    pub fn encode(&self, claims: &SessionClaims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
    }
}
