use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::claims::TokenIdentity;
use super::errors::TokenError;
use super::key::SigningKey;

/// Issues and verifies signed, time-bounded tokens.
///
/// The algorithm is pinned to HS256: the `alg` header of an incoming token
/// is only compared against it, never used to pick a verifier. Tokens are
/// not stored anywhere, so validity depends only on the signature and `exp`.
pub struct TokenService {
    key: SigningKey,
    ttl: Duration,
    validation: Validation,
}

impl TokenService {
    pub const ALGORITHM: Algorithm = Algorithm::HS256;

    /// Default validity window of an issued token.
    pub const DEFAULT_TTL_MINUTES: i64 = 24;

    /// Create a token service with the default 24 minute TTL.
    pub fn new(key: SigningKey) -> Self {
        Self::with_ttl(key, Duration::minutes(Self::DEFAULT_TTL_MINUTES))
    }

    /// Create a token service with a custom TTL.
    ///
    /// # Arguments
    /// * `key` - Process signing key
    /// * `ttl` - Validity window applied to every issued token
    pub fn with_ttl(key: SigningKey, ttl: Duration) -> Self {
        let mut validation = Validation::new(Self::ALGORITHM);
        // Expiry is checked against the caller's clock in `verify`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            key,
            ttl,
            validation,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `identity` valid from `now` until `now + ttl`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Claims could not be serialized or signed
    pub fn issue<I>(&self, identity: &I, now: DateTime<Utc>) -> Result<String, TokenError>
    where
        I: TokenIdentity + ?Sized,
    {
        let claims = Claims::for_identity(identity, now, self.ttl);

        encode(
            &Header::new(Self::ALGORITHM),
            &claims,
            self.key.encoding_key(),
        )
        .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Issue a token starting at the current time.
    pub fn issue_now<I>(&self, identity: &I) -> Result<String, TokenError>
    where
        I: TokenIdentity + ?Sized,
    {
        self.issue(identity, Utc::now())
    }

    /// Verify signature and expiry, then return the claims.
    ///
    /// # Arguments
    /// * `token` - Compact token string
    /// * `now` - Instant the expiry is checked against
    ///
    /// # Errors
    /// * `Invalid` - Malformed, wrong signature, other algorithm, missing claims
    /// * `Expired` - `now` is at or past `exp`
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        if token.is_empty() {
            return Err(TokenError::Invalid("empty token".to_string()));
        }

        let claims = decode::<Claims>(token, self.key.decoding_key(), &self.validation)
            .map_err(|e| TokenError::Invalid(e.to_string()))?
            .claims;

        if claims.is_expired(now.timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Verify a token against the current time.
    pub fn verify_now(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, Utc::now())
    }

    /// Verify a token and read a single value out of its claims.
    ///
    /// Claims are only handed to `selector` after `verify` succeeded.
    pub fn extract_claim<T, F>(
        &self,
        token: &str,
        now: DateTime<Utc>,
        selector: F,
    ) -> Result<T, TokenError>
    where
        F: FnOnce(&Claims) -> T,
    {
        self.verify(token, now).map(|claims| selector(&claims))
    }

    /// Verified `sub` claim of a token.
    pub fn subject(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        self.extract_claim(token, now, |claims| claims.sub.clone())
    }
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use chrono::TimeZone;
    use jsonwebtoken::EncodingKey;

    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    struct TestIdentity {
        username: String,
        id: String,
    }

    impl TokenIdentity for TestIdentity {
        fn subject(&self) -> &str {
            &self.username
        }

        fn identifier(&self) -> String {
            self.id.clone()
        }
    }

    fn alice() -> TestIdentity {
        TestIdentity {
            username: "alice".to_string(),
            id: "0b7e7c64-93a4-4c63-8d3c-7f0f5b3e1a2d".to_string(),
        }
    }

    fn service() -> TokenService {
        TokenService::new(SigningKey::from_bytes(SECRET).unwrap())
    }

    fn t0() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    /// Replace the character at `index` with a different base64url character.
    fn tamper(token: &str, index: usize) -> String {
        let mut bytes = token.as_bytes().to_vec();
        bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let service = service();

        let token = service.issue(&alice(), t0()).expect("Failed to issue token");
        assert_eq!(token.split('.').count(), 3);

        let claims = service
            .verify(&token, t0() + Duration::minutes(1))
            .expect("Failed to verify token");
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.user_id, "0b7e7c64-93a4-4c63-8d3c-7f0f5b3e1a2d");
        assert_eq!(claims.iat, t0().timestamp());
        assert_eq!(claims.exp, t0().timestamp() + 24 * 60);
        assert!(claims.extra.is_empty());
    }

    #[test]
    fn test_header_pins_hs256() {
        let token = service().issue(&alice(), t0()).unwrap();
        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS256);
    }

    #[test]
    fn test_valid_until_just_before_expiry() {
        let service = service();
        let token = service.issue(&alice(), t0()).unwrap();

        for offset in [0, 1, 60, 24 * 60 - 1] {
            let now = t0() + Duration::seconds(offset);
            assert!(service.verify(&token, now).is_ok(), "offset {}", offset);
        }
    }

    #[test]
    fn test_expired_at_and_after_ttl() {
        let service = service();
        let token = service.issue(&alice(), t0()).unwrap();

        for offset in [24 * 60, 24 * 60 + 1, 24 * 60 * 60] {
            let now = t0() + Duration::seconds(offset);
            assert_eq!(
                service.verify(&token, now),
                Err(TokenError::Expired),
                "offset {}",
                offset
            );
        }
    }

    #[test]
    fn test_custom_ttl() {
        let service =
            TokenService::with_ttl(SigningKey::from_bytes(SECRET).unwrap(), Duration::hours(2));
        let token = service.issue(&alice(), t0()).unwrap();

        assert!(service.verify(&token, t0() + Duration::minutes(90)).is_ok());
        assert_eq!(
            service.verify(&token, t0() + Duration::hours(2)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_tampering_any_payload_or_signature_byte_invalidates() {
        let service = service();
        let token = service.issue(&alice(), t0()).unwrap();
        let payload_start = token.find('.').unwrap() + 1;

        for index in payload_start..token.len() {
            if token.as_bytes()[index] == b'.' {
                continue;
            }
            let tampered = tamper(&token, index);
            assert!(
                matches!(service.verify(&tampered, t0()), Err(TokenError::Invalid(_))),
                "tampered position {} was accepted",
                index
            );
        }
    }

    #[test]
    fn test_tampering_header_invalidates() {
        let service = service();
        let token = service.issue(&alice(), t0()).unwrap();

        let tampered = tamper(&token, 3);
        assert!(matches!(
            service.verify(&tampered, t0()),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let issuer = service();
        let verifier = TokenService::new(
            SigningKey::from_bytes(b"another_secret_key_at_least_32_bytes").unwrap(),
        );

        let token = issuer.issue(&alice(), t0()).unwrap();
        assert!(matches!(
            verifier.verify(&token, t0()),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_malformed_tokens_are_invalid() {
        let service = service();

        for token in ["", "garbage", "invalid.token.here", "a.b", "a.b.c.d", "..."] {
            assert!(
                matches!(service.verify(token, t0()), Err(TokenError::Invalid(_))),
                "token {:?} was accepted",
                token
            );
        }
    }

    #[test]
    fn test_other_algorithm_is_invalid() {
        let claims = Claims::for_identity(&alice(), t0(), Duration::minutes(24));
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(matches!(
            service().verify(&token, t0()),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_unsigned_none_algorithm_is_invalid() {
        let claims = Claims::for_identity(&alice(), t0(), Duration::minutes(24));
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());

        for token in [
            format!("{}.{}.", header, payload),
            format!("{}.{}", header, payload),
        ] {
            assert!(matches!(
                service().verify(&token, t0()),
                Err(TokenError::Invalid(_))
            ));
        }
    }

    #[test]
    fn test_missing_exp_is_invalid() {
        let token = encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "sub": "alice", "userId": "1", "iat": 1 }),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(matches!(
            service().verify(&token, t0()),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_extract_claim() {
        let service = service();
        let token = service.issue(&alice(), t0()).unwrap();

        let exp = service
            .extract_claim(&token, t0(), |claims| claims.exp)
            .unwrap();
        assert_eq!(exp, t0().timestamp() + 24 * 60);

        assert_eq!(service.subject(&token, t0()).unwrap(), "alice");
    }

    #[test]
    fn test_extract_claim_rejects_unverified_token() {
        let service = service();
        let token = service.issue(&alice(), t0()).unwrap();
        let tampered = tamper(&token, token.len() - 2);

        let mut called = false;
        let result = service.extract_claim(&tampered, t0(), |claims| {
            called = true;
            claims.sub.clone()
        });

        assert!(result.is_err());
        assert!(!called);
    }
}
