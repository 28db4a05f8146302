use std::collections::HashMap;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Anything a token can be issued for.
pub trait TokenIdentity {
    /// Value of the `sub` claim (the username).
    fn subject(&self) -> &str;

    /// Value of the `userId` claim (the credential identifier).
    fn identifier(&self) -> String;
}

/// Token payload.
///
/// `sub`, `userId`, `iat` and `exp` are always present; `extra` is flattened
/// into the payload and is empty for tokens issued by this crate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// Credential identifier
    #[serde(rename = "userId")]
    pub user_id: String,

    /// Issued at (Unix timestamp, seconds)
    pub iat: i64,

    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,

    /// Additional custom fields (flattened into token)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Create claims for an identity, valid for `ttl` from `issued_at`.
    ///
    /// # Arguments
    /// * `identity` - Identity named by the token
    /// * `issued_at` - Issue instant (truncated to whole seconds)
    /// * `ttl` - Validity window
    ///
    /// # Returns
    /// Claims with sub, userId, iat and exp set
    pub fn for_identity<I>(identity: &I, issued_at: DateTime<Utc>, ttl: Duration) -> Self
    where
        I: TokenIdentity + ?Sized,
    {
        let iat = issued_at.timestamp();

        Self {
            sub: identity.subject().to_string(),
            user_id: identity.identifier(),
            iat,
            exp: iat + ttl.num_seconds(),
            extra: HashMap::new(),
        }
    }

    /// Add a custom field.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key.to_string(), json_value);
        }
        self
    }

    /// Check if the token is expired at `current_timestamp`.
    ///
    /// A token is valid strictly before `exp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    struct Alice;

    impl TokenIdentity for Alice {
        fn subject(&self) -> &str {
            "alice"
        }

        fn identifier(&self) -> String {
            "7f8f1f4e-3c0e-4f7e-9a53-6a1d2b1c9d10".to_string()
        }
    }

    #[test]
    fn test_for_identity() {
        let issued_at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let claims = Claims::for_identity(&Alice, issued_at, Duration::minutes(24));

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.user_id, "7f8f1f4e-3c0e-4f7e-9a53-6a1d2b1c9d10");
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp - claims.iat, 24 * 60);
        assert!(claims.extra.is_empty());
    }

    #[test]
    fn test_serialized_field_names() {
        let issued_at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let claims = Claims::for_identity(&Alice, issued_at, Duration::minutes(24))
            .with_extra("tenant", "acme");

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["sub"], "alice");
        assert_eq!(json["userId"], "7f8f1f4e-3c0e-4f7e-9a53-6a1d2b1c9d10");
        assert_eq!(json["iat"], 1_700_000_000);
        assert_eq!(json["exp"], 1_700_001_440);
        assert_eq!(json["tenant"], "acme");
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims::for_identity(
            &Alice,
            Utc.timestamp_opt(1000, 0).unwrap(),
            Duration::seconds(60),
        );

        assert!(!claims.is_expired(1059));
        assert!(claims.is_expired(1060)); // Exactly at expiration
        assert!(claims.is_expired(1061));
    }
}
