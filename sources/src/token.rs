//! Access token as returned by the OpenSky identity provider.
//!
//! Tokens only live in memory for the duration of a run, they are never stored.
//!

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Safety margin before the announced expiration
const MARGIN: i64 = 30;

/// A trait representing an entity that holds a key and can expire.
///
pub trait Expirable {
    fn key(&self) -> String;
    fn is_expired(&self) -> bool;
}

/// OAuth2 token response, we ignore the fields we do not use.
///
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct OpenskyToken {
    /// The actual token
    pub access_token: String,
    /// Lifetime in seconds
    pub expires_in: i64,
    /// Should be "Bearer"
    #[serde(default)]
    pub token_type: String,
    /// Local time of reception
    #[serde(skip, default = "chrono::Utc::now")]
    pub obtained_at: DateTime<Utc>,
}

impl OpenskyToken {
    #[tracing::instrument(skip(json))]
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.obtained_at + Duration::seconds(self.expires_in - MARGIN)
    }
}

impl Expirable for OpenskyToken {
    #[inline]
    fn key(&self) -> String {
        self.access_token.clone()
    }

    #[inline]
    fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_json() {
        let json = r##"{"access_token":"eyJhbGciOi","expires_in":1800,"refresh_expires_in":0,"token_type":"Bearer","not-before-policy":0,"scope":"email profile"}"##;
        let tok = OpenskyToken::from_json(json).unwrap();
        assert_eq!("eyJhbGciOi", tok.key());
        assert_eq!("Bearer", tok.token_type);
        assert!(!tok.is_expired());
    }

    #[test]
    fn test_token_expired() {
        let json = r##"{"access_token":"abc","expires_in":10}"##;
        let tok = OpenskyToken::from_json(json).unwrap();
        assert!(tok.is_expired());
    }

    #[test]
    fn test_token_bad_json() {
        assert!(OpenskyToken::from_json(r##"{"error":"invalid_client"}"##).is_err());
    }
}
