//! Everything related to authentication.
//!

use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Represents the different authentication mechanisms available for accessing the API.
///
/// # Variants
///
/// * **Anon**
///   No authentication, the API works with reduced limits.
///
/// * **Client**
///   OAuth2 client credentials, exchanged for a bearer token.
///
/// # Example Usage:
///
/// ```rust
/// use airwatch_sources::Auth;
///
/// let auth = Auth::Client {
///     client_id: "me-api-client".to_string(),
///     client_secret: "s3cr3t".to_string(),
/// };
///
/// assert!(auth.to_string().contains("HIDDEN"));
/// ```
///
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Auth {
    /// Nothing special, no auth
    #[default]
    Anon,
    /// Using an OAuth2 client id/secret pair to get a token
    Client {
        client_id: String,
        client_secret: String,
    },
}

impl Auth {
    /// Build from optional parts, both are needed.
    ///
    pub fn from_parts(client_id: Option<String>, client_secret: Option<String>) -> Self {
        match (client_id, client_secret) {
            (Some(client_id), Some(client_secret))
                if !client_id.is_empty() && !client_secret.is_empty() =>
            {
                Auth::Client {
                    client_id,
                    client_secret,
                }
            }
            _ => Auth::Anon,
        }
    }
}

impl Display for Auth {
    /// Secrets are never displayed.
    ///
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // Hide secrets
        //
        let auth = match self.clone() {
            Auth::Client { client_id, .. } => Auth::Client {
                client_id,
                client_secret: "HIDDEN".to_string(),
            },
            _ => Auth::Anon,
        };
        write!(f, "{:?}", auth)
    }
}
