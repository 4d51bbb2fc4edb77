//! Description of the site we talk to.
//!

use serde::{Deserialize, Serialize};

/// Identity provider endpoint for the client credentials flow
pub const DEF_TOKEN_URL: &str =
    "https://auth.opensky-network.org/auth/realms/opensky-network/protocol/openid-connect/token";
/// REST API base
pub const DEF_BASE_URL: &str = "https://opensky-network.org/api";
/// Route for all state vectors
pub const STATES_ROUTE: &str = "/states/all";

fn def_token_url() -> String {
    DEF_TOKEN_URL.to_string()
}

fn def_base_url() -> String {
    DEF_BASE_URL.to_string()
}

/// `opensky` block of the configuration file, every field has a default.
///
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Site {
    /// Where to get tokens from
    #[serde(default = "def_token_url")]
    pub token_url: String,
    /// API base URL, routes are appended
    #[serde(default = "def_base_url")]
    pub base_url: String,
    /// OAuth2 client id
    #[serde(default)]
    pub client_id: Option<String>,
    /// OAuth2 client secret
    #[serde(default)]
    pub client_secret: Option<String>,
}

impl Default for Site {
    fn default() -> Self {
        Site {
            token_url: def_token_url(),
            base_url: def_base_url(),
            client_id: None,
            client_secret: None,
        }
    }
}

impl Site {
    /// Full URL for the given route
    ///
    pub fn route(&self, route: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_route() {
        let site = Site {
            base_url: "http://localhost:8080/api/".into(),
            ..Default::default()
        };
        assert_eq!("http://localhost:8080/api/states/all", site.route(STATES_ROUTE));
        assert_eq!(
            "https://opensky-network.org/api/states/all",
            Site::default().route(STATES_ROUTE)
        );
    }
}
