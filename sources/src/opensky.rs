//! OpenSky (.org) specific code
//!
//! Two steps:
//! - `authenticate()` exchanges the client credentials for a bearer token (OAuth2 client
//!   credentials grant).  Anonymous access skips this and gets an empty token.
//! - `fetch()` gets all state vectors inside a bounding box from `/states/all`.
//!
//! Every call is a one-shot, nothing is cached between runs.
//!

use std::time::{Duration, Instant};

use clap::{crate_name, crate_version};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, trace};

use airwatch_common::BB;
use airwatch_formats::StateList;

use crate::{
    Auth, AuthError, Expirable, FetchError, Fetchable, OpenskyToken, Site, Stats, STATES_ROUTE,
};

/// HTTP timeout for every request
const TIMEOUT: Duration = Duration::from_secs(30);

/// This is the Opensky client/source struct.
///
#[derive(Clone, Debug)]
pub struct Opensky {
    /// Where to get the token
    token_url: String,
    /// Full URL of the states route
    states_url: String,
    /// Credentials, if any
    auth: Auth,
    client: Client,
}

impl Opensky {
    #[tracing::instrument(skip(auth))]
    pub fn new(site: &Site, auth: Auth) -> Result<Self, AuthError> {
        trace!("opensky::new");

        let client = Client::builder()
            .user_agent(format!("{}/{}", crate_name!(), crate_version!()))
            .timeout(TIMEOUT)
            .build()
            .map_err(|e| AuthError::BadParam(e.to_string()))?;

        Ok(Opensky {
            token_url: site.token_url.clone(),
            states_url: site.route(STATES_ROUTE),
            auth,
            client,
        })
    }

    /// Get a full token from the identity provider
    ///
    #[tracing::instrument(skip(self, client_secret))]
    async fn get_token(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<OpenskyToken, AuthError> {
        trace!("Fetching token through {}…", self.token_url);

        let resp = self
            .client
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", client_id),
                ("client_secret", client_secret),
            ])
            .send()
            .await
            .map_err(|e| AuthError::HTTP(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| AuthError::HTTP(e.to_string()))?;

        if !status.is_success() {
            return Err(AuthError::Rejected(status.as_u16(), body));
        }

        let token = OpenskyToken::from_json(&body).map_err(|e| AuthError::Decoding(e.to_string()))?;
        debug!("token valid until {}", token.expires_at());
        Ok(token)
    }
}

impl Fetchable for Opensky {
    #[inline]
    fn name(&self) -> String {
        "opensky".to_string()
    }

    /// Authenticate to the site using the supplied credentials and get a token
    ///
    #[tracing::instrument(skip(self))]
    async fn authenticate(&self) -> Result<String, AuthError> {
        match &self.auth {
            Auth::Anon => {
                info!("No credentials, using anonymous access.");
                Ok(String::new())
            }
            Auth::Client {
                client_id,
                client_secret,
            } => {
                trace!("authenticate as ({client_id})");
                let token = self.get_token(client_id, client_secret).await?;
                if token.is_expired() {
                    return Err(AuthError::Decoding(format!(
                        "token already expired ({}s)",
                        token.expires_in
                    )));
                }
                Ok(token.key())
            }
        }
    }

    /// Get one snapshot of all state vectors inside `area`.
    ///
    /// An empty token means anonymous access.
    ///
    #[tracing::instrument(skip(self, token))]
    async fn fetch(&self, token: &str, area: &BB) -> Result<(StateList, Stats), FetchError> {
        let start = Instant::now();
        trace!("Fetching data from {}…", self.states_url);

        let req = self.client.get(&self.states_url).query(&area.to_query()[..]);
        let req = if token.is_empty() {
            req
        } else {
            req.bearer_auth(token)
        };

        let resp = req
            .send()
            .await
            .map_err(|e| FetchError::HTTP(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::HTTP(e.to_string()))?;

        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16(), body));
        }

        let list = StateList::from_json(&body)?;
        let stats = Stats {
            tm: start.elapsed().as_millis(),
            states: list.states.len(),
            bytes: body.len() as u64,
            dropped: list.dropped,
        };
        info!("{stats}");
        Ok((list, stats))
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    fn site(server: &MockServer) -> Site {
        Site {
            token_url: server.url("/token"),
            base_url: server.url("/api"),
            ..Default::default()
        }
    }

    fn client_auth() -> Auth {
        Auth::Client {
            client_id: "me-api-client".into(),
            client_secret: "s3cr3t".into(),
        }
    }

    #[tokio::test]
    async fn test_authenticate() {
        let server = MockServer::start_async().await;
        let m = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/token")
                    .body_contains("grant_type=client_credentials")
                    .body_contains("client_id=me-api-client");
                then.status(200).json_body(json!({
                    "access_token": "eyJhbGciOi",
                    "expires_in": 1800,
                    "token_type": "Bearer"
                }));
            })
            .await;

        let src = Opensky::new(&site(&server), client_auth()).unwrap();
        let token = src.authenticate().await.unwrap();

        m.assert_async().await;
        assert_eq!("eyJhbGciOi", token);
    }

    #[tokio::test]
    async fn test_authenticate_rejected() {
        let server = MockServer::start_async().await;
        let _m = server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(401).body(r##"{"error":"invalid_client"}"##);
            })
            .await;

        let src = Opensky::new(&site(&server), client_auth()).unwrap();
        let res = src.authenticate().await;
        assert!(matches!(res, Err(AuthError::Rejected(401, _))));
    }

    #[tokio::test]
    async fn test_authenticate_anon() {
        let server = MockServer::start_async().await;
        let src = Opensky::new(&site(&server), Auth::Anon).unwrap();
        assert_eq!("", src.authenticate().await.unwrap());
    }

    #[tokio::test]
    async fn test_fetch() {
        let server = MockServer::start_async().await;
        let m = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/states/all")
                    .header("authorization", "Bearer eyJhbGciOi")
                    .query_param_exists("lamin")
                    .query_param_exists("lomin")
                    .query_param_exists("lamax")
                    .query_param_exists("lomax");
                then.status(200).json_body(json!({
                    "time": 1719820800,
                    "states": [
                        ["4baa9c", "THY4KZ  ", "Turkey", 1719820795, 1719820799, 28.82, 40.98, 1000.5, false, 82.3, 45.0, -4.2, null, 1050.0, "5013", false, 0]
                    ]
                }));
            })
            .await;

        let src = Opensky::new(&site(&server), client_auth()).unwrap();
        let (list, stats) = src.fetch("eyJhbGciOi", &BB::default()).await.unwrap();

        m.assert_async().await;
        assert_eq!(1, list.states.len());
        assert_eq!(1, stats.states);
        assert_eq!("4baa9c", list.states[0].icao24);
    }

    #[tokio::test]
    async fn test_fetch_bad_status() {
        let server = MockServer::start_async().await;
        let _m = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/states/all");
                then.status(429).body("Too many requests");
            })
            .await;

        let src = Opensky::new(&site(&server), Auth::Anon).unwrap();
        let res = src.fetch("", &BB::default()).await;
        assert!(matches!(res, Err(FetchError::Status(429, _))));
    }

    #[tokio::test]
    async fn test_fetch_garbage() {
        let server = MockServer::start_async().await;
        let _m = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/states/all");
                then.status(200).body("<html></html>");
            })
            .await;

        let src = Opensky::new(&site(&server), Auth::Anon).unwrap();
        let res = src.fetch("", &BB::default()).await;
        assert!(matches!(res, Err(FetchError::Format(_))));
    }
}
