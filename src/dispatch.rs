//! Request dispatcher
//!
//! Every user action issues exactly one POST through [`Dispatcher::dispatch`]
//! and awaits exactly one response. There is no retry, no request queue and
//! no de-duplication; a timeout applies only when one is configured.
//!
//! The outcome of a dispatch is a [`DispatchOutcome`]:
//!
//! - `Success` -- 2xx status with a JSON body, handed to the renderer
//! - `ServerError` -- non-2xx status; the body's `message` is surfaced
//! - `LoginRequired` -- protected endpoint without a saved token; no request
//!   was sent
//! - `TransportFailure` -- unreachable backend or malformed body; logged only
//!
//! Local failures (token storage unreadable, payload not serializable) are
//! returned as errors instead.

use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::config::{ApiConfig, Config};
use crate::error::{ItineraError, Result};
use crate::model::ErrorBody;
use crate::session::{SessionContext, SessionToken};

/// Backend endpoints consumed by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    CreateItinerary,
    TrackExpense,
    SubmitReview,
    Chatbot,
    GenerateItinerary,
}

impl Endpoint {
    /// Request path relative to the backend base URL
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::CreateItinerary => "itinerary",
            Self::TrackExpense => "track-expense",
            Self::SubmitReview => "submit-review",
            Self::Chatbot => "chatbot",
            Self::GenerateItinerary => "generate-itinerary",
        }
    }

    /// Whether the endpoint needs the session token
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::CreateItinerary | Self::SubmitReview)
    }
}

/// Result of one dispatched user action
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Successful status; parsed JSON body
    Success(serde_json::Value),
    /// Non-success status reported by the backend
    ServerError {
        status: u16,
        message: Option<String>,
    },
    /// Protected endpoint invoked without a saved token; nothing was sent
    LoginRequired,
    /// The request or the response body failed below the HTTP status level
    TransportFailure(String),
}

/// Issues one authenticated or anonymous POST per user action.
///
/// # Examples
///
/// ```no_run
/// use itinera::config::Config;
/// use itinera::dispatch::{Dispatcher, Endpoint};
/// use itinera::model::ChatQuery;
/// use itinera::session::SessionContext;
///
/// # async fn example() -> itinera::error::Result<()> {
/// let dispatcher = Dispatcher::from_config(&Config::default(), SessionContext::in_memory())?;
/// let query = ChatQuery { query: "best beaches in Lisbon".to_string() };
/// let outcome = dispatcher.dispatch(Endpoint::Chatbot, &query).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Dispatcher {
    http_client: reqwest::Client,
    base_url: Url,
    generate_base_url: Url,
    auth_header: String,
    session: SessionContext,
}

impl Dispatcher {
    /// Construct a dispatcher for the given API settings.
    ///
    /// `generate_base_url` serves `/generate-itinerary`; every other endpoint
    /// is resolved against `api.base_url`. No network I/O is performed at
    /// construction time.
    ///
    /// # Errors
    ///
    /// Returns an error if a base URL does not parse or the HTTP client
    /// cannot be built.
    pub fn new(api: &ApiConfig, generate_base_url: &str, session: SessionContext) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(seconds) = api.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let http_client = builder.build()?;

        Ok(Self {
            http_client,
            base_url: directory_url(&api.base_url)?,
            generate_base_url: directory_url(generate_base_url)?,
            auth_header: api.auth_header.clone(),
            session,
        })
    }

    /// Construct a dispatcher from the full configuration
    pub fn from_config(config: &Config, session: SessionContext) -> Result<Self> {
        Self::new(&config.api, config.generate_base_url(), session)
    }

    /// The session this dispatcher reads tokens from
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Absolute URL of `endpoint`
    pub fn url_for(&self, endpoint: Endpoint) -> Result<Url> {
        let base = match endpoint {
            Endpoint::GenerateItinerary => &self.generate_base_url,
            _ => &self.base_url,
        };
        Ok(base.join(endpoint.path())?)
    }

    fn auth_value(&self, token: &SessionToken) -> String {
        if self.auth_header.eq_ignore_ascii_case("authorization") {
            format!("Bearer {}", token.as_str())
        } else {
            token.as_str().to_string()
        }
    }

    /// Send one POST to `endpoint` with `payload` as the JSON body.
    ///
    /// For protected endpoints the saved token is attached; when no token is
    /// saved the call short-circuits with [`DispatchOutcome::LoginRequired`]
    /// and nothing is sent.
    ///
    /// # Errors
    ///
    /// Returns an error only for local failures: the token store could not
    /// be read, the URL could not be built, or the payload could not be
    /// serialized.
    pub async fn dispatch<P>(&self, endpoint: Endpoint, payload: &P) -> Result<DispatchOutcome>
    where
        P: Serialize + ?Sized,
    {
        let token = if endpoint.requires_auth() {
            match self.session.load()? {
                Some(token) => Some(token),
                None => {
                    tracing::info!(endpoint = endpoint.path(), "No session token; request not sent");
                    return Ok(DispatchOutcome::LoginRequired);
                }
            }
        } else {
            None
        };

        let url = self.url_for(endpoint)?;
        let body = serde_json::to_value(payload)?;

        let mut req = self.http_client.post(url.as_str()).json(&body);

        if let Some(token) = &token {
            req = req.header(self.auth_header.as_str(), self.auth_value(token));
        }

        tracing::debug!(url = %url, authenticated = token.is_some(), "Dispatching request");

        let response = match req.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(url = %url, error = %e, "Request failed");
                return Ok(DispatchOutcome::TransportFailure(format!(
                    "request to {} failed: {}",
                    url, e
                )));
            }
        };

        let status = response.status();
        tracing::debug!(url = %url, status = status.as_u16(), "Response received");

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(url = %url, error = %e, "Failed to read response body");
                return Ok(DispatchOutcome::TransportFailure(format!(
                    "failed to read response body: {}",
                    e
                )));
            }
        };

        let body: serde_json::Value = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(
                    url = %url,
                    status = status.as_u16(),
                    error = %e,
                    "Response body is not valid JSON"
                );
                return Ok(DispatchOutcome::TransportFailure(format!(
                    "malformed response body: {}",
                    e
                )));
            }
        };

        if status.is_success() {
            return Ok(DispatchOutcome::Success(body));
        }

        let message = serde_json::from_value::<ErrorBody>(body)
            .ok()
            .and_then(|error| error.message);
        tracing::info!(url = %url, status = status.as_u16(), ?message, "Backend reported an error");

        Ok(DispatchOutcome::ServerError {
            status: status.as_u16(),
            message,
        })
    }
}

/// Parse a base URL so that relative joins append to its path.
fn directory_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)
        .map_err(|e| ItineraError::Config(format!("Invalid base URL '{}': {}", raw, e)))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher(base: &str, generate: &str) -> Dispatcher {
        Dispatcher::new(&ApiConfig::default(), generate, SessionContext::in_memory())
            .map(|mut d| {
                d.base_url = directory_url(base).unwrap();
                d
            })
            .unwrap()
    }

    #[test]
    fn test_protected_endpoints() {
        assert!(Endpoint::CreateItinerary.requires_auth());
        assert!(Endpoint::SubmitReview.requires_auth());
        assert!(!Endpoint::Login.requires_auth());
        assert!(!Endpoint::TrackExpense.requires_auth());
        assert!(!Endpoint::Chatbot.requires_auth());
        assert!(!Endpoint::GenerateItinerary.requires_auth());
    }

    #[test]
    fn test_url_for_joins_paths() {
        let d = dispatcher("http://localhost:5000", "http://localhost:5000");
        assert_eq!(
            d.url_for(Endpoint::TrackExpense).unwrap().as_str(),
            "http://localhost:5000/track-expense"
        );
    }

    #[test]
    fn test_url_for_keeps_base_path_prefix() {
        let d = dispatcher("https://example.com/api", "http://planner:8080/v1/");
        assert_eq!(
            d.url_for(Endpoint::Login).unwrap().as_str(),
            "https://example.com/api/login"
        );
        assert_eq!(
            d.url_for(Endpoint::GenerateItinerary).unwrap().as_str(),
            "http://planner:8080/v1/generate-itinerary"
        );
    }

    #[test]
    fn test_auth_value_raw_token_by_default() {
        let d = dispatcher("http://localhost:5000", "http://localhost:5000");
        assert_eq!(d.auth_value(&SessionToken::new("abc")), "abc");
    }

    #[test]
    fn test_auth_value_bearer_for_authorization_header() {
        let mut d = dispatcher("http://localhost:5000", "http://localhost:5000");
        d.auth_header = "Authorization".to_string();
        assert_eq!(d.auth_value(&SessionToken::new("abc")), "Bearer abc");
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        let api = ApiConfig {
            base_url: "::nope".to_string(),
            ..ApiConfig::default()
        };
        assert!(Dispatcher::new(&api, "http://localhost:5000", SessionContext::in_memory()).is_err());
    }

    #[tokio::test]
    async fn test_dispatch_protected_without_token_short_circuits() {
        // Nothing listens on this port; reaching the network would yield a
        // transport failure instead.
        let d = dispatcher("http://127.0.0.1:9", "http://127.0.0.1:9");
        let outcome = d
            .dispatch(Endpoint::SubmitReview, &serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::LoginRequired);
    }

    #[tokio::test]
    async fn test_dispatch_unreachable_backend_is_transport_failure() {
        let d = dispatcher("http://127.0.0.1:9", "http://127.0.0.1:9");
        let outcome = d
            .dispatch(Endpoint::Chatbot, &serde_json::json!({"query": "hi"}))
            .await
            .unwrap();
        assert!(matches!(outcome, DispatchOutcome::TransportFailure(_)));
    }
}
