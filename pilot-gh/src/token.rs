//! # Token Acquisition
//!
//! Obtains the platform token for a run: either a directly supplied override
//! or an installation token from the OIDC exchange. The exchange is retried
//! with exponential backoff; missing OIDC settings fail immediately.

use std::time::Duration;

use pilot_core::config::TokenConfig;
use pilot_core::{ActionError, GitHubEndpoints};
use reqwest::{Client, StatusCode, header};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::consts::{ACCEPT, API_VERSION, API_VERSION_HEADER, USER_AGENT};
use crate::models::{IdToken, InstallationToken};

/// Number of exchange attempts before giving up
pub const MAX_ATTEMPTS: u32 = 5;

/// How often and how patiently the exchange is retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  pub max_attempts: u32,
  pub base_delay: Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_attempts: MAX_ATTEMPTS,
      base_delay: Duration::from_secs(1),
    }
  }
}

impl RetryPolicy {
  /// Delay after the given zero-based failed attempt: `base * 2^attempt`
  pub fn delay_for(&self, attempt: u32) -> Duration {
    self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
  }
}

/// Acquire the run's platform token with the default retry policy
pub async fn acquire_token(config: &TokenConfig, endpoints: &GitHubEndpoints) -> Result<String, ActionError> {
  acquire_token_with(config, endpoints, RetryPolicy::default()).await
}

/// Acquire the run's platform token
#[instrument(skip_all, level = "debug")]
pub async fn acquire_token_with(
  config: &TokenConfig,
  endpoints: &GitHubEndpoints,
  retry: RetryPolicy,
) -> Result<String, ActionError> {
  if let Some(token) = &config.override_token {
    info!("Using provided GitHub token");
    return Ok(token.clone());
  }

  let (Some(request_url), Some(request_token)) = (&config.request_url, &config.request_token) else {
    return Err(ActionError::Token(
      "OIDC token request URL or token not available".to_string(),
    ));
  };

  let exchange = OidcExchange {
    client: Client::new(),
    request_url,
    request_token,
    token_url: format!(
      "{}/app/installations/{}/access_tokens",
      endpoints.api_url,
      config.installation_id.as_deref().unwrap_or_default()
    ),
  };

  let attempts = retry.max_attempts.max(1);
  let mut attempt = 0;
  loop {
    match exchange.run().await {
      Ok(token) => {
        info!("Obtained installation token");
        return Ok(token);
      }
      Err(e) if attempt + 1 >= attempts => {
        return Err(ActionError::Token(e));
      }
      Err(e) => {
        let delay = retry.delay_for(attempt);
        warn!("Token exchange attempt {} failed: {}; retrying in {:?}", attempt + 1, e, delay);
        tokio::time::sleep(delay).await;
        attempt += 1;
      }
    }
  }
}

struct OidcExchange<'a> {
  client: Client,
  request_url: &'a str,
  request_token: &'a str,
  token_url: String,
}

impl OidcExchange<'_> {
  async fn run(&self) -> Result<String, String> {
    let id_token = self.request_id_token().await?;
    self.exchange(&id_token).await
  }

  async fn request_id_token(&self) -> Result<String, String> {
    let mut url = Url::parse(self.request_url).map_err(|e| format!("Invalid OIDC request URL: {e}"))?;
    url.query_pairs_mut().append_pair("audience", "github");
    debug!("Requesting OIDC token");

    let response = self
      .client
      .get(url)
      .header(header::USER_AGENT, USER_AGENT)
      .bearer_auth(self.request_token)
      .send()
      .await
      .map_err(|e| format!("Failed to request ID token: {e}"))?;

    if response.status() != StatusCode::OK {
      return Err(format!("Failed to get ID token: {}", response.status()));
    }

    let body: IdToken = response
      .json()
      .await
      .map_err(|e| format!("Failed to parse ID token response: {e}"))?;
    body
      .value
      .filter(|value| !value.is_empty())
      .ok_or_else(|| "No ID token in response".to_string())
  }

  async fn exchange(&self, id_token: &str) -> Result<String, String> {
    debug!("Exchanging OIDC token at {}", self.token_url);
    let response = self
      .client
      .post(&self.token_url)
      .header(header::ACCEPT, ACCEPT)
      .header(header::USER_AGENT, USER_AGENT)
      .header(API_VERSION_HEADER, API_VERSION)
      .bearer_auth(id_token)
      .send()
      .await
      .map_err(|e| format!("Failed to exchange ID token: {e}"))?;

    let status = response.status();
    if status != StatusCode::CREATED {
      return Err(format!("Failed to get access token: {status}"));
    }

    let body: InstallationToken = response
      .json()
      .await
      .map_err(|e| format!("Failed to parse access token response: {e}"))?;
    if body.token.is_empty() {
      return Err("No access token in response".to_string());
    }
    Ok(body.token)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use wiremock::matchers::{header, method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;

  fn fast_retry() -> RetryPolicy {
    RetryPolicy {
      max_attempts: 5,
      base_delay: Duration::from_millis(1),
    }
  }

  fn oidc_config(server: &MockServer) -> TokenConfig {
    TokenConfig {
      override_token: None,
      request_url: Some(format!("{}/oidc?api-version=2.0", server.uri())),
      request_token: Some("runner-token".to_string()),
      installation_id: Some("99".to_string()),
    }
  }

  fn endpoints(server: &MockServer) -> GitHubEndpoints {
    GitHubEndpoints {
      api_url: server.uri(),
      ..Default::default()
    }
  }

  #[test]
  fn test_backoff_doubles() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.delay_for(0), Duration::from_secs(1));
    assert_eq!(policy.delay_for(1), Duration::from_secs(2));
    assert_eq!(policy.delay_for(3), Duration::from_secs(8));
  }

  #[tokio::test]
  async fn test_override_token_skips_exchange() -> anyhow::Result<()> {
    let config = TokenConfig {
      override_token: Some("ghp_override".to_string()),
      ..Default::default()
    };
    let token = acquire_token(&config, &GitHubEndpoints::default()).await?;
    assert_eq!(token, "ghp_override");
    Ok(())
  }

  #[tokio::test]
  async fn test_missing_oidc_settings_fail_without_retry() {
    let err = acquire_token_with(&TokenConfig::default(), &GitHubEndpoints::default(), fast_retry())
      .await
      .unwrap_err();
    assert_eq!(
      err.to_string(),
      "Failed to get GitHub token: OIDC token request URL or token not available"
    );
  }

  #[tokio::test]
  async fn test_oidc_exchange() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/oidc"))
      .and(query_param("audience", "github"))
      .and(query_param("api-version", "2.0"))
      .and(header("Authorization", "Bearer runner-token"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": "id-token" })))
      .mount(&mock_server)
      .await;

    Mock::given(method("POST"))
      .and(path("/app/installations/99/access_tokens"))
      .and(header("Authorization", "Bearer id-token"))
      .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "token": "ghs_installation" })))
      .mount(&mock_server)
      .await;

    let token = acquire_token_with(&oidc_config(&mock_server), &endpoints(&mock_server), fast_retry()).await?;
    assert_eq!(token, "ghs_installation");

    Ok(())
  }

  #[tokio::test]
  async fn test_exchange_retries_transient_failures() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/oidc"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": "id-token" })))
      .mount(&mock_server)
      .await;

    // First two exchanges fail, the third succeeds
    Mock::given(method("POST"))
      .and(path("/app/installations/99/access_tokens"))
      .respond_with(ResponseTemplate::new(502))
      .up_to_n_times(2)
      .mount(&mock_server)
      .await;
    Mock::given(method("POST"))
      .and(path("/app/installations/99/access_tokens"))
      .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "token": "ghs_after_retry" })))
      .mount(&mock_server)
      .await;

    let token = acquire_token_with(&oidc_config(&mock_server), &endpoints(&mock_server), fast_retry()).await?;
    assert_eq!(token, "ghs_after_retry");

    Ok(())
  }

  #[tokio::test]
  async fn test_exchange_gives_up_after_max_attempts() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/oidc"))
      .respond_with(ResponseTemplate::new(500))
      .expect(5)
      .mount(&mock_server)
      .await;

    let err = acquire_token_with(&oidc_config(&mock_server), &endpoints(&mock_server), fast_retry())
      .await
      .unwrap_err();
    assert!(matches!(err, ActionError::Token(_)));
    assert!(err.to_string().contains("Failed to get ID token: 500"));

    Ok(())
  }
}
