//! # GitHub HTTP Client
//!
//! HTTP client for GitHub REST and GraphQL calls. Authentication is a bearer
//! token supplied once at construction; one client (and its connection pool)
//! is shared by every call of a run and released when the client is
//! dropped.

use pilot_core::GitHubEndpoints;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, trace, warn};

use crate::consts::{ACCEPT, API_VERSION, API_VERSION_HEADER, USER_AGENT};
use crate::error::{GitHubError, Result};

/// Represents a GitHub API client
pub struct GitHubClient {
  pub(crate) client: Client,
  pub(crate) base_url: String,
  pub(crate) graphql_url: String,
  pub(crate) token: String,
}

impl GitHubClient {
  /// Create a new GitHub client for the given endpoints
  pub fn new(token: impl Into<String>, endpoints: &GitHubEndpoints) -> Self {
    Self {
      client: Client::new(),
      base_url: endpoints.api_url.clone(),
      graphql_url: endpoints.graphql_url.clone(),
      token: token.into(),
    }
  }

  fn request(&self, method: Method, url: &str) -> RequestBuilder {
    self
      .client
      .request(method, url)
      .header(header::ACCEPT, ACCEPT)
      .header(header::USER_AGENT, USER_AGENT)
      .header(API_VERSION_HEADER, API_VERSION)
      .bearer_auth(&self.token)
  }

  /// GET a JSON resource
  pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
    trace!("GitHub API URL: {}", url);
    let response = self
      .request(Method::GET, url)
      .send()
      .await
      .map_err(|source| GitHubError::Request {
        method: "GET",
        url: url.to_string(),
        source,
      })?;
    parse_response("GET", url, response).await
  }

  /// POST a JSON body and parse the JSON response
  pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(&self, url: &str, body: &B) -> Result<T> {
    trace!("GitHub API URL: {}", url);
    let response = self
      .request(Method::POST, url)
      .json(body)
      .send()
      .await
      .map_err(|source| GitHubError::Request {
        method: "POST",
        url: url.to_string(),
        source,
      })?;
    parse_response("POST", url, response).await
  }

  /// PATCH a JSON body and parse the JSON response
  pub async fn patch_json<B: Serialize + ?Sized, T: DeserializeOwned>(&self, url: &str, body: &B) -> Result<T> {
    trace!("GitHub API URL: {}", url);
    let response = self
      .request(Method::PATCH, url)
      .json(body)
      .send()
      .await
      .map_err(|source| GitHubError::Request {
        method: "PATCH",
        url: url.to_string(),
        source,
      })?;
    parse_response("PATCH", url, response).await
  }

  /// Run a GraphQL query, returning its `data` member
  pub async fn graphql(&self, query: &str, variables: Value) -> Result<Value> {
    let url = self.graphql_url.clone();
    let mut response: Value = self
      .post_json(&url, &json!({ "query": query, "variables": variables }))
      .await?;

    if let Some(errors) = response.get("errors").and_then(Value::as_array).filter(|e| !e.is_empty()) {
      let messages: Vec<&str> = errors
        .iter()
        .filter_map(|error| error.get("message").and_then(Value::as_str))
        .collect();
      return Err(GitHubError::GraphQl(messages.join("; ")));
    }

    Ok(response.get_mut("data").map(Value::take).unwrap_or(Value::Null))
  }
}

/// Map a response to its parsed body or a status error
async fn parse_response<T: DeserializeOwned>(method: &'static str, url: &str, response: Response) -> Result<T> {
  let status = response.status();
  debug!("GitHub API response status: {}", status);

  if status.is_success() {
    return response.json::<T>().await.map_err(|e| GitHubError::Decode {
      url: url.to_string(),
      message: e.to_string(),
    });
  }

  let body = response.text().await.unwrap_or_default();
  let message = match status {
    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
      warn!("Authentication failed when accessing GitHub API");
      api_message(&body).unwrap_or_else(|| "Authentication failed. Please check the GitHub token.".to_string())
    }
    _ => {
      warn!("Unexpected GitHub API error: HTTP {} - {}", status, body);
      api_message(&body).unwrap_or(body)
    }
  };

  Err(GitHubError::Status {
    method,
    url: url.to_string(),
    status,
    message,
  })
}

/// The `message` member of a GitHub error body
fn api_message(body: &str) -> Option<String> {
  serde_json::from_str::<Value>(body)
    .ok()?
    .get("message")
    .and_then(Value::as_str)
    .map(str::to_string)
}

/// Create a GitHub client from a token
pub fn create_github_client(token: &str, endpoints: &GitHubEndpoints) -> GitHubClient {
  GitHubClient::new(token, endpoints)
}

#[cfg(test)]
pub(crate) mod tests {
  use wiremock::matchers::{body_partial_json, header, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;

  /// Client pointed at a mock server for both REST and GraphQL
  pub(crate) fn test_client(server: &MockServer) -> GitHubClient {
    let endpoints = GitHubEndpoints {
      api_url: server.uri(),
      server_url: "https://github.com".to_string(),
      graphql_url: format!("{}/graphql", server.uri()),
    };
    GitHubClient::new("test_token", &endpoints)
  }

  #[tokio::test]
  async fn test_github_client_creation() -> anyhow::Result<()> {
    let client = GitHubClient::new("test_token", &GitHubEndpoints::default());

    assert_eq!(client.base_url, "https://api.github.com");
    assert_eq!(client.graphql_url, "https://api.github.com/graphql");
    assert_eq!(client.token, "test_token");

    Ok(())
  }

  #[tokio::test]
  async fn test_requests_carry_bearer_auth_and_version() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server);

    Mock::given(method("GET"))
      .and(path("/rate_limit"))
      .and(header("Authorization", "Bearer test_token"))
      .and(header("Accept", ACCEPT))
      .and(header(API_VERSION_HEADER, API_VERSION))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
      .mount(&mock_server)
      .await;

    let value: Value = client.get_json(&format!("{}/rate_limit", client.base_url)).await?;
    assert_eq!(value["ok"], true);

    Ok(())
  }

  #[tokio::test]
  async fn test_error_status_carries_api_message() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server);

    Mock::given(method("GET"))
      .and(path("/users/ghost"))
      .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
      .mount(&mock_server)
      .await;

    let result: Result<Value> = client.get_json(&format!("{}/users/ghost", client.base_url)).await;
    let error = result.unwrap_err();
    assert!(error.is_not_found());
    assert!(error.to_string().ends_with("HTTP 404 Not Found - Not Found"));

    Ok(())
  }

  #[tokio::test]
  async fn test_graphql_returns_data() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server);

    Mock::given(method("POST"))
      .and(path("/graphql"))
      .and(body_partial_json(json!({ "variables": { "login": "alice" } })))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "data": { "user": { "name": "Alice Liddell" } }
      })))
      .mount(&mock_server)
      .await;

    let data = client
      .graphql("query($login: String!) { user(login: $login) { name } }", json!({ "login": "alice" }))
      .await?;
    assert_eq!(data["user"]["name"], "Alice Liddell");

    Ok(())
  }

  #[tokio::test]
  async fn test_graphql_errors_fail() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server);

    Mock::given(method("POST"))
      .and(path("/graphql"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "data": null,
        "errors": [{ "message": "Could not resolve to a User" }]
      })))
      .mount(&mock_server)
      .await;

    let result = client.graphql("query { viewer { login } }", json!({})).await;
    assert!(matches!(result, Err(GitHubError::GraphQl(ref m)) if m == "Could not resolve to a User"));

    Ok(())
  }
}
