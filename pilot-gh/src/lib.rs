//! # GitHub API Client
//!
//! GitHub REST and GraphQL integration for pilot: the bearer-authenticated
//! client, endpoint methods, token acquisition, the actor and permission
//! gate, and the multi-call operations the preparer and reporter use.

pub mod client;
pub mod consts;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod operations;
pub mod token;
pub mod validation;

// Re-export the client
pub use client::{GitHubClient, create_github_client};
pub use error::GitHubError;
// Re-export models
pub use models::{GitHubComment, GitHubIssue, GitHubPullRequest, GitHubUser};
pub use token::{RetryPolicy, acquire_token, acquire_token_with};
pub use validation::{check_human_actor, check_write_permissions};
