//! Constants for the pilot-gh client

/// User-Agent header value for the GitHub API client
pub const USER_AGENT: &str = concat!("pilot/", env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Accept header value for the GitHub API
pub const ACCEPT: &str = "application/vnd.github+json";

/// REST API version pinned on every request
pub const API_VERSION: &str = "2022-11-28";

/// Header carrying [`API_VERSION`]
pub const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
