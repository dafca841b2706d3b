//! # GitHub API Endpoints
//!
//! Endpoint implementations grouped by resource type: users and
//! collaborator permissions, issues and their comments, pull requests, and
//! repository references.

pub mod issues;
pub mod pulls;
pub mod repos;
pub mod users;
