//! # Platform Operations
//!
//! Multi-call operations built on the endpoint methods: the tracking comment
//! lifecycle, branch setup and supplementary data fetching.

pub mod branch;
pub mod comments;
pub mod fetcher;

pub use branch::setup_branch;
pub use comments::{create_initial_comment, update_terminal, update_with_branch};
pub use fetcher::fetch_github_data;
