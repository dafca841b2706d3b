//! # Pilot Core Library
//!
//! Domain model and pure decision logic for the pilot CI bridge: the parsed
//! event context, trigger evaluation, tool lists, prompt assembly, assistant
//! run options, tracking comment bodies and the workflow output channel.
//! Nothing in this crate talks to the network.

pub mod branch;
pub mod comment;
pub mod config;
pub mod context;
pub mod data;
pub mod error;
pub mod mcp;
pub mod output;
pub mod outputs;
pub mod prompt;
pub mod prompt_source;
pub mod provider;
pub mod run_options;
pub mod settings;
pub mod tools;
pub mod trigger;

// Re-export main types
pub use branch::BranchInfo;
pub use config::{EnvSource, GitHubEndpoints, PrepareConfig, ProcessEnv, RunConfig, UpdateCommentConfig};
pub use context::{EventKind, EventPayload, Inputs, ParsedContext, Repository};
pub use error::{ActionError, Result};
pub use output::{ColorMode, print_error, print_info, print_success};
pub use outputs::ActionOutputs;
pub use run_options::{RawRunOptions, RunOptions};
pub use trigger::{TriggerDecision, evaluate, extract_trigger_content};
