//! Test utilities shared across the pilot workspace
//!
//! This crate provides common testing infrastructure including:
//! - Temporary workflow channels and runner directories ([`WorkflowGuard`])
//! - Event payload builders ([`payloads`])
//! - Stand-in assistant executables ([`FakeAssistant`])
//!
//! The clippy dead_code lint is disabled for this crate because test utilities
//! may not be used by all tests, and the compiler cannot detect usage across
//! crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod assistant;
pub mod payloads;
pub mod workflow;

// Re-export commonly used items
pub use assistant::FakeAssistant;
pub use workflow::WorkflowGuard;
