//! # Pilot CLI Library
//!
//! The entrypoints of the pilot CI bridge: the run preparer, the completion
//! reporter and the assistant process supervisor, plus the clap surface that
//! dispatches to them.

pub mod cli;
pub mod consts;
pub mod runner;
