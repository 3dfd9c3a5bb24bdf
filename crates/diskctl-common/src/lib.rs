//! # diskctl-common
//!
//! Shared types, error definitions, configuration models, and constants
//! used across the diskctl workspace.
//!
//! This crate is the leaf of the dependency graph. It depends on no other
//! internal crate and provides the primitives that the topology, cgroup
//! and CLI layers build upon.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
