//! Core domain types and utilities for the flowcap platform.
//!
//! This crate provides the foundational identifier types and the
//! error-handling `Result` alias used throughout the flowcap flow
//! execution engine.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{FlowId, ParseIdError, RunId};
