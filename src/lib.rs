//! Jira CLI Library
//!
//! This module exports the option-resolution pipeline for testing and
//! for embedding in other front ends.

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod edit;
pub mod error;
pub mod logging;
pub mod options;
pub mod pipeline;
pub mod router;
